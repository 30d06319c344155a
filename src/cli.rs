use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;

use crate::types::CollectionConfig;
use crate::utils::since_seconds_until;

#[derive(Parser, Debug)]
#[command(name = "pod-logs")]
#[command(about = "Save the logs of every pod in a namespace to local files")]
pub struct Cli {
    /// Namespace (empty uses the client's default namespace)
    #[arg(short = 'n', long, default_value = "")]
    pub namespace: String,

    /// Directory the log files are written to
    #[arg(short = 'o', long, default_value = "./pod-logs")]
    pub output_dir: PathBuf,

    /// Number of most recent lines to fetch per container
    #[arg(long, default_value_t = 1000, value_parser = clap::value_parser!(i64).range(1..))]
    pub tail: i64,

    /// Fetch the whole log instead of the last --tail lines
    #[arg(long, conflicts_with = "tail")]
    pub all_lines: bool,

    /// Only fetch lines newer than this many seconds
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    pub since: Option<i64>,

    /// Only fetch lines newer than this RFC 3339 time
    #[arg(long, conflicts_with = "since", value_parser = parse_since_time)]
    pub since_time: Option<DateTime<Utc>>,

    /// Container name (all containers when omitted)
    #[arg(short = 'c', long)]
    pub container: Option<String>,

    /// Keep the stream open for new lines
    #[arg(short = 'f', long)]
    pub follow: bool,

    /// Fetch logs of the previous container instance
    #[arg(short = 'p', long)]
    pub previous: bool,

    /// Do not prefix lines with server timestamps
    #[arg(long)]
    pub no_timestamps: bool,

    /// Path to a kubeconfig file
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Context
    #[arg(long)]
    pub context: Option<String>,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Extra arguments; printed and otherwise ignored
    pub args: Vec<String>,
}

fn parse_since_time(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 time '{}': {}", s, e))
}

impl Cli {
    pub fn collection_config(
        &self,
        namespace: String,
        pod_names: Vec<String>,
        now: DateTime<Utc>,
    ) -> CollectionConfig {
        let since_seconds = self
            .since
            .or_else(|| self.since_time.map(|t| since_seconds_until(t, now)));

        CollectionConfig {
            output_dir: self.output_dir.clone(),
            tail_lines: (!self.all_lines).then_some(self.tail),
            follow: self.follow,
            previous: self.previous,
            since_seconds,
            timestamps: !self.no_timestamps,
            ..CollectionConfig::new(namespace, pod_names)
        }
        .with_container(self.container.clone())
    }
}
