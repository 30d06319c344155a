mod cli;
mod collector;
mod error;
mod kubernetes;
mod types;
mod utils;

use clap::Parser;
use tracing::{debug, info};

use cli::Cli;
use collector::collect_all;
use kubernetes::{KubeCredentials, KubePods, create_client, list_pod_names, resolve_namespace};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Progress and warnings go to stdout alongside the summary.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stdout)
        .init();

    info!("=== Pull pods logs from Kubernetes ===");
    if !cli.args.is_empty() {
        info!("Non-flag arguments: {:?}", cli.args);
    }

    let credentials = KubeCredentials {
        kubeconfig: cli.kubeconfig.clone(),
        context: cli.context.clone(),
    };
    let client = create_client(&credentials).await?;

    let namespace = resolve_namespace(&client, &cli.namespace);
    debug!("Using namespace: {}", namespace);

    let pods = KubePods::new(client, &namespace);
    let pod_names = list_pod_names(&pods).await?;
    info!("Found {} pods in namespace {}", pod_names.len(), namespace);

    let config = cli.collection_config(namespace, pod_names, chrono::Utc::now());
    let summary = collect_all(&pods, &config).await?;

    info!(
        "Log collection completed! {} files saved, {} containers failed, {} pods skipped",
        summary.saved.len(),
        summary.failed_containers,
        summary.skipped_pods
    );
    Ok(())
}
