use std::path::PathBuf;

use chrono::Local;
use kube::api::LogParams;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio_util::compat::FuturesAsyncReadCompatExt;
use tracing::{info, warn};

use crate::error::CollectError;
use crate::kubernetes::PodApi;
use crate::types::{CollectionConfig, CollectionSummary};
use crate::utils::{log_file_name, log_header};

pub fn log_params(config: &CollectionConfig, container: &str) -> LogParams {
    LogParams {
        container: Some(container.to_string()),
        follow: config.follow,
        previous: config.previous,
        timestamps: config.timestamps,
        tail_lines: config.tail_lines,
        since_seconds: config.since_seconds,
        ..Default::default()
    }
}

/// Saves the logs of every container of every configured pod.
///
/// Only a failure to create the output directory is returned; anything that
/// goes wrong for a single pod or container is logged and skipped.
pub async fn collect_all<A: PodApi>(
    api: &A,
    config: &CollectionConfig,
) -> Result<CollectionSummary, CollectError> {
    fs::create_dir_all(&config.output_dir)
        .await
        .map_err(|source| CollectError::OutputDir {
            path: config.output_dir.clone(),
            source,
        })?;

    let mut summary = CollectionSummary::default();

    for pod_name in &config.pod_names {
        info!("Collecting logs for pod: {}", pod_name);

        let pod = match api.get_pod(pod_name).await {
            Ok(pod) => pod,
            Err(source) => {
                let err = CollectError::GetPod {
                    pod: pod_name.clone(),
                    source,
                };
                warn!("{}", err);
                summary.skipped_pods += 1;
                continue;
            }
        };

        // The filter is not checked against the pod spec; a bad name fails at stream time.
        let containers = match &config.container {
            Some(name) => vec![name.clone()],
            None => pod.container_names(),
        };

        for container in &containers {
            match collect_one(api, config, pod_name, container, containers.len()).await {
                Ok(path) => summary.saved.push(path),
                Err(err) => {
                    warn!("{}", err);
                    summary.failed_containers += 1;
                }
            }
        }
    }

    Ok(summary)
}

/// Streams one container's logs into a new file under the output directory.
///
/// A file left over from the same pod and container within the same second is
/// overwritten. On a copy failure the file keeps whatever was written so far.
pub async fn collect_one<A: PodApi>(
    api: &A,
    config: &CollectionConfig,
    pod: &str,
    container: &str,
    container_count: usize,
) -> Result<PathBuf, CollectError> {
    let params = log_params(config, container);
    let stream = api
        .open_log_stream(pod, &params)
        .await
        .map_err(|source| CollectError::Stream {
            pod: pod.to_string(),
            container: container.to_string(),
            source,
        })?;

    let collected_at = Local::now();
    let path = config
        .output_dir
        .join(log_file_name(pod, container, container_count, &collected_at));
    let write_err = |source| CollectError::Write {
        pod: pod.to_string(),
        container: container.to_string(),
        path: path.clone(),
        source,
    };

    let mut file = File::create(&path).await.map_err(write_err)?;
    file.write_all(log_header(pod, container, &collected_at).as_bytes())
        .await
        .map_err(write_err)?;

    // Flush even when the copy fails so the partial file reaches disk.
    let mut reader = stream.compat();
    let copied = tokio::io::copy(&mut reader, &mut file).await;
    let flushed = file.flush().await;
    copied.map_err(write_err)?;
    flushed.map_err(write_err)?;

    info!("  ✓ Saved logs to: {}", path.display());
    Ok(path)
}
