use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error(
        "failed to create kubernetes config: in-cluster: {in_cluster:#}; kubeconfig: {kubeconfig:#}"
    )]
    Config {
        in_cluster: anyhow::Error,
        kubeconfig: anyhow::Error,
    },

    #[error("failed to create kubernetes client: {0}")]
    Client(#[source] kube::Error),

    #[error("failed to list pods in namespace {namespace}: {source}")]
    List {
        namespace: String,
        #[source]
        source: kube::Error,
    },

    #[error("[{pod}] failed to get pod: {source}")]
    GetPod {
        pod: String,
        #[source]
        source: kube::Error,
    },

    #[error("[{pod}/{container}] failed to get logs stream: {source}")]
    Stream {
        pod: String,
        container: String,
        #[source]
        source: kube::Error,
    },

    #[error("failed to create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[{pod}/{container}] failed to write {}: {source}", .path.display())]
    Write {
        pod: String,
        container: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
