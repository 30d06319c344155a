use std::path::PathBuf;
use std::pin::Pin;

use anyhow::Context;
use futures::io::AsyncRead;
use k8s_openapi::api::core::v1::Pod;
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{
    Api, Client, Config,
    api::{ListParams, LogParams},
};
use tracing::debug;

use crate::error::CollectError;
use crate::types::PodDescriptor;

/// Raw log bytes for one container, as served by the API server.
pub type LogStream<'a> = Pin<Box<dyn AsyncRead + Send + 'a>>;

/// The two places credentials can come from, tried in order.
pub trait CredentialSource {
    /// Service-account token and CA mounted into a pod.
    fn in_cluster(&self) -> anyhow::Result<Config>;

    /// A local kubeconfig file.
    async fn kubeconfig(&self) -> anyhow::Result<Config>;
}

/// Credentials as found in the process environment.
#[derive(Debug, Clone, Default)]
pub struct KubeCredentials {
    /// Explicit kubeconfig path; `KUBECONFIG` or `~/.kube/config` when unset.
    pub kubeconfig: Option<PathBuf>,
    pub context: Option<String>,
}

impl CredentialSource for KubeCredentials {
    fn in_cluster(&self) -> anyhow::Result<Config> {
        Ok(Config::incluster()?)
    }

    async fn kubeconfig(&self) -> anyhow::Result<Config> {
        let kubeconfig = match &self.kubeconfig {
            Some(path) => Kubeconfig::read_from(path)
                .with_context(|| format!("reading kubeconfig {}", path.display()))?,
            None => Kubeconfig::read().context("reading default kubeconfig")?,
        };
        let options = KubeConfigOptions {
            context: self.context.clone(),
            ..Default::default()
        };
        let config = Config::from_custom_kubeconfig(kubeconfig, &options).await?;
        Ok(config)
    }
}

/// Resolves a client configuration, preferring in-cluster credentials.
pub async fn resolve_config<S: CredentialSource>(source: &S) -> Result<Config, CollectError> {
    let in_cluster = match source.in_cluster() {
        Ok(config) => {
            debug!("Using in-cluster configuration");
            return Ok(config);
        }
        Err(e) => e,
    };
    debug!(
        "In-cluster configuration unavailable ({:#}), falling back to kubeconfig",
        in_cluster
    );

    match source.kubeconfig().await {
        Ok(config) => Ok(config),
        Err(kubeconfig) => Err(CollectError::Config {
            in_cluster,
            kubeconfig,
        }),
    }
}

pub async fn create_client<S: CredentialSource>(source: &S) -> Result<Client, CollectError> {
    let config = resolve_config(source).await?;
    Client::try_from(config).map_err(CollectError::Client)
}

/// An empty namespace means the client's default one.
pub fn resolve_namespace(client: &Client, requested: &str) -> String {
    namespace_or_default(requested, client.default_namespace())
}

fn namespace_or_default(requested: &str, default: &str) -> String {
    if requested.is_empty() {
        default.to_string()
    } else {
        requested.to_string()
    }
}

/// Pod operations within a single namespace.
pub trait PodApi {
    fn namespace(&self) -> &str;

    async fn list_pods(&self) -> Result<Vec<PodDescriptor>, kube::Error>;

    async fn get_pod(&self, name: &str) -> Result<PodDescriptor, kube::Error>;

    async fn open_log_stream<'a>(
        &'a self,
        pod: &'a str,
        params: &'a LogParams,
    ) -> Result<LogStream<'a>, kube::Error>;
}

pub struct KubePods {
    api: Api<Pod>,
    namespace: String,
}

impl KubePods {
    pub fn new(client: Client, namespace: &str) -> Self {
        Self {
            api: Api::namespaced(client, namespace),
            namespace: namespace.to_string(),
        }
    }
}

impl PodApi for KubePods {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    // No pagination: namespaces are expected to hold few pods.
    async fn list_pods(&self) -> Result<Vec<PodDescriptor>, kube::Error> {
        let pods = self.api.list(&ListParams::default()).await?;
        Ok(pods.items.iter().map(PodDescriptor::from).collect())
    }

    async fn get_pod(&self, name: &str) -> Result<PodDescriptor, kube::Error> {
        let pod = self.api.get(name).await?;
        Ok(PodDescriptor::from(&pod))
    }

    async fn open_log_stream<'a>(
        &'a self,
        pod: &'a str,
        params: &'a LogParams,
    ) -> Result<LogStream<'a>, kube::Error> {
        let stream = self.api.log_stream(pod, params).await?;
        Ok(Box::pin(stream))
    }
}

pub async fn list_pods<A: PodApi>(api: &A) -> Result<Vec<PodDescriptor>, CollectError> {
    api.list_pods().await.map_err(|source| CollectError::List {
        namespace: api.namespace().to_string(),
        source,
    })
}

pub fn pod_names(pods: &[PodDescriptor]) -> Vec<String> {
    pods.iter().map(|p| p.name.clone()).collect()
}

pub async fn list_pod_names<A: PodApi>(api: &A) -> Result<Vec<String>, CollectError> {
    let pods = list_pods(api).await?;
    Ok(pod_names(&pods))
}
