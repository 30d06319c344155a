use std::path::PathBuf;

use k8s_openapi::api::core::v1::Pod;
use kube::ResourceExt;

/// Settings for one collection pass over a namespace.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionConfig {
    pub namespace: String,
    pub pod_names: Vec<String>,
    pub output_dir: PathBuf,
    pub tail_lines: Option<i64>,
    pub follow: bool,
    pub previous: bool,
    pub since_seconds: Option<i64>,
    pub timestamps: bool,
    /// Restrict collection to one container; `None` collects every container.
    pub container: Option<String>,
}

impl CollectionConfig {
    /// Defaults used when the tool is invoked with only a namespace.
    pub fn new(namespace: impl Into<String>, pod_names: Vec<String>) -> Self {
        Self {
            namespace: namespace.into(),
            pod_names,
            output_dir: PathBuf::from("./pod-logs"),
            tail_lines: Some(1000),
            follow: false,
            previous: false,
            since_seconds: None,
            timestamps: true,
            container: None,
        }
    }

    /// Sets the container filter; an empty name means all containers.
    pub fn with_container(mut self, container: Option<String>) -> Self {
        self.container = container.filter(|c| !c.is_empty());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodDescriptor {
    pub name: String,
    pub containers: Vec<String>,
    pub init_containers: Vec<String>,
}

impl PodDescriptor {
    /// Regular containers in declaration order, then init containers.
    pub fn container_names(&self) -> Vec<String> {
        self.containers
            .iter()
            .chain(&self.init_containers)
            .cloned()
            .collect()
    }
}

impl From<&Pod> for PodDescriptor {
    fn from(pod: &Pod) -> Self {
        let (containers, init_containers): (Vec<String>, Vec<String>) = pod
            .spec
            .as_ref()
            .map(|spec| {
                let containers = spec.containers.iter().map(|c| c.name.clone()).collect();
                let init = spec
                    .init_containers
                    .iter()
                    .flatten()
                    .map(|c| c.name.clone())
                    .collect();
                (containers, init)
            })
            .unwrap_or_default();

        Self {
            name: pod.name_any(),
            containers,
            init_containers,
        }
    }
}

/// Outcome of a collection pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CollectionSummary {
    pub saved: Vec<PathBuf>,
    pub failed_containers: usize,
    pub skipped_pods: usize,
}
