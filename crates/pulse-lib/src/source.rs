//! Pod observation sources
//!
//! A [`PodSource`] yields the raw pod observations the analyzer works on.
//! [`KubePodSource`] queries a live cluster through the Kubernetes API;
//! [`StaticPodSource`] serves a fixed list and is used in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{PodObservation, PodPhase};

/// Errors raised when pod observations cannot be obtained
#[derive(Debug, Error)]
pub enum SourceError {
    /// Neither a kubeconfig nor an in-cluster environment was usable
    #[error("failed to infer cluster configuration")]
    Infer(#[from] kube::config::InferConfigError),

    /// The kubeconfig file could not be read or did not contain the context
    #[error("failed to load kubeconfig")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    /// The API client could not be built from the configuration
    #[error("failed to create cluster client")]
    Client(#[source] kube::Error),

    /// The list-pods query failed
    #[error("failed to list pods in {scope}")]
    Unavailable {
        scope: String,
        #[source]
        source: kube::Error,
    },
}

/// Something that can list the pods of a cluster
#[async_trait]
pub trait PodSource: Send + Sync {
    /// List pods in `namespace`, or in every namespace when `None` or empty
    async fn list_pods(&self, namespace: Option<&str>) -> Result<Vec<PodObservation>, SourceError>;
}

/// Human readable scope used in logs and errors
pub(crate) fn scope_label(namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) => format!("namespace '{}'", ns),
        None => "all namespaces".to_string(),
    }
}

/// How to reach the cluster
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Explicit kubeconfig path; the default locations are used when unset
    pub kubeconfig: Option<PathBuf>,
    /// Context to use instead of the kubeconfig's current context
    pub context: Option<String>,
}

/// Pod source backed by the Kubernetes API server
#[derive(Clone)]
pub struct KubePodSource {
    client: Client,
}

impl KubePodSource {
    /// Connect using the given kubeconfig options.
    ///
    /// With no options set the configuration is inferred the same way
    /// kubectl does (`KUBECONFIG`, `~/.kube/config`, then in-cluster).
    pub async fn connect(options: &ClientOptions) -> Result<Self, SourceError> {
        let config = if options.kubeconfig.is_none() && options.context.is_none() {
            Config::infer().await?
        } else {
            let kubeconfig = match &options.kubeconfig {
                Some(path) => Kubeconfig::read_from(path)?,
                None => Kubeconfig::read()?,
            };
            let kube_options = KubeConfigOptions {
                context: options.context.clone(),
                ..Default::default()
            };
            Config::from_custom_kubeconfig(kubeconfig, &kube_options).await?
        };

        debug!(cluster_url = %config.cluster_url, "Resolved cluster configuration");
        let client = Client::try_from(config).map_err(SourceError::Client)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PodSource for KubePodSource {
    async fn list_pods(&self, namespace: Option<&str>) -> Result<Vec<PodObservation>, SourceError> {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        let pods: Api<Pod> = match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        };

        let pod_list = pods
            .list(&ListParams::default())
            .await
            .map_err(|source| SourceError::Unavailable {
                scope: scope_label(namespace),
                source,
            })?;

        info!(
            scope = %scope_label(namespace),
            pods = pod_list.items.len(),
            "Listed pods"
        );

        Ok(pod_list.items.iter().map(observe_pod).collect())
    }
}

/// Reduce a pod object to the fields the analyzer needs.
///
/// Restarts are summed over the regular containers; the last restart is
/// the latest `finishedAt` of any container's previous termination.
pub fn observe_pod(pod: &Pod) -> PodObservation {
    let name = pod.metadata.name.clone().unwrap_or_default();
    let namespace = pod.metadata.namespace.clone().unwrap_or_default();

    let status = pod.status.as_ref();
    let phase = status
        .and_then(|s| s.phase.as_deref())
        .map(PodPhase::parse)
        .unwrap_or(PodPhase::Unknown);

    let mut restarts: u32 = 0;
    let mut last_restart: Option<DateTime<Utc>> = None;

    let container_statuses = status
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or_default();

    for container in container_statuses {
        restarts = restarts.saturating_add(container.restart_count.max(0) as u32);

        let finished_at = container
            .last_state
            .as_ref()
            .and_then(|state| state.terminated.as_ref())
            .and_then(|terminated| terminated.finished_at.as_ref())
            .map(|time| time.0);

        if let Some(finished_at) = finished_at {
            if last_restart.map_or(true, |latest| finished_at > latest) {
                last_restart = Some(finished_at);
            }
        }
    }

    PodObservation {
        name,
        namespace,
        phase,
        restarts,
        last_restart,
    }
}

/// Pod source serving a fixed list of observations
#[derive(Debug, Clone, Default)]
pub struct StaticPodSource {
    pods: Vec<PodObservation>,
}

impl StaticPodSource {
    pub fn new(pods: Vec<PodObservation>) -> Self {
        Self { pods }
    }
}

#[async_trait]
impl PodSource for StaticPodSource {
    async fn list_pods(&self, namespace: Option<&str>) -> Result<Vec<PodObservation>, SourceError> {
        let pods = match namespace.filter(|ns| !ns.is_empty()) {
            Some(ns) => self.pods.iter().filter(|p| p.namespace == ns).cloned().collect(),
            None => self.pods.clone(),
        };
        Ok(pods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use k8s_openapi::api::core::v1::{
        ContainerState, ContainerStateTerminated, ContainerStatus, PodStatus,
    };
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};

    fn container(restart_count: i32, finished_at: Option<DateTime<Utc>>) -> ContainerStatus {
        ContainerStatus {
            restart_count,
            last_state: finished_at.map(|at| ContainerState {
                terminated: Some(ContainerStateTerminated {
                    finished_at: Some(Time(at)),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn k8s_pod(name: &str, namespace: &str, phase: &str, containers: Vec<ContainerStatus>) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            status: Some(PodStatus {
                phase: Some(phase.to_string()),
                container_statuses: Some(containers),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_observe_pod_sums_restarts_and_keeps_latest_termination() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let pod = k8s_pod(
            "web-0",
            "default",
            "Running",
            vec![
                container(2, Some(base - Duration::minutes(30))),
                container(3, Some(base - Duration::minutes(2))),
                container(0, None),
            ],
        );

        let observed = observe_pod(&pod);
        assert_eq!(observed.name, "web-0");
        assert_eq!(observed.namespace, "default");
        assert_eq!(observed.phase, PodPhase::Running);
        assert_eq!(observed.restarts, 5);
        assert_eq!(observed.last_restart, Some(base - Duration::minutes(2)));
    }

    #[test]
    fn test_observe_pod_without_restarts() {
        let pod = k8s_pod("job-1", "batch", "Succeeded", vec![container(0, None)]);

        let observed = observe_pod(&pod);
        assert_eq!(observed.phase, PodPhase::Succeeded);
        assert_eq!(observed.restarts, 0);
        assert!(observed.last_restart.is_none());
    }

    #[test]
    fn test_observe_pod_with_missing_status() {
        let pod = Pod::default();

        let observed = observe_pod(&pod);
        assert_eq!(observed.name, "");
        assert_eq!(observed.namespace, "");
        assert_eq!(observed.phase, PodPhase::Unknown);
        assert_eq!(observed.restarts, 0);
        assert!(observed.last_restart.is_none());
    }

    #[test]
    fn test_observe_pod_unrecognised_phase() {
        let pod = k8s_pod("odd", "default", "", vec![]);
        assert_eq!(observe_pod(&pod).phase, PodPhase::Unknown);
    }

    #[tokio::test]
    async fn test_static_source_filters_by_namespace() {
        let source = StaticPodSource::new(vec![
            PodObservation::new("a", "default", PodPhase::Running),
            PodObservation::new("b", "kube-system", PodPhase::Running),
        ]);

        assert_eq!(source.list_pods(None).await.unwrap().len(), 2);
        assert_eq!(source.list_pods(Some("")).await.unwrap().len(), 2);

        let system = source.list_pods(Some("kube-system")).await.unwrap();
        assert_eq!(system.len(), 1);
        assert_eq!(system[0].name, "b");
    }

    #[test]
    fn test_scope_label() {
        assert_eq!(scope_label(None), "all namespaces");
        assert_eq!(scope_label(Some("prod")), "namespace 'prod'");
    }
}
