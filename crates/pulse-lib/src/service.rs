//! Source → analyzer → formatter pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analyzer::analyze_cluster_health;
use crate::formatter::format_cluster_health;
use crate::models::ClusterHealth;
use crate::source::{PodSource, SourceError};

/// Default recent-restart window in minutes
pub const DEFAULT_WINDOW_MINUTES: u32 = 15;

/// Default number of top offenders to report
pub const DEFAULT_POD_AMOUNT: usize = 3;

/// Parameters of one pulse run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PulseRequest {
    pub window_minutes: u32,
    pub pod_amount: usize,
    /// Namespace to restrict to; `None` covers the whole cluster
    pub namespace: Option<String>,
}

impl Default for PulseRequest {
    fn default() -> Self {
        Self {
            window_minutes: DEFAULT_WINDOW_MINUTES,
            pod_amount: DEFAULT_POD_AMOUNT,
            namespace: None,
        }
    }
}

impl PulseRequest {
    /// Requested namespace, treating an empty string as "all namespaces"
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|ns| !ns.is_empty())
    }
}

/// Produces cluster pulse summaries from a pod source
pub struct PulseService<S> {
    source: S,
}

impl<S: PodSource> PulseService<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Query the source once and analyze the result against `now`
    pub async fn cluster_health(
        &self,
        request: &PulseRequest,
        now: DateTime<Utc>,
    ) -> Result<ClusterHealth, SourceError> {
        let namespace = request.namespace();
        let pods = self.source.list_pods(namespace).await?;
        debug!(pods = pods.len(), ?namespace, "Fetched pod observations");

        Ok(analyze_cluster_health(
            &pods,
            request.window_minutes,
            request.pod_amount,
            namespace,
            now,
        ))
    }

    /// Same as [`cluster_health`](Self::cluster_health), rendered as a text report
    pub async fn cluster_pulse(
        &self,
        request: &PulseRequest,
        now: DateTime<Utc>,
    ) -> Result<String, SourceError> {
        let health = self.cluster_health(request, now).await?;
        Ok(format_cluster_health(&health))
    }
}
