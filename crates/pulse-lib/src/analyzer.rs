//! Classification of pod observations into a cluster health summary
//!
//! Every function here is pure: the reference time is passed in by the
//! caller, so the same inputs always produce the same summary.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::models::{ClusterHealth, PhaseDistribution, PodObservation};

/// Build a [`ClusterHealth`] summary from raw pod observations.
///
/// `namespace` restricts the analysis to a single namespace; `None` or an
/// empty string keeps every pod.
pub fn analyze_cluster_health(
    pods: &[PodObservation],
    window_minutes: u32,
    limit: usize,
    namespace: Option<&str>,
    now: DateTime<Utc>,
) -> ClusterHealth {
    let pods = filter_namespace(pods, namespace);
    let recent_restart_pods = recent_restarts(&pods, window_minutes, now);
    let top_offenders = top_offenders(&pods, limit);
    let distribution = phase_distribution(&pods);

    debug!(
        pods = pods.len(),
        recent_restarts = recent_restart_pods.len(),
        offenders = top_offenders.len(),
        window_minutes,
        "Analyzed cluster health"
    );

    ClusterHealth {
        window_minutes,
        recent_restarts: recent_restart_pods.len(),
        recent_restart_pods,
        top_offenders,
        distribution,
    }
}

/// Keep only pods in `namespace` (exact match)
pub fn filter_namespace(pods: &[PodObservation], namespace: Option<&str>) -> Vec<PodObservation> {
    match namespace.filter(|ns| !ns.is_empty()) {
        Some(ns) => pods.iter().filter(|p| p.namespace == ns).cloned().collect(),
        None => pods.to_vec(),
    }
}

/// Pods whose last restart happened at most `window_minutes` before `now`.
///
/// The boundary is inclusive. Pods without a recorded restart never match.
pub fn recent_restarts(
    pods: &[PodObservation],
    window_minutes: u32,
    now: DateTime<Utc>,
) -> Vec<PodObservation> {
    let window = Duration::minutes(i64::from(window_minutes));

    pods.iter()
        .filter(|pod| match pod.last_restart {
            Some(at) => now.signed_duration_since(at) <= window,
            None => false,
        })
        .cloned()
        .collect()
}

/// Rank pods by cumulative restarts, highest first, keeping at most `limit`.
///
/// Ties keep their input order.
pub fn top_offenders(pods: &[PodObservation], limit: usize) -> Vec<PodObservation> {
    let mut ranked = pods.to_vec();
    ranked.sort_by(|a, b| b.restarts.cmp(&a.restarts));
    ranked.truncate(limit);
    ranked
}

pub fn phase_distribution(pods: &[PodObservation]) -> PhaseDistribution {
    pods.iter().fold(PhaseDistribution::default(), |mut dist, pod| {
        dist.record(pod.phase);
        dist
    })
}
