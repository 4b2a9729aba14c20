//! Core data models for cluster pulse reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse lifecycle state of a pod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PodPhase {
    Running,
    Pending,
    Failed,
    Succeeded,
    Unknown,
}

impl PodPhase {
    /// All phases in report display order
    pub const ALL: [PodPhase; 5] = [
        PodPhase::Running,
        PodPhase::Pending,
        PodPhase::Failed,
        PodPhase::Succeeded,
        PodPhase::Unknown,
    ];

    /// Parse the phase string reported by the API server.
    ///
    /// Anything unrecognised, including an empty string, is `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value {
            "Running" => PodPhase::Running,
            "Pending" => PodPhase::Pending,
            "Failed" => PodPhase::Failed,
            "Succeeded" => PodPhase::Succeeded,
            _ => PodPhase::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PodPhase::Running => "Running",
            PodPhase::Pending => "Pending",
            PodPhase::Failed => "Failed",
            PodPhase::Succeeded => "Succeeded",
            PodPhase::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PodPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pod's state at query time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodObservation {
    pub name: String,
    pub namespace: String,
    pub phase: PodPhase,
    /// Restarts summed across all containers
    pub restarts: u32,
    /// Most recent container termination, `None` if the pod never restarted
    pub last_restart: Option<DateTime<Utc>>,
}

impl PodObservation {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, phase: PodPhase) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            phase,
            restarts: 0,
            last_restart: None,
        }
    }

    /// Set the cumulative restart count and the last termination time
    pub fn with_restarts(mut self, restarts: u32, last_restart: Option<DateTime<Utc>>) -> Self {
        self.restarts = restarts;
        self.last_restart = last_restart;
        self
    }
}

/// Pod counts per lifecycle phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDistribution {
    pub running: usize,
    pub pending: usize,
    pub failed: usize,
    pub succeeded: usize,
    pub unknown: usize,
    pub total: usize,
}

impl PhaseDistribution {
    /// Count one pod in the given phase
    pub fn record(&mut self, phase: PodPhase) {
        match phase {
            PodPhase::Running => self.running += 1,
            PodPhase::Pending => self.pending += 1,
            PodPhase::Failed => self.failed += 1,
            PodPhase::Succeeded => self.succeeded += 1,
            PodPhase::Unknown => self.unknown += 1,
        }
        self.total += 1;
    }

    pub fn count(&self, phase: PodPhase) -> usize {
        match phase {
            PodPhase::Running => self.running,
            PodPhase::Pending => self.pending,
            PodPhase::Failed => self.failed,
            PodPhase::Succeeded => self.succeeded,
            PodPhase::Unknown => self.unknown,
        }
    }

    /// Share of pods in `phase`, in percent. Returns `0.0` when no pods were seen.
    pub fn percentage(&self, phase: PodPhase) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(phase) as f64 / self.total as f64 * 100.0
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Overall cluster verdict derived from recent restart activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthVerdict {
    /// No restarts inside the window
    Healthy,
    /// Between one and five restarts inside the window
    Warning,
    /// More than five restarts inside the window
    Critical,
}

impl HealthVerdict {
    /// Highest recent restart count still reported as a warning
    pub const WARNING_LIMIT: usize = 5;

    pub fn from_recent_restarts(count: usize) -> Self {
        match count {
            0 => HealthVerdict::Healthy,
            n if n <= Self::WARNING_LIMIT => HealthVerdict::Warning,
            _ => HealthVerdict::Critical,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HealthVerdict::Healthy => "HEALTHY",
            HealthVerdict::Warning => "WARNING",
            HealthVerdict::Critical => "CRITICAL",
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            HealthVerdict::Healthy => "💚",
            HealthVerdict::Warning => "⚠️",
            HealthVerdict::Critical => "🚨",
        }
    }
}

/// Result of one analysis pass over the cluster's pods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterHealth {
    /// Length of the recent-restart window in minutes
    pub window_minutes: u32,
    /// Number of pods that restarted inside the window
    pub recent_restarts: usize,
    /// Pods that restarted inside the window, in source order
    pub recent_restart_pods: Vec<PodObservation>,
    /// Pods with the most cumulative restarts, highest first
    pub top_offenders: Vec<PodObservation>,
    pub distribution: PhaseDistribution,
}

impl ClusterHealth {
    pub fn verdict(&self) -> HealthVerdict {
        HealthVerdict::from_recent_restarts(self.recent_restarts)
    }
}
