//! Text rendering of a cluster health summary
//!
//! The layout is fixed so the report reads the same on every run:
//!
//! ```text
//! ⚠️ WARNING - Cluster Pulse
//! ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//! 🔄 Recent restarts (15m): 2 (default/pod-a, default/pod-b)
//!
//! 📊 Pod Status Distribution:
//!    🟢 Running: 2 (66.7%)
//!    🔴 Failed: 1 (33.3%)
//!    📦 Total pods: 3
//!
//! 🔥 Top problematic pods:
//!    🟡 default/pod-b (3 restarts)
//!    🟡 default/pod-a (1 restarts)
//! ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//! ```

use std::fmt;

use crate::models::{ClusterHealth, PhaseDistribution, PodObservation, PodPhase};

/// Separator drawn above and below the report body
pub const SEPARATOR: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Names longer than this are shortened in the recent-restarts line
const INLINE_NAME_MAX: usize = 15;
const INLINE_NAME_KEEP: usize = 12;

/// Names longer than this are shortened in the offenders list
const OFFENDER_NAME_MAX: usize = 30;
const OFFENDER_NAME_KEEP: usize = 27;

const ELLIPSIS: &str = "...";

/// Severity tier of a single pod's cumulative restart count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartSeverity {
    /// 1 to 10 restarts
    Low,
    /// 11 to 100 restarts
    Medium,
    /// More than 100 restarts
    High,
}

impl RestartSeverity {
    pub fn from_restarts(restarts: u32) -> Self {
        match restarts {
            0..=10 => RestartSeverity::Low,
            11..=100 => RestartSeverity::Medium,
            _ => RestartSeverity::High,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            RestartSeverity::Low => "🟡",
            RestartSeverity::Medium => "🟠",
            RestartSeverity::High => "🔴",
        }
    }
}

fn phase_marker(phase: PodPhase) -> &'static str {
    match phase {
        PodPhase::Running => "🟢",
        PodPhase::Pending => "⏳",
        PodPhase::Failed => "🔴",
        PodPhase::Succeeded => "✅",
        PodPhase::Unknown => "❓",
    }
}

/// Shorten `name` to `keep` characters plus an ellipsis when it exceeds `max`
pub fn truncate_name(name: &str, max: usize, keep: usize) -> String {
    if name.chars().count() > max {
        let head: String = name.chars().take(keep).collect();
        format!("{head}{ELLIPSIS}")
    } else {
        name.to_string()
    }
}

/// Render the full report for `health`
pub fn format_cluster_health(health: &ClusterHealth) -> String {
    ClusterReport::new(health).to_string()
}

/// Display adapter that writes the fixed-layout report
#[derive(Debug, Clone, Copy)]
pub struct ClusterReport<'a> {
    health: &'a ClusterHealth,
}

impl<'a> ClusterReport<'a> {
    pub fn new(health: &'a ClusterHealth) -> Self {
        Self { health }
    }

    fn write_recent_restarts(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let health = self.health;
        let marker = if health.recent_restarts == 0 { "✅" } else { "🔄" };
        write!(
            f,
            "{} Recent restarts ({}m): {}",
            marker, health.window_minutes, health.recent_restarts
        )?;

        if !health.recent_restart_pods.is_empty() {
            f.write_str(" (")?;
            for (i, pod) in health.recent_restart_pods.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(
                    f,
                    "{}/{}",
                    pod.namespace,
                    truncate_name(&pod.name, INLINE_NAME_MAX, INLINE_NAME_KEEP)
                )?;
            }
            f.write_str(")")?;
        }
        writeln!(f)
    }

    fn write_distribution(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let distribution: &PhaseDistribution = &self.health.distribution;
        if distribution.is_empty() {
            return f.write_str("\n📊 Pod Status: No pods found\n");
        }

        f.write_str("\n📊 Pod Status Distribution:\n")?;
        for phase in PodPhase::ALL {
            let count = distribution.count(phase);
            if count == 0 {
                continue;
            }
            writeln!(
                f,
                "   {} {}: {} ({:.1}%)",
                phase_marker(phase),
                phase,
                count,
                distribution.percentage(phase)
            )?;
        }
        writeln!(f, "   📦 Total pods: {}", distribution.total)
    }

    fn write_offenders(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let offenders: &[PodObservation] = &self.health.top_offenders;
        let any_restarts = offenders.first().is_some_and(|top| top.restarts > 0);
        if !any_restarts {
            return f.write_str("\n✨ No problematic pods detected\n");
        }

        f.write_str("\n🔥 Top problematic pods:\n")?;
        for offender in offenders.iter().take_while(|p| p.restarts > 0) {
            writeln!(
                f,
                "   {} {}/{} ({} restarts)",
                RestartSeverity::from_restarts(offender.restarts).marker(),
                offender.namespace,
                truncate_name(&offender.name, OFFENDER_NAME_MAX, OFFENDER_NAME_KEEP),
                offender.restarts
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for ClusterReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = self.health.verdict();
        writeln!(f, "\n{} {} - Cluster Pulse", verdict.marker(), verdict.label())?;
        writeln!(f, "{SEPARATOR}")?;

        self.write_recent_restarts(f)?;
        self.write_distribution(f)?;
        self.write_offenders(f)?;

        f.write_str(SEPARATOR)
    }
}
