//! Output formatting utilities

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use colored::Colorize;
use pulse_lib::{format_cluster_health, ClusterHealth, HealthVerdict};
use serde::{Deserialize, Serialize};

/// Output format for the pulse report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human readable report (default)
    #[default]
    Text,
    /// JSON summary
    Json,
}

/// Machine readable form of a pulse run
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub verdict: HealthVerdict,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<&'a str>,
    #[serde(flatten)]
    pub health: &'a ClusterHealth,
}

/// Render `health` in the requested format
pub fn render(
    health: &ClusterHealth,
    namespace: Option<&str>,
    generated_at: DateTime<Utc>,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_cluster_health(health)),
        OutputFormat::Json => {
            let report = JsonReport {
                verdict: health.verdict(),
                generated_at,
                namespace,
                health,
            };
            serde_json::to_string_pretty(&report).context("Failed to serialize report")
        }
    }
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "🚨".red().bold(), message.red());
}
