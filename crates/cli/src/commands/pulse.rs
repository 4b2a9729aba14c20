//! The pulse command: fetch pods, analyze, print

use anyhow::{Context, Result};
use chrono::Utc;
use pulse_lib::{ClientOptions, KubePodSource, PulseRequest, PulseService};
use tracing::debug;

use crate::output::{self, OutputFormat};

/// Run one pulse against the cluster and print the report to stdout
pub async fn show_pulse(
    client_options: &ClientOptions,
    request: &PulseRequest,
    format: OutputFormat,
) -> Result<()> {
    let source = KubePodSource::connect(client_options)
        .await
        .context("Error initializing pulse service")?;
    let service = PulseService::new(source);

    let now = Utc::now();
    debug!(?request, %now, "Running cluster pulse");

    let health = service
        .cluster_health(request, now)
        .await
        .context("Error getting cluster pulse")?;

    let report = output::render(&health, request.namespace(), now, format)?;
    println!("{}", report);

    Ok(())
}
