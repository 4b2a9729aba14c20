//! kubectl-pulse
//!
//! A kubectl plugin that prints a one-screen health pulse of a cluster:
//! recent restarts, top offenders and the pod phase distribution.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use pulse_lib::ClientOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::commands::pulse;
use crate::config::Config;

const LONG_ABOUT: &str = "\
Get a quick health pulse of your Kubernetes cluster

Example usage:
  kubectl pulse                # Show cluster health with default 15-minute window
  kubectl pulse -n kube-system # Check restarts in the kube-system namespace
  kubectl pulse -m 30          # Check restarts in last 30 minutes
  kubectl pulse -m 30 -p 10    # Check restarts in last 30 minutes and show top 10 pods";

/// Cluster pulse CLI
#[derive(Parser, Debug)]
#[command(name = "kubectl-pulse")]
#[command(author, version, about = "Get a quick health pulse of your Kubernetes cluster", long_about = LONG_ABOUT)]
pub struct Cli {
    /// Namespace to check for restarts (all namespaces if not specified)
    #[arg(long, short)]
    pub namespace: Option<String>,

    /// Time window in minutes to check for restarts [default: 15]
    #[arg(long, short)]
    pub minutes: Option<u32>,

    /// Amount of pods to list as top offenders [default: 3]
    #[arg(long, short)]
    pub pod_amount: Option<usize>,

    /// Path to kubeconfig file (uses default if not specified)
    #[arg(long)]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context to use instead of the current one
    #[arg(long)]
    pub context: Option<String>,

    /// Output format [default: text]
    #[arg(long, short)]
    pub format: Option<output::OutputFormat>,

    /// Path to the config file (can also be set via KUBE_PULSE_CONFIG env var)
    #[arg(long, env = "KUBE_PULSE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let request = config.pulse_request(cli.namespace, cli.minutes, cli.pod_amount);
    let format = config.output_format(cli.format);
    let client_options = ClientOptions {
        kubeconfig: cli.kubeconfig,
        context: cli.context,
    };

    pulse::show_pulse(&client_options, &request, format).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}
