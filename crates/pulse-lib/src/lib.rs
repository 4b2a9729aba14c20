//! Cluster pulse library
//!
//! This crate provides the core functionality for:
//! - Listing pod observations from a Kubernetes cluster
//! - Analyzing recent restarts, top offenders and phase distribution
//! - Rendering the summary as a fixed-layout terminal report

pub mod analyzer;
pub mod formatter;
pub mod models;
pub mod service;
pub mod source;

pub use analyzer::analyze_cluster_health;
pub use formatter::{format_cluster_health, ClusterReport};
pub use models::*;
pub use service::{PulseRequest, PulseService, DEFAULT_POD_AMOUNT, DEFAULT_WINDOW_MINUTES};
pub use source::{ClientOptions, KubePodSource, PodSource, SourceError, StaticPodSource};
