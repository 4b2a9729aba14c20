//! CLI command implementations

pub mod pulse;
