//! Configuration management for the CLI
//!
//! Defaults come from an optional JSON file layered with `KUBE_PULSE_*`
//! environment variables. Command-line flags always win.

use anyhow::{Context, Result};
use pulse_lib::{PulseRequest, DEFAULT_POD_AMOUNT, DEFAULT_WINDOW_MINUTES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Prefix of environment variables that override the config file
const ENV_PREFIX: &str = "KUBE_PULSE";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Default namespace
    pub namespace: Option<String>,
    /// Default recent-restart window in minutes
    pub minutes: Option<u32>,
    /// Default number of top offenders
    pub pod_amount: Option<usize>,
    /// Default output format
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Load configuration from `path`, or from the default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        Self::load_from(&path, config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load configuration from `path`, overlaid with `environment`
    pub fn load_from(path: &Path, environment: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Json)
                    .required(false),
            )
            .add_source(environment.try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Get the configuration file path
    fn config_path() -> Result<PathBuf> {
        let home = dirs_next::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".config").join("kube-pulse").join("config.json"))
    }

    /// Combine command-line values with the configured defaults
    pub fn pulse_request(
        &self,
        namespace: Option<String>,
        minutes: Option<u32>,
        pod_amount: Option<usize>,
    ) -> PulseRequest {
        PulseRequest {
            window_minutes: minutes.or(self.minutes).unwrap_or(DEFAULT_WINDOW_MINUTES),
            pod_amount: pod_amount.or(self.pod_amount).unwrap_or(DEFAULT_POD_AMOUNT),
            namespace: namespace
                .or_else(|| self.namespace.clone())
                .filter(|ns| !ns.is_empty()),
        }
    }

    pub fn output_format(&self, flag: Option<OutputFormat>) -> OutputFormat {
        flag.or(self.format).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Environment layer fed from `vars` instead of the process environment
    fn env_from(vars: &[(&str, &str)]) -> config::Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json"), env_from(&[])).unwrap();

        let request = config.pulse_request(None, None, None);
        assert_eq!(request, PulseRequest::default());
        assert_eq!(config.output_format(None), OutputFormat::Text);
    }

    #[test]
    fn test_file_values_are_used() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"{"namespace": "kube-system", "minutes": 30, "pod_amount": 10, "format": "json"}"#,
        );

        let config = Config::load_from(&path, env_from(&[])).unwrap();
        let request = config.pulse_request(None, None, None);

        assert_eq!(request.namespace.as_deref(), Some("kube-system"));
        assert_eq!(request.window_minutes, 30);
        assert_eq!(request.pod_amount, 10);
        assert_eq!(config.output_format(None), OutputFormat::Json);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"namespace": "kube-system", "minutes": 30, "pod_amount": 10}"#);

        let config = Config::load_from(
            &path,
            env_from(&[("KUBE_PULSE_MINUTES", "45"), ("KUBE_PULSE_POD_AMOUNT", "7")]),
        )
        .unwrap();
        let request = config.pulse_request(None, None, None);

        assert_eq!(request.window_minutes, 45);
        assert_eq!(request.pod_amount, 7);
        assert_eq!(request.namespace.as_deref(), Some("kube-system"));
    }

    #[test]
    fn test_flags_override_env_and_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, r#"{"minutes": 30, "pod_amount": 10}"#);

        let config = Config::load_from(
            &path,
            env_from(&[
                ("KUBE_PULSE_MINUTES", "45"),
                ("KUBE_PULSE_POD_AMOUNT", "7"),
                ("KUBE_PULSE_NAMESPACE", "monitoring"),
            ]),
        )
        .unwrap();
        let request = config.pulse_request(Some("default".to_string()), Some(5), None);

        assert_eq!(request.namespace.as_deref(), Some("default"));
        assert_eq!(request.window_minutes, 5);
        assert_eq!(request.pod_amount, 7);
    }

    #[test]
    fn test_unrelated_env_vars_are_ignored() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(
            &dir.path().join("absent.json"),
            env_from(&[("OTHER_MINUTES", "99")]),
        )
        .unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_flags_override_file() {
        let config = Config {
            namespace: Some("kube-system".to_string()),
            minutes: Some(30),
            pod_amount: Some(10),
            format: Some(OutputFormat::Json),
        };

        let request = config.pulse_request(Some("default".to_string()), Some(5), Some(1));
        assert_eq!(request.namespace.as_deref(), Some("default"));
        assert_eq!(request.window_minutes, 5);
        assert_eq!(request.pod_amount, 1);
        assert_eq!(config.output_format(Some(OutputFormat::Text)), OutputFormat::Text);
    }

    #[test]
    fn test_empty_namespace_means_all() {
        let config = Config::default();
        let request = config.pulse_request(Some(String::new()), None, None);

        assert!(request.namespace.is_none());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "{ not json");

        assert!(Config::load_from(&path, env_from(&[])).is_err());
    }
}
