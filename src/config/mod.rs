//! # chartops Configuration
//!
//! Loaded from `chartops.yaml` in the current directory, or from the file
//! given with `--config`. Every section is optional:
//!
//! ```yaml
//! helm:
//!   binary: /usr/local/bin/helm   # default: $HELM_BIN, else "helm"
//!   working_dir: charts/webapp     # default: "."
//! process:
//!   verbose: false
//!   quiet: false
//!   timeout: 3m
//!   secondary_tool: mvn
//!   extra_path_dirs: [/opt/tools/bin]
//!   retry:
//!     initial_interval: 500ms
//!     randomization_factor: 0.5
//!     multiplier: 1.5
//!     max_interval: 1m
//! ```

mod process;

pub use process::{ProcessConfig, RetryConfig};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::tools::{get_tool_path, tools};

/// Default configuration file name, looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "chartops.yaml";

/// Complete chartops configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ChartopsConfig {
    /// Helm binary and working directory
    #[serde(default)]
    pub helm: HelmConfig,

    /// Process execution settings
    #[serde(default)]
    pub process: ProcessConfig,
}

/// Helm configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelmConfig {
    /// Helm binary; falls back to the HELM_BIN env var, then "helm"
    #[serde(default)]
    pub binary: Option<String>,

    /// Directory holding the chart to operate on
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for HelmConfig {
    fn default() -> Self {
        Self {
            binary: None,
            working_dir: default_working_dir(),
        }
    }
}

impl HelmConfig {
    /// Configured binary, else the HELM_BIN env var, else "helm"
    pub fn binary(&self) -> String {
        self.binary
            .clone()
            .unwrap_or_else(|| get_tool_path(tools::HELM))
    }
}

impl ChartopsConfig {
    /// Load configuration
    ///
    /// An explicit `path` must exist. Without one, `chartops.yaml` in the current
    /// directory is used when present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        Self::from_yaml(&content).map_err(|err| match err {
            ConfigError::ParseError { message } => ConfigError::ParseError {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Parse configuration from YAML text, validating durations and backoff factors
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.process.timeout()?;
        config.process.retry.policy()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = ChartopsConfig::from_yaml("{}").unwrap();
        assert_eq!(config.helm.working_dir, PathBuf::from("."));
        assert!(config.helm.binary.is_none());
        assert!(!config.process.verbose);
        assert_eq!(config.process.timeout().unwrap(), Duration::from_secs(180));
    }

    #[test]
    fn test_full_yaml() {
        let config = ChartopsConfig::from_yaml(
            r#"
helm:
  binary: /opt/helm/bin/helm
  working_dir: charts/webapp
process:
  verbose: true
  timeout: 90s
  secondary_tool: mvn
  extra_path_dirs: [/opt/tools/bin]
  retry:
    initial_interval: 100ms
    multiplier: 2.0
"#,
        )
        .unwrap();

        assert_eq!(config.helm.binary(), "/opt/helm/bin/helm");
        assert_eq!(config.helm.working_dir, PathBuf::from("charts/webapp"));
        assert!(config.process.verbose);
        assert_eq!(config.process.timeout().unwrap(), Duration::from_secs(90));
        assert_eq!(config.process.secondary_tool.as_deref(), Some("mvn"));
        assert_eq!(config.process.extra_path_dirs, vec![PathBuf::from("/opt/tools/bin")]);

        let policy = config.process.retry.policy().unwrap();
        assert_eq!(policy.initial_interval, Duration::from_millis(100));
        assert_eq!(policy.multiplier, 2.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ChartopsConfig::from_yaml("process:\n  timeout: whenever\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));

        let err = ChartopsConfig::from_yaml("process: [1, 2]").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_explicit_missing_file() {
        let err = ChartopsConfig::load(Some(Path::new("/nonexistent/chartops.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chartops.yaml");
        std::fs::write(&path, "helm:\n  working_dir: /srv/charts\n").unwrap();

        let config = ChartopsConfig::load(Some(&path)).unwrap();
        assert_eq!(config.helm.working_dir, PathBuf::from("/srv/charts"));
    }
}
