//! Process execution configuration: output mode, retry budget and search path.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;
use crate::infrastructure::backoff::{
    RetryPolicy, DEFAULT_INITIAL_INTERVAL, DEFAULT_MAX_INTERVAL, DEFAULT_MULTIPLIER,
    DEFAULT_RANDOMIZATION_FACTOR,
};

/// Process configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Log the output of successful commands
    #[serde(default)]
    pub verbose: bool,

    /// Discard command output (ignored when verbose)
    #[serde(default)]
    pub quiet: bool,

    /// Total time budget for retried commands (e.g., "3m", "90s")
    #[serde(default = "default_timeout")]
    pub timeout: String,

    /// Tool whose binary directory is appended to PATH (e.g., "mvn")
    #[serde(default)]
    pub secondary_tool: Option<String>,

    /// Additional directories appended to PATH
    #[serde(default)]
    pub extra_path_dirs: Vec<PathBuf>,

    /// Backoff schedule
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_timeout() -> String {
    "3m".to_string()
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            quiet: false,
            timeout: default_timeout(),
            secondary_tool: None,
            extra_path_dirs: Vec::new(),
            retry: RetryConfig::default(),
        }
    }
}

impl ProcessConfig {
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        parse_duration("process.timeout", &self.timeout)
    }
}

/// Exponential backoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_initial_interval")]
    pub initial_interval: String,

    /// Jitter applied to each interval, between 0 and 1
    #[serde(default = "default_randomization_factor")]
    pub randomization_factor: f64,

    /// Growth factor between intervals, at least 1
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    #[serde(default = "default_max_interval")]
    pub max_interval: String,
}

fn default_initial_interval() -> String {
    humantime::format_duration(DEFAULT_INITIAL_INTERVAL).to_string()
}

fn default_randomization_factor() -> f64 {
    DEFAULT_RANDOMIZATION_FACTOR
}

fn default_multiplier() -> f64 {
    DEFAULT_MULTIPLIER
}

fn default_max_interval() -> String {
    humantime::format_duration(DEFAULT_MAX_INTERVAL).to_string()
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_interval: default_initial_interval(),
            randomization_factor: default_randomization_factor(),
            multiplier: default_multiplier(),
            max_interval: default_max_interval(),
        }
    }
}

impl RetryConfig {
    /// Validated backoff policy; the elapsed-time ceiling comes from `process.timeout`
    pub fn policy(&self) -> Result<RetryPolicy, ConfigError> {
        if !(0.0..=1.0).contains(&self.randomization_factor) {
            return Err(invalid(
                "process.retry.randomization_factor",
                self.randomization_factor,
            ));
        }
        if !(self.multiplier >= 1.0 && self.multiplier.is_finite()) {
            return Err(invalid("process.retry.multiplier", self.multiplier));
        }

        Ok(RetryPolicy {
            initial_interval: parse_duration(
                "process.retry.initial_interval",
                &self.initial_interval,
            )?,
            randomization_factor: self.randomization_factor,
            multiplier: self.multiplier,
            max_interval: parse_duration("process.retry.max_interval", &self.max_interval)?,
            max_elapsed_time: None,
        })
    }
}

fn parse_duration(field: &str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|_| invalid(field, value))
}

fn invalid(field: &str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_backoff_defaults() {
        let config = ProcessConfig::default();
        assert_eq!(config.timeout().unwrap(), Duration::from_secs(180));

        let policy = config.retry.policy().unwrap();
        assert_eq!(policy.initial_interval, DEFAULT_INITIAL_INTERVAL);
        assert_eq!(policy.max_interval, DEFAULT_MAX_INTERVAL);
        assert_eq!(policy.multiplier, DEFAULT_MULTIPLIER);
        assert_eq!(policy.max_elapsed_time, None);
    }

    #[test]
    fn test_invalid_duration() {
        let config = ProcessConfig {
            timeout: "soon".to_string(),
            ..ProcessConfig::default()
        };
        let err = config.timeout().unwrap_err();
        assert!(err.to_string().contains("process.timeout"));
    }

    #[test]
    fn test_invalid_multiplier_and_factor() {
        let retry = RetryConfig {
            multiplier: 0.5,
            ..RetryConfig::default()
        };
        assert!(matches!(
            retry.policy(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "process.retry.multiplier"
        ));

        let retry = RetryConfig {
            randomization_factor: 1.5,
            ..RetryConfig::default()
        };
        assert!(retry.policy().is_err());
    }
}
