//! Centralized error types for chartops
//!
//! Uses thiserror for typed errors that can be matched on,
//! while still being compatible with anyhow for propagation.

use std::path::PathBuf;
use thiserror::Error;

/// External process errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error(
        "failed to launch '{program} {}' command in directory '{dir}'",
        .args.join(" ")
    )]
    Launch {
        program: String,
        args: Vec<String>,
        dir: String,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "failed to collect the output of '{program} {}' command in directory '{dir}'",
        .args.join(" ")
    )]
    Io {
        program: String,
        args: Vec<String>,
        dir: String,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "failed to run '{program} {}' command in directory '{dir}' ({status}), output: '{output}'",
        .args.join(" ")
    )]
    Failed {
        program: String,
        args: Vec<String>,
        dir: String,
        status: String,
        output: String,
    },
}

impl CommandError {
    /// Captured (trimmed) output of the failed attempt, empty when none was collected
    pub fn output(&self) -> &str {
        match self {
            CommandError::Launch { .. } | CommandError::Io { .. } => "",
            CommandError::Failed { output, .. } => output,
        }
    }

    pub fn program(&self) -> &str {
        match self {
            CommandError::Launch { program, .. }
            | CommandError::Io { program, .. }
            | CommandError::Failed { program, .. } => program,
        }
    }
}

/// Helm client errors
#[derive(Error, Debug)]
pub enum HelmError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("failed to list repositories")]
    ListRepos(#[source] CommandError),

    #[error("failed to search chart '{chart}'")]
    SearchChart {
        chart: String,
        #[source]
        source: CommandError,
    },

    #[error("failed to list the installed chart releases")]
    ListReleases(#[source] CommandError),

    #[error("provided repo URL '{url}' is invalid")]
    InvalidRepoUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to parse the URL '{url}' of repository '{name}'")]
    InvalidStoredRepoUrl {
        name: String,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to check whether {path} exists")]
    FileCheck {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove {path}")]
    RemoveFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid glob pattern '{pattern}'")]
    Glob {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("no Chart.yaml file found in directory '{dir}'")]
    ChartNotFound { dir: PathBuf },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse config: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}
