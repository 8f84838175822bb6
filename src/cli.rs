//! CLI definitions for chartops
//!
//! This module contains all CLI argument parsing structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "chartops",
    version,
    about = "Resilient helm CLI driver",
    long_about = "Runs helm subcommands in a chart working directory and turns their\ntabular output into structured results."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: ./chartops.yaml when present)
    #[arg(long, global = true, env = "CHARTOPS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Helm binary (overrides config and HELM_BIN)
    #[arg(long, global = true)]
    pub binary: Option<String>,

    /// Chart working directory (overrides config)
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable verbose logging and echo command output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Discard command output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print structured results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize helm (and optionally tiller)
    Init {
        /// Only set up the local client
        #[arg(long)]
        client_only: bool,

        /// Service account used by tiller
        #[arg(long)]
        service_account: Option<String>,

        /// Namespace tiller runs in
        #[arg(long)]
        tiller_namespace: Option<String>,

        /// Upgrade an existing tiller installation
        #[arg(long)]
        upgrade: bool,
    },

    /// Chart repository operations
    Repo {
        #[command(subcommand)]
        command: RepoCommands,
    },

    /// Chart dependency operations
    Dependency {
        #[command(subcommand)]
        command: DependencyCommands,
    },

    /// Install a chart as a new release
    Install {
        /// Chart reference (repo/name, path or URL)
        chart: String,

        /// Release name
        #[arg(long = "name", required = true)]
        release_name: String,

        /// Kubernetes namespace
        #[arg(long, required = true)]
        namespace: String,

        /// Chart version
        #[arg(long)]
        version: Option<String>,

        /// Timeout in seconds for Kubernetes operations
        #[arg(long)]
        timeout: Option<u64>,

        /// Set individual values (key=value), repeatable
        #[arg(long = "set")]
        values: Vec<String>,

        /// Values files, repeatable
        #[arg(long = "values")]
        value_files: Vec<String>,
    },

    /// Upgrade a release to a new chart version
    Upgrade {
        /// Release name
        release_name: String,

        /// Chart reference (repo/name, path or URL)
        chart: String,

        /// Kubernetes namespace
        #[arg(long, required = true)]
        namespace: String,

        /// Chart version
        #[arg(long)]
        version: Option<String>,

        /// Install the release if it does not exist
        #[arg(long)]
        install: bool,

        /// Wait until all resources are ready
        #[arg(long)]
        wait: bool,

        /// Force resource updates through replacement
        #[arg(long)]
        force: bool,

        /// Timeout in seconds for Kubernetes operations
        #[arg(long)]
        timeout: Option<u64>,

        /// Set individual values (key=value), repeatable
        #[arg(long = "set")]
        values: Vec<String>,

        /// Values files, repeatable
        #[arg(long = "values")]
        value_files: Vec<String>,
    },

    /// Delete a release
    Delete {
        /// Release name
        release_name: String,

        /// Remove the release from the store entirely
        #[arg(long)]
        purge: bool,
    },

    /// Print the raw release listing
    List,

    /// List every version of a chart
    Search {
        /// Chart name (e.g., stable/nginx)
        chart: String,
    },

    /// Locate the Chart.yaml of the working directory
    FindChart,

    /// Show release status (all releases when no name is given)
    Status {
        /// Release name
        release_name: Option<String>,
    },

    /// Lint the chart in the working directory
    Lint,

    /// Print the helm version
    Version {
        /// Use TLS to reach tiller
        #[arg(long)]
        tls: bool,
    },

    /// Package the chart in the working directory
    Package,

    /// Run any program in the working directory, retrying with exponential backoff
    Exec {
        /// Total retry budget (e.g., 30s, 3m)
        #[arg(long)]
        timeout: Option<String>,

        /// Program to run
        program: String,

        /// Program arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

/// Repository subcommands
#[derive(Subcommand)]
pub enum RepoCommands {
    /// Add a chart repository
    Add {
        /// Repository name
        name: String,

        /// Repository URL
        url: String,
    },

    /// Remove a chart repository
    Remove {
        /// Repository name
        name: String,
    },

    /// List repositories and their URLs
    List,

    /// Refresh repository indexes
    Update,

    /// Report whether no repository is served from the host of URL
    Missing {
        /// Repository URL
        url: String,
    },
}

/// Dependency subcommands
#[derive(Subcommand)]
pub enum DependencyCommands {
    /// Build the chart dependencies
    Build,

    /// Delete requirements.lock from the working directory
    RemoveLock,
}
