//! chartops - resilient helm CLI driver
//!
//! Runs external commands with exponential-backoff retries and turns the
//! helm CLI's subcommands and tabular replies into typed operations.

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod tools;

pub use config::ChartopsConfig;
pub use error::{CommandError, ConfigError, HelmError};
pub use infrastructure::{
    Execution, HelmClient, InitOptions, InstallRequest, Invocation, RetryPolicy, SearchPath,
    UpgradeRequest,
};
