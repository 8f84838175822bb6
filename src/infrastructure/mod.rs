//! Infrastructure layer - external I/O adapters
//!
//! This module contains all code that interacts with external systems:
//! - Process execution with exponential-backoff retries
//! - Child-process search path construction
//! - The helm CLI and its tabular output
//! - Chart files in the working directory

pub mod backoff;
pub mod chart_files;
pub mod execution;
pub mod helm;
pub mod helm_args;
pub mod helm_output;
pub mod process;
pub mod search_path;

// Re-export commonly used types
pub use backoff::{ExponentialBackoff, RetryPolicy};
pub use execution::Execution;
pub use helm::HelmClient;
pub use helm_args::{InitOptions, InstallRequest, UpgradeRequest};
pub use process::Invocation;
pub use search_path::SearchPath;
