//! Runtime tool path resolution
//!
//! For each tool (e.g., `helm`), we:
//! 1. Check for an environment variable `{TOOL}_BIN` (e.g., `HELM_BIN`)
//! 2. Fall back to PATH-based invocation if the envvar is not set
//!
//! Auxiliary tools that are not on PATH can also live under the chartops
//! tool home (`$CHARTOPS_HOME`, default `~/.chartops`), either directly in
//! `bin/` or in a per-tool `<tool>/bin/` directory.
//!
//! ```rust,ignore
//! use chartops::tools::get_tool_path;
//!
//! // Reads HELM_BIN, falls back to "helm"
//! let helm = get_tool_path("helm");
//! ```

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the tool home directory
pub const HOME_ENV: &str = "CHARTOPS_HOME";

/// Get the path to an external tool
///
/// Checks for an environment variable `{TOOL}_BIN` (uppercase tool name + "_BIN").
/// Falls back to the tool name itself if the envvar is not set, which relies on PATH.
pub fn get_tool_path(tool: &str) -> String {
    env::var(tool_env_var(tool)).unwrap_or_else(|_| tool.to_string())
}

/// Name of the `{TOOL}_BIN` override variable, with `-` mapped to `_`
pub fn tool_env_var(tool: &str) -> String {
    format!("{}_BIN", tool.to_uppercase().replace('-', "_"))
}

/// Root of the chartops tool installation directory
///
/// `$CHARTOPS_HOME` if set, otherwise `~/.chartops`. `None` when neither can be resolved.
pub fn tool_home() -> Option<PathBuf> {
    match env::var_os(HOME_ENV) {
        Some(home) if !home.is_empty() => Some(PathBuf::from(home)),
        _ => dirs::home_dir().map(|home| home.join(".chartops")),
    }
}

/// Directory holding binaries installed by chartops (`<tool home>/bin`)
pub fn tool_bin_dir() -> Option<PathBuf> {
    tool_home().map(|home| home.join("bin"))
}

/// Locate the binary of an auxiliary tool
///
/// Resolution order:
/// 1. `{TOOL}_BIN` environment variable, if it points at an existing file
/// 2. `<tool home>/<tool>/bin/<tool>`
/// 3. `which` lookup on the current PATH
pub fn locate_tool(tool: &str) -> Option<PathBuf> {
    if let Some(path) = env::var_os(tool_env_var(tool)).map(PathBuf::from) {
        if path.is_file() {
            return Some(path);
        }
    }

    if let Some(home) = tool_home() {
        let candidate = home.join(tool).join("bin").join(tool);
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    which::which(tool).ok()
}

/// Common tool names
pub mod tools {
    pub const HELM: &str = "helm";
}
