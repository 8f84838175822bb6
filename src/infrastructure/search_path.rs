//! Child-process search path
//!
//! Builds the `PATH` handed to spawned commands: the parent's `PATH`, then
//! the chartops tool bin directory, then the directory of an optional
//! secondary tool, then configured and per-call extra directories.
//! The value is passed to each child explicitly; the parent environment is
//! never modified.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::tools;

#[cfg(windows)]
const SEPARATOR: &str = ";";
#[cfg(not(windows))]
const SEPARATOR: &str = ":";

/// Resolver for the augmented search path
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    secondary_tool: Option<String>,
    extra_dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also append the directory containing this tool's binary, when it can be located
    pub fn with_secondary_tool(mut self, tool: impl Into<String>) -> Self {
        self.secondary_tool = Some(tool.into());
        self
    }

    /// Directories appended after the auxiliary tool locations
    pub fn with_extra_dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.extra_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    pub fn secondary_tool(&self) -> Option<&str> {
        self.secondary_tool.as_deref()
    }

    /// Current `PATH` with auxiliary and extra directories appended
    ///
    /// Directories that cannot be resolved are left out.
    pub fn augmented(&self, extra_dirs: &[&Path]) -> OsString {
        let base = env::var_os("PATH").unwrap_or_default();
        self.augment(&base, extra_dirs)
    }

    fn augment(&self, base: &OsStr, extra_dirs: &[&Path]) -> OsString {
        let mut path = base.to_os_string();

        if let Some(bin_dir) = tools::tool_bin_dir() {
            push_entry(&mut path, &bin_dir);
        }

        if let Some(tool_dir) = self.secondary_tool_dir() {
            push_entry(&mut path, &tool_dir);
        }

        for dir in &self.extra_dirs {
            push_entry(&mut path, dir);
        }
        for dir in extra_dirs {
            push_entry(&mut path, dir);
        }

        path
    }

    fn secondary_tool_dir(&self) -> Option<PathBuf> {
        let tool = self.secondary_tool.as_deref()?;
        tools::locate_tool(tool)?.parent().map(Path::to_path_buf)
    }
}

fn push_entry(path: &mut OsString, dir: &Path) {
    if dir.as_os_str().is_empty() {
        return;
    }
    if !path.is_empty() {
        path.push(SEPARATOR);
    }
    path.push(dir.as_os_str());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(path: &OsStr) -> Vec<PathBuf> {
        env::split_paths(path).collect()
    }

    #[test]
    fn test_base_path_comes_first() {
        let base = env::join_paths(["/usr/bin", "/bin"]).unwrap();
        let path = SearchPath::new().augment(&base, &[]);
        let entries = entries(&path);
        assert_eq!(entries[0], PathBuf::from("/usr/bin"));
        assert_eq!(entries[1], PathBuf::from("/bin"));
    }

    #[test]
    fn test_extra_dirs_appended_in_order() {
        let base = OsString::from("/usr/bin");
        let search_path = SearchPath::new().with_extra_dirs(["/opt/configured"]);
        let path = search_path.augment(&base, &[Path::new("/work/a"), Path::new("/work/b")]);
        let entries = entries(&path);

        let tail: Vec<&PathBuf> = entries.iter().rev().take(3).collect();
        assert_eq!(tail[2], &PathBuf::from("/opt/configured"));
        assert_eq!(tail[1], &PathBuf::from("/work/a"));
        assert_eq!(tail[0], &PathBuf::from("/work/b"));
    }

    #[test]
    fn test_empty_entries_skipped() {
        let base = OsString::from("/usr/bin");
        let path = SearchPath::new().augment(&base, &[Path::new("")]);
        assert!(!entries(&path).iter().any(|p| p.as_os_str().is_empty()));
    }

    #[test]
    fn test_secondary_tool_directory_appended() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("sidecar");
        std::fs::write(&binary, "#!/bin/sh\n").unwrap();
        env::set_var("SEARCH_PATH_SIDECAR_BIN", &binary);

        let path = SearchPath::new()
            .with_secondary_tool("search-path-sidecar")
            .augment(OsStr::new("/usr/bin"), &[]);
        env::remove_var("SEARCH_PATH_SIDECAR_BIN");

        assert!(entries(&path).contains(&dir.path().to_path_buf()));
    }

    #[test]
    fn test_unlocatable_secondary_tool_tolerated() {
        let path = SearchPath::new()
            .with_secondary_tool("chartops-no-such-sidecar")
            .augment(OsStr::new("/usr/bin"), &[Path::new("/work")]);
        let entries = entries(&path);
        assert_eq!(entries.first(), Some(&PathBuf::from("/usr/bin")));
        assert_eq!(entries.last(), Some(&PathBuf::from("/work")));
    }
}
