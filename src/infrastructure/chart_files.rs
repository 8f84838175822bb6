//! Chart files inside a working directory
//!
//! Locates the `Chart.yaml` descriptor of the chart being worked on and
//! manages the `requirements.lock` dependency lock file next to it.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::HelmError;

pub const CHART_FILE: &str = "Chart.yaml";
pub const REQUIREMENTS_LOCK: &str = "requirements.lock";
const PREVIEW_DIR: &str = "preview";

/// Find the chart descriptor for `dir`
///
/// Resolution order:
/// 1. `<dir>/Chart.yaml`
/// 2. first match of `<dir>/*/Chart.yaml`
/// 3. first match of `<dir>/*/*/Chart.yaml` not inside a `preview` directory
pub async fn find_chart(dir: &Path) -> Result<PathBuf, HelmError> {
    let chart_file = dir.join(CHART_FILE);
    if file_exists(&chart_file).await? {
        return Ok(chart_file);
    }

    if let Some(found) = glob_first(dir, &["*"], |_| true)? {
        return Ok(found);
    }

    if let Some(found) = glob_first(dir, &["*", "*"], |path| !is_preview_chart(path))? {
        return Ok(found);
    }

    Err(HelmError::ChartNotFound {
        dir: dir.to_path_buf(),
    })
}

/// Delete `<dir>/requirements.lock`; a missing file is not an error
pub async fn remove_requirements_lock(dir: &Path) -> Result<(), HelmError> {
    let path = dir.join(REQUIREMENTS_LOCK);
    if !file_exists(&path).await? {
        return Ok(());
    }

    debug!("Removing {}", path.display());
    tokio::fs::remove_file(&path)
        .await
        .map_err(|source| HelmError::RemoveFile { path, source })
}

async fn file_exists(path: &Path) -> Result<bool, HelmError> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|source| HelmError::FileCheck {
            path: path.to_path_buf(),
            source,
        })
}

fn is_preview_chart(path: &Path) -> bool {
    path.ends_with(Path::new(PREVIEW_DIR).join(CHART_FILE))
}

/// First path, in lexicographic order, matching `<dir>/<levels...>/Chart.yaml` and `accept`
fn glob_first(
    dir: &Path,
    levels: &[&str],
    accept: impl Fn(&Path) -> bool,
) -> Result<Option<PathBuf>, HelmError> {
    let mut pattern = glob::Pattern::escape(&dir.to_string_lossy());
    for level in levels {
        if !pattern.is_empty() && !pattern.ends_with(std::path::MAIN_SEPARATOR) {
            pattern.push(std::path::MAIN_SEPARATOR);
        }
        pattern.push_str(level);
    }
    pattern.push(std::path::MAIN_SEPARATOR);
    pattern.push_str(CHART_FILE);

    let matches = glob::glob(&pattern).map_err(|source| HelmError::Glob {
        pattern: pattern.clone(),
        source,
    })?;

    // Unreadable entries are skipped
    Ok(matches.filter_map(Result::ok).find(|path| accept(path.as_path())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "name: test\n").unwrap();
        path
    }

    #[tokio::test]
    async fn test_prefers_chart_in_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let root_chart = touch(dir.path(), "Chart.yaml");
        touch(dir.path(), "nested/Chart.yaml");

        assert_eq!(find_chart(dir.path()).await.unwrap(), root_chart);
    }

    #[tokio::test]
    async fn test_single_level_takes_first_match() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "beta/Chart.yaml");
        let alpha = touch(dir.path(), "alpha/Chart.yaml");
        touch(dir.path(), "aaa/deep/Chart.yaml");

        assert_eq!(find_chart(dir.path()).await.unwrap(), alpha);
    }

    #[tokio::test]
    async fn test_two_level_skips_preview() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "charts/preview/Chart.yaml");
        let app = touch(dir.path(), "charts/webapp/Chart.yaml");

        assert_eq!(find_chart(dir.path()).await.unwrap(), app);
    }

    #[tokio::test]
    async fn test_only_preview_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "charts/preview/Chart.yaml");

        let err = find_chart(dir.path()).await.unwrap_err();
        assert!(matches!(err, HelmError::ChartNotFound { .. }));
    }

    #[tokio::test]
    async fn test_empty_dir_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_chart(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("no Chart.yaml file found"));
    }

    #[tokio::test]
    async fn test_remove_requirements_lock() {
        let dir = tempfile::tempdir().unwrap();
        let lock = touch(dir.path(), REQUIREMENTS_LOCK);

        remove_requirements_lock(dir.path()).await.unwrap();
        assert!(!lock.exists());

        // Second removal finds nothing to do
        remove_requirements_lock(dir.path()).await.unwrap();
    }

    #[test]
    fn test_is_preview_chart() {
        assert!(is_preview_chart(Path::new("charts/preview/Chart.yaml")));
        assert!(!is_preview_chart(Path::new("charts/mypreview/Chart.yaml")));
        assert!(!is_preview_chart(Path::new("preview/other/Chart.yaml")));
    }
}
