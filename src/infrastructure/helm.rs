//! Helm CLI client
//!
//! Wraps the helm binary: builds the argument vector for each subcommand,
//! runs it in the configured working directory and parses the tabular
//! replies into typed results. Each call gets its own [`Invocation`], so
//! concurrent calls on one client do not share attempt history.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use super::backoff::RetryPolicy;
use super::chart_files;
use super::helm_args::{self, InitOptions, InstallRequest, UpgradeRequest};
use super::helm_output;
use super::process::Invocation;
use super::search_path::SearchPath;
use crate::config::ChartopsConfig;
use crate::error::{CommandError, HelmError};
use crate::tools::{get_tool_path, tools};

/// Client for helm CLI operations
#[derive(Debug, Clone)]
pub struct HelmClient {
    binary: String,
    cwd: PathBuf,
    verbose: bool,
    quiet: bool,
    timeout: Option<Duration>,
    retry_policy: RetryPolicy,
    search_path: SearchPath,
}

impl Default for HelmClient {
    fn default() -> Self {
        Self::new(get_tool_path(tools::HELM), ".")
    }
}

impl HelmClient {
    /// Create a client for `binary` working in `cwd`
    pub fn new(binary: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            cwd: cwd.into(),
            verbose: false,
            quiet: false,
            timeout: None,
            retry_policy: RetryPolicy::default(),
            search_path: SearchPath::default(),
        }
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &ChartopsConfig) -> Result<Self, crate::error::ConfigError> {
        let mut search_path = SearchPath::new().with_extra_dirs(config.process.extra_path_dirs.clone());
        if let Some(ref tool) = config.process.secondary_tool {
            search_path = search_path.with_secondary_tool(tool.clone());
        }

        Ok(Self::new(config.helm.binary(), config.helm.working_dir.clone())
            .with_verbose(config.process.verbose)
            .with_quiet(config.process.quiet)
            .with_timeout(config.process.timeout()?)
            .with_retry_policy(config.process.retry.policy()?)
            .with_search_path(search_path))
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Total retry budget for [`HelmClient::exec`]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_search_path(mut self, search_path: SearchPath) -> Self {
        self.search_path = search_path;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn set_binary(&mut self, binary: impl Into<String>) {
        self.binary = binary.into();
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn set_cwd(&mut self, dir: impl Into<PathBuf>) {
        self.cwd = dir.into();
    }

    /// Fresh invocation of `program` sharing this client's settings
    pub fn invocation<I, S>(&self, program: &str, args: I) -> Invocation
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut invocation = Invocation::new(program)
            .with_args(args)
            .in_dir(&self.cwd)
            .with_verbose(self.verbose)
            .with_quiet(self.quiet)
            .with_retry_policy(self.retry_policy)
            .with_search_path(self.search_path.clone());
        if let Some(timeout) = self.timeout {
            invocation = invocation.with_timeout(timeout);
        }
        invocation
    }

    async fn run_helm<I, S>(&self, args: I) -> Result<(), HelmError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.run_helm_with_output(args).await?;
        Ok(())
    }

    async fn run_helm_with_output<I, S>(&self, args: I) -> Result<String, CommandError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.invocation(&self.binary, args).run_without_retry().await
    }

    /// Run an arbitrary program in the working directory, retrying with backoff
    pub async fn exec(&self, program: &str, args: &[String]) -> Result<String, CommandError> {
        self.invocation(program, args.iter().cloned()).run().await
    }

    /// `helm init`
    pub async fn init(&self, options: &InitOptions) -> Result<(), HelmError> {
        self.run_helm(options.args()).await
    }

    /// Add a helm repository with the given name and URL
    pub async fn add_repo(&self, name: &str, url: &str) -> Result<(), HelmError> {
        self.run_helm(["repo", "add", name, url]).await
    }

    pub async fn remove_repo(&self, name: &str) -> Result<(), HelmError> {
        self.run_helm(["repo", "remove", name]).await
    }

    /// Installed repositories with their URLs
    pub async fn list_repos(&self) -> Result<BTreeMap<String, String>, HelmError> {
        let output = self
            .run_helm_with_output(["repo", "list"])
            .await
            .map_err(HelmError::ListRepos)?;
        Ok(helm_output::parse_repo_list(&output))
    }

    /// Whether no installed repository is served from the host of `url`
    pub async fn is_repo_missing(&self, url: &str) -> Result<bool, HelmError> {
        let repos = self.list_repos().await?;
        repo_missing(&repos, url)
    }

    pub async fn update_repo(&self) -> Result<(), HelmError> {
        self.run_helm(["repo", "update"]).await
    }

    /// Delete `requirements.lock` from the working directory, if present
    pub async fn remove_requirements_lock(&self) -> Result<(), HelmError> {
        chart_files::remove_requirements_lock(&self.cwd).await
    }

    /// Build the chart dependencies of the working directory
    pub async fn build_dependency(&self) -> Result<(), HelmError> {
        self.run_helm(["dependency", "build"]).await
    }

    pub async fn install_chart(&self, request: &InstallRequest) -> Result<(), HelmError> {
        self.run_helm(request.args()).await
    }

    pub async fn upgrade_chart(&self, request: &UpgradeRequest) -> Result<(), HelmError> {
        self.run_helm(request.args()).await
    }

    pub async fn delete_release(&self, release_name: &str, purge: bool) -> Result<(), HelmError> {
        self.run_helm(helm_args::delete_args(release_name, purge)).await
    }

    /// Raw `helm list` output
    pub async fn list_charts(&self) -> Result<String, HelmError> {
        Ok(self.run_helm_with_output(["list"]).await?)
    }

    /// Every published version of `chart`, in helm's order
    pub async fn search_chart_versions(&self, chart: &str) -> Result<Vec<String>, HelmError> {
        let output = self
            .run_helm_with_output(["search", chart, "--versions"])
            .await
            .map_err(|source| HelmError::SearchChart {
                chart: chart.to_string(),
                source,
            })?;
        Ok(helm_output::parse_chart_versions(&output))
    }

    /// Locate the chart descriptor of the working directory
    pub async fn find_chart(&self) -> Result<PathBuf, HelmError> {
        chart_files::find_chart(&self.cwd).await
    }

    /// `helm status <release>` output
    pub async fn status_release(&self, release_name: &str) -> Result<String, HelmError> {
        Ok(self.run_helm_with_output(["status", release_name]).await?)
    }

    /// Status of every installed release, keyed by release name
    pub async fn status_releases(&self) -> Result<BTreeMap<String, String>, HelmError> {
        let output = self.list_charts().await.map_err(|err| match err {
            HelmError::Command(source) => HelmError::ListReleases(source),
            other => other,
        })?;
        Ok(helm_output::parse_release_statuses(&output))
    }

    /// Lint the chart in the working directory, returning the reported warnings
    pub async fn lint(&self) -> Result<String, HelmError> {
        Ok(self.run_helm_with_output(["lint"]).await?)
    }

    pub async fn version(&self, tls: bool) -> Result<String, HelmError> {
        Ok(self.run_helm_with_output(helm_args::version_args(tls)).await?)
    }

    /// Package the chart in the working directory
    pub async fn package_chart(&self) -> Result<(), HelmError> {
        let dir = self.cwd.to_string_lossy().into_owned();
        self.run_helm(["package".to_string(), dir]).await
    }
}

/// Literal `host[:port]` of `raw`, as written
///
/// `Url` lowercases hosts and drops default ports, so the host is sliced out
/// of the original text. URLs without a host yield "".
fn raw_host<'a>(raw: &'a str, parsed: &Url) -> &'a str {
    if !parsed.has_host() {
        return "";
    }
    let raw = raw.trim();
    let rest = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#' | '\\'))
        .unwrap_or(rest.len());
    let authority = &rest[..end];
    authority.rsplit_once('@').map_or(authority, |(_, host)| host)
}

fn repo_missing(repos: &BTreeMap<String, String>, url: &str) -> Result<bool, HelmError> {
    let searched = Url::parse(url).map_err(|source| HelmError::InvalidRepoUrl {
        url: url.to_string(),
        source,
    })?;

    let known = repos
        .iter()
        .filter(|(_, repo_url)| !repo_url.is_empty())
        .map(|(name, repo_url)| {
            let parsed = Url::parse(repo_url).map_err(|source| HelmError::InvalidStoredRepoUrl {
                name: name.clone(),
                url: repo_url.clone(),
                source,
            })?;
            Ok(raw_host(repo_url, &parsed))
        })
        .collect::<Result<Vec<&str>, HelmError>>()?;

    let host = raw_host(url, &searched);
    Ok(!known.iter().any(|known_host| *known_host == host))
}
