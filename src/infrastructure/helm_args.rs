//! Argument vectors for helm subcommands
//!
//! `install` and `upgrade` place their flags differently: `install` takes the
//! chart right after `--name`/`--namespace`, while `upgrade` expects the
//! release and chart as the final positional arguments.

/// Flags for `helm init`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitOptions {
    pub client_only: bool,
    pub service_account: Option<String>,
    pub tiller_namespace: Option<String>,
    pub upgrade: bool,
}

impl InitOptions {
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["init".to_string()];
        if self.client_only {
            args.push("--client-only".to_string());
        }
        push_non_empty(&mut args, "--service-account", self.service_account.as_deref());
        push_non_empty(&mut args, "--tiller-namespace", self.tiller_namespace.as_deref());
        if self.upgrade {
            args.push("--upgrade".to_string());
        }
        args
    }
}

/// A chart installation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallRequest {
    pub chart: String,
    pub release_name: String,
    pub namespace: String,
    pub version: Option<String>,
    pub timeout_secs: Option<u64>,
    /// `--set` values, in order
    pub values: Vec<String>,
    /// `--values` files, in order
    pub value_files: Vec<String>,
}

impl InstallRequest {
    pub fn new(
        chart: impl Into<String>,
        release_name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            chart: chart.into(),
            release_name: release_name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "install".to_string(),
            "--name".to_string(),
            self.release_name.clone(),
            "--namespace".to_string(),
            self.namespace.clone(),
            self.chart.clone(),
        ];
        push_timeout_and_version(&mut args, self.timeout_secs, self.version.as_deref());
        push_values(&mut args, &self.values, &self.value_files);
        args
    }
}

/// A chart upgrade (optionally installing when the release is absent)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpgradeRequest {
    pub chart: String,
    pub release_name: String,
    pub namespace: String,
    pub version: Option<String>,
    pub install: bool,
    pub timeout_secs: Option<u64>,
    pub force: bool,
    pub wait: bool,
    pub values: Vec<String>,
    pub value_files: Vec<String>,
}

impl UpgradeRequest {
    pub fn new(
        chart: impl Into<String>,
        release_name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            chart: chart.into(),
            release_name: release_name.into(),
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            "upgrade".to_string(),
            "--namespace".to_string(),
            self.namespace.clone(),
        ];
        if self.install {
            args.push("--install".to_string());
        }
        if self.wait {
            args.push("--wait".to_string());
        }
        if self.force {
            args.push("--force".to_string());
        }
        push_timeout_and_version(&mut args, self.timeout_secs, self.version.as_deref());
        push_values(&mut args, &self.values, &self.value_files);
        args.push(self.release_name.clone());
        args.push(self.chart.clone());
        args
    }
}

pub fn delete_args(release_name: &str, purge: bool) -> Vec<String> {
    let mut args = vec!["delete".to_string()];
    if purge {
        args.push("--purge".to_string());
    }
    args.push(release_name.to_string());
    args
}

pub fn version_args(tls: bool) -> Vec<String> {
    let mut args = vec!["version".to_string(), "--short".to_string()];
    if tls {
        args.push("--tls".to_string());
    }
    args
}

fn push_non_empty(args: &mut Vec<String>, flag: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        args.push(flag.to_string());
        args.push(value.to_string());
    }
}

fn push_timeout_and_version(args: &mut Vec<String>, timeout_secs: Option<u64>, version: Option<&str>) {
    if let Some(timeout) = timeout_secs {
        args.push("--timeout".to_string());
        args.push(timeout.to_string());
    }
    if let Some(version) = version {
        args.push("--version".to_string());
        args.push(version.to_string());
    }
}

fn push_values(args: &mut Vec<String>, values: &[String], value_files: &[String]) {
    for value in values {
        args.push("--set".to_string());
        args.push(value.clone());
    }
    for file in value_files {
        args.push("--values".to_string());
        args.push(file.clone());
    }
}
