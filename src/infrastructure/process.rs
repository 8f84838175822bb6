//! External process invocation
//!
//! An [`Invocation`] describes one external command: program, arguments,
//! working directory, output mode and retry policy. Running it captures the
//! merged stdout/stderr stream as trimmed text. Every run hands back its own
//! [`Execution`], so the same invocation can be run any number of times.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info};

use super::backoff::{self, RetryPolicy};
use super::execution::Execution;
use super::search_path::SearchPath;
use crate::error::CommandError;

/// Total retry budget used when no timeout is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3 * 60);

/// A configured, repeatable external-process call
#[derive(Debug, Clone)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    dir: Option<PathBuf>,
    verbose: bool,
    quiet: bool,
    timeout: Option<Duration>,
    retry_policy: RetryPolicy,
    search_path: SearchPath,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            dir: None,
            verbose: false,
            quiet: false,
            timeout: None,
            retry_policy: RetryPolicy::default(),
            search_path: SearchPath::default(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Run in `dir`; an empty path means the current directory
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        self.dir = if dir.as_os_str().is_empty() {
            None
        } else {
            Some(dir)
        };
        self
    }

    /// Log the raw output of successful runs
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Discard the output instead of capturing it
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Total time budget for [`Invocation::run`]
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

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Quiet applies only when verbose is off
    pub fn is_quiet(&self) -> bool {
        !self.verbose && self.quiet
    }

    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Run with retries and return the output of the first successful attempt
    pub async fn run(&self) -> Result<String, CommandError> {
        self.execute().await.into_result()
    }

    /// Run exactly once
    pub async fn run_without_retry(&self) -> Result<String, CommandError> {
        self.execute_without_retry().await.into_result()
    }

    /// Run with exponential backoff until success or the timeout elapses
    pub async fn execute(&self) -> Execution<String, CommandError> {
        let policy = self.retry_policy.with_max_elapsed_time(Some(self.timeout()));
        let mut schedule = policy.backoff();
        backoff::retry(&mut schedule, || self.attempt()).await
    }

    /// Run once, recording the single attempt
    pub async fn execute_without_retry(&self) -> Execution<String, CommandError> {
        Execution::single(self.attempt().await)
    }

    async fn attempt(&self) -> Result<String, CommandError> {
        debug!(
            "Running: {} {} (dir: {})",
            self.program,
            self.args.join(" "),
            self.dir_display()
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .env("PATH", self.search_path.augmented(&self.path_extras()))
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(ref dir) = self.dir {
            cmd.current_dir(dir);
        }

        let (status, raw) = if self.is_quiet() {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
            let status = cmd.status().await.map_err(|e| self.launch_error(e))?;
            (status, String::new())
        } else {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
            let mut child = cmd.spawn().map_err(|e| self.launch_error(e))?;
            let merged = match (child.stdout.take(), child.stderr.take()) {
                (Some(stdout), Some(stderr)) => read_merged(stdout, stderr).await,
                _ => Ok(Vec::new()),
            }
            .map_err(|e| self.io_error(e))?;
            let status = child.wait().await.map_err(|e| self.io_error(e))?;
            (status, String::from_utf8_lossy(&merged).into_owned())
        };

        let text = raw.trim().to_string();
        if !status.success() {
            return Err(CommandError::Failed {
                program: self.program.clone(),
                args: self.args.clone(),
                dir: self.dir_display(),
                status: status.to_string(),
                output: text,
            });
        }

        if self.is_verbose() {
            info!("{}", raw);
        }
        Ok(text)
    }

    fn path_extras(&self) -> Vec<&Path> {
        self.dir.iter().map(PathBuf::as_path).collect()
    }

    fn dir_display(&self) -> String {
        self.dir
            .as_ref()
            .map(|d| d.display().to_string())
            .unwrap_or_default()
    }

    fn launch_error(&self, source: std::io::Error) -> CommandError {
        CommandError::Launch {
            program: self.program.clone(),
            args: self.args.clone(),
            dir: self.dir_display(),
            source,
        }
    }

    /// Reading or waiting on a child that did start
    fn io_error(&self, source: std::io::Error) -> CommandError {
        CommandError::Io {
            program: self.program.clone(),
            args: self.args.clone(),
            dir: self.dir_display(),
            source,
        }
    }
}

/// Read two streams to completion into one buffer, in arrival order
async fn read_merged<A, B>(mut first: A, mut second: B) -> std::io::Result<Vec<u8>>
where
    A: AsyncRead + Unpin,
    B: AsyncRead + Unpin,
{
    let mut merged = Vec::new();
    let mut first_buf = [0u8; 8192];
    let mut second_buf = [0u8; 8192];
    let mut first_open = true;
    let mut second_open = true;

    while first_open || second_open {
        tokio::select! {
            read = first.read(&mut first_buf), if first_open => {
                match read? {
                    0 => first_open = false,
                    n => merged.extend_from_slice(&first_buf[..n]),
                }
            }
            read = second.read(&mut second_buf), if second_open => {
                match read? {
                    0 => second_open = false,
                    n => merged.extend_from_slice(&second_buf[..n]),
                }
            }
        }
    }

    Ok(merged)
}
