//! General-purpose command execution with retries

use anyhow::{Context, Result};
use chartops::HelmClient;
use tracing::info;

use crate::ui;

/// Run `program` in the chart working directory until it succeeds or the budget is spent
pub async fn execute(
    client: &HelmClient,
    program: &str,
    args: &[String],
    timeout: Option<&str>,
) -> Result<()> {
    let mut invocation = client.invocation(program, args.iter().cloned());
    if let Some(timeout) = timeout {
        let timeout = humantime::parse_duration(timeout)
            .with_context(|| format!("Invalid timeout '{}'", timeout))?;
        invocation = invocation.with_timeout(timeout);
    }

    info!(
        "Running {} with up to {} of retries",
        program,
        humantime::format_duration(invocation.timeout())
    );

    let execution = invocation.execute().await;
    if execution.attempts() > 1 {
        info!(
            "{} attempts, {} failed",
            execution.attempts(),
            execution.error_count()
        );
    }

    let output = execution
        .into_result()
        .with_context(|| format!("{} did not succeed before the retry budget ran out", program))?;
    ui::print_output(&output);
    Ok(())
}
