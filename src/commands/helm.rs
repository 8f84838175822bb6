//! Helm chart and release commands
//!
//! Thin wrappers over [`HelmClient`] that report results on the terminal.

use anyhow::{Context, Result};
use chartops::{HelmClient, InitOptions, InstallRequest, UpgradeRequest};
use tracing::info;

use crate::ui;

pub async fn init(client: &HelmClient, options: InitOptions) -> Result<()> {
    client.init(&options).await.context("helm init failed")?;
    ui::print_success("helm initialized");
    Ok(())
}

pub async fn build_dependency(client: &HelmClient) -> Result<()> {
    info!("Building dependencies in {}", client.cwd().display());
    client
        .build_dependency()
        .await
        .context("Failed to build chart dependencies")?;
    ui::print_success("Dependencies built");
    Ok(())
}

pub async fn remove_requirements_lock(client: &HelmClient) -> Result<()> {
    client.remove_requirements_lock().await?;
    ui::print_success("requirements.lock removed");
    Ok(())
}

pub async fn install(client: &HelmClient, request: InstallRequest) -> Result<()> {
    info!(
        "Installing {} as {} in namespace {}",
        request.chart, request.release_name, request.namespace
    );
    client
        .install_chart(&request)
        .await
        .with_context(|| format!("Failed to install release '{}'", request.release_name))?;
    ui::print_success(&format!("Installed {}", request.release_name));
    Ok(())
}

pub async fn upgrade(client: &HelmClient, request: UpgradeRequest) -> Result<()> {
    info!(
        "Upgrading {} to {} in namespace {}",
        request.release_name, request.chart, request.namespace
    );
    client
        .upgrade_chart(&request)
        .await
        .with_context(|| format!("Failed to upgrade release '{}'", request.release_name))?;
    ui::print_success(&format!("Upgraded {}", request.release_name));
    Ok(())
}

pub async fn delete(client: &HelmClient, release_name: &str, purge: bool) -> Result<()> {
    client
        .delete_release(release_name, purge)
        .await
        .with_context(|| format!("Failed to delete release '{}'", release_name))?;
    ui::print_success(&format!("Deleted {}", release_name));
    Ok(())
}

pub async fn list(client: &HelmClient) -> Result<()> {
    let output = client.list_charts().await?;
    ui::print_output(&output);
    Ok(())
}

pub async fn search(client: &HelmClient, chart: &str, json: bool) -> Result<()> {
    let versions = client.search_chart_versions(chart).await?;
    if json {
        ui::print_json(&versions)?;
    } else {
        ui::print_list(&versions);
    }
    Ok(())
}

pub async fn find_chart(client: &HelmClient, json: bool) -> Result<()> {
    let chart = client.find_chart().await?;
    if json {
        ui::print_json(&serde_json::json!({ "chart": chart }))?;
    } else {
        println!("{}", chart.display());
    }
    Ok(())
}

pub async fn status(client: &HelmClient, release_name: Option<&str>, json: bool) -> Result<()> {
    match release_name {
        Some(name) => {
            let output = client
                .status_release(name)
                .await
                .with_context(|| format!("Failed to get status of release '{}'", name))?;
            ui::print_output(&output);
        }
        None => {
            let statuses = client.status_releases().await?;
            if json {
                ui::print_json(&statuses)?;
            } else {
                ui::print_map(("RELEASE", "STATUS"), &statuses);
            }
        }
    }
    Ok(())
}

pub async fn lint(client: &HelmClient) -> Result<()> {
    let output = client.lint().await.context("helm lint failed")?;
    ui::print_output(&output);
    if output.contains("[WARNING]") {
        ui::print_warning("Lint passed with warnings");
    } else {
        ui::print_success("Lint passed");
    }
    Ok(())
}

pub async fn version(client: &HelmClient, tls: bool) -> Result<()> {
    let output = client.version(tls).await?;
    ui::print_output(&output);
    Ok(())
}

pub async fn package(client: &HelmClient) -> Result<()> {
    client
        .package_chart()
        .await
        .with_context(|| format!("Failed to package {}", client.cwd().display()))?;
    ui::print_success("Chart packaged");
    Ok(())
}
