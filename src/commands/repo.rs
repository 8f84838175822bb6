//! Chart repository commands

use anyhow::{Context, Result};
use chartops::HelmClient;
use tracing::info;

use crate::cli::RepoCommands;
use crate::ui;

pub async fn execute(client: &HelmClient, command: RepoCommands, json: bool) -> Result<()> {
    match command {
        RepoCommands::Add { name, url } => {
            info!("Adding repository {} ({})", name, url);
            client
                .add_repo(&name, &url)
                .await
                .with_context(|| format!("Failed to add repository '{}'", name))?;
            ui::print_success(&format!("Added repository {}", name));
        }
        RepoCommands::Remove { name } => {
            client
                .remove_repo(&name)
                .await
                .with_context(|| format!("Failed to remove repository '{}'", name))?;
            ui::print_success(&format!("Removed repository {}", name));
        }
        RepoCommands::List => {
            let repos = client.list_repos().await?;
            if json {
                ui::print_json(&repos)?;
            } else {
                ui::print_map(("NAME", "URL"), &repos);
            }
        }
        RepoCommands::Update => {
            client
                .update_repo()
                .await
                .context("Failed to update repositories")?;
            ui::print_success("Repositories updated");
        }
        RepoCommands::Missing { url } => {
            let missing = client.is_repo_missing(&url).await?;
            if json {
                ui::print_json(&serde_json::json!({ "url": url, "missing": missing }))?;
            } else if missing {
                ui::print_warning(&format!("No repository serves {}", url));
            } else {
                ui::print_info(&format!("A repository already serves {}", url));
            }
        }
    }

    Ok(())
}
