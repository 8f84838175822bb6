use anyhow::{Context, Result};
use chartops::{ChartopsConfig, HelmClient, InitOptions, InstallRequest, UpgradeRequest};
use clap::Parser;

mod cli;
mod commands;
mod ui;

use cli::{Cli, Commands, DependencyCommands};
use commands::{exec, helm, repo};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging with LOGGING env var support
    // LOGGING=debug,info,warn,error or just LOGGING=debug
    let log_level = std::env::var("LOGGING")
        .or_else(|_| std::env::var("LOG_LEVEL"))
        .unwrap_or_else(|_| {
            if cli.verbose {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false) // Disable ANSI escape codes for cleaner output
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli).await {
        ui::print_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

/// Build the helm client: CLI flags override the config file
fn build_client(cli: &Cli) -> Result<HelmClient> {
    let mut config = ChartopsConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(ref binary) = cli.binary {
        config.helm.binary = Some(binary.clone());
    }
    if let Some(ref cwd) = cli.cwd {
        config.helm.working_dir = cwd.clone();
    }
    if cli.verbose {
        config.process.verbose = true;
    }
    if cli.quiet {
        config.process.quiet = true;
    }

    Ok(HelmClient::from_config(&config)?)
}

async fn run(cli: Cli) -> Result<()> {
    let client = build_client(&cli)?;
    let json = cli.json;

    match cli.command {
        Commands::Init {
            client_only,
            service_account,
            tiller_namespace,
            upgrade,
        } => {
            let options = InitOptions {
                client_only,
                service_account,
                tiller_namespace,
                upgrade,
            };
            helm::init(&client, options).await?;
        }
        Commands::Repo { command } => {
            repo::execute(&client, command, json).await?;
        }
        Commands::Dependency { command } => match command {
            DependencyCommands::Build => helm::build_dependency(&client).await?,
            DependencyCommands::RemoveLock => helm::remove_requirements_lock(&client).await?,
        },
        Commands::Install {
            chart,
            release_name,
            namespace,
            version,
            timeout,
            values,
            value_files,
        } => {
            let request = InstallRequest {
                version,
                timeout_secs: timeout,
                values,
                value_files,
                ..InstallRequest::new(chart, release_name, namespace)
            };
            helm::install(&client, request).await?;
        }
        Commands::Upgrade {
            release_name,
            chart,
            namespace,
            version,
            install,
            wait,
            force,
            timeout,
            values,
            value_files,
        } => {
            let request = UpgradeRequest {
                version,
                install,
                timeout_secs: timeout,
                force,
                wait,
                values,
                value_files,
                ..UpgradeRequest::new(chart, release_name, namespace)
            };
            helm::upgrade(&client, request).await?;
        }
        Commands::Delete {
            release_name,
            purge,
        } => {
            helm::delete(&client, &release_name, purge).await?;
        }
        Commands::List => {
            helm::list(&client).await?;
        }
        Commands::Search { chart } => {
            helm::search(&client, &chart, json).await?;
        }
        Commands::FindChart => {
            helm::find_chart(&client, json).await?;
        }
        Commands::Status { release_name } => {
            helm::status(&client, release_name.as_deref(), json).await?;
        }
        Commands::Lint => {
            helm::lint(&client).await?;
        }
        Commands::Version { tls } => {
            helm::version(&client, tls).await?;
        }
        Commands::Package => {
            helm::package(&client).await?;
        }
        Commands::Exec {
            timeout,
            program,
            args,
        } => {
            exec::execute(&client, &program, &args, timeout.as_deref()).await?;
        }
    }

    Ok(())
}
