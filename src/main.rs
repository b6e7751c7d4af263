//! Prepdesk CLI entry point.

use anyhow::Result;
use clap::Parser;
use prepdesk::cli::{commands, Cli, Commands};
use prepdesk::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stdout is reserved for command output and MCP JSON-RPC
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("prepdesk={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config_path = cli.config.as_ref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    std::fs::create_dir_all(settings.data_dir())?;

    match &cli.command {
        Commands::Init => {
            commands::run_init(settings).await?;
        }

        Commands::Questions {
            level,
            technologies,
            count,
        } => {
            commands::run_questions(level.as_deref(), technologies, *count, settings).await?;
        }

        Commands::Answer { id } => {
            commands::run_answer(id, settings).await?;
        }

        Commands::Feedback {
            id,
            rating,
            message,
        } => {
            commands::run_feedback(id, *rating, message.clone(), settings).await?;
        }

        Commands::Profile { level, limit } => {
            commands::run_profile(level.as_deref(), *limit, settings).await?;
        }

        Commands::Training { limit } => {
            commands::run_training(*limit, settings).await?;
        }

        Commands::Import { file } => {
            commands::run_import(file, settings).await?;
        }

        Commands::Price { currency } => {
            commands::run_price(currency, settings).await?;
        }

        Commands::Review { file, language } => {
            commands::run_review(file, language.clone())?;
        }

        Commands::Agent { task, kind, model } => {
            commands::run_agent(task, *kind, model.clone(), settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host, *port, settings).await?;
        }

        Commands::Mcp => {
            commands::run_mcp(settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, config_path)?;
        }
    }

    Ok(())
}
