use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;

use cli::Cli;
use config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    run(cli, settings).await
}

async fn run(cli: Cli, settings: Settings) -> Result<()> {
    let database_url = cli
        .database_url
        .unwrap_or_else(|| settings.database.url.clone());

    let db = taskboard_db::Database::with_max_connections(
        &database_url,
        settings.database.max_connections,
    )
    .await
    .with_context(|| format!("Failed to open database {}", database_url))?;

    commands::execute(cli.command, &db, &settings).await
}
