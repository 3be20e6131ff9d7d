//! # Activities API Main Entry Point
//!
//! This is the main entry point for the Mergington High School activities
//! service.

use activities::{
    config::{AppConfig, ConfigLoader},
    db,
    seeds::{self, SeedOutcome},
    server::run_server,
    telemetry,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sea_orm::DatabaseConnection;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "activities", version, about = "Mergington High School activities API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Apply migrations, seed if configured, and serve HTTP (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Apply pending migrations, seed an empty store, and exit
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration from layered env files and variables
    let config = ConfigLoader::new()
        .load()
        .context("loading configuration")?;

    telemetry::init_tracing(&config).context("initializing telemetry")?;

    info!(profile = %config.profile, "Loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        info!(configuration = %redacted_json, "Effective configuration");
    }

    let db = connect_and_migrate(&config).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            if config.seed_on_startup {
                seed(&db).await?;
            }
            run_server(config, db).await
        }
        Command::Migrate => {
            info!("Migrations applied");
            Ok(())
        }
        Command::Seed => seed(&db).await,
    }
}

async fn connect_and_migrate(config: &AppConfig) -> Result<DatabaseConnection> {
    let db = db::init_pool(config)
        .await
        .context("initializing database connection pool")?;

    db::initialize_schema(&db)
        .await
        .context("applying database migrations")?;

    Ok(db)
}

async fn seed(db: &DatabaseConnection) -> Result<()> {
    match seeds::seed_activities(db)
        .await
        .context("seeding activities")?
    {
        SeedOutcome::AlreadySeeded => info!("Activities already present, seed skipped"),
        SeedOutcome::Seeded {
            activities,
            enrollments,
        } => info!(activities, enrollments, "Seeded activities"),
    }

    Ok(())
}
