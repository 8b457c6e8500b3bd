use clap::{Parser, Subcommand};
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::info;

use carrier_portal_migrations::Migrator;

/// Deploy-time migration runner for the carrier portal schema.
#[derive(Parser)]
#[command(name = "migration", about = "Apply or revert carrier portal schema migrations")]
struct Cli {
    /// Database connection URL; falls back to the DATABASE_URL variable
    #[arg(long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply pending migrations (all of them, or the next N)
    Up {
        #[arg(long)]
        steps: Option<u32>,
    },
    /// Roll back applied migrations (the last one by default)
    Down {
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// Drop everything and re-apply from scratch
    Fresh,
    /// Show the status of every known migration
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();

    let database_url = cli
        .database_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .ok_or("DATABASE_URL is not set; pass --database-url or export it")?;

    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(5)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(10))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(true);

    let db = Database::connect(options).await?;

    match cli.command {
        Command::Up { steps } => {
            info!("Applying migrations");
            Migrator::up(&db, steps).await?;
            info!("Migrations applied");
        }
        Command::Down { steps } => {
            info!("Rolling back {} migration(s)", steps);
            Migrator::down(&db, Some(steps)).await?;
            info!("Rollback complete");
        }
        Command::Fresh => {
            info!("Rebuilding schema from scratch");
            Migrator::fresh(&db).await?;
            info!("Schema rebuilt");
        }
        Command::Status => {
            Migrator::status(&db).await?;
        }
    }

    Ok(())
}
