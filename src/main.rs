use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use property_tracker::{
    config::{
        self,
        users::{SYSTEM_ACTOR, get_acting_username},
    },
    core::{filing, llc},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Maintenance commands for the property tracker database
#[derive(Parser, Debug)]
#[command(name = "property-tracker", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create missing tables and seed LLCs from the config file
    Init {
        /// Seed configuration file
        #[arg(long, default_value = "config.toml")]
        config: PathBuf,
    },
    /// Mark every LLC's annual filing as not current (run once a year)
    ResetFiling,
    /// Print every LLC with its filing status as of today
    FilingStatus,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    let cli = Cli::parse();

    // 3. Connect to the database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;

    match cli.command {
        Command::Init { config } => init(&db, &config).await,
        Command::ResetFiling => reset_filing(&db).await,
        Command::FilingStatus => filing_status(&db).await,
    }
}

async fn init(db: &DatabaseConnection, config_path: &Path) -> Result<()> {
    config::database::create_tables(db).await?;

    if !config_path.exists() {
        warn!("No seed file at {:?}; skipping LLC seeding", config_path);
        return Ok(());
    }

    let seed = config::llcs::load_config(config_path)
        .inspect_err(|e| error!("Failed to load seed configuration: {}", e))?;
    let created = llc::seed_llcs(db, &seed.llcs).await?;
    println!("Created {created} LLC(s) from {}", config_path.display());
    Ok(())
}

async fn reset_filing(db: &DatabaseConnection) -> Result<()> {
    let year = chrono::Local::now().date_naive().format("%Y");
    // Only named in the log; maintenance runs never create users
    let actor = get_acting_username().unwrap_or_else(|| SYSTEM_ACTOR.to_string());
    info!(
        actor = %actor,
        "Starting reset of LLC filing status for the year {year}..."
    );

    let updated = llc::reset_filing_status(db).await?;
    println!("Successfully reset 'filing_current' to false for {updated} LLC(s).");
    Ok(())
}

async fn filing_status(db: &DatabaseConnection) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let rows = filing::filing_report(db, today).await?;
    print!("{}", filing::format_filing_report(&rows, today));
    Ok(())
}
