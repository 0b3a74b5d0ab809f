use clap::Parser;
use dotenvy::dotenv;
use rate_ledger::{
    cli::{self, Cli},
    config::{database, seed},
    errors::Result,
};
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env first so RUST_LOG and the env-backed arguments can come from it
    dotenv().ok();

    // 2. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // 3. Open the database and make sure the schema exists
    let db = database::create_connection(&cli.database_url)
        .await
        .inspect_err(|e| error!("Failed to open database: {}", e))?;
    database::create_tables(&db).await?;

    // 4. Seed the catalog when a config file is present
    if !cli.no_seed {
        if Path::new(&cli.config).exists() {
            let catalog = seed::load_config(&cli.config)?;
            seed::seed_catalog(&db, &catalog)
                .await
                .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;
        } else {
            warn!(config = %cli.config, "Catalog file not found, skipping seed");
        }
    }

    // 5. Run the command
    let output = cli::run(&db, cli.command, cli.json).await?;
    print!("{output}");
    info!("Done");

    Ok(())
}
