//! Streamwatch CLI
//!
//! Configuration comes from the environment; flags only choose the `.env`
//! file and log level.

use std::path::PathBuf;

use clap::Parser;
use streamwatch::{load_env_file, Config};
use tracing::Level;

#[derive(Parser)]
#[command(name = "streamwatch")]
#[command(about = "Twitch live-status monitor with Gotify notifications")]
#[command(version)]
struct Args {
    /// Path to a .env file (skipped if missing)
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .init();

    tracing::debug!(
        "Parsed command line arguments: env_file={:?}, log_level={:?}",
        args.env_file,
        args.log_level
    );

    if load_env_file(&args.env_file)? {
        tracing::debug!("Loaded environment from {:?}", args.env_file);
    }

    let config = Config::from_env().inspect_err(|e| tracing::error!("{}", e))?;
    tracing::debug!("Configuration: {:?}", config);

    streamwatch::run(config)
        .await
        .inspect_err(|e| tracing::error!("{}", e))?;

    Ok(())
}
