use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod config;
mod sync;

#[derive(Debug, Parser)]
#[command(name = "paintsync")]
#[command(about = "Refresh a MongoDB paint catalog from vendor JSON feeds")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Drop, re-index and reload the store from every configured source
    Sync {
        /// Path to the YAML configuration file
        #[arg(long, env = "PAINTSYNC_CONF")]
        conf: PathBuf,
        /// Fetch and flatten only; do not touch the store
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the parsed configuration with the password redacted
    Config {
        /// Path to the YAML configuration file
        #[arg(long, env = "PAINTSYNC_CONF")]
        conf: PathBuf,
    },
}

fn init_tracing() -> anyhow::Result<()> {
    let level = std::env::var("PAINTSYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    if let Err(e) = init_tracing() {
        eprintln!("invalid log filter: {e:#}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();
    let result = match cli.command {
        Some(Commands::Sync { conf, dry_run }) => sync::run(&conf, dry_run).await,
        Some(Commands::Config { conf }) => config::run(&conf),
        None => {
            let _ = Cli::command().print_help();
            return ExitCode::SUCCESS;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(stage = %e.kind(), error = %e, "paintsync failed");
            ExitCode::from(e.exit_code())
        }
    }
}
