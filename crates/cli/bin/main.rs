//! The CLI can do a few things.
//!
//! This provides a central point where those things are routed and then done, making it easier to
//! test this crate deterministically.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use disease_dashboard_cli::{run, Command, Context};
use disease_dashboard_configuration::environment::ProcessEnvironment;

/// The release version specified at build time.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The command-line arguments.
#[derive(Debug, Parser)]
#[command(version = VERSION)]
pub struct Args {
    /// The path to the configuration directory.
    #[arg(
        long = "context",
        env = "DASHBOARD_CONFIGURATION_DIR",
        value_name = "DIRECTORY",
        default_value = "."
    )]
    pub context_path: PathBuf,
    /// The command to invoke.
    #[command(subcommand)]
    pub subcommand: Command,
}

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let context = Context {
        context_path: args.context_path,
        environment: ProcessEnvironment,
    };
    run(args.subcommand, context).await?;
    Ok(())
}
