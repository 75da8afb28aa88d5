use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use disease_dashboard::{routes, state};
use disease_dashboard_configuration::environment::ProcessEnvironment;
use disease_dashboard_configuration::{make_runtime_configuration, parse_configuration};

/// Serve the disease records dashboard.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Directory holding `configuration.json`.
    #[arg(long, env = "DASHBOARD_CONFIGURATION_DIR", default_value = ".")]
    configuration: PathBuf,
    #[arg(long, env = "DASHBOARD_HOST", default_value = "0.0.0.0")]
    host: IpAddr,
    #[arg(long, env = "DASHBOARD_PORT", default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
pub async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match serve(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(args: Args) -> anyhow::Result<()> {
    let parsed_configuration = parse_configuration(&args.configuration).await?;
    let configuration = make_runtime_configuration(parsed_configuration, ProcessEnvironment)?;
    let state = state::create_state(configuration).await?;
    let router = routes::create_router(Arc::new(state));

    let address = SocketAddr::new(args.host, args.port);
    tracing::info!(%address, "serving dashboard");

    axum::Server::try_bind(&address)?
        .serve(router.into_make_service())
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "cannot listen for shutdown signal");
            }
        })
        .await?;

    Ok(())
}
