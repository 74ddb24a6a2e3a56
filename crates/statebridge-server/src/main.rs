use clap::Parser;
use statebridge_server::{configuration::Settings, logging, routes, state::AppState};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "statebridged", version, about)]
struct Args {
    /// TOML settings file; environment variables take precedence over it
    #[arg(long, env = "STATEBRIDGE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let args = Args::parse();
    let settings = Settings::load(args.config.as_deref())?;
    let addr = settings.server.socket_addr()?;

    let state = AppState::from_settings(&settings)?;
    let mut agents: Vec<&str> = state.router.agents().names().collect();
    agents.sort_unstable();
    info!(
        "intercepting loadAgentState on {} for agents [{}], forwarding the rest to {}",
        state.graphql_path,
        agents.join(", "),
        settings.runtime.url
    );

    let app = routes::configure(state);

    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;
    Ok(())
}
