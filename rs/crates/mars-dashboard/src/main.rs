mod error;
mod root;
mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use mars_client::{ApiConfig, RoverClient, DEFAULT_API_URL};
use mars_core::{Dashboard, RoverApi};

use crate::root::BroadcastRoot;

/// Renders kept for browsers that fall behind on `/sse`.
const RENDER_BACKLOG: usize = 16;

#[derive(Debug, Parser)]
#[command(name = "mars-dashboard", version, about = "Mars rover dashboard")]
struct Args {
    /// Port to serve the dashboard on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Base URL of the rover API
    #[arg(long, env = "API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mars_dashboard=info,mars_core=info,mars_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let client = RoverClient::from_config(&ApiConfig { base_url: args.api_url.clone() })?;
    let api: Arc<dyn RoverApi> = Arc::new(client);
    let dashboard = Arc::new(Dashboard::new(BroadcastRoot::new(RENDER_BACKLOG), api));

    // Page load: initial render, then the rover list
    tokio::spawn({
        let dashboard = Arc::clone(&dashboard);
        async move {
            match dashboard.load().await {
                Ok(state) => info!(
                    rovers = state.rovers.as_deref().map_or(0, |r| r.len()),
                    "dashboard loaded"
                ),
                Err(e) => error!(error = %e, "dashboard load failed"),
            }
        }
    });

    let app = server::router(dashboard);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("[mars-dashboard] http://localhost:{}", args.port);
    info!("[mars-dashboard] rover API: {}", args.api_url);

    axum::serve(listener, app).await?;
    Ok(())
}
