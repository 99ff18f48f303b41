mod configuration;
mod error;
mod routes;
mod state;

use configuration::Settings;
use state::AppState;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Ok(path) = dotenv::dotenv() {
        println!("Loaded environment from {:?}", path);
    }

    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new()?;
    let timeout = settings.timeout();
    let state = AppState::new(
        settings.providers.into_configs(),
        &settings.policy.base,
        timeout,
    )?;

    for provider in state.providers.iter() {
        if provider.configured {
            info!(provider = %provider.name, "provider configured");
        } else {
            warn!(provider = %provider.name, "no credential configured, answers will report an error");
        }
    }

    let app = routes::configure(state, settings.server.static_dir.as_deref());

    let listener = TcpListener::bind((settings.server.host.as_str(), settings.server.port)).await?;
    info!(
        timeout_secs = timeout.as_secs(),
        "listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, app).await?;
    Ok(())
}
