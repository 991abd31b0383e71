use anyhow::{Context, Result};
use rain_assistant::{api, chat::AppState, config::Config, telemetry};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let cfg = Config::load()?;

    if !cfg.provider.has_api_key() {
        anyhow::bail!(
            "CONFIG ERROR: RAIN__PROVIDER__API_KEY must be set to a valid forecast provider API key"
        );
    }

    let app_state = AppState::new(cfg.clone()).context("Failed to initialize chat pipeline")?;
    let app = api::router(app_state, &cfg);

    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("Server binding to 0.0.0.0 - service will be accessible from network");
    }

    info!(%addr, "starting Rain Assistant");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
