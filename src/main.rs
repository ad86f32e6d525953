//! EcoRouter service — binary entrypoint.
//! Boots the Axum HTTP server: engine config, metrics, routes, middleware.

use anyhow::Context;
use eco_router::{api, config::EngineConfig, metrics::Metrics};
use shuttle_axum::ShuttleAxum;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - ECOROUTE_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("ECOROUTE_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ecoscore=info,warn"));

    // The runtime may already have installed a subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let config = EngineConfig::load_default().context("loading engine config")?;
    info!(
        tiers = config.emissions.tiers.len(),
        fuel_price = config.emissions.fuel_price_per_litre,
        "engine config loaded"
    );

    let metrics = Metrics::init()?;
    let router = api::create_router(api::AppState::new(config)).merge(metrics.router());

    Ok(router.into())
}
