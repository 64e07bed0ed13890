//! VLF Research Hub — Binary Entrypoint
//! Boots the Axum HTTP server: calculators, paper feeds, news and `/metrics`.

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vlf_research_hub::api::{self, AppState};
use vlf_research_hub::config::HubConfig;
use vlf_research_hub::metrics::Metrics;

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - HUB_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("HUB_DEV_LOG")
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

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("feed=info,vlf_research_hub=debug,warn"));

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

    let cfg = HubConfig::load_default()?;
    tracing::info!(
        feed = %cfg.feed.base_url,
        topics = cfg.feed.topics.len(),
        categories = cfg.feed.categories.len(),
        "hub config loaded"
    );

    if std::env::var("HUB_FEED_PROBE").is_ok_and(|v| v == "1") {
        if let Err(e) = vlf_research_hub::run_feed_probe(&cfg).await {
            tracing::warn!(error = ?e, "feed probe didn't run");
        }
    }

    let metrics = Metrics::init()?;
    let state = AppState::from_config(&cfg)?;
    let router = api::router(state).merge(metrics.router());

    Ok(router.into())
}
