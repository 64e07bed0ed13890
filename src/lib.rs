// src/lib.rs
// Public library surface for the service binary, the demo binary and integration tests.

pub mod api;
pub mod calc;
pub mod config;
pub mod error;
pub mod feed;
pub mod metrics;
pub mod news;
pub mod resolve;
pub mod space_weather;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::error::{CalcError, FeedError};
pub use crate::feed::{fetch_by_queries, FeedQuery, FeedRecord, FeedSource};
pub use crate::resolve::{resolve_url, LinkResolver};

use tracing::info;

/// One-off smoke fetch of the latest papers. Logs the outcome instead of failing startup.
///
/// ```ignore
/// if let Err(e) = vlf_research_hub::run_feed_probe(&cfg).await {
///     tracing::warn!(error=?e, "feed probe didn't run");
/// }
/// ```
pub async fn run_feed_probe(cfg: &config::HubConfig) -> anyhow::Result<()> {
    let state = api::AppState::from_config(cfg)?;
    match state.papers.latest().await {
        Ok(papers) => info!(n = papers.len(), "feed probe finished"),
        Err(e) => tracing::warn!(error = %e, "feed probe returned nothing"),
    }
    Ok(())
}
