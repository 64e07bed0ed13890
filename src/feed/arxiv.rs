// src/feed/arxiv.rs
use std::time::Duration;

use async_trait::async_trait;

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::feed::atom::parse_feed;
use crate::feed::{FeedQuery, FeedRecord, FeedSource};

pub const USER_AGENT: &str = "vlf-research-hub/0.1";

/// arXiv export API client (`search_query` / `start` / `max_results`, newest first).
pub struct ArxivClient {
    base_url: String,
    http: reqwest::Client,
}

impl ArxivClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(4))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    pub fn from_config(cfg: &FeedConfig) -> anyhow::Result<Self> {
        // Client-side timeout is the looser of the two; callers apply their own per-request bound.
        let timeout = cfg.timeout().max(cfg.search_timeout());
        Self::new(cfg.base_url.clone(), timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query pairs sent for `query`, in wire order.
    pub fn query_params(query: &FeedQuery, max_results: usize) -> [(&'static str, String); 5] {
        [
            ("search_query", query.search_query()),
            ("start", "0".to_string()),
            ("max_results", max_results.to_string()),
            ("sortBy", "submittedDate".to_string()),
            ("sortOrder", "descending".to_string()),
        ]
    }
}

#[async_trait]
impl FeedSource for ArxivClient {
    async fn fetch(&self, query: &FeedQuery, max_results: usize) -> FeedResult<Vec<FeedRecord>> {
        let resp = self
            .http
            .get(&self.base_url)
            .query(&Self::query_params(query, max_results))
            .send()
            .await
            .map_err(|e| FeedError::NetworkFailure(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::HttpError {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        let records = parse_feed(&body)?;
        tracing::debug!(query = %query, n = records.len(), "arxiv query ok");
        Ok(records)
    }

    fn name(&self) -> &'static str {
        "arXiv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_match_export_api() {
        let p = ArxivClient::query_params(&FeedQuery::category("physics.geo-ph"), 5);
        assert_eq!(p[0], ("search_query", "cat:physics.geo-ph".to_string()));
        assert_eq!(p[2], ("max_results", "5".to_string()));
        assert_eq!(p[3].1, "submittedDate");
        assert_eq!(p[4].1, "descending");
    }
}
