// src/news.rs
//! Space / physics news: Spaceflight News API client plus a curated headline list.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::NewsConfig;
use crate::error::{FeedError, FeedResult};
use crate::feed::atom::date_prefix;
use crate::feed::normalize_text;

pub const NO_SUMMARY: &str = "No summary available";
pub const DEFAULT_NEWS_SITE: &str = "Spaceflight News";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewsArticle {
    pub title: String,
    /// `YYYY-MM-DD`, or empty when unknown.
    pub published_date: String,
    pub summary: String,
    pub source: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct NewsPage {
    #[serde(default)]
    results: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    title: Option<String>,
    published_at: Option<String>,
    summary: Option<String>,
    news_site: Option<String>,
    url: Option<String>,
}

/// Parse a news endpoint body. Articles without a URL are dropped (nothing to open).
pub fn parse_news_response(body: &str) -> FeedResult<Vec<NewsArticle>> {
    let page: NewsPage =
        serde_json::from_str(body).map_err(|e| FeedError::ParseFailure(e.to_string()))?;

    let out = page
        .results
        .into_iter()
        .filter_map(|a| {
            let url = a.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())?;
            Some(NewsArticle {
                title: text_or(a.title.as_deref(), crate::feed::atom::NO_TITLE),
                published_date: a.published_at.as_deref().map(date_prefix).unwrap_or_default(),
                summary: text_or(a.summary.as_deref(), NO_SUMMARY),
                source: text_or(a.news_site.as_deref(), DEFAULT_NEWS_SITE),
                url,
            })
        })
        .collect();
    Ok(out)
}

fn text_or(s: Option<&str>, fallback: &str) -> String {
    s.map(normalize_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_latest(&self) -> FeedResult<Vec<NewsArticle>>;
    fn name(&self) -> &'static str;
}

pub struct SpaceflightNewsClient {
    cfg: NewsConfig,
    http: reqwest::Client,
}

impl SpaceflightNewsClient {
    pub fn new(cfg: NewsConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(crate::feed::arxiv::USER_AGENT)
            .connect_timeout(Duration::from_secs(4))
            .timeout(cfg.timeout())
            .build()?;
        Ok(Self { cfg, http })
    }
}

#[async_trait]
impl NewsSource for SpaceflightNewsClient {
    async fn fetch_latest(&self) -> FeedResult<Vec<NewsArticle>> {
        let resp = self
            .http
            .get(&self.cfg.base_url)
            .query(&[
                ("limit", self.cfg.limit.to_string()),
                ("search", self.cfg.search.clone()),
            ])
            .send()
            .await
            .map_err(|e| FeedError::NetworkFailure(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "news endpoint returned error status");
            return Err(FeedError::HttpError {
                status: status.as_u16(),
            });
        }
        let body = resp.text().await?;
        parse_news_response(&body)
    }

    fn name(&self) -> &'static str {
        "Spaceflight News"
    }
}

/// Hand-picked physics headlines linking to the journals' landing pages.
pub fn curated_physics_news() -> Vec<NewsArticle> {
    let item = |title: &str, date: &str, summary: &str, source: &str, url: &str| NewsArticle {
        title: title.to_string(),
        published_date: date.to_string(),
        summary: summary.to_string(),
        source: source.to_string(),
        url: url.to_string(),
    };
    vec![
        item(
            "New Discoveries in Electromagnetic Wave Propagation",
            "2025-05-24",
            "Recent research reveals novel mechanisms in VLF wave propagation through the Earth-ionosphere waveguide.",
            "Physics Today",
            "https://physicstoday.scitation.org/",
        ),
        item(
            "Lightning-Generated Radio Waves Studied with AI",
            "2025-05-23",
            "Machine learning algorithms help scientists better understand the electromagnetic signatures of lightning strikes.",
            "Nature Physics",
            "https://www.nature.com/nphys/",
        ),
        item(
            "Space Weather Impact on VLF Communications",
            "2025-05-22",
            "Solar activity affects Very Low Frequency radio propagation, impacting global navigation systems.",
            "Geophysical Research Letters",
            "https://agupubs.onlinelibrary.wiley.com/journal/19448007",
        ),
    ]
}
