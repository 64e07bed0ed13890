// src/feed/mod.rs
pub mod arxiv;
pub mod atom;

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};

/// Marker appended to a capped author list.
pub const ET_AL: &str = "et al.";
/// Authors kept on a record before the list is capped.
pub const MAX_LISTED_AUTHORS: usize = 3;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_queries_total", "Feed queries issued.");
        describe_counter!(
            "feed_query_errors_total",
            "Feed queries that failed (network, status, parse, timeout)."
        );
        describe_counter!("feed_records_total", "Records returned after merge + dedup.");
        describe_counter!("feed_dedup_total", "Records dropped as duplicate titles.");
        describe_histogram!("feed_parse_ms", "Atom document parse time in milliseconds.");
        describe_gauge!("feed_last_run_ts", "Unix ts of the last aggregation run.");
    });
}

/// Normalized paper record produced from one Atom entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedRecord {
    /// Non-empty; exact-match dedup key.
    pub title: String,
    /// `YYYY-MM-DD`, or empty when unknown.
    pub published_date: String,
    pub summary: String,
    /// First three names, plus `"et al."` when the entry had more.
    pub authors: Vec<String>,
    pub total_authors: usize,
    pub categories: BTreeSet<String>,
    pub source_url: String,
    pub canonical_id: Option<String>,
    pub abstract_url: Option<String>,
    pub pdf_url: Option<String>,
}

impl FeedRecord {
    /// "A, B, C et al." or "Unknown authors".
    pub fn author_line(&self) -> String {
        if self.authors.is_empty() {
            return "Unknown authors".to_string();
        }
        let names: Vec<&str> = self
            .authors
            .iter()
            .map(String::as_str)
            .filter(|a| *a != ET_AL)
            .collect();
        let mut out = names.join(", ");
        if self.total_authors > MAX_LISTED_AUTHORS {
            out.push(' ');
            out.push_str(ET_AL);
        }
        out
    }

    /// First `max_chars` characters of the summary, with `...` when cut.
    pub fn excerpt(&self, max_chars: usize) -> String {
        if self.summary.chars().count() <= max_chars {
            return self.summary.clone();
        }
        let mut s: String = self.summary.chars().take(max_chars).collect();
        s.push_str("...");
        s
    }
}

/// A single request against the feed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FeedQuery {
    /// Free-text search over all fields (`all:<terms>`).
    All(String),
    /// Category listing (`cat:<category>`).
    Category(String),
}

impl FeedQuery {
    pub fn all(terms: impl Into<String>) -> Self {
        FeedQuery::All(terms.into())
    }

    pub fn category(cat: impl Into<String>) -> Self {
        FeedQuery::Category(cat.into())
    }

    /// Value of the `search_query` parameter.
    pub fn search_query(&self) -> String {
        match self {
            FeedQuery::All(t) => format!("all:{t}"),
            FeedQuery::Category(c) => format!("cat:{c}"),
        }
    }
}

impl From<&str> for FeedQuery {
    fn from(s: &str) -> Self {
        FeedQuery::All(s.to_string())
    }
}

impl From<String> for FeedQuery {
    fn from(s: String) -> Self {
        FeedQuery::All(s)
    }
}

impl fmt::Display for FeedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.search_query())
    }
}

/// A remote source of feed records, queried most-recent-first.
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, query: &FeedQuery, max_results: usize) -> FeedResult<Vec<FeedRecord>>;
    fn name(&self) -> &'static str;
}

/// Normalize text from a source that may carry raw HTML entities (JSON APIs):
/// decode them, then [`tidy_text`].
pub fn normalize_text(s: &str) -> String {
    tidy_text(&html_escape::decode_html_entities(s))
}

/// Straighten quotes, collapse whitespace, trim. Entities are left alone, so text
/// an XML parser already unescaped is not decoded a second time.
pub fn tidy_text(s: &str) -> String {
    let out = s
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("static regex"));
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// Drop repeated titles (first seen wins), sort by date descending (stable), cap at `total_limit`.
/// Returns the kept records and how many were dropped as duplicates.
pub fn merge_dedup_sort(records: Vec<FeedRecord>, total_limit: usize) -> (Vec<FeedRecord>, usize) {
    let mut seen_titles: HashSet<String> = HashSet::with_capacity(records.len());
    let mut kept = Vec::with_capacity(records.len());
    let mut dedup = 0usize;

    for rec in records {
        if !seen_titles.insert(rec.title.clone()) {
            dedup += 1;
            continue;
        }
        kept.push(rec);
    }

    // `sort_by` is stable: equal dates keep merge order.
    kept.sort_by(|a, b| b.published_date.cmp(&a.published_date));
    kept.truncate(total_limit);
    (kept, dedup)
}

/// Issue every query concurrently, skip the ones that fail, then merge.
///
/// Fails only with [`FeedError::NoResults`] when nothing survives.
pub async fn fetch_by_queries(
    source: &dyn FeedSource,
    queries: &[FeedQuery],
    per_query_limit: usize,
    total_limit: usize,
    timeout: Duration,
) -> FeedResult<Vec<FeedRecord>> {
    ensure_metrics_described();

    let calls = queries.iter().map(|q| async move {
        counter!("feed_queries_total").increment(1);
        let res = match tokio::time::timeout(timeout, source.fetch(q, per_query_limit)).await {
            Ok(r) => r,
            Err(_) => Err(FeedError::NetworkFailure(format!(
                "timed out after {}s",
                timeout.as_secs_f32()
            ))),
        };
        (q, res)
    });

    // join_all keeps query order, which fixes the merge order.
    let mut merged = Vec::new();
    let mut failed = 0usize;
    for (q, res) in join_all(calls).await {
        match res {
            Ok(mut recs) => merged.append(&mut recs),
            Err(e) => {
                failed += 1;
                tracing::warn!(error = %e, query = %q, source = source.name(), "feed query failed");
                counter!("feed_query_errors_total").increment(1);
            }
        }
    }

    let (kept, dedup) = merge_dedup_sort(merged, total_limit);

    counter!("feed_records_total").increment(kept.len() as u64);
    counter!("feed_dedup_total").increment(dedup as u64);
    gauge!("feed_last_run_ts").set(chrono::Utc::now().timestamp() as f64);
    tracing::info!(
        target: "feed",
        queries = queries.len(),
        failed,
        dedup,
        kept = kept.len(),
        "feed aggregation finished"
    );

    if kept.is_empty() {
        return Err(FeedError::NoResults);
    }
    Ok(kept)
}

/// Paper lookups wired to a source and the configured limits.
#[derive(Clone)]
pub struct PaperFeed {
    source: Arc<dyn FeedSource>,
    cfg: FeedConfig,
}

impl PaperFeed {
    pub fn new(source: Arc<dyn FeedSource>, cfg: FeedConfig) -> Self {
        Self { source, cfg }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.cfg
    }

    /// Most recent papers across the configured topic queries.
    pub async fn latest(&self) -> FeedResult<Vec<FeedRecord>> {
        let queries: Vec<FeedQuery> = self.cfg.topics.iter().map(FeedQuery::all).collect();
        fetch_by_queries(
            self.source.as_ref(),
            &queries,
            self.cfg.per_query_limit,
            self.cfg.total_limit,
            self.cfg.timeout(),
        )
        .await
    }

    /// Most recent papers of every configured category.
    /// No cross-category cap beyond the per-query one.
    pub async fn categories(&self) -> FeedResult<Vec<FeedRecord>> {
        let queries: Vec<FeedQuery> =
            self.cfg.categories.iter().map(FeedQuery::category).collect();
        let total = self.cfg.per_query_limit * queries.len();
        fetch_by_queries(
            self.source.as_ref(),
            &queries,
            self.cfg.per_query_limit,
            total,
            self.cfg.timeout(),
        )
        .await
    }

    /// One free-text query. There is nothing to fall back on, so its error is returned as is.
    pub async fn search(&self, terms: &str) -> FeedResult<Vec<FeedRecord>> {
        let terms = terms.trim();
        if terms.is_empty() {
            return Err(FeedError::EmptyQuery);
        }
        let query = FeedQuery::all(terms);
        let timeout = self.cfg.search_timeout();
        match tokio::time::timeout(timeout, self.source.fetch(&query, self.cfg.search_limit)).await
        {
            Ok(res) => res,
            Err(_) => Err(FeedError::NetworkFailure(format!(
                "timed out after {}s",
                timeout.as_secs_f32()
            ))),
        }
    }
}
