// src/resolve.rs
//! Picks the external URL to open for a paper or a news article.

use crate::config::LinkConfig;
use crate::feed::FeedRecord;
use crate::news::NewsArticle;

/// Anything a reader can click through to.
pub trait Linkable {
    fn title(&self) -> &str;
    fn abstract_url(&self) -> Option<&str> {
        None
    }
    fn canonical_id(&self) -> Option<&str> {
        None
    }
    fn pdf_url(&self) -> Option<&str> {
        None
    }
    /// Publisher URL for records that carry no feed-source links.
    fn direct_url(&self) -> Option<&str> {
        None
    }
}

impl Linkable for FeedRecord {
    fn title(&self) -> &str {
        &self.title
    }
    fn abstract_url(&self) -> Option<&str> {
        self.abstract_url.as_deref()
    }
    fn canonical_id(&self) -> Option<&str> {
        self.canonical_id.as_deref()
    }
    fn pdf_url(&self) -> Option<&str> {
        self.pdf_url.as_deref()
    }
}

impl Linkable for NewsArticle {
    fn title(&self) -> &str {
        &self.title
    }
    fn direct_url(&self) -> Option<&str> {
        Some(self.url.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct LinkResolver {
    cfg: LinkConfig,
}

impl LinkResolver {
    pub fn new(cfg: LinkConfig) -> Self {
        Self { cfg }
    }

    /// First match wins:
    /// 1. abstract URL on the canonical domain
    /// 2. abstract URL built from the canonical id
    /// 3. PDF URL on the canonical domain
    /// 4. the record's own URL (news)
    /// 5. title search on the feed source
    ///
    /// Never empty.
    pub fn resolve_url(&self, record: &impl Linkable) -> String {
        if let Some(u) = present(record.abstract_url()).filter(|u| self.on_canonical_domain(u)) {
            return u.to_string();
        }
        if let Some(id) = present(record.canonical_id()) {
            return format!("{}{}", self.cfg.abstract_base, id);
        }
        if let Some(u) = present(record.pdf_url()).filter(|u| self.on_canonical_domain(u)) {
            return u.to_string();
        }
        if let Some(u) = present(record.direct_url()) {
            return u.to_string();
        }
        self.search_url(record.title())
    }

    pub fn search_url(&self, title: &str) -> String {
        format!(
            "{}?query={}&searchtype=title",
            self.cfg.search_endpoint,
            sanitize_title(title)
        )
    }

    fn on_canonical_domain(&self, url: &str) -> bool {
        url.contains(self.cfg.canonical_domain.as_str())
    }
}

/// Spaces become `+`; commas, colons and double quotes are dropped.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| !matches!(c, ',' | ':' | '"'))
        .map(|c| if c == ' ' { '+' } else { c })
        .collect()
}

/// Convenience over the default (arXiv) resolver.
pub fn resolve_url(record: &impl Linkable) -> String {
    LinkResolver::default().resolve_url(record)
}

fn present(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
