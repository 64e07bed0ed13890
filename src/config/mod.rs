// src/config/mod.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_CONFIG_PATH: &str = "VLF_HUB_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/hub.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HubConfig {
    pub feed: FeedConfig,
    pub news: NewsConfig,
    pub links: LinkConfig,
}

/// arXiv feed settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedConfig {
    pub base_url: String,
    pub per_query_limit: usize,
    pub total_limit: usize,
    pub timeout_secs: u64,
    pub search_limit: usize,
    pub search_timeout_secs: u64,
    /// Free-text queries behind "latest papers".
    pub topics: Vec<String>,
    /// Category listings behind "browse categories".
    pub categories: Vec<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://export.arxiv.org/api/query".to_string(),
            per_query_limit: 5,
            total_limit: 10,
            timeout_secs: 10,
            search_limit: 15,
            search_timeout_secs: 15,
            topics: [
                "VLF electromagnetic waves",
                "very low frequency radio",
                "earth ionosphere waveguide",
                "whistler waves",
                "magnetospheric waves",
            ]
            .map(String::from)
            .to_vec(),
            categories: [
                "physics.space-ph",
                "physics.plasm-ph",
                "physics.ao-ph",
                "physics.geo-ph",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

impl FeedConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }
}

/// Spaceflight News API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NewsConfig {
    pub base_url: String,
    pub limit: usize,
    pub search: String,
    pub timeout_secs: u64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.spaceflightnewsapi.net/v4/articles".to_string(),
            limit: 10,
            search: "space physics plasma magnetic".to_string(),
            timeout_secs: 10,
        }
    }
}

impl NewsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Where "open this record" links point.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LinkConfig {
    pub canonical_domain: String,
    pub abstract_base: String,
    pub search_endpoint: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            canonical_domain: "arxiv.org".to_string(),
            abstract_base: "https://arxiv.org/abs/".to_string(),
            search_endpoint: "https://arxiv.org/search/".to_string(),
        }
    }
}

impl HubConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading hub config from {}", path.display()))?;
        let cfg: HubConfig = toml::from_str(&content)
            .with_context(|| format!("parsing hub config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load config using env var + fallbacks:
    /// 1) $VLF_HUB_CONFIG_PATH
    /// 2) config/hub.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            } else {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        if self.feed.base_url.trim().is_empty() {
            return Err(anyhow!("feed.base_url must not be empty"));
        }
        if self.feed.per_query_limit == 0 || self.feed.total_limit == 0 {
            return Err(anyhow!("feed limits must be positive"));
        }
        if self.feed.timeout_secs == 0 || self.feed.search_timeout_secs == 0 {
            return Err(anyhow!("feed timeouts must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg: HubConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, HubConfig::default());
        assert_eq!(cfg.feed.topics.len(), 5);
        assert_eq!(cfg.feed.categories.len(), 4);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg: HubConfig = toml::from_str(
            r#"
[feed]
total_limit = 3
"#,
        )
        .unwrap();
        assert_eq!(cfg.feed.total_limit, 3);
        assert_eq!(cfg.feed.per_query_limit, 5);
        assert_eq!(cfg.news, NewsConfig::default());
    }

    #[test]
    fn zero_limits_are_rejected() {
        let mut cfg = HubConfig::default();
        cfg.feed.total_limit = 0;
        assert!(cfg.validate().is_err());
    }
}
