//! Prints the latest VLF papers (or a free-text search) with the URL each one opens.
//!
//! `cargo run --bin fetch_papers -- [search terms...]`

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;
use vlf_research_hub::config::HubConfig;
use vlf_research_hub::feed::{arxiv::ArxivClient, PaperFeed};
use vlf_research_hub::LinkResolver;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .init();

    let cfg = HubConfig::load_default().context("loading hub config")?;
    let source = Arc::new(ArxivClient::from_config(&cfg.feed)?);
    let feed = PaperFeed::new(source, cfg.feed.clone());
    let links = LinkResolver::new(cfg.links.clone());

    let terms = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let papers = if terms.trim().is_empty() {
        feed.latest().await
    } else {
        feed.search(&terms).await
    }
    .context("fetching papers")?;

    for p in &papers {
        println!("{}  {}", p.published_date, p.title);
        println!("    {}", p.author_line());
        println!("    {}", p.excerpt(200));
        println!("    -> {}", links.resolve_url(p));
    }
    println!("{} papers", papers.len());
    Ok(())
}
