// tests/resolve_url.rs
use std::collections::BTreeSet;

use vlf_research_hub::config::LinkConfig;
use vlf_research_hub::news::NewsArticle;
use vlf_research_hub::{resolve_url, FeedRecord, LinkResolver};

fn bare(title: &str) -> FeedRecord {
    FeedRecord {
        title: title.to_string(),
        published_date: String::new(),
        summary: String::new(),
        authors: vec![],
        total_authors: 0,
        categories: BTreeSet::new(),
        source_url: String::new(),
        canonical_id: None,
        abstract_url: None,
        pdf_url: None,
    }
}

#[test]
fn abstract_url_on_arxiv_wins() {
    let mut r = bare("t");
    r.abstract_url = Some("https://arxiv.org/abs/2505.12345".into());
    r.canonical_id = Some("9999.99999".into());
    r.pdf_url = Some("https://arxiv.org/pdf/2505.12345.pdf".into());
    assert_eq!(resolve_url(&r), "https://arxiv.org/abs/2505.12345");
}

#[test]
fn foreign_abstract_url_falls_to_canonical_id() {
    let mut r = bare("t");
    r.abstract_url = Some("https://mirror.test/abs/1".into());
    r.canonical_id = Some("2505.12345".into());
    assert_eq!(resolve_url(&r), "https://arxiv.org/abs/2505.12345");
}

#[test]
fn pdf_used_when_no_abstract_or_id() {
    let mut r = bare("t");
    r.pdf_url = Some("https://arxiv.org/pdf/2505.12345.pdf".into());
    assert_eq!(resolve_url(&r), "https://arxiv.org/pdf/2505.12345.pdf");

    r.pdf_url = Some("https://mirror.test/x.pdf".into());
    assert!(resolve_url(&r).starts_with("https://arxiv.org/search/?query="));
}

#[test]
fn empty_record_gets_title_search() {
    let r = bare(r#"VLF "Tweeks": dispersion, revisited"#);
    assert_eq!(
        resolve_url(&r),
        "https://arxiv.org/search/?query=VLF+Tweeks+dispersion+revisited&searchtype=title"
    );

    let mut blank = bare("");
    blank.abstract_url = Some("   ".into());
    blank.canonical_id = Some(String::new());
    assert!(!resolve_url(&blank).is_empty());
}

#[test]
fn news_articles_open_their_own_url() {
    let a = NewsArticle {
        title: "Aurora".into(),
        published_date: "2025-05-21".into(),
        summary: String::new(),
        source: "Space.com".into(),
        url: "https://www.space.com/x".into(),
    };
    assert_eq!(resolve_url(&a), "https://www.space.com/x");

    let no_url = NewsArticle { url: String::new(), ..a };
    assert_eq!(
        resolve_url(&no_url),
        "https://arxiv.org/search/?query=Aurora&searchtype=title"
    );
}

#[test]
fn custom_domain_configuration() {
    let resolver = LinkResolver::new(LinkConfig {
        canonical_domain: "mirror.test".into(),
        abstract_base: "https://mirror.test/abs/".into(),
        search_endpoint: "https://mirror.test/search/".into(),
    });
    let mut r = bare("t");
    r.abstract_url = Some("https://mirror.test/abs/1".into());
    assert_eq!(resolver.resolve_url(&r), "https://mirror.test/abs/1");

    r.abstract_url = None;
    r.canonical_id = Some("42".into());
    assert_eq!(resolver.resolve_url(&r), "https://mirror.test/abs/42");
}
