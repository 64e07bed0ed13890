// src/feed/atom.rs
//! Atom document parsing for the arXiv export API.

use std::collections::BTreeSet;

use once_cell::sync::OnceCell;
use quick_xml::de::from_str;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use serde::Deserialize;

use crate::error::{FeedError, FeedResult};
use crate::feed::{tidy_text, FeedRecord, ET_AL, MAX_LISTED_AUTHORS};

pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

pub const NO_TITLE: &str = "No title";
pub const NO_ABSTRACT: &str = "No abstract available";

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(rename = "@xmlns")]
    xmlns: Option<String>,
    #[serde(rename = "entry", default)]
    entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    id: Option<String>,
    title: Option<String>,
    summary: Option<String>,
    published: Option<String>,
    #[serde(rename = "author", default)]
    authors: Vec<Author>,
    #[serde(rename = "category", default)]
    categories: Vec<Category>,
    #[serde(rename = "link", default)]
    links: Vec<Link>,
}

#[derive(Debug, Deserialize)]
struct Author {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Category {
    #[serde(rename = "@term")]
    term: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Link {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
    #[serde(rename = "@title")]
    title: Option<String>,
}

/// Parse a whole Atom feed document. Entries are returned in document order.
pub fn parse_feed(xml: &str) -> FeedResult<Vec<FeedRecord>> {
    let t0 = std::time::Instant::now();
    let xml_clean = scrub_html_entities_for_xml(xml);
    let feed: Feed = from_str(&xml_clean).map_err(|e| FeedError::ParseFailure(e.to_string()))?;

    if let Some(ns) = feed.xmlns.as_deref() {
        if ns != ATOM_NS {
            return Err(FeedError::ParseFailure(format!(
                "unexpected feed namespace {ns}"
            )));
        }
    }

    // serde matches `entry` by local name only; drop the ones in a foreign namespace
    let mask = atom_entry_mask(&xml_clean, 1)?;
    if mask.len() != feed.entries.len() {
        return Err(FeedError::ParseFailure(format!(
            "found {} entry elements, deserialized {}",
            mask.len(),
            feed.entries.len()
        )));
    }
    let total = mask.len();
    let out: Vec<FeedRecord> = feed
        .entries
        .into_iter()
        .zip(mask)
        .filter_map(|(entry, atom)| atom.then(|| record_from_entry(entry)))
        .collect();
    if out.len() < total {
        tracing::debug!(
            skipped = total - out.len(),
            "ignored entries outside the Atom namespace"
        );
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    metrics::histogram!("feed_parse_ms").record(ms);
    Ok(out)
}

/// Parse one raw `<entry>` element. Missing fields fall back to placeholders;
/// only XML that cannot be read at all is an error.
pub fn parse_feed_entry(raw_entry_xml: &str) -> FeedResult<FeedRecord> {
    let xml_clean = scrub_html_entities_for_xml(raw_entry_xml);
    let entry: Entry = from_str(&xml_clean).map_err(|e| FeedError::ParseFailure(e.to_string()))?;
    if atom_entry_mask(&xml_clean, 0)?.first() == Some(&false) {
        return Err(FeedError::ParseFailure(
            "entry is outside the Atom namespace".to_string(),
        ));
    }
    Ok(record_from_entry(entry))
}

/// One flag per `entry` element found at `depth` (0 = document root): whether it is
/// in the Atom namespace or in no namespace at all.
fn atom_entry_mask(xml: &str, depth: usize) -> FeedResult<Vec<bool>> {
    let mut reader = NsReader::from_str(xml);
    let mut level = 0usize;
    let mut mask = Vec::new();
    loop {
        let (ns, event) = reader
            .read_resolved_event()
            .map_err(|e| FeedError::ParseFailure(e.to_string()))?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                if level == depth && e.local_name().as_ref() == b"entry" {
                    mask.push(in_atom_ns(&ns));
                }
                if matches!(event, Event::Start(_)) {
                    level += 1;
                }
            }
            Event::End(_) => level = level.saturating_sub(1),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(mask)
}

fn in_atom_ns(ns: &ResolveResult) -> bool {
    match ns {
        ResolveResult::Bound(Namespace(n)) => *n == ATOM_NS.as_bytes(),
        ResolveResult::Unbound => true,
        ResolveResult::Unknown(_) => false,
    }
}

fn record_from_entry(entry: Entry) -> FeedRecord {
    let title = non_empty(entry.title.as_deref()).unwrap_or_else(|| NO_TITLE.to_string());
    let summary = non_empty(entry.summary.as_deref()).unwrap_or_else(|| NO_ABSTRACT.to_string());
    let published_date = entry
        .published
        .as_deref()
        .map(date_prefix)
        .unwrap_or_default();

    let names: Vec<String> = entry
        .authors
        .into_iter()
        .filter_map(|a| non_empty(a.name.as_deref()))
        .collect();
    let total_authors = names.len();
    let mut authors: Vec<String> = names.into_iter().take(MAX_LISTED_AUTHORS).collect();
    if total_authors > MAX_LISTED_AUTHORS {
        authors.push(ET_AL.to_string());
    }

    let categories: BTreeSet<String> = entry
        .categories
        .into_iter()
        .filter_map(|c| c.term)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    let id_text = entry.id.as_deref().map(str::trim).unwrap_or_default();
    let canonical_id = canonical_id_from_url(id_text);

    let (source_url, abstract_url, pdf_url) = match canonical_id.as_deref() {
        Some(id) => {
            let abs = abstract_url_for(id);
            (abs.clone(), Some(abs), Some(pdf_url_for(id)))
        }
        None => {
            let alternate = link_href(&entry.links, |l| l.rel.as_deref() == Some("alternate"));
            let pdf = link_href(&entry.links, |l| l.title.as_deref() == Some("pdf"));
            (id_text.to_string(), alternate, pdf)
        }
    };

    FeedRecord {
        title,
        published_date,
        summary,
        authors,
        total_authors,
        categories,
        source_url,
        canonical_id,
        abstract_url,
        pdf_url,
    }
}

/// Identifier from a `.../abs/<id>` URL, with any `vN` version suffix removed.
pub fn canonical_id_from_url(url: &str) -> Option<String> {
    static RE_ABS: OnceCell<regex::Regex> = OnceCell::new();
    let re = RE_ABS.get_or_init(|| {
        regex::Regex::new(r"^https?://(?:[\w-]+\.)*arxiv\.org/abs/(?P<id>[^?#\s]+?)(?:v\d+)?/?$")
            .expect("static regex")
    });
    re.captures(url.trim())
        .and_then(|c| c.name("id"))
        .map(|m| m.as_str().to_string())
        .filter(|id| !id.is_empty())
}

pub fn abstract_url_for(id: &str) -> String {
    format!("https://arxiv.org/abs/{id}")
}

pub fn pdf_url_for(id: &str) -> String {
    format!("https://arxiv.org/pdf/{id}.pdf")
}

fn link_href(links: &[Link], pred: impl Fn(&Link) -> bool) -> Option<String> {
    links
        .iter()
        .filter(|l| pred(l))
        .find_map(|l| non_empty(l.href.as_deref()))
}

/// `YYYY-MM-DD` prefix of an RFC 3339 timestamp; empty when it is not a real date.
pub(crate) fn date_prefix(ts: &str) -> String {
    let ts = ts.trim();
    match ts.get(..10) {
        Some(d) if chrono::NaiveDate::parse_from_str(d, "%Y-%m-%d").is_ok() => d.to_string(),
        _ => String::new(),
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(tidy_text).filter(|t| !t.is_empty())
}

/// HTML-only entities are not legal XML; map the common ones before parsing.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_id_strips_version() {
        assert_eq!(
            canonical_id_from_url("http://arxiv.org/abs/2401.01234v2").as_deref(),
            Some("2401.01234")
        );
        assert_eq!(
            canonical_id_from_url("https://export.arxiv.org/abs/physics/0601001v1").as_deref(),
            Some("physics/0601001")
        );
        assert_eq!(
            canonical_id_from_url("http://arxiv.org/abs/2401.01234").as_deref(),
            Some("2401.01234")
        );
        assert_eq!(canonical_id_from_url("https://example.org/abs/1234"), None);
        assert_eq!(canonical_id_from_url(""), None);
    }

    #[test]
    fn date_prefix_requires_a_date() {
        assert_eq!(date_prefix("2024-05-20T17:59:59Z"), "2024-05-20");
        assert_eq!(date_prefix("yesterday"), "");
        assert_eq!(date_prefix(""), "");
    }

    #[test]
    fn bare_entry_gets_placeholders() {
        let r = parse_feed_entry("<entry></entry>").unwrap();
        assert_eq!(r.title, NO_TITLE);
        assert_eq!(r.summary, NO_ABSTRACT);
        assert_eq!(r.published_date, "");
        assert!(r.authors.is_empty());
        assert!(r.canonical_id.is_none());
        assert_eq!(r.source_url, "");
    }

    #[test]
    fn entry_without_abs_id_uses_links() {
        let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom">
            <id>urn:uuid:1234</id>
            <title>Standalone</title>
            <link href="https://mirror.test/page" rel="alternate" type="text/html"/>
            <link title="pdf" href="https://mirror.test/page.pdf" rel="related"/>
        </entry>"#;
        let r = parse_feed_entry(xml).unwrap();
        assert_eq!(r.source_url, "urn:uuid:1234");
        assert_eq!(r.abstract_url.as_deref(), Some("https://mirror.test/page"));
        assert_eq!(r.pdf_url.as_deref(), Some("https://mirror.test/page.pdf"));
    }

    #[test]
    fn escaped_markup_is_decoded_once() {
        let xml = r#"<entry xmlns="http://www.w3.org/2005/Atom">
            <title>Use &amp;lt;b&amp;gt; tags</title>
            <summary>Q &amp;amp; A</summary>
        </entry>"#;
        let r = parse_feed_entry(xml).unwrap();
        assert_eq!(r.title, "Use &lt;b&gt; tags");
        assert_eq!(r.summary, "Q &amp; A");
    }

    #[test]
    fn foreign_root_entry_is_rejected() {
        let xml = r#"<x:entry xmlns:x="urn:other"><x:title>Foreign</x:title></x:entry>"#;
        assert!(matches!(parse_feed_entry(xml), Err(FeedError::ParseFailure(_))));
    }

    #[test]
    fn prefixed_atom_entry_is_accepted() {
        let xml = r#"<a:entry xmlns:a="http://www.w3.org/2005/Atom"><a:title>Ok</a:title></a:entry>"#;
        assert_eq!(parse_feed_entry(xml).unwrap().title, "Ok");
    }
}
