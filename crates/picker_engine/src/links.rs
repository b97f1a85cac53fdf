use std::sync::LazyLock;

use picker_core::CrawledLink;
use scraper::{Html, Selector};
use url::Url;

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// An href that could not be turned into an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedLink {
    pub href: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkExtraction {
    pub links: Vec<CrawledLink>,
    pub unresolved: Vec<UnresolvedLink>,
}

/// Every `<a href>` in document order, resolved against `base`.
///
/// The label is the anchor's text content with whitespace collapsed, so
/// nested markup such as `<a><b>Game</b> (USA)</a>` yields `Game (USA)`.
pub fn extract_links(html: &str, base: &Url) -> LinkExtraction {
    let document = Html::parse_document(html);
    let mut extraction = LinkExtraction::default();

    for anchor in document.select(&ANCHOR_SELECTOR) {
        let Some(raw) = anchor.value().attr("href") else {
            continue;
        };
        match resolve_href(raw, base) {
            Ok(Some(href)) => {
                let text = collapse_whitespace(&anchor.text().collect::<String>());
                extraction.links.push(CrawledLink { href, text });
            }
            Ok(None) => {}
            Err(err) => extraction.unresolved.push(UnresolvedLink {
                href: raw.to_string(),
                reason: err.to_string(),
            }),
        }
    }

    extraction
}

/// `Ok(None)` for references that never point at a file: fragments,
/// queries on the same page, scripts and mail links.
fn resolve_href(reference: &str, base: &Url) -> Result<Option<Url>, url::ParseError> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#')
        || lower.starts_with('?')
        || lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
    {
        return Ok(None);
    }
    match Url::parse(trimmed) {
        Ok(url) => Ok(Some(url)),
        Err(url::ParseError::RelativeUrlWithoutBase) => base.join(trimmed).map(Some),
        Err(err) => Err(err),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
