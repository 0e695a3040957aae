//! HTML link extraction
//!
//! This module turns the raw bytes of a fetched page into the ordered list of links the
//! frontier should consider next:
//! - Every `<a href>` value, in document order
//! - Resolved against the page URL
//! - Deduplicated, with the page itself excluded
//! - Optionally restricted to the page's own host

use crate::url::{classify_link, is_fetchable_scheme, resolve_reference};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts the links a crawler should follow from a fetched page
///
/// # Link Extraction Rules
///
/// - Only `href` attributes of `<a>` elements are read
/// - Each value is resolved as a URI reference against `page_url`; malformed references
///   are logged and skipped
/// - The first occurrence of a resolved URL wins; later duplicates are dropped before
///   any filtering, and the page's own URL is never returned
/// - Links that are not `http`/`https` are dropped
/// - With `follow_external` unset, links to any other host are dropped
///
/// Parsing never fails: html5ever recovers from malformed markup and always reaches the
/// end of input. Invalid UTF-8 is replaced rather than rejected.
///
/// # Arguments
///
/// * `page_url` - The absolute URL the page was fetched from
/// * `page` - The response body
/// * `follow_external` - Whether links to other hosts are kept
///
/// # Example
///
/// ```
/// use ripple_crawl::crawler::extract_links;
///
/// let html = br#"<a href="/a">A</a><a href="https://x.com/a">A</a><a href="../b">B</a>
///     <a href="https://y.com/c">C</a>"#;
/// let links = extract_links("https://x.com/", html, false);
/// assert_eq!(links, vec!["https://x.com/a", "https://x.com/b"]);
/// ```
pub fn extract_links(page_url: &str, page: &[u8], follow_external: bool) -> Vec<String> {
    let base = match Url::parse(page_url) {
        Ok(base) => base,
        Err(e) => {
            tracing::warn!("Cannot extract links from {}: {}", page_url, e);
            return Vec::new();
        }
    };

    let html = String::from_utf8_lossy(page);
    let document = Html::parse_document(&html);

    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(e) => {
            tracing::error!("Invalid anchor selector: {:?}", e);
            return Vec::new();
        }
    };

    let mut emitted: HashSet<String> = HashSet::new();
    emitted.insert(page_url.to_string());
    emitted.insert(base.as_str().to_string());

    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let link = match resolve_reference(&base, href) {
            Ok(link) => link,
            Err(e) => {
                tracing::warn!("Skipping malformed link on {}: {}", page_url, e);
                continue;
            }
        };

        let link_str = link.as_str();
        if emitted.contains(link_str) {
            continue;
        }

        if !is_fetchable_scheme(&link) {
            tracing::debug!("Skipping non-HTTP link {} on {}", link_str, page_url);
            continue;
        }

        if !classify_link(&base, &link).is_followed(follow_external) {
            tracing::debug!("Skipping external link {} on {}", link_str, page_url);
            continue;
        }

        emitted.insert(link_str.to_string());
        links.push(link.into());
    }

    links
}
