//! URL handling module for Ripple-Crawl
//!
//! This module provides reference resolution against a page URL and internal/external
//! link classification.

mod domain;
mod resolve;

use ::url::Url;

// Re-export main functions
pub use domain::same_host;
pub use resolve::{is_fetchable_scheme, normalize_url, parse_absolute, resolve_reference};

/// Where a link points relative to the page it was found on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkScope {
    /// Same host as the page
    Internal,
    /// Any other host, or no host at all
    External,
}

impl LinkScope {
    /// Returns true if a link with this scope survives the given policy
    pub fn is_followed(&self, follow_external: bool) -> bool {
        follow_external || matches!(self, Self::Internal)
    }
}

/// Classifies `link` relative to `page`
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_crawl::url::{classify_link, LinkScope};
///
/// let page = Url::parse("https://example.com/").unwrap();
/// let link = Url::parse("https://docs.example.com/").unwrap();
/// assert_eq!(classify_link(&page, &link), LinkScope::External);
/// ```
pub fn classify_link(page: &Url, link: &Url) -> LinkScope {
    if same_host(page, link) {
        LinkScope::Internal
    } else {
        LinkScope::External
    }
}
