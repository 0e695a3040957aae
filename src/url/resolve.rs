use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves a URI reference against a base URL
///
/// Absolute references come back in normalized form (see [`normalize_url`]). Relative
/// references (path-relative, `.`/`..` segments, scheme-relative `//host/...`,
/// query-only and fragment-only forms) are resolved against the base's scheme,
/// authority and path.
///
/// # Arguments
///
/// * `base` - The URL of the page the reference was found on
/// * `reference` - The raw attribute value
///
/// # Returns
///
/// * `Ok(Url)` - The resolved absolute URL
/// * `Err(UrlError)` - The reference cannot be turned into a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_crawl::url::resolve_reference;
///
/// let base = Url::parse("https://example.com/docs/guide/").unwrap();
/// let resolved = resolve_reference(&base, "../api").unwrap();
/// assert_eq!(resolved.as_str(), "https://example.com/docs/api");
/// ```
pub fn resolve_reference(base: &Url, reference: &str) -> UrlResult<Url> {
    base.join(reference)
        .map_err(|e| UrlError::Parse(format!("'{}': {}", reference, e)))
}

/// Parses a string that must be an absolute HTTP(S) URL with a host
pub fn parse_absolute(url_str: &str) -> UrlResult<Url> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if !is_fetchable_scheme(&url) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Returns the normalized spelling of an absolute URL
///
/// This is the form [`resolve_reference`] produces, so a normalized seed and an
/// extracted link to the same page compare equal as strings. Input that does not parse
/// is returned unchanged.
///
/// # Examples
///
/// ```
/// use ripple_crawl::url::normalize_url;
///
/// assert_eq!(normalize_url("HTTP://Example.com"), "http://example.com/");
/// ```
pub fn normalize_url(url_str: &str) -> String {
    Url::parse(url_str)
        .map(String::from)
        .unwrap_or_else(|_| url_str.to_string())
}

/// Returns true for the schemes a crawler can fetch
pub fn is_fetchable_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
