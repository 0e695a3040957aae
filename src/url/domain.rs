use url::Url;

/// Returns true if both URLs have exactly the same host
///
/// Subdomains count as different hosts; scheme and port are ignored. URLs without a
/// host are never internal to anything.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use ripple_crawl::url::same_host;
///
/// let page = Url::parse("https://example.com/").unwrap();
/// let link = Url::parse("http://example.com:8080/path").unwrap();
/// assert!(same_host(&page, &link));
/// ```
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(host_a), Some(host_b)) => host_a == host_b,
        _ => false,
    }
}
