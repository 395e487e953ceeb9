use url::Url;

/// Extracts the lowercase host from a URL
///
/// Returns `None` if the URL has no host (not possible for valid HTTP(S) URLs).
///
/// # Examples
///
/// ```
/// use url::Url;
/// use docket::url::extract_domain;
///
/// let url = Url::parse("https://NORFOLK.gov/documents").unwrap();
/// assert_eq!(extract_domain(&url), Some("norfolk.gov".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Host of a source URL in the form used as a document tag
///
/// The `www.` prefix is dropped so that `www.norfolk.gov` and `norfolk.gov`
/// tag documents identically.
pub fn host_tag(url: &Url) -> Option<String> {
    extract_domain(url).map(|host| match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    })
}
