use url::Url;

/// Resolves an href found on a listing page into an absolute link
///
/// Returns `None` when the href cannot produce a fetchable document link:
/// - empty or fragment-only hrefs
/// - `javascript:`, `mailto:`, `tel:` and `data:` schemes
/// - hrefs that fail to join against `base_url`
/// - anything that is not HTTP(S) after resolution
///
/// # Examples
///
/// ```
/// use docket::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.gov/list").unwrap();
/// assert_eq!(
///     resolve_link("/docs/a.pdf", &base),
///     Some("https://example.gov/docs/a.pdf".to_string())
/// );
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) if matches!(absolute_url.scheme(), "http" | "https") => {
            Some(absolute_url.to_string())
        }
        _ => None,
    }
}
