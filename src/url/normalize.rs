use crate::UrlError;
use url::Url;

/// Query parameters that identify a visitor rather than a document
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid"];

/// Normalizes a document link into its natural-key form
///
/// Two links that point at the same document through cosmetic variations
/// normalize to the same string, so re-crawls update the stored row instead of
/// inserting a duplicate.
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject schemes other than HTTP and HTTPS
/// 3. Lowercase the host and remove a `www.` prefix
/// 4. Remove dot segments, repeated slashes and a trailing slash (except root)
/// 5. Remove the fragment
/// 6. Remove tracking query parameters (`utm_*`, `fbclid`, `gclid`, `mc_eid`)
/// 7. Sort remaining query parameters; drop an empty query string
///
/// # Examples
///
/// ```
/// use docket::url::normalize_url;
///
/// let url = normalize_url("https://WWW.EXAMPLE.GOV/docs/a.pdf?utm_source=x#p2").unwrap();
/// assert_eq!(url.as_str(), "https://example.gov/docs/a.pdf");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host.to_lowercase(),
        _ => return Err(UrlError::MissingDomain),
    };
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    url.set_host(Some(&host))
        .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;

    let path = normalize_path(url.path());
    url.set_path(&path);
    url.set_fragment(None);

    if url.query().is_some() {
        match filter_and_sort_query_params(&url) {
            params if params.is_empty() => url.set_query(None),
            params => {
                url.query_pairs_mut().clear().extend_pairs(params);
            }
        }
    }

    Ok(url)
}

/// Collapses dot segments and empty segments; the result has no trailing slash
/// unless it is the root
fn normalize_path(path: &str) -> String {
    let kept = path.split('/').fold(Vec::new(), |mut kept, segment| {
        match segment {
            "" | "." => {}
            ".." => {
                kept.pop();
            }
            _ => kept.push(segment),
        }
        kept
    });

    format!("/{}", kept.join("/"))
}

/// Remaining query pairs, tracking parameters removed, ordered by key
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| {
            !key.starts_with("utm_") && !TRACKING_PARAMS.iter().any(|param| *param == key)
        })
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    params.sort_by(|a, b| a.0.cmp(&b.0));
    params
}
