//! Listing page extraction
//!
//! Turns the markup of a listing page into an ordered list of document
//! descriptors. Each source family knows where documents live in its markup:
//! - Document centers wrap each entry in a `.document-item` block
//! - Link lists expose documents as plain anchors to downloadable files
//! - Custom sources provide their own item, title and link selectors

use crate::config::{FamilyName, SourceEntry};
use crate::url::{normalize_url, resolve_link};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// File extensions a link-list anchor must end with to count as a document
const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx", ".txt", ".htm", ".html", ".rtf"];

/// A document discovered on a listing page, before its content is resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentDescriptor {
    /// Display title, whitespace-collapsed (may be empty)
    pub title: String,

    /// Absolute link to the document
    pub link: String,

    /// Category label taken from the source
    pub doc_type: String,
}

/// Failure to make sense of a listing page
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    #[error("Unparseable listing markup: {reason}")]
    Unparseable { reason: String },
}

/// Selectors for a source with a site-specific layout
#[derive(Debug, Clone)]
pub struct CustomSelectors {
    pub item: Selector,
    pub title: Selector,
    pub link: Selector,
}

/// How documents are laid out on a source's listing page
#[derive(Debug, Clone)]
pub enum SourceFamily {
    DocumentCenter,
    LinkList,
    Custom(CustomSelectors),
}

impl SourceFamily {
    /// Builds the family for a configured source
    ///
    /// Custom sources must supply all three selectors, and each must parse.
    pub fn from_entry(entry: &SourceEntry) -> Result<Self, ConfigError> {
        match entry.family {
            FamilyName::DocumentCenter => Ok(Self::DocumentCenter),
            FamilyName::LinkList => Ok(Self::LinkList),
            FamilyName::Custom => {
                let item = required_selector(entry, "item-selector", &entry.item_selector)?;
                let title = required_selector(entry, "title-selector", &entry.title_selector)?;
                let link = required_selector(entry, "link-selector", &entry.link_selector)?;
                Ok(Self::Custom(CustomSelectors { item, title, link }))
            }
        }
    }

    /// Short name used in logs and tags
    pub fn name(&self) -> &'static str {
        match self {
            Self::DocumentCenter => FamilyName::DocumentCenter.as_str(),
            Self::LinkList => FamilyName::LinkList.as_str(),
            Self::Custom(_) => FamilyName::Custom.as_str(),
        }
    }
}

fn required_selector(
    entry: &SourceEntry,
    key: &str,
    value: &Option<String>,
) -> Result<Selector, ConfigError> {
    let css = value.as_deref().map(str::trim).unwrap_or("");
    if css.is_empty() {
        return Err(ConfigError::Validation(format!(
            "Custom source {} requires {}",
            entry.url, key
        )));
    }

    Selector::parse(css)
        .map_err(|e| ConfigError::InvalidSelector(format!("{} '{}': {}", key, css, e)))
}

/// Extracts document descriptors from a listing page
///
/// Descriptors come back in document order. Entries without a resolvable
/// link are dropped, and a link seen twice on the same page is kept once.
///
/// # Arguments
///
/// * `markup` - Raw listing page body
/// * `base_url` - URL the listing was served from, for resolving relative links
/// * `family` - Layout of the listing page
/// * `doc_type` - Category label stamped on every descriptor
///
/// # Example
///
/// ```
/// use docket::crawler::{extract, SourceFamily};
/// use url::Url;
///
/// let html = r#"<div class="document-item"><h3>Budget</h3><a href="/b.pdf">Download</a></div>"#;
/// let base = Url::parse("https://example.gov/docs").unwrap();
/// let found = extract(html, &base, &SourceFamily::DocumentCenter, "budget").unwrap();
/// assert_eq!(found[0].title, "Budget");
/// assert_eq!(found[0].link, "https://example.gov/b.pdf");
/// ```
pub fn extract(
    markup: &str,
    base_url: &Url,
    family: &SourceFamily,
    doc_type: &str,
) -> Result<Vec<DocumentDescriptor>, ExtractError> {
    check_markup(markup)?;

    let document = Html::parse_document(markup);
    let candidates = match family {
        SourceFamily::DocumentCenter => extract_document_center(&document, base_url),
        SourceFamily::LinkList => extract_link_list(&document, base_url),
        SourceFamily::Custom(selectors) => extract_custom(&document, base_url, selectors),
    };

    // Keyed like the store's natural key so cosmetic variants collapse here too
    let mut seen = HashSet::new();
    let descriptors = candidates
        .into_iter()
        .filter(|(_, link)| {
            let key = normalize_url(link)
                .map(String::from)
                .unwrap_or_else(|_| link.clone());
            seen.insert(key)
        })
        .map(|(title, link)| DocumentDescriptor {
            title,
            link,
            doc_type: doc_type.to_string(),
        })
        .collect();

    Ok(descriptors)
}

/// Rejects bodies that cannot be listing markup at all
fn check_markup(markup: &str) -> Result<(), ExtractError> {
    let reason = if markup.trim().is_empty() {
        "empty body"
    } else if markup.contains('\0') {
        "binary payload"
    } else if !markup.contains('<') {
        "no markup found"
    } else {
        return Ok(());
    };

    Err(ExtractError::Unparseable {
        reason: reason.to_string(),
    })
}

fn extract_document_center(document: &Html, base_url: &Url) -> Vec<(String, String)> {
    let (Ok(item_sel), Ok(title_sel), Ok(heading_sel), Ok(anchor_sel)) = (
        Selector::parse(".document-item"),
        Selector::parse(".doc-title"),
        Selector::parse("h3"),
        Selector::parse("a[href]"),
    ) else {
        return Vec::new();
    };

    document
        .select(&item_sel)
        .filter_map(|item| {
            let anchor = item.select(&anchor_sel).next()?;
            let link = resolve_link(anchor.value().attr("href")?, base_url)?;

            let title = [&title_sel, &heading_sel]
                .into_iter()
                .find_map(|sel| {
                    item.select(sel)
                        .next()
                        .map(element_text)
                        .filter(|t| !t.is_empty())
                })
                .unwrap_or_else(|| element_text(anchor));

            Some((title, link))
        })
        .collect()
}

fn extract_link_list(document: &Html, base_url: &Url) -> Vec<(String, String)> {
    let Ok(anchor_sel) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&anchor_sel)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let link = resolve_link(href, base_url)?;

            let downloadable = anchor.value().attr("download").is_some();
            if !downloadable && !has_document_extension(&link) {
                return None;
            }

            let mut title = element_text(anchor);
            if title.is_empty() {
                title = anchor
                    .value()
                    .attr("title")
                    .map(collapse_whitespace)
                    .unwrap_or_default();
            }

            Some((title, link))
        })
        .collect()
}

fn extract_custom(
    document: &Html,
    base_url: &Url,
    selectors: &CustomSelectors,
) -> Vec<(String, String)> {
    document
        .select(&selectors.item)
        .filter_map(|item| {
            let link_el = item.select(&selectors.link).next()?;
            let link = resolve_link(link_el.value().attr("href")?, base_url)?;

            let title = item
                .select(&selectors.title)
                .next()
                .map(element_text)
                .unwrap_or_default();

            Some((title, link))
        })
        .collect()
}

/// Checks the link's path (not its query) for a document extension
fn has_document_extension(link: &str) -> bool {
    let path = Url::parse(link)
        .map(|u| u.path().to_ascii_lowercase())
        .unwrap_or_default();

    DOCUMENT_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

fn element_text(element: ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Collapses runs of whitespace into single spaces and trims the ends
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
