//! Document content resolution
//!
//! Fetches each discovered document and reduces it to plain text. HTML pages
//! are narrowed to their main content area, PDFs go through `pdf-extract`,
//! and plain text is kept as served. Any failure degrades the document to
//! "content unavailable" instead of failing the crawl.

use super::extractor::{collapse_whitespace, DocumentDescriptor};
use super::fetcher::{FetchError, Fetcher};
use scraper::{ElementRef, Html, Node, Selector};
use thiserror::Error;

/// Containers tried in order when looking for the main content of a page
const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    "#content",
    ".content",
    ".main-content",
    "section.main",
];

/// Elements whose text never counts as content
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "nav", "noscript", "template"];

/// A main-content container must hold more than this many characters
const MIN_MAIN_CONTENT_CHARS: usize = 200;

/// Paragraphs this short or shorter are treated as boilerplate
const MIN_PARAGRAPH_CHARS: usize = 20;

/// Why a document's content could not be resolved
#[derive(Debug, Clone, Error)]
pub enum ContentUnavailable {
    #[error("{0}")]
    Fetch(#[from] FetchError),

    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),

    #[error("PDF text extraction failed: {0}")]
    Pdf(String),

    #[error("Document has no extractable text")]
    Empty,
}

/// Outcome of resolving one descriptor
#[derive(Debug, Clone)]
pub enum ResolvedContent {
    Text(String),
    Unavailable(ContentUnavailable),
}

impl ResolvedContent {
    /// Text to store; empty when content is unavailable
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Unavailable(_) => String::new(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

/// Kind of body, decided from the content type with a sniffing fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Html,
    Pdf,
    PlainText,
}

/// Resolves document descriptors into text content
#[derive(Debug, Clone)]
pub struct ContentResolver {
    fetcher: Fetcher,
    max_content_length: usize,
}

impl ContentResolver {
    pub fn new(fetcher: Fetcher, max_content_length: usize) -> Self {
        Self {
            fetcher,
            max_content_length,
        }
    }

    /// Fetches and extracts the text of one document
    ///
    /// Never fails: every problem is reported as [`ResolvedContent::Unavailable`].
    pub async fn resolve(&self, descriptor: &DocumentDescriptor) -> ResolvedContent {
        match self.resolve_text(&descriptor.link).await {
            Ok(text) => ResolvedContent::Text(text),
            Err(reason) => {
                tracing::debug!(link = %descriptor.link, %reason, "Content unavailable");
                ResolvedContent::Unavailable(reason)
            }
        }
    }

    async fn resolve_text(&self, link: &str) -> Result<String, ContentUnavailable> {
        let fetched = self.fetcher.fetch_raw(link).await?;

        let text = match classify_body(&fetched.content_type, &fetched.bytes)? {
            BodyKind::Html => html_main_text(&String::from_utf8_lossy(&fetched.bytes)),
            BodyKind::PlainText => String::from_utf8_lossy(&fetched.bytes).into_owned(),
            BodyKind::Pdf => {
                let bytes = fetched.bytes;
                tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
                    .await
                    .map_err(|e| ContentUnavailable::Pdf(e.to_string()))?
                    .map_err(|e| ContentUnavailable::Pdf(e.to_string()))?
            }
        };

        finish_text(&text, self.max_content_length)
    }
}

fn classify_body(content_type: &str, bytes: &[u8]) -> Result<BodyKind, ContentUnavailable> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "text/html" | "application/xhtml+xml" => Ok(BodyKind::Html),
        "application/pdf" | "application/x-pdf" => Ok(BodyKind::Pdf),
        "text/plain" => Ok(BodyKind::PlainText),
        "" | "application/octet-stream" => Ok(sniff_body(bytes)),
        other => Err(ContentUnavailable::UnsupportedType(other.to_string())),
    }
}

fn sniff_body(bytes: &[u8]) -> BodyKind {
    if bytes.starts_with(b"%PDF") {
        BodyKind::Pdf
    } else if bytes.iter().take(1024).any(|&b| b == b'<') {
        BodyKind::Html
    } else {
        BodyKind::PlainText
    }
}

/// Normalizes whitespace and bounds the text length
fn finish_text(text: &str, max_chars: usize) -> Result<String, ContentUnavailable> {
    let normalized = normalize_whitespace(text);
    if normalized.is_empty() {
        return Err(ContentUnavailable::Empty);
    }

    Ok(truncate_chars(normalized, max_chars))
}

/// Collapses whitespace within lines and keeps paragraph breaks
fn normalize_whitespace(text: &str) -> String {
    text.split("\n\n")
        .map(collapse_whitespace)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].trim_end().to_string(),
        None => text,
    }
}

/// Extracts the readable text of an HTML page
///
/// Tries the usual main-content containers first, then falls back to the
/// page's substantial paragraphs, then to the whole body.
pub fn html_main_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut first_candidate = None;

    for css in MAIN_CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = visible_text(element);
            if text.chars().count() > MIN_MAIN_CONTENT_CHARS {
                return text;
            }
            if first_candidate.is_none() && !text.is_empty() {
                first_candidate = Some(text);
            }
        }
    }

    if let Ok(paragraph) = Selector::parse("p") {
        let paragraphs: Vec<String> = document
            .select(&paragraph)
            .map(visible_text)
            .filter(|p| p.chars().count() > MIN_PARAGRAPH_CHARS)
            .collect();
        if !paragraphs.is_empty() {
            return paragraphs.join("\n\n");
        }
    }

    if let Some(text) = first_candidate {
        return text;
    }

    Selector::parse("body")
        .ok()
        .and_then(|body| document.select(&body).next())
        .map(visible_text)
        .unwrap_or_default()
}

/// Text of an element without scripts, styles and navigation
fn visible_text(element: ElementRef) -> String {
    let mut out = String::new();
    collect_text(element, &mut out);
    collapse_whitespace(&out)
}

fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(&text.text);
                out.push(' ');
            }
            Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_text(child_element, out);
                }
            }
            _ => {}
        }
    }
}
