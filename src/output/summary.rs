//! Terminal formatting for cycles, search results and documents

use crate::crawler::{CycleSummary, ItemStatus, SourceStatus};
use crate::storage::{Document, SearchHit};

/// Characters of content shown by `show` before eliding the rest
const CONTENT_PREVIEW_CHARS: usize = 1_000;

/// Formats a finished crawl cycle with one line per source
pub fn format_cycle_summary(summary: &CycleSummary) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Cycle Summary ===\n\n");
    out.push_str(&format!(
        "Started:  {}\n",
        summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str(&format!(
        "Duration: {}s\n",
        (summary.finished_at - summary.started_at).num_seconds()
    ));
    if summary.cancelled {
        out.push_str(&format!(
            "Status:   cancelled ({} documents not started)\n",
            summary.items_skipped
        ));
    }
    out.push('\n');

    out.push_str(&format!("Documents upserted: {}\n", summary.documents_upserted));
    out.push_str(&format!("Content missing:    {}\n", summary.content_missing));
    out.push_str(&format!("Records rejected:   {}\n", summary.records_rejected));
    out.push_str(&format!("Storage failures:   {}\n", summary.storage_failures));
    out.push_str(&format!(
        "Sources failed:     {} / {}\n\n",
        summary.sources_failed, summary.sources_total
    ));

    out.push_str("Sources:\n");
    for report in &summary.reports {
        let status = match &report.status {
            SourceStatus::Completed => format!("{} documents", report.documents_upserted()),
            SourceStatus::Failed(failure) => format!("FAILED: {}", failure),
            SourceStatus::Skipped => "skipped".to_string(),
        };
        out.push_str(&format!("  {} - {}\n", report.source, status));

        for item in &report.items {
            match &item.status {
                ItemStatus::Rejected(reason) => {
                    out.push_str(&format!("    rejected {}: {}\n", item.link, reason));
                }
                ItemStatus::StorageFailed(reason) => {
                    out.push_str(&format!("    not stored {}: {}\n", item.link, reason));
                }
                ItemStatus::Stored { .. } => {}
            }
        }
    }

    out
}

/// Formats ranked search results
pub fn format_search_results(query: &str, hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("No documents match \"{}\".\n", query);
    }

    let mut out = format!("{} result(s) for \"{}\":\n\n", hits.len(), query);
    for (rank, hit) in hits.iter().enumerate() {
        let title = if hit.title.is_empty() {
            "(untitled)"
        } else {
            hit.title.as_str()
        };
        out.push_str(&format!(
            "{:>3}. [{}] {} ({}, {:.3})\n     {}\n",
            rank + 1,
            hit.id,
            title,
            hit.doc_type,
            hit.relevance,
            hit.link
        ));
    }

    out
}

/// Formats a single document with its tags, location and a content preview
pub fn format_document(document: &Document) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Document {} ===\n\n", document.id));
    out.push_str(&format!("Title:   {}\n", document.title));
    out.push_str(&format!("Type:    {}\n", document.doc_type));
    out.push_str(&format!("Link:    {}\n", document.link));
    out.push_str(&format!("Source:  {}\n", document.source));
    out.push_str(&format!("Created: {}\n", document.created_at.to_rfc3339()));
    out.push_str(&format!("Updated: {}\n", document.updated_at.to_rfc3339()));

    if !document.tags.is_empty() {
        let tags: Vec<&str> = document.tags.iter().map(String::as_str).collect();
        out.push_str(&format!("Tags:    {}\n", tags.join(", ")));
    }

    if let Some(location) = &document.location {
        let mut parts = Vec::new();
        if let Some(city) = &location.city {
            parts.push(city.clone());
        }
        if let Some(zip) = &location.zip_code {
            parts.push(zip.clone());
        }
        if let Some([lat, lng]) = location.coordinates {
            parts.push(format!("{:.4}, {:.4}", lat, lng));
        }
        out.push_str(&format!(
            "Location: {} (confidence {:.1})\n",
            parts.join(" / "),
            location.confidence
        ));
    }

    out.push('\n');
    if document.content.is_empty() {
        out.push_str("(content unavailable)\n");
    } else {
        let preview: String = document.content.chars().take(CONTENT_PREVIEW_CHARS).collect();
        out.push_str(&preview);
        if preview.len() < document.content.len() {
            out.push_str(" ...");
        }
        out.push('\n');
    }

    out
}
