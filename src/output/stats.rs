//! Statistics reporting for the document store
//!
//! This module loads aggregate counts and recent cycle history from the
//! store and formats them for the terminal.

use crate::storage::{CycleRecord, DocumentStore, StorageResult, StoreStats};

/// Store statistics together with recent cycle history
#[derive(Debug, Clone)]
pub struct StoreReport {
    pub stats: StoreStats,
    pub recent_cycles: Vec<CycleRecord>,
}

/// Loads statistics and the `cycles` most recent crawl cycles
pub async fn load_statistics(store: &dyn DocumentStore, cycles: u32) -> StorageResult<StoreReport> {
    let stats = store.stats().await?;
    let recent_cycles = store.recent_cycles(cycles).await?;

    Ok(StoreReport {
        stats,
        recent_cycles,
    })
}

/// Formats store statistics for display
pub fn format_statistics(report: &StoreReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();

    out.push_str("=== Document Store Statistics ===\n\n");

    out.push_str("Overview:\n");
    out.push_str(&format!("  Documents: {}\n", stats.documents));
    out.push_str(&format!(
        "  With content: {} ({:.1}%)\n",
        stats.documents_with_content,
        percentage(stats.documents_with_content, stats.documents)
    ));
    out.push_str(&format!(
        "  With location: {} ({:.1}%)\n",
        stats.documents_with_location,
        percentage(stats.documents_with_location, stats.documents)
    ));
    out.push_str(&format!("  Distinct tags: {}\n\n", stats.tags));

    if !stats.documents_by_type.is_empty() {
        out.push_str("Documents by Type:\n");
        for (doc_type, count) in &stats.documents_by_type {
            out.push_str(&format!("  {}: {}\n", doc_type, count));
        }
        out.push('\n');
    }

    if report.recent_cycles.is_empty() {
        out.push_str("No crawl cycles recorded yet.\n");
        return out;
    }

    out.push_str("Recent Cycles:\n");
    for cycle in &report.recent_cycles {
        let duration = (cycle.finished_at - cycle.started_at).num_seconds();
        out.push_str(&format!(
            "  {} ({}s): {} documents, {}/{} sources failed, {} without content, {} rejected, {} not stored{}\n",
            cycle.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
            duration,
            cycle.documents_upserted,
            cycle.sources_failed,
            cycle.sources_total,
            cycle.content_missing,
            cycle.records_rejected,
            cycle.storage_failures,
            if cycle.cancelled { " [cancelled]" } else { "" }
        ));
    }

    out
}

/// Prints statistics to stdout
pub fn print_statistics(report: &StoreReport) {
    print!("{}", format_statistics(report));
}

fn percentage(part: u64, total: u64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
