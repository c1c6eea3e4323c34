//! Crawl statistics from a finished mirror run

use crate::crawler::MirrorReport;
use crate::state::PageState;
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Distinct path-keys visited
    pub total_pages: usize,

    /// Files written to the mirror
    pub files_written: usize,

    /// Count of path-keys by state
    pub pages_by_state: BTreeMap<PageState, usize>,

    /// Error states and their counts
    pub error_summary: BTreeMap<PageState, usize>,

    /// Path-keys deliberately left unwritten
    pub skipped: usize,
}

impl CrawlStatistics {
    pub fn from_report(report: &MirrorReport) -> Self {
        let pages_by_state: BTreeMap<_, _> = report
            .state_counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(state, count)| (*state, *count))
            .collect();

        let error_summary = pages_by_state
            .iter()
            .filter(|(state, _)| state.is_error())
            .map(|(state, count)| (*state, *count))
            .collect();

        let skipped = pages_by_state
            .iter()
            .filter(|(state, _)| state.is_skipped())
            .map(|(_, count)| *count)
            .sum();

        Self {
            total_pages: report.visited,
            files_written: report.files.len(),
            pages_by_state,
            error_summary,
            skipped,
        }
    }

    /// Share of visited path-keys that ended up on disk, in percent
    pub fn mirror_rate(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        let mirrored = self
            .pages_by_state
            .get(&PageState::Mirrored)
            .copied()
            .unwrap_or(0);
        (mirrored as f64 / self.total_pages as f64) * 100.0
    }
}

/// Logs the summary of a mirror run
///
/// Goes through `tracing` rather than stdout, which carries the record
/// stream.
pub fn log_report(report: &MirrorReport) {
    let stats = CrawlStatistics::from_report(report);

    tracing::info!(
        "Mirrored {} into {} ({} files, {} path-keys visited, {:.1}% mirrored)",
        report.origin.base(),
        report.subtree().display(),
        stats.files_written,
        stats.total_pages,
        stats.mirror_rate()
    );

    for state in PageState::all_states() {
        if let Some(count) = stats.pages_by_state.get(&state) {
            tracing::info!("  {}: {}", state, count);
        }
    }

    if stats.skipped > 0 {
        tracing::info!(
            "{} path-keys skipped (duplicates, collisions, off-origin redirects)",
            stats.skipped
        );
    }

    for (state, count) in &stats.error_summary {
        tracing::warn!("{} path-keys ended in {}", count, state);
    }
}
