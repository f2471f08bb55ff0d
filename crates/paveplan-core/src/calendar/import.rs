//! Blackout-draft extraction from calendar text.
//!
//! The store owns the actual create/update/dedup pass; this module turns
//! calendar text plus filter options into the flat list of draft windows the
//! store consumes.

use serde::{Deserialize, Serialize};

use crate::calendar::{expand_occurrences, parse_calendar, CalendarEvent};
use crate::mission::BlackoutDraft;

/// Options controlling calendar import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Case-insensitive substrings matched against event summary and
    /// categories. Empty accepts every event.
    #[serde(default)]
    pub title_filters: Vec<String>,
    /// Reason recorded on every imported window.
    #[serde(default)]
    pub default_reason: Option<String>,
    /// Cap on recurrence expansion per event. COUNT/UNTIL in the event bind
    /// tighter when present.
    #[serde(default = "default_max_occurrences")]
    pub max_occurrences: u32,
}

fn default_max_occurrences() -> u32 {
    12
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            title_filters: Vec::new(),
            default_reason: None,
            max_occurrences: default_max_occurrences(),
        }
    }
}

/// Outcome of one import pass.
///
/// `skipped` is always derivable to 0 under the current algorithm (every
/// draft is either created or updated); the field is kept for partial-failure
/// accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    pub total_events: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Parse calendar text and produce draft blackout windows, one per accepted
/// occurrence.
pub fn extract_blackout_drafts(text: &str, options: &ImportOptions) -> Vec<BlackoutDraft> {
    parse_calendar(text)
        .iter()
        .filter(|event| matches_filters(event, &options.title_filters))
        .flat_map(|event| {
            expand_occurrences(event, options.max_occurrences)
                .into_iter()
                .map(|(start, end)| BlackoutDraft {
                    title: event.summary.clone(),
                    start,
                    end,
                    reason: options.default_reason.clone(),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

fn matches_filters(event: &CalendarEvent, filters: &[String]) -> bool {
    if filters.is_empty() {
        return true;
    }
    let summary = event.summary.to_lowercase();
    filters.iter().any(|filter| {
        let needle = filter.to_lowercase();
        summary.contains(&needle)
            || event
                .categories
                .iter()
                .any(|category| category.to_lowercase().contains(&needle))
    })
}
