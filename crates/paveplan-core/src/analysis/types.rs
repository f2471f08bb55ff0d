//! Derived analysis types.
//!
//! Everything in this file is recomputed from the store collections on every
//! read and is never persisted. Conflict and suggestion ids are derived from
//! the triggering entity ids (or slot timestamps) so that recomputing over
//! identical input yields identical findings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How urgent a derived finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

/// Classification of a scheduling conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictKind {
    CrewOverlap,
    TimeOverlap,
    Blackout,
    Capacity,
    Overtime,
}

/// The interval a conflict applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Intersection of two intervals: later start, earlier end.
    pub fn intersection(
        a_start: DateTime<Utc>,
        a_end: DateTime<Utc>,
        b_start: DateTime<Utc>,
        b_end: DateTime<Utc>,
    ) -> Self {
        Self {
            start: a_start.max(b_start),
            end: a_end.min(b_end),
        }
    }
}

/// A detected scheduling conflict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionConflict {
    /// Deterministic id derived from the triggering entities.
    pub id: String,
    pub severity: Severity,
    pub kind: ConflictKind,
    /// One or more task ids involved.
    pub task_ids: Vec<String>,
    pub description: String,
    pub window: TimeWindow,
}

/// An advisory about accessible-route or congregation-safety impact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityInsight {
    pub id: String,
    pub severity: Severity,
    pub task_id: String,
    pub description: String,
    pub recommendation: String,
}

/// Aggregate crew demand for one 30-minute bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacitySnapshot {
    /// Start of the bucket.
    pub slot: DateTime<Utc>,
    /// Sum of effective crew load of tasks touching this bucket.
    pub crew_scheduled: u32,
    /// Capacity-per-shift value at computation time.
    pub capacity: u32,
}

/// An actionable scheduling improvement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionSuggestion {
    pub id: String,
    pub message: String,
    pub related_task_ids: Vec<String>,
}

/// Complete derived analysis of the current schedule.
///
/// `capacity_timeline` is sorted ascending by slot start; that ordering is a
/// contract. Conflict, insight, and suggestion ordering is not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAnalysis {
    pub conflicts: Vec<MissionConflict>,
    pub accessibility_insights: Vec<AccessibilityInsight>,
    pub capacity_timeline: Vec<CapacitySnapshot>,
    pub suggestions: Vec<MissionSuggestion>,
}

impl ScheduleAnalysis {
    pub fn empty() -> Self {
        Self {
            conflicts: Vec::new(),
            accessibility_insights: Vec::new(),
            capacity_timeline: Vec::new(),
            suggestions: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn conflict_kind_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ConflictKind::CrewOverlap).unwrap(),
            "\"crew-overlap\""
        );
        assert_eq!(
            serde_json::to_string(&ConflictKind::TimeOverlap).unwrap(),
            "\"time-overlap\""
        );
        assert_eq!(
            serde_json::to_string(&ConflictKind::Overtime).unwrap(),
            "\"overtime\""
        );
    }

    #[test]
    fn window_intersection() {
        let at = |h| Utc.with_ymd_and_hms(2025, 6, 2, h, 0, 0).unwrap();
        let w = TimeWindow::intersection(at(9), at(12), at(10), at(14));
        assert_eq!(w.start, at(10));
        assert_eq!(w.end, at(12));
    }
}
