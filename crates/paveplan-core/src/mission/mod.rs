//! Mission data model: tasks, crew members, and blackout windows.
//!
//! These are the three persisted record kinds owned by the
//! [`MissionBoard`](crate::store::MissionBoard). Everything derived from them
//! (conflicts, insights, capacity) lives in the `analysis` module and is
//! recomputed on demand.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Lifecycle status of a mission task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Planned,
    Scheduled,
    InProgress,
    Completed,
    Blocked,
}

/// Scheduling priority of a mission task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Critical,
    Standard,
    Low,
}

/// Which accessible route, if any, a task's work zone affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessibilityImpact {
    None,
    Entrance,
    Parking,
    Mobility,
    Auditorium,
    Walkway,
}

/// Day-of-week token used for crew availability.
///
/// Serialized as the lowercase three-letter token (`"sun"` .. `"sat"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Weekday {
    /// All seven days, Sunday first.
    pub fn all() -> [Weekday; 7] {
        [
            Weekday::Sun,
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ]
    }

    /// Weekday of a timestamp (UTC).
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        match at.weekday() {
            chrono::Weekday::Sun => Weekday::Sun,
            chrono::Weekday::Mon => Weekday::Mon,
            chrono::Weekday::Tue => Weekday::Tue,
            chrono::Weekday::Wed => Weekday::Wed,
            chrono::Weekday::Thu => Weekday::Thu,
            chrono::Weekday::Fri => Weekday::Fri,
            chrono::Weekday::Sat => Weekday::Sat,
        }
    }

    /// Lowercase token for display and serialization.
    pub fn token(&self) -> &'static str {
        match self {
            Weekday::Sun => "sun",
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
        }
    }
}

/// A unit of schedulable field work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionTask {
    pub id: String,
    pub job_name: String,
    /// Back-reference to an external job/estimate record. Informational only.
    pub job_id: Option<String>,
    pub site: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Minimum headcount needed on site.
    pub crew_required: u32,
    /// Assigned crew ids, ordered, de-duplicated on assignment. May exceed
    /// or fall short of `crew_required`.
    pub crew_assigned_ids: Vec<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub accessibility_impact: AccessibilityImpact,
    pub notes: String,
    /// Presentation hint, not semantically load-bearing.
    pub color: Option<String>,
}

impl MissionTask {
    /// Duration in minutes, clamped to zero for malformed ranges.
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes().max(0)
    }

    /// Effective crew load: the larger of required headcount and actual
    /// assignments.
    pub fn crew_load(&self) -> u32 {
        self.crew_required.max(self.crew_assigned_ids.len() as u32)
    }

    /// Strict interval overlap with an arbitrary window.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }

    /// Strict interval overlap with another task.
    pub fn overlaps_task(&self, other: &MissionTask) -> bool {
        self.overlaps(other.start, other.end)
    }
}

/// A mission task without its id, as submitted to
/// [`MissionBoard::add_task`](crate::store::MissionBoard::add_task).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionTaskDraft {
    pub job_name: String,
    pub job_id: Option<String>,
    pub site: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub crew_required: u32,
    pub crew_assigned_ids: Vec<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub accessibility_impact: AccessibilityImpact,
    pub notes: String,
    pub color: Option<String>,
}

impl MissionTaskDraft {
    /// Check the time range before insertion. The store itself is permissive
    /// and will accept a malformed range; callers that want strictness run
    /// this first.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_time_range(self.start, self.end)
    }

    pub(crate) fn into_task(self, id: String) -> MissionTask {
        MissionTask {
            id,
            job_name: self.job_name,
            job_id: self.job_id,
            site: self.site,
            start: self.start,
            end: self.end,
            crew_required: self.crew_required,
            crew_assigned_ids: dedup_preserving_order(self.crew_assigned_ids),
            status: self.status,
            priority: self.priority,
            accessibility_impact: self.accessibility_impact,
            notes: self.notes,
            color: self.color,
        }
    }
}

/// A crew member available for assignment to mission tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: String,
    pub name: String,
    pub role: String,
    /// Overtime ceiling, compared against assigned task durations.
    pub max_hours_per_day: f64,
    /// Working days. `None` means all seven days.
    pub availability: Option<Vec<Weekday>>,
}

impl CrewMember {
    /// Whether the member works on the given day.
    ///
    /// An empty availability list is treated like an unset one (all days);
    /// the record came from a form that never forces a selection.
    pub fn is_available_on(&self, day: Weekday) -> bool {
        match &self.availability {
            Some(days) if !days.is_empty() => days.contains(&day),
            _ => true,
        }
    }
}

/// A crew member without its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMemberDraft {
    pub name: String,
    pub role: String,
    pub max_hours_per_day: f64,
    pub availability: Option<Vec<Weekday>>,
}

impl CrewMemberDraft {
    pub(crate) fn into_member(self, id: String) -> CrewMember {
        CrewMember {
            id,
            name: self.name,
            role: self.role,
            max_hours_per_day: self.max_hours_per_day,
            availability: self.availability,
        }
    }
}

/// A period during which no task should be scheduled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlackoutWindow {
    pub id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub reason: Option<String>,
}

impl BlackoutWindow {
    /// Strict interval overlap with an arbitrary window.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }
}

/// A blackout window without its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackoutDraft {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub reason: Option<String>,
}

impl BlackoutDraft {
    pub(crate) fn into_window(self, id: String) -> BlackoutWindow {
        BlackoutWindow {
            id,
            title: self.title,
            start: self.start,
            end: self.end,
            reason: self.reason,
        }
    }
}

/// Validate that `end` is strictly after `start`.
pub fn validate_time_range(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if end <= start {
        return Err(ValidationError::InvalidTimeRange { start, end });
    }
    Ok(())
}

/// Drop duplicate entries while keeping the first occurrence of each.
pub(crate) fn dedup_preserving_order(ids: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, h, m, 0).unwrap()
    }

    #[test]
    fn task_serialization_round_trip() {
        let task = MissionTask {
            id: "t-1".to_string(),
            job_name: "Lot 4 sealcoat".to_string(),
            job_id: Some("job-9".to_string()),
            site: "North lot".to_string(),
            start: at(9, 0),
            end: at(12, 0),
            crew_required: 3,
            crew_assigned_ids: vec!["c-1".to_string(), "c-2".to_string()],
            status: TaskStatus::Scheduled,
            priority: TaskPriority::Standard,
            accessibility_impact: AccessibilityImpact::Parking,
            notes: "Coats cure overnight".to_string(),
            color: Some("#f59e0b".to_string()),
        };

        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"status\":\"scheduled\""));
        assert!(json.contains("\"accessibility_impact\":\"parking\""));
        let decoded: MissionTask = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.id, task.id);
        assert_eq!(decoded.status, TaskStatus::Scheduled);
    }

    #[test]
    fn duration_clamps_malformed_range() {
        let task = MissionTask {
            id: "t-1".to_string(),
            job_name: String::new(),
            job_id: None,
            site: String::new(),
            start: at(12, 0),
            end: at(9, 0),
            crew_required: 1,
            crew_assigned_ids: Vec::new(),
            status: TaskStatus::Planned,
            priority: TaskPriority::Low,
            accessibility_impact: AccessibilityImpact::None,
            notes: String::new(),
            color: None,
        };
        assert_eq!(task.duration_minutes(), 0);
    }

    #[test]
    fn crew_load_takes_larger_side() {
        let mut task = MissionTask {
            id: "t-1".to_string(),
            job_name: String::new(),
            job_id: None,
            site: String::new(),
            start: at(9, 0),
            end: at(10, 0),
            crew_required: 2,
            crew_assigned_ids: vec!["a".into(), "b".into(), "c".into()],
            status: TaskStatus::Planned,
            priority: TaskPriority::Standard,
            accessibility_impact: AccessibilityImpact::None,
            notes: String::new(),
            color: None,
        };
        assert_eq!(task.crew_load(), 3);
        task.crew_assigned_ids.truncate(1);
        assert_eq!(task.crew_load(), 2);
    }

    #[test]
    fn weekday_tokens_round_trip() {
        for day in Weekday::all() {
            let json = serde_json::to_string(&day).unwrap();
            assert_eq!(json, format!("\"{}\"", day.token()));
            let back: Weekday = serde_json::from_str(&json).unwrap();
            assert_eq!(back, day);
        }
    }

    #[test]
    fn availability_defaults_to_all_days() {
        let member = CrewMember {
            id: "c-1".to_string(),
            name: "Dana".to_string(),
            role: "Striper".to_string(),
            max_hours_per_day: 8.0,
            availability: None,
        };
        assert!(member.is_available_on(Weekday::Sun));

        let empty = CrewMember {
            availability: Some(Vec::new()),
            ..member.clone()
        };
        assert!(empty.is_available_on(Weekday::Wed));

        let weekdays_only = CrewMember {
            availability: Some(vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ]),
            ..member
        };
        assert!(!weekdays_only.is_available_on(Weekday::Sun));
        assert!(weekdays_only.is_available_on(Weekday::Fri));
    }

    #[test]
    fn time_range_validation() {
        assert!(validate_time_range(at(9, 0), at(10, 0)).is_ok());
        assert!(validate_time_range(at(10, 0), at(10, 0)).is_err());
        assert!(validate_time_range(at(10, 0), at(9, 0)).is_err());
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let deduped = dedup_preserving_order(vec![
            "a".to_string(),
            "b".to_string(),
            "a".to_string(),
            "c".to_string(),
            "b".to_string(),
        ]);
        assert_eq!(deduped, vec!["a", "b", "c"]);
    }
}
