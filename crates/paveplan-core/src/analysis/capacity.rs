//! Slot-bucketed capacity aggregation.
//!
//! The timeline is partitioned into fixed 30-minute buckets keyed by the
//! bucket start. Every task with a positive effective crew load and positive
//! duration adds that load to every bucket its interval touches.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};

use crate::analysis::types::CapacitySnapshot;
use crate::mission::MissionTask;

/// Bucket width for capacity aggregation.
pub const SLOT_MINUTES: i64 = 30;

/// Floor a timestamp to the start of its 30-minute bucket.
pub fn slot_floor(at: DateTime<Utc>) -> DateTime<Utc> {
    let width = SLOT_MINUTES * 60;
    let secs = at.timestamp().div_euclid(width) * width;
    DateTime::from_timestamp(secs, 0).unwrap_or(at)
}

/// Build the capacity timeline, sorted ascending by slot start.
///
/// Tasks with zero crew load or a non-positive duration contribute nothing;
/// malformed ranges are tolerated rather than rejected.
pub fn build_capacity_timeline(
    tasks: &[MissionTask],
    capacity_per_shift: u32,
) -> Vec<CapacitySnapshot> {
    let mut buckets: BTreeMap<DateTime<Utc>, u32> = BTreeMap::new();

    for task in tasks {
        let load = task.crew_load();
        if load == 0 || task.end <= task.start {
            continue;
        }
        let mut slot = slot_floor(task.start);
        while slot < task.end {
            *buckets.entry(slot).or_insert(0) += load;
            slot += Duration::minutes(SLOT_MINUTES);
        }
    }

    buckets
        .into_iter()
        .map(|(slot, crew_scheduled)| CapacitySnapshot {
            slot,
            crew_scheduled,
            capacity: capacity_per_shift,
        })
        .collect()
}

/// Ids of all tasks whose interval touches the bucket starting at `slot`.
pub fn task_ids_in_slot(tasks: &[MissionTask], slot: DateTime<Utc>) -> Vec<String> {
    let slot_end = slot + Duration::minutes(SLOT_MINUTES);
    tasks
        .iter()
        .filter(|t| t.overlaps(slot, slot_end))
        .map(|t| t.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::{AccessibilityImpact, TaskPriority, TaskStatus};
    use chrono::TimeZone;

    fn task(id: &str, start_h: u32, start_m: u32, end_h: u32, end_m: u32, required: u32) -> MissionTask {
        MissionTask {
            id: id.to_string(),
            job_name: format!("Job {}", id),
            job_id: None,
            site: "Main lot".to_string(),
            start: Utc.with_ymd_and_hms(2025, 6, 2, start_h, start_m, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 6, 2, end_h, end_m, 0).unwrap(),
            crew_required: required,
            crew_assigned_ids: Vec::new(),
            status: TaskStatus::Scheduled,
            priority: TaskPriority::Standard,
            accessibility_impact: AccessibilityImpact::None,
            notes: String::new(),
            color: None,
        }
    }

    #[test]
    fn slot_floor_snaps_to_half_hour() {
        let at = Utc.with_ymd_and_hms(2025, 6, 2, 9, 47, 13).unwrap();
        assert_eq!(slot_floor(at), Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap());
        let exact = Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap();
        assert_eq!(slot_floor(exact), exact);
    }

    #[test]
    fn timeline_covers_every_touched_bucket() {
        // 9:15-10:20 touches the 9:00, 9:30, and 10:00 buckets.
        let tasks = vec![task("a", 9, 15, 10, 20, 2)];
        let timeline = build_capacity_timeline(&tasks, 4);

        let slots: Vec<_> = timeline.iter().map(|s| s.slot).collect();
        assert_eq!(
            slots,
            vec![
                Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 6, 2, 10, 0, 0).unwrap(),
            ]
        );
        assert!(timeline.iter().all(|s| s.crew_scheduled == 2 && s.capacity == 4));
    }

    #[test]
    fn overlapping_tasks_accumulate() {
        let tasks = vec![
            task("a", 9, 0, 10, 0, 1),
            task("b", 9, 0, 10, 0, 1),
            task("c", 9, 30, 10, 30, 3),
        ];
        let timeline = build_capacity_timeline(&tasks, 2);

        let nine = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let nine_thirty = Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap();
        let by_slot: std::collections::HashMap<_, _> =
            timeline.iter().map(|s| (s.slot, s.crew_scheduled)).collect();
        assert_eq!(by_slot[&nine], 2);
        assert_eq!(by_slot[&nine_thirty], 5);
    }

    #[test]
    fn zero_load_and_malformed_ranges_are_skipped() {
        let zero_load = task("a", 9, 0, 10, 0, 0);
        let mut reversed = task("b", 12, 0, 12, 0, 2);
        reversed.end = Utc.with_ymd_and_hms(2025, 6, 2, 11, 0, 0).unwrap();

        let timeline = build_capacity_timeline(&[zero_load, reversed], 2);
        assert!(timeline.is_empty());
    }

    #[test]
    fn assigned_crew_counts_when_above_required() {
        let mut t = task("a", 9, 0, 9, 30, 1);
        t.crew_assigned_ids = vec!["c1".into(), "c2".into(), "c3".into()];
        let timeline = build_capacity_timeline(&[t], 2);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline[0].crew_scheduled, 3);
    }

    #[test]
    fn task_ids_in_slot_uses_strict_overlap() {
        let tasks = vec![task("a", 9, 0, 9, 30, 1), task("b", 9, 30, 10, 0, 1)];
        let nine = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        // "b" starts exactly where the 9:00 bucket ends; it does not touch it.
        assert_eq!(task_ids_in_slot(&tasks, nine), vec!["a".to_string()]);
    }
}
