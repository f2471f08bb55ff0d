//! Conflict & insight engine.
//!
//! [`analyze`] is a pure function of the four store collections: it detects
//! overlapping bookings, crew double-booking, blackout violations, capacity
//! overruns across 30-minute buckets, and scheduling-etiquette heuristics,
//! then emits actionable suggestions. It holds no state, never mutates its
//! inputs, and never fails for well-typed input -- malformed time ranges
//! degrade to empty findings instead of errors.

pub mod capacity;
pub mod types;

pub use capacity::{build_capacity_timeline, slot_floor, SLOT_MINUTES};
pub use types::{
    AccessibilityInsight, CapacitySnapshot, ConflictKind, MissionConflict, MissionSuggestion,
    ScheduleAnalysis, Severity, TimeWindow,
};

use chrono::{Duration, Timelike};

use crate::mission::{AccessibilityImpact, BlackoutWindow, CrewMember, MissionTask, Weekday};

/// Overtime ceiling assumed when none of a task's assigned crew resolve to a
/// known member.
const DEFAULT_MAX_HOURS_PER_DAY: f64 = 10.0;

/// Derive the complete analysis for the given schedule state.
///
/// Output ordering: `capacity_timeline` is sorted ascending by slot start
/// (contractual); conflicts, insights, and suggestions carry no ordering
/// contract beyond being the complete set of findings.
pub fn analyze(
    tasks: &[MissionTask],
    crew: &[CrewMember],
    blackouts: &[BlackoutWindow],
    capacity_per_shift: u32,
) -> ScheduleAnalysis {
    let capacity_timeline = build_capacity_timeline(tasks, capacity_per_shift);

    let mut conflicts = Vec::new();
    let mut insights = Vec::new();
    let mut suggestions = Vec::new();

    for task in tasks {
        check_overtime(task, crew, &mut conflicts);
        check_accessibility(task, &mut insights, &mut suggestions);
        check_blackouts(task, blackouts, &mut conflicts);
        check_crew_availability(task, crew, &mut conflicts);
    }

    check_pairwise_overlap(tasks, &mut conflicts);
    check_capacity_overruns(tasks, &capacity_timeline, &mut conflicts, &mut suggestions);

    ScheduleAnalysis {
        conflicts,
        accessibility_insights: insights,
        capacity_timeline,
        suggestions,
    }
}

/// Task duration against the highest daily-hours ceiling of its crew.
fn check_overtime(task: &MissionTask, crew: &[CrewMember], conflicts: &mut Vec<MissionConflict>) {
    let duration_minutes = task.duration_minutes() as f64;

    let mut allowance_hours: Option<f64> = None;
    for id in &task.crew_assigned_ids {
        if let Some(member) = crew.iter().find(|m| &m.id == id) {
            let hours = member.max_hours_per_day;
            allowance_hours = Some(allowance_hours.map_or(hours, |a| a.max(hours)));
        }
    }
    let allowance_hours = allowance_hours.unwrap_or(DEFAULT_MAX_HOURS_PER_DAY);

    if duration_minutes > allowance_hours * 60.0 {
        conflicts.push(MissionConflict {
            id: format!("overtime-{}", task.id),
            severity: Severity::Warning,
            kind: ConflictKind::Overtime,
            task_ids: vec![task.id.clone()],
            description: format!(
                "{} runs {:.1} h, past the {:.0} h/day limit for its crew",
                task.job_name,
                duration_minutes / 60.0,
                allowance_hours
            ),
            window: TimeWindow::new(task.start, task.end),
        });
    }
}

/// Scheduling-etiquette heuristics around service times and accessible routes.
fn check_accessibility(
    task: &MissionTask,
    insights: &mut Vec<AccessibilityInsight>,
    suggestions: &mut Vec<MissionSuggestion>,
) {
    let start_hour = task.start.hour();
    let end_hour = task.end.hour();

    if Weekday::from_datetime(task.start) == Weekday::Sun && start_hour < 13 && end_hour > 7 {
        insights.push(AccessibilityInsight {
            id: format!("sunday-{}", task.id),
            severity: Severity::Warning,
            task_id: task.id.clone(),
            description: format!(
                "{} is scheduled during typical Sunday services",
                task.job_name
            ),
            recommendation: "Move the work window after 1pm or to another day".to_string(),
        });
        suggestions.push(MissionSuggestion {
            id: format!("shift-sunday-{}", task.id),
            message: format!(
                "Shift {} out of the Sunday morning service window",
                task.job_name
            ),
            related_task_ids: vec![task.id.clone()],
        });
    }

    if task.accessibility_impact != AccessibilityImpact::None && start_hour < 9 {
        insights.push(AccessibilityInsight {
            id: format!("early-access-{}", task.id),
            severity: Severity::Info,
            task_id: task.id.clone(),
            description: format!(
                "{} starts before 9am and affects an accessible route",
                task.job_name
            ),
            recommendation: "Cone and sign accessible routes before crews arrive".to_string(),
        });
    }

    if end_hour >= 20 {
        insights.push(AccessibilityInsight {
            id: format!("evening-{}", task.id),
            severity: Severity::Info,
            task_id: task.id.clone(),
            description: format!("{} wraps up at or after 8pm", task.job_name),
            recommendation: "Stage temporary lighting along walkways and exits".to_string(),
        });
    }
}

fn check_blackouts(
    task: &MissionTask,
    blackouts: &[BlackoutWindow],
    conflicts: &mut Vec<MissionConflict>,
) {
    for blackout in blackouts {
        if task.overlaps(blackout.start, blackout.end) {
            conflicts.push(MissionConflict {
                id: format!("blackout-{}-{}", task.id, blackout.id),
                severity: Severity::Critical,
                kind: ConflictKind::Blackout,
                task_ids: vec![task.id.clone()],
                description: format!(
                    "{} overlaps blackout \"{}\"",
                    task.job_name, blackout.title
                ),
                window: TimeWindow::intersection(
                    task.start,
                    task.end,
                    blackout.start,
                    blackout.end,
                ),
            });
        }
    }
}

/// Assigned crew must work on the task's start weekday.
fn check_crew_availability(
    task: &MissionTask,
    crew: &[CrewMember],
    conflicts: &mut Vec<MissionConflict>,
) {
    let day = Weekday::from_datetime(task.start);
    for id in &task.crew_assigned_ids {
        let Some(member) = crew.iter().find(|m| &m.id == id) else {
            continue;
        };
        if !member.is_available_on(day) {
            conflicts.push(MissionConflict {
                id: format!("availability-{}-{}", task.id, member.id),
                severity: Severity::Warning,
                kind: ConflictKind::CrewOverlap,
                task_ids: vec![task.id.clone()],
                description: format!(
                    "{} is not available on {} but is assigned to {}",
                    member.name,
                    day.token(),
                    task.job_name
                ),
                window: TimeWindow::new(task.start, task.end),
            });
        }
    }
}

/// All unordered task pairs, each considered once.
fn check_pairwise_overlap(tasks: &[MissionTask], conflicts: &mut Vec<MissionConflict>) {
    for (i, a) in tasks.iter().enumerate() {
        for b in &tasks[i + 1..] {
            if !a.overlaps_task(b) {
                continue;
            }
            let window = TimeWindow::intersection(a.start, a.end, b.start, b.end);
            let shares_crew = a
                .crew_assigned_ids
                .iter()
                .any(|id| b.crew_assigned_ids.contains(id));

            if shares_crew {
                conflicts.push(MissionConflict {
                    id: format!("crew-overlap-{}-{}", a.id, b.id),
                    severity: Severity::Critical,
                    kind: ConflictKind::CrewOverlap,
                    task_ids: vec![a.id.clone(), b.id.clone()],
                    description: format!(
                        "{} and {} overlap with shared crew",
                        a.job_name, b.job_name
                    ),
                    window,
                });
            } else {
                conflicts.push(MissionConflict {
                    id: format!("time-overlap-{}-{}", a.id, b.id),
                    severity: Severity::Warning,
                    kind: ConflictKind::TimeOverlap,
                    task_ids: vec![a.id.clone(), b.id.clone()],
                    description: format!(
                        "{} and {} run at the same time; crews are split across sites",
                        a.job_name, b.job_name
                    ),
                    window,
                });
            }
        }
    }
}

/// One conflict and one companion suggestion per overrun bucket.
fn check_capacity_overruns(
    tasks: &[MissionTask],
    timeline: &[CapacitySnapshot],
    conflicts: &mut Vec<MissionConflict>,
    suggestions: &mut Vec<MissionSuggestion>,
) {
    for snap in timeline {
        if snap.crew_scheduled <= snap.capacity {
            continue;
        }
        let task_ids = capacity::task_ids_in_slot(tasks, snap.slot);
        let slot_label = snap.slot.format("%a %H:%M");

        conflicts.push(MissionConflict {
            id: format!("capacity-{}", snap.slot.timestamp()),
            severity: Severity::Critical,
            kind: ConflictKind::Capacity,
            task_ids: task_ids.clone(),
            description: format!(
                "{} crew scheduled at {} against a capacity of {}",
                snap.crew_scheduled, slot_label, snap.capacity
            ),
            window: TimeWindow::new(snap.slot, snap.slot + Duration::minutes(SLOT_MINUTES)),
        });
        suggestions.push(MissionSuggestion {
            id: format!("capacity-plan-{}", snap.slot.timestamp()),
            message: format!(
                "Split or reschedule work around {}: {} crew against a capacity of {}",
                slot_label, snap.crew_scheduled, snap.capacity
            ),
            related_task_ids: task_ids,
        });
    }
}
