//! Mission board state store.
//!
//! [`MissionBoard`] owns the authoritative collections (tasks, crew,
//! blackout windows, capacity-per-shift) and exposes the mutation surface.
//! Every mutation applies in memory first, bumps the monotonic
//! `last_updated` stamp, rewrites the local snapshot, and then dispatches a
//! fire-and-forget remote mirror call. Readers always observe the in-memory
//! state; persistence is never visible as a race.

mod cache;
mod config;


pub use cache::{FileCache, LocalCache, Snapshot, SNAPSHOT_VERSION};
pub use config::{BoardConfig, Config, ImportConfig, SyncConfig};

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::analysis::{analyze, ScheduleAnalysis};
use crate::calendar::{extract_blackout_drafts, ImportOptions, ImportResult};
use crate::mission::{
    dedup_preserving_order, BlackoutDraft, BlackoutWindow, CrewMember, CrewMemberDraft,
    MissionTask, MissionTaskDraft, TaskStatus, Weekday,
};
use crate::notify::{Notification, Notifier, NullNotifier};
use crate::sync::{RemoteMirror, SyncStatus};

/// Capacity assumed when neither config nor caller provides one.
pub const DEFAULT_CAPACITY_PER_SHIFT: u32 = 6;

/// Returns `~/.config/paveplan[-dev]/` based on PAVEPLAN_ENV.
///
/// Set PAVEPLAN_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("PAVEPLAN_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("paveplan-dev")
    } else {
        base_dir.join("paveplan")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// The authoritative schedule state and its mutation surface.
pub struct MissionBoard {
    tasks: Vec<MissionTask>,
    crew: Vec<CrewMember>,
    blackouts: Vec<BlackoutWindow>,
    capacity_per_shift: u32,
    last_updated: DateTime<Utc>,
    /// Last local-cache failure, surfaced instead of thrown.
    persist_error: Option<String>,
    hydrated: bool,
    last_sync_at: Option<DateTime<Utc>>,
    cache: Option<Box<dyn LocalCache>>,
    mirror: Option<Arc<dyn RemoteMirror>>,
    notifier: Arc<dyn Notifier>,
}

impl MissionBoard {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY_PER_SHIFT)
    }

    pub fn with_capacity(capacity_per_shift: u32) -> Self {
        Self {
            tasks: Vec::new(),
            crew: Vec::new(),
            blackouts: Vec::new(),
            capacity_per_shift: capacity_per_shift.max(1),
            last_updated: Utc::now(),
            persist_error: None,
            hydrated: false,
            last_sync_at: None,
            cache: None,
            mirror: None,
            notifier: Arc::new(NullNotifier),
        }
    }

    /// Attach a durable cache and hydrate from its snapshot if one exists.
    pub fn with_cache(mut self, cache: Box<dyn LocalCache>) -> Self {
        match cache.load() {
            Ok(Some(snapshot)) => {
                self.tasks = snapshot.tasks;
                self.crew = snapshot.crew;
                self.blackouts = snapshot.blackouts;
                self.capacity_per_shift = snapshot.capacity_per_shift.max(1);
                self.last_updated = snapshot.last_updated;
            }
            Ok(None) => {}
            Err(err) => {
                self.persist_error = Some(err.to_string());
            }
        }
        self.cache = Some(cache);
        self
    }

    pub fn with_mirror(mut self, mirror: Arc<dyn RemoteMirror>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    // === Read surface ===

    pub fn tasks(&self) -> &[MissionTask] {
        &self.tasks
    }

    pub fn crew(&self) -> &[CrewMember] {
        &self.crew
    }

    pub fn blackouts(&self) -> &[BlackoutWindow] {
        &self.blackouts
    }

    pub fn capacity_per_shift(&self) -> u32 {
        self.capacity_per_shift
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    pub fn persist_error(&self) -> Option<&str> {
        self.persist_error.as_deref()
    }

    /// Recompute the derived analysis from the current collections.
    pub fn analysis(&self) -> ScheduleAnalysis {
        analyze(
            &self.tasks,
            &self.crew,
            &self.blackouts,
            self.capacity_per_shift,
        )
    }

    pub fn sync_status(&self) -> SyncStatus {
        SyncStatus {
            last_sync_at: self.last_sync_at,
            pending_count: 0,
            in_progress: false,
        }
    }

    // === Task operations ===

    /// Assign a fresh id and append the task.
    pub fn add_task(&mut self, draft: MissionTaskDraft) -> MissionTask {
        let task = draft.into_task(new_id());
        self.tasks.push(task.clone());
        self.after_task_upsert(task.clone());
        task
    }

    /// Replace the task with a matching id. Unknown ids are a silent no-op.
    pub fn update_task(&mut self, task: MissionTask) {
        let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) else {
            return;
        };
        *slot = task.clone();
        self.after_task_upsert(task);
    }

    /// Delete by id. Unknown ids are a no-op.
    pub fn remove_task(&mut self, id: &str) {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return;
        }
        self.touch();
        self.persist();
        let id = id.to_string();
        self.mirror_dispatch("Task sync failed", move |mirror| async move {
            mirror.delete_task(&id).await
        });
    }

    pub fn set_task_status(&mut self, id: &str, status: TaskStatus) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };
        task.status = status;
        let task = task.clone();
        self.after_task_upsert(task);
    }

    pub fn reschedule_task(&mut self, id: &str, start: DateTime<Utc>, end: DateTime<Utc>) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };
        task.start = start;
        task.end = end;
        let task = task.clone();
        self.after_task_upsert(task);
    }

    /// Replace the assigned crew with the de-duplicated input set.
    pub fn assign_crew(&mut self, id: &str, crew_ids: Vec<String>) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };
        task.crew_assigned_ids = dedup_preserving_order(crew_ids);
        let task = task.clone();
        self.after_task_upsert(task);
    }

    // === Crew operations ===

    pub fn add_crew_member(&mut self, draft: CrewMemberDraft) -> CrewMember {
        let member = draft.into_member(new_id());
        self.crew.push(member.clone());
        self.after_crew_upsert(member.clone());
        member
    }

    pub fn update_crew_member(&mut self, member: CrewMember) {
        let Some(slot) = self.crew.iter_mut().find(|m| m.id == member.id) else {
            return;
        };
        *slot = member.clone();
        self.after_crew_upsert(member);
    }

    pub fn set_crew_availability(&mut self, id: &str, availability: Option<Vec<Weekday>>) {
        let Some(member) = self.crew.iter_mut().find(|m| m.id == id) else {
            return;
        };
        member.availability = availability;
        let member = member.clone();
        self.after_crew_upsert(member);
    }

    /// Delete a crew member and strip the id from every task referencing it.
    /// Modified tasks are re-persisted.
    pub fn remove_crew_member(&mut self, id: &str) {
        let before = self.crew.len();
        self.crew.retain(|m| m.id != id);
        if self.crew.len() == before {
            return;
        }

        let mut touched_tasks = Vec::new();
        for task in &mut self.tasks {
            if task.crew_assigned_ids.iter().any(|c| c == id) {
                task.crew_assigned_ids.retain(|c| c != id);
                touched_tasks.push(task.clone());
            }
        }

        self.touch();
        self.persist();

        let id = id.to_string();
        self.mirror_dispatch("Crew sync failed", move |mirror| async move {
            mirror.delete_crew(&id).await
        });
        for task in touched_tasks {
            self.mirror_dispatch("Task sync failed", move |mirror| async move {
                mirror.upsert_task(&task).await
            });
        }
    }

    // === Blackout operations ===

    pub fn add_blackout(&mut self, draft: BlackoutDraft) -> BlackoutWindow {
        let window = draft.into_window(new_id());
        self.blackouts.push(window.clone());
        self.after_blackout_upsert(window.clone());
        window
    }

    pub fn update_blackout(&mut self, window: BlackoutWindow) {
        let Some(slot) = self.blackouts.iter_mut().find(|b| b.id == window.id) else {
            return;
        };
        *slot = window.clone();
        self.after_blackout_upsert(window);
    }

    pub fn remove_blackout(&mut self, id: &str) {
        let before = self.blackouts.len();
        self.blackouts.retain(|b| b.id != id);
        if self.blackouts.len() == before {
            return;
        }
        self.touch();
        self.persist();
        let id = id.to_string();
        self.mirror_dispatch("Blackout sync failed", move |mirror| async move {
            mirror.delete_blackout(&id).await
        });
    }

    // === Capacity ===

    /// Round to the nearest integer and clamp to a minimum of 1. Capacity is
    /// cached locally but never mirrored remotely.
    pub fn set_capacity_per_shift(&mut self, capacity: f64) {
        self.capacity_per_shift = capacity.round().max(1.0) as u32;
        self.touch();
        self.persist();
    }

    // === Calendar import ===

    /// Parse calendar text and merge the extracted windows into the blackout
    /// collection, de-duplicating on exact `(start, end)`.
    pub fn import_blackouts_from_calendar(
        &mut self,
        text: &str,
        options: &ImportOptions,
    ) -> ImportResult {
        let drafts = extract_blackout_drafts(text, options);
        if drafts.is_empty() {
            self.notifier
                .notify(Notification::info("No matching calendar events found"));
            return ImportResult::default();
        }

        let total_events = drafts.len();
        let mut created = 0;
        let mut updated = 0;
        let mut mirrored = Vec::new();

        for draft in drafts {
            let existing = self
                .blackouts
                .iter()
                .position(|b| b.start == draft.start && b.end == draft.end);
            match existing {
                Some(index) => {
                    let window = &mut self.blackouts[index];
                    window.title = draft.title;
                    window.reason = draft.reason;
                    updated += 1;
                    mirrored.push(window.clone());
                }
                None => {
                    let window = draft.into_window(new_id());
                    self.blackouts.push(window.clone());
                    created += 1;
                    mirrored.push(window);
                }
            }
        }

        self.touch();
        self.persist();
        for window in mirrored {
            self.mirror_dispatch("Blackout sync failed", move |mirror| async move {
                mirror.upsert_blackout(&window).await
            });
        }
        self.notifier.notify(Notification::success(format!(
            "Imported {} new and {} updated blackout windows",
            created, updated
        )));

        ImportResult {
            total_events,
            created,
            updated,
            skipped: total_events - created - updated,
        }
    }

    // === Remote hydration ===

    /// One-shot hydration from the remote mirror. Replaces the three record
    /// collections when the remote holds data; capacity-per-shift is
    /// intentionally left untouched. Repeat calls are no-ops.
    pub async fn hydrate(&mut self) {
        if self.hydrated {
            return;
        }
        self.hydrated = true;
        let Some(mirror) = self.mirror.clone() else {
            return;
        };

        match mirror.fetch_snapshot().await {
            Ok(Some(snapshot)) => {
                self.tasks = snapshot.tasks;
                self.crew = snapshot.crew;
                self.blackouts = snapshot.blackouts;
                self.last_sync_at = Some(Utc::now());
                self.touch();
                self.persist();
            }
            Ok(None) => {
                self.last_sync_at = Some(Utc::now());
            }
            Err(err) => {
                self.notifier.notify(Notification::error(format!(
                    "Remote hydration failed: {}",
                    err
                )));
            }
        }
    }

    // === Internals ===

    /// Bump `last_updated`, keeping it strictly monotonic even when the wall
    /// clock has not advanced.
    fn touch(&mut self) {
        let now = Utc::now();
        self.last_updated = if now > self.last_updated {
            now
        } else {
            self.last_updated + Duration::milliseconds(1)
        };
    }

    fn persist(&mut self) {
        let Some(cache) = &self.cache else {
            return;
        };
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            tasks: self.tasks.clone(),
            crew: self.crew.clone(),
            blackouts: self.blackouts.clone(),
            capacity_per_shift: self.capacity_per_shift,
            last_updated: self.last_updated,
        };
        match cache.save(&snapshot) {
            Ok(()) => self.persist_error = None,
            Err(err) => {
                self.persist_error = Some(err.to_string());
                self.notifier
                    .notify(Notification::error(format!("Local save failed: {}", err)));
            }
        }
    }

    /// Spawn a mirror call without awaiting it. Inert when no mirror is
    /// configured or no async runtime is running; each failure produces one
    /// notification and nothing else.
    fn mirror_dispatch<F, Fut>(&self, what: &'static str, call: F)
    where
        F: FnOnce(Arc<dyn RemoteMirror>) -> Fut,
        Fut: Future<Output = Result<(), crate::sync::SyncError>> + Send + 'static,
    {
        let Some(mirror) = self.mirror.clone() else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let notifier = Arc::clone(&self.notifier);
        let fut = call(mirror);
        handle.spawn(async move {
            if let Err(err) = fut.await {
                notifier.notify(Notification::error(format!("{}: {}", what, err)));
            }
        });
    }

    fn after_task_upsert(&mut self, task: MissionTask) {
        self.touch();
        self.persist();
        self.mirror_dispatch("Task sync failed", move |mirror| async move {
            mirror.upsert_task(&task).await
        });
    }

    fn after_crew_upsert(&mut self, member: CrewMember) {
        self.touch();
        self.persist();
        self.mirror_dispatch("Crew sync failed", move |mirror| async move {
            mirror.upsert_crew(&member).await
        });
    }

    fn after_blackout_upsert(&mut self, window: BlackoutWindow) {
        self.touch();
        self.persist();
        self.mirror_dispatch("Blackout sync failed", move |mirror| async move {
            mirror.upsert_blackout(&window).await
        });
    }
}

impl Default for MissionBoard {
    fn default() -> Self {
        Self::new()
    }
}
