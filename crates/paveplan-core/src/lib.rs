//! # PavePlan Core Library
//!
//! This library provides the scheduling core for PavePlan, a
//! pavement-maintenance estimating and mission-planning application. The UI
//! chrome, map drawing, and estimator screens live elsewhere; this crate owns
//! the data the planner reasons about and everything derived from it.
//!
//! ## Architecture
//!
//! - **Mission Board**: the authoritative state store for mission tasks,
//!   crew members, blackout windows, and capacity-per-shift. Mutations apply
//!   in memory first, then persist to a local JSON snapshot and mirror to an
//!   optional remote store, fire-and-forget.
//! - **Analysis Engine**: a pure function of the store collections producing
//!   conflicts, accessibility insights, a 30-minute capacity timeline, and
//!   improvement suggestions.
//! - **Calendar Import**: ICS-style text parsing that turns recurring campus
//!   events into draft blackout windows, de-duplicated by exact time window.
//! - **Sync**: best-effort REST mirroring with one-shot startup hydration.
//!
//! ## Key Components
//!
//! - [`MissionBoard`]: state store and mutation surface
//! - [`analysis::analyze`]: conflict & insight derivation
//! - [`RestMirror`]: HTTP remote mirror
//! - [`Config`]: application configuration management

pub mod analysis;
pub mod calendar;
pub mod error;
pub mod mission;
pub mod notify;
pub mod store;
pub mod sync;

pub use analysis::{
    analyze, AccessibilityInsight, CapacitySnapshot, ConflictKind, MissionConflict,
    MissionSuggestion, ScheduleAnalysis, Severity, TimeWindow,
};
pub use calendar::{ImportOptions, ImportResult};
pub use error::{CacheError, ConfigError, CoreError, ValidationError};
pub use mission::{
    AccessibilityImpact, BlackoutDraft, BlackoutWindow, CrewMember, CrewMemberDraft, MissionTask,
    MissionTaskDraft, TaskPriority, TaskStatus, Weekday,
};
pub use notify::{BufferNotifier, Notification, Notifier, NotifyLevel, NullNotifier};
pub use store::{Config, FileCache, LocalCache, MissionBoard, Snapshot};
pub use sync::{RemoteMirror, RemoteSnapshot, RestMirror, SyncError, SyncStatus};
