//! Best-effort remote mirroring of local mutations.
//!
//! The store calls a [`RemoteMirror`] after each local mutation without
//! awaiting completion; failures surface as notifications, never as errors
//! from mutation calls, and never roll back local state. With no mirror
//! configured the whole subsystem is inert.

pub mod rest_client;

#[cfg(test)]
mod rest_client_tests;

pub use rest_client::RestMirror;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mission::{BlackoutWindow, CrewMember, MissionTask};

/// Sync error types.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Remote API error ({status}): {message}")]
    RemoteApi { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Remote mirror not configured")]
    NotConfigured,
}

/// Current sync status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncStatus {
    /// Last successful hydration or mirror call.
    pub last_sync_at: Option<DateTime<Utc>>,
    /// Number of pending changes to sync. Always 0 for the fire-and-forget
    /// adapter; kept for queue-based implementations.
    pub pending_count: usize,
    /// Whether a hydration fetch is currently in flight.
    pub in_progress: bool,
}

/// Bulk read returned by the remote store.
///
/// `capacity_per_shift` is carried for completeness but intentionally never
/// applied during hydration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteSnapshot {
    #[serde(default)]
    pub tasks: Vec<MissionTask>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
    #[serde(default)]
    pub blackouts: Vec<BlackoutWindow>,
    #[serde(default)]
    pub capacity_per_shift: Option<u32>,
}

/// Remote persistence collaborator: upsert-by-id and delete-by-id for the
/// three record kinds, plus one bulk read for hydration.
#[async_trait]
pub trait RemoteMirror: Send + Sync {
    async fn upsert_task(&self, task: &MissionTask) -> Result<(), SyncError>;
    async fn delete_task(&self, id: &str) -> Result<(), SyncError>;
    async fn upsert_crew(&self, member: &CrewMember) -> Result<(), SyncError>;
    async fn delete_crew(&self, id: &str) -> Result<(), SyncError>;
    async fn upsert_blackout(&self, window: &BlackoutWindow) -> Result<(), SyncError>;
    async fn delete_blackout(&self, id: &str) -> Result<(), SyncError>;
    /// One bulk read; `None` means the remote scope holds no data yet.
    async fn fetch_snapshot(&self) -> Result<Option<RemoteSnapshot>, SyncError>;
}
