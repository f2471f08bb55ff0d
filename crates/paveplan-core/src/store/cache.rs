//! Local durable cache: one JSON snapshot on disk.
//!
//! The board hydrates from the snapshot at startup and rewrites it after
//! every mutation. Reading is permissive: a missing file or an unknown
//! snapshot version falls back to defaults; an unreadable or corrupt file is
//! reported through [`CacheError`] so the store can surface it without
//! failing the mutation.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CacheError;
use crate::mission::{BlackoutWindow, CrewMember, MissionTask};

/// Current snapshot layout version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything the board persists, as a single JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub tasks: Vec<MissionTask>,
    pub crew: Vec<CrewMember>,
    pub blackouts: Vec<BlackoutWindow>,
    pub capacity_per_shift: u32,
    pub last_updated: DateTime<Utc>,
}

/// Injected durable-cache collaborator.
pub trait LocalCache: Send {
    /// `Ok(None)` when no usable snapshot exists.
    fn load(&self) -> Result<Option<Snapshot>, CacheError>;
    fn save(&self, snapshot: &Snapshot) -> Result<(), CacheError>;
}

/// File-backed cache at a fixed path.
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache at `~/.config/paveplan[-dev]/board.json`.
    pub fn at_default_location() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self::new(super::data_dir()?.join("board.json")))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl LocalCache for FileCache {
    fn load(&self) -> Result<Option<Snapshot>, CacheError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| CacheError::ReadFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        let snapshot: Snapshot =
            serde_json::from_str(&raw).map_err(|e| CacheError::Corrupt(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            // A layout this build does not know; start from defaults instead
            // of guessing at a migration.
            return Ok(None);
        }
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), CacheError> {
        let raw = serde_json::to_string_pretty(snapshot)
            .map_err(|e| CacheError::Corrupt(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| CacheError::WriteFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }
}
