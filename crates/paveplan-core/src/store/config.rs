//! TOML-based application configuration.
//!
//! Stores board defaults, calendar-import filters, and the remote sync
//! endpoint. Configuration is stored at `~/.config/paveplan/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::calendar::ImportOptions;
use crate::sync::{RestMirror, SyncError};

/// Board defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_capacity_per_shift")]
    pub capacity_per_shift: u32,
}

/// Calendar-import configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Substrings matched against event titles/categories, e.g. "worship".
    #[serde(default)]
    pub title_filters: Vec<String>,
    #[serde(default)]
    pub default_reason: Option<String>,
    #[serde(default = "default_max_occurrences")]
    pub max_occurrences: u32,
}

/// Remote mirror configuration. Sync stays inert until `enabled` is set and
/// a base URL is provided.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_org")]
    pub org: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/paveplan/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

// Default functions
fn default_capacity_per_shift() -> u32 {
    6
}
fn default_max_occurrences() -> u32 {
    12
}
fn default_org() -> String {
    "default".into()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            capacity_per_shift: default_capacity_per_shift(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            title_filters: Vec::new(),
            default_reason: None,
            max_occurrences: default_max_occurrences(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: String::new(),
            api_key: String::new(),
            org: default_org(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(Self::path()?, content)?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Import options derived from the `[import]` section.
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            title_filters: self.import.title_filters.clone(),
            default_reason: self.import.default_reason.clone(),
            max_occurrences: self.import.max_occurrences,
        }
    }
}

impl SyncConfig {
    /// Build the REST mirror this configuration describes, or `None` when
    /// sync is disabled or unconfigured.
    pub fn build_mirror(&self) -> Result<Option<RestMirror>, SyncError> {
        if !self.enabled || self.base_url.is_empty() {
            return Ok(None);
        }
        let api_key = if self.api_key.is_empty() {
            None
        } else {
            Some(self.api_key.as_str())
        };
        RestMirror::with_timeout(&self.base_url, api_key, &self.org, self.timeout_secs).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.board.capacity_per_shift, 6);
        assert_eq!(parsed.sync.timeout_secs, 10);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let parsed: Config = toml::from_str(
            "[import]\ntitle_filters = [\"worship\"]\n\n[sync]\nenabled = true\n",
        )
        .unwrap();
        assert_eq!(parsed.import.title_filters, vec!["worship"]);
        assert_eq!(parsed.import.max_occurrences, 12);
        assert!(parsed.sync.enabled);
        assert_eq!(parsed.sync.org, "default");
        assert_eq!(parsed.board.capacity_per_shift, 6);
    }

    #[test]
    fn disabled_sync_builds_no_mirror() {
        let cfg = Config::default();
        assert!(cfg.sync.build_mirror().unwrap().is_none());

        let enabled_without_url = SyncConfig {
            enabled: true,
            ..SyncConfig::default()
        };
        assert!(enabled_without_url.build_mirror().unwrap().is_none());

        let configured = SyncConfig {
            enabled: true,
            base_url: "http://localhost:9000".to_string(),
            ..SyncConfig::default()
        };
        assert!(configured.build_mirror().unwrap().is_some());
    }
}
