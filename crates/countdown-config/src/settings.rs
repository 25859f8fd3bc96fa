//! Validated settings

use crate::schema::{RawAlertsConfig, RawConfig, RawStorageConfig};
use countdown_util::default_data_dir;
use std::path::PathBuf;

/// Default number of alert repeats after the first
pub const DEFAULT_REPEAT_COUNT: u32 = 5;

/// Default key of the durable slot
pub const DEFAULT_SLOT: &str = "timers";

const DEFAULT_DATABASE: &str = "countdown.db";
const DEFAULT_PLAYER: &str = "paplay";

/// Validated settings ready for use by the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub storage: StorageSettings,
    pub alerts: AlertSettings,
    pub notifications_enabled: bool,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            storage: StorageSettings::from_raw(raw.storage),
            alerts: AlertSettings::from_raw(raw.alerts),
            notifications_enabled: raw.notifications.enabled.unwrap_or(true),
        }
    }

    /// Replace the data directory (command line or environment override).
    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.storage.data_dir = dir;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage: StorageSettings::from_raw(RawStorageConfig::default()),
            alerts: AlertSettings::from_raw(RawAlertsConfig::default()),
            notifications_enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    pub database: PathBuf,
    pub slot: String,
}

impl StorageSettings {
    fn from_raw(raw: RawStorageConfig) -> Self {
        Self {
            data_dir: raw.data_dir.unwrap_or_else(default_data_dir),
            database: raw.database.unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)),
            slot: raw.slot.unwrap_or_else(|| DEFAULT_SLOT.to_string()),
        }
    }

    /// Full path of the database file.
    pub fn database_path(&self) -> PathBuf {
        if self.database.is_absolute() {
            self.database.clone()
        } else {
            self.data_dir.join(&self.database)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertSettings {
    pub repeat_count: u32,
    pub sound: Option<PathBuf>,
    pub player: Vec<String>,
    pub bell: bool,
}

impl AlertSettings {
    fn from_raw(raw: RawAlertsConfig) -> Self {
        Self {
            repeat_count: raw.repeat_count.unwrap_or(DEFAULT_REPEAT_COUNT),
            sound: raw.sound,
            player: raw
                .player
                .unwrap_or_else(|| vec![DEFAULT_PLAYER.to_string()]),
            bell: raw.bell.unwrap_or(true),
        }
    }
}
