//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Where the timer collection is kept
    #[serde(default)]
    pub storage: RawStorageConfig,

    /// Audible alert on expiry
    #[serde(default)]
    pub alerts: RawAlertsConfig,

    /// Expiry notifications
    #[serde(default)]
    pub notifications: RawNotificationsConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawStorageConfig {
    /// Data directory for the database
    pub data_dir: Option<PathBuf>,

    /// Database file name, relative to `data_dir` unless absolute
    pub database: Option<PathBuf>,

    /// Key of the durable slot holding the collection
    pub slot: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawAlertsConfig {
    /// Repeats after the first alert (default: 5)
    pub repeat_count: Option<u32>,

    /// Sound file played on expiry
    pub sound: Option<PathBuf>,

    /// Player command; the sound path is appended as the last argument
    pub player: Option<Vec<String>>,

    /// Ring the terminal bell when no sound is configured (default: true)
    pub bell: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RawNotificationsConfig {
    pub enabled: Option<bool>,
}
