//! Configuration validation

use crate::schema::{RawAlertsConfig, RawConfig, RawStorageConfig};
use thiserror::Error;

/// Most repeats an alert run may be configured with
pub const MAX_REPEAT_COUNT: u32 = 60;

/// Validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("storage: {0}")]
    StorageError(String),

    #[error("alerts: {0}")]
    AlertsError(String),

    #[error("repeat_count {value} exceeds maximum of {max}")]
    RepeatCountTooLarge { value: u32, max: u32 },
}

/// Validate a raw configuration, collecting every problem found
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = validate_storage(&config.storage);
    errors.extend(validate_alerts(&config.alerts));
    errors
}

fn validate_storage(storage: &RawStorageConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(slot) = &storage.slot
        && slot.trim().is_empty()
    {
        errors.push(ValidationError::StorageError("slot cannot be empty".into()));
    }

    if let Some(database) = &storage.database
        && database.as_os_str().is_empty()
    {
        errors.push(ValidationError::StorageError(
            "database cannot be empty".into(),
        ));
    }

    if let Some(dir) = &storage.data_dir
        && dir.as_os_str().is_empty()
    {
        errors.push(ValidationError::StorageError(
            "data_dir cannot be empty".into(),
        ));
    }

    errors
}

fn validate_alerts(alerts: &RawAlertsConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(count) = alerts.repeat_count
        && count > MAX_REPEAT_COUNT
    {
        errors.push(ValidationError::RepeatCountTooLarge {
            value: count,
            max: MAX_REPEAT_COUNT,
        });
    }

    if let Some(sound) = &alerts.sound
        && sound.as_os_str().is_empty()
    {
        errors.push(ValidationError::AlertsError("sound cannot be empty".into()));
    }

    if let Some(player) = &alerts.player {
        match player.first() {
            None => errors.push(ValidationError::AlertsError(
                "player must name a command".into(),
            )),
            Some(cmd) if cmd.trim().is_empty() => errors.push(ValidationError::AlertsError(
                "player command cannot be empty".into(),
            )),
            Some(_) => {}
        }
    }

    errors
}
