//! Config validation CLI tool
//!
//! Validates a countdown configuration file and reports any errors.

use countdown_config::{CURRENT_CONFIG_VERSION, ConfigError};
use countdown_util::{COUNTDOWN_CONFIG_ENV, default_config_path};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) if path == "-h" || path == "--help" => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a countdown configuration file.");
            eprintln!();
            eprintln!(
                "If no path is provided, uses ${} or {}",
                COUNTDOWN_CONFIG_ENV,
                default_path.display()
            );
            return ExitCode::from(2);
        }
        Some(path) => PathBuf::from(path),
        None => std::env::var(COUNTDOWN_CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_config_path()),
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match countdown_config::load_config(&config_path) {
        Ok(settings) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", CURRENT_CONFIG_VERSION);
            println!(
                "  Database: {}",
                settings.storage.database_path().display()
            );
            println!("  Slot: {}", settings.storage.slot);
            println!("  Alert repeats: {}", settings.alerts.repeat_count);
            match &settings.alerts.sound {
                Some(sound) => println!(
                    "  Alert sound: {} (via {})",
                    sound.display(),
                    settings.alerts.player.join(" ")
                ),
                None if settings.alerts.bell => println!("  Alert sound: terminal bell"),
                None => println!("  Alert sound: none"),
            }
            println!(
                "  Notifications: {}",
                if settings.notifications_enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver, CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
