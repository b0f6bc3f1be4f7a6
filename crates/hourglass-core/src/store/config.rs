//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Reminder offsets and their times of day
//! - Defaults applied to new and imported events
//! - The optional clean-up policy for long-completed events
//!
//! Configuration is stored at `~/.config/hourglass/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::event::{DEFAULT_COLOR_HEX, DEFAULT_ICON};

/// One reminder offset: whether it fires and at what local time of day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderTime {
    #[serde(default)]
    pub enabled: bool,
    /// HH:mm
    #[serde(default = "default_reminder_time")]
    pub time: String,
}

/// Which reminder offsets are active. Each offset carries its own
/// independent time of day; the platform notification layer turns these
/// into concrete fire times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemindersConfig {
    #[serde(default = "default_on_event_day")]
    pub on_event_day: ReminderTime,
    #[serde(default = "default_off")]
    pub day_before: ReminderTime,
    #[serde(default = "default_off")]
    pub week_before: ReminderTime,
    #[serde(default = "default_off")]
    pub month_before: ReminderTime,
}

/// Presentation defaults for events created without explicit picks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDefaults {
    #[serde(default = "default_color")]
    pub color_hex: String,
    #[serde(default = "default_icon")]
    pub icon_name: String,
}

/// Clean-up policy for completed non-repeating events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoDeleteConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_auto_delete_days")]
    pub after_days: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/hourglass/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub reminders: RemindersConfig,
    #[serde(default)]
    pub defaults: EventDefaults,
    #[serde(default)]
    pub auto_delete: AutoDeleteConfig,
}

// Default functions
fn default_reminder_time() -> String {
    "09:00".into()
}
fn default_on_event_day() -> ReminderTime {
    ReminderTime {
        enabled: true,
        time: default_reminder_time(),
    }
}
fn default_off() -> ReminderTime {
    ReminderTime {
        enabled: false,
        time: default_reminder_time(),
    }
}
fn default_color() -> String {
    DEFAULT_COLOR_HEX.into()
}
fn default_icon() -> String {
    DEFAULT_ICON.into()
}
fn default_auto_delete_days() -> u32 {
    30
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            on_event_day: default_on_event_day(),
            day_before: default_off(),
            week_before: default_off(),
            month_before: default_off(),
        }
    }
}

impl Default for EventDefaults {
    fn default() -> Self {
        Self {
            color_hex: default_color(),
            icon_name: default_icon(),
        }
    }
}

impl Default for AutoDeleteConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            after_days: default_auto_delete_days(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reminders: RemindersConfig::default(),
            defaults: EventDefaults::default(),
            auto_delete: AutoDeleteConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/hourglass"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed, or
    /// if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
