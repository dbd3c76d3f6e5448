//! Booking engine configuration.
//!
//! Limits and defaults are read from a `slotbook.toml` file, with optional
//! environment-variable overrides (`SLOTBOOK_*`). Every knob has a serde
//! default, so an empty file (or no file at all) yields a working
//! configuration.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::models::WorkingWindow;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("no slotbook.toml found in standard locations")]
    NotFound,
    #[error("default working window {start}..{end} is empty")]
    EmptyWindow { start: NaiveTime, end: NaiveTime },
}

/// Tunable limits of the booking core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Furthest ahead a booking may start, in days from now.
    #[serde(default = "default_max_advance_days")]
    pub max_advance_days: i64,
    /// Shortest acceptable appointment, in minutes.
    #[serde(default = "default_min_duration_minutes")]
    pub min_duration_minutes: i64,
    /// Reminder lead time for masters that did not configure their own.
    #[serde(default = "default_reminder_hours")]
    pub default_reminder_hours: i64,
    /// Candidate spacing used when a caller does not pass an explicit step.
    #[serde(default = "default_slot_step_minutes")]
    pub slot_step_minutes: i64,
    /// Working window applied when a master has neither rules nor overrides.
    #[serde(default = "default_day_start")]
    pub default_day_start: NaiveTime,
    #[serde(default = "default_day_end")]
    pub default_day_end: NaiveTime,
    /// How often the reminder sweep polls for due notifications.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_max_advance_days() -> i64 {
    365
}

fn default_min_duration_minutes() -> i64 {
    15
}

fn default_reminder_hours() -> i64 {
    24
}

fn default_slot_step_minutes() -> i64 {
    30
}

fn default_day_start() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap()
}

fn default_day_end() -> NaiveTime {
    NaiveTime::from_hms_opt(22, 0, 0).unwrap()
}

fn default_sweep_interval_secs() -> u64 {
    300
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            max_advance_days: default_max_advance_days(),
            min_duration_minutes: default_min_duration_minutes(),
            default_reminder_hours: default_reminder_hours(),
            slot_step_minutes: default_slot_step_minutes(),
            default_day_start: default_day_start(),
            default_day_end: default_day_end(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl BookingConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations whose default window could never produce a slot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_day_start >= self.default_day_end {
            return Err(ConfigError::EmptyWindow {
                start: self.default_day_start,
                end: self.default_day_end,
            });
        }
        Ok(())
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `slotbook.toml` in the current directory, `config/`, and
    /// the parent directory.
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("slotbook.toml"),
            PathBuf::from("config/slotbook.toml"),
            PathBuf::from("../slotbook.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(ConfigError::NotFound)
    }

    /// Apply `SLOTBOOK_*` environment-variable overrides on top of the
    /// current values. Unparseable values are ignored.
    pub fn apply_env_overrides(mut self) -> Self {
        if let Some(v) = env_i64("SLOTBOOK_MAX_ADVANCE_DAYS") {
            self.max_advance_days = v;
        }
        if let Some(v) = env_i64("SLOTBOOK_MIN_DURATION_MINUTES") {
            self.min_duration_minutes = v;
        }
        if let Some(v) = env_i64("SLOTBOOK_REMINDER_HOURS") {
            self.default_reminder_hours = v;
        }
        if let Some(v) = env_i64("SLOTBOOK_SLOT_STEP_MINUTES") {
            self.slot_step_minutes = v;
        }
        if let Some(v) = env_u64("SLOTBOOK_SWEEP_INTERVAL_SECS") {
            self.sweep_interval_secs = v;
        }
        self
    }

    /// The window applied when a master has no schedule records at all.
    pub fn default_window(&self) -> WorkingWindow {
        WorkingWindow {
            start: self.default_day_start,
            end: self.default_day_end,
        }
    }
}

fn env_i64(key: &str) -> Option<i64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
