//! TOML-based user settings.
//!
//! Stores preferences including:
//! - Daily limit and approach threshold
//! - Unit labels and optional strength
//! - Notification preferences
//! - Onboarding completion flag
//!
//! Settings are stored at `~/.config/pouchlog/config.toml`.

use serde::{Deserialize, Serialize};

use crate::limits::LimitConfig;

use super::data_dir;
use crate::error::SettingsError;

/// Daily limit settings section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_limit")]
    pub daily_limit: i64,
    #[serde(default = "default_threshold")]
    pub approach_threshold: f64,
}

/// Display labels for the logged unit, passed through to the widget
/// projection unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitLabels {
    #[serde(default = "default_singular")]
    pub singular: String,
    #[serde(default = "default_plural")]
    pub plural: String,
}

/// Notification preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub approaching_limit: bool,
    #[serde(default = "default_true")]
    pub limit_reached: bool,
    #[serde(default)]
    pub daily_summary_enabled: bool,
    #[serde(default = "default_summary_hour")]
    pub daily_summary_hour: u32,
    #[serde(default)]
    pub daily_summary_minute: u32,
}

/// User settings.
///
/// Serialized to/from TOML at `~/.config/pouchlog/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub has_completed_onboarding: bool,
    /// Nicotine strength per unit in mg, display-only.
    #[serde(default)]
    pub strength_mg: Option<u32>,
    #[serde(default)]
    pub limit: LimitSettings,
    #[serde(default)]
    pub units: UnitLabels,
    #[serde(default)]
    pub notifications: NotificationSettings,
}

fn default_limit() -> i64 {
    10
}
fn default_threshold() -> f64 {
    0.8
}
fn default_singular() -> String {
    "pouch".into()
}
fn default_plural() -> String {
    "pouches".into()
}
fn default_true() -> bool {
    true
}
fn default_summary_hour() -> u32 {
    20
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            daily_limit: default_limit(),
            approach_threshold: default_threshold(),
        }
    }
}

impl Default for UnitLabels {
    fn default() -> Self {
        Self {
            singular: default_singular(),
            plural: default_plural(),
        }
    }
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            approaching_limit: true,
            limit_reached: true,
            daily_summary_enabled: false,
            daily_summary_hour: default_summary_hour(),
            daily_summary_minute: 0,
        }
    }
}

impl Settings {
    fn path() -> Result<std::path::PathBuf, SettingsError> {
        let dir = data_dir().map_err(|e| SettingsError::ParseFailed(e.to_string()))?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default settings cannot be written to disk.
    pub fn load() -> Result<Self, SettingsError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content)
                .map_err(|e| SettingsError::LoadFailed {
                    path,
                    message: e.to_string(),
                }),
            Err(_) => {
                let settings = Self::default();
                settings.save()?;
                Ok(settings)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the settings cannot be serialized or written.
    pub fn save(&self) -> Result<(), SettingsError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| SettingsError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| SettingsError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error. Never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// The limit configuration consumed by classification and triggers.
    pub fn limit_config(&self) -> LimitConfig {
        LimitConfig {
            enabled: self.limit.enabled,
            limit: self.limit.daily_limit,
            approach_threshold: self.limit.approach_threshold,
        }
    }

    /// Pluralized unit label for a count.
    pub fn unit_label(&self, count: i64) -> &str {
        if count == 1 {
            &self.units.singular
        } else {
            &self.units.plural
        }
    }
}
