//! Runtime settings
//!
//! Loaded from a JSON file. Missing fields take their defaults; an unreadable
//! or invalid file falls back to [`Settings::default`] with a warning.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::DEFAULT_FALLBACK_NAME;
use crate::tuning::Tuning;

/// Environment variable naming the settings file
pub const SETTINGS_ENV: &str = "COMMENTER_ROYALE_SETTINGS";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Match settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Name guaranteed to be in every roster
    pub fallback_name: String,
    /// RNG seed; `None` picks one from the clock
    pub seed: Option<u64>,
    /// Headless runner tick rate
    pub tick_hz: u32,
    /// Agents spawn uniformly inside [spawn_min, spawn_max]
    pub spawn_min: Vec2,
    pub spawn_max: Vec2,
    /// Camera viewport size used by the headless runner
    pub viewport_size: Vec2,
    /// Gameplay balance
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fallback_name: DEFAULT_FALLBACK_NAME.to_string(),
            seed: None,
            tick_hz: 60,
            spawn_min: Vec2::new(100.0, 100.0),
            spawn_max: Vec2::new(1180.0, 520.0),
            viewport_size: Vec2::new(1280.0, 720.0),
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from `path`
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings from `path`, falling back to defaults on any error
    pub fn load(path: &Path) -> Self {
        match Self::from_file(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Using default settings ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load from the file named by `COMMENTER_ROYALE_SETTINGS`, if set
    pub fn load_or_default() -> Self {
        match std::env::var(SETTINGS_ENV) {
            Ok(path) => Self::load(Path::new(&path)),
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let t = &self.tuning;
        if self.tick_hz == 0 {
            return Err(SettingsError::Invalid("tick_hz must be at least 1".into()));
        }
        if self.spawn_min.x > self.spawn_max.x || self.spawn_min.y > self.spawn_max.y {
            return Err(SettingsError::Invalid(
                "spawn_min must not exceed spawn_max".into(),
            ));
        }
        if self.viewport_size.x <= 0.0 || self.viewport_size.y <= 0.0 {
            return Err(SettingsError::Invalid("viewport_size must be positive".into()));
        }
        if t.grace_duration_ms == 0 || t.winner_announce_ms == 0 {
            return Err(SettingsError::Invalid(
                "grace and announcement windows must be positive".into(),
            ));
        }
        if t.boost_interval_ms == 0 {
            return Err(SettingsError::Invalid("boost_interval_ms must be positive".into()));
        }
        if t.stomp_threshold < 0.0 {
            return Err(SettingsError::Invalid("stomp_threshold must be >= 0".into()));
        }
        if t.boosted_base_multiplier < 1.0 || t.boost_step < 0.0 {
            return Err(SettingsError::Invalid(
                "speed boost must not slow agents down".into(),
            ));
        }
        Ok(())
    }

    /// Seed to use for this session
    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }
}
