//! Host settings
//!
//! Loaded from a JSON file next to the binary. Every field has a default, so
//! a partial file only overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_SUBSTEPS, STARTING_LIVES};
use crate::sim::{LevelError, LevelId};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

impl From<LevelError> for SettingsError {
    fn from(err: LevelError) -> Self {
        SettingsError::Invalid(err.to_string())
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for cosmetic randomness
    pub seed: u64,
    /// Lives at the start of a fresh game
    pub starting_lives: u8,
    /// 1-based level a fresh game starts on
    pub first_level: u32,
    /// Cap on ticks run per `Session::advance` call
    pub max_substeps: u32,
    /// Ticks the headless runner plays before reporting
    pub demo_ticks: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 12345,
            starting_lives: STARTING_LIVES,
            first_level: LevelId::FIRST.get(),
            max_substeps: MAX_SUBSTEPS,
            demo_ticks: 3600,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and validate a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Like `load`, but any failure falls back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!(
                    "Using default settings ({}): {err}",
                    path.as_ref().display()
                );
                Self::default()
            }
        }
    }

    /// Check ranges, returning the starting level
    pub fn validate(&self) -> Result<LevelId, SettingsError> {
        if self.starting_lives == 0 {
            return Err(SettingsError::Invalid("starting_lives must be at least 1".into()));
        }
        if self.max_substeps == 0 {
            return Err(SettingsError::Invalid("max_substeps must be at least 1".into()));
        }
        Ok(LevelId::new(self.first_level)?)
    }
}
