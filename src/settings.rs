//! Game settings and tunables
//!
//! Loaded from JSON; any missing field takes its default.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Behavior;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Camera placement handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraParams {
    pub eye: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            eye: CAMERA_EYE,
            look_at: CAMERA_LOOK_AT,
            up: CAMERA_UP,
        }
    }
}

/// Game settings/tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Physics ===
    /// Longest physics slice (seconds)
    pub frame_length: f32,
    /// Largest frame delta the timer reports (seconds)
    pub max_frame_delta: f32,
    /// Ring-out radius
    pub arena_radius: f32,
    /// Width of each block
    pub body_diameter: f32,

    // === Round setup ===
    pub player_spawn: Vec3,
    pub opponent_spawn: Vec3,
    /// Pin the opponent tier instead of rolling one each round
    pub fixed_behavior: Option<Behavior>,
    /// RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,

    // === Presentation ===
    pub camera: CameraParams,
    /// Narrower windows pause the game
    pub min_window_width: f32,

    // === Storage ===
    pub save_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_length: FRAME_LENGTH,
            max_frame_delta: MAX_FRAME_DELTA,
            arena_radius: ARENA_RADIUS,
            body_diameter: BODY_DIAMETER,

            player_spawn: PLAYER_SPAWN,
            opponent_spawn: OPPONENT_SPAWN,
            fixed_behavior: None,
            seed: None,

            camera: CameraParams::default(),
            min_window_width: MIN_WINDOW_WIDTH,

            save_prefix: SAVE_PREFIX.to_string(),
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from a file; a missing file yields the defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("frame_length", self.frame_length)?;
        positive("max_frame_delta", self.max_frame_delta)?;
        positive("arena_radius", self.arena_radius)?;
        positive("body_diameter", self.body_diameter)?;
        if !self.player_spawn.is_finite() || !self.opponent_spawn.is_finite() {
            return Err(SettingsError::Invalid {
                field: "spawn",
                reason: "spawn points must be finite".to_string(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::Invalid {
            field,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}
