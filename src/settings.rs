//! Game settings and tuning
//!
//! `Settings` holds user preferences; `Tuning` holds the gameplay knobs
//! that are configuration rather than contract (sudden-death spawn caps,
//! the speed-multiplier clamp). Both serialize to JSON and fall back to
//! defaults on any load error.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// User preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Background music on/off
    pub music_on: bool,
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            music_on: true,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Load from a JSON file, defaulting on any error.
    pub fn load(path: impl AsRef<Path>) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.as_ref().display());
                    settings
                }
                Err(err) => {
                    log::warn!("Malformed settings file, using defaults: {err}");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Persist to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    pub fn effective_sfx_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    pub fn effective_music_volume(&self) -> f32 {
        (self.master_volume * self.music_volume).clamp(0.0, 1.0)
    }
}

/// Gameplay tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Countdown per level in seconds (levels 1-3)
    pub level_time_limit: f32,
    /// Sudden death ends when a player reaches this score
    pub win_score: u32,
    /// Sudden-death spawn caps per category
    pub sudden_death_max_unbreakable: u32,
    pub sudden_death_max_breakable: u32,
    pub sudden_death_max_powerups: u32,
    /// Bounds on the accumulated ball speed multiplier
    pub multiplier_floor: f32,
    pub multiplier_ceiling: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            level_time_limit: 30.0,
            win_score: 10,
            sudden_death_max_unbreakable: 2,
            sudden_death_max_breakable: 2,
            sudden_death_max_powerups: 4,
            // Three stacked SlowDown/SpeedUp pickups either way
            multiplier_floor: 0.216,
            multiplier_ceiling: 3.375,
        }
    }
}

impl Tuning {
    pub fn clamp_multiplier(&self, multiplier: f32) -> f32 {
        multiplier.clamp(self.multiplier_floor, self.multiplier_ceiling)
    }
}
