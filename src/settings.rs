//! Simulation settings
//!
//! Tunables the driver reads every tick. Loaded from JSON; missing fields
//! fall back to the defaults in `consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::LoadError;

/// Simulation tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Timing ===
    /// Longest substep a frame delta is split into (seconds)
    pub max_step: f32,
    /// Most substeps one frame may run
    pub max_substeps: u32,
    /// Seconds a won/lost level keeps animating before it is finished
    pub finish_delay: f32,

    // === Player movement ===
    /// Horizontal run speed (tiles/s)
    pub player_x_speed: f32,
    /// Downward acceleration (tiles/s²)
    pub gravity: f32,
    /// Upward speed applied on jump (tiles/s)
    pub jump_speed: f32,

    // === Determinism ===
    /// Seed for actor factories (coin phases)
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_step: MAX_STEP,
            max_substeps: MAX_SUBSTEPS,
            finish_delay: FINISH_DELAY,

            player_x_speed: PLAYER_X_SPEED,
            gravity: GRAVITY,
            jump_speed: JUMP_SPEED,

            seed: DEFAULT_SEED,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let settings: Settings = serde_json::from_str(json)?;
        log::info!("Loaded settings (seed {})", settings.seed);
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Substep length actually used; a non-positive `max_step` means "no split"
    pub fn effective_max_step(&self, dt: f32) -> f32 {
        if self.max_step > 0.0 && self.max_step.is_finite() {
            self.max_step
        } else {
            dt
        }
    }

    /// Substep cap; at least one substep always runs
    pub fn effective_max_substeps(&self) -> u32 {
        self.max_substeps.max(1)
    }
}
