//! Platformer Sim - simulation core of a tile-based 2D platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actors, obstacle grid, level status, tick)
//! - `settings`: Data-driven simulation tunables
//! - `campaign`: Level packs and the play-through driver
//! - `error`: Failures of the data-loading layers

pub mod campaign;
pub mod error;
pub mod settings;
pub mod sim;

pub use campaign::{Campaign, CampaignProgress, LevelPack};
pub use error::LoadError;
pub use settings::Settings;

/// Game rule constants
pub mod consts {
    /// Fixed simulation substep (seconds); larger frame deltas are split
    pub const MAX_STEP: f32 = 0.05;
    /// Maximum substeps per frame; time past the cap is dropped
    pub const MAX_SUBSTEPS: u32 = 64;
    /// Seconds a decided level keeps running before it counts as finished
    pub const FINISH_DELAY: f32 = 1.0;

    /// Generic actor size
    pub const ACTOR_SIZE: (f32, f32) = (1.0, 1.0);

    /// Fireball family
    pub const FIREBALL_SIZE: (f32, f32) = (1.0, 1.0);
    pub const HORIZONTAL_FIREBALL_SPEED: (f32, f32) = (2.0, 0.0);
    pub const VERTICAL_FIREBALL_SPEED: (f32, f32) = (0.0, 2.0);
    pub const FIRE_RAIN_SPEED: (f32, f32) = (0.0, 3.0);

    /// Coin bobbing
    pub const COIN_SIZE: (f32, f32) = (0.6, 0.6);
    pub const COIN_OFFSET: (f32, f32) = (0.2, 0.1);
    pub const COIN_SPRING_SPEED: f32 = 8.0;
    pub const COIN_SPRING_DIST: f32 = 0.07;

    /// Player body; spawns half a tile up so it stands on the tile below
    pub const PLAYER_SIZE: (f32, f32) = (0.8, 1.5);
    pub const PLAYER_OFFSET: (f32, f32) = (0.0, -0.5);

    /// Player movement (tiles/s, tiles/s²)
    pub const PLAYER_X_SPEED: f32 = 7.0;
    pub const GRAVITY: f32 = 30.0;
    pub const JUMP_SPEED: f32 = 17.0;

    /// Default RNG seed for coin phases
    pub const DEFAULT_SEED: u64 = 0x5EED_C014;
}
