//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (actor insertion order)
//! - No rendering or platform dependencies

pub mod actor;
pub mod level;
pub mod parser;
pub mod tick;
pub mod vector;

pub use actor::{Actor, ActorId, ActorKind, ActorType, CoinState, FireballKind};
pub use level::{Grid, Level, LevelStatus, Obstacle, Touch};
pub use parser::{ActorFactory, ActorRegistry, LevelParser};
pub use tick::{SimEvent, TickInput, tick};
pub use vector::Vector;
