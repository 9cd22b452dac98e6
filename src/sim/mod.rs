//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Fixed-cadence ticks only
//! - One seeded RNG, owned by the level
//! - Stable iteration order (inactive entities are skipped, never removed mid-level)
//! - Platform access only through the collaborator traits

pub mod aabb;
pub mod level;
pub mod spawn;
pub mod state;
pub mod timer;

pub use aabb::Aabb;
pub use level::{Level, LevelOutcome, LevelPhase};
pub use spawn::{PowerupScript, SpawnSchedule, SuddenDeathSpawner};
pub use state::{Ball, Obstacle, ObstacleKind, Paddle, PlayerId, Powerup, PowerupKind};
pub use timer::{Timer, TimerMode};
