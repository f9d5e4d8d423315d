//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-driven timers, plus the host clock for the speed ramp
//! - Randomness only from the rng handed to `tick`
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod avalanche;
pub mod collision;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::Aabb;
pub use state::{
    Avalanche, AvalancheParticle, GamePhase, GameState, Obstacle, ObstacleKind, Player,
    SessionReport, TrailPoint,
};
pub use tick::{TickEvents, TickInput, tick};
