//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per frame, no wall-clock time
//! - Seeded RNG only
//! - Obstacles kept in spawn order
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod chart;
pub mod collision;
pub mod physics;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{Hitbox, detect_crash};
pub use state::{
    Ceo, Chart, CrashCause, GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, PowerUp,
};
pub use tick::{TickInput, scroll_speed, tick};
