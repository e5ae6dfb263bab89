//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only through the injected clock
//! - Randomness only through the injected random source
//! - Stable iteration order (spawn order)
//! - No drawing or platform code (the render sink only receives snapshots)

pub mod autopilot;
pub mod collision;
pub mod driver;
pub mod obstacles;
pub mod particles;
pub mod physics;
pub mod rng;
pub mod state;
pub mod tick;

pub use collision::{Rect, first_hit, overlaps};
pub use driver::{RunReport, StepDriver};
pub use physics::JumpGate;
pub use rng::{RandomSource, ScriptedRandom, SeededRandom};
pub use state::{GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, Particle, Rider};
pub use tick::{Simulation, TickOutcome};
