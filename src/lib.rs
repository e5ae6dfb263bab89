//! Road Rider - An endless-runner bike game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, game state)
//! - `renderer`: Render sink abstraction and the canvas 2D backend
//! - `platform`: Clock capability (browser/native)
//! - `persistence`: High score storage
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `hud`: Read-only telemetry for display

pub mod hud;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use hud::Telemetry;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Nominal frame duration (one tick per display frame at ~60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Play field dimensions (canvas pixels)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 300.0;
    /// Top of the road
    pub const GROUND_Y: f32 = 250.0;
    /// Road strip height drawn below the ground line
    pub const ROAD_HEIGHT: f32 = 50.0;

    /// Rider defaults
    pub const RIDER_X: f32 = 40.0;
    pub const RIDER_SIZE: f32 = 70.0;
    /// Distance from the road (negative sinks the sprite into the road)
    pub const RIDER_OFFSET: f32 = -11.0;
}
