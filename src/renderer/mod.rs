//! Render sink
//!
//! The simulation hands out a [`RenderFrame`] snapshot each frame; a
//! [`Renderer`] turns it into pixels. The canvas 2D backend lives in
//! `canvas.rs` and only builds for the browser.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use crate::hud::Telemetry;
use crate::sim::{GamePhase, Obstacle, ObstacleKind, Particle, Rect};

/// Everything a renderer needs for one frame
#[derive(Debug, Clone)]
pub struct RenderFrame<'a> {
    pub field_width: f32,
    pub field_height: f32,
    pub ground_y: f32,
    pub phase: GamePhase,
    pub rider: Rect,
    /// Live obstacles with their kind
    pub obstacles: &'a [Obstacle],
    /// Live particles with position, radius and alpha
    pub particles: &'a [Particle],
    pub telemetry: Telemetry,
}

pub trait Renderer {
    fn draw(&mut self, frame: &RenderFrame<'_>);
}

/// Road strip color
pub const ROAD_COLOR: &str = "#1d1e1f";

/// Fill color for an obstacle drawn without its sprite
pub fn obstacle_fallback_color(kind: ObstacleKind) -> &'static str {
    match kind {
        ObstacleKind::Stone => "#8d6e63",
        ObstacleKind::Car => "#c62828",
    }
}

/// Orange-red fire with the particle's opacity
pub fn fire_color(alpha: f32) -> String {
    format!("rgba(255, 69, 0, {:.3})", alpha.clamp(0.0, 1.0))
}
