//! Game state and core simulation types
//!
//! Everything a run mutates lives in [`GameState`]; the controller in
//! `tick.rs` owns it together with the injected capabilities.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start
    Idle,
    /// Active gameplay
    Running,
    /// Game is paused
    Paused,
    /// Run ended on a collision
    GameOver,
}

/// Notable things that happened during a tick or an input call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Jumped,
    ObstacleSpawned(ObstacleKind),
    /// Obstacle speed after a difficulty step
    SpeedUp(f32),
    Paused,
    Resumed,
    Crashed { score: u64 },
    NewHighScore(u64),
}

/// The player's bike
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rider {
    /// Top-left corner; x never changes
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity (positive is down)
    pub vy: f32,
    pub airborne: bool,
}

impl Rider {
    /// Rider standing on the road
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.rider_x, tuning.rest_y()),
            width: tuning.rider_width,
            height: tuning.rider_height,
            vy: 0.0,
            airborne: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Low-profile box on the road
    #[default]
    Stone,
    /// Tall vehicle
    Car,
}

/// An obstacle scrolling toward the rider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner; y is fixed per kind
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    /// Right edge has not yet passed the left edge of the field
    pub fn on_screen(&self) -> bool {
        self.pos.x + self.width > 0.0
    }
}

/// A fire-trail particle (not gameplay-affecting)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub radius: f32,
    pub vy: f32,
    /// 1 when emitted, pruned at 0
    pub alpha: f32,
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub rider: Rider,
    /// Live obstacles in spawn order (oldest first)
    pub obstacles: Vec<Obstacle>,
    /// Visual particles
    #[serde(skip)]
    pub particles: Vec<Particle>,
    pub score: u64,
    /// Runner speed stat shown on the HUD
    pub speed: u32,
    /// Horizontal obstacle speed in pixels per tick
    pub obstacle_speed: f32,
    /// Seconds of unpaused play in this run
    pub elapsed_secs: f64,
    /// Best score across runs
    pub high_score: u64,
    /// Ticks simulated in this run
    pub time_ticks: u64,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Fresh state waiting for the first start
    pub fn new(tuning: &Tuning, high_score: u64) -> Self {
        Self {
            phase: GamePhase::Idle,
            rider: Rider::new(tuning),
            obstacles: Vec::new(),
            particles: Vec::new(),
            score: 0,
            speed: 0,
            obstacle_speed: tuning.initial_obstacle_speed,
            elapsed_secs: 0.0,
            high_score,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Reset all run-scoped values, keeping the high score
    pub fn reset_run(&mut self, tuning: &Tuning) {
        self.rider = Rider::new(tuning);
        self.obstacles.clear();
        self.particles.clear();
        self.score = 0;
        self.speed = 0;
        self.obstacle_speed = tuning.initial_obstacle_speed;
        self.elapsed_secs = 0.0;
        self.time_ticks = 0;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_started(&self) -> bool {
        matches!(self.phase, GamePhase::Running | GamePhase::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Ticks only advance the world in this phase
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }
}
