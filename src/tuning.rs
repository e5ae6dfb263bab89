//! Data-driven game balance
//!
//! Every gameplay constant lives here so variants of the game can be
//! expressed as JSON instead of code changes. Missing fields fall back to
//! the defaults below.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::ObstacleKind;

/// Fixed footprint of one obstacle kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleShape {
    pub width: f32,
    pub height: f32,
    /// Top edge sits this far above the ground line
    pub lift: f32,
}

/// Rejected tuning values
#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(String),
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must be within [0, 1] (got {value})")]
    NotAProbability { field: &'static str, value: f64 },
    #[error("initial obstacle speed {initial} exceeds the maximum {max}")]
    SpeedAboveMax { initial: f32, max: f32 },
    #[error("rider rest height {rest_y} is above the top clamp {min_y}")]
    RiderDoesNotFit { rest_y: f32, min_y: f32 },
}

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Play field ===
    pub field_width: f32,
    pub field_height: f32,
    pub ground_y: f32,

    // === Rider ===
    pub rider_x: f32,
    pub rider_width: f32,
    pub rider_height: f32,
    pub rider_offset: f32,
    /// Top clamp (head bump)
    pub min_y: f32,
    /// Upward impulse (negative is up)
    pub jump_velocity: f32,
    /// Speed stat spent on every accepted jump
    pub jump_speed_penalty: u32,
    /// Jump requests closer than this to the last accepted jump are dropped
    pub jump_cooldown_ms: f64,
    /// Gravity while ascending (vy below the threshold)
    pub gravity_up: f32,
    /// Gravity while descending
    pub gravity_down: f32,
    pub gravity_threshold: f32,
    /// Velocity kept after landing so the rider stays in contact
    pub ground_contact_velocity: f32,

    // === Obstacles ===
    pub stone: ObstacleShape,
    pub car: ObstacleShape,
    /// Probability that a spawn is a car
    pub car_chance: f32,
    /// Spawn x is this far past the right edge
    pub spawn_margin: f32,
    /// Minimum distance the last obstacle must have covered from the right edge
    pub min_spacing: f32,
    /// Score at which a second obstacle may be live
    pub tier_threshold: u64,
    pub obstacles_below_tier: usize,
    pub obstacles_at_tier: usize,

    // === Difficulty ===
    pub initial_obstacle_speed: f32,
    pub max_obstacle_speed: f32,
    pub ramp_interval: u64,
    pub ramp_increment: f32,
    pub max_speed: u32,

    // === Fire trail ===
    pub particle_burst: usize,
    pub particle_y_offset: f32,
    pub particle_min_radius: f32,
    pub particle_radius_spread: f32,
    pub particle_max_rise: f32,
    pub particle_drift: f32,
    pub particle_fade: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            ground_y: GROUND_Y,

            rider_x: RIDER_X,
            rider_width: RIDER_SIZE,
            rider_height: RIDER_SIZE,
            rider_offset: RIDER_OFFSET,
            min_y: 1.0,
            jump_velocity: -18.0,
            jump_speed_penalty: 190,
            jump_cooldown_ms: 100.0,
            gravity_up: 0.2,
            gravity_down: 0.2,
            gravity_threshold: 1.0,
            ground_contact_velocity: 0.2,

            stone: ObstacleShape {
                width: 55.0,
                height: 50.0,
                lift: 30.0,
            },
            car: ObstacleShape {
                width: 90.0,
                height: 60.0,
                lift: 40.0,
            },
            car_chance: 0.3,
            spawn_margin: 10.0,
            min_spacing: 515.0,
            tier_threshold: 7777,
            obstacles_below_tier: 1,
            obstacles_at_tier: 2,

            initial_obstacle_speed: 4.0,
            max_obstacle_speed: 8.0,
            ramp_interval: 500,
            ramp_increment: 0.1,
            max_speed: 777,

            particle_burst: 5,
            particle_y_offset: 20.0,
            particle_min_radius: 3.0,
            particle_radius_spread: 5.0,
            particle_max_rise: 2.0,
            particle_drift: 2.0,
            particle_fade: 0.03,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Rider y when standing on the road
    pub fn rest_y(&self) -> f32 {
        self.ground_y - self.rider_height - self.rider_offset
    }

    pub fn shape(&self, kind: ObstacleKind) -> ObstacleShape {
        match kind {
            ObstacleKind::Stone => self.stone,
            ObstacleKind::Car => self.car,
        }
    }

    /// Live obstacle cap for the given score
    pub fn obstacle_cap(&self, score: u64) -> usize {
        if score < self.tier_threshold {
            self.obstacles_below_tier
        } else {
            self.obstacles_at_tier
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let positives: [(&'static str, f64); 10] = [
            ("field_width", self.field_width as f64),
            ("field_height", self.field_height as f64),
            ("rider_width", self.rider_width as f64),
            ("rider_height", self.rider_height as f64),
            ("stone.width", self.stone.width as f64),
            ("stone.height", self.stone.height as f64),
            ("car.width", self.car.width as f64),
            ("car.height", self.car.height as f64),
            ("ramp_interval", self.ramp_interval as f64),
            ("particle_fade", self.particle_fade as f64),
        ];
        for (field, value) in positives {
            if value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        if !(0.0..=1.0).contains(&self.car_chance) {
            return Err(TuningError::NotAProbability {
                field: "car_chance",
                value: self.car_chance as f64,
            });
        }

        if self.initial_obstacle_speed > self.max_obstacle_speed {
            return Err(TuningError::SpeedAboveMax {
                initial: self.initial_obstacle_speed,
                max: self.max_obstacle_speed,
            });
        }

        if self.rest_y() < self.min_y {
            return Err(TuningError::RiderDoesNotFit {
                rest_y: self.rest_y(),
                min_y: self.min_y,
            });
        }

        Ok(())
    }
}
