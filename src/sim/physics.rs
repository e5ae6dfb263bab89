//! Rider physics
//!
//! Vertical-only integration: gravity, jump impulse, and clamps at the top of
//! the field and at the road.

use serde::{Deserialize, Serialize};

use super::state::Rider;
use crate::tuning::Tuning;

/// Integrate one tick of gravity and clamp to the playable band
pub fn step_rider(rider: &mut Rider, tuning: &Tuning) {
    // Lighter gravity while still rising gives a floaty apex
    if rider.vy < tuning.gravity_threshold {
        rider.vy += tuning.gravity_up;
    } else {
        rider.vy += tuning.gravity_down;
    }

    rider.pos.y += rider.vy;

    // Head bump, not a collision
    if rider.pos.y < tuning.min_y {
        rider.pos.y = tuning.min_y;
        rider.vy = 0.0;
    }

    let rest_y = tuning.rest_y();
    if rider.pos.y >= rest_y {
        rider.pos.y = rest_y;
        rider.vy = tuning.ground_contact_velocity;
        rider.airborne = false;
    }
}

/// Apply the jump impulse if the rider is on the road
///
/// Returns true if the rider left the ground.
pub fn launch(rider: &mut Rider, tuning: &Tuning) -> bool {
    if rider.airborne {
        return false;
    }
    rider.vy = tuning.jump_velocity;
    rider.airborne = true;
    true
}

/// Rate limit for jump requests
///
/// Only accepted jumps start a new cooldown window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JumpGate {
    last_accepted_ms: Option<f64>,
}

impl JumpGate {
    pub fn allows(&self, now_ms: f64, cooldown_ms: f64) -> bool {
        match self.last_accepted_ms {
            Some(last) => now_ms - last >= cooldown_ms,
            None => true,
        }
    }

    pub fn accept(&mut self, now_ms: f64) {
        self.last_accepted_ms = Some(now_ms);
    }

    pub fn reset(&mut self) {
        self.last_accepted_ms = None;
    }
}
