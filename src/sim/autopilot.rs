//! Demo autopilot
//!
//! Jumps when the nearest obstacle ahead is a few frames away. Used by the
//! headless binary and the browser idle mode; it plays through the same
//! `jump` entry point as a human.

use super::state::GameState;

/// Frames of lead between takeoff and the obstacle reaching the rider
pub const LEAD_TICKS: f32 = 5.0;

/// Gap from the rider's front edge to the nearest obstacle still ahead
pub fn gap_to_next_obstacle(state: &GameState) -> Option<f32> {
    let rider = state.rider.bounds();
    state
        .obstacles
        .iter()
        .map(|o| o.pos.x - rider.right())
        .filter(|gap| *gap >= 0.0)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}

pub fn should_jump(state: &GameState) -> bool {
    if !state.is_running() || state.rider.airborne {
        return false;
    }
    gap_to_next_obstacle(state)
        .map(|gap| gap <= state.obstacle_speed * LEAD_TICKS)
        .unwrap_or(false)
}
