//! Read-only telemetry for the HUD

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// Values shown to the player each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub score: u64,
    pub speed: u32,
    pub elapsed_secs: f64,
    pub high_score: u64,
}

impl Telemetry {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            speed: state.speed,
            elapsed_secs: state.elapsed_secs,
            high_score: state.high_score,
        }
    }

    /// Whole elapsed seconds as zero-padded `mm:ss`
    pub fn clock_label(&self) -> String {
        let total = self.elapsed_secs.max(0.0).floor() as u64;
        format!("{:02}:{:02}", total / 60, total % 60)
    }

    pub fn score_line(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn high_score_line(&self) -> String {
        format!("Hi: {}", self.high_score)
    }

    pub fn speed_line(&self) -> String {
        format!("Speed: {}", self.speed)
    }

    pub fn time_line(&self) -> String {
        format!("Time: {}", self.clock_label())
    }
}
