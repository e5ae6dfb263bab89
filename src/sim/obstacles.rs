//! Obstacle lifecycle: spawn, advance, prune, and the difficulty ramp

use glam::Vec2;

use super::rng::RandomSource;
use super::state::{GameState, Obstacle, ObstacleKind};
use crate::tuning::Tuning;

/// Pick the kind for the next spawn
pub fn choose_kind(tuning: &Tuning, rng: &mut dyn RandomSource) -> ObstacleKind {
    if rng.next_f32() < tuning.car_chance {
        ObstacleKind::Car
    } else {
        ObstacleKind::Stone
    }
}

/// Whether the density and spacing rules allow a new obstacle
pub fn can_spawn(state: &GameState, tuning: &Tuning) -> bool {
    if state.obstacles.len() >= tuning.obstacle_cap(state.score) {
        return false;
    }
    match state.obstacles.last() {
        Some(last) => tuning.field_width - last.pos.x >= tuning.min_spacing,
        None => true,
    }
}

/// Spawn one obstacle at the right edge if the rules allow it
pub fn spawn(
    state: &mut GameState,
    tuning: &Tuning,
    rng: &mut dyn RandomSource,
) -> Option<ObstacleKind> {
    if !can_spawn(state, tuning) {
        return None;
    }

    let kind = choose_kind(tuning, rng);
    let shape = tuning.shape(kind);
    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        kind,
        pos: Vec2::new(
            tuning.field_width + tuning.spawn_margin,
            tuning.ground_y - shape.lift,
        ),
        width: shape.width,
        height: shape.height,
    });
    log::trace!("Spawned {:?} #{} at score {}", kind, id, state.score);
    Some(kind)
}

/// Scroll every obstacle left by the current obstacle speed
pub fn advance(obstacles: &mut [Obstacle], speed: f32) {
    for obstacle in obstacles.iter_mut() {
        obstacle.pos.x -= speed;
    }
}

/// Drop obstacles that have fully left the field
pub fn prune(obstacles: &mut Vec<Obstacle>) {
    obstacles.retain(Obstacle::on_screen);
}

/// Step obstacle speed up on every ramp interval boundary
///
/// Returns the new speed if it changed.
pub fn ramp_difficulty(state: &mut GameState, tuning: &Tuning) -> Option<f32> {
    if state.score % tuning.ramp_interval != 0 || state.obstacle_speed >= tuning.max_obstacle_speed
    {
        return None;
    }
    state.obstacle_speed =
        (state.obstacle_speed + tuning.ramp_increment).min(tuning.max_obstacle_speed);
    Some(state.obstacle_speed)
}
