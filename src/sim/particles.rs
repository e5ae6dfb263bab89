//! Fire-trail particles emitted on jump

use glam::Vec2;

use super::rng::RandomSource;
use super::state::{Particle, Rider};
use crate::tuning::Tuning;

/// Emit a burst behind the rider
pub fn emit_burst(
    particles: &mut Vec<Particle>,
    rider: &Rider,
    tuning: &Tuning,
    rng: &mut dyn RandomSource,
) {
    for _ in 0..tuning.particle_burst {
        particles.push(Particle {
            pos: Vec2::new(rider.pos.x, rider.pos.y + tuning.particle_y_offset),
            radius: rng.next_f32() * tuning.particle_radius_spread + tuning.particle_min_radius,
            vy: -rng.next_f32() * tuning.particle_max_rise,
            alpha: 1.0,
        });
    }
}

/// Drift, rise and fade every particle, dropping the faded ones
pub fn update(particles: &mut Vec<Particle>, tuning: &Tuning) {
    for particle in particles.iter_mut() {
        particle.pos.x -= tuning.particle_drift;
        particle.pos.y += particle.vy;
        particle.alpha -= tuning.particle_fade;
    }
    particles.retain(|p| p.alpha > 0.0);
}
