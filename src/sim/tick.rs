//! Simulation controller
//!
//! [`Simulation`] owns the game state and the injected capabilities and
//! exposes the operations the front end calls: start/restart, pause toggle,
//! jump, and one tick. It never schedules itself; see `driver.rs` and the
//! browser loop in `main.rs`.

use super::collision::first_hit;
use super::obstacles;
use super::particles;
use super::physics::{self, JumpGate};
use super::rng::RandomSource;
use super::state::{GameEvent, GamePhase, GameState, Obstacle};
use crate::hud::Telemetry;
use crate::persistence::{self, HighScoreStore};
use crate::platform::Clock;
use crate::renderer::{RenderFrame, Renderer};
use crate::tuning::Tuning;

/// Undrained events kept before the oldest are discarded
pub const MAX_PENDING_EVENTS: usize = 1024;

/// What a tick did, so the driver knows whether to schedule another one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running (idle, paused, or over); nothing changed
    Halted,
    /// World advanced; schedule the next tick
    Continue,
    /// Rider hit an obstacle and the run ended
    Crashed { score: u64, new_high_score: bool },
}

impl TickOutcome {
    pub fn should_continue(&self) -> bool {
        matches!(self, TickOutcome::Continue)
    }
}

pub struct Simulation {
    state: GameState,
    tuning: Tuning,
    clock: Box<dyn Clock>,
    rng: Box<dyn RandomSource>,
    store: Box<dyn HighScoreStore>,
    jump_gate: JumpGate,
    /// Clock time at which the current run's elapsed time is zero
    run_origin_ms: f64,
    fire_trail: bool,
}

impl Simulation {
    /// Create an idle simulation, reading the high score from the store
    ///
    /// A tuning that fails [`Tuning::validate`] is replaced by the defaults.
    pub fn new(
        tuning: Tuning,
        clock: impl Clock + 'static,
        rng: impl RandomSource + 'static,
        store: impl HighScoreStore + 'static,
    ) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning ({}), using defaults", e);
                Tuning::default()
            }
        };
        let high_score = persistence::load_or_zero(&store);
        let state = GameState::new(&tuning, high_score);
        let run_origin_ms = clock.now_ms();
        Self {
            state,
            tuning,
            clock: Box::new(clock),
            rng: Box::new(rng),
            store: Box::new(store),
            jump_gate: JumpGate::default(),
            run_origin_ms,
            fire_trail: true,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Enable or disable the cosmetic fire trail
    pub fn set_fire_trail(&mut self, enabled: bool) {
        self.fire_trail = enabled;
        if !enabled {
            self.state.particles.clear();
        }
    }

    /// Start the first run
    pub fn start(&mut self) {
        self.restart();
    }

    /// Begin a fresh run from any phase
    pub fn restart(&mut self) {
        self.state.reset_run(&self.tuning);
        self.state.phase = GamePhase::Running;
        self.jump_gate.reset();
        self.run_origin_ms = self.clock.now_ms();
        self.emit(GameEvent::Started);
        log::info!("Run started (high score {})", self.state.high_score);
    }

    /// Pause or resume
    ///
    /// Returns true when the run resumed and the driver must schedule ticks
    /// again. Ignored unless a run is in progress.
    pub fn toggle_pause(&mut self) -> bool {
        let now = self.clock.now_ms();
        match self.state.phase {
            GamePhase::Running => {
                self.state.elapsed_secs = (now - self.run_origin_ms) / 1000.0;
                self.state.phase = GamePhase::Paused;
                self.emit(GameEvent::Paused);
                log::info!("Paused at {:.1}s", self.state.elapsed_secs);
                false
            }
            GamePhase::Paused => {
                // Shift the origin so time spent paused is not counted
                self.run_origin_ms = now - self.state.elapsed_secs * 1000.0;
                self.state.phase = GamePhase::Running;
                self.emit(GameEvent::Resumed);
                log::info!("Resumed at {:.1}s", self.state.elapsed_secs);
                true
            }
            GamePhase::Idle | GamePhase::GameOver => false,
        }
    }

    /// Request a jump
    ///
    /// Takes effect immediately, so the next tick already integrates the
    /// impulse. Returns true if the jump was accepted.
    pub fn jump(&mut self) -> bool {
        let now = self.clock.now_ms();
        if !self.jump_gate.allows(now, self.tuning.jump_cooldown_ms) {
            log::trace!("Jump dropped by cooldown");
            return false;
        }
        if !self.state.is_running() {
            return false;
        }
        if !physics::launch(&mut self.state.rider, &self.tuning) {
            return false;
        }

        self.jump_gate.accept(now);
        self.state.speed = self.state.speed.saturating_sub(self.tuning.jump_speed_penalty);
        if self.fire_trail {
            particles::emit_burst(
                &mut self.state.particles,
                &self.state.rider,
                &self.tuning,
                self.rng.as_mut(),
            );
        }
        self.emit(GameEvent::Jumped);
        true
    }

    /// Advance the world by one frame
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running() {
            return TickOutcome::Halted;
        }
        let now = self.clock.now_ms();
        self.state.time_ticks += 1;

        physics::step_rider(&mut self.state.rider, &self.tuning);

        if let Some(kind) = obstacles::spawn(&mut self.state, &self.tuning, self.rng.as_mut()) {
            self.emit(GameEvent::ObstacleSpawned(kind));
        }
        obstacles::advance(&mut self.state.obstacles, self.state.obstacle_speed);
        obstacles::prune(&mut self.state.obstacles);

        particles::update(&mut self.state.particles, &self.tuning);

        let rider_box = self.state.rider.bounds();
        let obstacle_boxes = self.state.obstacles.iter().map(Obstacle::bounds);
        if let Some(index) = first_hit(&rider_box, obstacle_boxes) {
            let kind = self.state.obstacles[index].kind;
            log::debug!("Rider hit {:?} at tick {}", kind, self.state.time_ticks);
            return self.end_run(now);
        }

        self.state.score += 1;
        if let Some(speed) = obstacles::ramp_difficulty(&mut self.state, &self.tuning) {
            log::debug!("Obstacle speed now {:.1}", speed);
            self.emit(GameEvent::SpeedUp(speed));
        }
        self.state.speed = (self.state.speed + 1).min(self.tuning.max_speed);
        self.state.elapsed_secs = (now - self.run_origin_ms) / 1000.0;

        TickOutcome::Continue
    }

    fn end_run(&mut self, now: f64) -> TickOutcome {
        let score = self.state.score;
        self.state.phase = GamePhase::GameOver;
        self.state.elapsed_secs = (now - self.run_origin_ms) / 1000.0;
        self.emit(GameEvent::Crashed { score });

        let new_high_score = score > self.state.high_score;
        if new_high_score {
            self.state.high_score = score;
            self.emit(GameEvent::NewHighScore(score));
            if let Err(e) = self.store.save(score) {
                log::warn!("Could not save high score {}: {}", score, e);
            }
        }

        log::info!(
            "Game over: score {} (high score {})",
            score,
            self.state.high_score
        );
        TickOutcome::Crashed {
            score,
            new_high_score,
        }
    }

    /// Queue an event for the front end, dropping the oldest when nobody drains
    fn emit(&mut self, event: GameEvent) {
        let events = &mut self.state.events;
        if events.len() >= MAX_PENDING_EVENTS {
            events.remove(0);
        }
        events.push(event);
    }

    /// Events since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry::from_state(&self.state)
    }

    /// Snapshot for the render sink
    pub fn frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            field_width: self.tuning.field_width,
            field_height: self.tuning.field_height,
            ground_y: self.tuning.ground_y,
            phase: self.state.phase,
            rider: self.state.rider.bounds(),
            obstacles: &self.state.obstacles,
            particles: &self.state.particles,
            telemetry: self.telemetry(),
        }
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.draw(&self.frame());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::platform::ManualClock;
    use crate::sim::rng::ScriptedRandom;

    fn sim_with(tuning: Tuning) -> (Simulation, ManualClock) {
        let clock = ManualClock::new(0.0);
        let sim = Simulation::new(
            tuning,
            clock.clone(),
            ScriptedRandom::constant(0.9),
            MemoryStore::new(),
        );
        (sim, clock)
    }

    #[test]
    fn test_idle_tick_is_halted() {
        let (mut sim, _) = sim_with(Tuning::default());
        assert_eq!(sim.tick(), TickOutcome::Halted);
        assert_eq!(sim.state().score, 0);
        assert!(sim.state().obstacles.is_empty());
    }

    #[test]
    fn test_tick_advances_score_and_speed() {
        let (mut sim, clock) = sim_with(Tuning::default());
        sim.start();
        clock.advance(16.0);
        assert_eq!(sim.tick(), TickOutcome::Continue);
        assert_eq!(sim.state().score, 1);
        assert_eq!(sim.state().speed, 1);
        assert_eq!(sim.state().obstacles.len(), 1);
        assert!((sim.state().elapsed_secs - 0.016).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_tuning_falls_back_to_defaults() {
        let (mut sim, clock) = sim_with(Tuning {
            ramp_interval: 0,
            jump_speed_penalty: 7,
            ..Default::default()
        });
        assert_eq!(sim.tuning(), &Tuning::default());

        sim.start();
        for _ in 0..10 {
            clock.advance(16.0);
            assert_eq!(sim.tick(), TickOutcome::Continue);
        }
        assert_eq!(sim.state().score, 10);
    }

    #[test]
    fn test_jump_ignored_while_idle() {
        let (mut sim, _) = sim_with(Tuning::default());
        assert!(!sim.jump());
        assert!(!sim.state().rider.airborne);
    }

    #[test]
    fn test_jump_spends_speed() {
        let (mut sim, clock) = sim_with(Tuning {
            jump_speed_penalty: 7,
            ..Default::default()
        });
        sim.start();
        for _ in 0..10 {
            clock.advance(16.0);
            sim.tick();
        }
        assert_eq!(sim.state().speed, 10);
        assert!(sim.jump());
        assert_eq!(sim.state().speed, 3);
        assert_eq!(sim.state().particles.len(), 5);
    }

    #[test]
    fn test_jump_penalty_saturates() {
        let (mut sim, _) = sim_with(Tuning::default());
        sim.start();
        assert!(sim.jump());
        assert_eq!(sim.state().speed, 0);
    }

    #[test]
    fn test_fire_trail_can_be_disabled() {
        let (mut sim, _) = sim_with(Tuning::default());
        sim.set_fire_trail(false);
        sim.start();
        assert!(sim.jump());
        assert!(sim.state().particles.is_empty());
    }

    #[test]
    fn test_pause_toggle_ignored_when_idle() {
        let (mut sim, _) = sim_with(Tuning::default());
        assert!(!sim.toggle_pause());
        assert_eq!(sim.phase(), GamePhase::Idle);
    }

    #[test]
    fn test_events_drain() {
        let (mut sim, _) = sim_with(Tuning::default());
        sim.start();
        sim.jump();
        let events = sim.drain_events();
        assert_eq!(events, vec![GameEvent::Started, GameEvent::Jumped]);
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_undrained_events_are_bounded() {
        let (mut sim, _) = sim_with(Tuning::default());
        sim.start();
        for _ in 0..MAX_PENDING_EVENTS {
            sim.toggle_pause();
            sim.toggle_pause();
        }
        let events = sim.drain_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert_eq!(events.first(), Some(&GameEvent::Paused));
        assert_eq!(events.last(), Some(&GameEvent::Resumed));
    }
}
