//! End-to-end runs of the simulation controller with scripted time,
//! randomness and storage.

use road_rider::Tuning;
use road_rider::persistence::{HighScoreStore, MemoryStore, StoreError};
use road_rider::platform::{Clock, ManualClock};
use road_rider::renderer::{RenderFrame, Renderer};
use road_rider::sim::{
    GameEvent, GamePhase, ObstacleKind, ScriptedRandom, SeededRandom, Simulation, StepDriver,
    TickOutcome,
};
use road_rider::tuning::ObstacleShape;

const FRAME_MS: f64 = 16.0;

/// Obstacles hang above the top clamp, so the rider can never hit one
fn overhead_tuning() -> Tuning {
    let base = Tuning::default();
    let overhead = |shape: ObstacleShape| ObstacleShape {
        lift: base.ground_y + shape.height,
        ..shape
    };
    Tuning {
        stone: overhead(base.stone),
        car: overhead(base.car),
        ..base
    }
}

fn new_sim(tuning: Tuning, store: MemoryStore) -> (Simulation, StepDriver) {
    let clock = ManualClock::new(0.0);
    let sim = Simulation::new(tuning, clock.clone(), ScriptedRandom::constant(0.9), store);
    (sim, StepDriver::new(clock).with_frame_ms(FRAME_MS))
}

#[test]
fn ticks_before_start_change_nothing() {
    let (mut sim, driver) = new_sim(Tuning::default(), MemoryStore::new());
    let rider_y = sim.state().rider.pos.y;

    for _ in 0..20 {
        assert_eq!(driver.step(&mut sim), TickOutcome::Halted);
    }

    assert_eq!(sim.phase(), GamePhase::Idle);
    assert_eq!(sim.state().score, 0);
    assert_eq!(sim.state().rider.pos.y, rider_y);
    assert!(sim.state().obstacles.is_empty());
}

#[test]
fn ticks_while_paused_change_nothing() {
    let (mut sim, driver) = new_sim(Tuning::default(), MemoryStore::new());
    sim.start();
    sim.jump();
    driver.run_ticks(&mut sim, 10);
    assert!(!sim.toggle_pause());
    assert!(sim.state().is_paused());
    assert!(sim.state().is_started());

    let score = sim.state().score;
    let rider_y = sim.state().rider.pos.y;
    let obstacle_x: Vec<f32> = sim.state().obstacles.iter().map(|o| o.pos.x).collect();
    let particles = sim.state().particles.len();

    for _ in 0..50 {
        assert_eq!(driver.step(&mut sim), TickOutcome::Halted);
    }

    assert_eq!(sim.state().score, score);
    assert_eq!(sim.state().rider.pos.y, rider_y);
    let after: Vec<f32> = sim.state().obstacles.iter().map(|o| o.pos.x).collect();
    assert_eq!(after, obstacle_x);
    assert_eq!(sim.state().particles.len(), particles);
}

#[test]
fn jump_delivered_before_a_tick_applies_to_that_tick() {
    let (mut sim, driver) = new_sim(Tuning::default(), MemoryStore::new());
    sim.start();
    let rest_y = sim.tuning().rest_y();

    assert!(sim.jump());
    driver.step(&mut sim);

    // -18 impulse plus 0.2 gravity in the first tick
    assert!((sim.state().rider.pos.y - (rest_y - 17.8)).abs() < 1e-4);
    assert!(sim.state().rider.airborne);
}

#[test]
fn jump_cooldown_applies_even_when_grounded() {
    let tuning = Tuning {
        jump_cooldown_ms: 150.0,
        // A hop so small the rider is back on the road within a few frames
        jump_velocity: -0.5,
        ..Tuning::default()
    };
    let (mut sim, driver) = new_sim(tuning, MemoryStore::new());
    sim.start();

    assert!(sim.jump());
    driver.clock().advance(50.0);
    assert!(!sim.jump(), "second request 50ms later must be ignored");

    // Land: 5 frames of 16ms puts the clock at 130ms
    driver.run_ticks(&mut sim, 5);
    assert!(!sim.state().rider.airborne);
    assert!(!sim.jump(), "still inside the cooldown window");
    assert!(!sim.state().rider.airborne);

    driver.clock().set(150.0);
    assert!(sim.jump());
    assert!(sim.state().rider.airborne);
}

#[test]
fn first_obstacle_ends_a_run_without_jumps() {
    let store = MemoryStore::new();
    let (mut sim, driver) = new_sim(Tuning::default(), store.clone());
    sim.start();

    let report = driver.run_ticks(&mut sim, 1000);

    // Spawned at x=810 moving 4 px/tick, it reaches the rider's front edge
    // (x=110) on tick 176
    assert_eq!(report.ticks, 176);
    assert_eq!(
        report.last,
        TickOutcome::Crashed {
            score: 175,
            new_high_score: true
        }
    );
    assert_eq!(sim.phase(), GamePhase::GameOver);
    assert!(sim.state().is_over());
    assert!(!sim.state().is_started());
    assert_eq!(sim.state().high_score, 175);
    assert_eq!(store.get(), Some(175));

    let events = sim.drain_events();
    assert!(events.contains(&GameEvent::Crashed { score: 175 }));
    assert!(events.contains(&GameEvent::NewHighScore(175)));

    // Game over is terminal until restart
    assert_eq!(driver.step(&mut sim), TickOutcome::Halted);
    assert!(!sim.jump());
    assert!(!sim.toggle_pause());
}

#[test]
fn high_score_is_max_of_previous_and_final() {
    let store = MemoryStore::with_score(500);
    let (mut sim, driver) = new_sim(Tuning::default(), store.clone());
    assert_eq!(sim.state().high_score, 500);

    sim.start();
    let report = driver.run_ticks(&mut sim, 1000);
    assert_eq!(
        report.last,
        TickOutcome::Crashed {
            score: 175,
            new_high_score: false
        }
    );
    assert_eq!(sim.state().high_score, 500);
    assert_eq!(store.get(), Some(500));
}

#[test]
fn high_score_survives_restart() {
    let store = MemoryStore::new();
    let (mut sim, driver) = new_sim(Tuning::default(), store.clone());
    sim.start();
    driver.run_ticks(&mut sim, 1000);
    assert_eq!(sim.state().high_score, 175);

    sim.restart();
    driver.run_ticks(&mut sim, 100);
    assert_eq!(sim.state().high_score, 175);

    // A new process reads it back
    let (reloaded, _) = new_sim(Tuning::default(), store);
    assert_eq!(reloaded.state().high_score, 175);
}

#[test]
fn restart_after_game_over_resets_the_run() {
    let (mut sim, driver) = new_sim(Tuning::default(), MemoryStore::new());
    sim.start();
    sim.jump();
    driver.run_ticks(&mut sim, 1000);
    assert_eq!(sim.phase(), GamePhase::GameOver);

    sim.restart();

    let state = sim.state();
    assert_eq!(sim.phase(), GamePhase::Running);
    assert_eq!(state.score, 0);
    assert_eq!(state.speed, 0);
    assert_eq!(state.elapsed_secs, 0.0);
    assert_eq!(state.obstacle_speed, sim.tuning().initial_obstacle_speed);
    assert_eq!(state.rider.pos.y, sim.tuning().rest_y());
    assert!(!state.rider.airborne);
    assert!(state.obstacles.is_empty());
    assert!(state.particles.is_empty());

    assert_eq!(driver.step(&mut sim), TickOutcome::Continue);
    assert_eq!(sim.state().score, 1);
}

#[test]
fn pause_resume_keeps_elapsed_time_continuous() {
    let (mut sim, driver) = new_sim(overhead_tuning(), MemoryStore::new());
    sim.start();
    driver.run_ticks(&mut sim, 60);
    assert_eq!(driver.clock().now_ms(), 960.0);

    sim.toggle_pause();
    let at_pause = sim.state().elapsed_secs;
    assert!((at_pause - 0.96).abs() < 1e-9);

    driver.clock().advance(10_000.0);
    assert!(sim.toggle_pause(), "resume re-enters the schedule");
    assert_eq!(sim.state().elapsed_secs, at_pause);

    driver.step(&mut sim);
    assert!((sim.state().elapsed_secs - (at_pause + 0.016)).abs() < 1e-9);
    assert_eq!(sim.telemetry().clock_label(), "00:00");

    let events = sim.drain_events();
    assert!(events.contains(&GameEvent::Paused));
    assert!(events.contains(&GameEvent::Resumed));
}

#[test]
fn five_hundred_ticks_ramp_speed_once() {
    let (mut sim, driver) = new_sim(overhead_tuning(), MemoryStore::new());
    sim.start();

    let report = driver.run_ticks(&mut sim, 500);

    assert_eq!(report.ticks, 500);
    assert_eq!(report.last, TickOutcome::Continue);
    assert_eq!(sim.state().score, 500);
    assert_eq!(sim.state().speed, 500);
    assert_eq!(sim.state().obstacle_speed, 4.0 + 0.1);

    let ramps: Vec<GameEvent> = sim
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::SpeedUp(_)))
        .collect();
    assert_eq!(ramps, vec![GameEvent::SpeedUp(4.0 + 0.1)]);
}

#[test]
fn speed_stat_is_capped() {
    let (mut sim, driver) = new_sim(overhead_tuning(), MemoryStore::new());
    sim.start();
    driver.run_ticks(&mut sim, 1000);
    assert_eq!(sim.state().speed, 777);
}

#[test]
fn obstacle_rules_hold_over_a_long_run() {
    let tuning = Tuning {
        tier_threshold: 2000,
        ramp_interval: 50,
        car_chance: 0.5,
        ..overhead_tuning()
    };
    let clock = ManualClock::new(0.0);
    let mut sim = Simulation::new(
        tuning.clone(),
        clock.clone(),
        SeededRandom::new(2024),
        MemoryStore::new(),
    );
    let driver = StepDriver::new(clock);
    sim.start();

    let mut last_speed = sim.state().obstacle_speed;
    let mut saw_two = false;
    for _ in 0..6000 {
        assert_eq!(driver.step(&mut sim), TickOutcome::Continue);
        let state = sim.state();

        assert!(state.obstacles.len() <= tuning.obstacle_cap(state.score));
        saw_two |= state.obstacles.len() == 2;
        for pair in state.obstacles.windows(2) {
            assert!(pair[1].pos.x - pair[0].pos.x >= tuning.min_spacing);
        }
        assert!(state.obstacles.iter().all(|o| o.pos.x + o.width > 0.0));

        assert!(state.obstacle_speed >= last_speed);
        assert!(state.obstacle_speed <= tuning.max_obstacle_speed);
        last_speed = state.obstacle_speed;
    }

    assert!(saw_two, "second tier should allow two live obstacles");
    assert_eq!(last_speed, tuning.max_obstacle_speed);

    let kinds: Vec<ObstacleKind> = sim
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::ObstacleSpawned(kind) => Some(kind),
            _ => None,
        })
        .collect();
    assert!(kinds.contains(&ObstacleKind::Car));
    assert!(kinds.contains(&ObstacleKind::Stone));
}

struct BrokenStore;

impl HighScoreStore for BrokenStore {
    fn load(&self) -> Result<u64, StoreError> {
        Err(StoreError::Corrupt("sixty".to_string()))
    }

    fn save(&mut self, _score: u64) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }
}

#[test]
fn unreadable_store_starts_from_zero_and_keeps_playing() {
    let clock = ManualClock::new(0.0);
    let mut sim = Simulation::new(
        Tuning::default(),
        clock.clone(),
        ScriptedRandom::constant(0.9),
        BrokenStore,
    );
    assert_eq!(sim.state().high_score, 0);

    sim.start();
    let report = StepDriver::new(clock).run_ticks(&mut sim, 1000);
    assert!(matches!(report.last, TickOutcome::Crashed { score: 175, .. }));
    assert_eq!(sim.state().high_score, 175);

    sim.restart();
    assert_eq!(sim.phase(), GamePhase::Running);
}

#[derive(Default)]
struct RecordingRenderer {
    frames: usize,
    rider: Option<(f32, f32)>,
    obstacles: Vec<(ObstacleKind, f32)>,
    particle_alphas: Vec<f32>,
}

impl Renderer for RecordingRenderer {
    fn draw(&mut self, frame: &RenderFrame<'_>) {
        self.frames += 1;
        self.rider = Some((frame.rider.left(), frame.rider.top()));
        self.obstacles = frame.obstacles.iter().map(|o| (o.kind, o.pos.x)).collect();
        self.particle_alphas = frame.particles.iter().map(|p| p.alpha).collect();
    }
}

#[test]
fn render_sink_receives_live_entities() {
    let (mut sim, driver) = new_sim(Tuning::default(), MemoryStore::new());
    let mut renderer = RecordingRenderer::default();
    sim.start();
    sim.jump();
    driver.step(&mut sim);

    sim.render(&mut renderer);

    assert_eq!(renderer.frames, 1);
    let (x, y) = renderer.rider.unwrap();
    assert_eq!(x, 40.0);
    assert!(y < sim.tuning().rest_y());
    assert_eq!(renderer.obstacles, vec![(ObstacleKind::Stone, 806.0)]);
    assert_eq!(renderer.particle_alphas.len(), 5);
    assert!(renderer.particle_alphas.iter().all(|a| (*a - 0.97).abs() < 1e-6));
}
