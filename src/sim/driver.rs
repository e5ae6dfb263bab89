//! Explicit tick drivers
//!
//! The browser drives ticks from `requestAnimationFrame`. Everywhere else a
//! [`StepDriver`] advances a [`ManualClock`] by one frame per tick.

use super::tick::{Simulation, TickOutcome};
use crate::consts::FRAME_MS;
use crate::platform::ManualClock;

/// Summary of a driven stretch of ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Ticks that advanced the world (or ended the run)
    pub ticks: u64,
    /// Outcome of the last tick attempted
    pub last: TickOutcome,
}

#[derive(Debug, Clone)]
pub struct StepDriver {
    clock: ManualClock,
    frame_ms: f64,
}

impl StepDriver {
    /// `clock` must be a handle to the clock the simulation reads
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            frame_ms: FRAME_MS,
        }
    }

    pub fn with_frame_ms(mut self, frame_ms: f64) -> Self {
        self.frame_ms = frame_ms;
        self
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Advance one frame of time and tick once
    pub fn step(&self, sim: &mut Simulation) -> TickOutcome {
        self.clock.advance(self.frame_ms);
        sim.tick()
    }

    /// Run up to `ticks` ticks, stopping as soon as the loop would halt
    pub fn run_ticks(&self, sim: &mut Simulation, ticks: u64) -> RunReport {
        self.run_until_stopped(sim, ticks, |_| {})
    }

    /// Run until the simulation stops scheduling itself or `max_ticks` pass
    ///
    /// `before_tick` runs ahead of every tick, which is where input such as
    /// an autopilot jump is delivered.
    pub fn run_until_stopped(
        &self,
        sim: &mut Simulation,
        max_ticks: u64,
        mut before_tick: impl FnMut(&mut Simulation),
    ) -> RunReport {
        let mut report = RunReport {
            ticks: 0,
            last: TickOutcome::Halted,
        };
        while report.ticks < max_ticks {
            before_tick(sim);
            report.last = self.step(sim);
            if report.last == TickOutcome::Halted {
                break;
            }
            report.ticks += 1;
            if !report.last.should_continue() {
                break;
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::platform::Clock;
    use crate::sim::rng::ScriptedRandom;
    use crate::tuning::Tuning;

    #[test]
    fn test_driver_stops_when_halted() {
        let clock = ManualClock::new(0.0);
        let mut sim = Simulation::new(
            Tuning::default(),
            clock.clone(),
            ScriptedRandom::constant(0.9),
            MemoryStore::new(),
        );
        let driver = StepDriver::new(clock);

        let report = driver.run_ticks(&mut sim, 10);
        assert_eq!(report.ticks, 0);
        assert_eq!(report.last, TickOutcome::Halted);

        sim.start();
        let report = driver.run_ticks(&mut sim, 10);
        assert_eq!(report.ticks, 10);
        assert_eq!(sim.state().score, 10);
    }

    #[test]
    fn test_driver_advances_clock_per_tick() {
        let clock = ManualClock::new(0.0);
        let mut sim = Simulation::new(
            Tuning::default(),
            clock.clone(),
            ScriptedRandom::constant(0.9),
            MemoryStore::new(),
        );
        let driver = StepDriver::new(clock.clone()).with_frame_ms(20.0);
        sim.start();
        driver.run_ticks(&mut sim, 50);
        assert_eq!(clock.now_ms(), 1000.0);
        assert!((sim.state().elapsed_secs - 1.0).abs() < 1e-9);
    }
}
