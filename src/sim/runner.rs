//! Fixed timestep stepping loop
//!
//! Each step ticks every arena object (robots push their wheel forces), then
//! integrates the physics world. Control code runs on other threads and talks
//! to robots directly.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::arena::Arena;

/// Drives an arena forward in fixed steps
#[derive(Debug)]
pub struct Simulator {
    arena: Arc<Arena>,
    accumulator: f32,
    steps: u64,
}

impl Simulator {
    pub fn new(arena: Arc<Arena>) -> Self {
        Self {
            arena,
            accumulator: 0.0,
            steps: 0,
        }
    }

    pub fn arena(&self) -> &Arc<Arena> {
        &self.arena
    }

    /// Number of fixed steps taken so far
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advance the arena by one step of `dt` seconds
    pub fn step(&mut self, dt: f32) {
        for object in self.arena.objects() {
            object.tick(dt);
        }
        self.arena.step_world(dt);
        self.steps += 1;
    }

    /// Consume `elapsed` wall-clock seconds in fixed steps
    ///
    /// At most `max_substeps` steps run per call; any backlog beyond that is
    /// dropped rather than carried into the next call. Returns the number of
    /// steps taken.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        let dt = self.arena.settings().sim_dt;
        let max_substeps = self.arena.settings().max_substeps;
        self.accumulator += elapsed.max(0.0);

        let mut substeps = 0;
        while self.accumulator >= dt && substeps < max_substeps {
            self.step(dt);
            self.accumulator -= dt;
            substeps += 1;
        }
        if substeps == max_substeps && self.accumulator >= dt {
            log::warn!(
                "Simulation falling behind, dropping {:.3}s",
                self.accumulator
            );
            self.accumulator = 0.0;
        }
        substeps
    }

    /// Run the stepping loop on its own thread until `running` is cleared
    pub fn spawn(mut self, running: Arc<AtomicBool>) -> JoinHandle<Self> {
        thread::spawn(move || {
            log::info!("Stepping thread started");
            let period = Duration::from_secs_f32(self.arena.settings().sim_dt);
            let mut last = Instant::now();
            while running.load(Ordering::Acquire) {
                let now = Instant::now();
                self.advance(now.duration_since(last).as_secs_f32());
                last = now;
                thread::sleep(period);
            }
            log::info!("Stepping thread stopped after {} steps", self.steps);
            self
        })
    }
}
