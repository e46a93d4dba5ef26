//! Spawn cadence and difficulty controller
//!
//! The spawner and the difficulty step are repeating timers in wall-clock
//! milliseconds, modelled as accumulators that only advance while the game is
//! running. Enemy speed is not stepped here; it follows the score at spawn.

use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, TimerResume};

/// Most timer expiries handled in one advance
const MAX_TIMER_EVENTS: usize = 4096;
/// Most enemies a single advance may ask for
pub const MAX_SPAWNS_PER_ADVANCE: u32 = 64;

/// What the timers asked for during one advance
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DifficultyStep {
    /// Enemies due to spawn
    pub spawns: u32,
    /// New spawn interval, if the difficulty controller tightened it
    pub tightened_to: Option<f32>,
}

/// Spawn interval plus the two timer accumulators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Current time between spawns (never below the configured floor)
    pub spawn_interval_ms: f32,
    /// Time since the last spawn
    spawn_elapsed_ms: f32,
    /// Time since the last difficulty step
    step_elapsed_ms: f32,
}

impl Difficulty {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            spawn_interval_ms: config.initial_spawn_interval_ms,
            spawn_elapsed_ms: 0.0,
            step_elapsed_ms: 0.0,
        }
    }

    /// Advance both timers by `dt_ms` of running time.
    ///
    /// Timer expiries are handled in time order. A spawn due at the same moment
    /// as a difficulty step fires first; a step that tightens the cadence then
    /// reschedules the spawner, so a fresh interval starts at the new rate.
    pub fn advance(&mut self, dt_ms: f32, config: &GameConfig) -> DifficultyStep {
        let mut step = DifficultyStep::default();
        let mut remaining = dt_ms.max(0.0);

        for _ in 0..MAX_TIMER_EVENTS {
            let to_spawn = (self.spawn_interval_ms - self.spawn_elapsed_ms).max(0.0);
            let to_step = (config.difficulty_interval_ms - self.step_elapsed_ms).max(0.0);

            if to_spawn <= to_step {
                if to_spawn > remaining {
                    break;
                }
                remaining -= to_spawn;
                self.step_elapsed_ms += to_spawn;
                self.spawn_elapsed_ms = 0.0;
                step.spawns = (step.spawns + 1).min(MAX_SPAWNS_PER_ADVANCE);
            } else {
                if to_step > remaining {
                    break;
                }
                remaining -= to_step;
                self.spawn_elapsed_ms += to_step;
                self.step_elapsed_ms = 0.0;
                if let Some(interval) = self.tighten(config) {
                    step.tightened_to = Some(interval);
                    self.spawn_elapsed_ms = 0.0;
                }
            }
        }

        // Leftover time after the event cap is dropped rather than replayed
        let leftover = remaining.min(self.spawn_interval_ms - self.spawn_elapsed_ms);
        self.spawn_elapsed_ms += leftover.max(0.0);
        let leftover = remaining.min(config.difficulty_interval_ms - self.step_elapsed_ms);
        self.step_elapsed_ms += leftover.max(0.0);

        step
    }

    /// One difficulty step: shorten the spawn interval unless already at the floor
    pub fn tighten(&mut self, config: &GameConfig) -> Option<f32> {
        if self.spawn_interval_ms > config.spawn_interval_floor_ms {
            self.spawn_interval_ms = (self.spawn_interval_ms - config.spawn_interval_decrement_ms)
                .max(config.spawn_interval_floor_ms);
            Some(self.spawn_interval_ms)
        } else {
            None
        }
    }

    /// Timers come back from a pause
    pub fn on_resume(&mut self, policy: TimerResume) {
        match policy {
            TimerResume::Restart => {
                self.spawn_elapsed_ms = 0.0;
                self.step_elapsed_ms = 0.0;
            }
            TimerResume::Preserve => {}
        }
    }
}
