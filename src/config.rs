//! Game configuration
//!
//! Every tuning constant can be overridden at construction. Overrides are plain
//! JSON (partial documents are merged onto the defaults) and are validated up
//! front so the simulation never runs with nonsensical values.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// What happens to the spawn and difficulty timers when play resumes after a pause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimerResume {
    /// Both timers start a fresh interval on resume
    #[default]
    Restart,
    /// Both timers continue from where they were when paused
    Preserve,
}

impl TimerResume {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerResume::Restart => "Restart",
            TimerResume::Preserve => "Preserve",
        }
    }
}

/// Construction-time game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Run length & difficulty ===
    /// Seconds of unpaused play before the run ends as survived
    pub game_duration_secs: f32,
    pub initial_spawn_interval_ms: f32,
    pub spawn_interval_floor_ms: f32,
    pub spawn_interval_decrement_ms: f32,
    pub difficulty_interval_ms: f32,
    pub timer_resume: TimerResume,

    // === Player ===
    pub player_size: f32,
    pub player_speed: f32,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_radius: f32,

    // === Enemies ===
    pub enemy_size: f32,
    pub enemy_base_speed: f32,
    pub enemy_speed_per_point: f32,
    pub enemy_max_drift: f32,

    // === Scoring ===
    pub score_per_kill: u32,

    // === Cosmetics ===
    pub star_count: usize,
    pub burst_particles: usize,
    pub shake_duration_ms: f32,
    pub shake_magnitude: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            game_duration_secs: GAME_DURATION_SECS,
            initial_spawn_interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            spawn_interval_floor_ms: SPAWN_INTERVAL_FLOOR_MS,
            spawn_interval_decrement_ms: SPAWN_INTERVAL_DECREMENT_MS,
            difficulty_interval_ms: DIFFICULTY_INTERVAL_MS,
            timer_resume: TimerResume::Restart,

            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,

            bullet_speed: BULLET_SPEED,
            bullet_radius: BULLET_RADIUS,

            enemy_size: ENEMY_SIZE,
            enemy_base_speed: ENEMY_BASE_SPEED,
            enemy_speed_per_point: ENEMY_SPEED_PER_POINT,
            enemy_max_drift: ENEMY_MAX_DRIFT,

            score_per_kill: SCORE_PER_KILL,

            star_count: STAR_COUNT,
            burst_particles: BURST_PARTICLES,
            shake_duration_ms: SHAKE_DURATION_MS,
            shake_magnitude: SHAKE_MAGNITUDE,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn long_enough(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= MIN_TIMER_INTERVAL_MS {
        Ok(())
    } else {
        Err(ConfigError::IntervalTooShort {
            field,
            value,
            min: MIN_TIMER_INTERVAL_MS,
        })
    }
}

fn at_most(field: &'static str, value: f32, max: f32) -> Result<(), ConfigError> {
    if value <= max {
        Ok(())
    } else {
        Err(ConfigError::TooLarge { field, value, max })
    }
}

fn fits(entity: &'static str, size: f32, arena: f32) -> Result<(), ConfigError> {
    if size <= arena {
        Ok(())
    } else {
        Err(ConfigError::EntityTooLarge { entity, size, arena })
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validated()
    }

    /// Consume the config, returning it only if every value is usable
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    /// Check every value, reporting the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("arena_width", self.arena_width)?;
        positive("arena_height", self.arena_height)?;
        positive("game_duration_secs", self.game_duration_secs)?;
        positive("spawn_interval_floor_ms", self.spawn_interval_floor_ms)?;
        positive("initial_spawn_interval_ms", self.initial_spawn_interval_ms)?;
        positive("difficulty_interval_ms", self.difficulty_interval_ms)?;
        non_negative("spawn_interval_decrement_ms", self.spawn_interval_decrement_ms)?;

        at_most("arena_width", self.arena_width, MAX_ARENA_DIMENSION)?;
        at_most("arena_height", self.arena_height, MAX_ARENA_DIMENSION)?;
        long_enough("spawn_interval_floor_ms", self.spawn_interval_floor_ms)?;
        long_enough("initial_spawn_interval_ms", self.initial_spawn_interval_ms)?;
        long_enough("difficulty_interval_ms", self.difficulty_interval_ms)?;

        if self.initial_spawn_interval_ms < self.spawn_interval_floor_ms {
            return Err(ConfigError::SpawnIntervalBelowFloor {
                initial: self.initial_spawn_interval_ms,
                floor: self.spawn_interval_floor_ms,
            });
        }

        positive("player_size", self.player_size)?;
        non_negative("player_speed", self.player_speed)?;
        fits("player", self.player_size, self.arena_width.min(self.arena_height))?;

        positive("bullet_speed", self.bullet_speed)?;
        non_negative("bullet_radius", self.bullet_radius)?;

        positive("enemy_size", self.enemy_size)?;
        non_negative("enemy_base_speed", self.enemy_base_speed)?;
        non_negative("enemy_speed_per_point", self.enemy_speed_per_point)?;
        non_negative("enemy_max_drift", self.enemy_max_drift)?;
        fits("enemy", self.enemy_size, self.arena_width)?;
        at_most("enemy_max_drift", self.enemy_max_drift, self.arena_width)?;

        non_negative("shake_duration_ms", self.shake_duration_ms)?;
        non_negative("shake_magnitude", self.shake_magnitude)?;
        at_most(
            "shake_magnitude",
            self.shake_magnitude,
            self.arena_width.min(self.arena_height),
        )?;

        Ok(())
    }

    /// LocalStorage key for overrides
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "nova_rush_config";

    /// Load overrides from LocalStorage (WASM only), falling back to defaults
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded configuration overrides from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored configuration: {e}"),
                }
            }
        }

        log::info!("Using default configuration");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
