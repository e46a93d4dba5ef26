//! Nova Rush - a single-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, difficulty, game state)
//! - `scheduler`: Per-frame driver that runs update, render and cosmetic effects
//! - `render`, `audio`, `ui`: Capabilities the host implements (drawing, sound cues, overlay)
//! - `input`: Decoding of raw key codes into game intents
//! - `config`: Construction-time tuning with validation

pub mod audio;
pub mod config;
pub mod error;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod sim;
pub mod ui;

pub use config::{GameConfig, TimerResume};
pub use error::{CapabilityError, ConfigError};
pub use scheduler::{FrameOutcome, FrameScheduler};

/// Default tuning values (all overridable through [`GameConfig`])
pub mod consts {
    /// Arena dimensions (matches the canvas size)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Length of a run in seconds of unpaused play
    pub const GAME_DURATION_SECS: f32 = 60.0;

    /// Enemy spawn cadence (milliseconds)
    pub const INITIAL_SPAWN_INTERVAL_MS: f32 = 1500.0;
    pub const SPAWN_INTERVAL_FLOOR_MS: f32 = 500.0;
    pub const SPAWN_INTERVAL_DECREMENT_MS: f32 = 100.0;
    /// How often the difficulty controller steps the spawn cadence
    pub const DIFFICULTY_INTERVAL_MS: f32 = 15_000.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Distance of the player's top edge from the arena bottom at spawn
    pub const PLAYER_SPAWN_OFFSET_Y: f32 = 60.0;

    /// Bullet defaults (speed in pixels per tick)
    pub const BULLET_SPEED: f32 = 7.0;
    pub const BULLET_RADIUS: f32 = 5.0;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 40.0;
    pub const ENEMY_BASE_SPEED: f32 = 2.0;
    /// Extra vertical speed per point of score at spawn time
    pub const ENEMY_SPEED_PER_POINT: f32 = 0.01;
    /// Horizontal drift is drawn from [-MAX, MAX)
    pub const ENEMY_MAX_DRIFT: f32 = 1.0;

    pub const SCORE_PER_KILL: u32 = 10;

    /// Background starfield
    pub const STAR_COUNT: usize = 100;

    /// Game-over burst
    pub const BURST_PARTICLES: usize = 30;
    pub const PARTICLE_FADE_PER_STEP: f32 = 0.02;
    pub const SHAKE_DURATION_MS: f32 = 500.0;
    pub const SHAKE_MAGNITUDE: f32 = 5.0;

    /// Shortest spawn or difficulty interval a config may ask for
    pub const MIN_TIMER_INTERVAL_MS: f32 = 1.0;
    /// Largest arena side a config may ask for
    pub const MAX_ARENA_DIMENSION: f32 = 100_000.0;

    /// Largest frame delta fed to the simulation (prevents catch-up bursts after a stall)
    pub const MAX_FRAME_DT_MS: f64 = 100.0;
    /// Delta used for the first frame after (re)start
    pub const NOMINAL_FRAME_DT_MS: f64 = 1000.0 / 60.0;
}
