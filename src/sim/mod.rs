//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering,
//! audio and platform code:
//! - Seeded RNG only
//! - Entity motion per tick, timers per wall-clock millisecond
//! - Removals deferred and keyed by entity id

pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod state;
pub mod tick;

pub use collision::{Kill, apply_kills, find_kills, player_collision, resolve_bullet_hits};
pub use difficulty::{Difficulty, DifficultyStep};
pub use entity::{Aabb, Bullet, Color, Direction, Enemy, MoveIntent, Particle, Player, Star};
pub use state::{EndReason, GameClock, GameEvent, GamePhase, GameState, ScreenShake};
pub use tick::{InputEvent, apply_input, tick};
