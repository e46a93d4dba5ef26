//! Game state and the Running / Paused / GameOver state machine
//!
//! All mutable game data lives in one [`GameState`] owned by the frame
//! scheduler. Systems (collision, difficulty, spawning) operate on references
//! to it; nothing is shared through globals.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::entity::{Bullet, Enemy, Particle, Player, Star};
use crate::config::GameConfig;

/// Current phase of play (exactly one holds at any time)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Frozen by the player; timers and clock suspended
    Paused,
    /// Run ended; terminal until an explicit restart
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// An enemy reached the player
    Destroyed,
    /// The player lasted the whole game duration
    Survived,
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Shot { bullet_id: u32 },
    EnemySpawned { enemy_id: u32 },
    EnemyDestroyed { enemy_id: u32, at: Vec2, score: u64 },
    PlayerHit { enemy_id: u32 },
    DifficultyIncreased { spawn_interval_ms: f32 },
    TimeElapsed { secs: f32 },
    Paused { score: u64 },
    Resumed,
    GameOver { reason: EndReason, score: u64 },
    Restarted,
}

/// Elapsed time of unpaused play
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GameClock {
    elapsed_ms: f64,
}

impl GameClock {
    /// Only called for running time, so pauses never count
    pub fn advance(&mut self, dt_ms: f32) {
        self.elapsed_ms += dt_ms as f64;
    }

    pub fn elapsed_secs(&self) -> f32 {
        (self.elapsed_ms / 1000.0) as f32
    }

    /// Whole seconds left, never negative
    pub fn remaining_whole_secs(&self, duration_secs: f32) -> u32 {
        (duration_secs - self.elapsed_secs().floor()).max(0.0) as u32
    }
}

/// Screen shake (cosmetic)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenShake {
    pub remaining_ms: f32,
    pub magnitude: f32,
    /// Offset to apply to the whole scene this frame
    pub offset: Vec2,
}

impl ScreenShake {
    pub fn trigger(&mut self, duration_ms: f32, magnitude: f32) {
        self.remaining_ms = duration_ms;
        self.magnitude = magnitude;
    }

    pub fn is_active(&self) -> bool {
        self.remaining_ms > 0.0
    }

    fn advance(&mut self, dt_ms: f32, rng: &mut impl Rng) {
        self.remaining_ms -= dt_ms;
        let m = self.magnitude;
        if self.remaining_ms > 0.0 && m > 0.0 {
            self.offset = Vec2::new(rng.random_range(-m..=m), rng.random_range(-m..=m));
        } else {
            self.offset = Vec2::ZERO;
        }
        if self.remaining_ms <= 0.0 {
            self.remaining_ms = 0.0;
        }
    }
}

/// Salt mixed into the seed for the cosmetic RNG stream
const FX_STREAM_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub phase: GamePhase,
    pub player: Player,
    /// Live bullets (unordered)
    pub bullets: Vec<Bullet>,
    /// Live enemies (unordered)
    pub enemies: Vec<Enemy>,
    /// Background starfield (survives restarts)
    pub stars: Vec<Star>,
    /// Game-over burst (cosmetic)
    pub particles: Vec<Particle>,
    pub shake: ScreenShake,
    /// Never decreases within a run
    pub score: u64,
    pub difficulty: Difficulty,
    pub clock: GameClock,
    /// Why the last run ended (set on entering GameOver)
    pub end_reason: Option<EndReason>,
    /// Events produced since the last drain
    events: Vec<GameEvent>,
    /// Gameplay randomness (spawns, stars)
    rng: Pcg32,
    /// Cosmetic randomness (burst, shake) so effects never perturb gameplay
    fx_rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Fresh run in the Running phase. The config is assumed validated.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let arena = Vec2::new(config.arena_width, config.arena_height);
        let stars = (0..config.star_count)
            .map(|_| Star::random(arena, &mut rng))
            .collect();

        Self {
            phase: GamePhase::Running,
            player: Player::spawn(&config),
            bullets: Vec::new(),
            enemies: Vec::new(),
            stars,
            particles: Vec::new(),
            shake: ScreenShake::default(),
            score: 0,
            difficulty: Difficulty::new(&config),
            clock: GameClock::default(),
            end_reason: None,
            events: Vec::new(),
            rng,
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_STREAM_SALT),
            next_id: 1,
            config,
        }
    }

    pub fn arena(&self) -> Vec2 {
        Vec2::new(self.config.arena_width, self.config.arena_height)
    }

    /// Allocate a new entity ID. Wraps around; ids only need to be unique
    /// among live entities.
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Scroll the background starfield one step
    pub fn scroll_stars(&mut self) {
        let arena = self.arena();
        for star in self.stars.iter_mut() {
            star.update(arena, &mut self.rng);
        }
    }

    /// Fire a bullet from the player's muzzle (Running only)
    pub fn shoot(&mut self) -> Option<u32> {
        if self.phase != GamePhase::Running {
            return None;
        }
        let id = self.next_entity_id();
        self.bullets.push(Bullet {
            id,
            pos: self.player.muzzle(),
            radius: self.config.bullet_radius,
            speed: self.config.bullet_speed,
        });
        self.push_event(GameEvent::Shot { bullet_id: id });
        Some(id)
    }

    /// Spawn one enemy at the top edge with speed taken from the current score
    pub fn spawn_enemy(&mut self) -> u32 {
        let id = self.next_entity_id();
        let enemy = Enemy::spawn(id, &self.config, self.score, &mut self.rng);
        self.enemies.push(enemy);
        self.push_event(GameEvent::EnemySpawned { enemy_id: id });
        id
    }

    /// Running -> Paused. Returns false (and does nothing) from any other phase.
    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.phase = GamePhase::Paused;
        self.push_event(GameEvent::Paused { score: self.score });
        true
    }

    /// Paused -> Running. Returns false (and does nothing) from any other phase.
    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.difficulty.on_resume(self.config.timer_resume);
        self.phase = GamePhase::Running;
        self.push_event(GameEvent::Resumed);
        true
    }

    /// Pause when running, resume when paused, ignored once the game is over
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            GamePhase::GameOver => false,
        }
    }

    /// Running -> GameOver, with the burst effect at the player's position
    pub fn end(&mut self, reason: EndReason) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.phase = GamePhase::GameOver;
        self.end_reason = Some(reason);
        self.spawn_burst(self.player.center());
        self.shake
            .trigger(self.config.shake_duration_ms, self.config.shake_magnitude);
        self.push_event(GameEvent::GameOver {
            reason,
            score: self.score,
        });
        true
    }

    fn spawn_burst(&mut self, origin: Vec2) {
        for _ in 0..self.config.burst_particles {
            let particle = Particle::random(origin, &mut self.fx_rng);
            self.particles.push(particle);
        }
    }

    /// GameOver or Paused -> Running with everything but the starfield reset
    pub fn restart(&mut self) -> bool {
        if self.phase == GamePhase::Running {
            return false;
        }
        self.player = Player::spawn(&self.config);
        self.bullets.clear();
        self.enemies.clear();
        self.particles.clear();
        self.shake = ScreenShake::default();
        self.score = 0;
        self.difficulty = Difficulty::new(&self.config);
        self.clock = GameClock::default();
        self.end_reason = None;
        self.phase = GamePhase::Running;
        self.push_event(GameEvent::Restarted);
        true
    }

    /// Advance cosmetic effects by one frame. Runs in every phase, so the
    /// burst and shake keep animating while paused.
    pub fn advance_effects(&mut self, dt_ms: f32) {
        self.shake.advance(dt_ms, &mut self.fx_rng);
        for particle in self.particles.iter_mut() {
            particle.update();
        }
        self.particles.retain(|p| !p.is_dead());
    }

    /// True while any cosmetic effect is still playing
    pub fn effects_active(&self) -> bool {
        self.shake.is_active() || !self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(GameConfig::default(), 12345)
    }

    #[test]
    fn test_new_state_is_running() {
        let state = state();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.stars.len(), 100);
        assert!(state.enemies.is_empty());
        assert_eq!(state.difficulty.spawn_interval_ms, 1500.0);
    }

    #[test]
    fn test_pause_resume_cycle() {
        let mut state = state();
        assert!(state.toggle_pause());
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(state.toggle_pause());
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::Paused { score: 0 }, GameEvent::Resumed]
        );
    }

    #[test]
    fn test_pause_ignored_after_game_over() {
        let mut state = state();
        assert!(state.end(EndReason::Destroyed));
        assert!(!state.toggle_pause());
        assert!(!state.pause());
        assert!(!state.resume());
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_shoot_only_while_running() {
        let mut state = state();
        assert!(state.shoot().is_some());
        state.pause();
        assert!(state.shoot().is_none());
        assert_eq!(state.bullets.len(), 1);
        let bullet = &state.bullets[0];
        assert_eq!(bullet.pos, Vec2::new(400.0, 540.0));
    }

    #[test]
    fn test_end_triggers_burst_and_shake() {
        let mut state = state();
        state.end(EndReason::Survived);
        assert_eq!(state.particles.len(), 30);
        assert!(state.shake.is_active());
        assert_eq!(state.end_reason, Some(EndReason::Survived));
        assert!(state.drain_events().contains(&GameEvent::GameOver {
            reason: EndReason::Survived,
            score: 0,
        }));
    }

    #[test]
    fn test_restart_resets_run() {
        let mut state = state();
        state.score = 120;
        state.spawn_enemy();
        state.shoot();
        state.difficulty.tighten(&state.config);
        state.clock.advance(5000.0);
        state.player.pos = Vec2::ZERO;
        state.end(EndReason::Destroyed);

        assert!(state.restart());
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.difficulty.spawn_interval_ms, 1500.0);
        assert_eq!(state.clock.elapsed_secs(), 0.0);
        assert_eq!(state.player.pos, Vec2::new(380.0, 540.0));
        assert_eq!(state.stars.len(), 100);
    }

    #[test]
    fn test_entity_ids_wrap_instead_of_overflowing() {
        let mut state = state();
        state.next_id = u32::MAX;
        assert_eq!(state.next_entity_id(), u32::MAX);
        assert_eq!(state.next_entity_id(), 0);
        assert_eq!(state.next_entity_id(), 1);
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut state = state();
        assert!(!state.restart());
    }

    #[test]
    fn test_effects_decay_to_nothing() {
        let mut state = state();
        state.end(EndReason::Destroyed);
        for _ in 0..60 {
            state.advance_effects(1000.0 / 60.0);
        }
        assert!(!state.effects_active());
        assert_eq!(state.shake.offset, Vec2::ZERO);
    }

    #[test]
    fn test_remaining_time_floors_and_saturates() {
        let mut clock = GameClock::default();
        clock.advance(1500.0);
        assert_eq!(clock.remaining_whole_secs(60.0), 59);
        clock.advance(70_000.0);
        assert_eq!(clock.remaining_whole_secs(60.0), 0);
    }
}
