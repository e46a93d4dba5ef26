//! Entity primitives
//!
//! Flat data structs with per-type update and bounds rules. Motion is in
//! pixels per tick; the arena spans `[0, width] x [0, height]` with y growing
//! downward.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// Axis-aligned bounding box (`min` is the top-left corner)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Overlap where shared edges count as touching
    pub fn overlaps_inclusive(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Point strictly inside the box (points on an edge are outside)
    pub fn contains_strict(&self, point: Vec2) -> bool {
        point.x > self.min.x && point.x < self.max.x && point.y > self.min.y && point.y < self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// Movement intents held by the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

/// Direction of a movement key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl MoveIntent {
    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub intent: MoveIntent,
}

impl Player {
    /// Player at its spawn point: horizontally centred, near the bottom
    pub fn spawn(config: &GameConfig) -> Self {
        let size = Vec2::splat(config.player_size);
        let pos = Vec2::new(
            config.arena_width / 2.0 - size.x / 2.0,
            config.arena_height - crate::consts::PLAYER_SPAWN_OFFSET_Y,
        );
        let mut player = Self {
            pos,
            size,
            speed: config.player_speed,
            intent: MoveIntent::default(),
        };
        player.clamp_to(Vec2::new(config.arena_width, config.arena_height));
        player
    }

    /// Apply held movement, then clamp into the arena
    pub fn update(&mut self, arena: Vec2) {
        if self.intent.left {
            self.pos.x -= self.speed;
        }
        if self.intent.right {
            self.pos.x += self.speed;
        }
        if self.intent.up {
            self.pos.y -= self.speed;
        }
        if self.intent.down {
            self.pos.y += self.speed;
        }
        self.clamp_to(arena);
    }

    fn clamp_to(&mut self, arena: Vec2) {
        let max = (arena - self.size).max(Vec2::ZERO);
        self.pos = self.pos.clamp(Vec2::ZERO, max);
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    /// Where bullets leave the ship (tip of the triangle)
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y)
    }

    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }
}

/// A player bullet travelling straight up
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub id: u32,
    /// Centre point
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
}

impl Bullet {
    pub fn update(&mut self) {
        self.pos.y -= self.speed;
    }

    /// Left through the top edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.y < 0.0
    }
}

/// A descending enemy that drifts sideways and bounces off the side walls
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical speed (fixed at spawn from the score at that moment)
    pub speed: f32,
    /// Horizontal drift magnitude and sign
    pub drift: f32,
    /// +1 or -1, flipped on wall contact
    pub direction: f32,
}

impl Enemy {
    /// Spawn just above the top edge at a uniformly random column
    pub fn spawn(id: u32, config: &GameConfig, score: u64, rng: &mut impl Rng) -> Self {
        let size = Vec2::splat(config.enemy_size);
        let max_x = (config.arena_width - size.x).max(0.0);
        let x = rng.random_range(0.0..=max_x);
        let drift = if config.enemy_max_drift > 0.0 {
            rng.random_range(-config.enemy_max_drift..config.enemy_max_drift)
        } else {
            0.0
        };
        Self {
            id,
            pos: Vec2::new(x, -size.y),
            size,
            speed: config.enemy_base_speed + score as f32 * config.enemy_speed_per_point,
            drift,
            direction: 1.0,
        }
    }

    /// Move one step. Returns true if the enemy bounced off a wall this step.
    ///
    /// Reflection only happens while heading into the wall, so an enemy that
    /// ends a step overlapping the wall flips exactly once and walks back out.
    pub fn update(&mut self, arena_width: f32) -> bool {
        self.pos.y += self.speed;
        let vx = self.drift * self.direction;
        self.pos.x += vx;

        let into_left = self.pos.x <= 0.0 && vx < 0.0;
        let into_right = self.pos.x + self.size.x >= arena_width && vx > 0.0;
        if into_left || into_right {
            self.direction = -self.direction;
            return true;
        }
        false
    }

    /// Fell past the bottom edge
    pub fn is_off_screen(&self, arena_height: f32) -> bool {
        self.pos.y > arena_height
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}

/// Decorative background star
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
}

impl Star {
    pub fn random(arena: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            pos: Vec2::new(rng.random_range(0.0..arena.x), rng.random_range(0.0..arena.y)),
            radius: rng.random_range(0.0..1.5),
            speed: rng.random_range(0.5..1.5),
        }
    }

    /// Scroll down, wrapping to the top at a fresh column
    pub fn update(&mut self, arena: Vec2, rng: &mut impl Rng) {
        self.pos.y += self.speed;
        if self.pos.y > arena.y {
            self.pos.y = 0.0;
            self.pos.x = rng.random_range(0.0..arena.x);
        }
    }
}

/// RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const YELLOW: Color = Color::rgb(0xff, 0xff, 0x00);
    pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);
}

/// Burst palette
pub const BURST_COLORS: [Color; 4] = [
    Color::rgb(0xff, 0x00, 0x00),
    Color::rgb(0xff, 0x66, 0x66),
    Color::rgb(0xff, 0x33, 0x33),
    Color::rgb(0xcc, 0x00, 0x00),
];

/// A fading spark from the game-over burst
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Opacity 0-1, decreases every step
    pub alpha: f32,
}

impl Particle {
    pub fn random(origin: Vec2, rng: &mut impl Rng) -> Self {
        Self {
            pos: origin,
            vel: Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0)),
            radius: rng.random_range(2.0..5.0),
            color: BURST_COLORS[rng.random_range(0..BURST_COLORS.len())],
            alpha: 1.0,
        }
    }

    pub fn update(&mut self) {
        self.pos += self.vel;
        self.alpha -= crate::consts::PARTICLE_FADE_PER_STEP;
    }

    pub fn is_dead(&self) -> bool {
        self.alpha <= 0.0
    }
}
