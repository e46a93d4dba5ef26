//! Rendering capability
//!
//! The core never draws. Each frame it turns the current state into a flat
//! list of shapes and hands them to whatever [`Renderer`] the host provides
//! (a 2D canvas in the browser, a recorder in tests).

use glam::Vec2;

use crate::error::CapabilityError;
use crate::sim::{Color, GameState};

/// A primitive in arena coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect { pos: Vec2, size: Vec2 },
    Triangle { a: Vec2, b: Vec2, c: Vec2 },
    Circle { center: Vec2, radius: f32 },
    Text { pos: Vec2, text: String, size_px: f32 },
}

/// Fill style for a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: Color,
    /// Opacity 0-1
    pub alpha: f32,
}

impl Style {
    pub const fn solid(color: Color) -> Self {
        Self { color, alpha: 1.0 }
    }

    /// CSS colour string, e.g. `rgba(255,0,0,0.5)`
    pub fn css(&self) -> String {
        format!(
            "rgba({},{},{},{})",
            self.color.r,
            self.color.g,
            self.color.b,
            self.alpha.clamp(0.0, 1.0)
        )
    }
}

/// Something that can draw shapes. Failures are reported, never fatal.
pub trait Renderer {
    /// Start a frame: clear the surface and apply the scene offset (screen shake)
    fn begin_frame(&mut self, arena: Vec2, offset: Vec2) -> Result<(), CapabilityError>;

    fn draw(&mut self, shape: &Shape, style: &Style) -> Result<(), CapabilityError>;
}

/// Renderer that draws nothing (headless runs)
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn begin_frame(&mut self, _arena: Vec2, _offset: Vec2) -> Result<(), CapabilityError> {
        Ok(())
    }

    fn draw(&mut self, _shape: &Shape, _style: &Style) -> Result<(), CapabilityError> {
        Ok(())
    }
}

const HUD_TEXT_PX: f32 = 20.0;

/// Build the frame's draw list, back to front
pub fn scene(state: &GameState) -> Vec<(Shape, Style)> {
    let mut shapes = Vec::with_capacity(
        state.stars.len() + state.bullets.len() + state.enemies.len() + state.particles.len() + 3,
    );

    let white = Style::solid(Color::WHITE);
    for star in &state.stars {
        shapes.push((
            Shape::Circle {
                center: star.pos,
                radius: star.radius,
            },
            white,
        ));
    }

    // Player ship: triangle pointing up
    let p = &state.player;
    shapes.push((
        Shape::Triangle {
            a: Vec2::new(p.pos.x + p.size.x / 2.0, p.pos.y),
            b: Vec2::new(p.pos.x, p.pos.y + p.size.y),
            c: p.pos + p.size,
        },
        white,
    ));

    let yellow = Style::solid(Color::YELLOW);
    for bullet in &state.bullets {
        shapes.push((
            Shape::Circle {
                center: bullet.pos,
                radius: bullet.radius,
            },
            yellow,
        ));
    }

    let red = Style::solid(Color::RED);
    for enemy in &state.enemies {
        shapes.push((
            Shape::Rect {
                pos: enemy.pos,
                size: enemy.size,
            },
            red,
        ));
    }

    // HUD
    let remaining = state
        .clock
        .remaining_whole_secs(state.config.game_duration_secs);
    shapes.push((
        Shape::Text {
            pos: Vec2::new(10.0, 30.0),
            text: format!("Time Left: {remaining}s"),
            size_px: HUD_TEXT_PX,
        },
        white,
    ));
    shapes.push((
        Shape::Text {
            pos: Vec2::new(10.0, 60.0),
            text: format!("Score: {}", state.score),
            size_px: HUD_TEXT_PX,
        },
        white,
    ));

    for particle in &state.particles {
        shapes.push((
            Shape::Circle {
                center: particle.pos,
                radius: particle.radius,
            },
            Style {
                color: particle.color,
                alpha: particle.alpha,
            },
        ));
    }

    shapes
}
