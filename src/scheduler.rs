//! Frame scheduler
//!
//! Owns the [`GameState`] and the host capabilities, and runs one fixed-order
//! pass per display refresh: update (gated by phase), render, then cosmetic
//! effects. Capability failures are logged and dropped here so they can never
//! reach the simulation.

use glam::Vec2;

use crate::audio::{AudioCue, CueKind};
use crate::config::GameConfig;
use crate::consts::{MAX_FRAME_DT_MS, NOMINAL_FRAME_DT_MS};
use crate::error::ConfigError;
use crate::input::InputSource;
use crate::render::{Renderer, scene};
use crate::sim::{GameEvent, GamePhase, GameState, InputEvent, apply_input, tick};
use crate::ui::{Overlay, OverlayView};

/// Whether the host should keep requesting frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// The run is over and its effects have settled; wait for a restart
    Suspend,
}

pub struct FrameScheduler<R, A, O> {
    state: GameState,
    renderer: R,
    audio: A,
    overlay: O,
    /// Timestamp of the previous frame (ms), None right after (re)start
    last_timestamp: Option<f64>,
    suspended: bool,
}

impl<R: Renderer, A: AudioCue, O: Overlay> FrameScheduler<R, A, O> {
    /// Validate the config and start a run
    pub fn new(
        config: GameConfig,
        seed: u64,
        renderer: R,
        audio: A,
        overlay: O,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!(
            "Starting run: {}x{} arena, {}s, seed {}",
            config.arena_width,
            config.arena_height,
            config.game_duration_secs,
            seed
        );
        Ok(Self {
            state: GameState::new(config, seed),
            renderer,
            audio,
            overlay,
            last_timestamp: None,
            suspended: false,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    /// True once a finished run has settled; only a restart wakes it
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Apply one intent right away. Returns true if it changed anything.
    pub fn handle_input(&mut self, input: InputEvent) -> bool {
        let changed = apply_input(&mut self.state, input);
        if changed && input == InputEvent::Restart {
            self.suspended = false;
            self.last_timestamp = None;
        }
        self.dispatch_events();
        changed
    }

    /// Apply every intent the source has queued
    pub fn drain_input(&mut self, source: &mut impl InputSource) {
        for input in source.drain() {
            self.handle_input(input);
        }
    }

    /// Pause on behalf of the host (tab hidden, window blurred). Only affects a running game.
    pub fn auto_pause(&mut self) -> bool {
        let paused = self.state.pause();
        if paused {
            log::info!("Auto-paused");
            self.dispatch_events();
        }
        paused
    }

    /// Run one frame at `timestamp_ms` (e.g. the requestAnimationFrame time)
    pub fn frame(&mut self, timestamp_ms: f64) -> FrameOutcome {
        if self.suspended {
            return FrameOutcome::Suspend;
        }

        let dt_ms = match self.last_timestamp {
            Some(prev) => (timestamp_ms - prev).clamp(0.0, MAX_FRAME_DT_MS),
            None => NOMINAL_FRAME_DT_MS,
        } as f32;
        self.last_timestamp = Some(timestamp_ms);

        tick(&mut self.state, dt_ms);
        self.dispatch_events();

        self.render();

        // Cosmetic effects advance in every phase, paused included
        self.state.advance_effects(dt_ms);

        if self.state.phase == GamePhase::GameOver && !self.state.effects_active() {
            log::debug!("Run settled, suspending frames");
            self.suspended = true;
            return FrameOutcome::Suspend;
        }
        FrameOutcome::Continue
    }

    fn render(&mut self) {
        let arena = Vec2::new(self.state.config.arena_width, self.state.config.arena_height);
        if let Err(e) = self.renderer.begin_frame(arena, self.state.shake.offset) {
            log::debug!("Skipping frame: {e}");
            return;
        }
        for (shape, style) in scene(&self.state) {
            if let Err(e) = self.renderer.draw(&shape, &style) {
                log::debug!("Draw failed: {e}");
            }
        }
    }

    /// Forward pending events to the audio and overlay capabilities
    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            if let Some(cue) = CueKind::for_event(&event) {
                if let Err(e) = self.audio.play_cue(cue) {
                    log::debug!("Cue {cue:?} dropped: {e}");
                }
            }

            let view = match event {
                GameEvent::Paused { score } => Some(OverlayView::Paused { score }),
                GameEvent::Resumed | GameEvent::Restarted => Some(OverlayView::Hidden),
                GameEvent::GameOver { reason, score } => Some(OverlayView::GameOver {
                    reason,
                    score,
                    duration_secs: self.state.config.game_duration_secs as u32,
                }),
                _ => None,
            };
            if let Some(view) = view {
                self.overlay.show(view);
            }
        }
    }
}
