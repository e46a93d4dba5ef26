//! Sound cues
//!
//! Cues are fire-and-forget: the scheduler maps game events to a [`CueKind`]
//! and asks the host's [`AudioCue`] to play it. A failed cue is logged and
//! otherwise ignored.

use serde::{Deserialize, Serialize};

use crate::error::CapabilityError;
use crate::sim::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CueKind {
    /// Player fired
    Shoot,
    /// Enemy destroyed
    Explosion,
    /// Run ended
    GameOver,
}

impl CueKind {
    /// The cue a game event should trigger, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Shot { .. } => Some(CueKind::Shoot),
            GameEvent::EnemyDestroyed { .. } => Some(CueKind::Explosion),
            GameEvent::GameOver { .. } => Some(CueKind::GameOver),
            _ => None,
        }
    }
}

/// Plays sound cues (best effort)
pub trait AudioCue {
    fn play_cue(&mut self, kind: CueKind) -> Result<(), CapabilityError>;
}

/// Silent backend (headless runs, tests)
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioCue for NullAudio {
    fn play_cue(&mut self, _kind: CueKind) -> Result<(), CapabilityError> {
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudioCues;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioCue, CueKind};
    use crate::error::CapabilityError;

    const BACKEND: &str = "web audio";

    fn js_err(e: wasm_bindgen::JsValue) -> CapabilityError {
        CapabilityError::new(BACKEND, format!("{e:?}"))
    }

    /// Web Audio backend: one short oscillator tone per cue
    pub struct WebAudioCues {
        ctx: Option<AudioContext>,
    }

    impl Default for WebAudioCues {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudioCues {
        pub fn new() -> Self {
            // May fail outside a secure context; cues are then silently skipped
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Create an oscillator with a gain stage
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Result<(OscillatorNode, GainNode), CapabilityError> {
            let osc = ctx.create_oscillator().map_err(js_err)?;
            let gain = ctx.create_gain().map_err(js_err)?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).map_err(js_err)?;
            gain.connect_with_audio_node(&ctx.destination())
                .map_err(js_err)?;

            Ok((osc, gain))
        }

        fn tone(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
            gain_level: f32,
            secs: f64,
        ) -> Result<(), CapabilityError> {
            let (osc, gain) = Self::create_osc(ctx, freq, osc_type)?;
            let t = ctx.current_time();
            gain.gain().set_value_at_time(gain_level, t).map_err(js_err)?;
            osc.start().map_err(js_err)?;
            osc.stop_with_when(t + secs).map_err(js_err)?;
            Ok(())
        }
    }

    impl AudioCue for WebAudioCues {
        fn play_cue(&mut self, kind: CueKind) -> Result<(), CapabilityError> {
            let Some(ctx) = &self.ctx else {
                return Ok(());
            };

            // Resume context if suspended (browsers require a user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match kind {
                CueKind::Shoot => Self::tone(ctx, 600.0, OscillatorType::Sine, 0.1, 0.1),
                CueKind::Explosion => Self::tone(ctx, 200.0, OscillatorType::Square, 0.2, 0.3),
                CueKind::GameOver => Self::tone(ctx, 100.0, OscillatorType::Sawtooth, 0.2, 0.5),
            }
        }
    }
}
