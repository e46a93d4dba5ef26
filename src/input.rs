//! Keyboard decoding
//!
//! Hosts forward raw key codes (DOM `KeyboardEvent.code` values); the core
//! only ever sees the decoded [`InputEvent`] intents.

use crate::sim::{Direction, InputEvent};

/// Whether a key went down or came up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

fn direction_for(code: &str) -> Option<Direction> {
    match code {
        "ArrowLeft" | "KeyA" => Some(Direction::Left),
        "ArrowRight" | "KeyD" => Some(Direction::Right),
        "ArrowUp" | "KeyW" => Some(Direction::Up),
        "ArrowDown" | "KeyS" => Some(Direction::Down),
        _ => None,
    }
}

/// Map a key code to an intent. Actions fire on press only; movement keys
/// report both edges so held movement can stop.
pub fn decode_key(code: &str, key_state: KeyState) -> Option<InputEvent> {
    if let Some(direction) = direction_for(code) {
        return Some(InputEvent::Move {
            direction,
            held: key_state == KeyState::Pressed,
        });
    }

    if key_state == KeyState::Released {
        return None;
    }

    match code {
        "Space" => Some(InputEvent::Shoot),
        "Escape" | "KeyP" => Some(InputEvent::TogglePause),
        "KeyR" => Some(InputEvent::Restart),
        _ => None,
    }
}

/// Source of decoded intents (keyboard listeners, scripted demos, tests)
pub trait InputSource {
    /// Take every intent queued since the last call, oldest first
    fn drain(&mut self) -> Vec<InputEvent>;
}

/// Simple FIFO the host's event listeners push into
#[derive(Debug, Default)]
pub struct InputQueue {
    pending: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    /// Decode and queue a raw key event; unknown keys are ignored
    pub fn push_key(&mut self, code: &str, key_state: KeyState) -> bool {
        match decode_key(code, key_state) {
            Some(event) => {
                self.push(event);
                true
            }
            None => false,
        }
    }
}

impl InputSource for InputQueue {
    fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.pending)
    }
}
