//! Input mapping
//!
//! Keyboard codes and on-screen buttons map onto two actions. Jump is handed
//! to the runner as a level and the runner detects the rising edge; duck is a
//! plain level. Several sources can hold the same action at once (a key and a
//! touch button), and the action stays held until all of them let go.

use crate::sim::{RandomSource, Runner};

/// What the player can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Jump,
    Duck,
}

/// Where an input came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Keyboard,
    /// Mouse button or touch on an on-screen control
    Pointer,
}

impl InputSource {
    #[inline]
    fn bit(self) -> u8 {
        match self {
            InputSource::Keyboard => 0b01,
            InputSource::Pointer => 0b10,
        }
    }
}

/// Map a `KeyboardEvent` (`code`, `key`) to an action
pub fn action_for_key(code: &str, key: &str) -> Option<InputAction> {
    match code {
        "Space" | "ArrowUp" => Some(InputAction::Jump),
        "ArrowDown" | "ShiftLeft" | "ShiftRight" => Some(InputAction::Duck),
        _ if key == "Shift" => Some(InputAction::Duck),
        _ => None,
    }
}

/// Which sources currently hold each action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    jump: u8,
    duck: u8,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    fn mask(&mut self, action: InputAction) -> &mut u8 {
        match action {
            InputAction::Jump => &mut self.jump,
            InputAction::Duck => &mut self.duck,
        }
    }

    pub fn press(&mut self, action: InputAction, source: InputSource) {
        *self.mask(action) |= source.bit();
    }

    pub fn release(&mut self, action: InputAction, source: InputSource) {
        *self.mask(action) &= !source.bit();
    }

    /// Drop everything a source holds (pointer left the button, window blur)
    pub fn release_source(&mut self, source: InputSource) {
        self.jump &= !source.bit();
        self.duck &= !source.bit();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn jump_held(&self) -> bool {
        self.jump != 0
    }

    pub fn duck_held(&self) -> bool {
        self.duck != 0
    }

    /// Push the current levels into the runner
    pub fn apply<R: RandomSource>(&self, runner: &mut Runner<R>) {
        runner.set_duck_input(self.duck_held());
        runner.set_jump_input(self.jump_held());
    }
}
