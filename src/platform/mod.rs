//! Platform abstraction layer
//!
//! Translates browser keyboard, mouse and touch events into runner inputs,
//! and tracks which page screen is showing.

pub mod input;
pub mod screen;

pub use input::{InputAction, InputSource, InputState, action_for_key};
pub use screen::Screen;
