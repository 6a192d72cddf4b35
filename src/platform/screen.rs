//! Page screens
//!
//! Which overlay is up, and which inputs leave it for a new run.

use super::input::InputAction;

/// DOM id of the title overlay
pub const TITLE_OVERLAY: &str = "title-overlay";
/// DOM id of the game-over overlay
pub const GAME_OVER_OVERLAY: &str = "game-over";
/// DOM id of the on-screen jump/duck buttons
pub const TOUCH_CONTROLS: &str = "touch-controls";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Title,
    Playing,
    GameOver,
}

impl Screen {
    /// Whether a key press starts a run from this screen
    ///
    /// Auto-repeat never counts, so a jump key still held from the crash
    /// cannot skip the game-over screen.
    pub fn starts_run_on_key(self, action: InputAction, repeat: bool) -> bool {
        self != Screen::Playing && action == InputAction::Jump && !repeat
    }

    /// Whether a click on an overlay starts a run from this screen
    pub fn starts_run_on_click(self) -> bool {
        self != Screen::Playing
    }

    /// Visibility of each page element for this screen
    pub fn overlays(self) -> [(&'static str, bool); 3] {
        [
            (TITLE_OVERLAY, self == Screen::Title),
            (GAME_OVER_OVERLAY, self == Screen::GameOver),
            (TOUCH_CONTROLS, self == Screen::Playing),
        ]
    }
}
