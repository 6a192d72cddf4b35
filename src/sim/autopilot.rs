//! Demo mode - Granny plays herself
//!
//! Looks at the nearest obstacle ahead and decides whether to jump (trash can)
//! or duck (flying cat). Used by the native headless demo; it is a heuristic,
//! not a guarantee of survival.

use super::state::{ObstacleKind, RunState};
use crate::tuning::Tuning;

/// Ticks of lead time before a trash can reaches Granny
const JUMP_LEAD_TICKS: f32 = 10.0;
/// Ticks of lead time before a cat reaches Granny
const DUCK_LEAD_TICKS: f32 = 14.0;

/// Input levels for the next frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutopilotInput {
    pub jump: bool,
    pub duck: bool,
}

/// Decide the next frame's input from the current snapshot
pub fn autopilot_input(state: &RunState, tuning: &Tuning) -> AutopilotInput {
    let player = &state.player;
    let player_left = player.pos.x;
    let player_right = player.pos.x + player.size.x;

    // Nearest obstacle that has not fully passed Granny yet
    let Some(next) = state
        .obstacles
        .iter()
        .filter(|o| o.right_edge() + tuning.hitbox_margin > player_left)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
    else {
        return AutopilotInput::default();
    };

    let distance = next.pos.x - player_right;
    match next.kind {
        ObstacleKind::GroundHazard => AutopilotInput {
            jump: distance <= state.speed * JUMP_LEAD_TICKS,
            duck: false,
        },
        ObstacleKind::AerialHazard => AutopilotInput {
            jump: false,
            duck: distance <= state.speed * DUCK_LEAD_TICKS,
        },
    }
}
