//! Granny Run - a side-scrolling obstacle-dodging runner
//!
//! Core modules:
//! - `sim`: Deterministic runner simulation (physics, spawning, collisions, score)
//! - `tuning`: Data-driven game balance
//! - `renderer`: Render hook and Canvas 2D drawing
//! - `platform`: Browser input mapping
//! - `commentary`: Post-run one-liner from a text generation service

pub mod commentary;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Frame duration the simulation is tuned for (60 Hz display refresh)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 200.0;
    pub const FIELD_TOP: f32 = 0.0;
    pub const GROUND_Y: f32 = 160.0;

    /// Physics (pixels per tick)
    pub const GRAVITY: f32 = 0.28;
    pub const JUMP_FORCE: f32 = -8.5;
    /// Gravity multiplier when ducking mid-air
    pub const FAST_FALL_MULTIPLIER: f32 = 4.0;

    /// Scroll speed ramp
    pub const INITIAL_SPEED: f32 = 4.2;
    pub const SPEED_INCREMENT: f32 = 0.0015;
    /// Speed at which spawn gaps are used unscaled
    pub const REFERENCE_SPEED: f32 = 10.0;
    /// Score per tick at initial speed
    pub const SCORE_RATE: f32 = 0.15;

    /// Spawn gap bounds (milliseconds)
    pub const OBSTACLE_MIN_GAP: f32 = 180.0;
    pub const OBSTACLE_MAX_GAP: f32 = 450.0;
    /// Probability that a spawned obstacle is a flying cat
    pub const AERIAL_CHANCE: f32 = 0.6;

    /// Granny
    pub const GRANNY_X: f32 = 50.0;
    pub const GRANNY_WIDTH: f32 = 44.0;
    pub const GRANNY_HEIGHT: f32 = 47.0;
    pub const GRANNY_DUCK_HEIGHT: f32 = 28.0;

    /// Ground hazard (trash can)
    pub const TRASH_CAN_WIDTH: f32 = 25.0;
    pub const TRASH_CAN_HEIGHT: f32 = 45.0;

    /// Aerial hazard (flying cat), hangs from the top of the field to just above ducking height
    pub const CAT_WIDTH: f32 = 50.0;
    pub const CAT_HEIGHT: f32 = 125.0;
    pub const CAT_FLYING_Y: f32 = 0.0;

    /// Inward inset applied to every hitbox
    pub const HITBOX_MARGIN: f32 = 5.0;
}
