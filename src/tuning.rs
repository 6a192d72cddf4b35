//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Defaults reproduce the classic
//! feel; a JSON document can override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a tuning document is rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("`{field}` must be positive (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("`jump_force` must be negative (got {0})")]
    JumpForce(f32),
    #[error("spawn gap range is empty: min {min} > max {max}")]
    GapRange { min: f32, max: f32 },
    #[error("`aerial_chance` must be within [0, 1] (got {0})")]
    AerialChance(f32),
    #[error("duck height {duck} must not exceed standing height {stand}")]
    DuckHeight { duck: f32, stand: f32 },
    #[error("ground line {ground} does not fit a standing player inside [{top}, {bottom}]")]
    GroundLine { ground: f32, top: f32, bottom: f32 },
}

/// Gameplay constants for one run
///
/// Units are pixels and ticks (one tick per animation frame), except the spawn
/// gaps which are milliseconds of frame time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub field_width: f32,
    pub field_height: f32,
    /// Highest y the player may reach
    pub field_top: f32,
    pub ground_y: f32,

    pub gravity: f32,
    pub jump_force: f32,
    pub fast_fall_multiplier: f32,

    pub initial_speed: f32,
    pub speed_increment: f32,
    pub reference_speed: f32,
    pub score_rate: f32,

    pub min_gap_ms: f32,
    pub max_gap_ms: f32,
    pub aerial_chance: f32,

    pub player_x: f32,
    pub player_width: f32,
    pub player_height: f32,
    pub player_duck_height: f32,

    pub ground_hazard_width: f32,
    pub ground_hazard_height: f32,
    pub aerial_hazard_width: f32,
    pub aerial_hazard_height: f32,
    pub aerial_hazard_y: f32,

    pub hitbox_margin: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            field_top: FIELD_TOP,
            ground_y: GROUND_Y,

            gravity: GRAVITY,
            jump_force: JUMP_FORCE,
            fast_fall_multiplier: FAST_FALL_MULTIPLIER,

            initial_speed: INITIAL_SPEED,
            speed_increment: SPEED_INCREMENT,
            reference_speed: REFERENCE_SPEED,
            score_rate: SCORE_RATE,

            min_gap_ms: OBSTACLE_MIN_GAP,
            max_gap_ms: OBSTACLE_MAX_GAP,
            aerial_chance: AERIAL_CHANCE,

            player_x: GRANNY_X,
            player_width: GRANNY_WIDTH,
            player_height: GRANNY_HEIGHT,
            player_duck_height: GRANNY_DUCK_HEIGHT,

            ground_hazard_width: TRASH_CAN_WIDTH,
            ground_hazard_height: TRASH_CAN_HEIGHT,
            aerial_hazard_width: CAT_WIDTH,
            aerial_hazard_height: CAT_HEIGHT,
            aerial_hazard_y: CAT_FLYING_Y,

            hitbox_margin: HITBOX_MARGIN,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("gravity", self.gravity),
            ("fast_fall_multiplier", self.fast_fall_multiplier),
            ("initial_speed", self.initial_speed),
            ("reference_speed", self.reference_speed),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_duck_height", self.player_duck_height),
            ("ground_hazard_width", self.ground_hazard_width),
            ("ground_hazard_height", self.ground_hazard_height),
            ("aerial_hazard_width", self.aerial_hazard_width),
            ("aerial_hazard_height", self.aerial_hazard_height),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        // Zero is allowed for these: a flat ramp, back-to-back spawns, pixel-exact hitboxes
        for (field, value) in [
            ("speed_increment", self.speed_increment),
            ("min_gap_ms", self.min_gap_ms),
            ("score_rate", self.score_rate),
            ("hitbox_margin", self.hitbox_margin),
        ] {
            if !(value >= 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        if !(self.jump_force < 0.0) {
            return Err(TuningError::JumpForce(self.jump_force));
        }
        if self.min_gap_ms > self.max_gap_ms {
            return Err(TuningError::GapRange {
                min: self.min_gap_ms,
                max: self.max_gap_ms,
            });
        }
        if !(0.0..=1.0).contains(&self.aerial_chance) {
            return Err(TuningError::AerialChance(self.aerial_chance));
        }
        if self.player_duck_height > self.player_height {
            return Err(TuningError::DuckHeight {
                duck: self.player_duck_height,
                stand: self.player_height,
            });
        }
        if self.ground_y - self.player_height < self.field_top || self.ground_y > self.field_height {
            return Err(TuningError::GroundLine {
                ground: self.ground_y,
                top: self.field_top,
                bottom: self.field_height,
            });
        }
        Ok(())
    }

    /// Resting y for a player of the given height
    #[inline]
    pub fn floor_for(&self, height: f32) -> f32 {
        self.ground_y - height
    }

    /// Next spawn gap for a raw sample drawn from `[min_gap_ms, max_gap_ms]`
    ///
    /// Gaps shrink as the game speeds up so obstacles keep arriving at a
    /// similar spacing on screen.
    #[inline]
    pub fn scaled_gap(&self, raw_gap_ms: f32, speed: f32) -> f32 {
        raw_gap_ms * (self.reference_speed / speed)
    }
}
