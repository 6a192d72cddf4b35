//! Run state and core simulation types
//!
//! Everything the presentation layer needs to draw a frame lives here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::Tuning;

/// Run-level phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Reset, waiting to start
    Idle,
    /// Ticking
    Active,
    /// Collision happened; frozen until reset
    Ended,
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Trash can standing on the ground; jump over it
    GroundHazard,
    /// Flying cat hanging from the top; duck under it
    AerialHazard,
}

/// Outputs emitted by a tick, drained by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Current (unfloored) score, emitted every active tick
    ScoreChanged(f32),
    /// Run ended; carries the floored final score
    GameOver { score: u32 },
}

/// Granny
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner; x never changes
    pub pos: Vec2,
    /// Width and current height (standing or ducking)
    pub size: Vec2,
    /// Vertical velocity in pixels per tick (negative is up)
    pub vy: f32,
    /// Airborne
    pub is_jumping: bool,
    pub is_ducking: bool,
}

impl Player {
    /// Grounded, standing pose
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.player_x, tuning.floor_for(tuning.player_height)),
            size: Vec2::new(tuning.player_width, tuning.player_height),
            vy: 0.0,
            is_jumping: false,
            is_ducking: false,
        }
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        !self.is_jumping
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    /// Launch upward (caller checks that the player is grounded)
    pub fn jump(&mut self, tuning: &Tuning) {
        self.vy = tuning.jump_force;
        self.is_jumping = true;
    }

    /// Crouch; snaps to the ground when grounded, physics handles the air
    pub fn duck(&mut self, tuning: &Tuning) {
        self.is_ducking = true;
        self.size.y = tuning.player_duck_height;
        if self.is_grounded() {
            self.pos.y = tuning.floor_for(self.size.y);
        }
    }

    /// Stand back up
    pub fn stand(&mut self, tuning: &Tuning) {
        self.is_ducking = false;
        self.size.y = tuning.player_height;
        let floor = tuning.floor_for(self.size.y);
        if self.is_grounded() {
            self.pos.y = floor;
        } else {
            // Growing taller near the ground must not push the feet below it
            self.pos.y = self.pos.y.min(floor);
        }
    }
}

/// A trash can or flying cat scrolling toward Granny
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Global speed at spawn time
    pub speed: f32,
}

impl Obstacle {
    /// Create an obstacle at the right edge of the field
    pub fn spawn(id: u32, kind: ObstacleKind, tuning: &Tuning, speed: f32) -> Self {
        let (size, y) = match kind {
            ObstacleKind::GroundHazard => {
                let size = Vec2::new(tuning.ground_hazard_width, tuning.ground_hazard_height);
                (size, tuning.ground_y - size.y)
            }
            ObstacleKind::AerialHazard => (
                Vec2::new(tuning.aerial_hazard_width, tuning.aerial_hazard_height),
                tuning.aerial_hazard_y,
            ),
        };
        Self {
            id,
            kind,
            pos: Vec2::new(tuning.field_width, y),
            size,
            speed,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn right_edge(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// Fully scrolled past the left edge of the field
    #[inline]
    pub fn is_off_field(&self) -> bool {
        self.right_edge() < 0.0
    }
}

/// Complete state of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub phase: RunPhase,
    pub player: Player,
    /// Active obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    /// Accumulated score (floored for display)
    pub score: f32,
    /// Global scroll speed in pixels per tick
    pub speed: f32,
    /// Frame timestamp of the last spawn (or of the first tick)
    pub last_spawn_ms: Option<f64>,
    /// Time to wait after `last_spawn_ms` before the next spawn
    pub next_gap_ms: f32,
    /// Active ticks since reset
    pub time_ticks: u64,
    /// Next obstacle ID
    next_id: u32,
}

impl RunState {
    /// Fresh, idle run with the given initial spawn gap
    pub fn new(tuning: &Tuning, initial_gap_ms: f32) -> Self {
        Self {
            phase: RunPhase::Idle,
            player: Player::new(tuning),
            obstacles: Vec::new(),
            score: 0.0,
            speed: tuning.initial_speed,
            last_spawn_ms: None,
            next_gap_ms: initial_gap_ms,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new obstacle ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Score as shown to the player
    #[inline]
    pub fn display_score(&self) -> u32 {
        self.score.floor() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;

    #[test]
    fn test_new_player_stands_on_ground() {
        let tuning = Tuning::default();
        let player = Player::new(&tuning);
        assert_eq!(player.pos, Vec2::new(GRANNY_X, GROUND_Y - GRANNY_HEIGHT));
        assert_eq!(player.size.y, GRANNY_HEIGHT);
        assert!(player.is_grounded());
        assert!(!player.is_ducking);
    }

    #[test]
    fn test_duck_and_stand_on_ground() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);

        player.duck(&tuning);
        assert_eq!(player.size.y, GRANNY_DUCK_HEIGHT);
        assert_eq!(player.pos.y, GROUND_Y - GRANNY_DUCK_HEIGHT);

        player.stand(&tuning);
        assert_eq!(player.size.y, GRANNY_HEIGHT);
        assert_eq!(player.pos.y, GROUND_Y - GRANNY_HEIGHT);
    }

    #[test]
    fn test_duck_in_air_keeps_y() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        player.jump(&tuning);
        player.pos.y = 40.0;

        player.duck(&tuning);
        assert_eq!(player.pos.y, 40.0);
        assert_eq!(player.size.y, GRANNY_DUCK_HEIGHT);

        // Standing up just above the ground clamps the feet to it
        player.pos.y = GROUND_Y - GRANNY_DUCK_HEIGHT - 1.0;
        player.stand(&tuning);
        assert_eq!(player.pos.y, GROUND_Y - GRANNY_HEIGHT);
    }

    #[test]
    fn test_obstacle_spawn_positions() {
        let tuning = Tuning::default();

        let can = Obstacle::spawn(1, ObstacleKind::GroundHazard, &tuning, INITIAL_SPEED);
        assert_eq!(can.pos, Vec2::new(FIELD_WIDTH, GROUND_Y - TRASH_CAN_HEIGHT));
        assert_eq!(can.size, Vec2::new(TRASH_CAN_WIDTH, TRASH_CAN_HEIGHT));

        let cat = Obstacle::spawn(2, ObstacleKind::AerialHazard, &tuning, INITIAL_SPEED);
        assert_eq!(cat.pos, Vec2::new(FIELD_WIDTH, CAT_FLYING_Y));
        assert_eq!(cat.size, Vec2::new(CAT_WIDTH, CAT_HEIGHT));
        assert!(!cat.is_off_field());
    }

    #[test]
    fn test_entity_ids_increase() {
        let mut state = RunState::new(&Tuning::default(), 200.0);
        assert_eq!(state.next_entity_id(), 1);
        assert_eq!(state.next_entity_id(), 2);
    }
}
