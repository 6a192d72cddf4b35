//! Runner simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Advances only when the caller ticks it
//! - Injected randomness only
//! - Stable iteration order (spawn order)
//! - No drawing or platform dependencies (rendering goes through `RenderHook`)

pub mod autopilot;
pub mod collision;
pub mod rng;
pub mod runner;
pub mod state;
pub mod tick;

pub use autopilot::{AutopilotInput, autopilot_input};
pub use collision::{Aabb, hitboxes_collide};
pub use rng::RandomSource;
pub use runner::Runner;
pub use state::{GameEvent, Obstacle, ObstacleKind, Player, RunPhase, RunState};
pub use tick::{integrate_player, tick};
