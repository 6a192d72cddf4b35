//! Rendering module
//!
//! The simulation hands its state to a [`RenderHook`] after every tick. The
//! browser build draws with Canvas 2D; the native build only traces.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use crate::sim::RunState;

/// Receives the run state once per frame
pub trait RenderHook {
    fn render(&mut self, state: &RunState, time_ms: f64);
}

/// Logs a one-line summary every `every` frames (headless runs)
#[derive(Debug, Clone)]
pub struct LogRenderer {
    every: u64,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl RenderHook for LogRenderer {
    fn render(&mut self, state: &RunState, time_ms: f64) {
        if state.time_ticks % self.every != 0 {
            return;
        }
        let player = &state.player;
        log::debug!(
            "t={:.0}ms tick={} score={} speed={:.2} granny_y={:.1}{}{} obstacles={}",
            time_ms,
            state.time_ticks,
            state.display_score(),
            state.speed,
            player.pos.y,
            if player.is_jumping { " [air]" } else { "" },
            if player.is_ducking { " [duck]" } else { "" },
            state.obstacles.len()
        );
    }
}
