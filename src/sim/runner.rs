//! Runner simulation object
//!
//! Owns the run state, tuning and random source, and exposes the control
//! surface the input and presentation layers use. Callers drive it one frame
//! at a time; it never schedules itself.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::rng::RandomSource;
use super::state::{GameEvent, RunPhase, RunState};
use super::tick::tick;
use crate::renderer::RenderHook;
use crate::tuning::Tuning;

/// One player's run, from reset to game over
#[derive(Debug, Clone)]
pub struct Runner<R: RandomSource = Pcg32> {
    tuning: Tuning,
    rng: R,
    state: RunState,
    events: Vec<GameEvent>,
    /// Last jump input level, for edge detection
    jump_held: bool,
}

impl Runner<Pcg32> {
    /// Runner backed by a seeded PCG generator
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        Self::new(tuning, Pcg32::seed_from_u64(seed))
    }
}

impl<R: RandomSource> Runner<R> {
    /// Create an idle runner
    pub fn new(tuning: Tuning, mut rng: R) -> Self {
        let gap = rng.range(tuning.min_gap_ms, tuning.max_gap_ms);
        let state = RunState::new(&tuning, gap);
        Self {
            tuning,
            rng,
            state,
            events: Vec::new(),
            jump_held: false,
        }
    }

    /// Return to a fresh idle run
    ///
    /// Clears obstacles and pending events, restores initial speed and a zero
    /// score, stands the player on the ground and samples a new spawn gap.
    pub fn reset(&mut self) {
        let gap = self.rng.range(self.tuning.min_gap_ms, self.tuning.max_gap_ms);
        self.state = RunState::new(&self.tuning, gap);
        self.events.clear();
        self.jump_held = false;
    }

    /// Reset and begin ticking
    pub fn start(&mut self) {
        self.reset();
        self.state.phase = RunPhase::Active;
        log::info!("Run started (initial gap {:.0} ms)", self.state.next_gap_ms);
    }

    /// Jump on a rising edge while grounded
    pub fn set_jump_input(&mut self, pressed: bool) {
        let rising = pressed && !self.jump_held;
        self.jump_held = pressed;

        if rising && self.state.phase == RunPhase::Active && self.state.player.is_grounded() {
            self.state.player.jump(&self.tuning);
        }
    }

    /// Duck while held, stand on release
    ///
    /// Ignored outside an active run; `reset` restores the standing pose.
    pub fn set_duck_input(&mut self, pressed: bool) {
        if self.state.phase != RunPhase::Active {
            return;
        }
        let player = &mut self.state.player;
        if pressed {
            player.duck(&self.tuning);
        } else if player.is_ducking {
            player.stand(&self.tuning);
        }
    }

    /// Advance one animation frame (no-op unless active)
    pub fn tick(&mut self, now_ms: f64) {
        tick(
            &mut self.state,
            &self.tuning,
            &mut self.rng,
            now_ms,
            &mut self.events,
        );
    }

    /// Tick once per frame timestamp until the run ends or frames run out,
    /// handing each resulting frame to `hook`
    ///
    /// Returns the final score if the run ended.
    pub fn drive<I, H>(&mut self, frames: I, hook: &mut H) -> Option<u32>
    where
        I: IntoIterator<Item = f64>,
        H: RenderHook + ?Sized,
    {
        for now_ms in frames {
            if self.state.phase != RunPhase::Active {
                break;
            }
            self.tick(now_ms);
            hook.render(&self.state, now_ms);
        }
        self.final_score()
    }

    /// Snapshot for the presentation layer
    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    pub fn is_active(&self) -> bool {
        self.state.phase == RunPhase::Active
    }

    /// Current score (unfloored)
    pub fn score(&self) -> f32 {
        self.state.score
    }

    /// Floored score once the run has ended
    pub fn final_score(&self) -> Option<u32> {
        (self.state.phase == RunPhase::Ended).then(|| self.state.display_score())
    }

    /// Take the events emitted since the last drain
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut RunState {
        &mut self.state
    }
}
