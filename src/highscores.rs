//! High score keeping
//!
//! A single best score persisted to LocalStorage as a plain integer. Keeping
//! it is best-effort: unreadable values count as zero and failed writes are
//! logged and dropped.

use serde::{Deserialize, Serialize};

/// Best score across runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u32,
}

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "grannyHighscore";

    pub fn new() -> Self {
        Self { best: 0 }
    }

    /// Parse a stored value; anything unreadable is zero
    pub fn from_stored(value: &str) -> Self {
        Self {
            best: value.trim().parse().unwrap_or(0),
        }
    }

    /// Check if a score beats the current best
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.best
    }

    /// Record a finished run; returns true on a new best
    pub fn record(&mut self, score: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        true
    }

    /// Load the high score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(value)) = storage.get_item(Self::STORAGE_KEY) {
                let high = Self::from_stored(&value);
                log::info!("Loaded high score {}", high.best);
                return high;
            }
        }

        log::info!("No high score found, starting fresh");
        Self::new()
    }

    /// Save the high score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        match storage {
            Some(storage) => {
                if storage
                    .set_item(Self::STORAGE_KEY, &self.best.to_string())
                    .is_err()
                {
                    log::warn!("High score not saved (storage refused write)");
                } else {
                    log::info!("High score saved ({})", self.best);
                }
            }
            None => log::warn!("High score not saved (no LocalStorage)"),
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
