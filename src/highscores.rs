//! Best round time
//!
//! A round is won by ringing the opponent out; the faster the better. Zero
//! means no round has been won yet. Persisted through [`PersistentState`].

use serde::{Deserialize, Serialize};

use crate::persistence::{PersistentState, keys};

/// Fastest winning round, in seconds (0 = none yet)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub best_round_time: f32,
}

impl HighScore {
    /// Check if a winning time beats the stored best
    pub fn qualifies(stored: f32, time: f32) -> bool {
        if !(time.is_finite() && time > 0.0) {
            return false;
        }
        stored <= 0.0 || time < stored
    }

    /// Load the stored best (0 when nothing has been saved)
    pub fn load(state: &PersistentState) -> Self {
        let best_round_time = state.load_float(keys::BEST_ROUND_TIME, 0.0);
        if best_round_time > 0.0 {
            log::info!("Loaded best round time {:.2}s", best_round_time);
        } else {
            log::info!("No best round time found, starting fresh");
        }
        Self { best_round_time }
    }

    /// Persist `time` if it beats what is stored. Returns whether it was written.
    ///
    /// Saving the same time twice leaves the store unchanged.
    pub fn save_if_better(state: &mut PersistentState, time: f32) -> bool {
        let stored = state.load_float(keys::BEST_ROUND_TIME, 0.0);
        if !Self::qualifies(stored, time) {
            return false;
        }
        state.save_float(keys::BEST_ROUND_TIME, time);
        log::info!("New best round time {:.2}s (was {:.2}s)", time, stored);
        true
    }

    /// Whole seconds for the stats overlay
    pub fn display_seconds(&self) -> u32 {
        self.best_round_time.max(0.0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn state() -> PersistentState {
        PersistentState::new(Box::new(MemoryStore::new()), "Test")
    }

    #[test]
    fn test_qualifies() {
        assert!(HighScore::qualifies(0.0, 30.0));
        assert!(HighScore::qualifies(30.0, 29.5));
        assert!(!HighScore::qualifies(30.0, 30.0));
        assert!(!HighScore::qualifies(30.0, 31.0));
        assert!(!HighScore::qualifies(0.0, 0.0));
    }

    #[test]
    fn test_only_better_times_are_saved() {
        let mut s = state();
        assert!(HighScore::save_if_better(&mut s, 40.0));
        assert!(!HighScore::save_if_better(&mut s, 55.0));
        assert_eq!(HighScore::load(&s).best_round_time, 40.0);
        assert!(HighScore::save_if_better(&mut s, 12.5));
        assert_eq!(HighScore::load(&s).best_round_time, 12.5);
    }

    #[test]
    fn test_repeated_save_is_idempotent() {
        let mut s = state();
        assert!(HighScore::save_if_better(&mut s, 20.0));
        assert!(!HighScore::save_if_better(&mut s, 20.0));
        assert_eq!(HighScore::load(&s).best_round_time, 20.0);
    }

    #[test]
    fn test_display_seconds() {
        let hs = HighScore { best_round_time: 12.9 };
        assert_eq!(hs.display_seconds(), 12);
        assert_eq!(HighScore::default().display_seconds(), 0);
    }
}
