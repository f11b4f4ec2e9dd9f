//! Round timer
//!
//! Counts active play time. Time only advances through [`RoundTimer::update`]
//! (wall clock in seconds) or [`RoundTimer::advance`] (externally fed delta),
//! and only while started. Each delta is clamped to `[0, MAX_FRAME_DELTA]` so
//! a long stall never turns into one giant physics step.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_FRAME_DELTA;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundTimer {
    playing_time: f32,
    delta: f32,
    active: bool,
    /// Clock reading at the previous update
    #[serde(skip)]
    previous: Option<f64>,
    #[serde(default = "default_max_delta")]
    max_delta: f32,
}

fn default_max_delta() -> f32 {
    MAX_FRAME_DELTA
}

impl Default for RoundTimer {
    fn default() -> Self {
        Self::new(MAX_FRAME_DELTA)
    }
}

impl RoundTimer {
    pub fn new(max_delta: f32) -> Self {
        Self {
            playing_time: 0.0,
            delta: 0.0,
            active: false,
            previous: None,
            max_delta,
        }
    }

    /// Zero the clock and stop
    pub fn reset(&mut self) {
        self.playing_time = 0.0;
        self.delta = 0.0;
        self.active = false;
        self.previous = None;
    }

    /// Begin counting; time between `stop` and `start` is not counted
    pub fn start(&mut self) {
        if !self.active {
            self.active = true;
            self.previous = None;
            self.delta = 0.0;
        }
    }

    pub fn stop(&mut self) {
        if self.active {
            self.active = false;
            self.previous = None;
            self.delta = 0.0;
        }
    }

    /// Advance from a wall-clock reading (seconds).
    ///
    /// The first reading after `start` only anchors the clock.
    pub fn update(&mut self, now: f64) {
        if !self.active {
            self.delta = 0.0;
            return;
        }
        let raw = match self.previous {
            Some(prev) => (now - prev) as f32,
            None => 0.0,
        };
        self.previous = Some(now);
        self.advance(raw);
    }

    /// Advance by an externally measured delta (seconds)
    pub fn advance(&mut self, dt: f32) {
        if !self.active {
            self.delta = 0.0;
            return;
        }
        self.delta = if dt.is_finite() { dt.clamp(0.0, self.max_delta) } else { 0.0 };
        self.playing_time += self.delta;
    }

    /// Seconds of active play so far
    #[inline]
    pub fn playing_time(&self) -> f32 {
        self.playing_time
    }

    /// Restore playing time from a save; the delta clock is untouched
    #[inline]
    pub fn set_playing_time(&mut self, seconds: f32) {
        self.playing_time = seconds;
    }

    /// Seconds covered by the last update
    #[inline]
    pub fn delta_time(&self) -> f32 {
        self.delta
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }
}
