//! Opponent decision making
//!
//! The opponent holds one of three maneuvers for a random delay, then re-rolls.
//! Its behavior tier doubles as a speed scalar, so an Easy opponent never
//! pushes and dodges backwards.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{INITIAL_MANEUVER_DELAY, MANEUVER_DELAY_MAX, MANEUVER_DELAY_MIN};
use crate::math::planar;

/// Opponent difficulty tier (ordinal is used as a numeric speed multiplier)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Behavior {
    #[default]
    Easy = 0,
    Normal = 1,
    Angry = 2,
}

impl Behavior {
    pub const ALL: [Behavior; 3] = [Behavior::Easy, Behavior::Normal, Behavior::Angry];

    /// Ordinal as a float
    #[inline]
    pub fn scalar(self) -> f32 {
        self as u8 as f32
    }

    /// Uniform draw over the three tiers
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Behavior::Easy => "Easy",
            Behavior::Normal => "Normal",
            Behavior::Angry => "Angry",
        }
    }
}

/// The opponent's current movement pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Maneuver {
    /// Walk toward the target at base speed
    #[default]
    Advance,
    /// Walk toward the target at `intensity` speed
    Push,
    /// Sidestep perpendicular to the target at `intensity - 1` speed
    Dodge,
}

impl Maneuver {
    pub const ALL: [Maneuver; 3] = [Maneuver::Advance, Maneuver::Push, Maneuver::Dodge];
}

/// Movement chosen for one slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    /// Unit direction in the X/Z plane (zero when the target is directly above/below)
    pub direction: Vec3,
    /// Speed multiplier; may be zero or negative at the Easy tier
    pub speed: f32,
}

impl Steering {
    /// Offset to apply over `dt` seconds
    #[inline]
    pub fn displacement(&self, dt: f32) -> Vec3 {
        self.direction * dt * self.speed
    }
}

/// Timed maneuver selector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpponentBrain {
    pub behavior: Behavior,
    maneuver: Maneuver,
    /// Seconds left before the next re-roll
    timer: f32,
}

impl Default for OpponentBrain {
    fn default() -> Self {
        Self::new(Behavior::default())
    }
}

impl OpponentBrain {
    pub fn new(behavior: Behavior) -> Self {
        Self::with_maneuver(behavior, Maneuver::Advance, INITIAL_MANEUVER_DELAY)
    }

    /// Start with a specific maneuver held for `delay` seconds
    pub fn with_maneuver(behavior: Behavior, maneuver: Maneuver, delay: f32) -> Self {
        Self {
            behavior,
            maneuver,
            timer: delay,
        }
    }

    #[inline]
    pub fn maneuver(&self) -> Maneuver {
        self.maneuver
    }

    #[inline]
    pub fn timer(&self) -> f32 {
        self.timer
    }

    /// Tick the re-roll timer and pick a steering toward/around `target`
    pub fn decide<R: Rng + ?Sized>(&mut self, dt: f32, own: Vec3, target: Vec3, rng: &mut R) -> Steering {
        self.timer -= dt;
        if self.timer <= 0.0 {
            self.maneuver = Maneuver::ALL[rng.random_range(0..Maneuver::ALL.len())];
            self.timer = rng.random_range(MANEUVER_DELAY_MIN..MANEUVER_DELAY_MAX);
            log::debug!(
                "Opponent ({}) switched to {:?} for {:.2}s",
                self.behavior.as_str(),
                self.maneuver,
                self.timer
            );
        }

        let to_target = planar(target - own);
        let intensity = self.behavior.scalar();
        match self.maneuver {
            Maneuver::Advance => Steering {
                direction: to_target.normalize_or_zero(),
                speed: 1.0,
            },
            Maneuver::Push => Steering {
                direction: to_target.normalize_or_zero(),
                speed: intensity,
            },
            Maneuver::Dodge => Steering {
                direction: to_target.cross(Vec3::Y).normalize_or_zero(),
                speed: intensity - 1.0,
            },
        }
    }
}
