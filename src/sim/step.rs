//! Fixed-slice physics step
//!
//! One frame of play: the frame delta is cut into slices no longer than the
//! slice length, and each slice integrates the player, lets the opponent
//! decide, then resolves contact between the two blocks. A call is never
//! interrupted partway.

use rand::Rng;

use super::collision::{disc_overlap, separate};
use super::state::World;

/// What happened during one call to [`step`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Number of slices simulated
    pub slices: u32,
    /// Slices that ended with the blocks in contact
    pub contacts: u32,
}

/// Number of slices a frame of `frame_dt` seconds is cut into
#[inline]
pub fn slice_count(frame_dt: f32, slice_length: f32) -> u32 {
    if !frame_dt.is_finite() || frame_dt <= 0.0 {
        return 0;
    }
    (frame_dt / slice_length).ceil().max(1.0) as u32
}

/// Advance the world by `frame_dt` seconds
///
/// # Panics
///
/// If `slice_length` is not positive, or the opponent has no target. Both are
/// setup mistakes rather than runtime conditions.
pub fn step<R: Rng + ?Sized>(
    world: &mut World,
    frame_dt: f32,
    slice_length: f32,
    body_diameter: f32,
    rng: &mut R,
) -> StepReport {
    assert!(slice_length > 0.0, "slice length must be positive, got {slice_length}");

    let player = world.player_id();
    let opponent = world.opponent_id();
    let slices = slice_count(frame_dt, slice_length);
    let mut report = StepReport {
        slices,
        contacts: 0,
    };

    for i in 0..slices {
        // Full slices, with whatever is left over going into the last one
        let dt = if i + 1 == slices {
            (frame_dt - slice_length * (slices - 1) as f32).clamp(0.0, slice_length)
        } else {
            slice_length
        };

        let p = world.player();
        let next = p.position() + p.velocity() * dt;
        world.set_position(player, next);

        let own = world.opponent().position();
        let Some(target) = world.target_position(opponent) else {
            panic!("opponent {opponent:?} has no target to steer against");
        };
        let steering = world.brain.decide(dt, own, target, rng);
        world.set_position(opponent, own + steering.displacement(dt));

        let a = world.player().position();
        let b = world.opponent().position();
        let contact = disc_overlap(a, b, body_diameter);
        if contact.hit {
            let (a, b) = separate(a, b, &contact);
            world.set_position(player, a);
            world.set_position(opponent, b);
            report.contacts += 1;
        }
    }

    report
}
