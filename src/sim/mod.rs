//! Deterministic simulation module
//!
//! All gameplay physics lives here. This module must stay pure and deterministic:
//! - Slices no longer than the configured slice length
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod opponent;
pub mod state;
pub mod step;
pub mod timer;

pub use collision::{CollisionResult, disc_overlap, separate};
pub use entity::{Entity, EntityId, MaterialSlot, Role};
pub use opponent::{Behavior, Maneuver, OpponentBrain, Steering};
pub use state::World;
pub use step::{StepReport, slice_count, step};
pub use timer::RoundTimer;
