//! Sumo Arena - two blocks, one circular mat, first one off the edge loses
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, opponent AI, timer, physics step)
//! - `game`: Round-level game logic (start, pause, continue, save/load)
//! - `app`: Application state machine driving loading, press prompts and play
//! - `persistence`: Key/value save contract plus memory and JSON file stores
//! - `resources`: Background device-resource build with a single-thread finalize
//! - `render`: Render list, camera parameters and GPU instance records
//! - `settings`: Data-driven tunables

pub mod app;
pub mod game;
pub mod highscores;
pub mod logging;
pub mod math;
pub mod persistence;
pub mod render;
pub mod resources;
pub mod settings;
pub mod sim;

pub use app::{ActionPrompt, App, AppEvent, FrameInput, Mode, Notification, Overlay, PressResult};
pub use game::{RunOutcome, SumoGame};
pub use highscores::HighScore;
pub use persistence::{JsonFileStore, KeyValueStore, MemoryStore, PersistentState, StoreError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Physics slice length (60 Hz); longer frames are cut into slices of this size
    pub const FRAME_LENGTH: f32 = 1.0 / 60.0;
    /// Largest frame delta the timer will report (guards resume-from-suspend)
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// A body further than this from the origin has left the mat
    pub const ARENA_RADIUS: f32 = 10.0;
    /// Both blocks are one unit wide
    pub const BODY_DIAMETER: f32 = 1.0;

    /// Spawn points
    pub const PLAYER_SPAWN: Vec3 = Vec3::new(-3.0, 0.5, 0.0);
    pub const OPPONENT_SPAWN: Vec3 = Vec3::new(3.0, 0.5, 0.0);
    /// The floor cylinder sits just under the blocks
    pub const FLOOR_POSITION: Vec3 = Vec3::new(0.0, -1.0, 0.0);

    /// Opponent re-roll delay range (seconds), half-open
    pub const MANEUVER_DELAY_MIN: f32 = 1.0;
    pub const MANEUVER_DELAY_MAX: f32 = 3.0;
    /// Maneuver held by a freshly spawned opponent until its first re-roll
    pub const INITIAL_MANEUVER_DELAY: f32 = 2.0;

    /// Windows narrower than this interrupt play
    pub const MIN_WINDOW_WIDTH: f32 = 768.0;

    /// Default camera placement
    pub const CAMERA_EYE: Vec3 = Vec3::new(0.0, 7.0, 10.0);
    pub const CAMERA_LOOK_AT: Vec3 = Vec3::new(0.0, -5.0, 0.0);
    pub const CAMERA_UP: Vec3 = Vec3::Y;

    /// Prefix applied to every persisted key
    pub const SAVE_PREFIX: &str = "SumoGame";
}
