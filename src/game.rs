//! Round-level game logic
//!
//! [`SumoGame`] owns the world, the round timer, the RNG and the save slot.
//! The application state machine decides *when* to call into it; this type
//! decides *what* each call does to the round.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::highscores::HighScore;
use crate::math::is_out_of_arena;
use crate::persistence::{KeyValueStore, PersistentState, keys};
use crate::render::{Camera, RenderObject, render_list};
use crate::settings::Settings;
use crate::sim::{Behavior, RoundTimer, StepReport, World, step};

/// Result of one frame of active play
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Both blocks are still on the mat
    Active,
    /// The player was pushed (or walked) off
    PlayerLost,
    /// The opponent is off the mat
    GameComplete,
}

/// Per-frame input consumed during active play
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayInput {
    /// Player velocity for this frame (units/s)
    pub velocity: Vec3,
    /// Where the player wants the camera to look, if anywhere
    pub look_direction: Option<Vec3>,
}

pub struct SumoGame {
    settings: Settings,
    world: World,
    timer: RoundTimer,
    rng: Pcg32,
    saved: PersistentState,
    camera: Camera,
    top_score: HighScore,
    /// Duration of the most recently finished round, won or lost
    last_round_time: f32,
    /// A round is in progress (persisted so a relaunch can continue it)
    round_active: bool,
    last_step: StepReport,
}

impl std::fmt::Debug for SumoGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SumoGame")
            .field("round_active", &self.round_active)
            .field("playing_time", &self.timer.playing_time())
            .field("behavior", &self.world.brain.behavior)
            .field("top_score", &self.top_score)
            .finish_non_exhaustive()
    }
}

impl SumoGame {
    /// Build the arena, then pull the best time and any unfinished round from `store`
    pub fn new(settings: Settings, store: Box<dyn KeyValueStore>) -> Self {
        let seed = settings.seed.unwrap_or_else(clock_seed);
        let mut rng = Pcg32::seed_from_u64(seed);
        let behavior = settings.fixed_behavior.unwrap_or_else(|| Behavior::random(&mut rng));
        let world = World::new(settings.player_spawn, settings.opponent_spawn, behavior);
        let saved = PersistentState::new(store, settings.save_prefix.clone());

        let mut game = Self {
            timer: RoundTimer::new(settings.max_frame_delta),
            camera: Camera::new(settings.camera),
            settings,
            world,
            rng,
            saved,
            top_score: HighScore::default(),
            last_round_time: 0.0,
            round_active: false,
            last_step: StepReport::default(),
        };
        log::info!("Game initialized with seed {} ({} opponent)", seed, behavior.as_str());

        game.load_high_score();
        game.load_state();
        game
    }

    fn roll_behavior(&mut self) -> Behavior {
        self.settings
            .fixed_behavior
            .unwrap_or_else(|| Behavior::random(&mut self.rng))
    }

    fn reset_round(&mut self) {
        let behavior = self.roll_behavior();
        self.world
            .reset_round(self.settings.player_spawn, self.settings.opponent_spawn, behavior);
        self.camera.set_view_params(self.settings.camera);
        log::info!("Round reset ({} opponent)", behavior.as_str());
    }

    /// Back to the spawn layout with no round running; the save slot is cleared
    pub fn load_game(&mut self) {
        self.reset_round();
        self.round_active = false;
        self.timer.reset();
        self.save_state();
    }

    /// Fresh round: spawns, new opponent tier, timer from zero
    pub fn start_level(&mut self) {
        self.reset_round();
        self.timer.reset();
        self.timer.start();
        self.round_active = true;
        log::info!("Round started");
    }

    /// Stop the clock and write the round to the save slot
    pub fn pause_game(&mut self) {
        self.timer.stop();
        self.save_state();
        log::info!("Round paused at {:.2}s", self.timer.playing_time());
    }

    /// Resume the clock without moving anything
    pub fn continue_game(&mut self) {
        self.timer.start();
        log::info!("Round continued at {:.2}s", self.timer.playing_time());
    }

    /// One frame of active play at wall-clock time `now` (seconds)
    pub fn run_game(&mut self, input: &PlayInput, now: f64) -> RunOutcome {
        self.timer.update(now);
        self.run_frame(input, self.timer.delta_time())
    }

    /// One frame of active play after the timer has been advanced
    fn run_frame(&mut self, input: &PlayInput, dt: f32) -> RunOutcome {
        if let Some(direction) = input.look_direction {
            self.camera.set_look_direction(direction);
        }
        self.world.set_velocity(self.world.player_id(), input.velocity);

        self.last_step = step(
            &mut self.world,
            dt,
            self.settings.frame_length,
            self.settings.body_diameter,
            &mut self.rng,
        );

        let radius = self.settings.arena_radius;
        if is_out_of_arena(self.world.player().position(), radius) {
            // Shown on the game-over overlay, never a best time
            self.last_round_time = self.timer.playing_time();
            log::info!("Player rang out after {:.2}s", self.last_round_time);
            self.end_round();
            return RunOutcome::PlayerLost;
        }
        if is_out_of_arena(self.world.opponent().position(), radius) {
            self.last_round_time = self.timer.playing_time();
            log::info!("Opponent rang out after {:.2}s", self.last_round_time);
            self.save_high_score();
            self.end_round();
            return RunOutcome::GameComplete;
        }
        RunOutcome::Active
    }

    fn end_round(&mut self) {
        self.timer.stop();
        self.round_active = false;
        self.save_state();
    }

    /// Advance by an explicit delta instead of a clock reading
    pub fn run_game_for(&mut self, input: &PlayInput, dt: f32) -> RunOutcome {
        self.timer.advance(dt);
        self.run_frame(input, self.timer.delta_time())
    }

    pub fn save_state(&mut self) {
        let player = self.world.player().position();
        let opponent = self.world.opponent().position();
        self.saved.save_bool(keys::GAME_ACTIVE, self.round_active);
        self.saved.save_float(keys::PLAYING_TIME, self.timer.playing_time());
        self.saved.save_vec3(keys::PLAYER_POSITION, player);
        self.saved.save_vec3(keys::OPPONENT_POSITION, opponent);
    }

    /// Restore an unfinished round, if the save slot holds one
    pub fn load_state(&mut self) {
        self.round_active = self.saved.load_bool(keys::GAME_ACTIVE, self.round_active);
        if !self.round_active {
            return;
        }
        let player = self.saved.load_vec3(keys::PLAYER_POSITION, self.settings.player_spawn);
        let opponent = self.saved.load_vec3(keys::OPPONENT_POSITION, self.settings.opponent_spawn);
        self.world.set_position(self.world.player_id(), player);
        self.world.set_position(self.world.opponent_id(), opponent);
        self.timer
            .set_playing_time(self.saved.load_float(keys::PLAYING_TIME, 0.0));
        log::info!("Restored unfinished round at {:.2}s", self.timer.playing_time());
    }

    pub fn load_high_score(&mut self) {
        self.top_score = HighScore::load(&self.saved);
    }

    /// Persist the last round time if it beats the stored best.
    ///
    /// The in-memory best only moves when the store accepted the new time.
    pub fn save_high_score(&mut self) -> bool {
        let time = self.last_round_time;
        let saved = HighScore::save_if_better(&mut self.saved, time);
        if saved {
            self.top_score.best_round_time = time;
        }
        saved
    }

    /// Flush the round before the process may be frozen or closed
    pub fn on_suspending(&mut self) {
        self.save_state();
    }

    pub fn on_resuming(&mut self) {
        log::debug!("Game resumed");
    }

    #[inline]
    pub fn is_round_active(&self) -> bool {
        self.round_active
    }

    /// The round clock is running
    #[inline]
    pub fn is_active_play(&self) -> bool {
        self.timer.is_active()
    }

    #[inline]
    pub fn high_score(&self) -> HighScore {
        self.top_score
    }

    /// Seconds the last finished round lasted (0 before the first one ends)
    #[inline]
    pub fn last_round_time(&self) -> f32 {
        self.last_round_time
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[inline]
    pub fn timer(&self) -> &RoundTimer {
        &self.timer
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn last_step(&self) -> StepReport {
        self.last_step
    }

    pub fn render_objects(&self) -> Vec<RenderObject> {
        render_list(&self.world)
    }

    pub fn persistent(&self) -> &PersistentState {
        &self.saved
    }

    /// Give back the store (e.g. to simulate a relaunch)
    pub fn into_store(self) -> Box<dyn KeyValueStore> {
        self.saved.into_store()
    }
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::persistence::MemoryStore;

    fn settings() -> Settings {
        Settings {
            seed: Some(1234),
            ..Settings::default()
        }
    }

    fn game() -> SumoGame {
        SumoGame::new(settings(), Box::new(MemoryStore::new()))
    }

    #[test]
    fn test_fresh_game_is_idle() {
        let g = game();
        assert!(!g.is_round_active());
        assert!(!g.is_active_play());
        assert_eq!(g.high_score().best_round_time, 0.0);
        assert_eq!(g.world().player().position(), PLAYER_SPAWN);
    }

    #[test]
    fn test_start_level_runs_clock() {
        let mut g = game();
        g.start_level();
        assert!(g.is_round_active());
        assert!(g.is_active_play());
        let outcome = g.run_game_for(&PlayInput::default(), 0.05);
        assert_eq!(outcome, RunOutcome::Active);
        assert!((g.timer().playing_time() - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_pause_saves_round() {
        let mut g = game();
        g.start_level();
        g.run_game_for(&PlayInput::default(), 0.05);
        g.pause_game();
        assert!(!g.is_active_play());
        let p = g.persistent();
        assert!(p.load_bool(keys::GAME_ACTIVE, false));
        assert!((p.load_float(keys::PLAYING_TIME, 0.0) - 0.05).abs() < 1e-6);
        assert_eq!(
            p.load_vec3(keys::PLAYER_POSITION, Vec3::ZERO),
            g.world().player().position()
        );
    }

    #[test]
    fn test_walking_off_loses() {
        let mut g = game();
        g.start_level();
        let id = g.world().player_id();
        g.world_mut().set_position(id, Vec3::new(-9.95, 0.0, 0.0));
        let input = PlayInput {
            velocity: Vec3::new(-1.0, 0.0, 0.0),
            ..Default::default()
        };
        assert_eq!(g.run_game_for(&input, 0.1), RunOutcome::PlayerLost);
        assert!(!g.is_round_active());
        // Recorded for display only
        assert!(g.last_round_time() > 0.0);
        assert_eq!(g.high_score().best_round_time, 0.0);
        assert_eq!(g.persistent().load_float(keys::BEST_ROUND_TIME, 0.0), 0.0);
    }

    #[test]
    fn test_ring_out_win_saves_best_time() {
        let mut g = game();
        g.start_level();
        g.run_game_for(&PlayInput::default(), 0.1);
        let id = g.world().opponent_id();
        g.world_mut().set_position(id, Vec3::new(0.0, 0.5, 10.5));
        assert_eq!(g.run_game_for(&PlayInput::default(), 0.0), RunOutcome::GameComplete);
        let stored = g.persistent().load_float(keys::BEST_ROUND_TIME, 0.0);
        assert!((stored - 0.1).abs() < 1e-6);
        assert_eq!(g.high_score().best_round_time, stored);
        assert_eq!(g.last_round_time(), stored);
    }

    #[test]
    fn test_exactly_on_the_edge_is_still_in() {
        let mut g = game();
        g.start_level();
        let (p, o) = (g.world().player_id(), g.world().opponent_id());
        g.world_mut().set_position(p, Vec3::new(-10.0, 0.0, 0.0));
        g.world_mut().set_position(o, Vec3::new(10.0, 0.0, 0.0));
        // Freeze the opponent so nothing moves
        g.world_mut().brain =
            crate::sim::OpponentBrain::with_maneuver(Behavior::Easy, crate::sim::Maneuver::Push, 9.0);
        assert_eq!(g.run_game_for(&PlayInput::default(), 0.0), RunOutcome::Active);
    }

    #[test]
    fn test_unfinished_round_is_restored() {
        let mut g = game();
        g.start_level();
        let id = g.world().player_id();
        g.world_mut().set_position(id, Vec3::new(-1.0, 0.5, 2.0));
        g.timer.set_playing_time(45.0);
        g.pause_game();

        let g = SumoGame::new(settings(), g.into_store());
        assert!(g.is_round_active());
        assert_eq!(g.world().player().position(), Vec3::new(-1.0, 0.5, 2.0));
        assert_eq!(g.timer().playing_time(), 45.0);
    }

    #[test]
    fn test_load_game_clears_round() {
        let mut g = game();
        g.start_level();
        g.run_game_for(&PlayInput::default(), 0.1);
        g.load_game();
        assert!(!g.is_round_active());
        assert_eq!(g.timer().playing_time(), 0.0);
        assert!(!g.persistent().load_bool(keys::GAME_ACTIVE, true));
    }

    #[test]
    fn test_fixed_behavior_is_respected() {
        let mut s = settings();
        s.fixed_behavior = Some(Behavior::Angry);
        let mut g = SumoGame::new(s, Box::new(MemoryStore::new()));
        assert_eq!(g.world().brain.behavior, Behavior::Angry);
        g.start_level();
        assert_eq!(g.world().brain.behavior, Behavior::Angry);
    }

    #[test]
    fn test_look_direction_moves_camera() {
        let mut g = game();
        g.start_level();
        let input = PlayInput {
            look_direction: Some(Vec3::NEG_Z),
            ..Default::default()
        };
        g.run_game_for(&input, 0.01);
        assert!((g.camera().look_direction() - Vec3::NEG_Z).length() < 1e-6);
    }
}
