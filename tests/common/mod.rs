//! Shared builders for the integration tests.
#![allow(dead_code)]

use sumo_arena::persistence::{KeyValueStore, MemoryStore, PersistentState, keys};
use sumo_arena::resources::{DeviceResources, ResourceFuture};
use sumo_arena::sim::{Behavior, Maneuver, OpponentBrain};
use sumo_arena::{App, FrameInput, Settings, SumoGame};

pub const TICK: f64 = 1.0 / 60.0;

pub fn settings(seed: u64) -> Settings {
    Settings {
        seed: Some(seed),
        ..Settings::default()
    }
}

/// A store holding an unfinished round at `playing_time`
pub fn store_with_round(playing_time: f32) -> Box<dyn KeyValueStore> {
    let mut state = PersistentState::new(Box::new(MemoryStore::new()), "SumoGame");
    state.save_bool(keys::GAME_ACTIVE, true);
    state.save_float(keys::PLAYING_TIME, playing_time);
    state.into_store()
}

/// A store that remembers a best time but no unfinished round
pub fn store_with_best(best: f32) -> Box<dyn KeyValueStore> {
    let mut state = PersistentState::new(Box::new(MemoryStore::new()), "SumoGame");
    state.save_float(keys::BEST_ROUND_TIME, best);
    state.into_store()
}

/// Pin the opponent to one maneuver for the rest of the test
pub fn pin_opponent(game: &mut SumoGame, behavior: Behavior, maneuver: Maneuver) {
    game.world_mut().brain = OpponentBrain::with_maneuver(behavior, maneuver, 1000.0);
}

/// App with resources attached
pub fn loaded_app(store: Box<dyn KeyValueStore>) -> App {
    let mut app = App::new(settings(7), store);
    app.begin_loading(ResourceFuture::ready(DeviceResources::create()));
    assert!(app.poll_resources().unwrap());
    app
}

/// Drives an app with a monotonically advancing clock
pub struct Clock {
    pub now: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self { now: 0.0 }
    }

    pub fn tick(&mut self, app: &mut App, input: &FrameInput) {
        self.now += TICK;
        app.update(input, self.now);
    }
}
