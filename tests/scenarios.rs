//! End-to-end rounds through the game facade.
//!
//! Covers the opponent closing in along the spawn axis, restoring a saved
//! clock, coincident bodies and ring-outs in both directions.

use approx::assert_relative_eq;
use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use rstest::rstest;
use sumo_arena::consts::*;
use sumo_arena::game::PlayInput;
use sumo_arena::persistence::MemoryStore;
use sumo_arena::sim::{Behavior, Maneuver, OpponentBrain, World, step};
use sumo_arena::{RunOutcome, SumoGame};

mod common;
use common::{TICK, pin_opponent, settings, store_with_round};

const DT: f32 = TICK as f32;

#[rstest]
#[case::advance(Maneuver::Advance, 1.0)]
#[case::push(Maneuver::Push, 2.0)]
fn angry_opponent_closes_along_spawn_axis(#[case] maneuver: Maneuver, #[case] speed: f32) {
    let mut world = World::new(PLAYER_SPAWN, OPPONENT_SPAWN, Behavior::Angry);
    world.brain = OpponentBrain::with_maneuver(Behavior::Angry, maneuver, 1000.0);
    let mut rng = Pcg32::seed_from_u64(3);

    let mut previous = world.opponent().position();
    // Stop well before the blocks touch
    let frames = (2.0 / speed / DT) as usize;
    for _ in 0..frames {
        step(&mut world, DT, FRAME_LENGTH, BODY_DIAMETER, &mut rng);
        let p = world.opponent().position();
        assert!(p.x < previous.x, "opponent moved away: {} -> {}", previous.x, p.x);
        assert_eq!(p.z, 0.0);
        assert_eq!(p.y, OPPONENT_SPAWN.y);
        previous = p;
    }
    assert_eq!(world.player().position(), PLAYER_SPAWN);
    assert_relative_eq!(previous.x, OPPONENT_SPAWN.x - speed * frames as f32 * DT, epsilon = 1e-3);
}

#[test]
fn restored_clock_holds_at_zero_delta() {
    let mut game = SumoGame::new(settings(11), store_with_round(45.0));
    assert!(game.is_round_active());
    assert_eq!(game.timer().playing_time(), 45.0);

    game.continue_game();
    let input = PlayInput::default();
    // First reading only anchors the clock
    game.run_game(&input, 500.0);
    game.run_game(&input, 500.0);
    assert_eq!(game.timer().delta_time(), 0.0);
    assert_eq!(game.timer().playing_time(), 45.0);
}

#[test]
fn coincident_bodies_stay_finite() {
    let mut world = World::new(PLAYER_SPAWN, OPPONENT_SPAWN, Behavior::Normal);
    let (player, opponent) = (world.player_id(), world.opponent_id());
    let spot = Vec3::new(1.0, 0.5, 1.0);
    world.set_position(player, spot);
    world.set_position(opponent, spot);
    let mut rng = Pcg32::seed_from_u64(5);

    for maneuver in Maneuver::ALL {
        world.brain = OpponentBrain::with_maneuver(Behavior::Normal, maneuver, 1000.0);
        step(&mut world, DT, FRAME_LENGTH, BODY_DIAMETER, &mut rng);
        for entity in world.entities() {
            assert!(entity.position().is_finite(), "{:?} went non-finite", entity.role);
            assert!(entity.facing().is_finite());
        }
    }
}

#[test]
fn angry_push_rings_the_player_out() {
    let mut game = SumoGame::new(settings(21), Box::new(MemoryStore::new()));
    game.start_level();
    pin_opponent(&mut game, Behavior::Angry, Maneuver::Push);

    let input = PlayInput::default();
    let mut outcome = RunOutcome::Active;
    for _ in 0..60 * 30 {
        outcome = game.run_game_for(&input, DT);
        if outcome != RunOutcome::Active {
            break;
        }
    }

    assert_eq!(outcome, RunOutcome::PlayerLost);
    assert!(!game.is_round_active());
    assert!(!game.is_active_play());
    // Shown on the overlay, but a loss is never a best time
    let time = game.last_round_time();
    assert!(time > 5.0 && time < 15.0, "ring-out took {time}s");
    assert_eq!(game.high_score().best_round_time, 0.0);
    assert_eq!(game.persistent().load_float(sumo_arena::persistence::keys::BEST_ROUND_TIME, 0.0), 0.0);
}

#[test]
fn pushing_an_easy_opponent_out_wins() {
    let mut game = SumoGame::new(settings(22), Box::new(MemoryStore::new()));
    game.start_level();
    // Easy push stands still, so the player just shoves it off
    pin_opponent(&mut game, Behavior::Easy, Maneuver::Push);

    let input = PlayInput {
        velocity: Vec3::new(2.0, 0.0, 0.0),
        look_direction: Some(Vec3::X),
    };
    let mut outcome = RunOutcome::Active;
    for _ in 0..60 * 30 {
        outcome = game.run_game_for(&input, DT);
        if outcome != RunOutcome::Active {
            break;
        }
    }

    assert_eq!(outcome, RunOutcome::GameComplete);
    let best = game.high_score().best_round_time;
    assert!(best > 0.0);
    assert_eq!(game.persistent().load_float(sumo_arena::persistence::keys::BEST_ROUND_TIME, 0.0), best);
}

#[test]
fn slower_win_does_not_replace_best() {
    let mut game = SumoGame::new(settings(23), common::store_with_best(1.0));
    assert_eq!(game.high_score().best_round_time, 1.0);
    game.start_level();
    pin_opponent(&mut game, Behavior::Easy, Maneuver::Push);
    let input = PlayInput {
        velocity: Vec3::new(2.0, 0.0, 0.0),
        look_direction: None,
    };
    while game.run_game_for(&input, DT) == RunOutcome::Active {}
    assert!(game.last_round_time() > 1.0);
    assert_eq!(game.persistent().load_float(sumo_arena::persistence::keys::BEST_ROUND_TIME, 0.0), 1.0);
    assert_eq!(game.high_score().best_round_time, 1.0);
}
