//! Sumo Arena headless runner
//!
//! Loads resources, presses through the prompts and plays one scripted round
//! at 60 Hz, logging every mode change. The player simply walks at the
//! opponent and pushes.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use sumo_arena::math::planar_direction;
use sumo_arena::persistence::{JsonFileStore, KeyValueStore, MemoryStore};
use sumo_arena::{App, FrameInput, Mode, PressResult, Settings, logging};

/// Update rate of the scripted loop
const TICK_RATE: f64 = 60.0;
/// Give up on a round after this much simulated time (seconds)
const ROUND_LIMIT: f64 = 120.0;
/// Player walking speed (units per second)
const PLAYER_SPEED: f32 = 2.0;

/// Play one scripted round of Sumo Arena without a window
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Settings JSON; missing fields take their defaults
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Save file; without one the round is kept in memory only
    #[arg(long)]
    save: Option<PathBuf>,

    /// RNG seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    let store: Box<dyn KeyValueStore> = match &args.save {
        Some(path) => Box::new(JsonFileStore::open(path)?),
        None => Box::new(MemoryStore::new()),
    };

    log::info!("Sumo Arena (headless) starting...");
    let mut app = App::new(settings, store);
    app.load_resources();
    while !app.poll_resources()? {
        std::thread::sleep(Duration::from_millis(1));
    }

    let mut now = 0.0;
    let mut played = false;
    loop {
        now += 1.0 / TICK_RATE;
        let mut input = FrameInput::default();

        match app.mode() {
            Mode::WaitingForPress(PressResult::LoadGame) if played => break,
            Mode::WaitingForPress(_) => input.press_complete = true,
            Mode::Dynamics => {
                played = true;
                let world = app.game().world();
                let toward = planar_direction(world.player().position(), world.opponent().position());
                input.velocity = toward * PLAYER_SPEED;
                input.look_direction = Some(toward);
                if app.game().timer().playing_time() as f64 > ROUND_LIMIT {
                    log::warn!("Round still running after {ROUND_LIMIT} s, stopping");
                    input.pause_requested = true;
                }
            }
            Mode::WaitingForResources | Mode::ResourcesLoaded(_) => {}
            mode => {
                log::warn!("Unexpected {:?} in a headless run", mode);
                break;
            }
        }

        app.update(&input, now);
        for notification in app.drain_notifications() {
            log::debug!("{:?}", notification);
        }

        if played && app.pending_press() == Some(PressResult::Continue) {
            break;
        }
    }

    let game = app.game();
    log::info!(
        "{:?} after {:.2} s (best {})",
        app.round_outcome(),
        game.timer().playing_time(),
        game.high_score().display_seconds()
    );

    app.shutdown();
    Ok(())
}
