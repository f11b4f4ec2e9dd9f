//! Application state machine
//!
//! Drives the outer loop: wait for device resources, wait for a press, play,
//! report the result, wait for a press again. Focus loss, suspension and a
//! too-narrow window interrupt any of those and remember where to go back to.
//!
//! The machine is a single `(current, resume)` pair and [`App::dispatch`] is the
//! only code that changes it. Every transition also pushes [`Notification`]s
//! for the overlay/renderer and input collaborators to pick up.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::game::{PlayInput, RunOutcome, SumoGame};
use crate::persistence::KeyValueStore;
use crate::resources::{self, DeviceResources, ResourceError, ResourceFuture};
use crate::settings::{CameraParams, Settings};

/// What a completed press should do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressResult {
    /// Start a fresh round
    Play,
    /// Resume a paused round where it stopped
    Continue,
    /// Reset the arena after a finished round, then offer Play
    LoadGame,
}

/// Exactly one mode is current at any time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Device resources are still being built
    WaitingForResources,
    /// Resources are ready; the next update shows the press prompt
    ResourcesLoaded(PressResult),
    /// Overlay is up, waiting for the player to tap
    WaitingForPress(PressResult),
    /// Active play
    Dynamics,
    /// Window lost focus
    Deactivated,
    /// Window is narrower than the minimum width
    TooSmall,
    /// Process is suspended
    Suspended,
}

impl Mode {
    /// Interrupt modes hold a resume target instead of doing work
    pub fn is_interrupt(self) -> bool {
        matches!(self, Mode::Deactivated | Mode::TooSmall | Mode::Suspended)
    }

    /// Modes that are remembered verbatim when an interrupt arrives
    fn is_waiting(self) -> bool {
        matches!(
            self,
            Mode::WaitingForResources | Mode::ResourcesLoaded(_) | Mode::WaitingForPress(_)
        )
    }
}

/// Info overlay contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Overlay {
    Loading,
    GameStart,
    Pause,
    GameOverWon,
    GameOverLost,
    GameStats,
}

/// Prompt under the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionPrompt {
    None,
    PleaseWait,
    TapToContinue,
}

/// Outgoing signal for the render/UI and input collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    Overlay(Overlay),
    Action(ActionPrompt),
    OverlayVisible(bool),
    /// Show or clear the "window too small" notice
    TooSmall(bool),
    /// Start (true) or stop (false) feeding movement input
    InputActive(bool),
    /// Input should report the next tap on the overlay as a press
    AwaitPress,
    Camera(CameraParams),
}

/// Everything the input collaborator reports for one update
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub velocity: Vec3,
    pub look_direction: Option<Vec3>,
    pub pause_requested: bool,
    pub press_complete: bool,
}

impl FrameInput {
    pub fn press() -> Self {
        Self {
            press_complete: true,
            ..Self::default()
        }
    }

    pub fn pause() -> Self {
        Self {
            pause_requested: true,
            ..Self::default()
        }
    }

    fn play(&self) -> PlayInput {
        PlayInput {
            velocity: self.velocity,
            look_direction: self.look_direction,
        }
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, Copy)]
pub enum AppEvent {
    /// Resources were finalized on the update thread
    ResourcesReady,
    /// One iteration of the update loop at wall-clock `now` (seconds)
    Tick { input: FrameInput, now: f64 },
    FocusLost,
    FocusGained,
    Suspending,
    Resuming,
    Resized { width: f32 },
    DeviceLost,
    /// A new device exists; resources must be rebuilt
    DeviceRestored,
}

/// Current mode plus where an interrupt should return to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Machine {
    current: Mode,
    resume: Option<Mode>,
}

/// Updates between loading overlay refreshes
const LOADING_REFRESH_TICKS: u32 = 60;

pub struct App {
    game: SumoGame,
    machine: Machine,
    have_focus: bool,
    too_small: bool,
    overlay: Overlay,
    action: ActionPrompt,
    overlay_visible: bool,
    input_active: bool,
    loading_ticks: u32,
    loading_count: u32,
    pending: Option<ResourceFuture>,
    resources: Option<DeviceResources>,
    notifications: Vec<Notification>,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("machine", &self.machine)
            .field("overlay", &self.overlay)
            .field("action", &self.action)
            .field("game", &self.game)
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn new(settings: Settings, store: Box<dyn KeyValueStore>) -> Self {
        let mut app = Self {
            game: SumoGame::new(settings, store),
            machine: Machine {
                current: Mode::WaitingForResources,
                resume: None,
            },
            have_focus: true,
            too_small: false,
            overlay: Overlay::Loading,
            action: ActionPrompt::None,
            overlay_visible: false,
            input_active: false,
            loading_ticks: 0,
            loading_count: 0,
            pending: None,
            resources: None,
            notifications: Vec::new(),
        };
        app.set_overlay(Overlay::Loading);
        app.show_overlay();
        app
    }

    /// Hand a background load to the app; it is polled by [`App::poll_resources`]
    pub fn begin_loading(&mut self, future: ResourceFuture) {
        self.pending = Some(future);
    }

    /// Build the default device resources on a loader thread
    pub fn load_resources(&mut self) {
        self.begin_loading(resources::spawn_load(DeviceResources::create));
    }

    /// Finalize a finished load on this (the update) thread.
    ///
    /// Returns `Ok(true)` once resources were attached. On failure the app
    /// stays in [`Mode::WaitingForResources`]; retrying is the caller's call.
    pub fn poll_resources(&mut self) -> Result<bool, ResourceError> {
        let Some(future) = &self.pending else {
            return Ok(false);
        };
        match future.try_wait() {
            Ok(None) => Ok(false),
            Ok(Some(loaded)) => {
                self.pending = None;
                resources::finalize(&loaded, self.game.world_mut());
                self.resources = Some(loaded);
                self.dispatch(AppEvent::ResourcesReady);
                Ok(true)
            }
            Err(e) => {
                self.pending = None;
                log::error!("Resource load failed, still waiting: {}", e);
                Err(e)
            }
        }
    }

    /// Run one update with this frame's input
    pub fn update(&mut self, input: &FrameInput, now: f64) {
        self.dispatch(AppEvent::Tick { input: *input, now });
    }

    /// Apply one event. This is the only place the machine changes.
    pub fn dispatch(&mut self, event: AppEvent) {
        match event {
            AppEvent::ResourcesReady => self.on_resources_ready(),
            AppEvent::Tick { input, now } => self.on_tick(&input, now),
            AppEvent::FocusLost => self.on_focus_lost(),
            AppEvent::FocusGained => self.on_focus_gained(),
            AppEvent::Suspending => self.on_suspending(),
            AppEvent::Resuming => self.on_resuming(),
            AppEvent::Resized { width } => self.on_resized(width),
            AppEvent::DeviceLost => self.on_device_lost(),
            AppEvent::DeviceRestored => self.on_device_restored(),
        }
    }

    fn enter(&mut self, mode: Mode) {
        if self.machine.current != mode {
            log::info!("{:?} -> {:?}", self.machine.current, mode);
        }
        self.machine.current = mode;
    }

    /// Leave an interrupt for its remembered mode
    fn take_resume(&mut self) -> Mode {
        match self.machine.resume.take() {
            Some(mode) => mode,
            None => panic!("left {:?} with no mode to resume", self.machine.current),
        }
    }

    /// Pause active play and queue a Continue press
    fn pause_to_continue(&mut self) {
        self.game.pause_game();
        self.set_overlay(Overlay::Pause);
    }

    // === Resources ===

    fn on_resources_ready(&mut self) {
        let next = self.initialize_game_state();
        if self.machine.current.is_interrupt() {
            self.machine.resume = Some(next);
            log::info!("Resources ready while {:?}; will resume to {:?}", self.machine.current, next);
            return;
        }
        self.enter(next);

        if self.too_small {
            self.machine.resume = Some(next);
            self.enter(Mode::TooSmall);
            self.set_input_active(false);
            self.hide_overlay();
            self.push(Notification::TooSmall(true));
        } else if !self.have_focus {
            self.machine.resume = Some(next);
            self.enter(Mode::Deactivated);
            self.set_input_active(false);
            self.set_action(ActionPrompt::None);
        }
    }

    /// Pick the first mode from what the save slot says
    fn initialize_game_state(&mut self) -> Mode {
        let next = if self.game.is_round_active() {
            // Last session ended mid-round
            self.set_overlay(Overlay::Pause);
            self.set_action(ActionPrompt::PleaseWait);
            self.level_loaded(PressResult::Continue)
        } else if self.game.high_score().best_round_time > 0.0 {
            self.set_overlay(Overlay::GameStats);
            self.set_action(ActionPrompt::TapToContinue);
            self.push(Notification::AwaitPress);
            Mode::WaitingForPress(PressResult::LoadGame)
        } else {
            self.set_overlay(Overlay::GameStart);
            self.set_action(ActionPrompt::PleaseWait);
            self.level_loaded(PressResult::Play)
        };
        self.show_overlay();
        next
    }

    /// There is no per-level data to stream, so the level is ready at once
    fn level_loaded(&mut self, pending: PressResult) -> Mode {
        Mode::ResourcesLoaded(pending)
    }

    // === Update loop ===

    fn on_tick(&mut self, input: &FrameInput, now: f64) {
        match self.machine.current {
            Mode::WaitingForResources => {
                self.loading_ticks += 1;
                if self.loading_ticks % LOADING_REFRESH_TICKS == 0 {
                    self.loading_count += 1;
                    self.set_overlay(self.overlay);
                }
            }
            Mode::ResourcesLoaded(pending) => {
                self.set_overlay(match pending {
                    PressResult::LoadGame => Overlay::GameStats,
                    PressResult::Play => Overlay::GameStart,
                    PressResult::Continue => Overlay::Pause,
                });
                self.enter(Mode::WaitingForPress(pending));
                self.set_action(ActionPrompt::TapToContinue);
                self.push(Notification::AwaitPress);
                self.show_overlay();
            }
            Mode::WaitingForPress(pending) => {
                if input.press_complete {
                    self.on_press(pending);
                }
            }
            Mode::Dynamics => self.on_dynamics(input, now),
            Mode::Deactivated | Mode::TooSmall | Mode::Suspended => {}
        }
    }

    fn on_press(&mut self, pending: PressResult) {
        match pending {
            PressResult::LoadGame => {
                self.enter(Mode::WaitingForResources);
                self.set_input_active(false);
                self.game.load_game();
                self.push(Notification::Camera(self.game.camera().params()));
                self.set_action(ActionPrompt::PleaseWait);
                self.set_overlay(Overlay::GameStart);
                self.show_overlay();
                let next = self.level_loaded(PressResult::Play);
                self.enter(next);
            }
            PressResult::Play => {
                self.enter(Mode::Dynamics);
                self.hide_overlay();
                self.set_input_active(true);
                self.game.start_level();
                self.push(Notification::Camera(self.game.camera().params()));
            }
            PressResult::Continue => {
                self.enter(Mode::Dynamics);
                self.hide_overlay();
                self.set_input_active(true);
                self.game.continue_game();
                self.push(Notification::Camera(self.game.camera().params()));
            }
        }
    }

    fn on_dynamics(&mut self, input: &FrameInput, now: f64) {
        if input.pause_requested {
            self.pause_to_continue();
            self.set_action(ActionPrompt::TapToContinue);
            self.enter(Mode::WaitingForPress(PressResult::Continue));
            self.show_overlay();
        } else {
            match self.game.run_game(&input.play(), now) {
                RunOutcome::Active => {}
                RunOutcome::PlayerLost => self.round_over(Overlay::GameOverLost),
                RunOutcome::GameComplete => self.round_over(Overlay::GameOverWon),
            }
        }

        if let Mode::WaitingForPress(_) = self.machine.current {
            self.push(Notification::AwaitPress);
        }
    }

    fn round_over(&mut self, overlay: Overlay) {
        self.set_action(ActionPrompt::TapToContinue);
        self.set_overlay(overlay);
        self.show_overlay();
        self.set_input_active(false);
        self.enter(Mode::WaitingForPress(PressResult::LoadGame));
    }

    // === Interrupts ===

    fn on_focus_lost(&mut self) {
        self.have_focus = false;
        let current = self.machine.current;
        if current == Mode::Dynamics {
            self.machine.resume = Some(Mode::WaitingForPress(PressResult::Continue));
            self.pause_to_continue();
            self.show_overlay();
            self.enter(Mode::Deactivated);
            self.set_action(ActionPrompt::None);
        } else if current.is_waiting() {
            self.machine.resume = Some(current);
            self.enter(Mode::Deactivated);
            self.set_action(ActionPrompt::None);
            self.show_overlay();
        }
        self.set_input_active(false);
    }

    fn on_focus_gained(&mut self) {
        self.have_focus = true;
        if self.machine.current != Mode::Deactivated {
            return;
        }
        let next = self.take_resume();
        self.enter(next);
        self.prompt_for(next);
    }

    fn on_suspending(&mut self) {
        let current = self.machine.current;
        if current == Mode::Dynamics {
            self.set_action(ActionPrompt::None);
            self.pause_to_continue();
            self.machine.resume = Some(Mode::WaitingForPress(PressResult::Continue));
        } else if current.is_waiting() {
            self.machine.resume = Some(current);
        }
        // Other interrupts already hold their resume target
        self.enter(Mode::Suspended);
        self.set_input_active(false);
        self.game.on_suspending();
    }

    fn on_resuming(&mut self) {
        if self.machine.current != Mode::Suspended {
            return;
        }
        if self.have_focus {
            let next = self.take_resume();
            self.enter(next);
            if let Mode::WaitingForPress(_) = next {
                self.set_action(ActionPrompt::TapToContinue);
                self.push(Notification::AwaitPress);
            }
        } else {
            self.enter(Mode::Deactivated);
        }
        self.game.on_resuming();
        self.show_overlay();
    }

    fn on_resized(&mut self, width: f32) {
        let too_small = width < self.game.settings().min_window_width;
        self.too_small = too_small;
        let current = self.machine.current;

        if too_small {
            if current == Mode::Dynamics {
                self.machine.resume = Some(Mode::WaitingForPress(PressResult::Continue));
                self.pause_to_continue();
                self.set_action(ActionPrompt::TapToContinue);
            } else if current.is_waiting() {
                self.machine.resume = Some(current);
            }
            // Snapped -> snapped must not overwrite the resume target
            if current == Mode::Suspended {
                return;
            }
            self.enter(Mode::TooSmall);
            self.set_input_active(false);
            self.hide_overlay();
            self.push(Notification::TooSmall(true));
            return;
        }

        match current {
            Mode::TooSmall => {
                self.push(Notification::TooSmall(false));
                self.show_overlay();
                if self.have_focus {
                    let next = self.take_resume();
                    self.enter(next);
                    self.prompt_for(next);
                } else {
                    self.enter(Mode::Deactivated);
                    self.set_action(ActionPrompt::None);
                }
            }
            Mode::Dynamics => {
                // Layout changed under active play
                self.pause_to_continue();
                let paused = Mode::WaitingForPress(PressResult::Continue);
                if self.have_focus {
                    self.enter(paused);
                    self.set_action(ActionPrompt::TapToContinue);
                    self.push(Notification::AwaitPress);
                } else {
                    self.machine.resume = Some(paused);
                    self.enter(Mode::Deactivated);
                    self.set_action(ActionPrompt::None);
                }
                self.set_input_active(false);
                self.show_overlay();
            }
            Mode::WaitingForPress(_) => self.push(Notification::AwaitPress),
            _ => {}
        }
    }

    fn on_device_lost(&mut self) {
        if self.machine.current == Mode::Dynamics {
            self.game.pause_game();
        }
        self.resources = None;
    }

    fn on_device_restored(&mut self) {
        self.set_action(ActionPrompt::PleaseWait);
        self.set_overlay(Overlay::Loading);
        if self.machine.current.is_interrupt() {
            self.machine.resume = Some(Mode::WaitingForResources);
        } else {
            self.enter(Mode::WaitingForResources);
        }
        self.set_input_active(false);
        self.load_resources();
    }

    /// Prompt matching a mode just resumed into
    fn prompt_for(&mut self, mode: Mode) {
        match mode {
            Mode::WaitingForPress(_) => {
                self.set_action(ActionPrompt::TapToContinue);
                self.push(Notification::AwaitPress);
            }
            Mode::WaitingForResources | Mode::ResourcesLoaded(_) => {
                self.set_action(ActionPrompt::PleaseWait);
            }
            _ => {}
        }
    }

    // === Notifications ===

    fn push(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn set_overlay(&mut self, overlay: Overlay) {
        self.overlay = overlay;
        self.push(Notification::Overlay(overlay));
    }

    fn set_action(&mut self, action: ActionPrompt) {
        self.action = action;
        self.push(Notification::Action(action));
    }

    fn show_overlay(&mut self) {
        self.overlay_visible = true;
        self.push(Notification::OverlayVisible(true));
    }

    fn hide_overlay(&mut self) {
        self.overlay_visible = false;
        self.push(Notification::OverlayVisible(false));
    }

    fn set_input_active(&mut self, active: bool) {
        if self.input_active != active {
            self.input_active = active;
            self.push(Notification::InputActive(active));
        }
    }

    /// Take everything emitted since the last drain
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // === Accessors ===

    #[inline]
    pub fn mode(&self) -> Mode {
        self.machine.current
    }

    /// Where the current interrupt will return to
    #[inline]
    pub fn resume_mode(&self) -> Option<Mode> {
        self.machine.resume
    }

    /// The pending press result, only while waiting for a press
    pub fn pending_press(&self) -> Option<PressResult> {
        match self.machine.current {
            Mode::WaitingForPress(pending) => Some(pending),
            _ => None,
        }
    }

    #[inline]
    pub fn overlay(&self) -> Overlay {
        self.overlay
    }

    /// How the last round ended, read off the game-over overlay still showing.
    ///
    /// `Active` while a round is running or before any round has finished.
    pub fn round_outcome(&self) -> RunOutcome {
        match (self.machine.current, self.overlay) {
            (Mode::WaitingForPress(PressResult::LoadGame), Overlay::GameOverLost) => RunOutcome::PlayerLost,
            (Mode::WaitingForPress(PressResult::LoadGame), Overlay::GameOverWon) => RunOutcome::GameComplete,
            _ => RunOutcome::Active,
        }
    }

    #[inline]
    pub fn action(&self) -> ActionPrompt {
        self.action
    }

    #[inline]
    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    #[inline]
    pub fn input_active(&self) -> bool {
        self.input_active
    }

    #[inline]
    pub fn has_focus(&self) -> bool {
        self.have_focus
    }

    /// Loading-overlay refresh count (animates the "loading" dots)
    #[inline]
    pub fn loading_count(&self) -> u32 {
        self.loading_count
    }

    pub fn resources(&self) -> Option<&DeviceResources> {
        self.resources.as_ref()
    }

    #[inline]
    pub fn game(&self) -> &SumoGame {
        &self.game
    }

    #[inline]
    pub fn game_mut(&mut self) -> &mut SumoGame {
        &mut self.game
    }

    /// Save and hand back the store (window closed)
    pub fn shutdown(mut self) -> Box<dyn KeyValueStore> {
        self.game.on_suspending();
        self.game.into_store()
    }
}
