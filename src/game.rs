//! Lifecycle manager
//!
//! Owns the simulation state and its frame schedule. The host calls
//! [`Game::frame`] whenever a requested frame fires, and the UI calls
//! `init`/`reset`/`restart`/`teardown`, all from the same thread.

use crate::platform::{FrameHandle, Platform};
use crate::settings::Settings;
use crate::sim::{GamePhase, RunSummary, SimEvent, SimulationState, tick};

pub struct Game<P: Platform> {
    host: P,
    settings: Settings,
    state: Option<SimulationState>,
    /// Frame requested from the host and not yet fired
    pending: Option<FrameHandle>,
    /// Summary of the last run that ended, until taken
    finished: Option<RunSummary>,
}

impl<P: Platform> Game<P> {
    /// Wrap a host. Nothing runs until [`init`](Self::init).
    pub fn new(host: P, settings: Settings) -> Self {
        Self {
            host,
            settings,
            state: None,
            pending: None,
            finished: None,
        }
    }

    /// Start a brand-new session (new ship, fresh RNG) and begin ticking.
    /// Any previous session is torn down first.
    pub fn init(&mut self) {
        self.teardown();
        let now = self.host.now_ms();
        let seed = self.seed(now);
        self.state = Some(SimulationState::new(seed, now));
        log::info!("Game initialized (seed {})", seed);
        self.flush_events();
        self.present();
        self.schedule();
    }

    /// Put the session back at the start of a run. Keeps the existing ship
    /// and leaves the frame schedule alone. After a teardown this builds a
    /// fresh session instead.
    pub fn reset(&mut self) {
        let now = self.host.now_ms();
        match self.state.as_mut() {
            Some(state) => state.reset(now),
            None => {
                let seed = self.seed(now);
                self.state = Some(SimulationState::new(seed, now));
            }
        }
        self.finished = None;
        self.flush_events();
        self.present();
    }

    /// Reset, clear the game-over display and resume ticking
    pub fn restart(&mut self) {
        self.reset();
        self.host.set_game_over(false);
        self.schedule();
        log::info!("Game restarted");
    }

    /// Stop ticking and drop every entity. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.cancel_pending();
        if let Some(state) = self.state.take() {
            for obstacle in &state.obstacles {
                self.host.obstacle_removed(obstacle.id);
            }
            self.host.player_removed(state.player.id);
            log::info!("Game torn down");
        }
    }

    /// Frame callback. Runs one tick if `handle` is the frame we asked
    /// for, then queues the next one unless the run just ended.
    pub fn frame(&mut self, handle: FrameHandle) {
        if self.pending != Some(handle) {
            log::debug!("Ignoring stale frame {:?}", handle);
            return;
        }
        self.pending = None;

        let now = self.host.now_ms();
        let input = self.settings.keys.read(&self.host, self.settings.autopilot);
        let Some(state) = self.state.as_mut() else {
            return;
        };
        tick(state, &input, now);
        let phase = state.phase;
        let summary = state.summary();

        self.flush_events();
        self.present();

        match phase {
            GamePhase::Running => self.schedule(),
            GamePhase::GameOver => {
                log::info!(
                    "Game over: score {} after {:.1}s, {} asteroids dodged",
                    summary.score,
                    summary.survived_ms / 1000.0,
                    summary.obstacles_dodged
                );
                self.finished = Some(summary);
            }
        }
    }

    pub fn state(&self) -> Option<&SimulationState> {
        self.state.as_ref()
    }

    pub fn phase(&self) -> Option<GamePhase> {
        self.state.as_ref().map(|s| s.phase)
    }

    /// A frame is queued with the host
    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }

    /// Summary of the most recent finished run (once)
    pub fn take_finished_run(&mut self) -> Option<RunSummary> {
        self.finished.take()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Switch the autopilot and persist the choice
    pub fn set_autopilot(&mut self, enabled: bool) {
        if self.settings.autopilot == enabled {
            return;
        }
        self.settings.autopilot = enabled;
        log::info!("Autopilot {}", if enabled { "on" } else { "off" });
        self.settings.save();
    }

    pub fn host(&self) -> &P {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut P {
        &mut self.host
    }

    fn seed(&self, now_ms: f64) -> u64 {
        self.settings
            .seed
            .unwrap_or_else(|| (now_ms * 1000.0) as u64 ^ 0x9E37_79B9_7F4A_7C15)
    }

    fn schedule(&mut self) {
        if self.pending.is_some() {
            return;
        }
        self.pending = self.host.request_frame();
        if self.pending.is_none() {
            log::error!("Host refused a frame request; the game is paused until restart");
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
        }
    }

    /// Forward recorded simulation events to the scene
    fn flush_events(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        for event in state.drain_events() {
            match event {
                SimEvent::PlayerPlaced { id } => self.host.player_placed(id, state),
                SimEvent::ObstacleSpawned { id } => self.host.obstacle_added(id, state),
                SimEvent::ObstacleRemoved { id } => self.host.obstacle_removed(id),
                SimEvent::Collision { .. } => {}
            }
        }
    }

    fn present(&mut self) {
        if let Some(state) = &self.state {
            self.host.set_score(state.score);
            self.host.set_game_over(state.phase == GamePhase::GameOver);
        }
    }
}

impl<P: Platform> Drop for Game<P> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
