//! Deterministic host without a display
//!
//! Time only moves when told to, frame requests queue up until fired, and
//! scene/HUD output is recorded for inspection. Drives the native demo and
//! the lifecycle tests.

use std::collections::{BTreeSet, HashSet, VecDeque};

use super::{Clock, FrameHandle, FrameScheduler, Hud, InputSource, SceneSink, normalize_key};
use crate::sim::{EntityId, SimulationState};

#[derive(Debug, Default)]
pub struct HeadlessHost {
    now_ms: f64,
    held: HashSet<String>,
    next_handle: i32,
    queued: VecDeque<FrameHandle>,
    cancelled: u32,
    /// Refuse frame requests, like a browser without requestAnimationFrame
    refuse_frames: bool,
    player: Option<EntityId>,
    obstacles: BTreeSet<EntityId>,
    score: u64,
    game_over: bool,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Host whose clock starts at `now_ms`
    pub fn starting_at(now_ms: f64) -> Self {
        Self {
            now_ms,
            ..Self::default()
        }
    }

    pub fn advance(&mut self, ms: f64) {
        debug_assert!(ms >= 0.0, "clock cannot run backwards");
        self.now_ms += ms;
    }

    pub fn press(&mut self, key: &str) {
        self.held.insert(normalize_key(key));
    }

    pub fn release(&mut self, key: &str) {
        self.held.remove(&normalize_key(key));
    }

    pub fn refuse_frames(&mut self, refuse: bool) {
        self.refuse_frames = refuse;
    }

    /// Pop the oldest queued frame, as a display refresh would. The caller
    /// hands the returned handle to `Game::frame`.
    pub fn fire_frame(&mut self) -> Option<FrameHandle> {
        self.queued.pop_front()
    }

    pub fn queued_frames(&self) -> usize {
        self.queued.len()
    }

    pub fn cancelled_frames(&self) -> u32 {
        self.cancelled
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    /// Asteroids currently in the scene
    pub fn scene_obstacles(&self) -> usize {
        self.obstacles.len()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn game_over_visible(&self) -> bool {
        self.game_over
    }
}

impl Clock for HeadlessHost {
    fn now_ms(&self) -> f64 {
        self.now_ms
    }
}

impl FrameScheduler for HeadlessHost {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        if self.refuse_frames {
            return None;
        }
        self.next_handle += 1;
        let handle = FrameHandle(self.next_handle);
        self.queued.push_back(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.queued.len();
        self.queued.retain(|h| *h != handle);
        if self.queued.len() != before {
            self.cancelled += 1;
        }
    }
}

impl InputSource for HeadlessHost {
    fn is_held(&self, key: &str) -> bool {
        self.held.contains(&normalize_key(key))
    }
}

impl SceneSink for HeadlessHost {
    fn player_placed(&mut self, id: EntityId, state: &SimulationState) {
        log::trace!("Scene: ship {} at {}", id, state.player.pos);
        self.player = Some(id);
    }

    fn obstacle_added(&mut self, id: EntityId, _state: &SimulationState) {
        self.obstacles.insert(id);
    }

    fn obstacle_removed(&mut self, id: EntityId) {
        self.obstacles.remove(&id);
    }

    fn player_removed(&mut self, id: EntityId) {
        if self.player == Some(id) {
            self.player = None;
        }
    }
}

impl Hud for HeadlessHost {
    fn set_score(&mut self, score: u64) {
        self.score = score;
    }

    fn set_game_over(&mut self, visible: bool) {
        self.game_over = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_queue_and_cancel() {
        let mut host = HeadlessHost::new();
        let a = host.request_frame().unwrap();
        let b = host.request_frame().unwrap();
        assert_ne!(a, b);
        assert_eq!(host.queued_frames(), 2);

        host.cancel_frame(a);
        host.cancel_frame(a);
        assert_eq!(host.cancelled_frames(), 1);
        assert_eq!(host.fire_frame(), Some(b));
        assert_eq!(host.fire_frame(), None);
    }

    #[test]
    fn test_clock_and_keys() {
        let mut host = HeadlessHost::starting_at(100.0);
        host.advance(16.0);
        assert_eq!(host.now_ms(), 116.0);

        host.press("ArrowLeft");
        assert!(host.is_held("ArrowLeft"));
        host.release("ArrowLeft");
        assert!(!host.is_held("ArrowLeft"));
    }

    #[test]
    fn test_shifted_release_clears_key() {
        let mut host = HeadlessHost::new();
        host.press("a");
        assert!(host.is_held("A"));
        host.release("A");
        assert!(!host.is_held("a"));
    }

    #[test]
    fn test_refused_frames_are_not_queued() {
        let mut host = HeadlessHost::new();
        host.refuse_frames(true);
        assert_eq!(host.request_frame(), None);
        assert_eq!(host.queued_frames(), 0);
    }
}
