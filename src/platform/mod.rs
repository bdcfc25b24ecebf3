//! Platform abstraction layer
//!
//! The simulation never reaches into the host. Everything it needs is
//! injected through these traits:
//! - Time (wall-clock milliseconds)
//! - Frame scheduling (cancelable "call me before the next paint")
//! - Input (which keys are held right now)
//! - Scene graph notifications
//! - HUD (score and game-over display)

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::HeadlessHost;

use crate::sim::{EntityId, SimulationState};

/// Wall-clock time source
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin. Must not run backwards.
    fn now_ms(&self) -> f64;
}

/// Handle for a queued frame callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Display-refresh driven scheduling
pub trait FrameScheduler {
    /// Queue one call to the game's frame entry point. None when the host
    /// refused the request.
    fn request_frame(&mut self) -> Option<FrameHandle>;
    /// Drop a queued frame. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Read-only view of the host's held-key map. Hosts store keys through
/// [`normalize_key`] so lookups ignore letter case.
pub trait InputSource {
    fn is_held(&self, key: &str) -> bool;
}

/// Canonical form of a `KeyboardEvent.key` value. Single characters are
/// lowercased so that Shift between keydown and keyup cannot leave a key
/// stuck; named keys (`ArrowLeft`) are kept as is.
pub fn normalize_key(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_lowercase().collect(),
        _ => key.to_string(),
    }
}

/// Receives scene graph changes. Implementations read entity details from
/// the state they are handed.
pub trait SceneSink {
    fn player_placed(&mut self, id: EntityId, state: &SimulationState);
    fn obstacle_added(&mut self, id: EntityId, state: &SimulationState);
    fn obstacle_removed(&mut self, id: EntityId);
    /// The player is gone (teardown)
    fn player_removed(&mut self, id: EntityId);
}

/// Score and game-over presentation
pub trait Hud {
    fn set_score(&mut self, score: u64);
    fn set_game_over(&mut self, visible: bool);
}

/// Everything a [`Game`](crate::Game) needs from its host
pub trait Platform: Clock + FrameScheduler + InputSource + SceneSink + Hud {}

impl<T> Platform for T where T: Clock + FrameScheduler + InputSource + SceneSink + Hud {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("A"), "a");
        assert_eq!(normalize_key("d"), "d");
        assert_eq!(normalize_key("ArrowLeft"), "ArrowLeft");
        assert_eq!(normalize_key("Enter"), "Enter");
        assert_eq!(normalize_key(""), "");
    }
}
