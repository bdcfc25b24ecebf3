//! Simulation state and core run types
//!
//! Everything a run needs lives in [`SimulationState`], owned by the tick.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use super::entity::{EntityId, Obstacle, Player};
use super::spawner::Spawner;
use crate::consts::SCORE_INTERVAL_MS;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ticks advance the field
    Running,
    /// The ship was hit; nothing moves until restart
    GameOver,
}

/// Scene-relevant changes recorded during a tick or a reset.
///
/// The host drains these and forwards them to its scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    PlayerPlaced { id: EntityId },
    ObstacleSpawned { id: EntityId },
    ObstacleRemoved { id: EntityId },
    Collision { obstacle: EntityId },
}

/// Outcome of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    /// Running time as of the last scored tick
    pub survived_ms: f64,
    /// Asteroids that fell past the ship
    pub obstacles_dodged: u32,
}

/// Complete state of one game session
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// RNG stream, carried across resets so successive runs differ
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub player: Player,
    /// Active asteroids in spawn order
    pub obstacles: Vec<Obstacle>,
    /// One point per 100ms of running time
    pub score: u64,
    /// Running time as of the last scored tick
    pub survived_ms: f64,
    /// Timestamp (ms) the current run started
    pub run_start_ms: f64,
    pub spawner: Spawner,
    pub difficulty: Difficulty,
    /// Ticks processed in the current run
    pub time_ticks: u64,
    pub obstacles_dodged: u32,
    /// Pending scene events (drained by the host)
    pub events: Vec<SimEvent>,
    /// Next entity ID
    next_id: EntityId,
}

impl SimulationState {
    /// Start a fresh session at `now_ms`
    pub fn new(seed: u64, now_ms: f64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Running,
            player: Player::new(0),
            obstacles: Vec::new(),
            score: 0,
            survived_ms: 0.0,
            run_start_ms: now_ms,
            spawner: Spawner::new(now_ms),
            difficulty: Difficulty::default(),
            time_ticks: 0,
            obstacles_dodged: 0,
            events: Vec::new(),
            next_id: 1,
        };
        let id = state.next_entity_id();
        state.player = Player::new(id);
        state.events.push(SimEvent::PlayerPlaced { id });
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin a new run at `now_ms`: drop all asteroids, move the existing
    /// ship back to the start and rebuild timers, score and difficulty.
    pub fn reset(&mut self, now_ms: f64) {
        for obstacle in self.obstacles.drain(..) {
            self.events.push(SimEvent::ObstacleRemoved { id: obstacle.id });
        }
        self.player.reposition();
        self.events.push(SimEvent::PlayerPlaced { id: self.player.id });

        self.phase = GamePhase::Running;
        self.score = 0;
        self.survived_ms = 0.0;
        self.run_start_ms = now_ms;
        self.spawner = Spawner::new(now_ms);
        self.difficulty = Difficulty::default();
        self.time_ticks = 0;
        self.obstacles_dodged = 0;
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Running time of the current run at `now_ms`
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.run_start_ms).max(0.0)
    }

    /// Score for a run that has lasted `elapsed_ms`
    pub fn score_for(elapsed_ms: f64) -> u64 {
        (elapsed_ms.max(0.0) / SCORE_INTERVAL_MS).floor() as u64
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.score,
            survived_ms: self.survived_ms,
            obstacles_dodged: self.obstacles_dodged,
        }
    }

    /// Take all recorded events, oldest first
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_START;
    use crate::sim::entity::Steer;
    use crate::sim::spawner::roll_obstacle;

    #[test]
    fn test_new_state() {
        let mut state = SimulationState::new(12345, 500.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.run_start_ms, 500.0);
        assert_eq!(state.spawner.last_spawn_ms, 500.0);
        assert_eq!(state.difficulty, Difficulty::at(0.0));
        let id = state.player.id;
        assert_eq!(state.drain_events(), vec![SimEvent::PlayerPlaced { id }]);
    }

    #[test]
    fn test_reset_keeps_player_and_clears_field() {
        let mut state = SimulationState::new(1, 0.0);
        let player_id = state.player.id;
        for _ in 0..3 {
            let id = state.next_entity_id();
            let rock = roll_obstacle(&mut state.rng, id);
            state.obstacles.push(rock);
        }
        state.player.update(Steer::Left);
        state.score = 42;
        state.phase = GamePhase::GameOver;
        state.difficulty = Difficulty::at(20_000.0);
        state.drain_events();

        state.reset(9000.0);

        assert_eq!(state.player.id, player_id);
        assert_eq!(state.player.pos, PLAYER_START);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.run_start_ms, 9000.0);
        assert_eq!(state.spawner.last_spawn_ms, 9000.0);
        assert_eq!(state.difficulty.game_speed, 1.0);
        assert_eq!(state.difficulty.spawn_interval_ms, 1000.0);

        let removed = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, SimEvent::ObstacleRemoved { .. }))
            .count();
        assert_eq!(removed, 3);
    }

    #[test]
    fn test_reset_twice_matches_once() {
        let mut once = SimulationState::new(3, 0.0);
        once.reset(100.0);
        let mut twice = once.clone();
        twice.reset(100.0);

        assert_eq!(once.obstacles, twice.obstacles);
        assert_eq!(once.score, twice.score);
        assert_eq!(once.phase, twice.phase);
        assert_eq!(once.difficulty, twice.difficulty);
        assert_eq!(once.player, twice.player);
        assert_eq!(once.run_start_ms, twice.run_start_ms);
    }

    #[test]
    fn test_score_for() {
        assert_eq!(SimulationState::score_for(0.0), 0);
        assert_eq!(SimulationState::score_for(99.9), 0);
        assert_eq!(SimulationState::score_for(5000.0), 50);
        assert_eq!(SimulationState::score_for(35_000.0), 350);
    }
}
