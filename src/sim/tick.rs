//! Per-frame simulation tick
//!
//! Advances the field by one frame against a wall-clock timestamp.

use super::collision::entities_collide;
use super::difficulty::Difficulty;
use super::entity::Steer;
use super::state::{GamePhase, SimEvent, SimulationState};
use crate::consts::*;

/// How far above the ship the autopilot looks for threats
const AUTOPILOT_LOOKAHEAD: f32 = 6.0;
/// Extra horizontal clearance the autopilot keeps from rocks and walls
const AUTOPILOT_MARGIN: f32 = 0.3;
/// Autopilot drifts back toward the lane center beyond this offset
const AUTOPILOT_CENTER_ZONE: f32 = 1.0;

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// A left key is held
    pub left: bool,
    /// A right key is held
    pub right: bool,
    /// Demo mode - the ship steers itself
    pub autopilot: bool,
}

impl TickInput {
    pub fn steer(&self) -> Steer {
        Steer::from_held(self.left, self.right)
    }
}

/// Advance the simulation by one frame at wall-clock time `now_ms`
pub fn tick(state: &mut SimulationState, input: &TickInput, now_ms: f64) {
    // Nothing moves after the ship is hit
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time_ticks += 1;

    let steer = if input.autopilot {
        autopilot_steer(state)
    } else {
        input.steer()
    };
    state.player.update(steer);

    if state
        .spawner
        .is_due(now_ms, state.difficulty.spawn_interval_ms)
    {
        let id = state.next_entity_id();
        let obstacle = state.spawner.spawn(&mut state.rng, id, now_ms);
        log::trace!(
            "Spawned asteroid {} at x={:.2} size={:.2} speed={:.3}",
            id,
            obstacle.pos.x,
            obstacle.size,
            obstacle.speed
        );
        state.obstacles.push(obstacle);
        state.events.push(SimEvent::ObstacleSpawned { id });
    }

    // Fall and tumble, dropping rocks that left the field
    let game_speed = state.difficulty.game_speed;
    let events = &mut state.events;
    let mut dodged = 0;
    state.obstacles.retain_mut(|obstacle| {
        obstacle.update(game_speed);
        if obstacle.is_below_field() {
            events.push(SimEvent::ObstacleRemoved { id: obstacle.id });
            dodged += 1;
            false
        } else {
            true
        }
    });
    state.obstacles_dodged += dodged;

    // First hit ends the run; score and difficulty keep their last values
    let hit = state
        .obstacles
        .iter()
        .find(|obstacle| entities_collide(&state.player, *obstacle))
        .map(|obstacle| obstacle.id);
    if let Some(obstacle) = hit {
        state.phase = GamePhase::GameOver;
        state.events.push(SimEvent::Collision { obstacle });
        log::info!(
            "Ship hit by asteroid {} - final score {}",
            obstacle,
            state.score
        );
        return;
    }

    let elapsed = state.elapsed_ms(now_ms);
    state.score = SimulationState::score_for(elapsed);
    state.survived_ms = elapsed;
    state.difficulty = Difficulty::at(elapsed);
}

/// Demo-mode steering: slide away from the nearest rock in the ship's
/// column, otherwise drift back toward the middle of the lane.
fn autopilot_steer(state: &SimulationState) -> Steer {
    let ship = &state.player;
    let ship_bottom = ship.pos.y - PLAYER_HALF_EXTENTS.y;
    let ship_top = ship.pos.y + PLAYER_HALF_EXTENTS.y;

    let threat = state
        .obstacles
        .iter()
        .filter(|rock| {
            rock.pos.y + rock.size >= ship_bottom
                && rock.pos.y - rock.size - ship_top < AUTOPILOT_LOOKAHEAD
        })
        .filter(|rock| {
            (rock.pos.x - ship.pos.x).abs()
                < rock.size + PLAYER_HALF_EXTENTS.x + AUTOPILOT_MARGIN
        })
        .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    match threat {
        Some(rock) => {
            let wants_left = rock.pos.x >= ship.pos.x;
            let left_blocked = ship.pos.x - ship.speed < -PLAYER_BOUND + AUTOPILOT_MARGIN;
            let right_blocked = ship.pos.x + ship.speed > PLAYER_BOUND - AUTOPILOT_MARGIN;
            match (wants_left, left_blocked, right_blocked) {
                (true, false, _) => Steer::Left,
                (true, true, _) => Steer::Right,
                (false, _, false) => Steer::Right,
                (false, _, true) => Steer::Left,
            }
        }
        None if ship.pos.x > AUTOPILOT_CENTER_ZONE => Steer::Left,
        None if ship.pos.x < -AUTOPILOT_CENTER_ZONE => Steer::Right,
        None => Steer::Idle,
    }
}
