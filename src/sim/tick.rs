//! Simulation tick
//!
//! Advances the snake one cell and reports what happened.

use std::time::Duration;

use super::state::{Cell, GameState};
use crate::consts::*;

/// Why a move was fatal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Head left the board
    Wall,
    /// Head ran into the body
    SelfHit,
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Snake translated by one cell
    Moved,
    /// Snake grew onto the food; `score` is the new score
    Ate { score: u64 },
    /// The move was not applied
    Collided(Collision),
}

/// Advance the game state by one cell.
///
/// On collision the state is left exactly as it was.
pub fn tick(state: &mut GameState) -> TickOutcome {
    let direction = state.direction;
    let new_head = state.head().step(direction);

    if let Some(collision) = check_collision(state, new_head) {
        log::trace!("collision {:?} at ({}, {})", collision, new_head.x, new_head.y);
        return TickOutcome::Collided(collision);
    }

    state.snake.push_front(new_head);
    state.heading = direction;
    state.time_ticks += 1;

    if new_head == state.food {
        state.score += 1;
        state.place_food();
        TickOutcome::Ate { score: state.score }
    } else {
        state.snake.pop_back();
        TickOutcome::Moved
    }
}

/// Wall first, then body (tail included: it has not moved yet)
fn check_collision(state: &GameState, head: Cell) -> Option<Collision> {
    if !head.in_bounds() {
        return Some(Collision::Wall);
    }
    if state.occupies(head) {
        return Some(Collision::SelfHit);
    }
    None
}

/// Delay between ticks at the given score
pub fn tick_interval(score: u64) -> Duration {
    let ms = INITIAL_SPEED_MS
        .saturating_sub(score.saturating_mul(SPEED_INCREASE_MS))
        .max(MIN_SPEED_MS);
    Duration::from_millis(ms)
}
