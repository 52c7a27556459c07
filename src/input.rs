//! Input normalization
//!
//! Turns raw keyboard keys and touch swipes into canonical directions or
//! session commands. Nothing here touches game state.

use glam::Vec2;

use crate::session::Command;
use crate::sim::Direction;

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Forward to the session
    Game(Command),
    /// Mute/unmute sound effects
    ToggleSound,
    /// Unrecognized key
    None,
}

/// Map a `KeyboardEvent.key` value to a direction
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        _ => None,
    }
}

/// Map a `KeyboardEvent.key` value to an action
pub fn action_for_key(key: &str) -> KeyAction {
    if let Some(direction) = direction_for_key(key) {
        return KeyAction::Game(Command::Steer(direction));
    }
    match key {
        "Escape" | "p" | "P" | " " => KeyAction::Game(Command::TogglePause),
        "Enter" => KeyAction::Game(Command::Confirm),
        "m" | "M" => KeyAction::ToggleSound,
        _ => KeyAction::None,
    }
}

/// Interpret a touch gesture from `start` to `end`.
///
/// Returns `None` when the finger moved less than `min_distance` on both
/// axes. Otherwise the dominant axis wins; a tie goes to the vertical axis.
pub fn swipe_direction(start: Vec2, end: Vec2, min_distance: f32) -> Option<Direction> {
    let delta = end - start;
    let abs = delta.abs();

    if abs.x < min_distance && abs.y < min_distance {
        return None;
    }

    if abs.x > abs.y {
        Some(if delta.x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else {
        Some(if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

/// Apply the reversal rule: `None` means keep `current`.
pub fn steer(current: Direction, proposed: Direction) -> Option<Direction> {
    if proposed == current || proposed.is_opposite(current) {
        None
    } else {
        Some(proposed)
    }
}

/// Remembers where a touch started until it ends
#[derive(Debug, Clone, Copy)]
pub struct SwipeTracker {
    start: Option<Vec2>,
    min_distance: f32,
}

impl SwipeTracker {
    pub fn new(min_distance: f32) -> Self {
        Self {
            start: None,
            min_distance,
        }
    }

    pub fn set_min_distance(&mut self, min_distance: f32) {
        self.min_distance = min_distance;
    }

    /// Touch start
    pub fn begin(&mut self, pos: Vec2) {
        self.start = Some(pos);
    }

    /// Touch end. Consumes the start point.
    pub fn finish(&mut self, pos: Vec2) -> Option<Direction> {
        let start = self.start.take()?;
        swipe_direction(start, pos, self.min_distance)
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(crate::consts::MIN_SWIPE_DISTANCE)
    }
}
