//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives here.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::input;

/// A grid coordinate. Signed so a head that left the board is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring cell one step in `direction`
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// True if the cell lies on the board
    pub fn in_bounds(self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Direction of travel. Screen coordinates: y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The direction exactly reversing this one
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// (dx, dy) for one step
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Body cells, head first
    pub snake: VecDeque<Cell>,
    pub food: Cell,
    /// Direction the next tick will apply
    pub direction: Direction,
    /// Direction the last tick applied
    pub heading: Direction,
    pub score: u64,
    /// Moves made this run
    pub time_ticks: u64,
    rng: Pcg32,
}

impl GameState {
    /// Create a fresh run with the given RNG seed
    pub fn new(seed: u64) -> Self {
        let mut snake = VecDeque::with_capacity((GRID_SIZE * GRID_SIZE) as usize);
        snake.push_back(Cell::from(INITIAL_HEAD));
        Self {
            snake,
            food: Cell::from(INITIAL_FOOD),
            direction: Direction::Right,
            heading: Direction::Right,
            score: 0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Put snake, food, direction and score back to their starting values.
    /// The RNG keeps its position so food placement differs between runs.
    pub fn reset(&mut self) {
        self.snake.clear();
        self.snake.push_back(Cell::from(INITIAL_HEAD));
        self.food = Cell::from(INITIAL_FOOD);
        self.direction = Direction::Right;
        self.heading = Direction::Right;
        self.score = 0;
        self.time_ticks = 0;
    }

    pub fn head(&self) -> Cell {
        self.snake[0]
    }

    /// True if any body cell (head and tail included) is at `cell`
    pub fn occupies(&self, cell: Cell) -> bool {
        self.snake.contains(&cell)
    }

    /// Request a new direction for the next tick.
    ///
    /// Rejected if it reverses either the pending direction or the heading
    /// the last tick applied. Returns true if the direction changed.
    pub fn steer(&mut self, proposed: Direction) -> bool {
        if proposed.is_opposite(self.heading) {
            return false;
        }
        match input::steer(self.direction, proposed) {
            Some(direction) => {
                self.direction = direction;
                true
            }
            None => false,
        }
    }

    /// Pick a new food cell uniformly over the whole board.
    /// Cells under the snake are not excluded.
    pub fn place_food(&mut self) -> Cell {
        self.food = Cell::new(
            self.rng.random_range(0..GRID_SIZE),
            self.rng.random_range(0..GRID_SIZE),
        );
        self.food
    }

    /// Replace the body, head first
    #[cfg(test)]
    pub(crate) fn set_snake(&mut self, cells: impl IntoIterator<Item = Cell>) {
        self.snake = cells.into_iter().collect();
    }
}
