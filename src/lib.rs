//! Grid Snake - a neon Snake game for the browser
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, food, speed)
//! - `input`: Keyboard/swipe normalization into directions and commands
//! - `session`: Run state machine and tick timer ownership
//! - `persistence`: Key-value storage seam (LocalStorage on web, memory in tests)
//! - `platform`: Browser bindings (storage, interval timer, touch tracking)
//! - `renderer`: Canvas 2D drawing

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod input;
pub mod persistence;
#[cfg(target_arch = "wasm32")]
pub mod platform;
#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::HighScore;
pub use persistence::{KeyValueStore, MemoryStore, StorageError};
pub use session::{Command, GameEvent, GamePhase, ManualScheduler, Scheduler, Session};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Cells per side of the square playfield
    pub const GRID_SIZE: i32 = 20;

    /// Tick interval at score 0 (ms)
    pub const INITIAL_SPEED_MS: u64 = 150;
    /// Interval reduction per point scored (ms)
    pub const SPEED_INCREASE_MS: u64 = 2;
    /// Fastest allowed tick interval (ms)
    pub const MIN_SPEED_MS: u64 = 50;

    /// Swipes shorter than this on both axes are ignored (CSS pixels)
    pub const MIN_SWIPE_DISTANCE: f32 = 50.0;

    /// Spawn position of the snake head
    pub const INITIAL_HEAD: (i32, i32) = (10, 10);
    /// Position of the first food of every run
    pub const INITIAL_FOOD: (i32, i32) = (5, 5);
}
