//! Browser platform layer
//!
//! Handles the browser side of the seams the core defines:
//! - Storage (LocalStorage behind `KeyValueStore`)
//! - Time (`setInterval` behind `Scheduler`)

pub mod storage;
pub mod timer;

pub use storage::LocalStorageStore;
pub use timer::{IntervalId, IntervalScheduler};
