//! Persisted high score
//!
//! A single best score, stored as decimal text under [`HighScore::STORAGE_KEY`].

use crate::persistence::KeyValueStore;

/// Best score across all runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "snakeHighScore";

    pub fn get(&self) -> u64 {
        self.best
    }

    /// Read the stored high score. Missing or malformed values count as 0.
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Some(text) => match text.trim().parse::<u64>() {
                Ok(best) => {
                    log::info!("Loaded high score {}", best);
                    Self { best }
                }
                Err(_) => {
                    log::warn!("Ignoring malformed high score {:?}", text);
                    Self::default()
                }
            },
            None => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
        }
    }

    /// Record a finished run. If `score` beats the best it becomes the new
    /// best and is written to `store` right away. Returns true on a new best.
    ///
    /// A failed write is logged; the in-memory best is still updated.
    pub fn record(&mut self, score: u64, store: &mut impl KeyValueStore) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        match store.set(Self::STORAGE_KEY, &score.to_string()) {
            Ok(()) => log::info!("New high score {} saved", score),
            Err(e) => log::warn!("New high score {} not saved: {}", score, e),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_reads_browser_game_key() {
        let store = MemoryStore::new().with("snakeHighScore", "12");
        assert_eq!(HighScore::load(&store).get(), 12);
    }

    #[test]
    fn test_load_missing_and_malformed() {
        assert_eq!(HighScore::load(&MemoryStore::new()).get(), 0);

        for bad in ["", "abc", "-3", "1.5"] {
            let store = MemoryStore::new().with(HighScore::STORAGE_KEY, bad);
            assert_eq!(HighScore::load(&store).get(), 0, "value {:?}", bad);
        }

        let store = MemoryStore::new().with(HighScore::STORAGE_KEY, " 12 ");
        assert_eq!(HighScore::load(&store).get(), 12);
    }

    #[test]
    fn test_record_only_improvements() {
        let mut store = MemoryStore::new().with(HighScore::STORAGE_KEY, "3");
        let mut high = HighScore::load(&store);

        assert!(high.record(7, &mut store));
        assert_eq!(store.get(HighScore::STORAGE_KEY).as_deref(), Some("7"));

        assert!(!high.record(2, &mut store));
        assert!(!high.record(7, &mut store));
        assert_eq!(high.get(), 7);
        assert_eq!(store.get(HighScore::STORAGE_KEY).as_deref(), Some("7"));
    }

    #[test]
    fn test_record_survives_write_failure() {
        let mut store = MemoryStore::read_only();
        let mut high = HighScore::default();
        assert!(high.record(5, &mut store));
        assert_eq!(high.get(), 5);
        assert_eq!(store.get(HighScore::STORAGE_KEY), None);
    }
}
