//! Player settings and preferences
//!
//! Persisted as JSON next to the high score.

use serde::{Deserialize, Serialize};

use crate::consts::MIN_SWIPE_DISTANCE;
use crate::persistence::{KeyValueStore, StorageError};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Sound effects on/off
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Input ===
    /// Shortest touch movement that counts as a swipe
    pub min_swipe_distance: f32,

    // === Visuals ===
    /// Draw faint grid lines over the board
    pub show_grid: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            master_volume: 0.8,
            min_swipe_distance: MIN_SWIPE_DISTANCE,
            show_grid: true,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "snake_settings";

    /// Clamp values edited by hand in storage back into range
    pub fn sanitized(mut self) -> Self {
        self.master_volume = if self.master_volume.is_finite() {
            self.master_volume.clamp(0.0, 1.0)
        } else {
            Self::default().master_volume
        };
        self.min_swipe_distance = if self.min_swipe_distance.is_finite() {
            self.min_swipe_distance.max(1.0)
        } else {
            MIN_SWIPE_DISTANCE
        };
        self
    }

    /// Volume actually applied to effects
    pub fn effective_volume(&self) -> f32 {
        if self.sound_enabled {
            self.master_volume
        } else {
            0.0
        }
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.sound_enabled = !self.sound_enabled;
        self.sound_enabled
    }

    /// Load settings from the store, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings.sanitized();
                }
                Err(e) => log::warn!("Ignoring malformed settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to the store
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_when_missing() {
        assert_eq!(Settings::load(&MemoryStore::new()), Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let mut settings = Settings::default();
        settings.toggle_sound();
        settings.min_swipe_distance = 30.0;
        settings.save(&mut store).unwrap();

        let loaded = Settings::load(&store);
        assert!(!loaded.sound_enabled);
        assert_eq!(loaded.min_swipe_distance, 30.0);
        assert_eq!(loaded.effective_volume(), 0.0);
    }

    #[test]
    fn test_malformed_and_partial_json() {
        let store = MemoryStore::new().with(Settings::STORAGE_KEY, "{not json");
        assert_eq!(Settings::load(&store), Settings::default());

        // Missing fields fill in from defaults
        let store = MemoryStore::new().with(Settings::STORAGE_KEY, r#"{"show_grid":false}"#);
        let loaded = Settings::load(&store);
        assert!(!loaded.show_grid);
        assert!(loaded.sound_enabled);
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let store = MemoryStore::new().with(
            Settings::STORAGE_KEY,
            r#"{"master_volume":4.0,"min_swipe_distance":-10.0}"#,
        );
        let loaded = Settings::load(&store);
        assert_eq!(loaded.master_volume, 1.0);
        assert_eq!(loaded.min_swipe_distance, 1.0);
    }

    #[test]
    fn test_save_to_read_only_store() {
        let mut store = MemoryStore::read_only();
        assert!(matches!(
            Settings::default().save(&mut store),
            Err(StorageError::Unavailable)
        ));
    }
}
