//! Game settings and preferences
//!
//! Persisted as JSON next to the high score, toggled on the Settings screen.

use serde::{Deserialize, Serialize};

use crate::platform::{KeyValueStore, StorageError};

/// A single on/off preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Particles,
    ScreenShake,
    TouchControls,
    ShowFps,
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Particle bursts on destruction
    pub particles: bool,
    /// Screen shake on hits and explosions
    pub screen_shake: bool,
    /// On-screen left/right/fire pads
    pub touch_controls: bool,
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particles: true,
            screen_shake: true,
            touch_controls: false,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "canvas_invaders_settings";

    pub fn get(&self, setting: Setting) -> bool {
        match setting {
            Setting::Particles => self.particles,
            Setting::ScreenShake => self.screen_shake,
            Setting::TouchControls => self.touch_controls,
            Setting::ShowFps => self.show_fps,
        }
    }

    pub fn toggle(&mut self, setting: Setting) {
        let slot = match setting {
            Setting::Particles => &mut self.particles,
            Setting::ScreenShake => &mut self.screen_shake,
            Setting::TouchControls => &mut self.touch_controls,
            Setting::ShowFps => &mut self.show_fps,
        };
        *slot = !*slot;
    }

    /// Load settings, falling back to defaults on any problem
    pub fn load(store: &impl KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Stored settings unreadable ({e}), using defaults");
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not read settings: {e}");
                Self::default()
            }
        }
    }

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
    use crate::platform::MemoryStore;

    #[test]
    fn test_toggle() {
        let mut s = Settings::default();
        assert!(s.get(Setting::Particles));
        s.toggle(Setting::Particles);
        assert!(!s.get(Setting::Particles));
        s.toggle(Setting::TouchControls);
        assert!(s.touch_controls);
    }

    #[test]
    fn test_save_and_load() {
        let mut store = MemoryStore::new();
        let mut s = Settings::default();
        s.toggle(Setting::ShowFps);
        s.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), s);
    }

    #[test]
    fn test_corrupt_settings_fall_back() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "{{{").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, r#"{"show_fps":true}"#).unwrap();
        let s = Settings::load(&store);
        assert!(s.show_fps);
        assert!(s.particles);
    }
}
