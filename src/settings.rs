//! Game settings and preferences
//!
//! Persisted separately from the player profile in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::platform;

/// Spreadsheet web app that stores and serves the shared leaderboard
pub const DEFAULT_LEADERBOARD_URL: &str = "https://script.google.com/macros/s/AKfycbx1pgEzolCLPUjlDN0p9rttkluF-XkCh6kdu4As3Vfx54QYY_vRRWdHjeuXrVLJ5_Fv/exec";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Visuals ===
    /// Scroll the background image behind the world
    pub parallax_background: bool,
    /// Switch to the night palette past the score threshold
    pub day_night_cycle: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Leaderboard ===
    pub leaderboard_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            parallax_background: true,
            day_night_cycle: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            leaderboard_url: DEFAULT_LEADERBOARD_URL.to_string(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "officeRunnerSettings";

    /// Effective sound effect volume (0 when muted)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Load settings, falling back to defaults
    pub fn load() -> Self {
        match platform::load_json::<Self>(Self::STORAGE_KEY) {
            Ok(settings) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            Err(platform::StorageError::Missing(_)) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        platform::save_json(Self::STORAGE_KEY, self);
        log::info!("Settings saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_volume() {
        let mut s = Settings::default();
        assert!((s.effective_sfx_volume() - 0.8).abs() < 1e-6);
        s.muted = true;
        assert_eq!(s.effective_sfx_volume(), 0.0);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let s: Settings = serde_json::from_str(r#"{ "muted": true }"#).unwrap();
        assert!(s.muted);
        assert!(s.parallax_background);
        assert_eq!(s.leaderboard_url, DEFAULT_LEADERBOARD_URL);
    }

    #[test]
    fn test_native_load_defaults() {
        assert_eq!(Settings::load(), Settings::default());
    }
}
