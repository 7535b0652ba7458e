//! Player preferences
//!
//! Read separately from level tuning, from a small JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Player settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all cues
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no camera shake on wrong answers)
    pub reduced_motion: bool,
    /// Multiplier on dialogue typing speed (2.0 = twice as fast)
    pub text_speed: f32,
    /// Show the tap hint until the first move
    pub show_hint: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,
            text_speed: 1.0,
            show_hint: true,
        }
    }
}

impl Settings {
    /// Effective camera shake (respects reduced_motion)
    pub fn effective_camera_shake(&self) -> bool {
        !self.reduced_motion
    }

    /// Seconds per character after applying the text speed preference
    pub fn effective_typing_speed(&self, base: f32) -> f32 {
        if self.text_speed <= 0.0 {
            base
        } else {
            base / self.text_speed
        }
    }

    /// Load settings, falling back to defaults on a missing or corrupt file
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring corrupt settings {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_disables_shake() {
        let mut settings = Settings::default();
        assert!(settings.effective_camera_shake());
        settings.reduced_motion = true;
        assert!(!settings.effective_camera_shake());
    }

    #[test]
    fn test_text_speed_scales_typing() {
        let settings = Settings {
            text_speed: 2.0,
            ..Default::default()
        };
        assert!((settings.effective_typing_speed(0.04) - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let settings = Settings::load("/definitely/not/settings.json");
        assert!(!settings.muted);
        assert!((settings.master_volume - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_load_reads_written_file() {
        let path = std::env::temp_dir().join(format!(
            "number_knight_settings_{}.json",
            std::process::id()
        ));
        let settings = Settings {
            reduced_motion: true,
            sfx_volume: 0.5,
            ..Default::default()
        };
        std::fs::write(&path, serde_json::to_string_pretty(&settings).unwrap()).unwrap();
        let loaded = Settings::load(&path);
        let _ = std::fs::remove_file(&path);
        assert!(loaded.reduced_motion);
        assert!((loaded.sfx_volume - 0.5).abs() < 1e-6);
    }
}
