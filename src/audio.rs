//! Sound cue routing
//!
//! The simulation only names cues; an [`AudioBackend`] does the actual
//! playback. [`AudioManager`] applies the player's volume settings on the way.

use serde::{Deserialize, Serialize};

use crate::Settings;
use crate::hooks::AudioPlayer;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// Quiz answer was right
    Correct,
    /// Quiz answer was wrong
    Wrong,
    /// Player took a projectile hit
    Hit,
    /// Player died
    Death,
    /// Both quiz phases cleared
    LevelComplete,
}

/// Something that can actually make noise
pub trait AudioBackend {
    fn play(&mut self, cue: SoundCue, volume: f32);
}

/// Backend that only logs cues (headless runs)
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        log::debug!("audio: {:?} at {:.2}", cue, volume);
    }
}

/// Audio manager for the level
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AudioManager {
    pub fn new(backend: Option<Box<dyn AudioBackend>>) -> Self {
        if backend.is_none() {
            log::warn!("No audio backend - audio disabled");
        }
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Build a manager with volumes taken from settings
    pub fn with_settings(backend: Option<Box<dyn AudioBackend>>, settings: &Settings) -> Self {
        let mut manager = Self::new(backend);
        manager.set_master_volume(settings.master_volume);
        manager.set_sfx_volume(settings.sfx_volume);
        manager.set_muted(settings.muted);
        manager
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

impl AudioPlayer for AudioManager {
    fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        backend.play(cue, vol);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    struct Recording(Rc<RefCell<Vec<(SoundCue, f32)>>>);

    impl AudioBackend for Recording {
        fn play(&mut self, cue: SoundCue, volume: f32) {
            self.0.borrow_mut().push((cue, volume));
        }
    }

    #[test]
    fn test_volume_applied() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut manager = AudioManager::new(Some(Box::new(Recording(log.clone()))));
        manager.set_master_volume(0.5);
        manager.set_sfx_volume(0.5);
        manager.play(SoundCue::Hit);
        assert_eq!(log.borrow().as_slice(), &[(SoundCue::Hit, 0.25)]);
    }

    #[test]
    fn test_muted_skips_backend() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        let mut manager = AudioManager::with_settings(Some(Box::new(Recording(log.clone()))), &settings);
        manager.play(SoundCue::Correct);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_missing_backend_is_silent() {
        let mut manager = AudioManager::default();
        manager.play(SoundCue::Death);
    }
}
