//! Full-screen fade overlay

use serde::{Deserialize, Serialize};

use super::Tween;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenFade {
    alpha: f32,
    tween: Option<Tween>,
    duration: f32,
    /// Overlay swallows pointer input
    raycast_target: bool,
}

impl ScreenFade {
    /// Transparent overlay
    pub fn new(duration: f32) -> Self {
        Self {
            alpha: 0.0,
            tween: None,
            duration,
            raycast_target: false,
        }
    }

    /// Start opaque and fade to clear; input is blocked until it finishes
    pub fn fade_in(&mut self) {
        self.alpha = 1.0;
        self.raycast_target = true;
        self.tween = Some(Tween::new(1.0, 0.0, self.duration));
    }

    /// Fade to opaque and keep blocking input
    pub fn fade_out(&mut self) {
        self.raycast_target = true;
        self.tween = Some(Tween::new(self.alpha, 1.0, self.duration));
    }

    pub fn update(&mut self, dt: f32) {
        let Some(tween) = self.tween.as_mut() else {
            return;
        };
        self.alpha = tween.advance(dt);
        if tween.is_done() {
            if tween.to <= 0.0 {
                self.raycast_target = false;
            }
            self.tween = None;
        }
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn blocks_input(&self) -> bool {
        self.raycast_target
    }

    pub fn is_fading(&self) -> bool {
        self.tween.is_some()
    }
}
