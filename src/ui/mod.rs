//! Presentation state
//!
//! Everything here is cosmetic sequencing: no gameplay rule reads these
//! values back. Each widget advances on `update(dt)` from the same clock as
//! the simulation.

pub mod fade;
pub mod fill;
pub mod health;
pub mod quiz_panel;
pub mod runes;
pub mod typewriter;

pub use fade::ScreenFade;
pub use fill::{AlphaGraphic, FilledImage, FractionalFill, ProceduralImage};
pub use health::HealthBar;
pub use quiz_panel::{ButtonState, NumberDisplay, QuizPanel, Tint};
pub use runes::RuneProgress;
pub use typewriter::{Dialogue, Typewriter};

use serde::{Deserialize, Serialize};

use crate::ease_out_cubic;

/// Linear value tween over a fixed duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub elapsed: f32,
    pub duration: f32,
    /// Apply a cubic ease-out instead of linear interpolation
    pub eased: bool,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            elapsed: 0.0,
            duration,
            eased: false,
        }
    }

    pub fn eased(mut self) -> Self {
        self.eased = true;
        self
    }

    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.value()
    }

    pub fn value(&self) -> f32 {
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        };
        let t = if self.eased { ease_out_cubic(t) } else { t };
        self.from + (self.to - self.from) * t
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}
