//! Widgets that can show a fractional fill

use serde::{Deserialize, Serialize};

/// A widget whose fill can be set to a value in `[0, 1]`
pub trait FractionalFill {
    fn fill(&self) -> f32;
    fn set_fill(&mut self, value: f32);
}

/// Plain image in filled mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FilledImage {
    pub fill_amount: f32,
}

impl FractionalFill for FilledImage {
    fn fill(&self) -> f32 {
        self.fill_amount
    }

    fn set_fill(&mut self, value: f32) {
        self.fill_amount = value.clamp(0.0, 1.0);
    }
}

/// Rounded procedural image; the fill is carried alongside its corner radius
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProceduralImage {
    pub fill_amount: f32,
    pub corner_radius: f32,
}

impl FractionalFill for ProceduralImage {
    fn fill(&self) -> f32 {
        self.fill_amount
    }

    fn set_fill(&mut self, value: f32) {
        self.fill_amount = value.clamp(0.0, 1.0);
    }
}

/// Graphic with no fill mode; the fill is shown as opacity
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AlphaGraphic {
    pub alpha: f32,
}

impl FractionalFill for AlphaGraphic {
    fn fill(&self) -> f32 {
        self.alpha
    }

    fn set_fill(&mut self, value: f32) {
        self.alpha = value.clamp(0.0, 1.0);
    }
}
