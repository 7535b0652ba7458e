//! Heart-segment health bar
//!
//! Purely a view of the player's hit counter: each hit drains the rightmost
//! heart that still has fill by a fixed step.

use super::fill::{FilledImage, FractionalFill};

#[derive(Debug, Clone)]
pub struct HealthBar<F: FractionalFill = FilledImage> {
    hearts: Vec<F>,
    step: f32,
}

impl HealthBar<FilledImage> {
    /// Full bar of `count` plain heart images
    pub fn new(count: usize, step: f32) -> Self {
        Self::with_hearts(
            (0..count)
                .map(|_| FilledImage { fill_amount: 1.0 })
                .collect(),
            step,
        )
    }
}

impl<F: FractionalFill> HealthBar<F> {
    pub fn with_hearts(hearts: Vec<F>, step: f32) -> Self {
        Self { hearts, step }
    }

    /// Drain the rightmost non-empty heart by one step
    pub fn apply_hit(&mut self) {
        if let Some(heart) = self.hearts.iter_mut().rev().find(|h| h.fill() > 0.0) {
            let next = (heart.fill() - self.step).max(0.0);
            heart.set_fill(next);
        }
    }

    /// Fill values left to right
    pub fn fills(&self) -> Vec<f32> {
        self.hearts.iter().map(|h| h.fill()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_heart_steps_drain_right_to_left() {
        let mut bar = HealthBar::new(3, 0.5);
        bar.apply_hit();
        assert_eq!(bar.fills(), vec![1.0, 1.0, 0.5]);
        bar.apply_hit();
        assert_eq!(bar.fills(), vec![1.0, 1.0, 0.0]);
        bar.apply_hit();
        assert_eq!(bar.fills(), vec![1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_empty_bar_stays_empty() {
        let mut bar = HealthBar::new(1, 0.5);
        for _ in 0..5 {
            bar.apply_hit();
        }
        assert_eq!(bar.fills(), vec![0.0]);
    }
}
