//! Rune progress column
//!
//! Runes light bottom to top, one per correct answer, each tweening its fill
//! from 0 to 1.

use super::Tween;
use super::fill::FractionalFill;
use crate::hooks::ProgressTracker;

pub struct RuneProgress {
    runes: Vec<Box<dyn FractionalFill>>,
    tweens: Vec<Option<Tween>>,
    max_to_fill: usize,
    filled: usize,
    tween_time: f32,
}

impl RuneProgress {
    /// `max_to_fill == 0` means "every rune"
    pub fn new(runes: Vec<Box<dyn FractionalFill>>, max_to_fill: usize, tween_time: f32) -> Self {
        let max_to_fill = if max_to_fill == 0 {
            runes.len().max(1)
        } else {
            max_to_fill
        };
        let mut progress = Self {
            tweens: vec![None; runes.len()],
            runes,
            max_to_fill,
            filled: 0,
            tween_time,
        };
        progress.reset();
        progress
    }

    /// Clear every rune instantly
    pub fn reset(&mut self) {
        for rune in self.runes.iter_mut() {
            rune.set_fill(0.0);
        }
        self.tweens.iter_mut().for_each(|t| *t = None);
        self.filled = 0;
    }

    pub fn filled_count(&self) -> usize {
        self.filled
    }

    pub fn is_complete(&self) -> bool {
        self.filled >= self.max_to_fill
    }

    /// Overall progress in `[0, 1]`
    pub fn normalized(&self) -> f32 {
        self.filled as f32 / self.max_to_fill as f32
    }

    pub fn fills(&self) -> Vec<f32> {
        self.runes.iter().map(|r| r.fill()).collect()
    }
}

impl ProgressTracker for RuneProgress {
    fn register_correct(&mut self) {
        if self.is_complete() {
            return;
        }
        let idx = self.filled;
        let Some(rune) = self.runes.get(idx) else {
            return;
        };
        self.tweens[idx] = Some(Tween::new(rune.fill(), 1.0, self.tween_time).eased());
        self.filled += 1;

        if self.is_complete() {
            log::info!("All runes lit");
        }
    }

    fn update(&mut self, dt: f32) {
        for (rune, slot) in self.runes.iter_mut().zip(self.tweens.iter_mut()) {
            if let Some(tween) = slot {
                rune.set_fill(tween.advance(dt));
                if tween.is_done() {
                    *slot = None;
                }
            }
        }
    }
}
