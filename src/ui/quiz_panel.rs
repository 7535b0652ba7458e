//! Quiz buttons, question banner and the big number

use serde::{Deserialize, Serialize};

use super::Tween;
use super::typewriter::Typewriter;
use crate::ease_out_cubic;
use crate::sim::quiz::{AnswerButton, QuestionPhase};

/// Color applied to the big number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tint {
    #[default]
    Normal,
    /// Correct-answer flash
    Correct,
    /// Wrong-answer flash
    Wrong,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonState {
    pub label: &'static str,
    pub visible: bool,
    pub interactable: bool,
    /// Pop-in scale (0 hidden, 1 full size)
    pub scale: f32,
}

impl ButtonState {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            visible: true,
            interactable: false,
            scale: 1.0,
        }
    }
}

/// The number shown above the gate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NumberDisplay {
    value: Option<u32>,
    alpha: f32,
    fade: Option<Tween>,
    fade_delay: f32,
    tint: Tint,
    tint_left: f32,
}

impl NumberDisplay {
    /// Show a fresh number, fading in from transparent
    pub fn show(&mut self, value: u32, fade_time: f32) {
        self.value = Some(value);
        self.alpha = 0.0;
        self.fade = Some(Tween::new(0.0, 1.0, fade_time));
        self.fade_delay = 0.0;
        self.tint = Tint::Normal;
        self.tint_left = 0.0;
    }

    /// Tint for `duration`, then back to normal
    pub fn flash(&mut self, tint: Tint, duration: f32) {
        self.tint = tint;
        self.tint_left = duration;
    }

    /// Fade to transparent after `delay`, then hide
    pub fn fade_out(&mut self, delay: f32, fade_time: f32) {
        self.fade_delay = delay;
        self.fade = Some(Tween::new(self.alpha, 0.0, fade_time));
    }

    pub fn hide(&mut self) {
        self.value = None;
        self.alpha = 0.0;
        self.fade = None;
    }

    pub fn update(&mut self, dt: f32) {
        if self.tint_left > 0.0 {
            self.tint_left -= dt;
            if self.tint_left <= 0.0 {
                self.tint = Tint::Normal;
            }
        }
        if self.fade_delay > 0.0 {
            self.fade_delay -= dt;
            return;
        }
        if let Some(tween) = self.fade.as_mut() {
            self.alpha = tween.advance(dt);
            if tween.is_done() {
                let faded_out = tween.to <= 0.0;
                self.fade = None;
                if faded_out {
                    self.hide();
                }
            }
        }
    }

    pub fn value(&self) -> Option<u32> {
        self.value
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn tint(&self) -> Tint {
        self.tint
    }
}

#[derive(Debug, Clone, Copy)]
struct PopIn {
    elapsed: f32,
    stagger: f32,
    time: f32,
}

/// Answer buttons, question banner and number display
#[derive(Debug, Clone)]
pub struct QuizPanel {
    pub buttons: [ButtonState; 3],
    pub prompt: Typewriter,
    pub number: NumberDisplay,
    /// "Tap to move" hint, hidden after the first move
    pub hint_visible: bool,
    phase: QuestionPhase,
    legacy_prime_button: bool,
    pop: Option<PopIn>,
}

impl QuizPanel {
    pub fn new(char_delay: f32, legacy_prime_button: bool) -> Self {
        let mut panel = Self {
            buttons: [
                ButtonState::new("Odd"),
                ButtonState::new("Even"),
                ButtonState::new("Prime"),
            ],
            prompt: Typewriter::new(char_delay),
            number: NumberDisplay::default(),
            hint_visible: true,
            phase: QuestionPhase::Parity,
            legacy_prime_button,
            pop: None,
        };
        panel.apply_phase(QuestionPhase::Parity);
        panel
    }

    pub fn phase(&self) -> QuestionPhase {
        self.phase
    }

    /// Relabel buttons for a phase
    pub fn apply_phase(&mut self, phase: QuestionPhase) {
        self.phase = phase;
        let [first, second, third] = &mut self.buttons;
        match phase {
            QuestionPhase::Parity => {
                first.label = "Odd";
                second.label = "Even";
                third.visible = self.legacy_prime_button;
            }
            QuestionPhase::Prime => {
                first.label = "Yes";
                second.label = "No";
                third.visible = false;
            }
            QuestionPhase::Done => {
                third.visible = false;
            }
        }
        if !third.visible {
            third.interactable = false;
        }
    }

    pub fn set_interactable(&mut self, on: bool) {
        for button in self.buttons.iter_mut() {
            button.interactable = on && button.visible;
        }
    }

    pub fn is_interactable(&self, button: AnswerButton) -> bool {
        self.buttons[button.index()].interactable
    }

    /// Scale buttons from zero, staggered left to right
    pub fn start_pop(&mut self, stagger: f32, time: f32) {
        for button in self.buttons.iter_mut() {
            button.scale = 0.0;
        }
        self.pop = Some(PopIn {
            elapsed: 0.0,
            stagger,
            time,
        });
    }

    /// Disable every button and hide the number
    pub fn shut_down(&mut self) {
        self.set_interactable(false);
        self.number.hide();
    }

    pub fn update(&mut self, dt: f32) {
        self.prompt.update(dt);
        self.number.update(dt);

        if let Some(pop) = self.pop.as_mut() {
            pop.elapsed += dt;
            let mut done = true;
            for (i, button) in self.buttons.iter_mut().enumerate() {
                let local = pop.elapsed - pop.stagger * i as f32;
                let t = if pop.time <= 0.0 { 1.0 } else { local / pop.time };
                button.scale = ease_out_cubic(t);
                done &= t >= 1.0;
            }
            if done {
                self.pop = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parity_hides_prime_button() {
        let panel = QuizPanel::new(0.0, false);
        assert_eq!(panel.buttons[0].label, "Odd");
        assert_eq!(panel.buttons[1].label, "Even");
        assert!(!panel.buttons[2].visible);
    }

    #[test]
    fn test_prime_phase_relabels_yes_no() {
        let mut panel = QuizPanel::new(0.0, true);
        assert!(panel.buttons[2].visible);
        panel.apply_phase(QuestionPhase::Prime);
        assert_eq!(panel.buttons[0].label, "Yes");
        assert_eq!(panel.buttons[1].label, "No");
        assert!(!panel.buttons[2].visible);
        panel.set_interactable(true);
        assert!(panel.is_interactable(AnswerButton::First));
        assert!(!panel.is_interactable(AnswerButton::Third));
    }

    #[test]
    fn test_number_fades_in_then_out_and_hides() {
        let mut number = NumberDisplay::default();
        number.show(17, 0.25);
        number.update(0.3);
        assert_eq!(number.alpha(), 1.0);
        number.flash(Tint::Correct, 0.24);
        number.fade_out(0.24, 0.25);
        number.update(0.1);
        assert_eq!(number.tint(), Tint::Correct);
        assert_eq!(number.value(), Some(17));
        number.update(0.2);
        assert_eq!(number.tint(), Tint::Normal);
        number.update(0.3);
        assert_eq!(number.value(), None);
    }

    #[test]
    fn test_pop_in_staggers() {
        let mut panel = QuizPanel::new(0.0, true);
        panel.start_pop(0.08, 0.22);
        panel.update(0.1);
        assert!(panel.buttons[0].scale > panel.buttons[1].scale);
        assert_eq!(panel.buttons[2].scale, 0.0);
        panel.update(1.0);
        assert!(panel.buttons.iter().all(|b| b.scale == 1.0));
    }
}
