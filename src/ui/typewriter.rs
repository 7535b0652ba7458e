//! Typed text and the wizard dialogue
//!
//! A [`Typewriter`] reveals one character per `char_delay` seconds. The
//! [`Dialogue`] strings lines together: a tap while typing completes the
//! line, a tap afterwards moves to the next line or ends the dialogue.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Typewriter {
    text: String,
    shown: usize,
    total: usize,
    elapsed: f32,
    char_delay: f32,
}

impl Typewriter {
    pub fn new(char_delay: f32) -> Self {
        Self {
            char_delay,
            ..Default::default()
        }
    }

    /// Start typing `text` from empty
    pub fn start(&mut self, text: &str) {
        self.text = text.to_string();
        self.total = text.chars().count();
        self.shown = 0;
        self.elapsed = 0.0;
        if self.char_delay <= 0.0 {
            self.shown = self.total;
        }
    }

    pub fn set_char_delay(&mut self, char_delay: f32) {
        self.char_delay = char_delay;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.is_typing() {
            return;
        }
        self.elapsed += dt;
        while self.shown < self.total && self.elapsed >= self.char_delay {
            self.elapsed -= self.char_delay;
            self.shown += 1;
        }
    }

    /// Reveal the rest of the text at once
    pub fn finish(&mut self) {
        self.shown = self.total;
    }

    pub fn is_typing(&self) -> bool {
        self.shown < self.total
    }

    /// Currently revealed prefix
    pub fn visible(&self) -> &str {
        match self.text.char_indices().nth(self.shown) {
            Some((byte, _)) => &self.text[..byte],
            None => &self.text,
        }
    }
}

/// Wizard dialogue panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dialogue {
    lines: Vec<String>,
    index: usize,
    writer: Typewriter,
    blink_interval: f32,
    blink_elapsed: f32,
    active: bool,
    finished: bool,
}

impl Dialogue {
    pub fn new(lines: Vec<String>, char_delay: f32, blink_interval: f32) -> Self {
        Self {
            lines,
            index: 0,
            writer: Typewriter::new(char_delay),
            blink_interval,
            blink_elapsed: 0.0,
            active: false,
            finished: false,
        }
    }

    /// Open the panel on the first line. Returns true if there was nothing to show.
    pub fn start(&mut self) -> bool {
        self.index = 0;
        self.finished = false;
        let Some(first) = self.lines.first() else {
            self.end();
            return true;
        };
        self.active = true;
        self.writer.start(first);
        self.blink_elapsed = 0.0;
        false
    }

    /// Handle a tap. Returns true when the tap ended the dialogue.
    pub fn tap(&mut self) -> bool {
        if !self.active {
            return false;
        }
        if self.writer.is_typing() {
            self.writer.finish();
            self.blink_elapsed = 0.0;
            return false;
        }
        if self.index + 1 < self.lines.len() {
            self.index += 1;
            self.writer.start(&self.lines[self.index]);
            self.blink_elapsed = 0.0;
            false
        } else {
            self.end();
            true
        }
    }

    fn end(&mut self) {
        self.active = false;
        self.finished = true;
        log::info!("Dialogue finished");
    }

    pub fn update(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.writer.update(dt);
        if !self.writer.is_typing() {
            self.blink_elapsed += dt;
        }
    }

    pub fn set_char_delay(&mut self, char_delay: f32) {
        self.writer.set_char_delay(char_delay);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_typing(&self) -> bool {
        self.active && self.writer.is_typing()
    }

    pub fn visible_text(&self) -> &str {
        self.writer.visible()
    }

    pub fn line_index(&self) -> usize {
        self.index
    }

    /// "Tap to continue" opacity, `None` while hidden
    pub fn tap_prompt_alpha(&self) -> Option<f32> {
        if !self.active || self.writer.is_typing() {
            return None;
        }
        if self.blink_interval <= 0.0 {
            return Some(1.0);
        }
        let phase = (self.blink_elapsed / self.blink_interval) as u32;
        Some(if phase % 2 == 0 { 1.0 } else { 0.15 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typewriter_reveals_per_char() {
        let mut tw = Typewriter::new(0.1);
        tw.start("héllo");
        assert_eq!(tw.visible(), "");
        tw.update(0.25);
        assert_eq!(tw.visible(), "hé");
        tw.update(1.0);
        assert_eq!(tw.visible(), "héllo");
        assert!(!tw.is_typing());
    }

    #[test]
    fn test_zero_delay_is_instant() {
        let mut tw = Typewriter::new(0.0);
        tw.start("abc");
        assert_eq!(tw.visible(), "abc");
    }

    #[test]
    fn test_tap_completes_then_advances_then_ends() {
        let mut dialogue = Dialogue::new(vec!["one".into(), "two".into()], 0.05, 0.6);
        assert!(!dialogue.start());
        assert!(dialogue.is_typing());
        assert_eq!(dialogue.tap_prompt_alpha(), None);

        // First tap completes line one
        assert!(!dialogue.tap());
        assert_eq!(dialogue.visible_text(), "one");
        assert_eq!(dialogue.tap_prompt_alpha(), Some(1.0));

        // Second tap moves to line two
        assert!(!dialogue.tap());
        assert_eq!(dialogue.line_index(), 1);
        dialogue.update(1.0);
        assert_eq!(dialogue.visible_text(), "two");

        // Final tap ends
        assert!(dialogue.tap());
        assert!(dialogue.is_finished());
        assert!(!dialogue.is_active());
    }

    #[test]
    fn test_empty_dialogue_ends_immediately() {
        let mut dialogue = Dialogue::new(Vec::new(), 0.05, 0.6);
        assert!(dialogue.start());
        assert!(dialogue.is_finished());
        assert!(!dialogue.tap());
    }

    #[test]
    fn test_tap_prompt_blinks() {
        let mut dialogue = Dialogue::new(vec!["x".into()], 0.0, 0.5);
        dialogue.start();
        assert_eq!(dialogue.tap_prompt_alpha(), Some(1.0));
        dialogue.update(0.6);
        assert_eq!(dialogue.tap_prompt_alpha(), Some(0.15));
        dialogue.update(0.5);
        assert_eq!(dialogue.tap_prompt_alpha(), Some(1.0));
    }
}
