//! Collaborator seams
//!
//! The simulation never calls out directly. It queues [`GameEvent`]s and the
//! driver hands them to [`Hooks::dispatch`], which forwards each one to
//! whichever collaborator is installed. A missing collaborator is skipped.

use glam::Vec2;

use crate::audio::SoundCue;
use crate::sim::state::{Actor, AnimTrigger, ExitReason, GameEvent};

/// Plays named animation triggers on scene actors
pub trait AnimationPlayer {
    fn trigger(&mut self, actor: Actor, anim: AnimTrigger);
}

/// Plays one-shot sound cues
pub trait AudioPlayer {
    fn play(&mut self, cue: SoundCue);
}

/// Visual progress for correct answers
pub trait ProgressTracker {
    fn register_correct(&mut self);

    /// Advance any running fill animation
    fn update(&mut self, _dt: f32) {}
}

/// Scene transition out of the level
pub trait ExitHook {
    fn request_exit(&mut self, reason: ExitReason);
}

/// Pointer input from the platform layer
pub trait InputSource {
    /// Screen position of a pointer press this frame
    fn pointer_down(&mut self) -> Option<Vec2>;
    fn screen_to_world(&self, screen: Vec2) -> Vec2;
    /// True if the screen position is over an interactive UI element
    fn is_over_ui(&self, screen: Vec2) -> bool;
}

/// The set of installed collaborators
#[derive(Default)]
pub struct Hooks {
    pub animation: Option<Box<dyn AnimationPlayer>>,
    pub audio: Option<Box<dyn AudioPlayer>>,
    pub progress: Option<Box<dyn ProgressTracker>>,
    pub exit: Option<Box<dyn ExitHook>>,
}

impl Hooks {
    /// Forward events in order
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::Animation { actor, trigger } => {
                    if let Some(animation) = self.animation.as_mut() {
                        animation.trigger(actor, trigger);
                    }
                }
                GameEvent::Sound(cue) => {
                    if let Some(audio) = self.audio.as_mut() {
                        audio.play(cue);
                    }
                }
                GameEvent::CorrectAnswerRegistered => {
                    if let Some(progress) = self.progress.as_mut() {
                        progress.register_correct();
                    }
                }
                GameEvent::ExitRequested(reason) => {
                    if let Some(exit) = self.exit.as_mut() {
                        exit.request_exit(reason);
                    }
                }
                _ => {}
            }
        }
    }

    /// Advance collaborator-side animation
    pub fn update(&mut self, dt: f32) {
        if let Some(progress) = self.progress.as_mut() {
            progress.update(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type Log = Rc<RefCell<Vec<String>>>;

    struct Recorder(Log);

    impl AnimationPlayer for Recorder {
        fn trigger(&mut self, actor: Actor, anim: AnimTrigger) {
            self.0.borrow_mut().push(format!("anim {:?} {:?}", actor, anim));
        }
    }

    impl AudioPlayer for Recorder {
        fn play(&mut self, cue: SoundCue) {
            self.0.borrow_mut().push(format!("sound {:?}", cue));
        }
    }

    impl ProgressTracker for Recorder {
        fn register_correct(&mut self) {
            self.0.borrow_mut().push("progress".into());
        }
    }

    impl ExitHook for Recorder {
        fn request_exit(&mut self, reason: ExitReason) {
            self.0.borrow_mut().push(format!("exit {:?}", reason));
        }
    }

    fn events() -> Vec<GameEvent> {
        vec![
            GameEvent::Animation {
                actor: Actor::Player,
                trigger: AnimTrigger::Run,
            },
            GameEvent::Sound(SoundCue::Correct),
            GameEvent::CorrectAnswerRegistered,
            GameEvent::HintHidden,
            GameEvent::ExitRequested(ExitReason::Completed),
        ]
    }

    #[test]
    fn test_dispatch_routes_in_order() {
        let log: Log = Rc::default();
        let mut hooks = Hooks {
            animation: Some(Box::new(Recorder(log.clone()))),
            audio: Some(Box::new(Recorder(log.clone()))),
            progress: Some(Box::new(Recorder(log.clone()))),
            exit: Some(Box::new(Recorder(log.clone()))),
        };
        hooks.dispatch(&events());
        assert_eq!(
            *log.borrow(),
            vec![
                "anim Player Run",
                "sound Correct",
                "progress",
                "exit Completed"
            ]
        );
    }

    #[test]
    fn test_missing_collaborators_are_skipped() {
        let log: Log = Rc::default();
        let mut hooks = Hooks {
            audio: Some(Box::new(Recorder(log.clone()))),
            ..Default::default()
        };
        hooks.dispatch(&events());
        hooks.update(0.1);
        assert_eq!(*log.borrow(), vec!["sound Correct"]);
    }

    #[test]
    fn test_wrong_answer_leaves_progress_alone() {
        let log: Log = Rc::default();
        let mut hooks = Hooks {
            progress: Some(Box::new(Recorder(log.clone()))),
            ..Default::default()
        };
        hooks.dispatch(&[GameEvent::AnswerJudged {
            number: 4,
            correct: false,
        }]);
        assert!(log.borrow().is_empty());
    }
}
