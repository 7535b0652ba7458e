//! Game state and core simulation types
//!
//! Everything the level needs between ticks lives in [`GameState`]. Timed
//! sequences store deadlines on `GameState::time` instead of running as
//! coroutines, so a tick is a plain function of state, input and `dt`.

use serde::{Deserialize, Serialize};

use super::collision::{CollisionGroups, CollisionWorld};
use super::enemy::Enemy;
use super::exit::ExitSequence;
use super::player::Player;
use super::projectile::{DestroyReason, Projectile};
use super::quiz::{QuestionPhase, Quiz};
use crate::audio::SoundCue;
use crate::settings::Settings;
use crate::tuning::{ConfigError, LevelTuning};
use crate::ui::{Dialogue, HealthBar, QuizPanel, ScreenFade};

/// Something an animation trigger can be sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    Player,
    Enemy(u32),
    Door,
}

/// Named animation triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimTrigger {
    Run,
    Idle,
    Stun,
    Death,
    Buff,
    Attack,
    DoorOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    Died,
    Completed,
}

/// Side effects published by the simulation, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Animation { actor: Actor, trigger: AnimTrigger },
    Sound(SoundCue),
    /// Feed the progress tracker
    CorrectAnswerRegistered,
    QuestionShown { number: u32, phase: QuestionPhase },
    AnswerJudged { number: u32, correct: bool },
    PhaseChanged { from: QuestionPhase, to: QuestionPhase },
    PlayerHit { hits_taken: u32, remaining: u32 },
    CameraShake,
    ProjectileSpawned { id: u32, enemy: u32 },
    ProjectileDestroyed { id: u32, reason: DestroyReason },
    /// The "tap to move" hint goes away after the first move
    HintHidden,
    DialogueFinished,
    ExitRequested(ExitReason),
}

/// Steps between the dialogue and the first question
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BriefingStage {
    /// Buttons scaling in
    PopIn { until: f32 },
    /// Question banner typing
    Prompt,
    /// Short pause before the first number
    Waiting { until: f32 },
}

/// Current phase of the level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Wizard dialogue, tap to advance
    Dialogue,
    /// Gameplay intro
    Briefing { stage: BriefingStage },
    /// Active gameplay
    Playing,
    /// Quiz cleared; exit sequence runs
    Complete,
    /// Player died
    Failed,
}

/// Demo/soak-test driver state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Autopilot {
    /// Wrong answers still to give before answering correctly
    pub mistakes_left: u32,
    /// Delay between a question becoming answerable and the answer
    pub think_time: f32,
    pub answer_at: Option<f32>,
    pub next_tap_at: f32,
    pub pace_right: bool,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            mistakes_left: 0,
            think_time: 0.6,
            answer_at: None,
            next_tap_at: 0.0,
            pace_right: true,
        }
    }
}

/// Complete level state
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation clock (seconds), rounded from `elapsed` every tick
    pub time: f32,
    /// Accumulated clock (seconds); `time` is derived from it
    pub elapsed: f64,
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub tuning: LevelTuning,
    pub settings: Settings,
    pub player: Player,
    pub player_collider: u32,
    /// Sorted by id
    pub enemies: Vec<Enemy>,
    /// Sorted by id
    pub projectiles: Vec<Projectile>,
    pub world: CollisionWorld,
    pub quiz: Quiz,
    pub dialogue: Dialogue,
    pub panel: QuizPanel,
    pub health: HealthBar,
    pub fade: ScreenFade,
    /// Hits already drained from the health bar
    pub hits_shown: u32,
    pub next_question_at: Option<f32>,
    pub exit: Option<ExitSequence>,
    pub completion_handled: bool,
    pub death_handled: bool,
    pub autopilot: Autopilot,
    /// Events queued since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Build the level from a tuning and seed
    pub fn new(tuning: LevelTuning, seed: u64) -> Result<Self, ConfigError> {
        tuning.validate()?;

        let mut world = CollisionWorld::new();
        for rect in &tuning.layout.ground {
            world.add_aabb(rect.min, rect.max, CollisionGroups::GROUND);
        }
        let player = Player::new(&tuning.player, &tuning.layout);
        let player_collider =
            world.add_circle(player.pos, tuning.player.collider_radius, CollisionGroups::PLAYER);

        let ui = &tuning.presentation;
        let dialogue = Dialogue::new(ui.dialogue.clone(), ui.typing_speed, ui.tap_blink_interval);
        let panel = QuizPanel::new(ui.typing_speed, tuning.quiz.legacy_prime_button);
        let health = HealthBar::new(ui.heart_count, ui.heart_step);
        let fade = ScreenFade::new(ui.fade_duration);
        let quiz = Quiz::new(&tuning.quiz, seed);

        let mut state = Self {
            seed,
            time: 0.0,
            elapsed: 0.0,
            time_ticks: 0,
            phase: GamePhase::Dialogue,
            settings: Settings::default(),
            player,
            player_collider,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            world,
            quiz,
            dialogue,
            panel,
            health,
            fade,
            hits_shown: 0,
            next_question_at: None,
            exit: None,
            completion_handled: false,
            death_handled: false,
            autopilot: Autopilot::default(),
            events: Vec::new(),
            next_id: 1,
            tuning,
        };

        for spawn in state.tuning.layout.enemies.clone() {
            let id = state.next_entity_id();
            let mut enemy =
                Enemy::new(id, &spawn, &state.tuning.enemy, &state.tuning.projectile, 0.0);
            enemy.collider = Some(state.world.add_circle(
                spawn.fire_point,
                state.tuning.enemy.body_radius,
                CollisionGroups::ENEMY,
            ));
            state.enemies.push(enemy);
        }

        state.fade.fade_in();
        if state.dialogue.start() {
            state.finish_dialogue();
        }
        log::info!(
            "Level ready (seed={}, enemies={})",
            seed,
            state.enemies.len()
        );
        Ok(state)
    }

    /// Apply player preferences
    pub fn apply_settings(&mut self, settings: &Settings) {
        let delay = settings.effective_typing_speed(self.tuning.presentation.typing_speed);
        self.dialogue.set_char_delay(delay);
        self.panel.prompt.set_char_delay(delay);
        self.panel.hint_visible = settings.show_hint && !self.player.gate.is_open();
        self.settings = settings.clone();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Take every event queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Leave the dialogue and start the gameplay intro
    pub(crate) fn finish_dialogue(&mut self) {
        self.events.push(GameEvent::DialogueFinished);
        let ui = &self.tuning.presentation;
        let buttons = self.panel.buttons.len() as f32;
        let until = self.time + ui.button_pop_stagger * (buttons - 1.0) + ui.button_pop_time;
        self.panel.start_pop(ui.button_pop_stagger, ui.button_pop_time);
        self.player.movement_enabled = true;
        self.phase = GamePhase::Briefing {
            stage: BriefingStage::PopIn { until },
        };
        log::info!("Briefing started");
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::Complete | GamePhase::Failed)
            && self.exit.as_ref().is_none_or(|e| e.is_finished())
    }
}
