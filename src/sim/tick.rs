//! Fixed timestep simulation tick
//!
//! Core level loop that advances the encounter deterministically.

use super::exit::ExitSequence;
use super::player::PlayerState;
use super::projectile::{DestroyReason, Projectile, ProjectileOutcome};
use super::quiz::{AnswerButton, AnswerResult, QuestionPhase};
use super::state::{BriefingStage, ExitReason, GameEvent, GamePhase, GameState};
use crate::audio::SoundCue;
use crate::hooks::InputSource;
use crate::ui::Tint;

/// A pointer press already projected into the world
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerInput {
    pub world_x: f32,
    /// Press landed on a UI element (never a move command)
    pub over_ui: bool,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer press this tick (taps dialogue, moves the player)
    pub pointer: Option<PointerInput>,
    /// Answer button pressed this tick
    pub answer: Option<AnswerButton>,
    /// Idle/demo mode - the level plays itself
    pub idle_mode: bool,
}

impl TickInput {
    /// Read pointer state from the platform
    pub fn poll(source: &mut dyn InputSource) -> Self {
        let pointer = source.pointer_down().map(|screen| PointerInput {
            world_x: source.screen_to_world(screen).x,
            over_ui: source.is_over_ui(screen),
        });
        Self {
            pointer,
            ..Default::default()
        }
    }
}

/// Advance the level by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.elapsed += f64::from(dt);
    state.time = state.elapsed as f32;
    state.time_ticks += 1;
    let now = state.time;

    // Idle/demo mode - autopilot fills in the input
    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let input = &input;

    state.fade.update(dt);
    let pointer = input.pointer.filter(|_| !state.fade.blocks_input());

    // A tap that ends the dialogue must not also move the player
    let phase = state.phase;
    match phase {
        GamePhase::Dialogue => {
            if pointer.is_some() && state.dialogue.tap() {
                state.finish_dialogue();
            }
        }
        GamePhase::Briefing { stage } => advance_briefing(state, stage),
        GamePhase::Playing => {
            if let Some(button) = input.answer
                && !state.fade.blocks_input()
            {
                handle_answer(state, button);
            }
            if let Some(at) = state.next_question_at
                && now >= at
            {
                state.next_question_at = None;
                show_next_question(state);
            }
        }
        GamePhase::Complete | GamePhase::Failed => {}
    }

    if matches!(phase, GamePhase::Briefing { .. } | GamePhase::Playing)
        && let Some(p) = pointer
        && !p.over_ui
        && state.player.command_move(p.world_x, now, &mut state.events)
    {
        state.panel.hint_visible = false;
    }

    state.player.update(dt, now, &mut state.events);

    if let Some(exit) = state.exit.as_mut()
        && exit.update(dt, now, &mut state.player, &mut state.events)
    {
        state.fade.fade_out();
    }

    sync_player_collider(state);
    update_enemies(state);
    update_projectiles(state, dt);
    sync_health(state);
    check_player_death(state);

    sync_enemy_colliders(state);
    let GameState { enemies, world, .. } = &mut *state;
    enemies.retain(|e| {
        let remove = e.should_remove(now);
        if remove {
            log::debug!("Removed enemy {}", e.id);
            if let Some(id) = e.collider {
                world.remove(id);
            }
        }
        !remove
    });

    state.dialogue.update(dt);
    state.panel.update(dt);
}

fn advance_briefing(state: &mut GameState, stage: BriefingStage) {
    let now = state.time;
    let next = match stage {
        BriefingStage::PopIn { until } if now >= until => {
            state
                .panel
                .prompt
                .start(&state.tuning.presentation.question_prompt);
            BriefingStage::Prompt
        }
        BriefingStage::Prompt if !state.panel.prompt.is_typing() => BriefingStage::Waiting {
            until: now + state.tuning.presentation.first_question_delay,
        },
        BriefingStage::Waiting { until } if now >= until => {
            log::info!("Quiz started");
            state.phase = GamePhase::Playing;
            show_next_question(state);
            return;
        }
        _ => return,
    };
    state.phase = GamePhase::Briefing { stage: next };
}

fn show_next_question(state: &mut GameState) {
    let Some(question) = state.quiz.next_question() else {
        return;
    };
    state
        .panel
        .number
        .show(question.number, state.tuning.quiz.number_fade_time);
    state.panel.set_interactable(true);
    state.events.push(GameEvent::QuestionShown {
        number: question.number,
        phase: question.phase,
    });
}

fn handle_answer(state: &mut GameState, button: AnswerButton) {
    if !state.panel.is_interactable(button) {
        return;
    }
    let now = state.time;
    let from = state.quiz.phase();
    let flash = state.tuning.quiz.flash_time;
    let fade = state.tuning.quiz.number_fade_time;

    match state.quiz.answer(button) {
        AnswerResult::Ignored => {}
        AnswerResult::Wrong { number } => {
            state.events.push(GameEvent::AnswerJudged {
                number,
                correct: false,
            });
            state.events.push(GameEvent::Sound(SoundCue::Wrong));
            if state.settings.effective_camera_shake() {
                state.events.push(GameEvent::CameraShake);
            }
            state.panel.number.flash(Tint::Wrong, flash);

            let step = state.tuning.enemy.aggression_step;
            for enemy in state.enemies.iter_mut().filter(|e| e.is_alive()) {
                enemy.increase_aggression(step);
            }
        }
        AnswerResult::Correct {
            number,
            advanced_to,
        } => {
            state.panel.set_interactable(false);
            state.events.push(GameEvent::AnswerJudged {
                number,
                correct: true,
            });
            state.events.push(GameEvent::Sound(SoundCue::Correct));
            state.events.push(GameEvent::CorrectAnswerRegistered);
            state.panel.number.flash(Tint::Correct, flash);
            state.panel.number.fade_out(0.0, fade);

            if let Some(to) = advanced_to {
                state.events.push(GameEvent::PhaseChanged { from, to });
                state.panel.apply_phase(to);
            }
            match advanced_to {
                Some(QuestionPhase::Done) => end_encounter(state),
                Some(_) => {
                    state
                        .panel
                        .prompt
                        .start(&state.tuning.presentation.prime_prompt);
                    state
                        .player
                        .lock_movement(now + state.tuning.quiz.phase_lockout);
                    state.next_question_at =
                        Some(now + fade + state.tuning.quiz.time_between_questions);
                }
                None => {
                    state.next_question_at =
                        Some(now + fade + state.tuning.quiz.time_between_questions);
                }
            }
        }
    }
}

/// Quiz cleared: clear the field and hand the player to the exit sequence
fn end_encounter(state: &mut GameState) {
    if state.completion_handled {
        return;
    }
    state.completion_handled = true;
    let now = state.time;
    log::info!("Level complete at {:.2}s", now);

    state.phase = GamePhase::Complete;
    state.next_question_at = None;
    state.quiz.disable();
    state.panel.shut_down();
    state.player.halt(&mut state.events);

    for projectile in state.projectiles.drain(..) {
        state.events.push(GameEvent::ProjectileDestroyed {
            id: projectile.id,
            reason: DestroyReason::LevelEnded,
        });
    }
    for enemy in state.enemies.iter_mut() {
        enemy.die(now, &mut state.events);
    }
    state.events.push(GameEvent::Sound(SoundCue::LevelComplete));

    if !state.player.is_dead() {
        state.exit = Some(ExitSequence::start(
            now,
            &state.tuning.presentation,
            state.tuning.layout.portal.x,
            &mut state.player,
            &mut state.events,
        ));
    }
}

fn check_player_death(state: &mut GameState) {
    if !state.player.is_dead() || state.death_handled {
        return;
    }
    state.death_handled = true;
    log::info!("Level failed at {:.2}s", state.time);

    state.phase = GamePhase::Failed;
    state.next_question_at = None;
    state.quiz.disable();
    state.panel.shut_down();
    for enemy in state.enemies.iter_mut() {
        enemy.stop_attacking();
    }
    state.events.push(GameEvent::ExitRequested(ExitReason::Died));
    state.fade.fade_out();
}

fn sync_player_collider(state: &mut GameState) {
    let id = state.player_collider;
    state.world.set_enabled(id, state.player.physics_enabled);
    state.world.set_position(id, state.player.pos);
}

fn sync_enemy_colliders(state: &mut GameState) {
    for enemy in &state.enemies {
        if let Some(id) = enemy.collider {
            state.world.set_enabled(id, enemy.collision_enabled);
        }
    }
}

fn update_enemies(state: &mut GameState) {
    let now = state.time;
    let gate_open = state.player.gate.is_open();
    let player_pos = state.player.pos;

    let mut requests = Vec::new();
    for enemy in state.enemies.iter_mut() {
        if let Some(request) = enemy.step(now, gate_open, player_pos, &mut state.events) {
            requests.push(request);
        }
    }

    for request in requests {
        let id = state.next_entity_id();
        log::debug!("Enemy {} fired projectile {}", request.enemy, id);
        state.projectiles.push(Projectile::spawn(id, &request, now));
        state.events.push(GameEvent::ProjectileSpawned {
            id,
            enemy: request.enemy,
        });
    }
}

fn update_projectiles(state: &mut GameState, dt: f32) {
    let now = state.time;
    let GameState {
        projectiles,
        world,
        player,
        events,
        ..
    } = state;

    projectiles.retain_mut(|p| match p.step(dt, now, &*world, player, events) {
        ProjectileOutcome::Flying => true,
        ProjectileOutcome::Destroyed(reason) => {
            events.push(GameEvent::ProjectileDestroyed { id: p.id, reason });
            false
        }
    });
}

/// Drain one heart step per hit the bar has not shown yet
fn sync_health(state: &mut GameState) {
    while state.hits_shown < state.player.hits_taken {
        state.health.apply_hit();
        state.hits_shown += 1;
    }
}

/// Demo driver: taps through dialogue, paces the floor, answers after a pause
fn autopilot(state: &mut GameState, input: &mut TickInput) {
    let now = state.time;
    let pilot = &mut state.autopilot;

    match state.phase {
        GamePhase::Dialogue => {
            if !state.fade.blocks_input() && now >= pilot.next_tap_at {
                input.pointer = Some(PointerInput {
                    world_x: 0.0,
                    over_ui: true,
                });
                pilot.next_tap_at = now + 0.5;
            }
        }
        GamePhase::Briefing { .. } | GamePhase::Playing => {
            if state.player.state == PlayerState::Idle && state.player.can_move(now) {
                let (min_x, max_x) = state.player.bounds();
                let x = if pilot.pace_right {
                    max_x - 1.0
                } else {
                    min_x + 1.0
                };
                pilot.pace_right = !pilot.pace_right;
                input.pointer = Some(PointerInput {
                    world_x: x,
                    over_ui: false,
                });
            }

            if state.phase == GamePhase::Playing && state.quiz.is_accepting() {
                match pilot.answer_at {
                    None => pilot.answer_at = Some(now + pilot.think_time),
                    Some(at) if now >= at => {
                        pilot.answer_at = None;
                        input.answer = if pilot.mistakes_left > 0 {
                            pilot.mistakes_left -= 1;
                            state.quiz.wrong_button()
                        } else {
                            state.quiz.correct_button()
                        };
                    }
                    Some(_) => {}
                }
            }
        }
        GamePhase::Complete | GamePhase::Failed => {}
    }
}
