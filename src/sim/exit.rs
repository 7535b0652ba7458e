//! Scripted level exit: buff, door, walk to the portal

use serde::{Deserialize, Serialize};

use super::player::Player;
use super::state::{Actor, AnimTrigger, ExitReason, GameEvent};
use crate::tuning::PresentationTuning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExitStage {
    Buff { until: f32 },
    Door { until: f32 },
    Walk,
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitSequence {
    pub stage: ExitStage,
    portal_x: f32,
    walk_speed: f32,
    door_duration: f32,
}

impl ExitSequence {
    pub fn start(
        now: f32,
        tuning: &PresentationTuning,
        portal_x: f32,
        player: &mut Player,
        events: &mut Vec<GameEvent>,
    ) -> Self {
        log::info!("Exit sequence started");
        player.play(AnimTrigger::Buff, events);
        Self {
            stage: ExitStage::Buff {
                until: now + tuning.buff_duration,
            },
            portal_x,
            walk_speed: tuning.portal_walk_speed,
            door_duration: tuning.door_duration,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.stage == ExitStage::Finished
    }

    /// Advance the sequence. Returns true on the step the player reaches the portal.
    pub fn update(
        &mut self,
        dt: f32,
        now: f32,
        player: &mut Player,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        match self.stage {
            ExitStage::Buff { until } if now >= until => {
                events.push(GameEvent::Animation {
                    actor: Actor::Door,
                    trigger: AnimTrigger::DoorOpen,
                });
                self.stage = ExitStage::Door {
                    until: now + self.door_duration,
                };
                false
            }
            ExitStage::Door { until } if now >= until => {
                player.physics_enabled = false;
                self.stage = ExitStage::Walk;
                false
            }
            ExitStage::Walk => {
                if !player.walk_to(self.portal_x, self.walk_speed, dt, events) {
                    return false;
                }
                log::info!("Player reached the portal");
                self.stage = ExitStage::Finished;
                events.push(GameEvent::ExitRequested(ExitReason::Completed));
                true
            }
            _ => false,
        }
    }
}
