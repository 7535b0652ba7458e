//! Player encounter state machine
//!
//! Movement is horizontal only. Hits stun the player, cancel the current
//! walk and make them invulnerable for the stun plus a short grace window.
//! When the stun ends the player picks the interrupted walk back up.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Actor, AnimTrigger, GameEvent};
use crate::audio::SoundCue;
use crate::move_toward;
use crate::tuning::{LayoutTuning, PlayerTuning};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerState {
    Idle,
    Moving { target_x: f32 },
    /// Stunned until the given sim time
    Stunned { until: f32 },
    /// Terminal
    Dead,
}

/// Result of [`Player::apply_hit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Dead or invulnerable, nothing changed
    Ignored,
    Stunned,
    Killed,
}

/// Opens on the player's first accepted move; enemies stay inert until then
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveGate(bool);

impl MoveGate {
    pub fn is_open(self) -> bool {
        self.0
    }

    /// Returns true if this call opened the gate
    fn open(&mut self) -> bool {
        !std::mem::replace(&mut self.0, true)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub state: PlayerState,
    pub facing_right: bool,
    pub hits_taken: u32,
    pub total_allowed_hits: u32,
    pub gate: MoveGate,
    /// Target of the walk a stun interrupted
    pub last_target: Option<f32>,
    /// Cleared while dialogue runs, on death and when the level ends
    pub movement_enabled: bool,
    /// Movement is held until this sim time
    pub locked_until: f32,
    /// Collider follows the player while set
    pub physics_enabled: bool,
    invulnerable: bool,
    invulnerable_until: f32,
    last_anim: Option<AnimTrigger>,
    speed: f32,
    stop_distance: f32,
    stun_duration: f32,
    grace: f32,
    min_x: f32,
    max_x: f32,
}

impl Player {
    pub fn new(tuning: &PlayerTuning, layout: &LayoutTuning) -> Self {
        Self {
            pos: layout.player_start,
            state: PlayerState::Idle,
            facing_right: true,
            hits_taken: 0,
            total_allowed_hits: tuning.total_allowed_hits,
            gate: MoveGate::default(),
            last_target: None,
            movement_enabled: false,
            locked_until: 0.0,
            physics_enabled: true,
            invulnerable: false,
            invulnerable_until: 0.0,
            last_anim: None,
            speed: tuning.speed,
            stop_distance: tuning.stop_distance,
            stun_duration: tuning.stun_duration,
            grace: tuning.invulnerability_grace,
            min_x: layout.min_x,
            max_x: layout.max_x,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.state == PlayerState::Dead
    }

    pub fn is_stunned(&self) -> bool {
        matches!(self.state, PlayerState::Stunned { .. })
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.min_x, self.max_x)
    }

    /// True if a move command issued at `now` would be accepted
    pub fn can_move(&self, now: f32) -> bool {
        self.movement_enabled && !self.is_dead() && !self.is_stunned() && now >= self.locked_until
    }

    fn animate(&mut self, anim: AnimTrigger, events: &mut Vec<GameEvent>) {
        if self.last_anim == Some(anim) {
            return;
        }
        self.last_anim = Some(anim);
        events.push(GameEvent::Animation {
            actor: Actor::Player,
            trigger: anim,
        });
    }

    fn face(&mut self, target_x: f32) {
        if target_x > self.pos.x {
            self.facing_right = true;
        } else if target_x < self.pos.x {
            self.facing_right = false;
        }
    }

    /// Walk toward a world X. Returns false if movement is not allowed right now.
    pub fn command_move(&mut self, world_x: f32, now: f32, events: &mut Vec<GameEvent>) -> bool {
        if !self.can_move(now) {
            return false;
        }
        let target_x = world_x.clamp(self.min_x, self.max_x);
        self.face(target_x);
        self.state = PlayerState::Moving { target_x };
        self.last_target = Some(target_x);
        self.animate(AnimTrigger::Run, events);

        if self.gate.open() {
            log::info!("Player moved, enemies engaged");
            events.push(GameEvent::HintHidden);
        }
        true
    }

    /// Step toward `target_x` at `speed`, ignoring movement flags. Returns true on arrival.
    pub fn walk_to(
        &mut self,
        target_x: f32,
        speed: f32,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        self.face(target_x);
        self.animate(AnimTrigger::Run, events);
        self.pos.x = move_toward(self.pos.x, target_x, speed * dt);
        (self.pos.x - target_x).abs() <= self.stop_distance
    }

    pub fn update(&mut self, dt: f32, now: f32, events: &mut Vec<GameEvent>) {
        if let PlayerState::Stunned { until } = self.state
            && now >= until
        {
            self.end_stun(events);
        }
        if self.invulnerable && now >= self.invulnerable_until {
            self.invulnerable = false;
            log::debug!("Invulnerability ended");
        }

        let PlayerState::Moving { target_x } = self.state else {
            return;
        };
        if !self.movement_enabled || now < self.locked_until {
            return;
        }
        self.pos.x = move_toward(self.pos.x, target_x, self.speed * dt);
        if (self.pos.x - target_x).abs() <= self.stop_distance {
            self.pos.x = target_x;
            self.state = PlayerState::Idle;
            self.last_target = None;
            self.animate(AnimTrigger::Idle, events);
        }
    }

    fn end_stun(&mut self, events: &mut Vec<GameEvent>) {
        match self.last_target {
            Some(target_x) if (self.pos.x - target_x).abs() > self.stop_distance => {
                log::debug!("Stun over, resuming walk to {:.2}", target_x);
                self.state = PlayerState::Moving { target_x };
                self.animate(AnimTrigger::Run, events);
            }
            _ => {
                log::debug!("Stun over");
                self.state = PlayerState::Idle;
                self.last_target = None;
                self.animate(AnimTrigger::Idle, events);
            }
        }
    }

    /// Take a projectile hit
    pub fn apply_hit(&mut self, now: f32, events: &mut Vec<GameEvent>) -> HitOutcome {
        if self.is_dead() || self.invulnerable {
            return HitOutcome::Ignored;
        }

        self.hits_taken = (self.hits_taken + 1).min(self.total_allowed_hits);
        events.push(GameEvent::PlayerHit {
            hits_taken: self.hits_taken,
            remaining: self.total_allowed_hits - self.hits_taken,
        });

        if self.hits_taken >= self.total_allowed_hits {
            log::info!("Player died after {} hits", self.hits_taken);
            self.state = PlayerState::Dead;
            self.movement_enabled = false;
            self.invulnerable = false;
            self.animate(AnimTrigger::Death, events);
            events.push(GameEvent::Sound(SoundCue::Death));
            return HitOutcome::Killed;
        }

        log::info!(
            "Player hit ({}/{})",
            self.hits_taken,
            self.total_allowed_hits
        );
        events.push(GameEvent::Sound(SoundCue::Hit));
        if let PlayerState::Moving { target_x } = self.state {
            self.last_target = Some(target_x);
        }
        let until = now + self.stun_duration;
        self.state = PlayerState::Stunned { until };
        self.invulnerable = true;
        self.invulnerable_until = until + self.grace;
        self.animate(AnimTrigger::Stun, events);
        HitOutcome::Stunned
    }

    /// Hold movement until `until`
    pub fn lock_movement(&mut self, until: f32) {
        self.locked_until = self.locked_until.max(until);
    }

    /// Stop walking and refuse further commands. Cuts a running stun short.
    pub fn halt(&mut self, events: &mut Vec<GameEvent>) {
        self.movement_enabled = false;
        self.last_target = None;
        if let PlayerState::Moving { .. } | PlayerState::Stunned { .. } = self.state {
            self.state = PlayerState::Idle;
            self.animate(AnimTrigger::Idle, events);
        }
    }

    /// Play a one-off animation outside the movement cycle
    pub fn play(&mut self, anim: AnimTrigger, events: &mut Vec<GameEvent>) {
        self.animate(anim, events);
    }
}
