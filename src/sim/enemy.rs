//! Enemy attack loop
//!
//! Each enemy runs its own timer: wait for the player to act, cool down,
//! play the attack animation, then release a projectile aimed at wherever
//! the player is at release time. Stop and death are checked at the top of
//! every step.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Actor, AnimTrigger, GameEvent};
use crate::tuning::{EnemySpawn, EnemyTuning, ProjectileTuning};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttackPhase {
    /// Inert until the player's move gate opens
    AwaitingPlayer,
    /// Waiting for `next_attack_at`
    Cooldown,
    /// Attack animation playing; projectile leaves at `spawn_at`
    Telegraph { spawn_at: f32 },
    /// Stopped or dead, never attacks again
    Halted,
}

/// Flight parameters for projectiles this enemy fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileTemplate {
    pub speed: f32,
    pub hit_radius: f32,
    pub max_lifetime: f32,
    pub arrive_distance: f32,
}

impl From<&ProjectileTuning> for ProjectileTemplate {
    fn from(t: &ProjectileTuning) -> Self {
        Self {
            speed: t.speed,
            hit_radius: t.hit_radius,
            max_lifetime: t.max_lifetime,
            arrive_distance: t.arrive_distance,
        }
    }
}

/// A projectile the level should create this step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub enemy: u32,
    pub origin: Vec2,
    pub target: Vec2,
    pub template: ProjectileTemplate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub fire_point: Vec2,
    pub phase: AttackPhase,
    pub attack_interval: f32,
    pub attack_interval_min: f32,
    pub telegraph_delay: f32,
    pub next_attack_at: f32,
    pub is_dead: bool,
    pub is_stopped: bool,
    pub template: Option<ProjectileTemplate>,
    pub collision_enabled: bool,
    /// Body collider in the level's collision world
    pub collider: Option<u32>,
    pub remove_at: Option<f32>,
    death_remove_delay: f32,
}

impl Enemy {
    pub fn new(
        id: u32,
        spawn: &EnemySpawn,
        tuning: &EnemyTuning,
        projectile: &ProjectileTuning,
        now: f32,
    ) -> Self {
        Self {
            id,
            fire_point: spawn.fire_point,
            phase: AttackPhase::AwaitingPlayer,
            attack_interval: tuning.attack_interval,
            attack_interval_min: tuning.attack_interval_min,
            telegraph_delay: tuning.telegraph_delay,
            next_attack_at: now + tuning.first_attack_delay,
            is_dead: false,
            is_stopped: false,
            template: Some(ProjectileTemplate::from(projectile)),
            collision_enabled: true,
            collider: None,
            remove_at: None,
            death_remove_delay: tuning.death_remove_delay,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead
    }

    /// Advance the attack loop one step
    pub fn step(
        &mut self,
        now: f32,
        gate_open: bool,
        player_pos: Vec2,
        events: &mut Vec<GameEvent>,
    ) -> Option<SpawnRequest> {
        if self.is_dead || self.is_stopped {
            self.phase = AttackPhase::Halted;
            return None;
        }

        if self.phase == AttackPhase::AwaitingPlayer {
            if !gate_open {
                return None;
            }
            log::debug!("Enemy {} engaging", self.id);
            self.phase = AttackPhase::Cooldown;
        }

        if self.phase == AttackPhase::Cooldown {
            if now < self.next_attack_at {
                return None;
            }
            events.push(GameEvent::Animation {
                actor: Actor::Enemy(self.id),
                trigger: AnimTrigger::Attack,
            });
            self.phase = AttackPhase::Telegraph {
                spawn_at: now + self.telegraph_delay,
            };
        }

        let AttackPhase::Telegraph { spawn_at } = self.phase else {
            return None;
        };
        if now < spawn_at {
            return None;
        }

        self.phase = AttackPhase::Cooldown;
        self.next_attack_at = now + self.attack_interval.max(self.attack_interval_min);
        self.template.map(|template| SpawnRequest {
            enemy: self.id,
            origin: self.fire_point,
            target: player_pos,
            template,
        })
    }

    /// Shorten the attack interval, floored at the minimum
    pub fn increase_aggression(&mut self, step: f32) {
        self.attack_interval = (self.attack_interval - step).max(self.attack_interval_min);
    }

    /// Stop attacking for good. Idempotent.
    pub fn stop_attacking(&mut self) {
        if self.is_stopped {
            return;
        }
        log::debug!("Enemy {} stopped attacking", self.id);
        self.is_stopped = true;
        self.template = None;
        self.next_attack_at = f32::INFINITY;
        self.phase = AttackPhase::Halted;
    }

    /// Kill the enemy and schedule its removal. Idempotent.
    pub fn die(&mut self, now: f32, events: &mut Vec<GameEvent>) {
        if self.is_dead {
            return;
        }
        self.stop_attacking();
        self.is_dead = true;
        self.collision_enabled = false;
        self.remove_at = Some(now + self.death_remove_delay);
        events.push(GameEvent::Animation {
            actor: Actor::Enemy(self.id),
            trigger: AnimTrigger::Death,
        });
        log::info!("Enemy {} died", self.id);
    }

    pub fn should_remove(&self, now: f32) -> bool {
        self.remove_at.is_some_and(|at| now >= at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn enemy() -> Enemy {
        let spawn = EnemySpawn {
            fire_point: Vec2::new(5.0, 2.0),
        };
        Enemy::new(
            1,
            &spawn,
            &EnemyTuning::default(),
            &ProjectileTuning::default(),
            0.0,
        )
    }

    /// Step from `from` to `to` in 10 ms increments, collecting spawns
    fn run(
        e: &mut Enemy,
        from: f32,
        to: f32,
        gate: bool,
        events: &mut Vec<GameEvent>,
    ) -> Vec<SpawnRequest> {
        let mut spawns = Vec::new();
        let mut t = from;
        while t < to {
            if let Some(s) = e.step(t, gate, Vec2::new(t, 0.0), events) {
                spawns.push(s);
            }
            t += 0.01;
        }
        spawns
    }

    #[test]
    fn test_inert_until_gate_opens() {
        let mut e = enemy();
        let mut events = Vec::new();
        assert!(run(&mut e, 0.0, 20.0, false, &mut events).is_empty());
        assert!(events.is_empty());
        assert_eq!(e.phase, AttackPhase::AwaitingPlayer);
    }

    #[test]
    fn test_attack_cadence() {
        let mut e = enemy();
        let mut events = Vec::new();
        // first_attack_delay 1.0, telegraph 0.35, interval 3.0
        let spawns = run(&mut e, 0.0, 1.3, true, &mut events);
        assert!(spawns.is_empty());
        assert_eq!(events.len(), 1);

        let spawns = run(&mut e, 1.3, 4.0, true, &mut events);
        assert_eq!(spawns.len(), 1);
        let s = spawns[0];
        assert_eq!(s.origin, Vec2::new(5.0, 2.0));
        // Aimed at the player position at release, not at telegraph start
        assert!(s.target.x >= 1.35 - 0.02);
        assert!(e.next_attack_at > 4.0);

        let spawns = run(&mut e, 4.0, 10.0, true, &mut events);
        assert_eq!(spawns.len(), 2);
    }

    #[test]
    fn test_stop_takes_effect_next_step_from_any_phase() {
        let checkpoints = [0.0, 0.5, 1.1, 1.2, 2.0];
        for stop_at in checkpoints {
            let mut e = enemy();
            let mut events = Vec::new();
            run(&mut e, 0.0, stop_at, true, &mut events);
            e.stop_attacking();
            e.stop_attacking();
            assert!(run(&mut e, stop_at, 30.0, true, &mut events).is_empty());
            assert_eq!(e.phase, AttackPhase::Halted);
            assert!(e.template.is_none());
            assert_eq!(e.next_attack_at, f32::INFINITY);
        }
    }

    #[test]
    fn test_death_is_idempotent_and_schedules_removal() {
        let mut e = enemy();
        let mut events = Vec::new();
        run(&mut e, 0.0, 1.2, true, &mut events);
        e.die(1.2, &mut events);
        e.die(1.5, &mut events);
        let deaths = events
            .iter()
            .filter(|ev| {
                matches!(
                    ev,
                    GameEvent::Animation {
                        trigger: AnimTrigger::Death,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(deaths, 1);
        assert!(!e.collision_enabled);
        assert!(run(&mut e, 1.2, 10.0, true, &mut events).is_empty());
        assert!(!e.should_remove(3.0));
        assert!(e.should_remove(3.3));
    }

    proptest! {
        #[test]
        fn prop_aggression_floors_at_min(steps in 0usize..40, step in 0.0f32..2.0) {
            let mut e = enemy();
            for _ in 0..steps {
                let before = e.attack_interval;
                e.increase_aggression(step);
                prop_assert!(e.attack_interval >= e.attack_interval_min);
                prop_assert_eq!(e.attack_interval, (before - step).max(e.attack_interval_min));
            }
        }
    }
}
