//! Enemy projectiles
//!
//! A projectile flies in a straight line toward the point it was aimed at
//! when fired. Each step sweeps its circle from the previous position to the
//! next one so a fast shot cannot skip over the player between frames.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{CastHit, CollisionGroups, PhysicsQuery};
use super::enemy::SpawnRequest;
use super::player::Player;
use super::state::GameEvent;

/// Why a projectile left play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestroyReason {
    HitPlayer,
    HitGround,
    /// Reached its aim point without hitting anything
    Arrived,
    Expired,
    /// Cleared when the level ended
    LevelEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileOutcome {
    Flying,
    Destroyed(DestroyReason),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    /// Enemy that fired it
    pub owner: u32,
    pub pos: Vec2,
    pub prev_pos: Vec2,
    pub target: Vec2,
    pub speed: f32,
    pub hit_radius: f32,
    pub expires_at: f32,
    /// Facing angle in radians
    pub angle: f32,
    arrive_distance: f32,
}

impl Projectile {
    pub fn spawn(id: u32, request: &SpawnRequest, now: f32) -> Self {
        let dir = (request.target - request.origin).normalize_or_zero();
        Self {
            id,
            owner: request.enemy,
            pos: request.origin,
            prev_pos: request.origin,
            target: request.target,
            speed: request.template.speed,
            hit_radius: request.template.hit_radius,
            expires_at: now + request.template.max_lifetime,
            angle: dir.y.atan2(dir.x),
            arrive_distance: request.template.arrive_distance,
        }
    }

    pub fn step(
        &mut self,
        dt: f32,
        now: f32,
        physics: &dyn PhysicsQuery,
        player: &mut Player,
        events: &mut Vec<GameEvent>,
    ) -> ProjectileOutcome {
        if now >= self.expires_at {
            return ProjectileOutcome::Destroyed(DestroyReason::Expired);
        }

        let to_target = self.target - self.pos;
        let remaining = to_target.length();
        if remaining <= self.arrive_distance {
            self.prev_pos = self.pos;
            self.pos = self.target;
            return ProjectileOutcome::Destroyed(DestroyReason::Arrived);
        }

        let dir = to_target / remaining;
        let travel = (self.speed * dt).min(remaining);
        let mask = CollisionGroups::PLAYER | CollisionGroups::GROUND;

        let hits = physics.circle_cast_all(self.pos, self.hit_radius, dir, travel, mask);
        if let Some(reason) = self.resolve(&hits, now, player, events) {
            return ProjectileOutcome::Destroyed(reason);
        }

        self.prev_pos = self.pos;
        self.pos += dir * travel;
        self.angle = dir.y.atan2(dir.x);

        // Catch anything that moved into us this step
        let overlaps = physics.overlap_circle(self.pos, self.hit_radius, mask);
        match self.resolve(&overlaps, now, player, events) {
            Some(reason) => ProjectileOutcome::Destroyed(reason),
            None => ProjectileOutcome::Flying,
        }
    }

    /// Nearest hit decides, the player winning ties. Player hits are delivered
    /// even if the player shrugs them off.
    fn resolve(
        &self,
        hits: &[CastHit],
        now: f32,
        player: &mut Player,
        events: &mut Vec<GameEvent>,
    ) -> Option<DestroyReason> {
        let nearest = hits
            .iter()
            .map(|h| h.distance)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))?;
        let mut closest = hits.iter().filter(|h| h.distance <= nearest);
        let hit = closest
            .clone()
            .find(|h| h.groups.intersects(CollisionGroups::PLAYER))
            .or_else(|| closest.next())?;
        if hit.groups.intersects(CollisionGroups::PLAYER) {
            log::debug!("Projectile {} hit the player", self.id);
            player.apply_hit(now, events);
            Some(DestroyReason::HitPlayer)
        } else if hit.groups.intersects(CollisionGroups::GROUND) {
            Some(DestroyReason::HitGround)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::CollisionWorld;
    use crate::sim::enemy::ProjectileTemplate;
    use crate::tuning::{LayoutTuning, PlayerTuning, ProjectileTuning};

    fn request(origin: Vec2, target: Vec2, speed: f32) -> SpawnRequest {
        let mut template = ProjectileTemplate::from(&ProjectileTuning::default());
        template.speed = speed;
        SpawnRequest {
            enemy: 7,
            origin,
            target,
            template,
        }
    }

    fn scene(player_at: Vec2) -> (CollisionWorld, Player) {
        let mut world = CollisionWorld::new();
        world.add_aabb(
            Vec2::new(-12.0, -4.0),
            Vec2::new(12.0, -2.4),
            CollisionGroups::GROUND,
        );
        world.add_circle(player_at, 0.45, CollisionGroups::PLAYER);
        let mut player = Player::new(&PlayerTuning::default(), &LayoutTuning::default());
        player.pos = player_at;
        (world, player)
    }

    #[test]
    fn test_fast_projectile_does_not_tunnel() {
        let (world, mut player) = scene(Vec2::ZERO);
        // 10 units in one step, far more than the 0.9 collider diameter
        let req = request(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 0.0), 1000.0);
        let mut p = Projectile::spawn(1, &req, 0.0);
        let mut events = Vec::new();
        let outcome = p.step(0.01, 0.0, &world, &mut player, &mut events);
        assert_eq!(outcome, ProjectileOutcome::Destroyed(DestroyReason::HitPlayer));
        assert_eq!(player.hits_taken, 1);
    }

    #[test]
    fn test_hits_ground() {
        let (world, mut player) = scene(Vec2::new(8.0, -1.93));
        let req = request(Vec2::new(0.0, 2.0), Vec2::new(0.0, -3.0), 6.0);
        let mut p = Projectile::spawn(1, &req, 0.0);
        let mut events = Vec::new();
        let mut outcome = ProjectileOutcome::Flying;
        let mut t = 0.0;
        while outcome == ProjectileOutcome::Flying && t < 5.0 {
            outcome = p.step(0.01, t, &world, &mut player, &mut events);
            t += 0.01;
        }
        assert_eq!(outcome, ProjectileOutcome::Destroyed(DestroyReason::HitGround));
        assert!(p.pos.y > -2.4);
        assert_eq!(player.hits_taken, 0);
    }

    #[test]
    fn test_arrives_at_empty_aim_point() {
        let (world, mut player) = scene(Vec2::new(8.0, -1.93));
        let req = request(Vec2::new(0.0, 2.0), Vec2::new(-3.0, 0.0), 6.0);
        let mut p = Projectile::spawn(1, &req, 0.0);
        let mut events = Vec::new();
        let mut outcome = ProjectileOutcome::Flying;
        let mut t = 0.0;
        while outcome == ProjectileOutcome::Flying && t < 5.0 {
            outcome = p.step(0.01, t, &world, &mut player, &mut events);
            t += 0.01;
        }
        assert_eq!(outcome, ProjectileOutcome::Destroyed(DestroyReason::Arrived));
        assert_eq!(p.pos, Vec2::new(-3.0, 0.0));
        assert!(p.angle < -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_expires() {
        let (world, mut player) = scene(Vec2::new(8.0, -1.93));
        let req = request(Vec2::ZERO, Vec2::new(-3.0, 0.0), 0.1);
        let mut p = Projectile::spawn(1, &req, 0.0);
        let mut events = Vec::new();
        assert_eq!(
            p.step(0.01, 6.0, &world, &mut player, &mut events),
            ProjectileOutcome::Destroyed(DestroyReason::Expired)
        );
    }

    #[test]
    fn test_invulnerable_player_still_absorbs_projectile() {
        let (world, mut player) = scene(Vec2::ZERO);
        let mut events = Vec::new();
        player.apply_hit(0.0, &mut events);
        let req = request(Vec2::new(-2.0, 0.0), Vec2::ZERO, 100.0);
        let mut p = Projectile::spawn(1, &req, 0.1);
        assert_eq!(
            p.step(0.1, 0.1, &world, &mut player, &mut events),
            ProjectileOutcome::Destroyed(DestroyReason::HitPlayer)
        );
        assert_eq!(player.hits_taken, 1);
    }

    #[test]
    fn test_player_wins_tie_with_ground() {
        // Player standing low enough to overlap the ground's top face
        let (world, mut player) = scene(Vec2::new(0.0, -2.3));
        let req = request(Vec2::new(0.0, -2.35), Vec2::new(3.0, -2.35), 6.0);
        let mut p = Projectile::spawn(1, &req, 0.0);
        let mut events = Vec::new();
        assert_eq!(
            p.step(0.01, 0.0, &world, &mut player, &mut events),
            ProjectileOutcome::Destroyed(DestroyReason::HitPlayer)
        );
        assert_eq!(player.hits_taken, 1);
    }
}
