//! Swept collision queries for projectiles
//!
//! The level only needs two shapes: circles (the player) and axis-aligned
//! boxes (ground). A moving circle of radius `r` against either shape is a
//! ray against the shape grown by `r`; for a box that is a rounded rectangle,
//! tested as the union of two slabs and four corner circles.

use std::ops::BitOr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Collision group bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollisionGroups(pub u32);

impl CollisionGroups {
    pub const NONE: Self = Self(0);
    pub const PLAYER: Self = Self(1 << 0);
    pub const GROUND: Self = Self(1 << 1);
    pub const ENEMY: Self = Self(1 << 2);

    /// True if any bit is shared
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

impl BitOr for CollisionGroups {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Collider geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    Aabb { min: Vec2, max: Vec2 },
}

/// A collider registered in a [`CollisionWorld`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collider {
    pub id: u32,
    pub shape: Shape,
    pub groups: CollisionGroups,
    pub enabled: bool,
}

/// A single cast or overlap result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastHit {
    pub collider: u32,
    pub groups: CollisionGroups,
    /// Distance along the cast (0 when the cast started overlapping)
    pub distance: f32,
    /// Center of the cast circle at impact
    pub point: Vec2,
    /// Surface normal at impact, pointing toward the caster
    pub normal: Vec2,
}

/// 2D physics query used by projectiles
pub trait PhysicsQuery {
    /// Sweep a circle from `origin` along `dir` for `distance`; hits ordered by distance
    fn circle_cast_all(
        &self,
        origin: Vec2,
        radius: f32,
        dir: Vec2,
        distance: f32,
        mask: CollisionGroups,
    ) -> Vec<CastHit>;

    /// Colliders overlapping a circle
    fn overlap_circle(&self, center: Vec2, radius: f32, mask: CollisionGroups) -> Vec<CastHit>;
}

/// Minimal collider set answering [`PhysicsQuery`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollisionWorld {
    colliders: Vec<Collider>,
    next_id: u32,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, shape: Shape, groups: CollisionGroups) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.colliders.push(Collider {
            id,
            shape,
            groups,
            enabled: true,
        });
        id
    }

    pub fn add_circle(&mut self, center: Vec2, radius: f32, groups: CollisionGroups) -> u32 {
        self.insert(Shape::Circle { center, radius }, groups)
    }

    pub fn add_aabb(&mut self, min: Vec2, max: Vec2, groups: CollisionGroups) -> u32 {
        self.insert(Shape::Aabb { min, max }, groups)
    }

    pub fn remove(&mut self, id: u32) {
        self.colliders.retain(|c| c.id != id);
    }

    /// Move a collider so its center lands on `pos`
    pub fn set_position(&mut self, id: u32, pos: Vec2) {
        if let Some(collider) = self.colliders.iter_mut().find(|c| c.id == id) {
            match &mut collider.shape {
                Shape::Circle { center, .. } => *center = pos,
                Shape::Aabb { min, max } => {
                    let half = (*max - *min) * 0.5;
                    *min = pos - half;
                    *max = pos + half;
                }
            }
        }
    }

    pub fn set_enabled(&mut self, id: u32, enabled: bool) {
        if let Some(collider) = self.colliders.iter_mut().find(|c| c.id == id) {
            collider.enabled = enabled;
        }
    }

    fn candidates(&self, mask: CollisionGroups) -> impl Iterator<Item = &Collider> {
        self.colliders
            .iter()
            .filter(move |c| c.enabled && c.groups.intersects(mask))
    }
}

impl PhysicsQuery for CollisionWorld {
    fn circle_cast_all(
        &self,
        origin: Vec2,
        radius: f32,
        dir: Vec2,
        distance: f32,
        mask: CollisionGroups,
    ) -> Vec<CastHit> {
        let dir = dir.normalize_or_zero();
        if dir == Vec2::ZERO {
            return self.overlap_circle(origin, radius, mask);
        }

        let mut hits: Vec<CastHit> = self
            .candidates(mask)
            .filter_map(|c| {
                let (t, normal) = match c.shape {
                    Shape::Circle { center, radius: r } => {
                        cast_circle_vs_circle(origin, dir, radius + r, center)?
                    }
                    Shape::Aabb { min, max } => cast_circle_vs_aabb(origin, dir, radius, min, max)?,
                };
                (t <= distance).then(|| CastHit {
                    collider: c.id,
                    groups: c.groups,
                    distance: t,
                    point: origin + dir * t,
                    normal,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.collider.cmp(&b.collider))
        });
        hits
    }

    fn overlap_circle(&self, center: Vec2, radius: f32, mask: CollisionGroups) -> Vec<CastHit> {
        self.candidates(mask)
            .filter_map(|c| {
                let closest = match c.shape {
                    Shape::Circle { center: cc, radius: r } => {
                        let to = center - cc;
                        if to.length() > radius + r {
                            return None;
                        }
                        cc + to.normalize_or_zero() * r.min(to.length())
                    }
                    Shape::Aabb { min, max } => {
                        let closest = center.clamp(min, max);
                        if (center - closest).length_squared() > radius * radius {
                            return None;
                        }
                        closest
                    }
                };
                Some(CastHit {
                    collider: c.id,
                    groups: c.groups,
                    distance: 0.0,
                    point: center,
                    normal: (center - closest).normalize_or_zero(),
                })
            })
            .collect()
    }
}

/// Ray (unit `dir`) against a circle of radius `r`; returns entry distance and normal
fn cast_circle_vs_circle(origin: Vec2, dir: Vec2, r: f32, center: Vec2) -> Option<(f32, Vec2)> {
    let m = origin - center;
    let c = m.length_squared() - r * r;
    if c <= 0.0 {
        // Already overlapping
        let normal = m.try_normalize().unwrap_or(-dir);
        return Some((0.0, normal));
    }
    let b = m.dot(dir);
    if b > 0.0 {
        // Outside and moving away
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    let normal = (m + dir * t).normalize_or_zero();
    Some((t.max(0.0), normal))
}

/// Moving circle against a box: ray against the box grown into a rounded rectangle
fn cast_circle_vs_aabb(
    origin: Vec2,
    dir: Vec2,
    radius: f32,
    min: Vec2,
    max: Vec2,
) -> Option<(f32, Vec2)> {
    let closest = origin.clamp(min, max);
    let gap = origin - closest;
    if gap.length_squared() <= radius * radius {
        return Some((0.0, gap.try_normalize().unwrap_or(-dir)));
    }

    let wide = ray_aabb(
        origin,
        dir,
        Vec2::new(min.x - radius, min.y),
        Vec2::new(max.x + radius, max.y),
    );
    let tall = ray_aabb(
        origin,
        dir,
        Vec2::new(min.x, min.y - radius),
        Vec2::new(max.x, max.y + radius),
    );
    let corners = [
        min,
        Vec2::new(max.x, min.y),
        max,
        Vec2::new(min.x, max.y),
    ]
    .map(|corner| cast_circle_vs_circle(origin, dir, radius, corner));

    [wide, tall]
        .into_iter()
        .chain(corners)
        .flatten()
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
}

/// Slab test; returns entry distance (>= 0) and entry face normal
fn ray_aabb(origin: Vec2, dir: Vec2, min: Vec2, max: Vec2) -> Option<(f32, Vec2)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = -dir;

    for axis in 0..2 {
        let (o, d, lo, hi) = (origin[axis], dir[axis], min[axis], max[axis]);
        if d.abs() < 1e-8 {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let (t1, t2) = {
            let a = (lo - o) * inv;
            let b = (hi - o) * inv;
            if a <= b { (a, b) } else { (b, a) }
        };
        if t1 > t_enter {
            t_enter = t1;
            let unit = if axis == 0 { Vec2::X } else { Vec2::Y };
            normal = if d > 0.0 { -unit } else { unit };
        }
        t_exit = t_exit.min(t2);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_exit < 0.0 {
        return None;
    }
    Some((t_enter.max(0.0), normal))
}
