//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod exit;
pub mod player;
pub mod projectile;
pub mod quiz;
pub mod state;
pub mod tick;

pub use collision::{CastHit, CollisionGroups, CollisionWorld, PhysicsQuery};
pub use enemy::{AttackPhase, Enemy, SpawnRequest};
pub use exit::{ExitSequence, ExitStage};
pub use player::{HitOutcome, MoveGate, Player, PlayerState};
pub use projectile::{DestroyReason, Projectile, ProjectileOutcome};
pub use quiz::{AnswerButton, AnswerResult, Question, QuestionPhase, Quiz, is_prime};
pub use state::{Actor, AnimTrigger, ExitReason, GameEvent, GamePhase, GameState};
pub use tick::{PointerInput, TickInput, tick};
