//! Data-driven level balance and layout
//!
//! Every section carries `#[serde(default)]` so a tuning file only needs the
//! values it overrides. Values are checked once at startup by
//! [`LevelTuning::validate`]; the simulation assumes a validated tuning.

use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Startup configuration failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Player movement and health
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Horizontal speed (world units/s)
    pub speed: f32,
    /// Distance at which a move snaps to its target
    pub stop_distance: f32,
    /// Hits the player can take; reaching it is death
    pub total_allowed_hits: u32,
    /// Stun length after a hit (seconds)
    pub stun_duration: f32,
    /// Extra invulnerability after the stun ends (seconds)
    pub invulnerability_grace: f32,
    /// Radius of the player's collider
    pub collider_radius: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            speed: 5.0,
            stop_distance: 0.01,
            total_allowed_hits: 6,
            stun_duration: 1.0,
            invulnerability_grace: 0.5,
            collider_radius: 0.45,
        }
    }
}

/// Enemy attack pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub attack_interval: f32,
    pub attack_interval_min: f32,
    /// Delay from level start until the first attack may happen
    pub first_attack_delay: f32,
    /// Attack animation start to projectile spawn
    pub telegraph_delay: f32,
    /// Time a dead enemy lingers before removal
    pub death_remove_delay: f32,
    /// Interval reduction applied to every enemy per wrong answer
    pub aggression_step: f32,
    /// Body collider centered on the fire point
    pub body_radius: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            attack_interval: 3.0,
            attack_interval_min: 0.6,
            first_attack_delay: 1.0,
            telegraph_delay: 0.35,
            death_remove_delay: 2.0,
            aggression_step: 0.25,
            body_radius: 0.6,
        }
    }
}

/// Projectile flight
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub speed: f32,
    pub max_lifetime: f32,
    pub hit_radius: f32,
    /// Distance to the aim point at which the projectile is spent
    pub arrive_distance: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            speed: 6.0,
            max_lifetime: 6.0,
            hit_radius: 0.35,
            arrive_distance: 0.01,
        }
    }
}

/// Quiz rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizTuning {
    pub min_number: u32,
    pub max_number: u32,
    pub parity_correct_required: u32,
    pub prime_correct_required: u32,
    /// Pause after the number fades out before the next draw
    pub time_between_questions: f32,
    pub number_fade_time: f32,
    /// Length of one half of the correct/wrong color flash
    pub flash_time: f32,
    /// Movement lockout while the prime-phase banner is typed
    pub phase_lockout: f32,
    /// Enables the third "Prime" button during the parity phase
    pub legacy_prime_button: bool,
}

impl Default for QuizTuning {
    fn default() -> Self {
        Self {
            min_number: 1,
            max_number: 100,
            parity_correct_required: 4,
            prime_correct_required: 4,
            time_between_questions: 0.4,
            number_fade_time: 0.25,
            flash_time: 0.12,
            phase_lockout: 1.0,
            legacy_prime_button: false,
        }
    }
}

/// Cosmetic sequencing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationTuning {
    /// Seconds per typed character
    pub typing_speed: f32,
    pub tap_blink_interval: f32,
    pub dialogue: Vec<String>,
    pub question_prompt: String,
    pub prime_prompt: String,
    pub button_pop_time: f32,
    pub button_pop_stagger: f32,
    pub first_question_delay: f32,
    pub fade_duration: f32,
    pub heart_count: usize,
    /// Fill removed from a heart per hit
    pub heart_step: f32,
    pub rune_count: usize,
    pub fill_tween_time: f32,
    pub buff_duration: f32,
    pub door_duration: f32,
    pub portal_walk_speed: f32,
}

impl Default for PresentationTuning {
    fn default() -> Self {
        Self {
            typing_speed: 0.04,
            tap_blink_interval: 0.6,
            dialogue: vec![
                "Halt, knight. The gate answers only to those who know their numbers.".into(),
                "Tell me which numbers are odd and which are even.".into(),
                "Then tell me which are prime. Beware the guardians while you think.".into(),
            ],
            question_prompt: "Which number is this?".into(),
            prime_prompt: "Is this number prime?".into(),
            button_pop_time: 0.22,
            button_pop_stagger: 0.08,
            first_question_delay: 0.15,
            fade_duration: 0.6,
            heart_count: 3,
            heart_step: 0.5,
            rune_count: 8,
            fill_tween_time: 0.35,
            buff_duration: 1.2,
            door_duration: 1.0,
            portal_walk_speed: 2.5,
        }
    }
}

/// Axis-aligned rectangle in world space
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

/// Enemy placement
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub fire_point: Vec2,
}

/// Scene layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutTuning {
    pub player_start: Vec2,
    pub portal: Vec2,
    /// Horizontal walk limits
    pub min_x: f32,
    pub max_x: f32,
    pub ground: Vec<Rect>,
    pub enemies: Vec<EnemySpawn>,
}

impl Default for LayoutTuning {
    fn default() -> Self {
        Self {
            player_start: Vec2::new(-6.0, -1.93),
            portal: Vec2::new(-0.5, -1.93),
            min_x: -8.0,
            max_x: 8.0,
            ground: vec![Rect {
                min: Vec2::new(-12.0, -4.0),
                max: Vec2::new(12.0, -2.4),
            }],
            enemies: vec![
                EnemySpawn {
                    fire_point: Vec2::new(6.5, 2.0),
                },
                EnemySpawn {
                    fire_point: Vec2::new(-7.5, 3.0),
                },
            ],
        }
    }
}

/// Complete level tuning
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub projectile: ProjectileTuning,
    pub quiz: QuizTuning,
    pub presentation: PresentationTuning,
    pub layout: LayoutTuning,
}

impl LevelTuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded level tuning from {}", path.display());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.player;
        positive("player.speed", p.speed)?;
        non_negative("player.stop_distance", p.stop_distance)?;
        non_negative("player.stun_duration", p.stun_duration)?;
        non_negative("player.invulnerability_grace", p.invulnerability_grace)?;
        positive("player.collider_radius", p.collider_radius)?;
        if p.total_allowed_hits == 0 {
            return Err(ConfigError::invalid(
                "player.total_allowed_hits",
                "must allow at least one hit",
            ));
        }

        let e = &self.enemy;
        positive("enemy.attack_interval_min", e.attack_interval_min)?;
        positive("enemy.attack_interval", e.attack_interval)?;
        non_negative("enemy.first_attack_delay", e.first_attack_delay)?;
        non_negative("enemy.telegraph_delay", e.telegraph_delay)?;
        non_negative("enemy.death_remove_delay", e.death_remove_delay)?;
        non_negative("enemy.aggression_step", e.aggression_step)?;
        positive("enemy.body_radius", e.body_radius)?;

        let pr = &self.projectile;
        positive("projectile.speed", pr.speed)?;
        positive("projectile.max_lifetime", pr.max_lifetime)?;
        positive("projectile.hit_radius", pr.hit_radius)?;
        non_negative("projectile.arrive_distance", pr.arrive_distance)?;

        let q = &self.quiz;
        if q.min_number > q.max_number {
            return Err(ConfigError::invalid(
                "quiz.min_number",
                format!("{} exceeds max_number {}", q.min_number, q.max_number),
            ));
        }
        if q.parity_correct_required == 0 {
            return Err(ConfigError::invalid(
                "quiz.parity_correct_required",
                "must be at least 1",
            ));
        }
        if q.prime_correct_required == 0 {
            return Err(ConfigError::invalid(
                "quiz.prime_correct_required",
                "must be at least 1",
            ));
        }
        non_negative("quiz.time_between_questions", q.time_between_questions)?;
        non_negative("quiz.number_fade_time", q.number_fade_time)?;
        non_negative("quiz.phase_lockout", q.phase_lockout)?;

        let ui = &self.presentation;
        non_negative("presentation.typing_speed", ui.typing_speed)?;
        positive("presentation.heart_step", ui.heart_step)?;
        positive("presentation.portal_walk_speed", ui.portal_walk_speed)?;
        if ui.heart_count == 0 {
            return Err(ConfigError::invalid(
                "presentation.heart_count",
                "health bar needs at least one heart",
            ));
        }

        let l = &self.layout;
        if l.min_x >= l.max_x {
            return Err(ConfigError::invalid("layout.min_x", "must be below max_x"));
        }
        if l.ground.is_empty() {
            return Err(ConfigError::invalid(
                "layout.ground",
                "level needs at least one ground collider",
            ));
        }
        if let Some(r) = l.ground.iter().find(|r| r.min.x > r.max.x || r.min.y > r.max.y) {
            return Err(ConfigError::invalid(
                "layout.ground",
                format!("inverted rectangle {:?}", r),
            ));
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be > 0, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be >= 0, got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(LevelTuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let tuning = LevelTuning::from_json(r#"{ "quiz": { "max_number": 20 } }"#).unwrap();
        assert_eq!(tuning.quiz.max_number, 20);
        assert_eq!(tuning.quiz.min_number, 1);
        assert_eq!(tuning.player.total_allowed_hits, 6);
    }

    #[test]
    fn test_rejects_empty_number_range() {
        let err = LevelTuning::from_json(r#"{ "quiz": { "min_number": 50, "max_number": 10 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "quiz.min_number",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_hit_capacity() {
        let mut tuning = LevelTuning::default();
        tuning.player.total_allowed_hits = 0;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_missing_ground() {
        let mut tuning = LevelTuning::default();
        tuning.layout.ground.clear();
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = LevelTuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = LevelTuning::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
