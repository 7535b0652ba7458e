//! Number Knight - gameplay core for a single quiz-platformer level
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player, enemies, projectiles, quiz, level flow)
//! - `ui`: Presentation state machines (typewriter, fades, health bar, runes)
//! - `hooks`: Collaborator traits (animation, audio, progress, exit, input)
//! - `audio`: Sound cue routing with volume settings
//! - `tuning`: Data-driven level balance and layout
//! - `settings`: Player preferences

pub mod audio;
pub mod hooks;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use settings::Settings;
pub use tuning::{ConfigError, LevelTuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta the driver feeds into the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting
#[inline]
pub fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

/// Cubic ease-out on a normalized `t`
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0) - 1.0;
    t * t * t + 1.0
}
