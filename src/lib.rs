//! Skirmish - movement and collision core for a two-player 2D arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, players, projectiles)
//! - `settings`: Data-driven tuning loaded from JSON
//! - `error`: Construction and configuration errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use settings::SimSettings;

use glam::Vec2;

/// Simulation configuration constants
///
/// All physics constants are per tick, not per second.
pub mod consts {
    /// Ticks per simulated second (the frame loop waits ~10 ms per iteration)
    pub const TICKS_PER_SECOND: u32 = 100;

    /// Extra gap left between hitboxes after a de-clip correction
    pub const DECLIP_MARGIN: f32 = 1.0;

    /// Minimum simulated time between two volleys from one player
    pub const FIRE_COOLDOWN_SECS: f32 = 2.0;
    /// X offset of the second projectile in a volley
    pub const SECOND_SHOT_OFFSET: f32 = 25.0;

    /// Default projectile velocity (per tick)
    pub const PROJECTILE_VELOCITY: (f32, f32) = (0.0, -10.0);
    /// Large finite cap so projectiles are never clamped in practice
    pub const PROJECTILE_MAX_SPEED: f32 = 10_000.0;

    /// Player defaults
    pub const PLAYER_HEALTH: u32 = 100;
    pub const PLAYER_MAX_SPEED: f32 = 3.0;
    pub const PLAYER_ACCELERATION: f32 = 0.1;
    pub const PLAYER_RESISTANCE: f32 = 0.05;
}

/// Sign of `value` as ±1, treating zero (and -0.0) as positive
#[inline]
pub fn signum_or_one(value: f32) -> f32 {
    if value < 0.0 { -1.0 } else { 1.0 }
}

/// True if both components are finite
#[inline]
pub fn is_finite_vec(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

/// Shrink `value` toward zero by `amount`, snapping to zero instead of crossing it
#[inline]
pub fn decay_toward_zero(value: f32, amount: f32) -> f32 {
    if value.abs() < amount {
        0.0
    } else {
        (value.abs() - amount).copysign(value)
    }
}
