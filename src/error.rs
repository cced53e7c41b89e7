//! Errors raised while building entities or loading settings
//!
//! The per-tick path never fails: everything it touches was validated here.

use thiserror::Error;

use crate::sim::EntityId;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("position must be finite, got ({x}, {y})")]
    InvalidPosition { x: f32, y: f32 },

    #[error("invalid tuning value for {field}: {value}")]
    InvalidTuning { field: &'static str, value: f32 },

    #[error("invalid hitbox size {width}x{height}")]
    InvalidHitbox { width: f32, height: f32 },

    #[error("no entity with id {0}")]
    UnknownEntity(EntityId),

    #[error("entity {0} is not a player")]
    NotAPlayer(EntityId),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("settings parse error: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
