//! Deterministic simulation module
//!
//! All movement and collision logic lives here. This module must be pure and
//! deterministic:
//! - One tick per call, constants tuned per tick
//! - Tick-counter clock only, never wall time
//! - Stable iteration order (registration order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod groups;
pub mod movement;
pub mod player;
pub mod projectile;
pub mod state;
pub mod tick;

pub use collision::{Declip, Impulse, declip_offset, detect_overlaps, momentum_transfer, resolve_collision};
pub use entity::{
    Directional, Entity, EntityId, EntityKind, EntitySpec, HitboxAnchor, HitboxSpec, MoveDirection,
    Rect, Sprite, Tuning,
};
pub use groups::{GroupId, GroupIndex};
pub use movement::integrate;
pub use player::{ControlScheme, InputEvent, Key, PlayerData, PlayerSlot};
pub use projectile::projectile_spec;
pub use state::{DrawItem, World};
pub use tick::{TickInput, TickReport, tick};
