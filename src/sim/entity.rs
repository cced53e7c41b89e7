//! Physical state for one simulated body
//!
//! Coordinates follow screen space: +x is right, +y is down. Velocity signs
//! encode direction, so "up" means a negative y component.

use std::collections::BTreeSet;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::groups::GroupId;
use super::player::PlayerData;
use crate::error::SimError;
use crate::is_finite_vec;

/// Stable index of an entity inside its world
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl EntityId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One non-negative scalar per screen direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Directional {
    pub up: f32,
    pub down: f32,
    pub left: f32,
    pub right: f32,
}

impl Directional {
    pub const fn uniform(value: f32) -> Self {
        Self {
            up: value,
            down: value,
            left: value,
            right: value,
        }
    }

    fn validate(&self, field: &'static str) -> Result<(), SimError> {
        for value in [self.up, self.down, self.left, self.right] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidTuning { field, value });
            }
        }
        Ok(())
    }
}

/// Directional force flags, driven by input only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDirection {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveDirection {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Per-body movement and collision constants (all per tick)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Speed bound per direction (absolute values)
    pub max_speed: Directional,
    /// Velocity added per tick while the matching flag is set
    pub acceleration: Directional,
    /// Passive decay per tick on (x, y)
    pub resistance: Vec2,
    pub mass: f32,
    /// 0 = fully inelastic, 1 = fully elastic
    pub bounciness: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_speed: Directional::uniform(crate::consts::PLAYER_MAX_SPEED),
            acceleration: Directional::uniform(crate::consts::PLAYER_ACCELERATION),
            resistance: Vec2::splat(crate::consts::PLAYER_RESISTANCE),
            mass: 1.0,
            bounciness: 0.5,
        }
    }
}

impl Tuning {
    /// Reject values the integrator and resolver are not defined for
    pub fn validate(&self) -> Result<(), SimError> {
        self.max_speed.validate("max_speed")?;
        self.acceleration.validate("acceleration")?;
        for value in [self.resistance.x, self.resistance.y] {
            if !value.is_finite() || value < 0.0 {
                return Err(SimError::InvalidTuning {
                    field: "resistance",
                    value,
                });
            }
        }
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(SimError::InvalidTuning {
                field: "mass",
                value: self.mass,
            });
        }
        if !(0.0..=1.0).contains(&self.bounciness) {
            return Err(SimError::InvalidTuning {
                field: "bounciness",
                value: self.bounciness,
            });
        }
        Ok(())
    }
}

/// Opaque image handle supplied by the asset loader
///
/// The core only reads the pixel size, to size the default hitbox.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub id: u32,
    pub width: f32,
    pub height: f32,
}

impl Sprite {
    pub fn new(id: u32, width: f32, height: f32) -> Self {
        Self { id, width, height }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// Axis-aligned rectangle stored by center and full size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        self.size * 0.5
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents()
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents()
    }

    /// Strict intersection test; rectangles sharing only an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_min = self.min();
        let a_max = self.max();
        let b_min = other.min();
        let b_max = other.max();
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }
}

/// Where the hitbox sits relative to the entity position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum HitboxAnchor {
    /// Position is the hitbox center
    #[default]
    Center,
    /// Position is the hitbox top-left corner
    TopLeft,
    /// Hitbox center is position + offset
    Offset(Vec2),
}

impl HitboxAnchor {
    pub fn center_for(&self, position: Vec2, size: Vec2) -> Vec2 {
        match *self {
            HitboxAnchor::Center => position,
            HitboxAnchor::TopLeft => position + size * 0.5,
            HitboxAnchor::Offset(offset) => position + offset,
        }
    }
}

/// Hitbox override; unset dimensions fall back to the sprite's
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HitboxSpec {
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub anchor: HitboxAnchor,
}

impl HitboxSpec {
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            anchor: HitboxAnchor::Center,
        }
    }

    pub fn size_for(&self, sprite: &Sprite) -> Vec2 {
        Vec2::new(
            self.width.unwrap_or(sprite.width),
            self.height.unwrap_or(sprite.height),
        )
    }
}

/// Closed set of entity variants
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum EntityKind {
    /// Plain physics body
    #[default]
    Body,
    Player(PlayerData),
    Projectile,
}

/// Everything needed to create an entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySpec {
    pub name: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub tuning: Tuning,
    pub sprite: Sprite,
    pub hitbox: HitboxSpec,
    pub groups: Vec<GroupId>,
}

impl EntitySpec {
    pub fn new(name: impl Into<String>, position: Vec2, sprite: Sprite, tuning: Tuning) -> Self {
        Self {
            name: name.into(),
            position,
            velocity: Vec2::ZERO,
            tuning,
            sprite,
            hitbox: HitboxSpec::default(),
            groups: Vec::new(),
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_hitbox(mut self, hitbox: HitboxSpec) -> Self {
        self.hitbox = hitbox;
        self
    }

    pub fn with_groups<I, G>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<GroupId>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }
}

/// A simulated body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub tuning: Tuning,
    pub move_direction: MoveDirection,
    pub sprite: Sprite,
    pub hitbox_spec: HitboxSpec,
    /// Authoritative hitbox, re-centered whenever the position changes
    pub hitbox: Rect,
    pub groups: BTreeSet<GroupId>,
    pub kind: EntityKind,
}

impl Entity {
    /// Validate a spec and build the entity. Fails fast on bad input.
    pub fn from_spec(id: EntityId, spec: EntitySpec, kind: EntityKind) -> Result<Self, SimError> {
        if !is_finite_vec(spec.position) {
            return Err(SimError::InvalidPosition {
                x: spec.position.x,
                y: spec.position.y,
            });
        }
        if !is_finite_vec(spec.velocity) {
            return Err(SimError::InvalidTuning {
                field: "velocity",
                value: if spec.velocity.x.is_finite() {
                    spec.velocity.y
                } else {
                    spec.velocity.x
                },
            });
        }
        spec.tuning.validate()?;

        let size = spec.hitbox.size_for(&spec.sprite);
        if !is_finite_vec(size) || size.x < 0.0 || size.y < 0.0 {
            return Err(SimError::InvalidHitbox {
                width: size.x,
                height: size.y,
            });
        }
        if let HitboxAnchor::Offset(offset) = spec.hitbox.anchor {
            if !is_finite_vec(offset) {
                return Err(SimError::InvalidHitbox {
                    width: size.x,
                    height: size.y,
                });
            }
        }

        let center = spec.hitbox.anchor.center_for(spec.position, size);
        Ok(Self {
            id,
            name: spec.name,
            position: spec.position,
            velocity: spec.velocity,
            tuning: spec.tuning,
            move_direction: MoveDirection::default(),
            sprite: spec.sprite,
            hitbox_spec: spec.hitbox,
            hitbox: Rect::from_center(center, size),
            groups: spec.groups.into_iter().collect(),
            kind,
        })
    }

    /// Re-center the hitbox on the current position
    pub fn sync_hitbox(&mut self) {
        self.hitbox.center = self
            .hitbox_spec
            .anchor
            .center_for(self.position, self.hitbox.size);
    }

    /// Move by `delta` and keep the hitbox attached
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
        self.sync_hitbox();
    }

    #[inline]
    pub fn momentum(&self) -> Vec2 {
        self.velocity * self.tuning.mass
    }

    pub fn can_collide(&self) -> bool {
        !self.groups.is_empty()
    }

    pub fn player(&self) -> Option<&PlayerData> {
        match &self.kind {
            EntityKind::Player(data) => Some(data),
            _ => None,
        }
    }

    pub fn player_mut(&mut self) -> Option<&mut PlayerData> {
        match &mut self.kind {
            EntityKind::Player(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_projectile(&self) -> bool {
        matches!(self.kind, EntityKind::Projectile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite() -> Sprite {
        Sprite::new(0, 50.0, 50.0)
    }

    #[test]
    fn test_default_hitbox_matches_sprite() {
        let spec = EntitySpec::new("a", Vec2::new(300.0, 300.0), sprite(), Tuning::default());
        let entity = Entity::from_spec(EntityId(0), spec, EntityKind::Body).unwrap();
        assert_eq!(entity.hitbox.center, Vec2::new(300.0, 300.0));
        assert_eq!(entity.hitbox.size, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_custom_hitbox_top_left() {
        let spec = EntitySpec::new("a", Vec2::new(10.0, 20.0), sprite(), Tuning::default())
            .with_hitbox(HitboxSpec {
                width: Some(30.0),
                height: None,
                anchor: HitboxAnchor::TopLeft,
            });
        let entity = Entity::from_spec(EntityId(0), spec, EntityKind::Body).unwrap();
        assert_eq!(entity.hitbox.size, Vec2::new(30.0, 50.0));
        assert_eq!(entity.hitbox.center, Vec2::new(25.0, 45.0));
    }

    #[test]
    fn test_rejects_non_finite_position() {
        let spec = EntitySpec::new("a", Vec2::new(f32::NAN, 0.0), sprite(), Tuning::default());
        let err = Entity::from_spec(EntityId(0), spec, EntityKind::Body).unwrap_err();
        assert!(matches!(err, SimError::InvalidPosition { .. }));
    }

    #[test]
    fn test_rejects_negative_tuning() {
        let mut tuning = Tuning::default();
        tuning.resistance.y = -0.1;
        assert!(matches!(
            tuning.validate(),
            Err(SimError::InvalidTuning {
                field: "resistance",
                ..
            })
        ));

        let mut tuning = Tuning::default();
        tuning.max_speed.left = -1.0;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.mass = 0.0;
        assert!(tuning.validate().is_err());

        let mut tuning = Tuning::default();
        tuning.bounciness = 1.5;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rect_overlap_is_strict() {
        let a = Rect::from_center(Vec2::ZERO, Vec2::splat(10.0));
        let touching = Rect::from_center(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let inside = Rect::from_center(Vec2::new(9.0, 3.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_translate_moves_hitbox() {
        let spec = EntitySpec::new("a", Vec2::ZERO, sprite(), Tuning::default()).with_hitbox(
            HitboxSpec {
                anchor: HitboxAnchor::Offset(Vec2::new(0.0, 5.0)),
                ..HitboxSpec::default()
            },
        );
        let mut entity = Entity::from_spec(EntityId(0), spec, EntityKind::Body).unwrap();
        entity.translate(Vec2::new(3.0, -1.0));
        assert_eq!(entity.position, Vec2::new(3.0, -1.0));
        assert_eq!(entity.hitbox.center, Vec2::new(3.0, 4.0));
    }
}
