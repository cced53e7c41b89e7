//! Collision detection and response for axis-aligned hitboxes
//!
//! Detection is scoped to collision groups. Response exchanges momentum per
//! axis in B's rest frame, then pushes A out of B along one axis.
//!
//! Pairs are resolved one at a time. Three or more bodies overlapping in the
//! same tick are not treated specially, so their result depends on
//! registration order.

use std::collections::BTreeSet;

use glam::Vec2;

use super::entity::{Entity, EntityId, Rect};
use super::groups::GroupIndex;
use crate::signum_or_one;

/// Entities sharing a group with `id` whose hitboxes overlap it
///
/// Candidate hitboxes come from the group index; `id`'s own hitbox is read
/// from the entity. An entity with no groups never collides.
pub fn detect_overlaps(entities: &[Entity], groups: &GroupIndex, id: EntityId) -> BTreeSet<EntityId> {
    let Some(entity) = entities.get(id.index()) else {
        return BTreeSet::new();
    };
    if !entity.can_collide() {
        return BTreeSet::new();
    }

    groups
        .candidates(&entity.groups, id)
        .into_iter()
        .filter(|(_, rect)| entity.hitbox.overlaps(rect))
        .map(|(other, _)| other)
        .collect()
}

/// Post-collision velocities for a pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impulse {
    pub a_velocity: Vec2,
    pub b_velocity: Vec2,
}

/// Exchange momentum between A and B, per axis, in B's rest frame
///
/// The transfer interpolates between the inelastic floor (mean bounciness 0)
/// and handing B the whole relative momentum (mean bounciness 1).
pub fn momentum_transfer(a: &Entity, b: &Entity) -> Impulse {
    let a_mass = a.tuning.mass;
    let b_mass = b.tuning.mass;

    let relative_speed = a.velocity - b.velocity;
    let relative_momentum = relative_speed * a_mass;
    let min_transfer = relative_momentum * (b_mass / (a_mass + b_mass));
    let bounciness = (a.tuning.bounciness + b.tuning.bounciness) / 2.0;
    let transfer = (relative_momentum - min_transfer) * bounciness + min_transfer;

    Impulse {
        a_velocity: (relative_momentum - transfer) / a_mass + b.velocity,
        b_velocity: transfer / b_mass + b.velocity,
    }
}

/// Positional correction applied to A after an impulse
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Declip {
    /// Anti-parallel to the approach direction
    AlongApproach(Vec2),
    /// Straight along the push axis. Used when the relative speed on that
    /// axis is (near) zero or points away from the required separation.
    AxisOnly(Vec2),
}

impl Declip {
    pub fn offset(&self) -> Vec2 {
        match *self {
            Declip::AlongApproach(offset) | Declip::AxisOnly(offset) => offset,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Declip::AxisOnly(_))
    }
}

/// Push-axis speed below this fraction of the largest relative speed
/// component (or of 1.0, whichever is larger) is treated as zero
pub const APPROACH_RATIO: f32 = 1e-3;

/// Offset that moves hitbox `a` clear of hitbox `b`
///
/// The push axis is the one with the larger center distance (ties pick x).
/// `relative_speed` is A's velocity relative to B before the impulse. The
/// off-axis component follows the approach direction but never exceeds the
/// push-axis distance.
pub fn declip_offset(a: &Rect, b: &Rect, relative_speed: Vec2, margin: f32) -> Declip {
    let delta = a.center - b.center;
    let distance = delta.abs();
    let clear_distance = (a.size + b.size) * 0.5 + Vec2::splat(margin);

    let axis = if distance.y > distance.x { 1 } else { 0 };
    let needed = (clear_distance[axis] - distance[axis]).max(0.0);
    let speed = relative_speed[axis];

    // Relative to the overall speed so float noise never counts as approach
    let approach_floor = APPROACH_RATIO * relative_speed.abs().max_element().max(1.0);
    let approaching = speed.abs() > approach_floor;

    let away = if delta[axis] != 0.0 {
        signum_or_one(delta[axis])
    } else if approaching {
        -signum_or_one(speed)
    } else {
        1.0
    };

    if approaching && -signum_or_one(speed) == away {
        let mut offset = -relative_speed * (needed / speed.abs());
        let other = 1 - axis;
        offset[other] = offset[other].clamp(-needed, needed);
        offset[axis] = away * needed;
        Declip::AlongApproach(offset)
    } else {
        let mut offset = Vec2::ZERO;
        offset[axis] = away * needed;
        Declip::AxisOnly(offset)
    }
}

/// Resolve one overlapping pair: impulse on both, de-clip on A only
pub fn resolve_collision(a: &mut Entity, b: &mut Entity, margin: f32) -> Declip {
    let relative_speed = a.velocity - b.velocity;
    let impulse = momentum_transfer(a, b);
    a.velocity = impulse.a_velocity;
    b.velocity = impulse.b_velocity;

    let declip = declip_offset(&a.hitbox, &b.hitbox, relative_speed, margin);
    if declip.is_fallback() {
        log::warn!(
            "{} vs {}: no approach speed on push axis, de-clipping along axis only",
            a.id,
            b.id
        );
    }
    a.translate(declip.offset());

    log::debug!(
        "Resolved {} {} vs {} {}: v_a=({:.3}, {:.3}) v_b=({:.3}, {:.3}) push=({:.2}, {:.2})",
        a.id,
        a.name,
        b.id,
        b.name,
        a.velocity.x,
        a.velocity.y,
        b.velocity.x,
        b.velocity.y,
        declip.offset().x,
        declip.offset().y
    );
    declip
}

/// Two distinct mutable entities from one slice
///
/// Panics if `a == b`; callers pass ids from a pair that excludes self.
pub fn pair_mut(entities: &mut [Entity], a: EntityId, b: EntityId) -> (&mut Entity, &mut Entity) {
    let (i, j) = (a.index(), b.index());
    assert_ne!(i, j, "cannot resolve an entity against itself");
    if i < j {
        let (low, high) = entities.split_at_mut(j);
        (&mut low[i], &mut high[0])
    } else {
        let (low, high) = entities.split_at_mut(i);
        (&mut high[0], &mut low[j])
    }
}
