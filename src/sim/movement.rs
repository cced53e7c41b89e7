//! Per-tick movement integration
//!
//! Order per tick: directional acceleration, passive resistance, max-speed
//! clamp, then `position += velocity`. One tick is one unit of time.

use glam::Vec2;

use super::entity::{Directional, Entity, MoveDirection};
use crate::decay_toward_zero;

/// Velocity change from the active directional flags
///
/// Flags stack independently, so diagonal input is faster than axis-aligned.
pub fn directional_acceleration(flags: MoveDirection, acceleration: &Directional) -> Vec2 {
    let mut delta = Vec2::ZERO;
    if flags.up {
        delta.y -= acceleration.up;
    }
    if flags.down {
        delta.y += acceleration.down;
    }
    if flags.left {
        delta.x -= acceleration.left;
    }
    if flags.right {
        delta.x += acceleration.right;
    }
    delta
}

/// Passive decay on each axis, snapping to zero instead of overshooting
pub fn apply_resistance(velocity: Vec2, resistance: Vec2) -> Vec2 {
    Vec2::new(
        decay_toward_zero(velocity.x, resistance.x),
        decay_toward_zero(velocity.y, resistance.y),
    )
}

/// Clamp y to [-up, down] and x to [-left, right]
pub fn clamp_speed(velocity: Vec2, max_speed: &Directional) -> Vec2 {
    let mut v = velocity;
    if v.y < -max_speed.up {
        v.y = -max_speed.up;
    } else if v.y > max_speed.down {
        v.y = max_speed.down;
    }
    if v.x < -max_speed.left {
        v.x = -max_speed.left;
    } else if v.x > max_speed.right {
        v.x = max_speed.right;
    }
    v
}

/// Advance one entity by exactly one tick
pub fn integrate(entity: &mut Entity) {
    let tuning = entity.tuning;
    let mut velocity = entity.velocity;
    velocity += directional_acceleration(entity.move_direction, &tuning.acceleration);
    velocity = apply_resistance(velocity, tuning.resistance);
    velocity = clamp_speed(velocity, &tuning.max_speed);

    entity.velocity = velocity;
    entity.translate(velocity);

    log::trace!(
        "{} {} speed=({:.3}, {:.3}) pos=({:.2}, {:.2})",
        entity.id,
        entity.name,
        entity.velocity.x,
        entity.velocity.y,
        entity.position.x,
        entity.position.y
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EntityId, EntityKind, EntitySpec, Sprite, Tuning};
    use proptest::prelude::*;

    fn body(velocity: Vec2, tuning: Tuning) -> Entity {
        let spec = EntitySpec::new("body", Vec2::ZERO, Sprite::new(0, 10.0, 10.0), tuning)
            .with_velocity(velocity);
        Entity::from_spec(EntityId(0), spec, EntityKind::Body).unwrap()
    }

    #[test]
    fn test_small_velocity_snaps_to_zero() {
        let mut entity = body(Vec2::new(0.03, 0.0), Tuning::default());
        integrate(&mut entity);
        assert_eq!(entity.velocity, Vec2::ZERO);
        assert_eq!(entity.position, Vec2::ZERO);
    }

    #[test]
    fn test_acceleration_then_resistance() {
        let mut entity = body(Vec2::ZERO, Tuning::default());
        entity.move_direction.right = true;
        integrate(&mut entity);
        // 0.1 accel - 0.05 resistance
        assert!((entity.velocity.x - 0.05).abs() < 1e-6);
        assert!((entity.position.x - 0.05).abs() < 1e-6);
        assert_eq!(entity.hitbox.center, entity.position);
    }

    #[test]
    fn test_up_and_left_are_negative() {
        let mut entity = body(Vec2::ZERO, Tuning::default());
        entity.move_direction.up = true;
        entity.move_direction.left = true;
        integrate(&mut entity);
        assert!(entity.velocity.x < 0.0);
        assert!(entity.velocity.y < 0.0);
    }

    #[test]
    fn test_diagonal_input_stacks() {
        let accel = Directional::uniform(1.0);
        let diagonal = directional_acceleration(
            MoveDirection {
                down: true,
                right: true,
                ..Default::default()
            },
            &accel,
        );
        let straight = directional_acceleration(
            MoveDirection {
                right: true,
                ..Default::default()
            },
            &accel,
        );
        assert!(diagonal.length() > straight.length());
    }

    #[test]
    fn test_clamp_at_max_speed_is_idempotent() {
        let tuning = Tuning::default();
        let mut entity = body(Vec2::new(3.0, -3.0), tuning);
        entity.move_direction.right = true;
        entity.move_direction.up = true;
        for _ in 0..5 {
            integrate(&mut entity);
            assert_eq!(entity.velocity, Vec2::new(3.0, -3.0));
        }
    }

    #[test]
    fn test_asymmetric_max_speed() {
        let max = Directional {
            up: 1.0,
            down: 4.0,
            left: 2.0,
            right: 0.5,
        };
        assert_eq!(clamp_speed(Vec2::new(-9.0, -9.0), &max), Vec2::new(-2.0, -1.0));
        assert_eq!(clamp_speed(Vec2::new(9.0, 9.0), &max), Vec2::new(0.5, 4.0));
    }

    proptest! {
        #[test]
        fn prop_resistance_decays_monotonically(
            vx in -5.0f32..5.0,
            vy in -5.0f32..5.0,
            rx in 0.01f32..1.0,
            ry in 0.01f32..1.0,
        ) {
            let tuning = Tuning {
                max_speed: Directional::uniform(10.0),
                resistance: Vec2::new(rx, ry),
                ..Tuning::default()
            };
            let mut entity = body(Vec2::new(vx, vy), tuning);
            let sign = Vec2::new(vx.signum(), vy.signum());
            let mut previous = entity.velocity.abs();
            for _ in 0..1000 {
                integrate(&mut entity);
                let current = entity.velocity.abs();
                for axis in 0..2 {
                    prop_assert!(current[axis] < previous[axis] || current[axis] == 0.0);
                    // no sign flip
                    prop_assert!(entity.velocity[axis] * sign[axis] >= 0.0);
                }
                previous = current;
            }
            prop_assert_eq!(entity.velocity, Vec2::ZERO);
        }
    }
}
