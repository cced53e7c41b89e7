//! Projectile factory
//!
//! Projectiles never receive directional input; they keep whatever velocity
//! they are given because their resistance is zero.

use glam::Vec2;

use super::entity::{EntitySpec, Sprite};
use crate::settings::ProjectileSettings;

/// Build the `EntitySpec` for a projectile at `position`
///
/// The velocity defaults to the settings value; callers may overwrite
/// `velocity` on the returned spec or on the entity after spawning.
pub fn projectile_spec(position: Vec2, sprite: Sprite, settings: &ProjectileSettings) -> EntitySpec {
    EntitySpec::new("projectile", position, sprite, settings.tuning())
        .with_velocity(settings.velocity)
        .with_groups(settings.groups.iter().map(String::as_str))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Entity, EntityId, EntityKind};
    use crate::sim::groups::GroupId;
    use crate::sim::movement::integrate;

    #[test]
    fn test_projectile_keeps_velocity() {
        let settings = ProjectileSettings::default();
        let spec = projectile_spec(Vec2::new(10.0, 100.0), Sprite::new(7, 8.0, 16.0), &settings);
        let mut shot = Entity::from_spec(EntityId(3), spec, EntityKind::Projectile).unwrap();

        for _ in 0..10 {
            integrate(&mut shot);
        }
        assert_eq!(shot.velocity, Vec2::new(0.0, -10.0));
        assert_eq!(shot.position, Vec2::new(10.0, 0.0));
        assert!(shot.is_projectile());
        assert!(shot.groups.contains(&GroupId::from("shots")));
    }

    #[test]
    fn test_fast_override_is_not_clamped() {
        let settings = ProjectileSettings::default();
        let spec = projectile_spec(Vec2::ZERO, Sprite::new(7, 8.0, 8.0), &settings)
            .with_velocity(Vec2::new(250.0, 0.0));
        let mut shot = Entity::from_spec(EntityId(0), spec, EntityKind::Projectile).unwrap();
        integrate(&mut shot);
        assert_eq!(shot.velocity, Vec2::new(250.0, 0.0));
    }
}
