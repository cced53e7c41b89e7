//! Simulation world
//!
//! Owns every entity in a dense vector indexed by `EntityId`, plus the group
//! index and the tick clock. Entities are never destroyed, so ids stay valid
//! for the life of the world.

use glam::Vec2;
use serde::Serialize;

use super::entity::{Entity, EntityId, EntityKind, EntitySpec, Rect, Sprite};
use super::groups::GroupIndex;
use super::player::{ControlScheme, Key, PlayerData, PlayerSlot, volley_positions};
use super::projectile::projectile_spec;
use crate::error::SimError;
use crate::settings::SimSettings;

/// Read-only view handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawItem {
    pub id: EntityId,
    pub position: Vec2,
    pub hitbox: Rect,
    pub sprite: Sprite,
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize)]
pub struct World {
    pub settings: SimSettings,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Dense storage; `entities[id.0]` has id `id`
    entities: Vec<Entity>,
    groups: GroupIndex,
    /// Player entity bound to each control slot
    controlled: [Option<EntityId>; 2],
}

impl World {
    /// Create an empty world. Fails if the settings are invalid.
    pub fn new(settings: SimSettings) -> Result<Self, SimError> {
        settings.validate()?;
        log::info!(
            "World created: {} ticks/s, fire cooldown {} ticks",
            settings.ticks_per_second,
            settings.fire_cooldown_ticks()
        );
        Ok(Self {
            settings,
            time_ticks: 0,
            entities: Vec::new(),
            groups: GroupIndex::new(),
            controlled: [None; 2],
        })
    }

    fn next_entity_id(&self) -> EntityId {
        EntityId(self.entities.len() as u32)
    }

    /// Validate, create and register an entity
    pub fn spawn(&mut self, spec: EntitySpec) -> Result<EntityId, SimError> {
        self.spawn_kind(spec, EntityKind::Body)
    }

    fn spawn_kind(&mut self, spec: EntitySpec, kind: EntityKind) -> Result<EntityId, SimError> {
        let id = self.next_entity_id();
        let entity = Entity::from_spec(id, spec, kind)?;
        self.groups.register(id, entity.hitbox, &entity.groups);
        log::debug!(
            "Spawned {} {} at ({:.1}, {:.1}) groups={:?}",
            id,
            entity.name,
            entity.position.x,
            entity.position.y,
            entity.groups
        );
        self.entities.push(entity);
        Ok(id)
    }

    /// Spawn a player and bind it to a control slot
    ///
    /// A later player spawned into the same slot takes over its controls.
    pub fn spawn_player(
        &mut self,
        slot: PlayerSlot,
        spec: EntitySpec,
        projectile_sprite: Sprite,
    ) -> Result<EntityId, SimError> {
        let data = PlayerData::new(slot, self.settings.player.health, projectile_sprite);
        let id = self.spawn_kind(spec, EntityKind::Player(data))?;
        self.controlled[slot.index()] = Some(id);
        log::info!("Player {:?} bound to {}", slot, id);
        Ok(id)
    }

    /// Spawn a player using the default player tuning and groups
    pub fn spawn_default_player(
        &mut self,
        slot: PlayerSlot,
        name: &str,
        position: Vec2,
        sprite: Sprite,
        projectile_sprite: Sprite,
    ) -> Result<EntityId, SimError> {
        let defaults = &self.settings.player;
        let spec = EntitySpec::new(name, position, sprite, defaults.tuning)
            .with_groups(defaults.groups.iter().map(String::as_str));
        self.spawn_player(slot, spec, projectile_sprite)
    }

    /// Projectile factory: default velocity and tuning from settings
    pub fn spawn_projectile(&mut self, position: Vec2, sprite: Sprite) -> Result<EntityId, SimError> {
        let spec = projectile_spec(position, sprite, &self.settings.projectile);
        self.spawn_kind(spec, EntityKind::Projectile)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.index())
    }

    pub fn entity(&self, id: EntityId) -> Result<&Entity, SimError> {
        self.get(id).ok_or(SimError::UnknownEntity(id))
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub(crate) fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn groups(&self) -> &GroupIndex {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn controlled(&self, slot: PlayerSlot) -> Option<EntityId> {
        self.controlled[slot.index()]
    }

    /// Push an entity's authoritative hitbox into every group it belongs to
    pub fn sync_groups(&mut self, id: EntityId) {
        if let Some(entity) = self.entities.get(id.index()) {
            self.groups.update_hitbox(id, entity.hitbox, &entity.groups);
        }
    }

    /// Apply one key transition to the player bound to `slot`
    ///
    /// Returns `true` when the transition is a fire request.
    pub fn apply_key(&mut self, slot: PlayerSlot, key: Key, pressed: bool) -> bool {
        let Some(id) = self.controlled[slot.index()] else {
            return false;
        };
        let Some(entity) = self.entities.get_mut(id.index()) else {
            return false;
        };
        ControlScheme::for_slot(slot).apply(&mut entity.move_direction, key, pressed)
    }

    /// Fire a volley from `player` if its cooldown has elapsed
    ///
    /// Returns the spawned projectile ids (empty while cooling down).
    pub fn fire(&mut self, player: EntityId) -> Result<Vec<EntityId>, SimError> {
        let now = self.time_ticks;
        let cooldown = self.settings.fire_cooldown_ticks();
        let entity = self.get(player).ok_or(SimError::UnknownEntity(player))?;
        let data = entity.player().ok_or(SimError::NotAPlayer(player))?;
        if !data.can_fire(now, cooldown) {
            log::debug!("{} fire ignored, cooling down", player);
            return Ok(Vec::new());
        }

        let sprite = data.projectile_sprite;
        let positions = volley_positions(
            entity.position,
            self.settings.projectile.shots_per_volley,
            self.settings.projectile.second_shot_offset,
        );

        let mut spawned = Vec::with_capacity(positions.len());
        for position in positions {
            spawned.push(self.spawn_projectile(position, sprite)?);
        }
        if let Some(data) = self.get_mut(player).and_then(Entity::player_mut) {
            data.mark_fired(now);
        }
        log::debug!("{} fired {} projectile(s) at tick {}", player, spawned.len(), now);
        Ok(spawned)
    }

    /// Renderer view in registration order
    pub fn render_list(&self) -> impl Iterator<Item = DrawItem> + '_ {
        self.groups.order().iter().filter_map(|id| {
            self.get(*id).map(|e| DrawItem {
                id: e.id,
                position: e.position,
                hitbox: e.hitbox,
                sprite: e.sprite,
            })
        })
    }

    /// JSON snapshot for debugging
    pub fn snapshot_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Tuning;

    fn sprite() -> Sprite {
        Sprite::new(1, 50.0, 50.0)
    }

    fn shot_sprite() -> Sprite {
        Sprite::new(2, 8.0, 16.0)
    }

    fn world() -> World {
        World::new(SimSettings::default()).unwrap()
    }

    #[test]
    fn test_spawn_registers_in_order_and_groups() {
        let mut world = world();
        let a = world
            .spawn(EntitySpec::new("a", Vec2::ZERO, sprite(), Tuning::default()).with_groups(["x"]))
            .unwrap();
        let b = world
            .spawn(EntitySpec::new("b", Vec2::ONE, sprite(), Tuning::default()))
            .unwrap();
        assert_eq!(a, EntityId(0));
        assert_eq!(b, EntityId(1));
        assert_eq!(world.groups().order(), &[a, b]);
        assert_eq!(world.groups().groups_of(a).len(), 1);
        assert!(world.groups().groups_of(b).is_empty());
    }

    #[test]
    fn test_invalid_spawn_leaves_world_unchanged() {
        let mut world = world();
        let mut tuning = Tuning::default();
        tuning.acceleration.down = -0.1;
        let result = world.spawn(EntitySpec::new("bad", Vec2::ZERO, sprite(), tuning));
        assert!(result.is_err());
        assert!(world.is_empty());
        assert!(world.groups().is_empty());
    }

    #[test]
    fn test_apply_key_routes_by_slot() {
        let mut world = world();
        let one = world
            .spawn_default_player(PlayerSlot::One, "p1", Vec2::ZERO, sprite(), shot_sprite())
            .unwrap();
        let two = world
            .spawn_default_player(PlayerSlot::Two, "p2", Vec2::new(200.0, 0.0), sprite(), shot_sprite())
            .unwrap();

        world.apply_key(PlayerSlot::One, Key::A, true);
        world.apply_key(PlayerSlot::Two, Key::Down, true);
        assert!(world.entity(one).unwrap().move_direction.left);
        assert!(!world.entity(one).unwrap().move_direction.down);
        assert!(world.entity(two).unwrap().move_direction.down);
    }

    #[test]
    fn test_fire_spawns_volley_and_respects_cooldown() {
        let mut world = world();
        let player = world
            .spawn_default_player(PlayerSlot::One, "p1", Vec2::new(300.0, 300.0), sprite(), shot_sprite())
            .unwrap();

        let shots = world.fire(player).unwrap();
        assert_eq!(shots.len(), 2);
        assert_eq!(world.entity(shots[0]).unwrap().position, Vec2::new(300.0, 300.0));
        assert_eq!(world.entity(shots[1]).unwrap().position, Vec2::new(325.0, 300.0));
        assert_eq!(world.entity(shots[0]).unwrap().velocity, Vec2::new(0.0, -10.0));
        assert!(world.entity(shots[1]).unwrap().is_projectile());

        world.time_ticks = 199;
        assert!(world.fire(player).unwrap().is_empty());
        world.time_ticks = 200;
        assert_eq!(world.fire(player).unwrap().len(), 2);
        assert_eq!(world.len(), 5);
    }

    #[test]
    fn test_fire_from_non_player_fails() {
        let mut world = world();
        let body = world
            .spawn(EntitySpec::new("crate", Vec2::ZERO, sprite(), Tuning::default()))
            .unwrap();
        assert!(matches!(world.fire(body), Err(SimError::NotAPlayer(_))));
        assert!(matches!(
            world.fire(EntityId(99)),
            Err(SimError::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_render_list_follows_registration() {
        let mut world = world();
        world
            .spawn(EntitySpec::new("a", Vec2::new(1.0, 2.0), sprite(), Tuning::default()))
            .unwrap();
        world.spawn_projectile(Vec2::new(5.0, 5.0), shot_sprite()).unwrap();
        let items: Vec<_> = world.render_list().collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].position, Vec2::new(1.0, 2.0));
        assert_eq!(items[1].sprite.id, 2);
    }

    #[test]
    fn test_snapshot_is_json() {
        let mut world = world();
        world
            .spawn_default_player(PlayerSlot::One, "p1", Vec2::ZERO, sprite(), shot_sprite())
            .unwrap();
        let json = world.snapshot_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["time_ticks"], 0);
        assert_eq!(value["entities"][0]["name"], "p1");
    }
}
