//! One simulation step
//!
//! Input events are applied first, then every overlapping pair is resolved,
//! and only then is every entity moved. Resolution always sees pre-move state.

use std::collections::BTreeSet;

use super::collision::{detect_overlaps, pair_mut, resolve_collision};
use super::entity::EntityId;
use super::movement::integrate;
use super::player::{InputEvent, PlayerSlot};
use super::state::World;

/// Input events delivered for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub collisions: usize,
    /// Collisions whose de-clip fell back to an axis-only push
    pub declip_fallbacks: usize,
    pub projectiles_fired: usize,
    /// A quit event arrived; the frame driver decides what to do
    pub quit_requested: bool,
}

/// Advance the world by one tick
pub fn tick(world: &mut World, input: &TickInput) -> TickReport {
    let mut report = TickReport::default();
    world.time_ticks += 1;

    apply_input(world, &input.events, &mut report);
    resolve_collisions(world, &mut report);
    move_entities(world);

    report
}

/// Translate key events into flag changes and volleys
pub fn apply_input(world: &mut World, events: &[InputEvent], report: &mut TickReport) {
    for event in events {
        match *event {
            InputEvent::KeyDown(key) => {
                for slot in PlayerSlot::ALL {
                    world.apply_key(slot, key, true);
                }
            }
            InputEvent::KeyUp(key) => {
                for slot in PlayerSlot::ALL {
                    if !world.apply_key(slot, key, false) {
                        continue;
                    }
                    let Some(player) = world.controlled(slot) else {
                        continue;
                    };
                    match world.fire(player) {
                        Ok(shots) => report.projectiles_fired += shots.len(),
                        Err(e) => log::warn!("{:?} could not fire: {}", slot, e),
                    }
                }
            }
            InputEvent::Quit => report.quit_requested = true,
        }
    }
}

/// Resolve every overlapping pair at most once
///
/// Entities are visited in registration order. Once an entity has been
/// visited it is never used as a partner again. A partner is re-checked for
/// overlap before resolving, since an earlier de-clip may already have
/// separated it.
pub fn resolve_collisions(world: &mut World, report: &mut TickReport) {
    let order: Vec<EntityId> = world.groups().order().to_vec();
    let margin = world.settings.declip_margin;
    let mut visited = BTreeSet::new();

    for id in order {
        visited.insert(id);
        let partners = detect_overlaps(world.entities(), world.groups(), id);

        for partner in partners {
            if visited.contains(&partner) {
                continue;
            }
            let (a, b) = pair_mut(world.entities_mut(), id, partner);
            if !a.hitbox.overlaps(&b.hitbox) {
                continue;
            }
            let declip = resolve_collision(a, b, margin);
            world.sync_groups(id);

            report.collisions += 1;
            if declip.is_fallback() {
                report.declip_fallbacks += 1;
            }
        }
    }
}

/// Integrate every entity once and refresh its group hitboxes
pub fn move_entities(world: &mut World) {
    let order: Vec<EntityId> = world.groups().order().to_vec();
    for id in order {
        if let Some(entity) = world.get_mut(id) {
            integrate(entity);
        }
        world.sync_groups(id);
    }
}
