//! Collision group registry
//!
//! Maps each group to its members' current hitboxes and keeps the flat
//! registration order used for deterministic iteration.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::entity::{EntityId, Rect};

/// Name of a collision group
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupId {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl From<String> for GroupId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Group membership plus the ordered list of live entities
///
/// Entities are never removed, so an id stays valid for the life of the index.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupIndex {
    groups: BTreeMap<GroupId, BTreeMap<EntityId, Rect>>,
    order: Vec<EntityId>,
}

impl GroupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new entity in the live list and in each of its groups
    pub fn register<'a>(
        &mut self,
        id: EntityId,
        hitbox: Rect,
        groups: impl IntoIterator<Item = &'a GroupId>,
    ) {
        self.order.push(id);
        for group in groups {
            self.groups
                .entry(group.clone())
                .or_default()
                .insert(id, hitbox);
        }
    }

    /// Refresh the stored hitbox of `id` in every group it belongs to
    pub fn update_hitbox<'a>(
        &mut self,
        id: EntityId,
        hitbox: Rect,
        groups: impl IntoIterator<Item = &'a GroupId>,
    ) {
        for group in groups {
            if let Some(members) = self.groups.get_mut(group) {
                members.insert(id, hitbox);
            }
        }
    }

    /// Live entities in registration order
    pub fn order(&self) -> &[EntityId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn members(&self, group: &GroupId) -> Option<&BTreeMap<EntityId, Rect>> {
        self.groups.get(group)
    }

    /// Union of member hitboxes across `groups`, excluding `exclude`
    pub fn candidates<'a>(
        &self,
        groups: impl IntoIterator<Item = &'a GroupId>,
        exclude: EntityId,
    ) -> BTreeMap<EntityId, Rect> {
        let mut union = BTreeMap::new();
        for group in groups {
            if let Some(members) = self.groups.get(group) {
                union.extend(members.iter().map(|(id, rect)| (*id, *rect)));
            }
        }
        union.remove(&exclude);
        union
    }

    /// Groups that currently list `id` as a member
    pub fn groups_of(&self, id: EntityId) -> BTreeSet<&GroupId> {
        self.groups
            .iter()
            .filter(|(_, members)| members.contains_key(&id))
            .map(|(group, _)| group)
            .collect()
    }
}
