//! Player extension data and input translation
//!
//! Maps discrete key events onto directional flags and fire requests. No
//! physics happens here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{MoveDirection, Sprite};

/// Keys the core understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    Up,
    Down,
    Left,
    Right,
    Enter,
}

/// Discrete event from the input collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Window closed; the frame driver decides what to do with it
    Quit,
}

/// Which of the two controlled players a scheme drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }
}

/// Four movement keys plus a fire key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlScheme {
    pub up: Key,
    pub down: Key,
    pub left: Key,
    pub right: Key,
    pub fire: Key,
}

impl ControlScheme {
    pub const fn for_slot(slot: PlayerSlot) -> Self {
        match slot {
            PlayerSlot::One => Self {
                up: Key::W,
                down: Key::S,
                left: Key::A,
                right: Key::D,
                fire: Key::Space,
            },
            PlayerSlot::Two => Self {
                up: Key::Up,
                down: Key::Down,
                left: Key::Left,
                right: Key::Right,
                fire: Key::Enter,
            },
        }
    }

    /// Update movement flags for one key transition
    ///
    /// Returns `true` when the event is a fire-key release.
    pub fn apply(&self, flags: &mut MoveDirection, key: Key, pressed: bool) -> bool {
        if key == self.up {
            flags.up = pressed;
        } else if key == self.down {
            flags.down = pressed;
        } else if key == self.left {
            flags.left = pressed;
        } else if key == self.right {
            flags.right = pressed;
        } else if key == self.fire {
            return !pressed;
        }
        false
    }
}

/// State a player carries on top of the shared entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    pub slot: PlayerSlot,
    /// Stored only; nothing in the core decrements it yet
    pub health: u32,
    /// Tick of the last volley, `None` until the first shot
    pub last_fire_tick: Option<u64>,
    pub projectile_sprite: Sprite,
}

impl PlayerData {
    pub fn new(slot: PlayerSlot, health: u32, projectile_sprite: Sprite) -> Self {
        Self {
            slot,
            health,
            last_fire_tick: None,
            projectile_sprite,
        }
    }

    pub fn can_fire(&self, now: u64, cooldown_ticks: u64) -> bool {
        match self.last_fire_tick {
            None => true,
            Some(last) => now.saturating_sub(last) >= cooldown_ticks,
        }
    }

    pub fn mark_fired(&mut self, now: u64) {
        self.last_fire_tick = Some(now);
    }
}

/// Spawn points for one volley starting at `origin`
pub fn volley_positions(origin: Vec2, shots: u8, offset: f32) -> Vec<Vec2> {
    (0..shots.min(2))
        .map(|i| origin + Vec2::new(offset * i as f32, 0.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_and_release_toggle_flags() {
        let scheme = ControlScheme::for_slot(PlayerSlot::One);
        let mut flags = MoveDirection::default();

        assert!(!scheme.apply(&mut flags, Key::W, true));
        assert!(!scheme.apply(&mut flags, Key::D, true));
        assert!(flags.up && flags.right);

        scheme.apply(&mut flags, Key::W, false);
        assert!(!flags.up);
        assert!(flags.right);
    }

    #[test]
    fn test_other_players_keys_ignored() {
        let scheme = ControlScheme::for_slot(PlayerSlot::One);
        let mut flags = MoveDirection::default();
        assert!(!scheme.apply(&mut flags, Key::Up, true));
        assert!(!scheme.apply(&mut flags, Key::Enter, false));
        assert!(!flags.any());
    }

    #[test]
    fn test_fire_on_release_only() {
        let scheme = ControlScheme::for_slot(PlayerSlot::Two);
        let mut flags = MoveDirection::default();
        assert!(!scheme.apply(&mut flags, Key::Enter, true));
        assert!(scheme.apply(&mut flags, Key::Enter, false));
    }

    #[test]
    fn test_cooldown() {
        let mut data = PlayerData::new(PlayerSlot::One, 100, Sprite::new(1, 8.0, 8.0));
        assert!(data.can_fire(0, 200));
        data.mark_fired(10);
        assert!(!data.can_fire(209, 200));
        assert!(data.can_fire(210, 200));
    }

    #[test]
    fn test_volley_positions() {
        let origin = Vec2::new(100.0, 50.0);
        assert_eq!(volley_positions(origin, 1, 25.0), vec![origin]);
        assert_eq!(
            volley_positions(origin, 2, 25.0),
            vec![origin, Vec2::new(125.0, 50.0)]
        );
    }
}
