//! Simulation settings
//!
//! Data-driven tuning, stored as JSON. Every value is per tick unless the
//! name says otherwise.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::sim::{Directional, Tuning};

/// Defaults for spawned players
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSettings {
    pub health: u32,
    pub tuning: Tuning,
    pub groups: Vec<String>,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            health: PLAYER_HEALTH,
            tuning: Tuning::default(),
            groups: vec!["players".to_owned()],
        }
    }
}

/// Defaults for the projectile factory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileSettings {
    pub velocity: Vec2,
    pub mass: f32,
    pub bounciness: f32,
    /// Large finite cap; projectiles are effectively unconstrained
    pub max_speed: f32,
    /// Never used by input, kept non-negative for validation
    pub acceleration: f32,
    pub groups: Vec<String>,
    /// 1 or 2 projectiles per volley
    pub shots_per_volley: u8,
    /// X offset of the second projectile
    pub second_shot_offset: f32,
}

impl Default for ProjectileSettings {
    fn default() -> Self {
        Self {
            velocity: Vec2::new(PROJECTILE_VELOCITY.0, PROJECTILE_VELOCITY.1),
            mass: 0.5,
            bounciness: 1.0,
            max_speed: PROJECTILE_MAX_SPEED,
            acceleration: 0.0,
            groups: vec!["shots".to_owned()],
            shots_per_volley: 2,
            second_shot_offset: SECOND_SHOT_OFFSET,
        }
    }
}

impl ProjectileSettings {
    /// Zero resistance so the assigned velocity never decays
    pub fn tuning(&self) -> Tuning {
        Tuning {
            max_speed: Directional::uniform(self.max_speed),
            acceleration: Directional::uniform(self.acceleration),
            resistance: Vec2::ZERO,
            mass: self.mass,
            bounciness: self.bounciness,
        }
    }
}

/// Top-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSettings {
    pub ticks_per_second: u32,
    pub fire_cooldown_secs: f32,
    pub declip_margin: f32,
    #[serde(default)]
    pub player: PlayerSettings,
    #[serde(default)]
    pub projectile: ProjectileSettings,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            ticks_per_second: TICKS_PER_SECOND,
            fire_cooldown_secs: FIRE_COOLDOWN_SECS,
            declip_margin: DECLIP_MARGIN,
            player: PlayerSettings::default(),
            projectile: ProjectileSettings::default(),
        }
    }
}

impl SimSettings {
    /// Fire cooldown converted to ticks (rounded up)
    pub fn fire_cooldown_ticks(&self) -> u64 {
        (self.fire_cooldown_secs * self.ticks_per_second as f32).ceil() as u64
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.ticks_per_second == 0 {
            return Err(SimError::InvalidSettings(
                "ticks_per_second must be positive".to_owned(),
            ));
        }
        if !self.fire_cooldown_secs.is_finite() || self.fire_cooldown_secs < 0.0 {
            return Err(SimError::InvalidSettings(format!(
                "fire_cooldown_secs must be non-negative, got {}",
                self.fire_cooldown_secs
            )));
        }
        if !self.declip_margin.is_finite() || self.declip_margin < 0.0 {
            return Err(SimError::InvalidSettings(format!(
                "declip_margin must be non-negative, got {}",
                self.declip_margin
            )));
        }
        if !(1..=2).contains(&self.projectile.shots_per_volley) {
            return Err(SimError::InvalidSettings(format!(
                "shots_per_volley must be 1 or 2, got {}",
                self.projectile.shots_per_volley
            )));
        }
        if !crate::is_finite_vec(self.projectile.velocity) {
            return Err(SimError::InvalidSettings(
                "projectile velocity must be finite".to_owned(),
            ));
        }
        self.player.tuning.validate()?;
        self.projectile.tuning().validate()?;
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
