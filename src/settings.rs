//! Session settings
//!
//! Every tunable of a session lives here. Loaded from JSON; any field missing
//! from the file falls back to the default game.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::secs_to_ticks;

/// One row of the hostile roster.
///
/// A tier becomes eligible once the session level reaches `min_level`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostileTier {
    pub name: String,
    pub min_level: u32,
    pub health: i32,
    pub points: u64,
    pub speed_min: f32,
    pub speed_max: f32,
}

impl HostileTier {
    pub fn new(name: &str, min_level: u32, health: i32, points: u64, speed: (f32, f32)) -> Self {
        Self {
            name: name.to_string(),
            min_level,
            health,
            points,
            speed_min: speed.0,
            speed_max: speed.1,
        }
    }
}

/// Default roster: scouts from level 1, tougher hulls unlock as levels rise
pub fn default_tiers() -> Vec<HostileTier> {
    vec![
        HostileTier::new("scout", 1, 50, 10, (3.0, 5.0)),
        HostileTier::new("raider", 2, 150, 25, (3.0, 4.5)),
        HostileTier::new("brute", 4, 400, 60, (2.0, 3.0)),
        HostileTier::new("mothership", 6, 900, 150, (1.5, 2.5)),
    ]
}

/// Session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Simulation ticks per second
    pub fps: u32,

    // === Arena ===
    pub arena_radius: f32,
    /// Exclusion zone around the ship for new hostiles
    pub safety_radius: f32,
    /// Draws before the spawner gives up on a placement
    pub spawn_attempts: u32,

    // === Ship ===
    pub ship_start: (f32, f32),
    pub ship_health: u32,
    pub ship_radius: f32,
    pub acceleration: f32,
    pub deceleration: f32,

    // === Weapons ===
    pub projectile_radius: f32,
    pub projectile_thrust: f32,
    /// Ticks before an unspent projectile burns out
    pub projectile_lifespan: u32,
    /// Seconds between shots at fire rate 1.0
    pub fire_base_interval: f32,
    pub fire_rate: f32,
    /// Degrees
    pub spread_cone: f32,

    // === Shield (seconds) ===
    pub shield_duration: f32,
    pub shield_cooldown: f32,

    // === Hostiles ===
    pub hostile_radius: f32,
    pub hostiles_per_level: u32,
    pub max_active_hostiles: usize,
    /// Ticks between pursuit heading updates
    pub pursuit_interval: u64,
    pub tiers: Vec<HostileTier>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,

            arena_radius: ARENA_RADIUS,
            safety_radius: SAFETY_RADIUS,
            spawn_attempts: SPAWN_ATTEMPTS,

            ship_start: (0.0, 0.0),
            ship_health: SHIP_HEALTH,
            ship_radius: SHIP_RADIUS,
            acceleration: SHIP_ACCELERATION,
            deceleration: SHIP_DECELERATION,

            projectile_radius: PROJECTILE_RADIUS,
            projectile_thrust: PROJECTILE_THRUST,
            projectile_lifespan: PROJECTILE_LIFESPAN,
            fire_base_interval: FIRE_BASE_INTERVAL,
            fire_rate: 1.0,
            spread_cone: SPREAD_CONE_DEG,

            shield_duration: SHIELD_DURATION,
            shield_cooldown: SHIELD_COOLDOWN,

            hostile_radius: HOSTILE_RADIUS,
            hostiles_per_level: HOSTILES_PER_LEVEL,
            max_active_hostiles: MAX_ACTIVE_HOSTILES,
            pursuit_interval: PURSUIT_INTERVAL,
            tiers: default_tiers(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document and validate them
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| -> Result<()> { Err(Error::InvalidSettings(msg.to_string())) };

        if self.fps == 0 {
            return invalid("fps must be positive");
        }
        if !(self.arena_radius > 0.0) {
            return invalid("arena_radius must be positive");
        }
        if self.safety_radius < 0.0 || self.safety_radius >= self.arena_radius {
            return invalid("safety_radius must be in [0, arena_radius)");
        }
        if self.ship_radius <= 0.0 || self.hostile_radius <= 0.0 || self.projectile_radius <= 0.0 {
            return invalid("entity radii must be positive");
        }
        if self.ship_health == 0 {
            return invalid("ship_health must be at least 1");
        }
        if !(self.fire_rate > 0.0) {
            return invalid("fire_rate must be positive");
        }
        if self.fire_base_interval < 0.0 || self.shield_duration < 0.0 || self.shield_cooldown < 0.0 {
            return invalid("cooldowns cannot be negative");
        }
        if self.pursuit_interval == 0 {
            return invalid("pursuit_interval must be at least 1");
        }
        if self.max_active_hostiles == 0 {
            return invalid("max_active_hostiles must be at least 1");
        }
        if self.spawn_attempts == 0 {
            return invalid("spawn_attempts must be at least 1");
        }
        if self.tiers.is_empty() {
            return invalid("at least one hostile tier is required");
        }
        if !self.tiers.iter().any(|t| t.min_level <= 1) {
            return invalid("a hostile tier must be available from level 1");
        }
        for tier in &self.tiers {
            if tier.speed_min < 0.0 || tier.speed_min > tier.speed_max {
                return Err(Error::InvalidSettings(format!(
                    "tier '{}' has an invalid speed range",
                    tier.name
                )));
            }
        }
        Ok(())
    }

    /// Total hostiles a level must eliminate or outlast
    pub fn quota(&self, level: u32) -> u32 {
        self.hostiles_per_level.saturating_mul(level)
    }

    /// Fire lock length for a ship firing at `fire_rate` shots per base
    /// interval. Non-positive rates fall back to the session rate.
    pub fn fire_cooldown_ticks(&self, fire_rate: f32) -> u64 {
        let rate = if fire_rate > 0.0 { fire_rate } else { self.fire_rate };
        secs_to_ticks(self.fire_base_interval / rate, self.fps)
    }

    pub fn shield_duration_ticks(&self) -> u64 {
        secs_to_ticks(self.shield_duration, self.fps)
    }

    pub fn shield_cooldown_ticks(&self) -> u64 {
        secs_to_ticks(self.shield_cooldown, self.fps)
    }
}
