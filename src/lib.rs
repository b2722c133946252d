//! UFO Arena - a circular arena arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, combat, spawning, game state)
//! - `settings`: Data-driven tuning for a session
//! - `autopilot`: Demo driver that plays a session on its own
//!
//! Rendering, input capture and audio live outside this crate. They drive a
//! [`sim::GameState`] through its `submit_*` methods and `tick`, and consume
//! the [`sim::GameEvent`]s it emits.

pub mod autopilot;
pub mod error;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::{HostileTier, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Default simulation rate (ticks per second)
    pub const DEFAULT_FPS: u32 = 60;
    /// Maximum ticks issued per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions
    pub const ARENA_RADIUS: f32 = 3000.0;
    /// No hostile may spawn closer than this to the ship
    pub const SAFETY_RADIUS: f32 = 2000.0;

    /// Ship defaults
    pub const SHIP_RADIUS: f32 = 50.0;
    pub const SHIP_HEALTH: u32 = 3;
    pub const SHIP_ACCELERATION: f32 = 0.1;
    pub const SHIP_DECELERATION: f32 = 0.04;

    /// Hostile defaults
    pub const HOSTILE_RADIUS: f32 = 40.0;
    pub const HOSTILES_PER_LEVEL: u32 = 10;
    pub const MAX_ACTIVE_HOSTILES: usize = 9;
    /// Pursuit heading is recomputed every N ticks
    pub const PURSUIT_INTERVAL: u64 = 2;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 10.0;
    pub const PROJECTILE_THRUST: f32 = 20.3;
    /// Ticks a projectile lives before it burns out
    pub const PROJECTILE_LIFESPAN: u32 = 80;
    /// Spread cone for multi-projectile volleys (degrees)
    pub const SPREAD_CONE_DEG: f32 = 30.0;

    /// Cooldowns (seconds)
    pub const FIRE_BASE_INTERVAL: f32 = 0.25;
    pub const SHIELD_DURATION: f32 = 5.0;
    pub const SHIELD_COOLDOWN: f32 = 15.0;

    /// Rejection sampling gives up after this many draws
    pub const SPAWN_ATTEMPTS: u32 = 10_000;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along `angle` (radians)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle (radians) of the vector from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Convert ticks-per-second and a duration in seconds to whole ticks (rounded up)
#[inline]
pub fn secs_to_ticks(secs: f32, fps: u32) -> u64 {
    let ticks = secs * fps as f32;
    // Absorb f32 noise so 0.25 / 3.0 * 60 lands on 5, not 6
    let nearest = ticks.round();
    let ticks = if (ticks - nearest).abs() < 1e-3 { nearest } else { ticks.ceil() };
    ticks.max(0.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(-3.0 * PI) - (-PI)).abs() < 1e-5);
        assert!((normalize_angle(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_angle_to_and_heading() {
        let a = angle_to(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((a - PI / 2.0).abs() < 1e-6);
        let h = heading(a);
        assert!(h.x.abs() < 1e-6);
        assert!((h.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_secs_to_ticks_rounds_up() {
        assert_eq!(secs_to_ticks(15.0, 60), 900);
        assert_eq!(secs_to_ticks(0.01, 60), 1);
        assert_eq!(secs_to_ticks(0.0, 60), 0);
        assert_eq!(secs_to_ticks(0.25 / 3.0, 60), 5);
    }
}
