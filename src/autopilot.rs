//! Idle/demo mode - an AI that plays a session
//!
//! Issues the same commands an input layer would: aim at the nearest hostile,
//! fire whenever the gun is ready, pick a heavier weapon for tougher hulls,
//! back away from anything closing in and raise the shield when it gets close.

use glam::Vec2;

use crate::angle_to;
use crate::sim::{Direction, GameState, WeaponId};

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Raise the shield when a hostile is this close (centre to centre)
    pub shield_range: f32,
    /// Back away from hostiles inside this range
    pub flee_range: f32,
    /// Ticks of target motion to lead by
    pub lead_ticks: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            shield_range: 200.0,
            flee_range: 600.0,
            lead_ticks: 4.0,
        }
    }
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue this tick's commands
    pub fn drive(&mut self, state: &mut GameState) {
        if state.is_finished() {
            return;
        }
        let Some(ship_pos) = state.ship_pos() else {
            return;
        };

        // Find the most dangerous hostile (closest to the ship)
        let nearest = state
            .registry
            .hostiles()
            .iter()
            .filter_map(|&id| state.registry.get(id))
            .filter(|e| e.alive)
            .min_by(|a, b| {
                a.pos
                    .distance_squared(ship_pos)
                    .partial_cmp(&b.pos.distance_squared(ship_pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|e| (e.pos, e.vel, e.as_hostile().map_or(0, |h| h.health)));

        let Some((target_pos, target_vel, target_health)) = nearest else {
            self.hold(state);
            return;
        };
        let distance = target_pos.distance(ship_pos);

        // Lead the target slightly
        let aim_point = target_pos + target_vel * self.lead_ticks;
        state.submit_aim(angle_to(ship_pos, aim_point));
        state.submit_weapon_select(weapon_for(target_health));

        if distance < self.shield_range {
            state.submit_shield_toggle();
        }

        let now = state.time_ticks;
        if state.ship().is_some_and(|s| s.can_fire(now)) {
            state.submit_fire();
        }

        if distance < self.flee_range {
            self.thrust(state, ship_pos - target_pos);
        } else {
            self.hold(state);
        }
    }

    /// Release every movement key
    fn hold(&self, state: &mut GameState) {
        self.thrust(state, Vec2::ZERO);
    }

    /// Hold the keys that best match `dir`
    fn thrust(&self, state: &mut GameState, dir: Vec2) {
        let dir = dir.normalize_or_zero();
        state.submit_movement(Direction::Right, dir.x > 0.3);
        state.submit_movement(Direction::Left, dir.x < -0.3);
        state.submit_movement(Direction::Up, dir.y > 0.3);
        state.submit_movement(Direction::Down, dir.y < -0.3);
    }
}

/// Cheapest weapon that one-shots a hull of `health`
pub fn weapon_for(health: i32) -> WeaponId {
    WeaponId::ALL
        .into_iter()
        .find(|w| w.damage() > health)
        .unwrap_or(WeaponId::Ultimate)
}
