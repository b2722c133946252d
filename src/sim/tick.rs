//! Fixed timestep simulation tick
//!
//! One tick, in order:
//! 1. advance every live entity (drag/thrust, pursuit, projectile aging)
//! 2. detect and resolve collisions
//! 3. purge dead entities
//! 4. replenish hostiles while under quota and under the concurrency cap
//! 5. check for victory: the field is empty and the quota is eliminated
//!
//! Input commands (`submit_*`) are applied between ticks.

use glam::Vec2;

use super::collision::{self, inside_arena};
use super::combat;
use super::cooldown;
use super::entity::{Body, Direction, Entity, EntityId, Projectile, WeaponId};
use super::events::GameEvent;
use super::spawn;
use super::state::{GamePhase, GameState};
use crate::{heading, normalize_angle};

/// Advance the session by one tick. No-op once the session is over.
pub fn tick(state: &mut GameState) {
    if state.is_finished() {
        return;
    }

    state.time_ticks += 1;

    advance_entities(state);

    let pairs = collision::detect(&state.registry);
    if !pairs.is_empty() {
        log::trace!("Tick {}: {} colliding pairs", state.time_ticks, pairs.len());
    }
    combat::resolve(state, &pairs);

    state.registry.cleanup();

    if !state.phase.is_terminal() {
        replenish(state);
    }

    // An empty field after a failed spawn is not a win; keep playing and retry
    if state.registry.hostiles().is_empty() && state.eliminated >= state.quota() {
        state.finish(GamePhase::Victory);
    }
}

/// Why an entity left play during the advance step
enum Expiry {
    BurntOut,
    OutOfBounds,
}

fn advance_entities(state: &mut GameState) {
    let now = state.time_ticks;
    let settings = &state.settings;
    let arena = settings.arena_radius;
    let retarget = now % settings.pursuit_interval == 0;
    let ship_pos = state
        .registry
        .get(state.ship_id())
        .map(|e| (e.id, e.pos));

    let mut expired: Vec<(EntityId, Expiry, Vec2)> = Vec::new();

    for entity in state.registry.all_mut() {
        if !entity.alive {
            continue;
        }
        let radius = entity.radius();
        match &mut entity.body {
            Body::Ship(ship) => {
                ship.shield.refresh(now);
                entity.vel = ship.steer(entity.vel, settings.acceleration, settings.deceleration);
                entity.pos += entity.vel;
                // Bounce back toward the centre instead of leaving the arena
                if !inside_arena(entity.pos, arena - radius) {
                    entity.vel = -entity.pos.normalize_or_zero();
                }
            }
            Body::Hostile(hostile) => {
                if retarget {
                    let target = hostile
                        .target
                        .and_then(|id| ship_pos.filter(|(ship_id, _)| *ship_id == id));
                    match target {
                        Some((_, target_pos)) => entity.vel = hostile.pursue(entity.pos, target_pos),
                        None => log::trace!("Hostile {} has no target, coasting", entity.id),
                    }
                }
                entity.pos += entity.vel;
                if !inside_arena(entity.pos, arena) {
                    // Never scored: it left the field
                    hostile.is_dead = true;
                    expired.push((entity.id, Expiry::OutOfBounds, entity.pos));
                }
            }
            Body::Projectile(projectile) => {
                entity.pos += entity.vel;
                projectile.age += 1;
                if cooldown::expired(projectile.age, settings.projectile_lifespan) {
                    expired.push((entity.id, Expiry::BurntOut, entity.pos));
                } else if !inside_arena(entity.pos, arena) {
                    expired.push((entity.id, Expiry::OutOfBounds, entity.pos));
                }
            }
        }
    }

    for (id, reason, pos) in expired {
        let is_hostile = state
            .registry
            .get(id)
            .is_some_and(|e| e.as_hostile().is_some());
        state.registry.mark_for_removal(id);
        if is_hostile {
            state.registry.untrack_hostile(id);
            log::debug!("Hostile {} left the arena", id);
        } else {
            state.emit(GameEvent::explosion(pos));
            if let Expiry::BurntOut = reason {
                log::trace!("Projectile {} burnt out", id);
            }
        }
    }
}

/// Top the field back up to the concurrency cap without exceeding the quota
fn replenish(state: &mut GameState) {
    let active = state.registry.hostiles().len();
    let accounted = active as u64 + state.eliminated as u64;
    if accounted < state.quota() as u64 && active < state.settings.max_active_hostiles {
        spawn::spawn_hostile(state);
    }
}

// === Input commands ===

impl GameState {
    /// Advance one tick
    pub fn tick(&mut self) {
        tick(self);
    }

    /// Set or clear one movement flag
    pub fn submit_movement(&mut self, direction: Direction, pressed: bool) {
        if let Some(ship) = self.ship_mut() {
            ship.intent.set(direction, pressed);
        }
    }

    /// Point the ship (radians)
    pub fn submit_aim(&mut self, angle: f32) {
        if let Some(ship) = self.ship_mut() {
            ship.facing = normalize_angle(angle);
        }
    }

    pub fn submit_weapon_select(&mut self, weapon: WeaponId) {
        if let Some(ship) = self.ship_mut() {
            if ship.weapon != weapon {
                log::debug!("Weapon switched to {}", weapon.as_str());
            }
            ship.weapon = weapon;
        }
    }

    /// Raise the shield. No-op while it is cooling down or the session is over.
    pub fn submit_shield_toggle(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        let now = self.time_ticks;
        let duration = self.settings.shield_duration_ticks();
        let cooldown = self.settings.shield_cooldown_ticks();
        let raised = self
            .ship_mut()
            .is_some_and(|ship| ship.shield.activate(now, duration, cooldown));
        if raised {
            self.emit(GameEvent::ShieldRaised);
            log::debug!("Shield raised at tick {}", now);
        }
        raised
    }

    /// Fire a volley along the ship's facing. No-op while the fire lock is
    /// held or the session is over. Returns the ids of the new projectiles.
    pub fn submit_fire(&mut self) -> Vec<EntityId> {
        if self.is_finished() {
            return Vec::new();
        }
        let now = self.time_ticks;
        let Some(ship_entity) = self.ship_entity() else {
            return Vec::new();
        };
        let origin = ship_entity.pos;
        let ship_vel = ship_entity.vel;
        let lock = match ship_entity.as_ship() {
            Some(ship) => self.settings.fire_cooldown_ticks(ship.fire_rate),
            None => return Vec::new(),
        };

        let Some(ship) = self.ship_mut() else {
            return Vec::new();
        };
        if !ship.fire.try_lock(now, lock) {
            return Vec::new();
        }
        let weapon = ship.weapon;
        let facing = ship.facing;

        let offsets = volley_offsets(self.level, self.settings.spread_cone.to_radians());
        let speed = self.settings.projectile_thrust - weapon.slowdown();
        let radius = self.settings.projectile_radius;

        let mut fired = Vec::with_capacity(offsets.len());
        for offset in offsets {
            let id = self.registry.next_entity_id();
            let vel = ship_vel + heading(facing + offset) * speed;
            let projectile = Projectile {
                damage: weapon.damage(),
                age: 0,
                weapon,
            };
            self.registry.add(
                Entity::new(id, origin, radius, Body::Projectile(projectile)).with_velocity(vel),
            );
            fired.push(id);
        }

        self.emit(GameEvent::ProjectileFired {
            weapon,
            count: fired.len() as u32,
        });
        log::trace!("Fired {} x {} at tick {}", fired.len(), weapon.as_str(), now);
        fired
    }
}

/// Angular offsets (radians) for a volley of `count` rounds fanned across `cone`.
///
/// Round i of n (1-based) sits at `-cone/2 + i * cone / (n + 1)`, so a single
/// round flies straight and larger volleys stay symmetric.
pub fn volley_offsets(count: u32, cone: f32) -> Vec<f32> {
    let count = count.max(1);
    let step = cone / (count + 1) as f32;
    (1..=count).map(|i| -cone / 2.0 + i as f32 * step).collect()
}
