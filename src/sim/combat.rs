//! Combat resolution
//!
//! Colliding pairs are resolved through a (checker kind, other kind) rule
//! table. Pairs without a rule (ship vs projectile, projectile vs projectile)
//! have no effect.

use glam::Vec2;

use super::entity::{EntityId, KindTag};
use super::events::GameEvent;
use super::state::{GamePhase, GameState};

/// Effect of one colliding (checker, other) pair
pub type Rule = fn(&mut GameState, EntityId, EntityId);

const RULES: &[(KindTag, KindTag, Rule)] = &[
    (KindTag::Projectile, KindTag::Hostile, projectile_hits_hostile),
    (KindTag::Ship, KindTag::Hostile, ship_rams_hostile),
];

/// Look up the rule for a kind pair
pub fn rule_for(checker: KindTag, other: KindTag) -> Option<Rule> {
    RULES
        .iter()
        .find(|(c, o, _)| *c == checker && *o == other)
        .map(|(_, _, rule)| *rule)
}

/// Apply every pair in detection order
pub fn resolve(state: &mut GameState, pairs: &[(EntityId, EntityId)]) {
    for &(checker, other) in pairs {
        let kinds = state
            .registry
            .get(checker)
            .zip(state.registry.get(other))
            .map(|(a, b)| (a.kind(), b.kind()));
        let Some((checker_kind, other_kind)) = kinds else {
            log::warn!("Collision pair ({}, {}) refers to a removed entity", checker, other);
            continue;
        };
        if let Some(rule) = rule_for(checker_kind, other_kind) {
            rule(state, checker, other);
        }
    }
}

/// Point between two touching circles, weighted by their radii
fn contact_point(state: &GameState, a: EntityId, b: EntityId) -> Option<Vec2> {
    let a = state.registry.get(a)?;
    let b = state.registry.get(b)?;
    let t = a.radius() / (a.radius() + b.radius());
    Some(a.pos.lerp(b.pos, t))
}

/// The projectile is always spent. Damage lands only on a hostile that has not
/// already been scored; it dies once health drops below zero.
fn projectile_hits_hostile(state: &mut GameState, projectile: EntityId, hostile: EntityId) {
    let damage = state
        .registry
        .get(projectile)
        .and_then(|e| e.as_projectile())
        .map(|p| p.damage)
        .unwrap_or(0);
    let impact = contact_point(state, projectile, hostile);

    if state.registry.mark_for_removal(projectile) {
        if let Some(pos) = impact {
            state.emit(GameEvent::explosion(pos));
        }
    }

    let Some(entity) = state.registry.get_mut(hostile) else {
        return;
    };
    let pos = entity.pos;
    let Some(target) = entity.as_hostile_mut() else {
        return;
    };
    if target.is_dead {
        return;
    }
    target.health -= damage;
    log::trace!("Hostile {} took {} damage, health {}", hostile, damage, target.health);
    if target.health >= 0 {
        return;
    }
    target.is_dead = true;
    let points = target.points;

    state.registry.mark_for_removal(hostile);
    state.registry.untrack_hostile(hostile);
    state.score += points;
    state.eliminated += 1;
    state.emit(GameEvent::explosion(pos));
    log::debug!(
        "Hostile {} destroyed (+{}), score {}, eliminated {}",
        hostile,
        points,
        state.score,
        state.eliminated
    );
}

/// The hostile is always destroyed without scoring. An active shield absorbs
/// the hit and collapses; otherwise the ship loses one health.
fn ship_rams_hostile(state: &mut GameState, ship: EntityId, hostile: EntityId) {
    let impact = contact_point(state, ship, hostile);

    if let Some(target) = state.registry.get_mut(hostile).and_then(|e| e.as_hostile_mut()) {
        target.is_dead = true;
    }
    state.registry.mark_for_removal(hostile);
    state.registry.untrack_hostile(hostile);
    if let Some(pos) = impact {
        state.emit(GameEvent::explosion(pos));
    }

    let Some(craft) = state.registry.get_mut(ship).and_then(|e| e.as_ship_mut()) else {
        return;
    };
    if craft.shield.is_active() {
        craft.shield.break_now();
        log::debug!("Shield absorbed hostile {}", hostile);
        return;
    }
    craft.health = craft.health.saturating_sub(1);
    let health = craft.health;
    state.emit(GameEvent::ShipHit { health });
    log::debug!("Ship rammed by hostile {}, health {}", hostile, health);

    if health == 0 {
        state.finish(GamePhase::Defeat);
    }
}
