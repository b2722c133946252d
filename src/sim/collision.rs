//! Pairwise collision detection
//!
//! Every checker (ship, projectiles) is tested against every entity in the
//! registry. No broad phase and no early exit: one projectile overlapping three
//! hostiles yields three pairs, one hostile overlapped by two projectiles
//! yields two.

use glam::Vec2;

use super::entity::{Entity, EntityId};
use super::registry::Registry;

/// Circle-circle overlap. Touching circles count as overlapping.
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    let reach = a_radius + b_radius;
    a_pos.distance_squared(b_pos) <= reach * reach
}

#[inline]
pub fn entities_overlap(a: &Entity, b: &Entity) -> bool {
    circles_overlap(a.pos, a.radius(), b.pos, b.radius())
}

/// Is the entity's centre inside a circular arena of `radius` around the origin?
#[inline]
pub fn inside_arena(pos: Vec2, radius: f32) -> bool {
    pos.length_squared() <= radius * radius
}

/// Ordered (checker, other) pairs for this tick
pub fn detect(registry: &Registry) -> Vec<(EntityId, EntityId)> {
    let mut pairs = Vec::new();
    for checker_id in registry.active_checkers() {
        let Some(checker) = registry.get(checker_id) else {
            continue;
        };
        for other in registry.all() {
            if other.id == checker_id {
                continue;
            }
            if entities_overlap(checker, other) {
                pairs.push((checker_id, other.id));
            }
        }
    }
    pairs
}
