//! Entity registry
//!
//! Owns every live entity, the pending-removal set and the hostile tracking
//! list. Removal is deferred: a marked entity stays visible to every query
//! until `cleanup` runs at the end of resolution.

use super::entity::{Entity, EntityId, KindTag};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Sorted by id (ids are allocated monotonically and appended)
    entities: Vec<Entity>,
    /// Marked for removal at the next cleanup
    pending: Vec<EntityId>,
    /// Hostiles that still count toward victory
    hostiles: Vec<EntityId>,
    next_id: EntityId,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert an entity. Hostiles are tracked automatically.
    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        if entity.kind() == KindTag::Hostile {
            self.hostiles.push(id);
        }
        if self.entities.last().is_some_and(|last| last.id > id) {
            let at = self.entities.partition_point(|e| e.id < id);
            self.entities.insert(at, entity);
        } else {
            self.entities.push(entity);
        }
        self.next_id = self.next_id.max(id + 1);
        id
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.binary_search_by_key(&id, |e| e.id).ok()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(|i| &mut self.entities[i])
    }

    /// Flag an entity dead. It is only dropped at `cleanup`.
    /// Returns false for unknown or already-marked entities.
    pub fn mark_for_removal(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.get_mut(id) else {
            return false;
        };
        entity.alive = false;
        if self.pending.contains(&id) {
            return false;
        }
        self.pending.push(id);
        true
    }

    pub fn is_marked(&self, id: EntityId) -> bool {
        self.pending.contains(&id)
    }

    pub fn pending(&self) -> &[EntityId] {
        &self.pending
    }

    /// Stop counting a hostile toward victory. Returns false if it was not tracked.
    pub fn untrack_hostile(&mut self, id: EntityId) -> bool {
        match self.hostiles.iter().position(|&h| h == id) {
            Some(i) => {
                self.hostiles.remove(i);
                true
            }
            None => false,
        }
    }

    /// Drop every marked entity. Returns how many were removed.
    pub fn cleanup(&mut self) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        let pending = std::mem::take(&mut self.pending);
        let before = self.entities.len();
        self.entities.retain(|e| !pending.contains(&e.id));
        self.hostiles.retain(|h| !pending.contains(h));
        before - self.entities.len()
    }

    /// Drop everything (session teardown)
    pub fn clear(&mut self) {
        self.entities.clear();
        self.pending.clear();
        self.hostiles.clear();
    }

    /// Entities that initiate collision checks: the ship and live projectiles
    pub fn active_checkers(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.alive && matches!(e.kind(), KindTag::Ship | KindTag::Projectile))
            .map(|e| e.id)
            .collect()
    }

    /// Every entity not yet cleaned up (marked ones included until `cleanup`)
    pub fn all(&self) -> &[Entity] {
        &self.entities
    }

    pub fn all_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// Tracked hostiles
    pub fn hostiles(&self) -> &[EntityId] {
        &self.hostiles
    }

    pub fn count(&self, kind: KindTag) -> usize {
        self.entities.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{Body, Hostile, Projectile, Ship, WeaponId};
    use glam::Vec2;
    use proptest::prelude::*;

    fn hostile(reg: &mut Registry) -> EntityId {
        let id = reg.next_entity_id();
        reg.add(Entity::new(
            id,
            Vec2::ZERO,
            40.0,
            Body::Hostile(Hostile {
                tier: "scout".into(),
                health: 50,
                points: 10,
                speed: 3.0,
                target: None,
                is_dead: false,
            }),
        ))
    }

    fn projectile(reg: &mut Registry) -> EntityId {
        let id = reg.next_entity_id();
        reg.add(Entity::new(
            id,
            Vec2::ZERO,
            10.0,
            Body::Projectile(Projectile {
                damage: 100,
                age: 0,
                weapon: WeaponId::Laser,
            }),
        ))
    }

    fn ship(reg: &mut Registry) -> EntityId {
        let id = reg.next_entity_id();
        reg.add(Entity::new(id, Vec2::ZERO, 50.0, Body::Ship(Ship::new(3, 1.0))))
    }

    #[test]
    fn test_removal_is_deferred_until_cleanup() {
        let mut reg = Registry::new();
        let h = hostile(&mut reg);
        assert!(reg.mark_for_removal(h));
        // Still visible to same-tick queries
        assert!(reg.get(h).is_some());
        assert_eq!(reg.hostiles(), &[h]);
        assert!(!reg.get(h).map(|e| e.alive).unwrap_or(true));

        assert_eq!(reg.cleanup(), 1);
        assert!(reg.get(h).is_none());
        assert!(reg.hostiles().is_empty());
    }

    #[test]
    fn test_double_mark_is_ignored() {
        let mut reg = Registry::new();
        let p = projectile(&mut reg);
        assert!(reg.mark_for_removal(p));
        assert!(!reg.mark_for_removal(p));
        assert_eq!(reg.pending(), &[p]);
        assert!(!reg.mark_for_removal(999));
    }

    #[test]
    fn test_active_checkers_are_ship_and_projectiles() {
        let mut reg = Registry::new();
        let s = ship(&mut reg);
        let _h = hostile(&mut reg);
        let p = projectile(&mut reg);
        assert_eq!(reg.active_checkers(), vec![s, p]);

        reg.mark_for_removal(p);
        assert_eq!(reg.active_checkers(), vec![s]);
    }

    #[test]
    fn test_untrack_keeps_entity() {
        let mut reg = Registry::new();
        let h = hostile(&mut reg);
        assert!(reg.untrack_hostile(h));
        assert!(!reg.untrack_hostile(h));
        assert!(reg.get(h).is_some());
        assert!(reg.hostiles().is_empty());
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut reg = Registry::new();
        ship(&mut reg);
        let h = hostile(&mut reg);
        reg.mark_for_removal(h);
        reg.clear();
        assert!(reg.is_empty());
        assert!(reg.pending().is_empty());
        assert!(reg.hostiles().is_empty());
    }

    proptest! {
        #[test]
        fn prop_cleanup_removes_exactly_marked(
            kinds in prop::collection::vec(0u8..3, 1..40),
            marks in prop::collection::vec(any::<bool>(), 40),
        ) {
            let mut reg = Registry::new();
            let ids: Vec<EntityId> = kinds
                .iter()
                .map(|k| match k {
                    0 => ship(&mut reg),
                    1 => hostile(&mut reg),
                    _ => projectile(&mut reg),
                })
                .collect();

            let marked: Vec<EntityId> = ids
                .iter()
                .zip(&marks)
                .filter(|(_, m)| **m)
                .map(|(id, _)| *id)
                .collect();
            for &id in &marked {
                reg.mark_for_removal(id);
            }
            prop_assert_eq!(reg.len(), ids.len());

            reg.cleanup();
            for id in &ids {
                prop_assert_eq!(reg.get(*id).is_some(), !marked.contains(id));
            }
            prop_assert_eq!(reg.len(), ids.len() - marked.len());
        }
    }
}
