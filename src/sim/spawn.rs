//! Hostile spawning
//!
//! Positions come from rejection sampling: draw uniformly from the square
//! bounding the arena until the point is inside the arena and outside the
//! safety zone around the ship.

use glam::Vec2;
use rand::Rng;

use super::entity::{Body, Entity, EntityId, Hostile};
use super::state::GameState;
use crate::settings::HostileTier;

/// Draw a spawn point. None if `attempts` draws all failed.
pub fn sample_position(
    rng: &mut impl Rng,
    arena_radius: f32,
    ship_pos: Vec2,
    safety_radius: f32,
    attempts: u32,
) -> Option<Vec2> {
    let r2 = arena_radius * arena_radius;
    let safe2 = safety_radius * safety_radius;
    for _ in 0..attempts {
        let candidate = Vec2::new(
            rng.random_range(-arena_radius..=arena_radius),
            rng.random_range(-arena_radius..=arena_radius),
        );
        if candidate.length_squared() <= r2 && candidate.distance_squared(ship_pos) >= safe2 {
            return Some(candidate);
        }
    }
    None
}

/// Pick a roster tier for `level`.
///
/// Tiers unlocked at `level` are ranked by unlock level; rank k gets weight
/// k+1, so tougher hulls show up more often as levels rise.
pub fn pick_tier<'a>(rng: &mut impl Rng, tiers: &'a [HostileTier], level: u32) -> Option<&'a HostileTier> {
    let mut eligible: Vec<&HostileTier> = tiers.iter().filter(|t| t.min_level <= level).collect();
    if eligible.is_empty() {
        return None;
    }
    eligible.sort_by_key(|t| t.min_level);

    let n = eligible.len() as u32;
    let total = n * (n + 1) / 2;
    let mut roll = rng.random_range(0..total);
    for (rank, &tier) in eligible.iter().enumerate() {
        let weight = rank as u32 + 1;
        if roll < weight {
            return Some(tier);
        }
        roll -= weight;
    }
    eligible.last().copied()
}

/// Create one hostile and register it. None if no valid spot or tier was found.
pub fn spawn_hostile(state: &mut GameState) -> Option<EntityId> {
    let ship_id = state.ship_id();
    let Some(ship_pos) = state.ship_pos() else {
        log::warn!("Spawn skipped: no ship in the arena");
        return None;
    };

    let settings = &state.settings;
    let Some(pos) = sample_position(
        &mut state.rng,
        settings.arena_radius,
        ship_pos,
        settings.safety_radius,
        settings.spawn_attempts,
    ) else {
        log::warn!(
            "Spawn gave up after {} draws (ship at {:?})",
            settings.spawn_attempts,
            ship_pos
        );
        return None;
    };

    let Some(tier) = pick_tier(&mut state.rng, &settings.tiers, state.level) else {
        log::warn!("No hostile tier unlocked at level {}", state.level);
        return None;
    };
    let speed = if tier.speed_max > tier.speed_min {
        state.rng.random_range(tier.speed_min..tier.speed_max)
    } else {
        tier.speed_min
    };

    let hostile = Hostile {
        tier: tier.name.clone(),
        health: tier.health,
        points: tier.points,
        speed,
        target: Some(ship_id),
        is_dead: false,
    };
    let vel = hostile.pursue(pos, ship_pos);
    let radius = settings.hostile_radius;

    let id = state.registry.next_entity_id();
    state
        .registry
        .add(Entity::new(id, pos, radius, Body::Hostile(hostile)).with_velocity(vel));
    log::debug!("Spawned hostile {} at ({:.0}, {:.0})", id, pos.x, pos.y);
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Settings, default_tiers};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_level_one_only_gets_base_tier() {
        let mut rng = Pcg32::seed_from_u64(5);
        let tiers = default_tiers();
        for _ in 0..100 {
            let tier = pick_tier(&mut rng, &tiers, 1).expect("tier");
            assert_eq!(tier.min_level, 1);
        }
    }

    #[test]
    fn test_higher_levels_favor_tougher_tiers() {
        let mut rng = Pcg32::seed_from_u64(11);
        let tiers = default_tiers();
        let mut scouts = 0;
        let mut motherships = 0;
        for _ in 0..2000 {
            match pick_tier(&mut rng, &tiers, 10).map(|t| t.name.as_str()) {
                Some("scout") => scouts += 1,
                Some("mothership") => motherships += 1,
                _ => {}
            }
        }
        assert!(motherships > scouts * 2);
    }

    #[test]
    fn test_no_tier_when_nothing_unlocked() {
        let mut rng = Pcg32::seed_from_u64(0);
        let tiers = vec![HostileTier::new("late", 5, 10, 1, (1.0, 2.0))];
        assert!(pick_tier(&mut rng, &tiers, 1).is_none());
    }

    #[test]
    fn test_impossible_region_gives_up() {
        let mut rng = Pcg32::seed_from_u64(0);
        // Safety zone swallows the whole arena
        assert!(sample_position(&mut rng, 100.0, Vec2::ZERO, 500.0, 50).is_none());
    }

    #[test]
    fn test_spawned_hostile_targets_ship() {
        let mut state = GameState::new(Settings::default(), 1, 3);
        let id = spawn_hostile(&mut state).expect("spawned");
        let entity = state.registry.get(id).expect("registered");
        let hostile = entity.as_hostile().expect("hostile");
        assert_eq!(hostile.target, Some(state.ship_id()));
        assert!(hostile.speed >= 3.0 && hostile.speed < 5.0);
        assert!(state.registry.hostiles().contains(&id));
    }

    proptest! {
        #[test]
        fn prop_spawn_points_respect_arena_and_safety_zone(
            seed in any::<u64>(),
            ship_angle in 0.0f32..std::f32::consts::TAU,
            ship_dist in 0.0f32..2500.0,
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let arena = 3000.0f32;
            let safety = 2000.0f32;
            let ship = Vec2::new(ship_angle.cos(), ship_angle.sin()) * ship_dist;

            for _ in 0..20 {
                let p = sample_position(&mut rng, arena, ship, safety, 100_000)
                    .expect("region is never empty");
                prop_assert!(p.x * p.x + p.y * p.y <= arena * arena);
                prop_assert!((p - ship).length_squared() >= safety * safety);
            }
        }
    }
}
