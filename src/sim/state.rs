//! Session state
//!
//! `GameState` is the whole world for one session: settings, seeded RNG,
//! clock, registry, score and phase. Nothing is global, so sessions never
//! interfere and tests can run many side by side.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Entity, EntityId, KindTag, Ship};
use super::events::{EventSink, GameEvent};
use super::registry::Registry;
use super::spawn;
use crate::error::Result;
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Every hostile of the level is gone
    Victory,
    /// Ship health hit zero
    Defeat,
}

impl GamePhase {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// HUD / reporting summary of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub level: u32,
    pub score: u64,
    pub eliminated: u32,
    pub quota: u32,
    pub ship_health: u32,
    pub shield_active: bool,
    /// Ticks until the shield can be raised again
    pub shield_cooldown: u64,
    pub hostiles: usize,
    pub projectiles: usize,
}

/// One game session
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Level (1-based); drives quota, volley size and hostile roster
    pub level: u32,
    pub score: u64,
    /// Hostiles destroyed by projectiles
    pub eliminated: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub registry: Registry,
    ship_id: EntityId,
    events: Vec<GameEvent>,
    torn_down: bool,
}

impl GameState {
    /// Start a session: place the ship and the opening batch of hostiles
    pub fn new(settings: Settings, level: u32, seed: u64) -> Self {
        let level = level.max(1);
        let mut registry = Registry::new();

        let ship_id = registry.next_entity_id();
        let start = Vec2::new(settings.ship_start.0, settings.ship_start.1);
        registry.add(Entity::new(
            ship_id,
            start,
            settings.ship_radius,
            Body::Ship(Ship::new(settings.ship_health, settings.fire_rate)),
        ));

        let mut state = Self {
            settings,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level,
            score: 0,
            eliminated: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            registry,
            ship_id,
            events: Vec::new(),
            torn_down: false,
        };

        let opening = state.settings.max_active_hostiles.min(state.quota() as usize);
        for _ in 0..opening {
            if spawn::spawn_hostile(&mut state).is_none() {
                break;
            }
        }

        log::info!(
            "Session started: level {}, seed {}, quota {}, {} hostiles on the field",
            state.level,
            seed,
            state.quota(),
            state.registry.hostiles().len()
        );
        state
    }

    /// Validate settings, then start a session
    pub fn try_new(settings: Settings, level: u32, seed: u64) -> Result<Self> {
        settings.validate()?;
        Ok(Self::new(settings, level, seed))
    }

    /// Hostiles this level must clear
    pub fn quota(&self) -> u32 {
        self.settings.quota(self.level)
    }

    pub fn ship_id(&self) -> EntityId {
        self.ship_id
    }

    pub fn ship_entity(&self) -> Option<&Entity> {
        self.registry.get(self.ship_id)
    }

    pub fn ship(&self) -> Option<&Ship> {
        self.ship_entity().and_then(Entity::as_ship)
    }

    pub(crate) fn ship_mut(&mut self) -> Option<&mut Ship> {
        self.registry.get_mut(self.ship_id).and_then(Entity::as_ship_mut)
    }

    pub fn ship_pos(&self) -> Option<Vec2> {
        self.ship_entity().map(|e| e.pos)
    }

    // === Read-only queries ===

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn eliminated_count(&self) -> u32 {
        self.eliminated
    }

    pub fn ship_health(&self) -> u32 {
        self.ship().map_or(0, |s| s.health)
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Everything the renderer should draw this frame
    pub fn entities(&self) -> &[Entity] {
        self.registry.all()
    }

    /// True once no further ticks will change anything
    pub fn is_finished(&self) -> bool {
        self.torn_down || self.phase.is_terminal()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.time_ticks,
            phase: self.phase,
            level: self.level,
            score: self.score,
            eliminated: self.eliminated,
            quota: self.quota(),
            ship_health: self.ship_health(),
            shield_active: self.ship().is_some_and(|s| s.shield.is_active()),
            shield_cooldown: self
                .ship()
                .map_or(0, |s| s.shield.cooldown_remaining(self.time_ticks)),
            hostiles: self.registry.hostiles().len(),
            projectiles: self.registry.count(KindTag::Projectile),
        }
    }

    // === Events ===

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Pending events, oldest first.
    ///
    /// The buffer is unbounded: callers must drain it every frame with
    /// `drain_events` or `forward_events`.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take every pending event. Call once per frame.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hand every pending event to `sink` and clear the buffer
    pub fn forward_events(&mut self, sink: &mut impl EventSink) {
        for event in self.events.drain(..) {
            sink.on_event(&event);
        }
    }

    // === Lifecycle ===

    /// Enter a terminal phase. Ignored once the session is already over.
    pub(crate) fn finish(&mut self, outcome: GamePhase) {
        if self.phase.is_terminal() || !outcome.is_terminal() {
            return;
        }
        self.phase = outcome;
        if let Some(ship) = self.ship_mut() {
            ship.fire.cancel();
            ship.shield.cancel();
        }
        let event = match outcome {
            GamePhase::Victory => GameEvent::Victory,
            _ => GameEvent::Defeat,
        };
        self.emit(event);
        log::info!(
            "{:?} at tick {}: score {}, eliminated {}/{}",
            outcome,
            self.time_ticks,
            self.score,
            self.eliminated,
            self.quota()
        );
    }

    /// Cancel pending cooldowns and drop every entity. Later ticks are no-ops.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        if let Some(ship) = self.ship_mut() {
            ship.fire.cancel();
            ship.shield.cancel();
        }
        self.registry.clear();
        self.torn_down = true;
        log::info!("Session torn down at tick {}", self.time_ticks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_places_ship_and_opening_batch() {
        let state = GameState::new(Settings::default(), 1, 12345);
        assert_eq!(state.phase(), GamePhase::Playing);
        assert_eq!(state.ship_health(), 3);
        assert_eq!(state.registry.count(KindTag::Ship), 1);
        // Quota 10, cap 9
        assert_eq!(state.registry.hostiles().len(), 9);
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_small_quota_limits_opening_batch() {
        let settings = Settings {
            hostiles_per_level: 2,
            ..Default::default()
        };
        let state = GameState::new(settings, 1, 1);
        assert_eq!(state.registry.hostiles().len(), 2);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(Settings::default(), 2, 99);
        let b = GameState::new(Settings::default(), 2, 99);
        let pa: Vec<Vec2> = a.entities().iter().map(|e| e.pos).collect();
        let pb: Vec<Vec2> = b.entities().iter().map(|e| e.pos).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_try_new_rejects_bad_settings() {
        let settings = Settings {
            fps: 0,
            ..Default::default()
        };
        assert!(GameState::try_new(settings, 1, 0).is_err());
    }

    #[test]
    fn test_finish_is_one_way() {
        let mut state = GameState::new(Settings::default(), 1, 7);
        state.finish(GamePhase::Defeat);
        state.finish(GamePhase::Victory);
        assert_eq!(state.phase(), GamePhase::Defeat);
        assert_eq!(state.drain_events(), vec![GameEvent::Defeat]);
    }

    #[test]
    fn test_teardown_clears_registry() {
        let mut state = GameState::new(Settings::default(), 1, 7);
        state.teardown();
        assert!(state.entities().is_empty());
        assert!(state.is_finished());
        // Ship is gone; queries fail safe
        assert_eq!(state.ship_health(), 0);
        assert!(state.ship_pos().is_none());
    }

    #[test]
    fn test_forward_events_drains_buffer() {
        let mut state = GameState::new(Settings::default(), 1, 7);
        state.emit(GameEvent::ShieldRaised);
        let mut sink: Vec<GameEvent> = Vec::new();
        state.forward_events(&mut sink);
        assert_eq!(sink, vec![GameEvent::ShieldRaised]);
        assert!(state.events().is_empty());
    }

    #[test]
    fn test_snapshot_reports_shield_cooldown() {
        let mut state = GameState::new(Settings::default(), 1, 7);
        assert_eq!(state.snapshot().shield_cooldown, 0);
        assert!(state.submit_shield_toggle());
        let snap = state.snapshot();
        assert!(snap.shield_active);
        assert_eq!(snap.shield_cooldown, state.settings.shield_cooldown_ticks());
    }
}
