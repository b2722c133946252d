//! Events emitted by the simulation
//!
//! Audio and rendering collaborators consume these; the core never plays a
//! sound or draws a sprite itself.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::WeaponId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A volley left the ship
    ProjectileFired { weapon: WeaponId, count: u32 },
    /// Something blew up here (kills, impacts, burnt-out rounds)
    Explosion { pos: Vec2 },
    /// A hostile rammed the unshielded ship
    ShipHit { health: u32 },
    ShieldRaised,
    Victory,
    Defeat,
}

impl GameEvent {
    pub fn explosion(pos: Vec2) -> Self {
        GameEvent::Explosion { pos }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::Victory | GameEvent::Defeat)
    }
}

/// Receiver for drained events (audio mixer, renderer, logger)
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

impl EventSink for Vec<GameEvent> {
    fn on_event(&mut self, event: &GameEvent) {
        self.push(*event);
    }
}

/// Sink that writes every event to the log
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Explosion { .. } | GameEvent::ProjectileFired { .. } => {
                log::trace!("event: {:?}", event)
            }
            _ if event.is_terminal() => log::info!("event: {:?}", event),
            _ => log::debug!("event: {:?}", event),
        }
    }
}
