//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (owned by the session)
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod collision;
pub mod combat;
pub mod cooldown;
pub mod entity;
pub mod events;
pub mod registry;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::FixedStepClock;
pub use collision::{circles_overlap, detect};
pub use cooldown::{Cooldown, Shield};
pub use entity::{
    Body, Direction, Entity, EntityId, Hostile, KindTag, MovementIntent, Projectile, Ship, WeaponId,
};
pub use events::{EventSink, GameEvent, LogSink};
pub use registry::Registry;
pub use state::{GamePhase, GameState, Snapshot};
pub use tick::{tick, volley_offsets};
