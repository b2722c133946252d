//! Cooldown gates and lifespans
//!
//! Gates are "locked until tick N" stamps checked lazily against the session
//! clock. Nothing here touches entity collections; the tick reads the gates
//! and acts on them.

use serde::{Deserialize, Serialize};

/// A "locked until elapsed" gate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldown {
    unlock_at: Option<u64>,
}

impl Cooldown {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the lock has elapsed (or was never set)
    pub fn is_ready(&self, now: u64) -> bool {
        self.unlock_at.is_none_or(|at| now >= at)
    }

    /// Lock for `duration` ticks. Returns false (and leaves the running lock
    /// untouched) if the gate is still locked.
    pub fn try_lock(&mut self, now: u64, duration: u64) -> bool {
        if !self.is_ready(now) {
            return false;
        }
        self.unlock_at = Some(now.saturating_add(duration));
        true
    }

    /// Ticks left until the gate opens
    pub fn remaining(&self, now: u64) -> u64 {
        self.unlock_at.map_or(0, |at| at.saturating_sub(now))
    }

    /// Drop any pending lock
    pub fn cancel(&mut self) {
        self.unlock_at = None;
    }
}

/// Ship shield: an active window plus an availability gate.
///
/// Cutting the shield short never shortens the availability gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shield {
    active: bool,
    expires_at: Option<u64>,
    gate: Cooldown,
}

impl Shield {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_available(&self, now: u64) -> bool {
        self.gate.is_ready(now)
    }

    pub fn cooldown_remaining(&self, now: u64) -> u64 {
        self.gate.remaining(now)
    }

    /// Raise the shield. No-op (returns false) while unavailable or already up.
    pub fn activate(&mut self, now: u64, duration: u64, cooldown: u64) -> bool {
        if self.active || !self.gate.try_lock(now, cooldown) {
            return false;
        }
        self.active = true;
        self.expires_at = Some(now.saturating_add(duration));
        true
    }

    /// Collapse the shield immediately (absorbed a hit)
    pub fn break_now(&mut self) {
        self.active = false;
        self.expires_at = None;
    }

    /// Expire the active window once its duration has elapsed
    pub fn refresh(&mut self, now: u64) {
        if let Some(at) = self.expires_at {
            if now >= at {
                self.break_now();
            }
        }
    }

    /// Session teardown
    pub fn cancel(&mut self) {
        self.break_now();
        self.gate.cancel();
    }
}

/// Age past which a projectile burns out
#[inline]
pub fn expired(age: u32, lifespan: u32) -> bool {
    age > lifespan
}
