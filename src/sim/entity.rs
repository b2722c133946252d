//! Entity records
//!
//! One `Entity` shape for everything in the arena: shared kinematics plus a
//! kind-specific `Body`. Behavior is dispatched on the body, not on a type
//! hierarchy.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::cooldown::{Cooldown, Shield};

/// Stable entity handle (allocated monotonically per session)
pub type EntityId = u32;

/// Entity kind discriminant, used to key the combat rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KindTag {
    Ship,
    Hostile,
    Projectile,
}

/// Movement intent directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Player weapons (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponId {
    #[default]
    Laser,
    Rocket,
    HeavyRocket,
    Ultimate,
}

impl WeaponId {
    pub const ALL: [WeaponId; 4] = [
        WeaponId::Laser,
        WeaponId::Rocket,
        WeaponId::HeavyRocket,
        WeaponId::Ultimate,
    ];

    pub fn damage(&self) -> i32 {
        match self {
            WeaponId::Laser => 100,
            WeaponId::Rocket => 200,
            WeaponId::HeavyRocket => 300,
            WeaponId::Ultimate => 500,
        }
    }

    /// Speed subtracted from the launch thrust (heavier rounds fly slower)
    pub fn slowdown(&self) -> f32 {
        match self {
            WeaponId::Laser => 3.0,
            WeaponId::Rocket => 2.3,
            WeaponId::HeavyRocket => 5.0,
            WeaponId::Ultimate => 3.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeaponId::Laser => "laser",
            WeaponId::Rocket => "rocket",
            WeaponId::HeavyRocket => "heavy-rocket",
            WeaponId::Ultimate => "ultimate",
        }
    }
}

/// Four independent directional flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementIntent {
    pub fn set(&mut self, direction: Direction, pressed: bool) {
        match direction {
            Direction::Up => self.up = pressed,
            Direction::Down => self.down = pressed,
            Direction::Left => self.left = pressed,
            Direction::Right => self.right = pressed,
        }
    }

    /// Unit thrust direction, or None when idle or only opposing keys are held
    pub fn direction(&self) -> Option<Vec2> {
        let x = (self.right as i32 - self.left as i32) as f32;
        let y = (self.up as i32 - self.down as i32) as f32;
        if x == 0.0 && y == 0.0 {
            return None;
        }
        Some(Vec2::new(x, y).normalize())
    }
}

/// The player craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub health: u32,
    pub intent: MovementIntent,
    pub weapon: WeaponId,
    /// Shots per base interval
    pub fire_rate: f32,
    pub fire: Cooldown,
    pub shield: Shield,
    /// Facing angle (radians)
    pub facing: f32,
}

impl Ship {
    pub fn new(health: u32, fire_rate: f32) -> Self {
        Self {
            health,
            intent: MovementIntent::default(),
            weapon: WeaponId::default(),
            fire_rate,
            fire: Cooldown::new(),
            shield: Shield::default(),
            facing: 0.0,
        }
    }

    pub fn can_fire(&self, now: u64) -> bool {
        self.fire.is_ready(now)
    }

    /// Velocity after one tick of drag followed by intent thrust
    pub fn steer(&self, vel: Vec2, acceleration: f32, deceleration: f32) -> Vec2 {
        let decay = |v: f32| {
            if v > 0.0 {
                (v - deceleration).max(0.0)
            } else {
                (v + deceleration).min(0.0)
            }
        };
        let vel = Vec2::new(decay(vel.x), decay(vel.y));
        match self.intent.direction() {
            Some(dir) => vel + dir * acceleration,
            None => vel,
        }
    }
}

/// An enemy that chases the ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hostile {
    /// Roster tier name (renderer picks the sprite from it)
    pub tier: String,
    /// May go negative; removal triggers on `health < 0`
    pub health: i32,
    pub points: u64,
    pub speed: f32,
    /// Ship lookup handle; never owns the ship
    pub target: Option<EntityId>,
    /// Set once this hostile has been scored, so it is never scored twice
    pub is_dead: bool,
}

impl Hostile {
    /// Velocity heading straight for `target` at this hostile's speed
    pub fn pursue(&self, pos: Vec2, target: Vec2) -> Vec2 {
        (target - pos).normalize_or_zero() * self.speed
    }
}

/// A fired round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub damage: i32,
    /// Ticks since launch
    pub age: u32,
    pub weapon: WeaponId,
}

/// Kind-specific payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Body {
    Ship(Ship),
    Hostile(Hostile),
    Projectile(Projectile),
}

/// Anything that lives in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    radius: f32,
    pub alive: bool,
    pub body: Body,
}

impl Entity {
    pub fn new(id: EntityId, pos: Vec2, radius: f32, body: Body) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            alive: true,
            body,
        }
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.vel = vel;
        self
    }

    /// Bounding-circle radius (fixed at construction)
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn kind(&self) -> KindTag {
        match self.body {
            Body::Ship(_) => KindTag::Ship,
            Body::Hostile(_) => KindTag::Hostile,
            Body::Projectile(_) => KindTag::Projectile,
        }
    }

    pub fn as_ship(&self) -> Option<&Ship> {
        match &self.body {
            Body::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_ship_mut(&mut self) -> Option<&mut Ship> {
        match &mut self.body {
            Body::Ship(ship) => Some(ship),
            _ => None,
        }
    }

    pub fn as_hostile(&self) -> Option<&Hostile> {
        match &self.body {
            Body::Hostile(hostile) => Some(hostile),
            _ => None,
        }
    }

    pub fn as_hostile_mut(&mut self) -> Option<&mut Hostile> {
        match &mut self.body {
            Body::Hostile(hostile) => Some(hostile),
            _ => None,
        }
    }

    pub fn as_projectile(&self) -> Option<&Projectile> {
        match &self.body {
            Body::Projectile(projectile) => Some(projectile),
            _ => None,
        }
    }
}
