use bevy::prelude::*;

/// Scale from momentum (mass × speed) to integrity points.
pub const DAMAGE_SCALE: f32 = 0.1;

/// Damage-on-impact behavior for a grabbable payload.
///
/// Speed is the magnitude of the payload's [`LinearVelocity`](avian3d::prelude::LinearVelocity),
/// sampled every frame whether or not the payload is held.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component, Default)]
#[require(Integrity)]
pub struct ImpactDamage {
    /// Speeds strictly above this deal damage.
    pub speed_threshold: f32,
    /// Seconds that must pass between two damage applications.
    pub cooldown: f32,
    /// Elapsed time of the last damage application.
    pub last_damage: Option<f32>,
}

impl Default for ImpactDamage {
    fn default() -> Self {
        Self {
            speed_threshold: 10.0,
            cooldown: 0.2,
            last_damage: None,
        }
    }
}

impl ImpactDamage {
    pub fn new(speed_threshold: f32, cooldown: f32) -> Self {
        Self {
            speed_threshold,
            cooldown,
            last_damage: None,
        }
    }

    /// Damage dealt at `now` by a body of `mass` moving at `speed`, if any.
    ///
    /// A hit records `now` as the last damage time.
    pub fn evaluate(&mut self, mass: f32, speed: f32, now: f32) -> Option<u32> {
        if speed <= self.speed_threshold {
            return None;
        }
        if self.last_damage.is_some_and(|last| now <= last + self.cooldown) {
            return None;
        }

        self.last_damage = Some(now);
        Some((mass * speed * DAMAGE_SCALE).ceil().max(0.0) as u32)
    }
}

/// Remaining structural integrity (hit points).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component, Default)]
pub struct Integrity {
    pub current: u32,
    pub max: u32,
}

impl Default for Integrity {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Integrity {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Subtract `amount`; returns `true` once integrity is used up.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.current = self.current.saturating_sub(amount);
        self.is_destroyed()
    }

    pub fn is_destroyed(&self) -> bool {
        self.current == 0
    }
}

/// A payload lost integrity.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadDamaged {
    pub entity: Entity,
    pub amount: u32,
    pub remaining: u32,
}

/// A payload ran out of integrity and was despawned.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadDestroyed {
    pub entity: Entity,
}
