//! Straight-line projectiles fired by the player and by enemies

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::Millis;
use crate::consts::PROJECTILE_SPEED_SCALE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileSource {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub position: Vec3,
    /// Unit vector
    pub direction: Vec3,
    /// Units per 30 Hz frame
    pub speed: f32,
    pub source: ProjectileSource,
    pub created_at: Millis,
}

impl Projectile {
    pub fn new(id: u32, position: Vec3, direction: Vec3, speed: f32, source: ProjectileSource, now: Millis) -> Self {
        Self {
            id,
            position,
            direction: direction.normalize_or_zero(),
            speed,
            source,
            created_at: now,
        }
    }

    /// Move along `direction`; `dt` in seconds
    pub fn advance(&mut self, dt: f32) {
        self.position += self.direction * self.speed * dt * PROJECTILE_SPEED_SCALE;
    }

    pub fn is_expired(&self, now: Millis, lifetime_ms: Millis) -> bool {
        now - self.created_at >= lifetime_ms
    }
}
