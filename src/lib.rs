//! Arena Duel - simulation core for a top-down arena action game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player, enemies, abilities, collisions, progression)
//! - `tuning`: Data-driven game balance (JSON-loadable config)
//! - `driver`: Fixed-timestep frame driver for hosts that own the render loop
//! - `error`: Configuration errors
//!
//! Rendering, camera and raw input capture live outside this crate. Hosts feed
//! [`sim::TickInput`] into [`sim::tick`] and read [`sim::Snapshot`] back.

pub mod driver;
pub mod error;
pub mod sim;
pub mod tuning;

pub use driver::FrameDriver;
pub use error::ConfigError;
pub use tuning::GameConfig;

use glam::Vec3;

/// Game configuration constants (defaults for [`tuning::GameConfig`])
pub mod consts {
    /// Fixed simulation timestep (60 Hz; per-frame speeds are tuned against it)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta the driver accepts (tab switches, debugger stops)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Map dimensions (world units, centered on the origin, XZ plane)
    pub const MAP_WIDTH: f32 = 60.0;
    pub const MAP_HEIGHT: f32 = 40.0;

    /// Player defaults
    pub const PLAYER_START_HEIGHT: f32 = 2.5;
    /// Units per frame
    pub const PLAYER_BASE_SPEED: f32 = 0.15;
    /// Player snaps onto its move target inside this distance
    pub const ARRIVAL_EPSILON: f32 = 0.1;
    pub const PLAYER_MAX_HEALTH: i32 = 100;
    /// One hit from full health kills
    pub const DAMAGE_PER_HIT: i32 = 100;
    pub const INVULNERABILITY_SECS: f32 = 1.0;

    /// Collision radii
    pub const PLAYER_RADIUS: f32 = 0.5;
    pub const PROJECTILE_RADIUS: f32 = 0.25;
    pub const MIN_COLLISION_DISTANCE: f32 = PLAYER_RADIUS + PROJECTILE_RADIUS;
    /// Body contact uses a wider radius than projectile hits
    pub const CONTACT_MULTIPLIER: f32 = 1.5;

    /// Projectiles
    pub const PROJECTILE_SPAWN_OFFSET: f32 = 1.5;
    pub const PROJECTILE_LIFETIME_SECS: f32 = 3.0;
    /// Movement is `speed * dt * 30`, i.e. `speed` is units per 30 Hz frame
    pub const PROJECTILE_SPEED_SCALE: f32 = 30.0;
    pub const PLAYER_PROJECTILE_SPEED: f32 = 0.8;

    /// Abilities (cooldowns in seconds)
    pub const SHOT_COOLDOWN: f32 = 0.2;
    pub const SHOT_RANGE: f32 = 20.0;
    pub const SHIELD_COOLDOWN: f32 = 8.0;
    pub const SHIELD_DURATION: f32 = 3.0;
    pub const DASH_COOLDOWN: f32 = 5.0;
    pub const DASH_DURATION: f32 = 0.3;
    pub const DASH_DISTANCE: f32 = 10.0;
    pub const FLASH_COOLDOWN: f32 = 20.0;
    pub const FLASH_DISTANCE: f32 = 5.0;
    pub const FLASH_TELEGRAPH: f32 = 0.15;

    /// Enemy defaults
    pub const ENEMY_HEIGHT: f32 = 3.0;
    /// Units per frame
    pub const ENEMY_MOVE_SPEED: f32 = 0.08;
    pub const ENEMY_HEALTH: f32 = 1.0;
    pub const ENEMY_DAMAGE: f32 = 100.0;
    pub const ENEMY_PROJECTILE_SPEED: f32 = 0.7;
    pub const ENEMY_SPAWN_INTERVAL: f32 = 2.0;
    pub const ENEMY_SPAWN_MARGIN: f32 = 5.0;
    pub const ENEMY_ATTACK_RANGE: f32 = 20.0;
    pub const ENEMY_ATTACK_COOLDOWN: f32 = 2.0;
    pub const MIN_ENEMY_DISTANCE: f32 = 8.0;
    /// Speed boost while pushing out of a crowd
    pub const CROWD_SPEED_MULTIPLIER: f32 = 1.5;

    /// Level progression
    pub const BASE_ENEMIES_PER_LEVEL: u32 = 5;
    pub const MAX_LEVEL: u32 = 10;
    pub const LEVEL_GROWTH: f32 = 1.2;
    pub const MIN_SPAWN_INTERVAL: f32 = 0.5;

    /// Pre-round freeze, in whole seconds
    pub const COUNTDOWN_SECS: u8 = 3;
}

/// Project a vector onto the ground (XZ) plane
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Distance between two points measured on the ground plane
#[inline]
pub fn ground_distance(a: Vec3, b: Vec3) -> f32 {
    flatten(a - b).length()
}

/// Unit vector on the ground plane pointing from `from` to `to` (zero if coincident)
#[inline]
pub fn ground_direction(from: Vec3, to: Vec3) -> Vec3 {
    flatten(to - from).normalize_or_zero()
}

/// Yaw (rotation about +Y) that faces along `dir`; 0 faces +Z
#[inline]
pub fn yaw_of(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}

/// Unit forward vector on the ground plane for a yaw
#[inline]
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Ease-out quadratic: fast start, gentle arrival
#[inline]
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}
