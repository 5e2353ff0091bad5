//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Gameplay clock advanced by ticks, never read from the wall clock
//! - No rendering or platform dependencies

pub mod ability;
pub mod collision;
pub mod enemy;
pub mod level;
pub mod player;
pub mod projectile;
pub mod session;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use ability::{AbilityKind, AbilitySpec, CastOutcome, Cooldowns, registry};
pub use collision::{CollisionReport, resolve_collisions};
pub use enemy::{Enemy, EnemyParams, EnemyShot, EnemySwarm, Steering, compute_steering};
pub use level::{LevelState, enemies_for_level, level_multiplier, scaled_enemy_params};
pub use player::{AbilityAnimation, AnimationKind, DamageOutcome, Player};
pub use projectile::{Projectile, ProjectileSource};
pub use session::{CountdownStep, GamePhase, SessionState};
pub use snapshot::{AbilityView, LevelView, PlayerView, Snapshot};
pub use state::{GameEvent, GameState, Millis, secs_to_ms};
pub use tick::{TickInput, tick};
