//! Read-only view of the world handed to the renderer/HUD each frame

use glam::Vec3;
use serde::Serialize;

use super::ability::AbilityKind;
use super::enemy::Enemy;
use super::player::AnimationKind;
use super::projectile::Projectile;
use super::session::GamePhase;
use super::state::{GameState, Millis};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub position: Vec3,
    pub facing: f32,
    pub health: i32,
    pub max_health: i32,
    pub is_alive: bool,
    pub is_invulnerable: bool,
    pub is_shielded: bool,
    pub is_dashing: bool,
    pub is_flashing: bool,
    /// Active dash/flash and its progress in [0, 1]
    pub animation: Option<(AnimationKind, f32)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbilityView {
    pub kind: AbilityKind,
    pub key: char,
    pub name: &'static str,
    pub cooldown: f32,
    pub remaining_secs: f32,
    /// 0 just used, 1 ready
    pub ready_ratio: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelView {
    pub current: u32,
    pub max: u32,
    pub quota: u32,
    pub defeated: u32,
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub time_ms: Millis,
    pub phase: GamePhase,
    pub score: u64,
    pub countdown: Option<u8>,
    pub enemy_projectiles_enabled: bool,
    pub player: PlayerView,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub abilities: Vec<AbilityView>,
    pub level: LevelView,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let now = state.time_ms;
        let player = &state.player;
        let abilities = AbilityKind::ALL
            .iter()
            .map(|&kind| {
                let spec = state.ability_spec(kind);
                AbilityView {
                    kind,
                    key: kind.key(),
                    name: kind.name(),
                    cooldown: spec.cooldown,
                    remaining_secs: state.remaining_cooldown(kind),
                    ready_ratio: state.cooldowns.ready_ratio(&spec, now),
                }
            })
            .collect();

        Self {
            time_ms: now,
            phase: state.phase(),
            score: state.session.score,
            countdown: state.session.countdown,
            enemy_projectiles_enabled: state.session.enemy_projectiles_enabled,
            player: PlayerView {
                position: player.position,
                facing: player.facing,
                health: player.health,
                max_health: player.max_health,
                is_alive: player.is_alive(),
                is_invulnerable: player.is_invulnerable(),
                is_shielded: player.is_shielded(),
                is_dashing: player.is_dashing(),
                is_flashing: player.is_flashing(),
                animation: player.animation().map(|a| (a.kind, a.progress(now))),
            },
            enemies: state.enemies.enemies().to_vec(),
            projectiles: state.projectiles.clone(),
            abilities,
            level: LevelView {
                current: state.level.current_level,
                max: state.level.max_level,
                quota: state.level.enemies_per_level,
                defeated: state.level.enemies_defeated,
                complete: state.level.is_level_complete,
            },
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
