//! Game state and world-level transitions
//!
//! [`GameState`] owns every sub-system and orchestrates the operations that
//! cross them: casting abilities, killing enemies, level advance, full reset.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::ability::{AbilityKind, AbilitySpec, CastOutcome, Cooldowns};
use super::enemy::{EnemyParams, EnemySwarm, random_edge_position};
use super::level::{LevelState, scaled_enemy_params};
use super::player::{DamageOutcome, Player};
use super::projectile::{Projectile, ProjectileSource};
use super::session::{GamePhase, SessionState};
use crate::flatten;
use crate::tuning::GameConfig;

/// Simulation clock timestamp in milliseconds
pub type Millis = f64;

/// Seconds to clock milliseconds (multiplied in f32 so 0.3 s is exactly 300 ms)
#[inline]
pub fn secs_to_ms(secs: f32) -> Millis {
    (secs * 1000.0) as Millis
}

/// Notable things that happened during a tick, for audio/VFX collaborators
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    CountdownTick { remaining: u8 },
    RoundStarted { level: u32 },
    EnemySpawned { id: u32, position: Vec3 },
    EnemyKilled { id: u32, position: Vec3 },
    ProjectileFired { id: u32, source: ProjectileSource },
    ProjectileExpired { id: u32 },
    AbilityCast { kind: AbilityKind },
    AbilityRejected { kind: AbilityKind, outcome: CastOutcome },
    PlayerDamaged { health: i32 },
    PlayerDied,
    LevelComplete { level: u32 },
    LevelAdvanced { level: u32 },
    Paused,
    Resumed,
    EnemyProjectilesToggled { enabled: bool },
    GameOver { score: u64, level: u32 },
    GameReset,
}

/// Complete simulation state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Gameplay clock; frozen outside the Playing phase
    pub time_ms: Millis,
    /// Playing ticks simulated
    pub time_ticks: u64,
    pub player: Player,
    pub enemies: EnemySwarm,
    /// Live projectiles (sorted by id)
    pub projectiles: Vec<Projectile>,
    pub cooldowns: Cooldowns,
    pub level: LevelState,
    pub session: SessionState,
    /// Events since the last [`GameState::drain_events`]
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// New session at level 1, starting in the countdown
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let params = scaled_enemy_params(1, &config.level, &config.enemy);
        let mut state = Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
            time_ms: 0.0,
            time_ticks: 0,
            player: Player::new(&config.player),
            enemies: EnemySwarm::new(params),
            projectiles: Vec::new(),
            cooldowns: Cooldowns::new(),
            level: LevelState::new(&config.level),
            session: SessionState::new(&config.session),
            events: Vec::new(),
            next_id: 1,
            config,
        };
        state.session.start_countdown(state.config.session.countdown_secs);
        state
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::new(GameConfig::default(), seed)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn ability_spec(&self, kind: AbilityKind) -> AbilitySpec {
        AbilitySpec::resolve(kind, &self.config.abilities)
    }

    /// Seconds until `kind` is ready (0 when ready)
    pub fn remaining_cooldown(&self, kind: AbilityKind) -> f32 {
        let spec = self.ability_spec(kind);
        (self.cooldowns.remaining_ms(&spec, self.time_ms).max(0.0) / 1000.0) as f32
    }

    /// Cast `kind` along `direction` (the player's facing if `None` or zero)
    pub fn cast_ability(&mut self, kind: AbilityKind, direction: Option<Vec3>) -> CastOutcome {
        let outcome = self.try_cast(kind, direction);
        match outcome {
            CastOutcome::Cast => {
                log::debug!("{} cast at t={:.0}ms", kind.name(), self.time_ms);
                self.events.push(GameEvent::AbilityCast { kind });
            }
            // Casting while paused or after death is silent
            CastOutcome::Inactive => {}
            rejected => {
                if let CastOutcome::OnCooldown { remaining_secs } = rejected {
                    log::debug!("{} on cooldown for {:.1}s", kind.name(), remaining_secs);
                }
                self.events.push(GameEvent::AbilityRejected {
                    kind,
                    outcome: rejected,
                });
            }
        }
        outcome
    }

    fn try_cast(&mut self, kind: AbilityKind, direction: Option<Vec3>) -> CastOutcome {
        match self.phase() {
            GamePhase::Countdown => return CastOutcome::CountdownActive,
            GamePhase::Paused | GamePhase::GameOver => return CastOutcome::Inactive,
            GamePhase::Playing => {}
        }
        if !self.player.is_alive() {
            return CastOutcome::Inactive;
        }

        let spec = self.ability_spec(kind);
        let now = self.time_ms;
        let remaining = self.cooldowns.remaining_ms(&spec, now);
        if remaining > 0.0 {
            return CastOutcome::OnCooldown {
                remaining_secs: (remaining / 1000.0) as f32,
            };
        }
        if kind.is_channeled() && self.player.is_channeling() {
            return CastOutcome::Channeling;
        }

        let dir = direction
            .map(|d| flatten(d).normalize_or_zero())
            .filter(|d| *d != Vec3::ZERO)
            .unwrap_or_else(|| self.player.forward());

        self.cooldowns.mark_used(kind, now);
        let abilities = self.config.abilities;
        match kind {
            AbilityKind::Projectile => {
                let origin = self.player.position + dir * abilities.shot_spawn_offset;
                self.spawn_projectile(origin, dir, abilities.shot_speed, ProjectileSource::Player);
            }
            AbilityKind::Shield => {
                self.player.begin_shield(now, abilities.shield_duration);
            }
            AbilityKind::Dash => {
                self.player.begin_dash(
                    now,
                    dir,
                    abilities.dash_distance,
                    abilities.dash_duration,
                    &self.config.map,
                );
            }
            AbilityKind::Flash => {
                self.player.begin_flash(
                    now,
                    dir,
                    abilities.flash_distance,
                    abilities.flash_telegraph,
                    &self.config.map,
                );
            }
        }
        CastOutcome::Cast
    }

    pub fn spawn_projectile(&mut self, origin: Vec3, direction: Vec3, speed: f32, source: ProjectileSource) -> u32 {
        let id = self.next_entity_id();
        self.projectiles
            .push(Projectile::new(id, origin, direction, speed, source, self.time_ms));
        self.events.push(GameEvent::ProjectileFired { id, source });
        id
    }

    /// Spawn an enemy on a random map edge if the lock and quota allow it
    pub fn try_spawn_enemy(&mut self) -> Option<u32> {
        if !self.session.is_running() {
            return None;
        }
        if !self
            .enemies
            .can_spawn(self.time_ms, self.level.enemies_defeated, self.level.enemies_per_level)
        {
            return None;
        }
        let tuning = self.config.enemy;
        let position = random_edge_position(&mut self.rng, &self.config.map, tuning.spawn_margin, tuning.height);
        let id = self.next_entity_id();
        self.enemies.spawn_at(id, position, self.time_ms);
        log::debug!("Enemy {} spawned at ({:.1}, {:.1})", id, position.x, position.z);
        self.events.push(GameEvent::EnemySpawned { id, position });
        Some(id)
    }

    /// Kill an enemy and apply score/progression; false if it was already gone
    pub fn kill_enemy(&mut self, id: u32) -> bool {
        let Some(enemy) = self.enemies.remove(id) else {
            return false;
        };
        self.session.increment_score();
        log::debug!("Enemy {} killed (score {})", id, self.session.score);
        self.events.push(GameEvent::EnemyKilled {
            id,
            position: enemy.position,
        });
        if self.level.increment_enemies_defeated() {
            log::info!(
                "Level {} complete ({} enemies)",
                self.level.current_level,
                self.level.enemies_defeated
            );
            self.events.push(GameEvent::LevelComplete {
                level: self.level.current_level,
            });
        }
        true
    }

    /// Hit the player for one enemy strike
    pub fn damage_player(&mut self) -> DamageOutcome {
        let damage = self.config.player.damage_per_hit;
        let outcome = self.player.take_damage(damage, self.time_ms, &self.config.player);
        match outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Hurt { health } => {
                self.events.push(GameEvent::PlayerDamaged { health });
            }
            DamageOutcome::Killed => {
                self.events.push(GameEvent::PlayerDamaged { health: 0 });
                self.events.push(GameEvent::PlayerDied);
            }
        }
        outcome
    }

    /// Enter GameOver (idempotent)
    pub fn end_game(&mut self) {
        if self.session.is_game_over {
            return;
        }
        self.session.set_game_over();
        log::info!(
            "Game over: score {} on level {}",
            self.session.score,
            self.level.current_level
        );
        self.events.push(GameEvent::GameOver {
            score: self.session.score,
            level: self.level.current_level,
        });
    }

    /// Next level: rescale enemies, clear the field, restart the countdown
    pub fn advance_level(&mut self) {
        let params: EnemyParams = self.level.advance_level(&self.config.level, &self.config.enemy);
        self.enemies.update_config(params);
        self.enemies.reset();
        self.projectiles.clear();
        self.session.start_countdown(self.config.session.countdown_secs);
        log::info!(
            "Advanced to level {} (quota {}, enemy speed {:.3})",
            self.level.current_level,
            self.level.enemies_per_level,
            params.move_speed
        );
        self.events.push(GameEvent::LevelAdvanced {
            level: self.level.current_level,
        });
    }

    /// Full world reset back to level 1 and a fresh countdown.
    ///
    /// Every timed effect lives on an entity that is rebuilt here, so nothing
    /// scheduled before the reset can fire after it.
    pub fn reset_game(&mut self) {
        self.session.reset_game();
        self.level.reset_level(&self.config.level);
        self.player.reset(&self.config.player);
        self.enemies
            .update_config(scaled_enemy_params(1, &self.config.level, &self.config.enemy));
        self.enemies.reset();
        self.projectiles.clear();
        self.cooldowns.reset();
        self.time_ms = 0.0;
        self.time_ticks = 0;
        self.session.start_countdown(self.config.session.countdown_secs);
        log::info!("Game reset");
        self.events.push(GameEvent::GameReset);
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_id();
        self.projectiles.sort_by_key(|p| p.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_state() -> GameState {
        let mut state = GameState::with_seed(7);
        state.session.countdown = None;
        state
    }

    #[test]
    fn test_new_state_starts_in_countdown() {
        let state = GameState::with_seed(1);
        assert_eq!(state.phase(), GamePhase::Countdown);
        assert_eq!(state.session.countdown, Some(3));
        assert_eq!(state.level.current_level, 1);
        assert_eq!(state.level.enemies_per_level, 5);
    }

    #[test]
    fn test_cast_rejected_during_countdown() {
        let mut state = GameState::with_seed(1);
        assert_eq!(state.cast_ability(AbilityKind::Projectile, None), CastOutcome::CountdownActive);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.cooldowns.last_used(AbilityKind::Projectile), None);
    }

    #[test]
    fn test_cast_silent_when_paused() {
        let mut state = playing_state();
        state.session.toggle_pause();
        assert_eq!(state.cast_ability(AbilityKind::Shield, None), CastOutcome::Inactive);
        assert!(state.events.is_empty());
        assert!(!state.player.is_shielded());
    }

    #[test]
    fn test_shot_spawns_ahead_of_player() {
        let mut state = playing_state();
        assert!(state.cast_ability(AbilityKind::Projectile, Some(Vec3::X)).is_cast());
        let p = &state.projectiles[0];
        assert_eq!(p.source, ProjectileSource::Player);
        assert!((p.position - Vec3::new(1.5, 2.5, 0.0)).length() < 1e-5);
        assert_eq!(p.direction, Vec3::X);
    }

    #[test]
    fn test_second_cast_within_cooldown_fails() {
        let mut state = playing_state();
        assert!(state.cast_ability(AbilityKind::Projectile, None).is_cast());
        state.time_ms += 100.0;
        let outcome = state.cast_ability(AbilityKind::Projectile, None);
        assert!(matches!(outcome, CastOutcome::OnCooldown { .. }));
        assert_eq!(state.projectiles.len(), 1);
        state.time_ms += 100.0;
        assert!(state.cast_ability(AbilityKind::Projectile, None).is_cast());
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_flash_rejected_while_dashing_without_spending_cooldown() {
        let mut state = playing_state();
        assert!(state.cast_ability(AbilityKind::Dash, Some(Vec3::Z)).is_cast());
        assert_eq!(state.cast_ability(AbilityKind::Flash, Some(Vec3::X)), CastOutcome::Channeling);
        assert!(state.player.is_dashing());
        assert!(!state.player.is_flashing());
        assert_eq!(state.cooldowns.last_used(AbilityKind::Flash), None);
    }

    #[test]
    fn test_kill_enemy_scores_once() {
        let mut state = playing_state();
        let id = state.try_spawn_enemy().unwrap();
        assert!(state.kill_enemy(id));
        assert!(!state.kill_enemy(id));
        assert_eq!(state.session.score, 1);
        assert_eq!(state.level.enemies_defeated, 1);
    }

    #[test]
    fn test_spawn_blocked_by_lock_then_released() {
        let mut state = playing_state();
        assert!(state.try_spawn_enemy().is_some());
        assert!(state.try_spawn_enemy().is_none());
        state.time_ms += 2_000.0;
        assert!(state.try_spawn_enemy().is_some());
    }

    #[test]
    fn test_advance_level_restarts_countdown_and_clears_field() {
        let mut state = playing_state();
        let id = state.try_spawn_enemy().unwrap();
        state.cast_ability(AbilityKind::Projectile, None);
        state.kill_enemy(id);
        state.advance_level();
        assert_eq!(state.level.current_level, 2);
        assert_eq!(state.level.enemies_defeated, 0);
        assert_eq!(state.enemies.alive_count(), 0);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.phase(), GamePhase::Countdown);
        assert!(state.enemies.params().move_speed > state.config.enemy.move_speed);
    }

    #[test]
    fn test_spawned_enemy_carries_scaled_health() {
        let mut state = playing_state();
        state.advance_level();
        state.session.countdown = None;
        let id = state.try_spawn_enemy().unwrap();
        let expected = scaled_enemy_params(2, &state.config.level, &state.config.enemy);
        assert_eq!(state.enemies.get(id).unwrap().health, expected.health);
        assert!(expected.health > state.config.enemy.health);
        assert!(expected.damage > state.config.enemy.damage);
    }

    #[test]
    fn test_reset_game_restores_everything() {
        let mut state = playing_state();
        state.cast_ability(AbilityKind::Shield, None);
        state.time_ms = 500.0;
        state.advance_level();
        state.session.countdown = None;
        state.damage_player();
        state.session.score = 9;
        state.end_game();

        state.reset_game();
        assert_eq!(state.session.score, 0);
        assert_eq!(state.level.current_level, 1);
        assert!(state.player.is_alive());
        assert!(!state.player.is_shielded());
        assert_eq!(state.cooldowns.last_used(AbilityKind::Shield), None);
        assert_eq!(state.phase(), GamePhase::Countdown);
        assert_eq!(*state.enemies.params(), scaled_enemy_params(1, &state.config.level, &state.config.enemy));
    }
}
