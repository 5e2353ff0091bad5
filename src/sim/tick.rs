//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec3;

use super::ability::AbilityKind;
use super::collision::resolve_collisions;
use super::projectile::ProjectileSource;
use super::session::{CountdownStep, GamePhase};
use super::state::{GameEvent, GameState, secs_to_ms};
use crate::{ground_direction, ground_distance};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// New destination for free movement (ground point under the cursor)
    pub move_target: Option<Vec3>,
    /// Cast direction; the player's facing is used when unset
    pub aim: Option<Vec3>,
    /// Ability keys pressed this tick, in press order
    pub abilities: Vec<AbilityKind>,
    /// Pause toggle
    pub pause: bool,
    /// Debug toggle for enemy fire
    pub toggle_enemy_projectiles: bool,
    /// Full reset after game over
    pub restart: bool,
    /// Demo mode - AI plays the game
    pub autopilot: bool,
}

impl TickInput {
    /// Drop the one-shot presses, keeping held state (movement, autopilot)
    pub fn clear_one_shots(&mut self) {
        self.abilities.clear();
        self.pause = false;
        self.toggle_enemy_projectiles = false;
        self.restart = false;
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.restart && state.phase() == GamePhase::GameOver {
        state.reset_game();
        return;
    }

    // Handle pause toggle
    if input.pause && state.session.toggle_pause() {
        let event = if state.session.is_paused {
            log::info!("Paused at t={:.0}ms", state.time_ms);
            GameEvent::Paused
        } else {
            log::info!("Resumed");
            GameEvent::Resumed
        };
        state.events.push(event);
    }

    if input.toggle_enemy_projectiles {
        let enabled = state.session.toggle_enemy_projectiles();
        log::info!("Enemy projectiles {}", if enabled { "enabled" } else { "disabled" });
        state.events.push(GameEvent::EnemyProjectilesToggled { enabled });
    }

    match state.phase() {
        GamePhase::Paused | GamePhase::GameOver => return,
        GamePhase::Countdown => {
            tick_countdown(state, dt);
            return;
        }
        GamePhase::Playing => {}
    }

    state.time_ms += secs_to_ms(dt);
    state.time_ticks += 1;
    let now = state.time_ms;

    // Demo mode - AI plays the game
    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }
    let input = &input;

    // 1. Player: movement intent, casts, channel/effect timers, free movement
    if let Some(target) = input.move_target {
        if state.player.is_alive() {
            state.player.set_move_target(target);
        }
    }
    for &kind in &input.abilities {
        state.cast_ability(kind, input.aim);
    }
    state.player.update_effects(now);
    let (player_cfg, map) = (state.config.player, state.config.map);
    state.player.step_movement(&player_cfg, &map);
    state.cooldowns.expire(&state.config.abilities, now);

    // 2. Enemies: spawn, steer, attack
    state.try_spawn_enemy();
    let shots = state.enemies.update(
        state.player.position,
        now,
        state.session.enemy_projectiles_enabled,
        &state.config.enemy,
        &state.config.map,
    );
    for shot in shots {
        state.spawn_projectile(shot.origin, shot.direction, shot.speed, ProjectileSource::Enemy);
    }

    // 3. Projectiles
    for projectile in &mut state.projectiles {
        projectile.advance(dt);
    }
    let lifetime_ms = secs_to_ms(state.config.abilities.projectile_lifetime);
    let mut expired = Vec::new();
    state.projectiles.retain(|p| {
        let dead = p.is_expired(now, lifetime_ms);
        if dead {
            expired.push(p.id);
        }
        !dead
    });
    state
        .events
        .extend(expired.into_iter().map(|id| GameEvent::ProjectileExpired { id }));

    // 4. Collisions
    resolve_collisions(state);

    // 5. Progression
    if state.level.is_level_complete && state.phase() == GamePhase::Playing {
        state.advance_level();
    }

    state.normalize_order();
}

fn tick_countdown(state: &mut GameState, dt: f32) {
    match state.session.update_countdown(dt) {
        CountdownStep::Ticked(remaining) => {
            state.events.push(GameEvent::CountdownTick { remaining });
        }
        CountdownStep::Finished => {
            // Fresh field for the round; the spawn lock starts released
            state.enemies.reset();
            log::info!(
                "Level {} started: defeat {} enemies",
                state.level.current_level,
                state.level.enemies_per_level
            );
            state.events.push(GameEvent::RoundStarted {
                level: state.level.current_level,
            });
        }
        CountdownStep::Waiting | CountdownStep::Idle => {}
    }
}

/// Kite distance the autopilot tries to keep from the nearest enemy
const AUTOPILOT_KITE_DISTANCE: f32 = 10.0;
/// Enemy projectile distance that makes the autopilot raise its shield
const AUTOPILOT_SHIELD_DISTANCE: f32 = 4.0;
/// Enemy distance that makes the autopilot dash away
const AUTOPILOT_DASH_DISTANCE: f32 = 3.0;

/// Fill `input` with demo-mode decisions for this tick
fn autopilot(state: &GameState, input: &mut TickInput) {
    let player_pos = state.player.position;

    let nearest = state
        .enemies
        .enemies()
        .iter()
        .filter(|e| e.is_alive)
        .min_by(|a, b| {
            ground_distance(a.position, player_pos)
                .partial_cmp(&ground_distance(b.position, player_pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let threatened = state.projectiles.iter().any(|p| {
        p.source == ProjectileSource::Enemy
            && ground_distance(p.position, player_pos) < AUTOPILOT_SHIELD_DISTANCE
    });
    let shield_ready = state.remaining_cooldown(AbilityKind::Shield) == 0.0;
    if threatened && shield_ready && !state.player.is_shielded() {
        input.abilities.push(AbilityKind::Shield);
    }

    let Some(enemy) = nearest else {
        // Drift back toward the middle while the field is empty
        input.move_target = Some(Vec3::ZERO);
        return;
    };

    let dist = ground_distance(enemy.position, player_pos);
    let toward = ground_direction(player_pos, enemy.position);
    input.aim = Some(toward);

    if dist < AUTOPILOT_KITE_DISTANCE {
        // Back off, sliding sideways a little so we don't pin ourselves in a corner
        let side = Vec3::new(-toward.z, 0.0, toward.x);
        let sway = (state.time_ticks as f32 * 0.02).sin();
        input.move_target = Some(player_pos - toward * 3.0 + side * sway * 2.0);
        if dist < AUTOPILOT_DASH_DISTANCE {
            input.aim = Some(-toward);
            input.abilities.push(AbilityKind::Dash);
        }
    } else {
        input.move_target = None;
    }

    if dist <= state.config.abilities.shot_range && input.aim == Some(toward) {
        input.abilities.push(AbilityKind::Projectile);
    }
}
