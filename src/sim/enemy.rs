//! Enemy swarm: throttled spawning, pursuit with separation, ranged attacks
//!
//! Enemies chase the player while pushing apart from each other with a cubic
//! falloff, so the pack spreads out instead of stacking on one point.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::player::clamp_to_map;
use super::state::{Millis, secs_to_ms};
use crate::tuning::{EnemyTuning, MapConfig};
use crate::{ground_direction, ground_distance, yaw_of};

/// Per-level enemy parameters, replaced wholesale on level-up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyParams {
    /// Units per frame
    pub move_speed: f32,
    /// Scaled per level for the HUD; player shots still kill in one hit
    pub health: f32,
    /// Scaled per level for the HUD; hits on the player use `player.damage_per_hit`
    pub damage: f32,
    /// Seconds the spawn lock is held after each spawn
    pub spawn_interval: f32,
    pub projectile_speed: f32,
}

impl EnemyParams {
    pub fn from_tuning(tuning: &EnemyTuning) -> Self {
        Self {
            move_speed: tuning.move_speed,
            health: tuning.health,
            damage: tuning.damage,
            spawn_interval: tuning.spawn_interval,
            projectile_speed: tuning.projectile_speed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub position: Vec3,
    /// Yaw toward the player
    pub facing: f32,
    pub is_alive: bool,
    /// Spawn health from the level parameters, exposed for health bars
    pub health: f32,
    /// None until the first shot
    pub last_attack_time: Option<Millis>,
}

/// A shot an enemy wants to fire this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyShot {
    pub enemy_id: u32,
    pub origin: Vec3,
    pub direction: Vec3,
    pub speed: f32,
}

/// Steering result for one enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    /// Normalized blend of pursuit and separation
    pub direction: Vec3,
    /// Unit vector toward the player
    pub pursuit: Vec3,
    /// Averaged, falloff-weighted push away from neighbors
    pub separation: Vec3,
    pub neighbors: usize,
}

impl Steering {
    pub fn is_crowded(&self) -> bool {
        self.neighbors > 0
    }
}

/// Blend weights (pursuit, separation)
const CROWDED_WEIGHTS: (f32, f32) = (0.2, 0.8);
const CLEAR_WEIGHTS: (f32, f32) = (0.8, 0.2);

/// Pursuit + separation for the enemy `id` at `position`.
///
/// `others` holds the positions of every living enemy (including `id`, which
/// is skipped).
pub fn compute_steering(id: u32, position: Vec3, player_pos: Vec3, others: &[(u32, Vec3)], min_distance: f32) -> Steering {
    let pursuit = ground_direction(position, player_pos);

    let mut separation = Vec3::ZERO;
    let mut neighbors = 0usize;
    for &(other_id, other_pos) in others {
        if other_id == id {
            continue;
        }
        let dist = ground_distance(position, other_pos);
        if dist < min_distance {
            neighbors += 1;
            let falloff = ((min_distance - dist) / min_distance).powi(3);
            separation += ground_direction(other_pos, position) * falloff;
        }
    }
    if neighbors > 0 {
        separation /= neighbors as f32;
    }

    let (follow, separate) = if neighbors > 0 { CROWDED_WEIGHTS } else { CLEAR_WEIGHTS };
    let direction = (pursuit * follow + separation * separate).normalize_or_zero();

    Steering {
        direction,
        pursuit,
        separation,
        neighbors,
    }
}

/// Random point on one of the four map edges, `margin` units inside
pub fn random_edge_position(rng: &mut impl Rng, map: &MapConfig, margin: f32, height: f32) -> Vec3 {
    let span_x = map.width - margin * 2.0;
    let span_z = map.height - margin * 2.0;
    let inner_x = map.half_width() - margin;
    let inner_z = map.half_height() - margin;

    let (x, z) = match rng.random_range(0..4u8) {
        // top
        0 => (rng.random::<f32>() * span_x - inner_x, -inner_z),
        // right
        1 => (inner_x, rng.random::<f32>() * span_z - inner_z),
        // bottom
        2 => (rng.random::<f32>() * span_x - inner_x, inner_z),
        // left
        _ => (-inner_x, rng.random::<f32>() * span_z - inner_z),
    };
    Vec3::new(x, height, z)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySwarm {
    enemies: Vec<Enemy>,
    params: EnemyParams,
    /// Spawn lock: no new spawn until the clock reaches this
    spawn_lock_until: Option<Millis>,
}

impl EnemySwarm {
    pub fn new(params: EnemyParams) -> Self {
        Self {
            enemies: Vec::new(),
            params,
            spawn_lock_until: None,
        }
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn get(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn alive_count(&self) -> u32 {
        self.enemies.iter().filter(|e| e.is_alive).count() as u32
    }

    pub fn params(&self) -> &EnemyParams {
        &self.params
    }

    /// Swap in new per-level parameters; read from the next update on
    pub fn update_config(&mut self, params: EnemyParams) {
        self.params = params;
    }

    /// Drop every enemy and release the spawn lock
    pub fn reset(&mut self) {
        self.enemies.clear();
        self.spawn_lock_until = None;
    }

    pub fn is_spawn_pending(&self, now: Millis) -> bool {
        self.spawn_lock_until.is_some_and(|until| now < until)
    }

    /// Whether another enemy may appear without exceeding the level quota
    pub fn can_spawn(&self, now: Millis, enemies_defeated: u32, quota: u32) -> bool {
        !self.is_spawn_pending(now) && enemies_defeated + self.alive_count() < quota
    }

    /// Add an enemy and take the spawn lock for one spawn interval
    pub fn spawn_at(&mut self, id: u32, position: Vec3, now: Millis) -> &Enemy {
        self.spawn_lock_until = Some(now + secs_to_ms(self.params.spawn_interval));
        self.enemies.push(Enemy {
            id,
            position,
            facing: 0.0,
            is_alive: true,
            health: self.params.health,
            last_attack_time: None,
        });
        &self.enemies[self.enemies.len() - 1]
    }

    /// Remove a living enemy; None if it is already gone
    pub fn remove(&mut self, id: u32) -> Option<Enemy> {
        let idx = self.enemies.iter().position(|e| e.id == id && e.is_alive)?;
        let mut enemy = self.enemies.remove(idx);
        enemy.is_alive = false;
        Some(enemy)
    }

    /// Steer every living enemy one frame and collect the shots they fire.
    ///
    /// Steering reads positions from the start of the frame so the result
    /// does not depend on iteration order.
    pub fn update(
        &mut self,
        player_pos: Vec3,
        now: Millis,
        attacks_enabled: bool,
        tuning: &EnemyTuning,
        map: &MapConfig,
    ) -> Vec<EnemyShot> {
        let positions: Vec<(u32, Vec3)> = self
            .enemies
            .iter()
            .filter(|e| e.is_alive)
            .map(|e| (e.id, e.position))
            .collect();
        let attack_cooldown_ms = secs_to_ms(tuning.attack_cooldown);
        let mut shots = Vec::new();

        for enemy in self.enemies.iter_mut().filter(|e| e.is_alive) {
            let steering = compute_steering(
                enemy.id,
                enemy.position,
                player_pos,
                &positions,
                tuning.min_enemy_distance,
            );
            let speed = if steering.is_crowded() {
                self.params.move_speed * tuning.crowd_speed_multiplier
            } else {
                self.params.move_speed
            };

            let moved = enemy.position + steering.direction * speed;
            enemy.position = clamp_to_map(Vec3::new(moved.x, tuning.height, moved.z), map, 0.0);

            let to_player = ground_direction(enemy.position, player_pos);
            if to_player != Vec3::ZERO {
                enemy.facing = yaw_of(to_player);
            }

            if !attacks_enabled || to_player == Vec3::ZERO {
                continue;
            }
            let in_range = ground_distance(enemy.position, player_pos) <= tuning.attack_range;
            let ready = enemy
                .last_attack_time
                .is_none_or(|last| now - last >= attack_cooldown_ms);
            if in_range && ready {
                enemy.last_attack_time = Some(now);
                shots.push(EnemyShot {
                    enemy_id: enemy.id,
                    origin: enemy.position + to_player * crate::consts::PROJECTILE_SPAWN_OFFSET,
                    direction: to_player,
                    speed: self.params.projectile_speed,
                });
            }
        }

        shots
    }

    pub fn sort_by_id(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
    }
}
