//! Collision resolution between the player, enemies and projectiles
//!
//! All checks are ground-plane distance tests against
//! `min_collision_distance`; there is no rigid-body response.

use super::player::DamageOutcome;
use super::projectile::ProjectileSource;
use super::state::GameState;
use crate::ground_distance;

/// What one collision pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// Enemies killed by player projectiles
    pub enemies_killed: u32,
    /// Projectiles consumed by a hit
    pub projectiles_consumed: u32,
    /// Hits that actually damaged the player
    pub player_hits: u32,
    /// The pass ended the game
    pub player_died: bool,
}

/// Run one collision pass; no-op unless the round is playing.
///
/// Order: body contact, then projectiles in id order. A player projectile is
/// spent on the first living enemy it overlaps. The pass stops as soon as the
/// player dies.
pub fn resolve_collisions(state: &mut GameState) -> CollisionReport {
    let mut report = CollisionReport::default();
    if !state.session.is_running() {
        return report;
    }
    if !state.player.is_alive() {
        report.player_died = true;
        state.end_game();
        return report;
    }

    let min_dist = state.config.collision.min_collision_distance;
    let contact_dist = min_dist * state.config.collision.contact_multiplier;

    // Body contact with enemies
    let touching: Vec<u32> = state
        .enemies
        .enemies()
        .iter()
        .filter(|e| e.is_alive && ground_distance(e.position, state.player.position) < contact_dist)
        .map(|e| e.id)
        .collect();
    for _enemy_id in touching {
        if state.player.is_invulnerable() {
            break;
        }
        if register_hit(state, &mut report) {
            return report;
        }
    }

    // Projectiles
    let shots: Vec<(u32, ProjectileSource, glam::Vec3)> = state
        .projectiles
        .iter()
        .map(|p| (p.id, p.source, p.position))
        .collect();
    let mut spent: Vec<u32> = Vec::new();

    for (projectile_id, source, position) in shots {
        match source {
            ProjectileSource::Enemy => {
                if state.player.is_invulnerable() {
                    continue;
                }
                if ground_distance(position, state.player.position) < min_dist {
                    spent.push(projectile_id);
                    if register_hit(state, &mut report) {
                        break;
                    }
                }
            }
            ProjectileSource::Player => {
                let target = state
                    .enemies
                    .enemies()
                    .iter()
                    .find(|e| e.is_alive && ground_distance(e.position, position) < min_dist)
                    .map(|e| e.id);
                if let Some(enemy_id) = target {
                    spent.push(projectile_id);
                    // A stale id just means someone else got there first
                    if state.kill_enemy(enemy_id) {
                        report.enemies_killed += 1;
                    }
                }
            }
        }
    }

    if !spent.is_empty() {
        state.projectiles.retain(|p| !spent.contains(&p.id));
        report.projectiles_consumed = spent.len() as u32;
    }
    report
}

/// Damage the player once; returns true if that ended the game
fn register_hit(state: &mut GameState, report: &mut CollisionReport) -> bool {
    match state.damage_player() {
        DamageOutcome::Ignored => false,
        DamageOutcome::Hurt { .. } => {
            report.player_hits += 1;
            false
        }
        DamageOutcome::Killed => {
            report.player_hits += 1;
            report.player_died = true;
            state.end_game();
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;
    use glam::Vec3;

    fn playing_state() -> GameState {
        let mut state = GameState::with_seed(3);
        state.session.countdown = None;
        state
    }

    fn enemy_at(state: &mut GameState, position: Vec3) -> u32 {
        let id = state.next_entity_id();
        state.enemies.spawn_at(id, position, state.time_ms);
        id
    }

    #[test]
    fn test_enemy_projectile_hits_player() {
        let mut state = playing_state();
        let origin = state.player.position + Vec3::new(0.5, 0.0, 0.0);
        let id = state.spawn_projectile(origin, Vec3::NEG_X, 0.7, ProjectileSource::Enemy);

        let report = resolve_collisions(&mut state);
        assert!(state.projectiles.iter().all(|p| p.id != id));
        assert_eq!(report.player_hits, 1);
        assert!(!state.player.is_alive());
        assert_eq!(state.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_enemy_projectile_passes_through_shield() {
        let mut state = playing_state();
        state.player.begin_shield(0.0, 3.0);
        let origin = state.player.position + Vec3::new(0.5, 0.0, 0.0);
        state.spawn_projectile(origin, Vec3::NEG_X, 0.7, ProjectileSource::Enemy);

        let report = resolve_collisions(&mut state);
        assert_eq!(report, CollisionReport::default());
        assert_eq!(state.projectiles.len(), 1);
        assert!(state.player.is_alive());
    }

    #[test]
    fn test_player_projectile_kills_only_first_enemy() {
        let mut state = playing_state();
        let first = enemy_at(&mut state, Vec3::new(10.0, 3.0, 0.0));
        let second = enemy_at(&mut state, Vec3::new(10.2, 3.0, 0.0));
        state.spawn_projectile(Vec3::new(10.1, 2.5, 0.0), Vec3::X, 0.8, ProjectileSource::Player);

        let report = resolve_collisions(&mut state);
        assert_eq!(report.enemies_killed, 1);
        assert!(state.enemies.get(first).is_none());
        assert!(state.enemies.get(second).is_some());
        assert!(state.projectiles.is_empty());
        assert_eq!(state.session.score, 1);
    }

    #[test]
    fn test_two_projectiles_on_one_enemy_kill_once() {
        let mut state = playing_state();
        enemy_at(&mut state, Vec3::new(10.0, 3.0, 0.0));
        state.spawn_projectile(Vec3::new(10.0, 2.5, 0.1), Vec3::X, 0.8, ProjectileSource::Player);
        state.spawn_projectile(Vec3::new(10.0, 2.5, -0.1), Vec3::X, 0.8, ProjectileSource::Player);

        let report = resolve_collisions(&mut state);
        assert_eq!(report.enemies_killed, 1);
        // The second shot found nothing left to hit and keeps flying
        assert_eq!(state.projectiles.len(), 1);
        assert_eq!(state.level.enemies_defeated, 1);
    }

    #[test]
    fn test_contact_uses_wider_radius() {
        let mut state = playing_state();
        // 1.0 is outside 0.75 but inside 0.75 * 1.5
        let position = state.player.position + Vec3::new(1.0, 0.5, 0.0);
        enemy_at(&mut state, position);
        let report = resolve_collisions(&mut state);
        assert_eq!(report.player_hits, 1);
        assert!(report.player_died);
    }

    #[test]
    fn test_contact_with_many_enemies_hits_once() {
        let mut config = crate::GameConfig::default();
        config.player.damage_per_hit = 10;
        let mut state = GameState::new(config, 3);
        state.session.countdown = None;
        let center = state.player.position;
        for dx in [0.2, -0.2, 0.4] {
            enemy_at(&mut state, center + Vec3::new(dx, 0.0, 0.0));
        }
        let report = resolve_collisions(&mut state);
        assert_eq!(report.player_hits, 1);
        assert_eq!(state.player.health, 90);
    }

    #[test]
    fn test_player_death_stops_pass() {
        let mut state = playing_state();
        let enemy = enemy_at(&mut state, Vec3::new(10.0, 3.0, 0.0));
        let origin = state.player.position + Vec3::new(0.5, 0.0, 0.0);
        let lethal = state.spawn_projectile(origin, Vec3::NEG_X, 0.7, ProjectileSource::Enemy);
        let shot = state.spawn_projectile(Vec3::new(10.0, 2.5, 0.0), Vec3::X, 0.8, ProjectileSource::Player);

        let report = resolve_collisions(&mut state);
        assert!(report.player_died);
        assert_eq!(report.enemies_killed, 0);
        assert_eq!(state.phase(), GamePhase::GameOver);
        // The later player shot was never resolved
        assert!(state.enemies.get(enemy).is_some());
        assert_eq!(state.enemies.alive_count(), 1);
        assert!(state.projectiles.iter().any(|p| p.id == shot));
        assert!(state.projectiles.iter().all(|p| p.id != lethal));
        assert_eq!(state.session.score, 0);
    }

    #[test]
    fn test_pass_skipped_when_paused() {
        let mut state = playing_state();
        state.session.toggle_pause();
        let origin = state.player.position;
        state.spawn_projectile(origin, Vec3::X, 0.7, ProjectileSource::Enemy);
        assert_eq!(resolve_collisions(&mut state), CollisionReport::default());
        assert!(state.player.is_alive());
    }
}
