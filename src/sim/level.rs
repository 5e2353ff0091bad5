//! Level progression
//!
//! Each level has a quota of enemies to defeat. Every scaled quantity grows by
//! the same multiplier, `growth^(level - 1)`: enemy count, speed, health,
//! damage and projectile speed go up, the spawn interval goes down (floored).

use serde::{Deserialize, Serialize};

use super::enemy::EnemyParams;
use crate::tuning::{EnemyTuning, LevelConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelState {
    pub current_level: u32,
    pub max_level: u32,
    pub enemies_per_level: u32,
    pub enemies_defeated: u32,
    pub is_level_complete: bool,
}

/// Difficulty multiplier for `level` (1 at level 1)
pub fn level_multiplier(level: u32, config: &LevelConfig) -> f32 {
    config.growth.powi(level.saturating_sub(1) as i32)
}

/// Enemies that must be defeated to clear `level`
pub fn enemies_for_level(level: u32, config: &LevelConfig) -> u32 {
    let scaled = (config.base_enemies as f32 * level_multiplier(level, config)).round() as u32;
    scaled.max(config.base_enemies)
}

/// Enemy parameters for `level`, derived from the level-1 tuning
pub fn scaled_enemy_params(level: u32, config: &LevelConfig, tuning: &EnemyTuning) -> EnemyParams {
    let m = level_multiplier(level, config);
    EnemyParams {
        move_speed: tuning.move_speed * m,
        health: tuning.health * m,
        damage: tuning.damage * m,
        spawn_interval: (tuning.spawn_interval / m).max(config.min_spawn_interval),
        projectile_speed: tuning.projectile_speed * m,
    }
}

impl LevelState {
    pub fn new(config: &LevelConfig) -> Self {
        Self {
            current_level: 1,
            max_level: config.max_level,
            enemies_per_level: enemies_for_level(1, config),
            enemies_defeated: 0,
            is_level_complete: false,
        }
    }

    /// Count a kill; returns true on the kill that completes the level
    pub fn increment_enemies_defeated(&mut self) -> bool {
        self.enemies_defeated += 1;
        let was_complete = self.is_level_complete;
        self.check_level_completion();
        self.is_level_complete && !was_complete
    }

    pub fn check_level_completion(&mut self) {
        if self.enemies_defeated >= self.enemies_per_level {
            self.is_level_complete = true;
        }
    }

    /// Enemies still needed to clear the level
    pub fn remaining(&self) -> u32 {
        self.enemies_per_level.saturating_sub(self.enemies_defeated)
    }

    pub fn is_final_level(&self) -> bool {
        self.current_level >= self.max_level
    }

    /// Move to the next level (clamped at `max_level`) and return its enemy parameters
    pub fn advance_level(&mut self, config: &LevelConfig, tuning: &EnemyTuning) -> EnemyParams {
        self.current_level = (self.current_level + 1).clamp(1, self.max_level.max(1));
        self.enemies_per_level = enemies_for_level(self.current_level, config);
        self.enemies_defeated = 0;
        self.is_level_complete = false;
        scaled_enemy_params(self.current_level, config, tuning)
    }

    /// Back to level 1 defaults
    pub fn reset_level(&mut self, config: &LevelConfig) {
        *self = Self::new(config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_exactly_at_quota() {
        let config = LevelConfig::default();
        let mut level = LevelState::new(&config);
        assert_eq!(level.enemies_per_level, 5);
        for _ in 0..4 {
            assert!(!level.increment_enemies_defeated());
        }
        assert!(!level.is_level_complete);
        assert!(level.increment_enemies_defeated());
        assert!(level.is_level_complete);
        assert_eq!(level.current_level, 1);

        // Stays complete, reports the transition only once
        assert!(!level.increment_enemies_defeated());
        assert!(level.is_level_complete);
    }

    #[test]
    fn test_advance_resets_counters() {
        let config = LevelConfig::default();
        let tuning = EnemyTuning::default();
        let mut level = LevelState::new(&config);
        for _ in 0..5 {
            level.increment_enemies_defeated();
        }
        let params = level.advance_level(&config, &tuning);
        assert_eq!(level.current_level, 2);
        assert_eq!(level.enemies_defeated, 0);
        assert!(!level.is_level_complete);
        assert_eq!(level.enemies_per_level, 6);
        assert!((params.move_speed - tuning.move_speed * 1.2).abs() < 1e-6);
        assert!(params.spawn_interval < tuning.spawn_interval);
    }

    #[test]
    fn test_quota_grows_monotonically() {
        let config = LevelConfig::default();
        let counts: Vec<u32> = (1..=10).map(|l| enemies_for_level(l, &config)).collect();
        assert_eq!(&counts[..4], &[5, 6, 7, 9]);
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_level_clamped_at_max() {
        let config = LevelConfig {
            max_level: 2,
            ..LevelConfig::default()
        };
        let tuning = EnemyTuning::default();
        let mut level = LevelState::new(&config);
        level.advance_level(&config, &tuning);
        level.advance_level(&config, &tuning);
        assert_eq!(level.current_level, 2);
        assert!(level.is_final_level());
    }

    #[test]
    fn test_spawn_interval_floored() {
        let config = LevelConfig::default();
        let params = scaled_enemy_params(40, &config, &EnemyTuning::default());
        assert_eq!(params.spawn_interval, config.min_spawn_interval);
    }

    #[test]
    fn test_reset_level() {
        let config = LevelConfig::default();
        let mut level = LevelState::new(&config);
        level.advance_level(&config, &EnemyTuning::default());
        level.increment_enemies_defeated();
        level.reset_level(&config);
        assert_eq!(level, LevelState::new(&config));
    }
}
