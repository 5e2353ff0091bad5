//! Data-driven game balance
//!
//! Every tunable constant the simulation reads lives in [`GameConfig`].
//! Defaults mirror [`crate::consts`]; a JSON file may override any subset,
//! since each section is `#[serde(default)]`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Arena bounds (centered on the origin, XZ plane)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: MAP_WIDTH,
            height: MAP_HEIGHT,
        }
    }
}

impl MapConfig {
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.height / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub start_height: f32,
    /// Units per frame
    pub base_speed: f32,
    pub arrival_epsilon: f32,
    pub max_health: i32,
    pub damage_per_hit: i32,
    pub invulnerability_secs: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_height: PLAYER_START_HEIGHT,
            base_speed: PLAYER_BASE_SPEED,
            arrival_epsilon: ARRIVAL_EPSILON,
            max_health: PLAYER_MAX_HEALTH,
            damage_per_hit: DAMAGE_PER_HIT,
            invulnerability_secs: INVULNERABILITY_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Render size of the player; hit tests use `min_collision_distance`
    pub player_radius: f32,
    /// Render size of a projectile; hit tests use `min_collision_distance`
    pub projectile_radius: f32,
    pub min_collision_distance: f32,
    pub contact_multiplier: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            player_radius: PLAYER_RADIUS,
            projectile_radius: PROJECTILE_RADIUS,
            min_collision_distance: MIN_COLLISION_DISTANCE,
            contact_multiplier: CONTACT_MULTIPLIER,
        }
    }
}

/// Ability tuning; cooldowns and durations in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityConfig {
    pub shot_cooldown: f32,
    pub shot_range: f32,
    pub shot_speed: f32,
    pub shot_spawn_offset: f32,
    pub projectile_lifetime: f32,
    pub shield_cooldown: f32,
    pub shield_duration: f32,
    pub dash_cooldown: f32,
    pub dash_duration: f32,
    pub dash_distance: f32,
    pub flash_cooldown: f32,
    pub flash_distance: f32,
    pub flash_telegraph: f32,
}

impl Default for AbilityConfig {
    fn default() -> Self {
        Self {
            shot_cooldown: SHOT_COOLDOWN,
            shot_range: SHOT_RANGE,
            shot_speed: PLAYER_PROJECTILE_SPEED,
            shot_spawn_offset: PROJECTILE_SPAWN_OFFSET,
            projectile_lifetime: PROJECTILE_LIFETIME_SECS,
            shield_cooldown: SHIELD_COOLDOWN,
            shield_duration: SHIELD_DURATION,
            dash_cooldown: DASH_COOLDOWN,
            dash_duration: DASH_DURATION,
            dash_distance: DASH_DISTANCE,
            flash_cooldown: FLASH_COOLDOWN,
            flash_distance: FLASH_DISTANCE,
            flash_telegraph: FLASH_TELEGRAPH,
        }
    }
}

/// Level-1 enemy tuning; the level manager scales these per level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub height: f32,
    /// Units per frame
    pub move_speed: f32,
    pub health: f32,
    pub damage: f32,
    pub projectile_speed: f32,
    pub spawn_interval: f32,
    pub spawn_margin: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub min_enemy_distance: f32,
    pub crowd_speed_multiplier: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            height: ENEMY_HEIGHT,
            move_speed: ENEMY_MOVE_SPEED,
            health: ENEMY_HEALTH,
            damage: ENEMY_DAMAGE,
            projectile_speed: ENEMY_PROJECTILE_SPEED,
            spawn_interval: ENEMY_SPAWN_INTERVAL,
            spawn_margin: ENEMY_SPAWN_MARGIN,
            attack_range: ENEMY_ATTACK_RANGE,
            attack_cooldown: ENEMY_ATTACK_COOLDOWN,
            min_enemy_distance: MIN_ENEMY_DISTANCE,
            crowd_speed_multiplier: CROWD_SPEED_MULTIPLIER,
        }
    }
}

/// Level scaling: every scaled quantity is multiplied by `growth^(level-1)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub base_enemies: u32,
    pub max_level: u32,
    pub growth: f32,
    /// Floor for the (inversely scaled) spawn interval
    pub min_spawn_interval: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            base_enemies: BASE_ENEMIES_PER_LEVEL,
            max_level: MAX_LEVEL,
            growth: LEVEL_GROWTH,
            min_spawn_interval: MIN_SPAWN_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub countdown_secs: u8,
    pub enemy_projectiles_enabled: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            countdown_secs: COUNTDOWN_SECS,
            enemy_projectiles_enabled: true,
        }
    }
}

/// Complete tuning surface for a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub map: MapConfig,
    pub player: PlayerConfig,
    pub collision: CollisionConfig,
    pub abilities: AbilityConfig,
    pub enemy: EnemyTuning,
    pub level: LevelConfig,
    pub session: SessionConfig,
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded game config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Reject values that would stall or break the simulation
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive: [(&'static str, f32); 12] = [
            ("map.width", self.map.width),
            ("map.height", self.map.height),
            ("player.base_speed", self.player.base_speed),
            ("collision.min_collision_distance", self.collision.min_collision_distance),
            ("abilities.shot_speed", self.abilities.shot_speed),
            ("abilities.projectile_lifetime", self.abilities.projectile_lifetime),
            ("abilities.dash_duration", self.abilities.dash_duration),
            ("abilities.flash_telegraph", self.abilities.flash_telegraph),
            ("enemy.move_speed", self.enemy.move_speed),
            ("enemy.spawn_interval", self.enemy.spawn_interval),
            ("enemy.min_enemy_distance", self.enemy.min_enemy_distance),
            ("level.growth", self.level.growth),
        ];
        for (field, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::Invalid {
                    field,
                    value,
                    expected: "a finite value > 0",
                });
            }
        }

        let non_negative: [(&'static str, f32); 6] = [
            ("abilities.shot_cooldown", self.abilities.shot_cooldown),
            ("abilities.shield_cooldown", self.abilities.shield_cooldown),
            ("abilities.dash_cooldown", self.abilities.dash_cooldown),
            ("abilities.flash_cooldown", self.abilities.flash_cooldown),
            ("player.invulnerability_secs", self.player.invulnerability_secs),
            ("level.min_spawn_interval", self.level.min_spawn_interval),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::Invalid {
                    field,
                    value,
                    expected: "a finite value >= 0",
                });
            }
        }

        if self.enemy.spawn_margin * 2.0 >= self.map.width.min(self.map.height) {
            return Err(ConfigError::Invalid {
                field: "enemy.spawn_margin",
                value: self.enemy.spawn_margin,
                expected: "less than half the smaller map dimension",
            });
        }
        if self.player.max_health <= 0 {
            return Err(ConfigError::Invalid {
                field: "player.max_health",
                value: self.player.max_health as f32,
                expected: "> 0",
            });
        }
        if self.level.base_enemies == 0 || self.level.max_level == 0 {
            return Err(ConfigError::Invalid {
                field: "level.base_enemies",
                value: self.level.base_enemies.min(self.level.max_level) as f32,
                expected: "base_enemies and max_level >= 1",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_overrides_subset() {
        let config =
            GameConfig::from_json_str(r#"{ "enemy": { "move_speed": 0.2 }, "level": { "max_level": 3 } }"#)
                .unwrap();
        assert_eq!(config.enemy.move_speed, 0.2);
        assert_eq!(config.enemy.attack_range, ENEMY_ATTACK_RANGE);
        assert_eq!(config.level.max_level, 3);
        assert_eq!(config.player, PlayerConfig::default());
    }

    #[test]
    fn test_rejects_zero_spawn_interval() {
        let err = GameConfig::from_json_str(r#"{ "enemy": { "spawn_interval": 0.0 } }"#).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "enemy.spawn_interval"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            GameConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_json_round_trip_preserves_values() {
        let mut config = GameConfig::default();
        config.abilities.dash_distance = 12.5;
        let back = GameConfig::from_json_str(&config.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_to_json_pretty_returns_result() {
        let json: serde_json::Result<String> = GameConfig::default().to_json_pretty();
        let json = json.unwrap();
        assert!(json.contains("\"dash_distance\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
