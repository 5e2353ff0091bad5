//! The player avatar
//!
//! Timed effects (invulnerability, shield, dash/flash animation) are stored as
//! absolute expiry times on the simulation clock and applied in
//! [`Player::update_effects`]. Resetting the player drops them, so an effect
//! scheduled before a reset can never fire afterwards.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::{Millis, secs_to_ms};
use crate::tuning::{MapConfig, PlayerConfig};
use crate::{ease_out_quad, flatten, forward_from_yaw, yaw_of};

/// Which channeled ability is moving the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationKind {
    Dash,
    Flash,
}

/// Time-bounded position interpolation driven by Dash or Flash
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilityAnimation {
    pub kind: AnimationKind,
    pub start_pos: Vec3,
    pub target_pos: Vec3,
    pub start_time: Millis,
    pub duration_ms: Millis,
}

impl AbilityAnimation {
    /// Normalized progress in [0, 1]
    pub fn progress(&self, now: Millis) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now - self.start_time) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    /// Where the player should be at `now`.
    ///
    /// Dash eases out along the path. Flash holds at the start for the first
    /// half (telegraph), then sits on the target for the second half before
    /// the flag clears.
    pub fn position_at(&self, now: Millis) -> Vec3 {
        let t = self.progress(now);
        match self.kind {
            AnimationKind::Dash => self.start_pos.lerp(self.target_pos, ease_out_quad(t)),
            AnimationKind::Flash => {
                if t >= 0.5 {
                    self.target_pos
                } else {
                    self.start_pos
                }
            }
        }
    }

    pub fn is_finished(&self, now: Millis) -> bool {
        now - self.start_time >= self.duration_ms
    }
}

/// Result of a damage attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Shielded, in the grace window, or already dead
    Ignored,
    Hurt { health: i32 },
    Killed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec3,
    /// Displacement applied last tick (units per frame)
    pub velocity: Vec3,
    /// Yaw; abilities fire along it when no aim is given
    pub facing: f32,
    pub health: i32,
    pub max_health: i32,
    is_alive: bool,
    /// Where free movement is heading (cleared on arrival)
    move_target: Option<Vec3>,
    invulnerable_until: Option<Millis>,
    shielded_until: Option<Millis>,
    animation: Option<AbilityAnimation>,
}

impl Player {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            position: Self::start_position(config),
            velocity: Vec3::ZERO,
            facing: 0.0,
            health: config.max_health,
            max_health: config.max_health,
            is_alive: true,
            move_target: None,
            invulnerable_until: None,
            shielded_until: None,
            animation: None,
        }
    }

    pub fn start_position(config: &PlayerConfig) -> Vec3 {
        Vec3::new(0.0, config.start_height, 0.0)
    }

    /// Back to spawn with full health; pending effects are discarded
    pub fn reset(&mut self, config: &PlayerConfig) {
        *self = Self::new(config);
    }

    pub fn is_alive(&self) -> bool {
        self.is_alive
    }

    /// True in the post-hit grace window and while shielded
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_until.is_some() || self.is_shielded()
    }

    pub fn is_shielded(&self) -> bool {
        self.shielded_until.is_some()
    }

    pub fn is_dashing(&self) -> bool {
        matches!(self.animation, Some(a) if a.kind == AnimationKind::Dash)
    }

    pub fn is_flashing(&self) -> bool {
        matches!(self.animation, Some(a) if a.kind == AnimationKind::Flash)
    }

    /// Dash or Flash in progress; free movement is ignored
    pub fn is_channeling(&self) -> bool {
        self.animation.is_some()
    }

    pub fn animation(&self) -> Option<&AbilityAnimation> {
        self.animation.as_ref()
    }

    pub fn move_target(&self) -> Option<Vec3> {
        self.move_target
    }

    pub fn forward(&self) -> Vec3 {
        forward_from_yaw(self.facing)
    }

    /// Set a new destination for free movement (height is kept)
    pub fn set_move_target(&mut self, target: Vec3) {
        self.move_target = Some(Vec3::new(target.x, self.position.y, target.z));
    }

    /// Step toward `target` by at most `base_speed`, snapping when close.
    ///
    /// Returns true once the player is on the target.
    pub fn update_position(&mut self, target: Vec3, config: &PlayerConfig, map: &MapConfig) -> bool {
        let target = clamp_to_map(Vec3::new(target.x, self.position.y, target.z), map, 0.0);
        let offset = target - self.position;
        let distance = offset.length();

        if distance <= config.arrival_epsilon {
            self.velocity = offset;
            self.position = target;
            return true;
        }

        let step = distance.min(config.base_speed);
        let dir = offset / distance;
        self.velocity = dir * step;
        self.position += self.velocity;
        self.facing = yaw_of(dir);
        (target - self.position).length() <= config.arrival_epsilon
    }

    /// Per-tick free movement toward the stored target
    pub fn step_movement(&mut self, config: &PlayerConfig, map: &MapConfig) {
        if !self.is_alive || self.is_channeling() {
            return;
        }
        let Some(target) = self.move_target else {
            self.velocity = Vec3::ZERO;
            return;
        };
        if self.update_position(target, config, map) {
            self.position = Vec3::new(target.x, self.position.y, target.z);
            self.position = clamp_to_map(self.position, map, 0.0);
            self.move_target = None;
        }
    }

    /// Apply a hit of `damage` at time `now`
    pub fn take_damage(&mut self, damage: i32, now: Millis, config: &PlayerConfig) -> DamageOutcome {
        if !self.is_alive || self.is_invulnerable() {
            return DamageOutcome::Ignored;
        }

        self.health = (self.health - damage).max(0);
        self.invulnerable_until = Some(now + secs_to_ms(config.invulnerability_secs));

        if self.health <= 0 {
            self.is_alive = false;
            self.move_target = None;
            self.animation = None;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Hurt { health: self.health }
        }
    }

    pub fn begin_shield(&mut self, now: Millis, duration_secs: f32) {
        self.shielded_until = Some(now + secs_to_ms(duration_secs));
    }

    /// Start a dash along `dir`; caller guarantees nothing is channeling
    pub fn begin_dash(&mut self, now: Millis, dir: Vec3, distance: f32, duration_secs: f32, map: &MapConfig) {
        let dir = flatten(dir).normalize_or_zero();
        let target = clamp_to_map(self.position + dir * distance, map, 0.0);
        self.begin_animation(AnimationKind::Dash, now, target, duration_secs);
        if dir != Vec3::ZERO {
            self.facing = yaw_of(dir);
        }
    }

    /// Start a flash along `dir`; relocation lands after `telegraph_secs`
    pub fn begin_flash(&mut self, now: Millis, dir: Vec3, distance: f32, telegraph_secs: f32, map: &MapConfig) {
        let dir = flatten(dir).normalize_or_zero();
        let target = clamp_to_map(self.position + dir * distance, map, 0.0);
        self.begin_animation(AnimationKind::Flash, now, target, telegraph_secs * 2.0);
        if dir != Vec3::ZERO {
            self.facing = yaw_of(dir);
        }
    }

    fn begin_animation(&mut self, kind: AnimationKind, now: Millis, target: Vec3, duration_secs: f32) {
        self.animation = Some(AbilityAnimation {
            kind,
            start_pos: self.position,
            target_pos: target,
            start_time: now,
            duration_ms: secs_to_ms(duration_secs),
        });
        // The channel replaces whatever free movement was queued
        self.move_target = None;
        self.velocity = Vec3::ZERO;
    }

    /// Expire timed effects and drive any active animation
    pub fn update_effects(&mut self, now: Millis) {
        if self.invulnerable_until.is_some_and(|until| now >= until) {
            self.invulnerable_until = None;
        }
        if self.shielded_until.is_some_and(|until| now >= until) {
            self.shielded_until = None;
        }
        if let Some(anim) = self.animation {
            let previous = self.position;
            self.position = anim.position_at(now);
            self.velocity = self.position - previous;
            if anim.is_finished(now) {
                self.position = anim.target_pos;
                self.animation = None;
            }
        }
    }
}

/// Keep a point inside the map, `inset` units from each edge
pub fn clamp_to_map(pos: Vec3, map: &MapConfig, inset: f32) -> Vec3 {
    let hw = (map.half_width() - inset).max(0.0);
    let hh = (map.half_height() - inset).max(0.0);
    Vec3::new(pos.x.clamp(-hw, hw), pos.y, pos.z.clamp(-hh, hh))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Player, PlayerConfig, MapConfig) {
        let config = PlayerConfig::default();
        (Player::new(&config), config, MapConfig::default())
    }

    #[test]
    fn test_single_hit_kills_then_reset_restores() {
        let (mut player, config, _) = setup();
        assert_eq!(player.position, Vec3::new(0.0, 2.5, 0.0));
        assert_eq!(player.take_damage(100, 0.0, &config), DamageOutcome::Killed);
        assert!(!player.is_alive());
        assert_eq!(player.health, 0);

        player.reset(&config);
        assert!(player.is_alive());
        assert_eq!(player.health, 100);
        assert_eq!(player.position, Vec3::new(0.0, 2.5, 0.0));
        assert!(!player.is_invulnerable());
    }

    #[test]
    fn test_grace_window_blocks_second_hit() {
        let (mut player, config, _) = setup();
        assert_eq!(player.take_damage(30, 0.0, &config), DamageOutcome::Hurt { health: 70 });
        player.update_effects(500.0);
        assert_eq!(player.take_damage(30, 500.0, &config), DamageOutcome::Ignored);
        assert_eq!(player.health, 70);

        player.update_effects(1_000.0);
        assert!(!player.is_invulnerable());
        assert_eq!(player.take_damage(30, 1_000.0, &config), DamageOutcome::Hurt { health: 40 });
    }

    #[test]
    fn test_shield_blocks_and_expires() {
        let (mut player, config, _) = setup();
        player.begin_shield(0.0, 3.0);
        assert!(player.is_shielded());
        assert!(player.is_invulnerable());
        assert_eq!(player.take_damage(100, 100.0, &config), DamageOutcome::Ignored);
        player.update_effects(3_000.0);
        assert!(!player.is_shielded());
        assert_eq!(player.take_damage(100, 3_000.0, &config), DamageOutcome::Killed);
    }

    #[test]
    fn test_move_never_overshoots() {
        let (mut player, config, map) = setup();
        let target = Vec3::new(0.12, 0.0, 0.0);
        let arrived = player.update_position(target, &config, &map);
        assert!(arrived);
        assert!(player.position.x <= 0.12 + 1e-6);
    }

    #[test]
    fn test_step_movement_arrives_and_clears_target() {
        let (mut player, config, map) = setup();
        player.set_move_target(Vec3::new(1.0, 0.0, 0.0));
        for _ in 0..20 {
            player.step_movement(&config, &map);
        }
        assert_eq!(player.move_target(), None);
        assert!((player.position.x - 1.0).abs() < 1e-5);
        assert_eq!(player.position.y, 2.5);
    }

    #[test]
    fn test_dash_eases_and_completes() {
        let (mut player, config, map) = setup();
        player.set_move_target(Vec3::new(-5.0, 0.0, 0.0));
        player.begin_dash(0.0, Vec3::X, 10.0, 0.3, &map);
        assert!(player.is_dashing());
        assert_eq!(player.move_target(), None);

        player.update_effects(150.0);
        // Ease-out: past the halfway mark at half time
        assert!(player.position.x > 5.0 && player.position.x < 10.0);

        // Movement input is ignored mid-dash
        player.set_move_target(Vec3::new(-5.0, 0.0, 0.0));
        let before = player.position;
        player.step_movement(&config, &map);
        assert_eq!(player.position, before);

        player.update_effects(300.0);
        assert!(!player.is_dashing());
        assert!((player.position.x - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_flash_relocates_before_flag_clears() {
        let (mut player, _, map) = setup();
        player.begin_flash(0.0, Vec3::Z, 5.0, 0.15, &map);
        assert!(player.is_flashing());

        player.update_effects(100.0);
        assert_eq!(player.position.z, 0.0);

        player.update_effects(150.0);
        assert!((player.position.z - 5.0).abs() < 1e-5);
        assert!(player.is_flashing());

        player.update_effects(300.0);
        assert!(!player.is_flashing());
        assert!((player.position.z - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_dash_clamped_to_map() {
        let (mut player, _, map) = setup();
        player.position = Vec3::new(28.0, 2.5, 0.0);
        player.begin_dash(0.0, Vec3::X, 10.0, 0.3, &map);
        player.update_effects(300.0);
        assert_eq!(player.position.x, 30.0);
    }

    #[test]
    fn test_reset_discards_pending_effects() {
        let (mut player, config, map) = setup();
        player.begin_shield(0.0, 3.0);
        player.begin_dash(0.0, Vec3::X, 10.0, 0.3, &map);
        player.reset(&config);
        player.update_effects(100.0);
        assert!(!player.is_shielded());
        assert!(!player.is_dashing());
        assert_eq!(player.position, Player::start_position(&config));
    }
}
