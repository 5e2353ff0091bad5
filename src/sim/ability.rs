//! Ability registry and cooldown bookkeeping
//!
//! Four abilities bound to Q/W/E/R. Cooldowns are tracked against the
//! simulation clock (milliseconds), which only advances while the round is
//! playing, so nothing comes off cooldown during pause or countdown.

use serde::{Deserialize, Serialize};

use super::state::{Millis, secs_to_ms};
use crate::tuning::AbilityConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Q: straight-line shot
    Projectile,
    /// W: blocks all damage for a while
    Shield,
    /// E: eased lunge along the aim direction
    Dash,
    /// R: short-range teleport after a telegraph
    Flash,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 4] = [
        AbilityKind::Projectile,
        AbilityKind::Shield,
        AbilityKind::Dash,
        AbilityKind::Flash,
    ];

    pub fn key(self) -> char {
        match self {
            AbilityKind::Projectile => 'q',
            AbilityKind::Shield => 'w',
            AbilityKind::Dash => 'e',
            AbilityKind::Flash => 'r',
        }
    }

    /// Map a key press to an ability (case-insensitive)
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'q' => Some(AbilityKind::Projectile),
            'w' => Some(AbilityKind::Shield),
            'e' => Some(AbilityKind::Dash),
            'r' => Some(AbilityKind::Flash),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AbilityKind::Projectile => "Projectile Shot",
            AbilityKind::Shield => "Shield",
            AbilityKind::Dash => "Dash",
            AbilityKind::Flash => "Flash",
        }
    }

    /// Dash and Flash take over movement while active
    pub fn is_channeled(self) -> bool {
        matches!(self, AbilityKind::Dash | AbilityKind::Flash)
    }

    fn index(self) -> usize {
        match self {
            AbilityKind::Projectile => 0,
            AbilityKind::Shield => 1,
            AbilityKind::Dash => 2,
            AbilityKind::Flash => 3,
        }
    }
}

/// Static description of one ability, resolved from tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AbilitySpec {
    pub kind: AbilityKind,
    /// Seconds between uses
    pub cooldown: f32,
    /// Travel distance (shot range, dash/flash distance)
    pub range: Option<f32>,
    /// Seconds the effect lasts
    pub duration: Option<f32>,
}

impl AbilitySpec {
    pub fn resolve(kind: AbilityKind, config: &AbilityConfig) -> Self {
        match kind {
            AbilityKind::Projectile => Self {
                kind,
                cooldown: config.shot_cooldown,
                range: Some(config.shot_range),
                duration: None,
            },
            AbilityKind::Shield => Self {
                kind,
                cooldown: config.shield_cooldown,
                range: None,
                duration: Some(config.shield_duration),
            },
            AbilityKind::Dash => Self {
                kind,
                cooldown: config.dash_cooldown,
                range: Some(config.dash_distance),
                duration: Some(config.dash_duration),
            },
            AbilityKind::Flash => Self {
                kind,
                cooldown: config.flash_cooldown,
                range: Some(config.flash_distance),
                duration: Some(config.flash_telegraph * 2.0),
            },
        }
    }

    pub fn cooldown_ms(&self) -> Millis {
        secs_to_ms(self.cooldown)
    }
}

/// The full registry, in key order
pub fn registry(config: &AbilityConfig) -> [AbilitySpec; 4] {
    AbilityKind::ALL.map(|kind| AbilitySpec::resolve(kind, config))
}

/// Result of trying to cast an ability
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CastOutcome {
    Cast,
    OnCooldown { remaining_secs: f32 },
    /// A dash or flash is already in progress
    Channeling,
    /// Pre-round freeze
    CountdownActive,
    /// Paused, game over, or the player is dead
    Inactive,
}

impl CastOutcome {
    pub fn is_cast(&self) -> bool {
        matches!(self, CastOutcome::Cast)
    }
}

/// Last-used timestamps per ability
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cooldowns {
    last_used: [Option<Millis>; 4],
}

impl Cooldowns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds until `kind` is usable again (<= 0 means ready)
    pub fn remaining_ms(&self, spec: &AbilitySpec, now: Millis) -> Millis {
        match self.last_used[spec.kind.index()] {
            Some(last) => last + spec.cooldown_ms() - now,
            None => 0.0,
        }
    }

    pub fn is_ready(&self, spec: &AbilitySpec, now: Millis) -> bool {
        self.remaining_ms(spec, now) <= 0.0
    }

    /// Cooldown progress for an ability bar: 0 just used, 1 ready
    pub fn ready_ratio(&self, spec: &AbilitySpec, now: Millis) -> f32 {
        let total = spec.cooldown_ms();
        if total <= 0.0 {
            return 1.0;
        }
        let remaining = self.remaining_ms(spec, now).max(0.0);
        (1.0 - remaining / total).clamp(0.0, 1.0) as f32
    }

    pub fn mark_used(&mut self, kind: AbilityKind, now: Millis) {
        self.last_used[kind.index()] = Some(now);
    }

    pub fn last_used(&self, kind: AbilityKind) -> Option<Millis> {
        self.last_used[kind.index()]
    }

    /// Forget timestamps whose cooldown has fully elapsed
    pub fn expire(&mut self, config: &AbilityConfig, now: Millis) {
        for kind in AbilityKind::ALL {
            let spec = AbilitySpec::resolve(kind, config);
            if self.last_used[kind.index()].is_some() && self.is_ready(&spec, now) {
                self.last_used[kind.index()] = None;
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_used = [None; 4];
    }
}
