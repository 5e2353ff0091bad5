//! Match/session state: score, pause, game over and the pre-round countdown

use serde::{Deserialize, Serialize};

use crate::tuning::SessionConfig;

/// Current phase of the match, derived from the session flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Pre-round freeze; only the countdown runs
    Countdown,
    /// Active gameplay
    Playing,
    /// Frozen by the player
    Paused,
    /// Player died; terminal until reset
    GameOver,
}

const COUNTDOWN_EPSILON: f32 = 1e-4;

/// What one countdown update did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownStep {
    /// No countdown is running
    Idle,
    /// Still counting, no whole second elapsed
    Waiting,
    /// Dropped to this many seconds
    Ticked(u8),
    /// Reached zero and cleared
    Finished,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u64,
    pub is_paused: bool,
    pub is_game_over: bool,
    /// Seconds left in the pre-round freeze
    pub countdown: Option<u8>,
    /// Debug toggle for enemy fire
    pub enemy_projectiles_enabled: bool,
    /// Seconds accumulated toward the next countdown step
    countdown_elapsed: f32,
}

impl SessionState {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            score: 0,
            is_paused: false,
            is_game_over: false,
            countdown: None,
            enemy_projectiles_enabled: config.enemy_projectiles_enabled,
            countdown_elapsed: 0.0,
        }
    }

    pub fn phase(&self) -> GamePhase {
        if self.is_game_over {
            GamePhase::GameOver
        } else if self.countdown.is_some() {
            GamePhase::Countdown
        } else if self.is_paused {
            GamePhase::Paused
        } else {
            GamePhase::Playing
        }
    }

    /// True when per-frame gameplay updates should run
    pub fn is_running(&self) -> bool {
        self.phase() == GamePhase::Playing
    }

    pub fn start_countdown(&mut self, secs: u8) {
        self.is_paused = false;
        self.countdown_elapsed = 0.0;
        self.countdown = (secs > 0).then_some(secs);
    }

    /// Advance the countdown by `dt` seconds; one step per whole second
    pub fn update_countdown(&mut self, dt: f32) -> CountdownStep {
        let Some(mut remaining) = self.countdown else {
            return CountdownStep::Idle;
        };
        self.countdown_elapsed += dt;
        let mut stepped = false;
        // Tolerate f32 drift from summing fixed timesteps
        while self.countdown_elapsed >= 1.0 - COUNTDOWN_EPSILON && remaining > 0 {
            self.countdown_elapsed -= 1.0;
            remaining -= 1;
            stepped = true;
        }
        if remaining == 0 {
            self.countdown = None;
            self.countdown_elapsed = 0.0;
            CountdownStep::Finished
        } else if stepped {
            self.countdown = Some(remaining);
            CountdownStep::Ticked(remaining)
        } else {
            CountdownStep::Waiting
        }
    }

    /// Flip between Playing and Paused; ignored in any other phase.
    ///
    /// Returns true if the phase changed.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase() {
            GamePhase::Playing => {
                self.is_paused = true;
                true
            }
            GamePhase::Paused => {
                self.is_paused = false;
                true
            }
            GamePhase::Countdown | GamePhase::GameOver => false,
        }
    }

    pub fn toggle_enemy_projectiles(&mut self) -> bool {
        self.enemy_projectiles_enabled = !self.enemy_projectiles_enabled;
        self.enemy_projectiles_enabled
    }

    pub fn increment_score(&mut self) {
        self.score += 1;
    }

    pub fn set_game_over(&mut self) {
        self.is_game_over = true;
        self.is_paused = false;
        self.countdown = None;
    }

    /// Clear score and flags. The enemy-fire toggle survives a reset.
    pub fn reset_game(&mut self) {
        self.score = 0;
        self.is_paused = false;
        self.is_game_over = false;
        self.countdown = None;
        self.countdown_elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionState {
        SessionState::new(&SessionConfig::default())
    }

    #[test]
    fn test_countdown_steps_each_second() {
        let mut s = session();
        s.start_countdown(3);
        assert_eq!(s.phase(), GamePhase::Countdown);
        assert_eq!(s.update_countdown(0.5), CountdownStep::Waiting);
        assert_eq!(s.update_countdown(0.5), CountdownStep::Ticked(2));
        assert_eq!(s.update_countdown(1.0), CountdownStep::Ticked(1));
        assert_eq!(s.update_countdown(1.0), CountdownStep::Finished);
        assert_eq!(s.countdown, None);
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.update_countdown(1.0), CountdownStep::Idle);
    }

    #[test]
    fn test_pause_only_from_playing() {
        let mut s = session();
        s.start_countdown(3);
        assert!(!s.toggle_pause());
        assert_eq!(s.phase(), GamePhase::Countdown);

        s.countdown = None;
        assert!(s.toggle_pause());
        assert_eq!(s.phase(), GamePhase::Paused);
        assert!(s.toggle_pause());
        assert_eq!(s.phase(), GamePhase::Playing);

        s.set_game_over();
        assert!(!s.toggle_pause());
        assert_eq!(s.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_reset_clears_score_and_flags() {
        let mut s = session();
        s.increment_score();
        s.toggle_enemy_projectiles();
        s.set_game_over();
        s.reset_game();
        assert_eq!(s.score, 0);
        assert!(!s.is_game_over);
        assert!(!s.enemy_projectiles_enabled);
    }

    #[test]
    fn test_zero_second_countdown_is_skipped() {
        let mut s = session();
        s.start_countdown(0);
        assert_eq!(s.phase(), GamePhase::Playing);
    }
}
