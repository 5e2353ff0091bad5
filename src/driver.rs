//! Fixed-timestep frame driver
//!
//! Hosts that own the render loop call [`FrameDriver::advance`] once per
//! frame with the wall-clock delta. Input events recorded between frames
//! are applied on the first substep. The player keeps walking to a movement
//! target once it has been handed over; autopilot stays on until switched off.

use glam::Vec3;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::sim::{AbilityKind, GameState, TickInput, tick};

#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    accumulator: f32,
    input: TickInput,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending input for the next substep
    pub fn input(&self) -> &TickInput {
        &self.input
    }

    /// Time banked toward the next substep (for render interpolation)
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Move toward a ground point; replaces any previous target
    pub fn move_toward(&mut self, point: Vec3) {
        self.input.move_target = Some(point);
    }

    pub fn aim_at(&mut self, direction: Vec3) {
        self.input.aim = Some(direction);
    }

    /// Queue an ability press by key (`q`, `w`, `e`, `r`); unknown keys are ignored
    pub fn press_key(&mut self, key: char) -> Option<AbilityKind> {
        let kind = AbilityKind::from_key(key)?;
        self.press_ability(kind);
        Some(kind)
    }

    pub fn press_ability(&mut self, kind: AbilityKind) {
        self.input.abilities.push(kind);
    }

    pub fn toggle_pause(&mut self) {
        self.input.pause = !self.input.pause;
    }

    pub fn toggle_enemy_projectiles(&mut self) {
        self.input.toggle_enemy_projectiles = !self.input.toggle_enemy_projectiles;
    }

    pub fn restart(&mut self) {
        self.input.restart = true;
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    /// Run as many fixed substeps as `frame_dt` covers; returns the count
    pub fn advance(&mut self, state: &mut GameState, frame_dt: f32) -> u32 {
        // A NaN or infinite delta would poison the accumulator for good
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.clear_one_shots();
        }
        // The move target was consumed by the player
        if substeps > 0 {
            self.input.move_target = None;
        }
        substeps
    }
}
