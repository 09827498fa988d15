//! Closed-loop illumination control.
//!
//! Each tick compares the measured level against the target with a
//! symmetric dead-band and picks at most one action. Window travel always
//! comes before the light: opening the window is tried before switching the
//! light on, and the light is only switched off once the window is shut.
//!
//! The decision is a pure function of `(level, state)`; nothing about the
//! previous decision is remembered.

use crate::config::SystemConfig;
use crate::room::{PERCENT_MAX, PERCENT_MIN, RoomState, clamp_percent};

/// What a single tick decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutomationAction {
    /// Inside the dead-band, or nothing left to move.
    Hold,
    /// Too dark: open the window by one step.
    OpenWindow { to: f32 },
    /// Too dark with the window fully open: switch the light on.
    LightOn,
    /// Too bright: close the window by one step, and switch the light off
    /// if that step shut the window.
    CloseWindow { to: f32, light_off: bool },
}

impl AutomationAction {
    pub fn changes_state(self) -> bool {
        self != Self::Hold
    }
}

/// Stateless controller holding only its tuning.
#[derive(Debug, Clone, Copy)]
pub struct AutomationController {
    tolerance: f32,
    step: f32,
}

impl AutomationController {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            tolerance: config.tolerance_percent,
            step: config.window_step_percent,
        }
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Choose the action for a measured `level`. Comparisons are strict, so
    /// a level exactly on a band edge holds.
    pub fn decide(&self, level: f32, state: &RoomState) -> AutomationAction {
        let target = state.target_illumination();
        let window = state.window_position();

        if level < target - self.tolerance {
            if window < PERCENT_MAX {
                return AutomationAction::OpenWindow {
                    to: clamp_percent(window + self.step),
                };
            }
            if !state.light_on() {
                return AutomationAction::LightOn;
            }
        } else if level > target + self.tolerance && window > PERCENT_MIN {
            let to = clamp_percent(window - self.step);
            return AutomationAction::CloseWindow {
                to,
                light_off: to == PERCENT_MIN && state.light_on(),
            };
        }

        AutomationAction::Hold
    }

    /// Record `action` in the room state. Actuation is the caller's job.
    pub(crate) fn apply(action: AutomationAction, state: &mut RoomState) {
        match action {
            AutomationAction::Hold => {}
            AutomationAction::OpenWindow { to } => state.set_window(to),
            AutomationAction::LightOn => state.set_light(true),
            AutomationAction::CloseWindow { to, light_off } => {
                state.set_window(to);
                if light_off {
                    state.set_light(false);
                }
            }
        }
    }
}
