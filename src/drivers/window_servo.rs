//! Window covering servo.
//!
//! A standard hobby servo on a 50 Hz LEDC channel. Position 0 % maps to a
//! 500 µs pulse and 100 % to 2500 µs.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the LEDC duty via hw_init.
//! On host/test: tracks the commanded position in-memory only.

use crate::drivers::hw_init;
use crate::error::ActuatorError;
use crate::pins;
use crate::room::clamp_percent;

const PULSE_MIN_US: u32 = 500;
const PULSE_SPAN_US: u32 = 2000;
const PERIOD_US: u32 = 1_000_000 / pins::SERVO_PWM_FREQ_HZ;

/// Pulse width for a position, after clamping to `[0, 100]`.
pub fn pulse_us(percent: f32) -> u32 {
    let pos = clamp_percent(percent);
    PULSE_MIN_US + (pos * PULSE_SPAN_US as f32 / 100.0) as u32
}

/// LEDC duty for a pulse width at the servo timer's resolution.
pub fn duty_for_pulse(pulse_us: u32) -> u32 {
    let full_scale = 1u32 << pins::SERVO_PWM_RESOLUTION_BITS;
    (u64::from(pulse_us) * u64::from(full_scale) / u64::from(PERIOD_US)) as u32
}

pub struct WindowServo {
    position: f32,
}

impl WindowServo {
    pub fn new() -> Self {
        Self { position: 0.0 }
    }

    /// Drive to `percent` open.
    pub fn set_position(&mut self, percent: f32) -> Result<(), ActuatorError> {
        let pos = clamp_percent(percent);
        let duty = duty_for_pulse(pulse_us(pos));
        if !hw_init::ledc_set(hw_init::LEDC_CH_SERVO, duty) {
            return Err(ActuatorError::PwmWriteFailed);
        }
        self.position = pos;
        Ok(())
    }

    pub fn position(&self) -> f32 {
        self.position
    }
}

impl Default for WindowServo {
    fn default() -> Self {
        Self::new()
    }
}
