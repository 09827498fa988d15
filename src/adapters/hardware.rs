//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and all actuator drivers, exposing them through
//! [`SensorPort`] and [`ActuatorPort`]. On non-espidf targets the
//! underlying drivers use cfg-gated simulation stubs.

use embedded_hal::delay::DelayNs;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::light_relay::LightRelay;
use crate::drivers::status_led::StatusLed;
use crate::drivers::window_servo::WindowServo;
use crate::error::{ActuatorError, SensorError};
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<D> {
    sensors: SensorHub<D>,
    servo: WindowServo,
    light: LightRelay,
    led: StatusLed,
}

impl<D: DelayNs> HardwareAdapter<D> {
    pub fn new(sensors: SensorHub<D>, servo: WindowServo, light: LightRelay, led: StatusLed) -> Self {
        Self {
            sensors,
            servo,
            light,
            led,
        }
    }

    /// Last commanded servo position.
    pub fn servo_position(&self) -> f32 {
        self.servo.position()
    }

    pub fn light_is_on(&self) -> bool {
        self.light.is_on()
    }

    pub fn led_is_on(&self) -> bool {
        self.led.is_on()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<D: DelayNs> SensorPort for HardwareAdapter<D> {
    fn read_illumination(&mut self) -> f32 {
        self.sensors.illumination()
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.sensors.temperature()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<D: DelayNs> ActuatorPort for HardwareAdapter<D> {
    fn set_window(&mut self, percent: f32) -> Result<(), ActuatorError> {
        self.servo.set_position(percent)
    }

    fn set_light(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.light.set(on)
    }

    fn set_onboard_led(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.led.set(on)
    }
}
