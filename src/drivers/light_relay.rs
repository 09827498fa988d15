//! Room light relay plus indicator LEDs.
//!
//! The relay switches the fixture; the three discrete LEDs light together
//! (white) to mirror it.

use crate::drivers::hw_init;
use crate::error::ActuatorError;
use crate::pins;

pub struct LightRelay {
    on: bool,
}

impl LightRelay {
    pub fn new() -> Self {
        Self { on: false }
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        let outputs = [
            pins::LIGHT_RELAY_GPIO,
            pins::LED_R_GPIO,
            pins::LED_G_GPIO,
            pins::LED_B_GPIO,
        ];
        // Drive every pin even if one fails so the indicators stay in step.
        let ok = outputs
            .iter()
            .fold(true, |ok, &pin| hw_init::gpio_write(pin, on) && ok);
        self.on = on;
        if ok { Ok(()) } else { Err(ActuatorError::GpioWriteFailed) }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}

impl Default for LightRelay {
    fn default() -> Self {
        Self::new()
    }
}
