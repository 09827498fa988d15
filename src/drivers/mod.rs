//! Actuator drivers and hardware initialisation.

pub mod hw_init;
pub mod light_relay;
pub mod status_led;
pub mod window_servo;
