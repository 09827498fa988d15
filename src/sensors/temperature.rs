//! On-die temperature sensor.
//!
//! The ESP32-S3 has a dedicated temperature sensor peripheral driven by
//! ESP-IDF's `temperature_sensor` driver, which already returns degrees
//! Celsius. This module only converts to the configured unit and turns a
//! failed conversion into a [`SensorError`].

use crate::config::TemperatureUnit;
use crate::error::SensorError;

/// A source of die temperature readings in degrees Celsius.
pub trait CelsiusSource {
    fn read_celsius(&mut self) -> Result<f32, SensorError>;
}

pub fn celsius_to(unit: TemperatureUnit, celsius: f32) -> f32 {
    match unit {
        TemperatureUnit::Celsius => celsius,
        TemperatureUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
    }
}

pub struct ChipTemperature<S> {
    source: S,
    unit: TemperatureUnit,
}

impl<S: CelsiusSource> ChipTemperature<S> {
    pub fn new(source: S, unit: TemperatureUnit) -> Self {
        Self { source, unit }
    }

    /// Temperature in the configured unit.
    pub fn read(&mut self) -> Result<f32, SensorError> {
        let celsius = self.source.read_celsius()?;
        if !celsius.is_finite() {
            return Err(SensorError::TemperatureReadFailed);
        }
        Ok(celsius_to(self.unit, celsius))
    }
}
