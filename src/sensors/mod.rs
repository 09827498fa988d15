//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! ## Dual-target design
//!
//! [`Adc1Channel`] reads the ADC1 oneshot unit configured by
//! [`hw_init`](crate::drivers::hw_init) on ESP-IDF; on the host it reads a
//! simulated value injected with `hw_init::sim_set_adc`. [`DieSensor`]
//! follows the same pattern over the temperature sensor driver
//! (`hw_init::sim_set_die_temperature` on the host).

pub mod ldr;
pub mod temperature;

use embedded_hal::delay::DelayNs;

use crate::config::SystemConfig;
use crate::drivers::hw_init;
use crate::error::SensorError;
use crate::pins;

use ldr::LightSensor;
use temperature::{CelsiusSource, ChipTemperature};

/// A single-ended ADC input returning raw counts.
pub trait AdcChannel {
    fn read_raw(&mut self) -> u16;
}

/// One ADC1 oneshot channel.
#[derive(Debug, Clone, Copy)]
pub struct Adc1Channel {
    channel: u32,
}

impl Adc1Channel {
    pub fn new(channel: u32) -> Self {
        Self { channel }
    }
}

impl AdcChannel for Adc1Channel {
    fn read_raw(&mut self) -> u16 {
        hw_init::adc1_read(self.channel)
    }
}

/// The internal temperature sensor peripheral.
#[derive(Debug, Clone, Copy, Default)]
pub struct DieSensor;

impl CelsiusSource for DieSensor {
    fn read_celsius(&mut self) -> Result<f32, SensorError> {
        hw_init::die_temperature().ok_or(SensorError::TemperatureReadFailed)
    }
}

/// Owns every sensor on the board.
pub struct SensorHub<D> {
    pub light: LightSensor<Adc1Channel, D>,
    pub temperature: ChipTemperature<DieSensor>,
}

impl<D: DelayNs> SensorHub<D> {
    /// Build the hub on the board's LDR channel and die sensor.
    pub fn new(delay: D, config: &SystemConfig) -> Self {
        Self {
            light: LightSensor::new(Adc1Channel::new(pins::LDR_ADC_CHANNEL), delay, config),
            temperature: ChipTemperature::new(DieSensor, config.temperature_unit),
        }
    }

    pub fn illumination(&mut self) -> f32 {
        self.light.sample()
    }

    pub fn temperature(&mut self) -> Result<f32, SensorError> {
        self.temperature.read()
    }
}
