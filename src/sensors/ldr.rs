//! Light-dependent resistor (LDR) ambient light sensor.
//!
//! The LDR sits in a voltage divider read by ADC1. More light means lower
//! resistance and a *lower* raw reading, so the calibration maps `adc_max`
//! (dark) to 0 % and `adc_min` (bright) to 100 %.
//!
//! A sample averages a burst of raw readings, each followed by a fixed
//! delay. The whole burst blocks the caller (100 ms with the defaults).

use embedded_hal::delay::DelayNs;

use crate::config::SystemConfig;
use crate::room::{PERCENT_MAX, PERCENT_MIN, clamp_percent};

use super::AdcChannel;

/// Raw ADC end points of the divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LdrCalibration {
    /// Reading in full light (maps to 100 %).
    pub adc_min: u16,
    /// Reading in darkness (maps to 0 %).
    pub adc_max: u16,
}

impl LdrCalibration {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            adc_min: config.ldr_adc_min,
            adc_max: config.ldr_adc_max,
        }
    }
}

/// Map an averaged raw reading to percent, clamped to `[0, 100]`.
pub fn raw_to_percent(avg: f32, cal: LdrCalibration) -> f32 {
    if cal.adc_max <= cal.adc_min {
        return PERCENT_MIN;
    }
    let span = f32::from(cal.adc_max - cal.adc_min);
    clamp_percent(PERCENT_MAX * (f32::from(cal.adc_max) - avg) / span)
}

pub struct LightSensor<A, D> {
    adc: A,
    delay: D,
    samples: u16,
    spacing_ms: u32,
    cal: LdrCalibration,
}

impl<A: AdcChannel, D: DelayNs> LightSensor<A, D> {
    pub fn new(adc: A, delay: D, config: &SystemConfig) -> Self {
        Self {
            adc,
            delay,
            samples: config.ldr_samples.max(1),
            spacing_ms: config.ldr_sample_spacing_ms,
            cal: LdrCalibration::from_config(config),
        }
    }

    /// Average a burst of raw readings and return calibrated percent.
    /// Always yields a value.
    pub fn sample(&mut self) -> f32 {
        let mut sum: u32 = 0;
        for _ in 0..self.samples {
            sum += u32::from(self.adc.read_raw());
            self.delay.delay_ms(self.spacing_ms);
        }
        let avg = sum as f32 / f32::from(self.samples);
        raw_to_percent(avg, self.cal)
    }
}
