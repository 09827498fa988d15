//! System configuration parameters
//!
//! All tunable parameters for the room controller. Defaults reproduce the
//! factory behaviour; a JSON override can be supplied at build time and is
//! validated before use.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum room identifier length (bytes).
pub const ROOM_NAME_CAP: usize = 16;

/// Unit used for the chip temperature channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Room ---
    /// Room identifier used in the topic namespace (`/casa/{room}/...`).
    pub room_name: heapless::String<ROOM_NAME_CAP>,
    /// Target illumination applied at start-up (percent).
    pub default_target_percent: f32,

    // --- Automation ---
    /// Half-width of the hysteresis dead-band around the target (percent).
    pub tolerance_percent: f32,
    /// Window travel per automation tick (percent).
    pub window_step_percent: f32,
    /// Period of the automation / housekeeping worker (seconds).
    pub automation_interval_secs: u32,

    // --- Publication ---
    /// Minimum change in illumination before `/casa/{room}/luz` is republished.
    pub illumination_publish_delta: f32,
    /// Unit for the `/temperature` channel.
    pub temperature_unit: TemperatureUnit,

    // --- LDR calibration ---
    /// Raw ADC reading in full light (maps to 100 %).
    pub ldr_adc_min: u16,
    /// Raw ADC reading in darkness (maps to 0 %).
    pub ldr_adc_max: u16,
    /// Raw readings averaged per sample.
    pub ldr_samples: u16,
    /// Spacing between raw readings (milliseconds).
    pub ldr_sample_spacing_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut room_name = heapless::String::new();
        let _ = room_name.push_str("sala");

        Self {
            // Room
            room_name,
            default_target_percent: 65.0,

            // Automation
            tolerance_percent: 2.0,
            window_step_percent: 5.0,
            automation_interval_secs: 10,

            // Publication
            illumination_publish_delta: 0.5,
            temperature_unit: TemperatureUnit::Celsius,

            // LDR calibration
            ldr_adc_min: 100,
            ldr_adc_max: 4000,
            ldr_samples: 100,
            ldr_sample_spacing_ms: 1,
        }
    }
}

impl SystemConfig {
    /// Parse a JSON override and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the controller's invariants.
    ///
    /// Invalid ranges are rejected, never clamped.
    pub fn validate(&self) -> Result<()> {
        if self.room_name.is_empty() || self.room_name.contains(['/', '+', '#']) {
            return Err(Error::Config("room_name must be non-empty and contain no '/', '+' or '#'"));
        }
        if !(0.0..=100.0).contains(&self.default_target_percent) {
            return Err(Error::Config("default_target_percent outside 0..=100"));
        }
        if !(self.tolerance_percent > 0.0 && self.tolerance_percent < 50.0) {
            return Err(Error::Config("tolerance_percent must be in (0, 50)"));
        }
        if !(self.window_step_percent > 0.0 && self.window_step_percent <= 100.0) {
            return Err(Error::Config("window_step_percent must be in (0, 100]"));
        }
        if self.automation_interval_secs == 0 {
            return Err(Error::Config("automation_interval_secs must be > 0"));
        }
        if !(self.illumination_publish_delta >= 0.0) {
            return Err(Error::Config("illumination_publish_delta must be >= 0"));
        }
        if self.ldr_adc_max <= self.ldr_adc_min {
            return Err(Error::Config("ldr_adc_max must exceed ldr_adc_min"));
        }
        if self.ldr_samples == 0 {
            return Err(Error::Config("ldr_samples must be > 0"));
        }
        Ok(())
    }

    /// Worker period in milliseconds.
    pub fn automation_interval_ms(&self) -> u64 {
        u64::from(self.automation_interval_secs) * 1000
    }
}
