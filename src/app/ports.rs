//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RoomService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, message bus, clock, event sinks)
//! implement these traits. The [`RoomService`](super::service::RoomService)
//! consumes them via generics, so the domain core never touches hardware
//! or the broker client directly.
//!
//! Failures reported through a port are logged by the core and never
//! retried.

use crate::error::{ActuatorError, CommsError, SensorError};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// Calibrated ambient illumination in percent (0–100).
    ///
    /// Blocks for the whole sampling window (~100 ms on device).
    fn read_illumination(&mut self) -> f32;

    /// On-die temperature in the configured unit.
    fn read_temperature(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port. Calls are synchronous and idempotent.
pub trait ActuatorPort {
    /// Drive the window covering to `percent` open (0 = closed).
    fn set_window(&mut self, percent: f32) -> Result<(), ActuatorError>;

    /// Switch the light fixture.
    fn set_light(&mut self, on: bool) -> Result<(), ActuatorError>;

    /// Switch the onboard status LED (maintenance topic only).
    fn set_onboard_led(&mut self, on: bool) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Publish port (driven adapter: domain → message bus)
// ───────────────────────────────────────────────────────────────

/// Best-effort, fire-and-forget publication.
pub trait PublishPort {
    fn publish(&mut self, topic: &str, payload: &str, retain: bool) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time since boot.
pub trait ClockPort {
    fn uptime_secs(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
