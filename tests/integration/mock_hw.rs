//! Mock adapters for integration tests.
//!
//! Records every actuator call and every publication so tests can assert
//! on the full history without touching real GPIO/PWM registers or a
//! broker.

use std::collections::VecDeque;

use roomlight::app::events::AppEvent;
use roomlight::app::ports::{ActuatorPort, ClockPort, EventSink, PublishPort, SensorPort};
use roomlight::app::service::RoomService;
use roomlight::config::SystemConfig;
use roomlight::error::{ActuatorError, CommsError, SensorError};

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    Window(f32),
    Light(bool),
    OnboardLed(bool),
}

// ── MockHardware ──────────────────────────────────────────────

/// Sensor readings come from a script; once it runs dry the last value
/// repeats.
pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    pub illumination: VecDeque<f32>,
    pub idle_illumination: f32,
    pub temperature: f32,
    pub fail_window: bool,
    pub fail_temperature: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            illumination: VecDeque::new(),
            idle_illumination: 65.0,
            temperature: 24.5,
            fail_window: false,
            fail_temperature: false,
        }
    }

    pub fn with_level(level: f32) -> Self {
        let mut hw = Self::new();
        hw.idle_illumination = level;
        hw
    }

    pub fn script(&mut self, levels: &[f32]) {
        self.illumination.extend(levels.iter().copied());
    }

    pub fn last_window(&self) -> Option<f32> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Window(p) => Some(*p),
            _ => None,
        })
    }

    pub fn last_light(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Light(on) => Some(*on),
            _ => None,
        })
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_illumination(&mut self) -> f32 {
        if let Some(level) = self.illumination.pop_front() {
            self.idle_illumination = level;
        }
        self.idle_illumination
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        if self.fail_temperature {
            Err(SensorError::TemperatureReadFailed)
        } else {
            Ok(self.temperature)
        }
    }
}

impl ActuatorPort for MockHardware {
    fn set_window(&mut self, percent: f32) -> Result<(), ActuatorError> {
        self.calls.push(ActuatorCall::Window(percent));
        if self.fail_window {
            Err(ActuatorError::PwmWriteFailed)
        } else {
            Ok(())
        }
    }

    fn set_light(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.calls.push(ActuatorCall::Light(on));
        Ok(())
    }

    fn set_onboard_led(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.calls.push(ActuatorCall::OnboardLed(on));
        Ok(())
    }
}

// ── RecordingBus ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Published {
    pub topic: String,
    pub payload: String,
    pub retain: bool,
}

#[derive(Default)]
pub struct RecordingBus {
    pub sent: Vec<Published>,
    pub offline: bool,
}

#[allow(dead_code)]
impl RecordingBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.sent.clear();
    }

    pub fn topics(&self) -> Vec<&str> {
        self.sent.iter().map(|p| p.topic.as_str()).collect()
    }

    /// Most recent payload on `topic`.
    pub fn last(&self, topic: &str) -> Option<&Published> {
        self.sent.iter().rev().find(|p| p.topic == topic)
    }

    pub fn count(&self, topic: &str) -> usize {
        self.sent.iter().filter(|p| p.topic == topic).count()
    }
}

impl PublishPort for RecordingBus {
    fn publish(&mut self, topic: &str, payload: &str, retain: bool) -> Result<(), CommsError> {
        if self.offline {
            return Err(CommsError::NotConnected);
        }
        self.sent.push(Published {
            topic: topic.to_owned(),
            payload: payload.to_owned(),
            retain,
        });
        Ok(())
    }
}

// ── LogSink ───────────────────────────────────────────────────

#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── FixedClock ────────────────────────────────────────────────

pub struct FixedClock(pub u64);

impl ClockPort for FixedClock {
    fn uptime_secs(&self) -> u64 {
        self.0
    }
}

// ── Harness ───────────────────────────────────────────────────

/// Service wired to mocks, started and connected, with the start-up
/// traffic cleared.
pub struct Rig {
    pub room: RoomService,
    pub hw: MockHardware,
    pub bus: RecordingBus,
    pub sink: LogSink,
    pub clock: FixedClock,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_config(&SystemConfig::default())
    }

    pub fn with_config(config: &SystemConfig) -> Self {
        let mut rig = Self {
            room: RoomService::new(config).expect("valid config"),
            hw: MockHardware::new(),
            bus: RecordingBus::new(),
            sink: LogSink::new(),
            clock: FixedClock(0),
        };
        rig.room.start(&mut rig.hw, &mut rig.sink);
        rig.room.on_connected(&mut rig.hw, &mut rig.bus, &mut rig.sink);
        rig.reset_records();
        rig
    }

    pub fn reset_records(&mut self) {
        self.hw.calls.clear();
        self.bus.clear();
        self.sink.events.clear();
    }

    pub fn send(&mut self, topic: &str, payload: &str) -> roomlight::app::commands::CommandOutcome {
        self.room.handle_message(
            topic,
            payload.as_bytes(),
            &mut self.hw,
            &self.clock,
            &mut self.bus,
            &mut self.sink,
        )
    }

    pub fn automation_tick(&mut self) -> Option<roomlight::control::automation::AutomationAction> {
        self.room.automation_tick(&mut self.hw, &mut self.bus, &mut self.sink)
    }

    pub fn worker_tick(&mut self) -> Option<roomlight::control::automation::AutomationAction> {
        self.room
            .worker_tick(&mut self.hw, &self.clock, &mut self.bus, &mut self.sink)
    }

    /// Put the room in the given actuator state (ends in automatic mode).
    pub fn arrange(&mut self, window: f32, light: bool) {
        let window = format!("{window:.2}");
        assert!(self.send("/casa/sala/modo", "manual").is_accepted());
        assert!(self.send("/casa/sala/janela/set", &window).is_accepted());
        assert!(
            self.send("/casa/sala/luz/ligar", if light { "on" } else { "off" })
                .is_accepted()
        );
        assert!(self.send("/casa/sala/modo", "auto").is_accepted());
        self.reset_records();
    }
}
