//! Room service — the hexagonal core.
//!
//! [`RoomService`] owns the single [`RoomState`] and is its only writer.
//! Inbound messages and worker ticks arrive one at a time from the main
//! loop; all I/O flows through port traits injected at call sites, so the
//! whole service runs against mock adapters in tests.
//!
//! ```text
//!   SensorPort ──▶ ┌────────────────────────────┐ ──▶ PublishPort
//!                  │        RoomService         │
//! ActuatorPort ◀── │ Router · Automation · Pub  │ ──▶ EventSink
//!                  └────────────────────────────┘
//! ```

use log::{error, info, warn};

use crate::config::SystemConfig;
use crate::control::automation::{AutomationAction, AutomationController};
use crate::error::{ActuatorError, Result};
use crate::room::{PERCENT_MAX, PERCENT_MIN, RoomState};
use crate::topics::RoomTopics;

use super::commands::{CommandOutcome, DeviceCommand, RoomCommand};
use super::events::AppEvent;
use super::ports::{ActuatorPort, ClockPort, EventSink, PublishPort, SensorPort};
use super::publisher::StatePublisher;
use super::router::{self, Dispatch};

// ───────────────────────────────────────────────────────────────
// RoomService
// ───────────────────────────────────────────────────────────────

pub struct RoomService {
    room: RoomState,
    automation: AutomationController,
    publisher: StatePublisher,
    stop_requested: bool,
}

impl RoomService {
    /// Validate `config` and build the service with a fresh room.
    pub fn new(config: &SystemConfig) -> Result<Self> {
        config.validate()?;
        let topics = RoomTopics::new(&config.room_name)?;
        Ok(Self {
            room: RoomState::new(config),
            automation: AutomationController::new(config),
            publisher: StatePublisher::new(topics, config.illumination_publish_delta),
            stop_requested: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the actuators to the initial state (window closed, light off).
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        self.actuate(hw.set_window(self.room.window_position()), sink);
        self.actuate(hw.set_light(self.room.light_on()), sink);
        sink.emit(&AppEvent::Started {
            room: heapless::String::try_from(self.room.name()).unwrap_or_default(),
            target: self.room.target_illumination(),
        });
        info!(
            "RoomService started: room={} target={:.2}",
            self.room.name(),
            self.room.target_illumination()
        );
    }

    /// Broker session is up (subscriptions already placed by the
    /// transport): announce availability and publish the full state.
    pub fn on_connected(
        &mut self,
        hw: &mut impl SensorPort,
        bus: &mut impl PublishPort,
        sink: &mut impl EventSink,
    ) {
        self.publisher.publish_online(bus);
        let level = hw.read_illumination();
        self.publisher.publish_all(&self.room, level, bus);
        sink.emit(&AppEvent::Connected);
    }

    // ── Inbound messages ──────────────────────────────────────

    /// Route and apply one inbound message.
    ///
    /// Rejected messages leave the room, the actuators and the bus
    /// untouched.
    pub fn handle_message(
        &mut self,
        topic: &str,
        payload: &[u8],
        hw: &mut (impl SensorPort + ActuatorPort),
        clock: &impl ClockPort,
        bus: &mut impl PublishPort,
        sink: &mut impl EventSink,
    ) -> CommandOutcome {
        match router::route(topic, payload, &self.room) {
            Dispatch::Room(cmd) => {
                self.apply(cmd, hw, bus, sink);
                sink.emit(&AppEvent::CommandAccepted(cmd));
                CommandOutcome::Accepted
            }
            Dispatch::Device(cmd) => {
                self.apply_device(cmd, hw, clock, bus, sink);
                CommandOutcome::Accepted
            }
            Dispatch::Rejected(reason) => {
                sink.emit(&AppEvent::CommandRejected {
                    topic: heapless::String::try_from(topic).unwrap_or_default(),
                    reason,
                });
                CommandOutcome::Rejected(reason)
            }
            Dispatch::Ignored => CommandOutcome::Ignored,
        }
    }

    fn apply(
        &mut self,
        cmd: RoomCommand,
        hw: &mut (impl SensorPort + ActuatorPort),
        bus: &mut impl PublishPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            RoomCommand::Select => {
                info!("room '{}' selected", self.room.name());
            }
            RoomCommand::Republish => {}
            RoomCommand::SetTarget(target) => {
                self.room.set_target(target);
                let level = hw.read_illumination();
                self.publisher.publish_status(&self.room, level, bus);
                return;
            }
            RoomCommand::SetWindow(pos) => {
                self.room.set_window(pos);
                self.actuate(hw.set_window(self.room.window_position()), sink);
            }
            RoomCommand::OpenWindow(open) => {
                self.room.set_window(if open { PERCENT_MAX } else { PERCENT_MIN });
                self.actuate(hw.set_window(self.room.window_position()), sink);
            }
            RoomCommand::SwitchLight(on) => {
                self.room.set_light(on);
                self.actuate(hw.set_light(on), sink);
            }
            RoomCommand::SetMode(mode) => {
                self.room.set_mode(mode);
                sink.emit(&AppEvent::ModeChanged(mode));
            }
            RoomCommand::Sleep(true) => {
                self.room.enter_sleep();
                self.actuate(hw.set_light(false), sink);
                self.publisher.publish_light_state(&self.room, bus);
                self.actuate(hw.set_window(PERCENT_MIN), sink);
                sink.emit(&AppEvent::SleepChanged(true));
            }
            RoomCommand::Sleep(false) => {
                self.room.exit_sleep();
                sink.emit(&AppEvent::SleepChanged(false));
            }
        }

        let level = hw.read_illumination();
        self.publisher.publish_all(&self.room, level, bus);
    }

    fn apply_device(
        &mut self,
        cmd: DeviceCommand<'_>,
        hw: &mut impl ActuatorPort,
        clock: &impl ClockPort,
        bus: &mut impl PublishPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            DeviceCommand::Led(on) => {
                self.actuate(hw.set_onboard_led(on), sink);
                self.publisher.publish_led_state(on, bus);
            }
            DeviceCommand::Print(text) => {
                sink.emit(&AppEvent::Printed(
                    heapless::String::try_from(text).unwrap_or_default(),
                ));
            }
            DeviceCommand::Ping => {
                self.publisher.publish_uptime(clock.uptime_secs(), bus);
            }
            DeviceCommand::Exit => {
                self.stop_requested = true;
                sink.emit(&AppEvent::ShutdownRequested);
            }
        }
    }

    // ── Periodic worker ───────────────────────────────────────

    /// Housekeeping tick: temperature, illumination, clock, then the
    /// automation step. Returns what the automation decided, or `None`
    /// when automation is disabled. A failed temperature read only skips
    /// its channel.
    pub fn worker_tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        clock: &impl ClockPort,
        bus: &mut impl PublishPort,
        sink: &mut impl EventSink,
    ) -> Option<AutomationAction> {
        match hw.read_temperature() {
            Ok(temperature) => {
                self.publisher.publish_temperature_if_changed(temperature, bus);
            }
            Err(e) => warn!("worker: {}", e),
        }

        let level = hw.read_illumination();
        self.publisher.publish_illumination_if_changed(level, bus);

        self.publisher.publish_clock(clock.uptime_secs(), bus);

        self.run_automation(level, hw, bus, sink)
    }

    /// One automation step on a fresh illumination sample.
    pub fn automation_tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        bus: &mut impl PublishPort,
        sink: &mut impl EventSink,
    ) -> Option<AutomationAction> {
        if !self.room.automation_enabled() {
            return None;
        }
        let level = hw.read_illumination();
        self.run_automation(level, hw, bus, sink)
    }

    fn run_automation(
        &mut self,
        level: f32,
        hw: &mut impl ActuatorPort,
        bus: &mut impl PublishPort,
        sink: &mut impl EventSink,
    ) -> Option<AutomationAction> {
        if !self.room.automation_enabled() {
            return None;
        }

        let action = self.automation.decide(level, &self.room);
        if !action.changes_state() {
            return Some(action);
        }

        AutomationController::apply(action, &mut self.room);
        match action {
            AutomationAction::Hold => {}
            AutomationAction::OpenWindow { .. } => {
                self.actuate(hw.set_window(self.room.window_position()), sink);
            }
            AutomationAction::LightOn => {
                self.actuate(hw.set_light(true), sink);
            }
            AutomationAction::CloseWindow { light_off, .. } => {
                self.actuate(hw.set_window(self.room.window_position()), sink);
                if light_off {
                    self.actuate(hw.set_light(false), sink);
                }
            }
        }

        sink.emit(&AppEvent::Automation(action));
        self.publisher.publish_all(&self.room, level, bus);
        Some(action)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn room(&self) -> &RoomState {
        &self.room
    }

    pub fn publisher(&self) -> &StatePublisher {
        &self.publisher
    }

    /// `/exit` was received; the loop should unsubscribe and disconnect.
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }

    // ── Internal helpers ──────────────────────────────────────

    /// Actuator failures are reported, never retried; the room state
    /// already records the commanded value.
    fn actuate(&self, result: core::result::Result<(), ActuatorError>, sink: &mut impl EventSink) {
        if let Err(e) = result {
            error!("actuator: {}", e);
            sink.emit(&AppEvent::ActuatorFault(e));
        }
    }
}
