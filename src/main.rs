//! Roomlight Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single-threaded control loop. The MQTT
//! event pump is the only other thread; it hands messages over through the
//! bounded channels in [`inbox`](roomlight::inbox).
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   MqttAdapter   Esp32Time      │
//! │  (Sensor+Actuator) (EventSink)    (Publish)     (Clock)        │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              RoomService (pure logic)                  │    │
//! │  │  Router · Automation · StatePublisher                  │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Inbox (transport → loop) · PeriodicTimer (worker cadence)     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::modem::Modem;
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use log::{error, info, warn};

use roomlight::adapters::device_id;
use roomlight::adapters::hardware::HardwareAdapter;
use roomlight::adapters::log_sink::LogEventSink;
use roomlight::adapters::mqtt::{BrokerSettings, MqttAdapter};
use roomlight::adapters::time::{Esp32TimeAdapter, SystemDelay};
use roomlight::app::commands::CommandOutcome;
use roomlight::app::service::RoomService;
use roomlight::config::SystemConfig;
use roomlight::drivers::{self, light_relay::LightRelay, status_led::StatusLed, window_servo::WindowServo};
use roomlight::inbox::{self, LinkEvent};
use roomlight::scheduler::PeriodicTimer;
use roomlight::sensors::SensorHub;
use roomlight::topics;

// ── Build-time settings ───────────────────────────────────────

const WIFI_SSID: Option<&str> = option_env!("ROOMLIGHT_WIFI_SSID");
const WIFI_PASS: Option<&str> = option_env!("ROOMLIGHT_WIFI_PASS");
const BROKER_URL: &str = match option_env!("ROOMLIGHT_BROKER_URL") {
    Some(url) => url,
    None => "mqtt://192.168.0.10:1883",
};
const BROKER_USER: Option<&str> = option_env!("ROOMLIGHT_BROKER_USER");
const BROKER_PASS: Option<&str> = option_env!("ROOMLIGHT_BROKER_PASS");
const CONFIG_JSON: Option<&str> = option_env!("ROOMLIGHT_CONFIG_JSON");

const CLIENT_ID_PREFIX: &str = "roomlight";
const LOOP_IDLE_MS: u64 = 20;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Roomlight v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Configuration ──────────────────────────────────────
    let config = match CONFIG_JSON {
        Some(json) => SystemConfig::from_json(json).unwrap_or_else(|e| {
            warn!("Embedded config rejected ({}), using defaults", e);
            SystemConfig::default()
        }),
        None => SystemConfig::default(),
    };

    // ── 4. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::new(
        SensorHub::new(SystemDelay, &config),
        WindowServo::new(),
        LightRelay::new(),
        StatusLed::new(),
    );
    let mut log_sink = LogEventSink::new();
    let clock = Esp32TimeAdapter::new();

    // ── 5. Construct room service ─────────────────────────────
    let mut room = RoomService::new(&config).map_err(|e| anyhow!("room service: {}", e))?;
    room.start(&mut hw, &mut log_sink);
    let subscriptions = topics::subscriptions(&config.room_name)
        .map_err(|e| anyhow!("subscription list: {}", e))?;

    // ── 6. Network ────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sys_loop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let _wifi = connect_wifi(peripherals.modem, sys_loop, nvs).context("wifi startup failed")?;

    let client_id = device_id::client_id(CLIENT_ID_PREFIX, &device_id::read_mac());
    let mut mqtt = MqttAdapter::connect(&BrokerSettings {
        url: BROKER_URL,
        client_id: &client_id,
        username: BROKER_USER,
        password: BROKER_PASS,
    })
    .map_err(|e| anyhow!("{}", e))?;

    let mut worker = PeriodicTimer::new("worker", config.automation_interval_ms());

    info!("System ready. Entering control loop.");

    // ── 7. Control loop ───────────────────────────────────────
    loop {
        while let Some(link) = inbox::try_recv_link() {
            match link {
                LinkEvent::Connected => {
                    if let Err(e) = mqtt.subscribe_all(&subscriptions) {
                        warn!("MQTT: subscription incomplete: {}", e);
                    }
                    room.on_connected(&mut hw, &mut mqtt, &mut log_sink);
                    worker.arm(clock.uptime_ms());
                }
                LinkEvent::Disconnected => {
                    warn!("MQTT: broker session lost");
                    worker.disarm();
                }
            }
        }

        while let Some(msg) = inbox::try_recv() {
            let outcome = room.handle_message(
                &msg.topic,
                &msg.payload,
                &mut hw,
                &clock,
                &mut mqtt,
                &mut log_sink,
            );
            if outcome == CommandOutcome::Ignored {
                info!("Unrouted message on '{}'", msg.topic);
            }
            if room.stop_requested() {
                break;
            }
        }

        if room.stop_requested() {
            info!("Shutdown requested, leaving the broker");
            mqtt.unsubscribe_all(&subscriptions);
            drop(mqtt);
            return Ok(());
        }

        if worker.poll(clock.uptime_ms()) {
            room.worker_tick(&mut hw, &clock, &mut mqtt, &mut log_sink);
        }

        let idle = worker.idle_ms(clock.uptime_ms(), LOOP_IDLE_MS);
        std::thread::sleep(Duration::from_millis(idle));
    }
}

// ── WiFi station ──────────────────────────────────────────────

fn connect_wifi(
    modem: Modem,
    sys_loop: EspSystemEventLoop,
    nvs: EspDefaultNvsPartition,
) -> Result<Box<EspWifi<'static>>> {
    let ssid = WIFI_SSID.ok_or_else(|| anyhow!("ROOMLIGHT_WIFI_SSID not set at build time"))?;
    let password = WIFI_PASS.unwrap_or("");

    let mut esp_wifi = Box::new(EspWifi::new(modem, sys_loop.clone(), Some(nvs))?);
    let mut wifi = BlockingWifi::wrap(esp_wifi.as_mut(), sys_loop)?;

    let auth_method = if password.is_empty() {
        AuthMethod::None
    } else {
        AuthMethod::WPAWPA2Personal
    };
    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: ssid.try_into().map_err(|_| anyhow!("wifi ssid too long"))?,
        password: password.try_into().map_err(|_| anyhow!("wifi password too long"))?,
        auth_method,
        ..Default::default()
    }))?;

    wifi.start()?;
    info!("WiFi: connecting to '{}'", ssid);
    wifi.connect()?;
    wifi.wait_netif_up()?;
    info!("WiFi: station up");

    drop(wifi);
    Ok(esp_wifi)
}
