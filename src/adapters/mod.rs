//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements         | Connects to              |
//! |-------------|--------------------|--------------------------|
//! | `hardware`  | SensorPort         | ESP32 ADC1, temp sensor  |
//! |             | ActuatorPort       | ESP32 LEDC, GPIO         |
//! | `log_sink`  | EventSink          | Serial log output        |
//! | `time`      | ClockPort, DelayNs | ESP32 system timer       |
//! | `mqtt`      | PublishPort        | ESP-IDF MQTT client      |
//! | `device_id` |                    | eFuse MAC (client id)    |

pub mod device_id;
pub mod hardware;
pub mod log_sink;
#[cfg(target_os = "espidf")]
pub mod mqtt;
pub mod time;
