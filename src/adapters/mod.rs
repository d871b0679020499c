//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements              | Connects to              |
//! |-------------|-------------------------|--------------------------|
//! | `hardware`  | LampOutputPort          | ESP32 LEDC PWM           |
//! |             | EncoderPort, DelayNs    | PCNT encoder, timers     |
//! | `display`   | DisplayPort             | Serial log output        |
//! | `log_sink`  | EventSink               | Serial log output        |
//! | `time`      | ClockPort               | ESP32 system timer       |
//! | `mqtt`      | TransportPort           | ESP-IDF MQTT client      |

pub mod display;
pub mod hardware;
pub mod log_sink;
#[cfg(feature = "espidf")]
pub mod mqtt;
pub mod time;
