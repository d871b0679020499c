//! System configuration parameters
//!
//! All tunable parameters for the Trilamp controller. Defaults are baked
//! in; a JSON override document (e.g. flashed alongside the firmware)
//! can replace any subset of them via [`LampConfig::from_json`].

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum length of a topic root or subtopic segment.
pub const MAX_SEGMENT_LEN: usize = 32;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LampConfig {
    // --- Remote protocol ---
    /// First topic segment shared by every lamp topic
    pub topic_root: String<MAX_SEGMENT_LEN>,
    /// Subtopic this device publishes brightness on (and ignores inbound)
    pub brightness_subtopic: String<MAX_SEGMENT_LEN>,
    /// Subtopic carrying remote brightness commands
    pub command_subtopic: String<MAX_SEGMENT_LEN>,
    /// Fixed delay between broker reconnect attempts (milliseconds)
    pub reconnect_delay_ms: u32,
    /// Broker URL (`mqtt://host:port`); empty runs without a broker
    pub broker_url: String<64>,

    // --- Network ---
    /// WiFi station SSID; only needed when a broker is configured
    pub wifi_ssid: String<32>,
    /// WiFi passphrase; empty for an open network
    pub wifi_password: String<64>,

    // --- Lamps ---
    /// Brightness every channel starts with (2-255)
    pub default_brightness: u8,
    /// Delay held after each unit fade step (microseconds)
    pub fade_step_delay_us: u32,
    /// Quiet period after the last knob movement before publishing (milliseconds)
    pub afterglow_quiet_ms: u32,

    // --- Input ---
    /// Hold time that starts a long press (milliseconds)
    pub button_long_press_ms: u32,
    /// Maximum gap between two clicks of a double click (milliseconds)
    pub button_double_click_ms: u32,

    // --- Timing ---
    /// Control loop poll interval (milliseconds)
    pub control_loop_interval_ms: u32,
}

impl Default for LampConfig {
    fn default() -> Self {
        Self {
            // Remote protocol
            topic_root: segment("trilamp"),
            brightness_subtopic: segment("brightness"),
            command_subtopic: segment("set"),
            reconnect_delay_ms: 5000,
            broker_url: String::new(),

            // Network
            wifi_ssid: String::new(),
            wifi_password: String::new(),

            // Lamps
            default_brightness: 128,  // mid-scale
            fade_step_delay_us: 2000, // ~0.5 s for a full 0..255 ramp
            afterglow_quiet_ms: 1500,

            // Input
            button_long_press_ms: 800,
            button_double_click_ms: 300,

            // Timing
            control_loop_interval_ms: 10, // 100 Hz
        }
    }
}

impl LampConfig {
    /// Parse a JSON override document on top of the defaults and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Whether a broker is configured at all.
    pub fn has_broker(&self) -> bool {
        !self.broker_url.is_empty()
    }

    /// Reject values the controller cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("topic_root", &self.topic_root),
            ("brightness_subtopic", &self.brightness_subtopic),
            ("command_subtopic", &self.command_subtopic),
        ] {
            if !is_valid_segment(value) {
                return Err(ConfigError::ValidationFailed(field));
            }
        }
        if self.brightness_subtopic == self.command_subtopic {
            return Err(ConfigError::ValidationFailed("command_subtopic"));
        }
        if self.default_brightness < crate::lamp::MIN_BRIGHTNESS {
            return Err(ConfigError::ValidationFailed("default_brightness"));
        }
        if self.afterglow_quiet_ms == 0 {
            return Err(ConfigError::ValidationFailed("afterglow_quiet_ms"));
        }
        if self.reconnect_delay_ms == 0 {
            return Err(ConfigError::ValidationFailed("reconnect_delay_ms"));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("control_loop_interval_ms"));
        }
        if self.has_broker() && self.wifi_ssid.is_empty() {
            return Err(ConfigError::ValidationFailed("wifi_ssid"));
        }
        if !self.wifi_password.is_empty() && self.wifi_password.len() < 8 {
            return Err(ConfigError::ValidationFailed("wifi_password"));
        }
        if self.button_double_click_ms == 0
            || self.button_double_click_ms >= self.button_long_press_ms
        {
            return Err(ConfigError::ValidationFailed("button_double_click_ms"));
        }
        Ok(())
    }
}

/// A topic segment must be non-empty and free of separators and wildcards.
fn is_valid_segment(s: &str) -> bool {
    !s.is_empty() && !s.contains(['/', '+', '#'])
}

fn segment(s: &str) -> String<MAX_SEGMENT_LEN> {
    let mut out = String::new();
    // Only called with the short literals above.
    let _ = out.push_str(s);
    out
}
