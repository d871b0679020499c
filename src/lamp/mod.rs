//! Lamp domain model: the three dimmable channels and their fades.
//!
//! ```text
//!   Channels ──(value, is_on)──▶ FadeEngine ──set_level──▶ LampOutputPort
//!      ▲
//!      └── owned by LampService (single source of truth)
//! ```

pub mod channel;
pub mod fade;

pub use channel::{Channel, ChannelSnapshot, Channels, LampId, LampView};
pub use fade::{FadeEngine, FadeRamp};

/// Lowest brightness a lit channel may hold.  0 is reserved for "off";
/// 1 is indistinguishable from off on the drive hardware.
pub const MIN_BRIGHTNESS: u8 = 2;

/// Highest brightness (full 8-bit PWM duty).
pub const MAX_BRIGHTNESS: u8 = 255;

/// Number of independently switchable channels.
pub const LAMP_COUNT: usize = 3;

/// Clamp an arbitrary reading (e.g. an encoder position) into the lit range.
pub fn clamp_brightness(raw: i32) -> u8 {
    raw.clamp(MIN_BRIGHTNESS as i32, MAX_BRIGHTNESS as i32) as u8
}
