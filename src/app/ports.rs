//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LampService (domain)
//! ```
//!
//! Driven adapters (lamp PWM, encoder, display, clock, event sinks)
//! implement these traits.  The [`LampService`](super::service::LampService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.  The remote transport port lives with the protocol code in
//! [`crate::remote::transport`].

use embedded_hal::delay::DelayNs;

use crate::lamp::{ChannelSnapshot, LampId};

// ───────────────────────────────────────────────────────────────
// Lamp output port (driven adapter: domain → PWM)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the three lamp outputs.
pub trait LampOutputPort {
    /// Drive `lamp` at `level` (0 = dark, 255 = full duty).
    fn set_level(&mut self, lamp: LampId, level: u8);

    /// Level most recently driven on `lamp`.
    fn level(&self, lamp: LampId) -> u8;
}

// ───────────────────────────────────────────────────────────────
// Encoder port (driven adapter: knob → domain)
// ───────────────────────────────────────────────────────────────

/// Absolute-position rotary encoder.
pub trait EncoderPort {
    /// Current accumulated position.
    fn position(&mut self) -> i32;

    /// Overwrite the accumulated position (re-seed the knob).
    fn set_position(&mut self, position: i32);
}

/// Everything the lamp core needs from the board: outputs, knob, and a
/// blocking delay for fade steps and reconnect back-off.
pub trait LampHardware: LampOutputPort + EncoderPort + DelayNs {}

impl<T: LampOutputPort + EncoderPort + DelayNs> LampHardware for T {}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → status panel)
// ───────────────────────────────────────────────────────────────

/// Status display.  Read-only consumer of channel snapshots.
pub trait DisplayPort {
    /// Detect the panel.  Called once at start; `false` disables every
    /// later display call for the lifetime of the service.
    fn probe(&mut self) -> bool;

    fn render_channels(&mut self, snapshot: &ChannelSnapshot);

    fn render_clock(&mut self);

    /// Live bar shown while the knob is being turned.
    fn render_progress_bar(&mut self, value: u8);

    /// The lamps went from none in use to some in use.  Panels that show
    /// a clock typically refresh it here; the default ignores it.
    fn on_first_activation(&mut self) {}
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock (wraps at `u32::MAX`).
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
