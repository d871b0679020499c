//! Outbound application events.
//!
//! The [`LampService`](super::service::LampService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, forward to a
//! display, count for diagnostics, etc.

use crate::error::Error;
use crate::lamp::LampId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started; `display` records whether a panel answered the probe.
    Started { display: bool },

    /// A lamp finished fading on or off.
    LampSwitched { lamp: LampId, on: bool, value: u8 },

    /// The knob is now bound to `lamp`.
    SelectionChanged(LampId),

    /// Lamps went from none in use to some in use.
    FirstActivation,

    /// Long press turned every lit lamp off; `defaults` is the snapshot taken.
    GroupOff { defaults: [bool; 3] },

    /// Long press restored the lamps recorded at the last group-off.
    GroupRestored { restored: u8 },

    /// A brightness value went out on the remote channel.
    Published { lamp: LampId, level: u8 },

    /// An input was dropped without touching lamp state.
    Rejected(Error),
}
