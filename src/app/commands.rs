//! Inbound commands to the lamp service.
//!
//! These represent actions requested by the outside world (button
//! gestures, the remote protocol) that the
//! [`LampService`](super::service::LampService) interprets and acts upon.
//! Knob rotation is polled rather than commanded; see
//! [`LampService::poll_knob`](super::service::LampService::poll_knob).

use crate::drivers::button::ButtonEvent;
use crate::lamp::LampId;

/// Commands that adapters can send into the lamp core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Toggle the selected lamp.
    Click,

    /// Bind the knob to the next lamp.
    DoubleClick,

    /// Group toggle: snapshot-and-off, or restore.
    LongPress,

    /// Remote brightness command; `level == 0` switches the lamp off.
    Remote { lamp: LampId, level: u8 },
}

impl From<ButtonEvent> for AppCommand {
    fn from(event: ButtonEvent) -> Self {
        match event {
            ButtonEvent::Click => Self::Click,
            ButtonEvent::DoubleClick => Self::DoubleClick,
            ButtonEvent::LongPressStart => Self::LongPress,
        }
    }
}
