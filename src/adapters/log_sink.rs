//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { display } => {
                info!("START | display={}", if *display { "present" } else { "absent" });
            }
            AppEvent::LampSwitched { lamp, on, value } => {
                info!("LAMP | {} {} value={}", lamp, if *on { "ON" } else { "OFF" }, value);
            }
            AppEvent::SelectionChanged(lamp) => {
                info!("SELECT | knob -> lamp {}", lamp);
            }
            AppEvent::FirstActivation => {
                info!("LAMP | first activation");
            }
            AppEvent::GroupOff { defaults } => {
                info!(
                    "GROUP | off, remembered A={} B={} C={}",
                    defaults[0], defaults[1], defaults[2]
                );
            }
            AppEvent::GroupRestored { restored } => {
                info!("GROUP | restored {} lamp(s)", restored);
            }
            AppEvent::Published { lamp, level } => {
                info!("PUBLISH | lamp {} = {}", lamp, level);
            }
            AppEvent::Rejected(e) => {
                warn!("REJECT | {}", e);
            }
        }
    }
}
