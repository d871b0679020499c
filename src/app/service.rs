//! Application service: the hexagonal core.
//!
//! [`LampService`] owns the channel model, the fade engine, the remote
//! link and the afterglow slot.  It reconciles the three input sources
//! (knob, button gestures, remote messages) into channel state.  All I/O
//! flows through port traits bundled in [`Ports`], making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  knob ──────┐    ┌──────────────────────────────┐ ──▶ LampHardware
//!  gestures ──┼──▶ │         LampService          │ ──▶ TransportPort
//!  remote ────┘    │ Channels · Fade · Afterglow  │ ──▶ DisplayPort
//!                  └──────────────────────────────┘ ──▶ EventSink
//! ```
//!
//! Single-threaded: every call runs to completion.  A fade blocks the
//! caller for `steps × fade_step_delay_us`; no other input is serviced
//! meanwhile and an in-progress fade cannot be cancelled.

use log::{debug, info, warn};

use crate::afterglow::AfterglowScheduler;
use crate::config::LampConfig;
use crate::error::{Error, Result};
use crate::lamp::{ChannelSnapshot, Channels, FadeEngine, LampId, clamp_brightness};
use crate::remote::{Inbound, InboundMessage, RemoteLink, TransportPort};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{DisplayPort, EventSink, LampHardware};

// ───────────────────────────────────────────────────────────────
// Port bundle
// ───────────────────────────────────────────────────────────────

/// Borrowed adapters for one call into the service.
pub struct Ports<'a, H, N, D, S> {
    pub hw: &'a mut H,
    pub net: &'a mut N,
    pub display: &'a mut D,
    pub sink: &'a mut S,
}

impl<'a, H, N, D, S> Ports<'a, H, N, D, S>
where
    H: LampHardware,
    N: TransportPort,
    D: DisplayPort,
    S: EventSink,
{
    pub fn new(hw: &'a mut H, net: &'a mut N, display: &'a mut D, sink: &'a mut S) -> Self {
        Self {
            hw,
            net,
            display,
            sink,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// LampService
// ───────────────────────────────────────────────────────────────

pub struct LampService {
    config: LampConfig,
    channels: Channels,
    fade: FadeEngine,
    link: RemoteLink,
    afterglow: AfterglowScheduler,
    /// Last knob reading acted upon, already clamped to the lit range.
    knob_baseline: u8,
    /// Set once from the display probe at start.
    display_present: bool,
}

impl LampService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch any port; call [`start`](Self::start) next.
    pub fn new(config: LampConfig, pins: [i32; 3]) -> Self {
        let channels = Channels::new(pins, config.default_brightness);
        let knob_baseline = channels.selected_channel().value();
        Self {
            fade: FadeEngine::new(config.fade_step_delay_us),
            link: RemoteLink::new(&config),
            afterglow: AfterglowScheduler::new(),
            channels,
            knob_baseline,
            display_present: false,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Probe the display, seed the knob and subscribe to the remote root.
    pub fn start(
        &mut self,
        io: &mut Ports<'_, impl LampHardware, impl TransportPort, impl DisplayPort, impl EventSink>,
    ) {
        self.display_present = io.display.probe();
        if !self.display_present {
            warn!("Display not found; status output disabled");
        }

        self.reseed_knob(io.hw);

        if io.net.is_connected() {
            if let Err(e) = self.link.subscribe(io.net) {
                warn!("Remote: initial subscribe failed: {}", e);
            }
        } else {
            info!("Remote: not connected; subscribe deferred to first reconnect");
        }

        if self.display_present {
            io.display.render_clock();
            io.display.render_channels(&self.channels.snapshot());
        }

        io.sink.emit(&AppEvent::Started {
            display: self.display_present,
        });
        info!(
            "LampService started (root={}, display={})",
            self.link.codec().root(),
            self.display_present
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// One pass of the control loop, in fixed order: knob, gesture,
    /// afterglow, then every queued inbound message.
    pub fn tick(
        &mut self,
        now_ms: u32,
        gesture: Option<AppCommand>,
        io: &mut Ports<'_, impl LampHardware, impl TransportPort, impl DisplayPort, impl EventSink>,
    ) {
        self.poll_knob(now_ms, io);

        if let Some(cmd) = gesture {
            self.handle_command(cmd, io);
        }

        self.poll_afterglow(now_ms, io);

        while let Some(msg) = io.net.next_message() {
            // Rejections are already logged and emitted.
            let _ = self.handle_message(&msg, io);
        }
    }

    // ── Command handling ──────────────────────────────────────

    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        io: &mut Ports<'_, impl LampHardware, impl TransportPort, impl DisplayPort, impl EventSink>,
    ) {
        match cmd {
            AppCommand::Click => self.single_click(io),
            AppCommand::DoubleClick => self.double_click(io),
            AppCommand::LongPress => self.long_press(io),
            AppCommand::Remote { lamp, level } => self.remote_command(lamp, level, io),
        }
    }

    /// Toggle the selected lamp.
    fn single_click(
        &mut self,
        io: &mut Ports<'_, impl LampHardware, impl TransportPort, impl DisplayPort, impl EventSink>,
    ) {
        let lamp = self.channels.selected();
        let on = !self.channels.get(lamp).is_on();
        self.switch(lamp, on, io);
    }

    /// Bind the knob to the next lamp.  No brightness change.
    fn double_click(
        &mut self,
        io: &mut Ports<'_, impl LampHardware, impl TransportPort, impl DisplayPort, impl EventSink>,
    ) {
        let lamp = self.channels.select_next();
        self.reseed_knob(io.hw);
        io.sink.emit(&AppEvent::SelectionChanged(lamp));
        self.render_channels(io.display);
    }

    /// Group toggle: snapshot-and-off when anything is lit, else restore
    /// the lamps recorded at the last group-off.  Selection ends on lamp A.
    fn long_press(
        &mut self,
        io: &mut Ports<'_, impl LampHardware, impl TransportPort, impl DisplayPort, impl EventSink>,
    ) {
        if self.channels.lamps_in_use() {
            self.channels.snapshot_defaults();
            let defaults = LampId::ALL.map(|l| self.channels.get(l).is_on_default());

            for lamp in LampId::ALL {
                if self.channels.get(lamp).is_on() {
                    self.channels.select(lamp);
                    self.switch(lamp, false, io);
                }
            }
            self.select(LampId::A, io.hw);
            io.sink.emit(&AppEvent::GroupOff { defaults });
        } else {
            let mut restored = 0;
            for lamp in LampId::ALL {
                if self.channels.get(lamp).is_on_default() {
                    self.channels.select(lamp);
                    self.switch(lamp, true, io);
                    restored += 1;
                }
            }
            self.select(LampId::A, io.hw);
            io.sink.emit(&AppEvent::GroupRestored { restored });
        }
        self.render_channels(io.display);
    }

    /// `0` switches `lamp` off; anything else stores the level and
    /// switches it on.  Both go through the fade.
    fn remote_command(
        &mut self,
        lamp: LampId,
        level: u8,
        io: &mut Ports<'_, impl LampHardware, impl TransportPort, impl DisplayPort, impl EventSink>,
    ) {
        if level == 0 {
            self.switch(lamp, false, io);
        } else {
            self.channels.set_brightness(lamp, level);
            self.switch(lamp, true, io);
        }
    }

    // ── Remote inbound ────────────────────────────────────────

    /// Apply one inbound message.  Echoes of our own publishes are
    /// ignored; rejected messages leave every lamp untouched.
    pub fn handle_message(
        &mut self,
        msg: &InboundMessage,
        io: &mut Ports<'_, impl LampHardware, impl TransportPort, impl DisplayPort, impl EventSink>,
    ) -> Result<()> {
        match self.link.parse(&msg.topic, &msg.payload) {
            Ok(Inbound::Echo(lamp)) => {
                debug!("Remote: echo for lamp {} ignored", lamp);
                Ok(())
            }
            Ok(Inbound::Command { lamp, level }) => {
                self.remote_command(lamp, level, io);
                Ok(())
            }
            Err(e) => {
                let err = Error::from(e);
                io.sink.emit(&AppEvent::Rejected(err));
                Err(err)
            }
        }
    }

    // ── Knob ──────────────────────────────────────────────────

    /// Live brightness adjustment of the selected lamp.
    ///
    /// Only honoured while the selected lamp is on.  Drives the output
    /// directly (no fade) and re-arms the afterglow publish.  Returns
    /// `true` if the brightness changed.
    pub fn poll_knob(
        &mut self,
        now_ms: u32,
        io: &mut Ports<'_, impl LampHardware, impl TransportPort, impl DisplayPort, impl EventSink>,
    ) -> bool {
        let lamp = self.channels.selected();
        if !self.channels.get(lamp).is_on() {
            return false;
        }

        let raw = io.hw.position();
        let value = clamp_brightness(raw);
        if i32::from(value) != raw {
            io.hw.set_position(i32::from(value));
        }
        if value == self.knob_baseline {
            return false;
        }

        self.knob_baseline = value;
        self.channels.set_brightness(lamp, value);
        io.hw.set_level(lamp, value);
        let quiet_ms = self.config.afterglow_quiet_ms;
        if let Some(displaced) = self.afterglow.schedule(now_ms, quiet_ms, lamp) {
            debug!("Afterglow: lamp {} settled early by a knob move on {}", displaced, lamp);
            self.publish(displaced, self.channels.get(displaced).output_level(), io);
        }

        if self.display_present {
            io.display.render_progress_bar(value);
        }
        true
    }

    // ── Afterglow ─────────────────────────────────────────────

    /// Fire the settle action if the knob has been quiet long enough:
    /// refresh the display and publish the lamp the knob last moved.
    /// That is the selected lamp unless the selection changed during the
    /// quiet period.
    pub fn poll_afterglow(
        &mut self,
        now_ms: u32,
        io: &mut Ports<'_, impl LampHardware, impl TransportPort, impl DisplayPort, impl EventSink>,
    ) -> bool {
        let Some(lamp) = self.afterglow.poll(now_ms) else {
            return false;
        };
        debug!("Afterglow: settled on lamp {}", lamp);
        self.render_channels(io.display);
        self.publish(lamp, self.channels.get(lamp).output_level(), io);
        true
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn channels(&self) -> &Channels {
        &self.channels
    }

    pub fn snapshot(&self) -> ChannelSnapshot {
        self.channels.snapshot()
    }

    pub fn selected(&self) -> LampId {
        self.channels.selected()
    }

    pub fn display_present(&self) -> bool {
        self.display_present
    }

    pub fn afterglow_pending(&self) -> bool {
        self.afterglow.is_pending()
    }

    pub fn config(&self) -> &LampConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    /// Set the power flag, fade to the new output level and publish it.
    fn switch(
        &mut self,
        lamp: LampId,
        on: bool,
        io: &mut Ports<'_, impl LampHardware, impl TransportPort, impl DisplayPort, impl EventSink>,
    ) {
        let was_in_use = self.channels.lamps_in_use();
        self.channels.set_on(lamp, on);
        if on && lamp == self.channels.selected() {
            self.reseed_knob(io.hw);
        }

        let ch = *self.channels.get(lamp);
        let steps = self.fade.run(io.hw, lamp, ch.output_level());
        debug!(
            "lamp {} (gpio {}) settled at {} after {} steps",
            lamp,
            ch.pin(),
            ch.output_level(),
            steps
        );
        io.sink.emit(&AppEvent::LampSwitched {
            lamp,
            on,
            value: ch.value(),
        });

        self.publish(lamp, ch.output_level(), io);

        if !was_in_use && self.channels.lamps_in_use() {
            io.sink.emit(&AppEvent::FirstActivation);
            if self.display_present {
                io.display.on_first_activation();
            }
        }
        self.render_channels(io.display);
    }

    fn publish(
        &self,
        lamp: LampId,
        level: u8,
        io: &mut Ports<'_, impl LampHardware, impl TransportPort, impl DisplayPort, impl EventSink>,
    ) {
        match self.link.publish_level(lamp, level, io.net, io.hw) {
            Ok(()) => io.sink.emit(&AppEvent::Published { lamp, level }),
            Err(e) => warn!("Remote: publish {}={} failed: {}", lamp, level, e),
        }
    }

    fn select(&mut self, lamp: LampId, hw: &mut impl LampHardware) {
        self.channels.select(lamp);
        self.reseed_knob(hw);
    }

    /// Align the encoder with the selected lamp's stored value so the
    /// next rotation starts from there instead of jumping.
    fn reseed_knob(&mut self, hw: &mut impl LampHardware) {
        let value = self.channels.selected_channel().value();
        hw.set_position(i32::from(value));
        self.knob_baseline = value;
    }

    fn render_channels(&self, display: &mut impl DisplayPort) {
        if self.display_present {
            display.render_channels(&self.channels.snapshot());
        }
    }
}
