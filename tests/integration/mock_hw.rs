//! Mock adapters for integration tests.
//!
//! Each mock records every call so tests can assert on the full history
//! without touching real GPIO/PWM registers or a broker.

use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use trilamp::app::events::AppEvent;
use trilamp::app::ports::{DisplayPort, EncoderPort, EventSink, LampOutputPort};
use trilamp::app::service::{LampService, Ports};
use trilamp::config::LampConfig;
use trilamp::error::TransportError;
use trilamp::lamp::{ChannelSnapshot, LampId};
use trilamp::remote::{InboundMessage, TransportPort};

// ── MockBoard: lamp outputs + encoder + delay ─────────────────

#[derive(Default)]
pub struct MockBoard {
    pub levels: [u8; 3],
    pub writes: Vec<(LampId, u8)>,
    pub position: i32,
    pub delayed_ns: u64,
}

#[allow(dead_code)]
impl MockBoard {
    /// Simulate the user turning the knob to an absolute position.
    pub fn turn_to(&mut self, position: i32) {
        self.position = position;
    }

    pub fn writes_to(&self, lamp: LampId) -> Vec<u8> {
        self.writes
            .iter()
            .filter(|(l, _)| *l == lamp)
            .map(|(_, v)| *v)
            .collect()
    }
}

impl LampOutputPort for MockBoard {
    fn set_level(&mut self, lamp: LampId, level: u8) {
        self.levels[lamp.index()] = level;
        self.writes.push((lamp, level));
    }

    fn level(&self, lamp: LampId) -> u8 {
        self.levels[lamp.index()]
    }
}

impl EncoderPort for MockBoard {
    fn position(&mut self) -> i32 {
        self.position
    }

    fn set_position(&mut self, position: i32) {
        self.position = position;
    }
}

impl DelayNs for MockBoard {
    fn delay_ns(&mut self, ns: u32) {
        self.delayed_ns += u64::from(ns);
    }
}

// ── MockTransport ─────────────────────────────────────────────

pub struct MockTransport {
    pub connected: bool,
    /// Reconnect attempts that fail before one succeeds.
    pub failures_left: u32,
    pub reconnects: u32,
    pub subscriptions: Vec<String>,
    pub published: Vec<(String, String)>,
    pub inbound: VecDeque<InboundMessage>,
}

#[allow(dead_code)]
impl MockTransport {
    pub fn connected() -> Self {
        Self {
            connected: true,
            failures_left: 0,
            reconnects: 0,
            subscriptions: Vec::new(),
            published: Vec::new(),
            inbound: VecDeque::new(),
        }
    }

    pub fn push(&mut self, topic: &str, payload: &str) {
        assert!(self.offer(topic, payload), "fits buffers: {topic} {payload:?}");
    }

    /// Queue a message the way the MQTT receive thread does: anything
    /// that does not fit the fixed buffers is dropped.  Returns whether
    /// it was queued.
    pub fn offer(&mut self, topic: &str, payload: &str) -> bool {
        match InboundMessage::new(topic, payload.as_bytes()) {
            Some(msg) => {
                self.inbound.push_back(msg);
                true
            }
            None => false,
        }
    }

    /// Drop the session; the next `failures` reconnects fail.
    pub fn drop_link(&mut self, failures: u32) {
        self.connected = false;
        self.failures_left = failures;
    }
}

impl TransportPort for MockTransport {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        if !self.connected {
            return Err(TransportError::Disconnected);
        }
        let payload = String::from_utf8(payload.to_vec()).expect("ascii payload");
        self.published.push((topic.to_string(), payload));
        Ok(())
    }

    fn subscribe_all(&mut self, root: &str) -> Result<(), TransportError> {
        self.subscriptions.push(format!("{root}/#"));
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn reconnect(&mut self) -> Result<(), TransportError> {
        self.reconnects += 1;
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(TransportError::ConnectFailed);
        }
        self.connected = true;
        Ok(())
    }

    fn next_message(&mut self) -> Option<InboundMessage> {
        self.inbound.pop_front()
    }
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    Channels(ChannelSnapshot),
    Clock,
    ProgressBar(u8),
    FirstActivation,
}

pub struct MockDisplay {
    pub present: bool,
    pub probes: u32,
    pub calls: Vec<DisplayCall>,
}

impl MockDisplay {
    pub fn new(present: bool) -> Self {
        Self {
            present,
            probes: 0,
            calls: Vec::new(),
        }
    }
}

impl DisplayPort for MockDisplay {
    fn probe(&mut self) -> bool {
        self.probes += 1;
        self.present
    }

    fn render_channels(&mut self, snapshot: &ChannelSnapshot) {
        self.calls.push(DisplayCall::Channels(*snapshot));
    }

    fn render_clock(&mut self) {
        self.calls.push(DisplayCall::Clock);
    }

    fn render_progress_bar(&mut self, value: u8) {
        self.calls.push(DisplayCall::ProgressBar(value));
    }

    fn on_first_activation(&mut self) {
        self.calls.push(DisplayCall::FirstActivation);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn count(&self, event: &AppEvent) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }

    pub fn rejections(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Rejected(_)))
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── Rig: a started service plus every mock ────────────────────

pub struct Rig {
    pub app: LampService,
    pub hw: MockBoard,
    pub net: MockTransport,
    pub display: MockDisplay,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with(LampConfig::default(), true)
    }

    pub fn without_display() -> Self {
        Self::with(LampConfig::default(), false)
    }

    pub fn with(config: LampConfig, display: bool) -> Self {
        let mut rig = Self {
            app: LampService::new(config, [25, 26, 27]),
            hw: MockBoard::default(),
            net: MockTransport::connected(),
            display: MockDisplay::new(display),
            sink: RecordingSink::default(),
        };
        let Rig {
            app,
            hw,
            net,
            display,
            sink,
        } = &mut rig;
        app.start(&mut Ports::new(hw, net, display, sink));
        rig
    }

    /// Run `f` against the service with every mock wired in.
    pub fn run<R>(
        &mut self,
        f: impl FnOnce(
            &mut LampService,
            &mut Ports<'_, MockBoard, MockTransport, MockDisplay, RecordingSink>,
        ) -> R,
    ) -> R {
        let mut io = Ports::new(&mut self.hw, &mut self.net, &mut self.display, &mut self.sink);
        f(&mut self.app, &mut io)
    }

    pub fn command(&mut self, cmd: trilamp::app::commands::AppCommand) {
        self.run(|app, io| app.handle_command(cmd, io));
    }

    pub fn tick(&mut self, now_ms: u32) {
        self.run(|app, io| app.tick(now_ms, None, io));
    }

    /// Publishes recorded so far, then forget them.
    pub fn take_published(&mut self) -> Vec<(String, String)> {
        std::mem::take(&mut self.net.published)
    }
}
