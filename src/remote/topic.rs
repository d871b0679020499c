//! Topic codec for the remote lamp protocol.
//!
//! Wire format (bit-exact):
//! ```text
//!   topic   = <root> "/" <index> "/" <subtopic>      index ∈ {0, 1, 2}
//!   payload = ASCII decimal integer, 0..=255
//! ```
//!
//! Two subtopics are recognised.  The brightness subtopic carries this
//! device's own publications; the broker loops them back to us through
//! the wildcard subscription, so inbound brightness messages are always
//! ignored.  The command subtopic carries remote set-points.

use core::fmt::Write as _;

use heapless::String;

use crate::config::{LampConfig, MAX_SEGMENT_LEN};
use crate::error::{ProtocolError, TransportError};
use crate::lamp::LampId;

/// Capacity of a full topic string.
pub const MAX_TOPIC_LEN: usize = 3 * MAX_SEGMENT_LEN + 4;

/// Capacity of a payload (longest accepted value is "255").
pub const MAX_PAYLOAD_LEN: usize = 16;

pub type Topic = String<MAX_TOPIC_LEN>;

/// A successfully classified inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    /// Our own brightness publication looped back by the broker.
    Echo(LampId),
    /// Remote set-point; 0 means off.
    Command { lamp: LampId, level: u8 },
}

/// Builds and parses topics under one configured root.
#[derive(Debug, Clone)]
pub struct TopicCodec {
    root: String<MAX_SEGMENT_LEN>,
    brightness: String<MAX_SEGMENT_LEN>,
    command: String<MAX_SEGMENT_LEN>,
}

impl TopicCodec {
    pub fn new(config: &LampConfig) -> Self {
        Self {
            root: config.topic_root.clone(),
            brightness: config.brightness_subtopic.clone(),
            command: config.command_subtopic.clone(),
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Classify an inbound message.  Never touches lamp state.
    pub fn parse(&self, topic: &str, payload: &[u8]) -> Result<Inbound, ProtocolError> {
        let mut parts = topic.split('/');
        let (Some(root), Some(index), Some(sub), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ProtocolError::MalformedTopic);
        };
        if root != self.root.as_str() {
            return Err(ProtocolError::MalformedTopic);
        }

        let lamp = parse_decimal(index)
            .and_then(|i| LampId::from_index(i as usize))
            .ok_or(ProtocolError::InvalidChannel)?;

        if sub == self.brightness.as_str() {
            return Ok(Inbound::Echo(lamp));
        }
        if sub != self.command.as_str() {
            return Err(ProtocolError::UnknownTopic);
        }

        let text = core::str::from_utf8(payload).map_err(|_| ProtocolError::NotNumeric)?;
        let value = parse_decimal(text).ok_or(ProtocolError::NotNumeric)?;
        let level = u8::try_from(value).map_err(|_| ProtocolError::OutOfRange(value))?;
        Ok(Inbound::Command { lamp, level })
    }

    /// `<root>/<index>/<brightness>` for `lamp`.
    pub fn brightness_topic(&self, lamp: LampId) -> Result<Topic, TransportError> {
        let mut topic = Topic::new();
        write!(topic, "{}/{}/{}", self.root, lamp.index(), self.brightness)
            .map_err(|_| TransportError::TopicTooLong)?;
        Ok(topic)
    }
}

/// Wildcard filter covering every topic under `root`.
pub fn wildcard(root: &str) -> Result<Topic, TransportError> {
    let mut filter = Topic::new();
    write!(filter, "{}/#", root).map_err(|_| TransportError::TopicTooLong)?;
    Ok(filter)
}

/// Decimal ASCII encoding of a brightness level.
pub fn encode_level(level: u8) -> String<3> {
    let mut s = String::new();
    // Three digits always fit.
    let _ = write!(s, "{}", level);
    s
}

/// Strict unsigned decimal: one or more ASCII digits, nothing else.
/// Values past `u32::MAX` saturate so they still report as out of range.
fn parse_decimal(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(s.bytes().fold(0u32, |acc, b| {
        acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
    }))
}
