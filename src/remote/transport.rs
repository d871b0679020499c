//! Transport abstraction: any topic-based publish/subscribe client.
//!
//! Concrete implementations:
//! - ESP-IDF MQTT client (`adapters::mqtt`, target only)
//! - [`NullTransport`] when no broker is configured
//!
//! The remote link is generic over `TransportPort`, so adding a new
//! transport requires zero changes to the protocol logic.

use heapless::{String, Vec};

use super::topic::{MAX_PAYLOAD_LEN, MAX_TOPIC_LEN};
use crate::error::TransportError;

/// One message delivered by the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String<MAX_TOPIC_LEN>,
    pub payload: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl InboundMessage {
    /// Copy a received message into fixed-capacity buffers.
    /// Returns `None` if either part does not fit; such messages cannot
    /// be valid lamp traffic.
    pub fn new(topic: &str, payload: &[u8]) -> Option<Self> {
        Some(Self {
            topic: String::try_from(topic).ok()?,
            payload: Vec::from_slice(payload).ok()?,
        })
    }
}

/// Publish/subscribe client.
pub trait TransportPort {
    /// Publish `payload` on `topic`.
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError>;

    /// Subscribe to every topic below `root` (`<root>/#`).
    fn subscribe_all(&mut self, root: &str) -> Result<(), TransportError>;

    fn is_connected(&self) -> bool;

    /// (Re)establish the broker session.  May block.
    fn reconnect(&mut self) -> Result<(), TransportError>;

    /// Next queued inbound message, if any.  Never blocks.
    fn next_message(&mut self) -> Option<InboundMessage>;
}

/// A transport that is always "connected", discards every publish and
/// never receives.  Used when the device runs without a broker.
pub struct NullTransport;

impl TransportPort for NullTransport {
    fn publish(&mut self, _topic: &str, _payload: &[u8]) -> Result<(), TransportError> {
        Ok(())
    }

    fn subscribe_all(&mut self, _root: &str) -> Result<(), TransportError> {
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn reconnect(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn next_message(&mut self) -> Option<InboundMessage> {
        None
    }
}
