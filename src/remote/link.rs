//! Outbound side of the remote protocol.
//!
//! [`RemoteLink`] publishes brightness on `<root>/<index>/<brightness>`
//! and owns the reconnect policy: while the transport reports
//! disconnected it calls `reconnect()`, waits a **fixed** delay after
//! each failure, and retries forever with no backoff growth.  Every
//! successful reconnect resubscribes to `<root>/#`.

use embedded_hal::delay::DelayNs;
use log::{info, warn};

use super::topic::{Inbound, TopicCodec, encode_level};
use super::transport::TransportPort;
use crate::config::LampConfig;
use crate::error::{ProtocolError, TransportError};
use crate::lamp::LampId;

pub struct RemoteLink {
    codec: TopicCodec,
    reconnect_delay_ms: u32,
}

impl RemoteLink {
    pub fn new(config: &LampConfig) -> Self {
        Self {
            codec: TopicCodec::new(config),
            reconnect_delay_ms: config.reconnect_delay_ms,
        }
    }

    pub fn codec(&self) -> &TopicCodec {
        &self.codec
    }

    /// Classify an inbound `(topic, payload)` pair.
    pub fn parse(&self, topic: &str, payload: &[u8]) -> Result<Inbound, ProtocolError> {
        self.codec.parse(topic, payload)
    }

    /// Subscribe to the wildcard root.  Called once at start.
    pub fn subscribe(&self, net: &mut impl TransportPort) -> Result<(), TransportError> {
        net.subscribe_all(self.codec.root())
    }

    /// Block until the transport is connected.  Returns the number of
    /// reconnect attempts made (0 if it was already connected).
    pub fn ensure_connected(&self, net: &mut impl TransportPort, delay: &mut impl DelayNs) -> u32 {
        let mut attempts = 0;
        while !net.is_connected() {
            attempts += 1;
            match net.reconnect() {
                Ok(()) => {
                    info!("Remote: reconnected after {} attempt(s)", attempts);
                    if let Err(e) = self.subscribe(net) {
                        warn!("Remote: resubscribe failed: {}", e);
                    }
                }
                Err(e) => {
                    warn!(
                        "Remote: reconnect attempt {} failed ({}), retrying in {} ms",
                        attempts, e, self.reconnect_delay_ms
                    );
                    delay.delay_ms(self.reconnect_delay_ms);
                }
            }
        }
        attempts
    }

    /// Publish `level` as the brightness of `lamp`, reconnecting first if needed.
    pub fn publish_level(
        &self,
        lamp: LampId,
        level: u8,
        net: &mut impl TransportPort,
        delay: &mut impl DelayNs,
    ) -> Result<(), TransportError> {
        let topic = self.codec.brightness_topic(lamp)?;
        self.ensure_connected(net, delay);
        net.publish(&topic, encode_level(level).as_bytes())
    }
}
