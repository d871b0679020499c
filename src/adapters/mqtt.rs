//! MQTT transport adapter (ESP-IDF only).
//!
//! Wraps `EspMqttClient`.  The connection half runs on its own thread,
//! tracks the session state and copies every complete inbound message
//! into a bounded queue; the control loop drains that queue through
//! [`TransportPort::next_message`] without ever blocking.
//!
//! The ESP-IDF client re-establishes a dropped session by itself, so
//! [`reconnect`](TransportPort::reconnect) only waits a bounded time for
//! that to happen and reports the outcome.  The fixed retry delay between
//! attempts belongs to `RemoteLink`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::thread;

use esp_idf_hal::delay::FreeRtos;
use esp_idf_svc::mqtt::client::{
    Details, EspMqttClient, EspMqttConnection, EventPayload, MqttClientConfiguration, QoS,
};
use log::{info, warn};

use crate::error::TransportError;
use crate::remote::topic::wildcard;
use crate::remote::{InboundMessage, TransportPort};

/// Inbound messages buffered between control ticks.
const INBOUND_QUEUE_DEPTH: usize = 8;
/// How long one `reconnect()` call waits for the client's own reconnect.
const RECONNECT_WAIT_MS: u32 = 1_000;
const RECONNECT_POLL_MS: u32 = 50;

pub struct MqttTransport {
    client: EspMqttClient<'static>,
    connected: Arc<AtomicBool>,
    inbound: Receiver<InboundMessage>,
}

impl MqttTransport {
    /// Create the client and start the connection thread.  Returns
    /// immediately; the session comes up in the background.
    pub fn start(url: &str, client_id: &'static str) -> Result<Self, TransportError> {
        let conf = MqttClientConfiguration {
            client_id: Some(client_id),
            ..Default::default()
        };
        let (client, conn) = EspMqttClient::new(url, &conf).map_err(|e| {
            warn!("MQTT: client init for {} failed: {:?}", url, e);
            TransportError::ConnectFailed
        })?;

        let connected = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::sync_channel(INBOUND_QUEUE_DEPTH);
        let flag = connected.clone();

        thread::Builder::new()
            .name("mqtt-rx".into())
            .stack_size(6 * 1024)
            .spawn(move || receive_loop(conn, &flag, &tx))
            .map_err(|_| TransportError::ConnectFailed)?;

        info!("MQTT: client started for {}", url);
        Ok(Self {
            client,
            connected,
            inbound: rx,
        })
    }
}

fn receive_loop(mut conn: EspMqttConnection, connected: &AtomicBool, tx: &SyncSender<InboundMessage>) {
    while let Ok(event) = conn.next() {
        match event.payload() {
            EventPayload::Connected(_) => {
                connected.store(true, Ordering::Release);
                info!("MQTT: connected");
            }
            EventPayload::Disconnected => {
                connected.store(false, Ordering::Release);
                warn!("MQTT: disconnected");
            }
            EventPayload::Received {
                topic: Some(topic),
                data,
                details: Details::Complete,
                ..
            } => {
                let Some(msg) = InboundMessage::new(topic, data) else {
                    warn!("MQTT: dropping oversized message on {}", topic);
                    continue;
                };
                if let Err(TrySendError::Full(_)) = tx.try_send(msg) {
                    warn!("MQTT: inbound queue full, dropping message on {}", topic);
                }
            }
            _ => {}
        }
    }
    connected.store(false, Ordering::Release);
    warn!("MQTT: connection closed, receive loop exiting");
}

impl TransportPort for MqttTransport {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), TransportError> {
        if !self.is_connected() {
            return Err(TransportError::Disconnected);
        }
        self.client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .map(|_| ())
            .map_err(|_| TransportError::PublishFailed)
    }

    fn subscribe_all(&mut self, root: &str) -> Result<(), TransportError> {
        let filter = wildcard(root)?;
        self.client
            .subscribe(&filter, QoS::AtMostOnce)
            .map(|_| ())
            .map_err(|_| TransportError::SubscribeFailed)?;
        info!("MQTT: subscribed to {}", filter);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    fn reconnect(&mut self) -> Result<(), TransportError> {
        let mut waited = 0;
        while !self.is_connected() {
            if waited >= RECONNECT_WAIT_MS {
                return Err(TransportError::ConnectFailed);
            }
            FreeRtos::delay_ms(RECONNECT_POLL_MS);
            waited += RECONNECT_POLL_MS;
        }
        Ok(())
    }

    fn next_message(&mut self) -> Option<InboundMessage> {
        self.inbound.try_recv().ok()
    }
}
