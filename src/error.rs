//! Unified error types for the Trilamp firmware.
//!
//! A single `Error` enum that every subsystem converts into, so the
//! control loop handles failures uniformly: log, drop, keep running.
//! All variants are `Copy` so they travel through the service and the
//! event sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An inbound remote message was rejected.
    Protocol(ProtocolError),
    /// The remote transport failed.
    Transport(TransportError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be parsed.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Protocol(e) => write!(f, "protocol: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Remote protocol errors (invalid input)
// ---------------------------------------------------------------------------

/// Reasons an inbound `(topic, payload)` pair is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// Topic is not `<root>/<index>/<subtopic>` under our root.
    MalformedTopic,
    /// Channel index segment does not name one of the three lamps.
    InvalidChannel,
    /// Subtopic is neither the command nor the brightness echo.
    UnknownTopic,
    /// Payload is not an ASCII decimal integer.
    NotNumeric,
    /// Payload parsed but lies outside 0..=255.
    OutOfRange(u32),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedTopic => write!(f, "malformed topic"),
            Self::InvalidChannel => write!(f, "invalid channel index"),
            Self::UnknownTopic => write!(f, "unknown topic"),
            Self::NotNumeric => write!(f, "payload is not a number"),
            Self::OutOfRange(v) => write!(f, "payload {v} out of range 0..=255"),
        }
    }
}

impl From<ProtocolError> for Error {
    fn from(e: ProtocolError) -> Self {
        Self::Protocol(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// Broker connection could not be (re)established.
    ConnectFailed,
    /// Not connected when an operation required it.
    Disconnected,
    /// Publish was refused or timed out.
    PublishFailed,
    /// Wildcard subscription was refused.
    SubscribeFailed,
    /// Topic did not fit the fixed-capacity buffer.
    TopicTooLong,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectFailed => write!(f, "broker connect failed"),
            Self::Disconnected => write!(f, "broker disconnected"),
            Self::PublishFailed => write!(f, "publish failed"),
            Self::SubscribeFailed => write!(f, "subscribe failed"),
            Self::TopicTooLong => write!(f, "topic too long"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors from loading or validating [`LampConfig`](crate::config::LampConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The override document could not be deserialised.
    Parse,
    /// A field failed range validation; names the field.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "config parse failed"),
            Self::ValidationFailed(field) => write!(f, "validation failed: {}", field),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
