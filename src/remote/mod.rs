//! Remote control over a topic-based publish/subscribe protocol.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     Remote Stack                           │
//! │                                                            │
//! │  ┌───────────┐   ┌────────────┐   ┌─────────────────────┐  │
//! │  │ Transport │──▶│ TopicCodec │──▶│ LampService         │  │
//! │  │ (trait)   │   │ (parse)    │   │ (Remote command)    │  │
//! │  └───────────┘   └────────────┘   └─────────────────────┘  │
//! │       ▲                                    │               │
//! │       │              ┌─────────────────────┘               │
//! │       │              ▼                                     │
//! │  ┌───────────┐   ┌────────────┐                            │
//! │  │ Transport │◀──│ RemoteLink │   (brightness publish,     │
//! │  │ (publish) │   │            │    reconnect policy)       │
//! │  └───────────┘   └────────────┘                            │
//! └────────────────────────────────────────────────────────────┘
//! ```

pub mod link;
pub mod topic;
pub mod transport;

pub use link::RemoteLink;
pub use topic::{Inbound, TopicCodec};
pub use transport::{InboundMessage, NullTransport, TransportPort};
