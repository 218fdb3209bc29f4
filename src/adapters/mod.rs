//! Adapters - Implementations wired around the ports.
//!
//! - `amqp` - broker connection supervision and topic-exchange protocol ops
//! - `bridge` - the cluster bridge adapter itself
//! - `registry` - in-memory `RoomRegistry` (tests and the demo binary)

pub mod amqp;
pub mod bridge;
pub mod registry;

pub use amqp::{BrokerLink, TopicChannel};
pub use bridge::{Bridge, BridgeState};
pub use registry::InMemoryRegistry;
