//! Domain layer containing the cluster wire protocol and shared types.
//!
//! # Module Organization
//!
//! - `envelope` - The wire message exchanged between cluster instances
//! - `errors` - Bridge error taxonomy
//! - `identity` - Cluster-unique server identity
//! - `routing` - Routing-key grammar and queue binding patterns

pub mod envelope;
pub mod errors;
pub mod identity;
pub mod routing;

pub use envelope::{BroadcastOptions, Decoded, Envelope, WireOptions};
pub use errors::BridgeError;
pub use identity::ServerId;
