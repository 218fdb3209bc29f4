//! Bridge error taxonomy.
//!
//! Initialization errors park the bridge in `Failed` rather than
//! propagating to the embedding application; a missing broker degrades the
//! system to single-instance mode instead of crashing it.

use thiserror::Error;

use crate::ports::RegistryError;

/// Errors raised by the bridge and its broker adapters.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Broker unreachable after exhausting every connect retry.
    #[error("broker unreachable after {attempts} attempts: {source}")]
    TransportConnect {
        attempts: u32,
        #[source]
        source: lapin::Error,
    },

    /// Exchange or queue declaration conflicted with existing broker state.
    #[error("exchange/queue declaration failed: {0}")]
    Declare(#[source] lapin::Error),

    /// Starting the queue subscription failed.
    #[error("consumer setup failed: {0}")]
    Consume(#[source] lapin::Error),

    /// Inbound message body could not be decoded into an envelope.
    #[error("malformed envelope: {0}")]
    Decode(#[source] serde_json::Error),

    /// Outbound envelope could not be serialized.
    #[error("envelope serialization failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// A room-registry hook failed while applying an event.
    #[error("room registry hook failed: {0}")]
    Handler(#[from] RegistryError),

    /// Publish was refused by the broker or the channel is gone.
    #[error("publish failed: {0}")]
    Publish(#[source] lapin::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_connect_reports_attempt_count() {
        let err = BridgeError::TransportConnect {
            attempts: 10,
            source: lapin::Error::ChannelsLimitReached,
        };
        assert!(err.to_string().contains("10 attempts"));
    }

    #[test]
    fn consume_error_names_consumer_setup() {
        let err = BridgeError::Consume(lapin::Error::ChannelsLimitReached);
        assert!(err.to_string().starts_with("consumer setup failed"));
        assert!(!err.to_string().contains("declaration"));
    }

    #[test]
    fn handler_error_wraps_registry_error() {
        let err: BridgeError = RegistryError::Delivery("socket gone".to_string()).into();
        assert!(err.to_string().contains("socket gone"));
    }
}
