//! RoomRegistry port - the local room-membership collaborator.
//!
//! The bridge never owns client connections or membership state itself; it
//! calls into this port to apply effects locally and is driven by the
//! hosting server through the bridge's public operations. Local delivery
//! must always occur regardless of cluster state, so implementations must
//! not gate these methods on broker availability.

use std::collections::BTreeSet;

use async_trait::async_trait;

/// Errors raised by room-registry implementations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Delivering a broadcast to local clients failed.
    #[error("local delivery failed: {0}")]
    Delivery(String),

    /// A membership mutation (join/leave/disconnect) failed.
    #[error("membership update failed: {0}")]
    Membership(String),
}

/// Port for the local room-membership table.
///
/// Implementations must:
/// - perform room/exception filtering inside `broadcast_local`
/// - treat hooks as side-effecting notifications, not broadcast paths
/// - apply each hook invocation exactly once
#[async_trait]
pub trait RoomRegistry: Send + Sync {
    /// Logical channel name (namespace) this registry serves.
    ///
    /// Scopes the bridge's exchange: one exchange per namespace.
    fn namespace(&self) -> &str;

    /// Deliver a payload to local clients, filtered by room and
    /// exception sets. An empty room set targets every connected client.
    async fn broadcast_local(
        &self,
        data: &serde_json::Value,
        rooms: &BTreeSet<String>,
        except: &BTreeSet<String>,
    ) -> Result<(), RegistryError>;

    /// Record that a socket joined a room.
    async fn join_hook(&self, room: &str, sid: &str) -> Result<(), RegistryError>;

    /// Record that a socket left a room.
    async fn leave_hook(&self, room: &str, sid: &str) -> Result<(), RegistryError>;

    /// Record that a socket disconnected and left all rooms.
    async fn disconnect_hook(&self, sid: &str) -> Result<(), RegistryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that the trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn RoomRegistry) {}

    #[test]
    fn registry_error_messages() {
        let err = RegistryError::Delivery("emit failed".to_string());
        assert!(err.to_string().contains("emit failed"));

        let err = RegistryError::Membership("unknown sid".to_string());
        assert!(err.to_string().contains("unknown sid"));
    }
}
