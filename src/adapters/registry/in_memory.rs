//! In-memory room registry.
//!
//! Keeps the room-membership table in process memory and captures every
//! local delivery so tests can assert on what reached local clients. The
//! demo binary uses it as its registry; real deployments implement
//! [`RoomRegistry`] over their socket server instead.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::ports::{RegistryError, RoomRegistry};

/// One captured local broadcast delivery.
#[derive(Debug, Clone)]
pub struct LocalDelivery {
    pub data: serde_json::Value,
    pub rooms: BTreeSet<String>,
    pub except: BTreeSet<String>,
}

/// In-memory `RoomRegistry` with delivery capture.
pub struct InMemoryRegistry {
    namespace: String,
    /// room name → member socket ids
    rooms: RwLock<HashMap<String, BTreeSet<String>>>,
    deliveries: RwLock<Vec<LocalDelivery>>,
}

impl InMemoryRegistry {
    /// Create an empty registry serving the given namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            rooms: RwLock::new(HashMap::new()),
            deliveries: RwLock::new(Vec::new()),
        }
    }

    /// Whether a socket is currently a member of a room.
    pub async fn is_member(&self, room: &str, sid: &str) -> bool {
        self.rooms
            .read()
            .await
            .get(room)
            .map(|members| members.contains(sid))
            .unwrap_or(false)
    }

    /// Number of members in a room (0 if the room doesn't exist).
    pub async fn member_count(&self, room: &str) -> usize {
        self.rooms
            .read()
            .await
            .get(room)
            .map(BTreeSet::len)
            .unwrap_or(0)
    }

    /// All rooms that currently have members.
    pub async fn active_rooms(&self) -> Vec<String> {
        self.rooms.read().await.keys().cloned().collect()
    }

    /// All captured deliveries (for test assertions).
    pub async fn deliveries(&self) -> Vec<LocalDelivery> {
        self.deliveries.read().await.clone()
    }

    /// Clear captured deliveries (for test isolation).
    pub async fn clear_deliveries(&self) {
        self.deliveries.write().await.clear();
    }
}

#[async_trait]
impl RoomRegistry for InMemoryRegistry {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn broadcast_local(
        &self,
        data: &serde_json::Value,
        rooms: &BTreeSet<String>,
        except: &BTreeSet<String>,
    ) -> Result<(), RegistryError> {
        self.deliveries.write().await.push(LocalDelivery {
            data: data.clone(),
            rooms: rooms.clone(),
            except: except.clone(),
        });
        Ok(())
    }

    async fn join_hook(&self, room: &str, sid: &str) -> Result<(), RegistryError> {
        self.rooms
            .write()
            .await
            .entry(room.to_string())
            .or_default()
            .insert(sid.to_string());
        Ok(())
    }

    async fn leave_hook(&self, room: &str, sid: &str) -> Result<(), RegistryError> {
        let mut rooms = self.rooms.write().await;
        if let Some(members) = rooms.get_mut(room) {
            members.remove(sid);
            if members.is_empty() {
                rooms.remove(room);
            }
        }
        Ok(())
    }

    async fn disconnect_hook(&self, sid: &str) -> Result<(), RegistryError> {
        let mut rooms = self.rooms.write().await;
        rooms.retain(|_, members| {
            members.remove(sid);
            !members.is_empty()
        });
        Ok(())
    }
}
