//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the bridge and the outside world. Adapters implement these ports.
//!
//! - `RoomRegistry` - the local room-membership table the bridge applies
//!   events to and echoes cluster events from

mod room_registry;

pub use room_registry::{RegistryError, RoomRegistry};
