//! The wire envelope exchanged between cluster instances.
//!
//! Bodies are UTF-8 JSON objects tagged by `type`, each carrying the
//! publishing instance's identity as `serverId` plus an advisory
//! `timestamp` (publish time in millis, never used for ordering).
//!
//! Room and exception sets are flattened to ordered lists on the wire
//! because sets do not serialize to JSON; [`WireOptions`] and
//! [`BroadcastOptions`] convert in both directions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::identity::ServerId;

/// Broadcast filter options as they travel on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireOptions {
    /// Target rooms; empty means every connected client.
    pub rooms: Vec<String>,
    /// Socket ids excluded from delivery.
    pub except: Vec<String>,
}

/// Broadcast filter options as the bridge works with them in-process.
///
/// `remote` marks an options value that was reconstructed from an inbound
/// envelope: local delivery still happens, but the event is never
/// re-published (that is what prevents echo loops).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastOptions {
    pub rooms: BTreeSet<String>,
    pub except: BTreeSet<String>,
    pub remote: bool,
}

impl BroadcastOptions {
    /// Options for a locally originated broadcast into the given rooms.
    pub fn to_rooms(rooms: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            rooms: rooms.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Rebuild in-process options from wire lists, marked as remote.
    pub fn from_wire(opts: WireOptions) -> Self {
        Self {
            rooms: opts.rooms.into_iter().collect(),
            except: opts.except.into_iter().collect(),
            remote: true,
        }
    }

    /// Flatten the sets into wire lists (set order, which is sorted).
    pub fn to_wire(&self) -> WireOptions {
        WireOptions {
            rooms: self.rooms.iter().cloned().collect(),
            except: self.except.iter().cloned().collect(),
        }
    }
}

/// The structured message exchanged between cluster instances.
///
/// One variant per event kind; dispatch is exhaustive pattern matching.
/// Unknown `type` values on the wire surface as [`Decoded::Unknown`]
/// rather than a decode error, so future envelope kinds never crash an
/// older instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Envelope {
    /// Payload broadcast, scoped by room/exception filters.
    #[serde(rename = "broadcast")]
    Broadcast {
        #[serde(rename = "serverId")]
        server_id: ServerId,
        data: serde_json::Value,
        opts: WireOptions,
        timestamp: i64,
    },

    /// A socket joined a room.
    #[serde(rename = "join-room")]
    JoinRoom {
        #[serde(rename = "serverId")]
        server_id: ServerId,
        sid: String,
        room: String,
        nsp: String,
        timestamp: i64,
    },

    /// A socket left a room.
    #[serde(rename = "leave-room")]
    LeaveRoom {
        #[serde(rename = "serverId")]
        server_id: ServerId,
        sid: String,
        room: String,
        nsp: String,
        timestamp: i64,
    },

    /// A socket disconnected and left all rooms.
    #[serde(rename = "disconnect")]
    Disconnect {
        #[serde(rename = "serverId")]
        server_id: ServerId,
        sid: String,
        timestamp: i64,
    },
}

/// Outcome of decoding an inbound message body.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A well-formed envelope of a known kind.
    Event(Envelope),
    /// Well-formed JSON with an unrecognized `type` tag.
    Unknown(String),
}

impl Envelope {
    /// Build a broadcast envelope from in-process options.
    pub fn broadcast(server_id: ServerId, data: serde_json::Value, opts: &BroadcastOptions) -> Self {
        Self::Broadcast {
            server_id,
            data,
            opts: opts.to_wire(),
            timestamp: now_millis(),
        }
    }

    /// Build a join-room envelope.
    pub fn join_room(server_id: ServerId, sid: &str, room: &str, nsp: &str) -> Self {
        Self::JoinRoom {
            server_id,
            sid: sid.to_string(),
            room: room.to_string(),
            nsp: nsp.to_string(),
            timestamp: now_millis(),
        }
    }

    /// Build a leave-room envelope.
    pub fn leave_room(server_id: ServerId, sid: &str, room: &str, nsp: &str) -> Self {
        Self::LeaveRoom {
            server_id,
            sid: sid.to_string(),
            room: room.to_string(),
            nsp: nsp.to_string(),
            timestamp: now_millis(),
        }
    }

    /// Build a disconnect envelope.
    pub fn disconnect(server_id: ServerId, sid: &str) -> Self {
        Self::Disconnect {
            server_id,
            sid: sid.to_string(),
            timestamp: now_millis(),
        }
    }

    /// The identity of the instance that published this envelope.
    pub fn origin(&self) -> &ServerId {
        match self {
            Self::Broadcast { server_id, .. }
            | Self::JoinRoom { server_id, .. }
            | Self::LeaveRoom { server_id, .. }
            | Self::Disconnect { server_id, .. } => server_id,
        }
    }

    /// Serialize to the wire body.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode an inbound message body.
    ///
    /// Decoding happens in two steps: the `type` tag is inspected first so
    /// that an unknown-but-well-formed envelope comes back as
    /// [`Decoded::Unknown`] instead of an error. Malformed JSON, a missing
    /// tag, or a known tag with bad fields is a decode error.
    pub fn decode(body: &[u8]) -> Result<Decoded, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_slice(body)?;
        let kind = value
            .get("type")
            .and_then(|t| t.as_str())
            .map(str::to_string);
        match kind.as_deref() {
            Some("broadcast") | Some("join-room") | Some("leave-room") | Some("disconnect") => {
                Ok(Decoded::Event(serde_json::from_value(value)?))
            }
            Some(other) => Ok(Decoded::Unknown(other.to_string())),
            // no usable tag: let the enum deserializer produce the error
            None => Ok(Decoded::Event(serde_json::from_value(value)?)),
        }
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn opts(rooms: &[&str], except: &[&str]) -> BroadcastOptions {
        BroadcastOptions {
            rooms: rooms.iter().map(|s| s.to_string()).collect(),
            except: except.iter().map(|s| s.to_string()).collect(),
            remote: false,
        }
    }

    #[test]
    fn broadcast_serializes_with_wire_field_names() {
        let envelope = Envelope::broadcast(
            ServerId::new("A"),
            json!("hi"),
            &opts(&["lobby"], &[]),
        );

        let body = serde_json::to_string(&envelope).unwrap();
        assert!(body.contains(r#""type":"broadcast""#));
        assert!(body.contains(r#""serverId":"A""#));
        assert!(body.contains(r#""data":"hi""#));
        assert!(body.contains(r#""rooms":["lobby"]"#));
        assert!(body.contains(r#""except":[]"#));
        assert!(body.contains(r#""timestamp""#));
    }

    #[test]
    fn join_room_serializes_with_dashed_tag() {
        let envelope = Envelope::join_room(ServerId::new("A"), "s1", "r1", "/chat");
        let body = serde_json::to_string(&envelope).unwrap();
        assert!(body.contains(r#""type":"join-room""#));
        assert!(body.contains(r#""sid":"s1""#));
        assert!(body.contains(r#""room":"r1""#));
        assert!(body.contains(r#""nsp":"/chat""#));
    }

    #[test]
    fn decodes_broadcast_from_peer() {
        let body = br#"{
            "type": "broadcast",
            "serverId": "A",
            "data": "hi",
            "opts": {"rooms": ["lobby"], "except": []},
            "timestamp": 1700000000000
        }"#;

        let decoded = Envelope::decode(body).unwrap();
        match decoded {
            Decoded::Event(Envelope::Broadcast {
                server_id,
                data,
                opts,
                ..
            }) => {
                assert_eq!(server_id.as_str(), "A");
                assert_eq!(data, json!("hi"));
                assert_eq!(opts.rooms, vec!["lobby".to_string()]);
                assert!(opts.except.is_empty());
            }
            other => panic!("unexpected decode outcome: {:?}", other),
        }
    }

    #[test]
    fn decodes_disconnect() {
        let body = br#"{"type":"disconnect","serverId":"B","sid":"s9","timestamp":1}"#;
        let decoded = Envelope::decode(body).unwrap();
        assert!(matches!(
            decoded,
            Decoded::Event(Envelope::Disconnect { .. })
        ));
    }

    #[test]
    fn unknown_type_is_not_an_error() {
        let body = br#"{"type":"presence-sync","serverId":"A","timestamp":1}"#;
        let decoded = Envelope::decode(body).unwrap();
        assert_eq!(decoded, Decoded::Unknown("presence-sync".to_string()));
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        assert!(Envelope::decode(b"{not json").is_err());
    }

    #[test]
    fn missing_type_tag_is_a_decode_error() {
        assert!(Envelope::decode(br#"{"serverId":"A"}"#).is_err());
    }

    #[test]
    fn known_tag_with_missing_fields_is_a_decode_error() {
        assert!(Envelope::decode(br#"{"type":"join-room","serverId":"A"}"#).is_err());
    }

    #[test]
    fn origin_is_uniform_across_variants() {
        let id = ServerId::new("web-1");
        assert_eq!(
            Envelope::disconnect(id.clone(), "s1").origin(),
            &id
        );
        assert_eq!(
            Envelope::join_room(id.clone(), "s1", "r1", "/").origin(),
            &id
        );
    }

    #[test]
    fn wire_options_round_trip_to_sets() {
        let original = opts(&["a", "b"], &["s3"]);
        let rebuilt = BroadcastOptions::from_wire(original.to_wire());

        assert_eq!(rebuilt.rooms, original.rooms);
        assert_eq!(rebuilt.except, original.except);
        assert!(rebuilt.remote);
    }

    proptest! {
        /// Set -> list -> set conversion preserves membership regardless
        /// of how the wire happens to order the lists.
        #[test]
        fn options_survive_wire_transport(
            rooms in proptest::collection::btree_set("[a-z]{1,6}", 0..5),
            except in proptest::collection::btree_set("[a-z0-9]{1,8}", 0..5),
        ) {
            let original = BroadcastOptions { rooms, except, remote: false };
            let mut wire = original.to_wire();
            wire.rooms.reverse();
            wire.except.reverse();
            let rebuilt = BroadcastOptions::from_wire(wire);
            prop_assert_eq!(&rebuilt.rooms, &original.rooms);
            prop_assert_eq!(&rebuilt.except, &original.except);
        }
    }
}
