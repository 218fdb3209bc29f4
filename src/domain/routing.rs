//! Routing-key grammar shared by all cluster members.
//!
//! Keys are dot-separated strings matched by the broker's topic rules:
//!
//! - `room.<r1>.<r2>...` - broadcast scoped to specific rooms
//! - `broadcast.all` - cluster-wide broadcast (no room filter)
//! - `room.<room>.join` / `room.<room>.leave` - membership notices
//! - `broadcast.disconnect` - socket left all rooms
//!
//! Every instance binds its private queue to patterns covering all four
//! shapes, so every instance observes every cluster event regardless of
//! room name.

use std::collections::BTreeSet;

/// Routing key for a disconnect notice.
pub const DISCONNECT_KEY: &str = "broadcast.disconnect";

/// Binding patterns every instance registers on its private queue.
///
/// `broadcast.#` and `room.#` are already supersets of everything
/// published; the explicit disconnect pattern is kept for parity with the
/// wire contract other implementations bind.
pub const BINDING_PATTERNS: [&str; 3] = ["broadcast.#", "room.#", DISCONNECT_KEY];

/// Routing key for a broadcast into the given room set.
///
/// An empty set means a cluster-wide broadcast and maps to
/// `broadcast.all`; otherwise the key is `room.` followed by the
/// dot-joined members in their set order.
pub fn broadcast_key(rooms: &BTreeSet<String>) -> String {
    if rooms.is_empty() {
        "broadcast.all".to_string()
    } else {
        let joined: Vec<&str> = rooms.iter().map(String::as_str).collect();
        format!("room.{}", joined.join("."))
    }
}

/// Routing key for a join notice on one room.
pub fn join_key(room: &str) -> String {
    format!("room.{}.join", room)
}

/// Routing key for a leave notice on one room.
pub fn leave_key(room: &str) -> String {
    format!("room.{}.leave", room)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rooms(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_room_set_is_cluster_wide() {
        assert_eq!(broadcast_key(&BTreeSet::new()), "broadcast.all");
    }

    #[test]
    fn single_room_key() {
        assert_eq!(broadcast_key(&rooms(&["lobby"])), "room.lobby");
    }

    #[test]
    fn multiple_rooms_join_in_set_order() {
        assert_eq!(broadcast_key(&rooms(&["b", "a", "c"])), "room.a.b.c");
    }

    #[test]
    fn join_and_leave_keys() {
        assert_eq!(join_key("lobby"), "room.lobby.join");
        assert_eq!(leave_key("lobby"), "room.lobby.leave");
    }

    #[test]
    fn binding_patterns_cover_all_key_shapes() {
        assert!(BINDING_PATTERNS.contains(&"broadcast.#"));
        assert!(BINDING_PATTERNS.contains(&"room.#"));
        assert!(BINDING_PATTERNS.contains(&DISCONNECT_KEY));
    }

    proptest! {
        /// Non-empty room sets always produce `room.`-prefixed keys with
        /// exactly one segment per room.
        #[test]
        fn broadcast_key_segments_match_rooms(
            names in proptest::collection::btree_set("[a-z][a-z0-9_-]{0,8}", 1..6)
        ) {
            let key = broadcast_key(&names);
            prop_assert!(key.starts_with("room."));
            let segments: Vec<&str> = key["room.".len()..].split('.').collect();
            prop_assert_eq!(segments.len(), names.len());
            for name in &names {
                prop_assert!(segments.contains(&name.as_str()));
            }
        }
    }
}
