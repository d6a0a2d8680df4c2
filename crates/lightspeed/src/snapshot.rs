//! The inbox model produced by replaying a sync log.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Canonical 64-bit id: two non-negative 32-bit halves `[hi, lo]` folded as
/// `hi * 2^32 + lo`. Serialized as a decimal string wherever it becomes a
/// JSON object key.
pub type Id = u64;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub name: String,
    pub is_self: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversation {
    pub unread: bool,
    pub last_message: Option<String>,
    pub last_message_author: Id,
    pub group_name: Option<String>,
    pub participants: BTreeSet<Id>,
}

/// Users and conversations keyed by id. Returned by the interpreter in its
/// raw form and by the identity resolver in its final form (viewer excluded
/// from every participant set).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InboxSnapshot {
    pub users: BTreeMap<Id, User>,
    pub conversations: BTreeMap<Id, Conversation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_decimal_string_keys() {
        let mut snapshot = InboxSnapshot::default();
        snapshot.users.insert(
            (7 << 32) + 1,
            User { name: "Ada".into(), is_self: false },
        );
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["users"].get("30064771073").is_some());
    }
}
