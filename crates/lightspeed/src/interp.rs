//! The sync-log interpreter: replays grouped dispatcher calls into users and
//! conversations.
//!
//! Groups replay in a fixed order (thread upserts, then participant adds,
//! then contact rows) because a participant add requires its thread record
//! to exist. Within a group, calls replay in source order.

use std::collections::BTreeSet;

use crate::error::SyncError;
use crate::extract::SyncLog;
use crate::snapshot::{Conversation, Id, InboxSnapshot, User};
use crate::value::Value;

/// Creates or fully replaces a conversation (participants reset to empty).
pub const OP_THREAD_UPSERT: &str = "deleteThenInsertThread";
/// Adds one participant id to an existing conversation.
pub const OP_ADD_PARTICIPANT: &str = "addParticipantIdToGroupThread";
/// Inserts or overwrites a user record.
pub const OP_VERIFY_CONTACT: &str = "verifyContactRowExists";

/// Replays the log into a raw (pre-resolution) inbox model. Opcodes the
/// model does not consume are ignored.
pub fn interpret(log: &SyncLog) -> Result<InboxSnapshot, SyncError> {
    let mut model = InboxSnapshot::default();
    for args in log.group(OP_THREAD_UPSERT) {
        apply_thread_upsert(args, &mut model)?;
    }
    for args in log.group(OP_ADD_PARTICIPANT) {
        apply_add_participant(args, &mut model)?;
    }
    for args in log.group(OP_VERIFY_CONTACT) {
        apply_verify_contact(args, &mut model)?;
    }
    Ok(model)
}

/// Folds a two-element tuple of non-negative integral halves (each below
/// 2^32) into a canonical [`Id`]. Any other shape is "not an id", so a
/// payload keyed any other way fails loudly as a malformed argument instead
/// of mis-keying.
pub fn id_pair(value: &Value) -> Option<Id> {
    let parts = value.as_tuple()?;
    let [hi, lo] = parts else { return None };
    Some((half(hi)? << 32) | half(lo)?)
}

fn half(v: &Value) -> Option<u64> {
    let n = v.as_num()?;
    if n.fract() != 0.0 || !(0.0..4294967296.0).contains(&n) {
        return None;
    }
    Some(n as u64)
}

fn malformed(opcode: &'static str, reason: String) -> SyncError {
    SyncError::MalformedArgs { opcode, reason }
}

/// `deleteThenInsertThread(lastSentTs, lastReadTs, lastMessage, groupName,
/// ...rest)`. `rest` carries exactly two id pairs: the thread id, then the
/// last-message author.
fn apply_thread_upsert(args: &[Value], model: &mut InboxSnapshot) -> Result<(), SyncError> {
    let [last_sent_ts, last_read_ts, last_message, group_name, rest @ ..] = args else {
        return Err(malformed(
            OP_THREAD_UPSERT,
            format!("expected at least 4 arguments, got {}", args.len()),
        ));
    };
    let ids: Vec<Id> = rest.iter().filter_map(id_pair).collect();
    let [thread_id, author] = ids[..] else {
        return Err(malformed(
            OP_THREAD_UPSERT,
            format!(
                "expected exactly 2 id pairs in trailing arguments, found {}",
                ids.len()
            ),
        ));
    };
    let last_message = opt_str(last_message).ok_or_else(|| {
        malformed(
            OP_THREAD_UPSERT,
            format!("last message must be a string or null, found {}", last_message.kind_str()),
        )
    })?;
    let group_name = opt_str(group_name).ok_or_else(|| {
        malformed(
            OP_THREAD_UPSERT,
            format!("group name must be a string or null, found {}", group_name.kind_str()),
        )
    })?;
    model.conversations.insert(
        thread_id,
        Conversation {
            unread: last_sent_ts != last_read_ts,
            last_message,
            last_message_author: author,
            group_name,
            participants: BTreeSet::new(),
        },
    );
    Ok(())
}

/// `addParticipantIdToGroupThread(threadId, userId, ...)`. The thread must
/// already have a record.
fn apply_add_participant(args: &[Value], model: &mut InboxSnapshot) -> Result<(), SyncError> {
    let [thread, user, ..] = args else {
        return Err(malformed(
            OP_ADD_PARTICIPANT,
            format!("expected at least 2 arguments, got {}", args.len()),
        ));
    };
    let thread_id = id_pair(thread).ok_or_else(|| {
        malformed(
            OP_ADD_PARTICIPANT,
            format!("thread id must be an id pair, found {}", thread.kind_str()),
        )
    })?;
    let user_id = id_pair(user).ok_or_else(|| {
        malformed(
            OP_ADD_PARTICIPANT,
            format!("user id must be an id pair, found {}", user.kind_str()),
        )
    })?;
    let convo = model
        .conversations
        .get_mut(&thread_id)
        .ok_or(SyncError::DanglingThread { thread_id })?;
    convo.participants.insert(user_id);
    Ok(())
}

/// `verifyContactRowExists(userId, _, _, name, ...rest)`. `rest` carries
/// exactly one boolean: the viewer flag.
fn apply_verify_contact(args: &[Value], model: &mut InboxSnapshot) -> Result<(), SyncError> {
    let [user, _, _, name, rest @ ..] = args else {
        return Err(malformed(
            OP_VERIFY_CONTACT,
            format!("expected at least 4 arguments, got {}", args.len()),
        ));
    };
    let user_id = id_pair(user).ok_or_else(|| {
        malformed(
            OP_VERIFY_CONTACT,
            format!("user id must be an id pair, found {}", user.kind_str()),
        )
    })?;
    let name = name
        .as_str()
        .ok_or_else(|| {
            malformed(
                OP_VERIFY_CONTACT,
                format!("contact name must be a string, found {}", name.kind_str()),
            )
        })?
        .to_string();
    let flags: Vec<bool> = rest.iter().filter_map(Value::as_bool).collect();
    let [is_self] = flags[..] else {
        return Err(malformed(
            OP_VERIFY_CONTACT,
            format!("expected exactly 1 boolean in trailing arguments, found {}", flags.len()),
        ));
    };
    model.users.insert(user_id, User { name, is_self });
    Ok(())
}

fn opt_str(v: &Value) -> Option<Option<String>> {
    match v {
        Value::Str(s) => Some(Some(s.clone())),
        Value::Null => Some(None),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_pair_folds_halves() {
        let pair = Value::Tuple(vec![Value::Num(2.0), Value::Num(3.0)]);
        assert_eq!(id_pair(&pair), Some(2 * 4294967296 + 3));
        let zero_hi = Value::Tuple(vec![Value::Num(0.0), Value::Num(5.0)]);
        assert_eq!(id_pair(&zero_hi), Some(5));
    }

    #[test]
    fn id_pair_rejects_foreign_shapes() {
        assert_eq!(id_pair(&Value::Num(5.0)), None);
        assert_eq!(id_pair(&Value::Tuple(vec![Value::Num(1.0)])), None);
        assert_eq!(
            id_pair(&Value::Tuple(vec![Value::Num(1.0), Value::Num(2.0), Value::Num(3.0)])),
            None
        );
        assert_eq!(
            id_pair(&Value::Tuple(vec![Value::Num(-1.0), Value::Num(2.0)])),
            None
        );
        assert_eq!(
            id_pair(&Value::Tuple(vec![Value::Num(1.5), Value::Num(2.0)])),
            None
        );
        assert_eq!(
            id_pair(&Value::Tuple(vec![Value::Num(4294967296.0), Value::Num(0.0)])),
            None
        );
        assert_eq!(
            id_pair(&Value::Tuple(vec![Value::Str("1".into()), Value::Num(2.0)])),
            None
        );
    }
}
