//! End-to-end interpretation of scripted sync payloads.

use msgr_lightspeed::{extract, inbox_from_script, interpret, resolve, SyncError};
use msgr_script::parse_script;

fn inbox(src: &str) -> Result<msgr_lightspeed::InboxSnapshot, SyncError> {
    inbox_from_script(&parse_script(src).unwrap())
}

fn raw(src: &str) -> Result<msgr_lightspeed::InboxSnapshot, SyncError> {
    interpret(&extract(&parse_script(src).unwrap()).unwrap())
}

#[test]
fn one_conversation_end_to_end() {
    let src = r#"
        LS.sp("deleteThenInsertThread", 100, 100, "hi", null, 0, U, [0, 5], [0, 9]);
        LS.sp("addParticipantIdToGroupThread", [0, 5], [0, 7]);
        LS.sp("verifyContactRowExists", [0, 9], U, U, "Alice", 0, 0, U, false);
        LS.sp("verifyContactRowExists", [0, 7], U, U, "Bob", 0, 0, U, true);
        LS.sp("someOtherOpcode", {a: 1}, f(2));
        "#;

    // Before resolution the single participant is user 7.
    let model = raw(src).unwrap();
    let convo = &model.conversations[&5];
    assert!(!convo.unread);
    assert_eq!(convo.last_message.as_deref(), Some("hi"));
    assert_eq!(convo.last_message_author, 9);
    assert_eq!(convo.group_name, None);
    assert_eq!(convo.participants.iter().copied().collect::<Vec<_>>(), vec![7]);

    // User 7 carries the viewer flag, so resolution strips them out.
    let snapshot = inbox(src).unwrap();
    assert_eq!(snapshot.users.len(), 2);
    assert_eq!(snapshot.users[&9].name, "Alice");
    assert!(!snapshot.users[&9].is_self);
    assert_eq!(snapshot.users[&7].name, "Bob");
    assert!(snapshot.users[&7].is_self);
    assert!(snapshot.conversations[&5].participants.is_empty());
}

#[test]
fn viewer_is_excluded_from_participant_sets() {
    let snapshot = inbox(
        r#"
        LS.sp("deleteThenInsertThread", 5, 5, "ok", "The group", [0, 50], [0, 2]);
        LS.sp("addParticipantIdToGroupThread", [0, 50], [0, 1]);
        LS.sp("addParticipantIdToGroupThread", [0, 50], [0, 2]);
        LS.sp("addParticipantIdToGroupThread", [0, 50], [0, 3]);
        LS.sp("verifyContactRowExists", [0, 1], U, U, "Me", 0, true);
        LS.sp("verifyContactRowExists", [0, 2], U, U, "B", 0, false);
        LS.sp("verifyContactRowExists", [0, 3], U, U, "C", 0, false);
        "#,
    )
    .unwrap();
    let convo = &snapshot.conversations[&50];
    assert_eq!(convo.group_name.as_deref(), Some("The group"));
    assert_eq!(convo.participants.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
}

#[test]
fn reinsert_resets_participants() {
    // A later insert for the same thread replaces the record wholesale, so
    // participants registered before it are gone.
    let snapshot = raw(
        r#"
        LS.sp("deleteThenInsertThread", 1, 0, "old", null, [0, 50], [0, 2]);
        LS.sp("deleteThenInsertThread", 3, 3, "new", null, [0, 50], [0, 3]);
        LS.sp("addParticipantIdToGroupThread", [0, 50], [0, 7]);
        "#,
    )
    .unwrap();
    assert_eq!(snapshot.conversations.len(), 1);
    let convo = &snapshot.conversations[&50];
    assert!(!convo.unread);
    assert_eq!(convo.last_message.as_deref(), Some("new"));
    assert_eq!(convo.last_message_author, 3);
    assert_eq!(convo.participants.iter().copied().collect::<Vec<_>>(), vec![7]);
}

#[test]
fn participant_add_without_thread_is_dangling() {
    let err = raw(r#"LS.sp("addParticipantIdToGroupThread", [0, 99], [0, 1]);"#).unwrap_err();
    assert_eq!(err, SyncError::DanglingThread { thread_id: 99 });
}

#[test]
fn unread_follows_timestamp_disagreement() {
    let snapshot = raw(
        r#"
        LS.sp("deleteThenInsertThread", "170", "170", "a", null, [0, 1], [0, 9]);
        LS.sp("deleteThenInsertThread", "171", "170", "b", null, [0, 2], [0, 9]);
        LS.sp("deleteThenInsertThread", U, U, null, null, [0, 3], [0, 9]);
        "#,
    )
    .unwrap();
    assert!(!snapshot.conversations[&1].unread);
    assert!(snapshot.conversations[&2].unread);
    // Both timestamps absent still counts as read.
    assert!(!snapshot.conversations[&3].unread);
    assert_eq!(snapshot.conversations[&3].last_message, None);
}

#[test]
fn malformed_thread_arguments_are_fatal() {
    // Three id pairs in the trailing arguments: ambiguous.
    let err = raw(
        r#"LS.sp("deleteThenInsertThread", 1, 1, "m", null, [0, 1], [0, 2], [0, 3]);"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SyncError::MalformedArgs { opcode: "deleteThenInsertThread", .. }
    ));

    // Last message of a foreign shape.
    let err = raw(r#"LS.sp("deleteThenInsertThread", 1, 1, 42, null, [0, 1], [0, 2]);"#)
        .unwrap_err();
    assert!(matches!(
        err,
        SyncError::MalformedArgs { opcode: "deleteThenInsertThread", .. }
    ));
}

#[test]
fn contact_row_needs_exactly_one_flag() {
    let err = raw(r#"LS.sp("verifyContactRowExists", [0, 1], U, U, "A", true, false);"#)
        .unwrap_err();
    assert!(matches!(
        err,
        SyncError::MalformedArgs { opcode: "verifyContactRowExists", .. }
    ));
    let err = raw(r#"LS.sp("verifyContactRowExists", [0, 1], U, U, "A", 0, 1);"#).unwrap_err();
    assert!(matches!(
        err,
        SyncError::MalformedArgs { opcode: "verifyContactRowExists", .. }
    ));
}

#[test]
fn later_contact_row_overwrites_earlier() {
    let snapshot = raw(
        r#"
        LS.sp("verifyContactRowExists", [0, 1], U, U, "Old name", 0, false);
        LS.sp("verifyContactRowExists", [0, 1], U, U, "New name", 0, true);
        "#,
    )
    .unwrap();
    assert_eq!(snapshot.users.len(), 1);
    assert_eq!(snapshot.users[&1].name, "New name");
    assert!(snapshot.users[&1].is_self);
}

#[test]
fn viewer_flag_errors_surface() {
    let err = inbox(r#"LS.sp("verifyContactRowExists", [0, 1], U, U, "A", 0, false);"#)
        .unwrap_err();
    assert_eq!(err, SyncError::NoViewer);

    let err = inbox(
        r#"
        LS.sp("verifyContactRowExists", [0, 1], U, U, "A", 0, true);
        LS.sp("verifyContactRowExists", [0, 2], U, U, "B", 0, true);
        "#,
    )
    .unwrap_err();
    assert_eq!(err, SyncError::MultipleViewers(2));
}

#[test]
fn flagged_viewer_must_belong_to_every_conversation() {
    let err = inbox(
        r#"
        LS.sp("deleteThenInsertThread", 1, 1, "m", null, [0, 10], [0, 2]);
        LS.sp("addParticipantIdToGroupThread", [0, 10], [0, 2]);
        LS.sp("verifyContactRowExists", [0, 1], U, U, "Me", 0, true);
        LS.sp("verifyContactRowExists", [0, 2], U, U, "B", 0, false);
        "#,
    )
    .unwrap_err();
    assert_eq!(err, SyncError::ViewerMismatch { viewer: 1 });
}

#[test]
fn replay_crosses_script_structure() {
    // Real payloads wrap the dispatcher calls in module boilerplate; the
    // extractor must see through it.
    let snapshot = inbox(
        r#"
        __d("LSPayload", [], function(global, require, module) {
            "use strict";
            var run = function(ctx) {
                ctx.batch([
                    LS.sp("deleteThenInsertThread", 2, 1, "hi", null, [0, 4], [0, 8]),
                    LS.sp("addParticipantIdToGroupThread", [0, 4], [0, 8]),
                    LS.sp("addParticipantIdToGroupThread", [0, 4], [0, 9])
                ]);
                if (ctx.ok) {
                    LS.sp("verifyContactRowExists", [0, 8], U, U, "Ada", 0, false);
                    LS.sp("verifyContactRowExists", [0, 9], U, U, "Me", 0, true);
                }
            };
            module.exports = run;
        });
        "#,
    )
    .unwrap();
    let convo = &snapshot.conversations[&4];
    assert!(convo.unread);
    assert_eq!(convo.participants.iter().copied().collect::<Vec<_>>(), vec![8]);
}
