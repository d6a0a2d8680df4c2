//! The identity resolver: finds the viewer and strips them out of every
//! participant set.

use crate::error::SyncError;
use crate::snapshot::{Id, InboxSnapshot};

/// Resolves the viewer and removes them from every conversation's
/// participant set. Returns the viewer's id.
///
/// Two signals must agree. The flag signal: exactly one user row carries the
/// viewer flag. The structural signal: the viewer appears in every
/// conversation's participant set, since the account only sees conversations
/// it belongs to. With no conversations the structural signal is vacuous and
/// the flag alone decides. Removal is idempotent.
pub fn resolve(model: &mut InboxSnapshot) -> Result<Id, SyncError> {
    let flagged: Vec<Id> = model
        .users
        .iter()
        .filter(|(_, user)| user.is_self)
        .map(|(id, _)| *id)
        .collect();
    let viewer = match flagged[..] {
        [id] => id,
        [] => return Err(SyncError::NoViewer),
        _ => return Err(SyncError::MultipleViewers(flagged.len())),
    };
    let everywhere = model
        .conversations
        .values()
        .all(|convo| convo.participants.contains(&viewer));
    if !everywhere {
        return Err(SyncError::ViewerMismatch { viewer });
    }
    for convo in model.conversations.values_mut() {
        convo.participants.remove(&viewer);
    }
    Ok(viewer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Conversation, User};
    use std::collections::BTreeSet;

    fn user(name: &str, is_self: bool) -> User {
        User { name: name.into(), is_self }
    }

    fn convo(participants: &[Id]) -> Conversation {
        Conversation {
            unread: false,
            last_message: None,
            last_message_author: 0,
            group_name: None,
            participants: participants.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn viewer_is_removed_from_every_conversation() {
        let mut model = InboxSnapshot::default();
        model.users.insert(1, user("Me", true));
        model.users.insert(2, user("Ada", false));
        model.conversations.insert(10, convo(&[1, 2]));
        model.conversations.insert(11, convo(&[1]));
        assert_eq!(resolve(&mut model), Ok(1));
        let sets: Vec<Vec<Id>> = model
            .conversations
            .values()
            .map(|c| c.participants.iter().copied().collect())
            .collect();
        assert_eq!(sets, vec![vec![2], vec![]]);
        // The viewer's user row itself stays.
        assert!(model.users.contains_key(&1));
    }

    #[test]
    fn no_conversations_falls_back_to_the_flag_alone() {
        let mut model = InboxSnapshot::default();
        model.users.insert(5, user("Me", true));
        assert_eq!(resolve(&mut model), Ok(5));
    }

    #[test]
    fn missing_or_ambiguous_flag_is_an_error() {
        let mut model = InboxSnapshot::default();
        model.users.insert(1, user("Ada", false));
        assert_eq!(resolve(&mut model), Err(SyncError::NoViewer));

        model.users.insert(2, user("Me", true));
        model.users.insert(3, user("Also me", true));
        assert_eq!(resolve(&mut model), Err(SyncError::MultipleViewers(2)));
    }

    #[test]
    fn flag_must_agree_with_membership() {
        let mut model = InboxSnapshot::default();
        model.users.insert(1, user("Me", true));
        model.users.insert(2, user("Ada", false));
        model.conversations.insert(10, convo(&[1, 2]));
        model.conversations.insert(11, convo(&[2]));
        assert_eq!(resolve(&mut model), Err(SyncError::ViewerMismatch { viewer: 1 }));
    }
}
