//! Interpreter for the inbox sync log embedded in chat page scripts.
//!
//! The scripts register their payload through repeated calls to a generic
//! dispatcher, `LS.sp(opcode, ...args)`. This crate finds those calls in a
//! parsed tree, decodes their literal arguments, replays the ones that carry
//! inbox state and resolves the viewer's identity, producing an
//! [`InboxSnapshot`].
//!
//! ```
//! use msgr_lightspeed::inbox_from_script;
//! use msgr_script::parse_script;
//!
//! let tree = parse_script(
//!     r#"
//!     LS.sp("deleteThenInsertThread", 10, 10, "hey", null, [0, 100], [0, 2]);
//!     LS.sp("addParticipantIdToGroupThread", [0, 100], [0, 1]);
//!     LS.sp("addParticipantIdToGroupThread", [0, 100], [0, 2]);
//!     LS.sp("verifyContactRowExists", [0, 1], U, U, "Me", 0, true);
//!     LS.sp("verifyContactRowExists", [0, 2], U, U, "Ada", 0, false);
//!     "#,
//! )
//! .unwrap();
//! let snapshot = inbox_from_script(&tree).unwrap();
//! assert_eq!(snapshot.users[&1].name, "Me");
//! assert!(!snapshot.conversations[&100].unread);
//! assert_eq!(snapshot.conversations[&100].participants.len(), 1);
//! ```

pub mod call;
pub mod decode;
pub mod error;
pub mod extract;
pub mod interp;
pub mod resolve;
pub mod snapshot;
pub mod value;

pub use self::call::match_call;
pub use self::decode::decode;
pub use self::error::SyncError;
pub use self::extract::{extract, SyncLog};
pub use self::interp::{id_pair, interpret};
pub use self::resolve::resolve;
pub use self::snapshot::{Conversation, Id, InboxSnapshot, User};
pub use self::value::Value;

use msgr_script::Node;

/// Full pipeline for one parsed script: extract the sync log, replay it,
/// resolve the viewer. The viewer is excluded from every participant set in
/// the returned snapshot.
pub fn inbox_from_script(tree: &Node) -> Result<InboxSnapshot, SyncError> {
    let log = extract(tree)?;
    let mut model = interpret(&log)?;
    resolve(&mut model)?;
    Ok(model)
}
