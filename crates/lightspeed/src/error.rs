use thiserror::Error;

/// Fatal conditions while replaying a sync log. There is no partial
/// snapshot: any of these aborts the whole interpretation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SyncError {
    #[error("sync call has no opcode argument")]
    MissingOpcode,

    #[error("sync call opcode is not a string (found {0})")]
    OpcodeNotString(&'static str),

    #[error("malformed {opcode} arguments: {reason}")]
    MalformedArgs { opcode: &'static str, reason: String },

    #[error("participant added to unknown thread {thread_id}")]
    DanglingThread { thread_id: u64 },

    #[error("no user is flagged as the viewer")]
    NoViewer,

    #[error("{0} users are flagged as the viewer")]
    MultipleViewers(usize),

    #[error("flagged viewer {viewer} is not a participant of every conversation")]
    ViewerMismatch { viewer: u64 },
}
