//! The log extractor: collects every dispatcher call in a parsed tree,
//! grouped by opcode.

use std::collections::HashMap;

use msgr_script::{walk, Node};

use crate::call::match_call;
use crate::error::SyncError;
use crate::value::Value;

/// Dispatcher calls grouped by opcode. Within a group the argument lists
/// keep the source order of the calls, which is semantically significant:
/// later thread inserts supersede earlier ones, and participant adds must
/// replay after their thread's insert.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SyncLog {
    calls: HashMap<String, Vec<Vec<Value>>>,
}

impl SyncLog {
    /// The argument lists recorded for `opcode`, in source order.
    pub fn group(&self, opcode: &str) -> &[Vec<Value>] {
        self.calls.get(opcode).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Opcode names present in the log, sorted. Diagnostic only.
    pub fn opcode_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.calls.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Total number of calls across all groups.
    pub fn len(&self) -> usize {
        self.calls.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// How many decoded arguments (recursively) fell outside the known
    /// literal grammar. Diagnostic only; unrecognized values are not errors.
    pub fn unrecognized_count(&self) -> usize {
        fn count(v: &Value) -> usize {
            match v {
                Value::Unrecognized(_) => 1,
                Value::Tuple(items) => items.iter().map(count).sum(),
                _ => 0,
            }
        }
        self.calls
            .values()
            .flatten()
            .flatten()
            .map(count)
            .sum()
    }
}

/// Walks the whole tree (every child position, depth-first, source order)
/// and collects each matched dispatcher call under its opcode. The first
/// argument names the opcode and must decode to a string.
pub fn extract(tree: &Node) -> Result<SyncLog, SyncError> {
    let mut log = SyncLog::default();
    let mut first_err: Option<SyncError> = None;
    walk(tree, &mut |node| {
        if first_err.is_some() {
            return;
        }
        let Some(args) = match_call(node) else {
            return;
        };
        let mut args = args.into_iter();
        match args.next() {
            Some(Value::Str(opcode)) => {
                log.calls.entry(opcode).or_default().push(args.collect());
            }
            Some(other) => first_err = Some(SyncError::OpcodeNotString(other.kind_str())),
            None => first_err = Some(SyncError::MissingOpcode),
        }
    });
    match first_err {
        Some(err) => Err(err),
        None => Ok(log),
    }
}
