//! Language-neutral values decoded from expression nodes.

/// A decoded literal argument. Value semantics only; two values are the same
/// value when they compare equal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Num(f64),
    Str(String),
    Bool(bool),
    Null,
    Tuple(Vec<Value>),
    /// An expression shape outside the known literal grammar. Carries the
    /// node kind name so diagnostics can say what was skipped; not an error,
    /// because arguments of unconsumed opcodes may have arbitrary shapes.
    Unrecognized(&'static str),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short human-readable name of the value's kind, for error messages.
    pub fn kind_str(&self) -> &'static str {
        match self {
            Value::Num(_) => "number",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Null => "null",
            Value::Tuple(_) => "tuple",
            Value::Unrecognized(_) => "unrecognized",
        }
    }
}
