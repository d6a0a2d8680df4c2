//! The literal decoder: expression node → [`Value`].

use msgr_script::{Lit, Node};

use crate::value::Value;

/// The identifier the sync log uses for "undefined".
const UNDEFINED_SENTINEL: &str = "U";

/// Decodes one expression node into a [`Value`]. Total: shapes outside the
/// known literal grammar come back as [`Value::Unrecognized`] rather than an
/// error.
pub fn decode(node: &Node) -> Value {
    match node {
        Node::Literal(Lit::Num(n)) => Value::Num(*n),
        Node::Literal(Lit::Str(s)) => Value::Str(s.clone()),
        Node::Literal(Lit::Bool(b)) => Value::Bool(*b),
        Node::Literal(Lit::Null) => Value::Null,
        Node::Array(elts) => Value::Tuple(elts.iter().map(decode).collect()),
        Node::Ident(name) if name == UNDEFINED_SENTINEL => Value::Null,
        Node::Unary { op: "-", arg } => match decode(arg) {
            Value::Num(n) => Value::Num(-n),
            _ => Value::Unrecognized(node.kind_name()),
        },
        other => Value::Unrecognized(other.kind_name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgr_script::parse_expression;

    fn dec(src: &str) -> Value {
        decode(&parse_expression(src).unwrap())
    }

    #[test]
    fn scalars() {
        assert_eq!(dec("5"), Value::Num(5.0));
        assert_eq!(dec("\"hi\""), Value::Str("hi".into()));
        assert_eq!(dec("true"), Value::Bool(true));
        assert_eq!(dec("null"), Value::Null);
    }

    #[test]
    fn negative_literals() {
        assert_eq!(dec("-5"), Value::Num(-5.0));
        assert_eq!(dec("-0"), Value::Num(0.0));
        assert_eq!(dec("- -5"), Value::Num(5.0));
    }

    #[test]
    fn negation_of_non_number_is_unrecognized() {
        assert_eq!(dec("-\"x\""), Value::Unrecognized("UnaryExpression"));
        assert_eq!(dec("-a"), Value::Unrecognized("UnaryExpression"));
    }

    #[test]
    fn undefined_sentinel() {
        assert_eq!(dec("U"), Value::Null);
        assert_eq!(
            dec("[U, [U]]"),
            Value::Tuple(vec![Value::Null, Value::Tuple(vec![Value::Null])])
        );
        // Only the exact sentinel name maps to null.
        assert_eq!(dec("Ux"), Value::Unrecognized("Identifier"));
    }

    #[test]
    fn tuples_preserve_order() {
        assert_eq!(
            dec("[0, 5, \"a\"]"),
            Value::Tuple(vec![Value::Num(0.0), Value::Num(5.0), Value::Str("a".into())])
        );
    }

    #[test]
    fn foreign_shapes_are_markers_not_errors() {
        assert_eq!(dec("f(1)"), Value::Unrecognized("CallExpression"));
        assert_eq!(dec("a.b"), Value::Unrecognized("MemberExpression"));
        assert_eq!(dec("{a: 1}"), Value::Unrecognized("ObjectExpression"));
        assert_eq!(
            dec("[1, f(2)]"),
            Value::Tuple(vec![Value::Num(1.0), Value::Unrecognized("CallExpression")])
        );
    }
}
