//! The call matcher: recognizes `LS.sp(...)` dispatcher calls.

use msgr_script::Node;

use crate::decode::decode;
use crate::value::Value;

/// Receiver identifier of the sync dispatcher object.
pub const DISPATCHER: &str = "LS";
/// Its generic dispatch method.
pub const DISPATCH_METHOD: &str = "sp";

/// If `node` is exactly a `LS.sp(...)` call, decodes and returns its
/// arguments in order. Anything else is "no match"; most nodes are not
/// dispatcher calls.
pub fn match_call(node: &Node) -> Option<Vec<Value>> {
    let Node::Call { callee, args } = node else {
        return None;
    };
    let Node::Member { object, property, computed: false } = &**callee else {
        return None;
    };
    let (Node::Ident(receiver), Node::Ident(method)) = (&**object, &**property) else {
        return None;
    };
    if receiver != DISPATCHER || method != DISPATCH_METHOD {
        return None;
    }
    Some(args.iter().map(decode).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use msgr_script::parse_expression;

    fn m(src: &str) -> Option<Vec<Value>> {
        match_call(&parse_expression(src).unwrap())
    }

    #[test]
    fn matches_dispatcher_call() {
        assert_eq!(
            m("LS.sp(\"op\", 1, [0, 2])"),
            Some(vec![
                Value::Str("op".into()),
                Value::Num(1.0),
                Value::Tuple(vec![Value::Num(0.0), Value::Num(2.0)]),
            ])
        );
        assert_eq!(m("LS.sp()"), Some(vec![]));
    }

    #[test]
    fn rejects_other_shapes() {
        assert_eq!(m("LS.other(1)"), None);
        assert_eq!(m("XS.sp(1)"), None);
        assert_eq!(m("sp(1)"), None);
        assert_eq!(m("LS[\"sp\"](1)"), None);
        assert_eq!(m("a.LS.sp(1)"), None);
    }
}
