//! Closed AST for the script grammar.
//!
//! Statements and expressions share a single tagged `Node` type so that a
//! traversal can descend through every child position uniformly. Kind names
//! follow the usual ESTree vocabulary.

/// A literal value as written in source.
#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Num(f64),
    Str(String),
    Bool(bool),
    Null,
    Regex { pattern: String, flags: String },
}

/// One property of an object literal. Methods and accessors are represented
/// as key/value pairs whose value is a function node.
#[derive(Debug, Clone, PartialEq)]
pub enum Prop {
    KeyValue { key: PropKey, value: Node },
    Spread(Node),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    Ident(String),
    Str(String),
    Num(f64),
    Computed(Node),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// `None` for the `default:` clause.
    pub test: Option<Node>,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    // Expressions.
    Literal(Lit),
    Ident(String),
    This,
    Array(Vec<Node>),
    Object(Vec<Prop>),
    Template { quasis: Vec<String>, exprs: Vec<Node> },
    Unary { op: &'static str, arg: Box<Node> },
    Update { op: &'static str, prefix: bool, arg: Box<Node> },
    Binary { op: &'static str, left: Box<Node>, right: Box<Node> },
    Logical { op: &'static str, left: Box<Node>, right: Box<Node> },
    Assign { op: &'static str, target: Box<Node>, value: Box<Node> },
    Cond { test: Box<Node>, cons: Box<Node>, alt: Box<Node> },
    Call { callee: Box<Node>, args: Vec<Node> },
    New { callee: Box<Node>, args: Vec<Node> },
    Member { object: Box<Node>, property: Box<Node>, computed: bool },
    Seq(Vec<Node>),
    Func { name: Option<String>, params: Vec<String>, body: Vec<Node> },
    Arrow { params: Vec<String>, body: Box<Node> },
    Spread(Box<Node>),

    // Statements.
    Program(Vec<Node>),
    ExprStmt(Box<Node>),
    VarDecl { kind: &'static str, decls: Vec<(String, Option<Node>)> },
    Block(Vec<Node>),
    If { test: Box<Node>, cons: Box<Node>, alt: Option<Box<Node>> },
    For { init: Option<Box<Node>>, test: Option<Box<Node>>, update: Option<Box<Node>>, body: Box<Node> },
    ForIn { left: Box<Node>, right: Box<Node>, body: Box<Node>, of: bool },
    While { test: Box<Node>, body: Box<Node> },
    DoWhile { body: Box<Node>, test: Box<Node> },
    Return(Option<Box<Node>>),
    Break(Option<String>),
    Continue(Option<String>),
    Labeled { label: String, body: Box<Node> },
    Throw(Box<Node>),
    Try { block: Box<Node>, param: Option<String>, handler: Option<Box<Node>>, finalizer: Option<Box<Node>> },
    Switch { disc: Box<Node>, cases: Vec<SwitchCase> },
    Empty,
    Debugger,
}

impl Node {
    /// ESTree-style name of the node kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Literal(_) => "Literal",
            Node::Ident(_) => "Identifier",
            Node::This => "ThisExpression",
            Node::Array(_) => "ArrayExpression",
            Node::Object(_) => "ObjectExpression",
            Node::Template { .. } => "TemplateLiteral",
            Node::Unary { .. } => "UnaryExpression",
            Node::Update { .. } => "UpdateExpression",
            Node::Binary { .. } => "BinaryExpression",
            Node::Logical { .. } => "LogicalExpression",
            Node::Assign { .. } => "AssignmentExpression",
            Node::Cond { .. } => "ConditionalExpression",
            Node::Call { .. } => "CallExpression",
            Node::New { .. } => "NewExpression",
            Node::Member { .. } => "MemberExpression",
            Node::Seq(_) => "SequenceExpression",
            Node::Func { .. } => "FunctionExpression",
            Node::Arrow { .. } => "ArrowFunctionExpression",
            Node::Spread(_) => "SpreadElement",
            Node::Program(_) => "Program",
            Node::ExprStmt(_) => "ExpressionStatement",
            Node::VarDecl { .. } => "VariableDeclaration",
            Node::Block(_) => "BlockStatement",
            Node::If { .. } => "IfStatement",
            Node::For { .. } => "ForStatement",
            Node::ForIn { of: false, .. } => "ForInStatement",
            Node::ForIn { of: true, .. } => "ForOfStatement",
            Node::While { .. } => "WhileStatement",
            Node::DoWhile { .. } => "DoWhileStatement",
            Node::Return(_) => "ReturnStatement",
            Node::Break(_) => "BreakStatement",
            Node::Continue(_) => "ContinueStatement",
            Node::Labeled { .. } => "LabeledStatement",
            Node::Throw(_) => "ThrowStatement",
            Node::Try { .. } => "TryStatement",
            Node::Switch { .. } => "SwitchStatement",
            Node::Empty => "EmptyStatement",
            Node::Debugger => "DebuggerStatement",
        }
    }
}

/// Pre-order traversal over every child position, in source order.
pub fn walk<'a, F: FnMut(&'a Node)>(node: &'a Node, f: &mut F) {
    f(node);
    match node {
        Node::Literal(_)
        | Node::Ident(_)
        | Node::This
        | Node::Empty
        | Node::Debugger
        | Node::Break(_)
        | Node::Continue(_) => {}
        Node::Array(elts) | Node::Seq(elts) | Node::Program(elts) | Node::Block(elts) => {
            for elt in elts {
                walk(elt, f);
            }
        }
        Node::Object(props) => {
            for prop in props {
                match prop {
                    Prop::KeyValue { key, value } => {
                        if let PropKey::Computed(k) = key {
                            walk(k, f);
                        }
                        walk(value, f);
                    }
                    Prop::Spread(value) => walk(value, f),
                }
            }
        }
        Node::Template { exprs, .. } => {
            for expr in exprs {
                walk(expr, f);
            }
        }
        Node::Unary { arg, .. } | Node::Update { arg, .. } | Node::Spread(arg) => walk(arg, f),
        Node::Binary { left, right, .. } | Node::Logical { left, right, .. } => {
            walk(left, f);
            walk(right, f);
        }
        Node::Assign { target, value, .. } => {
            walk(target, f);
            walk(value, f);
        }
        Node::Cond { test, cons, alt } => {
            walk(test, f);
            walk(cons, f);
            walk(alt, f);
        }
        Node::Call { callee, args } | Node::New { callee, args } => {
            walk(callee, f);
            for arg in args {
                walk(arg, f);
            }
        }
        Node::Member { object, property, .. } => {
            walk(object, f);
            walk(property, f);
        }
        Node::Func { body, .. } => {
            for stmt in body {
                walk(stmt, f);
            }
        }
        Node::Arrow { body, .. } => walk(body, f),
        Node::ExprStmt(expr) | Node::Throw(expr) => walk(expr, f),
        Node::VarDecl { decls, .. } => {
            for (_, init) in decls {
                if let Some(init) = init {
                    walk(init, f);
                }
            }
        }
        Node::If { test, cons, alt } => {
            walk(test, f);
            walk(cons, f);
            if let Some(alt) = alt {
                walk(alt, f);
            }
        }
        Node::For { init, test, update, body } => {
            if let Some(init) = init {
                walk(init, f);
            }
            if let Some(test) = test {
                walk(test, f);
            }
            if let Some(update) = update {
                walk(update, f);
            }
            walk(body, f);
        }
        Node::ForIn { left, right, body, .. } => {
            walk(left, f);
            walk(right, f);
            walk(body, f);
        }
        Node::While { test, body } => {
            walk(test, f);
            walk(body, f);
        }
        Node::DoWhile { body, test } => {
            walk(body, f);
            walk(test, f);
        }
        Node::Return(arg) => {
            if let Some(arg) = arg {
                walk(arg, f);
            }
        }
        Node::Labeled { body, .. } => walk(body, f),
        Node::Try { block, handler, finalizer, .. } => {
            walk(block, f);
            if let Some(handler) = handler {
                walk(handler, f);
            }
            if let Some(finalizer) = finalizer {
                walk(finalizer, f);
            }
        }
        Node::Switch { disc, cases } => {
            walk(disc, f);
            for case in cases {
                if let Some(test) = &case.test {
                    walk(test, f);
                }
                for stmt in &case.body {
                    walk(stmt, f);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_visits_pre_order() {
        // a(b, [c])
        let tree = Node::Call {
            callee: Box::new(Node::Ident("a".into())),
            args: vec![
                Node::Ident("b".into()),
                Node::Array(vec![Node::Ident("c".into())]),
            ],
        };
        let mut kinds = Vec::new();
        walk(&tree, &mut |n| kinds.push(n.kind_name()));
        assert_eq!(
            kinds,
            vec![
                "CallExpression",
                "Identifier",
                "Identifier",
                "ArrayExpression",
                "Identifier"
            ]
        );
    }
}
