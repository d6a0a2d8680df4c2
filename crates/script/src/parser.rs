//! Recursive-descent statement parser with precedence-climbing expressions.
//!
//! Covers the ES5-era surface the fetched payloads use, plus the handful of
//! newer forms that show up in generated code (arrows, spread, optional
//! chaining, template literals). Classes and parameter/binding patterns are
//! rejected as unsupported rather than mis-parsed.

use crate::ast::{Lit, Node, Prop, PropKey, SwitchCase};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token};

/// Parses a whole script into a `Node::Program`.
pub fn parse_script(src: &str) -> Result<Node, ParseError> {
    let mut p = Parser::new(src)?;
    let mut body = Vec::new();
    while p.tok != Token::Eof {
        body.push(p.statement()?);
    }
    Ok(Node::Program(body))
}

/// Parses a single expression; trailing input is an error.
pub fn parse_expression(src: &str) -> Result<Node, ParseError> {
    let mut p = Parser::new(src)?;
    let expr = p.expression()?;
    if p.tok != Token::Eof {
        return Err(p.unexpected());
    }
    Ok(expr)
}

struct Parser<'a> {
    lx: Lexer<'a>,
    tok: Token,
    /// Whether a line terminator preceded `tok` (semicolon insertion).
    tok_newline: bool,
    /// Inside a `for (...;` head the `in` operator is not a binary operator.
    no_in: bool,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Result<Self, ParseError> {
        let mut lx = Lexer::new(src);
        let tok = lx.next()?;
        let tok_newline = lx.newline_before;
        Ok(Self { lx, tok, tok_newline, no_in: false })
    }

    /// Consumes the current token, returning it.
    fn bump(&mut self) -> Result<Token, ParseError> {
        let next = self.lx.next()?;
        self.tok_newline = self.lx.newline_before;
        Ok(std::mem::replace(&mut self.tok, next))
    }

    fn unexpected(&self) -> ParseError {
        ParseError::Unexpected {
            pos: self.lx.pos(),
            found: describe(&self.tok),
        }
    }

    fn unsupported(&self, what: &'static str) -> ParseError {
        ParseError::Unsupported { pos: self.lx.pos(), what }
    }

    fn at_punct(&self, p: &str) -> bool {
        matches!(&self.tok, Token::Punct(q) if *q == p)
    }

    fn eat_punct(&mut self, p: &str) -> Result<bool, ParseError> {
        if self.at_punct(p) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_punct(&mut self, p: &'static str) -> Result<(), ParseError> {
        if self.eat_punct(p)? {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn at_keyword(&self, k: &str) -> bool {
        matches!(&self.tok, Token::Ident(s) if s == k)
    }

    fn eat_keyword(&mut self, k: &str) -> Result<bool, ParseError> {
        if self.at_keyword(k) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        if !matches!(self.tok, Token::Ident(_)) {
            return Err(self.unexpected());
        }
        match self.bump()? {
            Token::Ident(s) => Ok(s),
            _ => Err(self.unexpected()),
        }
    }

    /// Runs `f` with `in` re-enabled (inside brackets, call arguments and
    /// similar positions the for-head restriction does not apply).
    fn with_in<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let prev = self.no_in;
        self.no_in = false;
        let result = f(self);
        self.no_in = prev;
        result
    }

    // ------------------------------------------------------------ statements

    fn statement(&mut self) -> Result<Node, ParseError> {
        if self.at_punct("{") {
            return self.block();
        }
        if self.eat_punct(";")? {
            return Ok(Node::Empty);
        }
        if self.at_keyword("var") || self.at_keyword("let") || self.at_keyword("const") {
            let decl = self.var_decl()?;
            self.eat_semi()?;
            return Ok(decl);
        }
        if self.eat_keyword("function")? {
            return self.function(true);
        }
        if self.at_keyword("if") {
            return self.if_statement();
        }
        if self.at_keyword("for") {
            return self.for_statement();
        }
        if self.eat_keyword("while")? {
            self.expect_punct("(")?;
            let test = self.expression()?;
            self.expect_punct(")")?;
            let body = self.statement()?;
            return Ok(Node::While { test: Box::new(test), body: Box::new(body) });
        }
        if self.eat_keyword("do")? {
            let body = self.statement()?;
            if !self.eat_keyword("while")? {
                return Err(self.unexpected());
            }
            self.expect_punct("(")?;
            let test = self.expression()?;
            self.expect_punct(")")?;
            self.eat_punct(";")?;
            return Ok(Node::DoWhile { body: Box::new(body), test: Box::new(test) });
        }
        if self.eat_keyword("return")? {
            let arg = if self.return_arg_follows() {
                Some(Box::new(self.expression()?))
            } else {
                None
            };
            self.eat_semi()?;
            return Ok(Node::Return(arg));
        }
        if self.eat_keyword("break")? {
            let label = self.optional_label()?;
            self.eat_semi()?;
            return Ok(Node::Break(label));
        }
        if self.eat_keyword("continue")? {
            let label = self.optional_label()?;
            self.eat_semi()?;
            return Ok(Node::Continue(label));
        }
        if self.eat_keyword("throw")? {
            let arg = self.expression()?;
            self.eat_semi()?;
            return Ok(Node::Throw(Box::new(arg)));
        }
        if self.at_keyword("try") {
            return self.try_statement();
        }
        if self.at_keyword("switch") {
            return self.switch_statement();
        }
        if self.eat_keyword("debugger")? {
            self.eat_semi()?;
            return Ok(Node::Debugger);
        }
        if self.at_keyword("class") {
            return Err(self.unsupported("class declaration"));
        }

        let expr = self.expression()?;
        if let Node::Ident(name) = &expr {
            if self.at_punct(":") {
                let label = name.clone();
                self.bump()?;
                let body = self.statement()?;
                return Ok(Node::Labeled { label, body: Box::new(body) });
            }
        }
        self.eat_semi()?;
        Ok(Node::ExprStmt(Box::new(expr)))
    }

    fn return_arg_follows(&self) -> bool {
        !self.tok_newline
            && !self.at_punct(";")
            && !self.at_punct("}")
            && self.tok != Token::Eof
    }

    fn optional_label(&mut self) -> Result<Option<String>, ParseError> {
        if !self.tok_newline && matches!(self.tok, Token::Ident(_)) {
            Ok(Some(self.expect_ident()?))
        } else {
            Ok(None)
        }
    }

    /// Accepts `;`, or inserts one before `}`, end of input, or a newline.
    fn eat_semi(&mut self) -> Result<(), ParseError> {
        if self.eat_punct(";")? {
            return Ok(());
        }
        if self.at_punct("}") || self.tok == Token::Eof || self.tok_newline {
            return Ok(());
        }
        Err(self.unexpected())
    }

    fn block(&mut self) -> Result<Node, ParseError> {
        self.expect_punct("{")?;
        let mut body = Vec::new();
        while !self.eat_punct("}")? {
            body.push(self.statement()?);
        }
        Ok(Node::Block(body))
    }

    /// Parses a declaration list; the `var`/`let`/`const` keyword is current.
    /// Does not consume the trailing semicolon.
    fn var_decl(&mut self) -> Result<Node, ParseError> {
        let kind = if self.at_keyword("var") {
            "var"
        } else if self.at_keyword("let") {
            "let"
        } else {
            "const"
        };
        self.bump()?;
        let mut decls = Vec::new();
        loop {
            let name = self.expect_ident()?;
            let init = if self.eat_punct("=")? {
                Some(self.assign_expr()?)
            } else {
                None
            };
            decls.push((name, init));
            if !self.eat_punct(",")? {
                break;
            }
        }
        Ok(Node::VarDecl { kind, decls })
    }

    fn if_statement(&mut self) -> Result<Node, ParseError> {
        self.bump()?; // `if`
        self.expect_punct("(")?;
        let test = self.expression()?;
        self.expect_punct(")")?;
        let cons = self.statement()?;
        let alt = if self.eat_keyword("else")? {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Node::If { test: Box::new(test), cons: Box::new(cons), alt })
    }

    fn for_statement(&mut self) -> Result<Node, ParseError> {
        self.bump()?; // `for`
        self.expect_punct("(")?;
        let mut init: Option<Box<Node>> = None;
        if !self.eat_punct(";")? {
            let left = if self.at_keyword("var") || self.at_keyword("let") || self.at_keyword("const")
            {
                let prev = self.no_in;
                self.no_in = true;
                let decl = self.var_decl();
                self.no_in = prev;
                decl?
            } else {
                let prev = self.no_in;
                self.no_in = true;
                let expr = self.expression();
                self.no_in = prev;
                expr?
            };
            if self.at_keyword("in") || self.at_keyword("of") {
                let of = self.at_keyword("of");
                self.bump()?;
                let right = self.expression()?;
                self.expect_punct(")")?;
                let body = self.statement()?;
                return Ok(Node::ForIn {
                    left: Box::new(left),
                    right: Box::new(right),
                    body: Box::new(body),
                    of,
                });
            }
            init = Some(Box::new(left));
            self.expect_punct(";")?;
        }
        let test = if self.at_punct(";") {
            None
        } else {
            Some(Box::new(self.expression()?))
        };
        self.expect_punct(";")?;
        let update = if self.at_punct(")") {
            None
        } else {
            Some(Box::new(self.expression()?))
        };
        self.expect_punct(")")?;
        let body = self.statement()?;
        Ok(Node::For { init, test, update, body: Box::new(body) })
    }

    fn try_statement(&mut self) -> Result<Node, ParseError> {
        self.bump()?; // `try`
        let block = self.block()?;
        let mut param = None;
        let mut handler = None;
        if self.eat_keyword("catch")? {
            if self.eat_punct("(")? {
                param = Some(self.expect_ident()?);
                self.expect_punct(")")?;
            }
            handler = Some(Box::new(self.block()?));
        }
        let finalizer = if self.eat_keyword("finally")? {
            Some(Box::new(self.block()?))
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.unexpected());
        }
        Ok(Node::Try { block: Box::new(block), param, handler, finalizer })
    }

    fn switch_statement(&mut self) -> Result<Node, ParseError> {
        self.bump()?; // `switch`
        self.expect_punct("(")?;
        let disc = self.expression()?;
        self.expect_punct(")")?;
        self.expect_punct("{")?;
        let mut cases = Vec::new();
        while !self.eat_punct("}")? {
            let test = if self.eat_keyword("case")? {
                Some(self.expression()?)
            } else if self.eat_keyword("default")? {
                None
            } else {
                return Err(self.unexpected());
            };
            self.expect_punct(":")?;
            let mut body = Vec::new();
            while !(self.at_punct("}") || self.at_keyword("case") || self.at_keyword("default")) {
                body.push(self.statement()?);
            }
            cases.push(SwitchCase { test, body });
        }
        Ok(Node::Switch { disc: Box::new(disc), cases })
    }

    // ----------------------------------------------------------- expressions

    fn expression(&mut self) -> Result<Node, ParseError> {
        let first = self.assign_expr()?;
        if !self.at_punct(",") {
            return Ok(first);
        }
        let mut items = vec![first];
        while self.eat_punct(",")? {
            items.push(self.assign_expr()?);
        }
        Ok(Node::Seq(items))
    }

    fn assign_expr(&mut self) -> Result<Node, ParseError> {
        let left = self.cond_expr()?;
        if self.at_punct("=>") && !self.tok_newline {
            let params = self.arrow_params(left)?;
            self.bump()?;
            let body = if self.at_punct("{") {
                self.block()?
            } else {
                self.assign_expr()?
            };
            return Ok(Node::Arrow { params, body: Box::new(body) });
        }
        if let Token::Punct(p) = &self.tok {
            let p = *p;
            if is_assign_op(p) {
                if !matches!(
                    left,
                    Node::Ident(_) | Node::Member { .. } | Node::Array(_) | Node::Object(_)
                ) {
                    return Err(self.unexpected());
                }
                self.bump()?;
                let value = self.assign_expr()?;
                return Ok(Node::Assign {
                    op: p,
                    target: Box::new(left),
                    value: Box::new(value),
                });
            }
        }
        Ok(left)
    }

    fn arrow_params(&self, expr: Node) -> Result<Vec<String>, ParseError> {
        let items = match expr {
            Node::Seq(items) => items,
            other => vec![other],
        };
        let mut params = Vec::with_capacity(items.len());
        for item in items {
            match item {
                Node::Ident(name) => params.push(name),
                _ => return Err(self.unsupported("arrow function parameter pattern")),
            }
        }
        Ok(params)
    }

    fn cond_expr(&mut self) -> Result<Node, ParseError> {
        let test = self.binary_expr(0)?;
        if !self.eat_punct("?")? {
            return Ok(test);
        }
        let cons = self.with_in(|p| p.assign_expr())?;
        self.expect_punct(":")?;
        let alt = self.assign_expr()?;
        Ok(Node::Cond {
            test: Box::new(test),
            cons: Box::new(cons),
            alt: Box::new(alt),
        })
    }

    fn binary_expr(&mut self, min: u8) -> Result<Node, ParseError> {
        let mut left = self.unary_expr()?;
        while let Some((op, prec, right_assoc, logical)) = self.peek_bin_op() {
            if prec < min {
                break;
            }
            self.bump()?;
            let right = self.binary_expr(if right_assoc { prec } else { prec + 1 })?;
            left = if logical {
                Node::Logical { op, left: Box::new(left), right: Box::new(right) }
            } else {
                Node::Binary { op, left: Box::new(left), right: Box::new(right) }
            };
        }
        Ok(left)
    }

    /// `(op, precedence, right-assoc, is-logical)` for the current token.
    fn peek_bin_op(&self) -> Option<(&'static str, u8, bool, bool)> {
        let op: &'static str = match &self.tok {
            Token::Punct(p) => *p,
            Token::Ident(s) if s == "in" && !self.no_in => "in",
            Token::Ident(s) if s == "instanceof" => "instanceof",
            _ => return None,
        };
        let (prec, logical) = match op {
            "??" | "||" => (1, true),
            "&&" => (2, true),
            "|" => (3, false),
            "^" => (4, false),
            "&" => (5, false),
            "==" | "!=" | "===" | "!==" => (6, false),
            "<" | ">" | "<=" | ">=" | "in" | "instanceof" => (7, false),
            "<<" | ">>" | ">>>" => (8, false),
            "+" | "-" => (9, false),
            "*" | "/" | "%" => (10, false),
            "**" => (11, false),
            _ => return None,
        };
        Some((op, prec, op == "**", logical))
    }

    fn unary_expr(&mut self) -> Result<Node, ParseError> {
        let op: Option<&'static str> = match &self.tok {
            Token::Punct(p) if matches!(*p, "!" | "~" | "+" | "-") => Some(*p),
            Token::Ident(s) if s == "typeof" => Some("typeof"),
            Token::Ident(s) if s == "void" => Some("void"),
            Token::Ident(s) if s == "delete" => Some("delete"),
            _ => None,
        };
        if let Some(op) = op {
            self.bump()?;
            let arg = self.unary_expr()?;
            return Ok(Node::Unary { op, arg: Box::new(arg) });
        }
        if self.at_punct("++") || self.at_punct("--") {
            let op = if self.at_punct("++") { "++" } else { "--" };
            self.bump()?;
            let arg = self.unary_expr()?;
            return Ok(Node::Update { op, prefix: true, arg: Box::new(arg) });
        }
        let expr = self.lhs_expr()?;
        if !self.tok_newline && (self.at_punct("++") || self.at_punct("--")) {
            let op = if self.at_punct("++") { "++" } else { "--" };
            self.bump()?;
            return Ok(Node::Update { op, prefix: false, arg: Box::new(expr) });
        }
        Ok(expr)
    }

    fn lhs_expr(&mut self) -> Result<Node, ParseError> {
        let mut expr = if self.at_keyword("new") {
            self.new_expr()?
        } else {
            self.primary()?
        };
        loop {
            if self.eat_punct(".")? {
                let name = self.expect_ident()?;
                expr = Node::Member {
                    object: Box::new(expr),
                    property: Box::new(Node::Ident(name)),
                    computed: false,
                };
            } else if self.eat_punct("?.")? {
                if self.at_punct("(") {
                    let args = self.call_args()?;
                    expr = Node::Call { callee: Box::new(expr), args };
                } else if self.eat_punct("[")? {
                    let prop = self.with_in(|p| p.expression())?;
                    self.expect_punct("]")?;
                    expr = Node::Member {
                        object: Box::new(expr),
                        property: Box::new(prop),
                        computed: true,
                    };
                } else {
                    let name = self.expect_ident()?;
                    expr = Node::Member {
                        object: Box::new(expr),
                        property: Box::new(Node::Ident(name)),
                        computed: false,
                    };
                }
            } else if self.eat_punct("[")? {
                let prop = self.with_in(|p| p.expression())?;
                self.expect_punct("]")?;
                expr = Node::Member {
                    object: Box::new(expr),
                    property: Box::new(prop),
                    computed: true,
                };
            } else if self.at_punct("(") {
                let args = self.call_args()?;
                expr = Node::Call { callee: Box::new(expr), args };
            } else if matches!(self.tok, Token::Template { .. }) {
                // Tagged template: keep the template as the sole argument.
                let tpl = self.primary()?;
                expr = Node::Call { callee: Box::new(expr), args: vec![tpl] };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn call_args(&mut self) -> Result<Vec<Node>, ParseError> {
        self.expect_punct("(")?;
        let mut args = Vec::new();
        loop {
            if self.eat_punct(")")? {
                break;
            }
            let arg = if self.eat_punct("...")? {
                Node::Spread(Box::new(self.with_in(|p| p.assign_expr())?))
            } else {
                self.with_in(|p| p.assign_expr())?
            };
            args.push(arg);
            if !self.eat_punct(",")? {
                self.expect_punct(")")?;
                break;
            }
        }
        Ok(args)
    }

    fn new_expr(&mut self) -> Result<Node, ParseError> {
        self.bump()?; // `new`
        if self.eat_punct(".")? {
            let name = self.expect_ident()?;
            return Ok(Node::Ident(format!("new.{name}")));
        }
        let mut callee = if self.at_keyword("new") {
            self.new_expr()?
        } else {
            self.primary()?
        };
        loop {
            if self.eat_punct(".")? {
                let name = self.expect_ident()?;
                callee = Node::Member {
                    object: Box::new(callee),
                    property: Box::new(Node::Ident(name)),
                    computed: false,
                };
            } else if self.eat_punct("[")? {
                let prop = self.with_in(|p| p.expression())?;
                self.expect_punct("]")?;
                callee = Node::Member {
                    object: Box::new(callee),
                    property: Box::new(prop),
                    computed: true,
                };
            } else {
                break;
            }
        }
        let args = if self.at_punct("(") { self.call_args()? } else { Vec::new() };
        Ok(Node::New { callee: Box::new(callee), args })
    }

    fn primary(&mut self) -> Result<Node, ParseError> {
        if self.at_punct("(") {
            return self.paren_expr();
        }
        if self.at_punct("[") {
            return self.array_literal();
        }
        if self.at_punct("{") {
            return self.object_literal();
        }
        if !matches!(
            self.tok,
            Token::Num(_) | Token::Str(_) | Token::Regex { .. } | Token::Template { .. } | Token::Ident(_)
        ) {
            return Err(self.unexpected());
        }
        match self.bump()? {
            Token::Num(n) => Ok(Node::Literal(Lit::Num(n))),
            Token::Str(s) => Ok(Node::Literal(Lit::Str(s))),
            Token::Regex { pattern, flags } => Ok(Node::Literal(Lit::Regex { pattern, flags })),
            Token::Template { quasis, exprs } => {
                let mut parsed = Vec::with_capacity(exprs.len());
                for src in &exprs {
                    parsed.push(parse_expression(src)?);
                }
                Ok(Node::Template { quasis, exprs: parsed })
            }
            Token::Ident(name) => match name.as_str() {
                "this" => Ok(Node::This),
                "true" => Ok(Node::Literal(Lit::Bool(true))),
                "false" => Ok(Node::Literal(Lit::Bool(false))),
                "null" => Ok(Node::Literal(Lit::Null)),
                "function" => self.function(false),
                "class" => Err(self.unsupported("class expression")),
                _ => Ok(Node::Ident(name)),
            },
            _ => Err(self.unexpected()),
        }
    }

    fn paren_expr(&mut self) -> Result<Node, ParseError> {
        self.bump()?; // `(`
        if self.eat_punct(")")? {
            // `()` is only valid as an empty arrow parameter list.
            if self.at_punct("=>") {
                return Ok(Node::Seq(Vec::new()));
            }
            return Err(self.unexpected());
        }
        let expr = self.with_in(|p| p.expression())?;
        self.expect_punct(")")?;
        Ok(expr)
    }

    fn array_literal(&mut self) -> Result<Node, ParseError> {
        self.bump()?; // `[`
        let mut elts = Vec::new();
        loop {
            if self.eat_punct("]")? {
                break;
            }
            if self.at_punct(",") {
                // Elision; a hole reads as null.
                self.bump()?;
                elts.push(Node::Literal(Lit::Null));
                continue;
            }
            let elt = if self.eat_punct("...")? {
                Node::Spread(Box::new(self.with_in(|p| p.assign_expr())?))
            } else {
                self.with_in(|p| p.assign_expr())?
            };
            elts.push(elt);
            if !self.eat_punct(",")? {
                self.expect_punct("]")?;
                break;
            }
        }
        Ok(Node::Array(elts))
    }

    fn object_literal(&mut self) -> Result<Node, ParseError> {
        self.bump()?; // `{`
        let mut props = Vec::new();
        loop {
            if self.eat_punct("}")? {
                break;
            }
            if self.eat_punct("...")? {
                props.push(Prop::Spread(self.with_in(|p| p.assign_expr())?));
            } else {
                let prop = self.object_prop()?;
                props.push(prop);
            }
            if !self.eat_punct(",")? {
                self.expect_punct("}")?;
                break;
            }
        }
        Ok(Node::Object(props))
    }

    fn object_prop(&mut self) -> Result<Prop, ParseError> {
        if self.at_keyword("get") || self.at_keyword("set") {
            let word = self.expect_ident()?;
            if !(self.at_punct(":")
                || self.at_punct(",")
                || self.at_punct("(")
                || self.at_punct("}"))
            {
                // Accessor; represented as a plain key/function pair.
                let key = self.prop_key()?;
                let func = self.method_tail()?;
                return Ok(Prop::KeyValue { key, value: func });
            }
            return self.prop_after_key(PropKey::Ident(word));
        }
        let key = self.prop_key()?;
        self.prop_after_key(key)
    }

    fn prop_after_key(&mut self, key: PropKey) -> Result<Prop, ParseError> {
        if self.at_punct("(") {
            let func = self.method_tail()?;
            return Ok(Prop::KeyValue { key, value: func });
        }
        if self.eat_punct(":")? {
            let value = self.with_in(|p| p.assign_expr())?;
            return Ok(Prop::KeyValue { key, value });
        }
        match key {
            PropKey::Ident(name) => Ok(Prop::KeyValue {
                value: Node::Ident(name.clone()),
                key: PropKey::Ident(name),
            }),
            _ => Err(self.unexpected()),
        }
    }

    fn prop_key(&mut self) -> Result<PropKey, ParseError> {
        if self.eat_punct("[")? {
            let k = self.with_in(|p| p.assign_expr())?;
            self.expect_punct("]")?;
            return Ok(PropKey::Computed(k));
        }
        if !matches!(self.tok, Token::Ident(_) | Token::Str(_) | Token::Num(_)) {
            return Err(self.unexpected());
        }
        match self.bump()? {
            Token::Ident(name) => Ok(PropKey::Ident(name)),
            Token::Str(s) => Ok(PropKey::Str(s)),
            Token::Num(n) => Ok(PropKey::Num(n)),
            _ => Err(self.unexpected()),
        }
    }

    /// Parses `(params) { body }` for methods and accessors.
    fn method_tail(&mut self) -> Result<Node, ParseError> {
        let params = self.params()?;
        let body = self.fn_body()?;
        Ok(Node::Func { name: None, params, body })
    }

    /// Parses a function expression or declaration; `function` is consumed.
    fn function(&mut self, require_name: bool) -> Result<Node, ParseError> {
        self.eat_punct("*")?; // generators share the same surface
        let name = if matches!(self.tok, Token::Ident(_)) {
            Some(self.expect_ident()?)
        } else if require_name {
            return Err(self.unexpected());
        } else {
            None
        };
        let params = self.params()?;
        let body = self.fn_body()?;
        Ok(Node::Func { name, params, body })
    }

    fn params(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect_punct("(")?;
        let mut params = Vec::new();
        loop {
            if self.eat_punct(")")? {
                break;
            }
            params.push(self.expect_ident()?);
            if !self.eat_punct(",")? {
                self.expect_punct(")")?;
                break;
            }
        }
        Ok(params)
    }

    fn fn_body(&mut self) -> Result<Vec<Node>, ParseError> {
        self.expect_punct("{")?;
        let prev = self.no_in;
        self.no_in = false;
        let mut body = Vec::new();
        let result = loop {
            match self.eat_punct("}") {
                Ok(true) => break Ok(body),
                Ok(false) => match self.statement() {
                    Ok(stmt) => body.push(stmt),
                    Err(e) => break Err(e),
                },
                Err(e) => break Err(e),
            }
        };
        self.no_in = prev;
        result
    }
}

fn is_assign_op(p: &str) -> bool {
    matches!(
        p,
        "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "<<=" | ">>=" | ">>>=" | "&=" | "|=" | "^="
            | "**=" | "&&=" | "||=" | "??="
    )
}

fn describe(tok: &Token) -> String {
    match tok {
        Token::Num(n) => format!("number {n}"),
        Token::Str(_) => "string literal".to_string(),
        Token::Template { .. } => "template literal".to_string(),
        Token::Ident(s) => format!("`{s}`"),
        Token::Punct(p) => format!("`{p}`"),
        Token::Regex { .. } => "regex literal".to_string(),
        Token::Eof => "end of input".to_string(),
    }
}
