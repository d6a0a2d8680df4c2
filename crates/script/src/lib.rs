//! JavaScript scanner and parser producing a closed AST.
//!
//! # Overview
//!
//! This crate parses a script payload string into a single [`Node`] tree that
//! downstream consumers traverse with [`walk`]. It targets the ES5-era
//! surface generated script payloads use (plus arrows, spread, optional
//! chaining and template literals); it deliberately is not a complete
//! ECMAScript front end.
//!
//! # Example
//!
//! ```
//! use msgr_script::{parse_script, walk, Node};
//!
//! let tree = parse_script("LS.sp(\"op\", [0, 5]);").unwrap();
//! let mut calls = 0;
//! walk(&tree, &mut |node| {
//!     if matches!(node, Node::Call { .. }) {
//!         calls += 1;
//!     }
//! });
//! assert_eq!(calls, 1);
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{walk, Lit, Node, Prop, PropKey, SwitchCase};
pub use error::ParseError;
pub use parser::{parse_expression, parse_script};
