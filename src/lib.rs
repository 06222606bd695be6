//! sqltree - a front end for a restricted SQL SELECT language
//!
//! Turns a query string into an abstract syntax tree and renders the
//! tree as an indented box-drawing diagram:
//!
//! ```
//! use sqltree::{parse, render};
//!
//! let tree = parse("select age as a from users where age > 7").unwrap();
//! for line in render(&tree) {
//!     println!("{}", line);
//! }
//! ```
//!
//! The accepted language is a single SELECT statement with a mandatory
//! FROM (optionally a JOIN chain), optional WHERE, optional GROUP BY,
//! HAVING only after GROUP BY, and ORDER BY only after HAVING. There is
//! no semantic analysis, planning, or execution.

pub mod error;
pub mod parser;

// Re-export main public types
pub use error::{Error, Result};
pub use parser::ast::{BinOp, JoinKind, Node, UnOp};
pub use parser::grammar::{parse, Parser};
pub use parser::render::{render, render_to_string};
pub use parser::tokenizer::{tokenize, Token, TokenKind, Tokenized, Tokenizer};
pub use parser::walk::{walk, Visitor, WalkResult};
