//! Tokenizer and parser for symbolic mathematical expressions.
//!
//! The entry point is the [`Parser`](parser::Parser) type, which parses a source string into the
//! abstract syntax tree defined in [`parser::ast`]:
//!
//! ```
//! use symcore_parser::parser::{ast::Expr, Parser};
//!
//! let ast = Parser::new("2x + sin(x)^2").try_parse_full::<Expr>().unwrap();
//! ```
//!
//! The grammar covers numbers, identifiers (Unicode-aware, so Greek letters work), function
//! calls, parenthesized groups, tensor literals in square brackets, equations, implicit
//! multiplication, postfix factorial, and the sugared derivative / integral notations
//! `(d/dx)(...)` and `∫(..., x)`.
//!
//! A [`Environment`](env::Environment) can be supplied to substitute named constants for
//! identifiers at parse time; see [`Parser::with_env`](parser::Parser::with_env).

pub mod env;
pub mod parser;
pub mod tokenizer;

/// Attempts to parse a value using the given parsing expression, returning early if it succeeds
/// or if it fails with a fatal error. Evaluates to the error otherwise, so callers can fall
/// through to the next alternative.
#[macro_export]
macro_rules! return_if_ok {
    ($expr:expr) => {{
        match $expr {
            Ok(value) => return Ok(value),
            Err(err) if err.fatal => return Err(err),
            err => err,
        }
    }};
}

pub use env::Environment;
pub use parser::Parser;
