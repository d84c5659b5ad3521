//! The computational heart of the symcore calculator: parsing into a symbolic expression tree,
//! exact numeric arithmetic, simplification, differentiation with a step trace, heuristic
//! integration, series expansion, and numeric evaluation.
//!
//! # The pipeline
//!
//! Text flows through the tokenizer and parser (in `symcore_parser`) into an AST, which is
//! converted into the flattened [`symbolic::Expr`] tree and normalized once by the single-step
//! constant folder. Every engine consumes and produces that tree; the simplifier is the
//! normalizing pass all of them share.
//!
//! ```
//! use symcore_compute::{differentiate, parse, simplify, to_display_string};
//!
//! let expr = parse("sin(x^2)").unwrap();
//! let (derivative, steps) = differentiate(&expr, "x").unwrap();
//!
//! assert_eq!(to_display_string(&derivative), "2x * cos(x^2)");
//! assert!(!steps.is_empty());
//! ```
//!
//! # Error handling
//!
//! Every failure carries a stable machine-readable kind key such as `parse(unmatched_paren)` or
//! `eval(divide_by_zero)`. Human-readable messages for the keys can be supplied externally via
//! [`symcore_error::MessageSource`]; with no table, the bare key is used. [`simplify`] and
//! [`integrate`] are total and never fail.

pub mod consts;
pub mod error;
pub mod num;
pub mod primitive;
pub mod symbolic;

pub use error::{DiffError, EvalError};
pub use num::Num;
pub use symbolic::{Bindings, Expr, FuncRegistry};

use symcore_parser::parser::ast::Expr as AstExpr;
use symcore_parser::{Environment, Parser};

/// Parses an expression with no constant substitution.
///
/// On success, the resulting tree has been normalized once by the single-step constant folder
/// (so `3!` is already the number 6), but not otherwise simplified.
pub fn parse(input: &str) -> Result<Expr, symcore_error::Error> {
    let ast = Parser::new(input).try_parse_full::<AstExpr>()?;
    Ok(symbolic::fold_once(Expr::from(ast)))
}

/// Parses an expression, substituting named constants from the given environment.
pub fn parse_with_env(input: &str, env: &Environment) -> Result<Expr, symcore_error::Error> {
    let ast = Parser::with_env(input, env).try_parse_full::<AstExpr>()?;
    Ok(symbolic::fold_once(Expr::from(ast)))
}

/// Simplifies an expression to its canonical form. Total; never fails.
pub fn simplify(expr: &Expr) -> Expr {
    symbolic::simplify(expr)
}

/// Differentiates an expression, returning the simplified derivative and the ordered derivation
/// steps.
pub fn differentiate(expr: &Expr, var: &str) -> Result<(Expr, Vec<String>), DiffError> {
    symbolic::differentiate(expr, var)
}

/// Integrates an expression. Always succeeds; an unsolvable integrand comes back as an
/// [`Expr::Integral`] marker.
pub fn integrate(expr: &Expr, var: &str) -> Expr {
    symbolic::integrate(expr, var)
}

/// Expands a named function into its Taylor polynomial around `center`, up to the given order.
pub fn series_expand(func: &str, var: &Expr, center: Num, order: u32) -> Expr {
    symbolic::series_expand(func, var, center, order)
}

/// Renders an expression with the canonical pretty-printer.
pub fn to_display_string(expr: &Expr) -> String {
    expr.to_string()
}
