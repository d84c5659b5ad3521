//! Algebraic manipulation of expressions.
//!
//! # Expression representation
//!
//! Symbolic algorithms in this module operate on the [`Expr`] tree defined in [`expr`], a
//! flattened representation converted from the parser's AST: `x + (y + z)` is a single
//! [`Expr::Add`] node with three children. See the [`expr`] module documentation for the
//! equality and immutability guarantees.
//!
//! # Engines
//!
//! - [`simplify`](mod@simplify) rewrites an expression to a canonical fixed point by repeatedly
//!   applying an ordered rule set.
//! - [`derivative`](mod@derivative) differentiates symbolically, producing a human-readable
//!   step trace alongside the result.
//! - [`integrate`](mod@integrate) integrates heuristically, falling back to an unevaluated
//!   integral marker.
//! - [`series`](mod@series) expands functions into Taylor polynomials.
//! - [`eval`](mod@eval) evaluates numerically against variable bindings and an injected
//!   function registry.
//!
//! ```
//! use symcore_compute::symbolic::{expr::Expr, simplify::simplify};
//! use symcore_parser::parser::ast::Expr as AstExpr;
//! use symcore_parser::Parser;
//!
//! let ast = Parser::new("x + x + x").try_parse_full::<AstExpr>().unwrap();
//! let simplified = simplify(&Expr::from(ast));
//!
//! // `x + x + x = 3x`
//! assert_eq!(simplified, Expr::Mul(vec![
//!     Expr::int(3),
//!     Expr::symbol("x"),
//! ]));
//! ```

pub mod derivative;
pub mod eval;
pub mod expr;
pub mod integrate;
pub mod series;
pub mod simplify;
pub mod step_collector;

pub use derivative::differentiate;
pub use eval::{eval, Bindings, FuncRegistry};
pub use expr::Expr;
pub use integrate::integrate;
pub use series::series_expand;
pub use simplify::{fold_once, simplify, simplify_with};
pub use step_collector::StepCollector;
