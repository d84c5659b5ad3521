//! The abstract syntax tree produced by the parser.
//!
//! Each node type lives in its own module together with its [`Parse`](crate::parser::Parse)
//! implementation. Every node records the region of the source code it was parsed from, so
//! errors discovered later can still point back into the input.

pub mod binary;
pub mod call;
pub mod equation;
pub mod expr;
pub mod literal;
pub mod paren;
pub mod sugar;
pub mod tensor;
pub mod unary;

pub use binary::Binary;
pub use call::Call;
pub use equation::Equation;
pub use expr::Expr;
pub use literal::{LitConst, LitFloat, LitInt, LitSym, Literal};
pub use paren::Paren;
pub use tensor::Tensor;
pub use unary::Unary;
