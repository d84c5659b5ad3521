use crate::parser::ast::expr::Expr;
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An algebraic equation, such as `y = 2x + 1`.
///
/// Equations are produced by the `=` separator at the lowest precedence level; they cannot nest
/// inside ordinary arithmetic. The simplifier normalizes every equation to the form
/// `lhs - rhs = 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Equation {
    /// The left-hand side of the equation.
    pub lhs: Box<Expr>,

    /// The right-hand side of the equation.
    pub rhs: Box<Expr>,

    /// The region of the source code that this equation was parsed from.
    pub span: Range<usize>,
}

impl Equation {
    /// Returns the span of the equation.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}
