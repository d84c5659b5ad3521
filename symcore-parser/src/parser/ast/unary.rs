use crate::{
    parser::{
        ast::{binary::Binary, expr::{Expr, Primary}},
        error::Error,
        token::op::{UnaryOp, UnaryOpKind},
        Associativity,
        Parser,
    },
    return_if_ok,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Attempt to parse a unary operator with the correct associativity. Returns a non-fatal error
/// if the operator is not of the correct associativity.
fn try_parse_unary_op(input: &mut Parser, associativity: Associativity) -> Result<UnaryOp, Error> {
    input.try_parse_then::<UnaryOp, _>(|op, input| {
        if op.associativity() == associativity {
            Ok(())
        } else {
            Err(input.error(crate::parser::error::kind::NonFatal))
        }
    })
}

/// A unary expression, such as `-x` or `2!`. Unary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unary {
    /// The operand of the unary expression (left or right, depending on the associativity).
    pub operand: Box<Expr>,

    /// The operator of the unary expression.
    pub op: UnaryOp,

    /// The region of the source code that this unary expression was parsed from.
    pub span: Range<usize>,
}

impl Unary {
    /// Returns the span of the unary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parse a prefix (right-associative) unary expression, i.e. negation.
    ///
    /// Negation binds tighter than multiplication but looser than exponentiation, so after
    /// parsing the operand we continue climbing at the operator's precedence; `-x^2` becomes
    /// `-(x^2)`.
    pub fn parse_right(input: &mut Parser) -> Result<Self, Error> {
        let op = try_parse_unary_op(input, Associativity::Right)?;
        let op_precedence = op.precedence();
        let start_span = op.span.start;

        input.descend()?;
        let operand = (|| {
            let lhs = Unary::parse_or_lower(input)?;
            Binary::parse_expr(input, lhs, op_precedence)
        })();
        input.ascend();
        let operand = operand?;

        let end_span = operand.span().end;
        Ok(Self {
            operand: Box::new(operand),
            op,
            span: start_span..end_span,
        })
    }

    /// Parse a postfix (left-associative) unary expression, i.e. factorial.
    ///
    /// By the nature of postfix operators, we must parse the operand first. If no operator
    /// follows, the operand is returned unchanged, avoiding backtracking over it.
    pub fn parse_left_or_operand(input: &mut Parser) -> Result<Expr, Error> {
        let operand = input.try_parse::<Primary>()?;
        let mut result: Expr = operand.into();
        let start_span = result.span().start;

        while let Ok(op) = try_parse_unary_op(input, Associativity::Left) {
            debug_assert_eq!(op.kind, UnaryOpKind::Factorial);
            let end_span = op.span.end;
            result = Expr::Unary(Self {
                operand: Box::new(result),
                op,
                span: start_span..end_span,
            });
        }

        Ok(result)
    }

    /// Parses a unary expression, or lower precedence expressions.
    pub fn parse_or_lower(input: &mut Parser) -> Result<Expr, Error> {
        let _ = return_if_ok!(Self::parse_right(input).map(Expr::Unary));
        Self::parse_left_or_operand(input)
    }
}

impl fmt::Display for Unary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.op.associativity() {
            Associativity::Left => {
                self.operand.fmt(f)?;
                write!(f, "{}", self.op.kind)
            },
            Associativity::Right => {
                write!(f, "{}", self.op.kind)?;
                self.operand.fmt(f)
            },
        }
    }
}
