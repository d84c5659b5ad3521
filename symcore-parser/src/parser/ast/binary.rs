use crate::{
    parser::{
        ast::{
            equation::Equation,
            expr::{Expr, Primary},
        },
        error::{kind, Error},
        token::{op::{BinOp, BinOpKind}, Equals},
        Associativity,
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A binary operator, extended with the pseudo-operators the parser treats like binary
/// operators.
#[derive(Debug, Clone, PartialEq)]
enum BinOpExt {
    /// A binary operator, such as `+` or `*`.
    Op(BinOp),

    /// Implicit multiplication, such as `2x` or `x(x + 1)`.
    ///
    /// This is not a real operator, but it is treated as one for the purposes of parsing.
    ImplicitMultiplication,

    /// The equation separator `=`, producing an [`Equation`] node instead of a [`Binary`].
    Equation(Range<usize>),
}

impl BinOpExt {
    /// Returns the precedence of the binary operator.
    fn precedence(&self) -> Precedence {
        match self {
            BinOpExt::Op(op) => op.precedence(),
            BinOpExt::ImplicitMultiplication => Precedence::Factor,
            BinOpExt::Equation(_) => Precedence::Equation,
        }
    }
}

impl From<BinOp> for BinOpExt {
    fn from(op: BinOp) -> Self {
        BinOpExt::Op(op)
    }
}

/// Returns true when the cursor sits exactly between a closing and an opening square bracket.
/// Adjacent `][` separates tensor elements like a comma, so implicit multiplication must not
/// fire there.
fn tensor_bracket_adjacency(input: &Parser) -> bool {
    matches!(input.prev_token().map(|token| token.kind), Some(TokenKind::CloseSquare))
        && matches!(input.current_token().map(|token| token.kind), Some(TokenKind::OpenSquare))
}

/// A binary expression, such as `1 + 2`. Binary expressions can include nested expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Binary {
    /// The left-hand side of the binary expression.
    pub lhs: Box<Expr>,

    /// The operator of the binary expression.
    pub op: BinOp,

    /// The right-hand side of the binary expression.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary expression was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// After parsing the left-hand-side, the operator, and the right-hand-side of a potential
    /// binary expression, parse ahead to see if the right-hand-side is incomplete.
    fn complete_rhs(
        input: &mut Parser,
        lhs: Expr,
        op: BinOpExt,
        mut rhs: Expr,
    ) -> Result<Expr, Error> {
        let precedence = op.precedence();

        loop {
            // before creating the `lhs op rhs` node, we should check the precedence of the
            // following operator, if any
            // this is because we can't parse an expression like `3 + 4 * 5` as `(3 + 4) * 5`

            // clone the input stream to emulate peeking
            let mut input_ahead = input.clone();
            if let Ok(next_op) = input_ahead.try_parse::<BinOp>() {
                if next_op.precedence() > precedence || next_op.associativity() == Associativity::Right {
                    // this operator has a higher precedence or is right-associative, so we
                    // should parse its expression starting with `rhs` first
                    rhs = Self::parse_expr(input, rhs, next_op.precedence())?;
                } else {
                    // this operator has lower precedence, or equal precedence and
                    // left-associativity; this is in scenarios like:
                    // `1 * 2 + 3` or `1 * 2 * 3`
                    //
                    // so just break out of the loop and let `lhs` become `1 * 2`
                    // we will parse this operator on the next iteration of the outside loop
                    break;
                }
            } else if input_ahead.try_parse::<Equals>().is_ok() {
                // the equation separator is right-associative and has the lowest precedence
                if Precedence::Equation >= precedence {
                    rhs = Self::parse_expr(input, rhs, Precedence::Equation)?;
                } else {
                    break;
                }
            } else {
                // there is no operator; check if there is a primary expression instead
                // if there is, this is implicit multiplication
                //
                // first, check if the previous operator has higher or equal precedence; if so,
                // we cannot give priority to implicit multiplication
                if precedence >= BinOpKind::Mul.precedence() {
                    break;
                }

                if tensor_bracket_adjacency(input) {
                    break;
                }

                match input.try_parse::<Primary>() {
                    Ok(primary) => {
                        let expr: Expr = primary.into();
                        let (start_span, end_span) = (rhs.span().start, expr.span().end);
                        let op_span = rhs.span().end..expr.span().start;
                        rhs = Expr::Binary(Binary {
                            lhs: Box::new(rhs),
                            op: BinOp {
                                kind: BinOpKind::Mul,
                                implicit: true,
                                span: op_span,
                            },
                            rhs: Box::new(expr),
                            span: start_span..end_span,
                        });
                    },
                    Err(err) if err.fatal => return Err(err),
                    Err(_) => break,
                }
            }
        }

        // create the node representing `lhs op rhs`
        let (start_span, end_span) = (lhs.span().start, rhs.span().end);
        match op {
            BinOpExt::Op(op) => Ok(Expr::Binary(Binary {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
                span: start_span..end_span,
            })),
            BinOpExt::ImplicitMultiplication => {
                let op_span = lhs.span().end..rhs.span().start;
                Ok(Expr::Binary(Binary {
                    lhs: Box::new(lhs),
                    op: BinOp {
                        kind: BinOpKind::Mul,
                        implicit: true,
                        span: op_span,
                    },
                    rhs: Box::new(rhs),
                    span: start_span..end_span,
                }))
            },
            BinOpExt::Equation(_) => Ok(Expr::Equation(Equation {
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                span: start_span..end_span,
            })),
        }
    }

    /// Parses a full expression by precedence climbing, starting with the given left-hand side.
    /// Only operators with at least the given precedence are consumed.
    pub fn parse_expr(
        input: &mut Parser,
        mut lhs: Expr,
        precedence: Precedence,
    ) -> Result<Expr, Error> {
        loop {
            let mut input_ahead = input.clone();
            if let Ok(op) = input_ahead.try_parse_then::<BinOp, _>(|bin_op, input| {
                if bin_op.precedence() >= precedence {
                    Ok(())
                } else {
                    Err(input.error(kind::NonFatal))
                }
            }) {
                input.set_cursor(&input_ahead);
                let rhs = match crate::parser::ast::unary::Unary::parse_or_lower(input) {
                    Ok(rhs) => rhs,
                    Err(err) if err.fatal => return Err(err),
                    Err(_) => return Err(Error::new(vec![op.span.clone()], kind::MissingOperand)),
                };
                lhs = Self::complete_rhs(input, lhs, op.into(), rhs)?;
            } else if Precedence::Equation >= precedence && input_ahead.try_parse::<Equals>().is_ok() {
                let equals_span = input_ahead.prev_token().map(|token| token.span.clone()).unwrap_or(0..0);
                input.set_cursor(&input_ahead);
                let rhs = match crate::parser::ast::unary::Unary::parse_or_lower(input) {
                    Ok(rhs) => rhs,
                    Err(err) if err.fatal => return Err(err),
                    Err(_) => return Err(Error::new(vec![equals_span], kind::MissingOperand)),
                };
                lhs = Self::complete_rhs(input, lhs, BinOpExt::Equation(equals_span), rhs)?;
            } else if BinOpKind::Mul.precedence() >= precedence {
                // implicit multiplication test
                //
                // ensure that we get here because there is *no* operator, not because the
                // operator has lower precedence
                if input_ahead.try_parse_then::<BinOp, _>(|op, input| {
                    if op.precedence() > BinOpKind::Mul.precedence() {
                        Err(input.error(kind::NonFatal))
                    } else {
                        Ok(())
                    }
                }).is_ok() {
                    break;
                }

                if tensor_bracket_adjacency(input) {
                    break;
                }

                // if there is no expression, there is no implicit multiplication and all our
                // attempts to parse a binary expression fail
                let rhs = match crate::parser::ast::unary::Unary::parse_or_lower(input) {
                    Ok(rhs) => rhs,
                    Err(err) if err.fatal => return Err(err),
                    Err(_) => break,
                };
                lhs = Self::complete_rhs(input, lhs, BinOpExt::ImplicitMultiplication, rhs)?;
            } else {
                break;
            }
        }

        Ok(lhs)
    }
}

impl Parse for Binary {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        match input.try_parse::<Expr>()? {
            Expr::Binary(binary) => Ok(binary),
            _ => Err(input.error(kind::NonFatal)),
        }
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.op.implicit {
            write!(f, "{}{}", self.lhs, self.rhs)
        } else {
            write!(f, "{} {} {}", self.lhs, self.op.kind, self.rhs)
        }
    }
}
