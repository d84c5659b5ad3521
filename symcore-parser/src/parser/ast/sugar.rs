//! Sugared notations recognized ahead of the general grammar.
//!
//! Each form desugars into an ordinary [`Call`] node, so the rest of the pipeline never needs
//! to know about it:
//!
//! - `∫(expr, x)` becomes `int(expr, x)`;
//! - `√(expr)` becomes `sqrt(expr)`;
//! - `(d/dx)(expr)` and `(d)/(dx)(expr)` become `diff(expr, x)`.

use crate::{
    parser::{
        ast::{call::Call, expr::Expr, literal::{LitSym, Literal}, paren::Paren},
        error::Error,
        token::{CloseParen, Div, Integral, Name, OpenParen, Sqrt},
        Parser,
    },
    return_if_ok,
};
use std::ops::Range;

/// The name the integral sugar desugars to.
pub const INTEGRAL_FN: &str = "int";

/// The name the derivative sugar desugars to.
pub const DERIVATIVE_FN: &str = "diff";

/// Parses `∫(expr, x)` into `int(expr, x)`.
pub struct IntegralSugar;

impl IntegralSugar {
    pub(crate) fn parse(input: &mut Parser) -> Result<Call, Error> {
        let integral = input.try_parse::<Integral>()?;
        let (args, paren_span) = Call::parse_args(input)?;

        Ok(Call {
            name: LitSym {
                name: INTEGRAL_FN.to_string(),
                span: integral.span.clone(),
            },
            args,
            span: integral.span.start..paren_span.end,
            paren_span,
        })
    }
}

/// Parses `√(expr)` into `sqrt(expr)`.
pub struct SqrtSugar;

impl SqrtSugar {
    pub(crate) fn parse(input: &mut Parser) -> Result<Call, Error> {
        let sqrt = input.try_parse::<Sqrt>()?;
        let operand: Paren = input.try_parse()?;
        let span = sqrt.span.start..operand.span().end;
        let paren_span = operand.span();

        Ok(Call {
            name: LitSym {
                name: "sqrt".to_string(),
                span: sqrt.span,
            },
            args: vec![operand.into_innermost()],
            span,
            paren_span,
        })
    }
}

/// Parses `(d/dx)(expr)` and `(d)/(dx)(expr)` into `diff(expr, x)`.
pub struct DerivativeSugar;

impl DerivativeSugar {
    /// Parses a `Name` token whose lexeme is exactly `d`.
    fn parse_d(input: &mut Parser) -> Result<(), Error> {
        input.try_parse_then::<Name, _>(|name, input| {
            if name.lexeme == "d" {
                Ok(())
            } else {
                Err(input.error(crate::parser::error::kind::NonFatal))
            }
        })?;
        Ok(())
    }

    /// Parses a `Name` token of the form `dx`, returning the variable name `x` and its span
    /// (excluding the leading `d`).
    fn parse_dvar(input: &mut Parser) -> Result<LitSym, Error> {
        let name = input.try_parse_then::<Name, _>(|name, input| {
            if name.lexeme.len() > 1 && name.lexeme.starts_with('d') {
                Ok(())
            } else {
                Err(input.error(crate::parser::error::kind::NonFatal))
            }
        })?;

        Ok(LitSym {
            name: name.lexeme[1..].to_string(),
            span: name.span.start + 1..name.span.end,
        })
    }

    /// Parses the `(d/dx)` or `(d)/(dx)` head, returning the differentiation variable and the
    /// full span of the head.
    fn parse_head(input: &mut Parser) -> Result<(LitSym, Range<usize>), Error> {
        let _ = return_if_ok!(input.try_parse_with_fn(|input| {
            // (d/dx)
            let open = input.try_parse::<OpenParen>()?;
            Self::parse_d(input)?;
            input.try_parse::<Div>()?;
            let var = Self::parse_dvar(input)?;
            let close = input.try_parse::<CloseParen>()?;
            Ok((var, open.span.start..close.span.end))
        }));

        // (d)/(dx)
        input.try_parse_with_fn(|input| {
            let open = input.try_parse::<OpenParen>()?;
            Self::parse_d(input)?;
            input.try_parse::<CloseParen>()?;
            input.try_parse::<Div>()?;
            input.try_parse::<OpenParen>()?;
            let var = Self::parse_dvar(input)?;
            let close = input.try_parse::<CloseParen>()?;
            Ok((var, open.span.start..close.span.end))
        })
    }

    pub(crate) fn parse(input: &mut Parser) -> Result<Call, Error> {
        let (var, head_span) = Self::parse_head(input)?;
        let operand: Paren = input.try_parse()?;
        let span = head_span.start..operand.span().end;
        let paren_span = operand.span();

        Ok(Call {
            name: LitSym {
                name: DERIVATIVE_FN.to_string(),
                span: head_span,
            },
            args: vec![
                operand.into_innermost(),
                Expr::Literal(Literal::Symbol(var)),
            ],
            span,
            paren_span,
        })
    }
}
