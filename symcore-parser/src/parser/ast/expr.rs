use crate::{
    parser::{
        ast::{
            binary::Binary,
            call::Call,
            equation::Equation,
            literal::Literal,
            paren::Paren,
            sugar::{DerivativeSugar, IntegralSugar, SqrtSugar},
            tensor::Tensor,
            unary::Unary,
        },
        error::{kind, Error},
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
    return_if_ok,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents any kind of expression.
///
/// An expression is any valid piece of input that can be evaluated to produce a value. The
/// parser produces exactly one [`Expr`] for a full input line; the compute layer converts it
/// into the flattened symbolic representation before doing any algebra on it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression, such as `(1 + 2)`.
    Paren(Paren),

    /// A function call, such as `sin(x)`. The sugared derivative and integral notations also
    /// desugar into calls.
    Call(Call),

    /// A unary operation, such as `-1` or `3!`.
    Unary(Unary),

    /// A binary operation, such as `1 + 2`.
    Binary(Binary),

    /// A tensor literal, such as `[1, 2, 3]`.
    Tensor(Tensor),

    /// An equation, such as `y = 2x + 1`.
    Equation(Equation),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Call(call) => call.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Binary(binary) => binary.span(),
            Expr::Tensor(tensor) => tensor.span(),
            Expr::Equation(equation) => equation.span(),
        }
    }

    /// If this expression is a [`Expr::Paren`], returns the innermost expression in the
    /// parenthesized expression. Otherwise, returns `self`.
    pub fn innermost(&self) -> &Expr {
        let mut inner = self;
        while let Expr::Paren(paren) = inner {
            inner = &paren.expr;
        }
        inner
    }
}

impl Parse for Expr {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        input.descend()?;
        let result = (|| {
            let lhs = Unary::parse_or_lower(input)?;
            Binary::parse_expr(input, lhs, Precedence::Any)
        })();
        input.ascend();
        result
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Call(call) => call.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
            Expr::Tensor(tensor) => tensor.fmt(f),
            Expr::Equation(equation) => equation.fmt(f),
        }
    }
}

/// Represents a primary expression: a self-contained expression that needs no precedence
/// context to parse.
///
/// A primary is either an [`Atom`], or one of the call-like forms that begin with an identifier
/// or a sugar token. The call-like forms are tried first, because a literal symbol followed by
/// `(` must parse as a function call rather than as implicit multiplication.
#[derive(Debug, Clone, PartialEq)]
pub enum Primary {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression.
    Paren(Paren),

    /// A function call (including the desugared derivative / integral notations).
    Call(Call),

    /// A tensor literal.
    Tensor(Tensor),
}

impl Parse for Primary {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let _ = return_if_ok!(input.try_parse_with_fn(DerivativeSugar::parse).map(Self::Call));
        let _ = return_if_ok!(input.try_parse_with_fn(IntegralSugar::parse).map(Self::Call));
        let _ = return_if_ok!(input.try_parse_with_fn(SqrtSugar::parse).map(Self::Call));
        let _ = return_if_ok!(input.try_parse::<Call>().map(Self::Call));
        input.try_parse::<Atom>().map(Primary::from)
    }
}

impl From<Atom> for Primary {
    fn from(atom: Atom) -> Self {
        match atom {
            Atom::Literal(literal) => Self::Literal(literal),
            Atom::Paren(paren) => Self::Paren(paren),
            Atom::Tensor(tensor) => Self::Tensor(tensor),
        }
    }
}

impl From<Primary> for Expr {
    fn from(primary: Primary) -> Self {
        match primary {
            Primary::Literal(literal) => Self::Literal(literal),
            Primary::Paren(paren) => Self::Paren(paren),
            Primary::Call(call) => Self::Call(call),
            Primary::Tensor(tensor) => Self::Tensor(tensor),
        }
    }
}

/// Represents an atom expression: the simplest kind of expression, entirely unambiguous to
/// parse from its first token.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    /// A literal value.
    Literal(Literal),

    /// A parenthesized expression.
    Paren(Paren),

    /// A tensor literal.
    Tensor(Tensor),
}

impl Parse for Atom {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        // reject tokens that can never begin an atom with a precise error before trying the
        // alternatives
        match input.peek_token() {
            Some(token) if token.kind == TokenKind::Symbol => {
                let character = token.lexeme.chars().next().unwrap_or('\u{fffd}');
                let span = token.span.clone();
                return Err(Error::new_fatal(vec![span], kind::UnknownCharacter { character }));
            },
            Some(token) if token.kind == TokenKind::CloseParen => {
                return Err(Error::new(
                    vec![token.span.clone()],
                    kind::UnmatchedParen { opening: false },
                ));
            },
            _ => {},
        }

        let _ = return_if_ok!(input.try_parse().map(Self::Literal));
        let _ = return_if_ok!(input.try_parse().map(Self::Paren));
        input.try_parse().map(Self::Tensor)
    }
}
