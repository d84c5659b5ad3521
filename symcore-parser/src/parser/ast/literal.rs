use crate::{
    parser::{
        error::{kind, Error},
        token::{Float, Int, Name},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
    return_if_ok,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An integer literal, represented as a [`String`]. The compute layer converts it into an exact
/// integer, so no precision is lost here.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitInt {
    /// The value of the integer literal as a string.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitInt {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        input
            .try_parse::<Int>()
            .map(|int| Self {
                value: int.lexeme,
                span: int.span,
            })
    }
}

impl fmt::Display for LitInt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A floating-point literal, represented as a [`String`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitFloat {
    /// The value of the floating-point literal as a string.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitFloat {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let float = input.try_parse::<Float>()?;

        // a dot directly after a float lexeme means the user wrote something like `1.2.3`
        if input.current_token().map(|token| token.kind) == Some(TokenKind::Dot) {
            return Err(Error::new_fatal(
                vec![float.span.start..input.span().end],
                kind::InvalidNumber,
            ));
        }

        Ok(Self {
            value: float.lexeme,
            span: float.span,
        })
    }
}

impl fmt::Display for LitFloat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A symbol literal, such as a variable name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitSym {
    /// The name of the symbol.
    pub name: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl Parse for LitSym {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        input
            .try_parse::<Name>()
            .map(|name| Self {
                name: name.lexeme,
                span: name.span,
            })
    }
}

impl fmt::Display for LitSym {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A named constant substituted from the parse-time environment, such as `pi` or a physical
/// constant. Carries the constant's value as a decimal string.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LitConst {
    /// The name of the constant.
    pub name: String,

    /// The value of the constant, as a decimal string.
    pub value: String,

    /// The region of the source code that this literal was parsed from.
    pub span: Range<usize>,
}

impl fmt::Display for LitConst {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Represents any literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Literal {
    /// An integer, such as `2` or `144`.
    Integer(LitInt),

    /// A floating-point number, such as `3.14` or `0.5`.
    Float(LitFloat),

    /// A symbol, such as `x` or `θ`.
    Symbol(LitSym),

    /// A named constant from the environment, such as `pi`.
    Constant(LitConst),
}

impl Literal {
    /// Returns the span of the literal.
    pub fn span(&self) -> Range<usize> {
        match self {
            Literal::Integer(int) => int.span.clone(),
            Literal::Float(float) => float.span.clone(),
            Literal::Symbol(sym) => sym.span.clone(),
            Literal::Constant(constant) => constant.span.clone(),
        }
    }
}

impl Parse for Literal {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let _ = return_if_ok!(input.try_parse().map(Self::Float));
        let _ = return_if_ok!(input.try_parse().map(Self::Integer));

        let sym: LitSym = input.try_parse()?;

        // the constant table is consulted after tokenization, before the node is built; a name
        // in a disabled category stays a plain symbol
        if let Some(def) = input.env().and_then(|env| env.lookup(&sym.name)) {
            return Ok(Self::Constant(LitConst {
                name: sym.name,
                value: def.value.clone(),
                span: sym.span,
            }));
        }

        Ok(Self::Symbol(sym))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Literal::Integer(int) => int.fmt(f),
            Literal::Float(float) => float.fmt(f),
            Literal::Symbol(sym) => sym.fmt(f),
            Literal::Constant(constant) => constant.fmt(f),
        }
    }
}
