use crate::{
    parser::{
        ast::expr::Expr,
        error::{kind, Error},
        token::{CloseSquare, OpenSquare},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A tensor literal, such as `[1, 2, 3]` or `[[1, 2][3, 4]]`.
///
/// Elements are separated by commas; inside a tensor literal, an adjacent `][` pair also
/// separates elements, so matrices can be written row by row without commas between the rows.
/// Tensors nest arbitrarily; the calculus engines treat them as opaque, but the simplifier
/// recurses into the elements.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tensor {
    /// The elements of the tensor.
    pub elements: Vec<Expr>,

    /// The region of the source code that this tensor was parsed from.
    pub span: Range<usize>,
}

impl Tensor {
    /// Returns the span of the tensor literal.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }
}

impl Parse for Tensor {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let open = input.try_parse::<OpenSquare>()?;
        let mut elements = Vec::new();

        loop {
            let element = match input.try_parse::<Expr>() {
                Ok(element) => element,
                Err(err) if err.fatal || elements.is_empty() => return Err(err),
                Err(_) => return Err(Error::new_fatal(
                    vec![open.span.clone()],
                    kind::UnmatchedBracket,
                )),
            };
            elements.push(element);

            match input.peek_token().map(|token| token.kind) {
                Some(TokenKind::Comma) => {
                    let _ = input.next_token();
                },
                // `][` acts as an element separator: the next element starts immediately
                Some(TokenKind::OpenSquare) => continue,
                Some(TokenKind::CloseSquare) => {
                    let close = input.next_token()?;
                    return Ok(Self {
                        elements,
                        span: open.span.start..close.span.end,
                    });
                },
                _ => return Err(Error::new_fatal(
                    vec![open.span.clone()],
                    kind::UnmatchedBracket,
                )),
            }
        }
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[")?;
        let mut iter = self.elements.iter();
        if let Some(element) = iter.next() {
            write!(f, "{}", element)?;
            for element in iter {
                write!(f, ", {}", element)?;
            }
        }
        write!(f, "]")
    }
}
