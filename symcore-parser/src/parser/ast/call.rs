use crate::{
    parser::{
        ast::{expr::Expr, literal::LitSym},
        error::{kind, Error},
        token::{CloseParen, OpenParen},
        Parse,
        Parser,
    },
    tokenizer::TokenKind,
};
use std::{fmt, ops::Range};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A function call, such as `sin(x)` or `max(1, x)`.
///
/// Any identifier immediately followed by an opening parenthesis is parsed as a call; function
/// names are never substituted from the constant table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Call {
    /// The name of the function being called.
    pub name: LitSym,

    /// The arguments to the function.
    pub args: Vec<Expr>,

    /// The region of the source code that this call was parsed from.
    pub span: Range<usize>,

    /// The span of the parentheses enclosing the arguments.
    pub paren_span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses the parenthesized argument list following the function name. Shared with the
    /// sugared forms, which build their own [`Call`]s.
    pub(crate) fn parse_args(input: &mut Parser) -> Result<(Vec<Expr>, Range<usize>), Error> {
        let open_paren = input.try_parse::<OpenParen>()?;

        let args = if input.peek_token().map(|token| token.kind) == Some(TokenKind::CloseParen) {
            Vec::new()
        } else {
            input.try_parse_delimited::<Expr>(TokenKind::Comma)?
        };

        let close_paren = input.try_parse::<CloseParen>().map_err(|_| Error::new_fatal(
            vec![open_paren.span.clone()],
            kind::UnmatchedParen { opening: true },
        ))?;

        Ok((args, open_paren.span.start..close_paren.span.end))
    }
}

impl Parse for Call {
    fn parse(input: &mut Parser) -> Result<Self, Error> {
        let name: LitSym = {
            // read the name from the raw token so that constant substitution cannot swallow a
            // function name
            let token = input.next_token()?;
            if token.kind != TokenKind::Name {
                return Err(Error::new(vec![token.span], kind::UnexpectedToken {
                    expected: &[TokenKind::Name],
                    found: token.kind,
                }));
            }
            LitSym { name: token.lexeme.to_owned(), span: token.span }
        };

        let (args, paren_span) = Self::parse_args(input)?;
        let span = name.span.start..paren_span.end;

        Ok(Self {
            name,
            args,
            span,
            paren_span,
        })
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        let mut iter = self.args.iter();
        if let Some(arg) = iter.next() {
            write!(f, "{}", arg)?;
            for arg in iter {
                write!(f, ", {}", arg)?;
            }
        }
        write!(f, ")")
    }
}
