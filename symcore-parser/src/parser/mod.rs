pub mod ast;
pub mod error;
pub mod token;

use crate::env::Environment;
use crate::tokenizer::{tokenize_complete, Token, TokenKind};
use error::{kind, Error};
use std::ops::Range;

/// The maximum recursion depth allowed while parsing. Deeply nested input (usually a wall of
/// parentheses) fails with `parse(recursion_limit)` instead of overflowing the stack.
pub const MAX_DEPTH: usize = 50;

/// A high-level parser for mathematical expressions. This is the type to use to parse an
/// arbitrary piece of input into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// The current recursion depth, incremented by [`Parser::descend`].
    depth: usize,

    /// The constant table consulted when identifier tokens are parsed.
    env: Option<&'source Environment>,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source, with no constant substitution.
    pub fn new(source: &'source str) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
            depth: 0,
            env: None,
        }
    }

    /// Create a new parser for the given source that substitutes constants from the given
    /// environment.
    pub fn with_env(source: &'source str, env: &'source Environment) -> Self {
        Self {
            env: Some(env),
            ..Self::new(source)
        }
    }

    /// The environment this parser substitutes constants from, if any.
    pub fn env(&self) -> Option<&Environment> {
        self.env
    }

    /// Creates an error that points at the current token, or the end of the source code if the
    /// cursor is at the end of the stream.
    pub fn error(&self, kind: impl symcore_error::ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Creates a fatal error that points at the current token, or the end of the source code if
    /// the cursor is at the end of the stream. Fatal errors abort speculative parsing instead of
    /// allowing the parser to backtrack and try another alternative.
    pub fn error_fatal(&self, kind: impl symcore_error::ErrorKind + 'static) -> Error {
        Error::new_fatal(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the current token, or the end of the source code if the cursor is at
    /// the end of the stream.
    pub fn span(&self) -> Range<usize> {
        self.tokens
            .get(self.cursor)
            .map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Moves the cursor to the position of another parser's cursor. The other parser must be a
    /// clone of this parser, used for lookahead.
    pub fn set_cursor(&mut self, other: &Parser) {
        self.cursor = other.cursor;
    }

    /// Move the cursor to the previous token. This function is a no-op if the cursor is at the
    /// beginning of the stream.
    pub fn prev(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Returns the previous token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the beginning of the stream.
    pub fn prev_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor.checked_sub(1)?)
    }

    /// Returns the current token. The cursor is not moved. Returns [`None`] if the cursor is at
    /// the end of the stream.
    pub fn current_token(&self) -> Option<&Token<'source>> {
        self.tokens.get(self.cursor)
    }

    /// Returns the current token, skipping over any whitespace. The cursor is not moved past the
    /// returned token. Returns [`None`] if only whitespace remains.
    pub fn peek_token(&self) -> Option<&Token<'source>> {
        self.tokens[self.cursor..].iter().find(|token| !token.is_whitespace())
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if token.is_whitespace() {
                continue;
            } else {
                // cloning is cheap: only Range<_> is cloned
                return Ok(token.clone());
            }
        }

        Err(self.error(kind::UnexpectedEof))
    }

    /// Enters one level of recursion, failing with `parse(recursion_limit)` if the input nests
    /// too deeply. Must be paired with [`Parser::ascend`].
    pub fn descend(&mut self) -> Result<(), Error> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            Err(self.error(kind::RecursionLimit))
        } else {
            Ok(())
        }
    }

    /// Leaves one level of recursion.
    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Speculatively parses a value from the given stream of tokens. This function can be used
    /// in the [`Parse::parse`] implementation of a type with the given [`Parser`], as it will
    /// automatically backtrack the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse>(&mut self) -> Result<T, Error> {
        self.try_parse_with_fn(T::parse)
    }

    /// Speculatively parses multiple values (at least one) from the given stream of tokens, each
    /// delimited by a certain token.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// values are returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_delimited<T: Parse>(&mut self, delimiter: TokenKind) -> Result<Vec<T>, Error> {
        let start = self.cursor;
        let mut values = Vec::new();

        loop {
            match self.try_parse::<T>() {
                Ok(value) => values.push(value),
                Err(err) => {
                    if values.is_empty() {
                        self.cursor = start;
                        return Err(err);
                    } else {
                        return Ok(values);
                    }
                },
            }

            match self.peek_token() {
                Some(token) if token.kind == delimiter => {
                    let _ = self.next_token();
                },
                _ => return Ok(values),
            }
        }
    }

    /// Speculatively parses a value from the given stream of tokens, using a custom parsing
    /// function to parse the value.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse_with_fn<T, F>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Parser<'source>) -> Result<T, Error>,
    {
        let start = self.cursor;
        match f(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Speculatively parses a value from the given stream of tokens, with a validation
    /// predicate. The value must parse successfully, **and** the predicate must return [`Ok`]
    /// for this function to return successfully.
    pub fn try_parse_then<T: Parse, F>(&mut self, predicate: F) -> Result<T, Error>
    where
        F: FnOnce(&T, &Parser) -> Result<(), Error>,
    {
        let start = self.cursor;

        // closure workaround allows us to use `?` in the closure
        let compute = || {
            let value = T::parse(self)?;
            predicate(&value, self)?;
            Ok(value)
        };

        match compute() {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be
    /// consumed by the parser; if not, an error is returned.
    pub fn try_parse_full<T: Parse>(&mut self) -> Result<T, Error> {
        let value = T::parse(self)?;
        if self.tokens[self.cursor..].iter().all(|token| token.is_whitespace()) {
            Ok(value)
        } else {
            Err(self.error(kind::ExpectedEof))
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    fn parse(input: &mut Parser) -> Result<Self, Error>;
}

/// The associativity of a binary or unary operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Associativity {
    /// The binary / unary operation is left-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `(a op b) op c`. For
    /// unary operations, this means the operator appears to the right of the operand, as in
    /// `3!!`.
    Left,

    /// The binary / unary operation is right-associative.
    ///
    /// For binary operations, this means `a op b op c` is evaluated as `a op (b op c)`. For
    /// unary operations, this means the operator appears to the left of the operand, as in
    /// `--3`.
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of the equation separator (`=`).
    Equation,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`) and division (`/`), which separate factors.
    Factor,

    /// Precedence of unary subtraction (`-`).
    Neg,

    /// Precedence of exponentiation (`^`).
    Exp,

    /// Precedence of factorial (`!`).
    Factorial,
}

impl PartialOrd for Precedence {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        let left = *self as u8;
        let right = *other as u8;
        left.partial_cmp(&right)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::binary::Binary;
    use ast::call::Call;
    use ast::equation::Equation;
    use ast::expr::Expr;
    use ast::literal::{LitFloat, LitInt, LitSym, Literal};
    use ast::tensor::Tensor;
    use ast::unary::Unary;
    use token::op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};

    #[test]
    fn literal_int() {
        let mut parser = Parser::new("16");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Literal(Literal::Integer(LitInt {
            value: "16".to_string(),
            span: 0..2,
        })));
    }

    #[test]
    fn literal_float() {
        let mut parser = Parser::new("3.14");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Literal(Literal::Float(LitFloat {
            value: "3.14".to_string(),
            span: 0..4,
        })));
    }

    #[test]
    fn literal_symbol() {
        let mut parser = Parser::new("velocity");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Literal(Literal::Symbol(LitSym {
            name: "velocity".to_string(),
            span: 0..8,
        })));
    }

    #[test]
    fn binary_precedence() {
        let mut parser = Parser::new("1 + 2 * 3");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(Expr::Literal(Literal::Integer(LitInt {
                value: "1".to_string(),
                span: 0..1,
            }))),
            op: BinOp { kind: BinOpKind::Add, implicit: false, span: 2..3 },
            rhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(Expr::Literal(Literal::Integer(LitInt {
                    value: "2".to_string(),
                    span: 4..5,
                }))),
                op: BinOp { kind: BinOpKind::Mul, implicit: false, span: 6..7 },
                rhs: Box::new(Expr::Literal(Literal::Integer(LitInt {
                    value: "3".to_string(),
                    span: 8..9,
                }))),
                span: 4..9,
            })),
            span: 0..9,
        }));
    }

    #[test]
    fn exponent_right_associativity() {
        let mut parser = Parser::new("2^3^2");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        // 2^(3^2)
        let Expr::Binary(outer) = expr else { panic!("expected binary") };
        assert_eq!(outer.op.kind, BinOpKind::Exp);
        assert!(matches!(*outer.lhs, Expr::Literal(Literal::Integer(_))));
        let Expr::Binary(inner) = *outer.rhs else { panic!("expected nested binary") };
        assert_eq!(inner.op.kind, BinOpKind::Exp);
    }

    #[test]
    fn implicit_multiplication() {
        let mut parser = Parser::new("2x");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Binary(Binary {
            lhs: Box::new(Expr::Literal(Literal::Integer(LitInt {
                value: "2".to_string(),
                span: 0..1,
            }))),
            op: BinOp { kind: BinOpKind::Mul, implicit: true, span: 1..1 },
            rhs: Box::new(Expr::Literal(Literal::Symbol(LitSym {
                name: "x".to_string(),
                span: 1..2,
            }))),
            span: 0..2,
        }));
    }

    #[test]
    fn factorial_left_associativity() {
        let mut parser = Parser::new("3!!");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        assert_eq!(expr, Expr::Unary(Unary {
            operand: Box::new(Expr::Unary(Unary {
                operand: Box::new(Expr::Literal(Literal::Integer(LitInt {
                    value: "3".to_string(),
                    span: 0..1,
                }))),
                op: UnaryOp { kind: UnaryOpKind::Factorial, span: 1..2 },
                span: 0..2,
            })),
            op: UnaryOp { kind: UnaryOpKind::Factorial, span: 2..3 },
            span: 0..3,
        }));
    }

    #[test]
    fn negation_binds_below_exponent() {
        let mut parser = Parser::new("-x^2");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        // -(x^2)
        let Expr::Unary(unary) = expr else { panic!("expected unary") };
        assert_eq!(unary.op.kind, UnaryOpKind::Neg);
        assert!(matches!(*unary.operand, Expr::Binary(_)));
    }

    #[test]
    fn call_with_args() {
        let mut parser = Parser::new("max(1, x)");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        let Expr::Call(Call { name, args, .. }) = expr else { panic!("expected call") };
        assert_eq!(name.name, "max");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn equation() {
        let mut parser = Parser::new("y = 2x + 1");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        let Expr::Equation(Equation { lhs, rhs, .. }) = expr else { panic!("expected equation") };
        assert!(matches!(*lhs, Expr::Literal(Literal::Symbol(_))));
        assert!(matches!(*rhs, Expr::Binary(_)));
    }

    #[test]
    fn tensor_rows_without_commas() {
        // `][` separates elements exactly like a comma
        let mut parser = Parser::new("[[1, 2][3, 4]]");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        let Expr::Tensor(Tensor { elements, .. }) = expr else { panic!("expected tensor") };
        assert_eq!(elements.len(), 2);
        assert!(elements.iter().all(|row| matches!(row, Expr::Tensor(_))));
    }

    #[test]
    fn derivative_sugar() {
        let mut parser = Parser::new("(d/dx)(x^2)");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        let Expr::Call(Call { name, args, .. }) = expr else { panic!("expected call") };
        assert_eq!(name.name, "diff");
        assert_eq!(args.len(), 2);
        assert_eq!(args[1], Expr::Literal(Literal::Symbol(LitSym {
            name: "x".to_string(),
            span: 4..5,
        })));
    }

    #[test]
    fn integral_sugar() {
        let mut parser = Parser::new("∫(x^2, x)");
        let expr = parser.try_parse_full::<Expr>().unwrap();

        let Expr::Call(Call { name, args, .. }) = expr else { panic!("expected call") };
        assert_eq!(name.name, "int");
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn unmatched_paren() {
        let mut parser = Parser::new("(1 + 2");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(err.kind_key(), "parse(unmatched_paren)");
    }

    #[test]
    fn empty_input() {
        let mut parser = Parser::new("");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(err.kind_key(), "parse(unexpected_eof)");
    }

    #[test]
    fn unknown_character() {
        let mut parser = Parser::new("1 + $");
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(err.kind_key(), "parse(unknown_character)");
    }

    #[test]
    fn deep_nesting_fails_gracefully() {
        let source = format!("{}x{}", "(".repeat(100), ")".repeat(100));
        let mut parser = Parser::new(&source);
        let err = parser.try_parse_full::<Expr>().unwrap_err();
        assert_eq!(err.kind_key(), "parse(recursion_limit)");
    }

    #[test]
    fn constant_substitution() {
        use crate::env::Environment;

        let env = Environment::with_math_constants();
        let mut parser = Parser::with_env("2pi", &env);
        let expr = parser.try_parse_full::<Expr>().unwrap();

        let Expr::Binary(binary) = expr else { panic!("expected implicit multiplication") };
        assert!(matches!(
            *binary.rhs,
            Expr::Literal(Literal::Constant(ref lit)) if lit.name == "pi"
        ));
    }
}
