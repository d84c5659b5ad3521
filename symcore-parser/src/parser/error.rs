//! Error kinds produced while parsing.
//!
//! Every kind carries a stable key of the form `parse(...)` so hosts can map kinds to their own
//! message strings; see [`symcore_error::MessageSource`].

pub use symcore_error::Error;

/// The error kinds themselves.
pub mod kind {
    use ariadne::Fmt;
    use symcore_attrs::ErrorKind;
    use symcore_error::{ErrorKind, EXPR};
    use crate::tokenizer::TokenKind;

    /// An intentionally useless error. This should only be used for non-fatal errors, as it
    /// contains no useful information.
    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        kind = "parse(non_fatal)",
        message = "an internal non-fatal error occurred while parsing",
        labels = ["here"],
        help = "you should never see this error; please report this as a bug"
    )]
    pub struct NonFatal;

    /// The end of the source code was reached unexpectedly.
    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        kind = "parse(unexpected_eof)",
        message = "unexpected end of input",
        labels = [format!("you might need to add another {} here", "expression".fg(EXPR))],
    )]
    pub struct UnexpectedEof;

    /// The end of the source code was expected, but something else was found.
    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        kind = "parse(expected_eof)",
        message = "expected end of input",
        labels = [format!("I could not understand the remaining {} here", "expression".fg(EXPR))],
    )]
    pub struct ExpectedEof;

    /// An unexpected token was encountered.
    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        kind = "parse(unexpected_token)",
        message = "unexpected token",
        labels = [format!("expected one of: {}", expected.iter().map(|t| format!("{:?}", t)).collect::<Vec<_>>().join(", "))],
        help = format!("found {:?}", found),
    )]
    pub struct UnexpectedToken {
        /// The token(s) that were expected.
        pub expected: &'static [TokenKind],

        /// The token that was found.
        pub found: TokenKind,
    }

    /// A parenthesis was not closed.
    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        kind = "parse(unmatched_paren)",
        message = "unmatched parenthesis",
        labels = [if *opening {
            "this parenthesis is not closed"
        } else {
            "this parenthesis has no opening partner"
        }],
        help = if *opening {
            "add a closing parenthesis `)` somewhere after this"
        } else {
            "add an opening parenthesis `(` somewhere before this"
        },
    )]
    pub struct UnmatchedParen {
        /// Whether the parenthesis was an opening parenthesis `(`. Otherwise, the parenthesis
        /// was a closing parenthesis `)`.
        pub opening: bool,
    }

    /// There was no expression inside a pair of parentheses.
    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        kind = "parse(empty_paren)",
        message = "missing expression inside parentheses",
        labels = ["add an expression here"],
    )]
    pub struct EmptyParen;

    /// A square bracket was not closed.
    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        kind = "parse(unmatched_bracket)",
        message = "unmatched square bracket",
        labels = ["this bracket is not closed"],
        help = "add a closing bracket `]` somewhere after this",
    )]
    pub struct UnmatchedBracket;

    /// An operator is missing an operand, as in `1 +`.
    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        kind = "parse(missing_operand)",
        message = "operator is missing an operand",
        labels = [format!("this operator needs an {} after it", "operand".fg(EXPR))],
    )]
    pub struct MissingOperand;

    /// A number literal was malformed, such as `1.2.3`.
    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        kind = "parse(invalid_number)",
        message = "invalid number literal",
        labels = ["this is not a valid number"],
        help = "numbers contain at most one decimal point",
    )]
    pub struct InvalidNumber;

    /// The input contained a character that is not part of the grammar.
    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        kind = "parse(unknown_character)",
        message = format!("unknown character: `{}`", character),
        labels = ["here"],
    )]
    pub struct UnknownCharacter {
        /// The offending character.
        pub character: char,
    }

    /// The input nested too deeply to parse.
    #[derive(Debug, Clone, ErrorKind, PartialEq)]
    #[error(
        kind = "parse(recursion_limit)",
        message = "expression is nested too deeply",
        labels = ["nesting depth exceeded here"],
        help = "flatten the expression by removing redundant parentheses",
    )]
    pub struct RecursionLimit;
}
