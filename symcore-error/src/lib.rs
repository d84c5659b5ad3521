//! Contains the common [`ErrorKind`] trait used by all errors to display user-facing error
//! messages.
//!
//! Every error kind carries a **stable key** (e.g. `parse(unmatched_paren)`) that identifies it
//! machine-readably. Human-readable replacement messages can be supplied by the host application
//! through a [`MessageSource`]; when no message is registered for a key, the bare key itself is
//! used, so the engine functions correctly without any table at all.

use ariadne::{Color, Report};
use std::{fmt::Debug, ops::Range};

/// The color to use to highlight expressions.
pub const EXPR: Color = Color::RGB(52, 235, 152);

/// Represents any kind of error that can occur during some operation.
pub trait ErrorKind: Debug + Send {
    /// The stable machine-readable key identifying this error kind, such as
    /// `parse(unmatched_paren)`.
    fn kind(&self) -> &'static str;

    /// Builds the report for this error.
    fn build_report<'a>(
        &self,
        src_id: &'a str,
        spans: &[Range<usize>],
    ) -> Report<(&'a str, Range<usize>)>;
}

/// An error associated with regions of source code that can be highlighted.
#[derive(Debug)]
pub struct Error {
    /// The regions of the source code that this error originated from.
    pub spans: Vec<Range<usize>>,

    /// The kind of error that occurred.
    pub kind: Box<dyn ErrorKind>,

    /// Whether the error is fatal. A speculative parser backtracks on non-fatal errors and tries
    /// other alternatives; a fatal error aborts parsing immediately.
    pub fatal: bool,
}

impl Error {
    /// Creates a new non-fatal error with the given spans and kind.
    pub fn new(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind), fatal: false }
    }

    /// Creates a new fatal error with the given spans and kind.
    pub fn new_fatal(spans: Vec<Range<usize>>, kind: impl ErrorKind + 'static) -> Self {
        Self { spans, kind: Box::new(kind), fatal: true }
    }

    /// The stable key of the contained error kind.
    pub fn kind_key(&self) -> &'static str {
        self.kind.kind()
    }

    /// Build a report from this error kind.
    pub fn build_report<'a>(&self, src_id: &'a str) -> Report<(&'a str, Range<usize>)> {
        self.kind.build_report(src_id, &self.spans)
    }
}

/// A lookup from stable error-kind keys to human-readable messages.
///
/// The host application (which owns localization, tone, and the "personality" of its error
/// strings) implements this trait. The engine never stores the table; it is passed in at the
/// call sites that need to render a message.
pub trait MessageSource {
    /// Returns the message registered for the given kind key, if any.
    fn message(&self, key: &str) -> Option<&str>;
}

/// A [`MessageSource`] with no entries. Every lookup falls back to the bare key.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMessages;

impl MessageSource for NoMessages {
    fn message(&self, _key: &str) -> Option<&str> {
        None
    }
}

/// Resolves the human-readable message for a kind key, falling back to the bare key when the
/// source has no entry for it.
pub fn resolve_message<'a>(source: &'a dyn MessageSource, key: &'a str) -> &'a str {
    source.message(key).unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Table(HashMap<&'static str, &'static str>);

    impl MessageSource for Table {
        fn message(&self, key: &str) -> Option<&str> {
            self.0.get(key).copied()
        }
    }

    #[test]
    fn missing_table_falls_back_to_key() {
        assert_eq!(resolve_message(&NoMessages, "parse(unmatched_paren)"), "parse(unmatched_paren)");
    }

    #[test]
    fn table_lookup() {
        let table = Table([("eval(divide_by_zero)", "cannot divide by zero")].into_iter().collect());
        assert_eq!(resolve_message(&table, "eval(divide_by_zero)"), "cannot divide by zero");
        assert_eq!(resolve_message(&table, "parse(unexpected_eof)"), "parse(unexpected_eof)");
    }
}
