//! The parse-time environment: a table of named constants and the category filter that decides
//! which of them are substituted.
//!
//! The engine never reads constants from ambient global state. Instead, the host builds an
//! [`Environment`] once and passes it to [`Parser::with_env`](crate::parser::Parser::with_env);
//! when an identifier token matches an enabled constant, the parser produces a constant literal
//! carrying the value, after tokenization but before AST construction.

use std::collections::{HashMap, HashSet};

/// A named constant known to the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDef {
    /// The value of the constant, as a decimal string. Stored as text so the parser stays
    /// independent of the numeric tower; the compute layer converts it exactly once.
    pub value: String,

    /// The category this constant belongs to, such as `math` or `physics`. Substitution only
    /// happens for enabled categories.
    pub category: String,
}

/// The set of constants available during parsing, with a category filter.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    constants: HashMap<String, ConstantDef>,

    /// Categories enabled for substitution. `None` enables every category.
    enabled: Option<HashSet<String>>,
}

impl Environment {
    /// An environment with no constants at all. Identifiers always parse as plain symbols.
    pub fn empty() -> Self {
        Self::default()
    }

    /// An environment preloaded with the standard mathematical constants `pi`, `e`, `tau` and
    /// `phi`, all in the `math` category.
    pub fn with_math_constants() -> Self {
        let mut env = Self::default();
        for (name, value) in [
            ("pi", "3.14159265358979323846264338327950288"),
            ("e", "2.71828182845904523536028747135266250"),
            ("tau", "6.28318530717958647692528676655900577"),
            ("phi", "1.61803398874989484820458683436563812"),
        ] {
            env.define(name, value, "math");
        }
        env
    }

    /// Adds (or replaces) a constant definition.
    pub fn define(&mut self, name: impl Into<String>, value: impl Into<String>, category: impl Into<String>) {
        self.constants.insert(name.into(), ConstantDef {
            value: value.into(),
            category: category.into(),
        });
    }

    /// Restricts substitution to the given categories. Constants in other categories remain in
    /// the table but parse as plain symbols.
    pub fn enable_categories<I, S>(&mut self, categories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled = Some(categories.into_iter().map(Into::into).collect());
    }

    /// Looks up a constant by name, honoring the category filter. Returns the definition only if
    /// its category is enabled.
    pub fn lookup(&self, name: &str) -> Option<&ConstantDef> {
        let def = self.constants.get(name)?;
        match &self.enabled {
            Some(categories) if !categories.contains(&def.category) => None,
            _ => Some(def),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_filter() {
        let mut env = Environment::with_math_constants();
        env.define("c", "299792458", "physics");

        assert!(env.lookup("pi").is_some());
        assert!(env.lookup("c").is_some());

        env.enable_categories(["math"]);
        assert!(env.lookup("pi").is_some());
        assert!(env.lookup("c").is_none());
    }

    #[test]
    fn unknown_name() {
        let env = Environment::with_math_constants();
        assert!(env.lookup("x").is_none());
    }
}
