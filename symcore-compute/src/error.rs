//! Error types for the symbolic engines.
//!
//! Unlike parse errors, these errors carry no source spans (the symbolic tree has none), so they
//! are plain enums. Each exposes a stable kind key through [`kind`](DiffError::kind) that hosts
//! can map to their own message strings; see [`symcore_error::MessageSource`].

use thiserror::Error;

/// An error that occurred while differentiating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiffError {
    /// The expression contains a node kind the differentiation engine does not operate on, such
    /// as an equation or a tensor.
    #[error("cannot differentiate {node} nodes")]
    UnimplementedNode {
        /// The name of the offending node kind.
        node: &'static str,
    },

    /// The expression nested too deeply to differentiate.
    #[error("expression is nested too deeply to differentiate")]
    RecursionLimit,
}

impl DiffError {
    /// The stable machine-readable key for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnimplementedNode { .. } => "diff(unimplemented_node)",
            Self::RecursionLimit => "diff(recursion_limit)",
        }
    }
}

/// An error that occurred while numerically evaluating an expression.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A variable had no binding.
    #[error("the variable `{name}` is not bound to a value")]
    UnboundVariable {
        /// The name of the unbound variable.
        name: String,
    },

    /// A function name was not present in the registry.
    #[error("unknown function `{name}`{}", suggestion.as_ref().map(|s| format!("; did you mean `{s}`?")).unwrap_or_default())]
    UnknownFunction {
        /// The name of the unknown function.
        name: String,

        /// The closest registered function name, if any is close enough.
        suggestion: Option<String>,
    },

    /// A function was called with the wrong number of arguments.
    #[error("`{name}` expects {expected} argument(s), found {found}")]
    BadArity {
        /// The name of the function.
        name: &'static str,

        /// The number of arguments the function expects.
        expected: usize,

        /// The number of arguments the function was called with.
        found: usize,
    },

    /// Division by an exact zero.
    #[error("cannot divide by zero")]
    DivideByZero,

    /// The argument of a function was outside its domain, such as `factorial(-1)`.
    #[error("`{name}` is not defined for this argument")]
    OutOfDomain {
        /// The name of the function.
        name: &'static str,
    },

    /// A tensor appeared where a scalar number was required.
    #[error("a tensor cannot be evaluated to a single number")]
    NonNumericTensor,

    /// The expression contains a node that has no numeric value, such as an unevaluated
    /// integral.
    #[error("cannot numerically evaluate {node} nodes")]
    UnsupportedNode {
        /// The name of the offending node kind.
        node: &'static str,
    },
}

impl EvalError {
    /// The stable machine-readable key for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnboundVariable { .. } => "eval(unbound_variable)",
            Self::UnknownFunction { .. } => "eval(unknown_function)",
            Self::BadArity { .. } => "eval(bad_arity)",
            Self::DivideByZero => "eval(divide_by_zero)",
            Self::OutOfDomain { .. } => "eval(out_of_domain)",
            Self::NonNumericTensor => "eval(non_numeric_tensor)",
            Self::UnsupportedNode { .. } => "eval(unsupported_node)",
        }
    }
}
