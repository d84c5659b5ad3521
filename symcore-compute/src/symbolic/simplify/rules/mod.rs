//! Implementation of the simplification rules.
//!
//! Each rule in this module tree is a function that takes the expression to simplify as an
//! argument, and returns `Some(expr)` with the simplified expression if the rule applies, or
//! `None` if the rule does not apply. Each submodule groups related rules behind a module-level
//! `all` function; this module's [`all`] applies the groups in their specified order.

pub mod add;
pub mod distribute;
pub mod engine;
pub mod exp_log;
pub mod factorial;
pub mod fold;
pub mod multiply;
pub mod power;
pub mod tensor;
pub mod trigonometry;

use crate::symbolic::expr::Expr;
use crate::symbolic::step_collector::StepCollector;
use super::step::Step;

/// If the expression is a function call with the given function name, calls the given
/// transformation function with the arguments.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_call(
    expr: &Expr,
    name: &str,
    f: impl Copy + Fn(&[Expr]) -> Option<Expr>,
) -> Option<Expr> {
    if let Expr::Call(target_name, args) = expr {
        if target_name == name {
            return f(args);
        }
    }

    None
}

/// If the expression is an add expression, calls the given transformation function with the
/// terms.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_add(expr: &Expr, f: impl Copy + Fn(&[Expr]) -> Option<Expr>) -> Option<Expr> {
    if let Expr::Add(terms) = expr {
        f(terms)
    } else {
        None
    }
}

/// If the expression is a multiplication expression, calls the given transformation function
/// with the factors.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_multiply(expr: &Expr, f: impl Copy + Fn(&[Expr]) -> Option<Expr>) -> Option<Expr> {
    if let Expr::Mul(factors) = expr {
        f(factors)
    } else {
        None
    }
}

/// If the expression is a power expression, calls the given transformation function with the
/// base and exponent.
///
/// Returns `Some(expr)` with the transformed expression if a transformation was applied.
pub(crate) fn do_power(expr: &Expr, f: impl Copy + Fn(&Expr, &Expr) -> Option<Expr>) -> Option<Expr> {
    if let Expr::Pow(lhs, rhs) = expr {
        f(lhs, rhs)
    } else {
        None
    }
}

/// Applies all rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    fold::all(expr, step_collector)
        .or_else(|| engine::all(expr, step_collector))
        .or_else(|| add::all(expr, step_collector))
        .or_else(|| multiply::all(expr, step_collector))
        .or_else(|| power::all(expr, step_collector))
        .or_else(|| distribute::all(expr, step_collector))
        .or_else(|| exp_log::all(expr, step_collector))
        .or_else(|| trigonometry::all(expr, step_collector))
        .or_else(|| factorial::all(expr, step_collector))
        .or_else(|| tensor::all(expr, step_collector))
}
