//! Rules that resolve engine calls embedded in an expression.
//!
//! The sugared notations `(d/dx)(...)` and `series(...)` parse into ordinary call nodes; these
//! rules hand them to the differentiation and series engines during simplification, so that
//! `simplify(parse("(d/dx)(x^2)"))` is `2x`. A call the engines cannot resolve stays symbolic.

use crate::symbolic::{
    derivative,
    expr::Expr,
    series,
    simplify::{rules::do_call, step::Step},
    step_collector::StepCollector,
};

/// `diff(f, x)` resolves to the derivative of `f` with respect to `x`.
pub fn resolve_derivative(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_call(expr, "diff", |args| {
        let [target, var] = args else { return None };
        let var = var.as_symbol()?;
        derivative::derivative_raw(target, var).ok()
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::ResolveEngineCall);
    Some(opt)
}

/// `series(f, x, c, n)` resolves to the order-`n` Taylor polynomial of `f` around `c`.
pub fn resolve_series(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_call(expr, "series", |args| {
        let [func, var, center, order] = args else { return None };
        let func = func.as_symbol()?;
        let center = center.as_number()?.clone();
        let order = order.as_number()?.as_integer()?.to_u32()?;
        Some(series::series_expand(func, var, center, order))
    })?;

    step_collector.push(Step::ResolveEngineCall);
    Some(opt)
}

/// Applies all engine-resolution rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    resolve_derivative(expr, step_collector)
        .or_else(|| resolve_series(expr, step_collector))
}
