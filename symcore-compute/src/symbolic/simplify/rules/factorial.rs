//! Factorial / gamma normalization.
//!
//! The canonical form of a symbolic factorial is `gamma(u + 1)`; literal gamma values fold back
//! into factorials opportunistically (see
//! [`fold_call`](crate::symbolic::simplify::rules::fold::fold_call)).

use crate::symbolic::{
    expr::Expr,
    simplify::{rules::do_call, step::Step},
    step_collector::StepCollector,
};

/// `factorial(u) = gamma(u + 1)` for non-literal `u`.
///
/// Literal factorials are folded to numbers before this rule runs, so only symbolic arguments
/// reach it.
pub fn factorial_to_gamma(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_call(expr, "factorial", |args| {
        let [arg] = args else { return None };
        if arg.is_number() {
            // a literal the folder declined (negative or fractional); leave it alone
            return None;
        }

        Some(Expr::call("gamma", arg.clone() + Expr::one()))
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::FactorialGamma);
    Some(opt)
}

/// Applies all factorial rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    factorial_to_gamma(expr, step_collector)
}
