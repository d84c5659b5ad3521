//! Logarithm and exponential identities.

use crate::symbolic::{
    expr::Expr,
    simplify::{rules::{do_call, do_power, fold::is_e}, step::Step},
    step_collector::StepCollector,
};

/// `ln(e^x) = x`
/// `ln(exp(x)) = x`
pub fn ln_of_exp(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_call(expr, "ln", |args| {
        let [arg] = args else { return None };
        match arg {
            Expr::Call(name, inner) if name == "exp" && inner.len() == 1 => {
                Some(inner[0].clone())
            },
            Expr::Pow(base, exp) if is_e(base) => Some((**exp).clone()),
            _ => None,
        }
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::LogExpIdentity);
    Some(opt)
}

/// `exp(ln(x)) = x`
/// `e^(ln(x)) = x`
pub fn exp_of_ln(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = {
        let as_ln = |arg: &Expr| match arg {
            Expr::Call(name, inner) if name == "ln" && inner.len() == 1 => Some(inner[0].clone()),
            _ => None,
        };

        do_call(expr, "exp", |args| {
            let [arg] = args else { return None };
            as_ln(arg)
        })
        .or_else(|| do_power(expr, |base, exp| {
            if is_e(base) {
                as_ln(exp)
            } else {
                None
            }
        }))
    }?;

    step_collector.push(Step::LogExpIdentity);
    Some(opt)
}

/// `log(x*y) = log(x) + log(y)`, for both `ln` and `log`.
pub fn log_of_product(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = {
        let split = |name: &str, args: &[Expr]| {
            let [Expr::Mul(factors)] = args else { return None };
            Some(Expr::Add(
                factors.iter()
                    .map(|factor| Expr::call(name, factor.clone()))
                    .collect(),
            ))
        };

        do_call(expr, "ln", |args| split("ln", args))
            .or_else(|| do_call(expr, "log", |args| split("log", args)))
    }?;

    step_collector.push(Step::LogExpIdentity);
    Some(opt)
}

/// `log(x^a) = a * log(x)`, for both `ln` and `log`.
pub fn log_of_power(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = {
        let split = |name: &str, args: &[Expr]| {
            let [Expr::Pow(base, exp)] = args else { return None };
            Some((**exp).clone() * Expr::call(name, (**base).clone()))
        };

        do_call(expr, "ln", |args| split("ln", args))
            .or_else(|| do_call(expr, "log", |args| split("log", args)))
    }?;

    step_collector.push(Step::LogExpIdentity);
    Some(opt)
}

/// Applies all logarithm / exponential rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    ln_of_exp(expr, step_collector)
        .or_else(|| exp_of_ln(expr, step_collector))
        .or_else(|| log_of_product(expr, step_collector))
        .or_else(|| log_of_power(expr, step_collector))
}
