//! Exact constant folding.
//!
//! These rules collapse arithmetic between literal numbers through the exact numeric tower, and
//! apply the literal power identities. They fire before every other rule group, and they are the
//! only rules the parser's single-step normalization pass runs.

use crate::num::Num;
use crate::symbolic::{
    expr::Expr,
    simplify::{rules::{do_add, do_multiply, do_power}, step::Step},
    step_collector::StepCollector,
};

/// Folds the literal number terms of a sum into one number.
pub fn fold_add(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let numbers = terms.iter().filter(|term| term.is_number()).count();
        if numbers < 2 {
            return None;
        }

        let mut sum = Num::zero();
        let mut rest = Vec::with_capacity(terms.len() - numbers + 1);
        for term in terms {
            match term.as_number() {
                Some(num) => sum = sum + num.clone(),
                None => rest.push(term.clone()),
            }
        }

        rest.insert(0, Expr::Number(sum));
        Some(Expr::Add(rest).downgrade())
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::FoldConstants);
    Some(opt)
}

/// Folds the literal number factors of a product into one number.
pub fn fold_mul(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        let numbers = factors.iter().filter(|factor| factor.is_number()).count();
        if numbers < 2 {
            return None;
        }

        let mut product = Num::one();
        let mut rest = Vec::with_capacity(factors.len() - numbers + 1);
        for factor in factors {
            match factor.as_number() {
                Some(num) => product = product * num.clone(),
                None => rest.push(factor.clone()),
            }
        }

        rest.insert(0, Expr::Number(product));
        Some(Expr::Mul(rest).downgrade())
    })?;

    step_collector.push(Step::FoldConstants);
    Some(opt)
}

/// Folds literal differences and negations. These normally only appear in freshly parsed trees,
/// before canonicalization rewrites them away.
pub fn fold_sub_neg(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = match expr {
        Expr::Sub(lhs, rhs) => {
            let (lhs, rhs) = (lhs.as_number()?, rhs.as_number()?);
            Some(Expr::Number(lhs.clone() - rhs.clone()))
        },
        Expr::Neg(inner) => {
            let num = inner.as_number()?;
            Some(Expr::Number(-num.clone()))
        },
        _ => None,
    }?;

    step_collector.push(Step::FoldConstants);
    Some(opt)
}

/// Folds quotients: a literal quotient collapses to an exact rational, `0 / x = 0`, `x / 1 = x`,
/// and a division by a literal number becomes multiplication by its exact reciprocal.
///
/// A division by an exact literal zero is left untouched: the simplifier is total and must not
/// raise, so surfacing the error is the numeric evaluator's job.
pub fn fold_div(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = {
        if let Expr::Div(lhs, rhs) = expr {
            if let Expr::Div(inner_lhs, inner_rhs) = &**lhs {
                // (a/b)/c = a/(b*c)
                Some(Expr::Div(
                    inner_lhs.clone(),
                    Box::new((**inner_rhs).clone() * (**rhs).clone()),
                ))
            } else if let Expr::Div(inner_lhs, inner_rhs) = &**rhs {
                // a/(b/c) = (a*c)/b
                Some(Expr::Div(
                    Box::new((**lhs).clone() * (**inner_rhs).clone()),
                    inner_lhs.clone(),
                ))
            } else if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
                a.clone().checked_div(b.clone()).map(Expr::Number)
            } else if lhs.is_zero() && !rhs.is_number() {
                Some(Expr::zero())
            } else if rhs.is_one() {
                Some((**lhs).clone())
            } else if let Some(b) = rhs.as_number() {
                // x / c = (1/c) x, exactly
                Num::one()
                    .checked_div(b.clone())
                    .map(|recip| Expr::Number(recip) * (**lhs).clone())
            } else {
                None
            }
        } else {
            None
        }
    }?;

    step_collector.push(Step::FoldConstants);
    Some(opt)
}

/// The literal power identities: `x^0 = 1` (including the documented `0^0 = 1` fallback),
/// `x^1 = x`, `1^x = 1`, `0^x = 0`, plus exact evaluation of literal powers.
///
/// An exact base with a fractional exponent is deliberately **not** folded: `2^(1/2)` stays
/// symbolic rather than silently degrading to a float.
pub fn fold_pow(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |base, exp| {
        if let Some(exp_num) = exp.as_number() {
            if exp_num.is_zero() {
                return Some(Expr::one());
            }
            if exp_num.is_one() {
                return Some(base.clone());
            }
        }

        if let Some(base_num) = base.as_number() {
            if base_num.is_one() {
                return Some(Expr::one());
            }
            if base_num.is_zero() {
                // 0^x = 0, for positive literal or symbolic exponents
                let positive = exp.as_number().map(|n| !n.is_negative()).unwrap_or(true);
                if positive {
                    return Some(Expr::zero());
                }
                return None;
            }
            if let Some(exp_num) = exp.as_number() {
                return base_num.clone().checked_pow(exp_num.clone()).map(Expr::Number);
            }
        }

        None
    })?;

    step_collector.push(Step::PowerIdentity);
    Some(opt)
}

/// Folds function calls of literal arguments: `factorial`, `gamma`, `abs`, `sqrt` of perfect
/// squares, and the exact zero-argument values of the elementary functions.
pub fn fold_call(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = {
        if let Expr::Call(name, args) = expr {
            match (name.as_str(), args.as_slice()) {
                ("factorial", [arg]) => arg.as_number().and_then(Num::checked_factorial).map(Expr::Number),
                ("gamma", [Expr::Number(Num::Integer(n))]) if *n >= 1 => {
                    Num::Integer(n.clone() - 1).checked_factorial().map(Expr::Number)
                },
                ("abs", [arg]) => arg.as_number().map(|num| Expr::Number(num.clone().abs())),
                ("sqrt", [Expr::Number(Num::Integer(n))]) if *n >= 0 && n.is_perfect_square() => {
                    Some(Expr::Number(Num::Integer(n.clone().sqrt())))
                },
                ("sin" | "tan" | "sinh" | "tanh" | "asin" | "atan", [arg]) if arg.is_zero() => {
                    Some(Expr::zero())
                },
                ("cos" | "cosh" | "exp", [arg]) if arg.is_zero() => Some(Expr::one()),
                ("ln" | "log", [arg]) if arg.is_one() => Some(Expr::zero()),
                ("ln", [arg]) if is_e(arg) => Some(Expr::one()),
                _ => None,
            }
        } else {
            None
        }
    }?;

    step_collector.push(Step::FoldConstants);
    Some(opt)
}

/// An integral whose integrand is constant with respect to the integration variable folds to
/// `c * x`.
pub fn fold_integral(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = {
        if let Expr::Integral(integrand, var) = expr {
            if integrand.is_constant_wrt(var) {
                Some((**integrand).clone() * Expr::symbol(var.clone()))
            } else {
                None
            }
        } else {
            None
        }
    }?;

    step_collector.push(Step::FoldConstants);
    Some(opt)
}

/// Returns true if the expression denotes Euler's number.
pub(crate) fn is_e(expr: &Expr) -> bool {
    match expr {
        Expr::Symbol(name) => name == "e",
        Expr::Constant { name, .. } => name == "e",
        _ => false,
    }
}

/// Applies all constant-folding rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    fold_add(expr, step_collector)
        .or_else(|| fold_mul(expr, step_collector))
        .or_else(|| fold_sub_neg(expr, step_collector))
        .or_else(|| fold_div(expr, step_collector))
        .or_else(|| fold_pow(expr, step_collector))
        .or_else(|| fold_call(expr, step_collector))
        .or_else(|| fold_integral(expr, step_collector))
}
