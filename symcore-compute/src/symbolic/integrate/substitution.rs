//! u-substitution: recognizing an inner function and its derivative as product factors.
//!
//! Two patterns are detected. The direct chain match `f(g(x)) * k * g'(x)` integrates to
//! `k * F(g(x))` when `F` is a known antiderivative of `f`; the power-rule-in-disguise match
//! `g(x)^n * k * g'(x)` integrates to `k * g^(n+1)/(n+1)`, with the `n = -1` case producing
//! `k * ln|g|`. In both cases the candidate is verified by symbolically dividing the remaining
//! factors by the computed `g'(x)` and checking that the quotient is constant in the variable.

use crate::num::Num;
use crate::symbolic::derivative::derivative_raw;
use crate::symbolic::expr::Expr;
use crate::symbolic::simplify::{rules::multiply::base_and_exponent, simplify};

/// The antiderivative `F(u)` of the outer function `f(u)`, for the functions the chain match
/// understands.
fn outer_antiderivative(name: &str, u: Expr) -> Option<Expr> {
    Some(match name {
        "sin" => -Expr::call("cos", u),
        "cos" => Expr::call("sin", u),
        "exp" => Expr::call("exp", u),
        "tan" => -Expr::call("ln", Expr::call("abs", Expr::call("cos", u))),
        "sinh" => Expr::call("cosh", u),
        "cosh" => Expr::call("sinh", u),
        _ => return None,
    })
}

/// The product of every factor except the one at `skip`.
fn remaining_factors(factors: &[Expr], skip: usize) -> Expr {
    Expr::Mul(
        factors.iter()
            .enumerate()
            .filter(|(idx, _)| *idx != skip)
            .map(|(_, factor)| factor.clone())
            .collect(),
    ).downgrade()
}

/// Divides the remaining factors by `g'` and returns the quotient if it is constant in `var`.
fn constant_quotient(rest: &Expr, g: &Expr, var: &str) -> Option<Expr> {
    let dg = derivative_raw(g, var).ok()?;
    let dg = simplify(&dg);
    if dg.is_zero() {
        return None;
    }

    let quotient = simplify(&Expr::Div(Box::new(rest.clone()), Box::new(dg)));
    quotient.is_constant_wrt(var).then_some(quotient)
}

/// Attempts both u-substitution patterns on the integrand.
pub(crate) fn u_substitution(expr: &Expr, var: &str, _depth: usize) -> Option<Expr> {
    let factors = match expr {
        Expr::Mul(factors) => factors.clone(),
        other => vec![other.clone()],
    };

    // direct chain match: f(g) * k * g'
    for (idx, factor) in factors.iter().enumerate() {
        let Expr::Call(name, args) = factor else { continue };
        let [g] = args.as_slice() else { continue };
        if g.is_constant_wrt(var) {
            continue;
        }

        let rest = remaining_factors(&factors, idx);
        if let Some(quotient) = constant_quotient(&rest, g, var) {
            if let Some(antiderivative) = outer_antiderivative(name, g.clone()) {
                return Some(quotient * antiderivative);
            }
        }
    }

    // power rule in disguise: g^n * k * g'
    for (idx, factor) in factors.iter().enumerate() {
        let (g, exp) = base_and_exponent(factor);
        if g.is_constant_wrt(var) || matches!(g, Expr::Call(..)) {
            continue;
        }
        let Some(n) = exp.as_number().cloned() else { continue };

        let rest = remaining_factors(&factors, idx);
        let Some(quotient) = constant_quotient(&rest, &g, var) else { continue };

        if n == -Num::one() {
            // the n = -1 special case: ∫ g'/g = ln|g|
            return Some(quotient * Expr::call("ln", Expr::call("abs", g)));
        }

        let next = n + Num::one();
        return Some(quotient * Expr::Div(
            Box::new(g.pow(Expr::Number(next.clone()))),
            Box::new(Expr::Number(next)),
        ));
    }

    None
}
