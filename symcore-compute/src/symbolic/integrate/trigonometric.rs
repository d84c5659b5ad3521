//! Closed forms for the six trigonometric functions of a linear argument, and for their
//! squares.
//!
//! The squared forms avoid the double-angle function in their antiderivatives (`sin(u)cos(u)`
//! rather than `sin(2u)/2`), so differentiating the result folds back to the integrand through
//! the Pythagorean identity alone.

use crate::symbolic::expr::Expr;
use super::match_linear;

/// Builds `expr / a`, skipping the division when the slope is 1.
fn over_slope(expr: Expr, a: &Expr) -> Expr {
    if a.is_one() {
        expr
    } else {
        Expr::Div(Box::new(expr), Box::new(a.clone()))
    }
}

/// `ln|f(u)|`
fn ln_abs(inner: Expr) -> Expr {
    Expr::call("ln", Expr::call("abs", inner))
}

/// Closed forms for `sin`, `cos`, `tan`, `cot`, `sec` and `csc` of a linear argument `a*x + b`.
fn linear_argument(name: &str, u: &Expr, a: &Expr) -> Option<Expr> {
    let result = match name {
        "sin" => -over_slope(Expr::call("cos", u.clone()), a),
        "cos" => over_slope(Expr::call("sin", u.clone()), a),
        "tan" => -over_slope(ln_abs(Expr::call("cos", u.clone())), a),
        "cot" => over_slope(ln_abs(Expr::call("sin", u.clone())), a),
        "sec" => over_slope(
            ln_abs(Expr::call("sec", u.clone()) + Expr::call("tan", u.clone())),
            a,
        ),
        "csc" => -over_slope(
            ln_abs(Expr::call("csc", u.clone()) + Expr::call("cot", u.clone())),
            a,
        ),
        _ => return None,
    };
    Some(result)
}

/// Closed forms for the squares of the six functions of a linear argument.
fn squared_argument(name: &str, u: &Expr, a: &Expr, var: &str) -> Option<Expr> {
    let x = Expr::symbol(var);
    let half_x = Expr::Div(Box::new(x.clone()), Box::new(Expr::int(2)));
    let sin_cos = Expr::call("sin", u.clone()) * Expr::call("cos", u.clone());
    let two_a = Expr::int(2) * a.clone();

    let result = match name {
        // ∫sin² = x/2 - sin(u)cos(u)/(2a)
        "sin" => Expr::Sub(
            Box::new(half_x),
            Box::new(Expr::Div(Box::new(sin_cos), Box::new(two_a))),
        ),
        // ∫cos² = x/2 + sin(u)cos(u)/(2a)
        "cos" => half_x + Expr::Div(Box::new(sin_cos), Box::new(two_a)),
        // ∫tan² = tan(u)/a - x
        "tan" => Expr::Sub(
            Box::new(over_slope(Expr::call("tan", u.clone()), a)),
            Box::new(x),
        ),
        // ∫cot² = -cot(u)/a - x
        "cot" => Expr::Sub(
            Box::new(-over_slope(Expr::call("cot", u.clone()), a)),
            Box::new(x),
        ),
        // ∫sec² = tan(u)/a
        "sec" => over_slope(Expr::call("tan", u.clone()), a),
        // ∫csc² = -cot(u)/a
        "csc" => -over_slope(Expr::call("cot", u.clone()), a),
        _ => return None,
    };
    Some(result)
}

/// Applies the trigonometric rules to the integrand.
pub(crate) fn rules(expr: &Expr, var: &str) -> Option<Expr> {
    match expr {
        Expr::Call(name, args) => {
            let [u] = args.as_slice() else { return None };
            let a = match_linear(u, var)?;
            linear_argument(name, u, &a)
        },
        Expr::Pow(base, exp) if exp.as_number().map(|n| *n == 2.into()).unwrap_or(false) => {
            let Expr::Call(name, args) = &**base else { return None };
            let [u] = args.as_slice() else { return None };
            let a = match_linear(u, var)?;
            squared_argument(name, u, &a, var)
        },
        _ => None,
    }
}
