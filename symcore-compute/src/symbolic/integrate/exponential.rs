//! Exponential rules: `∫ e^(ax+b) dx` and `∫ c^(ax+b) dx`.

use crate::symbolic::expr::Expr;
use super::match_linear;

/// Applies the exponential rules to the integrand.
pub(crate) fn rules(expr: &Expr, var: &str) -> Option<Expr> {
    match expr {
        // ∫ exp(ax+b) dx = exp(ax+b)/a
        Expr::Call(name, args) if name == "exp" => {
            let [u] = args.as_slice() else { return None };
            let a = match_linear(u, var)?;
            Some(Expr::Div(
                Box::new(Expr::call("exp", u.clone())),
                Box::new(a),
            ))
        },
        // ∫ c^(ax+b) dx = c^(ax+b) / (a·ln(c))
        Expr::Pow(base, exp) if base.is_constant_wrt(var) => {
            let a = match_linear(exp, var)?;
            Some(Expr::Div(
                Box::new((**base).clone().pow((**exp).clone())),
                Box::new(a * Expr::call("ln", (**base).clone())),
            ))
        },
        _ => None,
    }
}
