//! Logarithmic rules: `∫ ln(ax+b) dx`, by a single integration-by-parts step carried out in
//! closed form.

use crate::symbolic::expr::Expr;
use super::match_linear;

/// Applies the logarithmic rules to the integrand.
pub(crate) fn rules(expr: &Expr, var: &str) -> Option<Expr> {
    let Expr::Call(name, args) = expr else { return None };
    let [u] = args.as_slice() else { return None };
    let a = match_linear(u, var)?;

    // with parts u = ln(w), dv = dx: ∫ ln(w) dx = (w·ln(w) - w)/a
    let parts = Expr::Sub(
        Box::new(u.clone() * Expr::call("ln", u.clone())),
        Box::new(u.clone()),
    );

    let result = match name.as_str() {
        "ln" => parts,
        // log is base 10: ∫ log(w) dx = (w·ln(w) - w)/(a·ln(10))
        "log" => Expr::Div(
            Box::new(parts),
            Box::new(Expr::call("ln", Expr::int(10))),
        ),
        _ => return None,
    };

    if a.is_one() {
        Some(result)
    } else {
        Some(Expr::Div(Box::new(result), Box::new(a)))
    }
}
