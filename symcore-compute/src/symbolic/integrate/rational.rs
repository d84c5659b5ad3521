//! Rational-function rules: powers of the variable, reciprocals, and the `f'/f` logarithm
//! pattern.

use crate::num::Num;
use crate::symbolic::derivative::derivative_raw;
use crate::symbolic::expr::Expr;
use crate::symbolic::simplify::simplify;

/// `∫ x dx`, `∫ x^n dx`, `∫ c^x dx`, `∫ c/x^n dx`, and `∫ c·f'/f dx = c·ln|f|`.
pub(crate) fn rules(expr: &Expr, var: &str) -> Option<Expr> {
    match expr {
        // ∫ x dx = x^2/2
        Expr::Symbol(name) if name == var => Some(Expr::Div(
            Box::new(Expr::symbol(var).pow(Expr::int(2))),
            Box::new(Expr::int(2)),
        )),
        Expr::Pow(base, exp) => {
            if base.as_symbol() == Some(var) && exp.is_constant_wrt(var) {
                // ∫ x^n dx = x^(n+1)/(n+1) for constant n ≠ -1
                if exp.as_number().map(|n| *n == -Num::one()).unwrap_or(false) {
                    return Some(Expr::call("ln", Expr::call("abs", Expr::symbol(var))));
                }
                let next = (**exp).clone() + Expr::one();
                return Some(Expr::Div(
                    Box::new(Expr::symbol(var).pow(next.clone())),
                    Box::new(next),
                ));
            }

            if base.is_constant_wrt(var) && exp.as_symbol() == Some(var) {
                // ∫ c^x dx = c^x / ln(c)
                return Some(Expr::Div(
                    Box::new((**base).clone().pow(Expr::symbol(var))),
                    Box::new(Expr::call("ln", (**base).clone())),
                ));
            }

            None
        },
        Expr::Div(num, den) => {
            // ∫ c/x^n dx = c·x^(1-n)/(1-n) for constant n ≠ 1, with n = 1 giving c·ln|x|
            if num.is_constant_wrt(var) {
                let (base, exp) = match &**den {
                    Expr::Pow(base, exp) => ((**base).clone(), (**exp).clone()),
                    other => (other.clone(), Expr::one()),
                };
                if base.as_symbol() == Some(var) {
                    if let Some(n) = exp.as_number() {
                        if n.is_one() {
                            return Some(
                                (**num).clone() * Expr::call("ln", Expr::call("abs", Expr::symbol(var))),
                            );
                        }
                        let next = Num::one() - n.clone();
                        return Some(Expr::Div(
                            Box::new((**num).clone() * Expr::symbol(var).pow(Expr::Number(next.clone()))),
                            Box::new(Expr::Number(next)),
                        ));
                    }
                }
            }

            // ∫ c·f'/f dx = c·ln|f|
            let df = simplify(&derivative_raw(den, var).ok()?);
            if df.is_zero() {
                return None;
            }
            let quotient = simplify(&Expr::Div(num.clone(), Box::new(df)));
            if quotient.is_constant_wrt(var) {
                return Some(quotient * Expr::call("ln", Expr::call("abs", (**den).clone())));
            }

            None
        },
        _ => None,
    }
}
