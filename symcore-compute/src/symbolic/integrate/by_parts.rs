//! Integration by parts, the general fallback heuristic.
//!
//! `u` is chosen by the LIATE priority: logarithmic parts make the best `u`, exponential parts
//! the worst. The strict-decrease guard (the chosen `u` must rank strictly below everything in
//! `dv`) is what guarantees termination: every recursion either lowers the integrand's LIATE
//! class or fails, so by-parts can never bounce an integrand back and forth.

use crate::symbolic::derivative::derivative_raw;
use crate::symbolic::expr::Expr;
use crate::symbolic::simplify::simplify;
use super::integrate_inner;

/// The LIATE class of a factor: Log, Inverse trig, Algebraic, Trig, Exponential.
fn liate_rank(expr: &Expr, var: &str) -> Option<u8> {
    match expr {
        Expr::Call(name, _) => match name.as_str() {
            "ln" | "log" => Some(0),
            "asin" | "acos" | "atan" => Some(1),
            "sin" | "cos" | "tan" => Some(3),
            "exp" => Some(4),
            _ => None,
        },
        _ if is_algebraic(expr, var) => Some(2),
        Expr::Pow(base, _) if base.is_constant_wrt(var) => Some(4),
        _ => None,
    }
}

/// Returns true for polynomial-like expressions in `var`.
fn is_algebraic(expr: &Expr, var: &str) -> bool {
    match expr {
        Expr::Number(_) | Expr::Constant { .. } => true,
        Expr::Symbol(_) => true,
        Expr::Pow(base, exp) => {
            base.as_symbol() == Some(var) && exp.as_number().is_some()
        },
        Expr::Add(terms) | Expr::Mul(terms) => terms.iter().all(|t| is_algebraic(t, var)),
        Expr::Neg(inner) => is_algebraic(inner, var),
        _ => false,
    }
}

/// Attempts integration by parts: `∫u dv = u·v - ∫v du`.
pub(crate) fn integration_by_parts(expr: &Expr, var: &str, depth: usize) -> Option<Expr> {
    let factors = match expr {
        Expr::Mul(factors) => factors.clone(),
        other => vec![other.clone()],
    };

    // every factor must have a LIATE class for the strict-decrease argument to hold
    let ranks = factors.iter()
        .map(|factor| liate_rank(factor, var))
        .collect::<Option<Vec<_>>>()?;

    // `u` is the factor with the best (lowest) LIATE class
    let u_idx = ranks.iter()
        .enumerate()
        .min_by_key(|(_, rank)| **rank)
        .map(|(idx, _)| idx)?;
    let u = &factors[u_idx];
    let u_rank = ranks[u_idx];

    let dv_factors = factors.iter()
        .enumerate()
        .filter(|(idx, _)| *idx != u_idx)
        .map(|(_, factor)| factor.clone())
        .collect::<Vec<_>>();
    let dv = if dv_factors.is_empty() {
        // single-factor integrand: take dv = dx, which ranks as algebraic
        Expr::one()
    } else {
        Expr::Mul(dv_factors).downgrade()
    };

    // strict decrease: everything in dv must rank above u
    let dv_rank = ranks.iter()
        .enumerate()
        .filter(|(idx, _)| *idx != u_idx)
        .map(|(_, rank)| *rank)
        .min()
        .unwrap_or(2); // dv = dx is algebraic
    if u_rank >= dv_rank {
        return None;
    }

    let du = simplify(&derivative_raw(u, var).ok()?);
    let v = integrate_inner(&dv, var, depth + 1)?;

    // recurse once more on ∫v du; if this fails, by-parts fails as a whole
    let v_du = simplify(&(v.clone() * du));
    let remainder = integrate_inner(&v_du, var, depth + 1)?;

    Some(Expr::Sub(
        Box::new(u.clone() * v),
        Box::new(remainder),
    ))
}
