//! The heuristic symbolic integration engine.
//!
//! [`integrate`] never fails: an integrand the engine cannot solve comes back as an
//! [`Expr::Integral`] marker instead of an error. The structural baseline rules (constants,
//! termwise sums, negation) always apply first; everything else goes through the heuristics in
//! strict priority order:
//!
//! 1. u-substitution ([`substitution`])
//! 2. rational-function rules ([`rational`])
//! 3. trigonometric rules ([`trigonometric`])
//! 4. exponential rules ([`exponential`])
//! 5. logarithmic rules ([`logarithmic`])
//! 6. integration by parts ([`by_parts`])
//!
//! Each heuristic either returns a result or falls through to the next. Termwise integration of
//! a sum is all-or-nothing: if any term fails, the whole sum becomes unevaluated, so the caller
//! never sees a half-integrated expression.

mod by_parts;
mod exponential;
mod logarithmic;
mod rational;
mod substitution;
mod trigonometric;

use crate::symbolic::expr::Expr;
use crate::symbolic::simplify::simplify;

/// The maximum recursion depth. When the heuristics nest deeper than this (which by-parts can),
/// the current subproblem is declared unsolved instead of overflowing the stack.
pub const MAX_DEPTH: usize = 50;

/// Integrates an expression with respect to the given variable.
///
/// Always succeeds; an unsolvable integrand is returned as an [`Expr::Integral`] node. The
/// result is passed through the simplifier.
pub fn integrate(expr: &Expr, var: &str) -> Expr {
    // normalizing first gives the pattern matchers a canonical tree to look at
    let integrand = simplify(expr);
    match integrate_inner(&integrand, var, 0) {
        Some(result) => simplify(&result),
        None => Expr::Integral(Box::new(integrand), var.to_string()),
    }
}

/// The recursive integration driver. Returns [`None`] when no rule solves the integrand.
pub(crate) fn integrate_inner(expr: &Expr, var: &str, depth: usize) -> Option<Expr> {
    if depth > MAX_DEPTH {
        return None;
    }

    // `∫c dx = c*x`
    if expr.is_constant_wrt(var) {
        return Some(expr.clone() * Expr::symbol(var));
    }

    match expr {
        // termwise, all-or-nothing
        Expr::Add(terms) => {
            let integrated = terms.iter()
                .map(|term| integrate_inner(term, var, depth + 1))
                .collect::<Option<Vec<_>>>()?;
            Some(Expr::Add(integrated))
        },
        Expr::Sub(lhs, rhs) => {
            let lhs = integrate_inner(lhs, var, depth + 1)?;
            let rhs = integrate_inner(rhs, var, depth + 1)?;
            Some(Expr::Sub(Box::new(lhs), Box::new(rhs)))
        },
        Expr::Neg(inner) => {
            let inner = integrate_inner(inner, var, depth + 1)?;
            Some(-inner)
        },
        // a constant coefficient moves outside the integral
        Expr::Mul(factors) => {
            let (constant, rest): (Vec<_>, Vec<_>) = factors.iter()
                .cloned()
                .partition(|factor| factor.is_constant_wrt(var));
            if !constant.is_empty() {
                let rest = Expr::Mul(rest).downgrade();
                let integrated = integrate_inner(&rest, var, depth + 1)?;
                return Some(Expr::Mul(constant).downgrade() * integrated);
            }

            heuristics(expr, var, depth)
        },
        Expr::Div(lhs, rhs) if rhs.is_constant_wrt(var) => {
            let integrated = integrate_inner(lhs, var, depth + 1)?;
            Some(Expr::Div(Box::new(integrated), rhs.clone()))
        },
        _ => heuristics(expr, var, depth),
    }
}

/// Tries each heuristic in priority order.
fn heuristics(expr: &Expr, var: &str, depth: usize) -> Option<Expr> {
    substitution::u_substitution(expr, var, depth)
        .or_else(|| rational::rules(expr, var))
        .or_else(|| trigonometric::rules(expr, var))
        .or_else(|| exponential::rules(expr, var))
        .or_else(|| logarithmic::rules(expr, var))
        .or_else(|| by_parts::integration_by_parts(expr, var, depth))
}

/// Matches a linear argument `a*x + b` in the given variable, returning the slope `a` (an
/// expression constant in `var`).
///
/// Returns [`None`] when the argument is not linear. `b` is not needed by any caller, so it is
/// not returned.
pub(crate) fn match_linear(arg: &Expr, var: &str) -> Option<Expr> {
    match arg {
        Expr::Symbol(name) if name == var => Some(Expr::one()),
        Expr::Mul(factors) => {
            let mut slope = Vec::new();
            let mut var_count = 0;
            for factor in factors {
                if factor.as_symbol() == Some(var) {
                    var_count += 1;
                } else if factor.is_constant_wrt(var) {
                    slope.push(factor.clone());
                } else {
                    return None;
                }
            }
            if var_count == 1 {
                Some(Expr::Mul(slope).downgrade())
            } else {
                None
            }
        },
        Expr::Add(terms) => {
            let mut slope = None;
            for term in terms {
                if term.is_constant_wrt(var) {
                    continue;
                }
                match (match_linear(term, var), &slope) {
                    (Some(a), None) => slope = Some(a),
                    _ => return None,
                }
            }
            slope
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::symbolic::derivative::differentiate;
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(input: &str) -> Expr {
        use symcore_parser::parser::ast::Expr as AstExpr;
        let ast = symcore_parser::Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        Expr::from(ast)
    }

    /// Asserts that the integral of `input` equals the simplified `expected` expression.
    fn assert_integral(input: &str, expected: &str) {
        assert_eq!(
            integrate(&parse(input), "x"),
            simplify(&parse(expected)),
            "∫ {input} dx",
        );
    }

    /// Asserts that differentiating the integral of `input` gives back `input`.
    fn assert_round_trip(input: &str) {
        let original = parse(input);
        let integral = integrate(&original, "x");
        assert!(
            !matches!(integral, Expr::Integral(..)),
            "∫ {input} dx came back unevaluated",
        );

        let (derivative, _) = differentiate(&integral, "x").unwrap();
        let difference = simplify(&Expr::Sub(Box::new(derivative), Box::new(original)));
        assert_eq!(difference, Expr::zero(), "round trip failed for {input}");
    }

    #[test]
    fn constant() {
        assert_integral("3", "3x");
        assert_integral("y", "y*x");
    }

    #[test]
    fn power_rule() {
        assert_integral("x", "x^2/2");
        assert_integral("x^2", "x^3/3");
        assert_integral("x^-2", "-x^-1");
    }

    #[test]
    fn reciprocal() {
        assert_integral("1/x", "ln(abs(x))");
    }

    #[test]
    fn termwise() {
        assert_round_trip("x^2 + 3x + 1");
    }

    #[test]
    fn termwise_is_all_or_nothing() {
        // the tangent-squared-of-nonlinear term is unsolvable, so the whole sum must come back
        // unevaluated, not half-integrated
        let result = integrate(&parse("x + tan(x^3)^3"), "x");
        assert!(matches!(result, Expr::Integral(..)));
    }

    #[test]
    fn constant_coefficient_moves_out() {
        assert_round_trip("5sin(x)");
        assert_round_trip("y*cos(x)");
    }

    #[test]
    fn u_substitution() {
        assert_round_trip("2x*cos(x^2)");
        assert_round_trip("x*exp(x^2)");
    }

    #[test]
    fn power_in_disguise() {
        // g^n * g' with g = x^2 + 1
        assert_round_trip("2x*(x^2 + 1)^3");
        // the n = -1 special case: g'/g = ln|g|
        assert_round_trip("2x/(x^2 + 1)");
    }

    #[test]
    fn trigonometric() {
        assert_round_trip("sin(x)");
        assert_round_trip("cos(2x)");
        assert_round_trip("sin(x)^2");
        assert_round_trip("tan(x)");
    }

    #[test]
    fn exponential() {
        assert_round_trip("exp(x)");
        assert_round_trip("exp(3x + 1)");
        assert_round_trip("2^x");
    }

    #[test]
    fn logarithmic() {
        assert_integral("ln(x)", "x*ln(x) - x");
    }

    #[test]
    fn by_parts() {
        assert_integral("x*exp(x)", "x*exp(x) - exp(x)");
        assert_round_trip("x*cos(x)");
    }

    #[test]
    fn unsolved_becomes_marker() {
        let result = integrate(&parse("exp(x^2)"), "x");
        assert_eq!(result, Expr::Integral(
            Box::new(Expr::call("exp", parse("x^2"))),
            "x".to_string(),
        ));
    }

    #[test]
    fn linear_argument_matcher() {
        assert_eq!(match_linear(&simplify(&parse("x")), "x"), Some(Expr::one()));
        assert_eq!(match_linear(&simplify(&parse("3x")), "x"), Some(Expr::int(3)));
        assert_eq!(match_linear(&simplify(&parse("3x + 2")), "x"), Some(Expr::int(3)));
        assert_eq!(match_linear(&simplify(&parse("x^2")), "x"), None);
    }
}
