//! The term-rewriting simplification engine.
//!
//! We define an expression to be simplified if it has the lowest _complexity_ in the set of all
//! expressions semantically equivalent to it, where complexity is roughly the number of nodes in
//! the expression tree. `x + x` is not simplified, because it can be reduced to the single term
//! `2x`, which has lower complexity.
//!
//! Simplification alternates two phases until a fixed point is reached:
//!
//! 1. **Canonicalization** ([`canonicalize`]): nested sums / products of the same kind are
//!    flattened, `a - b` and `-a` are rewritten into their additive-inverse forms, equations are
//!    normalized to `lhs - rhs = 0`, and the argument lists of [`Expr::Add`] and [`Expr::Mul`]
//!    are sorted by a structural key. Canonical order is what makes repeated simplification of
//!    logically-identical expressions byte-for-byte identical.
//! 2. **Rule application**: the ordered rule set in [`rules`] is applied to the whole tree,
//!    innermost first. Each rule is a function that returns `Some(expr)` with the rewritten
//!    expression if it applies, or `None` if it does not.
//!
//! Both phases are bounded: at most [`MAX_PASSES`] outer iterations, [`MAX_RULE_APPLICATIONS`]
//! rule firings per pass, and [`MAX_DEPTH`] recursion depth. On cap exhaustion the best-effort
//! result is returned rather than an error; a pathological input simplifies imperfectly instead
//! of hanging or overflowing the stack.

pub mod rules;
pub mod step;

use crate::num::Num;
use crate::symbolic::expr::Expr;
use crate::symbolic::step_collector::StepCollector;
use step::Step;

/// The maximum number of outer canonicalize-and-rewrite passes.
pub const MAX_PASSES: usize = 20;

/// The maximum number of rule applications within a single pass.
pub const MAX_RULE_APPLICATIONS: usize = 50;

/// The maximum tree depth the engine will recurse into. Deeper subtrees are returned untouched.
pub const MAX_DEPTH: usize = 50;

/// Simplifies an expression to its canonical fixed point.
///
/// This function is total and deterministic, and idempotent at the fixed point:
/// `simplify(&simplify(e)) == simplify(e)`.
pub fn simplify(expr: &Expr) -> Expr {
    simplify_with(expr, &mut ())
}

/// Simplifies an expression, reporting each rule that fires to the given step collector.
pub fn simplify_with(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Expr {
    let mut current = canonicalize(expr.clone(), 0);

    for _ in 0..MAX_PASSES {
        let mut budget = MAX_RULE_APPLICATIONS;
        let next = apply_rules(current.clone(), step_collector, &mut budget, 0);
        let next = canonicalize(next, 0);

        if next == current {
            return next;
        }
        current = next;
    }

    current
}

/// Applies the single-step constant folder to the whole tree, innermost first, once per node.
///
/// This is the normalization pass the parser runs on freshly parsed input: trivially-foldable
/// literals (`3!`, `(1 + 2)`, an integral of a constant) collapse, but no canonical reordering
/// or algebraic rewriting happens, so the shape of the input is preserved.
pub fn fold_once(expr: Expr) -> Expr {
    let expr = map_children(expr, fold_once);
    rules::fold::all(&expr, &mut ()).unwrap_or(expr)
}

/// Rebuilds an expression by applying `f` to each direct child.
pub(crate) fn map_children(expr: Expr, f: fn(Expr) -> Expr) -> Expr {
    match expr {
        Expr::Number(_) | Expr::Symbol(_) | Expr::Constant { .. } => expr,
        Expr::Add(terms) => Expr::Add(terms.into_iter().map(f).collect()),
        Expr::Mul(factors) => Expr::Mul(factors.into_iter().map(f).collect()),
        Expr::Sub(lhs, rhs) => Expr::Sub(Box::new(f(*lhs)), Box::new(f(*rhs))),
        Expr::Div(lhs, rhs) => Expr::Div(Box::new(f(*lhs)), Box::new(f(*rhs))),
        Expr::Pow(lhs, rhs) => Expr::Pow(Box::new(f(*lhs)), Box::new(f(*rhs))),
        Expr::Neg(inner) => Expr::Neg(Box::new(f(*inner))),
        Expr::Call(name, args) => Expr::Call(name, args.into_iter().map(f).collect()),
        Expr::Equation(lhs, rhs) => Expr::Equation(Box::new(f(*lhs)), Box::new(f(*rhs))),
        Expr::Tensor(elements) => Expr::Tensor(elements.into_iter().map(f).collect()),
        Expr::Integral(inner, var) => Expr::Integral(Box::new(f(*inner)), var),
        Expr::Limit { expr, var, point } => Expr::Limit {
            expr: Box::new(f(*expr)),
            var,
            point: Box::new(f(*point)),
        },
        Expr::SeriesTail { func, var, center, order } => Expr::SeriesTail {
            func,
            var: Box::new(f(*var)),
            center,
            order,
        },
    }
}

/// Negates an expression the way the canonical form expects: numbers negate in place, products
/// gain a -1 coefficient, and everything else is wrapped in a `-1 *` product.
pub(crate) fn negate(expr: Expr) -> Expr {
    match expr {
        Expr::Number(num) => Expr::Number(-num),
        Expr::Mul(mut factors) => {
            factors.insert(0, Expr::int(-1));
            Expr::Mul(factors)
        },
        other => Expr::Mul(vec![Expr::int(-1), other]),
    }
}

/// Canonicalizes an expression:
///
/// - children are canonicalized recursively (bounded by [`MAX_DEPTH`]);
/// - `Neg` and `Sub` are rewritten into `-1 *` products so the addition rules see every term;
/// - nested `Add` / `Mul` of the same kind are flattened into one argument list;
/// - `Add` / `Mul` argument lists are sorted by the structural sort key, and single-element
///   lists collapse;
/// - equations are normalized to `lhs - rhs = 0`.
pub(crate) fn canonicalize(expr: Expr, depth: usize) -> Expr {
    if depth > MAX_DEPTH {
        return expr;
    }

    match expr {
        Expr::Neg(inner) => negate(canonicalize(*inner, depth + 1)),
        Expr::Sub(lhs, rhs) => {
            let lhs = canonicalize(*lhs, depth + 1);
            let rhs = canonicalize(*rhs, depth + 1);
            canonicalize(lhs + negate(rhs), depth)
        },
        Expr::Add(terms) => {
            let mut flat = Vec::with_capacity(terms.len());
            for term in terms {
                match canonicalize(term, depth + 1) {
                    Expr::Add(inner) => flat.extend(inner),
                    other => flat.push(other),
                }
            }
            flat.sort_by_cached_key(Expr::sort_key);
            Expr::Add(flat).downgrade()
        },
        Expr::Mul(factors) => {
            let mut flat = Vec::with_capacity(factors.len());
            for factor in factors {
                match canonicalize(factor, depth + 1) {
                    Expr::Mul(inner) => flat.extend(inner),
                    other => flat.push(other),
                }
            }
            // tensor products are not commutative, so factor order must survive
            if !flat.iter().any(|factor| matches!(factor, Expr::Tensor(_))) {
                flat.sort_by_cached_key(Expr::sort_key);
            }
            Expr::Mul(flat).downgrade()
        },
        Expr::Equation(lhs, rhs) => {
            let lhs = canonicalize(*lhs, depth + 1);
            let rhs = canonicalize(*rhs, depth + 1);
            if rhs.is_zero() {
                Expr::Equation(Box::new(lhs), Box::new(rhs))
            } else {
                Expr::Equation(
                    Box::new(canonicalize(lhs + negate(rhs), depth)),
                    Box::new(Expr::zero()),
                )
            }
        },
        Expr::Div(lhs, rhs) => Expr::Div(
            Box::new(canonicalize(*lhs, depth + 1)),
            Box::new(canonicalize(*rhs, depth + 1)),
        ),
        Expr::Pow(lhs, rhs) => Expr::Pow(
            Box::new(canonicalize(*lhs, depth + 1)),
            Box::new(canonicalize(*rhs, depth + 1)),
        ),
        Expr::Call(name, args) => Expr::Call(
            name,
            args.into_iter().map(|arg| canonicalize(arg, depth + 1)).collect(),
        ),
        Expr::Tensor(elements) => Expr::Tensor(
            elements.into_iter().map(|e| canonicalize(e, depth + 1)).collect(),
        ),
        Expr::Integral(inner, var) => {
            Expr::Integral(Box::new(canonicalize(*inner, depth + 1)), var)
        },
        Expr::Limit { expr, var, point } => Expr::Limit {
            expr: Box::new(canonicalize(*expr, depth + 1)),
            var,
            point: Box::new(canonicalize(*point, depth + 1)),
        },
        other => other,
    }
}

/// Applies the rule set to the whole tree, innermost first, spending from the shared rule
/// budget. Subtrees beyond [`MAX_DEPTH`] are returned untouched.
fn apply_rules(
    expr: Expr,
    step_collector: &mut dyn StepCollector<Step>,
    budget: &mut usize,
    depth: usize,
) -> Expr {
    if *budget == 0 || depth > MAX_DEPTH {
        return expr;
    }

    // children first, so rules always see simplified arguments
    let mut current = match expr {
        Expr::Number(_) | Expr::Symbol(_) | Expr::Constant { .. } => expr,
        Expr::Add(terms) => Expr::Add(
            terms.into_iter().map(|t| apply_rules(t, step_collector, budget, depth + 1)).collect(),
        ),
        Expr::Mul(factors) => Expr::Mul(
            factors.into_iter().map(|t| apply_rules(t, step_collector, budget, depth + 1)).collect(),
        ),
        Expr::Sub(lhs, rhs) => Expr::Sub(
            Box::new(apply_rules(*lhs, step_collector, budget, depth + 1)),
            Box::new(apply_rules(*rhs, step_collector, budget, depth + 1)),
        ),
        Expr::Div(lhs, rhs) => Expr::Div(
            Box::new(apply_rules(*lhs, step_collector, budget, depth + 1)),
            Box::new(apply_rules(*rhs, step_collector, budget, depth + 1)),
        ),
        Expr::Pow(lhs, rhs) => Expr::Pow(
            Box::new(apply_rules(*lhs, step_collector, budget, depth + 1)),
            Box::new(apply_rules(*rhs, step_collector, budget, depth + 1)),
        ),
        Expr::Neg(inner) => Expr::Neg(Box::new(apply_rules(*inner, step_collector, budget, depth + 1))),
        Expr::Call(name, args) => Expr::Call(
            name,
            args.into_iter().map(|a| apply_rules(a, step_collector, budget, depth + 1)).collect(),
        ),
        Expr::Equation(lhs, rhs) => Expr::Equation(
            Box::new(apply_rules(*lhs, step_collector, budget, depth + 1)),
            Box::new(apply_rules(*rhs, step_collector, budget, depth + 1)),
        ),
        Expr::Tensor(elements) => Expr::Tensor(
            elements.into_iter().map(|e| apply_rules(e, step_collector, budget, depth + 1)).collect(),
        ),
        Expr::Integral(inner, var) => Expr::Integral(
            Box::new(apply_rules(*inner, step_collector, budget, depth + 1)),
            var,
        ),
        expr @ (Expr::Limit { .. } | Expr::SeriesTail { .. }) => expr,
    };

    // then the node itself, repeatedly while rules keep applying
    while *budget > 0 {
        match rules::all(&current, step_collector) {
            Some(next) => {
                *budget -= 1;
                current = next;
            },
            None => break,
        }
    }

    current
}

/// Extracts the numeric coefficient and remaining symbolic part of a term.
///
/// - `5` -> `(5, 1)`
/// - `3x` -> `(3, x)`
/// - `(1/4)a b` -> `(1/4, a b)`
/// - `2x/y` -> `(2, x/y)`
/// - `a` -> `(1, a)`
pub(crate) fn coefficient_of(term: &Expr) -> (Num, Expr) {
    match term {
        Expr::Number(num) => (num.clone(), Expr::one()),
        Expr::Mul(factors) => {
            let mut coeff = Num::one();
            let mut rest = Vec::with_capacity(factors.len());
            for factor in factors {
                match factor.as_number() {
                    Some(num) => coeff = coeff * num.clone(),
                    None => rest.push(factor.clone()),
                }
            }
            (coeff, Expr::Mul(rest).downgrade())
        },
        Expr::Div(num, den) => {
            // the numerator's coefficient is the quotient's coefficient, so `x/y` and `-x/y`
            // recognize each other as like terms
            let (coeff, base) = coefficient_of(num);
            (coeff, Expr::Div(Box::new(base), den.clone()))
        },
        other => (Num::one(), other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(input: &str) -> Expr {
        use symcore_parser::parser::ast::Expr as AstExpr;
        let ast = symcore_parser::Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        Expr::from(ast)
    }

    #[test]
    fn canonical_order_is_deterministic() {
        let a = canonicalize(parse("x + 1"), 0);
        let b = canonicalize(parse("1 + x"), 0);
        assert_eq!(a, b);
    }

    #[test]
    fn combines_like_terms() {
        // `2x + 3x = 5x`
        assert_eq!(
            simplify(&parse("2x + 3x")),
            Expr::Mul(vec![Expr::int(5), Expr::symbol("x")]),
        );
    }

    #[test]
    fn folds_constant_products() {
        // `(1+2)*(3) = 9`, with no residual sum or product nodes
        assert_eq!(simplify(&parse("(1+2)*(3)")), Expr::int(9));
    }

    #[test]
    fn power_identities() {
        assert_eq!(simplify(&parse("x^0")), Expr::one());
        assert_eq!(simplify(&parse("x^1")), Expr::symbol("x"));
        assert_eq!(simplify(&parse("1^x")), Expr::one());
        assert_eq!(simplify(&parse("0^x")), Expr::zero());
        // documented fallback
        assert_eq!(simplify(&parse("0^0")), Expr::one());
    }

    #[test]
    fn idempotent_at_fixed_point() {
        for input in [
            "2x + 3x",
            "(x+1)^2",
            "sin(x)^2 + cos(x)^2",
            "x*y/z + 4!",
            "ln(x^2 * y)",
        ] {
            let once = simplify(&parse(input));
            let twice = simplify(&once);
            assert_eq!(once, twice, "simplify not idempotent for {input}");
        }
    }

    #[test]
    fn additive_inverse_cancels() {
        assert_eq!(simplify(&parse("a + (-a)")), Expr::zero());
        assert_eq!(simplify(&parse("x - x")), Expr::zero());
    }

    #[test]
    fn multiplicative_inverse_cancels() {
        assert_eq!(simplify(&parse("a * a^-1")), Expr::one());
        assert_eq!(simplify(&parse("x / x")), Expr::one());
    }

    #[test]
    fn equation_normalizes() {
        let simplified = simplify(&parse("y = 2x"));
        let Expr::Equation(lhs, rhs) = simplified else { panic!("expected equation") };
        assert!(rhs.is_zero());
        // y - 2x, in canonical order (symbols sort before products)
        assert_eq!(
            *lhs,
            Expr::Add(vec![
                Expr::symbol("y"),
                Expr::Mul(vec![Expr::int(-2), Expr::symbol("x")]),
            ]),
        );
    }

    #[test]
    fn fold_once_preserves_shape() {
        // folds the factorial but does not reorder or collect anything
        let folded = fold_once(parse("3! + x + 2x"));
        assert_eq!(folded, Expr::Add(vec![
            Expr::int(6),
            Expr::symbol("x"),
            Expr::Mul(vec![Expr::int(2), Expr::symbol("x")]),
        ]));
    }

    #[test]
    fn best_effort_on_deep_input() {
        // ~80 nested negations exceed the depth cap; the result is still returned
        let mut expr = Expr::symbol("x");
        for _ in 0..80 {
            expr = Expr::Neg(Box::new(expr));
        }
        let _ = simplify(&expr);
    }
}
