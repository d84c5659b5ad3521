//! The symbolic differentiation engine.
//!
//! Differentiation is a structural recursion with one case per node kind. Every case produces
//! both the derivative subtree and human-readable step strings describing the rule applied;
//! steps from nested calls appear before the enclosing rule's own summary, so the trace reads
//! innermost-first, in the order the work actually happened. Callers that do not need the trace
//! go through [`derivative_raw`], which collects into `()` and skips all step formatting.
//!
//! The result of [`differentiate`] is always passed through the simplifier before being
//! returned.

mod function;

use crate::error::DiffError;
use crate::num::Num;
use crate::symbolic::expr::Expr;
use crate::symbolic::simplify::simplify;
use crate::symbolic::step_collector::StepCollector;

/// The maximum recursion depth. Deeper inputs fail with `diff(recursion_limit)` instead of
/// overflowing the stack.
pub const MAX_DEPTH: usize = 50;

/// Returns `true` if the given [`Expr`] is "clearly" zero. This is intended to clean up the
/// derivatives the builders assemble and is not mathematically rigorous.
fn is_trivially_zero(e: &Expr) -> bool {
    match e {
        Expr::Number(num) => num.is_zero(),
        Expr::Add(terms) => terms.iter().all(is_trivially_zero),
        Expr::Mul(factors) => factors.iter().any(is_trivially_zero),
        Expr::Neg(inner) => is_trivially_zero(inner),
        Expr::Pow(base, exp) => is_trivially_zero(base) && !is_trivially_zero(exp),
        _ => false,
    }
}

/// Returns `true` if the given [`Expr`] is "clearly" one. This is intended to clean up the
/// derivatives the builders assemble and is not mathematically rigorous.
fn is_trivially_one(e: &Expr) -> bool {
    match e {
        Expr::Number(num) => num.is_one(),
        Expr::Mul(factors) => factors.iter().all(is_trivially_one),
        Expr::Pow(base, exp) => is_trivially_zero(exp) || is_trivially_one(base),
        Expr::Add(terms) => terms.len() == 1 && is_trivially_one(&terms[0]),
        _ => false,
    }
}

/// Helper struct to build a product of expressions while applying basic cleanup. If any of the
/// expressions are zero, the product is reduced to zero; factors of one are skipped.
#[derive(Default)]
pub(crate) struct MultBuilder(Vec<Expr>);

impl From<MultBuilder> for Expr {
    fn from(value: MultBuilder) -> Self {
        Expr::Mul(value.0).downgrade()
    }
}

impl MultBuilder {
    pub(crate) fn mult(&mut self, e: Expr) {
        if is_trivially_zero(&e) || self.0.first().is_some_and(is_trivially_zero) {
            self.0 = vec![Expr::zero()];
            return;
        }

        if !is_trivially_one(&e) {
            self.0.push(e)
        }
    }
}

/// Helper struct to build a sum of expressions while applying basic cleanup. Only non-zero
/// expressions are added to the sum.
#[derive(Default)]
pub(crate) struct SumBuilder(Vec<Expr>);

impl From<SumBuilder> for Expr {
    fn from(value: SumBuilder) -> Self {
        Expr::Add(value.0).downgrade()
    }
}

impl SumBuilder {
    pub(crate) fn add(&mut self, e: Expr) {
        if !is_trivially_zero(&e) {
            self.0.push(e)
        }
    }
}

/// `(f + g)' = f' + g'`
fn sum_rule(
    terms: &[Expr],
    var: &str,
    depth: usize,
    steps: &mut dyn StepCollector<String>,
) -> Result<Expr, DiffError> {
    let mut sum = SumBuilder::default();
    for term in terms {
        sum.add(derivative(term, var, depth + 1, steps)?);
    }
    Ok(sum.into())
}

/// `(f * g * h)' = f' * g * h + f * g' * h + f * g * h'`
///
/// With two factors this is the ordinary product rule; with more it is the generalized product
/// rule, a sum over the factor list with exactly one factor differentiated per term.
fn product_rule(
    factors: &[Expr],
    var: &str,
    depth: usize,
    steps: &mut dyn StepCollector<String>,
) -> Result<Expr, DiffError> {
    let mut outer_sum = SumBuilder::default();

    for derivative_idx in 0..factors.len() {
        let mut inner_mult = MultBuilder::default();
        for factor_idx in 0..factors.len() {
            let factor = if derivative_idx == factor_idx {
                derivative(&factors[derivative_idx], var, depth + 1, steps)?
            } else {
                factors[factor_idx].clone()
            };

            inner_mult.mult(factor);
        }

        outer_sum.add(inner_mult.into());
    }

    Ok(outer_sum.into())
}

/// `(u / v)' = (v * u' - u * v') / v^2`
fn quotient_rule(
    u: &Expr,
    v: &Expr,
    var: &str,
    depth: usize,
    steps: &mut dyn StepCollector<String>,
) -> Result<Expr, DiffError> {
    let du = derivative(u, var, depth + 1, steps)?;
    let dv = derivative(v, var, depth + 1, steps)?;

    let mut numerator_lhs = MultBuilder::default();
    numerator_lhs.mult(v.clone());
    numerator_lhs.mult(du);

    let mut numerator_rhs = MultBuilder::default();
    numerator_rhs.mult(u.clone());
    numerator_rhs.mult(dv);

    Ok(Expr::Div(
        Box::new(Expr::Sub(
            Box::new(numerator_lhs.into()),
            Box::new(numerator_rhs.into()),
        )),
        Box::new(v.clone().pow(Expr::int(2))),
    ))
}

/// Computes the derivative of `u^v`, selecting between the power rule, the exponential rule,
/// and logarithmic differentiation.
fn power_rule(
    u: &Expr,
    v: &Expr,
    var: &str,
    depth: usize,
    steps: &mut dyn StepCollector<String>,
) -> Result<Expr, DiffError> {
    // `(u^n)' = n * u^(n-1) * u'` for a literal exponent
    if let Some(n) = v.as_number() {
        let du = derivative(u, var, depth + 1, steps)?;
        let mut group = MultBuilder::default();
        group.mult(Expr::Number(n.clone()));
        group.mult(u.clone().pow(Expr::Number(n.clone() - Num::one())));
        group.mult(du);
        let result: Expr = group.into();
        steps.push(format!("power rule: d/d{var}[{u}^{v}] = {result}"));
        return Ok(result);
    }

    // `(a^u)' = ln(a) * a^u * u'` for a base constant in the differentiation variable
    if u.is_constant_wrt(var) {
        let dv = derivative(v, var, depth + 1, steps)?;
        let mut group = MultBuilder::default();
        group.mult(Expr::call("ln", u.clone()));
        group.mult(u.clone().pow(v.clone()));
        group.mult(dv);
        let result: Expr = group.into();
        steps.push(format!("exponential rule: d/d{var}[{u}^{v}] = {result}"));
        return Ok(result);
    }

    // the general case, by logarithmic differentiation:
    // `(u^v)' = u^v * (v' * ln(u) + v * u' / u)`
    let du = derivative(u, var, depth + 1, steps)?;
    let dv = derivative(v, var, depth + 1, steps)?;

    let mut ln_part = MultBuilder::default();
    ln_part.mult(dv);
    ln_part.mult(Expr::call("ln", u.clone()));

    let mut frac_part = MultBuilder::default();
    frac_part.mult(v.clone());
    frac_part.mult(Expr::Div(Box::new(du), Box::new(u.clone())));

    let mut sum = SumBuilder::default();
    sum.add(ln_part.into());
    sum.add(frac_part.into());

    let mut group = MultBuilder::default();
    group.mult(u.clone().pow(v.clone()));
    group.mult(sum.into());

    let result: Expr = group.into();
    steps.push(format!("logarithmic differentiation: d/d{var}[{u}^{v}] = {result}"));
    Ok(result)
}

/// Computes the derivative of the given expression with respect to `var`, reporting each rule
/// applied to the step collector. The result is **not** simplified.
pub(crate) fn derivative(
    f: &Expr,
    var: &str,
    depth: usize,
    steps: &mut dyn StepCollector<String>,
) -> Result<Expr, DiffError> {
    if depth > MAX_DEPTH {
        return Err(DiffError::RecursionLimit);
    }

    // anything constant in `var` differentiates to zero, including other variables and named
    // constants
    if f.is_constant_wrt(var) {
        return Ok(Expr::zero());
    }

    match f {
        Expr::Symbol(_) => {
            // the constant case above already handled every other symbol
            steps.push(format!("d/d{var}[{var}] = 1"));
            Ok(Expr::one())
        },
        Expr::Neg(inner) => {
            let inner = derivative(inner, var, depth + 1, steps)?;
            Ok(-inner)
        },
        Expr::Add(terms) => {
            let result = sum_rule(terms, var, depth, steps)?;
            steps.push(format!("sum rule: d/d{var}[{f}] = {result}"));
            Ok(result)
        },
        Expr::Sub(lhs, rhs) => {
            let dl = derivative(lhs, var, depth + 1, steps)?;
            let dr = derivative(rhs, var, depth + 1, steps)?;
            let result = if is_trivially_zero(&dr) {
                dl
            } else if is_trivially_zero(&dl) {
                -dr
            } else {
                Expr::Sub(Box::new(dl), Box::new(dr))
            };
            steps.push(format!("difference rule: d/d{var}[{f}] = {result}"));
            Ok(result)
        },
        Expr::Mul(factors) => {
            let result = product_rule(factors, var, depth, steps)?;
            steps.push(format!("product rule: d/d{var}[{f}] = {result}"));
            Ok(result)
        },
        Expr::Div(lhs, rhs) => {
            let result = quotient_rule(lhs, rhs, var, depth, steps)?;
            steps.push(format!("quotient rule: d/d{var}[{f}] = {result}"));
            Ok(result)
        },
        Expr::Pow(base, exp) => power_rule(base, exp, var, depth, steps),
        Expr::Call(name, args) => function::function_derivative(name, args, var, depth, steps),
        Expr::Number(_) | Expr::Constant { .. } => unreachable!("constants are handled above"),
        Expr::Equation(..)
            | Expr::Tensor(_)
            | Expr::Integral(..)
            | Expr::Limit { .. }
            | Expr::SeriesTail { .. } => Err(DiffError::UnimplementedNode {
                node: f.kind_name(),
            }),
    }
}

/// Computes the derivative of the given expression without collecting steps. The result is
/// **not** simplified.
pub(crate) fn derivative_raw(f: &Expr, var: &str) -> Result<Expr, DiffError> {
    derivative(f, var, 0, &mut ())
}

/// Differentiates an expression with respect to the given variable.
///
/// Returns the simplified derivative together with the ordered list of derivation steps; the
/// final step always restates the simplified result.
pub fn differentiate(expr: &Expr, var: &str) -> Result<(Expr, Vec<String>), DiffError> {
    let mut steps = Vec::new();
    let raw = derivative(expr, var, 0, &mut steps)?;
    let simplified = simplify(&raw);
    steps.push(format!("collect and simplify: d/d{var}[{expr}] = {simplified}"));
    Ok((simplified, steps))
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

    /// Differentiates the input and asserts the simplified result equals the simplified
    /// expected expression.
    fn assert_derivative(input: &str, expected: &str) {
        let (result, steps) = differentiate(&parse(input), "x").unwrap();
        assert_eq!(result, simplify(&parse(expected)), "d/dx[{input}]");
        assert!(!steps.is_empty());
    }

    #[test]
    fn constants_and_symbols() {
        assert_derivative("42", "0");
        assert_derivative("y", "0");
        assert_derivative("x", "1");
        assert_derivative("pi", "0");
    }

    #[test]
    fn power_rule() {
        assert_derivative("x^2", "2x");
        assert_derivative("x^5", "5x^4");
        assert_derivative("x^-2", "-2x^-3");
    }

    #[test]
    fn sum_and_difference() {
        assert_derivative("x^2 + x + 1", "2x + 1");
        assert_derivative("x^3 - x", "3x^2 - 1");
    }

    #[test]
    fn product_rule_binary() {
        // (x * sin(x))' = sin(x) + x cos(x)
        assert_derivative("x * sin(x)", "sin(x) + x*cos(x)");
    }

    #[test]
    fn product_rule_nary() {
        // (x * y * sin(x))' with y constant
        assert_derivative("x * y * sin(x)", "y*sin(x) + x*y*cos(x)");
    }

    #[test]
    fn quotient_rule() {
        // (x / (x + 1))' = 1 / (x + 1)^2
        let (result, _) = differentiate(&parse("x / (x + 1)"), "x").unwrap();
        let expected = simplify(&parse("(x + 1 - x) / (x + 1)^2"));
        assert_eq!(result, expected);
    }

    #[test]
    fn chain_rule() {
        assert_derivative("sin(x^2)", "2x*cos(x^2)");
        assert_derivative("exp(3x)", "3exp(3x)");
        assert_derivative("ln(x^2 + 1)", "2x / (x^2 + 1)");
    }

    #[test]
    fn exponential_rule() {
        // (2^x)' = ln(2) * 2^x
        assert_derivative("2^x", "ln(2) * 2^x");
    }

    #[test]
    fn logarithmic_differentiation() {
        // (x^x)' = x^x * (ln(x) + 1)
        assert_derivative("x^x", "x^x * (ln(x) + 1)");
    }

    #[test]
    fn unknown_function_placeholder() {
        let (result, _) = differentiate(&parse("f(x^2)"), "x").unwrap();
        // f'(x^2) * 2x
        let expected = simplify(&(
            Expr::call("f'", parse("x^2")) * parse("2x")
        ));
        assert_eq!(result, expected);
    }

    #[test]
    fn step_trace_ends_with_result() {
        let (result, steps) = differentiate(&parse("sin(x^2)"), "x").unwrap();
        assert!(!steps.is_empty());
        assert!(steps.last().unwrap().contains(&result.to_string()));
    }

    #[test]
    fn unsupported_nodes() {
        let err = differentiate(&parse("x = 1"), "x").unwrap_err();
        assert_eq!(err.kind(), "diff(unimplemented_node)");
    }

    #[test]
    fn linearity() {
        // d(a*u + b*v) = a*du + b*dv for constant a, b
        let combined = differentiate(&parse("3sin(x) + 5x^2"), "x").unwrap().0;
        let split = simplify(&parse("3cos(x) + 10x"));
        assert_eq!(combined, split);
    }
}
