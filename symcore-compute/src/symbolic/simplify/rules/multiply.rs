//! Simplification rules for expressions involving multiplication, including combining like
//! factors.

use crate::symbolic::{
    expr::Expr,
    simplify::{rules::do_multiply, step::Step},
    step_collector::StepCollector,
};

/// `0*a = 0`
/// `a*0 = 0`
pub fn multiply_zero(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        if factors.iter().any(|factor| factor.is_zero()) {
            Some(Expr::zero())
        } else {
            None
        }
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::MultiplyZero);
    Some(opt)
}

/// `1*a = a`
/// `a*1 = a`
pub fn multiply_one(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        let new_factors = factors.iter()
            .filter(|factor| {
                // keep all non-one factors
                factor.as_number()
                    .map(|num| !num.is_one())
                    .unwrap_or(true)
            })
            .cloned()
            .collect::<Vec<_>>();

        if new_factors.len() == factors.len() {
            None
        } else {
            Some(Expr::Mul(new_factors).downgrade())
        }
    })?;

    step_collector.push(Step::MultiplyOne);
    Some(opt)
}

/// Utility function to extract the base and exponent of an expression. If the expression is not
/// [`Expr::Pow`], the exponent is `1`.
///
/// - `a^b` -> `(a, b)`
/// - `a` -> `(a, 1)`
pub(crate) fn base_and_exponent(expr: &Expr) -> (Expr, Expr) {
    match expr {
        Expr::Pow(lhs, rhs) => ((**lhs).clone(), (**rhs).clone()),
        expr => (expr.clone(), Expr::one()),
    }
}

/// Combines like factors.
///
/// `a^b*a^c = a^(b+c)` (this subsumes `a*a = a^2` and `a*a^-1 = 1`)
/// `a^c*b^c = (a*b)^c` for numeric bases
pub fn combine_like_factors(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        let mut new_factors = factors.to_vec();
        let mut current_factor_idx = 0;
        let mut combined = false;

        // this is O(n^2) worst case, due to scanning the whole vec for each factor
        while current_factor_idx < new_factors.len() {
            let (mut current_base, mut current_exp) = base_and_exponent(&new_factors[current_factor_idx]);

            // look at every factor after `current_factor`
            let mut next_factor_idx = current_factor_idx + 1;
            while next_factor_idx < new_factors.len() {
                let (next_base, next_exp) = base_and_exponent(&new_factors[next_factor_idx]);

                if current_exp == next_exp
                    && !current_exp.is_one()
                    && current_base.is_number()
                    && next_base.is_number() {
                    // numeric bases with strictly equal exponents
                    // apply a^c*b^c = (a*b)^c
                    current_base = current_base * next_base;
                    new_factors.swap_remove(next_factor_idx);
                    combined = true;
                } else if current_base == next_base {
                    // strictly equal bases
                    // apply a^b*a^c = a^(b+c)
                    current_exp = current_exp + next_exp;
                    new_factors.swap_remove(next_factor_idx);
                    combined = true;
                } else {
                    next_factor_idx += 1;
                }
            }

            if combined {
                // after all combining, update the current factor
                new_factors[current_factor_idx] = if current_exp.is_one() {
                    current_base
                } else {
                    Expr::Pow(Box::new(current_base), Box::new(current_exp))
                };
            }

            current_factor_idx += 1;
        }

        if combined {
            Some(Expr::Mul(new_factors).downgrade())
        } else {
            None
        }
    })?;

    step_collector.push(Step::CombineLikeFactors);
    Some(opt)
}

/// Lifts quotient factors out of a product: `a * (b/c) = (a*b)/c`.
///
/// This puts every product with division into a single canonical quotient, so that rules which
/// match on [`Expr::Div`] see the whole numerator and denominator at once.
pub fn lift_quotients(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        if !factors.iter().any(|factor| matches!(factor, Expr::Div(..))) {
            return None;
        }

        let mut numerator = Vec::with_capacity(factors.len());
        let mut denominator = Vec::new();
        for factor in factors {
            match factor {
                Expr::Div(lhs, rhs) => {
                    numerator.push((**lhs).clone());
                    denominator.push((**rhs).clone());
                },
                other => numerator.push(other.clone()),
            }
        }

        Some(Expr::Div(
            Box::new(Expr::Mul(numerator).downgrade()),
            Box::new(Expr::Mul(denominator).downgrade()),
        ))
    })?;

    step_collector.push(Step::CombineLikeFactors);
    Some(opt)
}

/// Applies all multiplication rules.
///
/// All multiplication rules will reduce the complexity of the expression.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    multiply_zero(expr, step_collector)
        .or_else(|| multiply_one(expr, step_collector))
        .or_else(|| combine_like_factors(expr, step_collector))
        .or_else(|| lift_quotients(expr, step_collector))
}
