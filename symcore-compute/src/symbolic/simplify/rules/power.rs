//! Simplification rules for powers: nested exponents, powers of products, small binomial
//! expansions, and quotients of like bases.

use crate::primitive::int;
use crate::num::Num;
use crate::symbolic::{
    expr::Expr,
    simplify::{rules::{do_power, multiply::base_and_exponent}, step::Step},
    step_collector::StepCollector,
};

/// The largest integer exponent a power of a sum is expanded at. Larger exponents are left
/// alone to avoid blowing the expression up.
pub const MAX_BINOMIAL_EXPONENT: u32 = 5;

/// `(x^a)^b = x^(a*b)`
pub fn power_of_power(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |base, exp| {
        if let Expr::Pow(inner_base, inner_exp) = base {
            return Some(Expr::Pow(
                inner_base.clone(),
                Box::new((**inner_exp).clone() * exp.clone()),
            ));
        }

        None
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::PowerOfPower);
    Some(opt)
}

/// `(a*b)^c = a^c * b^c`
pub fn distribute_power(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |base, exp| {
        if let Expr::Mul(factors) = base {
            let new_factors = factors.iter()
                .map(|factor| Expr::Pow(
                    Box::new(factor.clone()),
                    Box::new(exp.clone()),
                ))
                .collect::<Vec<_>>();

            return Some(Expr::Mul(new_factors));
        }

        None
    })?;

    step_collector.push(Step::DistributePower);
    Some(opt)
}

/// Expands `(a+b)^n` for literal integer `2 <= n <=` [`MAX_BINOMIAL_EXPONENT`].
///
/// Two-term sums expand directly with binomial coefficients; longer sums expand by repeated
/// multiplication and let the distribution rule finish the job.
pub fn expand_binomial(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_power(expr, |base, exp| {
        let Expr::Add(terms) = base else { return None };
        let n = exp.as_number()?.as_integer()?.to_u32()?;
        if !(2..=MAX_BINOMIAL_EXPONENT).contains(&n) {
            return None;
        }

        if let [a, b] = terms.as_slice() {
            // (a + b)^n = sum of C(n, k) a^(n-k) b^k
            let expanded = (0..=n)
                .map(|k| {
                    let coefficient = int(n).binomial(k);
                    Expr::Number(Num::Integer(coefficient))
                        * a.clone().pow(Expr::Number(Num::Integer(int(n - k))))
                        * b.clone().pow(Expr::Number(Num::Integer(int(k))))
                })
                .collect::<Vec<_>>();
            Some(Expr::Add(expanded))
        } else {
            // longer sums: unroll into a product and let distribution expand it
            Some(Expr::Mul(vec![base.clone(); n as usize]))
        }
    })?;

    step_collector.push(Step::ExpandBinomial);
    Some(opt)
}

/// `a^b / a^c = a^(b-c)` (this subsumes `x/x = 1`, `x^2/x = x`, and `2x/x = 2`)
///
/// Works factor by factor: every denominator factor whose base also appears in the numerator is
/// cancelled into a single power with the exponents subtracted.
pub fn quotient_of_powers(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = {
        if let Expr::Div(lhs, rhs) = expr {
            let mut num_factors = match &**lhs {
                Expr::Mul(factors) => factors.clone(),
                other => vec![other.clone()],
            };
            let mut den_factors = match &**rhs {
                Expr::Mul(factors) => factors.clone(),
                other => vec![other.clone()],
            };

            let mut changed = false;
            let mut den_idx = 0;
            while den_idx < den_factors.len() {
                let (den_base, den_exp) = base_and_exponent(&den_factors[den_idx]);
                let matching = num_factors.iter()
                    .position(|factor| base_and_exponent(factor).0 == den_base && !den_base.is_number());

                if let Some(num_idx) = matching {
                    let (num_base, num_exp) = base_and_exponent(&num_factors[num_idx]);
                    num_factors[num_idx] = Expr::Pow(
                        Box::new(num_base),
                        Box::new(Expr::Sub(Box::new(num_exp), Box::new(den_exp))),
                    );
                    den_factors.swap_remove(den_idx);
                    changed = true;
                } else {
                    den_idx += 1;
                }
            }

            if changed {
                Some(Expr::Div(
                    Box::new(Expr::Mul(num_factors).downgrade()),
                    Box::new(Expr::Mul(den_factors).downgrade()),
                ))
            } else {
                None
            }
        } else {
            None
        }
    }?;

    step_collector.push(Step::QuotientOfPowers);
    Some(opt)
}

/// Applies all power rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    power_of_power(expr, step_collector)
        .or_else(|| distribute_power(expr, step_collector))
        .or_else(|| expand_binomial(expr, step_collector))
        .or_else(|| quotient_of_powers(expr, step_collector))
}
