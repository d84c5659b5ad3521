//! Simplification rules for expressions involving addition, including combining like terms.

use crate::num::Num;
use crate::symbolic::{
    expr::Expr,
    simplify::{coefficient_of, rules::do_add, step::Step},
    step_collector::StepCollector,
};

/// `0+a = a`
/// `a+0 = a`
pub fn add_zero(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let new_terms = terms.iter()
            .filter(|term| {
                // keep all non-zero terms
                term.as_number()
                    .map(|num| !num.is_zero())
                    .unwrap_or(true)
            })
            .cloned()
            .collect::<Vec<_>>();

        if new_terms.len() == terms.len() {
            None
        } else {
            Some(Expr::Add(new_terms).downgrade())
        }
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::AddZero);
    Some(opt)
}

/// Combines like terms.
///
/// `a+a = 2a`
/// `a+a+a = 3a`
/// `2a+3a = 5a`
/// etc.
pub fn combine_like_terms(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        let mut new_terms = terms.to_vec();
        let mut current_term_idx = 0;
        let mut combined = false;

        // this is O(n^2) worst case, due to scanning the whole vec for each term
        while current_term_idx < new_terms.len() {
            let (mut current_coeff, current_base) = coefficient_of(&new_terms[current_term_idx]);

            // look at every term after `current_term`
            let mut next_term_idx = current_term_idx + 1;
            while next_term_idx < new_terms.len() {
                let (next_coeff, next_base) = coefficient_of(&new_terms[next_term_idx]);

                // the symbolic parts must be strictly equal; canonical ordering makes this
                // reliable
                if current_base == next_base {
                    // apply n*a + m*a = (n+m)*a
                    current_coeff = current_coeff + next_coeff;
                    new_terms.swap_remove(next_term_idx);
                    combined = true;
                } else {
                    next_term_idx += 1;
                }
            }

            if combined {
                new_terms[current_term_idx] = rebuild_term(current_coeff, current_base);
            }
            current_term_idx += 1;
        }

        if combined {
            // zero-coefficient groups vanish
            new_terms.retain(|term| !term.is_zero());
            Some(Expr::Add(new_terms).downgrade())
        } else {
            None
        }
    })?;

    step_collector.push(Step::CombineLikeTerms);
    Some(opt)
}

/// Reassembles a term from its numeric coefficient and symbolic part.
fn rebuild_term(coeff: Num, base: Expr) -> Expr {
    if coeff.is_zero() {
        Expr::zero()
    } else if base.is_one() {
        Expr::Number(coeff)
    } else if coeff.is_one() {
        base
    } else {
        Expr::Number(coeff) * base
    }
}

/// Applies all addition rules.
///
/// All addition rules will reduce the complexity of the expression.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    add_zero(expr, step_collector)
        .or_else(|| combine_like_terms(expr, step_collector))
}
