//! Trigonometric identities for literal `sin` / `cos` square terms.

use crate::num::Num;
use crate::symbolic::{
    expr::Expr,
    simplify::{coefficient_of, rules::{do_add, do_multiply}, step::Step},
    step_collector::StepCollector,
};

/// If the expression is `sin(u)^2` or `cos(u)^2`, returns the function name and its argument.
fn as_trig_square(expr: &Expr) -> Option<(&str, &Expr)> {
    let Expr::Pow(base, exp) = expr else { return None };
    if !exp.as_number().map(|n| *n == Num::from(2)).unwrap_or(false) {
        return None;
    }

    match &**base {
        Expr::Call(name, args) if (name == "sin" || name == "cos") && args.len() == 1 => {
            Some((name.as_str(), &args[0]))
        },
        _ => None,
    }
}

/// `sin(u)^2 + cos(u)^2 = 1`
/// `c*sin(u)^2 + c*cos(u)^2 = c`
pub fn pythagorean(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        for i in 0..terms.len() {
            let (coeff_i, base_i) = coefficient_of(&terms[i]);
            let Some(("sin", arg_i)) = as_trig_square(&base_i) else { continue };

            for j in 0..terms.len() {
                if i == j {
                    continue;
                }
                let (coeff_j, base_j) = coefficient_of(&terms[j]);
                let Some(("cos", arg_j)) = as_trig_square(&base_j) else { continue };

                if arg_i == arg_j && coeff_i == coeff_j {
                    let mut new_terms = Vec::with_capacity(terms.len() - 1);
                    for (k, term) in terms.iter().enumerate() {
                        if k == i {
                            new_terms.push(Expr::Number(coeff_i.clone()));
                        } else if k != j {
                            new_terms.push(term.clone());
                        }
                    }
                    return Some(Expr::Add(new_terms).downgrade());
                }
            }
        }

        None
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::TrigIdentity);
    Some(opt)
}

/// `cos(u)^2 - sin(u)^2 = cos(2u)`
pub fn double_angle_cos(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        for i in 0..terms.len() {
            let (coeff_i, base_i) = coefficient_of(&terms[i]);
            if !coeff_i.is_one() {
                continue;
            }
            let Some(("cos", arg_i)) = as_trig_square(&base_i) else { continue };

            for j in 0..terms.len() {
                if i == j {
                    continue;
                }
                let (coeff_j, base_j) = coefficient_of(&terms[j]);
                if coeff_j != -Num::one() {
                    continue;
                }
                let Some(("sin", arg_j)) = as_trig_square(&base_j) else { continue };

                if arg_i == arg_j {
                    let double = Expr::call("cos", Expr::int(2) * arg_i.clone());
                    let mut new_terms = Vec::with_capacity(terms.len() - 1);
                    for (k, term) in terms.iter().enumerate() {
                        if k == i {
                            new_terms.push(double.clone());
                        } else if k != j {
                            new_terms.push(term.clone());
                        }
                    }
                    return Some(Expr::Add(new_terms).downgrade());
                }
            }
        }

        None
    })?;

    step_collector.push(Step::TrigIdentity);
    Some(opt)
}

/// `2*sin(u)*cos(u) = sin(2u)`
pub fn double_angle_sin(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        let two_idx = factors.iter().position(|f| {
            f.as_number().map(|n| *n == Num::from(2)).unwrap_or(false)
        })?;
        let sin_idx = factors.iter().position(|f| {
            matches!(f, Expr::Call(name, args) if name == "sin" && args.len() == 1)
        })?;
        let cos_idx = factors.iter().position(|f| {
            matches!(f, Expr::Call(name, args) if name == "cos" && args.len() == 1)
        })?;

        let (Expr::Call(_, sin_args), Expr::Call(_, cos_args)) = (&factors[sin_idx], &factors[cos_idx]) else {
            unreachable!()
        };
        if sin_args[0] != cos_args[0] {
            return None;
        }

        let double = Expr::call("sin", Expr::int(2) * sin_args[0].clone());
        let rest = factors.iter()
            .enumerate()
            .filter(|(idx, _)| *idx != two_idx && *idx != sin_idx && *idx != cos_idx)
            .map(|(_, factor)| factor.clone())
            .collect::<Vec<_>>();

        Some((Expr::Mul(rest).downgrade()) * double)
    })?;

    step_collector.push(Step::TrigIdentity);
    Some(opt)
}

/// Applies all trigonometric rules.
///
/// All trigonometric rules will reduce the complexity of the expression.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    pythagorean(expr, step_collector)
        .or_else(|| double_angle_cos(expr, step_collector))
        .or_else(|| double_angle_sin(expr, step_collector))
}
