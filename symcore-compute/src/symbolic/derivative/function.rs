//! Symbolic derivatives of the named functions, with the chain rule applied to the inner
//! argument.

use crate::symbolic::expr::Expr;
use crate::symbolic::step_collector::StepCollector;
use crate::error::DiffError;
use super::{derivative, MultBuilder};

/// The derivative of `name(u)` with respect to `u`, for the functions with closed forms.
fn closed_form(name: &str, u: &Expr) -> Option<Expr> {
    Some(match name {
        "sin" => Expr::call("cos", u.clone()),
        "cos" => -Expr::call("sin", u.clone()),
        // d[tan u] = 1 / cos(u)^2
        "tan" => Expr::Div(
            Box::new(Expr::one()),
            Box::new(Expr::call("cos", u.clone()).pow(Expr::int(2))),
        ),
        "exp" => Expr::call("exp", u.clone()),
        "ln" => Expr::Div(Box::new(Expr::one()), Box::new(u.clone())),
        // log is base 10
        "log" => Expr::Div(
            Box::new(Expr::one()),
            Box::new(u.clone() * Expr::call("ln", Expr::int(10))),
        ),
        "sqrt" => Expr::Div(
            Box::new(Expr::one()),
            Box::new(Expr::int(2) * u.clone().sqrt()),
        ),
        "sinh" => Expr::call("cosh", u.clone()),
        "cosh" => Expr::call("sinh", u.clone()),
        "asin" => Expr::Div(
            Box::new(Expr::one()),
            Box::new((Expr::one() + -(u.clone().pow(Expr::int(2)))).sqrt()),
        ),
        "acos" => -Expr::Div(
            Box::new(Expr::one()),
            Box::new((Expr::one() + -(u.clone().pow(Expr::int(2)))).sqrt()),
        ),
        "atan" => Expr::Div(
            Box::new(Expr::one()),
            Box::new(Expr::one() + u.clone().pow(Expr::int(2))),
        ),
        _ => return None,
    })
}

/// Computes the derivative of a function call, applying the chain rule.
///
/// `ln(abs(u))` is special-cased to `u'/u`, matching the absolute-value logarithms the
/// integration engine produces. A function without a closed form produces the symbolic
/// placeholder `name'(u) * u'` rather than failing.
pub(super) fn function_derivative(
    name: &str,
    args: &[Expr],
    var: &str,
    depth: usize,
    steps: &mut dyn StepCollector<String>,
) -> Result<Expr, DiffError> {
    let [u] = args else {
        // no closed forms (or placeholders) exist for multi-argument calls
        return Err(DiffError::UnimplementedNode { node: "function call" });
    };

    // d[ln|u|] = u'/u
    if name == "ln" {
        if let Expr::Call(inner_name, inner_args) = u {
            if inner_name == "abs" && inner_args.len() == 1 {
                let inner = &inner_args[0];
                let du = derivative(inner, var, depth + 1, steps)?;
                let result = Expr::Div(Box::new(du), Box::new(inner.clone()));
                steps.push(format!("derivative of ln|u|: d/d{var}[ln(abs({inner}))] = {result}"));
                return Ok(result);
            }
        }
    }

    let du = derivative(u, var, depth + 1, steps)?;

    let outer = match closed_form(name, u) {
        Some(outer) => outer,
        None => {
            // unknown function: produce the symbolic placeholder name'(u) * u'
            let placeholder = Expr::call(format!("{name}'"), u.clone());
            let mut group = MultBuilder::default();
            group.mult(placeholder);
            group.mult(du);
            let result: Expr = group.into();
            steps.push(format!(
                "unknown function, keeping its derivative symbolic: d/d{var}[{name}({u})] = {result}"
            ));
            return Ok(result);
        },
    };

    let mut group = MultBuilder::default();
    group.mult(outer);
    group.mult(du);
    let result: Expr = group.into();
    steps.push(format!("chain rule: d/d{var}[{name}({u})] = {result}"));
    Ok(result)
}
