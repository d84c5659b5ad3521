//! Taylor series expansion, built on the differentiation engine.
//!
//! `series_expand("sin", x, 0, 5)` produces the order-5 Taylor polynomial of `sin` around 0 by
//! repeatedly differentiating `sin(x)` symbolically, substituting the center into each
//! derivative, and assembling `Σ f⁽ᵏ⁾(c)/k! · (x-c)ᵏ`. When a derivative cannot be computed
//! (an unknown function name, for example), the expansion is kept symbolic as an
//! [`Expr::SeriesTail`] marker instead of failing.

use rug::Integer;
use crate::num::Num;
use crate::symbolic::derivative::derivative_raw;
use crate::symbolic::expr::Expr;
use crate::symbolic::simplify::simplify;

/// Expands `func` around `center` in the given variable, up to and including the term of the
/// given order. The result is simplified.
pub fn series_expand(func: &str, var: &Expr, center: Num, order: u32) -> Expr {
    let tail = || Expr::SeriesTail {
        func: func.to_string(),
        var: Box::new(var.clone()),
        center: center.clone(),
        order,
    };

    // the expansion differentiates with respect to a concrete variable name
    let Some(var_name) = var.as_symbol() else { return tail() };

    let center_expr = Expr::Number(center.clone());
    let offset = simplify(&Expr::Sub(
        Box::new(var.clone()),
        Box::new(center_expr.clone()),
    ));

    let mut current = Expr::call(func, var.clone());
    let mut k_factorial = Integer::from(1);
    let mut terms = Vec::with_capacity(order as usize + 1);

    for k in 0..=order {
        if k > 0 {
            k_factorial *= k;
            current = match derivative_raw(&current, var_name) {
                Ok(next) => simplify(&next),
                Err(_) => return tail(),
            };

            // a placeholder derivative of an unknown function is not a usable coefficient
            if contains_placeholder(&current) {
                return tail();
            }
        }

        let coefficient = simplify(&current.substitute(var_name, &center_expr));
        let term = Expr::Div(
            Box::new(coefficient * offset.clone().pow(Expr::Number(Num::Integer(Integer::from(k))))),
            Box::new(Expr::Number(Num::Integer(k_factorial.clone()))),
        );
        terms.push(term);
    }

    simplify(&Expr::Add(terms))
}

/// Returns true if the expression contains a placeholder derivative (a call whose name carries
/// the prime marker the differentiation engine uses for unknown functions).
fn contains_placeholder(expr: &Expr) -> bool {
    expr.post_order_iter().any(|node| {
        matches!(node, Expr::Call(name, _) if name.ends_with('\''))
    })
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
    fn sin_around_zero() {
        // sin(x) ≈ x - x^3/6 + x^5/120
        let expansion = series_expand("sin", &Expr::symbol("x"), Num::zero(), 5);
        assert_eq!(expansion, simplify(&parse("x - x^3/6 + x^5/120")));
    }

    #[test]
    fn cos_around_zero() {
        // cos(x) ≈ 1 - x^2/2 + x^4/24
        let expansion = series_expand("cos", &Expr::symbol("x"), Num::zero(), 4);
        assert_eq!(expansion, simplify(&parse("1 - x^2/2 + x^4/24")));
    }

    #[test]
    fn exp_around_zero() {
        let expansion = series_expand("exp", &Expr::symbol("x"), Num::zero(), 3);
        assert_eq!(expansion, simplify(&parse("1 + x + x^2/2 + x^3/6")));
    }

    #[test]
    fn unknown_function_stays_symbolic() {
        let expansion = series_expand("mystery", &Expr::symbol("x"), Num::zero(), 3);
        assert_eq!(expansion, Expr::SeriesTail {
            func: "mystery".to_string(),
            var: Box::new(Expr::symbol("x")),
            center: Num::zero(),
            order: 3,
        });
    }

    #[test]
    fn parsed_series_call_resolves() {
        let expansion = simplify(&parse("series(sin, x, 0, 3)"));
        assert_eq!(expansion, simplify(&parse("x - x^3/6")));
    }
}
