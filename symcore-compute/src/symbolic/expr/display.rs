//! The canonical pretty-printer.
//!
//! Expressions render with precedence-minimal parenthesization and implicit multiplication: a
//! numeric coefficient followed by a symbol, call, or bracketed expression prints without an
//! explicit `*`, so `Mul([2, x])` renders as `2x`. `sqrt` calls render with `√`, unevaluated
//! integrals with `∫`. Every rendered string re-parses to a structurally stable tree, which is
//! what makes `parse ∘ display` a fixed point.

use std::fmt;
use super::Expr;

/// Relative binding strength of the printable operator forms. Larger binds tighter.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
enum Prec {
    Equation,
    Term,
    Factor,
    Neg,
    Exp,
}

impl Expr {
    /// The precedence of the operator this node renders as, or [`None`] for self-delimiting
    /// nodes.
    fn precedence(&self) -> Option<Prec> {
        match self {
            Self::Equation(..) => Some(Prec::Equation),
            Self::Add(_) | Self::Sub(..) => Some(Prec::Term),
            Self::Mul(_) | Self::Div(..) => Some(Prec::Factor),
            Self::Neg(_) => Some(Prec::Neg),
            Self::Pow(..) => Some(Prec::Exp),
            _ => None,
        }
    }

    /// Returns true if this expression must be parenthesized when rendered inside an operator
    /// of the given precedence.
    fn needs_parens_in(&self, parent: Prec) -> bool {
        self.precedence().map(|prec| prec < parent).unwrap_or(false)
    }
}

/// Writes `expr`, parenthesized if required inside an operator of precedence `parent`.
fn fmt_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parent: Prec) -> fmt::Result {
    if expr.needs_parens_in(parent) {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

/// Returns true if a rendered factor may directly follow a numeric coefficient without an
/// explicit `*`, i.e. the juxtaposition re-lexes as implicit multiplication.
fn juxtaposable(rendered: &str) -> bool {
    matches!(
        rendered.chars().next(),
        Some(c) if c.is_alphabetic() || matches!(c, '(' | '[' | '√' | '∫' | '_')
    )
}

/// Writes a factor list with implicit multiplication where the result stays re-parseable.
fn fmt_factors(f: &mut fmt::Formatter<'_>, factors: &[Expr]) -> fmt::Result {
    let mut prev_was_number = false;
    for (i, factor) in factors.iter().enumerate() {
        let rendered = if factor.needs_parens_in(Prec::Factor) {
            format!("({})", factor)
        } else {
            factor.to_string()
        };

        if i > 0 {
            if prev_was_number && juxtaposable(&rendered) {
                // implicit multiplication: `2x`, `2sin(x)`, `2(x + 1)`
            } else {
                write!(f, " * ")?;
            }
        }
        write!(f, "{}", rendered)?;
        // a rational coefficient must keep its explicit `*`: `1/2x` would read as `1/(2x)`
        prev_was_number = matches!(
            factor.as_number(),
            Some(crate::num::Num::Integer(_)) | Some(crate::num::Num::Float(_)),
        );
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(num) => write!(f, "{}", num),
            Self::Symbol(name) => write!(f, "{}", name),
            Self::Constant { name, .. } => write!(f, "{}", name),
            Self::Add(terms) => {
                let mut iter = terms.iter();
                if let Some(term) = iter.next() {
                    fmt_operand(f, term, Prec::Term)?;
                    for term in iter {
                        let rendered = if term.needs_parens_in(Prec::Term) {
                            format!("({})", term)
                        } else {
                            term.to_string()
                        };

                        // negative terms render subtractively: `5 - 3x`, not `5 + -3x`
                        match rendered.strip_prefix('-') {
                            Some(rest) => write!(f, " - {}", rest)?,
                            None => write!(f, " + {}", rendered)?,
                        }
                    }
                }
                Ok(())
            },
            Self::Mul(factors) => {
                // a leading -1 coefficient renders as a bare sign
                if let [first, rest @ ..] = factors.as_slice() {
                    if !rest.is_empty() && first.as_number().map(|n| (-n.clone()).is_one()).unwrap_or(false) {
                        write!(f, "-")?;
                        return fmt_factors(f, rest);
                    }
                }
                fmt_factors(f, factors)
            },
            Self::Sub(lhs, rhs) => {
                fmt_operand(f, lhs, Prec::Term)?;
                write!(f, " - ")?;
                // subtraction is left-associative, so the right side needs parentheses at equal
                // precedence too
                if matches!(rhs.precedence(), Some(prec) if prec <= Prec::Term) {
                    write!(f, "({})", rhs)
                } else {
                    write!(f, "{}", rhs)
                }
            },
            Self::Div(lhs, rhs) => {
                fmt_operand(f, lhs, Prec::Factor)?;
                write!(f, "/")?;
                if matches!(rhs.precedence(), Some(prec) if prec <= Prec::Factor) {
                    write!(f, "({})", rhs)
                } else {
                    write!(f, "{}", rhs)
                }
            },
            Self::Neg(inner) => {
                write!(f, "-")?;
                if matches!(inner.precedence(), Some(prec) if prec <= Prec::Factor) {
                    write!(f, "({})", inner)
                } else {
                    write!(f, "{}", inner)
                }
            },
            Self::Pow(base, exp) => {
                // a negative or rational base would re-lex as something else entirely
                let base_needs_parens = base.needs_parens_in(Prec::Exp)
                    || base.as_number().map(|n| n.is_negative() || !matches!(n, crate::num::Num::Integer(_))).unwrap_or(false);
                if base_needs_parens {
                    write!(f, "({})", base)?;
                } else {
                    write!(f, "{}", base)?;
                }
                write!(f, "^")?;
                let exp_needs_parens = matches!(exp.precedence(), Some(prec) if prec < Prec::Exp)
                    || exp.as_number().map(|n| matches!(n, crate::num::Num::Rational(_))).unwrap_or(false);
                if exp_needs_parens {
                    write!(f, "({})", exp)
                } else {
                    write!(f, "{}", exp)
                }
            },
            Self::Call(name, args) => {
                if name == "sqrt" && args.len() == 1 {
                    return write!(f, "√({})", args[0]);
                }

                write!(f, "{}(", name)?;
                let mut iter = args.iter();
                if let Some(arg) = iter.next() {
                    write!(f, "{}", arg)?;
                    for arg in iter {
                        write!(f, ", {}", arg)?;
                    }
                }
                write!(f, ")")
            },
            Self::Equation(lhs, rhs) => write!(f, "{} = {}", lhs, rhs),
            Self::Tensor(elements) => {
                write!(f, "[")?;
                let mut iter = elements.iter();
                if let Some(element) = iter.next() {
                    write!(f, "{}", element)?;
                    for element in iter {
                        write!(f, ", {}", element)?;
                    }
                }
                write!(f, "]")
            },
            Self::Integral(expr, var) => write!(f, "∫({}, {})", expr, var),
            Self::Limit { expr, var, point } => write!(f, "limit({}, {}, {})", expr, var, point),
            Self::SeriesTail { func, var, center, order } => {
                write!(f, "series({}, {}, {}, {})", func, var, center, order)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::num::Num;
    use crate::primitive::rational;
    use super::*;

    #[test]
    fn implicit_multiplication() {
        let expr = Expr::Mul(vec![Expr::int(2), Expr::symbol("x")]);
        assert_eq!(expr.to_string(), "2x");

        let expr = Expr::Mul(vec![Expr::int(2), Expr::call("sin", Expr::symbol("x"))]);
        assert_eq!(expr.to_string(), "2sin(x)");
    }

    #[test]
    fn explicit_between_symbols() {
        let expr = Expr::Mul(vec![Expr::symbol("a"), Expr::symbol("b")]);
        assert_eq!(expr.to_string(), "a * b");
    }

    #[test]
    fn negative_coefficient_renders_subtractively() {
        let expr = Expr::Add(vec![
            Expr::int(5),
            Expr::Mul(vec![Expr::int(-3), Expr::symbol("x")]),
        ]);
        assert_eq!(expr.to_string(), "5 - 3x");
    }

    #[test]
    fn leading_minus_one() {
        let expr = Expr::Mul(vec![Expr::int(-1), Expr::symbol("x")]);
        assert_eq!(expr.to_string(), "-x");
    }

    #[test]
    fn precedence_minimal_parens() {
        // (x + 1) * 2
        let expr = Expr::Mul(vec![
            Expr::int(2),
            Expr::Add(vec![Expr::symbol("x"), Expr::int(1)]),
        ]);
        assert_eq!(expr.to_string(), "2(x + 1)");

        // x^2 needs no parens, (x + 1)^2 does
        assert_eq!(Expr::symbol("x").pow(Expr::int(2)).to_string(), "x^2");
        assert_eq!(
            Expr::Add(vec![Expr::symbol("x"), Expr::int(1)]).pow(Expr::int(2)).to_string(),
            "(x + 1)^2",
        );
    }

    #[test]
    fn rational_exponent_parenthesized() {
        let expr = Expr::symbol("x").pow(Expr::Number(Num::Rational(rational(1, 2))));
        assert_eq!(expr.to_string(), "x^(1/2)");
    }

    #[test]
    fn sqrt_and_integral() {
        assert_eq!(Expr::symbol("x").sqrt().to_string(), "√(x)");
        assert_eq!(
            Expr::Integral(Box::new(Expr::symbol("x")), "x".to_string()).to_string(),
            "∫(x, x)",
        );
    }

    #[test]
    fn quotient() {
        let expr = Expr::Div(
            Box::new(Expr::int(1)),
            Box::new(Expr::symbol("x")),
        );
        assert_eq!(expr.to_string(), "1/x");
    }
}
