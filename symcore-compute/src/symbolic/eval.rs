//! Numeric evaluation of symbolic expressions.
//!
//! Evaluation needs two pieces of context, both passed in explicitly rather than read from
//! global state: the [`Bindings`] mapping variable names to values, and a [`FuncRegistry`] of
//! named function evaluators. The registry is built once at startup (see
//! [`FuncRegistry::default_set`] and [`default_registry`]) and can be extended by the host with
//! its own functions.

use once_cell::sync::Lazy;
use rug::ops::Pow;
use std::collections::HashMap;
use crate::error::EvalError;
use crate::num::Num;
use crate::symbolic::expr::Expr;

/// Variable bindings for numeric evaluation.
pub type Bindings = HashMap<String, Num>;

/// A named function evaluator.
pub type BuiltinFn = fn(&[Num]) -> Result<Num, EvalError>;

/// A registry of named function evaluators, consulted when a call node is evaluated.
#[derive(Debug, Clone, Default)]
pub struct FuncRegistry {
    funcs: HashMap<&'static str, BuiltinFn>,
}

impl FuncRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard registry: trigonometric and hyperbolic functions, exponentials and
    /// logarithms, roots, absolute value, factorial and gamma, and min / max.
    pub fn default_set() -> Self {
        let mut registry = Self::new();
        registry.insert("sin", |args| float_fn("sin", args, |f| f.sin()));
        registry.insert("cos", |args| float_fn("cos", args, |f| f.cos()));
        registry.insert("tan", |args| float_fn("tan", args, |f| f.tan()));
        registry.insert("asin", |args| float_fn("asin", args, |f| f.asin()));
        registry.insert("acos", |args| float_fn("acos", args, |f| f.acos()));
        registry.insert("atan", |args| float_fn("atan", args, |f| f.atan()));
        registry.insert("sinh", |args| float_fn("sinh", args, |f| f.sinh()));
        registry.insert("cosh", |args| float_fn("cosh", args, |f| f.cosh()));
        registry.insert("tanh", |args| float_fn("tanh", args, |f| f.tanh()));
        registry.insert("exp", |args| float_fn("exp", args, |f| f.exp()));
        registry.insert("ln", ln);
        registry.insert("log", log);
        registry.insert("sqrt", sqrt);
        registry.insert("abs", abs);
        registry.insert("factorial", factorial);
        registry.insert("gamma", gamma);
        registry.insert("min", min);
        registry.insert("max", max);
        registry
    }

    /// Registers (or replaces) a function evaluator.
    pub fn insert(&mut self, name: &'static str, func: BuiltinFn) {
        self.funcs.insert(name, func);
    }

    /// Looks up a function evaluator by name.
    pub fn get(&self, name: &str) -> Option<BuiltinFn> {
        self.funcs.get(name).copied()
    }

    /// Finds the registered name closest to the given name, for "did you mean" suggestions.
    fn closest_name(&self, name: &str) -> Option<String> {
        self.funcs.keys()
            .map(|candidate| (levenshtein::levenshtein(name, candidate), candidate))
            .filter(|(distance, _)| *distance <= 2)
            .min_by_key(|(distance, candidate)| (*distance, *candidate))
            .map(|(_, candidate)| candidate.to_string())
    }
}

/// The default registry, built once.
pub fn default_registry() -> &'static FuncRegistry {
    static REGISTRY: Lazy<FuncRegistry> = Lazy::new(FuncRegistry::default_set);
    &REGISTRY
}

/// Checks the argument count of a builtin call.
fn check_arity(name: &'static str, args: &[Num], expected: usize) -> Result<(), EvalError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(EvalError::BadArity {
            name,
            expected,
            found: args.len(),
        })
    }
}

/// Implements a one-argument float function.
fn float_fn(
    name: &'static str,
    args: &[Num],
    f: impl Fn(rug::Float) -> rug::Float,
) -> Result<Num, EvalError> {
    check_arity(name, args, 1)?;
    Ok(Num::Float(f(args[0].to_float())))
}

fn ln(args: &[Num]) -> Result<Num, EvalError> {
    check_arity("ln", args, 1)?;
    if args[0].is_zero() || args[0].is_negative() {
        return Err(EvalError::OutOfDomain { name: "ln" });
    }
    Ok(Num::Float(args[0].to_float().ln()))
}

fn log(args: &[Num]) -> Result<Num, EvalError> {
    check_arity("log", args, 1)?;
    if args[0].is_zero() || args[0].is_negative() {
        return Err(EvalError::OutOfDomain { name: "log" });
    }
    Ok(Num::Float(args[0].to_float().log10()))
}

fn sqrt(args: &[Num]) -> Result<Num, EvalError> {
    check_arity("sqrt", args, 1)?;
    if args[0].is_negative() {
        return Err(EvalError::OutOfDomain { name: "sqrt" });
    }

    // exact square roots stay exact
    if let Num::Integer(n) = &args[0] {
        if n.is_perfect_square() {
            return Ok(Num::Integer(n.clone().sqrt()));
        }
    }
    Ok(Num::Float(args[0].to_float().sqrt()))
}

fn abs(args: &[Num]) -> Result<Num, EvalError> {
    check_arity("abs", args, 1)?;
    Ok(args[0].clone().abs())
}

fn factorial(args: &[Num]) -> Result<Num, EvalError> {
    check_arity("factorial", args, 1)?;
    args[0].checked_factorial().ok_or(EvalError::OutOfDomain { name: "factorial" })
}

fn gamma(args: &[Num]) -> Result<Num, EvalError> {
    check_arity("gamma", args, 1)?;

    // gamma(n) = (n-1)! on the positive integers
    if let Num::Integer(n) = &args[0] {
        if *n >= 1 {
            return Num::Integer(n.clone() - 1)
                .checked_factorial()
                .ok_or(EvalError::OutOfDomain { name: "gamma" });
        }
        return Err(EvalError::OutOfDomain { name: "gamma" });
    }
    Ok(Num::Float(args[0].to_float().gamma()))
}

fn min(args: &[Num]) -> Result<Num, EvalError> {
    check_arity("min", args, 2)?;
    let (a, b) = (&args[0], &args[1]);
    Ok(if a.to_float() < b.to_float() { a.clone() } else { b.clone() })
}

fn max(args: &[Num]) -> Result<Num, EvalError> {
    check_arity("max", args, 2)?;
    let (a, b) = (&args[0], &args[1]);
    Ok(if a.to_float() > b.to_float() { a.clone() } else { b.clone() })
}

/// Numerically evaluates an expression with the given variable bindings and function registry.
pub fn eval(expr: &Expr, bindings: &Bindings, registry: &FuncRegistry) -> Result<Num, EvalError> {
    match expr {
        Expr::Number(num) => Ok(num.clone()),
        Expr::Symbol(name) => bindings.get(name).cloned().ok_or_else(|| EvalError::UnboundVariable {
            name: name.clone(),
        }),
        Expr::Constant { value, .. } => eval(value, bindings, registry),
        Expr::Add(terms) => {
            let mut sum = Num::zero();
            for term in terms {
                sum = sum + eval(term, bindings, registry)?;
            }
            Ok(sum)
        },
        Expr::Mul(factors) => {
            let mut product = Num::one();
            for factor in factors {
                product = product * eval(factor, bindings, registry)?;
            }
            Ok(product)
        },
        Expr::Sub(lhs, rhs) => {
            Ok(eval(lhs, bindings, registry)? - eval(rhs, bindings, registry)?)
        },
        Expr::Div(lhs, rhs) => {
            let lhs = eval(lhs, bindings, registry)?;
            let rhs = eval(rhs, bindings, registry)?;
            lhs.checked_div(rhs).ok_or(EvalError::DivideByZero)
        },
        Expr::Pow(base, exp) => {
            let base = eval(base, bindings, registry)?;
            let exp = eval(exp, bindings, registry)?;
            match base.clone().checked_pow(exp.clone()) {
                Some(result) => Ok(result),
                // exact base with fractional exponent: evaluation is explicitly numeric, so
                // degrading to a float is the requested behavior here
                None => Ok(Num::Float(base.into_float().pow(exp.into_float()))),
            }
        },
        Expr::Neg(inner) => Ok(-eval(inner, bindings, registry)?),
        Expr::Call(name, args) => {
            let func = registry.get(name).ok_or_else(|| EvalError::UnknownFunction {
                name: name.clone(),
                suggestion: registry.closest_name(name),
            })?;
            let args = args.iter()
                .map(|arg| eval(arg, bindings, registry))
                .collect::<Result<Vec<_>, _>>()?;
            func(&args)
        },
        Expr::Tensor(_) => Err(EvalError::NonNumericTensor),
        Expr::Equation(..)
            | Expr::Integral(..)
            | Expr::Limit { .. }
            | Expr::SeriesTail { .. } => Err(EvalError::UnsupportedNode {
            node: expr.kind_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use crate::primitive::{float, rational};
    use super::*;

    fn parse(input: &str) -> Expr {
        use symcore_parser::parser::ast::Expr as AstExpr;
        let ast = symcore_parser::Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        Expr::from(ast)
    }

    fn eval_at(input: &str, x: f64) -> Result<Num, EvalError> {
        let mut bindings = Bindings::new();
        bindings.insert("x".to_string(), Num::Float(float(x)));
        eval(&parse(input), &bindings, default_registry())
    }

    #[test]
    fn arithmetic_stays_exact() {
        let result = eval(&parse("1/3 + 1/6"), &Bindings::new(), default_registry()).unwrap();
        assert_eq!(result, Num::Rational(rational(1, 2)));
    }

    #[test]
    fn bound_variable() {
        let result = eval_at("x^2 + 1", 3.0).unwrap();
        assert_float_absolute_eq!(result.to_float().to_f64(), 10.0);
    }

    #[test]
    fn unbound_variable() {
        let err = eval(&parse("y + 1"), &Bindings::new(), default_registry()).unwrap_err();
        assert_eq!(err.kind(), "eval(unbound_variable)");
    }

    #[test]
    fn division_by_zero() {
        let err = eval(&parse("1/(2 - 2)"), &Bindings::new(), default_registry()).unwrap_err();
        assert_eq!(err.kind(), "eval(divide_by_zero)");
    }

    #[test]
    fn unknown_function_suggests() {
        let err = eval(&parse("sine(1)"), &Bindings::new(), default_registry()).unwrap_err();
        let EvalError::UnknownFunction { suggestion, .. } = &err else {
            panic!("expected unknown function, got {err:?}");
        };
        assert_eq!(suggestion.as_deref(), Some("sin"));
        assert_eq!(err.kind(), "eval(unknown_function)");
    }

    #[test]
    fn registry_functions() {
        let result = eval_at("sin(x)^2 + cos(x)^2", 0.7).unwrap();
        assert_float_absolute_eq!(result.to_float().to_f64(), 1.0);

        let result = eval(&parse("factorial(5)"), &Bindings::new(), default_registry()).unwrap();
        assert_eq!(result, Num::from(120));
    }

    #[test]
    fn tensors_do_not_evaluate() {
        let err = eval(&parse("[1, 2]"), &Bindings::new(), default_registry()).unwrap_err();
        assert_eq!(err.kind(), "eval(non_numeric_tensor)");
    }
}
