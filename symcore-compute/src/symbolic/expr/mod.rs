//! A representation of mathematical expressions that is easier to manipulate than the parser's
//! AST.
//!
//! The [`Expr`](symcore_parser::parser::ast::Expr) type from `symcore_parser` is convenient for
//! parsing, but not for algebraic manipulation: it keeps parentheses, spans, and the exact
//! left-associative shape of the input. This module defines a separate [`Expr`], the closed sum
//! type all symbolic engines operate on. Conversion **flattens** nested sums and products: the
//! input `x + (y + z)` becomes a single [`Expr::Add`] node with _three_ children.
//!
//! Expression trees are immutable values. Every transformation constructs new nodes; no engine
//! mutates a node a caller still holds. There are no cycles by construction, so cloning is
//! ordinary recursive cloning.
//!
//! # Structural equality
//!
//! The derived [`PartialEq`] implements **structural** equality: variant tag plus recursive
//! field equality, sensitive to argument order. `x + 1` and `1 + x` are *not* structurally
//! equal; the simplifier canonicalizes argument order (see
//! [`simplify`](crate::symbolic::simplify)), after which logically-identical expressions compare
//! equal byte for byte.

mod display;
mod iter;

use crate::num::Num;
use crate::primitive::{float_from_str, int_from_str};
use iter::ExprIter;
use std::ops::{Add, Mul, Neg};
use symcore_parser::parser::ast::{expr::Expr as AstExpr, literal::Literal};
use symcore_parser::parser::token::op::{BinOpKind, UnaryOpKind};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A symbolic mathematical expression.
///
/// Every variant's fields are fully determined by its tag; partially-populated nodes cannot be
/// expressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Expr {
    /// A number: an exact integer or rational, or a float.
    Number(Num),

    /// A variable, identified by name.
    Symbol(String),

    /// A named constant carrying its own expansion, such as `pi`.
    Constant {
        /// The name of the constant.
        name: String,

        /// The value the constant expands to.
        value: Box<Expr>,
    },

    /// Multiple terms added together. Never empty after simplification.
    Add(Vec<Expr>),

    /// Multiple factors multiplied together. Never empty after simplification.
    Mul(Vec<Expr>),

    /// A difference. Kept as its own variant (rather than desugared into `Add`) because display
    /// and integration special-case it; the simplifier normalizes it away.
    Sub(Box<Expr>, Box<Expr>),

    /// A quotient. Kept as its own variant for the same reasons as [`Expr::Sub`].
    Div(Box<Expr>, Box<Expr>),

    /// An expression raised to a power.
    Pow(Box<Expr>, Box<Expr>),

    /// A negation.
    Neg(Box<Expr>),

    /// A function call, such as `sin(x)`.
    Call(String, Vec<Expr>),

    /// An algebraic equation. The simplifier normalizes `lhs = rhs` into `lhs - rhs = 0`.
    Equation(Box<Expr>, Box<Expr>),

    /// A tensor; nested tensors represent higher ranks. Opaque to the calculus engines.
    Tensor(Vec<Expr>),

    /// An integral the engine could not (or has not yet) solved.
    Integral(Box<Expr>, String),

    /// A limit, deferred for a collaborating engine. Pass-through here.
    Limit {
        /// The expression the limit is taken of.
        expr: Box<Expr>,

        /// The limit variable.
        var: String,

        /// The point the variable approaches.
        point: Box<Expr>,
    },

    /// A series expansion that could not be computed, kept symbolic.
    SeriesTail {
        /// The name of the function being expanded.
        func: String,

        /// The expansion variable.
        var: Box<Expr>,

        /// The center of the expansion.
        center: Num,

        /// The truncation order.
        order: u32,
    },
}

impl Expr {
    /// Creates an integer expression.
    pub fn int(n: i32) -> Self {
        Self::Number(Num::from(n))
    }

    /// The integer zero.
    pub fn zero() -> Self {
        Self::int(0)
    }

    /// The integer one.
    pub fn one() -> Self {
        Self::int(1)
    }

    /// Creates a symbol expression.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::Symbol(name.into())
    }

    /// Creates a call expression with a single argument.
    pub fn call(name: impl Into<String>, arg: Expr) -> Self {
        Self::Call(name.into(), vec![arg])
    }

    /// Raises this expression to the given power. No simplification is done.
    pub fn pow(self, exp: Expr) -> Self {
        Self::Pow(Box::new(self), Box::new(exp))
    }

    /// Returns the square root of this expression. No simplification is done.
    pub fn sqrt(self) -> Self {
        Self::call("sqrt", self)
    }

    /// The name of this node's kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Symbol(_) => "symbol",
            Self::Constant { .. } => "constant",
            Self::Add(_) => "sum",
            Self::Mul(_) => "product",
            Self::Sub(..) => "difference",
            Self::Div(..) => "quotient",
            Self::Pow(..) => "power",
            Self::Neg(_) => "negation",
            Self::Call(..) => "function call",
            Self::Equation(..) => "equation",
            Self::Tensor(_) => "tensor",
            Self::Integral(..) => "integral",
            Self::Limit { .. } => "limit",
            Self::SeriesTail { .. } => "series",
        }
    }

    /// If the expression is a [`Expr::Number`], returns a reference to the contained number.
    pub fn as_number(&self) -> Option<&Num> {
        match self {
            Self::Number(num) => Some(num),
            _ => None,
        }
    }

    /// If the expression is a [`Expr::Number`], returns the contained number.
    pub fn into_number(self) -> Option<Num> {
        match self {
            Self::Number(num) => Some(num),
            _ => None,
        }
    }

    /// Returns true if the expression is a [`Expr::Number`].
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }

    /// Returns true if the expression is the literal integer zero.
    pub fn is_zero(&self) -> bool {
        self.as_number().map(Num::is_zero).unwrap_or(false)
    }

    /// Returns true if the expression is the literal integer one.
    pub fn is_one(&self) -> bool {
        self.as_number().map(Num::is_one).unwrap_or(false)
    }

    /// If the expression is a [`Expr::Symbol`], returns the contained name.
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Self::Symbol(name) => Some(name),
            _ => None,
        }
    }

    /// Trivially downgrades the expression into a simpler form.
    ///
    /// Some operations may result in an [`Expr::Add`] with zero / one term, or an [`Expr::Mul`]
    /// with zero / one factor. This function checks for these cases and collapses the expression
    /// into the single term / factor, or the identity element 0 or 1.
    pub(crate) fn downgrade(self) -> Self {
        match self {
            Self::Add(mut terms) => {
                if terms.is_empty() {
                    Self::zero()
                } else if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    Self::Add(terms)
                }
            },
            Self::Mul(mut factors) => {
                if factors.is_empty() {
                    Self::one()
                } else if factors.len() == 1 {
                    factors.remove(0)
                } else {
                    Self::Mul(factors)
                }
            },
            _ => self,
        }
    }

    /// Returns true if the expression contains no free occurrence of the given variable.
    ///
    /// Bound occurrences do not count: the integration variable of an [`Expr::Integral`] and the
    /// limit variable of an [`Expr::Limit`] shadow the name inside their bodies.
    pub fn is_constant_wrt(&self, var: &str) -> bool {
        match self {
            Self::Number(_) => true,
            Self::Symbol(name) => name != var,
            Self::Constant { .. } => true,
            Self::Add(terms) | Self::Mul(terms) | Self::Tensor(terms) => {
                terms.iter().all(|term| term.is_constant_wrt(var))
            },
            Self::Sub(lhs, rhs) | Self::Div(lhs, rhs) | Self::Pow(lhs, rhs) | Self::Equation(lhs, rhs) => {
                lhs.is_constant_wrt(var) && rhs.is_constant_wrt(var)
            },
            Self::Neg(inner) => inner.is_constant_wrt(var),
            Self::Call(_, args) => args.iter().all(|arg| arg.is_constant_wrt(var)),
            Self::Integral(expr, bound) => bound == var || expr.is_constant_wrt(var),
            Self::Limit { expr, var: bound, point } => {
                point.is_constant_wrt(var) && (bound == var || expr.is_constant_wrt(var))
            },
            Self::SeriesTail { var: series_var, .. } => series_var.is_constant_wrt(var),
        }
    }

    /// Replaces every free occurrence of the given variable with the replacement expression,
    /// producing a new tree.
    pub fn substitute(&self, var: &str, replacement: &Expr) -> Expr {
        match self {
            Self::Number(_) | Self::Constant { .. } => self.clone(),
            Self::Symbol(name) => {
                if name == var {
                    replacement.clone()
                } else {
                    self.clone()
                }
            },
            Self::Add(terms) => Self::Add(terms.iter().map(|t| t.substitute(var, replacement)).collect()),
            Self::Mul(factors) => Self::Mul(factors.iter().map(|f| f.substitute(var, replacement)).collect()),
            Self::Sub(lhs, rhs) => Self::Sub(
                Box::new(lhs.substitute(var, replacement)),
                Box::new(rhs.substitute(var, replacement)),
            ),
            Self::Div(lhs, rhs) => Self::Div(
                Box::new(lhs.substitute(var, replacement)),
                Box::new(rhs.substitute(var, replacement)),
            ),
            Self::Pow(lhs, rhs) => Self::Pow(
                Box::new(lhs.substitute(var, replacement)),
                Box::new(rhs.substitute(var, replacement)),
            ),
            Self::Neg(inner) => Self::Neg(Box::new(inner.substitute(var, replacement))),
            Self::Call(name, args) => Self::Call(
                name.clone(),
                args.iter().map(|arg| arg.substitute(var, replacement)).collect(),
            ),
            Self::Equation(lhs, rhs) => Self::Equation(
                Box::new(lhs.substitute(var, replacement)),
                Box::new(rhs.substitute(var, replacement)),
            ),
            Self::Tensor(elements) => Self::Tensor(
                elements.iter().map(|e| e.substitute(var, replacement)).collect(),
            ),
            Self::Integral(expr, bound) => {
                if bound == var {
                    // the integration variable shadows the substitution
                    self.clone()
                } else {
                    Self::Integral(Box::new(expr.substitute(var, replacement)), bound.clone())
                }
            },
            Self::Limit { expr, var: bound, point } => Self::Limit {
                expr: if bound == var {
                    expr.clone()
                } else {
                    Box::new(expr.substitute(var, replacement))
                },
                var: bound.clone(),
                point: Box::new(point.substitute(var, replacement)),
            },
            Self::SeriesTail { func, var: series_var, center, order } => Self::SeriesTail {
                func: func.clone(),
                var: Box::new(series_var.substitute(var, replacement)),
                center: center.clone(),
                order: *order,
            },
        }
    }

    /// Serializes the expression into a compact structural key. Sorting sibling terms / factors
    /// by this key is what makes the canonical argument order deterministic.
    pub(crate) fn write_sort_key(&self, out: &mut String) {
        fn write_list(prefix: char, items: &[Expr], out: &mut String) {
            out.push(prefix);
            out.push('(');
            for item in items {
                item.write_sort_key(out);
                out.push(';');
            }
            out.push(')');
        }

        match self {
            Self::Number(num) => {
                out.push('#');
                out.push_str(&num.to_string());
            },
            Self::Symbol(name) => {
                out.push('$');
                out.push_str(name);
            },
            Self::Constant { name, .. } => {
                out.push('$');
                out.push_str(name);
            },
            Self::Mul(factors) => write_list('*', factors, out),
            Self::Add(terms) => write_list('+', terms, out),
            Self::Call(name, args) => {
                out.push('@');
                out.push_str(name);
                write_list('(', args, out);
            },
            Self::Pow(base, exp) => {
                out.push('^');
                out.push('(');
                base.write_sort_key(out);
                out.push(';');
                exp.write_sort_key(out);
                out.push(')');
            },
            Self::Sub(lhs, rhs) => {
                out.push('-');
                out.push('(');
                lhs.write_sort_key(out);
                out.push(';');
                rhs.write_sort_key(out);
                out.push(')');
            },
            Self::Div(lhs, rhs) => {
                out.push('/');
                out.push('(');
                lhs.write_sort_key(out);
                out.push(';');
                rhs.write_sort_key(out);
                out.push(')');
            },
            Self::Neg(inner) => {
                out.push('~');
                inner.write_sort_key(out);
            },
            Self::Equation(lhs, rhs) => {
                out.push('=');
                lhs.write_sort_key(out);
                out.push(';');
                rhs.write_sort_key(out);
            },
            Self::Tensor(elements) => write_list('[', elements, out),
            Self::Integral(expr, var) => {
                out.push('&');
                out.push_str(var);
                out.push(';');
                expr.write_sort_key(out);
            },
            Self::Limit { expr, var, point } => {
                out.push('L');
                out.push_str(var);
                out.push(';');
                expr.write_sort_key(out);
                point.write_sort_key(out);
            },
            Self::SeriesTail { func, var, center, order } => {
                out.push('S');
                out.push_str(func);
                out.push(';');
                var.write_sort_key(out);
                out.push_str(&center.to_string());
                out.push_str(&order.to_string());
            },
        }
    }

    /// Returns the structural sort key as an owned string.
    pub(crate) fn sort_key(&self) -> String {
        let mut out = String::new();
        self.write_sort_key(&mut out);
        out
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter {
        ExprIter::new(self)
    }
}

/// Adds two [`Expr`]s together. No simplification is done, except for the case where the
/// operands are a mix of [`Expr::Add`] and other expressions, in which case both are combined in
/// one list of terms (flattening). Source order is preserved.
impl Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        match (self, rhs) {
            (Self::Add(mut terms), Self::Add(rhs_terms)) => {
                terms.extend(rhs_terms);
                Self::Add(terms)
            },
            (Self::Add(mut terms), other) => {
                terms.push(other);
                Self::Add(terms)
            },
            (other, Self::Add(mut terms)) => {
                terms.insert(0, other);
                Self::Add(terms)
            },
            (lhs, rhs) => Self::Add(vec![lhs, rhs]),
        }
    }
}

/// Multiplies two [`Expr`]s together. No simplification is done, except for the case where the
/// operands are a mix of [`Expr::Mul`] and other expressions, in which case both are combined in
/// one list of factors (flattening). Source order is preserved.
impl Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Mul(mut factors), Self::Mul(other)) => {
                factors.extend(other);
                Self::Mul(factors)
            },
            (Self::Mul(mut factors), other) => {
                factors.push(other);
                Self::Mul(factors)
            },
            (other, Self::Mul(mut factors)) => {
                factors.insert(0, other);
                Self::Mul(factors)
            },
            (lhs, rhs) => Self::Mul(vec![lhs, rhs]),
        }
    }
}

/// Negates this expression. Numbers are negated in place; everything else is wrapped in an
/// [`Expr::Neg`] node for the simplifier to normalize.
impl Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Self::Number(num) => Self::Number(-num),
            expr => Self::Neg(Box::new(expr)),
        }
    }
}

impl From<AstExpr> for Expr {
    fn from(expr: AstExpr) -> Self {
        match expr {
            AstExpr::Literal(literal) => match literal {
                Literal::Integer(lit) => Self::Number(Num::Integer(int_from_str(&lit.value))),
                Literal::Float(lit) => Self::Number(Num::Float(float_from_str(&lit.value))),
                Literal::Symbol(sym) => Self::Symbol(sym.name),
                Literal::Constant(constant) => {
                    let value = if constant.value.contains('.') {
                        Num::Float(float_from_str(&constant.value))
                    } else {
                        Num::Integer(int_from_str(&constant.value))
                    };
                    Self::Constant {
                        name: constant.name,
                        value: Box::new(Self::Number(value)),
                    }
                },
            },
            AstExpr::Paren(paren) => Self::from(paren.into_innermost()),
            AstExpr::Call(call) => {
                let name = call.name.name;
                let mut args = call.args.into_iter().map(Self::from).collect::<Vec<_>>();

                // the sugared forms desugar into ordinary nodes here
                match (name.as_str(), args.len()) {
                    ("int", 2) if args[1].as_symbol().is_some() => {
                        let var = args.pop().unwrap().as_symbol().unwrap().to_string();
                        let integrand = args.pop().unwrap();
                        Self::Integral(Box::new(integrand), var)
                    },
                    ("limit", 3) if args[1].as_symbol().is_some() => {
                        let point = args.pop().unwrap();
                        let var = args.pop().unwrap().as_symbol().unwrap().to_string();
                        let inner = args.pop().unwrap();
                        Self::Limit {
                            expr: Box::new(inner),
                            var,
                            point: Box::new(point),
                        }
                    },
                    _ => Self::Call(name, args),
                }
            },
            AstExpr::Unary(unary) => match unary.op.kind {
                UnaryOpKind::Neg => -Self::from(*unary.operand),
                UnaryOpKind::Factorial => Self::call("factorial", Self::from(*unary.operand)),
            },
            AstExpr::Binary(bin) => match bin.op.kind {
                BinOpKind::Add => Self::from(*bin.lhs) + Self::from(*bin.rhs),
                BinOpKind::Mul => Self::from(*bin.lhs) * Self::from(*bin.rhs),
                BinOpKind::Sub => Self::Sub(
                    Box::new(Self::from(*bin.lhs)),
                    Box::new(Self::from(*bin.rhs)),
                ),
                BinOpKind::Div => Self::Div(
                    Box::new(Self::from(*bin.lhs)),
                    Box::new(Self::from(*bin.rhs)),
                ),
                BinOpKind::Exp => Self::Pow(
                    Box::new(Self::from(*bin.lhs)),
                    Box::new(Self::from(*bin.rhs)),
                ),
            },
            AstExpr::Tensor(tensor) => {
                Self::Tensor(tensor.elements.into_iter().map(Self::from).collect())
            },
            AstExpr::Equation(equation) => Self::Equation(
                Box::new(Self::from(*equation.lhs)),
                Box::new(Self::from(*equation.rhs)),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use symcore_parser::Parser;
    use super::*;

    /// Parse the given expression and return the [`Expr`] representation.
    fn parse_expr(input: &str) -> Expr {
        let ast = Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        Expr::from(ast)
    }

    #[test]
    fn flattens_nested_sums() {
        let expr = parse_expr("x + (y + z)");
        assert_eq!(expr, Expr::Add(vec![
            Expr::symbol("x"),
            Expr::symbol("y"),
            Expr::symbol("z"),
        ]));
    }

    #[test]
    fn flattens_nested_products() {
        let expr = parse_expr("2 * (x * y)");
        assert_eq!(expr, Expr::Mul(vec![
            Expr::int(2),
            Expr::symbol("x"),
            Expr::symbol("y"),
        ]));
    }

    #[test]
    fn keeps_sub_and_div() {
        let expr = parse_expr("x - y");
        assert_eq!(expr, Expr::Sub(
            Box::new(Expr::symbol("x")),
            Box::new(Expr::symbol("y")),
        ));

        let expr = parse_expr("x / y");
        assert_eq!(expr, Expr::Div(
            Box::new(Expr::symbol("x")),
            Box::new(Expr::symbol("y")),
        ));
    }

    #[test]
    fn factorial_desugars_to_call() {
        let expr = parse_expr("5!");
        assert_eq!(expr, Expr::call("factorial", Expr::int(5)));
    }

    #[test]
    fn integral_sugar_desugars_to_marker() {
        let expr = parse_expr("∫(x^2, x)");
        assert_eq!(expr, Expr::Integral(
            Box::new(Expr::symbol("x").pow(Expr::int(2))),
            "x".to_string(),
        ));
    }

    #[test]
    fn structural_equality_is_order_sensitive() {
        let a = parse_expr("x + 1");
        let b = parse_expr("1 + x");
        assert_ne!(a, b);
    }

    #[test]
    fn substitution() {
        let expr = parse_expr("x^2 + y");
        let substituted = expr.substitute("x", &Expr::int(3));
        assert_eq!(substituted, Expr::Add(vec![
            Expr::int(3).pow(Expr::int(2)),
            Expr::symbol("y"),
        ]));
    }

    #[test]
    fn substitution_respects_integral_binding() {
        let expr = Expr::Integral(Box::new(Expr::symbol("x")), "x".to_string());
        assert_eq!(expr.substitute("x", &Expr::int(1)), expr);
    }

    #[test]
    fn constant_wrt() {
        assert!(parse_expr("2y + sin(z)").is_constant_wrt("x"));
        assert!(!parse_expr("2y + sin(x)").is_constant_wrt("x"));
    }
}
