//! Tensor arithmetic rules.
//!
//! Tensors are opaque to the calculus engines, but the simplifier recurses into their elements
//! and applies three bilinear rules: elementwise addition of same-shape tensors, scalar
//! scaling, and the dot / matrix product where the ranks permit. Anything else passes through
//! unchanged rather than erroring.

use crate::symbolic::{
    expr::Expr,
    simplify::{rules::{do_add, do_multiply}, step::Step},
    step_collector::StepCollector,
};

/// The shape of a tensor, restricted to the ranks the product rules understand.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Shape {
    /// A vector of the given length; no element is itself a tensor.
    Vector(usize),

    /// A matrix with the given number of rows and columns; every element is a row tensor of
    /// the same length.
    Matrix(usize, usize),
}

/// Computes the shape of a tensor's element list, if it is a well-formed vector or matrix.
fn shape_of(elements: &[Expr]) -> Option<Shape> {
    if elements.is_empty() {
        return None;
    }

    if elements.iter().all(|e| !matches!(e, Expr::Tensor(_))) {
        return Some(Shape::Vector(elements.len()));
    }

    let mut columns = None;
    for element in elements {
        let Expr::Tensor(row) = element else { return None };
        if row.iter().any(|e| matches!(e, Expr::Tensor(_))) {
            return None;
        }
        match columns {
            None => columns = Some(row.len()),
            Some(c) if c == row.len() => {},
            Some(_) => return None,
        }
    }

    Some(Shape::Matrix(elements.len(), columns.unwrap()))
}

/// Elementwise addition of same-shape tensors: `[a, b] + [c, d] = [a + c, b + d]`.
pub fn tensor_add(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_add(expr, |terms| {
        if terms.len() < 2 {
            return None;
        }

        let mut lists = Vec::with_capacity(terms.len());
        for term in terms {
            let Expr::Tensor(elements) = term else { return None };
            lists.push(elements);
        }

        let len = lists[0].len();
        if lists.iter().any(|l| l.len() != len) {
            return None;
        }

        let summed = (0..len)
            .map(|i| Expr::Add(lists.iter().map(|l| l[i].clone()).collect()))
            .collect();
        Some(Expr::Tensor(summed))
    })?;

    // keep the step collection logic outside of the closure to make it implement `Fn`
    step_collector.push(Step::TensorArithmetic);
    Some(opt)
}

/// Scalar scaling: `c * [a, b] = [c * a, c * b]`.
pub fn tensor_scale(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        let tensor_count = factors.iter().filter(|f| matches!(f, Expr::Tensor(_))).count();
        if tensor_count != 1 || factors.len() < 2 {
            return None;
        }

        let tensor_idx = factors.iter().position(|f| matches!(f, Expr::Tensor(_))).unwrap();
        let Expr::Tensor(elements) = &factors[tensor_idx] else { unreachable!() };

        let scalar = Expr::Mul(
            factors.iter()
                .enumerate()
                .filter(|(idx, _)| *idx != tensor_idx)
                .map(|(_, f)| f.clone())
                .collect(),
        ).downgrade();

        let scaled = elements.iter()
            .map(|element| scalar.clone() * element.clone())
            .collect();
        Some(Expr::Tensor(scaled))
    })?;

    step_collector.push(Step::TensorArithmetic);
    Some(opt)
}

/// Tensor products where the ranks permit: vector·vector (dot product), matrix·vector, and
/// matrix·matrix. Unsupported shapes pass through unchanged.
pub fn tensor_product(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    let opt = do_multiply(expr, |factors| {
        let tensor_indices = factors.iter()
            .enumerate()
            .filter(|(_, f)| matches!(f, Expr::Tensor(_)))
            .map(|(idx, _)| idx)
            .collect::<Vec<_>>();
        let [lhs_idx, rhs_idx] = tensor_indices.as_slice() else { return None };

        let (Expr::Tensor(lhs), Expr::Tensor(rhs)) = (&factors[*lhs_idx], &factors[*rhs_idx]) else {
            unreachable!()
        };
        let product = multiply_tensors(lhs, rhs)?;

        let rest = factors.iter()
            .enumerate()
            .filter(|(idx, _)| idx != lhs_idx && idx != rhs_idx)
            .map(|(_, f)| f.clone())
            .collect::<Vec<_>>();

        if rest.is_empty() {
            Some(product)
        } else {
            Some(Expr::Mul(rest).downgrade() * product)
        }
    })?;

    step_collector.push(Step::TensorArithmetic);
    Some(opt)
}

/// Multiplies two tensors by shape, or returns [`None`] when the shapes do not permit it.
fn multiply_tensors(lhs: &[Expr], rhs: &[Expr]) -> Option<Expr> {
    let row = |elements: &[Expr], i: usize| -> Vec<Expr> {
        match &elements[i] {
            Expr::Tensor(row) => row.clone(),
            _ => unreachable!(),
        }
    };

    match (shape_of(lhs)?, shape_of(rhs)?) {
        // dot product
        (Shape::Vector(n), Shape::Vector(m)) if n == m => {
            Some(Expr::Add(
                lhs.iter()
                    .zip(rhs)
                    .map(|(a, b)| a.clone() * b.clone())
                    .collect(),
            ))
        },
        // matrix · vector
        (Shape::Matrix(_, c), Shape::Vector(n)) if c == n => {
            Some(Expr::Tensor(
                (0..lhs.len())
                    .map(|i| Expr::Add(
                        row(lhs, i).iter()
                            .zip(rhs)
                            .map(|(a, b)| a.clone() * b.clone())
                            .collect(),
                    ))
                    .collect(),
            ))
        },
        // matrix · matrix
        (Shape::Matrix(_, lc), Shape::Matrix(rr, rc)) if lc == rr => {
            Some(Expr::Tensor(
                (0..lhs.len())
                    .map(|i| {
                        let lhs_row = row(lhs, i);
                        Expr::Tensor(
                            (0..rc)
                                .map(|j| Expr::Add(
                                    (0..lc)
                                        .map(|k| lhs_row[k].clone() * row(rhs, k)[j].clone())
                                        .collect(),
                                ))
                                .collect(),
                        )
                    })
                    .collect(),
            ))
        },
        _ => None,
    }
}

/// Applies all tensor rules.
pub fn all(expr: &Expr, step_collector: &mut dyn StepCollector<Step>) -> Option<Expr> {
    tensor_add(expr, step_collector)
        .or_else(|| tensor_scale(expr, step_collector))
        .or_else(|| tensor_product(expr, step_collector))
}

#[cfg(test)]
mod tests {
    use crate::symbolic::simplify::simplify;
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(input: &str) -> Expr {
        use symcore_parser::parser::ast::Expr as AstExpr;
        let ast = symcore_parser::Parser::new(input).try_parse_full::<AstExpr>().unwrap();
        Expr::from(ast)
    }

    #[test]
    fn elementwise_add() {
        assert_eq!(
            simplify(&parse("[1, 2] + [3, 4]")),
            Expr::Tensor(vec![Expr::int(4), Expr::int(6)]),
        );
    }

    #[test]
    fn scalar_scale() {
        assert_eq!(
            simplify(&parse("2[3, x]")),
            Expr::Tensor(vec![
                Expr::int(6),
                Expr::Mul(vec![Expr::int(2), Expr::symbol("x")]),
            ]),
        );
    }

    #[test]
    fn dot_product() {
        assert_eq!(simplify(&parse("[1, 2, 3] * [4, 5, 6]")), Expr::int(32));
    }

    #[test]
    fn matrix_product() {
        assert_eq!(
            simplify(&parse("[[1, 2][3, 4]] * [[5, 6][7, 8]]")),
            Expr::Tensor(vec![
                Expr::Tensor(vec![Expr::int(19), Expr::int(22)]),
                Expr::Tensor(vec![Expr::int(43), Expr::int(50)]),
            ]),
        );
    }

    #[test]
    fn mismatched_shapes_pass_through() {
        let expr = simplify(&parse("[1, 2] * [1, 2, 3]"));
        // no rule applies; the product node survives
        assert!(matches!(expr, Expr::Mul(_)));
    }
}
