//! End-to-end scenarios exercising the whole pipeline: parse, simplify, differentiate,
//! integrate, series, and the display round trip.

use pretty_assertions::assert_eq;
use symcore_compute::{
    differentiate, integrate, parse, parse_with_env, simplify, to_display_string, Expr,
};
use symcore_parser::Environment;

#[test]
fn collect_like_terms() {
    // `2x + 3x` simplifies to `5x`
    let simplified = simplify(&parse("2x + 3x").unwrap());
    assert_eq!(simplified, Expr::Mul(vec![Expr::int(5), Expr::symbol("x")]));
    assert_eq!(to_display_string(&simplified), "5x");
}

#[test]
fn chain_rule_with_steps() {
    let (derivative, steps) = differentiate(&parse("sin(x^2)").unwrap(), "x").unwrap();

    assert_eq!(derivative, simplify(&parse("2x*cos(x^2)").unwrap()));

    // the trace is non-empty and its last entry restates the result
    assert!(!steps.is_empty());
    assert!(steps.last().unwrap().contains(&to_display_string(&derivative)));
}

#[test]
fn reciprocal_integrates_to_log() {
    let result = integrate(&parse("1/x").unwrap(), "x");
    assert_eq!(result, parse("ln(abs(x))").unwrap());
}

#[test]
fn by_parts_integration() {
    let result = integrate(&parse("x*exp(x)").unwrap(), "x");
    assert_eq!(result, simplify(&parse("(x - 1)*exp(x)").unwrap()));
}

#[test]
fn power_identities_do_not_raise() {
    assert_eq!(simplify(&parse("x^0").unwrap()), Expr::one());
    // 0^0 falls back to 1, and must not raise
    assert_eq!(simplify(&parse("0^0").unwrap()), Expr::one());
}

#[test]
fn full_constant_folding() {
    let simplified = simplify(&parse("(1+2)*(3)").unwrap());
    assert_eq!(simplified, Expr::int(9));
    // no residual sum or product nodes
    assert!(simplified.post_order_iter().all(|node| !matches!(node, Expr::Add(_) | Expr::Mul(_))));
}

#[test]
fn display_round_trip_is_a_fixed_point() {
    for input in [
        "2x + 3x",
        "sin(x^2) * 3",
        "x^2/2 - 1/x",
        "[1, 2, 3]",
        "y = 2x + 1",
        "√(x + 1)",
        "∫(exp(x^2), x)",
        "-x^2 + x!",
    ] {
        let first = to_display_string(&parse(input).unwrap());
        let second = to_display_string(&parse(&first).unwrap());
        assert_eq!(first, second, "display not stable for {input}");
    }
}

#[test]
fn differentiation_is_linear() {
    // d(a*u + b*v) = a*du + b*dv for constants a, b
    let u = "sin(x)";
    let v = "x^3";
    let combined = differentiate(&parse(&format!("7{u} + 11{v}")).unwrap(), "x").unwrap().0;

    let du = differentiate(&parse(u).unwrap(), "x").unwrap().0;
    let dv = differentiate(&parse(v).unwrap(), "x").unwrap().0;
    let split = simplify(&(Expr::int(7) * du + Expr::int(11) * dv));

    assert_eq!(combined, split);
}

#[test]
fn integrate_then_differentiate_round_trip() {
    for input in [
        "x^2",
        "sin(x)",
        "cos(3x)",
        "exp(2x)",
        "x*exp(x)",
        "2x*cos(x^2)",
        "1/x",
    ] {
        let original = simplify(&parse(input).unwrap());
        let integral = integrate(&original, "x");
        assert!(
            !matches!(integral, Expr::Integral(..)),
            "∫ {input} dx came back unevaluated",
        );

        let derivative = differentiate(&integral, "x").unwrap().0;
        let difference = simplify(&Expr::Sub(Box::new(derivative), Box::new(original)));
        assert_eq!(difference, Expr::zero(), "round trip failed for {input}");
    }
}

#[test]
fn simplify_is_idempotent() {
    for input in [
        "2x + 3x - x",
        "(x + 1)^3",
        "sin(x)^2 + cos(x)^2 + tan(x)",
        "ln(x*y^2)",
        "[1, 2] * [3, 4]",
        "x! + gamma(4)",
    ] {
        let once = simplify(&parse(input).unwrap());
        let twice = simplify(&once);
        assert_eq!(once, twice, "simplify not idempotent for {input}");
    }
}

#[test]
fn derivative_sugar_resolves_on_simplify() {
    let expr = parse("(d/dx)(x^2 + x)").unwrap();
    assert_eq!(
        simplify(&expr),
        simplify(&parse("2x + 1").unwrap()),
    );
}

#[test]
fn integral_sugar_of_constant_folds_at_parse() {
    // the parser's single-step folder normalizes the integral of a constant
    let expr = parse("∫(3, x)").unwrap();
    assert_eq!(expr, simplify(&parse("3x").unwrap()));
}

#[test]
fn constants_substitute_with_environment() {
    let env = Environment::with_math_constants();
    let expr = parse_with_env("2pi", &env).unwrap();

    let Expr::Mul(factors) = &expr else { panic!("expected a product") };
    assert!(factors.iter().any(|f| matches!(f, Expr::Constant { name, .. } if name == "pi")));

    // without the environment, `pi` is a plain symbol
    let expr = parse("2pi").unwrap();
    let Expr::Mul(factors) = &expr else { panic!("expected a product") };
    assert!(factors.iter().any(|f| matches!(f, Expr::Symbol(name) if name == "pi")));
}

#[test]
fn parse_errors_carry_stable_kinds() {
    for (input, kind) in [
        ("(1 + 2", "parse(unmatched_paren)"),
        ("1 +", "parse(missing_operand)"),
        ("1.2.3", "parse(invalid_number)"),
        ("1 ? 2", "parse(unknown_character)"),
    ] {
        let err = parse(input).unwrap_err();
        assert_eq!(err.kind_key(), kind, "wrong kind for {input:?}");
    }
}

#[test]
fn factorial_folds_and_gamma_normalizes() {
    assert_eq!(parse("5!").unwrap(), Expr::int(120));

    // symbolic factorials canonicalize through gamma
    let simplified = simplify(&parse("x!").unwrap());
    assert_eq!(
        simplified,
        Expr::call("gamma", simplify(&parse("x + 1").unwrap())),
    );

    // and literal gamma values fold back
    assert_eq!(simplify(&parse("gamma(4)").unwrap()), Expr::int(6));
}
