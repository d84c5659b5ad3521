use rustyline::{error::ReadlineError, DefaultEditor};
use std::io::{self, IsTerminal, Read};
use symcore_compute::{differentiate, integrate, parse_with_env, simplify, Expr};
use symcore_parser::Environment;

/// Parses and processes one input line, returning the text to display.
///
/// Simplification resolves the sugared derivative calls on its own; a top-level unevaluated
/// integral (from `∫(...)` input) is handed to the integration engine.
fn process(input: &str, env: &Environment) -> Result<String, symcore_error::Error> {
    let expr = parse_with_env(input, env)?;
    let simplified = simplify(&expr);

    let result = match simplified {
        Expr::Integral(integrand, var) => integrate(&integrand, &var),
        other => other,
    };

    Ok(result.to_string())
}

/// Processes one line and prints the result, or reports the error to stderr.
fn read_eval(input: &str, env: &Environment) {
    match process(input, env) {
        Ok(result) => println!("{}", result),
        Err(err) => {
            err.build_report("input")
                .eprint(("input", ariadne::Source::from(input)))
                .unwrap();
        },
    }
}

/// Handles a `:diff <var> <expr>` command, printing the derivation trace.
fn read_diff(input: &str, env: &Environment) {
    let Some((var, rest)) = input.trim_start().split_once(' ') else {
        eprintln!("usage: :diff <var> <expr>");
        return;
    };

    let expr = match parse_with_env(rest, env) {
        Ok(expr) => expr,
        Err(err) => {
            err.build_report("input")
                .eprint(("input", ariadne::Source::from(rest)))
                .unwrap();
            return;
        },
    };

    match differentiate(&expr, var) {
        Ok((result, steps)) => {
            for step in &steps {
                println!("  {}", step);
            }
            println!("{}", result);
        },
        Err(err) => eprintln!("{}", err),
    }
}

fn process_line(input: &str, env: &Environment) {
    if input.trim().is_empty() {
        return;
    }

    if let Some(rest) = input.strip_prefix(":diff") {
        read_diff(rest, env);
    } else {
        read_eval(input, env);
    }
}

fn main() {
    let env = Environment::with_math_constants();

    if !io::stdin().is_terminal() {
        // read expressions from stdin, one per line
        let mut input = String::new();
        io::stdin().read_to_string(&mut input).unwrap();
        for line in input.lines() {
            process_line(line, &env);
        }
        return;
    }

    // interactive mode
    let mut rl = DefaultEditor::new().unwrap();
    loop {
        match rl.readline("> ") {
            Ok(input) => {
                if rl.add_history_entry(&input).is_err() {
                    break;
                }
                process_line(&input, &env);
            },
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
            Err(err) => {
                eprintln!("{}", err);
                break;
            },
        }
    }
}
