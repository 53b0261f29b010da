mod error;

use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs::File, io::{self, BufReader, IsTerminal, Read}};
use sym_compute::{ctxt::Ctxt, eval::evaluate, expr::Expression, simplify::simplify};
use sym_error::Error;

/// Heads the evaluator dispatches itself rather than through the function table. These can appear
/// in symbolic results without being "unknown".
const OPERATOR_HEADS: &[&str] = &[
    "Plus", "Times", "Divide", "Power", "Minus", "Equal", "Unequal", "Less", "LessEqual",
    "Greater", "GreaterEqual", "And", "Or", "If",
];

/// Parses and evaluates the given input string, simplifying whatever symbolic residue the
/// evaluator leaves behind.
fn parse_eval(input: &str, ctxt: &mut Ctxt) -> Result<Expression, Error> {
    let expr = sym_compute::parse(input)?;
    Ok(simplify(evaluate(&expr, ctxt)?))
}

/// Collects the heads of calls in the result that name no known function, walking the whole tree
/// so hints also fire for calls buried inside a larger symbolic result.
fn unknown_heads<'a>(expr: &'a Expression, ctxt: &Ctxt, out: &mut Vec<&'a str>) {
    match expr {
        Expression::Call(head, args) => {
            if !OPERATOR_HEADS.contains(&head.as_str())
                && ctxt.get_func(head).is_none()
                && !out.contains(&head.as_str())
            {
                out.push(head);
            }
            for arg in args {
                unknown_heads(arg, ctxt, out);
            }
        },
        Expression::List(items) => {
            for item in items {
                unknown_heads(item, ctxt, out);
            }
        },
        Expression::Rule(lhs, rhs) => {
            unknown_heads(lhs, ctxt, out);
            unknown_heads(rhs, ctxt, out);
        },
        _ => (),
    }
}

/// Prints a hint for each call left unevaluated because its function is not defined, suggesting
/// similarly-named functions where any exist.
fn hint_unknown_funcs(result: &Expression, ctxt: &Ctxt) {
    let mut heads = Vec::new();
    unknown_heads(result, ctxt, &mut heads);
    for head in heads {
        let similar = ctxt.get_similar_funcs(head);
        if similar.is_empty() {
            eprintln!("note: `{head}` is not defined");
        } else {
            eprintln!("note: `{head}` is not defined; did you mean {}?", similar.join(", "));
        }
    }
}

/// Reads from the provided input and parses / evaluates it, printing the success or failure.
fn read_eval(input: &str, ctxt: &mut Ctxt) {
    match parse_eval(input, ctxt) {
        Ok(res) => {
            println!("{res}");
            hint_unknown_funcs(&res, ctxt);
        },
        Err(err) => error::report_to_stderr(&err, input),
    }
}

/// Evaluates the given input line-by-line in a fresh context, printing each result.
fn execute(input: &str) {
    let mut ctxt = Ctxt::default();
    for line in input.lines() {
        if line.trim().is_empty() {
            continue;
        }
        read_eval(line, &mut ctxt);
    }
}

fn main() {
    let mut args = std::env::args();
    args.next();

    if let Some(filename) = args.next() {
        // run source file
        let mut file = BufReader::new(File::open(filename).unwrap());
        let mut input = String::new();
        file.read_to_string(&mut input).unwrap();

        execute(&input);
    } else if !io::stdin().is_terminal() {
        // read source from stdin
        let mut input = String::new();
        io::stdin().read_to_string(&mut input).unwrap();

        execute(&input);
    } else {
        // run the repl / interactive mode
        let mut rl = DefaultEditor::new().unwrap();
        let mut ctxt = Ctxt::default();

        fn process_line(rl: &mut DefaultEditor, ctxt: &mut Ctxt) -> Result<(), ReadlineError> {
            let input = rl.readline("> ")?;
            if input.trim().is_empty() {
                return Ok(());
            }

            rl.add_history_entry(&input)?;

            read_eval(&input, ctxt);
            Ok(())
        }

        loop {
            if let Err(err) = process_line(&mut rl, &mut ctxt) {
                match err {
                    ReadlineError::Eof | ReadlineError::Interrupted => (),
                    _ => eprintln!("{}", err),
                }
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn symbolic_results_are_simplified_before_printing() {
        let mut ctxt = Ctxt::default();
        assert_eq!(parse_eval("x + x", &mut ctxt).unwrap().to_string(), "2 * x");
        assert_eq!(parse_eval("x * x * y", &mut ctxt).unwrap().to_string(), "x^2 * y");
        assert_eq!(parse_eval("3 * x + x + 1", &mut ctxt).unwrap().to_string(), "4 * x + 1");
    }
}
