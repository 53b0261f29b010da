//! Function application: operator heads, builtins, and user-defined functions.

use crate::ctxt::{Ctxt, Func, MAX_RECURSION_DEPTH};
use crate::error::{kind, Error};
use crate::expr::{Expression, FuncDef};
use super::{arith, evaluate};

/// Applies a head to already-evaluated arguments.
///
/// Resolution order: arithmetic and comparison operators, then functions in the context
/// (builtin or user-defined). A head bound to nothing returns the call unevaluated, so the
/// expression stays symbolic until a definition appears.
pub(super) fn apply(
    head: String,
    args: Vec<Expression>,
    ctxt: &mut Ctxt,
) -> Result<Expression, Error> {
    match head.as_str() {
        "Plus" => return arith::plus(args),
        "Times" => return arith::times(args),
        "Divide" => return binary("Divide", args, arith::divide),
        "Power" => return binary("Power", args, arith::power),
        "Minus" => {
            // normalized input never contains `Minus`, but trees built by hand might
            return binary("Minus", args, |lhs, rhs| {
                arith::plus(vec![lhs, arith::times(vec![Expression::Number(-1.0), rhs])?])
            });
        },
        "Equal" | "Unequal" | "Less" | "LessEqual" | "Greater" | "GreaterEqual" => {
            let name = head.as_str();
            return binary(name, args, |lhs, rhs| arith::compare(name, lhs, rhs));
        },
        _ => {},
    }

    match ctxt.get_func(&head) {
        Some(Func::Builtin(builtin)) => builtin.eval(args),
        Some(Func::UserDefined(def)) => {
            let def = def.clone();
            invoke(&def, args, ctxt)
        },
        None => Ok(Expression::Call(head, args)),
    }
}

fn binary(
    head: &str,
    args: Vec<Expression>,
    f: impl FnOnce(Expression, Expression) -> Result<Expression, Error>,
) -> Result<Expression, Error> {
    match <[Expression; 2]>::try_from(args) {
        Ok([lhs, rhs]) => f(lhs, rhs),
        // operator heads with an unexpected arity stay symbolic
        Err(args) => Ok(Expression::Call(head.to_string(), args)),
    }
}

/// Invokes a user-defined function.
///
/// Missing arguments are filled from parameter defaults, which are evaluated in the
/// caller's scope. The body then runs in a clone of the calling context with the
/// parameters bound on top, so nothing the body assigns leaks back out.
fn invoke(def: &FuncDef, args: Vec<Expression>, ctxt: &mut Ctxt) -> Result<Expression, Error> {
    if args.len() > def.params.len() {
        return Err(Error::new(vec![], kind::TooManyArguments {
            name: def.name.clone(),
            expected: def.params.len(),
            given: args.len(),
        }));
    }

    let given = args.len();
    let mut bindings = Vec::with_capacity(def.params.len());
    let mut args = args.into_iter();
    for param in &def.params {
        let value = match args.next() {
            Some(value) => value,
            None => match &param.default {
                Some(default) => evaluate(default, ctxt)?,
                None => {
                    return Err(Error::new(vec![], kind::MissingArgument {
                        name: def.name.clone(),
                        param: param.name.clone(),
                        expected: def.params.len(),
                        given,
                    }));
                },
            },
        };
        bindings.push((param.name.clone(), value));
    }

    let mut call_ctxt = ctxt.clone();
    call_ctxt.stack_depth += 1;
    if call_ctxt.stack_depth > MAX_RECURSION_DEPTH {
        return Err(Error::new(vec![], kind::StackOverflow { name: def.name.clone() }));
    }
    for (name, value) in bindings {
        call_ctxt.add_var(&name, value);
    }
    evaluate(&def.body, &mut call_ctxt)
}
