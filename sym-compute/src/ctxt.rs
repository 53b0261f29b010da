//! The evaluation context, holding every variable and function visible to an expression.

use crate::builtin::{self, Builtin};
use crate::expr::{Expression, FuncDef};
use levenshtein::levenshtein;
use std::collections::HashMap;

/// The maximum recursion depth of a context. This is used to detect stack overflows caused by
/// unbounded recursion in user-defined functions.
pub const MAX_RECURSION_DEPTH: usize = 1 << 9;

/// A function available for use in a context.
#[derive(Debug, Clone)]
pub enum Func {
    /// A builtin function.
    Builtin(Builtin),

    /// A user-defined function.
    UserDefined(FuncDef),
}

/// A context to use when evaluating an expression, containing variables and functions that can be
/// used within the expression.
///
/// Function calls evaluate their bodies in a clone of the calling context with the parameters
/// bound on top, so assignments inside a call never leak out.
#[derive(Debug, Clone)]
pub struct Ctxt {
    /// The variables in the context.
    vars: HashMap<String, Expression>,

    /// The functions in the context.
    funcs: HashMap<String, Func>,

    /// The current depth of the stack. This is used to detect stack overflows.
    pub(crate) stack_depth: usize,
}

impl Default for Ctxt {
    fn default() -> Self {
        Self {
            vars: HashMap::from([
                ("Pi".to_string(), Expression::Number(std::f64::consts::PI)),
                ("E".to_string(), Expression::Number(std::f64::consts::E)),
            ]),
            funcs: builtin::all()
                .into_iter()
                .map(|(name, func)| (name.to_string(), Func::Builtin(func)))
                .collect(),
            stack_depth: 0,
        }
    }
}

impl Ctxt {
    /// Creates a new empty context.
    ///
    /// The empty context contains no variables and no builtin functions. Consider using the
    /// [`Default`] implementation instead.
    pub fn new() -> Ctxt {
        Ctxt {
            vars: HashMap::new(),
            funcs: HashMap::new(),
            ..Default::default()
        }
    }

    /// Add a variable to the context.
    pub fn add_var(&mut self, name: &str, value: Expression) {
        self.vars.insert(name.to_string(), value);
    }

    /// Get the value of a variable in the context.
    pub fn get_var(&self, name: &str) -> Option<Expression> {
        self.vars.get(name).cloned()
    }

    /// Returns the variables in the context.
    pub fn get_vars(&self) -> &HashMap<String, Expression> {
        &self.vars
    }

    /// Add a user-defined function to the context, shadowing any previous definition with the
    /// same name.
    pub fn add_func(&mut self, def: FuncDef) {
        self.funcs.insert(def.name.clone(), Func::UserDefined(def));
    }

    /// Get a function in the context.
    pub fn get_func(&self, name: &str) -> Option<&Func> {
        self.funcs.get(name)
    }

    /// Returns all functions in the context with a name similar to the given name.
    pub fn get_similar_funcs(&self, name: &str) -> Vec<&str> {
        self.funcs
            .iter()
            .filter(|(n, _)| levenshtein(n, name) < 2)
            .map(|(n, _)| n.as_str())
            .collect()
    }
}
