//! Native functions reachable by name when lexical lookup fails.
//!
//! A builtin takes the already evaluated argument list and returns a single
//! value; arity and type problems come back as `Value::Error`, never as a
//! panic. Functions are grouped by what they operate on:
//! - **Array**: `first`, `last`, `tail`, `push`
//! - **Misc**: `len` (strings and arrays)

mod array;
mod misc;

pub use array::*;
pub use misc::*;

use std::collections::HashMap;

use crate::value::{Builtin, BuiltinFn};

// Callers must have `InterpreterError` in scope.
macro_rules! require_args {
    ($args:expr, $n:expr) => {
        if $args.len() != $n {
            return InterpreterError::WrongArgumentCount {
                expected: $n,
                got: $args.len(),
            }
            .into();
        }
    };
}

/// Runs `$body` on the array in the first argument, or reports the builtin's
/// type error. `$error` names the `InterpreterError` variant to use.
macro_rules! with_array {
    ($args:expr, $name:expr, $error:ident, $body:expr) => {
        match $args[0].as_array() {
            Some(elements) => $body(elements),
            None => InterpreterError::$error {
                builtin: $name,
                expected: "ARRAY",
                got: $args[0].type_name(),
            }
            .into(),
        }
    };
}

pub(crate) use require_args;
pub(crate) use with_array;

/// Name to native function table, injected into the evaluator.
#[derive(Debug, Clone, Default)]
pub struct Builtins {
    table: HashMap<&'static str, Builtin>,
}

impl Builtins {
    /// The reference library: `len`, `first`, `last`, `tail`, `push`.
    pub fn standard() -> Self {
        let mut builtins = Self::default();
        builtins
            .register("len", builtin_len)
            .register("first", builtin_first)
            .register("last", builtin_last)
            .register("tail", builtin_tail)
            .register("push", builtin_push);
        builtins
    }

    pub fn register(&mut self, name: &'static str, func: BuiltinFn) -> &mut Self {
        self.table.insert(name, Builtin { name, func });
        self
    }

    pub fn get(&self, name: &str) -> Option<Builtin> {
        self.table.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.keys().copied()
    }
}
