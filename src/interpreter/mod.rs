pub mod builtins;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod parser;

use std::rc::Rc;

use tracing::debug;

use crate::ast::Program;
use crate::value::Value;

pub use builtins::Builtins;
pub use environment::Environment;
pub use error::{InterpreterError, LexError, ParseError, RunError};
pub use evaluator::{Evaluator, Node};
pub use parser::{parse, ParseResult, Parser, Precedence};

/// Evaluates `node` with the standard builtins.
pub fn evaluate<'a>(env: &Rc<Environment>, node: impl Into<Node<'a>>) -> Value {
    Evaluator::new().evaluate(env, node)
}

/// A session: one root environment that outlives every program run in it,
/// so `let` bindings carry over between separately parsed inputs.
pub struct Interpreter {
    env: Rc<Environment>,
    evaluator: Evaluator,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_builtins(Builtins::standard())
    }

    pub fn with_builtins(builtins: Builtins) -> Self {
        Self {
            env: Environment::new(),
            evaluator: Evaluator::with_builtins(builtins),
        }
    }

    pub fn environment(&self) -> &Rc<Environment> {
        &self.env
    }

    pub fn run(&self, program: &Program) -> Value {
        self.evaluator.evaluate(&self.env, program)
    }

    /// Parses and runs `source` in this session. Nothing is evaluated when
    /// the parse reports any error.
    pub fn eval_source(&self, source: &str) -> Result<Value, RunError> {
        let result = parse(source)?;
        if !result.is_ok() {
            debug!(count = result.errors.len(), "refusing to evaluate");
            return Err(RunError::Parse(result.errors));
        }
        Ok(self.run(&result.program))
    }
}

/// One-shot helper: parse and evaluate `source` in a fresh session.
pub fn parse_and_run(source: &str) -> Result<Value, RunError> {
    Interpreter::new().eval_source(source)
}
