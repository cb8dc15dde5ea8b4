use thiserror::Error;

use crate::ast::{BinaryOp, UnaryOp};
use crate::token::TokenKind;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Cannot lex empty input")]
    EmptyInput,
    #[error("Unrecognized input at byte {offset}")]
    Unrecognized { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A required delimiter or identifier was missing. Parsing stops here.
    #[error("Next token should be of type {expected} but is instead of type {found}")]
    UnexpectedToken { expected: TokenKind, found: TokenKind },
    #[error("No prefix parsing function found for {0}")]
    NoPrefixParser(TokenKind),
    #[error("Could not parse {0} as integer")]
    InvalidInteger(String),
}

impl ParseError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::UnexpectedToken { .. })
    }
}

/// Language-level runtime errors. These never travel as `Err`; they are
/// turned into `Value::Error` and flow through the evaluator like any value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpreterError {
    #[error("Type mismatch: {left} {op} {right}")]
    TypeMismatch {
        left: &'static str,
        op: BinaryOp,
        right: &'static str,
    },
    #[error("Unknown operator: {left} {op} {right}")]
    UnknownInfixOperator {
        left: &'static str,
        op: BinaryOp,
        right: &'static str,
    },
    #[error("Unknown operator: {op}{operand}")]
    UnknownPrefixOperator { op: UnaryOp, operand: &'static str },
    #[error("Identifier not found: {0}")]
    IdentifierNotFound(String),
    #[error("Not a function: {0}")]
    NotAFunction(&'static str),
    #[error("Wrong number of arguments. Expected {expected}, but got {got}")]
    WrongArgumentCount { expected: usize, got: usize },
    #[error("Argument to '{builtin}' not supported, got {got}")]
    UnsupportedArgument {
        builtin: &'static str,
        got: &'static str,
    },
    #[error("Argument to '{builtin}' must be {expected}, but got {got}")]
    WrongArgumentType {
        builtin: &'static str,
        expected: &'static str,
        got: &'static str,
    },
    #[error("First argument to '{builtin}' must be {expected}, but got {got}")]
    WrongFirstArgumentType {
        builtin: &'static str,
        expected: &'static str,
        got: &'static str,
    },
    #[error("Index operator is not supported for: {0}")]
    IndexNotSupported(&'static str),
    #[error("Unusable as dictionary key: {0}")]
    UnusableKey(&'static str),
    #[error("Division by zero")]
    DivisionByZero,
}

impl From<InterpreterError> for Value {
    fn from(error: InterpreterError) -> Self {
        Value::error(error.to_string())
    }
}

/// Failure of the one-shot entry points before evaluation could start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("{}", join_messages(.0))]
    Parse(Vec<ParseError>),
}

fn join_messages(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
