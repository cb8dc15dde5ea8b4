#![allow(dead_code)]

use kestrel::interpreter::{parse, Environment, Evaluator};
use kestrel::Value;

/// Parses and evaluates `source` in a fresh environment, failing the test on
/// any parse error.
pub fn eval(source: &str) -> Value {
    let result = parse(source).expect("source should lex");
    assert!(
        result.is_ok(),
        "unexpected parse errors for {:?}: {:?}",
        source,
        result.errors
    );
    Evaluator::new().evaluate(&Environment::new(), &result.program)
}

pub fn int(n: i64) -> Value {
    Value::Integer(n)
}

pub fn ints(values: &[i64]) -> Value {
    Value::array(values.iter().copied().map(Value::Integer).collect())
}

pub fn error(message: &str) -> Value {
    Value::error(message)
}

/// Rendered parse error messages for `source`.
pub fn parse_errors(source: &str) -> Vec<String> {
    parse(source)
        .expect("source should lex")
        .errors
        .iter()
        .map(ToString::to_string)
        .collect()
}
