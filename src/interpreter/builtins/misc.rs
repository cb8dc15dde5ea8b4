//! Builtins that accept more than one kind of value.

use super::super::error::InterpreterError;
use super::require_args;
use crate::value::Value;

/// Character count of a string or element count of an array.
pub fn builtin_len(args: &[Value]) -> Value {
    require_args!(args, 1);
    let count = match &args[0] {
        Value::Str(s) => s.chars().count(),
        Value::Array(elements) => elements.len(),
        other => {
            return InterpreterError::UnsupportedArgument {
                builtin: "len",
                got: other.type_name(),
            }
            .into()
        }
    };
    Value::Integer(count as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_len() {
        assert_eq!(builtin_len(&[Value::from("four")]), Value::Integer(4));
        assert_eq!(builtin_len(&[Value::from("")]), Value::Integer(0));
        assert_eq!(builtin_len(&[Value::from("héllo")]), Value::Integer(5));
        assert_eq!(
            builtin_len(&[Value::array(vec![Value::Null, Value::Null])]),
            Value::Integer(2)
        );
    }

    #[test]
    fn test_len_errors() {
        assert_eq!(
            builtin_len(&[Value::Integer(1)]),
            Value::error("Argument to 'len' not supported, got INTEGER")
        );
        assert_eq!(
            builtin_len(&[Value::from("one"), Value::from("two")]),
            Value::error("Wrong number of arguments. Expected 1, but got 2")
        );
    }
}
