//! Array built-in functions. None of them modify their argument.

use super::super::error::InterpreterError;
use super::{require_args, with_array};
use crate::value::Value;

pub fn builtin_first(args: &[Value]) -> Value {
    require_args!(args, 1);
    with_array!(args, "first", WrongArgumentType, |elements: &[Value]| {
        elements.first().cloned().unwrap_or(Value::Null)
    })
}

pub fn builtin_last(args: &[Value]) -> Value {
    require_args!(args, 1);
    with_array!(args, "last", WrongArgumentType, |elements: &[Value]| {
        elements.last().cloned().unwrap_or(Value::Null)
    })
}

pub fn builtin_tail(args: &[Value]) -> Value {
    require_args!(args, 1);
    with_array!(args, "tail", WrongArgumentType, |elements: &[Value]| {
        match elements.split_first() {
            Some((_, rest)) => Value::array(rest.to_vec()),
            None => Value::array(Vec::new()),
        }
    })
}

pub fn builtin_push(args: &[Value]) -> Value {
    require_args!(args, 2);
    with_array!(args, "push", WrongFirstArgumentType, |elements: &[Value]| {
        let mut pushed = Vec::with_capacity(elements.len() + 1);
        pushed.extend_from_slice(elements);
        pushed.push(args[1].clone());
        Value::array(pushed)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ints(values: &[i64]) -> Value {
        Value::array(values.iter().copied().map(Value::Integer).collect())
    }

    #[test]
    fn test_first_and_last() {
        assert_eq!(builtin_first(&[ints(&[1, 2, 3])]), Value::Integer(1));
        assert_eq!(builtin_last(&[ints(&[1, 2, 3])]), Value::Integer(3));
        assert_eq!(builtin_first(&[ints(&[])]), Value::Null);
        assert_eq!(builtin_last(&[ints(&[])]), Value::Null);
    }

    #[test]
    fn test_tail() {
        assert_eq!(builtin_tail(&[ints(&[1, 2, 3])]), ints(&[2, 3]));
        assert_eq!(builtin_tail(&[ints(&[1])]), ints(&[]));
        assert_eq!(builtin_tail(&[ints(&[])]), ints(&[]));
    }

    #[test]
    fn test_push_leaves_receiver_untouched() {
        let original = ints(&[1]);
        let pushed = builtin_push(&[original.clone(), Value::Integer(2)]);
        assert_eq!(pushed, ints(&[1, 2]));
        assert_eq!(original, ints(&[1]));
        assert!(!pushed.is_identical(&original));
    }

    #[test]
    fn test_type_errors() {
        assert_eq!(
            builtin_first(&[Value::Integer(1)]),
            Value::error("Argument to 'first' must be ARRAY, but got INTEGER")
        );
        assert_eq!(
            builtin_tail(&[Value::from("x")]),
            Value::error("Argument to 'tail' must be ARRAY, but got STRING")
        );
        assert_eq!(
            builtin_push(&[Value::Null, Value::Integer(1)]),
            Value::error("First argument to 'push' must be ARRAY, but got NULL")
        );
    }

    #[test]
    fn test_arity_errors() {
        assert_eq!(
            builtin_last(&[]),
            Value::error("Wrong number of arguments. Expected 1, but got 0")
        );
        assert_eq!(
            builtin_push(&[ints(&[])]),
            Value::error("Wrong number of arguments. Expected 2, but got 1")
        );
    }
}
