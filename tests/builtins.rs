mod common;

use common::{error, eval, int, ints};
use kestrel::Value;
use pretty_assertions::assert_eq;

#[test]
fn test_len() {
    assert_eq!(eval(r#"len("")"#), int(0));
    assert_eq!(eval(r#"len("four")"#), int(4));
    assert_eq!(eval(r#"len("hello world")"#), int(11));
    assert_eq!(eval("len([1, 2, 3])"), int(3));
    assert_eq!(eval("len([])"), int(0));
    assert_eq!(eval("len(1)"), error("Argument to 'len' not supported, got INTEGER"));
    assert_eq!(
        eval(r#"len("one", "two")"#),
        error("Wrong number of arguments. Expected 1, but got 2")
    );
}

#[test]
fn test_first_last_tail() {
    assert_eq!(eval("first([1, 2, 3])"), int(1));
    assert_eq!(eval("first([])"), Value::Null);
    assert_eq!(eval("last([1, 2, 3])"), int(3));
    assert_eq!(eval("last([])"), Value::Null);
    assert_eq!(eval("tail([1, 2, 3])"), ints(&[2, 3]));
    assert_eq!(eval("tail([1])"), ints(&[]));
    assert_eq!(eval("tail([])"), ints(&[]));
    assert_eq!(eval("first(1)"), error("Argument to 'first' must be ARRAY, but got INTEGER"));
    assert_eq!(eval(r#"last("abc")"#), error("Argument to 'last' must be ARRAY, but got STRING"));
}

#[test]
fn test_push() {
    assert_eq!(eval("push([], 1)"), ints(&[1]));
    assert_eq!(
        eval("push(1, 1)"),
        error("First argument to 'push' must be ARRAY, but got INTEGER")
    );
    assert_eq!(
        eval("push([1])"),
        error("Wrong number of arguments. Expected 2, but got 1")
    );
}

#[test]
fn test_builtins_are_values() {
    assert_eq!(eval(r#"let size = len; size("ab")"#), int(2));
    assert_eq!(eval("len").to_string(), "builtin function");
    assert_eq!(eval("len == len"), Value::Boolean(true));
    assert_eq!(eval("len == first"), Value::Boolean(false));
}

#[test]
fn test_builtin_errors_propagate() {
    assert_eq!(
        eval("len(1) + 1"),
        error("Argument to 'len' not supported, got INTEGER")
    );
}

#[test]
fn test_map_and_reduce_in_the_language() {
    let map = "
        let map = fn(arr, f) {
            let iter = fn(arr, acc) {
                if (len(arr) == 0) { acc } else { iter(tail(arr), push(acc, f(first(arr)))) }
            };
            iter(arr, [])
        };
    ";
    assert_eq!(
        eval(&format!("{} map([1, 2, 3], fn(x) {{ x * 2 }})", map)),
        ints(&[2, 4, 6])
    );

    let sum = "
        let reduce = fn(arr, initial, f) {
            let iter = fn(arr, result) {
                if (len(arr) == 0) { result } else { iter(tail(arr), f(result, first(arr))) }
            };
            iter(arr, initial)
        };
        reduce([1, 2, 3, 4, 5], 0, fn(acc, x) { acc + x })
    ";
    assert_eq!(eval(sum), int(15));
}
