use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::FunctionLiteral;
use crate::interpreter::environment::Environment;

pub type BuiltinFn = fn(&[Value]) -> Value;

/// Runtime values. Arrays and dictionaries are shared and never mutated in
/// place: "modifying" operations build a new value.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Str(Rc<str>),
    Null,
    Array(Rc<Vec<Value>>),
    Dictionary(Rc<IndexMap<HashKey, Value>>),
    Function(Rc<Function>),
    Builtin(Builtin),
    /// Carries a `return` out of nested blocks; unwrapped at the call site
    /// or at the top of the program.
    Return(Box<Value>),
    Error(Rc<str>),
}

impl Value {
    pub fn error(message: impl Into<Rc<str>>) -> Self {
        Value::Error(message.into())
    }

    pub fn string(text: impl Into<Rc<str>>) -> Self {
        Value::Str(text.into())
    }

    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(elements))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::Str(_) => "STRING",
            Value::Null => "NULL",
            Value::Array(_) => "ARRAY",
            Value::Dictionary(_) => "DICTIONARY",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::Return(_) => "RETURN",
            Value::Error(_) => "ERROR",
        }
    }

    /// Only `false` and `null` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Language-level `==` for operands that are neither both integers nor
    /// both strings: booleans and null by value, composites by identity.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Dictionary(a), Value::Dictionary(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            _ => false,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        if let Value::Array(elements) = self {
            Some(elements.as_slice())
        } else {
            None
        }
    }
}

/// Structural comparison for host code and tests. Functions compare by
/// identity. The language's own `==` lives in `Value::is_identical` and the
/// evaluator.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Dictionary(a), Value::Dictionary(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a.name == b.name,
            (Value::Return(a), Value::Return(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }
}

/// The subset of values usable as dictionary keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    Str(Rc<str>),
}

impl HashKey {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(n) => Some(HashKey::Integer(*n)),
            Value::Boolean(b) => Some(HashKey::Boolean(*b)),
            Value::Str(s) => Some(HashKey::Str(s.clone())),
            _ => None,
        }
    }
}

impl From<&HashKey> for Value {
    fn from(key: &HashKey) -> Self {
        match key {
            HashKey::Integer(n) => Value::Integer(*n),
            HashKey::Boolean(b) => Value::Boolean(*b),
            HashKey::Str(s) => Value::Str(s.clone()),
        }
    }
}

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKey::Integer(n) => write!(f, "{}", n),
            HashKey::Boolean(b) => write!(f, "{}", b),
            HashKey::Str(s) => f.write_str(s),
        }
    }
}

/// A closure: the literal it was created from plus the environment that was
/// current at that point.
pub struct Function {
    pub literal: Rc<FunctionLiteral>,
    pub env: Rc<Environment>,
}

impl Function {
    pub fn params(&self) -> &[Rc<str>] {
        &self.literal.params
    }
}

// The captured environment may contain this very function, so it is left out.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("params", &self.literal.params)
            .field("body", &self.literal.body.to_string())
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Builtin").field(&self.name).finish()
    }
}

impl Builtin {
    pub fn call(&self, args: &[Value]) -> Value {
        (self.func)(args)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{}", n),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Str(s) => f.write_str(s),
            Value::Null => f.write_str("null"),
            Value::Array(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                f.write_str("]")
            }
            Value::Dictionary(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            Value::Function(function) => {
                writeln!(f, "fn({}) {{", function.params().join(", "))?;
                writeln!(f, "{}", function.literal.body)?;
                f.write_str("}")
            }
            Value::Builtin(_) => f.write_str("builtin function"),
            Value::Return(inner) => write!(f, "{}", inner),
            Value::Error(message) => write!(f, "ERROR: {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_truthiness() {
        assert!(Value::Integer(0).is_truthy());
        assert!(Value::string("").is_truthy());
        assert!(Value::array(vec![]).is_truthy());
        assert!(Value::Boolean(true).is_truthy());
        assert!(!Value::Boolean(false).is_truthy());
        assert!(!Value::Null.is_truthy());
    }

    #[test]
    fn test_identity_of_composites() {
        let a = Value::array(vec![Value::Integer(1)]);
        let b = Value::array(vec![Value::Integer(1)]);
        assert!(a.is_identical(&a.clone()));
        assert!(!a.is_identical(&b));
        assert_eq!(a, b);
        assert!(Value::Null.is_identical(&Value::Null));
    }

    #[test]
    fn test_accessors() {
        let array = Value::array(vec![Value::Integer(1)]);
        assert_eq!(array.as_array(), Some(&[Value::Integer(1)][..]));
        assert_eq!(Value::from("x").as_array(), None);
        assert!(Value::error("boom").is_error());
        assert!(!Value::Null.is_error());
    }

    #[test]
    fn test_hash_keys() {
        assert_eq!(HashKey::from_value(&Value::Integer(3)), Some(HashKey::Integer(3)));
        assert_eq!(HashKey::from_value(&Value::from("k")), Some(HashKey::Str(Rc::from("k"))));
        assert_eq!(HashKey::from_value(&Value::Null), None);
        assert_eq!(HashKey::from_value(&Value::array(vec![])), None);
    }

    #[test]
    fn test_inspect() {
        let mut pairs = IndexMap::new();
        pairs.insert(HashKey::Str(Rc::from("one")), Value::Integer(1));
        pairs.insert(HashKey::Boolean(true), Value::array(vec![Value::Null]));
        assert_eq!(Value::Dictionary(Rc::new(pairs)).to_string(), "{one: 1, true: [null]}");
        assert_eq!(Value::error("boom").to_string(), "ERROR: boom");
        assert_eq!(Value::Return(Box::new(Value::Integer(7))).to_string(), "7");
    }
}
