//! Tree-walking evaluator.
//!
//! Evaluation recurses directly on the host stack. A user program that
//! recurses without a base case exhausts that stack and aborts the process;
//! there is no depth limit and no recovery from it. Embedders that need a
//! deadline have to interrupt from the outside.

use indexmap::IndexMap;
use std::rc::Rc;
use tracing::trace;

use super::builtins::Builtins;
use super::environment::Environment;
use super::error::InterpreterError;
use crate::ast::{BinaryOp, BlockStatement, Expr, ExprKind, Program, Stmt, UnaryOp};
use crate::value::{Function, HashKey, Value};

/// Returns early from the enclosing function when `$value` is an error or a
/// pending `return`, otherwise yields it.
macro_rules! propagate {
    ($value:expr) => {
        match $value {
            value @ (Value::Error(_) | Value::Return(_)) => return value,
            value => value,
        }
    };
}

/// Anything `evaluate` can be pointed at.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Program(&'a Program),
    Stmt(&'a Stmt),
    Block(&'a BlockStatement),
    Expr(&'a Expr),
}

impl<'a> From<&'a Program> for Node<'a> {
    fn from(program: &'a Program) -> Self {
        Node::Program(program)
    }
}

impl<'a> From<&'a Stmt> for Node<'a> {
    fn from(stmt: &'a Stmt) -> Self {
        Node::Stmt(stmt)
    }
}

impl<'a> From<&'a BlockStatement> for Node<'a> {
    fn from(block: &'a BlockStatement) -> Self {
        Node::Block(block)
    }
}

impl<'a> From<&'a Expr> for Node<'a> {
    fn from(expr: &'a Expr) -> Self {
        Node::Expr(expr)
    }
}

/// Evaluates syntax trees against an environment, falling back to an
/// injected builtin table for names no scope binds.
#[derive(Debug, Clone)]
pub struct Evaluator {
    builtins: Builtins,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_builtins(Builtins::standard())
    }

    pub fn with_builtins(builtins: Builtins) -> Self {
        Self { builtins }
    }

    pub fn evaluate<'a>(&self, env: &Rc<Environment>, node: impl Into<Node<'a>>) -> Value {
        match node.into() {
            Node::Program(program) => self.eval_program(env, program),
            Node::Stmt(stmt) => self.eval_statement(env, stmt),
            Node::Block(block) => self.eval_block(env, block),
            Node::Expr(expr) => self.eval_expression(env, expr),
        }
    }

    fn eval_program(&self, env: &Rc<Environment>, program: &Program) -> Value {
        let mut result = Value::Null;
        for stmt in &program.statements {
            match self.eval_statement(env, stmt) {
                Value::Return(inner) => return *inner,
                error @ Value::Error(_) => return error,
                value => result = value,
            }
        }
        result
    }

    /// Like a program, but a pending `return` is handed up still wrapped so
    /// the enclosing call can see it.
    fn eval_block(&self, env: &Rc<Environment>, block: &BlockStatement) -> Value {
        let mut result = Value::Null;
        for stmt in &block.statements {
            result = propagate!(self.eval_statement(env, stmt));
        }
        result
    }

    fn eval_statement(&self, env: &Rc<Environment>, stmt: &Stmt) -> Value {
        match stmt {
            Stmt::Let { name, value, .. } => {
                let value = propagate!(self.eval_expression(env, value));
                env.set(Rc::clone(name), value);
                Value::Null
            }
            Stmt::Return { value, .. } => {
                let value = propagate!(self.eval_expression(env, value));
                Value::Return(Box::new(value))
            }
            Stmt::Expr(expr) => self.eval_expression(env, expr),
        }
    }

    fn eval_expression(&self, env: &Rc<Environment>, expr: &Expr) -> Value {
        match &expr.kind {
            ExprKind::Integer(n) => Value::Integer(*n),
            ExprKind::Boolean(b) => Value::Boolean(*b),
            ExprKind::Str(text) => Value::Str(Rc::clone(text)),
            ExprKind::Identifier(name) => self.eval_identifier(env, name),
            ExprKind::Prefix { op, right } => {
                let right = propagate!(self.eval_expression(env, right));
                eval_prefix(*op, &right)
            }
            ExprKind::Infix { left, op, right } => {
                let left = propagate!(self.eval_expression(env, left));
                let right = propagate!(self.eval_expression(env, right));
                eval_infix(*op, &left, &right)
            }
            ExprKind::If {
                condition,
                consequence,
                alternative,
            } => {
                let condition = propagate!(self.eval_expression(env, condition));
                if condition.is_truthy() {
                    self.eval_block(env, consequence)
                } else if let Some(alternative) = alternative {
                    self.eval_block(env, alternative)
                } else {
                    Value::Null
                }
            }
            ExprKind::Function(literal) => Value::Function(Rc::new(Function {
                literal: Rc::clone(literal),
                env: Rc::clone(env),
            })),
            ExprKind::Call { callee, args } => {
                let callee = propagate!(self.eval_expression(env, callee));
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(propagate!(self.eval_expression(env, arg)));
                }
                self.apply_function(&callee, &values)
            }
            ExprKind::Array { elements } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(propagate!(self.eval_expression(env, element)));
                }
                Value::array(values)
            }
            ExprKind::Dictionary { pairs } => self.eval_dictionary(env, pairs),
            ExprKind::Index { left, index } => {
                let left = propagate!(self.eval_expression(env, left));
                let index = propagate!(self.eval_expression(env, index));
                eval_index(&left, &index)
            }
        }
    }

    fn eval_identifier(&self, env: &Rc<Environment>, name: &str) -> Value {
        if let Some(value) = env.get(name) {
            return value;
        }
        match self.builtins.get(name) {
            Some(builtin) => Value::Builtin(builtin),
            None => InterpreterError::IdentifierNotFound(name.to_string()).into(),
        }
    }

    fn eval_dictionary(&self, env: &Rc<Environment>, pairs: &[(Expr, Expr)]) -> Value {
        let mut map = IndexMap::with_capacity(pairs.len());
        for (key_expr, value_expr) in pairs {
            let key = propagate!(self.eval_expression(env, key_expr));
            let value = propagate!(self.eval_expression(env, value_expr));
            let Some(key) = HashKey::from_value(&key) else {
                return InterpreterError::UnusableKey(key.type_name()).into();
            };
            map.insert(key, value);
        }
        Value::Dictionary(Rc::new(map))
    }

    fn apply_function(&self, callee: &Value, args: &[Value]) -> Value {
        match callee {
            Value::Function(function) => {
                trace!(arity = function.params().len(), "applying function");
                let params = function.params();
                if params.len() != args.len() {
                    return InterpreterError::WrongArgumentCount {
                        expected: params.len(),
                        got: args.len(),
                    }
                    .into();
                }

                let scope = Environment::with_parent(Rc::clone(&function.env));
                for (param, arg) in params.iter().zip(args) {
                    scope.set(Rc::clone(param), arg.clone());
                }
                match self.eval_block(&scope, &function.literal.body) {
                    Value::Return(inner) => *inner,
                    result => result,
                }
            }
            Value::Builtin(builtin) => {
                trace!(builtin = builtin.name, "applying builtin");
                builtin.call(args)
            }
            other => InterpreterError::NotAFunction(other.type_name()).into(),
        }
    }
}

fn eval_prefix(op: UnaryOp, right: &Value) -> Value {
    match op {
        UnaryOp::Not => match right {
            Value::Boolean(b) => Value::Boolean(!b),
            Value::Null => Value::Boolean(true),
            _ => Value::Boolean(false),
        },
        UnaryOp::Neg => match right {
            Value::Integer(n) => Value::Integer(n.wrapping_neg()),
            other => InterpreterError::UnknownPrefixOperator {
                op,
                operand: other.type_name(),
            }
            .into(),
        },
    }
}

fn eval_infix(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => eval_integer_infix(op, *a, *b),
        (Value::Str(a), Value::Str(b)) => match op {
            BinaryOp::Add => {
                let mut joined = String::with_capacity(a.len() + b.len());
                joined.push_str(a);
                joined.push_str(b);
                Value::string(joined)
            }
            _ => unknown_infix(op, left, right),
        },
        _ if left.type_name() != right.type_name() => InterpreterError::TypeMismatch {
            left: left.type_name(),
            op,
            right: right.type_name(),
        }
        .into(),
        _ => match op {
            BinaryOp::Eq => Value::Boolean(left.is_identical(right)),
            BinaryOp::NotEq => Value::Boolean(!left.is_identical(right)),
            _ => unknown_infix(op, left, right),
        },
    }
}

fn eval_integer_infix(op: BinaryOp, a: i64, b: i64) -> Value {
    match op {
        BinaryOp::Add => Value::Integer(a.wrapping_add(b)),
        BinaryOp::Sub => Value::Integer(a.wrapping_sub(b)),
        BinaryOp::Mul => Value::Integer(a.wrapping_mul(b)),
        BinaryOp::Div => match a.checked_div(b) {
            Some(quotient) => Value::Integer(quotient),
            None if b == 0 => InterpreterError::DivisionByZero.into(),
            // i64::MIN / -1
            None => Value::Integer(a.wrapping_div(b)),
        },
        BinaryOp::Less => Value::Boolean(a < b),
        BinaryOp::Greater => Value::Boolean(a > b),
        BinaryOp::Eq => Value::Boolean(a == b),
        BinaryOp::NotEq => Value::Boolean(a != b),
    }
}

fn unknown_infix(op: BinaryOp, left: &Value, right: &Value) -> Value {
    InterpreterError::UnknownInfixOperator {
        left: left.type_name(),
        op,
        right: right.type_name(),
    }
    .into()
}

fn eval_index(left: &Value, index: &Value) -> Value {
    match (left, index) {
        (Value::Array(elements), Value::Integer(i)) => usize::try_from(*i)
            .ok()
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or(Value::Null),
        (Value::Dictionary(pairs), key) => match HashKey::from_value(key) {
            Some(key) => pairs.get(&key).cloned().unwrap_or(Value::Null),
            None => InterpreterError::IndexNotSupported(left.type_name()).into(),
        },
        _ => InterpreterError::IndexNotSupported(left.type_name()).into(),
    }
}
