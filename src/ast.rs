//! Syntax tree produced by the parser.
//!
//! Every node keeps the token it started from, and every node renders itself
//! through `Display` in a fully parenthesized form, e.g. `((5 + 5) * 2)`.

use std::fmt;
use std::rc::Rc;

use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl UnaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Neg),
            _ => None,
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Not => f.write_str("!"),
            UnaryOp::Neg => f.write_str("-"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Less,
    Greater,
    Eq,
    NotEq,
}

impl BinaryOp {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            TokenKind::Asterisk => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Lt => Some(BinaryOp::Less),
            TokenKind::Gt => Some(BinaryOp::Greater),
            TokenKind::Eq => Some(BinaryOp::Eq),
            TokenKind::NotEq => Some(BinaryOp::NotEq),
            _ => None,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
        };
        f.write_str(symbol)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let { token: Token, name: Rc<str>, value: Expr },
    Return { token: Token, value: Expr },
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStatement {
    pub token: Token,
    pub statements: Vec<Stmt>,
}

/// Parameters and body of an `fn` literal, shared with every closure
/// created from it.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionLiteral {
    pub params: Vec<Rc<str>>,
    pub body: BlockStatement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub token: Token,
    pub kind: ExprKind,
}

impl Expr {
    pub fn new(token: Token, kind: ExprKind) -> Self {
        Self { token, kind }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Identifier(Rc<str>),
    Integer(i64),
    Boolean(bool),
    Str(Rc<str>),
    Array {
        elements: Vec<Expr>,
    },
    /// Pairs in source order.
    Dictionary {
        pairs: Vec<(Expr, Expr)>,
    },
    Prefix {
        op: UnaryOp,
        right: Box<Expr>,
    },
    Infix {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },
    Function(Rc<FunctionLiteral>),
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Index {
        left: Box<Expr>,
        index: Box<Expr>,
    },
}

fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stmt) in self.statements.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Let { token, name, value } => write!(f, "{} {} = {};", token.literal, name, value),
            Stmt::Return { token, value } => write!(f, "{} {};", token.literal, value),
            Stmt::Expr(expr) => write!(f, "{}", expr),
        }
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for FunctionLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("fn(")?;
        write_joined(f, &self.params)?;
        write!(f, ") {}", self.body)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Identifier(name) => f.write_str(name),
            ExprKind::Integer(_) | ExprKind::Boolean(_) => f.write_str(&self.token.literal),
            ExprKind::Str(text) => write!(f, "\"{}\"", text),
            ExprKind::Array { elements } => {
                f.write_str("[")?;
                write_joined(f, elements)?;
                f.write_str("]")
            }
            ExprKind::Dictionary { pairs } => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            ExprKind::Prefix { op, right } => write!(f, "({}{})", op, right),
            ExprKind::Infix { left, op, right } => write!(f, "({} {} {})", left, op, right),
            ExprKind::If { condition, consequence, alternative } => {
                write!(f, "if {} {}", condition, consequence)?;
                if let Some(alternative) = alternative {
                    write!(f, " else {}", alternative)?;
                }
                Ok(())
            }
            ExprKind::Function(literal) => write!(f, "{}", literal),
            ExprKind::Call { callee, args } => {
                write!(f, "{}(", callee)?;
                write_joined(f, args)?;
                f.write_str(")")
            }
            ExprKind::Index { left, index } => write!(f, "({}[{}])", left, index),
        }
    }
}
