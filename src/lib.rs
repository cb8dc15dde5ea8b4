pub mod ast;
pub mod cli;
pub mod config;
pub mod interpreter;
pub mod lexer;
pub mod repl;
pub mod token;
pub mod value;

pub use ast::{Expr, ExprKind, Program, Stmt};
pub use interpreter::{evaluate, parse, parse_and_run, Environment, Interpreter};
pub use token::{Token, TokenKind};
pub use value::Value;
