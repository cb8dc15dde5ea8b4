use std::rc::Rc;

use tracing::debug;

use super::error::{LexError, ParseError};
use crate::ast::{BinaryOp, BlockStatement, Expr, ExprKind, FunctionLiteral, Program, Stmt, UnaryOp};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

/// Binding strength of infix positions, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

impl Precedence {
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
            TokenKind::Lt | TokenKind::Gt => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
            TokenKind::LParen => Precedence::Call,
            TokenKind::LBracket => Precedence::Index,
            _ => Precedence::Lowest,
        }
    }
}

pub struct ParseResult {
    pub program: Program,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Outcome of parsing one expression position. `Err` aborts the whole
/// program; `Ok(None)` means an error was recorded and the position is empty.
type Parsed<T> = Result<Option<T>, ParseError>;

/// Pratt parser with two tokens of lookahead.
pub struct Parser {
    lexer: Lexer,
    current: Token,
    next: Token,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, LexError> {
        let mut lexer = Lexer::new(source)?;
        let current = lexer.next_token();
        let next = lexer.next_token();
        Ok(Self {
            lexer,
            current,
            next,
            errors: Vec::new(),
        })
    }

    pub fn parse_program(&mut self) -> Program {
        match self.parse_statements() {
            Ok(statements) => Program { statements },
            Err(error) => {
                debug!(%error, "parse aborted");
                self.errors.push(error);
                Program::default()
            }
        }
    }

    pub fn parse_with_errors(mut self) -> ParseResult {
        let program = self.parse_program();
        ParseResult {
            program,
            errors: self.errors,
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    fn advance(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.next, next);
    }

    fn current_is(&self, kind: TokenKind) -> bool {
        self.current.is(kind)
    }

    fn next_is(&self, kind: TokenKind) -> bool {
        self.next.is(kind)
    }

    /// Steps onto the next token if it has the required kind.
    fn expect_next(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        if self.next_is(kind) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: kind,
                found: self.next.kind,
            })
        }
    }

    fn record(&mut self, error: ParseError) {
        debug!(%error, "parse error");
        self.errors.push(error);
    }

    fn skip_optional_semicolon(&mut self) {
        if self.next_is(TokenKind::Semicolon) {
            self.advance();
        }
    }

    fn parse_statements(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while !self.current_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement()? {
                statements.push(stmt);
            }
            self.advance();
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Parsed<Stmt> {
        match self.current.kind {
            TokenKind::Let => self.parse_let_statement(),
            TokenKind::Return => self.parse_return_statement(),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_let_statement(&mut self) -> Parsed<Stmt> {
        let token = self.current.clone();
        self.expect_next(TokenKind::Ident)?;
        let name = Rc::clone(&self.current.literal);
        self.expect_next(TokenKind::Assign)?;
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();
        Ok(value.map(|value| Stmt::Let { token, name, value }))
    }

    fn parse_return_statement(&mut self) -> Parsed<Stmt> {
        let token = self.current.clone();
        self.advance();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();
        Ok(value.map(|value| Stmt::Return { token, value }))
    }

    fn parse_expression_statement(&mut self) -> Parsed<Stmt> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();
        Ok(expr.map(Stmt::Expr))
    }

    /// A brace-delimited statement list; the current token is `{`. Stops on
    /// `}` or end of input.
    fn parse_block(&mut self) -> Result<BlockStatement, ParseError> {
        let token = self.current.clone();
        let mut statements = Vec::new();
        self.advance();
        while !self.current_is(TokenKind::RBrace) && !self.current_is(TokenKind::Eof) {
            if let Some(stmt) = self.parse_statement()? {
                statements.push(stmt);
            }
            self.advance();
        }
        Ok(BlockStatement { token, statements })
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Parsed<Expr> {
        let Some(mut left) = self.parse_prefix()? else {
            return Ok(None);
        };

        while !self.next_is(TokenKind::Semicolon) && precedence < Precedence::of(self.next.kind) {
            self.advance();
            left = match self.parse_infix(left)? {
                Some(expr) => expr,
                None => return Ok(None),
            };
        }
        Ok(Some(left))
    }

    fn parse_prefix(&mut self) -> Parsed<Expr> {
        let token = self.current.clone();
        match token.kind {
            TokenKind::Ident => {
                let name = Rc::clone(&token.literal);
                Ok(Some(Expr::new(token, ExprKind::Identifier(name))))
            }
            TokenKind::Int => Ok(self.parse_integer()),
            TokenKind::Str => {
                let text = Rc::clone(&token.literal);
                Ok(Some(Expr::new(token, ExprKind::Str(text))))
            }
            TokenKind::True | TokenKind::False => {
                let value = token.is(TokenKind::True);
                Ok(Some(Expr::new(token, ExprKind::Boolean(value))))
            }
            TokenKind::Bang | TokenKind::Minus => self.parse_prefix_expression(),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::LBracket => {
                let elements = self.parse_expression_list(TokenKind::RBracket)?;
                Ok(Some(Expr::new(token, ExprKind::Array { elements })))
            }
            TokenKind::LBrace => self.parse_dictionary_literal(),
            kind => {
                self.record(ParseError::NoPrefixParser(kind));
                Ok(None)
            }
        }
    }

    /// Current token is the operator (or `(` / `[`) following `left`.
    fn parse_infix(&mut self, left: Expr) -> Parsed<Expr> {
        let token = self.current.clone();
        match token.kind {
            TokenKind::LParen => {
                let args = self.parse_expression_list(TokenKind::RParen)?;
                let callee = Box::new(left);
                Ok(Some(Expr::new(token, ExprKind::Call { callee, args })))
            }
            TokenKind::LBracket => {
                self.advance();
                let index = self.parse_expression(Precedence::Lowest)?;
                self.expect_next(TokenKind::RBracket)?;
                Ok(index.map(|index| {
                    Expr::new(
                        token,
                        ExprKind::Index {
                            left: Box::new(left),
                            index: Box::new(index),
                        },
                    )
                }))
            }
            kind => match BinaryOp::from_token(kind) {
                Some(op) => {
                    let precedence = Precedence::of(kind);
                    self.advance();
                    let right = self.parse_expression(precedence)?;
                    Ok(right.map(|right| {
                        Expr::new(
                            token,
                            ExprKind::Infix {
                                left: Box::new(left),
                                op,
                                right: Box::new(right),
                            },
                        )
                    }))
                }
                None => Ok(Some(left)),
            },
        }
    }

    fn parse_integer(&mut self) -> Option<Expr> {
        let token = self.current.clone();
        match token.literal.parse::<i64>() {
            Ok(value) => Some(Expr::new(token, ExprKind::Integer(value))),
            Err(_) => {
                self.record(ParseError::InvalidInteger(token.literal.to_string()));
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self) -> Parsed<Expr> {
        let token = self.current.clone();
        let Some(op) = UnaryOp::from_token(token.kind) else {
            self.record(ParseError::NoPrefixParser(token.kind));
            return Ok(None);
        };
        self.advance();
        let right = self.parse_expression(Precedence::Prefix)?;
        Ok(right.map(|right| {
            Expr::new(
                token,
                ExprKind::Prefix {
                    op,
                    right: Box::new(right),
                },
            )
        }))
    }

    fn parse_grouped_expression(&mut self) -> Parsed<Expr> {
        self.advance();
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.expect_next(TokenKind::RParen)?;
        Ok(expr)
    }

    fn parse_if_expression(&mut self) -> Parsed<Expr> {
        let token = self.current.clone();
        self.expect_next(TokenKind::LParen)?;
        self.advance();
        let condition = self.parse_expression(Precedence::Lowest)?;
        self.expect_next(TokenKind::RParen)?;
        self.expect_next(TokenKind::LBrace)?;
        let consequence = self.parse_block()?;

        let alternative = if self.next_is(TokenKind::Else) {
            self.advance();
            self.expect_next(TokenKind::LBrace)?;
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(condition.map(|condition| {
            Expr::new(
                token,
                ExprKind::If {
                    condition: Box::new(condition),
                    consequence,
                    alternative,
                },
            )
        }))
    }

    fn parse_function_literal(&mut self) -> Parsed<Expr> {
        let token = self.current.clone();
        self.expect_next(TokenKind::LParen)?;
        let params = self.parse_function_params()?;
        self.expect_next(TokenKind::LBrace)?;
        let body = self.parse_block()?;
        let literal = Rc::new(FunctionLiteral { params, body });
        Ok(Some(Expr::new(token, ExprKind::Function(literal))))
    }

    /// Zero or more comma-separated identifiers closed by `)`; the current
    /// token is `(`.
    fn parse_function_params(&mut self) -> Result<Vec<Rc<str>>, ParseError> {
        let mut params = Vec::new();
        if self.next_is(TokenKind::RParen) {
            self.advance();
            return Ok(params);
        }
        loop {
            self.expect_next(TokenKind::Ident)?;
            params.push(Rc::clone(&self.current.literal));
            if !self.next_is(TokenKind::Comma) {
                break;
            }
            self.advance();
        }
        self.expect_next(TokenKind::RParen)?;
        Ok(params)
    }

    /// Comma-separated expressions closed by `end`, shared by array literals
    /// and call arguments. The current token is the opening delimiter.
    fn parse_expression_list(&mut self, end: TokenKind) -> Result<Vec<Expr>, ParseError> {
        let mut list = Vec::new();
        if self.next_is(end) {
            self.advance();
            return Ok(list);
        }

        self.advance();
        list.extend(self.parse_expression(Precedence::Lowest)?);
        while self.next_is(TokenKind::Comma) {
            self.advance();
            self.advance();
            list.extend(self.parse_expression(Precedence::Lowest)?);
        }
        self.expect_next(end)?;
        Ok(list)
    }

    fn parse_dictionary_literal(&mut self) -> Parsed<Expr> {
        let token = self.current.clone();
        let mut pairs = Vec::new();
        while !self.next_is(TokenKind::RBrace) {
            self.advance();
            let key = self.parse_expression(Precedence::Lowest)?;
            self.expect_next(TokenKind::Colon)?;
            self.advance();
            let value = self.parse_expression(Precedence::Lowest)?;
            if let (Some(key), Some(value)) = (key, value) {
                pairs.push((key, value));
            }
            if !self.next_is(TokenKind::RBrace) {
                self.expect_next(TokenKind::Comma)?;
            }
        }
        self.expect_next(TokenKind::RBrace)?;
        Ok(Some(Expr::new(token, ExprKind::Dictionary { pairs })))
    }
}

/// Parses a whole source text, collecting every recorded error.
pub fn parse(source: &str) -> Result<ParseResult, LexError> {
    Ok(Parser::new(source)?.parse_with_errors())
}
