use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Illegal,
    Eof,

    // Identifiers and literals
    Ident,
    Int,
    Str,

    // Keywords
    Let,
    Function,
    True,
    False,
    If,
    Else,
    Return,

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,
    Lt,
    Gt,
    Eq,
    NotEq,

    // Delimiters
    Comma,
    Colon,
    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
}

impl TokenKind {
    /// Resolves a scanned word against the keyword table.
    pub fn lookup_ident(word: &str) -> TokenKind {
        match word {
            "let" => TokenKind::Let,
            "fn" => TokenKind::Function,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "return" => TokenKind::Return,
            _ => TokenKind::Ident,
        }
    }

    /// The fixed source text of keywords and punctuation; empty for kinds
    /// whose literal depends on the input.
    pub fn symbol(self) -> &'static str {
        match self {
            TokenKind::Illegal | TokenKind::Ident | TokenKind::Int | TokenKind::Str => "",
            TokenKind::Eof => "",
            TokenKind::Let => "let",
            TokenKind::Function => "fn",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Return => "return",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Bang => "!",
            TokenKind::Asterisk => "*",
            TokenKind::Slash => "/",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::Eq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::Str => "STRING",
            TokenKind::Let => "LET",
            TokenKind::Function => "FUNCTION",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::Return => "RETURN",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Bang => "BANG",
            TokenKind::Asterisk => "ASTERISK",
            TokenKind::Slash => "SLASH",
            TokenKind::Lt => "LESS_THAN",
            TokenKind::Gt => "GREATER_THAN",
            TokenKind::Eq => "EQUAL",
            TokenKind::NotEq => "NOT_EQUAL",
            TokenKind::Comma => "COMMA",
            TokenKind::Colon => "COLON",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::LBracket => "LBRACKET",
            TokenKind::RBracket => "RBRACKET",
        };
        f.write_str(name)
    }
}

/// A token kind together with the exact source text it was scanned from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: Rc<str>,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<Rc<str>>) -> Self {
        Self {
            kind,
            literal: literal.into(),
        }
    }

    /// Builds a keyword or punctuation token from its fixed symbol.
    pub fn fixed(kind: TokenKind) -> Self {
        Self::new(kind, kind.symbol())
    }

    pub fn eof() -> Self {
        Self::fixed(TokenKind::Eof)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token{{{}, {}}}", self.kind, self.literal)
    }
}
