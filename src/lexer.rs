use chumsky::prelude::*;
use tracing::trace;

use crate::interpreter::error::LexError;
use crate::token::{Token, TokenKind};

/// Scanning rules for the whole input. Every byte is consumed by some rule:
/// anything unrecognised becomes a single-character `Illegal` token, so the
/// scanner itself never fails on well-formed UTF-8.
pub fn lexer<'a>() -> impl Parser<'a, &'a str, Vec<Token>, extra::Err<Simple<'a, char>>> {
    let integer = any()
        .filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|s: &str| Token::new(TokenKind::Int, s));

    // No escape sequences; an unterminated string runs to end of input.
    let string = just('"')
        .ignore_then(none_of('"').repeated().to_slice())
        .then_ignore(just('"').or_not())
        .map(|s: &str| Token::new(TokenKind::Str, s));

    let word = any()
        .filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .repeated()
        .at_least(1)
        .to_slice()
        .map(|s: &str| Token::new(TokenKind::lookup_ident(s), s));

    let op_double = choice((
        just("==").to(TokenKind::Eq),
        just("!=").to(TokenKind::NotEq),
    ));

    let op_single = choice((
        just('=').to(TokenKind::Assign),
        just('+').to(TokenKind::Plus),
        just('-').to(TokenKind::Minus),
        just('!').to(TokenKind::Bang),
        just('*').to(TokenKind::Asterisk),
        just('/').to(TokenKind::Slash),
        just('<').to(TokenKind::Lt),
        just('>').to(TokenKind::Gt),
        just(',').to(TokenKind::Comma),
        just(':').to(TokenKind::Colon),
        just(';').to(TokenKind::Semicolon),
        just('(').to(TokenKind::LParen),
        just(')').to(TokenKind::RParen),
        just('{').to(TokenKind::LBrace),
        just('}').to(TokenKind::RBrace),
        just('[').to(TokenKind::LBracket),
        just(']').to(TokenKind::RBracket),
    ));

    let op = op_double.or(op_single).map(Token::fixed);

    let illegal = any().map(|c: char| Token::new(TokenKind::Illegal, c.to_string()));

    let token = integer
        .or(string)
        .or(word)
        .or(op)
        .or(illegal)
        .padded_by(one_of(" \t\r\n").repeated());

    token.repeated().collect().then_ignore(end())
}

/// Pull-style token source for the parser.
///
/// After the last scanned token, `next_token` keeps yielding `Eof`.
#[derive(Debug)]
pub struct Lexer {
    tokens: std::vec::IntoIter<Token>,
}

impl Lexer {
    pub fn new(input: &str) -> Result<Self, LexError> {
        if input.trim().is_empty() {
            return Err(LexError::EmptyInput);
        }

        let tokens = lexer().parse(input).into_result().map_err(|errors| {
            let offset = errors.first().map(|e| e.span().start).unwrap_or_default();
            LexError::Unrecognized { offset }
        })?;
        trace!(count = tokens.len(), "scanned input");

        Ok(Self {
            tokens: tokens.into_iter(),
        })
    }

    pub fn next_token(&mut self) -> Token {
        self.tokens.next().unwrap_or_else(Token::eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(source: &str) -> Vec<(TokenKind, String)> {
        let mut lexer = Lexer::new(source).expect("Lexer failed");
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token();
            if token.is(TokenKind::Eof) {
                break;
            }
            out.push((token.kind, token.literal.to_string()));
        }
        out
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).into_iter().map(|(kind, _)| kind).collect()
    }

    #[test]
    fn test_blank_input_is_rejected() {
        assert!(matches!(Lexer::new(""), Err(LexError::EmptyInput)));
        assert!(matches!(Lexer::new(" \n\t "), Err(LexError::EmptyInput)));
    }

    #[test]
    fn test_eof_repeats() {
        let mut lexer = Lexer::new("x").unwrap();
        assert_eq!(lexer.next_token().kind, TokenKind::Ident);
        assert_eq!(lexer.next_token(), Token::eof());
        assert_eq!(lexer.next_token(), Token::eof());
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("let fn true false if else return"),
            vec![
                TokenKind::Let,
                TokenKind::Function,
                TokenKind::True,
                TokenKind::False,
                TokenKind::If,
                TokenKind::Else,
                TokenKind::Return,
            ]
        );
    }

    #[test]
    fn test_identifiers_are_letters_and_underscores() {
        assert_eq!(lex("foo_bar"), vec![(TokenKind::Ident, "foo_bar".to_string())]);
        assert_eq!(
            lex("x1"),
            vec![
                (TokenKind::Ident, "x".to_string()),
                (TokenKind::Int, "1".to_string()),
            ]
        );
        assert_eq!(lex("letter"), vec![(TokenKind::Ident, "letter".to_string())]);
    }

    #[test]
    fn test_two_character_operators() {
        assert_eq!(
            kinds("== != = !"),
            vec![TokenKind::Eq, TokenKind::NotEq, TokenKind::Assign, TokenKind::Bang]
        );
        assert_eq!(kinds("!!="), vec![TokenKind::Bang, TokenKind::NotEq]);
    }

    #[test]
    fn test_strings() {
        assert_eq!(lex(r#""hello world""#), vec![(TokenKind::Str, "hello world".to_string())]);
        assert_eq!(lex(r#""""#), vec![(TokenKind::Str, String::new())]);
        assert_eq!(lex(r#""a\nb""#), vec![(TokenKind::Str, r"a\nb".to_string())]);
        assert_eq!(lex(r#""open"#), vec![(TokenKind::Str, "open".to_string())]);
    }

    #[test]
    fn test_illegal_characters() {
        assert_eq!(
            lex("5 @ 3"),
            vec![
                (TokenKind::Int, "5".to_string()),
                (TokenKind::Illegal, "@".to_string()),
                (TokenKind::Int, "3".to_string()),
            ]
        );
    }

    #[test]
    fn test_full_program() {
        let source = r#"let five = 5;
let add = fn(x, y) {
  x + y;
};
let result = add(five, 10);
[1, 2];
{"foo": "bar"}
10 != 9 < 8 > 7 * 6 / 5 - -4
"#;
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::Let,
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::Int,
                TokenKind::Semicolon,
                TokenKind::Let,
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::Function,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Ident,
                TokenKind::Plus,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::RBrace,
                TokenKind::Semicolon,
                TokenKind::Let,
                TokenKind::Ident,
                TokenKind::Assign,
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Int,
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::LBracket,
                TokenKind::Int,
                TokenKind::Comma,
                TokenKind::Int,
                TokenKind::RBracket,
                TokenKind::Semicolon,
                TokenKind::LBrace,
                TokenKind::Str,
                TokenKind::Colon,
                TokenKind::Str,
                TokenKind::RBrace,
                TokenKind::Int,
                TokenKind::NotEq,
                TokenKind::Int,
                TokenKind::Lt,
                TokenKind::Int,
                TokenKind::Gt,
                TokenKind::Int,
                TokenKind::Asterisk,
                TokenKind::Int,
                TokenKind::Slash,
                TokenKind::Int,
                TokenKind::Minus,
                TokenKind::Minus,
                TokenKind::Int,
            ]
        );
    }
}
