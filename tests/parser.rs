mod common;

use common::parse_errors;
use kestrel::interpreter::{parse, parse_and_run, Interpreter, LexError, ParseError, RunError};
use kestrel::{TokenKind, Value};
use pretty_assertions::assert_eq;

#[test]
fn test_canonical_rendering() {
    let program = parse("(5 + 5) * 2;").unwrap().program;
    assert_eq!(program.to_string(), "((5 + 5) * 2)");
}

#[test]
fn test_program_renders_one_statement_per_line() {
    let program = parse("let x = 5; return x; x + 1").unwrap().program;
    assert_eq!(program.to_string(), "let x = 5;\nreturn x;\n(x + 1)");
}

#[test]
fn test_rendering_of_strings_and_functions() {
    let program = parse(r#"let greet = fn(name) { "hi " + name };"#).unwrap().program;
    assert_eq!(program.to_string(), r#"let greet = fn(name) ("hi " + name);"#);
}

#[test]
fn test_fatal_error_aborts_with_single_message() {
    assert_eq!(
        parse_errors("let 5 = 1; let y = 2;"),
        vec!["Next token should be of type IDENT but is instead of type INT"]
    );
    assert_eq!(
        parse_errors("if (x { 1 }"),
        vec!["Next token should be of type RPAREN but is instead of type LBRACE"]
    );
    assert_eq!(
        parse_errors("fn(x, 1) { x }"),
        vec!["Next token should be of type IDENT but is instead of type INT"]
    );
    assert!(parse("let x 5;").unwrap().program.statements.is_empty());
}

#[test]
fn test_missing_prefix_handlers_accumulate() {
    assert_eq!(
        parse_errors("let x = ; let y = *;"),
        vec![
            "No prefix parsing function found for SEMICOLON",
            "No prefix parsing function found for ASTERISK",
        ]
    );
}

#[test]
fn test_illegal_characters_are_reported() {
    assert_eq!(
        parse_errors("5 @ 5"),
        vec!["No prefix parsing function found for ILLEGAL"]
    );
}

#[test]
fn test_error_values() {
    let result = parse("let x = ;").unwrap();
    assert!(!result.is_ok());
    assert_eq!(result.errors, vec![ParseError::NoPrefixParser(TokenKind::Semicolon)]);
    assert!(!result.errors[0].is_fatal());
}

#[test]
fn test_blank_source_is_a_lex_error() {
    assert!(matches!(parse("  \n\t"), Err(LexError::EmptyInput)));
    assert_eq!(parse_and_run(""), Err(RunError::Lex(LexError::EmptyInput)));
}

#[test]
fn test_no_evaluation_after_parse_errors() {
    let interpreter = Interpreter::new();
    let outcome = interpreter.eval_source("let a = 1; let b = ;");
    assert!(matches!(outcome, Err(RunError::Parse(ref errors)) if errors.len() == 1));
    assert!(interpreter.environment().get("a").is_none());
}

#[test]
fn test_session_keeps_bindings() {
    let interpreter = Interpreter::new();
    assert_eq!(interpreter.eval_source("let a = 20;"), Ok(Value::Null));
    assert_eq!(interpreter.eval_source("let double = fn(x) { x * 2 };"), Ok(Value::Null));
    assert_eq!(interpreter.eval_source("double(a) + 2"), Ok(Value::Integer(42)));
}

#[test]
fn test_run_error_message_joins_lines() {
    let err = parse_and_run("let x = ; let y = ;").unwrap_err();
    assert_eq!(
        err.to_string(),
        "No prefix parsing function found for SEMICOLON\nNo prefix parsing function found for SEMICOLON"
    );
}
