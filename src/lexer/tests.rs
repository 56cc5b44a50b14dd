//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Integer and string literals
//! - Operators and punctuation
//! - Comments
//! - Unrecognised input
//! - The backtrackable token list

use super::{lexer::tokenize, token_list::TokenList, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.cat".to_string()))
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    assert_eq!(
        kinds("var for in if else print function return true false null not"),
        vec![
            TokenKind::Var,
            TokenKind::For,
            TokenKind::In,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::Print,
            TokenKind::Function,
            TokenKind::Return,
            TokenKind::True,
            TokenKind::False,
            TokenKind::Null,
            TokenKind::Not,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_type_names_are_identifiers() {
    let tokens = tokenize("int list string".to_string(), None);

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "int");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("+ - * / == != < > <= >= ="),
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::EqualEqual,
            TokenKind::BangEqual,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEqual,
            TokenKind::GreaterEqual,
            TokenKind::Equal,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } [ ] , :"),
        vec![
            TokenKind::LeftParen,
            TokenKind::RightParen,
            TokenKind::LeftBrace,
            TokenKind::RightBrace,
            TokenKind::LeftBracket,
            TokenKind::RightBracket,
            TokenKind::Comma,
            TokenKind::Colon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_nested_list_type_closes_with_two_greaters() {
    assert_eq!(
        kinds("list<list<int>>"),
        vec![
            TokenKind::Identifier,
            TokenKind::Less,
            TokenKind::Identifier,
            TokenKind::Less,
            TokenKind::Identifier,
            TokenKind::Greater,
            TokenKind::Greater,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_string_with_escapes() {
    let tokens = tokenize("\"a\\\"b\\n\"".to_string(), None);

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "a\"b\n");
    assert_eq!(tokens[0].span.start.0, 0);
    assert_eq!(tokens[0].span.end.0, 8);
}

#[test]
fn test_tokenize_comments() {
    let tokens = tokenize("var x = 5 // a comment\nprint(x)".to_string(), None);

    assert_eq!(tokens[3].kind, TokenKind::Integer);
    assert_eq!(tokens[3].value, "5");
    assert_eq!(tokens[4].kind, TokenKind::Print);
    assert_eq!(tokens.len(), 9);
}

#[test]
fn test_spans_are_byte_offsets() {
    let tokens = tokenize("var  abc".to_string(), None);

    assert_eq!(tokens[1].span.start.0, 5);
    assert_eq!(tokens[1].span.end.0, 8);
    assert_eq!(tokens[2].span.start.0, 8);
}

#[test]
fn test_unrecognised_character_becomes_error_token() {
    let tokens = tokenize("1 @ 2".to_string(), None);

    assert_eq!(tokens[1].kind, TokenKind::Error);
    assert_eq!(tokens[1].value, "@");
    assert_eq!(tokens[2].kind, TokenKind::Integer);
}

#[test]
fn test_empty_source_is_just_eof() {
    assert_eq!(kinds(""), vec![TokenKind::EOF]);
}

#[test]
fn test_token_list_never_consumes_eof() {
    let mut list = TokenList::new(tokenize("x".to_string(), None));

    assert_eq!(list.consume().kind, TokenKind::Identifier);
    assert!(!list.has_more());
    assert_eq!(list.consume().kind, TokenKind::EOF);
    assert_eq!(list.consume().kind, TokenKind::EOF);
}

#[test]
fn test_token_list_mark_and_reset() {
    let mut list = TokenList::new(tokenize("1 + 2".to_string(), None));
    let mark = list.mark();

    list.consume();
    list.consume();
    assert!(list.matches(&[TokenKind::Integer]));

    list.reset(mark);
    assert_eq!(list.current_token().value, "1");
    assert_eq!(list.peek_kind(1), TokenKind::Plus);
    assert_eq!(list.peek_kind(10), TokenKind::EOF);
}

#[test]
fn test_token_list_appends_missing_eof() {
    let mut tokens = tokenize("x".to_string(), None);
    tokens.pop();
    let list = TokenList::new(tokens);

    assert_eq!(list.peek_kind(1), TokenKind::EOF);
}

#[test]
fn test_token_list_split_current() {
    let mut list = TokenList::new(tokenize(">= 1".to_string(), None));
    list.split_current(TokenKind::Greater, TokenKind::Equal);

    let greater = list.consume();
    assert_eq!((greater.kind, greater.value.as_str()), (TokenKind::Greater, ">"));
    assert_eq!((greater.span.start.0, greater.span.end.0), (0, 1));

    let equal = list.consume();
    assert_eq!((equal.kind, equal.value.as_str()), (TokenKind::Equal, "="));
    assert_eq!((equal.span.start.0, equal.span.end.0), (1, 2));
    assert_eq!(list.current_kind(), TokenKind::Integer);
}
