use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("var", TokenKind::Var);
        map.insert("for", TokenKind::For);
        map.insert("in", TokenKind::In);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("print", TokenKind::Print);
        map.insert("function", TokenKind::Function);
        map.insert("return", TokenKind::Return);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("null", TokenKind::Null);
        map.insert("not", TokenKind::Not);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    /// Text the tokenizer could not recognise
    Error,
    Integer,
    String,
    Identifier,

    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,

    Equal,      // =
    EqualEqual, // ==
    BangEqual,  // !=

    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    Comma,
    Colon,

    Plus,
    Minus,
    Slash,
    Star,

    // Reserved
    Var,
    For,
    In,
    If,
    Else,
    Print,
    Function,
    Return,
    True,
    False,
    Null,
    Not,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}
