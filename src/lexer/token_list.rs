use std::rc::Rc;

use super::tokens::{Token, TokenKind};
use crate::{Position, Span};

/// Backtrackable cursor over a token stream.
///
/// The stream always ends with an `EOF` token, and the cursor never moves past it.
#[derive(Debug, Clone)]
pub struct TokenList {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenList {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let span = tokens
                .last()
                .map(|token| Span {
                    start: token.span.end.clone(),
                    end: token.span.end.clone(),
                })
                .unwrap_or(Span {
                    start: Position::null(),
                    end: Position::null(),
                });
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("<EOF>"),
                span,
            });
        }

        TokenList { tokens, pos: 0 }
    }

    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub fn current_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Kind of the token `n` places ahead of the cursor, `EOF` past the end.
    pub fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::EOF, |token| token.kind)
    }

    pub fn matches(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    /// Returns the current token and advances, except at `EOF`.
    pub fn consume(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::EOF {
            self.pos += 1;
        }
        token
    }

    pub fn has_more(&self) -> bool {
        self.current_kind() != TokenKind::EOF
    }

    pub fn mark(&self) -> usize {
        self.pos
    }

    pub fn reset(&mut self, mark: usize) {
        self.pos = mark.min(self.tokens.len() - 1);
    }

    /// Splits the current token after its first character, as `first` then `second`.
    pub fn split_current(&mut self, first: TokenKind, second: TokenKind) {
        let token = self.current_token().clone();
        if token.value.len() < 2 {
            return;
        }

        let (head, tail) = token.value.split_at(1);
        let middle = Position(token.span.start.0 + 1, Rc::clone(&token.span.start.1));
        let head = Token {
            kind: first,
            value: head.to_string(),
            span: Span {
                start: token.span.start.clone(),
                end: middle.clone(),
            },
        };
        let tail = Token {
            kind: second,
            value: tail.to_string(),
            span: Span {
                start: middle,
                end: token.span.end.clone(),
            },
        };
        self.tokens.splice(self.pos..=self.pos, [head, tail]);
    }

    /// The token consumed most recently, or the first token if none was.
    pub fn last_consumed(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }
}
