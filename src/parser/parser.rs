//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the public entry points.
//! Expressions are parsed by precedence climbing over a binding power table
//! and statements are dispatched on their first token through a handler table.
//!
//! The parser never aborts. Malformed constructs get diagnostics attached to
//! the node being built, and a failed primary expression unwinds (as an `Err`)
//! to the nearest statement, which becomes a syntax-error placeholder.

use std::collections::HashMap;

use log::trace;

use crate::{
    ast::{
        ast::{Program, ProgramBody},
        expressions::Expr,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::tokenize,
        token_list::TokenList,
        tokens::{Token, TokenKind},
    },
    Span,
};

use super::{
    expr::parse_expr,
    lookups::{create_token_lookups, BPLookup, BindingPower, StmtHandler, StmtLookup},
    stmt::parse_stmt,
};

/// No primary expression could start at `token`.
///
/// Returned up the expression parsers and handled at the nearest statement.
#[derive(Debug, Clone)]
pub struct PrimaryFailure {
    pub token: Token,
}

impl PrimaryFailure {
    pub fn into_error(self) -> Error {
        unexpected_token_error(&self.token)
    }
}

/// Diagnostic for a token that cannot appear where it was found.
///
/// Text the tokenizer could not recognise is reported as such.
pub fn unexpected_token_error(token: &Token) -> Error {
    let error = match token.kind {
        TokenKind::Error => ErrorImpl::UnrecognisedToken {
            token: token.value.clone(),
        },
        _ => ErrorImpl::UnexpectedToken {
            token: token.value.clone(),
        },
    };
    Error::new(error, token.span.start.clone())
}

pub type ParseResult<T> = Result<T, PrimaryFailure>;

/// Where in the program the parser currently is.
///
/// Passed down by value; entering a function body creates a new context and
/// leaves the caller's untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseContext<'a> {
    function: Option<&'a str>,
}

impl<'a> ParseContext<'a> {
    pub fn top_level() -> Self {
        ParseContext { function: None }
    }

    pub fn inside_function(name: &'a str) -> Self {
        ParseContext {
            function: Some(name),
        }
    }

    pub fn in_function(&self) -> bool {
        self.function.is_some()
    }
}

/// The main parser structure that maintains parsing state.
pub struct Parser {
    /// The token stream being parsed
    tokens: TokenList,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for binary operator precedence
    binding_power_lookup: BPLookup,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut parser = Parser {
            tokens: TokenList::new(tokens),
            stmt_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
        };
        create_token_lookups(&mut parser);
        parser
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        self.tokens.current_token()
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.tokens.current_kind()
    }

    pub fn peek_kind(&self, n: usize) -> TokenKind {
        self.tokens.peek_kind(n)
    }

    pub fn matches(&self, kinds: &[TokenKind]) -> bool {
        self.tokens.matches(kinds)
    }

    /// Consumes the current token and returns it.
    pub fn advance(&mut self) -> Token {
        self.tokens.consume()
    }

    /// The token consumed last, used to close node spans.
    pub fn previous_token(&self) -> &Token {
        self.tokens.last_consumed()
    }

    /// Splits a compound operator token in place, see `TokenList::split_current`.
    pub fn split_current_token(&mut self, first: TokenKind, second: TokenKind) {
        self.tokens.split_current(first, second);
    }

    /// Span from `start` up to the last consumed token.
    pub fn span_from(&self, start: &Span) -> Span {
        let end = &self.previous_token().span;
        if end.end.0 < start.start.0 {
            start.clone()
        } else {
            Span::between(start, end)
        }
    }

    /// Consumes a token of the expected kind.
    ///
    /// When the current token has another kind, records an `UnexpectedToken`
    /// diagnostic in `errors` and returns the current token without consuming it.
    pub fn require(&mut self, expected_kind: TokenKind, errors: &mut Vec<Error>) -> Token {
        let token = self.current_token();
        let error = ErrorImpl::UnexpectedToken {
            token: token.value.clone(),
        };
        self.require_or(expected_kind, error, errors)
    }

    /// Like `require`, reporting `error` instead of the generic diagnostic.
    pub fn require_or(
        &mut self,
        expected_kind: TokenKind,
        error: ErrorImpl,
        errors: &mut Vec<Error>,
    ) -> Token {
        if self.current_token_kind() == expected_kind {
            self.advance()
        } else {
            let token = self.current_token().clone();
            errors.push(Error::new(error, token.span.start.clone()));
            token
        }
    }

    /// Consumes the current token if it has the given kind.
    pub fn match_and_consume(&mut self, kind: TokenKind) -> bool {
        if self.current_token_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Checks if there are tokens left before EOF.
    pub fn has_tokens(&self) -> bool {
        self.tokens.has_more()
    }

    pub fn mark(&self) -> usize {
        self.tokens.mark()
    }

    pub fn reset(&mut self, mark: usize) {
        self.tokens.reset(mark)
    }

    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    pub fn get_bp_lookup(&self) -> &BPLookup {
        &self.binding_power_lookup
    }

    /// Registers a binary operator at a precedence level.
    pub fn binary(&mut self, kind: TokenKind, binding_power: BindingPower) {
        self.binding_power_lookup.insert(kind, binding_power);
    }

    /// Registers a statement handler for a token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }
}

/// Parses source text as a program.
///
/// A source that is exactly one expression becomes an expression program,
/// anything else a statement sequence.
pub fn parse_program(source: &str, file: &str) -> Program {
    let tokens = tokenize(source.to_string(), Some(file.to_string()));
    parse_tokens(tokens)
}

/// Parses an already tokenized program.
pub fn parse_tokens(tokens: Vec<Token>) -> Program {
    let mut parser = Parser::new(tokens);
    let start = parser.current_token().span.clone();

    let mark = parser.mark();
    if let Ok(expr) = parse_expr(&mut parser) {
        if !parser.has_tokens() {
            trace!("source parsed as a single expression");
            let span = Span::between(&start, &expr.span);
            return Program {
                body: ProgramBody::Expression(expr),
                span,
            };
        }
    }
    parser.reset(mark);

    let context = ParseContext::top_level();
    let mut body = vec![];
    while parser.has_tokens() {
        body.push(parse_stmt(&mut parser, &context));
    }

    let span = Span {
        start: start.start,
        end: parser.current_token().span.end.clone(),
    };
    Program {
        body: ProgramBody::Statements(body),
        span,
    }
}

/// Parses source text as exactly one expression.
///
/// Tokens left after the expression are reported on the expression itself.
pub fn parse_expression_only(source: &str, file: &str) -> Result<Expr, Error> {
    let tokens = tokenize(source.to_string(), Some(file.to_string()));
    let mut parser = Parser::new(tokens);

    let mut expr = parse_expr(&mut parser).map_err(PrimaryFailure::into_error)?;
    if parser.has_tokens() {
        expr.errors.push(unexpected_token_error(parser.current_token()));
    }

    Ok(expr)
}
