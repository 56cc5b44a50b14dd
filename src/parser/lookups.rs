use std::collections::HashMap;

use crate::{ast::statements::Stmt, lexer::tokens::TokenKind};

use super::{
    parser::{ParseContext, ParseResult, Parser},
    stmt::*,
};

/// Binary precedence levels, loosest first.
#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Unary,
    Primary,
}

impl BindingPower {
    /// The level that binds one step tighter.
    pub fn tighter(self) -> BindingPower {
        match self {
            BindingPower::Default => BindingPower::Equality,
            BindingPower::Equality => BindingPower::Relational,
            BindingPower::Relational => BindingPower::Additive,
            BindingPower::Additive => BindingPower::Multiplicative,
            BindingPower::Multiplicative => BindingPower::Unary,
            BindingPower::Unary | BindingPower::Primary => BindingPower::Primary,
        }
    }
}

pub type StmtHandler = fn(&mut Parser, &ParseContext<'_>) -> ParseResult<Stmt>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Equality
    parser.binary(TokenKind::EqualEqual, BindingPower::Equality);
    parser.binary(TokenKind::BangEqual, BindingPower::Equality);

    // Relational
    parser.binary(TokenKind::Less, BindingPower::Relational);
    parser.binary(TokenKind::LessEqual, BindingPower::Relational);
    parser.binary(TokenKind::Greater, BindingPower::Relational);
    parser.binary(TokenKind::GreaterEqual, BindingPower::Relational);

    // Additive and multiplicative
    parser.binary(TokenKind::Plus, BindingPower::Additive);
    parser.binary(TokenKind::Minus, BindingPower::Additive);
    parser.binary(TokenKind::Star, BindingPower::Multiplicative);
    parser.binary(TokenKind::Slash, BindingPower::Multiplicative);

    // Statements
    parser.stmt(TokenKind::Print, parse_print_stmt);
    parser.stmt(TokenKind::For, parse_for_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::Var, parse_var_decl_stmt);
    parser.stmt(TokenKind::Identifier, parse_identifier_stmt);
    parser.stmt(TokenKind::Function, parse_fn_decl_stmt);
    // Only dispatched inside a function body
    parser.stmt(TokenKind::Return, parse_return_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;
