//! Lexical analysis module.
//!
//! This module turns CatScript source text into a token stream:
//!
//! - Tokenization using an ordered table of regex patterns
//! - Recognition of keywords, identifiers, literals and operators
//! - Token positions for diagnostics
//! - A backtrackable `TokenList` cursor consumed by the parser

pub mod lexer;
pub mod token_list;
pub mod tokens;

#[cfg(test)]
mod tests;
