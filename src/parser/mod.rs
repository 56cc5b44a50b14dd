//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It handles:
//!
//! - Statement parsing (variable declarations, functions, control flow)
//! - Expression parsing (binary operators, calls, list literals)
//! - Type literal parsing
//! - Error recovery and reporting
//!
//! Binary expressions are parsed by precedence climbing over the binding
//! power table in `lookups`, one left-associative loop per level.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
