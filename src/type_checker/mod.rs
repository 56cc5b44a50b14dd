//! Type checking and semantic analysis module.
//!
//! This module validates the AST in place. It:
//!
//! - Computes the static type of every expression
//! - Resolves variable and function references through a scope stack
//! - Checks function signatures, argument counts and argument types
//! - Detects duplicate declarations and missing return statements
//!
//! Diagnostics are attached to the offending nodes; validation never stops
//! early, so every expression ends with a type.

pub mod type_checker;
