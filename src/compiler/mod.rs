//! Bytecode backend.
//!
//! Lowers a validated AST to methods over a small stack instruction set and
//! runs them on `machine::Machine`:
//!
//! - `bytecode`: instructions, labels and the method sink
//! - `compiler`: variable storage, coercions and the per-method pipeline
//! - `expr` and `stmt`: lowering of expressions and statements

pub mod bytecode;
pub mod compiler;
pub mod expr;
pub mod machine;
pub mod stmt;
