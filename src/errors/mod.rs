//! Error types and error handling for the toolchain.
//!
//! This module defines the diagnostics attached to AST nodes by the parser
//! and the type checker, plus the error enums returned by the backends:
//!
//! - `Error` / `ErrorImpl` - positioned syntax and semantic diagnostics
//! - `RuntimeError` - tree-walking interpreter failures
//! - `CompileError` - bytecode lowering failures
//! - `MachineError` - stack machine failures

pub mod errors;

#[cfg(test)]
mod tests;
