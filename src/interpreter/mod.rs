//! Tree-walking interpreter.
//!
//! Evaluates a validated program directly over the AST. Output is collected
//! by the runtime rather than written to stdout, so the driver and the tests
//! decide where it goes.

pub mod interpreter;
pub mod runtime;
pub mod value;

#[cfg(test)]
mod tests;
