//! Source-to-source backend emitting JavaScript.

pub mod transpiler;

#[cfg(test)]
mod tests;
