/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The program root and tree-wide helpers
/// - expressions: Expression nodes and operators
/// - statements: Statement nodes and function definitions
/// - types: The CatScript type system and written type literals
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
