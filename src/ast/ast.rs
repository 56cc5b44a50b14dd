use crate::{errors::errors::Error, Span};

use super::{
    expressions::Expr,
    statements::{collect_block_errors, collect_functions, FunctionDefinition, Stmt},
};

/// What a parsed source turned out to be.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramBody {
    /// The whole source was one bare expression.
    Expression(Expr),
    Statements(Vec<Stmt>),
}

/// Root of a parsed source.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: ProgramBody,
    pub span: Span,
}

impl Program {
    pub fn statements(&self) -> &[Stmt] {
        match &self.body {
            ProgramBody::Statements(statements) => statements,
            ProgramBody::Expression(_) => &[],
        }
    }

    pub fn expression(&self) -> Option<&Expr> {
        match &self.body {
            ProgramBody::Expression(expr) => Some(expr),
            ProgramBody::Statements(_) => None,
        }
    }

    /// Every diagnostic anywhere in the tree, in source order of their nodes.
    pub fn diagnostics(&self) -> Vec<Error> {
        let mut errors = vec![];
        match &self.body {
            ProgramBody::Expression(expr) => expr.collect_errors(&mut errors),
            ProgramBody::Statements(statements) => collect_block_errors(statements, &mut errors),
        }
        errors
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics().is_empty()
    }

    /// Every function definition in the program, nested ones included.
    pub fn functions(&self) -> Vec<&FunctionDefinition> {
        let mut functions = vec![];
        collect_functions(self.statements(), &mut functions);
        functions
    }
}
