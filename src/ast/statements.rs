use crate::{errors::errors::Error, lexer::tokens::Token, Span};

use super::{
    expressions::Expr,
    types::{CatscriptType, TypeLiteral},
};

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
    pub errors: Vec<Error>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Print(Expr),
    ForEach {
        variable: String,
        iterable: Expr,
        body: Vec<Stmt>,
    },
    /// `else if` chains are an `else_body` holding a single nested `If`.
    If {
        condition: Expr,
        then_body: Vec<Stmt>,
        else_body: Option<Vec<Stmt>>,
    },
    VarDecl {
        name: String,
        explicit_type: Option<TypeLiteral>,
        value: Expr,
    },
    Assignment {
        name: String,
        value: Expr,
    },
    /// Always wraps an `ExprKind::Call`.
    Call(Expr),
    FunctionDef(FunctionDefinition),
    Return(Option<Expr>),
    SyntaxError(Token),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub type_literal: Option<TypeLiteral>,
}

impl Parameter {
    pub fn ty(&self) -> CatscriptType {
        self.type_literal
            .as_ref()
            .map_or(CatscriptType::Object, |literal| literal.ty.clone())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub name: String,
    /// Program-wide unique key; differs from `name` when sibling scopes reuse it
    pub symbol: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeLiteral>,
    pub body: Vec<Stmt>,
}

/// Parameter and return types of a function, fixed at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub name: String,
    pub symbol: String,
    pub parameters: Vec<(String, CatscriptType)>,
    pub return_type: CatscriptType,
}

impl FunctionDefinition {
    pub fn return_type(&self) -> CatscriptType {
        self.return_type
            .as_ref()
            .map_or(CatscriptType::Void, |literal| literal.ty.clone())
    }

    pub fn signature(&self) -> FunctionSignature {
        FunctionSignature {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            parameters: self
                .parameters
                .iter()
                .map(|parameter| (parameter.name.clone(), parameter.ty()))
                .collect(),
            return_type: self.return_type(),
        }
    }
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span, errors: Vec<Error>) -> Self {
        Stmt { kind, span, errors }
    }

    pub fn is_syntax_error(&self) -> bool {
        matches!(self.kind, StmtKind::SyntaxError(_))
    }

    /// Every diagnostic in this statement, its type literals and its children.
    pub fn collect_errors(&self, errors: &mut Vec<Error>) {
        errors.extend(self.errors.iter().cloned());

        match &self.kind {
            StmtKind::Print(expr) | StmtKind::Call(expr) => expr.collect_errors(errors),
            StmtKind::ForEach { iterable, body, .. } => {
                iterable.collect_errors(errors);
                collect_block_errors(body, errors);
            }
            StmtKind::If {
                condition,
                then_body,
                else_body,
            } => {
                condition.collect_errors(errors);
                collect_block_errors(then_body, errors);
                if let Some(else_body) = else_body {
                    collect_block_errors(else_body, errors);
                }
            }
            StmtKind::VarDecl {
                explicit_type,
                value,
                ..
            } => {
                if let Some(literal) = explicit_type {
                    errors.extend(literal.errors.iter().cloned());
                }
                value.collect_errors(errors);
            }
            StmtKind::Assignment { value, .. } => value.collect_errors(errors),
            StmtKind::FunctionDef(function) => {
                for parameter in &function.parameters {
                    if let Some(literal) = &parameter.type_literal {
                        errors.extend(literal.errors.iter().cloned());
                    }
                }
                if let Some(literal) = &function.return_type {
                    errors.extend(literal.errors.iter().cloned());
                }
                collect_block_errors(&function.body, errors);
            }
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    value.collect_errors(errors);
                }
            }
            StmtKind::SyntaxError(_) => {}
        }
    }
}

pub fn collect_block_errors(body: &[Stmt], errors: &mut Vec<Error>) {
    for stmt in body {
        stmt.collect_errors(errors);
    }
}

/// Function definitions in `body` and in every block nested inside it.
pub fn collect_functions<'a>(body: &'a [Stmt], functions: &mut Vec<&'a FunctionDefinition>) {
    for stmt in body {
        match &stmt.kind {
            StmtKind::FunctionDef(function) => {
                functions.push(function);
                collect_functions(&function.body, functions);
            }
            StmtKind::ForEach { body, .. } => collect_functions(body, functions),
            StmtKind::If {
                then_body,
                else_body,
                ..
            } => {
                collect_functions(then_body, functions);
                if let Some(else_body) = else_body {
                    collect_functions(else_body, functions);
                }
            }
            _ => {}
        }
    }
}
