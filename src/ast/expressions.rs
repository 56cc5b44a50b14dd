use std::fmt::Display;

use crate::{errors::errors::Error, Span};

use super::types::CatscriptType;

/// An expression node.
///
/// `ty` stays `None` until the type checker has visited the node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub errors: Vec<Error>,
    pub ty: Option<CatscriptType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Integer(i64),
    String(String),
    Boolean(bool),
    Null,
    Identifier(String),
    Unary {
        operator: UnaryOperator,
        operand: Box<Expr>,
    },
    Additive {
        operator: AdditiveOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Factor {
        operator: FactorOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Comparison {
        operator: ComparisonOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Equality {
        operator: EqualityOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Parenthesized(Box<Expr>),
    List(Vec<Expr>),
    Call(FunctionCall),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: Vec<Expr>,
    /// Symbol of the definition this call resolves to, set by validation
    pub symbol: Option<String>,
}

impl FunctionCall {
    /// Key of the called function in a backend's function table.
    pub fn target(&self) -> &str {
        self.symbol.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdditiveOperator {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorOperator {
    Multiply,
    Divide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityOperator {
    Equal,
    NotEqual,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr {
            kind,
            span,
            errors: vec![],
            ty: None,
        }
    }

    pub fn with_errors(kind: ExprKind, span: Span, errors: Vec<Error>) -> Self {
        Expr {
            kind,
            span,
            errors,
            ty: None,
        }
    }

    /// The type computed by validation, OBJECT if validation has not run.
    pub fn static_type(&self) -> CatscriptType {
        self.ty.clone().unwrap_or(CatscriptType::Object)
    }

    /// Direct children, left to right.
    pub fn children(&self) -> Vec<&Expr> {
        match &self.kind {
            ExprKind::Integer(_)
            | ExprKind::String(_)
            | ExprKind::Boolean(_)
            | ExprKind::Null
            | ExprKind::Identifier(_) => vec![],
            ExprKind::Unary { operand, .. } => vec![operand.as_ref()],
            ExprKind::Additive { left, right, .. }
            | ExprKind::Factor { left, right, .. }
            | ExprKind::Comparison { left, right, .. }
            | ExprKind::Equality { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            ExprKind::Parenthesized(inner) => vec![inner.as_ref()],
            ExprKind::List(values) => values.iter().collect(),
            ExprKind::Call(call) => call.arguments.iter().collect(),
        }
    }

    /// Every diagnostic in this expression and its children.
    pub fn collect_errors(&self, errors: &mut Vec<Error>) {
        errors.extend(self.errors.iter().cloned());
        for child in self.children() {
            child.collect_errors(errors);
        }
    }
}

impl Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Negate => write!(f, "-"),
            UnaryOperator::Not => write!(f, "not"),
        }
    }
}

impl Display for AdditiveOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdditiveOperator::Plus => write!(f, "+"),
            AdditiveOperator::Minus => write!(f, "-"),
        }
    }
}

impl Display for FactorOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FactorOperator::Multiply => write!(f, "*"),
            FactorOperator::Divide => write!(f, "/"),
        }
    }
}

impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonOperator::Greater => write!(f, ">"),
            ComparisonOperator::GreaterEqual => write!(f, ">="),
            ComparisonOperator::Less => write!(f, "<"),
            ComparisonOperator::LessEqual => write!(f, "<="),
        }
    }
}

impl Display for EqualityOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EqualityOperator::Equal => write!(f, "=="),
            EqualityOperator::NotEqual => write!(f, "!="),
        }
    }
}
