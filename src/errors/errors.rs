use std::fmt::Display;

use thiserror::Error;

use crate::Position;

/// A diagnostic attached to an AST node, or produced by the parser entry points.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn is_semantic(&self) -> bool {
        matches!(
            self.internal_error,
            ErrorImpl::UnresolvedSymbol { .. }
                | ErrorImpl::IncompatibleTypes { .. }
                | ErrorImpl::ArityMismatch { .. }
                | ErrorImpl::DuplicateName { .. }
                | ErrorImpl::MissingReturnStatement { .. }
        )
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnterminatedArgList => "UnterminatedArgList",
            ErrorImpl::UnterminatedList => "UnterminatedList",
            ErrorImpl::UnterminatedParens => "UnterminatedParens",
            ErrorImpl::UnterminatedBody => "UnterminatedBody",
            ErrorImpl::BadTypeName { .. } => "BadTypeName",
            ErrorImpl::InvalidInteger { .. } => "InvalidInteger",
            ErrorImpl::UnresolvedSymbol { .. } => "UnresolvedSymbol",
            ErrorImpl::IncompatibleTypes { .. } => "IncompatibleTypes",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::DuplicateName { .. } => "DuplicateName",
            ErrorImpl::MissingReturnStatement { .. } => "MissingReturnStatement",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`", token))
            }
            ErrorImpl::UnterminatedArgList => {
                ErrorTip::Suggestion(String::from("Argument list is missing a closing `)`"))
            }
            ErrorImpl::UnterminatedList => {
                ErrorTip::Suggestion(String::from("List literal is missing a closing `]`"))
            }
            ErrorImpl::UnterminatedParens => {
                ErrorTip::Suggestion(String::from("Expression is missing a closing `)`"))
            }
            ErrorImpl::UnterminatedBody => {
                ErrorTip::Suggestion(String::from("Block is missing a closing `}`"))
            }
            ErrorImpl::BadTypeName { name } => ErrorTip::Suggestion(format!(
                "Unknown type `{}`, expected one of int, bool, string, object, void, list",
                name
            )),
            ErrorImpl::InvalidInteger { token } => ErrorTip::Suggestion(format!(
                "Invalid integer: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::UnresolvedSymbol { name } => {
                ErrorTip::Suggestion(format!("`{}` is not declared", name))
            }
            ErrorImpl::IncompatibleTypes { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::ArityMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::DuplicateName { name } => {
                ErrorTip::Suggestion(format!("`{}` is already declared in this scope", name))
            }
            ErrorImpl::MissingReturnStatement { function } => ErrorTip::Suggestion(format!(
                "Function `{}` does not return a value on every path",
                function
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.internal_error, self.position.1, self.position.0)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unterminated argument list")]
    UnterminatedArgList,
    #[error("unterminated list")]
    UnterminatedList,
    #[error("unterminated parenthesized expression")]
    UnterminatedParens,
    #[error("unterminated body")]
    UnterminatedBody,
    #[error("bad type name {name:?}")]
    BadTypeName { name: String },
    #[error("error parsing integer: {token:?}")]
    InvalidInteger { token: String },
    #[error("unresolved symbol {name:?}")]
    UnresolvedSymbol { name: String },
    #[error("incompatible types: expected {expected}, received {received}")]
    IncompatibleTypes { expected: String, received: String },
    #[error("arity mismatch: expected {expected}, received {received}")]
    ArityMismatch { expected: usize, received: usize },
    #[error("{name:?} already declared")]
    DuplicateName { name: String },
    #[error("function {function:?} is missing a return statement")]
    MissingReturnStatement { function: String },
}

/// Failures while tree-walking a validated program.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("cannot iterate over {value}")]
    NotIterable { value: String },
    #[error("unknown function {name:?}")]
    UnknownFunction { name: String },
    #[error("unbound variable {name:?}")]
    UnboundVariable { name: String },
    #[error("cannot apply {operator} to {value}")]
    InvalidOperand { operator: String, value: String },
}

/// Failures while lowering a program to bytecode.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("program has {count} unresolved diagnostics")]
    InvalidProgram { count: usize },
    #[error("label {label} was never placed")]
    UnplacedLabel { label: usize },
    #[error("unknown variable {name:?}")]
    UnknownVariable { name: String },
    #[error("unknown function {name:?}")]
    UnknownFunction { name: String },
}

/// Failures while executing lowered bytecode.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MachineError {
    #[error("stack underflow")]
    StackUnderflow,
    #[error("expected a native int, found {found}")]
    ExpectedNative { found: String },
    #[error("expected a reference, found {found}")]
    ExpectedReference { found: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("undefined method {name:?}")]
    UndefinedMethod { name: String },
    #[error("undefined global {name:?}")]
    UndefinedGlobal { name: String },
    #[error("cannot iterate over {found}")]
    NotIterable { found: String },
}
