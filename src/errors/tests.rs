//! Unit tests for error handling.

use crate::errors::errors::{Error, ErrorImpl, ErrorTip, RuntimeError};
use crate::Position;
use std::rc::Rc;

fn at(offset: u32) -> Position {
    Position(offset, Rc::new("test.cat".to_string()))
}

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(10),
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().0, 10);
}

#[test]
fn test_syntax_errors_are_not_semantic() {
    let syntax = [
        ErrorImpl::UnexpectedToken {
            token: ")".to_string(),
        },
        ErrorImpl::UnterminatedArgList,
        ErrorImpl::UnterminatedList,
        ErrorImpl::UnterminatedParens,
        ErrorImpl::UnterminatedBody,
        ErrorImpl::BadTypeName {
            name: "foo".to_string(),
        },
    ];

    for error_impl in syntax {
        assert!(!Error::new(error_impl, at(0)).is_semantic());
    }
}

#[test]
fn test_semantic_errors() {
    let semantic = [
        ErrorImpl::UnresolvedSymbol {
            name: "x".to_string(),
        },
        ErrorImpl::IncompatibleTypes {
            expected: "int".to_string(),
            received: "string".to_string(),
        },
        ErrorImpl::ArityMismatch {
            expected: 2,
            received: 1,
        },
        ErrorImpl::DuplicateName {
            name: "f".to_string(),
        },
        ErrorImpl::MissingReturnStatement {
            function: "f".to_string(),
        },
    ];

    for error_impl in semantic {
        assert!(Error::new(error_impl, at(0)).is_semantic());
    }
}

#[test]
fn test_type_mismatch_tip() {
    let error = Error::new(
        ErrorImpl::IncompatibleTypes {
            expected: "int".to_string(),
            received: "string".to_string(),
        },
        at(0),
    );

    assert_eq!(error.get_error_name(), "IncompatibleTypes");
    assert_eq!(
        error.get_tip().to_string(),
        "Expected type `int`, received `string`"
    );
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_display_includes_position() {
    let error = Error::new(
        ErrorImpl::ArityMismatch {
            expected: 2,
            received: 3,
        },
        at(7),
    );

    assert_eq!(
        error.to_string(),
        "arity mismatch: expected 2, received 3 at test.cat:7"
    );
}

#[test]
fn test_runtime_error_display() {
    assert_eq!(RuntimeError::DivisionByZero.to_string(), "division by zero");
    assert_eq!(
        RuntimeError::UnknownFunction {
            name: "f".to_string()
        }
        .to_string(),
        "unknown function \"f\""
    );
}
