//! Unit tests for the parser module.
//!
//! Covers precedence and associativity, every statement form, type literals,
//! and the recovery behaviour on malformed input.

use crate::{
    ast::{
        ast::ProgramBody,
        expressions::{AdditiveOperator, EqualityOperator, ExprKind, FactorOperator, UnaryOperator},
        statements::StmtKind,
        types::CatscriptType,
    },
    errors::errors::ErrorImpl,
};

use super::parser::{parse_expression_only, parse_program};

fn statements(source: &str) -> Vec<StmtKind> {
    let program = parse_program(source, "test.cat");
    program.statements().iter().map(|stmt| stmt.kind.clone()).collect()
}

fn error_kinds(source: &str) -> Vec<ErrorImpl> {
    parse_program(source, "test.cat")
        .diagnostics()
        .into_iter()
        .map(|error| error.get_error_impl().clone())
        .collect()
}

#[test]
fn test_single_expression_program() {
    let program = parse_program("1 + 2", "test.cat");
    let ProgramBody::Expression(expr) = &program.body else {
        panic!("expected an expression program, got {:?}", program.body);
    };

    assert!(matches!(
        expr.kind,
        ExprKind::Additive {
            operator: AdditiveOperator::Plus,
            ..
        }
    ));
    assert_eq!(expr.span.start.0, 0);
    assert_eq!(expr.span.end.0, 5);
}

#[test]
fn test_factor_binds_tighter_than_additive() {
    let expr = parse_expression_only("1 + 2 * 3", "test.cat").unwrap();
    let ExprKind::Additive { right, .. } = &expr.kind else {
        panic!("expected additive root, got {:?}", expr.kind);
    };
    assert!(matches!(
        right.kind,
        ExprKind::Factor {
            operator: FactorOperator::Multiply,
            ..
        }
    ));
}

#[test]
fn test_additive_is_left_associative() {
    let expr = parse_expression_only("10 - 4 - 3", "test.cat").unwrap();
    let ExprKind::Additive { left, right, .. } = &expr.kind else {
        panic!("expected additive root");
    };
    assert!(matches!(left.kind, ExprKind::Additive { .. }));
    assert_eq!(right.kind, ExprKind::Integer(3));
}

#[test]
fn test_equality_is_loosest() {
    let expr = parse_expression_only("1 < 2 == not false", "test.cat").unwrap();
    let ExprKind::Equality {
        operator: EqualityOperator::Equal,
        left,
        right,
    } = &expr.kind
    else {
        panic!("expected equality root");
    };
    assert!(matches!(left.kind, ExprKind::Comparison { .. }));
    assert!(matches!(
        right.kind,
        ExprKind::Unary {
            operator: UnaryOperator::Not,
            ..
        }
    ));
}

#[test]
fn test_nested_unary() {
    let expr = parse_expression_only("- -5", "test.cat").unwrap();
    let ExprKind::Unary { operand, .. } = &expr.kind else {
        panic!("expected unary");
    };
    assert!(matches!(operand.kind, ExprKind::Unary { .. }));
}

#[test]
fn test_list_and_call_expressions() {
    let expr = parse_expression_only("[1, foo(2, \"a\"), []]", "test.cat").unwrap();
    let ExprKind::List(values) = &expr.kind else {
        panic!("expected list");
    };
    assert_eq!(values.len(), 3);
    let ExprKind::Call(call) = &values[1].kind else {
        panic!("expected call");
    };
    assert_eq!(call.name, "foo");
    assert_eq!(call.arguments.len(), 2);
    assert_eq!(values[2].kind, ExprKind::List(vec![]));
}

#[test]
fn test_expression_only_rejects_trailing_tokens() {
    let expr = parse_expression_only("1 2", "test.cat").unwrap();
    assert_eq!(
        expr.errors[0].get_error_impl(),
        &ErrorImpl::UnexpectedToken {
            token: "2".to_string()
        }
    );
}

#[test]
fn test_expression_only_fails_without_primary() {
    let error = parse_expression_only(")", "test.cat").unwrap_err();
    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::UnexpectedToken {
            token: ")".to_string()
        }
    );
}

#[test]
fn test_integer_overflow_is_reported() {
    let expr = parse_expression_only("99999999999999999999999", "test.cat").unwrap();
    assert!(matches!(
        expr.errors[0].get_error_impl(),
        ErrorImpl::InvalidInteger { .. }
    ));
}

#[test]
fn test_var_declaration_with_type() {
    let kinds = statements("var x : list<list<int>> = [[1]]");
    let StmtKind::VarDecl {
        name,
        explicit_type,
        ..
    } = &kinds[0]
    else {
        panic!("expected var declaration");
    };
    assert_eq!(name, "x");
    assert_eq!(
        explicit_type.as_ref().unwrap().ty,
        CatscriptType::list_of(CatscriptType::list_of(CatscriptType::Int))
    );
}

#[test]
fn test_list_type_closed_by_greater_equal() {
    assert!(error_kinds("var x : list<int>= [1]").is_empty());
    assert!(error_kinds("var grid : list<list<int>>= []").is_empty());

    let kinds = statements("var x : list<int>= [1]");
    let StmtKind::VarDecl {
        explicit_type,
        value,
        ..
    } = &kinds[0]
    else {
        panic!("expected var declaration");
    };
    assert_eq!(
        explicit_type.as_ref().unwrap().ty,
        CatscriptType::list_of(CatscriptType::Int)
    );
    assert!(matches!(&value.kind, ExprKind::List(values) if values.len() == 1));
}

#[test]
fn test_bare_list_type_is_list_of_object() {
    let kinds = statements("var x : list = []");
    let StmtKind::VarDecl { explicit_type, .. } = &kinds[0] else {
        panic!("expected var declaration");
    };
    assert_eq!(
        explicit_type.as_ref().unwrap().ty,
        CatscriptType::list_of(CatscriptType::Object)
    );
}

#[test]
fn test_unknown_type_name() {
    let program = parse_program("var x : foo = 1", "test.cat");
    let StmtKind::VarDecl { explicit_type, .. } = &program.statements()[0].kind else {
        panic!("expected var declaration");
    };
    assert_eq!(explicit_type.as_ref().unwrap().ty, CatscriptType::Object);
    assert_eq!(
        error_kinds("var x : foo = 1"),
        vec![ErrorImpl::BadTypeName {
            name: "foo".to_string()
        }]
    );
}

#[test]
fn test_for_and_if_statements() {
    let kinds = statements(
        "for (x in [1, 2]) { print(x) }\nif (true) { print(1) } else if (false) { print(2) } else { print(3) }",
    );
    assert_eq!(kinds.len(), 2);

    let StmtKind::ForEach { variable, body, .. } = &kinds[0] else {
        panic!("expected for statement");
    };
    assert_eq!(variable, "x");
    assert_eq!(body.len(), 1);

    let StmtKind::If { else_body, .. } = &kinds[1] else {
        panic!("expected if statement");
    };
    let else_body = else_body.as_ref().unwrap();
    assert_eq!(else_body.len(), 1);
    let StmtKind::If {
        else_body: inner_else,
        ..
    } = &else_body[0].kind
    else {
        panic!("expected else-if to nest an if");
    };
    assert!(inner_else.is_some());
}

#[test]
fn test_assignment_and_call_statements() {
    let kinds = statements("x = 1\nfoo(x)");
    assert!(matches!(kinds[0], StmtKind::Assignment { .. }));
    assert!(matches!(kinds[1], StmtKind::Call(_)));
}

#[test]
fn test_function_definition() {
    let kinds = statements("function add(a : int, b) : int { return a + b }");
    let StmtKind::FunctionDef(function) = &kinds[0] else {
        panic!("expected function definition");
    };
    assert_eq!(function.name, "add");
    let signature = function.signature();
    assert_eq!(
        signature.parameters,
        vec![
            ("a".to_string(), CatscriptType::Int),
            ("b".to_string(), CatscriptType::Object)
        ]
    );
    assert_eq!(signature.return_type, CatscriptType::Int);
    assert!(matches!(function.body[0].kind, StmtKind::Return(Some(_))));
}

#[test]
fn test_function_defaults_to_void() {
    let kinds = statements("function f() { return }");
    let StmtKind::FunctionDef(function) = &kinds[0] else {
        panic!("expected function definition");
    };
    assert_eq!(function.return_type(), CatscriptType::Void);
    assert!(matches!(function.body[0].kind, StmtKind::Return(None)));
}

#[test]
fn test_return_outside_function_is_syntax_error() {
    let program = parse_program("return 1", "test.cat");
    assert!(program.statements()[0].is_syntax_error());
    assert!(program.has_errors());
}

#[test]
fn test_recovery_keeps_next_statement() {
    let program = parse_program("print(1 +\nprint(2)", "test.cat");
    let statements = program.statements();

    assert_eq!(statements.len(), 2);
    assert!(statements[0].is_syntax_error());
    assert!(matches!(statements[1].kind, StmtKind::Print(_)));
    assert_eq!(
        error_kinds("print(1 +\nprint(2)"),
        vec![ErrorImpl::UnexpectedToken {
            token: "print".to_string()
        }]
    );
}

#[test]
fn test_recovery_at_eof() {
    assert_eq!(
        error_kinds("print(1 +"),
        vec![ErrorImpl::UnexpectedToken {
            token: "<EOF>".to_string()
        }]
    );
}

#[test]
fn test_unterminated_constructs() {
    assert_eq!(
        error_kinds("print([1, 2)"),
        vec![ErrorImpl::UnterminatedList]
    );
    assert!(error_kinds("foo(1, 2").contains(&ErrorImpl::UnterminatedArgList));
    assert!(error_kinds("if (true) { print(1)").contains(&ErrorImpl::UnterminatedBody));
    assert!(error_kinds("print((1").contains(&ErrorImpl::UnterminatedParens));
}

#[test]
fn test_unrecognised_character() {
    assert_eq!(
        error_kinds("print(1) @"),
        vec![ErrorImpl::UnrecognisedToken {
            token: "@".to_string()
        }]
    );
}

#[test]
fn test_statement_spans_cover_tokens() {
    let source = "var x = 1\nprint(x)";
    let program = parse_program(source, "test.cat");
    let statements = program.statements();

    assert_eq!(statements[0].span.start.0, 0);
    assert_eq!(statements[0].span.end.0, 9);
    assert_eq!(statements[1].span.start.0, 10);
    assert_eq!(statements[1].span.end.0, source.len() as u32);
}
