//! Integration tests for the complete pipeline.
//!
//! These tests run source text through tokenizing, parsing and validation and
//! then check that the interpreter and the bytecode machine agree, and that the
//! transpiler produces the expected JavaScript.

use std::{fs, process::Command};

use catscript::{
    ast::{
        ast::ProgramBody,
        expressions::{AdditiveOperator, ExprKind},
        statements::StmtKind,
        types::CatscriptType,
    },
    compiler::{compiler::compile_program, machine::Machine},
    errors::errors::ErrorImpl,
    interpreter::interpreter::Interpreter,
    parser::parser::{parse_expression_only, parse_program},
    transpiler::transpiler::transpile,
    type_checker::type_checker::validate,
};

const PROGRAMS: &[(&str, &str)] = &[
    ("1 + 2 * 3", "7"),
    ("print(\"hello\")", "hello"),
    (
        "var xs = [1, 2, 3]\nvar total = 0\nfor (x in xs) { total = total + x * x }\nprint(total)",
        "14",
    ),
    (
        "function fizz(n : int) : string {\n  if (n / 3 * 3 == n) { return \"fizz\" } else { return \"\" + n }\n}\nfor (i in [1, 2, 3, 4, 5, 6]) { print(fizz(i)) }",
        "1\n2\nfizz\n4\n5\nfizz",
    ),
    (
        "var count = 0\nfunction bump() { count = count + 1 }\nbump()\nbump()\nprint(count)",
        "2",
    ),
    (
        "function sum(xs : list<int>) : int {\n  var total = 0\n  for (x in xs) { total = total + x }\n  return total\n}\nvar grid : list<list<int>> = [[1, 2], [3], []]\nfor (row in grid) { print(sum(row)) }",
        "3\n3\n0",
    ),
    (
        "var label : object = \"cat\"\nprint(label)\nlabel = 9\nprint(label == 9)\nprint([label, null, true])",
        "cat\ntrue\n[9, null, true]",
    ),
    (
        "function sign(n : int) : int { if (n < 0) { return -1 } else if (n == 0) { return 0 } return 1 }\nprint(sign(-5))\nprint(sign(0))\nprint(sign(8))",
        "-1\n0\n1",
    ),
    (
        "function f() { print(1) }\nprint(f())\nvar x = f()\nprint(x)",
        "1\nnull\n1\nnull",
    ),
    (
        "function a() { function h() { print(1) }\nh() }\nfunction b() { function h() { print(2) }\nh() }\na()\nb()",
        "1\n2",
    ),
];

fn interpret(source: &str) -> String {
    let mut program = parse_program(source, "test.cat");
    validate(&mut program);
    assert!(
        !program.has_errors(),
        "unexpected diagnostics in {:?}: {:?}",
        source,
        program.diagnostics()
    );
    Interpreter::execute(&program).unwrap()
}

fn execute_bytecode(source: &str) -> String {
    let mut program = parse_program(source, "test.cat");
    validate(&mut program);
    let bytecode = compile_program(&program).unwrap();
    Machine::run(&bytecode).unwrap()
}

#[test]
fn test_interpreter_output() {
    for (source, expected) in PROGRAMS {
        assert_eq!(interpret(source), *expected, "interpreting {:?}", source);
    }
}

#[test]
fn test_bytecode_matches_interpreter() {
    for (source, _) in PROGRAMS {
        assert_eq!(
            execute_bytecode(source),
            interpret(source),
            "bytecode output for {:?}",
            source
        );
    }
}

#[test]
fn test_transpile_program() {
    let mut program = parse_program(
        "function twice(n : int) : int { return n * 2 }\nprint(twice(4) / 3)",
        "test.cat",
    );
    validate(&mut program);
    let javascript = transpile(&program);
    assert!(javascript.contains("function twice(n) {\n    return n * 2;\n}\n"));
    assert!(javascript.ends_with("console.log($str(Math.trunc(twice(4) / 3)));\n"));
}

/// Runs the transpiled program with `node`, or `None` when node is unavailable.
fn run_javascript(source: &str, index: usize) -> Option<String> {
    let mut program = parse_program(source, "test.cat");
    validate(&mut program);
    let path = std::env::temp_dir().join(format!(
        "catscript-{}-{}.js",
        std::process::id(),
        index
    ));
    fs::write(&path, transpile(&program)).unwrap();
    let output = Command::new("node").arg(&path).output();
    let _ = fs::remove_file(&path);

    let output = output.ok()?;
    assert!(
        output.status.success(),
        "node failed on {:?}: {}",
        source,
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout).unwrap();
    Some(stdout.trim_end_matches('\n').to_string())
}

#[test]
fn test_transpiled_output_matches_interpreter() {
    for (index, (source, _)) in PROGRAMS.iter().enumerate() {
        let Some(output) = run_javascript(source, index) else {
            eprintln!("node not found, skipping transpiled run");
            return;
        };
        assert_eq!(output, interpret(source), "javascript output for {:?}", source);
    }
}

#[test]
fn test_valid_program_has_no_diagnostics() {
    for (source, _) in PROGRAMS {
        let program = parse_program(source, "test.cat");
        assert!(program.diagnostics().is_empty(), "diagnostics in {:?}", source);
    }
}

#[test]
fn test_expression_disambiguation_agrees() {
    let direct = parse_expression_only("1 + 2", "test.cat").unwrap();
    assert!(matches!(
        &direct.kind,
        ExprKind::Additive {
            operator: AdditiveOperator::Plus,
            left,
            right,
        } if left.kind == ExprKind::Integer(1) && right.kind == ExprKind::Integer(2)
    ));

    let program = parse_program("1 + 2", "test.cat");
    assert!(program.statements().is_empty());
    assert_eq!(program.expression(), Some(&direct));
    assert_eq!(program.body, ProgramBody::Expression(direct));
}

#[test]
fn test_nested_list_type() {
    let mut program = parse_program("var grid : list<list<int>> = []", "test.cat");
    validate(&mut program);
    assert!(!program.has_errors());

    let StmtKind::VarDecl { explicit_type, .. } = &program.statements()[0].kind else {
        panic!("expected a variable declaration");
    };
    assert_eq!(
        explicit_type.as_ref().map(|literal| literal.ty.clone()),
        Some(CatscriptType::list_of(CatscriptType::list_of(CatscriptType::Int)))
    );
}

#[test]
fn test_semantic_diagnostics_are_counted_once() {
    let cases = [
        ("var x : int = \"hello\"", "IncompatibleTypes"),
        ("missing(1)", "UnresolvedSymbol"),
        ("function f(a : int) { }\nf(\"x\", true)", "ArityMismatch"),
    ];

    for (source, expected) in cases {
        let mut program = parse_program(source, "test.cat");
        validate(&mut program);
        let diagnostics = program.diagnostics();
        assert_eq!(diagnostics.len(), 1, "diagnostics for {:?}: {:?}", source, diagnostics);
        assert_eq!(diagnostics[0].get_error_name(), expected);
    }

    let mut program = parse_program("function f(a : int) { }\nf(1, 2)", "test.cat");
    validate(&mut program);
    assert_eq!(
        program.diagnostics()[0].get_error_impl(),
        &ErrorImpl::ArityMismatch {
            expected: 1,
            received: 2
        }
    );
}

#[test]
fn test_recovery_keeps_following_statement() {
    let program = parse_program("print(1 +\nprint(2)\nvar x = 3", "test.cat");
    let statements = program.statements();

    assert!(!program.diagnostics().is_empty());
    assert!(statements
        .iter()
        .any(|stmt| matches!(&stmt.kind, StmtKind::VarDecl { name, .. } if name == "x")));
    assert!(statements
        .iter()
        .any(|stmt| matches!(&stmt.kind, StmtKind::Print(expr) if expr.kind == ExprKind::Integer(2))));
}

#[test]
fn test_garbage_input_terminates() {
    let inputs = [
        ")))",
        "} } else else",
        "var = = =",
        "function ( { return",
        "for for for (",
        "[[[[",
        "if (",
        "print(",
        "@ # $",
        "return 1",
    ];

    for input in inputs {
        let program = parse_program(input, "test.cat");
        assert!(
            !program.diagnostics().is_empty(),
            "expected diagnostics for {:?}",
            input
        );
    }
}
