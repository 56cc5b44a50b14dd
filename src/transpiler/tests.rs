//! Unit tests for the JavaScript transpiler.

use crate::{
    parser::parser::{parse_expression_only, parse_program},
    type_checker::type_checker::validate,
};

use super::transpiler::{transpile, transpile_expr, PRELUDE};

fn transpile_source(source: &str) -> String {
    let mut program = parse_program(source, "test.cat");
    validate(&mut program);
    assert!(
        !program.has_errors(),
        "unexpected diagnostics: {:?}",
        program.diagnostics()
    );
    let output = transpile(&program);
    assert!(output.starts_with(PRELUDE));
    output[PRELUDE.len()..].to_string()
}

fn expr(source: &str) -> String {
    transpile_expr(&parse_expression_only(source, "test.cat").unwrap())
}

#[test]
fn test_operators() {
    assert_eq!(expr("1 + 2 * 3"), "$add(1, 2 * 3)");
    assert_eq!(expr("(1 - 2) / 3"), "Math.trunc((1 - 2) / 3)");
    assert_eq!(expr("1 == 2"), "$eq(1, 2)");
    assert_eq!(expr("[1] != [1]"), "!$eq([1], [1])");
    assert_eq!(expr("not (1 >= 2)"), "!(1 >= 2)");
    assert_eq!(expr("- -5"), "-(-5)");
}

#[test]
fn test_literals() {
    assert_eq!(expr("[1, \"a\", null, true]"), "[1, \"a\", null, true]");
    assert_eq!(expr("f(1, [])"), "f(1, [])");
}

#[test]
fn test_expression_program() {
    assert_eq!(transpile_source("1 + 2"), "console.log($str($add(1, 2)));\n");
}

#[test]
fn test_statements() {
    let source = "var xs : list<int> = [1, 2]\nfor (x in xs) { print(x) }\nxs = []";
    assert_eq!(
        transpile_source(source),
        "let xs = [1, 2];\nfor (const x of xs) {\n    console.log($str(x));\n}\nxs = [];\n"
    );
}

#[test]
fn test_if_else_chain() {
    let source = "var x = 2\nif (x == 1) { print(1) } else if (x == 2) { print(2) } else { print(3) }";
    assert_eq!(
        transpile_source(source),
        "let x = 2;\n\
         if ($eq(x, 1)) {\n    console.log($str(1));\n\
         } else if ($eq(x, 2)) {\n    console.log($str(2));\n\
         } else {\n    console.log($str(3));\n}\n"
    );
}

#[test]
fn test_functions() {
    let source = "function add(a : int, b : int) : int { return a + b }\nfunction hello() { print(\"hi\")\nreturn }\nhello()";
    assert_eq!(
        transpile_source(source),
        "function add(a, b) {\n    return $add(a, b);\n}\n\
         function hello() {\n    console.log($str(\"hi\"));\n    return null;\n}\n\
         hello();\n"
    );
}

#[test]
fn test_void_functions_return_null() {
    let source = "function f() { print(1) }\nprint(f())\nvar x = f()\nprint(x)";
    assert_eq!(
        transpile_source(source),
        "function f() {\n    console.log($str(1));\n    return null;\n}\n\
         console.log($str(f()));\n\
         let x = f();\n\
         console.log($str(x));\n"
    );
}
