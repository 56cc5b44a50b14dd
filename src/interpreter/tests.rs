//! Unit tests for the interpreter.

use std::rc::Rc;

use crate::{
    errors::errors::RuntimeError,
    parser::parser::{parse_expression_only, parse_program},
    type_checker::type_checker::validate,
};

use super::{interpreter::Interpreter, value::Value};

fn run(source: &str) -> Result<String, RuntimeError> {
    let mut program = parse_program(source, "test.cat");
    validate(&mut program);
    assert!(
        !program.has_errors(),
        "unexpected diagnostics: {:?}",
        program.diagnostics()
    );
    Interpreter::execute(&program)
}

fn evaluate(source: &str) -> Value {
    let expr = parse_expression_only(source, "test.cat").unwrap();
    Interpreter::evaluate(&expr).unwrap()
}

#[test]
fn test_evaluate_arithmetic() {
    assert_eq!(evaluate("1 + 2 * 3"), Value::Int(7));
    assert_eq!(evaluate("(1 + 2) * 3"), Value::Int(9));
    assert_eq!(evaluate("7 / 2"), Value::Int(3));
    assert_eq!(evaluate("-7 / 2"), Value::Int(-3));
    assert_eq!(evaluate("10 - 4 - 3"), Value::Int(3));
    assert_eq!(evaluate("- -5"), Value::Int(5));
}

#[test]
fn test_evaluate_logic() {
    assert_eq!(evaluate("1 < 2"), Value::Boolean(true));
    assert_eq!(evaluate("2 <= 1"), Value::Boolean(false));
    assert_eq!(evaluate("not (1 > 2)"), Value::Boolean(true));
    assert_eq!(evaluate("null == null"), Value::Boolean(true));
    assert_eq!(evaluate("1 != 1"), Value::Boolean(false));
}

#[test]
fn test_equality_compares_values() {
    assert_eq!(evaluate("\"a\" + \"b\" == \"ab\""), Value::Boolean(true));
    assert_eq!(evaluate("[1, 2] == [1, 2]"), Value::Boolean(true));
    assert_eq!(evaluate("1 == true"), Value::Boolean(false));
}

#[test]
fn test_concatenation() {
    assert_eq!(
        evaluate("\"n=\" + 1 + true"),
        Value::String("n=1true".to_string())
    );
    assert_eq!(
        evaluate("[1, 2] + \"!\""),
        Value::String("[1, 2]!".to_string())
    );
}

#[test]
fn test_list_values() {
    assert_eq!(
        evaluate("[1, [2]]"),
        Value::List(Rc::new(vec![
            Value::Int(1),
            Value::List(Rc::new(vec![Value::Int(2)]))
        ]))
    );
    assert_eq!(evaluate("[1, [2], \"a\", null]").to_string(), "[1, [2], a, null]");
}

#[test]
fn test_division_by_zero() {
    let expr = parse_expression_only("1 / 0", "test.cat").unwrap();
    assert_eq!(
        Interpreter::evaluate(&expr),
        Err(RuntimeError::DivisionByZero)
    );
}

#[test]
fn test_expression_program_prints_its_value() {
    assert_eq!(run("1 + 2").unwrap(), "3");
}

#[test]
fn test_print_and_variables() {
    assert_eq!(
        run("var x = 1\nx = x + 41\nprint(x)\nprint(\"done\")").unwrap(),
        "42\ndone"
    );
}

#[test]
fn test_for_loop() {
    assert_eq!(
        run("var total = 0\nfor (x in [1, 2, 3]) { total = total + x }\nprint(total)").unwrap(),
        "6"
    );
}

#[test]
fn test_if_else_chain() {
    let source = "for (x in [1, 2, 3]) { if (x == 1) { print(\"one\") } else if (x == 2) { print(\"two\") } else { print(\"many\") } }";
    assert_eq!(run(source).unwrap(), "one\ntwo\nmany");
}

#[test]
fn test_shadowing_does_not_leak() {
    assert_eq!(
        run("var x = 1\nif (true) { var x = 2\nprint(x) }\nprint(x)").unwrap(),
        "2\n1"
    );
}

#[test]
fn test_recursive_function() {
    let source = "function fact(n : int) : int { if (n <= 1) { return 1 } else { return n * fact(n - 1) } }\nprint(fact(10))";
    assert_eq!(run(source).unwrap(), "3628800");
}

#[test]
fn test_return_from_inside_loop() {
    let source = "function first_over(xs : list<int>, limit : int) : int { for (x in xs) { if (x > limit) { return x } } return -1 }\nprint(first_over([1, 5, 9], 4))\nprint(first_over([1], 4))";
    assert_eq!(run(source).unwrap(), "5\n-1");
}

#[test]
fn test_functions_see_globals_not_caller_locals() {
    let source = "var g = 10\nfunction show() { print(g) }\nif (true) { var g2 = 1\nshow() }\ng = 11\nshow()";
    assert_eq!(run(source).unwrap(), "10\n11");
}

#[test]
fn test_void_call_statement() {
    let source = "function greet(name : string) { print(\"hi \" + name) }\ngreet(\"cat\")";
    assert_eq!(run(source).unwrap(), "hi cat");
}

#[test]
fn test_iterating_null_fails() {
    let mut program = parse_program("var xs : list = null\nfor (x in xs) { print(x) }", "test.cat");
    validate(&mut program);
    assert!(!program.has_errors());
    assert_eq!(
        Interpreter::execute(&program),
        Err(RuntimeError::NotIterable {
            value: "null".to_string()
        })
    );
}
