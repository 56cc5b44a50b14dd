//! Tree-walking evaluation of validated programs.
//!
//! Execution pipeline:
//! execute -> exec_block (top-level statements) -> exec_stmt
//! -> eval_expr -> eval_call -> exec_block (function body).

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{
        ast::{Program, ProgramBody},
        expressions::{
            AdditiveOperator, ComparisonOperator, EqualityOperator, Expr, ExprKind,
            FactorOperator, FunctionCall, UnaryOperator,
        },
        statements::{Stmt, StmtKind},
    },
    errors::errors::RuntimeError,
};

use super::{
    runtime::{Flow, Runtime},
    value::Value,
};

pub struct Interpreter;

impl Interpreter {
    /// Runs a program and returns everything it printed, one line per `print`.
    ///
    /// An expression program prints its own value.
    pub fn execute(program: &Program) -> Result<String, RuntimeError> {
        let mut runtime = Runtime::new(program.functions());

        match &program.body {
            ProgramBody::Expression(expr) => {
                let value = eval_expr(&mut runtime, expr)?;
                runtime.print(&value);
            }
            ProgramBody::Statements(statements) => {
                exec_block(&mut runtime, statements)?;
            }
        }

        Ok(runtime.take_output())
    }

    /// Evaluates a standalone expression with no variables or functions in scope.
    pub fn evaluate(expr: &Expr) -> Result<Value, RuntimeError> {
        let mut runtime = Runtime::new(vec![]);
        eval_expr(&mut runtime, expr)
    }
}

pub fn exec_block(runtime: &mut Runtime, statements: &[Stmt]) -> Result<Flow, RuntimeError> {
    for stmt in statements {
        if let Flow::Return(value) = exec_stmt(runtime, stmt)? {
            return Ok(Flow::Return(value));
        }
    }
    Ok(Flow::Normal)
}

fn exec_scoped_block(runtime: &mut Runtime, statements: &[Stmt]) -> Result<Flow, RuntimeError> {
    runtime.push_scope();
    let flow = exec_block(runtime, statements);
    runtime.pop_scope();
    flow
}

pub fn exec_stmt(runtime: &mut Runtime, stmt: &Stmt) -> Result<Flow, RuntimeError> {
    match &stmt.kind {
        StmtKind::Print(expr) => {
            let value = eval_expr(runtime, expr)?;
            runtime.print(&value);
        }
        StmtKind::ForEach {
            variable,
            iterable,
            body,
        } => {
            let values = match eval_expr(runtime, iterable)? {
                Value::List(values) => values,
                other => {
                    return Err(RuntimeError::NotIterable {
                        value: other.to_string(),
                    })
                }
            };

            for value in values.iter() {
                runtime.push_scope();
                runtime.define_variable(variable, value.clone());
                let flow = exec_block(runtime, body);
                runtime.pop_scope();

                if let Flow::Return(value) = flow? {
                    return Ok(Flow::Return(value));
                }
            }
        }
        StmtKind::If {
            condition,
            then_body,
            else_body,
        } => {
            let flow = if expect_boolean(eval_expr(runtime, condition)?, "if")? {
                exec_scoped_block(runtime, then_body)?
            } else if let Some(else_body) = else_body {
                exec_scoped_block(runtime, else_body)?
            } else {
                Flow::Normal
            };
            return Ok(flow);
        }
        StmtKind::VarDecl { name, value, .. } => {
            let value = eval_expr(runtime, value)?;
            runtime.define_variable(name, value);
        }
        StmtKind::Assignment { name, value } => {
            let value = eval_expr(runtime, value)?;
            runtime.set_variable(name, value)?;
        }
        StmtKind::Call(expr) => {
            eval_expr(runtime, expr)?;
        }
        // Functions are looked up by name when called
        StmtKind::FunctionDef(_) => {}
        StmtKind::Return(value) => {
            let value = match value {
                Some(value) => Some(eval_expr(runtime, value)?),
                None => None,
            };
            return Ok(Flow::Return(value));
        }
        StmtKind::SyntaxError(_) => {}
    }

    Ok(Flow::Normal)
}

fn expect_int(value: Value, operator: &str) -> Result<i64, RuntimeError> {
    match value {
        Value::Int(value) => Ok(value),
        other => Err(RuntimeError::InvalidOperand {
            operator: operator.to_string(),
            value: other.to_string(),
        }),
    }
}

fn expect_boolean(value: Value, operator: &str) -> Result<bool, RuntimeError> {
    match value {
        Value::Boolean(value) => Ok(value),
        other => Err(RuntimeError::InvalidOperand {
            operator: operator.to_string(),
            value: other.to_string(),
        }),
    }
}

pub fn eval_expr(runtime: &mut Runtime, expr: &Expr) -> Result<Value, RuntimeError> {
    match &expr.kind {
        ExprKind::Integer(value) => Ok(Value::Int(*value)),
        ExprKind::String(value) => Ok(Value::String(value.clone())),
        ExprKind::Boolean(value) => Ok(Value::Boolean(*value)),
        ExprKind::Null => Ok(Value::Null),
        ExprKind::Identifier(name) => runtime.get_variable(name),
        ExprKind::Unary { operator, operand } => {
            let operand = eval_expr(runtime, operand)?;
            match operator {
                UnaryOperator::Negate => Ok(Value::Int(expect_int(operand, "-")?.wrapping_neg())),
                UnaryOperator::Not => Ok(Value::Boolean(!expect_boolean(operand, "not")?)),
            }
        }
        ExprKind::Additive {
            operator,
            left,
            right,
        } => {
            let left = eval_expr(runtime, left)?;
            let right = eval_expr(runtime, right)?;

            match operator {
                AdditiveOperator::Plus => {
                    if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
                        Ok(Value::String(format!("{}{}", left, right)))
                    } else {
                        let left = expect_int(left, "+")?;
                        let right = expect_int(right, "+")?;
                        Ok(Value::Int(left.wrapping_add(right)))
                    }
                }
                AdditiveOperator::Minus => {
                    let left = expect_int(left, "-")?;
                    let right = expect_int(right, "-")?;
                    Ok(Value::Int(left.wrapping_sub(right)))
                }
            }
        }
        ExprKind::Factor {
            operator,
            left,
            right,
        } => {
            let left = expect_int(eval_expr(runtime, left)?, &operator.to_string())?;
            let right = expect_int(eval_expr(runtime, right)?, &operator.to_string())?;

            match operator {
                FactorOperator::Multiply => Ok(Value::Int(left.wrapping_mul(right))),
                FactorOperator::Divide => {
                    if right == 0 {
                        Err(RuntimeError::DivisionByZero)
                    } else {
                        Ok(Value::Int(left.wrapping_div(right)))
                    }
                }
            }
        }
        ExprKind::Comparison {
            operator,
            left,
            right,
        } => {
            let left = expect_int(eval_expr(runtime, left)?, &operator.to_string())?;
            let right = expect_int(eval_expr(runtime, right)?, &operator.to_string())?;

            Ok(Value::Boolean(match operator {
                ComparisonOperator::Greater => left > right,
                ComparisonOperator::GreaterEqual => left >= right,
                ComparisonOperator::Less => left < right,
                ComparisonOperator::LessEqual => left <= right,
            }))
        }
        ExprKind::Equality {
            operator,
            left,
            right,
        } => {
            let left = eval_expr(runtime, left)?;
            let right = eval_expr(runtime, right)?;

            Ok(Value::Boolean(match operator {
                EqualityOperator::Equal => left == right,
                EqualityOperator::NotEqual => left != right,
            }))
        }
        ExprKind::Parenthesized(inner) => eval_expr(runtime, inner),
        ExprKind::List(values) => {
            let values = values
                .iter()
                .map(|value| eval_expr(runtime, value))
                .collect::<Result<Vec<Value>, RuntimeError>>()?;
            Ok(Value::List(Rc::new(values)))
        }
        ExprKind::Call(call) => eval_call(runtime, call),
    }
}

fn eval_call(runtime: &mut Runtime, call: &FunctionCall) -> Result<Value, RuntimeError> {
    let function = runtime.get_function(call.target())?;

    let mut bindings = HashMap::new();
    for (parameter, argument) in function.parameters.iter().zip(&call.arguments) {
        let value = eval_expr(runtime, argument)?;
        bindings.insert(parameter.name.clone(), value);
    }

    let saved = runtime.enter_call(bindings);
    let flow = exec_block(runtime, &function.body);
    runtime.exit_call(saved);

    match flow? {
        Flow::Return(Some(value)) => Ok(value),
        Flow::Return(None) | Flow::Normal => Ok(Value::Null),
    }
}
