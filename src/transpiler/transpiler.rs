//! JavaScript code generation.
//!
//! Every node emits a fragment that mirrors its children. The generated program
//! starts with a small prelude so that printing, `+` and `==` behave like the
//! interpreter at runtime: lists print as `[a, b]`, `+` with a string operand
//! concatenates display forms and lists compare element-wise.

use log::debug;

use crate::ast::{
    ast::{Program, ProgramBody},
    expressions::{
        AdditiveOperator, ComparisonOperator, EqualityOperator, Expr, ExprKind, FactorOperator,
        UnaryOperator,
    },
    statements::{FunctionDefinition, Stmt, StmtKind},
};
use crate::type_checker::type_checker::always_returns;

pub const PRELUDE: &str = r#"function $str(value) {
    if (value === null) return "null";
    if (Array.isArray(value)) return "[" + value.map($str).join(", ") + "]";
    return String(value);
}
function $add(left, right) {
    if (typeof left === "string" || typeof right === "string") return $str(left) + $str(right);
    return left + right;
}
function $eq(left, right) {
    if (Array.isArray(left) && Array.isArray(right)) {
        return left.length === right.length && left.every((value, index) => $eq(value, right[index]));
    }
    return left === right;
}
"#;

const INDENT: &str = "    ";

/// Text buffer with the current block depth.
#[derive(Debug, Default)]
pub struct Transpiler {
    output: String,
    depth: usize,
}

impl Transpiler {
    pub fn new() -> Self {
        Self::default()
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.output.push_str(INDENT);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn finish(self) -> String {
        self.output
    }
}

/// Transpiles a validated program to a standalone JavaScript program.
pub fn transpile(program: &Program) -> String {
    let mut transpiler = Transpiler::new();
    transpiler.output.push_str(PRELUDE);

    match &program.body {
        ProgramBody::Expression(expr) => {
            let line = format!("console.log($str({}));", transpile_expr(expr));
            transpiler.line(&line);
        }
        ProgramBody::Statements(statements) => transpile_block(&mut transpiler, statements),
    }

    let output = transpiler.finish();
    debug!("transpiled program to {} bytes of JavaScript", output.len());
    output
}

pub fn transpile_block(transpiler: &mut Transpiler, statements: &[Stmt]) {
    for stmt in statements {
        transpile_stmt(transpiler, stmt);
    }
}

fn transpile_body(transpiler: &mut Transpiler, statements: &[Stmt]) {
    transpiler.indent();
    transpile_block(transpiler, statements);
    transpiler.dedent();
}

pub fn transpile_stmt(transpiler: &mut Transpiler, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::Print(expr) => {
            let line = format!("console.log($str({}));", transpile_expr(expr));
            transpiler.line(&line);
        }
        StmtKind::ForEach {
            variable,
            iterable,
            body,
        } => {
            let line = format!("for (const {} of {}) {{", variable, transpile_expr(iterable));
            transpiler.line(&line);
            transpile_body(transpiler, body);
            transpiler.line("}");
        }
        StmtKind::If { .. } => {
            transpile_if(transpiler, stmt, "if");
            transpiler.line("}");
        }
        StmtKind::VarDecl { name, value, .. } => {
            let line = format!("let {} = {};", name, transpile_expr(value));
            transpiler.line(&line);
        }
        StmtKind::Assignment { name, value } => {
            let line = format!("{} = {};", name, transpile_expr(value));
            transpiler.line(&line);
        }
        StmtKind::Call(expr) => {
            let line = format!("{};", transpile_expr(expr));
            transpiler.line(&line);
        }
        StmtKind::FunctionDef(function) => transpile_function(transpiler, function),
        StmtKind::Return(value) => match value {
            Some(value) => {
                let line = format!("return {};", transpile_expr(value));
                transpiler.line(&line);
            }
            // Void calls evaluate to null, not undefined
            None => transpiler.line("return null;"),
        },
        StmtKind::SyntaxError(_) => {}
    }
}

/// Emits an `if` and its `else if` chain, leaving the final `}` to the caller.
fn transpile_if(transpiler: &mut Transpiler, stmt: &Stmt, keyword: &str) {
    let StmtKind::If {
        condition,
        then_body,
        else_body,
    } = &stmt.kind
    else {
        return;
    };

    let line = format!("{} ({}) {{", keyword, transpile_expr(condition));
    transpiler.line(&line);
    transpile_body(transpiler, then_body);

    match else_body.as_deref() {
        Some([nested]) if matches!(nested.kind, StmtKind::If { .. }) => {
            transpile_if(transpiler, nested, "} else if");
        }
        Some(else_body) => {
            transpiler.line("} else {");
            transpile_body(transpiler, else_body);
        }
        None => {}
    }
}

fn transpile_function(transpiler: &mut Transpiler, function: &FunctionDefinition) {
    let parameters = function
        .parameters
        .iter()
        .map(|parameter| parameter.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let line = format!("function {}({}) {{", function.name, parameters);
    transpiler.line(&line);
    transpile_body(transpiler, &function.body);
    if !always_returns(&function.body) {
        transpiler.indent();
        transpiler.line("return null;");
        transpiler.dedent();
    }
    transpiler.line("}");
}

pub fn transpile_expr(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Integer(value) => value.to_string(),
        ExprKind::String(value) => quote(value),
        ExprKind::Boolean(value) => value.to_string(),
        ExprKind::Null => String::from("null"),
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::Unary { operator, operand } => {
            let symbol = match operator {
                UnaryOperator::Negate => "-",
                UnaryOperator::Not => "!",
            };
            // `- -x` must not become the decrement operator
            if matches!(operand.kind, ExprKind::Unary { .. }) {
                format!("{}({})", symbol, transpile_expr(operand))
            } else {
                format!("{}{}", symbol, transpile_expr(operand))
            }
        }
        ExprKind::Additive {
            operator,
            left,
            right,
        } => match operator {
            AdditiveOperator::Plus => {
                format!("$add({}, {})", transpile_expr(left), transpile_expr(right))
            }
            AdditiveOperator::Minus => {
                format!("{} - {}", transpile_expr(left), transpile_expr(right))
            }
        },
        ExprKind::Factor {
            operator,
            left,
            right,
        } => match operator {
            FactorOperator::Multiply => {
                format!("{} * {}", transpile_expr(left), transpile_expr(right))
            }
            FactorOperator::Divide => format!(
                "Math.trunc({} / {})",
                transpile_expr(left),
                transpile_expr(right)
            ),
        },
        ExprKind::Comparison {
            operator,
            left,
            right,
        } => {
            let symbol = match operator {
                ComparisonOperator::Greater => ">",
                ComparisonOperator::GreaterEqual => ">=",
                ComparisonOperator::Less => "<",
                ComparisonOperator::LessEqual => "<=",
            };
            format!("{} {} {}", transpile_expr(left), symbol, transpile_expr(right))
        }
        ExprKind::Equality {
            operator,
            left,
            right,
        } => {
            let negation = match operator {
                EqualityOperator::Equal => "",
                EqualityOperator::NotEqual => "!",
            };
            format!(
                "{}$eq({}, {})",
                negation,
                transpile_expr(left),
                transpile_expr(right)
            )
        }
        ExprKind::Parenthesized(inner) => format!("({})", transpile_expr(inner)),
        ExprKind::List(values) => format!("[{}]", transpile_list(values)),
        ExprKind::Call(call) => format!("{}({})", call.name, transpile_list(&call.arguments)),
    }
}

fn transpile_list(values: &[Expr]) -> String {
    values
        .iter()
        .map(transpile_expr)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Double-quoted JavaScript string literal.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if (c as u32) < 0x20 => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
