use crate::{
    ast::{
        expressions::{
            AdditiveOperator, ComparisonOperator, EqualityOperator, Expr, ExprKind,
            FactorOperator, FunctionCall, UnaryOperator,
        },
        types::CatscriptType,
    },
    errors::errors::CompileError,
};

use super::{
    bytecode::{Instruction, InstructionSink, Jump},
    compiler::Compiler,
};

/// Lowers an expression, leaving exactly one value on the stack.
///
/// INT and BOOLEAN results are native, everything else is a reference.
pub fn gen_expression(compiler: &mut Compiler, expr: &Expr) -> Result<(), CompileError> {
    match &expr.kind {
        ExprKind::Integer(value) => compiler.bytecode.emit(Instruction::PushInt(*value)),
        ExprKind::String(value) => compiler
            .bytecode
            .emit(Instruction::PushString(value.clone())),
        ExprKind::Boolean(value) => compiler
            .bytecode
            .emit(Instruction::PushInt(i64::from(*value))),
        ExprKind::Null => compiler.bytecode.emit(Instruction::PushNull),
        ExprKind::Identifier(name) => {
            let variable = compiler.lookup_variable(name)?;
            compiler.emit_load(&variable);
        }
        ExprKind::Unary { operator, operand } => {
            gen_expression(compiler, operand)?;
            match operator {
                UnaryOperator::Negate => compiler.bytecode.emit(Instruction::INeg),
                UnaryOperator::Not => gen_branch_constant(compiler, Jump::IfFalse),
            }
        }
        ExprKind::Additive {
            operator,
            left,
            right,
        } => {
            if expr.static_type() == CatscriptType::String {
                gen_reference(compiler, left)?;
                gen_reference(compiler, right)?;
                compiler.bytecode.emit(Instruction::Concat);
            } else {
                gen_expression(compiler, left)?;
                gen_expression(compiler, right)?;
                compiler.bytecode.emit(match operator {
                    AdditiveOperator::Plus => Instruction::IAdd,
                    AdditiveOperator::Minus => Instruction::ISub,
                });
            }
        }
        ExprKind::Factor {
            operator,
            left,
            right,
        } => {
            gen_expression(compiler, left)?;
            gen_expression(compiler, right)?;
            compiler.bytecode.emit(match operator {
                FactorOperator::Multiply => Instruction::IMul,
                FactorOperator::Divide => Instruction::IDiv,
            });
        }
        ExprKind::Comparison {
            operator,
            left,
            right,
        } => {
            gen_expression(compiler, left)?;
            gen_expression(compiler, right)?;
            let jump = match operator {
                ComparisonOperator::Greater => Jump::IfICmpGt,
                ComparisonOperator::GreaterEqual => Jump::IfICmpGe,
                ComparisonOperator::Less => Jump::IfICmpLt,
                ComparisonOperator::LessEqual => Jump::IfICmpLe,
            };
            gen_branch_constant(compiler, jump);
        }
        ExprKind::Equality {
            operator,
            left,
            right,
        } => {
            // `1 == true` must stay false, so only same-typed natives compare as integers
            let left_type = left.static_type();
            let native = left_type.is_native() && left_type == right.static_type();
            if native {
                gen_expression(compiler, left)?;
                gen_expression(compiler, right)?;
                let jump = match operator {
                    EqualityOperator::Equal => Jump::IfICmpEq,
                    EqualityOperator::NotEqual => Jump::IfICmpNe,
                };
                gen_branch_constant(compiler, jump);
            } else {
                gen_reference(compiler, left)?;
                gen_reference(compiler, right)?;
                compiler.bytecode.emit(Instruction::RefEquals);
                let jump = match operator {
                    EqualityOperator::Equal => Jump::IfTrue,
                    EqualityOperator::NotEqual => Jump::IfFalse,
                };
                gen_branch_constant(compiler, jump);
            }
        }
        ExprKind::Parenthesized(inner) => gen_expression(compiler, inner)?,
        ExprKind::List(values) => {
            for value in values {
                gen_reference(compiler, value)?;
            }
            compiler.bytecode.emit(Instruction::MakeList(values.len()));
        }
        ExprKind::Call(call) => gen_call(compiler, call)?,
    }

    Ok(())
}

/// Lowers an expression and boxes it if its result is native.
pub fn gen_reference(compiler: &mut Compiler, expr: &Expr) -> Result<(), CompileError> {
    gen_expression(compiler, expr)?;
    compiler.box_native(&expr.static_type());
    Ok(())
}

/// Turns a conditional jump into a native 0 or 1.
///
/// Emits `jump TRUE; push 0; goto END; TRUE: push 1; END:` with fresh labels.
pub fn gen_branch_constant(compiler: &mut Compiler, jump: Jump) {
    let true_label = compiler.bytecode.new_label();
    let end_label = compiler.bytecode.new_label();

    compiler.bytecode.emit_jump(jump, true_label);
    compiler.bytecode.emit(Instruction::PushInt(0));
    compiler.bytecode.emit_jump(Jump::Goto, end_label);
    compiler.bytecode.place_label(true_label);
    compiler.bytecode.emit(Instruction::PushInt(1));
    compiler.bytecode.place_label(end_label);
}

fn gen_call(compiler: &mut Compiler, call: &FunctionCall) -> Result<(), CompileError> {
    let signature = compiler
        .functions
        .get(call.target())
        .cloned()
        .ok_or_else(|| CompileError::UnknownFunction {
            name: call.target().to_string(),
        })?;

    for (argument, (_, parameter_type)) in call.arguments.iter().zip(&signature.parameters) {
        gen_expression(compiler, argument)?;
        compiler.coerce(&argument.static_type(), parameter_type);
    }

    compiler.bytecode.emit(Instruction::InvokeStatic {
        name: signature.symbol.clone(),
        arity: call.arguments.len(),
    });

    if signature.return_type == CatscriptType::Void {
        compiler.bytecode.emit(Instruction::PushNull);
    }

    Ok(())
}
