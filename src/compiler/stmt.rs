use crate::{
    ast::{
        statements::{Stmt, StmtKind},
        types::CatscriptType,
    },
    errors::errors::CompileError,
};

use super::{
    bytecode::{Instruction, InstructionSink, Jump},
    compiler::Compiler,
    expr::{gen_expression, gen_reference},
};

pub fn gen_block(compiler: &mut Compiler, statements: &[Stmt]) -> Result<(), CompileError> {
    for stmt in statements {
        gen_statement(compiler, stmt)?;
    }
    Ok(())
}

fn gen_scoped_block(compiler: &mut Compiler, statements: &[Stmt]) -> Result<(), CompileError> {
    compiler.push_scope();
    gen_block(compiler, statements)?;
    compiler.pop_scope();
    Ok(())
}

pub fn gen_statement(compiler: &mut Compiler, statement: &Stmt) -> Result<(), CompileError> {
    match &statement.kind {
        StmtKind::Print(expr) => {
            gen_reference(compiler, expr)?;
            compiler.bytecode.emit(Instruction::Print);
        }
        StmtKind::ForEach {
            variable,
            iterable,
            body,
        } => {
            let component = iterable
                .static_type()
                .component_type()
                .unwrap_or(CatscriptType::Object);

            gen_expression(compiler, iterable)?;
            compiler.bytecode.emit(Instruction::GetIterator);
            let iterator_slot = compiler.allocate_slot();
            compiler.bytecode.emit(Instruction::StoreLocal(iterator_slot));

            let start_label = compiler.bytecode.new_label();
            let end_label = compiler.bytecode.new_label();

            compiler.bytecode.place_label(start_label);
            compiler.bytecode.emit(Instruction::LoadLocal(iterator_slot));
            compiler.bytecode.emit(Instruction::HasNext);
            compiler.bytecode.emit_jump(Jump::IfFalse, end_label);

            compiler.push_scope();
            let loop_variable = compiler.declare_variable(variable, component.clone());
            compiler.bytecode.emit(Instruction::LoadLocal(iterator_slot));
            compiler.bytecode.emit(Instruction::Next);
            compiler.coerce(&CatscriptType::Object, &component);
            compiler.emit_store(&loop_variable);
            gen_block(compiler, body)?;
            compiler.pop_scope();

            compiler.bytecode.emit_jump(Jump::Goto, start_label);
            compiler.bytecode.place_label(end_label);
        }
        StmtKind::If {
            condition,
            then_body,
            else_body,
        } => {
            let else_label = compiler.bytecode.new_label();
            let end_label = compiler.bytecode.new_label();

            gen_expression(compiler, condition)?;
            compiler.bytecode.emit_jump(Jump::IfFalse, else_label);
            gen_scoped_block(compiler, then_body)?;
            compiler.bytecode.emit_jump(Jump::Goto, end_label);

            compiler.bytecode.place_label(else_label);
            if let Some(else_body) = else_body {
                gen_scoped_block(compiler, else_body)?;
            }
            compiler.bytecode.place_label(end_label);
        }
        StmtKind::VarDecl {
            name,
            explicit_type,
            value,
        } => {
            let value_type = value.static_type();
            let declared = explicit_type
                .as_ref()
                .map_or(value_type.clone(), |literal| literal.ty.clone());

            gen_expression(compiler, value)?;
            compiler.coerce(&value_type, &declared);
            let variable = compiler.declare_variable(name, declared);
            compiler.emit_store(&variable);
        }
        StmtKind::Assignment { name, value } => {
            let variable = compiler.lookup_variable(name)?;
            gen_expression(compiler, value)?;
            compiler.coerce(&value.static_type(), &variable.ty);
            compiler.emit_store(&variable);
        }
        StmtKind::Call(expr) => {
            gen_expression(compiler, expr)?;
            compiler.bytecode.emit(Instruction::Pop);
        }
        // Lowered as a separate method
        StmtKind::FunctionDef(_) => {}
        StmtKind::Return(value) => match value {
            Some(value) => {
                gen_expression(compiler, value)?;
                let return_type = compiler.return_type.clone();
                compiler.coerce(&value.static_type(), &return_type);
                compiler.bytecode.emit(Instruction::ReturnValue);
            }
            None => compiler.bytecode.emit(Instruction::Return),
        },
        StmtKind::SyntaxError(_) => {}
    }

    Ok(())
}
