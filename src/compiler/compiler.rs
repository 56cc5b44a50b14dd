//! Main compiler module.
//!
//! This module contains the core Compiler structure and the lowering pipeline
//! from a validated AST to stack bytecode. Top-level code becomes the `<main>`
//! method and every function definition becomes a method of its own.

use std::collections::HashMap;

use crate::{
    ast::{
        ast::{Program, ProgramBody},
        statements::{FunctionDefinition, FunctionSignature},
        types::CatscriptType,
    },
    errors::errors::CompileError,
};

use super::{
    bytecode::{ByteCode, Instruction, InstructionSink, NativeKind, MAIN_METHOD},
    expr::gen_expression,
    stmt::gen_block,
};

/// Where a variable lives at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    Global(String),
    Local(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub storage: Storage,
    pub ty: CatscriptType,
}

/// The state of one lowering pass.
pub struct Compiler {
    /// Collected methods
    pub bytecode: ByteCode,
    /// Signatures of every function in the program
    pub functions: HashMap<String, FunctionSignature>,
    /// Scope stack; the first scope holds globals
    scopes: Vec<HashMap<String, Variable>>,
    /// Whether the method being lowered is a function body
    in_function: bool,
    /// Next free local slot of the current method
    next_slot: usize,
    /// Declared return type of the method being lowered
    pub return_type: CatscriptType,
}

impl Compiler {
    pub fn new(functions: HashMap<String, FunctionSignature>) -> Self {
        Compiler {
            bytecode: ByteCode::new(),
            functions,
            scopes: vec![HashMap::new()],
            in_function: false,
            next_slot: 0,
            return_type: CatscriptType::Void,
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn allocate_slot(&mut self) -> usize {
        let slot = self.next_slot;
        self.next_slot += 1;
        slot
    }

    /// Declares a variable in the innermost scope.
    ///
    /// Variables of the outermost top-level scope are globals, everything else
    /// gets a local slot.
    pub fn declare_variable(&mut self, name: &str, ty: CatscriptType) -> Variable {
        let storage = if !self.in_function && self.scopes.len() == 1 {
            Storage::Global(name.to_string())
        } else {
            Storage::Local(self.allocate_slot())
        };

        let variable = Variable { storage, ty };
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), variable.clone());
        }
        variable
    }

    pub fn lookup_variable(&self, name: &str) -> Result<Variable, CompileError> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).cloned())
            .ok_or_else(|| CompileError::UnknownVariable {
                name: name.to_string(),
            })
    }

    pub fn emit_load(&mut self, variable: &Variable) {
        match &variable.storage {
            Storage::Global(name) => self.bytecode.emit(Instruction::GetGlobal(name.clone())),
            Storage::Local(slot) => self.bytecode.emit(Instruction::LoadLocal(*slot)),
        }
    }

    pub fn emit_store(&mut self, variable: &Variable) {
        match &variable.storage {
            Storage::Global(name) => self.bytecode.emit(Instruction::PutGlobal(name.clone())),
            Storage::Local(slot) => self.bytecode.emit(Instruction::StoreLocal(*slot)),
        }
    }

    /// Converts the value on top of the stack from the representation of `from`
    /// to that of `to`.
    pub fn coerce(&mut self, from: &CatscriptType, to: &CatscriptType) {
        match (from.is_native(), to.is_native()) {
            (true, false) => self.box_native(from),
            (false, true) => self.bytecode.emit(Instruction::Unbox),
            _ => {}
        }
    }

    /// Boxes the value on top of the stack if `ty` is held natively.
    pub fn box_native(&mut self, ty: &CatscriptType) {
        match ty {
            CatscriptType::Int => self.bytecode.emit(Instruction::Box(NativeKind::Int)),
            CatscriptType::Boolean => self.bytecode.emit(Instruction::Box(NativeKind::Boolean)),
            _ => {}
        }
    }

    fn finish_method(&mut self) -> Result<(), CompileError> {
        let locals = self.next_slot;
        self.bytecode.end_method(locals)
    }

    fn compile_main(&mut self, program: &Program) -> Result<(), CompileError> {
        self.bytecode.begin_method(MAIN_METHOD, 0);
        self.in_function = false;
        self.next_slot = 0;
        self.return_type = CatscriptType::Void;

        match &program.body {
            ProgramBody::Expression(expr) => {
                gen_expression(self, expr)?;
                self.box_native(&expr.static_type());
                self.bytecode.emit(Instruction::Print);
            }
            ProgramBody::Statements(statements) => gen_block(self, statements)?,
        }

        self.bytecode.emit(Instruction::Return);
        self.finish_method()
    }

    fn compile_function(&mut self, function: &FunctionDefinition) -> Result<(), CompileError> {
        self.bytecode
            .begin_method(&function.symbol, function.parameters.len());
        self.in_function = true;
        self.next_slot = 0;
        self.return_type = function.return_type();

        // Functions see globals and their own locals only
        self.scopes.truncate(1);
        self.push_scope();
        for parameter in &function.parameters {
            self.declare_variable(&parameter.name, parameter.ty());
        }

        gen_block(self, &function.body)?;
        self.bytecode.emit(Instruction::Return);

        self.pop_scope();
        self.finish_method()
    }
}

/// Lowers a validated program to bytecode.
pub fn compile_program(program: &Program) -> Result<ByteCode, CompileError> {
    let diagnostics = program.diagnostics();
    if !diagnostics.is_empty() {
        return Err(CompileError::InvalidProgram {
            count: diagnostics.len(),
        });
    }

    let definitions = program.functions();
    let functions = definitions
        .iter()
        .map(|function| (function.symbol.clone(), function.signature()))
        .collect();

    let mut compiler = Compiler::new(functions);
    // Main first, so its outermost scope holds every global the functions use
    compiler.compile_main(program)?;
    for function in definitions {
        compiler.compile_function(function)?;
    }

    Ok(compiler.bytecode)
}
