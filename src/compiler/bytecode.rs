//! Instruction set and the sink that collects lowered methods.
//!
//! Jumps are emitted against symbolic labels; `ByteCode` resolves them to
//! instruction offsets when the method that uses them is finished.

use std::{collections::HashMap, fmt::Display};

use log::debug;

use crate::errors::errors::CompileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(pub usize);

/// Branch conditions. Conditional jumps pop their native operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jump {
    Goto,
    IfTrue,
    IfFalse,
    IfICmpEq,
    IfICmpNe,
    IfICmpLt,
    IfICmpLe,
    IfICmpGt,
    IfICmpGe,
}

/// Which native value a `Box` wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeKind {
    Int,
    Boolean,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// Pushes a native integer; booleans are 0 and 1
    PushInt(i64),
    PushString(String),
    PushNull,
    Box(NativeKind),
    Unbox,
    Pop,

    GetGlobal(String),
    PutGlobal(String),
    LoadLocal(usize),
    StoreLocal(usize),

    IAdd,
    ISub,
    IMul,
    IDiv,
    INeg,
    /// Pops two references, pushes their concatenated display forms
    Concat,
    /// Pops two references, pushes native 1 if they are equal values
    RefEquals,

    /// Pops `n` references into a new list
    MakeList(usize),
    /// Pops a list, pushes an iterator over it
    GetIterator,
    /// Pops an iterator, pushes native 1 if it has more elements
    HasNext,
    /// Pops an iterator, advances it and pushes the element
    Next,

    /// Pops a reference and prints it
    Print,
    InvokeStatic { name: String, arity: usize },
    Return,
    ReturnValue,

    /// Resolved jump to an instruction offset
    Jump(Jump, usize),
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::PushString(value) => write!(f, "PushString {:?}", value),
            Instruction::InvokeStatic { name, arity } => write!(f, "InvokeStatic {}/{}", name, arity),
            Instruction::Jump(jump, target) => write!(f, "{:?} -> {}", jump, target),
            other => write!(f, "{:?}", other),
        }
    }
}

/// A finished method with resolved jump targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: String,
    pub parameters: usize,
    pub locals: usize,
    pub code: Vec<Instruction>,
}

/// Destination of lowered code.
pub trait InstructionSink {
    fn emit(&mut self, instruction: Instruction);
    fn emit_jump(&mut self, jump: Jump, label: Label);
    fn new_label(&mut self) -> Label;
    fn place_label(&mut self, label: Label);
}

#[derive(Debug, Default)]
struct MethodBuilder {
    name: String,
    parameters: usize,
    code: Vec<Instruction>,
    placed: HashMap<Label, usize>,
    /// Code offsets of jumps whose target is still a label number
    fixups: Vec<usize>,
}

/// Lowered program: one method per function plus `main`.
#[derive(Debug, Default)]
pub struct ByteCode {
    pub methods: HashMap<String, Method>,
    /// Method names in the order they were finished
    pub order: Vec<String>,
    current: MethodBuilder,
    next_label: usize,
}

/// Name of the top-level method; not a valid identifier, so it never clashes.
pub const MAIN_METHOD: &str = "<main>";

impl ByteCode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts collecting a new method. Any unfinished method is discarded.
    pub fn begin_method(&mut self, name: &str, parameters: usize) {
        self.current = MethodBuilder {
            name: name.to_string(),
            parameters,
            ..Default::default()
        };
    }

    /// Resolves the current method's labels and stores it.
    pub fn end_method(&mut self, locals: usize) -> Result<(), CompileError> {
        let mut builder = std::mem::take(&mut self.current);

        for offset in builder.fixups {
            if let Instruction::Jump(jump, label) = builder.code[offset] {
                let target = builder
                    .placed
                    .get(&Label(label))
                    .copied()
                    .ok_or(CompileError::UnplacedLabel { label })?;
                builder.code[offset] = Instruction::Jump(jump, target);
            }
        }

        debug!(
            "emitted method {} ({} instructions, {} locals)",
            builder.name,
            builder.code.len(),
            locals
        );

        self.order.push(builder.name.clone());
        self.methods.insert(
            builder.name.clone(),
            Method {
                name: builder.name,
                parameters: builder.parameters,
                locals,
                code: builder.code,
            },
        );
        Ok(())
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.get(name)
    }

    pub fn main(&self) -> Option<&Method> {
        self.method(MAIN_METHOD)
    }
}

impl InstructionSink for ByteCode {
    fn emit(&mut self, instruction: Instruction) {
        self.current.code.push(instruction);
    }

    fn emit_jump(&mut self, jump: Jump, label: Label) {
        self.current.fixups.push(self.current.code.len());
        self.current.code.push(Instruction::Jump(jump, label.0));
    }

    fn new_label(&mut self) -> Label {
        let label = Label(self.next_label);
        self.next_label += 1;
        label
    }

    fn place_label(&mut self, label: Label) {
        let offset = self.current.code.len();
        self.current.placed.insert(label, offset);
    }
}

impl Display for ByteCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for name in &self.order {
            let Some(method) = self.methods.get(name) else {
                continue;
            };
            writeln!(
                f,
                "method {}({}) locals={}",
                method.name, method.parameters, method.locals
            )?;
            for (offset, instruction) in method.code.iter().enumerate() {
                writeln!(f, "  {:>4}: {}", offset, instruction)?;
            }
        }
        Ok(())
    }
}
