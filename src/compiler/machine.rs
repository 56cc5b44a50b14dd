//! A small stack machine for lowered bytecode.
//!
//! Stack entries are either native integers or references. Instructions that
//! expect one representation and find the other fail with a `MachineError`
//! instead of converting implicitly.

use std::{cell::Cell, collections::HashMap, fmt::Display, rc::Rc};

use log::trace;

use crate::errors::errors::MachineError;

use super::bytecode::{ByteCode, Instruction, Jump, Method, NativeKind};

/// Heap values.
#[derive(Debug, Clone)]
pub enum Reference {
    Null,
    Int(i64),
    Boolean(bool),
    String(Rc<str>),
    List(Rc<Vec<Reference>>),
    Iterator(Rc<ListCursor>),
}

#[derive(Debug)]
pub struct ListCursor {
    values: Rc<Vec<Reference>>,
    position: Cell<usize>,
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Reference::Null, Reference::Null) => true,
            (Reference::Int(left), Reference::Int(right)) => left == right,
            (Reference::Boolean(left), Reference::Boolean(right)) => left == right,
            (Reference::String(left), Reference::String(right)) => left == right,
            (Reference::List(left), Reference::List(right)) => left == right,
            (Reference::Iterator(left), Reference::Iterator(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }
}

impl Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reference::Null => write!(f, "null"),
            Reference::Int(value) => write!(f, "{}", value),
            Reference::Boolean(value) => write!(f, "{}", value),
            Reference::String(value) => write!(f, "{}", value),
            Reference::List(values) => {
                write!(f, "[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
            Reference::Iterator(_) => write!(f, "<iterator>"),
        }
    }
}

/// One operand stack entry, global or local slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Native(i64),
    Reference(Reference),
}

impl Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Native(value) => write!(f, "native {}", value),
            Slot::Reference(reference) => write!(f, "reference {}", reference),
        }
    }
}

struct Frame {
    stack: Vec<Slot>,
    locals: Vec<Slot>,
}

impl Frame {
    fn pop(&mut self) -> Result<Slot, MachineError> {
        self.stack.pop().ok_or(MachineError::StackUnderflow)
    }

    fn pop_native(&mut self) -> Result<i64, MachineError> {
        match self.pop()? {
            Slot::Native(value) => Ok(value),
            other => Err(MachineError::ExpectedNative {
                found: other.to_string(),
            }),
        }
    }

    fn pop_reference(&mut self) -> Result<Reference, MachineError> {
        match self.pop()? {
            Slot::Reference(reference) => Ok(reference),
            other => Err(MachineError::ExpectedReference {
                found: other.to_string(),
            }),
        }
    }

    fn pop_cursor(&mut self) -> Result<Rc<ListCursor>, MachineError> {
        match self.pop_reference()? {
            Reference::Iterator(cursor) => Ok(cursor),
            other => Err(MachineError::NotIterable {
                found: other.to_string(),
            }),
        }
    }

    fn push_native(&mut self, value: i64) {
        self.stack.push(Slot::Native(value));
    }

    fn push_reference(&mut self, reference: Reference) {
        self.stack.push(Slot::Reference(reference));
    }

    fn local(&self, slot: usize) -> Slot {
        self.locals
            .get(slot)
            .cloned()
            .unwrap_or(Slot::Reference(Reference::Null))
    }

    fn set_local(&mut self, slot: usize, value: Slot) {
        if slot >= self.locals.len() {
            self.locals
                .resize(slot + 1, Slot::Reference(Reference::Null));
        }
        self.locals[slot] = value;
    }
}

pub struct Machine<'a> {
    bytecode: &'a ByteCode,
    globals: HashMap<String, Slot>,
    output: Vec<String>,
}

impl<'a> Machine<'a> {
    pub fn new(bytecode: &'a ByteCode) -> Self {
        Machine {
            bytecode,
            globals: HashMap::new(),
            output: vec![],
        }
    }

    /// Runs `<main>` and returns the printed output, one line per `Print`.
    pub fn run(bytecode: &ByteCode) -> Result<String, MachineError> {
        let mut machine = Machine::new(bytecode);
        let main = bytecode
            .main()
            .ok_or_else(|| MachineError::UndefinedMethod {
                name: super::bytecode::MAIN_METHOD.to_string(),
            })?;
        machine.execute_method(main, vec![])?;
        Ok(machine.output.join("\n"))
    }

    fn execute_method(
        &mut self,
        method: &Method,
        arguments: Vec<Slot>,
    ) -> Result<Option<Slot>, MachineError> {
        trace!("invoking {} with {} arguments", method.name, arguments.len());

        let mut frame = Frame {
            stack: vec![],
            locals: arguments,
        };
        frame
            .locals
            .resize(method.locals.max(frame.locals.len()), Slot::Reference(Reference::Null));

        let mut ip = 0;
        while ip < method.code.len() {
            let instruction = &method.code[ip];
            ip += 1;

            match instruction {
                Instruction::PushInt(value) => frame.push_native(*value),
                Instruction::PushString(value) => {
                    frame.push_reference(Reference::String(Rc::from(value.as_str())))
                }
                Instruction::PushNull => frame.push_reference(Reference::Null),
                Instruction::Box(kind) => {
                    let value = frame.pop_native()?;
                    frame.push_reference(match kind {
                        NativeKind::Int => Reference::Int(value),
                        NativeKind::Boolean => Reference::Boolean(value != 0),
                    });
                }
                Instruction::Unbox => match frame.pop_reference()? {
                    Reference::Int(value) => frame.push_native(value),
                    Reference::Boolean(value) => frame.push_native(i64::from(value)),
                    other => {
                        return Err(MachineError::ExpectedNative {
                            found: other.to_string(),
                        })
                    }
                },
                Instruction::Pop => {
                    frame.pop()?;
                }
                Instruction::GetGlobal(name) => {
                    let value = self.globals.get(name).cloned().ok_or_else(|| {
                        MachineError::UndefinedGlobal { name: name.clone() }
                    })?;
                    frame.stack.push(value);
                }
                Instruction::PutGlobal(name) => {
                    let value = frame.pop()?;
                    self.globals.insert(name.clone(), value);
                }
                Instruction::LoadLocal(slot) => {
                    let value = frame.local(*slot);
                    frame.stack.push(value);
                }
                Instruction::StoreLocal(slot) => {
                    let value = frame.pop()?;
                    frame.set_local(*slot, value);
                }
                Instruction::IAdd => {
                    let right = frame.pop_native()?;
                    let left = frame.pop_native()?;
                    frame.push_native(left.wrapping_add(right));
                }
                Instruction::ISub => {
                    let right = frame.pop_native()?;
                    let left = frame.pop_native()?;
                    frame.push_native(left.wrapping_sub(right));
                }
                Instruction::IMul => {
                    let right = frame.pop_native()?;
                    let left = frame.pop_native()?;
                    frame.push_native(left.wrapping_mul(right));
                }
                Instruction::IDiv => {
                    let right = frame.pop_native()?;
                    let left = frame.pop_native()?;
                    if right == 0 {
                        return Err(MachineError::DivisionByZero);
                    }
                    frame.push_native(left.wrapping_div(right));
                }
                Instruction::INeg => {
                    let value = frame.pop_native()?;
                    frame.push_native(value.wrapping_neg());
                }
                Instruction::Concat => {
                    let right = frame.pop_reference()?;
                    let left = frame.pop_reference()?;
                    let joined = format!("{}{}", left, right);
                    frame.push_reference(Reference::String(Rc::from(joined.as_str())));
                }
                Instruction::RefEquals => {
                    let right = frame.pop_reference()?;
                    let left = frame.pop_reference()?;
                    frame.push_native(i64::from(left == right));
                }
                Instruction::MakeList(count) => {
                    if frame.stack.len() < *count {
                        return Err(MachineError::StackUnderflow);
                    }
                    let start = frame.stack.len() - count;
                    let values = frame
                        .stack
                        .split_off(start)
                        .into_iter()
                        .map(|slot| match slot {
                            Slot::Reference(reference) => Ok(reference),
                            other => Err(MachineError::ExpectedReference {
                                found: other.to_string(),
                            }),
                        })
                        .collect::<Result<Vec<Reference>, MachineError>>()?;
                    frame.push_reference(Reference::List(Rc::new(values)));
                }
                Instruction::GetIterator => match frame.pop_reference()? {
                    Reference::List(values) => {
                        frame.push_reference(Reference::Iterator(Rc::new(ListCursor {
                            values,
                            position: Cell::new(0),
                        })))
                    }
                    other => {
                        return Err(MachineError::NotIterable {
                            found: other.to_string(),
                        })
                    }
                },
                Instruction::HasNext => {
                    let cursor = frame.pop_cursor()?;
                    let has_next = cursor.position.get() < cursor.values.len();
                    frame.push_native(i64::from(has_next));
                }
                Instruction::Next => {
                    let cursor = frame.pop_cursor()?;
                    let position = cursor.position.get();
                    let value = cursor
                        .values
                        .get(position)
                        .cloned()
                        .ok_or(MachineError::StackUnderflow)?;
                    cursor.position.set(position + 1);
                    frame.push_reference(value);
                }
                Instruction::Print => {
                    let value = frame.pop_reference()?;
                    self.output.push(value.to_string());
                }
                Instruction::InvokeStatic { name, arity } => {
                    let callee = self
                        .bytecode
                        .method(name)
                        .ok_or_else(|| MachineError::UndefinedMethod { name: name.clone() })?;
                    if frame.stack.len() < *arity {
                        return Err(MachineError::StackUnderflow);
                    }
                    let start = frame.stack.len() - arity;
                    let arguments = frame.stack.split_off(start);
                    if let Some(result) = self.execute_method(callee, arguments)? {
                        frame.stack.push(result);
                    }
                }
                Instruction::Return => return Ok(None),
                Instruction::ReturnValue => return Ok(Some(frame.pop()?)),
                Instruction::Jump(jump, target) => {
                    let taken = match jump {
                        Jump::Goto => true,
                        Jump::IfTrue => frame.pop_native()? != 0,
                        Jump::IfFalse => frame.pop_native()? == 0,
                        _ => {
                            let right = frame.pop_native()?;
                            let left = frame.pop_native()?;
                            match jump {
                                Jump::IfICmpEq => left == right,
                                Jump::IfICmpNe => left != right,
                                Jump::IfICmpLt => left < right,
                                Jump::IfICmpLe => left <= right,
                                Jump::IfICmpGt => left > right,
                                _ => left >= right,
                            }
                        }
                    };
                    if taken {
                        ip = *target;
                    }
                }
            }
        }

        Ok(None)
    }
}
