use std::collections::HashMap;

use log::trace;

use crate::{ast::statements::FunctionDefinition, errors::errors::RuntimeError};

use super::value::Value;

/// Control-flow marker for statement execution.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Return(Option<Value>),
}

/// Variables, call frames, functions and printed output of one run.
///
/// `scopes[0]` holds globals. A call starts a frame at `frame_base`; lookups
/// inside the frame see its scopes and the globals, never the caller's locals.
pub struct Runtime<'a> {
    scopes: Vec<HashMap<String, Value>>,
    frame_base: usize,
    functions: HashMap<&'a str, &'a FunctionDefinition>,
    output: Vec<String>,
}

impl<'a> Runtime<'a> {
    pub fn new(functions: Vec<&'a FunctionDefinition>) -> Self {
        Runtime {
            scopes: vec![HashMap::new()],
            frame_base: 0,
            functions: functions
                .into_iter()
                .map(|function| (function.symbol.as_str(), function))
                .collect(),
            output: vec![],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > self.frame_base + 1 {
            self.scopes.pop();
        }
    }

    /// Starts a call frame whose first scope holds `bindings`.
    ///
    /// Returns the caller's frame base, to be handed back to `exit_call`.
    pub fn enter_call(&mut self, bindings: HashMap<String, Value>) -> usize {
        let saved = self.frame_base;
        self.scopes.push(bindings);
        self.frame_base = self.scopes.len() - 1;
        trace!("entered call frame at depth {}", self.frame_base);
        saved
    }

    pub fn exit_call(&mut self, saved: usize) {
        self.scopes.truncate(self.frame_base);
        self.frame_base = saved;
    }

    fn visible_scope_indices(&self) -> impl Iterator<Item = usize> {
        let globals = if self.frame_base > 0 { Some(0) } else { None };
        (self.frame_base..self.scopes.len()).rev().chain(globals)
    }

    pub fn get_variable(&self, name: &str) -> Result<Value, RuntimeError> {
        self.visible_scope_indices()
            .find_map(|index| self.scopes[index].get(name).cloned())
            .ok_or_else(|| RuntimeError::UnboundVariable {
                name: name.to_string(),
            })
    }

    /// Binds `name` in the innermost scope.
    pub fn define_variable(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    /// Overwrites the nearest visible binding of `name`.
    pub fn set_variable(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let index = self
            .visible_scope_indices()
            .find(|index| self.scopes[*index].contains_key(name))
            .ok_or_else(|| RuntimeError::UnboundVariable {
                name: name.to_string(),
            })?;
        self.scopes[index].insert(name.to_string(), value);
        Ok(())
    }

    pub fn get_function(&self, name: &str) -> Result<&'a FunctionDefinition, RuntimeError> {
        self.functions
            .get(name)
            .copied()
            .ok_or_else(|| RuntimeError::UnknownFunction {
                name: name.to_string(),
            })
    }

    pub fn print(&mut self, value: &Value) {
        self.output.push(value.to_string());
    }

    pub fn take_output(&mut self) -> String {
        std::mem::take(&mut self.output).join("\n")
    }
}
