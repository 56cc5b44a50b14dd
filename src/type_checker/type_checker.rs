use std::collections::HashMap;

use log::{debug, trace};

use crate::{
    ast::{
        ast::{Program, ProgramBody},
        expressions::{AdditiveOperator, Expr, ExprKind, UnaryOperator},
        statements::{FunctionSignature, Stmt, StmtKind},
        types::CatscriptType,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// Something a name can be bound to.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Variable(CatscriptType),
    Function(FunctionSignature),
}

/// One lexical scope.
#[derive(Debug)]
pub struct Environment {
    pub symbol_lookup: HashMap<String, Symbol>,
    pub id: usize,
}

impl Environment {
    pub fn new(id: usize) -> Self {
        Environment {
            symbol_lookup: HashMap::new(),
            id,
        }
    }

    pub fn declare(&mut self, name: &str, symbol: Symbol, position: Position) -> Result<(), Error> {
        if self.symbol_lookup.contains_key(name) {
            Err(Error::new(
                ErrorImpl::DuplicateName {
                    name: name.to_string(),
                },
                position,
            ))
        } else {
            self.symbol_lookup.insert(name.to_string(), symbol);
            Ok(())
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbol_lookup.get(name)
    }
}

/// Symbol table and per-pass state of the validator.
///
/// The first environment holds globals. Variable lookups inside a function body
/// see the function's own scopes and the globals, nothing in between; function
/// lookups see every enclosing scope.
#[derive(Debug)]
pub struct TypeChecker {
    environments: Vec<Environment>,
    /// Index of the innermost function's parameter scope
    function_base: Option<usize>,
    /// Declared return types of the functions being validated, innermost last
    return_types: Vec<CatscriptType>,
    /// How many functions of each name have been declared so far
    function_names: HashMap<String, usize>,
    next_id: usize,
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker {
            environments: vec![Environment::new(0)],
            function_base: None,
            return_types: vec![],
            function_names: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn push_environment(&mut self) {
        let environment = Environment::new(self.next_id);
        self.next_id += 1;
        trace!(
            "entering scope {} at depth {}",
            environment.id,
            self.environments.len()
        );
        self.environments.push(environment);
    }

    pub fn pop_environment(&mut self) {
        if self.environments.len() > 1 {
            self.environments.pop();
        }
    }

    fn current_environment(&mut self) -> &mut Environment {
        let last = self.environments.len() - 1;
        &mut self.environments[last]
    }

    /// Scopes visible to a variable lookup, innermost first.
    fn visible_for_variables(&self) -> impl Iterator<Item = &Environment> {
        let base = self.function_base.unwrap_or(0);
        let locals = self.environments[base..].iter().rev();
        let globals = self.function_base.map(|_| &self.environments[0]);
        locals.chain(globals)
    }

    pub fn fetch_variable_type(&self, name: &str) -> Option<CatscriptType> {
        for environment in self.visible_for_variables() {
            match environment.get(name) {
                Some(Symbol::Variable(ty)) => return Some(ty.clone()),
                Some(Symbol::Function(_)) => return None,
                None => {}
            }
        }
        None
    }

    pub fn fetch_function(&self, name: &str) -> Option<FunctionSignature> {
        self.environments
            .iter()
            .rev()
            .find_map(|environment| match environment.get(name) {
                Some(Symbol::Function(signature)) => Some(signature.clone()),
                _ => None,
            })
    }

    pub fn declare_variable(
        &mut self,
        name: &str,
        ty: CatscriptType,
        position: Position,
    ) -> Result<(), Error> {
        self.current_environment()
            .declare(name, Symbol::Variable(ty), position)
    }

    /// Declares a function in the innermost scope and returns its symbol.
    ///
    /// The first function of a name keeps the name as its symbol; later ones in
    /// other scopes get `name#n`, which no identifier can spell.
    pub fn declare_function(
        &mut self,
        mut signature: FunctionSignature,
        position: Position,
    ) -> Result<String, Error> {
        let seen = self
            .function_names
            .get(&signature.name)
            .copied()
            .unwrap_or(0);
        signature.symbol = if seen == 0 {
            signature.name.clone()
        } else {
            format!("{}#{}", signature.name, seen)
        };

        let name = signature.name.clone();
        let symbol = signature.symbol.clone();
        self.current_environment()
            .declare(&name, Symbol::Function(signature), position)?;

        debug!("hoisted function {} as {}", name, symbol);
        self.function_names.insert(name, seen + 1);
        Ok(symbol)
    }
}

/// Validates a whole program in place, attaching semantic diagnostics to its nodes.
pub fn validate(program: &mut Program) {
    let mut type_checker = TypeChecker::new();
    match &mut program.body {
        ProgramBody::Expression(expr) => {
            type_check_expr(&mut type_checker, expr);
        }
        ProgramBody::Statements(statements) => {
            type_check_block(&mut type_checker, statements);
        }
    }
}

/// Validates a standalone expression against an empty symbol table.
pub fn validate_expression(expr: &mut Expr) {
    let mut type_checker = TypeChecker::new();
    type_check_expr(&mut type_checker, expr);
}

fn incompatible(expected: &CatscriptType, received: &CatscriptType, position: Position) -> Error {
    Error::new(
        ErrorImpl::IncompatibleTypes {
            expected: expected.to_string(),
            received: received.to_string(),
        },
        position,
    )
}

fn unresolved(name: &str, position: Position) -> Error {
    Error::new(
        ErrorImpl::UnresolvedSymbol {
            name: name.to_string(),
        },
        position,
    )
}

/// Reports `expr` unless its type is exactly `expected`.
fn require_exact(expr: &Expr, ty: &CatscriptType, expected: &CatscriptType, errors: &mut Vec<Error>) {
    if ty != expected {
        errors.push(incompatible(expected, ty, expr.span.start.clone()));
    }
}

/// Computes and records the type of `expr` and of all its children.
pub fn type_check_expr(type_checker: &mut TypeChecker, expr: &mut Expr) -> CatscriptType {
    let position = expr.span.start.clone();
    let mut errors = vec![];

    let ty = match &mut expr.kind {
        ExprKind::Integer(_) => CatscriptType::Int,
        ExprKind::String(_) => CatscriptType::String,
        ExprKind::Boolean(_) => CatscriptType::Boolean,
        ExprKind::Null => CatscriptType::Object,
        ExprKind::Identifier(name) => match type_checker.fetch_variable_type(name) {
            Some(ty) => ty,
            None => {
                errors.push(unresolved(name, position));
                CatscriptType::Object
            }
        },
        ExprKind::Unary { operator, operand } => {
            let operand_type = type_check_expr(type_checker, operand);
            let expected = match operator {
                UnaryOperator::Negate => CatscriptType::Int,
                UnaryOperator::Not => CatscriptType::Boolean,
            };
            require_exact(operand, &operand_type, &expected, &mut errors);
            expected
        }
        ExprKind::Additive {
            operator,
            left,
            right,
        } => {
            let left_type = type_check_expr(type_checker, left);
            let right_type = type_check_expr(type_checker, right);

            let concatenates = *operator == AdditiveOperator::Plus
                && (left_type == CatscriptType::String || right_type == CatscriptType::String);
            if concatenates {
                CatscriptType::String
            } else {
                require_exact(left, &left_type, &CatscriptType::Int, &mut errors);
                require_exact(right, &right_type, &CatscriptType::Int, &mut errors);
                CatscriptType::Int
            }
        }
        ExprKind::Factor { left, right, .. } => {
            let left_type = type_check_expr(type_checker, left);
            let right_type = type_check_expr(type_checker, right);
            require_exact(left, &left_type, &CatscriptType::Int, &mut errors);
            require_exact(right, &right_type, &CatscriptType::Int, &mut errors);
            CatscriptType::Int
        }
        ExprKind::Comparison { left, right, .. } => {
            let left_type = type_check_expr(type_checker, left);
            let right_type = type_check_expr(type_checker, right);
            require_exact(left, &left_type, &CatscriptType::Int, &mut errors);
            require_exact(right, &right_type, &CatscriptType::Int, &mut errors);
            CatscriptType::Boolean
        }
        ExprKind::Equality { left, right, .. } => {
            type_check_expr(type_checker, left);
            type_check_expr(type_checker, right);
            CatscriptType::Boolean
        }
        ExprKind::Parenthesized(inner) => type_check_expr(type_checker, inner),
        ExprKind::List(values) => {
            let types: Vec<CatscriptType> = values
                .iter_mut()
                .map(|value| type_check_expr(type_checker, value))
                .collect();
            CatscriptType::list_of(CatscriptType::unify(&types))
        }
        ExprKind::Call(call) => {
            let argument_types: Vec<CatscriptType> = call
                .arguments
                .iter_mut()
                .map(|argument| type_check_expr(type_checker, argument))
                .collect();

            let signature = type_checker.fetch_function(&call.name);
            call.symbol = signature.as_ref().map(|signature| signature.symbol.clone());

            match signature {
                None => {
                    errors.push(unresolved(&call.name, position));
                    CatscriptType::Object
                }
                Some(signature) if signature.parameters.len() != call.arguments.len() => {
                    errors.push(Error::new(
                        ErrorImpl::ArityMismatch {
                            expected: signature.parameters.len(),
                            received: call.arguments.len(),
                        },
                        position,
                    ));
                    signature.return_type
                }
                Some(signature) => {
                    let pairs = call.arguments.iter().zip(&argument_types);
                    for ((argument, argument_type), (_, parameter_type)) in
                        pairs.zip(&signature.parameters)
                    {
                        if !parameter_type.is_assignable_from(argument_type) {
                            errors.push(incompatible(
                                parameter_type,
                                argument_type,
                                argument.span.start.clone(),
                            ));
                        }
                    }
                    signature.return_type
                }
            }
        }
    };

    expr.errors.extend(errors);
    expr.ty = Some(ty.clone());
    ty
}

/// Validates a statement list: hoists its functions, then checks each statement.
pub fn type_check_block(type_checker: &mut TypeChecker, statements: &mut [Stmt]) {
    for stmt in statements.iter_mut() {
        if let StmtKind::FunctionDef(function) = &mut stmt.kind {
            match type_checker.declare_function(function.signature(), stmt.span.start.clone()) {
                Ok(symbol) => function.symbol = symbol,
                Err(error) => stmt.errors.push(error),
            }
        }
    }

    for stmt in statements.iter_mut() {
        type_check_stmt(type_checker, stmt);
    }
}

/// Validates `body` in a fresh scope.
fn type_check_scoped_block(type_checker: &mut TypeChecker, body: &mut [Stmt]) {
    type_checker.push_environment();
    type_check_block(type_checker, body);
    type_checker.pop_environment();
}

pub fn type_check_stmt(type_checker: &mut TypeChecker, stmt: &mut Stmt) {
    let position = stmt.span.start.clone();
    let mut errors = vec![];

    match &mut stmt.kind {
        StmtKind::Print(expr) | StmtKind::Call(expr) => {
            type_check_expr(type_checker, expr);
        }
        StmtKind::ForEach {
            variable,
            iterable,
            body,
        } => {
            let iterable_type = type_check_expr(type_checker, iterable);
            let component = match iterable_type.component_type() {
                Some(component) => component,
                None => {
                    errors.push(incompatible(
                        &CatscriptType::list_of(CatscriptType::Object),
                        &iterable_type,
                        iterable.span.start.clone(),
                    ));
                    CatscriptType::Object
                }
            };

            type_checker.push_environment();
            if let Err(error) = type_checker.declare_variable(variable, component, position) {
                errors.push(error);
            }
            type_check_block(type_checker, body);
            type_checker.pop_environment();
        }
        StmtKind::If {
            condition,
            then_body,
            else_body,
        } => {
            let condition_type = type_check_expr(type_checker, condition);
            require_exact(condition, &condition_type, &CatscriptType::Boolean, &mut errors);

            type_check_scoped_block(type_checker, then_body);
            if let Some(else_body) = else_body {
                type_check_scoped_block(type_checker, else_body);
            }
        }
        StmtKind::VarDecl {
            name,
            explicit_type,
            value,
        } => {
            let value_type = type_check_expr(type_checker, value);
            let declared = match explicit_type {
                Some(literal) => {
                    if !literal.ty.is_assignable_from(&value_type) {
                        errors.push(incompatible(
                            &literal.ty,
                            &value_type,
                            value.span.start.clone(),
                        ));
                    }
                    literal.ty.clone()
                }
                None => value_type,
            };

            if let Err(error) = type_checker.declare_variable(name, declared, position) {
                errors.push(error);
            }
        }
        StmtKind::Assignment { name, value } => {
            let value_type = type_check_expr(type_checker, value);
            match type_checker.fetch_variable_type(name) {
                Some(target) => {
                    if !target.is_assignable_from(&value_type) {
                        errors.push(incompatible(&target, &value_type, value.span.start.clone()));
                    }
                }
                None => errors.push(unresolved(name, position)),
            }
        }
        StmtKind::FunctionDef(function) => {
            let return_type = function.return_type();

            let saved_base = type_checker.function_base;
            type_checker.push_environment();
            type_checker.function_base = Some(type_checker.environments.len() - 1);
            type_checker.return_types.push(return_type.clone());

            for parameter in &function.parameters {
                if let Err(error) =
                    type_checker.declare_variable(&parameter.name, parameter.ty(), position.clone())
                {
                    errors.push(error);
                }
            }
            type_check_block(type_checker, &mut function.body);

            type_checker.return_types.pop();
            type_checker.pop_environment();
            type_checker.function_base = saved_base;

            if return_type != CatscriptType::Void && !always_returns(&function.body) {
                errors.push(Error::new(
                    ErrorImpl::MissingReturnStatement {
                        function: function.name.clone(),
                    },
                    position,
                ));
            }
        }
        StmtKind::Return(value) => {
            let expected = type_checker
                .return_types
                .last()
                .cloned()
                .unwrap_or(CatscriptType::Void);

            match value {
                Some(value) => {
                    let value_type = type_check_expr(type_checker, value);
                    if expected == CatscriptType::Void || !expected.is_assignable_from(&value_type) {
                        errors.push(incompatible(&expected, &value_type, value.span.start.clone()));
                    }
                }
                None => {
                    if expected != CatscriptType::Void {
                        errors.push(incompatible(&expected, &CatscriptType::Void, position));
                    }
                }
            }
        }
        StmtKind::SyntaxError(_) => {}
    }

    stmt.errors.extend(errors);
}

/// Whether every path through `body` ends in a `return`.
pub fn always_returns(body: &[Stmt]) -> bool {
    match body.last().map(|stmt| &stmt.kind) {
        Some(StmtKind::Return(_)) => true,
        Some(StmtKind::If {
            then_body,
            else_body: Some(else_body),
            ..
        }) => always_returns(then_body) && always_returns(else_body),
        _ => false,
    }
}
