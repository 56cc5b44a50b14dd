//! Type system definitions for the AST.
//!
//! CatScript has a closed set of types: the primitives `int`, `bool`,
//! `string`, the universal supertype `object`, `void` for functions without a
//! result, and the parametrized `list<T>`.

use std::fmt::Display;

use crate::{errors::errors::Error, Span};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatscriptType {
    Int,
    Boolean,
    String,
    Object,
    Void,
    List(Box<CatscriptType>),
}

impl CatscriptType {
    pub fn list_of(component: CatscriptType) -> Self {
        CatscriptType::List(Box::new(component))
    }

    /// Whether a value of type `other` may be stored where `self` is expected.
    ///
    /// Identical types are assignable and OBJECT is compatible in both
    /// directions. Lists apply the same rule to their component types.
    pub fn is_assignable_from(&self, other: &CatscriptType) -> bool {
        match (self, other) {
            (CatscriptType::Object, _) | (_, CatscriptType::Object) => true,
            (CatscriptType::List(target), CatscriptType::List(source)) => {
                target.is_assignable_from(source)
            }
            (target, source) => target == source,
        }
    }

    /// Component type for `list<T>`; OBJECT iterates as OBJECT.
    pub fn component_type(&self) -> Option<CatscriptType> {
        match self {
            CatscriptType::List(component) => Some((**component).clone()),
            CatscriptType::Object => Some(CatscriptType::Object),
            _ => None,
        }
    }

    /// Least upper bound of a set of element types.
    pub fn unify<'a>(types: impl IntoIterator<Item = &'a CatscriptType>) -> CatscriptType {
        let mut types = types.into_iter();
        let Some(first) = types.next() else {
            return CatscriptType::Object;
        };

        if types.all(|ty| ty == first) {
            first.clone()
        } else {
            CatscriptType::Object
        }
    }

    /// Whether values of this type are held natively rather than as references
    /// once lowered to bytecode.
    pub fn is_native(&self) -> bool {
        matches!(self, CatscriptType::Int | CatscriptType::Boolean)
    }
}

impl Display for CatscriptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatscriptType::Int => write!(f, "int"),
            CatscriptType::Boolean => write!(f, "bool"),
            CatscriptType::String => write!(f, "string"),
            CatscriptType::Object => write!(f, "object"),
            CatscriptType::Void => write!(f, "void"),
            CatscriptType::List(component) => write!(f, "list<{}>", component),
        }
    }
}

/// A type written in source, as in `var x : list<int> = []`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeLiteral {
    pub ty: CatscriptType,
    pub span: Span,
    pub errors: Vec<Error>,
}
