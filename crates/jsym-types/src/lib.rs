//! Type model shared by the jsym crates.
//!
//! Types are plain values: class types refer to their declaration through a [`ClassId`] and
//! type variables through a [`TypeVarId`], both of which are resolved against a [`TypeEnv`].
//! Nothing in here mutates a declaration once it has been handed out by the environment.

use std::fmt;

use serde::{Deserialize, Serialize};

mod error;
pub mod java;
mod store;

pub use error::{Result, TypeError};
pub use java::format::{describe, describe_class};
pub use java::subst::{canonicalize_named, substitute, substitute_all, MAX_TYPE_DEPTH};
pub use store::TypeStore;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassId(u32);

impl ClassId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn to_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({})", self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeVarId(u32);

impl TypeVarId {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn to_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TypeVarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeVarId({})", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Char => "char",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassType {
    pub def: ClassId,
    pub args: Vec<Type>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<Type>),
    Super(Box<Type>),
}

/// A (possibly generic) Java type expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Void,
    Primitive(PrimitiveType),
    Class(ClassType),
    /// A class type that is only known by its binary name (not yet loaded, or missing from the
    /// environment entirely).
    Named(String),
    TypeVar(TypeVarId),
    Wildcard(WildcardBound),
    Array(Box<Type>),
}

impl Type {
    pub fn class(def: ClassId, args: Vec<Type>) -> Self {
        Type::Class(ClassType { def, args })
    }

    pub fn array(elem: Type) -> Self {
        Type::Array(Box::new(elem))
    }

    pub fn boolean() -> Self {
        Type::Primitive(PrimitiveType::Boolean)
    }

    pub fn int() -> Self {
        Type::Primitive(PrimitiveType::Int)
    }

    pub fn wildcard_extends(upper: Type) -> Self {
        Type::Wildcard(WildcardBound::Extends(Box::new(upper)))
    }

    pub fn wildcard_super(lower: Type) -> Self {
        Type::Wildcard(WildcardBound::Super(Box::new(lower)))
    }

    /// Returns `true` if `id` occurs anywhere inside this type expression.
    pub fn mentions(&self, id: TypeVarId) -> bool {
        match self {
            Type::TypeVar(var) => *var == id,
            Type::Class(ClassType { args, .. }) => args.iter().any(|arg| arg.mentions(id)),
            Type::Array(elem) => elem.mentions(id),
            Type::Wildcard(WildcardBound::Extends(bound))
            | Type::Wildcard(WildcardBound::Super(bound)) => bound.mentions(id),
            Type::Void
            | Type::Primitive(_)
            | Type::Named(_)
            | Type::Wildcard(WildcardBound::Unbounded) => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParamDef {
    pub name: String,
    pub upper_bounds: Vec<Type>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDef {
    pub name: String,
    /// Method-level type parameters (`<T> T pick(T a, T b)`).
    pub type_params: Vec<TypeVarId>,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub is_static: bool,
    pub is_varargs: bool,
    pub is_abstract: bool,
}

impl MethodDef {
    /// An abstract instance method with no method-level type parameters.
    pub fn abstract_method(name: impl Into<String>, params: Vec<Type>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            type_params: vec![],
            params,
            return_type,
            is_static: false,
            is_varargs: false,
            is_abstract: true,
        }
    }

    /// A concrete instance method with no method-level type parameters.
    pub fn concrete_method(name: impl Into<String>, params: Vec<Type>, return_type: Type) -> Self {
        Self {
            is_abstract: false,
            ..Self::abstract_method(name, params, return_type)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    Class,
    Interface,
}

/// A resolved type declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Binary name, e.g. `java.util.Map$Entry`.
    pub name: String,
    pub kind: ClassKind,
    pub type_params: Vec<TypeVarId>,
    pub super_class: Option<Type>,
    pub interfaces: Vec<Type>,
    pub methods: Vec<MethodDef>,
}

impl ClassDef {
    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WellKnownTypes {
    pub object: ClassId,
    pub string: ClassId,
    pub integer: ClassId,
    pub cloneable: ClassId,
}

/// Read-only view of a set of type declarations.
///
/// Implementations must be safe to share across threads for concurrent reads; none of the
/// algorithms in this workspace mutate an environment.
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;

    /// Binary name of `id`. Available even for interned ids that have no definition yet.
    fn class_name(&self, id: ClassId) -> Option<&str>;

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;

    fn lookup_class(&self, name: &str) -> Option<ClassId>;

    fn well_known(&self) -> &WellKnownTypes;
}
