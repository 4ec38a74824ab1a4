//! Member-set resolution for Java-like types.
//!
//! [`MemberResolver::all_methods`] computes every method visible on a type: its own declared
//! methods plus each inherited method that is not shadowed by a closer declaration with the same
//! signature. Ancestors come from an [`AncestorProvider`] (by default [`HierarchyWalker`]), and
//! functional-interface detection is delegated to a [`FunctionalClassifier`] (by default
//! [`SamClassifier`]), so either can be swapped out by callers and tests.

mod ancestors;
mod error;
mod functional;
mod resolver;
mod signature;
mod usage;

pub use ancestors::{
    AncestorConfig, AncestorProvider, HierarchyWalker, ReferenceType, UnresolvedPolicy,
};
pub use error::{ResolveError, Result};
pub use functional::{FunctionalClassifier, SamClassifier};
pub use resolver::{MemberResolver, VisibleMethods};
pub use signature::signature_of;
pub use usage::MethodUsage;
