//! Java-specific operations over the type model.
//!
//! The formatter here is "Java-like" and stable; it is the canonical text used for member
//! signatures, so changes to it change member identity.

pub mod format;
pub mod jdk;
pub mod subst;
