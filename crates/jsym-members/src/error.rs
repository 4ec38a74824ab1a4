use jsym_types::TypeError;

pub type Result<T> = std::result::Result<T, ResolveError>;

/// Failures surfaced by member resolution.
///
/// None of these are recovered from locally: a method set computed over a partially resolved
/// hierarchy could make overload resolution or functional-interface checks pick the wrong
/// member, so callers get the error instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("cannot resolve type {name}")]
    UnresolvedType { name: String },

    #[error("cannot resolve ancestor {ancestor} of {of}")]
    UnresolvedAncestor { ancestor: String, of: String },

    #[error("type hierarchy of {class} is deeper than {limit} levels")]
    HierarchyTooDeep { class: String, limit: usize },

    #[error("type substitution failed: {0}")]
    Substitution(#[from] TypeError),
}
