use crate::TypeVarId;

pub type Result<T> = std::result::Result<T, TypeError>;

/// Failures of the structural type operations (substitution).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("type parameter {0:?} is not declared in this environment")]
    UnknownTypeParam(TypeVarId),

    #[error("type expression is nested deeper than {limit} levels")]
    TooDeep { limit: usize },
}
