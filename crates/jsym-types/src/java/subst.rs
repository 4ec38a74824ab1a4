use std::collections::HashMap;

use crate::{ClassType, Result, Type, TypeEnv, TypeError, TypeVarId, WildcardBound};

/// Nesting bound for type expressions handled by substitution.
///
/// Well-formed source never gets anywhere near this; hitting it means the input was built from a
/// malformed or self-referential definition.
pub const MAX_TYPE_DEPTH: usize = 256;

/// Replace every occurrence of `param` inside `ty` with `replacement`.
///
/// Occurrences nested in class type arguments, array element types and wildcard bounds are all
/// replaced; the replacement itself is not rescanned. `ty` is returned unchanged (as a clone)
/// when `param` does not occur.
///
/// A `param` that `env` does not declare is an error even when it does not occur in `ty`; that
/// check comes before the unchanged-clone case.
pub fn substitute(
    env: &dyn TypeEnv,
    ty: &Type,
    param: TypeVarId,
    replacement: &Type,
) -> Result<Type> {
    if env.type_param(param).is_none() {
        return Err(TypeError::UnknownTypeParam(param));
    }
    if !ty.mentions(param) {
        return Ok(ty.clone());
    }

    rewrite(ty, 0, &|id| (id == param).then_some(replacement))
}

/// Simultaneous substitution of all type variables in `subst`.
///
/// Used to view a supertype through a concrete instantiation of its subtype
/// (`ArrayList<String>` sees `List<E>` as `List<String>`). Variables missing from `subst` are
/// left untouched.
pub fn substitute_all(ty: &Type, subst: &HashMap<TypeVarId, Type>) -> Result<Type> {
    if subst.is_empty() {
        return Ok(ty.clone());
    }

    rewrite(ty, 0, &|id| subst.get(&id))
}

fn rewrite<'r>(
    ty: &Type,
    depth: usize,
    lookup: &dyn Fn(TypeVarId) -> Option<&'r Type>,
) -> Result<Type> {
    if depth > MAX_TYPE_DEPTH {
        return Err(TypeError::TooDeep {
            limit: MAX_TYPE_DEPTH,
        });
    }

    Ok(match ty {
        Type::TypeVar(id) => match lookup(*id) {
            Some(replacement) => replacement.clone(),
            None => ty.clone(),
        },
        Type::Class(ClassType { def, args }) => {
            let args = args
                .iter()
                .map(|arg| rewrite(arg, depth + 1, lookup))
                .collect::<Result<Vec<_>>>()?;
            Type::class(*def, args)
        }
        Type::Array(elem) => Type::array(rewrite(elem, depth + 1, lookup)?),
        Type::Wildcard(WildcardBound::Extends(upper)) => {
            Type::wildcard_extends(rewrite(upper, depth + 1, lookup)?)
        }
        Type::Wildcard(WildcardBound::Super(lower)) => {
            Type::wildcard_super(rewrite(lower, depth + 1, lookup)?)
        }
        Type::Void
        | Type::Primitive(_)
        | Type::Named(_)
        | Type::Wildcard(WildcardBound::Unbounded) => ty.clone(),
    })
}

/// Resolve every `Type::Named` inside `ty` to a class type when `env` knows the name.
///
/// Class arguments, array elements and wildcard bounds are rewritten too, so two spellings of
/// the same type compare equal afterwards. Unknown names are kept verbatim.
pub fn canonicalize_named(env: &dyn TypeEnv, ty: &Type) -> Type {
    match ty {
        Type::Named(name) => match env.lookup_class(name) {
            Some(id) => Type::class(id, vec![]),
            None => ty.clone(),
        },
        Type::Class(ClassType { def, args }) => Type::class(
            *def,
            args.iter().map(|arg| canonicalize_named(env, arg)).collect(),
        ),
        Type::Array(elem) => Type::array(canonicalize_named(env, elem)),
        Type::Wildcard(WildcardBound::Extends(upper)) => {
            Type::wildcard_extends(canonicalize_named(env, upper))
        }
        Type::Wildcard(WildcardBound::Super(lower)) => {
            Type::wildcard_super(canonicalize_named(env, lower))
        }
        Type::Void
        | Type::Primitive(_)
        | Type::TypeVar(_)
        | Type::Wildcard(WildcardBound::Unbounded) => ty.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TypeStore;

    #[test]
    fn substitute_reaches_every_nested_position() {
        let mut store = TypeStore::with_minimal_jdk();
        let list = store.class_id("java.util.List").expect("List");
        let string = Type::class(store.well_known().string, vec![]);
        let t = store.add_type_param("T", vec![]);

        let ty = Type::class(
            list,
            vec![Type::array(Type::wildcard_super(Type::TypeVar(t)))],
        );
        let out = substitute(&store, &ty, t, &string).expect("substitution");
        assert_eq!(
            out,
            Type::class(list, vec![Type::array(Type::wildcard_super(string))])
        );
    }

    #[test]
    fn substitute_without_occurrence_is_identity() {
        let mut store = TypeStore::with_minimal_jdk();
        let t = store.add_type_param("T", vec![]);
        let u = store.add_type_param("U", vec![]);

        let ty = Type::array(Type::TypeVar(u));
        let out = substitute(&store, &ty, t, &Type::int()).expect("substitution");
        assert_eq!(out, ty);
    }

    #[test]
    fn substitute_rejects_undeclared_parameter() {
        let store = TypeStore::with_minimal_jdk();
        let bogus = TypeVarId::from_raw(42);
        let err = substitute(&store, &Type::int(), bogus, &Type::int()).unwrap_err();
        assert_eq!(err, TypeError::UnknownTypeParam(bogus));
    }

    #[test]
    fn substitute_rejects_runaway_nesting() {
        let mut store = TypeStore::with_minimal_jdk();
        let t = store.add_type_param("T", vec![]);

        let mut ty = Type::TypeVar(t);
        for _ in 0..(MAX_TYPE_DEPTH + 8) {
            ty = Type::array(ty);
        }
        let err = substitute(&store, &ty, t, &Type::int()).unwrap_err();
        assert_eq!(
            err,
            TypeError::TooDeep {
                limit: MAX_TYPE_DEPTH
            }
        );
    }

    #[test]
    fn substitute_all_is_simultaneous() {
        let mut store = TypeStore::with_minimal_jdk();
        let list = store.class_id("java.util.List").expect("List");
        let a = store.add_type_param("A", vec![]);
        let b = store.add_type_param("B", vec![]);

        // [A := B, B := A] swaps instead of collapsing both to one variable.
        let subst = HashMap::from([(a, Type::TypeVar(b)), (b, Type::TypeVar(a))]);
        let ty = Type::class(list, vec![Type::TypeVar(a), Type::TypeVar(b)]);
        let out = substitute_all(&ty, &subst).expect("substitution");
        assert_eq!(out, Type::class(list, vec![Type::TypeVar(b), Type::TypeVar(a)]));
    }

    #[test]
    fn canonicalize_named_resolves_known_names_only() {
        let store = TypeStore::with_minimal_jdk();
        let string = store.well_known().string;

        assert_eq!(
            canonicalize_named(&store, &Type::Named("java.lang.String".to_string())),
            Type::class(string, vec![])
        );
        let missing = Type::Named("com.example.Missing".to_string());
        assert_eq!(canonicalize_named(&store, &missing), missing);
    }

    #[test]
    fn canonicalize_named_rewrites_nested_positions() {
        let store = TypeStore::with_minimal_jdk();
        let list = store.class_id("java.util.List").expect("List");
        let string = Type::class(store.well_known().string, vec![]);
        let named = |name: &str| Type::Named(name.to_string());

        let ty = Type::class(
            list,
            vec![
                named("java.lang.String"),
                Type::array(Type::wildcard_extends(named("java.lang.String"))),
                Type::wildcard_super(named("com.example.Missing")),
            ],
        );
        assert_eq!(
            canonicalize_named(&store, &ty),
            Type::class(
                list,
                vec![
                    string.clone(),
                    Type::array(Type::wildcard_extends(string)),
                    Type::wildcard_super(named("com.example.Missing")),
                ],
            )
        );
    }

    #[test]
    fn mentions_sees_nested_type_variables() {
        let mut store = TypeStore::with_minimal_jdk();
        let list = store.class_id("java.util.List").expect("List");
        let t = store.add_type_param("T", vec![]);
        let u = store.add_type_param("U", vec![]);

        let ty = Type::class(list, vec![Type::array(Type::wildcard_super(Type::TypeVar(t)))]);
        assert!(ty.mentions(t));
        assert!(!ty.mentions(u));
        assert!(!Type::Named("T".to_string()).mentions(t));
    }
}
