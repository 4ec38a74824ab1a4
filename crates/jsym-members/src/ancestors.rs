use std::collections::{HashMap, HashSet, VecDeque};

use jsym_types::{
    canonicalize_named, describe, describe_class, substitute_all, ClassDef, ClassId, ClassType,
    Type, TypeEnv, TypeVarId,
};
use serde::{Deserialize, Serialize};

use crate::{ResolveError, Result};

/// An occurrence of a class as an ancestor of another, with the arguments it is instantiated
/// with as seen from the subtype.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceType {
    def: ClassId,
    args: Vec<Type>,
    type_params_map: Vec<(TypeVarId, Type)>,
    raw: bool,
}

impl ReferenceType {
    /// Pair `class_def`'s type parameters with `args`.
    ///
    /// A raw occurrence (no arguments for a generic class) gets an empty map. Surplus parameters
    /// of a malformed instantiation stay unmapped.
    pub fn instantiate(def: ClassId, class_def: &ClassDef, args: Vec<Type>) -> Self {
        let raw = args.is_empty() && !class_def.type_params.is_empty();
        let type_params_map = class_def
            .type_params
            .iter()
            .copied()
            .zip(args.iter().cloned())
            .collect();
        Self {
            def,
            args,
            type_params_map,
            raw,
        }
    }

    pub fn def(&self) -> ClassId {
        self.def
    }

    pub fn args(&self) -> &[Type] {
        &self.args
    }

    /// `(ancestor type parameter, argument)` pairs in declaration order.
    pub fn type_params_map(&self) -> &[(TypeVarId, Type)] {
        &self.type_params_map
    }

    /// A generic class used without type arguments.
    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn to_type(&self) -> Type {
        Type::class(self.def, self.args.clone())
    }

    pub fn describe(&self, env: &dyn TypeEnv) -> String {
        describe(env, &self.to_type())
    }
}

/// Enumerates the ancestors of a class.
///
/// Contract: every ancestor reachable through superclass and interface edges is returned, each
/// distinct instantiation exactly once, never the queried class itself, and enumeration
/// terminates on cyclic or unresolvable input (either with a partial list or an error). The order
/// must be stable across calls; member resolution is only reproducible under a stable order.
pub trait AncestorProvider {
    fn all_ancestors(&self, class: ClassId) -> Result<Vec<ReferenceType>>;
}

/// What to do with a supertype that names a class missing from the environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Fail enumeration with [`ResolveError::UnresolvedAncestor`].
    #[default]
    Error,
    /// Leave the ancestor (and everything above it) out and log a warning.
    Skip,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AncestorConfig {
    /// Treat `java.lang.Object` as a supertype of every interface (JLS 4.10.2).
    #[serde(default = "AncestorConfig::default_include_object")]
    pub include_object: bool,

    /// Maximum breadth-first distance from the queried class.
    #[serde(default = "AncestorConfig::default_max_depth")]
    pub max_depth: usize,

    #[serde(default)]
    pub on_unresolved: UnresolvedPolicy,
}

impl AncestorConfig {
    fn default_include_object() -> bool {
        true
    }

    fn default_max_depth() -> usize {
        64
    }
}

impl Default for AncestorConfig {
    fn default() -> Self {
        Self {
            include_object: Self::default_include_object(),
            max_depth: Self::default_max_depth(),
            on_unresolved: UnresolvedPolicy::default(),
        }
    }
}

/// [`AncestorProvider`] that walks superclass/interface edges of a [`TypeEnv`] breadth-first.
///
/// Nearest ancestors come first; at each class the superclass is queued before the interfaces
/// (in declaration order), and the implicit `java.lang.Object` of an interface comes last.
pub struct HierarchyWalker<'env> {
    env: &'env dyn TypeEnv,
    config: AncestorConfig,
}

impl<'env> HierarchyWalker<'env> {
    pub fn new(env: &'env dyn TypeEnv) -> Self {
        Self::with_config(env, AncestorConfig::default())
    }

    pub fn with_config(env: &'env dyn TypeEnv, config: AncestorConfig) -> Self {
        Self { env, config }
    }

    pub fn config(&self) -> &AncestorConfig {
        &self.config
    }

    /// Direct supertypes of one instantiation of `def`, already viewed through that
    /// instantiation. Raw instantiations yield raw supertypes.
    fn direct_supertypes(
        &self,
        def: ClassId,
        class_def: &ClassDef,
        args: &[Type],
    ) -> Result<Vec<(ClassId, Vec<Type>)>> {
        let raw = args.is_empty() && !class_def.type_params.is_empty();
        let subst: HashMap<TypeVarId, Type> = class_def
            .type_params
            .iter()
            .copied()
            .zip(args.iter().cloned())
            .collect();

        let mut out = Vec::new();
        for declared in class_def.super_class.iter().chain(class_def.interfaces.iter()) {
            let ty = if raw {
                erase(declared)
            } else {
                substitute_all(declared, &subst)?
            };

            match canonicalize_named(self.env, &ty) {
                Type::Class(ClassType { def: super_def, args }) => {
                    if self.env.class(super_def).is_some() {
                        out.push((super_def, args));
                    } else {
                        self.unresolved(describe_class(self.env, super_def), def)?;
                    }
                }
                Type::Named(name) => self.unresolved(name, def)?,
                other => {
                    tracing::debug!(
                        class = %describe_class(self.env, def),
                        supertype = %describe(self.env, &other),
                        "ignoring non-class supertype"
                    );
                }
            }
        }

        if self.config.include_object && class_def.is_interface() {
            let object = self.env.well_known().object;
            if self.env.class(object).is_some() {
                out.push((object, vec![]));
            }
        }

        Ok(out)
    }

    fn unresolved(&self, ancestor: String, of: ClassId) -> Result<()> {
        let of = describe_class(self.env, of);
        match self.config.on_unresolved {
            UnresolvedPolicy::Error => Err(ResolveError::UnresolvedAncestor { ancestor, of }),
            UnresolvedPolicy::Skip => {
                tracing::warn!(%ancestor, %of, "skipping unresolved ancestor");
                Ok(())
            }
        }
    }
}

impl AncestorProvider for HierarchyWalker<'_> {
    fn all_ancestors(&self, class: ClassId) -> Result<Vec<ReferenceType>> {
        let root = self
            .env
            .class(class)
            .ok_or_else(|| ResolveError::UnresolvedType {
                name: describe_class(self.env, class),
            })?;
        let root_args: Vec<Type> = root.type_params.iter().map(|tp| Type::TypeVar(*tp)).collect();

        let mut seen: HashSet<(ClassId, Vec<Type>)> = HashSet::new();
        seen.insert((class, root_args.clone()));

        let mut queue: VecDeque<(ClassId, Vec<Type>, usize)> = self
            .direct_supertypes(class, root, &root_args)?
            .into_iter()
            .map(|(def, args)| (def, args, 1))
            .collect();

        let mut out = Vec::new();
        while let Some((def, args, depth)) = queue.pop_front() {
            if !seen.insert((def, args.clone())) {
                continue;
            }
            if depth > self.config.max_depth {
                let class = describe_class(self.env, class);
                tracing::warn!(%class, limit = self.config.max_depth, "ancestor depth limit hit");
                return Err(ResolveError::HierarchyTooDeep {
                    class,
                    limit: self.config.max_depth,
                });
            }

            // Only defined classes are ever queued.
            let Some(class_def) = self.env.class(def) else {
                continue;
            };

            for (super_def, super_args) in self.direct_supertypes(def, class_def, &args)? {
                queue.push_back((super_def, super_args, depth + 1));
            }
            out.push(ReferenceType::instantiate(def, class_def, args));
        }

        tracing::trace!(
            class = %describe_class(self.env, class),
            ancestors = out.len(),
            "enumerated ancestors"
        );
        Ok(out)
    }
}

fn erase(ty: &Type) -> Type {
    match ty {
        Type::Class(ClassType { def, .. }) => Type::class(*def, vec![]),
        other => other.clone(),
    }
}
