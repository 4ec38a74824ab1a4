use std::collections::HashSet;

use indexmap::IndexMap;
use jsym_types::{describe_class, ClassId, TypeEnv};

use crate::{signature_of, AncestorProvider, MethodUsage, ResolveError, Result};

/// Decides which single method, if any, makes a type a functional interface.
pub trait FunctionalClassifier<'env> {
    fn functional_method(&self, class: ClassId) -> Result<Option<MethodUsage<'env>>>;
}

/// Single-abstract-method classifier following JLS 9.8.
///
/// An interface is functional when, after substituting each super-interface's type arguments,
/// exactly one abstract instance method signature remains that is neither overridden by a
/// default method closer to the interface nor a public `java.lang.Object` method.
pub struct SamClassifier<'env> {
    env: &'env dyn TypeEnv,
    ancestors: &'env dyn AncestorProvider,
}

impl<'env> SamClassifier<'env> {
    pub fn new(env: &'env dyn TypeEnv, ancestors: &'env dyn AncestorProvider) -> Self {
        Self { env, ancestors }
    }

    fn object_method_signatures(&self) -> HashSet<String> {
        let object = self.env.well_known().object;
        let Some(object_def) = self.env.class(object) else {
            return HashSet::new();
        };
        object_def
            .methods
            .iter()
            .filter(|m| !m.is_static)
            .map(|m| signature_of(self.env, &MethodUsage::new(object, m)))
            .collect()
    }
}

impl<'env> FunctionalClassifier<'env> for SamClassifier<'env> {
    fn functional_method(&self, class: ClassId) -> Result<Option<MethodUsage<'env>>> {
        let env = self.env;
        let class_def = env.class(class).ok_or_else(|| ResolveError::UnresolvedType {
            name: describe_class(env, class),
        })?;
        if !class_def.is_interface() {
            return Ok(None);
        }

        // First declaration of a signature decides it: abstract keeps it as a candidate, a
        // default method closer to `class` removes it.
        let mut decided: IndexMap<String, Option<MethodUsage<'env>>> = IndexMap::new();
        for m in class_def.methods.iter().filter(|m| !m.is_static) {
            let usage = MethodUsage::new(class, m);
            let sig = signature_of(env, &usage);
            decided
                .entry(sig)
                .or_insert_with(|| m.is_abstract.then_some(usage));
        }

        for ancestor in self.ancestors.all_ancestors(class)? {
            let ancestor_def =
                env.class(ancestor.def())
                    .ok_or_else(|| ResolveError::UnresolvedAncestor {
                        ancestor: ancestor.describe(env),
                        of: describe_class(env, class),
                    })?;
            if !ancestor_def.is_interface() {
                continue;
            }

            for m in ancestor_def.methods.iter().filter(|m| !m.is_static) {
                let original = MethodUsage::new(ancestor.def(), m);
                let substituted =
                    original.replace_type_parameters(env, ancestor.type_params_map())?;
                let sig = signature_of(env, &substituted);
                decided
                    .entry(sig)
                    .or_insert_with(|| m.is_abstract.then_some(original));
            }
        }

        let object_sigs = self.object_method_signatures();
        let mut candidates = decided
            .into_iter()
            .filter(|(sig, _)| !object_sigs.contains(sig))
            .filter_map(|(_, usage)| usage);

        let first = candidates.next();
        if candidates.next().is_some() {
            return Ok(None);
        }
        Ok(first)
    }
}
