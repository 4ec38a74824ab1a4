use indexmap::map::Entry;
use indexmap::IndexMap;
use jsym_types::{describe_class, ClassId, TypeEnv};

use crate::{
    signature_of, AncestorProvider, FunctionalClassifier, MethodUsage, ResolveError, Result,
};

/// Methods visible on a type, keyed by signature. No two entries share a signature.
///
/// Iteration follows insertion order (declared methods, then ancestors in provider order); use
/// [`VisibleMethods::sorted`] when a canonical order is needed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibleMethods<'env> {
    by_signature: IndexMap<String, MethodUsage<'env>>,
}

impl<'env> VisibleMethods<'env> {
    /// Record `usage` under `signature` unless the signature is already taken.
    ///
    /// Returns whether `usage` was recorded.
    fn record(&mut self, signature: String, usage: MethodUsage<'env>) -> bool {
        match self.by_signature.entry(signature) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(usage);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.by_signature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_signature.is_empty()
    }

    pub fn contains(&self, signature: &str) -> bool {
        self.by_signature.contains_key(signature)
    }

    pub fn get(&self, signature: &str) -> Option<&MethodUsage<'env>> {
        self.by_signature.get(signature)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MethodUsage<'env>)> + '_ {
        self.by_signature
            .iter()
            .map(|(sig, usage)| (sig.as_str(), usage))
    }

    pub fn signatures(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_signature.keys().map(String::as_str)
    }

    /// All visible overloads called `name`.
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodUsage<'env>> + 'a {
        self.by_signature
            .values()
            .filter(move |usage| usage.name() == name)
    }

    /// Entries ordered by signature.
    pub fn sorted(&self) -> Vec<(&str, &MethodUsage<'env>)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl<'env> IntoIterator for VisibleMethods<'env> {
    type Item = (String, MethodUsage<'env>);
    type IntoIter = indexmap::map::IntoIter<String, MethodUsage<'env>>;

    fn into_iter(self) -> Self::IntoIter {
        self.by_signature.into_iter()
    }
}

/// Computes the methods visible on a type and answers functional-interface queries.
///
/// Holds only shared references; nothing is cached between calls.
pub struct MemberResolver<'env> {
    env: &'env dyn TypeEnv,
    ancestors: &'env dyn AncestorProvider,
    classifier: &'env dyn FunctionalClassifier<'env>,
}

impl<'env> MemberResolver<'env> {
    pub fn new(
        env: &'env dyn TypeEnv,
        ancestors: &'env dyn AncestorProvider,
        classifier: &'env dyn FunctionalClassifier<'env>,
    ) -> Self {
        Self {
            env,
            ancestors,
            classifier,
        }
    }

    /// Declared methods of `class` plus every inherited method not shadowed by a closer one.
    ///
    /// Inherited methods are compared by the signature they have once the ancestor's type
    /// arguments (as seen from `class`) are substituted, but they are returned in their
    /// declared, unsubstituted form. Any failure while enumerating ancestors or substituting
    /// aborts the whole computation.
    pub fn all_methods(&self, class: ClassId) -> Result<VisibleMethods<'env>> {
        let env = self.env;
        let class_def = env.class(class).ok_or_else(|| ResolveError::UnresolvedType {
            name: describe_class(env, class),
        })?;

        let mut methods = VisibleMethods::default();
        for m in &class_def.methods {
            let usage = MethodUsage::new(class, m);
            let sig = signature_of(env, &usage);
            if !methods.record(sig, usage) {
                tracing::debug!(
                    class = %class_def.name,
                    method = %m.name,
                    "duplicate declared signature; keeping the first declaration"
                );
            }
        }

        for ancestor in self.ancestors.all_ancestors(class)? {
            let ancestor_def =
                env.class(ancestor.def())
                    .ok_or_else(|| ResolveError::UnresolvedAncestor {
                        ancestor: ancestor.describe(env),
                        of: class_def.name.clone(),
                    })?;

            for m in &ancestor_def.methods {
                let original = MethodUsage::new(ancestor.def(), m);
                let substituted =
                    original.replace_type_parameters(env, ancestor.type_params_map())?;
                let sig = signature_of(env, &substituted);
                if methods.contains(&sig) {
                    tracing::trace!(
                        class = %class_def.name,
                        ancestor = %ancestor_def.name,
                        signature = %sig,
                        "inherited method shadowed"
                    );
                    continue;
                }
                methods.record(sig, original);
            }
        }

        tracing::debug!(
            class = %class_def.name,
            methods = methods.len(),
            "computed visible methods"
        );
        Ok(methods)
    }

    /// Whether the injected classifier finds a functional method on `class`.
    pub fn is_functional_interface(&self, class: ClassId) -> Result<bool> {
        Ok(self.classifier.functional_method(class)?.is_some())
    }
}
