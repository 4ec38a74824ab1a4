use std::fmt::Write as _;

use jsym_types::{describe, ClassId, MethodDef, Type, TypeEnv, TypeVarId};

/// A method declaration viewed with a concrete list of parameter types and a return type.
///
/// A fresh usage carries the declaration's own (possibly generic) types; the `replace_*`
/// operations return new usages and never touch `self` or the declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodUsage<'env> {
    declaring: ClassId,
    decl: &'env MethodDef,
    params: Vec<Type>,
    return_type: Type,
}

impl<'env> MethodUsage<'env> {
    pub fn new(declaring: ClassId, decl: &'env MethodDef) -> Self {
        Self {
            declaring,
            decl,
            params: decl.params.clone(),
            return_type: decl.return_type.clone(),
        }
    }

    pub fn name(&self) -> &'env str {
        &self.decl.name
    }

    pub fn declaring_type(&self) -> ClassId {
        self.declaring
    }

    pub fn declaration(&self) -> &'env MethodDef {
        self.decl
    }

    pub fn params(&self) -> &[Type] {
        &self.params
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    pub fn param_type(&self, idx: usize) -> Option<&Type> {
        self.params.get(idx)
    }

    pub fn return_type(&self) -> &Type {
        &self.return_type
    }

    /// Whether this usage still has exactly the declaration's types.
    pub fn is_declared_form(&self) -> bool {
        self.params == self.decl.params && self.return_type == self.decl.return_type
    }

    /// Returns `None` when `idx` is out of range.
    pub fn replace_param_type(&self, idx: usize, ty: Type) -> Option<Self> {
        if idx >= self.params.len() {
            return None;
        }
        let mut out = self.clone();
        out.params[idx] = ty;
        Some(out)
    }

    pub fn replace_return_type(&self, ty: Type) -> Self {
        Self {
            return_type: ty,
            ..self.clone()
        }
    }

    /// Substitute `param` with `replacement` in every parameter type and the return type.
    pub fn replace_type_parameter(
        &self,
        env: &dyn TypeEnv,
        param: TypeVarId,
        replacement: &Type,
    ) -> jsym_types::Result<Self> {
        let params = self
            .params
            .iter()
            .map(|ty| jsym_types::substitute(env, ty, param, replacement))
            .collect::<jsym_types::Result<Vec<_>>>()?;
        let return_type = jsym_types::substitute(env, &self.return_type, param, replacement)?;

        Ok(Self {
            declaring: self.declaring,
            decl: self.decl,
            params,
            return_type,
        })
    }

    /// Apply `pairs` one after another, in order, starting from `self`.
    pub fn replace_type_parameters(
        &self,
        env: &dyn TypeEnv,
        pairs: &[(TypeVarId, Type)],
    ) -> jsym_types::Result<Self> {
        pairs
            .iter()
            .try_fold(self.clone(), |usage, (param, replacement)| {
                usage.replace_type_parameter(env, *param, replacement)
            })
    }

    /// Java-like rendering, `name(P1, P2): R`.
    pub fn describe(&self, env: &dyn TypeEnv) -> String {
        let mut out = crate::signature_of(env, self);
        let _ = write!(out, ": {}", describe(env, &self.return_type));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsym_types::{TypeEnv, TypeStore};

    #[test]
    fn replace_type_parameter_rewrites_params_and_return_type() {
        let store = TypeStore::with_minimal_jdk();
        let function = store
            .class_id("java.util.function.Function")
            .expect("Function");
        let def = store.class(function).expect("Function should be defined");
        let (t, r) = (def.type_params[0], def.type_params[1]);
        let string = Type::class(store.well_known().string, vec![]);

        let original = MethodUsage::new(function, &def.methods[0]);
        let replaced = original
            .replace_type_parameter(&store, t, &string)
            .expect("substitution")
            .replace_type_parameter(&store, r, &Type::int())
            .expect("substitution");

        assert_eq!(replaced.params(), &[string]);
        assert_eq!(replaced.return_type(), &Type::int());
        assert!(!replaced.is_declared_form());

        // The input is untouched.
        assert!(original.is_declared_form());
        assert_eq!(original.params(), &[Type::TypeVar(t)]);
        assert_eq!(original.describe(&store), "apply(T): R");
    }

    #[test]
    fn replace_param_type_checks_bounds() {
        let store = TypeStore::with_minimal_jdk();
        let object = store.well_known().object;
        let equals = &store.class(object).expect("Object").methods[0];

        let usage = MethodUsage::new(object, equals);
        assert!(usage.replace_param_type(1, Type::int()).is_none());

        let replaced = usage
            .replace_param_type(0, Type::int())
            .expect("index 0 exists");
        assert_eq!(replaced.param_type(0), Some(&Type::int()));
        assert_eq!(replaced.declaration(), equals);
        assert_eq!(replaced.name(), "equals");
    }
}
