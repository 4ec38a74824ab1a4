use std::collections::HashMap;

use crate::{ClassDef, ClassId, TypeEnv, TypeParamDef, TypeVarId, WellKnownTypes};

/// In-memory [`TypeEnv`] built up during classpath/source ingestion.
///
/// Class ids can be interned before the class is defined (`intern_class_id`), which lets
/// mutually-referencing declarations be loaded in any order. Such placeholders answer
/// `class_name` but not `class` until `define_class` is called.
#[derive(Debug, Clone)]
pub struct TypeStore {
    classes: Vec<Option<ClassDef>>,
    class_names: Vec<String>,
    class_by_name: HashMap<String, ClassId>,
    type_params: Vec<TypeParamDef>,
    well_known: WellKnownTypes,
}

impl Default for TypeStore {
    fn default() -> Self {
        let mut store = Self {
            classes: Vec::new(),
            class_names: Vec::new(),
            class_by_name: HashMap::new(),
            type_params: Vec::new(),
            well_known: WellKnownTypes {
                object: ClassId::from_raw(0),
                string: ClassId::from_raw(0),
                integer: ClassId::from_raw(0),
                cloneable: ClassId::from_raw(0),
            },
        };
        store.well_known = WellKnownTypes {
            object: store.intern_class_id("java.lang.Object"),
            string: store.intern_class_id("java.lang.String"),
            integer: store.intern_class_id("java.lang.Integer"),
            cloneable: store.intern_class_id("java.lang.Cloneable"),
        };
        store
    }
}

impl TypeStore {
    /// A store pre-populated with the handful of JDK declarations the resolver and its tests
    /// rely on (see [`crate::java::jdk`]).
    pub fn with_minimal_jdk() -> Self {
        let mut store = Self::default();
        crate::java::jdk::populate(&mut store);
        store
    }

    /// Return the id for `name`, allocating an undefined placeholder if needed.
    pub fn intern_class_id(&mut self, name: &str) -> ClassId {
        if let Some(id) = self.class_by_name.get(name) {
            return *id;
        }

        let raw: u32 = self
            .classes
            .len()
            .try_into()
            .expect("class id space exhausted");
        let id = ClassId::from_raw(raw);
        self.classes.push(None);
        self.class_names.push(name.to_string());
        self.class_by_name.insert(name.to_string(), id);
        id
    }

    /// Install `def` under `id`, replacing any previous definition or placeholder.
    ///
    /// The name index follows `def.name`, so a definition may rename an interned id.
    pub fn define_class(&mut self, id: ClassId, def: ClassDef) {
        let idx = id.to_raw() as usize;
        if idx >= self.classes.len() {
            return;
        }

        let old_name = std::mem::replace(&mut self.class_names[idx], def.name.clone());
        if old_name != def.name && self.class_by_name.get(&old_name) == Some(&id) {
            self.class_by_name.remove(&old_name);
        }
        self.class_by_name.insert(def.name.clone(), id);
        self.classes[idx] = Some(def);
    }

    pub fn add_class(&mut self, def: ClassDef) -> ClassId {
        let id = self.intern_class_id(&def.name);
        self.define_class(id, def);
        id
    }

    /// Alias of [`TypeStore::add_class`] that makes the "replace if present" intent explicit.
    pub fn upsert_class(&mut self, def: ClassDef) -> ClassId {
        self.add_class(def)
    }

    pub fn class_mut(&mut self, id: ClassId) -> Option<&mut ClassDef> {
        self.classes.get_mut(id.to_raw() as usize)?.as_mut()
    }

    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.class_by_name.get(name).copied()
    }

    pub fn add_type_param(
        &mut self,
        name: impl Into<String>,
        upper_bounds: Vec<crate::Type>,
    ) -> TypeVarId {
        let raw: u32 = self
            .type_params
            .len()
            .try_into()
            .expect("type parameter id space exhausted");
        self.type_params.push(TypeParamDef {
            name: name.into(),
            upper_bounds,
        });
        TypeVarId::from_raw(raw)
    }

    /// Replace the definition of an already allocated type parameter.
    ///
    /// Loaders allocate parameters first and fill in bounds afterwards so self-referential
    /// bounds (`T extends Comparable<T>`) can mention their own id.
    pub fn define_type_param(&mut self, id: TypeVarId, def: TypeParamDef) {
        if let Some(slot) = self.type_params.get_mut(id.to_raw() as usize) {
            *slot = def;
        }
    }
}

impl TypeEnv for TypeStore {
    fn class(&self, id: ClassId) -> Option<&ClassDef> {
        self.classes.get(id.to_raw() as usize)?.as_ref()
    }

    fn class_name(&self, id: ClassId) -> Option<&str> {
        self.class_names.get(id.to_raw() as usize).map(String::as_str)
    }

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef> {
        self.type_params.get(id.to_raw() as usize)
    }

    fn lookup_class(&self, name: &str) -> Option<ClassId> {
        let id = self.class_by_name.get(name)?;
        self.class(*id).map(|_| *id)
    }

    fn well_known(&self) -> &WellKnownTypes {
        &self.well_known
    }
}
