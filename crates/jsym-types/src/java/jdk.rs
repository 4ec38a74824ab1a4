//! A tiny slice of the JDK, enough to exercise inheritance, generics and functional
//! interfaces without a real classpath.

use crate::{ClassDef, ClassKind, MethodDef, Type, TypeStore};

pub(crate) fn populate(store: &mut TypeStore) {
    let wk = *crate::TypeEnv::well_known(store);
    let object = Type::class(wk.object, vec![]);
    let string = Type::class(wk.string, vec![]);
    let integer = Type::class(wk.integer, vec![]);

    let comparable = store.intern_class_id("java.lang.Comparable");
    let collection = store.intern_class_id("java.util.Collection");
    let list = store.intern_class_id("java.util.List");

    store.define_class(
        wk.object,
        ClassDef {
            name: "java.lang.Object".to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: None,
            interfaces: vec![],
            methods: vec![
                MethodDef::concrete_method("equals", vec![object.clone()], Type::boolean()),
                MethodDef::concrete_method("hashCode", vec![], Type::int()),
                MethodDef::concrete_method("toString", vec![], string.clone()),
            ],
        },
    );

    store.define_class(
        wk.string,
        ClassDef {
            name: "java.lang.String".to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: Some(object.clone()),
            interfaces: vec![Type::class(comparable, vec![string.clone()])],
            methods: vec![
                MethodDef::concrete_method("length", vec![], Type::int()),
                MethodDef::concrete_method("compareTo", vec![string.clone()], Type::int()),
            ],
        },
    );

    store.define_class(
        wk.integer,
        ClassDef {
            name: "java.lang.Integer".to_string(),
            kind: ClassKind::Class,
            type_params: vec![],
            super_class: Some(object.clone()),
            interfaces: vec![Type::class(comparable, vec![integer.clone()])],
            methods: vec![
                MethodDef::concrete_method("intValue", vec![], Type::int()),
                MethodDef::concrete_method("compareTo", vec![integer], Type::int()),
            ],
        },
    );

    store.define_class(
        wk.cloneable,
        ClassDef {
            name: "java.lang.Cloneable".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![],
            super_class: None,
            interfaces: vec![],
            methods: vec![],
        },
    );

    store.add_class(ClassDef {
        name: "java.lang.Runnable".to_string(),
        kind: ClassKind::Interface,
        type_params: vec![],
        super_class: None,
        interfaces: vec![],
        methods: vec![MethodDef::abstract_method("run", vec![], Type::Void)],
    });

    let comparable_t = store.add_type_param("T", vec![object.clone()]);
    store.define_class(
        comparable,
        ClassDef {
            name: "java.lang.Comparable".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![comparable_t],
            super_class: None,
            interfaces: vec![],
            methods: vec![MethodDef::abstract_method(
                "compareTo",
                vec![Type::TypeVar(comparable_t)],
                Type::int(),
            )],
        },
    );

    let function_t = store.add_type_param("T", vec![object.clone()]);
    let function_r = store.add_type_param("R", vec![object.clone()]);
    store.add_class(ClassDef {
        name: "java.util.function.Function".to_string(),
        kind: ClassKind::Interface,
        type_params: vec![function_t, function_r],
        super_class: None,
        interfaces: vec![],
        methods: vec![MethodDef::abstract_method(
            "apply",
            vec![Type::TypeVar(function_t)],
            Type::TypeVar(function_r),
        )],
    });

    let supplier_t = store.add_type_param("T", vec![object.clone()]);
    store.add_class(ClassDef {
        name: "java.util.function.Supplier".to_string(),
        kind: ClassKind::Interface,
        type_params: vec![supplier_t],
        super_class: None,
        interfaces: vec![],
        methods: vec![MethodDef::abstract_method(
            "get",
            vec![],
            Type::TypeVar(supplier_t),
        )],
    });

    let collection_e = store.add_type_param("E", vec![object.clone()]);
    store.define_class(
        collection,
        ClassDef {
            name: "java.util.Collection".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![collection_e],
            super_class: None,
            interfaces: vec![],
            methods: vec![
                MethodDef::abstract_method("size", vec![], Type::int()),
                MethodDef::abstract_method("isEmpty", vec![], Type::boolean()),
                MethodDef::abstract_method(
                    "add",
                    vec![Type::TypeVar(collection_e)],
                    Type::boolean(),
                ),
            ],
        },
    );

    let list_e = store.add_type_param("E", vec![object.clone()]);
    store.define_class(
        list,
        ClassDef {
            name: "java.util.List".to_string(),
            kind: ClassKind::Interface,
            type_params: vec![list_e],
            super_class: None,
            interfaces: vec![Type::class(collection, vec![Type::TypeVar(list_e)])],
            methods: vec![
                MethodDef::abstract_method("get", vec![Type::int()], Type::TypeVar(list_e)),
                MethodDef::abstract_method("add", vec![Type::TypeVar(list_e)], Type::boolean()),
            ],
        },
    );

    let array_list_e = store.add_type_param("E", vec![object.clone()]);
    store.add_class(ClassDef {
        name: "java.util.ArrayList".to_string(),
        kind: ClassKind::Class,
        type_params: vec![array_list_e],
        super_class: Some(object),
        interfaces: vec![Type::class(list, vec![Type::TypeVar(array_list_e)])],
        methods: vec![
            MethodDef::concrete_method("size", vec![], Type::int()),
            MethodDef::concrete_method("get", vec![Type::int()], Type::TypeVar(array_list_e)),
            MethodDef::concrete_method(
                "add",
                vec![Type::TypeVar(array_list_e)],
                Type::boolean(),
            ),
        ],
    });
}
