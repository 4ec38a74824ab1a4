use std::fmt::Write as _;

use crate::{ClassId, ClassType, Type, TypeEnv, WildcardBound};

/// Canonical textual form of `ty`.
///
/// Class types are rendered by binary name followed by their arguments
/// (`java.util.Map<java.lang.String, T>`), type variables by their declared name, arrays with a
/// `[]` suffix and wildcards as `?`, `? extends X` or `? super X`. The output only depends on the
/// structure of `ty` and the names recorded in `env`, so structurally equal types always describe
/// identically.
pub fn describe(env: &dyn TypeEnv, ty: &Type) -> String {
    let mut out = String::new();
    write_type(env, ty, &mut out);
    out
}

/// Binary name of `id`, or a stable placeholder when the id is unknown to `env`.
pub fn describe_class(env: &dyn TypeEnv, id: ClassId) -> String {
    match env.class_name(id) {
        Some(name) => name.to_string(),
        None => format!("<class#{}>", id.to_raw()),
    }
}

fn write_type(env: &dyn TypeEnv, ty: &Type, out: &mut String) {
    match ty {
        Type::Void => out.push_str("void"),
        Type::Primitive(prim) => out.push_str(prim.keyword()),
        Type::Class(ClassType { def, args }) => {
            out.push_str(&describe_class(env, *def));
            if !args.is_empty() {
                out.push('<');
                for (idx, arg) in args.iter().enumerate() {
                    if idx != 0 {
                        out.push_str(", ");
                    }
                    write_type(env, arg, out);
                }
                out.push('>');
            }
        }
        Type::Named(name) => out.push_str(name),
        Type::TypeVar(id) => match env.type_param(*id) {
            Some(tp) => out.push_str(&tp.name),
            None => {
                let _ = write!(out, "<tv#{}>", id.to_raw());
            }
        },
        Type::Wildcard(WildcardBound::Unbounded) => out.push('?'),
        Type::Wildcard(WildcardBound::Extends(upper)) => {
            out.push_str("? extends ");
            write_type(env, upper, out);
        }
        Type::Wildcard(WildcardBound::Super(lower)) => {
            out.push_str("? super ");
            write_type(env, lower, out);
        }
        Type::Array(elem) => {
            write_type(env, elem, out);
            out.push_str("[]");
        }
    }
}
