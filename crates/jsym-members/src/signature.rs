use jsym_types::{describe, TypeEnv};

use crate::MethodUsage;

/// Member identity key: `name(P1, P2, ...)` built from the usage's current parameter types.
///
/// The return type, method type parameters and declaring type do not take part, so methods that
/// differ only in those collapse onto the same key.
pub fn signature_of(env: &dyn TypeEnv, usage: &MethodUsage<'_>) -> String {
    let mut sig = String::from(usage.name());
    sig.push('(');
    for (idx, param) in usage.params().iter().enumerate() {
        if idx != 0 {
            sig.push_str(", ");
        }
        sig.push_str(&describe(env, param));
    }
    sig.push(')');
    sig
}
