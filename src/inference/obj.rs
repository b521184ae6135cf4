use serde_json::{Map, Value};
use tracing::debug;

use super::Inference;
use crate::ir::{DeclaredType, Field, TypeExpr};
use crate::naming;

/// Sorted key names rendered as a JSON array, so keys containing `,` or
/// empty keys cannot collide. Objects with equal signatures share a
/// declaration regardless of their values.
pub fn shape_signature(map: &Map<String, Value>) -> String {
    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
    keys.sort_unstable();
    Value::from(keys).to_string()
}

pub(super) fn infer_object(inf: &mut Inference, map: &Map<String, Value>, hint: &str) -> TypeExpr {
    let signature = shape_signature(map);
    if let Some(existing) = inf.registry.lookup(&signature) {
        debug!(signature = %signature, name = existing, "reusing declared shape");
        return TypeExpr::Named(existing.to_string());
    }

    // reserved before descending so nested shapes can't claim it
    let name = inf.registry.reserve_name(hint);

    let mut fields = Vec::with_capacity(map.len());
    for (key, value) in map {
        let ty = inf.infer_hinted(value, &naming::child_type_name(&name, key));
        fields.push(Field { name: naming::sanitize_property_name(key), ty });
    }

    debug!(name = %name, fields = fields.len(), "declared new shape");
    inf.registry.register(signature, DeclaredType { name: name.clone(), fields });
    TypeExpr::Named(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signature_of(v: Value) -> String {
        shape_signature(v.as_object().unwrap())
    }

    #[test]
    fn signature_is_sorted_key_list() {
        assert_eq!(signature_of(json!({"b": 1, "a": 2})), r#"["a","b"]"#);
        assert_eq!(signature_of(json!({"a": {"x": 1}, "b": []})), r#"["a","b"]"#);
        assert_eq!(signature_of(json!({})), "[]");
    }

    #[test]
    fn signature_keeps_awkward_keys_apart() {
        assert_ne!(signature_of(json!({"a,b": 1})), signature_of(json!({"a": 1, "b": 2})));
        assert_ne!(signature_of(json!({"": 1})), signature_of(json!({})));
    }

    #[test]
    fn comma_and_empty_keys_get_their_own_declarations() {
        let mut inf = Inference::new();
        inf.infer(&json!({"x": {"a,b": 1}, "y": {"a": 1, "b": "s"}, "e": {}, "f": {"": 1}}), "Root");
        let names: Vec<&str> = inf.registry().declarations().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, ["RootX", "RootY", "RootE", "RootF", "Root"]);
    }
}
