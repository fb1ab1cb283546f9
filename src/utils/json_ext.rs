//! JSON manipulation utilities for the blockpress engine.
//!
//! Provides dotted-path access, the truthiness rule shared by the template
//! interpreter's conditional constructs, and the patch merge used when
//! editing widget configs.

use serde_json::Value;

/// Merge a patch value over a base value, patch-wins.
///
/// Objects merge recursively; everything else (scalars, arrays, mismatched
/// shapes) is replaced by the patch outright. Total: a patch can always be
/// applied.
///
/// # Examples
///
/// ```rust
/// use blockpress::utils::json_ext::deep_merge;
/// use serde_json::json;
///
/// let base = json!({"a": 1, "b": {"x": 10}});
/// let patch = json!({"b": {"y": 20}, "c": 3});
///
/// assert_eq!(deep_merge(&base, &patch), json!({"a": 1, "b": {"x": 10, "y": 20}, "c": 3}));
/// ```
#[must_use]
pub fn deep_merge(base: &Value, patch: &Value) -> Value {
    match (base, patch) {
        (Value::Object(base_obj), Value::Object(patch_obj)) => {
            let mut result = base_obj.clone();
            for (key, patch_value) in patch_obj {
                let merged = match base_obj.get(key) {
                    Some(base_value) => deep_merge(base_value, patch_value),
                    None => patch_value.clone(),
                };
                result.insert(key.clone(), merged);
            }
            Value::Object(result)
        }
        _ => patch.clone(),
    }
}

/// Get a value using a dotted path.
///
/// Path segments index into objects by key and into arrays by numeric index.
/// An empty path resolves to the value itself.
///
/// # Examples
///
/// ```rust
/// use blockpress::utils::json_ext::get_by_path;
/// use serde_json::json;
///
/// let data = json!({"article": {"author": {"name": "Alice"}}});
/// assert_eq!(get_by_path(&data, "article.author.name"), Some(&json!("Alice")));
///
/// let list = json!({"reviews": [{"rating": 5}]});
/// assert_eq!(get_by_path(&list, "reviews.0.rating"), Some(&json!(5)));
/// ```
#[must_use]
pub fn get_by_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }

    let mut current = value;
    for part in path.split('.') {
        match current {
            Value::Object(obj) => {
                current = obj.get(part)?;
            }
            Value::Array(arr) => {
                let index: usize = part.parse().ok()?;
                current = arr.get(index)?;
            }
            _ => return None,
        }
    }

    Some(current)
}

/// The truthiness rule shared by `#if` and `#with` template blocks.
///
/// Truthy: `true`, non-zero numbers, non-empty strings, non-empty
/// arrays/objects. Falsy: `null`, `false`, `0`, `""`, `[]`, `{}`.
///
/// # Examples
///
/// ```rust
/// use blockpress::utils::json_ext::is_truthy;
/// use serde_json::json;
///
/// assert!(is_truthy(&json!("hero.jpg")));
/// assert!(is_truthy(&json!([1])));
/// assert!(!is_truthy(&json!("")));
/// assert!(!is_truthy(&json!(0)));
/// assert!(!is_truthy(&json!(null)));
/// assert!(!is_truthy(&json!([])));
/// ```
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(arr) => !arr.is_empty(),
        Value::Object(obj) => !obj.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_by_path_misses_are_none() {
        let data = json!({"a": {"b": 1}});
        assert_eq!(get_by_path(&data, "a.c"), None);
        assert_eq!(get_by_path(&data, "a.b.c"), None);
        assert_eq!(get_by_path(&data, "x"), None);
    }

    #[test]
    fn get_by_path_array_index_out_of_range() {
        let data = json!({"items": [1, 2]});
        assert_eq!(get_by_path(&data, "items.1"), Some(&json!(2)));
        assert_eq!(get_by_path(&data, "items.5"), None);
        assert_eq!(get_by_path(&data, "items.not_a_number"), None);
    }

    #[test]
    fn patch_overwrites_scalars_and_arrays() {
        assert_eq!(deep_merge(&json!({"a": 1}), &json!({"a": 2})), json!({"a": 2}));
        assert_eq!(
            deep_merge(&json!({"tags": ["x", "y"]}), &json!({"tags": ["z"]})),
            json!({"tags": ["z"]})
        );
    }

    #[test]
    fn patch_merges_nested_objects_and_keeps_unpatched_keys() {
        let base = json!({"meta": {"author": "x", "year": 2024}, "title": "old"});
        let patch = json!({"meta": {"year": 2025}});
        assert_eq!(
            deep_merge(&base, &patch),
            json!({"meta": {"author": "x", "year": 2025}, "title": "old"})
        );
    }

    #[test]
    fn patch_replaces_on_shape_mismatch() {
        assert_eq!(
            deep_merge(&json!({"k": {"nested": 1}}), &json!({"k": "flat"})),
            json!({"k": "flat"})
        );
        assert_eq!(deep_merge(&json!("scalar"), &json!({"k": 1})), json!({"k": 1}));
    }

    #[test]
    fn truthiness_matches_template_rules() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!({"k": 1})));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!({})));
        assert!(!is_truthy(&json!(0.0)));
    }
}
