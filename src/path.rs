//! Value extraction along a field path.
//!
//! Walking through an array in the middle of a path forks the walk: the rest
//! of the path is applied to every element and the branch results are
//! flattened one level into a single sequence ("array branching").

use crate::value::Value;

/// Outcome of resolving a path
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub value: Value,
    /// True once the walk forked across an array
    pub array_branching: bool,
}

/// Resolve `path` inside `root`.
///
/// A missing segment yields `default_value` while the walk is still a single
/// chain. Once branching has begun a missing segment contributes nothing, so
/// an absent field in one element does not affect its siblings.
pub fn resolve_path(root: &Value, path: &[String], default_value: &Value) -> Resolved {
    if path.is_empty() {
        return Resolved {
            value: root.clone(),
            array_branching: false,
        };
    }

    let mut branching = false;
    let mut collected: Vec<Value> = Vec::new();
    // Depth-first worklist; elements are pushed in reverse to keep document order
    let mut pending: Vec<(&Value, usize)> = vec![(root, 0)];

    while let Some((current, depth)) = pending.pop() {
        if depth == path.len() {
            if !branching {
                return Resolved {
                    value: current.clone(),
                    array_branching: false,
                };
            }
            match current {
                Value::Array(items) => collected.extend(items.iter().cloned()),
                other => collected.push(other.clone()),
            }
            continue;
        }

        if let Value::Array(items) = current {
            branching = true;
            pending.extend(items.iter().rev().map(|item| (item, depth)));
            continue;
        }

        match current.get(&path[depth]) {
            Some(child) => pending.push((child, depth + 1)),
            None if branching => {}
            None => {
                return Resolved {
                    value: default_value.clone(),
                    array_branching: false,
                }
            }
        }
    }

    Resolved {
        value: Value::Array(collected),
        array_branching: branching,
    }
}

/// Split a dotted path such as `"address.city"` into segments
pub fn parse_path(dotted: &str) -> Vec<String> {
    dotted
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(dotted: &str) -> Vec<String> {
        parse_path(dotted)
    }

    #[test]
    fn test_plain_path() {
        let record = Value::from(json!({"user": {"name": "John", "age": 25}}));
        let resolved = resolve_path(&record, &path("user.name"), &Value::Undefined);
        assert_eq!(resolved.value, Value::from("John"));
        assert!(!resolved.array_branching);
    }

    #[test]
    fn test_empty_path_returns_root() {
        let record = Value::from(json!([1, 2]));
        let resolved = resolve_path(&record, &[], &Value::Undefined);
        assert_eq!(resolved.value, record);
        assert!(!resolved.array_branching);
    }

    #[test]
    fn test_missing_segment_uses_default() {
        let record = Value::from(json!({"user": {}}));
        let resolved = resolve_path(&record, &path("user.age"), &Value::Number(40.0));
        assert_eq!(resolved.value, Value::Number(40.0));

        let resolved = resolve_path(&record, &path("user.age.years"), &Value::Undefined);
        assert_eq!(resolved.value, Value::Undefined);
    }

    #[test]
    fn test_terminal_array_is_not_branching() {
        let record = Value::from(json!({"tags": ["a", "b"]}));
        let resolved = resolve_path(&record, &path("tags"), &Value::Undefined);
        assert_eq!(resolved.value, Value::from(json!(["a", "b"])));
        assert!(!resolved.array_branching);
    }

    #[test]
    fn test_branching_flattens_one_level() {
        let record = Value::from(json!({
            "users": [
                {"name": "Ann", "tags": ["x", "y"]},
                {"name": "Bob", "tags": ["z"]},
            ]
        }));

        let names = resolve_path(&record, &path("users.name"), &Value::Undefined);
        assert!(names.array_branching);
        assert_eq!(names.value, Value::from(json!(["Ann", "Bob"])));

        let tags = resolve_path(&record, &path("users.tags"), &Value::Undefined);
        assert!(tags.array_branching);
        assert_eq!(tags.value, Value::from(json!(["x", "y", "z"])));
    }

    #[test]
    fn test_nested_arrays_branch() {
        let record = Value::from(json!({"groups": [[{"id": 1}], [{"id": 2}, {"id": 3}]]}));
        let resolved = resolve_path(&record, &path("groups.id"), &Value::Undefined);
        assert!(resolved.array_branching);
        assert_eq!(resolved.value, Value::from(json!([1, 2, 3])));
    }

    // Absent fields after branching contribute nothing, even with a default value.
    #[test]
    fn test_missing_after_branching_ignores_default() {
        let record = Value::from(json!({"items": [{"price": 5}, {}]}));
        let resolved = resolve_path(&record, &path("items.price"), &Value::Number(99.0));
        assert!(resolved.array_branching);
        assert_eq!(resolved.value, Value::from(json!([5])));

        let record = Value::from(json!({"items": [{}, {}]}));
        let resolved = resolve_path(&record, &path("items.price"), &Value::Number(99.0));
        assert!(resolved.array_branching);
        assert_eq!(resolved.value, Value::Array(vec![]));
    }

    #[test]
    fn test_map_keys_are_traversed() {
        let record = Value::map(vec![(Value::from("meta"), Value::from(json!({"v": 1})))]);
        let resolved = resolve_path(&record, &path("meta.v"), &Value::Undefined);
        assert_eq!(resolved.value, Value::Number(1.0));
    }
}
