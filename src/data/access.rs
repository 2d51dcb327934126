use serde_json::Value;

use crate::error::CommandError;

use super::path::DataPath;

/// Value kind name as shown in messages.
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "mapping",
        Value::Array(_) => "sequence",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    }
}

/// Short description of a value for error messages, with enough context to
/// see what the offending segment was tried against.
pub fn describe(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            if map.is_empty() {
                "empty mapping".to_string()
            } else {
                let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
                let more = if keys.len() > 5 {
                    keys.truncate(5);
                    ", ..."
                } else {
                    ""
                };
                format!("mapping with keys [{}{}]", keys.join(", "), more)
            }
        }
        Value::Array(items) => format!("sequence of length {}", items.len()),
        Value::String(s) => {
            if s.chars().count() > 30 {
                let head: String = s.chars().take(30).collect();
                format!("string {:?}...", head)
            } else {
                format!("string {:?}", s)
            }
        }
        Value::Number(n) => format!("number {}", n),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Null => "null".to_string(),
    }
}

/// Resolves a sequence index segment: a non-negative integer in [0, len).
fn seq_index(segment: &str, len: usize) -> Option<usize> {
    let index: usize = segment.parse().ok()?;
    (index < len).then_some(index)
}

fn step<'a>(value: &'a Value, segment: &str) -> Result<&'a Value, CommandError> {
    let found = match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => seq_index(segment, items.len()).map(|i| &items[i]),
        _ => None,
    };
    found.ok_or_else(|| CommandError::invalid_index(segment, describe(value)))
}

fn step_mut<'a>(value: &'a mut Value, segment: &str) -> Result<&'a mut Value, CommandError> {
    // Described before the mutable reborrow so the error can show the container.
    let container = describe(value);
    let found = match value {
        Value::Object(map) => map.get_mut(segment),
        Value::Array(items) => {
            let len = items.len();
            seq_index(segment, len).map(move |i| &mut items[i])
        }
        _ => None,
    };
    found.ok_or_else(|| CommandError::invalid_index(segment, container))
}

/// Walks `path` down from `root`. The empty path addresses `root` itself.
pub fn get_by_path<'a>(root: &'a Value, path: &DataPath) -> Result<&'a Value, CommandError> {
    let mut current = root;
    for segment in path.segments() {
        current = step(current, segment)?;
    }
    Ok(current)
}

pub fn get_by_path_mut<'a>(
    root: &'a mut Value,
    path: &DataPath,
) -> Result<&'a mut Value, CommandError> {
    let mut current = root;
    for segment in path.segments() {
        current = step_mut(current, segment)?;
    }
    Ok(current)
}

/// Writes `value` at `path`. The empty path replaces the whole tree. The
/// parent of the final segment must already exist; a fresh mapping key may
/// be created at the last level, but a sequence index must be in range
/// (growing a sequence is what append is for).
pub fn set_by_path(root: &mut Value, path: &DataPath, value: Value) -> Result<(), CommandError> {
    let Some(last) = path.last() else {
        *root = value;
        return Ok(());
    };
    let last = last.to_string();
    let parent = get_by_path_mut(root, &path.parent())?;
    match parent {
        Value::Object(map) => {
            map.insert(last, value);
            Ok(())
        }
        Value::Array(items) => match seq_index(&last, items.len()) {
            Some(i) => {
                items[i] = value;
                Ok(())
            }
            None => Err(CommandError::invalid_index(&last, describe(parent))),
        },
        other => Err(CommandError::invalid_index(&last, describe(other))),
    }
}

/// Removes a key or index from a container, preserving the order of what
/// remains. Returns the removed value.
pub fn remove_key(container: &mut Value, segment: &str) -> Result<Value, CommandError> {
    let description = describe(container);
    let removed = match container {
        Value::Object(map) => map.shift_remove(segment),
        Value::Array(items) => seq_index(segment, items.len()).map(|i| items.remove(i)),
        _ => None,
    };
    removed.ok_or_else(|| CommandError::invalid_index(segment, description))
}

/// Numeric values compare by value across the integer/float divide, so
/// deleting `0` also removes `0.0`.
pub fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(fx), Some(fy)) => fx == fy,
            _ => x == y,
        },
        _ => a == b,
    }
}

/// Removes every entry equal to `needle` from `target`. Containers drop
/// matching members; a scalar target equal to `needle` becomes null. With
/// `recursive`, matches at every level below `target` go too. Returns how
/// many values were removed or nulled.
pub fn delete_value(target: &mut Value, needle: &Value, recursive: bool) -> usize {
    let mut removed = 0;
    match target {
        Value::Object(map) => {
            let before = map.len();
            map.retain(|_, v| !loosely_equal(v, needle));
            removed += before - map.len();
            if recursive {
                for child in map.values_mut() {
                    removed += delete_value(child, needle, true);
                }
            }
        }
        Value::Array(items) => {
            let before = items.len();
            items.retain(|v| !loosely_equal(v, needle));
            removed += before - items.len();
            if recursive {
                for child in items.iter_mut() {
                    removed += delete_value(child, needle, true);
                }
            }
        }
        scalar => {
            if loosely_equal(scalar, needle) {
                *scalar = Value::Null;
                removed += 1;
            }
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_walks_mappings_and_sequences() {
        let data = json!({"a": {"b": [10, 20, 30]}});
        let path = DataPath::from_segments(["a", "b", "1"]);
        assert_eq!(get_by_path(&data, &path).unwrap(), &json!(20));
        // Indices count from zero only; negatives are rejected.
        let neg = DataPath::from_segments(["a", "b", "-1"]);
        assert!(matches!(
            get_by_path(&data, &neg),
            Err(CommandError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn empty_path_addresses_the_root() {
        let data = json!([1, 2]);
        assert_eq!(get_by_path(&data, &DataPath::default()).unwrap(), &data);
    }

    #[test]
    fn bad_segment_reports_the_container() {
        let data = json!({"a": 1});
        let err = get_by_path(&data, &DataPath::from_segments(["zzz"])).unwrap_err();
        match err {
            CommandError::InvalidIndex { segment, container } => {
                assert_eq!(segment, "zzz");
                assert!(container.contains("mapping"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn set_creates_new_mapping_keys_but_not_sequence_slots() {
        let mut data = json!({"xs": [1, 2]});
        set_by_path(&mut data, &DataPath::from_segments(["fresh"]), json!(true)).unwrap();
        assert_eq!(data["fresh"], json!(true));
        let err = set_by_path(&mut data, &DataPath::from_segments(["xs", "2"]), json!(3));
        assert!(matches!(err, Err(CommandError::InvalidIndex { .. })));
    }

    #[test]
    fn set_with_empty_path_replaces_the_tree() {
        let mut data = json!({"a": 1});
        set_by_path(&mut data, &DataPath::default(), json!([1])).unwrap();
        assert_eq!(data, json!([1]));
    }

    #[test]
    fn remove_key_keeps_mapping_order() {
        let mut data = json!({"a": 1, "b": 2, "c": 3});
        remove_key(&mut data, "b").unwrap();
        let keys: Vec<&String> = data.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["a", "c"]);
    }

    #[test]
    fn delete_value_recursion_reaches_nested_levels() {
        let mut shallow = json!({"a": 0, "b": {"c": 0, "d": 1}});
        assert_eq!(delete_value(&mut shallow, &json!(0), false), 1);
        assert_eq!(shallow, json!({"b": {"c": 0, "d": 1}}));

        let mut deep = json!({"a": 0, "b": {"c": 0, "d": 1}});
        assert_eq!(delete_value(&mut deep, &json!(0), true), 2);
        assert_eq!(deep, json!({"b": {"d": 1}}));
    }

    #[test]
    fn delete_value_nulls_a_matching_scalar_target() {
        let mut data = json!(42);
        assert_eq!(delete_value(&mut data, &json!(42), false), 1);
        assert_eq!(data, Value::Null);
    }

    #[test]
    fn delete_value_compares_numbers_loosely() {
        let mut data = json!([0, 0.0, 1]);
        delete_value(&mut data, &json!(0), false);
        assert_eq!(data, json!([1]));
    }
}
