use serde_json::Value;

use super::path::DataPath;

/// Every leaf scalar in `root`, in document order, with the path that
/// addresses it. Containers are descended into, never yielded; empty
/// containers contribute nothing. A scalar root yields itself at the
/// empty path.
pub fn leaf_entries(root: &Value) -> Vec<(DataPath, Value)> {
    let mut leaves = Vec::new();
    let mut stack: Vec<(DataPath, &Value)> = vec![(DataPath::default(), root)];
    while let Some((path, value)) = stack.pop() {
        match value {
            Value::Object(map) => {
                for (key, child) in map.iter().rev() {
                    let mut child_path = path.clone();
                    child_path.push(key);
                    stack.push((child_path, child));
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate().rev() {
                    let mut child_path = path.clone();
                    child_path.push(index.to_string());
                    stack.push((child_path, child));
                }
            }
            leaf => leaves.push((path, leaf.clone())),
        }
    }
    leaves
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn yields_leaves_in_document_order() {
        let data = json!({"a": 1, "b": {"c": [true, null]}, "d": "x"});
        let paths: Vec<String> = leaf_entries(&data)
            .into_iter()
            .map(|(p, _)| p.to_string())
            .collect();
        assert_eq!(paths, ["a", "b/c/0", "b/c/1", "d"]);
    }

    #[test]
    fn scalar_root_is_a_single_leaf() {
        let entries = leaf_entries(&json!(7));
        assert_eq!(entries.len(), 1);
        assert!(entries[0].0.is_current());
        assert_eq!(entries[0].1, json!(7));
    }

    #[test]
    fn empty_containers_yield_nothing() {
        assert!(leaf_entries(&json!({"a": {}, "b": []})).is_empty());
    }
}
