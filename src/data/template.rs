use serde_json::Value;

/// Copies the shape of a tree with every leaf replaced by a typed
/// placeholder string, for stamping out fresh documents to fill in.
pub fn template_of(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, child)| (key.clone(), template_of(child)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(template_of).collect()),
        Value::String(_) => placeholder("STRING"),
        Value::Number(n) => {
            if n.is_f64() {
                placeholder("FLOAT")
            } else {
                placeholder("INTEGER")
            }
        }
        Value::Bool(_) => placeholder("BOOLEAN"),
        Value::Null => placeholder("NULL"),
    }
}

fn placeholder(type_name: &str) -> Value {
    Value::String(format!("TEMPLATE_{type_name}"))
}
