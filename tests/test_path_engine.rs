//! Properties of the path-addressed access layer and the cast grammar.

use data_cli::data::access::{get_by_path, set_by_path};
use data_cli::data::cast::{smart_cast, value_to_string};
use data_cli::data::DataPath;
use serde_json::{json, Value};

fn sample_tree() -> Value {
    json!({
        "name": "demo",
        "servers": [
            {"host": "a", "port": 1},
            {"host": "b", "port": 2}
        ],
        "limits": {"cpu": 0.5, "mem": null}
    })
}

#[test]
fn read_modify_write_is_identity() {
    let paths = [
        "",
        "name",
        "servers",
        "servers/1",
        "servers/1/port",
        "limits/mem",
    ];
    for input in paths {
        let mut tree = sample_tree();
        let path = DataPath::parse(input);
        let current = get_by_path(&tree, &path).unwrap().clone();
        set_by_path(&mut tree, &path, current).unwrap();
        assert_eq!(tree, sample_tree(), "tree changed under identity write at {input:?}");
    }
}

#[test]
fn write_then_read_returns_what_was_written() {
    let mut tree = sample_tree();
    let path = DataPath::parse("servers/0/host");
    set_by_path(&mut tree, &path, json!(["replaced"])).unwrap();
    assert_eq!(get_by_path(&tree, &path).unwrap(), &json!(["replaced"]));

    // The empty path replaces the whole tree.
    set_by_path(&mut tree, &DataPath::default(), json!(7)).unwrap();
    assert_eq!(tree, json!(7));
}

#[test]
fn errors_name_the_offending_segment() {
    let tree = sample_tree();
    let err = get_by_path(&tree, &DataPath::parse("servers/7/host")).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("7"), "missing segment in {message:?}");
    assert!(message.contains("sequence"), "missing container in {message:?}");

    let err = get_by_path(&tree, &DataPath::parse("name/deeper")).unwrap_err();
    assert!(err.to_string().contains("deeper"));
}

#[test]
fn smart_cast_is_idempotent_through_restringification() {
    let inputs = [
        "true", "False", "42", "-17", "2.5", "null",
        "[1, 2.5, true]", "{'a': 1, 'b': [2]}", "plain text",
    ];
    for input in inputs {
        let first = smart_cast(input);
        let again = smart_cast(&value_to_string(&first));
        assert_eq!(first, again, "diverged for {input:?}");
    }
}

#[test]
fn deep_set_keeps_sibling_order() {
    let mut tree = json!({"z": 1, "a": 2, "m": {"k": 3}});
    set_by_path(&mut tree, &DataPath::parse("m/k"), json!(9)).unwrap();
    let keys: Vec<&String> = tree.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["z", "a", "m"]);
}
