//! Disk-facing behavior: one-shot mutation, save/saveas across formats.

use anyhow::Result;
use data_cli::commands::manager::apply_change;
use data_cli::formats;
use data_cli::widgets::DataEditor;
use serde_json::json;

#[test]
fn one_shot_change_writes_a_nested_value() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("config.yaml");
    std::fs::write(&file, "server:\n  port: 80\n  host: a\n")?;

    apply_change(&[file.clone()], "server/port", &["8080".to_string()], false, false)?;
    assert_eq!(
        formats::read_file(&file)?,
        json!({"server": {"port": 8080, "host": "a"}})
    );
    Ok(())
}

#[test]
fn one_shot_change_over_several_files_and_values() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let a = dir.path().join("a.json");
    let b = dir.path().join("b.json");
    std::fs::write(&a, r#"{"v": null}"#)?;
    std::fs::write(&b, r#"{"v": null}"#)?;

    let values = ["1".to_string(), "x".to_string()];
    apply_change(&[a.clone(), b.clone()], "v", &values, false, false)?;
    for file in [&a, &b] {
        assert_eq!(formats::read_file(file)?, json!({"v": [1, "x"]}));
    }
    Ok(())
}

#[test]
fn one_shot_missing_file_fails_without_mk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("fresh.json");

    let values = ["7".to_string()];
    assert!(apply_change(&[file.clone()], "k", &values, false, false).is_err());
    assert!(!file.exists());

    apply_change(&[file.clone()], "k", &values, false, true)?;
    assert_eq!(formats::read_file(&file)?, json!({"k": 7}));
    Ok(())
}

#[test]
fn no_literal_keeps_values_as_strings() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("t.toml");
    std::fs::write(&file, "flag = false\n")?;

    apply_change(&[file.clone()], "flag", &["true".to_string()], true, false)?;
    assert_eq!(formats::read_file(&file)?, json!({"flag": "true"}));
    Ok(())
}

#[test]
fn saveas_converts_between_formats() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let source = dir.path().join("in.json");
    std::fs::write(&source, r#"{"name": "demo", "ports": [1, 2]}"#)?;

    let mut editor = DataEditor::open(&source)?;
    let target = dir.path().join("out.yaml");
    editor.save_as(target.clone())?;

    assert_eq!(formats::read_file(&target)?, formats::read_file(&source)?);
    // The editor now saves to the new file.
    assert_eq!(editor.source(), Some(target.as_path()));
    Ok(())
}

#[test]
fn save_round_trips_edits_and_clears_the_modified_flag() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("doc.json");
    std::fs::write(&file, r#"{"count": 1}"#)?;

    let mut editor = DataEditor::open(&file)?;
    assert!(!editor.is_modified());
    editor.set_value(&data_cli::data::DataPath::parse("count"), json!(2))?;
    assert!(editor.is_modified());
    editor.save()?;
    assert!(!editor.is_modified());

    assert_eq!(formats::read_file(&file)?, json!({"count": 2}));

    // Reload drops in-memory edits in favor of the disk copy.
    editor.set_value(&data_cli::data::DataPath::parse("count"), json!(99))?;
    editor.reload()?;
    assert_eq!(editor.data(), &json!({"count": 2}));
    Ok(())
}

#[test]
fn unsupported_extension_is_reported() {
    let err = formats::read_file(std::path::Path::new("notes.txt")).unwrap_err();
    assert!(err.to_string().contains("unsupported format"));
}
