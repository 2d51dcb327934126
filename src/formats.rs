//! Reading and writing data files, with the format picked by extension.
//!
//! Whatever the on-disk format, trees are held as `serde_json::Value`;
//! saving under a different extension converts on the way out.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::error::CommandError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
    Toml,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, CommandError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" => Ok(FileFormat::Json),
            "yaml" | "yml" => Ok(FileFormat::Yaml),
            "toml" => Ok(FileFormat::Toml),
            _ => Err(CommandError::UnsupportedFormat { extension }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FileFormat::Json => "json",
            FileFormat::Yaml => "yaml",
            FileFormat::Toml => "toml",
        }
    }
}

pub fn read_file(path: &Path) -> Result<Value> {
    let format = FileFormat::from_path(path)?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("could not read {}", path.display()))?;
    parse_text(format, &text).with_context(|| format!("could not parse {}", path.display()))
}

pub fn write_file(path: &Path, value: &Value) -> Result<()> {
    let format = FileFormat::from_path(path)?;
    let text = serialize_value(format, value)
        .with_context(|| format!("could not serialize for {}", path.display()))?;
    fs::write(path, text).with_context(|| format!("could not write {}", path.display()))
}

pub fn parse_text(format: FileFormat, text: &str) -> Result<Value> {
    match format {
        FileFormat::Json => Ok(serde_json::from_str(text)?),
        FileFormat::Yaml => Ok(serde_yaml::from_str(text)?),
        FileFormat::Toml => {
            let value: toml::Value = toml::from_str(text)?;
            Ok(toml_to_json(value))
        }
    }
}

pub fn serialize_value(format: FileFormat, value: &Value) -> Result<String> {
    match format {
        FileFormat::Json => {
            let mut text = serde_json::to_string_pretty(value)?;
            text.push('\n');
            Ok(text)
        }
        FileFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        FileFormat::Toml => {
            if !value.is_object() {
                anyhow::bail!("toml files need a mapping at the top level");
            }
            Ok(toml::to_string_pretty(value)?)
        }
    }
}

/// TOML datetimes have no JSON counterpart, so they become strings in
/// their RFC 3339 spelling; everything else maps one to one.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, child)| (key, toml_to_json(child)))
                .collect(),
        ),
    }
}
