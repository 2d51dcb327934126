use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::Value;
use tracing::debug;

use crate::data::access::{self, describe};
use crate::data::cast::{smart_cast, value_to_string};
use crate::data::DataPath;
use crate::error::CommandError;
use crate::formats;

/// One open document: the tree, a cursor into it, where it came from, and
/// the literal flag that gates smart casting of typed values.
pub struct DataEditor {
    data: Value,
    cursor: DataPath,
    source: Option<PathBuf>,
    literal: bool,
    modified: bool,
}

impl DataEditor {
    /// An editor with nothing in it yet.
    pub fn blank() -> Self {
        Self::from_value(Value::Null)
    }

    pub fn from_value(data: Value) -> Self {
        DataEditor {
            data,
            cursor: DataPath::default(),
            source: None,
            literal: false,
            modified: false,
        }
    }

    pub fn open(path: &Path) -> Result<Self> {
        let data = formats::read_file(path)?;
        debug!(file = %path.display(), "opened data file");
        Ok(DataEditor {
            data,
            cursor: DataPath::default(),
            source: Some(path.to_path_buf()),
            literal: false,
            modified: false,
        })
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn cursor(&self) -> &DataPath {
        &self.cursor
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn literal(&self) -> bool {
        self.literal
    }

    pub fn set_literal(&mut self, on: bool) {
        self.literal = on;
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn display_name(&self) -> String {
        match &self.source {
            Some(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            None => "[blank]".to_string(),
        }
    }

    /// How a typed token becomes a value under the current mode: cast when
    /// the literal flag is on, kept as the raw string when off.
    pub fn interpret(&self, raw: &str) -> Value {
        if self.literal {
            smart_cast(raw)
        } else {
            Value::String(raw.to_string())
        }
    }

    /// Turns user input into a path against this tree. `.` (or empty) is
    /// the cursor, `/` the root, input textually equal to the cursor stays
    /// put. A leading slash resolves from the root; anything else is tried
    /// relative to the cursor first and from the root second, so a bare
    /// path works from wherever you are.
    pub fn resolve_path(&self, input: &str) -> Result<DataPath, CommandError> {
        let parsed = DataPath::parse(input);
        if parsed.is_current() {
            return Ok(self.cursor.clone());
        }
        if parsed.is_root() {
            return Ok(DataPath::default());
        }
        if !parsed.is_absolute() {
            if input.trim() == self.cursor.to_string() {
                return Ok(self.cursor.clone());
            }
            let relative = self.cursor.join(&parsed);
            if access::get_by_path(&self.data, &relative).is_ok() {
                return Ok(relative);
            }
        }
        let absolute = DataPath::default().join(&parsed);
        match access::get_by_path(&self.data, &absolute) {
            Ok(_) => Ok(absolute),
            Err(_) => Err(CommandError::InvalidPath(input.trim().to_string())),
        }
    }

    /// Where a `set` should land: the parent of the input resolves like any
    /// path, the final segment is taken as-is so a fresh mapping key can be
    /// created at that last level.
    pub fn resolve_assign_path(&self, input: &str) -> Result<DataPath, CommandError> {
        let parsed = DataPath::parse(input);
        let Some(last) = parsed.last().map(str::to_string) else {
            // `.` and `/` address existing values.
            return self.resolve_path(input);
        };
        if last == ".." {
            return self.resolve_path(input);
        }
        let mut target = self.resolve_path(&parsed.parent().to_string())?;
        target.push(last);
        Ok(target)
    }

    pub fn get(&self, path: &DataPath) -> Result<&Value, CommandError> {
        access::get_by_path(&self.data, path)
    }

    pub fn value_at_cursor(&self) -> Result<&Value, CommandError> {
        access::get_by_path(&self.data, &self.cursor)
    }

    /// Moves the cursor, whole walk or nothing.
    pub fn set_cursor(&mut self, path: DataPath) -> Result<(), CommandError> {
        access::get_by_path(&self.data, &path)?;
        self.cursor = path;
        Ok(())
    }

    pub fn set_value(&mut self, path: &DataPath, value: Value) -> Result<(), CommandError> {
        access::set_by_path(&mut self.data, path, value)?;
        self.touch();
        Ok(())
    }

    /// Merges `value` into whatever `path` addresses: mappings merge (later
    /// keys win), sequences concatenate, numbers add, strings concatenate.
    /// Any other pairing is an error, unless the literal flag is on, in
    /// which case both sides are stringified and joined.
    pub fn append(&mut self, path: &DataPath, value: Value) -> Result<(), CommandError> {
        let target = access::get_by_path_mut(&mut self.data, path)?;
        combine(target, value, self.literal)?;
        self.touch();
        Ok(())
    }

    pub fn delete_key(&mut self, path: &DataPath, key: &str) -> Result<Value, CommandError> {
        let target = access::get_by_path_mut(&mut self.data, path)?;
        let removed = access::remove_key(target, key)?;
        self.touch();
        Ok(removed)
    }

    /// Removes members equal to `needle` under `path`; returns how many
    /// went away.
    pub fn delete_value(
        &mut self,
        path: &DataPath,
        needle: &Value,
        recursive: bool,
    ) -> Result<usize, CommandError> {
        let target = access::get_by_path_mut(&mut self.data, path)?;
        let removed = access::delete_value(target, needle, recursive);
        if removed > 0 {
            self.touch();
        }
        Ok(removed)
    }

    /// Re-reads the value at `path` through the cast grammar, so a string
    /// holding "42" becomes the number 42.
    pub fn cast_at(&mut self, path: &DataPath) -> Result<(), CommandError> {
        let current = access::get_by_path(&self.data, path)?;
        let recast = smart_cast(&value_to_string(current));
        access::set_by_path(&mut self.data, path, recast)?;
        self.touch();
        Ok(())
    }

    /// The inverse: freezes the value at `path` into its string form.
    pub fn uncast_at(&mut self, path: &DataPath) -> Result<(), CommandError> {
        let current = access::get_by_path(&self.data, path)?;
        let frozen = Value::String(value_to_string(current));
        access::set_by_path(&mut self.data, path, frozen)?;
        self.touch();
        Ok(())
    }

    pub fn save(&mut self) -> Result<PathBuf> {
        let Some(path) = self.source.clone() else {
            anyhow::bail!("no file is opened, use saveas");
        };
        formats::write_file(&path, &self.data)?;
        self.modified = false;
        Ok(path)
    }

    /// Writes to `path` and makes it the editor's file from now on.
    pub fn save_as(&mut self, path: PathBuf) -> Result<()> {
        formats::write_file(&path, &self.data)?;
        self.source = Some(path);
        self.modified = false;
        Ok(())
    }

    /// Throws away edits and re-reads the source file.
    pub fn reload(&mut self) -> Result<()> {
        let Some(path) = self.source.clone() else {
            anyhow::bail!("no file is opened");
        };
        self.data = formats::read_file(&path)?;
        self.modified = false;
        self.repair_cursor();
        Ok(())
    }

    fn touch(&mut self) {
        self.modified = true;
        self.repair_cursor();
    }

    /// A mutation can remove the subtree the cursor sits in; climb to the
    /// nearest ancestor that still exists. The root always does.
    fn repair_cursor(&mut self) {
        while !self.cursor.is_empty() && access::get_by_path(&self.data, &self.cursor).is_err() {
            self.cursor.pop();
        }
    }
}

fn combine(target: &mut Value, value: Value, literal: bool) -> Result<(), CommandError> {
    if let (Value::Number(a), Value::Number(b)) = (&*target, &value) {
        let sum = add_numbers(a, b);
        *target = sum;
        return Ok(());
    }
    match (&mut *target, value) {
        (Value::Object(map), Value::Object(additions)) => {
            map.extend(additions);
            Ok(())
        }
        (Value::Array(items), Value::Array(additions)) => {
            items.extend(additions);
            Ok(())
        }
        (Value::String(text), Value::String(suffix)) => {
            text.push_str(&suffix);
            Ok(())
        }
        (mismatched, value) => {
            if literal {
                let joined = format!("{}{}", value_to_string(mismatched), value_to_string(&value));
                *mismatched = Value::String(joined);
                Ok(())
            } else {
                Err(CommandError::Append {
                    value: describe(&value),
                    target: describe(mismatched),
                })
            }
        }
    }
}

fn add_numbers(a: &serde_json::Number, b: &serde_json::Number) -> Value {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        if let Some(sum) = x.checked_add(y) {
            return Value::from(sum);
        }
    }
    let sum = a.as_f64().unwrap_or(0.0) + b.as_f64().unwrap_or(0.0);
    serde_json::Number::from_f64(sum)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
