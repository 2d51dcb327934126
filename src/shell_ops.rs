//! Filesystem primitives behind the browser commands. These stay
//! prompt-free; asking the user (for example before creating a missing
//! directory) happens in the command layer.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct DirEntryInfo {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    pub size: u64,
}

/// Directory contents sorted directories-first, then by name, case
/// insensitively. Hidden entries are included.
pub fn list_dir(path: &Path) -> Result<Vec<DirEntryInfo>> {
    let mut entries = Vec::new();
    let read = fs::read_dir(path).with_context(|| format!("could not list {}", path.display()))?;
    for entry in read {
        let entry = entry?;
        let metadata = entry.metadata()?;
        entries.push(DirEntryInfo {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
            is_dir: metadata.is_dir(),
            size: if metadata.is_dir() { 0 } else { metadata.len() },
        });
    }
    entries.sort_by(|a, b| {
        b.is_dir
            .cmp(&a.is_dir)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    Ok(entries)
}

/// Where `src` would land when sent at `dest`: into `dest` when `dest` is
/// an existing directory, at `dest` itself otherwise.
pub fn destination_for(src: &Path, dest: &Path) -> PathBuf {
    if dest.is_dir() {
        match src.file_name() {
            Some(name) => dest.join(name),
            None => dest.to_path_buf(),
        }
    } else {
        dest.to_path_buf()
    }
}

/// Copies a file or a whole directory tree.
pub fn copy_any(src: &Path, dest: &Path) -> Result<PathBuf> {
    let target = destination_for(src, dest);
    if src.is_dir() {
        copy_dir_recursive(src, &target)
            .with_context(|| format!("could not copy {} to {}", src.display(), target.display()))?;
    } else {
        fs::copy(src, &target)
            .with_context(|| format!("could not copy {} to {}", src.display(), target.display()))?;
    }
    Ok(target)
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Renames when possible, falls back to copy-and-delete across devices.
pub fn move_any(src: &Path, dest: &Path) -> Result<PathBuf> {
    let target = destination_for(src, dest);
    if fs::rename(src, &target).is_ok() {
        return Ok(target);
    }
    copy_any(src, dest)?;
    delete_any(src)?;
    Ok(target)
}

pub fn delete_any(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path)
        .with_context(|| format!("could not find {}", path.display()))?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
            .with_context(|| format!("could not delete {}", path.display()))?;
    } else {
        fs::remove_file(path).with_context(|| format!("could not delete {}", path.display()))?;
    }
    Ok(())
}

/// Creates an empty file, leaving an existing one alone.
pub fn create_file(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    fs::File::create(path).with_context(|| format!("could not create {}", path.display()))?;
    Ok(())
}

pub fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("could not create {}", path.display()))
}
