use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// The filesystem side of the tool: a working directory to list, walk and
/// run file operations from. Independent of the process working directory.
pub struct FileBrowser {
    cwd: PathBuf,
}

impl FileBrowser {
    pub fn new(cwd: PathBuf) -> Self {
        FileBrowser { cwd }
    }

    pub fn at_current_dir() -> Result<Self> {
        Ok(FileBrowser {
            cwd: std::env::current_dir().context("could not read the working directory")?,
        })
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Absolute inputs pass through, everything else is taken against the
    /// browser's directory.
    pub fn resolve(&self, input: &str) -> PathBuf {
        let path = Path::new(input);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    pub fn change_dir(&mut self, input: &str) -> Result<()> {
        let target = self.resolve(input);
        let canonical = std::fs::canonicalize(&target)
            .with_context(|| format!("could not find directory {}", target.display()))?;
        if !canonical.is_dir() {
            anyhow::bail!("{} is not a directory", canonical.display());
        }
        self.cwd = canonical;
        Ok(())
    }

    /// Short label for the prompt: the directory's own name.
    pub fn dir_label(&self) -> String {
        self.cwd
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.cwd.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_dir_walks_and_rejects_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::create_dir(dir.path().join("sub"))?;
        std::fs::write(dir.path().join("file.json"), "{}")?;

        let mut browser = FileBrowser::new(dir.path().to_path_buf());
        browser.change_dir("sub")?;
        assert!(browser.cwd().ends_with("sub"));
        browser.change_dir("..")?;
        assert_eq!(browser.cwd(), std::fs::canonicalize(dir.path())?);

        assert!(browser.change_dir("file.json").is_err());
        assert!(browser.change_dir("missing").is_err());
        Ok(())
    }
}
