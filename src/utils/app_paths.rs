use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub struct AppPaths;

impl AppPaths {
    pub fn data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .context("cannot determine data directory")?
            .join("data-cli");

        fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn config_file() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("cannot determine config directory")?;
        Ok(config_dir.join("data-cli").join("config.toml"))
    }

    pub fn history_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("history.txt"))
    }

    pub fn log_file() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("data-cli.log"))
    }
}
