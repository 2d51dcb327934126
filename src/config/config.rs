use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::utils::app_paths::AppPaths;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Spaces per level when printing subtrees
    pub indent_width: usize,

    /// Include dotfiles in directory listings
    pub show_hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Maximum entries kept in the line history
    pub max_history_entries: usize,

    /// Ask before creating missing directories for save/copy targets.
    /// When false they are created silently.
    pub confirm_directory_create: bool,

    /// Print the subtree after every cd
    pub print_after_navigation: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display: DisplayConfig::default(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            show_hidden: true,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            max_history_entries: 200,
            confirm_directory_create: true,
            print_after_navigation: true,
        }
    }
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            // Create default config if it doesn't exist
            let default_config = Self::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        AppPaths::config_file()
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# data-cli Configuration File
# Location: ~/.config/data-cli/config.toml (Linux/macOS)
#           %APPDATA%\data-cli\config.toml (Windows)

[display]
# Spaces per level when printing subtrees
indent_width = 2

# Include dotfiles in directory listings
show_hidden = true

[behavior]
# Maximum entries kept in the line history
max_history_entries = 200

# Ask before creating missing directories for save/copy targets.
# When false they are created silently.
confirm_directory_create = true

# Print the subtree after every cd
print_after_navigation = true
"#
        .to_string()
    }
}
