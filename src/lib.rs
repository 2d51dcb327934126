//! data-cli: an interactive terminal editor for nested data files.
//!
//! JSON, YAML and TOML documents open into editor tabs and are navigated
//! with slash paths (`cd`, `ls`) and mutated in place (`set`, `append`,
//! `del-key`, `del-val`, `cast`); a file browser widget lives alongside
//! the editors. One input line always runs exactly one command: the
//! global table is consulted first, the focused widget's table second.

pub mod commands;
pub mod config;
pub mod data;
pub mod display;
pub mod error;
pub mod formats;
pub mod repl;
pub mod shell_ops;
pub mod utils;
pub mod widgets;
