use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use crossterm::style::Stylize;

use data_cli::commands::manager::apply_change;
use data_cli::config::Config;
use data_cli::repl::session;
use data_cli::utils::logging::init_logging;
use data_cli::widgets::{DataEditor, FileBrowser, WidgetManager};

/// Interactive editor for nested data files (JSON, YAML, TOML).
///
/// Without `-s`, opens a REPL with any `-i` files loaded into editor
/// tabs. With `-s`, writes the given values at `-p` into every `-i` file
/// and exits without entering the REPL.
#[derive(Parser, Debug)]
#[command(name = "data-cli", version, about)]
struct Cli {
    /// Data files to open (or to mutate in one-shot mode)
    #[arg(short = 'i', long = "input", num_args = 1..)]
    input: Vec<PathBuf>,

    /// Path inside the tree, slash-separated (one-shot mode)
    #[arg(short = 'p', long = "path", default_value = "/")]
    path: String,

    /// One-shot mode: values to write at the path; several values become
    /// a sequence
    #[arg(short = 's', long = "set", num_args = 1..)]
    set: Vec<String>,

    /// Write values as plain strings instead of smart-casting them
    #[arg(long = "nl", alias = "no-literal")]
    no_literal: bool,

    /// Create missing target files (one-shot mode)
    #[arg(long = "mk", alias = "make")]
    make: bool,

    /// Write a commented default config file and exit
    #[arg(long)]
    generate_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.generate_config {
        let path = Config::get_config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, Config::create_default_with_comments())?;
        println!("Configuration file created at {}.", path.display());
        return Ok(());
    }

    if let Err(e) = init_logging() {
        eprintln!("{}", format!("Warning: logging disabled: {e:#}").yellow());
    }

    // One-shot mode: mutate the files and get out of the way. A missing
    // file without --mk propagates as a non-zero exit.
    if !cli.set.is_empty() {
        if cli.input.is_empty() {
            anyhow::bail!("-s needs at least one -i file");
        }
        return apply_change(&cli.input, &cli.path, &cli.set, cli.no_literal, cli.make);
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format!("Warning: using default config: {e:#}").yellow());
            Config::default()
        }
    };

    let mut manager = WidgetManager::new(FileBrowser::at_current_dir()?);
    for file in &cli.input {
        match DataEditor::open(file) {
            Ok(editor) => {
                manager.open_editor(editor);
            }
            Err(e) => eprintln!("{}", format!("Error: {e:#}").red()),
        }
    }

    session::run(manager, config)
}
