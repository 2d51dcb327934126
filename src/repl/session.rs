//! The interactive loop: read a line, tokenize, expand `$expr$` tokens,
//! dispatch, report. Nothing a command does can end the loop except the
//! exit command itself; Ctrl-C and Ctrl-D at the read point do.

use anyhow::Result;
use crossterm::style::Stylize;
use reedline::{
    default_emacs_keybindings, ColumnarMenu, Emacs, FileBackedHistory, KeyCode, KeyModifiers,
    MenuBuilder, Reedline, ReedlineEvent, ReedlineMenu, Signal,
};
use tracing::{error, info};

use crate::config::Config;
use crate::utils::app_paths::AppPaths;
use crate::widgets::widget_manager::WidgetManager;

use super::completer::CommandCompleter;
use super::expr::Evaluator;
use super::lexer::tokenize;
use super::prompt::{DataPrompt, Prompter, StdinPrompter};

const MENU_NAME: &str = "command_completion";

/// Runs one line through the lexer, the expression expander and the
/// dispatcher. Returns true when the session should end. Split out of the
/// loop so whole-session behavior is testable with scripted input.
pub fn run_line(
    manager: &mut WidgetManager,
    evaluator: &mut Evaluator,
    prompter: &mut dyn Prompter,
    config: &Config,
    line: &str,
) -> Result<bool> {
    let tokens = tokenize(line)?;
    let tokens = evaluator.expand(tokens)?;
    manager.dispatch(&tokens, prompter, config)
}

pub fn run(mut manager: WidgetManager, config: Config) -> Result<()> {
    let history_file = AppPaths::history_file()?;
    let history = Box::new(FileBackedHistory::with_file(
        config.behavior.max_history_entries,
        history_file,
    )?);

    let mut names: Vec<&'static str> = manager
        .global_commands()
        .all_names()
        .chain(manager.editor_commands().all_names())
        .chain(manager.browser_commands().all_names())
        .collect();
    names.sort_unstable();
    names.dedup();
    let completer = Box::new(CommandCompleter::new(names));

    let completion_menu = Box::new(
        ColumnarMenu::default()
            .with_name(MENU_NAME)
            .with_columns(1)
            .with_column_width(None)
            .with_column_padding(2),
    );

    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::Menu(MENU_NAME.to_string()),
    );
    let edit_mode = Box::new(Emacs::new(keybindings));

    let mut line_editor = Reedline::create()
        .with_completer(completer)
        .with_menu(ReedlineMenu::EngineCompleter(completion_menu))
        .with_history(history)
        .with_edit_mode(edit_mode);

    let mut prompt = DataPrompt::new();
    let mut prompter = StdinPrompter;
    let mut evaluator = Evaluator::new();

    println!("Type {} for the available commands.", "help".green());
    info!("session started");

    loop {
        prompt.set_label(manager.prompt_label());
        match line_editor.read_line(&prompt)? {
            Signal::Success(buffer) => {
                match run_line(&mut manager, &mut evaluator, &mut prompter, &config, &buffer) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(e) => {
                        error!(error = %e, line = %buffer.trim(), "command failed");
                        eprintln!("{}", format!("Error: {e:#}").red());
                    }
                }
            }
            Signal::CtrlD | Signal::CtrlC => {
                println!();
                break;
            }
        }
    }

    info!("session ended");
    Ok(())
}
