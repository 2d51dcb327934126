//! Command dispatch: one table per widget kind plus the global table.
//!
//! Handlers are plain functions looked up in a `CommandRegistry`; the
//! registries are built once at startup and owned by the widget manager.

pub mod args;
pub mod browser;
pub mod editor;
pub mod manager;
pub mod registry;

pub use args::CommandArgs;
pub use registry::{CommandRegistry, CommandSpec};

use anyhow::Result;

use crate::config::Config;
use crate::repl::prompt::Prompter;
use crate::widgets::data_editor::DataEditor;
use crate::widgets::file_browser::FileBrowser;
use crate::widgets::widget_manager::WidgetManager;

/// What a handler gets besides its widget: the sub-prompt channel and the
/// loaded configuration.
pub struct CommandCtx<'a> {
    pub prompter: &'a mut dyn Prompter,
    pub config: &'a Config,
}

/// Editor handlers also see their own table, so one command can run
/// another (`+l` does).
pub struct EditorCtx<'a> {
    pub commands: &'a CommandRegistry<EditorCommand>,
    pub prompter: &'a mut dyn Prompter,
    pub config: &'a Config,
}

pub type EditorCommand = fn(&mut DataEditor, &[String], &mut EditorCtx<'_>) -> Result<()>;
pub type BrowserCommand = fn(&mut FileBrowser, &[String], &mut CommandCtx<'_>) -> Result<()>;
/// Returning true ends the session.
pub type ManagerCommand = fn(&mut WidgetManager, &[String], &mut CommandCtx<'_>) -> Result<bool>;

/// A malformed invocation, reported in the command's own syntax.
pub(crate) fn usage(text: &str) -> anyhow::Error {
    crate::error::CommandError::Syntax(format!("usage: {text}")).into()
}
