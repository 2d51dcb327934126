use anyhow::Result;
use tracing::{debug, info};

use crate::commands::{
    browser as browser_cmds, editor as editor_cmds, manager as manager_cmds, BrowserCommand,
    CommandCtx, CommandRegistry, EditorCommand, EditorCtx, ManagerCommand,
};
use crate::config::Config;
use crate::error::CommandError;
use crate::repl::prompt::Prompter;

use super::data_editor::DataEditor;
use super::file_browser::FileBrowser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveWidget {
    Explorer,
    Editor(usize),
}

/// Owns the open editors, the file browser, the focus, and the three
/// command tables. Commands reach widgets only through `dispatch`.
pub struct WidgetManager {
    editors: Vec<DataEditor>,
    browser: FileBrowser,
    active: ActiveWidget,
    global_commands: CommandRegistry<ManagerCommand>,
    editor_commands: CommandRegistry<EditorCommand>,
    browser_commands: CommandRegistry<BrowserCommand>,
}

impl WidgetManager {
    pub fn new(browser: FileBrowser) -> Self {
        WidgetManager {
            editors: Vec::new(),
            browser,
            active: ActiveWidget::Explorer,
            global_commands: manager_cmds::registry(),
            editor_commands: editor_cmds::registry(),
            browser_commands: browser_cmds::registry(),
        }
    }

    pub fn active(&self) -> ActiveWidget {
        self.active
    }

    pub fn editors(&self) -> &[DataEditor] {
        &self.editors
    }

    pub fn editor(&self, index: usize) -> Option<&DataEditor> {
        self.editors.get(index)
    }

    pub fn editor_mut(&mut self, index: usize) -> Option<&mut DataEditor> {
        self.editors.get_mut(index)
    }

    pub fn active_editor_index(&self) -> Option<usize> {
        match self.active {
            ActiveWidget::Editor(index) => Some(index),
            ActiveWidget::Explorer => None,
        }
    }

    pub fn active_editor(&self) -> Option<&DataEditor> {
        self.active_editor_index().and_then(|i| self.editor(i))
    }

    pub fn browser(&self) -> &FileBrowser {
        &self.browser
    }

    pub fn browser_mut(&mut self) -> &mut FileBrowser {
        &mut self.browser
    }

    pub fn global_commands(&self) -> &CommandRegistry<ManagerCommand> {
        &self.global_commands
    }

    pub fn editor_commands(&self) -> &CommandRegistry<EditorCommand> {
        &self.editor_commands
    }

    pub fn browser_commands(&self) -> &CommandRegistry<BrowserCommand> {
        &self.browser_commands
    }

    /// Adds an editor and focuses it. Returns its tab index.
    pub fn open_editor(&mut self, editor: DataEditor) -> usize {
        info!(name = %editor.display_name(), "opening editor");
        self.editors.push(editor);
        let index = self.editors.len() - 1;
        self.active = ActiveWidget::Editor(index);
        index
    }

    pub fn focus_editor(&mut self, index: usize) -> Result<()> {
        if index >= self.editors.len() {
            anyhow::bail!("no editor at index {index}");
        }
        self.active = ActiveWidget::Editor(index);
        Ok(())
    }

    pub fn focus_explorer(&mut self) {
        self.active = ActiveWidget::Explorer;
    }

    /// Removes the editor at `index`. Closing the active one refocuses to
    /// the most recent remaining editor, or to the browser when none are
    /// left; closing a lower tab shifts the active index down so focus
    /// keeps pointing at the same editor.
    pub fn close_editor(&mut self, index: usize) -> Result<()> {
        if index >= self.editors.len() {
            anyhow::bail!("no editor at index {index}");
        }
        let closed = self.editors.remove(index);
        info!(name = %closed.display_name(), "closed editor");
        self.active = match self.active {
            ActiveWidget::Editor(current) if current == index => {
                if self.editors.is_empty() {
                    ActiveWidget::Explorer
                } else {
                    ActiveWidget::Editor(self.editors.len() - 1)
                }
            }
            ActiveWidget::Editor(current) if current > index => ActiveWidget::Editor(current - 1),
            other => other,
        };
        Ok(())
    }

    /// The editor a tab-addressed command should act on: the requested tab
    /// when given, otherwise the focused editor, otherwise the most
    /// recently opened one.
    pub fn target_editor_index(&self, requested: Option<usize>) -> Result<usize> {
        if let Some(index) = requested {
            if index >= self.editors.len() {
                anyhow::bail!("no editor at index {index}");
            }
            return Ok(index);
        }
        if let Some(index) = self.active_editor_index() {
            return Ok(index);
        }
        match self.editors.len() {
            0 => anyhow::bail!("no open editors"),
            n => Ok(n - 1),
        }
    }

    /// Runs one tokenized line: the global table is consulted first, then
    /// the active widget's. Exactly one handler runs. Returns true when
    /// the session should end.
    pub fn dispatch(
        &mut self,
        tokens: &[String],
        prompter: &mut dyn Prompter,
        config: &Config,
    ) -> Result<bool> {
        let Some((name, rest)) = tokens.split_first() else {
            return Ok(false);
        };
        debug!(command = %name, "dispatching");

        if let Some(spec) = self.global_commands.find(name) {
            let run = spec.run;
            let mut ctx = CommandCtx { prompter, config };
            return run(self, rest, &mut ctx);
        }

        match self.active {
            ActiveWidget::Editor(index) => {
                if let Some(spec) = self.editor_commands.find(name) {
                    let run = spec.run;
                    let mut ctx = EditorCtx {
                        commands: &self.editor_commands,
                        prompter,
                        config,
                    };
                    run(&mut self.editors[index], rest, &mut ctx)?;
                    return Ok(false);
                }
            }
            ActiveWidget::Explorer => {
                if let Some(spec) = self.browser_commands.find(name) {
                    let run = spec.run;
                    let mut ctx = CommandCtx { prompter, config };
                    run(&mut self.browser, rest, &mut ctx)?;
                    return Ok(false);
                }
            }
        }

        Err(CommandError::UnknownCommand(name.clone()).into())
    }

    /// Prompt label for the active widget: the browser's directory name,
    /// or the focused editor's file (starred when modified) and cursor.
    pub fn prompt_label(&self) -> String {
        match self.active {
            ActiveWidget::Explorer => self.browser.dir_label(),
            ActiveWidget::Editor(index) => {
                let editor = &self.editors[index];
                let star = if editor.is_modified() { "*" } else { "" };
                if editor.cursor().is_empty() {
                    format!("{}{}", star, editor.display_name())
                } else {
                    format!("{}{}:{}", star, editor.display_name(), editor.cursor())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::prompt::ScriptedPrompter;
    use serde_json::json;

    fn manager() -> WidgetManager {
        WidgetManager::new(FileBrowser::new(std::env::temp_dir()))
    }

    #[test]
    fn closing_the_only_editor_refocuses_the_explorer() {
        let mut wm = manager();
        let index = wm.open_editor(DataEditor::from_value(json!({"a": 1})));
        assert_eq!(wm.active(), ActiveWidget::Editor(index));
        wm.close_editor(index).unwrap();
        assert_eq!(wm.active(), ActiveWidget::Explorer);
        assert!(wm.editors().is_empty());
    }

    #[test]
    fn closing_a_lower_tab_keeps_focus_on_the_same_editor() {
        let mut wm = manager();
        wm.open_editor(DataEditor::from_value(json!(0)));
        wm.open_editor(DataEditor::from_value(json!(1)));
        let third = wm.open_editor(DataEditor::from_value(json!(2)));
        assert_eq!(wm.active(), ActiveWidget::Editor(third));

        wm.close_editor(0).unwrap();
        assert_eq!(wm.active(), ActiveWidget::Editor(1));
        assert_eq!(wm.active_editor().unwrap().data(), &json!(2));
    }

    #[test]
    fn closing_a_non_active_higher_tab_leaves_focus_alone() {
        let mut wm = manager();
        wm.open_editor(DataEditor::from_value(json!(0)));
        wm.open_editor(DataEditor::from_value(json!(1)));
        wm.focus_editor(0).unwrap();
        wm.close_editor(1).unwrap();
        assert_eq!(wm.active(), ActiveWidget::Editor(0));
        assert_eq!(wm.active_editor().unwrap().data(), &json!(0));
    }

    #[test]
    fn closing_the_active_editor_falls_back_to_most_recent() {
        let mut wm = manager();
        wm.open_editor(DataEditor::from_value(json!(0)));
        wm.open_editor(DataEditor::from_value(json!(1)));
        wm.open_editor(DataEditor::from_value(json!(2)));
        wm.focus_editor(1).unwrap();
        wm.close_editor(1).unwrap();
        // Two editors remain; focus lands on the most recent.
        assert_eq!(wm.active(), ActiveWidget::Editor(1));
        assert_eq!(wm.active_editor().unwrap().data(), &json!(2));
    }

    #[test]
    fn unknown_commands_error_out_of_dispatch() {
        let mut wm = manager();
        let config = Config::default();
        let mut prompter = ScriptedPrompter::default();
        let err = wm
            .dispatch(&["no-such-command".to_string()], &mut prompter, &config)
            .unwrap_err();
        let command_error = err.downcast_ref::<CommandError>().unwrap();
        assert!(matches!(command_error, CommandError::UnknownCommand(name) if name == "no-such-command"));
    }

    #[test]
    fn target_editor_prefers_request_then_focus_then_recency() {
        let mut wm = manager();
        assert!(wm.target_editor_index(None).is_err());
        wm.open_editor(DataEditor::from_value(json!(0)));
        wm.open_editor(DataEditor::from_value(json!(1)));
        assert_eq!(wm.target_editor_index(Some(0)).unwrap(), 0);
        assert_eq!(wm.target_editor_index(None).unwrap(), 1);
        wm.focus_explorer();
        assert_eq!(wm.target_editor_index(None).unwrap(), 1);
        assert!(wm.target_editor_index(Some(5)).is_err());
    }
}
