use std::borrow::Cow;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use anyhow::Result;
use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus};

/// Sub-prompts asked in the middle of a command: quick-fill values, save
/// filenames, directory confirmations. A trait so interactive commands can
/// be driven by scripted replies as well as by a terminal.
pub trait Prompter {
    /// Shows `label` and reads one reply. `None` means the input ended.
    fn read_line(&mut self, label: &str) -> Result<Option<String>>;

    fn confirm(&mut self, message: &str) -> Result<bool> {
        let answer = self.read_line(&format!("{message} [y]es, [n]o: "))?;
        Ok(matches!(answer, Some(a) if a.trim().to_lowercase().starts_with('y')))
    }
}

pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn read_line(&mut self, label: &str) -> Result<Option<String>> {
        print!("{label}");
        io::stdout().flush()?;
        let mut line = String::new();
        let read = io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            println!();
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

/// Feeds queued replies instead of asking; the queue running dry reads as
/// end of input.
#[derive(Default)]
pub struct ScriptedPrompter {
    replies: VecDeque<String>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompter {
            replies: replies.into_iter().map(Into::into).collect(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn read_line(&mut self, _label: &str) -> Result<Option<String>> {
        Ok(self.replies.pop_front())
    }
}

/// The main line prompt. The label tracks the active widget: the browser's
/// directory or the focused editor's file and cursor path.
pub struct DataPrompt {
    label: String,
}

impl DataPrompt {
    pub fn new() -> Self {
        DataPrompt {
            label: String::new(),
        }
    }

    pub fn set_label(&mut self, label: String) {
        self.label = label;
    }
}

impl Default for DataPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for DataPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.label)
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> Cow<'_, str> {
        match edit_mode {
            PromptEditMode::Default | PromptEditMode::Emacs => "> ".into(),
            PromptEditMode::Vi(vi_mode) => match vi_mode {
                reedline::PromptViMode::Normal => "N> ".into(),
                reedline::PromptViMode::Insert => "I> ".into(),
            },
            PromptEditMode::Custom(str) => format!("{str}> ").into(),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse search: {})",
            prefix, history_search.term
        ))
    }
}
