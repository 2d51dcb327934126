//! Whole-line behavior: lexer, expression expansion and dispatch working
//! together on a widget manager, the way the REPL loop drives them.

use anyhow::Result;
use data_cli::config::Config;
use data_cli::error::CommandError;
use data_cli::repl::prompt::ScriptedPrompter;
use data_cli::repl::session::run_line;
use data_cli::repl::Evaluator;
use data_cli::widgets::{ActiveWidget, DataEditor, FileBrowser, WidgetManager};
use serde_json::json;

struct Session {
    manager: WidgetManager,
    evaluator: Evaluator,
    config: Config,
}

impl Session {
    fn new() -> Self {
        Session {
            manager: WidgetManager::new(FileBrowser::new(std::env::temp_dir())),
            evaluator: Evaluator::new(),
            config: Config::default(),
        }
    }

    fn open(&mut self, data: serde_json::Value) {
        self.manager.open_editor(DataEditor::from_value(data));
    }

    fn line(&mut self, input: &str) -> Result<bool> {
        let mut prompter = ScriptedPrompter::default();
        run_line(
            &mut self.manager,
            &mut self.evaluator,
            &mut prompter,
            &self.config,
            input,
        )
    }

    fn data(&self) -> &serde_json::Value {
        self.manager.active_editor().expect("an editor is focused").data()
    }
}

#[test]
fn navigate_and_set_inside_a_sequence() -> Result<()> {
    let mut s = Session::new();
    s.open(json!({"x": {"y": [1, 2, 3]}}));
    s.line("literal on")?;
    s.line("cd x/y")?;
    s.line("set 99 -p 0")?;
    assert_eq!(s.data(), &json!({"x": {"y": [99, 2, 3]}}));

    s.line("cd ..")?;
    assert_eq!(
        s.manager.active_editor().unwrap().cursor().to_string(),
        "x"
    );
    // ls still resolves from the new cursor.
    s.line("ls y")?;
    Ok(())
}

#[test]
fn failed_commands_leave_state_untouched() -> Result<()> {
    let mut s = Session::new();
    s.open(json!({"a": [1, 2]}));
    s.line("cd a")?;

    assert!(s.line("cd missing").is_err());
    assert!(s.line("set 5 -p 9").is_err());
    assert!(s.line("no-such-command").is_err());

    assert_eq!(s.data(), &json!({"a": [1, 2]}));
    assert_eq!(s.manager.active_editor().unwrap().cursor().to_string(), "a");
    Ok(())
}

#[test]
fn unknown_command_error_names_the_command() {
    let mut s = Session::new();
    s.open(json!({}));
    let err = s.line("frobnicate now").unwrap_err();
    let command_error = err.downcast_ref::<CommandError>().unwrap();
    assert!(matches!(
        command_error,
        CommandError::UnknownCommand(name) if name == "frobnicate"
    ));
}

#[test]
fn global_commands_shadow_widget_commands() -> Result<()> {
    let mut s = Session::new();
    s.open(json!({"k": 1}));
    // `#` is global; it must not reach the editor even though an editor
    // has focus and the rest of the line would be nonsense for it.
    assert!(!s.line("# del-key k")?);
    assert_eq!(s.data(), &json!({"k": 1}));
    Ok(())
}

#[test]
fn focus_moves_between_browser_and_editors() -> Result<()> {
    let mut s = Session::new();
    assert_eq!(s.manager.active(), ActiveWidget::Explorer);

    // Editor-only commands are unknown while the browser has focus.
    assert!(s.line("set 1").is_err());

    s.line("editor")?;
    assert_eq!(s.manager.active(), ActiveWidget::Editor(0));

    s.line("explorer")?;
    assert_eq!(s.manager.active(), ActiveWidget::Explorer);

    s.line("close 0")?;
    assert!(s.manager.editors().is_empty());
    assert_eq!(s.manager.active(), ActiveWidget::Explorer);
    Ok(())
}

#[test]
fn editor_with_an_index_never_creates_a_blank_tab() {
    let mut s = Session::new();
    let err = s.line("editor 5").unwrap_err();
    assert!(err.to_string().contains("no editor at index 5"));
    assert!(s.manager.editors().is_empty());
    assert_eq!(s.manager.active(), ActiveWidget::Explorer);
}

#[test]
fn expressions_expand_before_dispatch() -> Result<()> {
    let mut s = Session::new();
    s.open(json!({"n": 0, "t": "x"}));
    s.line("literal on")?;

    s.line("$v = 6 * 7$")?;
    s.line("set $v$ -p n")?;
    assert_eq!(s.data()["n"], json!(42));

    // The splat spreads into one append token per element.
    s.line("append $*sorted(['b', 'a'])$ -p t")?;
    assert_eq!(s.data()["t"], json!("xab"));
    Ok(())
}

#[test]
fn append_policy_follows_the_literal_flag() -> Result<()> {
    let mut s = Session::new();
    s.open(json!({"m": {"a": 1}, "s": [1, 2], "n": 1}));

    // Tokens cast regardless of the flag, so containers combine in
    // default mode.
    s.line("append {'b': 2} -p m")?;
    assert_eq!(s.data()["m"], json!({"a": 1, "b": 2}));
    s.line("append [3] -p s")?;
    assert_eq!(s.data()["s"], json!([1, 2, 3]));

    // Mismatch with literal off: hard error, value untouched.
    let err = s.line("append x -p n").unwrap_err();
    assert!(matches!(
        err.downcast_ref::<CommandError>(),
        Some(CommandError::Append { .. })
    ));
    assert_eq!(s.data()["n"], json!(1));
    // A bare scalar against a sequence follows the same rule.
    assert!(s.line("append 4 -p s").is_err());
    assert_eq!(s.data()["s"], json!([1, 2, 3]));

    // Mismatch with literal on: string concatenation.
    s.line("literal on")?;
    s.line("append x -p n")?;
    assert_eq!(s.data()["n"], json!("1x"));
    Ok(())
}

#[test]
fn del_key_reports_bad_indices_without_losing_good_ones() -> Result<()> {
    let mut s = Session::new();
    s.open(json!({"xs": [10, 20, 30], "m": {"a": 1, "b": 2}}));

    // Out-of-range index reports but the command still removes the rest.
    s.line("del-key 5 0 -p xs")?;
    assert_eq!(s.data()["xs"], json!([20, 30]));

    s.line("del-key a -p m")?;
    assert_eq!(s.data()["m"], json!({"b": 2}));
    Ok(())
}

#[test]
fn recursive_delete_by_value() -> Result<()> {
    let mut s = Session::new();
    s.open(json!({"a": 0, "b": {"c": 0, "d": 1}}));
    s.line("literal on")?;

    s.line("del-val 0")?;
    assert_eq!(s.data(), &json!({"b": {"c": 0, "d": 1}}));

    s.line("del-val 0 -r")?;
    assert_eq!(s.data(), &json!({"b": {"d": 1}}));
    Ok(())
}

#[test]
fn exit_ends_the_session() -> Result<()> {
    let mut s = Session::new();
    assert!(s.line("exit")?);
    assert!(!s.line("")?);
    Ok(())
}
