//! Global commands, consulted before the active widget's table on every
//! line. These own widget lifecycle (open, focus, close) and everything
//! that spans widgets.

use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use serde_json::Value;

use crate::data::access::set_by_path;
use crate::data::cast::smart_cast;
use crate::data::template::template_of;
use crate::data::DataPath;
use crate::display::styled_table;
use crate::error::CommandError;
use crate::formats;
use crate::widgets::data_editor::DataEditor;
use crate::widgets::widget_manager::{ActiveWidget, WidgetManager};

use super::{usage, CommandArgs, CommandCtx, CommandRegistry, CommandSpec, ManagerCommand};

pub fn registry() -> CommandRegistry<ManagerCommand> {
    CommandRegistry::new(vec![
        CommandSpec {
            name: "edit",
            aliases: &[],
            usage: "edit <files...>",
            description: "open data files in new editor tabs",
            run: edit,
        },
        CommandSpec {
            name: "editor",
            aliases: &[],
            usage: "editor [index]",
            description: "focus an editor tab (a blank one is created if none exist)",
            run: editor,
        },
        CommandSpec {
            name: "explorer",
            aliases: &[],
            usage: "explorer",
            description: "focus the file browser",
            run: explorer,
        },
        CommandSpec {
            name: "close",
            aliases: &[],
            usage: "close [index]",
            description: "close an editor tab (default: the focused one)",
            run: close,
        },
        CommandSpec {
            name: "tabs",
            aliases: &["print-tabs"],
            usage: "tabs",
            description: "list the open editor tabs",
            run: tabs,
        },
        CommandSpec {
            name: "save",
            aliases: &[],
            usage: "save [-t tab]",
            description: "write an editor's tree back to its file",
            run: save,
        },
        CommandSpec {
            name: "saveas",
            aliases: &[],
            usage: "saveas <name> [-t tab]",
            description: "write an editor's tree to a new file and keep using it",
            run: saveas,
        },
        CommandSpec {
            name: "change",
            aliases: &[],
            usage: "change -i <files...> -p <path> -s <values...> [-nl] [-mk]",
            description: "one-shot mutation of files on disk, no tab involved",
            run: change,
        },
        CommandSpec {
            name: "gt",
            aliases: &["get-template"],
            usage: "gt [tab]",
            description: "open a template of an editor's tree in a new tab",
            run: get_template,
        },
        CommandSpec {
            name: "help",
            aliases: &[],
            usage: "help",
            description: "show the global commands and the active widget's",
            run: help,
        },
        CommandSpec {
            name: "cls",
            aliases: &["clear"],
            usage: "cls",
            description: "clear the screen",
            run: cls,
        },
        CommandSpec {
            name: "#",
            aliases: &[],
            usage: "# [anything]",
            description: "comment, does nothing",
            run: comment,
        },
        CommandSpec {
            name: "!",
            aliases: &[],
            usage: "!<shell command>",
            description: "run a command in the system shell",
            run: shell_escape,
        },
        CommandSpec {
            name: "exit",
            aliases: &["quit", "q"],
            usage: "exit",
            description: "leave the program",
            run: exit,
        },
    ])
}

/// Optional tab index from a positional or `-t`; bad numbers are syntax
/// errors rather than silently ignored.
fn parse_tab(value: Option<&str>) -> Result<Option<usize>> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let index = raw
                .parse()
                .map_err(|_| CommandError::Syntax(format!("{raw} is not a tab index")))?;
            Ok(Some(index))
        }
    }
}

fn edit(manager: &mut WidgetManager, args: &[String], _ctx: &mut CommandCtx) -> Result<bool> {
    let args = CommandArgs::parse(args, &[], &[])?;
    if args.positionals().is_empty() {
        return Err(usage("edit <files...>"));
    }
    for file in args.positionals() {
        let path = manager.browser().resolve(file);
        match DataEditor::open(&path) {
            Ok(editor) => {
                manager.open_editor(editor);
            }
            Err(e) => eprintln!("{}", format!("Error: {e:#}").red()),
        }
    }
    Ok(false)
}

fn editor(manager: &mut WidgetManager, args: &[String], _ctx: &mut CommandCtx) -> Result<bool> {
    let args = CommandArgs::parse(args, &[], &[])?;
    let requested = parse_tab(args.first())?;
    // A blank tab only appears when none was asked for by index.
    if manager.editors().is_empty() && requested.is_none() {
        manager.open_editor(DataEditor::blank());
        return Ok(false);
    }
    let index = manager.target_editor_index(requested)?;
    manager.focus_editor(index)?;
    Ok(false)
}

fn explorer(manager: &mut WidgetManager, args: &[String], _ctx: &mut CommandCtx) -> Result<bool> {
    CommandArgs::parse(args, &[], &[])?;
    manager.focus_explorer();
    Ok(false)
}

fn close(manager: &mut WidgetManager, args: &[String], _ctx: &mut CommandCtx) -> Result<bool> {
    let args = CommandArgs::parse(args, &[], &[])?;
    let index = manager.target_editor_index(parse_tab(args.first())?)?;
    manager.close_editor(index)?;
    Ok(false)
}

fn tabs(manager: &mut WidgetManager, args: &[String], _ctx: &mut CommandCtx) -> Result<bool> {
    CommandArgs::parse(args, &[], &[])?;
    if manager.editors().is_empty() {
        println!("No open editors.");
        return Ok(false);
    }
    let mut table = styled_table(&["tab", "file", "path", "modified"]);
    let active = manager.active_editor_index();
    for (index, editor) in manager.editors().iter().enumerate() {
        let marker = if active == Some(index) { "*" } else { "" };
        table.add_row(vec![
            format!("{marker}{index}"),
            editor.display_name(),
            editor.cursor().to_string(),
            if editor.is_modified() { "yes" } else { "" }.to_string(),
        ]);
    }
    println!("{table}");
    Ok(false)
}

fn save(manager: &mut WidgetManager, args: &[String], ctx: &mut CommandCtx) -> Result<bool> {
    let args = CommandArgs::parse(args, &["-t"], &[])?;
    let index = manager.target_editor_index(parse_tab(args.option("-t"))?)?;
    if manager.editor(index).is_some_and(|e| e.source().is_none()) {
        // A blank editor has nowhere to go; ask once.
        let Some(name) = ctx.prompter.read_line("save as: ")? else {
            return Ok(false);
        };
        if name.trim().is_empty() {
            return Ok(false);
        }
        return save_editor_as(manager, index, name.trim());
    }
    let editor = manager.editor_mut(index).expect("checked above");
    let path = editor.save()?;
    println!("Saved {}.", path.display());
    Ok(false)
}

fn saveas(manager: &mut WidgetManager, args: &[String], _ctx: &mut CommandCtx) -> Result<bool> {
    let args = CommandArgs::parse(args, &["-t"], &[])?;
    let Some(name) = args.first() else {
        return Err(usage("saveas <name> [-t tab]"));
    };
    let index = manager.target_editor_index(parse_tab(args.option("-t"))?)?;
    save_editor_as(manager, index, name)
}

/// Relative save targets land in the browser's directory, so what `ls`
/// shows is where the file goes.
fn save_editor_as(manager: &mut WidgetManager, index: usize, name: &str) -> Result<bool> {
    let path = manager.browser().resolve(name);
    let editor = manager.editor_mut(index).context("editor disappeared")?;
    editor.save_as(path.clone())?;
    println!("Saved {}.", path.display());
    Ok(false)
}

fn change(manager: &mut WidgetManager, args: &[String], _ctx: &mut CommandCtx) -> Result<bool> {
    let parsed = ChangeArgs::parse(args)?;
    let files: Vec<PathBuf> = parsed
        .files
        .iter()
        .map(|f| manager.browser().resolve(f))
        .collect();
    apply_change(
        &files,
        &parsed.path,
        &parsed.values,
        parsed.no_literal,
        parsed.make,
    )?;
    Ok(false)
}

/// `change` takes two multi-valued options, beyond what `CommandArgs`
/// models; tokens after `-i`/`-s` accumulate until the next option.
struct ChangeArgs {
    files: Vec<String>,
    path: String,
    values: Vec<String>,
    no_literal: bool,
    make: bool,
}

impl ChangeArgs {
    fn parse(tokens: &[String]) -> Result<Self> {
        const USAGE: &str = "change -i <files...> -p <path> -s <values...> [-nl] [-mk]";
        let mut files = Vec::new();
        let mut path = "/".to_string();
        let mut values = Vec::new();
        let mut no_literal = false;
        let mut make = false;
        let mut bucket: Option<&mut Vec<String>> = None;
        let mut iter = tokens.iter();
        while let Some(token) = iter.next() {
            match token.as_str() {
                "-i" => bucket = Some(&mut files),
                "-s" => bucket = Some(&mut values),
                "-p" => {
                    bucket = None;
                    path = iter.next().ok_or_else(|| usage(USAGE))?.clone();
                }
                "-nl" => {
                    bucket = None;
                    no_literal = true;
                }
                "-mk" => {
                    bucket = None;
                    make = true;
                }
                other => match bucket.as_deref_mut() {
                    Some(list) => list.push(other.to_string()),
                    None => return Err(usage(USAGE)),
                },
            }
        }
        if files.is_empty() || values.is_empty() {
            return Err(usage(USAGE));
        }
        Ok(ChangeArgs {
            files,
            path,
            values,
            no_literal,
            make,
        })
    }
}

/// The one-shot mutation behind both the `change` command and the CLI's
/// `-s` mode: read each file, write the value at the path, persist. One
/// value lands as a scalar, several as a sequence.
pub fn apply_change(
    files: &[PathBuf],
    path: &str,
    values: &[String],
    no_literal: bool,
    make: bool,
) -> Result<()> {
    let cast = |raw: &String| {
        if no_literal {
            Value::String(raw.clone())
        } else {
            smart_cast(raw)
        }
    };
    let value = match values {
        [single] => cast(single),
        several => Value::Array(several.iter().map(cast).collect()),
    };
    let target = DataPath::default().join(&DataPath::parse(path));

    for file in files {
        let mut data = if file.exists() {
            formats::read_file(file)?
        } else if make {
            Value::Object(serde_json::Map::new())
        } else {
            anyhow::bail!("{} does not exist (use -mk to create it)", file.display());
        };
        set_by_path(&mut data, &target, value.clone())?;
        formats::write_file(file, &data)?;
        println!("Changed {}.", file.display());
    }
    Ok(())
}

fn get_template(manager: &mut WidgetManager, args: &[String], _ctx: &mut CommandCtx) -> Result<bool> {
    let args = CommandArgs::parse(args, &[], &[])?;
    let index = manager.target_editor_index(parse_tab(args.first())?)?;
    let editor = manager.editor(index).context("editor disappeared")?;
    let template = template_of(editor.data());
    manager.open_editor(DataEditor::from_value(template));
    Ok(false)
}

fn help(manager: &mut WidgetManager, args: &[String], _ctx: &mut CommandCtx) -> Result<bool> {
    CommandArgs::parse(args, &[], &[])?;
    manager.global_commands().print_help("Global commands");
    match manager.active() {
        ActiveWidget::Editor(_) => manager.editor_commands().print_help("Editor commands"),
        ActiveWidget::Explorer => manager.browser_commands().print_help("Browser commands"),
    }
    Ok(false)
}

fn cls(_manager: &mut WidgetManager, args: &[String], _ctx: &mut CommandCtx) -> Result<bool> {
    CommandArgs::parse(args, &[], &[])?;
    print!("{esc}[2J{esc}[1;1H", esc = 27 as char);
    Ok(false)
}

fn comment(_manager: &mut WidgetManager, _args: &[String], _ctx: &mut CommandCtx) -> Result<bool> {
    Ok(false)
}

fn shell_escape(_manager: &mut WidgetManager, args: &[String], _ctx: &mut CommandCtx) -> Result<bool> {
    let line = args.join(" ");
    if line.trim().is_empty() {
        return Err(usage("!<shell command>"));
    }
    let status = if cfg!(windows) {
        Command::new("cmd").args(["/C", &line]).status()
    } else {
        Command::new("sh").args(["-c", &line]).status()
    }
    .context("could not start the shell")?;
    if !status.success() {
        eprintln!("{}", format!("Shell exited with {status}").yellow());
    }
    Ok(false)
}

fn exit(_manager: &mut WidgetManager, _args: &[String], _ctx: &mut CommandCtx) -> Result<bool> {
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::repl::prompt::ScriptedPrompter;
    use crate::widgets::file_browser::FileBrowser;
    use serde_json::json;

    fn run(
        manager: &mut WidgetManager,
        name: &str,
        args: &[&str],
        replies: &[&str],
    ) -> Result<bool> {
        let registry = registry();
        let spec = registry.find(name).expect("command exists");
        let config = Config::default();
        let mut prompter = ScriptedPrompter::new(replies.iter().copied());
        let mut ctx = CommandCtx {
            prompter: &mut prompter,
            config: &config,
        };
        let tokens: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        (spec.run)(manager, &tokens, &mut ctx)
    }

    fn manager_at(dir: &std::path::Path) -> WidgetManager {
        WidgetManager::new(FileBrowser::new(dir.to_path_buf()))
    }

    #[test]
    fn edit_opens_tabs_and_focuses_the_last() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("a.json"), r#"{"a": 1}"#)?;
        std::fs::write(dir.path().join("b.yaml"), "b: 2\n")?;
        let mut wm = manager_at(dir.path());
        run(&mut wm, "edit", &["a.json", "b.yaml"], &[])?;
        assert_eq!(wm.editors().len(), 2);
        assert_eq!(wm.active_editor().unwrap().data(), &json!({"b": 2}));
        Ok(())
    }

    #[test]
    fn editor_command_creates_a_blank_tab_when_none_exist() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut wm = manager_at(dir.path());
        run(&mut wm, "editor", &[], &[])?;
        assert_eq!(wm.editors().len(), 1);
        assert!(wm.active_editor().unwrap().source().is_none());
        Ok(())
    }

    #[test]
    fn save_on_a_blank_editor_prompts_for_a_name() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut wm = manager_at(dir.path());
        let mut editor = DataEditor::from_value(json!({"k": "v"}));
        editor.set_literal(true);
        wm.open_editor(editor);
        run(&mut wm, "save", &[], &["out.json"])?;
        let written = formats::read_file(&dir.path().join("out.json"))?;
        assert_eq!(written, json!({"k": "v"}));
        // The name sticks for the next save.
        assert!(wm.active_editor().unwrap().source().is_some());
        Ok(())
    }

    #[test]
    fn saveas_targets_a_specific_tab() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut wm = manager_at(dir.path());
        wm.open_editor(DataEditor::from_value(json!(1)));
        wm.open_editor(DataEditor::from_value(json!(2)));
        run(&mut wm, "saveas", &["first.json", "-t", "0"], &[])?;
        assert_eq!(formats::read_file(&dir.path().join("first.json"))?, json!(1));
        Ok(())
    }

    #[test]
    fn change_one_shot_writes_through_to_disk() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let file = dir.path().join("c.json");
        std::fs::write(&file, r#"{"a": {"b": 1}}"#)?;
        let mut wm = manager_at(dir.path());
        run(&mut wm, "change", &["-i", "c.json", "-p", "a/b", "-s", "42"], &[])?;
        assert_eq!(formats::read_file(&file)?, json!({"a": {"b": 42}}));

        // Several values become a sequence; -nl keeps them strings.
        run(
            &mut wm,
            "change",
            &["-i", "c.json", "-p", "a/b", "-s", "1", "2", "-nl"],
            &[],
        )?;
        assert_eq!(formats::read_file(&file)?, json!({"a": {"b": ["1", "2"]}}));
        Ok(())
    }

    #[test]
    fn change_missing_file_needs_mk() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut wm = manager_at(dir.path());
        let err = run(&mut wm, "change", &["-i", "new.json", "-p", "k", "-s", "1"], &[]);
        assert!(err.is_err());
        assert!(!dir.path().join("new.json").exists());

        run(
            &mut wm,
            "change",
            &["-i", "new.json", "-p", "k", "-s", "1", "-mk"],
            &[],
        )?;
        assert_eq!(
            formats::read_file(&dir.path().join("new.json"))?,
            json!({"k": 1})
        );
        Ok(())
    }

    #[test]
    fn gt_opens_the_template_in_a_new_tab() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut wm = manager_at(dir.path());
        wm.open_editor(DataEditor::from_value(json!({"n": 7})));
        run(&mut wm, "gt", &[], &[])?;
        assert_eq!(wm.editors().len(), 2);
        assert_eq!(
            wm.active_editor().unwrap().data(),
            &json!({"n": "TEMPLATE_INTEGER"})
        );
        Ok(())
    }

    #[test]
    fn exit_ends_the_session_and_comment_does_not() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut wm = manager_at(dir.path());
        assert!(!run(&mut wm, "#", &["anything", "goes"], &[])?);
        assert!(run(&mut wm, "exit", &[], &[])?);
        assert!(run(&mut wm, "q", &[], &[])?);
        Ok(())
    }
}
