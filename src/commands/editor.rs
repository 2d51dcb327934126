//! Commands available while a data editor has focus.

use anyhow::Result;
use crossterm::style::Stylize;
use serde_json::Value;

use crate::data::cast::smart_cast;
use crate::display::render_value;
use crate::error::CommandError;
use crate::widgets::data_editor::DataEditor;
use crate::widgets::quick_fill;

use super::{usage, CommandArgs, CommandRegistry, CommandSpec, EditorCommand, EditorCtx};

pub fn registry() -> CommandRegistry<EditorCommand> {
    CommandRegistry::new(vec![
        CommandSpec {
            name: "ls",
            aliases: &[],
            usage: "ls [path]",
            description: "print the value at a path (default: where you are)",
            run: ls,
        },
        CommandSpec {
            name: "cd",
            aliases: &[],
            usage: "cd <path>",
            description: "move the cursor into the tree",
            run: cd,
        },
        CommandSpec {
            name: "set",
            aliases: &[],
            usage: "set <value> [-p path]",
            description: "write a value; the last path segment may be a new key",
            run: set,
        },
        CommandSpec {
            name: "append",
            aliases: &[],
            usage: "append <values...> [-p path]",
            description: "merge values into the target (concat, merge, add)",
            run: append,
        },
        CommandSpec {
            name: "cast",
            aliases: &[],
            usage: "cast [path]",
            description: "re-read the value through the cast grammar",
            run: cast,
        },
        CommandSpec {
            name: "uncast",
            aliases: &[],
            usage: "uncast [path]",
            description: "freeze the value into its string form",
            run: uncast,
        },
        CommandSpec {
            name: "del-key",
            aliases: &[],
            usage: "del-key <keys...> [-p path]",
            description: "remove keys or indexes from the target container",
            run: del_key,
        },
        CommandSpec {
            name: "del-val",
            aliases: &[],
            usage: "del-val <values...> [-p path] [-r]",
            description: "remove members equal to the values; -r recurses, . nulls the target",
            run: del_val,
        },
        CommandSpec {
            name: "literal",
            aliases: &[],
            usage: "literal <on|off>",
            description: "toggle smart casting of typed values",
            run: literal,
        },
        CommandSpec {
            name: "+l",
            aliases: &[],
            usage: "+l <command> [args...]",
            description: "run one command with the literal flag on",
            run: temporary_literal,
        },
        CommandSpec {
            name: "print",
            aliases: &[],
            usage: "print [vars...]",
            description: "show editor state (path, data, file, literal, modified)",
            run: print_state,
        },
        CommandSpec {
            name: "qf",
            aliases: &["quick-fill"],
            usage: "qf",
            description: "prompt a replacement for every leaf value",
            run: qf,
        },
        CommandSpec {
            name: "restart",
            aliases: &[],
            usage: "restart",
            description: "drop edits and re-read the source file",
            run: restart,
        },
    ])
}

fn ls(editor: &mut DataEditor, args: &[String], ctx: &mut EditorCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &[], &[])?;
    let path = editor.resolve_path(args.first().unwrap_or("."))?;
    let value = editor.get(&path)?;
    println!("{}", render_value(value, ctx.config.display.indent_width));
    Ok(())
}

fn cd(editor: &mut DataEditor, args: &[String], ctx: &mut EditorCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &[], &[])?;
    let input = args.first().ok_or_else(|| usage("cd <path>"))?;
    let path = editor.resolve_path(input)?;
    editor.set_cursor(path)?;
    if ctx.config.behavior.print_after_navigation {
        let value = editor.value_at_cursor()?;
        println!("{}", render_value(value, ctx.config.display.indent_width));
    }
    Ok(())
}

fn set(editor: &mut DataEditor, args: &[String], _ctx: &mut EditorCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &["-p"], &[])?;
    if args.positionals().is_empty() {
        return Err(usage("set <value> [-p path]"));
    }
    let path = editor.resolve_assign_path(args.option("-p").unwrap_or("."))?;
    let value = editor.interpret(&args.joined());
    editor.set_value(&path, value)?;
    Ok(())
}

/// Appends value by value; progress made before a failing item is kept,
/// but the failure still surfaces at the dispatch boundary. Tokens go
/// through the cast grammar regardless of the literal flag, which only
/// picks the mismatch fallback.
fn append(editor: &mut DataEditor, args: &[String], _ctx: &mut EditorCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &["-p"], &[])?;
    if args.positionals().is_empty() {
        return Err(usage("append <values...> [-p path]"));
    }
    let path = editor.resolve_path(args.option("-p").unwrap_or("."))?;
    let mut failed = None;
    for raw in args.positionals() {
        let value = smart_cast(raw);
        match editor.append(&path, value) {
            Ok(()) => {}
            Err(e) if failed.is_none() => failed = Some(e),
            Err(e) => eprintln!("{}", format!("Error: {e}").red()),
        }
    }
    match failed {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn cast(editor: &mut DataEditor, args: &[String], _ctx: &mut EditorCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &[], &[])?;
    let path = editor.resolve_path(args.first().unwrap_or("."))?;
    editor.cast_at(&path)?;
    Ok(())
}

fn uncast(editor: &mut DataEditor, args: &[String], _ctx: &mut EditorCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &[], &[])?;
    let path = editor.resolve_path(args.first().unwrap_or("."))?;
    editor.uncast_at(&path)?;
    Ok(())
}

fn del_key(editor: &mut DataEditor, args: &[String], _ctx: &mut EditorCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &["-p"], &[])?;
    if args.positionals().is_empty() {
        return Err(usage("del-key <keys...> [-p path]"));
    }
    let path = editor.resolve_path(args.option("-p").unwrap_or("."))?;
    for key in args.positionals() {
        // Keep going; each key reports for itself.
        if let Err(e) = editor.delete_key(&path, key) {
            eprintln!("{}", format!("Error: {e}").red());
        }
    }
    Ok(())
}

fn del_val(editor: &mut DataEditor, args: &[String], _ctx: &mut EditorCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &["-p"], &["-r"])?;
    if args.positionals().is_empty() {
        return Err(usage("del-val <values...> [-p path] [-r]"));
    }
    let recursive = args.has_switch("-r");
    let path = editor.resolve_path(args.option("-p").unwrap_or("."))?;
    for raw in args.positionals() {
        if raw == "." {
            editor.set_value(&path, Value::Null)?;
            continue;
        }
        let needle = editor.interpret(raw);
        let removed = editor.delete_value(&path, &needle, recursive)?;
        if removed == 0 {
            println!("{}", format!("Could not delete {raw}.").yellow());
        }
    }
    Ok(())
}

fn literal(editor: &mut DataEditor, args: &[String], _ctx: &mut EditorCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &[], &[])?;
    match args.first() {
        Some("on") => {
            editor.set_literal(true);
            println!("Literal mode on.");
            Ok(())
        }
        Some("off") => {
            editor.set_literal(false);
            println!("Literal mode off.");
            Ok(())
        }
        _ => Err(usage("literal <on|off>")),
    }
}

/// Runs another editor command with the literal flag forced on, restoring
/// the old setting afterwards, error or not.
fn temporary_literal(editor: &mut DataEditor, args: &[String], ctx: &mut EditorCtx) -> Result<()> {
    let Some((name, rest)) = args.split_first() else {
        return Err(usage("+l <command> [args...]"));
    };
    let Some(spec) = ctx.commands.find(name) else {
        return Err(CommandError::UnknownCommand(name.clone()).into());
    };
    let run = spec.run;
    let previous = editor.literal();
    editor.set_literal(true);
    let result = run(editor, rest, ctx);
    editor.set_literal(previous);
    result
}

fn print_state(editor: &mut DataEditor, args: &[String], ctx: &mut EditorCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &[], &[])?;
    if args.positionals().is_empty() {
        println!("Available: path, data, file, literal, modified");
        return Ok(());
    }
    for var in args.positionals() {
        match var.as_str() {
            "path" => println!("path: {}", editor.cursor()),
            "data" => println!("{}", render_value(editor.data(), ctx.config.display.indent_width)),
            "file" => match editor.source() {
                Some(path) => println!("file: {}", path.display()),
                None => println!("file: [blank]"),
            },
            "literal" => println!("literal: {}", editor.literal()),
            "modified" => println!("modified: {}", editor.is_modified()),
            other => println!("{}", format!("Variable not found: {other}").yellow()),
        }
    }
    Ok(())
}

fn qf(editor: &mut DataEditor, _args: &[String], ctx: &mut EditorCtx) -> Result<()> {
    let filled = quick_fill::fill_leaves(editor, ctx.prompter)?;
    println!("Filled {filled} values.");
    Ok(())
}

fn restart(editor: &mut DataEditor, _args: &[String], ctx: &mut EditorCtx) -> Result<()> {
    editor.reload()?;
    let value = editor.value_at_cursor()?;
    println!("{}", render_value(value, ctx.config.display.indent_width));
    Ok(())
}
