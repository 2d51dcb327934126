//! Commands available while the file browser has focus.
//!
//! These are thin wrappers over `shell_ops`; per-item failures are
//! reported and the loop moves on, so one bad path never aborts a batch.

use std::path::Path;

use anyhow::Result;
use crossterm::style::Stylize;

use crate::data::template::template_of;
use crate::display::{human_size, styled_table};
use crate::formats;
use crate::shell_ops;
use crate::widgets::file_browser::FileBrowser;

use super::{usage, BrowserCommand, CommandArgs, CommandCtx, CommandRegistry, CommandSpec};

pub fn registry() -> CommandRegistry<BrowserCommand> {
    CommandRegistry::new(vec![
        CommandSpec {
            name: "ls",
            aliases: &["list"],
            usage: "ls [paths...]",
            description: "list directory contents",
            run: ls,
        },
        CommandSpec {
            name: "cd",
            aliases: &[],
            usage: "cd <dir>",
            description: "change the browser directory",
            run: cd,
        },
        CommandSpec {
            name: "pwd",
            aliases: &[],
            usage: "pwd",
            description: "print the browser directory",
            run: pwd,
        },
        CommandSpec {
            name: "copy",
            aliases: &["cp"],
            usage: "copy <src> <dests...>",
            description: "copy a file or directory to each destination",
            run: copy,
        },
        CommandSpec {
            name: "mv",
            aliases: &["move"],
            usage: "mv <src> <dests...>",
            description: "move to the first destination, copy to the rest",
            run: mv,
        },
        CommandSpec {
            name: "del",
            aliases: &["rm"],
            usage: "del <paths...>",
            description: "delete files or directories",
            run: del,
        },
        CommandSpec {
            name: "mk",
            aliases: &["make"],
            usage: "mk <files...>",
            description: "create empty files",
            run: mk,
        },
        CommandSpec {
            name: "mkdir",
            aliases: &[],
            usage: "mkdir <dirs...>",
            description: "create directories",
            run: mkdir,
        },
        CommandSpec {
            name: "xt",
            aliases: &["extract-template"],
            usage: "xt <src> <dest>",
            description: "write a template of a data file, every leaf a placeholder",
            run: xt,
        },
    ])
}

fn report(err: &anyhow::Error) {
    eprintln!("{}", format!("Error: {err}").red());
}

fn ls(browser: &mut FileBrowser, args: &[String], ctx: &mut CommandCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &[], &[])?;
    let targets: Vec<String> = if args.positionals().is_empty() {
        vec![".".to_string()]
    } else {
        args.positionals().to_vec()
    };
    for (i, target) in targets.iter().enumerate() {
        let dir = browser.resolve(target);
        match shell_ops::list_dir(&dir) {
            Ok(entries) => {
                if targets.len() > 1 {
                    if i > 0 {
                        println!();
                    }
                    println!("{}", dir.display().to_string().cyan());
                }
                let mut table = styled_table(&["name", "type", "size"]);
                for entry in entries {
                    if !ctx.config.display.show_hidden && entry.name.starts_with('.') {
                        continue;
                    }
                    let (kind, size) = if entry.is_dir {
                        ("dir", String::new())
                    } else {
                        ("file", human_size(entry.size))
                    };
                    table.add_row(vec![entry.name, kind.to_string(), size]);
                }
                println!("{table}");
            }
            Err(e) => report(&e),
        }
    }
    Ok(())
}

fn cd(browser: &mut FileBrowser, args: &[String], _ctx: &mut CommandCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &[], &[])?;
    let target = args.first().unwrap_or("..");
    browser.change_dir(target)?;
    Ok(())
}

fn pwd(browser: &mut FileBrowser, args: &[String], _ctx: &mut CommandCtx) -> Result<()> {
    CommandArgs::parse(args, &[], &[])?;
    println!("{}", browser.cwd().display());
    Ok(())
}

/// A destination's parent may not exist yet; ask (or just create it when
/// confirmation is off) before the copy or move runs into it.
fn ensure_parent_dir(dest: &Path, ctx: &mut CommandCtx) -> Result<bool> {
    let Some(parent) = dest.parent() else {
        return Ok(true);
    };
    if parent.as_os_str().is_empty() || parent.exists() {
        return Ok(true);
    }
    if ctx.config.behavior.confirm_directory_create {
        let question = format!("{} does not exist. Create it?", parent.display());
        if !ctx.prompter.confirm(&question)? {
            return Ok(false);
        }
    }
    shell_ops::create_dir(parent)?;
    Ok(true)
}

fn copy(browser: &mut FileBrowser, args: &[String], ctx: &mut CommandCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &[], &[])?;
    let [src, dests @ ..] = args.positionals() else {
        return Err(usage("copy <src> <dests...>"));
    };
    if dests.is_empty() {
        return Err(usage("copy <src> <dests...>"));
    }
    let src = browser.resolve(src);
    for dest in dests {
        let dest = browser.resolve(dest);
        match ensure_parent_dir(&dest, ctx) {
            Ok(true) => {
                if let Err(e) = shell_ops::copy_any(&src, &dest) {
                    report(&e);
                }
            }
            Ok(false) => {}
            Err(e) => report(&e),
        }
    }
    Ok(())
}

fn mv(browser: &mut FileBrowser, args: &[String], ctx: &mut CommandCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &[], &[])?;
    let [src, target, extra @ ..] = args.positionals() else {
        return Err(usage("mv <src> <dests...>"));
    };
    let src = browser.resolve(src);
    // Extra destinations get copies while the source still exists.
    for dest in extra {
        let dest = browser.resolve(dest);
        match ensure_parent_dir(&dest, ctx) {
            Ok(true) => {
                if let Err(e) = shell_ops::copy_any(&src, &dest) {
                    report(&e);
                }
            }
            Ok(false) => {}
            Err(e) => report(&e),
        }
    }
    let target = browser.resolve(target);
    if ensure_parent_dir(&target, ctx)? {
        shell_ops::move_any(&src, &target)?;
    }
    Ok(())
}

fn del(browser: &mut FileBrowser, args: &[String], _ctx: &mut CommandCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &[], &[])?;
    if args.positionals().is_empty() {
        return Err(usage("del <paths...>"));
    }
    for path in args.positionals() {
        if let Err(e) = shell_ops::delete_any(&browser.resolve(path)) {
            report(&e);
        }
    }
    Ok(())
}

fn mk(browser: &mut FileBrowser, args: &[String], _ctx: &mut CommandCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &[], &[])?;
    if args.positionals().is_empty() {
        return Err(usage("mk <files...>"));
    }
    for file in args.positionals() {
        if let Err(e) = shell_ops::create_file(&browser.resolve(file)) {
            report(&e);
        }
    }
    Ok(())
}

fn mkdir(browser: &mut FileBrowser, args: &[String], _ctx: &mut CommandCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &[], &[])?;
    if args.positionals().is_empty() {
        return Err(usage("mkdir <dirs...>"));
    }
    for dir in args.positionals() {
        if let Err(e) = shell_ops::create_dir(&browser.resolve(dir)) {
            report(&e);
        }
    }
    Ok(())
}

fn xt(browser: &mut FileBrowser, args: &[String], ctx: &mut CommandCtx) -> Result<()> {
    let args = CommandArgs::parse(args, &[], &[])?;
    let [src, dest] = args.positionals() else {
        return Err(usage("xt <src> <dest>"));
    };
    let data = formats::read_file(&browser.resolve(src))?;
    let dest = browser.resolve(dest);
    if ensure_parent_dir(&dest, ctx)? {
        formats::write_file(&dest, &template_of(&data))?;
        println!("Template written to {}.", dest.display());
    }
    Ok(())
}
