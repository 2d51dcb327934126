use crossterm::style::Stylize;

/// One dispatchable command: its primary name, accepted aliases, a usage
/// line for help output, and the handler to run.
pub struct CommandSpec<F> {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub usage: &'static str,
    pub description: &'static str,
    pub run: F,
}

impl<F> CommandSpec<F> {
    pub fn matches(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }
}

/// A widget's command table. Built once at startup and owned by the
/// manager; lookups scan names and aliases.
pub struct CommandRegistry<F> {
    commands: Vec<CommandSpec<F>>,
}

impl<F> CommandRegistry<F> {
    pub fn new(commands: Vec<CommandSpec<F>>) -> Self {
        if cfg!(debug_assertions) {
            let mut seen = std::collections::HashSet::new();
            for spec in &commands {
                for name in std::iter::once(&spec.name).chain(spec.aliases) {
                    debug_assert!(seen.insert(*name), "duplicate command name {name}");
                }
            }
        }
        CommandRegistry { commands }
    }

    pub fn find(&self, name: &str) -> Option<&CommandSpec<F>> {
        self.commands.iter().find(|spec| spec.matches(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn specs(&self) -> &[CommandSpec<F>] {
        &self.commands
    }

    /// Every name and alias, for completion.
    pub fn all_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands
            .iter()
            .flat_map(|spec| std::iter::once(spec.name).chain(spec.aliases.iter().copied()))
    }

    pub fn print_help(&self, title: &str) {
        println!("{}", title.yellow());
        for spec in &self.commands {
            let aliases = if spec.aliases.is_empty() {
                String::new()
            } else {
                format!(" (aliases: {})", spec.aliases.join(", "))
            };
            // Pad before styling so the colour codes do not skew alignment.
            let usage = format!("{:<30}", spec.usage);
            println!("  {} {}{}", usage.green(), spec.description, aliases);
        }
    }
}
