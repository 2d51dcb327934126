use std::collections::{HashMap, HashSet};

use crate::error::CommandError;

/// Tokens after the command name, split into positionals, valued options
/// and bare switches. Anything not declared as an option or switch stays a
/// positional, so negative numbers and dashed values pass through intact.
#[derive(Debug, Default)]
pub struct CommandArgs {
    positionals: Vec<String>,
    options: HashMap<String, String>,
    switches: HashSet<String>,
}

impl CommandArgs {
    pub fn parse(
        tokens: &[String],
        valued: &[&str],
        switches: &[&str],
    ) -> Result<Self, CommandError> {
        let mut args = CommandArgs::default();
        let mut iter = tokens.iter();
        while let Some(token) = iter.next() {
            if valued.contains(&token.as_str()) {
                let value = iter
                    .next()
                    .ok_or_else(|| CommandError::Syntax(format!("{token} needs a value")))?;
                args.options.insert(token.clone(), value.clone());
            } else if switches.contains(&token.as_str()) {
                args.switches.insert(token.clone());
            } else {
                args.positionals.push(token.clone());
            }
        }
        Ok(args)
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    pub fn first(&self) -> Option<&str> {
        self.positionals.first().map(String::as_str)
    }

    /// All positionals joined with single spaces, for commands that take a
    /// free-form value.
    pub fn joined(&self) -> String {
        self.positionals.join(" ")
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    pub fn has_switch(&self, name: &str) -> bool {
        self.switches.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.positionals.is_empty() && self.options.is_empty() && self.switches.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn splits_options_switches_and_positionals() {
        let args =
            CommandArgs::parse(&tokens(&["10", "-p", "a/b", "-r", "-5"]), &["-p"], &["-r"])
                .unwrap();
        assert_eq!(args.positionals(), ["10", "-5"]);
        assert_eq!(args.option("-p"), Some("a/b"));
        assert!(args.has_switch("-r"));
    }

    #[test]
    fn missing_option_value_is_a_syntax_error() {
        let err = CommandArgs::parse(&tokens(&["-p"]), &["-p"], &[]).unwrap_err();
        assert!(matches!(err, CommandError::Syntax(_)));
    }

    #[test]
    fn undeclared_dashes_stay_positional() {
        let args = CommandArgs::parse(&tokens(&["-1", "-x"]), &[], &[]).unwrap();
        assert_eq!(args.positionals(), ["-1", "-x"]);
    }
}
