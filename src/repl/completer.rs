use reedline::{Completer, Span, Suggestion};

/// Completes the command word (the first token of the line) against every
/// name the three registries know. Arguments are left alone; paths inside
/// trees are too dynamic to guess cheaply.
pub struct CommandCompleter {
    names: Vec<&'static str>,
}

impl CommandCompleter {
    pub fn new(names: Vec<&'static str>) -> Self {
        CommandCompleter { names }
    }
}

impl Completer for CommandCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        let input = &line[..pos];
        if input.contains(char::is_whitespace) {
            return Vec::new();
        }
        self.names
            .iter()
            .filter(|name| name.starts_with(input) && name.len() > input.len())
            .map(|name| Suggestion {
                value: name.to_string(),
                description: None,
                extra: None,
                span: Span { start: 0, end: pos },
                style: None,
                append_whitespace: true,
            })
            .collect()
    }
}
