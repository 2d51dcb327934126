use thiserror::Error;

/// Errors surfaced by commands and the data layer beneath them.
///
/// Every variant is recoverable: the REPL reports the message and keeps
/// running, a one-shot invocation maps it to a non-zero exit.
#[derive(Debug, Error)]
pub enum CommandError {
    /// A path segment that does not address anything in its container.
    #[error("invalid index {segment:?} in {container}")]
    InvalidIndex { segment: String, container: String },

    /// A path that resolves neither relative to the cursor nor from the root.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// An append between types with no combination rule.
    #[error("cannot append {value} to {target}")]
    Append { value: String, target: String },

    /// A file extension outside the supported set.
    #[error("unsupported format {extension:?} (supported: json, yaml, yml, toml)")]
    UnsupportedFormat { extension: String },

    /// A command name absent from both the global and active-widget tables.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A line the tokenizer or argument parser cannot make sense of.
    #[error("bad syntax: {0}")]
    Syntax(String),
}

impl CommandError {
    pub fn invalid_index(segment: &str, container: String) -> Self {
        Self::InvalidIndex {
            segment: segment.to_string(),
            container,
        }
    }
}
