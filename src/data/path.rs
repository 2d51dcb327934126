use std::fmt;

/// A slash-separated path into a nested data tree.
///
/// Segments are kept as raw strings; whether a segment acts as a mapping key
/// or a sequence index is decided at access time against the value it
/// addresses. `..` segments survive parsing and are collapsed by `join`,
/// single `.` segments are dropped the way filesystem paths drop them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataPath {
    segments: Vec<String>,
    absolute: bool,
}

impl DataPath {
    /// The tree root (also what an empty or `.` input parses to, minus the
    /// absolute flag).
    pub fn root() -> Self {
        DataPath {
            segments: Vec::new(),
            absolute: true,
        }
    }

    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        let absolute = trimmed.starts_with('/');
        let segments = trimmed
            .split('/')
            .filter(|s| !s.is_empty() && *s != ".")
            .map(str::to_string)
            .collect();
        DataPath { segments, absolute }
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DataPath {
            segments: segments.into_iter().map(Into::into).collect(),
            absolute: false,
        }
    }

    /// Empty relative path: the `.` / `""` input, meaning "where you are".
    pub fn is_current(&self) -> bool {
        !self.absolute && self.segments.is_empty()
    }

    /// The bare `/` input, meaning the tree root.
    pub fn is_root(&self) -> bool {
        self.absolute && self.segments.is_empty()
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    /// The path with its last segment removed. The parent of an empty path
    /// is the empty path.
    pub fn parent(&self) -> DataPath {
        let mut parent = self.clone();
        parent.pop();
        parent
    }

    /// Appends `other` to this path, collapsing `..` segments as it goes.
    /// An absolute `other` restarts from the root. Popping past the root is
    /// a no-op. The result is a normalized cursor path (relative, no dots).
    pub fn join(&self, other: &DataPath) -> DataPath {
        let mut segments = if other.absolute {
            Vec::new()
        } else {
            self.segments.clone()
        };
        for segment in &other.segments {
            if segment == ".." {
                segments.pop();
            } else {
                segments.push(segment.clone());
            }
        }
        DataPath {
            segments,
            absolute: false,
        }
    }
}

impl fmt::Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "{}", if self.absolute { "/" } else { "." });
        }
        if self.absolute {
            write!(f, "/")?;
        }
        write!(f, "{}", self.segments.join("/"))
    }
}
