use serde::{Deserialize, Serialize};

/// Snippet identifier, milliseconds since the Unix epoch at creation time
pub type SnippetId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub id: SnippetId,
    pub title: String,
    pub language: String,
    pub code: String,
}

/// Replacement values for an edit. A field that is empty after trimming
/// keeps the snippet's current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetUpdate {
    pub title: String,
    pub language: String,
    pub code: String,
}

impl Snippet {
    pub fn new(id: SnippetId, title: String, language: String, code: String) -> Self {
        Self {
            id,
            title,
            language,
            code,
        }
    }

    /// Applies the non-blank fields of `update`. Returns true if anything changed.
    pub fn apply(&mut self, update: SnippetUpdate) -> bool {
        let mut changed = false;
        for (field, value) in [
            (&mut self.title, update.title),
            (&mut self.language, update.language),
            (&mut self.code, update.code),
        ] {
            if !value.trim().is_empty() {
                changed |= *field != value;
                *field = value;
            }
        }
        changed
    }

    /// Case-insensitive substring match against title or language.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.language.to_lowercase().contains(needle)
    }

    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }
}

/// Parses user-entered id text. Anything that isn't an integer yields `None`,
/// which callers report the same way as an unknown id.
pub fn parse_id(input: &str) -> Option<SnippetId> {
    input.trim().parse().ok()
}
