//! Line diffs between two renderings of a host file

use similar::{ChangeTag, TextDiff};

/// Lines of context around each hunk.
pub const DEFAULT_CONTEXT: usize = 3;

/// Result of comparing two texts line by line
#[derive(Debug, Clone, PartialEq)]
pub struct FileDiff {
    /// Unified diff text, empty when the texts are equal
    pub unified: String,
    pub inserted: usize,
    pub deleted: usize,
    /// Similarity ratio (0.0 to 1.0)
    pub similarity: f64,
}

impl FileDiff {
    /// Compare `old` and `new`, labelling the hunks with the two names.
    pub fn compute(old: &str, new: &str, old_name: &str, new_name: &str) -> Self {
        if old == new {
            return Self {
                unified: String::new(),
                inserted: 0,
                deleted: 0,
                similarity: 1.0,
            };
        }

        let text_diff = TextDiff::from_lines(old, new);
        let mut inserted = 0;
        let mut deleted = 0;
        for change in text_diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => inserted += 1,
                ChangeTag::Delete => deleted += 1,
                ChangeTag::Equal => {}
            }
        }

        let unified = text_diff
            .unified_diff()
            .context_radius(DEFAULT_CONTEXT)
            .header(old_name, new_name)
            .to_string();

        Self {
            unified,
            inserted,
            deleted,
            similarity: f64::from(text_diff.ratio()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.deleted == 0
    }
}
