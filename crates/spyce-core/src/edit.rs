//! Edit records returned by document mutations.

use std::ops::Range;

/// The kind of edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// A new jar was added.
    Insert,
    /// An existing jar was rewritten.
    Replace,
    /// A jar, or only its payload, was removed.
    Delete,
    /// The requested block was already in place.
    Unchanged,
}

/// What a mutation did to the line buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub kind: EditKind,
    /// Jar the edit applies to.
    pub name: String,
    /// Lines covered by the jar after the edit (the removal point for deletes).
    pub lines: Range<usize>,
    /// Net change in buffer length.
    pub delta: isize,
}

impl Edit {
    pub fn is_change(&self) -> bool {
        self.kind != EditKind::Unchanged
    }
}
