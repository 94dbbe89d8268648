//! Source locations.

use crate::{Name, StringInterner};
use std::fmt;

/// Source location of a node: file and 1-based line.
///
/// Set once when the node is built and only read for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    pub file: Name,
    pub line: u32,
}

impl Location {
    /// Location for nodes synthesized by the engine itself.
    pub const UNKNOWN: Location = Location {
        file: Name::EMPTY,
        line: 0,
    };

    #[inline]
    pub const fn new(file: Name, line: u32) -> Self {
        Location { file, line }
    }

    /// Render as `file:line` using the interner that owns `file`.
    pub fn display(self, interner: &StringInterner) -> String {
        let file = interner.lookup(self.file);
        if file.is_empty() {
            format!("<unknown>:{}", self.line)
        } else {
            format!("{file}:{}", self.line)
        }
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.file, self.line)
    }
}
