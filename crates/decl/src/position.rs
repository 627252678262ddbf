//! Source positions: the only key shared by comments and symbols.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a source file inside a [`Module`](crate::Module).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Byte offset of a declared identifier's first byte within one file.
///
/// Ordered by file, then offset, which is document order within a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    file: FileId,
    offset: u32,
}

impl Pos {
    #[must_use]
    pub const fn new(file: FileId, offset: u32) -> Self {
        Self { file, offset }
    }

    #[must_use]
    pub const fn file(self) -> FileId {
        self.file
    }

    #[must_use]
    pub const fn offset(self) -> u32 {
        self.offset
    }
}

/// Human-readable form of a [`Pos`]: file name plus 1-based line and column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
