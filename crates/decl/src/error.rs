//! Error types for decl.

use std::path::PathBuf;

/// Errors raised while loading a package or querying its declarations.
///
/// Missing comments are never an error: every lookup degrades to an empty
/// [`Comments`](crate::Comments) instead.
#[derive(Debug, thiserror::Error)]
pub enum DeclError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No Go source files found at {}", path.display())]
    NoPackage { path: PathBuf },

    #[error("Expected 1 package at {}, found {}: {}", path.display(), names.len(), names.join(", "))]
    MultiplePackages { path: PathBuf, names: Vec<String> },

    #[error("Missing package clause in {file}")]
    MissingPackageClause { file: String },

    #[error("Syntax error in {file} at {line}:{column}")]
    Syntax {
        file: String,
        line: usize,
        column: usize,
    },

    #[error("Type checking reported {count} diagnostic(s), first: {first}")]
    TypeCheck { count: usize, first: String },

    #[error("Invalid symbol kind for '{name}': expected {expected}, found {actual}")]
    InvalidSymbolKind {
        name: String,
        expected: &'static str,
        actual: String,
    },

    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: isize, len: usize },
}

impl DeclError {
    /// Whether this error was raised while loading a package, as opposed to
    /// a query against an already loaded module.
    #[must_use]
    pub const fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::Io { .. }
                | Self::NoPackage { .. }
                | Self::MultiplePackages { .. }
                | Self::MissingPackageClause { .. }
                | Self::Syntax { .. }
                | Self::TypeCheck { .. }
        )
    }
}
