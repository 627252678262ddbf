//! ast-grep wrapper for Go sources and per-file line tables.

use ast_grep_core::Node;
use ast_grep_core::tree_sitter::StrDoc;
use ast_grep_language::SupportLang;

use crate::position::{FileId, Location};
use crate::syntax::{self, is_kind};

/// The concrete AST tree type returned by [`parse_source`].
pub type AstTree = ast_grep_core::AstGrep<StrDoc<SupportLang>>;

/// A node borrowed from an [`AstTree`].
pub type GoNode<'r> = Node<'r, StrDoc<SupportLang>>;

/// Parse Go source code into an ast-grep tree.
#[must_use]
pub fn parse_source(source: &str) -> AstTree {
    use ast_grep_language::LanguageExt;
    SupportLang::Go.ast_grep(source)
}

/// First `ERROR` node in document order, if the file failed to parse.
pub(crate) fn first_syntax_error<'r>(root: &GoNode<'r>) -> Option<GoNode<'r>> {
    root.dfs().find(|node| is_kind(node, "ERROR"))
}

/// Package name from the file's `package` clause.
pub(crate) fn package_name(root: &GoNode<'_>) -> Option<String> {
    let clause = root.children().find(|c| is_kind(c, syntax::PACKAGE_CLAUSE))?;
    clause
        .children()
        .find(|c| is_kind(c, syntax::PACKAGE_IDENTIFIER))
        .map(|ident| ident.text().to_string())
}

/// One loaded Go source file.
#[derive(Debug, Clone)]
pub struct SourceFile {
    id: FileId,
    name: String,
    text: String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    pub(crate) fn new(id: FileId, name: String, text: String) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            id,
            name,
            text,
            line_starts,
        }
    }

    #[must_use]
    pub const fn id(&self) -> FileId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Resolve a byte offset to a 1-based line and byte column.
    #[must_use]
    pub fn location(&self, offset: u32) -> Location {
        let offset = offset as usize;
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let start = self.line_starts.get(line).copied().unwrap_or(0);
        Location {
            file: self.name.clone(),
            line: line + 1,
            column: offset.saturating_sub(start) + 1,
        }
    }
}
