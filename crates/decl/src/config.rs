//! Load configuration passed to [`Module::load`](crate::Module::load).

use serde::{Deserialize, Serialize};

/// How far loading goes past parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Syntax and comments only. No symbols, so every lookup is empty.
    Parse,
    /// Also record imports.
    ParseImports,
    /// Resolve every package-level declaration.
    #[default]
    TypeCheck,
}

/// How struct field and interface method comments are attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberCommentPolicy {
    /// Collect recorded member comments in declaration order and attach them
    /// index by index, only when their count equals the member count.
    /// Otherwise every member reports empty comments.
    #[default]
    Aligned,
    /// Look each member's comments up by its own position.
    Keyed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub mode: LoadMode,
    pub member_comments: MemberCommentPolicy,
    /// Sort the symbol scan order by position once at build, so views
    /// yield in document order.
    pub sort_by_position: bool,
    /// Include `_test.go` files when loading a directory.
    pub include_tests: bool,
    /// Fail the load on any type resolution diagnostic.
    pub strict: bool,
}

impl LoadConfig {
    #[must_use]
    pub const fn with_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub const fn with_member_comments(mut self, policy: MemberCommentPolicy) -> Self {
        self.member_comments = policy;
        self
    }

    #[must_use]
    pub const fn sorted(mut self) -> Self {
        self.sort_by_position = true;
        self
    }
}
