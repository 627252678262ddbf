//! Output configuration for the `decl` binary.

use serde::{Deserialize, Serialize};

/// How declarations are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One declaration per block: description, location, comment lines.
    #[default]
    Text,
    /// Pretty-printed JSON array.
    Json,
    /// Compact JSON, one line.
    Raw,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Only print exported declarations.
    #[serde(default)]
    pub exported_only: bool,

    /// Skip declarations without comments.
    #[serde(default)]
    pub commented_only: bool,
}
