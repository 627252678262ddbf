use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use decl::{LoadMode, MemberCommentPolicy};
use decl_config::{DeclConfig, OutputFormat};

/// Top-level CLI parser for the `decl` binary.
#[derive(Debug, Parser)]
#[command(
    name = "decl",
    version,
    about = "Print a Go package's declarations with their comments"
)]
pub struct Cli {
    /// Package directory or single .go file
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Which declarations to print
    #[arg(long, value_enum, default_value = "declarations")]
    pub view: View,

    /// How far to load: parse, parse-imports, type-check
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Look member comments up by position instead of aligning them
    #[arg(long)]
    pub keyed: bool,

    /// Print in source order
    #[arg(long)]
    pub sorted: bool,

    /// Include _test.go files
    #[arg(long)]
    pub include_tests: bool,

    /// Fail on any type resolution diagnostic
    #[arg(long)]
    pub strict: bool,

    /// Output format: text, json, raw
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Only exported declarations
    #[arg(short, long)]
    pub exported: bool,

    /// Only declarations with comments
    #[arg(short, long)]
    pub commented: bool,

    /// Collect `key=value` tokens from comment lines starting with PREFIX
    /// and keep only declarations that have one
    #[arg(short, long, value_name = "PREFIX")]
    pub directive: Option<String>,

    /// Quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum View {
    Definitions,
    Declarations,
    Types,
    Interfaces,
    Structs,
    Funcs,
    Vars,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ModeArg {
    Parse,
    ParseImports,
    TypeCheck,
}

impl From<ModeArg> for LoadMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Parse => Self::Parse,
            ModeArg::ParseImports => Self::ParseImports,
            ModeArg::TypeCheck => Self::TypeCheck,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum FormatArg {
    Text,
    Json,
    Raw,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
            FormatArg::Raw => Self::Raw,
        }
    }
}

impl Cli {
    /// Flags win over the loaded configuration; unset flags leave it alone.
    pub fn apply(&self, config: &mut DeclConfig) {
        if let Some(mode) = self.mode {
            config.load.mode = mode.into();
        }
        if self.keyed {
            config.load.member_comments = MemberCommentPolicy::Keyed;
        }
        config.load.sort_by_position |= self.sorted;
        config.load.include_tests |= self.include_tests;
        config.load.strict |= self.strict;
        if let Some(format) = self.format {
            config.output.format = format.into();
        }
        config.output.exported_only |= self.exported;
        config.output.commented_only |= self.commented;
    }

    /// Filter level used when `DECL_LOG` is unset.
    #[must_use]
    pub fn log_level<'a>(&self, config: &'a DeclConfig) -> &'a str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            &config.logging.level
        }
    }
}
