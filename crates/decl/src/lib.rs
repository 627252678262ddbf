//! # decl
//!
//! Declaration-comment correlator for Go packages.
//!
//! Loads a Go package, records the comments attached to every declared
//! name, resolves declarations into a symbol table, and exposes categorised
//! views (types, interfaces, structs, functions, variables) where each
//! declaration comes paired with its comment lines.
//!
//! - [`Module`]: a loaded package and the entry point for every query
//! - [`Comments`]: comment lines with prefix-directive helpers
//! - [`Decl`] and the typed wrappers [`NamedType`], [`Interface`],
//!   [`Struct`], [`Func`], [`Var`]
//!
//! ```no_run
//! use decl::{Declaration, LoadConfig, Module, prefix};
//!
//! let module = Module::load("./shelf", &LoadConfig::default())?;
//! for (st, comments) in module.structs() {
//!     if let Some(table) = comments.lookup(prefix("// +table=")) {
//!         println!("{} -> {table}", st.name());
//!     }
//! }
//! # Ok::<(), decl::DeclError>(())
//! ```

pub(crate) mod check;
pub mod classify;
pub mod comments;
pub mod config;
pub mod error;
pub mod index;
pub mod module;
pub mod parser;
pub mod position;
pub(crate) mod syntax;
pub mod types;
mod views;

pub use check::{Diagnostic, Import};
pub use classify::{
    Decl, DeclKind, Declaration, Field, Func, FuncOwner, Interface, NamedType, Struct, StructTag,
    Var, VarRole,
};
pub use comments::{CommentGroup, CommentStore, Comments, prefix};
pub use config::{LoadConfig, LoadMode, MemberCommentPolicy};
pub use error::DeclError;
pub use index::PositionIndex;
pub use module::Module;
pub use parser::{AstTree, GoNode, SourceFile, parse_source};
pub use position::{FileId, Location, Pos};
pub use types::{
    Basic, ChanDir, InterfaceType, Named, ObjectKind, Owner, Signature, StructType, Symbol,
    SymbolId, SymbolTable, Term, Type, TypeId, TypeTable,
};
