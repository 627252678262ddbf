//! Declaration classifier: decides what a symbol declares and wraps it in
//! the matching typed view.
//!
//! Precedence, first match wins:
//!
//! 1. functions, methods and interface methods → [`Func`]
//! 2. defined types with an interface underlying type → [`Interface`]
//! 3. defined types with a struct underlying type → [`Struct`]
//! 4. any other defined type, or an alias → [`NamedType`]
//! 5. named variables and constants (fields and parameters too) → [`Var`]
//!
//! Everything else (imports, type parameters, unnamed parameters) is not
//! classified.

mod func;
mod interface;
mod named;
mod structs;
mod var;

use std::fmt;

use serde::Serialize;
use tracing::{debug, error, trace};

pub use func::{Func, FuncOwner};
pub use interface::Interface;
pub use named::NamedType;
pub use structs::{Field, Struct, StructTag};
pub use var::{Var, VarRole};

use crate::comments::Comments;
use crate::config::MemberCommentPolicy;
use crate::error::DeclError;
use crate::module::Module;
use crate::position::Pos;
use crate::types::{ObjectKind, Owner, Symbol, SymbolId, Type};

/// The category a declaration falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    NamedType,
    Interface,
    Struct,
    Func,
    Var,
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NamedType => "type",
            Self::Interface => "interface",
            Self::Struct => "struct",
            Self::Func => "func",
            Self::Var => "var",
        };
        f.write_str(s)
    }
}

/// Surface shared by every classified declaration.
pub trait Declaration<'m> {
    fn module(&self) -> &'m Module;

    fn symbol(&self) -> &'m Symbol;

    fn id(&self) -> SymbolId {
        self.symbol().id()
    }

    fn name(&self) -> &'m str {
        self.symbol().name()
    }

    fn pos(&self) -> Pos {
        self.symbol().pos()
    }

    fn exported(&self) -> bool {
        self.symbol().exported()
    }

    /// Comment lines recorded at the declared name.
    fn comments(&self) -> Comments {
        self.module().comments(self.id())
    }

    /// One-line Go-like description, e.g. `func (*Book) Title() string`.
    fn describe(&self) -> String {
        self.module().describe(self.id())
    }
}

macro_rules! declaration {
    ($($wrapper:ident),* $(,)?) => {
        $(
            impl<'m> $crate::classify::Declaration<'m> for $wrapper<'m> {
                fn module(&self) -> &'m $crate::module::Module {
                    self.module
                }

                fn symbol(&self) -> &'m $crate::types::Symbol {
                    self.symbol
                }
            }

            impl std::fmt::Display for $wrapper<'_> {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    use $crate::classify::Declaration;
                    f.write_str(&self.describe())
                }
            }
        )*
    };
}

pub(crate) use declaration;

/// A classified declaration.
#[derive(Debug, Clone)]
pub enum Decl<'m> {
    NamedType(NamedType<'m>),
    Interface(Interface<'m>),
    Struct(Struct<'m>),
    Func(Func<'m>),
    Var(Var<'m>),
}

impl<'m> Decl<'m> {
    #[must_use]
    pub const fn kind(&self) -> DeclKind {
        match self {
            Self::NamedType(_) => DeclKind::NamedType,
            Self::Interface(_) => DeclKind::Interface,
            Self::Struct(_) => DeclKind::Struct,
            Self::Func(_) => DeclKind::Func,
            Self::Var(_) => DeclKind::Var,
        }
    }

    #[must_use]
    pub fn as_declaration(&self) -> &dyn Declaration<'m> {
        match self {
            Self::NamedType(d) => d,
            Self::Interface(d) => d,
            Self::Struct(d) => d,
            Self::Func(d) => d,
            Self::Var(d) => d,
        }
    }

    #[must_use]
    pub fn symbol(&self) -> &'m Symbol {
        self.as_declaration().symbol()
    }

    #[must_use]
    pub fn name(&self) -> &'m str {
        self.as_declaration().name()
    }

    #[must_use]
    pub fn comments(&self) -> Comments {
        self.as_declaration().comments()
    }
}

impl fmt::Display for Decl<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_declaration().describe())
    }
}

// ── Classification ────────────────────────────────────────────────

impl Module {
    /// Category of the symbol `id`, without building its wrapper.
    #[must_use]
    pub fn decl_kind(&self, id: SymbolId) -> Option<DeclKind> {
        let symbol = self.symbol(id)?;
        match symbol.kind() {
            ObjectKind::Func => Some(DeclKind::Func),
            ObjectKind::TypeName if symbol.owner() == Owner::TypeParam => None,
            ObjectKind::TypeName => match self.ty(symbol.ty()) {
                Type::Named(named) => Some(match self.ty(named.underlying) {
                    Type::Interface(_) => DeclKind::Interface,
                    Type::Struct(_) => DeclKind::Struct,
                    _ => DeclKind::NamedType,
                }),
                Type::Alias { .. } => Some(DeclKind::NamedType),
                _ => None,
            },
            ObjectKind::Var | ObjectKind::Const if symbol.is_definition() => Some(DeclKind::Var),
            ObjectKind::Var | ObjectKind::Const | ObjectKind::PkgName => None,
        }
    }

    /// Classify `id` and build its wrapper. `Ok(None)` for symbols that
    /// are not classified.
    ///
    /// # Errors
    ///
    /// [`DeclError::InvalidSymbolKind`] when a wrapper rejects the symbol
    /// the precedence rules picked for it.
    pub fn try_classify(&self, id: SymbolId) -> Result<Option<Decl<'_>>, DeclError> {
        let Some(kind) = self.decl_kind(id) else {
            if let Some(symbol) = self.symbol(id) {
                trace!(name = symbol.name(), kind = %symbol.kind(), "not classified");
            }
            return Ok(None);
        };
        let decl = match kind {
            DeclKind::NamedType => Decl::NamedType(NamedType::new(self, id)?),
            DeclKind::Interface => Decl::Interface(Interface::new(self, id)?),
            DeclKind::Struct => Decl::Struct(Struct::new(self, id)?),
            DeclKind::Func => Decl::Func(Func::new(self, id)?),
            DeclKind::Var => Decl::Var(Var::new(self, id)?),
        };
        Ok(Some(decl))
    }

    /// [`Module::try_classify`], logging invariant violations instead of
    /// returning them.
    #[must_use]
    pub fn classify(&self, id: SymbolId) -> Option<Decl<'_>> {
        checked(self.try_classify(id)).flatten()
    }
}

/// Log a classifier invariant violation and drop the result.
pub(crate) fn checked<T>(result: Result<T, DeclError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            error!(%err, "declaration classifier invariant violated");
            None
        }
    }
}

/// Symbol `id`, or the error a wrapper reports for it.
pub(crate) fn expect_symbol<'m>(
    module: &'m Module,
    id: SymbolId,
    expected: &'static str,
) -> Result<&'m Symbol, DeclError> {
    module.symbol(id).ok_or_else(|| DeclError::InvalidSymbolKind {
        name: format!("#{}", id.index()),
        expected,
        actual: "unknown symbol".to_string(),
    })
}

pub(crate) fn invalid_kind(module: &Module, symbol: &Symbol, expected: &'static str) -> DeclError {
    DeclError::InvalidSymbolKind {
        name: symbol.name().to_string(),
        expected,
        actual: kind_label(module, symbol),
    }
}

/// What a symbol actually is, for error messages.
fn kind_label(module: &Module, symbol: &Symbol) -> String {
    match symbol.kind() {
        ObjectKind::TypeName => match module.ty(symbol.ty()) {
            Type::Named(named) => match module.ty(named.underlying) {
                Type::Interface(_) => "interface type",
                Type::Struct(_) => "struct type",
                _ => "defined type",
            },
            Type::Alias { .. } => "alias",
            Type::TypeParam { .. } => "type parameter",
            _ => "type",
        }
        .to_string(),
        ObjectKind::Var if !symbol.is_definition() => "unnamed var".to_string(),
        other => other.to_string(),
    }
}

/// Comments for each of `members`, by the module's member policy.
///
/// With [`MemberCommentPolicy::Aligned`] the non-empty comments of the
/// `declared` members are collected in declaration order and attached by
/// index only when their count equals `members.len()`. Any mismatch leaves
/// every member empty.
pub(crate) fn member_comments(
    module: &Module,
    declared: &[SymbolId],
    members: &[SymbolId],
) -> Vec<Comments> {
    match module.config().member_comments {
        MemberCommentPolicy::Keyed => members.iter().map(|m| module.comments(*m)).collect(),
        MemberCommentPolicy::Aligned => {
            let collected: Vec<Comments> = declared
                .iter()
                .map(|m| module.comments(*m))
                .filter(|c| !c.is_empty())
                .collect();
            if collected.len() == members.len() {
                collected
            } else {
                if !collected.is_empty() {
                    debug!(
                        collected = collected.len(),
                        members = members.len(),
                        "member comment count mismatch, dropping member comments"
                    );
                }
                vec![Comments::default(); members.len()]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadConfig;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "package p

import alias \"strings\"

type Shape interface {
	Area() float64
}

type Box struct {
	W, H int
}

type Celsius float64

type Names = []string

type List[T any] []T

func (b Box) Area(_ int) float64 { return 0 }

const Max = 10

var _ = alias.ToUpper
";

    fn module() -> Module {
        Module::load_sources(&[("p.go", SOURCE)], &LoadConfig::default())
            .unwrap_or_else(|e| panic!("should load: {e}"))
    }

    fn kind_of(module: &Module, name: &str) -> Option<DeclKind> {
        let symbol = module
            .symbols()
            .iter()
            .find(|s| s.name() == name)
            .unwrap_or_else(|| panic!("should find symbol '{name}'"));
        module.decl_kind(symbol.id())
    }

    #[test]
    fn precedence_picks_the_most_specific_kind() {
        let module = module();
        assert_eq!(kind_of(&module, "Shape"), Some(DeclKind::Interface));
        assert_eq!(kind_of(&module, "Box"), Some(DeclKind::Struct));
        assert_eq!(kind_of(&module, "Celsius"), Some(DeclKind::NamedType));
        assert_eq!(kind_of(&module, "Names"), Some(DeclKind::NamedType));
        assert_eq!(kind_of(&module, "List"), Some(DeclKind::NamedType));
        assert_eq!(kind_of(&module, "Area"), Some(DeclKind::Func));
        assert_eq!(kind_of(&module, "W"), Some(DeclKind::Var));
        assert_eq!(kind_of(&module, "Max"), Some(DeclKind::Var));
    }

    #[test]
    fn imports_and_type_params_are_not_classified() {
        let module = module();
        assert_eq!(kind_of(&module, "alias"), None);
        assert_eq!(kind_of(&module, "T"), None);
        let unnamed = module
            .symbols()
            .iter()
            .find(|s| !s.is_definition())
            .unwrap_or_else(|| panic!("should record the unnamed result"));
        assert_eq!(module.decl_kind(unnamed.id()), None);
        assert!(module.classify(unnamed.id()).is_none());
    }

    #[test]
    fn wrong_kind_constructor_fails() {
        let module = module();
        let max = module.lookup("Max").unwrap_or_else(|| panic!("should declare Max"));
        let err = Struct::new(&module, max.id())
            .err()
            .unwrap_or_else(|| panic!("a const is not a struct"));
        assert_eq!(
            err.to_string(),
            "Invalid symbol kind for 'Max': expected struct type, found const"
        );
        let shape = module.lookup("Shape").unwrap_or_else(|| panic!("should declare Shape"));
        let err = Func::new(&module, shape.id())
            .err()
            .unwrap_or_else(|| panic!("an interface is not a func"));
        assert!(matches!(
            err,
            DeclError::InvalidSymbolKind { ref actual, .. } if actual == "interface type"
        ));
    }

    #[test]
    fn classify_builds_the_matching_wrapper() {
        let module = module();
        let shape = module.lookup("Shape").unwrap_or_else(|| panic!("should declare Shape"));
        let decl = module
            .classify(shape.id())
            .unwrap_or_else(|| panic!("Shape should classify"));
        assert_eq!(decl.kind(), DeclKind::Interface);
        assert_eq!(decl.name(), "Shape");
        assert_eq!(decl.to_string(), "type Shape interface{Area() float64}");
    }
}
