//! Categorised views over a module's declarations.
//!
//! Every view is a fresh, lazy scan of the symbol table: nothing is cached
//! between calls and dropping the iterator stops the scan. Symbols come in
//! the table's scan order, which is document order when the module was
//! loaded with `sort_by_position`.

use crate::classify::{Decl, DeclKind, Func, Interface, NamedType, Struct, Var, checked};
use crate::comments::Comments;
use crate::error::DeclError;
use crate::module::Module;
use crate::types::{Symbol, SymbolId};

impl Module {
    /// Every definition with its comments.
    pub fn definitions(&self) -> impl Iterator<Item = (&Symbol, Comments)> + '_ {
        self.symbols()
            .iter()
            .filter(|s| s.is_definition())
            .map(|s| (s, self.comments(s.id())))
    }

    /// Every classified declaration with its comments.
    pub fn declarations(&self) -> impl Iterator<Item = (Decl<'_>, Comments)> + '_ {
        self.symbols()
            .iter()
            .filter_map(|s| self.classify(s.id()))
            .map(|decl| {
                let comments = self.comments(decl.symbol().id());
                (decl, comments)
            })
    }

    /// Defined types and aliases, structs and interfaces included.
    pub fn named_types(&self) -> impl Iterator<Item = (NamedType<'_>, Comments)> + '_ {
        self.view(
            &[DeclKind::NamedType, DeclKind::Struct, DeclKind::Interface],
            NamedType::new,
        )
    }

    pub fn interfaces(&self) -> impl Iterator<Item = (Interface<'_>, Comments)> + '_ {
        self.view(&[DeclKind::Interface], Interface::new)
    }

    pub fn structs(&self) -> impl Iterator<Item = (Struct<'_>, Comments)> + '_ {
        self.view(&[DeclKind::Struct], Struct::new)
    }

    /// Functions, methods and interface methods; filter on
    /// [`Func::owner`] to narrow down.
    pub fn funcs(&self) -> impl Iterator<Item = (Func<'_>, Comments)> + '_ {
        self.view(&[DeclKind::Func], Func::new)
    }

    /// Named variables and constants, fields and parameters included.
    pub fn vars(&self) -> impl Iterator<Item = (Var<'_>, Comments)> + '_ {
        self.view(&[DeclKind::Var], Var::new)
    }

    fn view<'m, T: 'm>(
        &'m self,
        kinds: &'static [DeclKind],
        wrap: fn(&'m Self, SymbolId) -> Result<T, DeclError>,
    ) -> impl Iterator<Item = (T, Comments)> + 'm {
        self.symbols()
            .iter()
            .filter(move |s| self.decl_kind(s.id()).is_some_and(|k| kinds.contains(&k)))
            .filter_map(move |s| {
                let decl = checked(wrap(self, s.id()))?;
                Some((decl, self.comments(s.id())))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Declaration, FuncOwner};
    use crate::config::LoadConfig;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "package p

// Book doc.
type Book struct {
	Name string
}

// Reader doc.
type Reader interface {
	Read() error
}

type ID int

// New makes a book.
func New() *Book { return nil }

// A and B doc.
var A, B int
";

    fn module() -> Module {
        Module::load_sources(&[("p.go", SOURCE)], &LoadConfig::default().sorted())
            .unwrap_or_else(|e| panic!("should load: {e}"))
    }

    #[test]
    fn named_types_include_structs_and_interfaces() {
        let module = module();
        let names: Vec<&str> = module.named_types().map(|(t, _)| t.name()).collect();
        assert_eq!(names, vec!["Book", "Reader", "ID"]);
    }

    #[test]
    fn kind_views_filter_their_category() {
        let module = module();
        let structs: Vec<(&str, Comments)> = module.structs().map(|(s, c)| (s.name(), c)).collect();
        assert_eq!(structs, vec![("Book", Comments::new(vec!["// Book doc.".to_string()]))]);
        let interfaces: Vec<&str> = module.interfaces().map(|(i, _)| i.name()).collect();
        assert_eq!(interfaces, vec!["Reader"]);
        let package_funcs: Vec<&str> = module
            .funcs()
            .filter(|(f, _)| f.owner() == FuncOwner::Package)
            .map(|(f, _)| f.name())
            .collect();
        assert_eq!(package_funcs, vec!["New"]);
        assert_eq!(module.funcs().count(), 2, "interface methods are funcs too");
    }

    #[test]
    fn multi_name_vars_have_no_comments() {
        let module = module();
        let vars: Vec<(&str, bool)> = module
            .vars()
            .filter(|(v, _)| !v.is_field())
            .map(|(v, c)| (v.name(), c.is_empty()))
            .collect();
        assert_eq!(vars, vec![("A", true), ("B", true)]);
    }

    #[test]
    fn views_restart_and_stop_early() {
        let module = module();
        let first = module.declarations().next().map(|(d, _)| d.name());
        assert_eq!(first, Some("Book"));
        let again = module.declarations().next().map(|(d, _)| d.name());
        assert_eq!(again, first);
        assert_eq!(module.definitions().take(2).count(), 2);
    }

    #[test]
    fn parse_only_module_has_empty_views() {
        let module = Module::load_sources(
            &[("p.go", SOURCE)],
            &LoadConfig::default().with_mode(crate::config::LoadMode::Parse),
        )
        .unwrap_or_else(|e| panic!("should load: {e}"));
        assert_eq!(module.definitions().count(), 0);
        assert_eq!(module.structs().count(), 0);
    }
}
