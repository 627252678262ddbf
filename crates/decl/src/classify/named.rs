use super::{declaration, expect_symbol, invalid_kind};
use crate::error::DeclError;
use crate::module::Module;
use crate::types::{Named, ObjectKind, Symbol, SymbolId, Type, TypeId};

const EXPECTED: &str = "defined type or alias";

/// A defined type (`type Celsius float64`) or an alias (`type Names =
/// []string`).
#[derive(Debug, Clone, Copy)]
pub struct NamedType<'m> {
    module: &'m Module,
    symbol: &'m Symbol,
}

declaration!(NamedType);

impl<'m> NamedType<'m> {
    /// # Errors
    ///
    /// [`DeclError::InvalidSymbolKind`] unless `id` names a defined type
    /// or an alias.
    pub fn new(module: &'m Module, id: SymbolId) -> Result<Self, DeclError> {
        let symbol = expect_symbol(module, id, EXPECTED)?;
        let bound = matches!(
            module.ty(symbol.ty()),
            Type::Named(_) | Type::Alias { .. }
        );
        if symbol.kind() != ObjectKind::TypeName || !bound {
            return Err(invalid_kind(module, symbol, EXPECTED));
        }
        Ok(Self { module, symbol })
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.symbol.ty()
    }

    #[must_use]
    pub fn is_alias(&self) -> bool {
        matches!(self.module.ty(self.symbol.ty()), Type::Alias { .. })
    }

    /// The defined type, following an alias to it when there is one.
    #[must_use]
    pub fn named(&self) -> Option<&'m Named> {
        let types = self.module.types();
        match types.get(types.unalias(self.symbol.ty())) {
            Type::Named(named) => Some(named),
            _ => None,
        }
    }

    #[must_use]
    pub fn underlying(&self) -> TypeId {
        self.module.underlying(self.symbol.ty())
    }

    /// Methods declared on the type, in source order.
    #[must_use]
    pub fn methods(&self) -> &'m [SymbolId] {
        self.named().map_or(&[], |n| n.methods.as_slice())
    }

    #[must_use]
    pub fn type_params(&self) -> &'m [SymbolId] {
        match self.module.ty(self.symbol.ty()) {
            Type::Named(named) => &named.type_params,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Declaration;
    use crate::config::LoadConfig;
    use pretty_assertions::assert_eq;

    fn named<'m>(module: &'m Module, name: &str) -> NamedType<'m> {
        let symbol = module
            .lookup(name)
            .unwrap_or_else(|| panic!("should declare '{name}'"));
        NamedType::new(module, symbol.id()).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn alias_reaches_methods_of_its_target() {
        let source = "package p\n\n// Temperature.\ntype Celsius float64\n\nfunc (c Celsius) String() string { return \"\" }\n\ntype Temp = Celsius\n";
        let module = Module::load_sources(&[("p.go", source)], &LoadConfig::default())
            .unwrap_or_else(|e| panic!("should load: {e}"));
        let celsius = named(&module, "Celsius");
        assert!(!celsius.is_alias());
        assert_eq!(celsius.methods().len(), 1);
        assert_eq!(celsius.comments().as_slice(), ["// Temperature."]);
        assert_eq!(module.type_string(celsius.underlying()), "float64");

        let temp = named(&module, "Temp");
        assert!(temp.is_alias());
        assert_eq!(temp.methods(), celsius.methods());
        assert_eq!(temp.to_string(), "type Temp = Celsius");
    }

    #[test]
    fn generic_type_lists_its_parameters() {
        let source = "package p\n\ntype Pair[K comparable, V any] struct {\n\tKey K\n\tValue V\n}\n";
        let module = Module::load_sources(&[("p.go", source)], &LoadConfig::default())
            .unwrap_or_else(|e| panic!("should load: {e}"));
        let pair = named(&module, "Pair");
        let params: Vec<&str> = pair
            .type_params()
            .iter()
            .filter_map(|p| module.symbol(*p))
            .map(Symbol::name)
            .collect();
        assert_eq!(params, vec!["K", "V"]);
    }
}
