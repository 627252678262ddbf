use super::{declaration, expect_symbol, invalid_kind, member_comments};
use crate::comments::Comments;
use crate::error::DeclError;
use crate::module::Module;
use crate::types::{InterfaceType, Named, ObjectKind, Symbol, SymbolId, Type, TypeId};

const EXPECTED: &str = "interface type";

/// A defined type whose underlying type is an interface.
///
/// Method comments follow the complete method set: explicit methods first,
/// then methods promoted from embedded interfaces.
#[derive(Debug, Clone)]
pub struct Interface<'m> {
    module: &'m Module,
    symbol: &'m Symbol,
    named: &'m Named,
    iface: &'m InterfaceType,
    method_comments: Vec<Comments>,
}

declaration!(Interface);

impl<'m> Interface<'m> {
    /// # Errors
    ///
    /// [`DeclError::InvalidSymbolKind`] unless `id` names a defined type
    /// with an interface underlying type.
    pub fn new(module: &'m Module, id: SymbolId) -> Result<Self, DeclError> {
        let symbol = expect_symbol(module, id, EXPECTED)?;
        let (ObjectKind::TypeName, Type::Named(named)) = (symbol.kind(), module.ty(symbol.ty()))
        else {
            return Err(invalid_kind(module, symbol, EXPECTED));
        };
        let Type::Interface(iface) = module.ty(named.underlying) else {
            return Err(invalid_kind(module, symbol, EXPECTED));
        };
        let method_comments = member_comments(module, &iface.explicit, &iface.methods);
        Ok(Self {
            module,
            symbol,
            named,
            iface,
            method_comments,
        })
    }

    #[must_use]
    pub const fn named(&self) -> &'m Named {
        self.named
    }

    #[must_use]
    pub const fn interface_type(&self) -> &'m InterfaceType {
        self.iface
    }

    #[must_use]
    pub const fn underlying(&self) -> TypeId {
        self.named.underlying
    }

    /// Methods written in the interface body.
    #[must_use]
    pub fn explicit_methods(&self) -> &'m [SymbolId] {
        &self.iface.explicit
    }

    /// Complete method set.
    #[must_use]
    pub fn methods(&self) -> &'m [SymbolId] {
        &self.iface.methods
    }

    #[must_use]
    pub fn method(&self, i: usize) -> Option<&'m Symbol> {
        self.iface.methods.get(i).and_then(|m| self.module.symbol(*m))
    }

    #[must_use]
    pub fn num_methods(&self) -> usize {
        self.iface.methods.len()
    }

    #[must_use]
    pub fn embeddeds(&self) -> &'m [TypeId] {
        &self.iface.embeddeds
    }

    /// No methods and no embedded types: `interface{}`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iface.methods.is_empty() && self.iface.embeddeds.is_empty()
    }

    /// Whether the interface is fully described by its methods, i.e. it
    /// embeds no type-set terms and can be used as an ordinary type.
    #[must_use]
    pub fn is_method_set(&self) -> bool {
        let types = self.module.types();
        self.iface.embeddeds.iter().all(|e| {
            matches!(
                types.get(types.underlying(*e)),
                Type::Interface(_) | Type::External { .. }
            )
        })
    }

    /// Some embedded interface lives in another package, so
    /// [`Interface::methods`] may be missing its methods.
    #[must_use]
    pub const fn has_external_embeds(&self) -> bool {
        self.iface.external_embeds
    }

    /// Comments of the `i`-th method of the complete method set.
    #[must_use]
    pub fn method_comments(&self, i: usize) -> Option<&Comments> {
        self.method_comments.get(i)
    }

    pub fn methods_with_comments(&self) -> impl Iterator<Item = (&'m Symbol, &Comments)> {
        self.iface
            .methods
            .iter()
            .zip(&self.method_comments)
            .filter_map(|(m, c)| Some((self.module.symbol(*m)?, c)))
    }
}
