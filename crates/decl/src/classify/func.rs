//! Functions, methods and interface methods.

use serde::Serialize;

use super::{declaration, expect_symbol, invalid_kind};
use crate::comments::Comments;
use crate::error::DeclError;
use crate::module::Module;
use crate::types::{Basic, ObjectKind, Owner, Signature, Symbol, SymbolId, Type, TypeId, TypeTable};

const EXPECTED: &str = "func";

/// Where a function was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "of")]
pub enum FuncOwner {
    /// Package-level function.
    Package,
    /// Method; the receiver base type name when it resolved.
    Receiver(Option<SymbolId>),
    /// Method written in the interface type.
    Interface(TypeId),
}

#[derive(Debug, Clone, Copy)]
pub struct Func<'m> {
    module: &'m Module,
    symbol: &'m Symbol,
    sig: &'m Signature,
}

declaration!(Func);

impl<'m> Func<'m> {
    /// # Errors
    ///
    /// [`DeclError::InvalidSymbolKind`] unless `id` names a function or
    /// method.
    pub fn new(module: &'m Module, id: SymbolId) -> Result<Self, DeclError> {
        let symbol = expect_symbol(module, id, EXPECTED)?;
        if symbol.kind() != ObjectKind::Func {
            return Err(invalid_kind(module, symbol, EXPECTED));
        }
        let sig = match module.ty(symbol.ty()) {
            Type::Signature(sig) => sig,
            _ => Signature::empty(),
        };
        Ok(Self {
            module,
            symbol,
            sig,
        })
    }

    #[must_use]
    pub const fn owner(&self) -> FuncOwner {
        match self.symbol.owner() {
            Owner::Method(base) => FuncOwner::Receiver(base),
            Owner::InterfaceMethod(iface) => FuncOwner::Interface(iface),
            _ => FuncOwner::Package,
        }
    }

    #[must_use]
    pub const fn is_method(&self) -> bool {
        !matches!(self.owner(), FuncOwner::Package)
    }

    #[must_use]
    pub const fn is_interface_method(&self) -> bool {
        matches!(self.owner(), FuncOwner::Interface(_))
    }

    #[must_use]
    pub const fn signature(&self) -> &'m Signature {
        self.sig
    }

    #[must_use]
    pub fn params(&self) -> &'m [SymbolId] {
        &self.sig.params
    }

    /// The `i`-th parameter.
    ///
    /// # Errors
    ///
    /// [`DeclError::IndexOutOfRange`] when there are not that many
    /// parameters.
    pub fn param(&self, i: usize) -> Result<&'m Symbol, DeclError> {
        self.sig
            .params
            .get(i)
            .and_then(|p| self.module.symbol(*p))
            .ok_or(DeclError::IndexOutOfRange {
                index: isize::try_from(i).unwrap_or(isize::MAX),
                len: self.sig.params.len(),
            })
    }

    /// # Errors
    ///
    /// Same as [`Func::param`].
    pub fn param_type(&self, i: usize) -> Result<TypeId, DeclError> {
        self.param(i).map(Symbol::ty)
    }

    /// Comments on the `i`-th parameter, e.g. a trailing `// in bytes`.
    #[must_use]
    pub fn param_comments(&self, i: usize) -> Comments {
        self.sig
            .params
            .get(i)
            .map_or_else(Comments::default, |p| self.module.comments(*p))
    }

    #[must_use]
    pub fn results(&self) -> &'m [SymbolId] {
        &self.sig.results
    }

    #[must_use]
    pub fn result(&self, i: usize) -> Option<&'m Symbol> {
        self.sig.results.get(i).and_then(|r| self.module.symbol(*r))
    }

    #[must_use]
    pub fn result_type(&self, i: usize) -> Option<TypeId> {
        self.result(i).map(Symbol::ty)
    }

    #[must_use]
    pub fn receiver(&self) -> Option<&'m Symbol> {
        self.sig.recv.and_then(|r| self.module.symbol(r))
    }

    #[must_use]
    pub fn type_params(&self) -> &'m [SymbolId] {
        &self.sig.type_params
    }

    #[must_use]
    pub fn recv_type_params(&self) -> &'m [SymbolId] {
        &self.sig.recv_type_params
    }

    #[must_use]
    pub const fn variadic(&self) -> bool {
        self.sig.variadic
    }

    /// Whether the last result is the predeclared `error`.
    #[must_use]
    pub fn returns_error(&self) -> bool {
        self.sig
            .results
            .last()
            .and_then(|r| self.module.symbol(*r))
            .is_some_and(|r| r.ty() == TypeTable::basic(Basic::Error))
    }

    /// Package-qualified name: `shelf.New`, `(*shelf.Book).Title` or
    /// `(shelf.Reader).Read`.
    #[must_use]
    pub fn full_name(&self) -> String {
        let package = self.module.package();
        let name = self.symbol.name();
        match self.owner() {
            FuncOwner::Package => format!("{package}.{name}"),
            FuncOwner::Receiver(_) => {
                let recv_ty = self.receiver().map_or(TypeId::INVALID, Symbol::ty);
                let (star, base) = match self.module.ty(recv_ty) {
                    Type::Pointer(elem) => ("*", *elem),
                    _ => ("", recv_ty),
                };
                format!("({star}{package}.{}).{name}", self.module.type_string(base))
            }
            FuncOwner::Interface(iface) => match self.interface_name(iface) {
                Some(owner) => format!("({package}.{owner}).{name}"),
                None => format!("({}).{name}", self.module.type_string(iface)),
            },
        }
    }

    /// Name of the defined type whose underlying type is `iface`.
    fn interface_name(&self, iface: TypeId) -> Option<&'m str> {
        let module = self.module;
        module
            .symbols()
            .iter()
            .filter(|s| s.kind() == ObjectKind::TypeName)
            .find(|s| matches!(module.ty(s.ty()), Type::Named(n) if n.underlying == iface))
            .map(Symbol::name)
    }
}
