use serde::Serialize;

use super::{declaration, expect_symbol, invalid_kind};
use crate::error::DeclError;
use crate::module::Module;
use crate::types::{ObjectKind, Owner, Symbol, SymbolId, TypeId};

const EXPECTED: &str = "var or const";

/// Where a variable was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VarRole {
    Package,
    Field,
    Param,
    Result,
    Receiver,
    Local,
}

/// A named variable or constant: package-level and function-local values,
/// struct fields and signature variables.
#[derive(Debug, Clone, Copy)]
pub struct Var<'m> {
    module: &'m Module,
    symbol: &'m Symbol,
}

declaration!(Var);

impl<'m> Var<'m> {
    /// # Errors
    ///
    /// [`DeclError::InvalidSymbolKind`] unless `id` names a variable or
    /// constant.
    pub fn new(module: &'m Module, id: SymbolId) -> Result<Self, DeclError> {
        let symbol = expect_symbol(module, id, EXPECTED)?;
        let value = matches!(symbol.kind(), ObjectKind::Var | ObjectKind::Const);
        if !value || !symbol.is_definition() {
            return Err(invalid_kind(module, symbol, EXPECTED));
        }
        Ok(Self { module, symbol })
    }

    #[must_use]
    pub fn is_const(&self) -> bool {
        self.symbol.kind() == ObjectKind::Const
    }

    #[must_use]
    pub const fn is_field(&self) -> bool {
        matches!(self.symbol.owner(), Owner::Field(_))
    }

    #[must_use]
    pub const fn embedded(&self) -> bool {
        self.symbol.is_embedded()
    }

    #[must_use]
    pub const fn role(&self) -> VarRole {
        match self.symbol.owner() {
            Owner::Field(_) => VarRole::Field,
            Owner::Param(_) => VarRole::Param,
            Owner::Result(_) => VarRole::Result,
            Owner::Receiver(_) => VarRole::Receiver,
            Owner::Local => VarRole::Local,
            _ => VarRole::Package,
        }
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.symbol.ty()
    }

    #[must_use]
    pub fn type_string(&self) -> String {
        self.module.type_string(self.symbol.ty())
    }
}
