//! Semantic objects: one [`Symbol`] per declared name.

use std::collections::HashMap;
use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

use super::TypeId;
use crate::position::Pos;
use crate::syntax::is_exported;

/// Handle into a module's [`SymbolTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SymbolId(u32);

impl SymbolId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What kind of object a name denotes, as in `go/types`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    TypeName,
    Func,
    Var,
    Const,
    PkgName,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TypeName => "type",
            Self::Func => "func",
            Self::Var => "var",
            Self::Const => "const",
            Self::PkgName => "package",
        };
        f.write_str(s)
    }
}

/// Where a symbol was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    /// Package scope.
    Package,
    /// Field of the struct type.
    Field(TypeId),
    /// Method written inside the interface type.
    InterfaceMethod(TypeId),
    /// Method whose receiver base type is the given type name, when it
    /// resolved.
    Method(Option<SymbolId>),
    /// Parameter of the signature.
    Param(TypeId),
    /// Result of the signature.
    Result(TypeId),
    /// Receiver of the signature.
    Receiver(TypeId),
    /// Type parameter of a generic type or function.
    TypeParam,
    /// Type, variable or constant declared inside a function body.
    Local,
}

/// One declared name.
#[derive(Debug, Clone)]
pub struct Symbol {
    id: SymbolId,
    name: String,
    kind: ObjectKind,
    pos: Pos,
    ty: TypeId,
    owner: Owner,
    embedded: bool,
}

impl Symbol {
    #[must_use]
    pub const fn id(&self) -> SymbolId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Position of the declaring identifier.
    #[must_use]
    pub const fn pos(&self) -> Pos {
        self.pos
    }

    #[must_use]
    pub const fn ty(&self) -> TypeId {
        self.ty
    }

    #[must_use]
    pub const fn owner(&self) -> Owner {
        self.owner
    }

    #[must_use]
    pub fn exported(&self) -> bool {
        is_exported(&self.name)
    }

    /// Embedded struct field.
    #[must_use]
    pub const fn is_embedded(&self) -> bool {
        self.embedded
    }

    /// Whether the symbol was introduced by a written identifier. Unnamed
    /// parameters and results are not definitions.
    #[must_use]
    pub fn is_definition(&self) -> bool {
        !self.name.is_empty()
    }
}

/// Arena of every symbol in a module plus the package scope.
///
/// Iteration follows the table's scan order: discovery order, or position
/// order once [`SymbolTable::sort_by_position`] ran.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    order: Vec<SymbolId>,
    scope: HashMap<String, SymbolId>,
}

impl SymbolTable {
    pub(crate) fn insert(
        &mut self,
        name: impl Into<String>,
        kind: ObjectKind,
        pos: Pos,
        owner: Owner,
    ) -> SymbolId {
        let id = SymbolId::from_index(self.symbols.len());
        self.symbols.push(Symbol {
            id,
            name: name.into(),
            kind,
            pos,
            ty: TypeId::INVALID,
            owner,
            embedded: false,
        });
        self.order.push(id);
        id
    }

    pub(crate) fn set_type(&mut self, id: SymbolId, ty: TypeId) {
        if let Some(symbol) = self.symbols.get_mut(id.index()) {
            symbol.ty = ty;
        }
    }

    pub(crate) fn set_owner(&mut self, id: SymbolId, owner: Owner) {
        if let Some(symbol) = self.symbols.get_mut(id.index()) {
            symbol.owner = owner;
        }
    }

    pub(crate) fn set_embedded(&mut self, id: SymbolId) {
        if let Some(symbol) = self.symbols.get_mut(id.index()) {
            symbol.embedded = true;
        }
    }

    /// Enter `id` into package scope.
    ///
    /// Returns the symbol already holding the name on redeclaration.
    pub(crate) fn declare(&mut self, id: SymbolId) -> Result<(), SymbolId> {
        let name = self[id].name.clone();
        match self.scope.get(&name) {
            Some(&existing) => Err(existing),
            None => {
                self.scope.insert(name, id);
                Ok(())
            }
        }
    }

    /// Package-scope symbol named `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.scope.get(name).copied()
    }

    #[must_use]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    /// Symbols in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.order.iter().map(|id| &self.symbols[id.index()])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub(crate) fn sort_by_position(&mut self) {
        let symbols = &self.symbols;
        self.order.sort_by_key(|id| symbols[id.index()].pos);
    }
}

impl Index<SymbolId> for SymbolTable {
    type Output = Symbol;

    fn index(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }
}
