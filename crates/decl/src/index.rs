//! Position index: which symbol is defined at a position.

use std::collections::HashMap;

use crate::position::Pos;
use crate::types::{SymbolId, SymbolTable};

/// Every definition (named symbol) keyed by the position of its identifier.
#[derive(Debug, Default)]
pub struct PositionIndex {
    defs: HashMap<Pos, SymbolId>,
}

impl PositionIndex {
    pub(crate) fn build(symbols: &SymbolTable) -> Self {
        let defs = symbols
            .iter()
            .filter(|s| s.is_definition())
            .map(|s| (s.pos(), s.id()))
            .collect();
        Self { defs }
    }

    #[must_use]
    pub fn get(&self, pos: Pos) -> Option<SymbolId> {
        self.defs.get(&pos).copied()
    }

    #[must_use]
    pub fn contains(&self, pos: Pos) -> bool {
        self.defs.contains_key(&pos)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
