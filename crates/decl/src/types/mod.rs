//! Symbol and type model produced by the declaration checker.

mod format;
mod symbol;
mod ty;

pub(crate) use format::TypeWriter;
pub use symbol::{ObjectKind, Owner, Symbol, SymbolId, SymbolTable};
pub use ty::{
    Basic, ChanDir, InterfaceType, Named, Signature, StructType, Term, Type, TypeId, TypeTable,
};
