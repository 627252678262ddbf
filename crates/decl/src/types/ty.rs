//! Type arena. Every type a module mentions lives in one [`TypeTable`] and
//! is referred to by [`TypeId`].

use std::ops::Index;

use serde::Serialize;

use super::SymbolId;

/// Handle into a module's [`TypeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TypeId(u32);

impl TypeId {
    /// The invalid type, used for anything that did not resolve.
    pub const INVALID: Self = Self(0);

    fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Predeclared types, plus the untyped kinds constants carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Basic {
    Bool,
    String,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    Byte,
    Rune,
    Error,
    Any,
    Comparable,
    UntypedBool,
    UntypedInt,
    UntypedRune,
    UntypedFloat,
    UntypedComplex,
    UntypedString,
}

impl Basic {
    pub const ALL: [Self; 28] = [
        Self::Bool,
        Self::String,
        Self::Int,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Uintptr,
        Self::Float32,
        Self::Float64,
        Self::Complex64,
        Self::Complex128,
        Self::Byte,
        Self::Rune,
        Self::Error,
        Self::Any,
        Self::Comparable,
        Self::UntypedBool,
        Self::UntypedInt,
        Self::UntypedRune,
        Self::UntypedFloat,
        Self::UntypedComplex,
        Self::UntypedString,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::String => "string",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Uintptr => "uintptr",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::Byte => "byte",
            Self::Rune => "rune",
            Self::Error => "error",
            Self::Any => "any",
            Self::Comparable => "comparable",
            Self::UntypedBool => "untyped bool",
            Self::UntypedInt => "untyped int",
            Self::UntypedRune => "untyped rune",
            Self::UntypedFloat => "untyped float",
            Self::UntypedComplex => "untyped complex",
            Self::UntypedString => "untyped string",
        }
    }

    /// Predeclared type named `name` in the universe scope.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|b| !b.is_untyped() && b.name() == name)
    }

    #[must_use]
    pub const fn is_untyped(self) -> bool {
        matches!(
            self,
            Self::UntypedBool
                | Self::UntypedInt
                | Self::UntypedRune
                | Self::UntypedFloat
                | Self::UntypedComplex
                | Self::UntypedString
        )
    }

    /// Type an untyped constant takes when assigned to a variable.
    #[must_use]
    pub const fn default_type(self) -> Self {
        match self {
            Self::UntypedBool => Self::Bool,
            Self::UntypedInt => Self::Int,
            Self::UntypedRune => Self::Rune,
            Self::UntypedFloat => Self::Float64,
            Self::UntypedComplex => Self::Complex128,
            Self::UntypedString => Self::String,
            other => other,
        }
    }

    /// Rank among untyped numeric kinds: int < rune < float < complex.
    pub(crate) const fn untyped_rank(self) -> Option<u8> {
        match self {
            Self::UntypedInt => Some(0),
            Self::UntypedRune => Some(1),
            Self::UntypedFloat => Some(2),
            Self::UntypedComplex => Some(3),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// A defined type: `type T <rhs>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Named {
    pub obj: SymbolId,
    /// Type expression written on the right-hand side.
    pub rhs: TypeId,
    /// Underlying type; never itself `Named`.
    pub underlying: TypeId,
    /// Methods declared with this type as receiver base, in source order.
    pub methods: Vec<SymbolId>,
    pub type_params: Vec<SymbolId>,
}

impl Named {
    pub(crate) const fn new(obj: SymbolId) -> Self {
        Self {
            obj,
            rhs: TypeId::INVALID,
            underlying: TypeId::INVALID,
            methods: Vec::new(),
            type_params: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub recv: Option<SymbolId>,
    pub params: Vec<SymbolId>,
    pub results: Vec<SymbolId>,
    pub type_params: Vec<SymbolId>,
    pub recv_type_params: Vec<SymbolId>,
    /// Last parameter is `...T`; its type is recorded as `[]T`.
    pub variadic: bool,
}

impl Signature {
    /// `func()`, for function symbols whose signature never resolved.
    pub(crate) fn empty() -> &'static Self {
        static EMPTY: Signature = Signature {
            recv: None,
            params: Vec::new(),
            results: Vec::new(),
            type_params: Vec::new(),
            recv_type_params: Vec::new(),
            variadic: false,
        };
        &EMPTY
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructType {
    /// Fields in declaration order, embedded fields included.
    pub fields: Vec<SymbolId>,
    /// Raw tag per field, index-aligned with `fields`.
    pub tags: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceType {
    /// Methods written in the interface body.
    pub explicit: Vec<SymbolId>,
    /// Embedded types and type-set terms.
    pub embeddeds: Vec<TypeId>,
    /// Complete method set: explicit methods first, then promoted ones.
    pub methods: Vec<SymbolId>,
    /// Some embedded interface lives in another package, so `methods` may
    /// be incomplete.
    pub external_embeds: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    pub tilde: bool,
    pub ty: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Invalid,
    Basic(Basic),
    Named(Named),
    Alias { obj: SymbolId, target: TypeId },
    Pointer(TypeId),
    Slice(TypeId),
    Array { len: String, elem: TypeId },
    Map { key: TypeId, value: TypeId },
    Chan { dir: ChanDir, elem: TypeId },
    Signature(Signature),
    Struct(StructType),
    Interface(InterfaceType),
    Union(Vec<Term>),
    TypeParam { obj: SymbolId, constraint: TypeId },
    /// Instantiation of a generic named type, `List[int]`.
    Instance { origin: TypeId, args: Vec<TypeId> },
    /// Type declared in another package; only its name is known.
    External { package: String, name: String },
}

/// Arena of types. Slot 0 is [`Type::Invalid`], followed by one slot per
/// [`Basic`] kind.
#[derive(Debug)]
pub struct TypeTable {
    types: Vec<Type>,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTable {
    #[must_use]
    pub fn new() -> Self {
        let mut types = vec![Type::Invalid];
        types.extend(Basic::ALL.into_iter().map(Type::Basic));
        Self { types }
    }

    /// Id of a predeclared type.
    #[must_use]
    pub const fn basic(kind: Basic) -> TypeId {
        TypeId(1 + kind as u32)
    }

    pub(crate) fn push(&mut self, ty: Type) -> TypeId {
        let id = TypeId::from_index(self.types.len());
        self.types.push(ty);
        id
    }

    /// Reserve a slot to be filled once the type's members exist.
    pub(crate) fn reserve(&mut self) -> TypeId {
        self.push(Type::Invalid)
    }

    pub(crate) fn set(&mut self, id: TypeId, ty: Type) {
        if let Some(slot) = self.types.get_mut(id.index()) {
            *slot = ty;
        }
    }

    pub(crate) fn get_mut(&mut self, id: TypeId) -> Option<&mut Type> {
        self.types.get_mut(id.index())
    }

    #[must_use]
    pub fn get(&self, id: TypeId) -> &Type {
        self.types.get(id.index()).unwrap_or(&Type::Invalid)
    }

    /// Underlying type of `id`, following aliases, instantiations and type
    /// parameter constraints.
    #[must_use]
    pub fn underlying(&self, id: TypeId) -> TypeId {
        let mut current = id;
        for _ in 0..=self.types.len() {
            current = match self.get(current) {
                Type::Named(named) => return named.underlying,
                Type::Alias { target, .. } => *target,
                Type::Instance { origin, .. } => *origin,
                Type::TypeParam { constraint, .. } => *constraint,
                _ => return current,
            };
        }
        TypeId::INVALID
    }

    /// Follow aliases to the aliased type.
    #[must_use]
    pub fn unalias(&self, id: TypeId) -> TypeId {
        let mut current = id;
        for _ in 0..=self.types.len() {
            match self.get(current) {
                Type::Alias { target, .. } => current = *target,
                _ => return current,
            }
        }
        TypeId::INVALID
    }

    #[must_use]
    pub fn is_basic(&self, id: TypeId, kind: Basic) -> bool {
        matches!(self.get(id), Type::Basic(b) if *b == kind)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Index<TypeId> for TypeTable {
    type Output = Type;

    fn index(&self, id: TypeId) -> &Type {
        self.get(id)
    }
}
