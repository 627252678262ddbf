//! Struct declarations, their fields and field tags.

use super::{declaration, expect_symbol, invalid_kind, member_comments};
use crate::comments::Comments;
use crate::error::DeclError;
use crate::module::Module;
use crate::types::{Named, ObjectKind, StructType, Symbol, SymbolId, Type, TypeId};

const EXPECTED: &str = "struct type";

/// A defined type whose underlying type is a struct.
#[derive(Debug, Clone)]
pub struct Struct<'m> {
    module: &'m Module,
    symbol: &'m Symbol,
    named: &'m Named,
    st: &'m StructType,
    fields: Vec<Field<'m>>,
}

declaration!(Struct);

impl<'m> Struct<'m> {
    /// # Errors
    ///
    /// [`DeclError::InvalidSymbolKind`] unless `id` names a defined type
    /// with a struct underlying type.
    pub fn new(module: &'m Module, id: SymbolId) -> Result<Self, DeclError> {
        let symbol = expect_symbol(module, id, EXPECTED)?;
        let (ObjectKind::TypeName, Type::Named(named)) = (symbol.kind(), module.ty(symbol.ty()))
        else {
            return Err(invalid_kind(module, symbol, EXPECTED));
        };
        let Type::Struct(st) = module.ty(named.underlying) else {
            return Err(invalid_kind(module, symbol, EXPECTED));
        };
        let comments = member_comments(module, &st.fields, &st.fields);
        let fields = st
            .fields
            .iter()
            .zip(&st.tags)
            .zip(comments)
            .filter_map(|((id, tag), comments)| {
                Some(Field {
                    module,
                    symbol: module.symbol(*id)?,
                    tag: tag.as_deref(),
                    comments,
                })
            })
            .collect();
        Ok(Self {
            module,
            symbol,
            named,
            st,
            fields,
        })
    }

    #[must_use]
    pub const fn named(&self) -> &'m Named {
        self.named
    }

    #[must_use]
    pub const fn struct_type(&self) -> &'m StructType {
        self.st
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.symbol.ty()
    }

    #[must_use]
    pub const fn underlying(&self) -> TypeId {
        self.named.underlying
    }

    /// Fields in declaration order, embedded fields included.
    #[must_use]
    pub fn fields(&self) -> &[Field<'m>] {
        &self.fields
    }

    #[must_use]
    pub fn field(&self, i: usize) -> Option<&Field<'m>> {
        self.fields.get(i)
    }

    /// Tag of the `i`-th field. Empty when the field has none.
    #[must_use]
    pub fn tag(&self, i: usize) -> Option<StructTag<'m>> {
        self.fields.get(i).map(Field::tag)
    }

    /// Value under `key` in the `i`-th field's tag.
    #[must_use]
    pub fn tag_value(&self, i: usize, key: &str) -> Option<String> {
        self.tag(i)?.lookup(key)
    }

    #[must_use]
    pub fn methods(&self) -> &'m [SymbolId] {
        &self.named.methods
    }

    #[must_use]
    pub fn method(&self, i: usize) -> Option<&'m Symbol> {
        self.named.methods.get(i).and_then(|m| self.module.symbol(*m))
    }

    #[must_use]
    pub fn num_methods(&self) -> usize {
        self.named.methods.len()
    }

    #[must_use]
    pub fn type_params(&self) -> &'m [SymbolId] {
        &self.named.type_params
    }
}

/// One struct field with the comments attached to it.
#[derive(Debug, Clone)]
pub struct Field<'m> {
    module: &'m Module,
    symbol: &'m Symbol,
    tag: Option<&'m str>,
    comments: Comments,
}

impl<'m> Field<'m> {
    #[must_use]
    pub const fn symbol(&self) -> &'m Symbol {
        self.symbol
    }

    #[must_use]
    pub fn name(&self) -> &'m str {
        self.symbol.name()
    }

    #[must_use]
    pub fn exported(&self) -> bool {
        self.symbol.exported()
    }

    #[must_use]
    pub const fn embedded(&self) -> bool {
        self.symbol.is_embedded()
    }

    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.symbol.ty()
    }

    #[must_use]
    pub fn type_string(&self) -> String {
        self.module.type_string(self.symbol.ty())
    }

    #[must_use]
    pub fn tag(&self) -> StructTag<'m> {
        StructTag(self.tag.unwrap_or_default())
    }

    /// Comments attached to this field under the module's member policy.
    #[must_use]
    pub const fn comments(&self) -> &Comments {
        &self.comments
    }
}

/// A struct field tag, `json:"name,omitempty" xml:"name"`, with the
/// conventional `key:"value"` lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StructTag<'a>(&'a str);

impl<'a> StructTag<'a> {
    #[must_use]
    pub const fn new(tag: &'a str) -> Self {
        Self(tag)
    }

    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        self.0
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value associated with `key`, or `None` when the key is absent.
    /// Scanning stops at the first malformed pair.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<String> {
        let mut tag = self.0;
        loop {
            tag = tag.trim_start_matches(' ');
            if tag.is_empty() {
                return None;
            }
            let name_end = tag
                .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\x7f')
                .unwrap_or(tag.len());
            let rest = &tag[name_end..];
            if name_end == 0 || !rest.starts_with(":\"") {
                return None;
            }
            let name = &tag[..name_end];
            let quoted = &rest[1..];
            let bytes = quoted.as_bytes();
            let mut i = 1;
            while i < bytes.len() && bytes[i] != b'"' {
                if bytes[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            if i >= bytes.len() {
                return None;
            }
            if name == key {
                return unescape(&quoted[1..i]);
            }
            tag = &quoted[i + 1..];
        }
    }

    /// Value associated with `key`, empty when absent.
    #[must_use]
    pub fn get(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_default()
    }
}

/// Resolve the escapes of a double-quoted literal body.
fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        out.push(match chars.next()? {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            other => other,
        });
    }
    Some(out)
}
