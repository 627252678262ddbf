//! Go-syntax rendering of types and symbols.

use super::{ChanDir, ObjectKind, Owner, Signature, SymbolId, SymbolTable, Type, TypeId, TypeTable};

pub(crate) struct TypeWriter<'a> {
    symbols: &'a SymbolTable,
    types: &'a TypeTable,
}

impl<'a> TypeWriter<'a> {
    pub(crate) const fn new(symbols: &'a SymbolTable, types: &'a TypeTable) -> Self {
        Self { symbols, types }
    }

    pub(crate) fn type_string(&self, id: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, id);
        out
    }

    fn name(&self, obj: SymbolId) -> &'a str {
        self.symbols.get(obj).map_or("?", |s| s.name())
    }

    fn write_type(&self, out: &mut String, id: TypeId) {
        match self.types.get(id) {
            Type::Invalid => out.push_str("invalid type"),
            Type::Basic(basic) => out.push_str(basic.name()),
            Type::Named(named) => out.push_str(self.name(named.obj)),
            Type::Alias { obj, .. } | Type::TypeParam { obj, .. } => {
                out.push_str(self.name(*obj));
            }
            Type::External { package, name } => {
                out.push_str(package);
                out.push('.');
                out.push_str(name);
            }
            Type::Pointer(elem) => {
                out.push('*');
                self.write_type(out, *elem);
            }
            Type::Slice(elem) => {
                out.push_str("[]");
                self.write_type(out, *elem);
            }
            Type::Array { len, elem } => {
                out.push('[');
                out.push_str(len);
                out.push(']');
                self.write_type(out, *elem);
            }
            Type::Map { key, value } => {
                out.push_str("map[");
                self.write_type(out, *key);
                out.push(']');
                self.write_type(out, *value);
            }
            Type::Chan { dir, elem } => {
                out.push_str(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.write_type(out, *elem);
            }
            Type::Signature(sig) => {
                out.push_str("func");
                self.write_signature(out, sig);
            }
            Type::Struct(st) => {
                out.push_str("struct{");
                for (i, field) in st.fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    let symbol = &self.symbols[*field];
                    if !symbol.is_embedded() {
                        out.push_str(symbol.name());
                        out.push(' ');
                    }
                    self.write_type(out, symbol.ty());
                }
                out.push('}');
            }
            Type::Interface(iface) => {
                out.push_str("interface{");
                let mut first = true;
                for method in &iface.explicit {
                    if !std::mem::take(&mut first) {
                        out.push_str("; ");
                    }
                    out.push_str(self.name(*method));
                    match self.types.get(self.symbols[*method].ty()) {
                        Type::Signature(sig) => self.write_signature(out, sig),
                        _ => out.push_str("()"),
                    }
                }
                for embedded in &iface.embeddeds {
                    if !std::mem::take(&mut first) {
                        out.push_str("; ");
                    }
                    self.write_type(out, *embedded);
                }
                out.push('}');
            }
            Type::Union(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" | ");
                    }
                    if term.tilde {
                        out.push('~');
                    }
                    self.write_type(out, term.ty);
                }
            }
            Type::Instance { origin, args } => {
                self.write_type(out, *origin);
                out.push('[');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_type(out, *arg);
                }
                out.push(']');
            }
        }
    }

    /// `(a int, b ...string) (int, error)`, without the `func` keyword.
    fn write_signature(&self, out: &mut String, sig: &Signature) {
        out.push('(');
        let last = sig.params.len().saturating_sub(1);
        for (i, param) in sig.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            let symbol = &self.symbols[*param];
            if symbol.is_definition() {
                out.push_str(symbol.name());
                out.push(' ');
            }
            match self.types.get(symbol.ty()) {
                Type::Slice(elem) if sig.variadic && i == last => {
                    out.push_str("...");
                    self.write_type(out, *elem);
                }
                _ => self.write_type(out, symbol.ty()),
            }
        }
        out.push(')');

        let named_results = sig
            .results
            .iter()
            .any(|r| self.symbols[*r].is_definition());
        match sig.results.as_slice() {
            [] => {}
            [only] if !named_results => {
                out.push(' ');
                self.write_type(out, self.symbols[*only].ty());
            }
            results => {
                out.push_str(" (");
                for (i, result) in results.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let symbol = &self.symbols[*result];
                    if symbol.is_definition() {
                        out.push_str(symbol.name());
                        out.push(' ');
                    }
                    self.write_type(out, symbol.ty());
                }
                out.push(')');
            }
        }
    }

    /// `[K comparable, V any]`; nothing for an empty list.
    fn write_type_params(&self, out: &mut String, params: &[SymbolId]) {
        if params.is_empty() {
            return;
        }
        out.push('[');
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(self.name(*param));
            out.push(' ');
            if let Type::TypeParam { constraint, .. } = self.types.get(self.symbols[*param].ty()) {
                self.write_type(out, *constraint);
            }
        }
        out.push(']');
    }

    /// One-line Go-like description of a symbol, e.g. `func (*Book) Title() string`.
    pub(crate) fn describe(&self, id: SymbolId) -> String {
        let symbol = &self.symbols[id];
        let name = symbol.name();
        match symbol.kind() {
            ObjectKind::TypeName => match self.types.get(symbol.ty()) {
                Type::Alias { target, .. } => {
                    format!("type {name} = {}", self.type_string(*target))
                }
                Type::Named(named) => {
                    let mut out = format!("type {name}");
                    self.write_type_params(&mut out, &named.type_params);
                    out.push(' ');
                    self.write_type(&mut out, named.underlying);
                    out
                }
                Type::TypeParam { constraint, .. } => {
                    format!("type {name} {}", self.type_string(*constraint))
                }
                _ => format!("type {name}"),
            },
            ObjectKind::Func => {
                let mut out = String::from("func ");
                let sig = match self.types.get(symbol.ty()) {
                    Type::Signature(sig) => sig,
                    _ => Signature::empty(),
                };
                if let Some(recv) = sig.recv {
                    out.push('(');
                    out.push_str(&self.type_string(self.symbols[recv].ty()));
                    out.push_str(") ");
                } else if let Owner::InterfaceMethod(iface) = symbol.owner() {
                    out.push('(');
                    out.push_str(&self.type_string(iface));
                    out.push_str(") ");
                }
                out.push_str(name);
                self.write_type_params(&mut out, &sig.type_params);
                self.write_signature(&mut out, sig);
                out
            }
            ObjectKind::Var => {
                let label = if matches!(symbol.owner(), Owner::Field(_)) {
                    "field"
                } else {
                    "var"
                };
                format!("{label} {name} {}", self.type_string(symbol.ty()))
            }
            ObjectKind::Const => format!("const {name} {}", self.type_string(symbol.ty())),
            ObjectKind::PkgName => format!("package {name}"),
        }
    }
}
