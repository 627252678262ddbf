//! Type expressions, signatures, struct and interface bodies.

use super::Checker;
use crate::parser::GoNode;
use crate::syntax::{self, children_of_kind, embedded_name, is_kind, last_named_child, named_children};
use crate::types::{
    Basic, ChanDir, InterfaceType, ObjectKind, Owner, Signature, StructType, SymbolId, Term, Type,
    TypeId, TypeTable,
};

impl<'r> Checker<'r> {
    /// Resolve a type expression.
    pub(super) fn resolve_type(&mut self, node: &GoNode<'r>) -> TypeId {
        let kind = node.kind();
        match kind.as_ref() {
            syntax::TYPE_IDENTIFIER | syntax::IDENTIFIER => self.resolve_type_name(node),
            syntax::QUALIFIED_TYPE => self.resolve_qualified(node),
            syntax::GENERIC_TYPE => {
                let origin = node
                    .field("type")
                    .map_or(TypeId::INVALID, |n| self.resolve_type(&n));
                let args = node
                    .field("type_arguments")
                    .map(|list| named_children(&list))
                    .unwrap_or_default()
                    .iter()
                    .map(|arg| self.resolve_type_elem(arg))
                    .collect();
                self.types.push(Type::Instance { origin, args })
            }
            syntax::POINTER_TYPE => {
                let elem = self.resolve_child(last_named_child(node));
                self.types.push(Type::Pointer(elem))
            }
            syntax::SLICE_TYPE => {
                let elem = self.resolve_child(node.field("element"));
                self.types.push(Type::Slice(elem))
            }
            syntax::ARRAY_TYPE | syntax::IMPLICIT_LENGTH_ARRAY_TYPE => {
                let len = node
                    .field("length")
                    .map_or_else(|| "...".to_string(), |n| n.text().to_string());
                let elem = self.resolve_child(node.field("element"));
                self.types.push(Type::Array { len, elem })
            }
            syntax::MAP_TYPE => {
                let key = self.resolve_child(node.field("key"));
                let value = self.resolve_child(node.field("value"));
                self.types.push(Type::Map { key, value })
            }
            syntax::CHANNEL_TYPE => {
                let first_is_arrow = node.children().next().is_some_and(|c| is_kind(&c, "<-"));
                let dir = if first_is_arrow {
                    ChanDir::Recv
                } else if node.children().any(|c| is_kind(&c, "<-")) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let elem = self.resolve_child(node.field("value"));
                self.types.push(Type::Chan { dir, elem })
            }
            syntax::FUNCTION_TYPE => {
                let id = self.types.reserve();
                let sig = self.resolve_signature(id, node.field("parameters"), node.field("result"));
                self.types.set(id, Type::Signature(sig));
                id
            }
            syntax::STRUCT_TYPE => self.resolve_struct(node),
            syntax::INTERFACE_TYPE => self.resolve_interface(node),
            syntax::PARENTHESIZED_TYPE => self.resolve_child(last_named_child(node)),
            syntax::NEGATED_TYPE | syntax::TYPE_ELEM | syntax::TYPE_CONSTRAINT => {
                self.resolve_type_elem(node)
            }
            _ => TypeId::INVALID,
        }
    }

    fn resolve_child(&mut self, node: Option<GoNode<'r>>) -> TypeId {
        node.map_or(TypeId::INVALID, |n| self.resolve_type(&n))
    }

    /// An identifier in type position: enclosing scopes first, then package
    /// scope, then the universe.
    fn resolve_type_name(&mut self, node: &GoNode<'r>) -> TypeId {
        let name = node.text();
        if let Some(obj) = self.lookup(&name) {
            let symbol = &self.symbols[obj];
            if symbol.kind() == ObjectKind::TypeName {
                return symbol.ty();
            }
            self.error(node, format!("{name} is not a type"));
            return TypeId::INVALID;
        }
        if let Some(basic) = Basic::from_name(&name) {
            return TypeTable::basic(basic);
        }
        self.error(node, format!("undefined: {name}"));
        TypeId::INVALID
    }

    fn resolve_qualified(&mut self, node: &GoNode<'r>) -> TypeId {
        let (Some(package), Some(name)) = (node.field("package"), node.field("name")) else {
            return TypeId::INVALID;
        };
        let package = package.text().to_string();
        let path = self
            .file
            .and_then(|file| self.file_imports.get(&file))
            .and_then(|imports| imports.get(&package))
            .cloned()
            .unwrap_or(package);
        self.types.push(Type::External {
            package: path,
            name: name.text().to_string(),
        })
    }

    /// A constraint or type-set element: `T`, `~T` or `A | ~B`.
    pub(super) fn resolve_type_elem(&mut self, node: &GoNode<'r>) -> TypeId {
        let elems = if is_kind(node, syntax::TYPE_ELEM) || is_kind(node, syntax::TYPE_CONSTRAINT) {
            named_children(node)
        } else {
            vec![node.clone()]
        };
        let mut terms = Vec::with_capacity(elems.len());
        for elem in &elems {
            if is_kind(elem, syntax::NEGATED_TYPE) {
                let ty = self.resolve_child(last_named_child(elem));
                terms.push(Term { tilde: true, ty });
            } else {
                let ty = self.resolve_type(elem);
                terms.push(Term { tilde: false, ty });
            }
        }
        if let [Term { tilde: false, ty }] = terms[..] {
            return ty;
        }
        self.types.push(Type::Union(terms))
    }

    /// Declare the parameters of `[K comparable, V any]` into the innermost
    /// scope. Constraints resolve after every name is visible.
    pub(super) fn declare_type_params(&mut self, list: &GoNode<'r>) -> Vec<SymbolId> {
        let mut params = Vec::new();
        let mut constraints = Vec::new();
        for decl in children_of_kind(list, syntax::TYPE_PARAMETER_DECLARATION) {
            let constraint = decl.field("type");
            for name in children_of_kind(&decl, syntax::IDENTIFIER) {
                let obj = self.symbols.insert(
                    name.text().to_string(),
                    ObjectKind::TypeName,
                    self.pos(&name),
                    Owner::TypeParam,
                );
                let ty = self.types.push(Type::TypeParam {
                    obj,
                    constraint: TypeId::INVALID,
                });
                self.symbols.set_type(obj, ty);
                if let Some(scope) = self.scopes.last_mut() {
                    scope.insert(name.text().to_string(), obj);
                }
                params.push(obj);
                constraints.push((ty, constraint.clone()));
            }
        }
        for (ty, node) in constraints {
            let resolved = node.map_or(TypeTable::basic(Basic::Any), |n| self.resolve_type_elem(&n));
            if let Some(Type::TypeParam { constraint, .. }) = self.types.get_mut(ty) {
                *constraint = resolved;
            }
        }
        params
    }

    pub(super) fn resolve_signature(
        &mut self,
        sig: TypeId,
        params: Option<GoNode<'r>>,
        result: Option<GoNode<'r>>,
    ) -> Signature {
        let mut signature = Signature::default();
        if let Some(list) = params {
            self.resolve_params(&list, Owner::Param(sig), &mut signature);
        }
        match result {
            Some(list) if is_kind(&list, syntax::PARAMETER_LIST) => {
                self.resolve_params(&list, Owner::Result(sig), &mut signature);
            }
            Some(ty_node) => {
                let ty = self.resolve_type(&ty_node);
                let obj = self
                    .symbols
                    .insert("", ObjectKind::Var, self.pos(&ty_node), Owner::Result(sig));
                self.symbols.set_type(obj, ty);
                signature.results.push(obj);
            }
            None => {}
        }
        signature
    }

    fn resolve_params(&mut self, list: &GoNode<'r>, owner: Owner, signature: &mut Signature) {
        for decl in list.children() {
            let variadic = is_kind(&decl, syntax::VARIADIC_PARAMETER_DECLARATION);
            if !variadic && !is_kind(&decl, syntax::PARAMETER_DECLARATION) {
                continue;
            }
            let Some(ty_node) = decl.field("type") else {
                continue;
            };
            let mut ty = self.resolve_type(&ty_node);
            if variadic {
                ty = self.types.push(Type::Slice(ty));
                signature.variadic = true;
            }
            let names = children_of_kind(&decl, syntax::IDENTIFIER);
            let declared: Vec<(String, &GoNode<'r>)> = if names.is_empty() {
                vec![(String::new(), &ty_node)]
            } else {
                names.iter().map(|n| (n.text().to_string(), n)).collect()
            };
            for (name, node) in declared {
                let obj = self
                    .symbols
                    .insert(name, ObjectKind::Var, self.pos(node), owner);
                self.symbols.set_type(obj, ty);
                match owner {
                    Owner::Result(_) => signature.results.push(obj),
                    _ => signature.params.push(obj),
                }
            }
        }
    }

    /// Receiver of a method declaration. Attaches the method to its base
    /// type and declares receiver type parameters (`func (l *List[T]) …`)
    /// into the innermost scope.
    pub(super) fn resolve_receiver(
        &mut self,
        method: SymbolId,
        node: &GoNode<'r>,
        sig: TypeId,
    ) -> (Option<SymbolId>, Vec<SymbolId>) {
        let Some(param) = node
            .field("receiver")
            .and_then(|list| children_of_kind(&list, syntax::PARAMETER_DECLARATION).into_iter().next())
        else {
            return (None, Vec::new());
        };
        let Some(ty_node) = param.field("type") else {
            return (None, Vec::new());
        };
        let pointer = is_kind(&ty_node, syntax::POINTER_TYPE);
        let base_node = if pointer {
            last_named_child(&ty_node)
        } else {
            Some(ty_node.clone())
        };
        let (name_node, args) = match base_node {
            Some(base) if is_kind(&base, syntax::GENERIC_TYPE) => {
                (base.field("type"), base.field("type_arguments"))
            }
            other => (other, None),
        };

        let base_obj = name_node.as_ref().and_then(|n| self.receiver_base(n));
        let base_ty = base_obj.map_or(TypeId::INVALID, |obj| self.symbols[obj].ty());
        match base_obj {
            Some(obj) => {
                if let Some(Type::Named(named)) = self.types.get_mut(base_ty) {
                    named.methods.push(method);
                }
                self.symbols.set_owner(method, Owner::Method(Some(obj)));
            }
            None => {
                if let Some(name) = &name_node {
                    self.error(name, format!("undefined receiver type {}", name.text()));
                }
            }
        }

        let recv_type_params = args
            .map(|list| self.declare_receiver_type_params(&list, base_ty))
            .unwrap_or_default();
        let mut recv_ty = if recv_type_params.is_empty() {
            base_ty
        } else {
            let args = recv_type_params
                .iter()
                .map(|p| self.symbols[*p].ty())
                .collect();
            self.types.push(Type::Instance {
                origin: base_ty,
                args,
            })
        };
        if pointer {
            recv_ty = self.types.push(Type::Pointer(recv_ty));
        }

        let name = param
            .field("name")
            .map(|n| n.text().to_string())
            .unwrap_or_default();
        let pos_node = param.field("name").unwrap_or(ty_node);
        let recv = self
            .symbols
            .insert(name, ObjectKind::Var, self.pos(&pos_node), Owner::Receiver(sig));
        self.symbols.set_type(recv, recv_ty);
        (Some(recv), recv_type_params)
    }

    /// Package-level defined type a receiver names, looking through aliases.
    fn receiver_base(&self, name: &GoNode<'r>) -> Option<SymbolId> {
        let obj = self.symbols.lookup(&name.text())?;
        let symbol = &self.symbols[obj];
        if symbol.kind() != ObjectKind::TypeName {
            return None;
        }
        match self.types.get(self.types.unalias(symbol.ty())) {
            Type::Named(named) => Some(named.obj),
            _ => None,
        }
    }

    fn declare_receiver_type_params(&mut self, list: &GoNode<'r>, base_ty: TypeId) -> Vec<SymbolId> {
        let base_params = match self.types.get(base_ty) {
            Type::Named(named) => named.type_params.clone(),
            _ => Vec::new(),
        };
        let mut params = Vec::new();
        for (i, arg) in named_children(list).iter().enumerate() {
            let ident = if is_kind(arg, syntax::TYPE_ELEM) {
                last_named_child(arg)
            } else {
                Some(arg.clone())
            };
            let Some(ident) = ident else {
                continue;
            };
            let constraint = base_params
                .get(i)
                .and_then(|p| match self.types.get(self.symbols[*p].ty()) {
                    Type::TypeParam { constraint, .. } => Some(*constraint),
                    _ => None,
                })
                .unwrap_or(TypeTable::basic(Basic::Any));
            let obj = self.symbols.insert(
                ident.text().to_string(),
                ObjectKind::TypeName,
                self.pos(&ident),
                Owner::TypeParam,
            );
            let ty = self.types.push(Type::TypeParam { obj, constraint });
            self.symbols.set_type(obj, ty);
            if let Some(scope) = self.scopes.last_mut() {
                scope.insert(ident.text().to_string(), obj);
            }
            params.push(obj);
        }
        params
    }

    pub(super) fn resolve_struct(&mut self, node: &GoNode<'r>) -> TypeId {
        let id = self.types.reserve();
        let mut st = StructType::default();
        let list = node
            .children()
            .find(|c| is_kind(c, syntax::FIELD_DECLARATION_LIST));
        let fields = list
            .map(|l| children_of_kind(&l, syntax::FIELD_DECLARATION))
            .unwrap_or_default();
        for field in &fields {
            let tag = field.field("tag").map(|t| syntax::unquote(&t.text()));
            let names = children_of_kind(field, syntax::FIELD_IDENTIFIER);
            let ty = self.resolve_child(field.field("type"));
            if names.is_empty() {
                let Some(name) = embedded_name(field) else {
                    continue;
                };
                let ty = if syntax::embeds_pointer(field) {
                    self.types.push(Type::Pointer(ty))
                } else {
                    ty
                };
                let obj = self.symbols.insert(
                    name.text().to_string(),
                    ObjectKind::Var,
                    self.pos(&name),
                    Owner::Field(id),
                );
                self.symbols.set_type(obj, ty);
                self.symbols.set_embedded(obj);
                st.fields.push(obj);
                st.tags.push(tag);
                continue;
            }
            for name in &names {
                let obj = self.symbols.insert(
                    name.text().to_string(),
                    ObjectKind::Var,
                    self.pos(name),
                    Owner::Field(id),
                );
                self.symbols.set_type(obj, ty);
                st.fields.push(obj);
                st.tags.push(tag.clone());
            }
        }
        self.types.set(id, Type::Struct(st));
        id
    }

    pub(super) fn resolve_interface(&mut self, node: &GoNode<'r>) -> TypeId {
        let id = self.types.reserve();
        let mut iface = InterfaceType::default();
        for child in node.children() {
            let kind = child.kind();
            match kind.as_ref() {
                syntax::METHOD_ELEM | syntax::METHOD_SPEC => {
                    let Some(name) = child.field("name") else {
                        continue;
                    };
                    let obj = self.symbols.insert(
                        name.text().to_string(),
                        ObjectKind::Func,
                        self.pos(&name),
                        Owner::InterfaceMethod(id),
                    );
                    let sig_id = self.types.reserve();
                    let sig =
                        self.resolve_signature(sig_id, child.field("parameters"), child.field("result"));
                    self.types.set(sig_id, Type::Signature(sig));
                    self.symbols.set_type(obj, sig_id);
                    iface.explicit.push(obj);
                }
                syntax::TYPE_ELEM | syntax::CONSTRAINT_ELEM => {
                    let ty = self.resolve_type_elem(&child);
                    iface.embeddeds.push(ty);
                }
                syntax::TYPE_IDENTIFIER | syntax::QUALIFIED_TYPE => {
                    let ty = self.resolve_type(&child);
                    iface.embeddeds.push(ty);
                }
                _ => {}
            }
        }
        iface.methods.clone_from(&iface.explicit);
        self.types.set(id, Type::Interface(iface));
        self.interfaces.push(id);
        id
    }
}
