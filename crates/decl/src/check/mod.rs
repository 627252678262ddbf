//! Declaration-level type checking for one Go package.
//!
//! The checker runs over every file of a package at once:
//!
//! 1. **Collect**: imports, then one symbol per package-level name (types,
//!    functions, methods, variables, constants), entered into package scope
//! 2. **Types**: resolve each type declaration's right-hand side, then
//!    compute underlying types with cycle detection
//! 3. **Functions**: signatures, receivers, attach methods to their base
//!    type, then the declarations inside each body
//! 4. **Values**: explicit types, else a type inferred from the initializer
//! 5. **Interfaces**: complete method sets, explicit methods first
//!
//! Statements in function bodies are not checked; only `type`, `var` and
//! `const` declarations and function literals become symbols, scoped to
//! their block. Anything that fails to resolve becomes [`TypeId::INVALID`]
//! plus a [`Diagnostic`].

mod infer;
mod resolve;

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::config::LoadMode;
use crate::parser::GoNode;
use crate::position::{FileId, Pos};
use crate::syntax::{self, children_of_kind, is_kind, offset, specs, unquote};
use crate::types::{
    Named, ObjectKind, Owner, Signature, SymbolId, SymbolTable, Type, TypeId, TypeTable,
};

/// A problem found while resolving declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub pos: Pos,
    pub message: String,
}

/// One import spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Import {
    pub path: String,
    /// Explicit name, `_` or `.` when written.
    pub name: Option<String>,
    pub pos: Pos,
}

impl Import {
    /// Name the import is referred to by in its file: the explicit name, or
    /// the last path element that is not a major version suffix.
    #[must_use]
    pub fn local_name(&self) -> &str {
        if let Some(name) = &self.name {
            return name;
        }
        let mut parts = self.path.rsplit('/');
        let last = parts.next().unwrap_or(&self.path);
        let is_version = last.len() > 1
            && last.starts_with('v')
            && last[1..].chars().all(|c| c.is_ascii_digit());
        if is_version {
            parts.next().unwrap_or(last)
        } else {
            last
        }
    }
}

pub(crate) struct ParsedFile<'r> {
    pub id: FileId,
    pub root: GoNode<'r>,
}

pub(crate) struct CheckOutput {
    pub symbols: SymbolTable,
    pub types: TypeTable,
    pub imports: Vec<Import>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Check a whole package. `mode` decides how far the checker goes.
pub(crate) fn check_package(files: &[ParsedFile<'_>], mode: LoadMode) -> CheckOutput {
    let mut checker = Checker::default();
    if mode >= LoadMode::ParseImports {
        for file in files {
            checker.collect_file(file, mode);
        }
    }
    if mode >= LoadMode::TypeCheck {
        checker.resolve_type_decls();
        checker.resolve_funcs();
        checker.resolve_values();
        checker.complete_interfaces();
    }
    debug!(
        symbols = checker.symbols.len(),
        types = checker.types.len(),
        imports = checker.imports.len(),
        diagnostics = checker.diagnostics.len(),
        "package checked"
    );
    CheckOutput {
        symbols: checker.symbols,
        types: checker.types,
        imports: checker.imports,
        diagnostics: checker.diagnostics,
    }
}

// ── Pending declarations ──────────────────────────────────────────

struct TypeDecl<'r> {
    obj: SymbolId,
    file: FileId,
    spec: GoNode<'r>,
    alias: bool,
}

struct FuncDecl<'r> {
    obj: SymbolId,
    file: FileId,
    node: GoNode<'r>,
    method: bool,
}

#[derive(Clone)]
struct ValueDecl<'r> {
    file: FileId,
    ty: Option<GoNode<'r>>,
    value: Option<GoNode<'r>>,
    constant: bool,
    /// Index into a multi-value initializer, `var a, b = f()`.
    tuple_index: Option<usize>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ResolveState {
    InProgress,
    Done,
}

#[derive(Default)]
struct Checker<'r> {
    symbols: SymbolTable,
    types: TypeTable,
    imports: Vec<Import>,
    diagnostics: Vec<Diagnostic>,
    file: Option<FileId>,
    /// Local import name → import path, per file.
    file_imports: HashMap<FileId, HashMap<String, String>>,
    /// Type parameter and block scopes, innermost last.
    scopes: Vec<HashMap<String, SymbolId>>,
    /// Nesting depth of function bodies being walked.
    body_depth: usize,
    func_literals: HashMap<Pos, TypeId>,
    type_decls: Vec<TypeDecl<'r>>,
    func_decls: Vec<FuncDecl<'r>>,
    value_decls: HashMap<SymbolId, ValueDecl<'r>>,
    value_order: Vec<SymbolId>,
    value_state: HashMap<SymbolId, ResolveState>,
    underlying_done: HashSet<TypeId>,
    interfaces: Vec<TypeId>,
}

impl<'r> Checker<'r> {
    fn current_file(&self) -> FileId {
        self.file.unwrap_or(FileId::from_index(0))
    }

    fn pos(&self, node: &GoNode<'_>) -> Pos {
        Pos::new(self.current_file(), offset(node))
    }

    fn error(&mut self, node: &GoNode<'_>, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            pos: self.pos(node),
            message: message.into(),
        };
        self.diagnostics.push(diagnostic);
    }

    /// Enter a package-level symbol into scope. Blank names and `init`
    /// functions are never declared.
    fn declare(&mut self, obj: SymbolId, node: &GoNode<'_>) {
        let symbol = &self.symbols[obj];
        let name = symbol.name().to_string();
        if name == "_" || (name == "init" && symbol.kind() == ObjectKind::Func) {
            return;
        }
        if self.symbols.declare(obj).is_err() {
            self.error(node, format!("{name} redeclared in this block"));
        }
    }

    /// Enter `obj` into the scope its owner implies: package scope, or the
    /// innermost block for function-local names.
    fn bind(&mut self, obj: SymbolId, node: &GoNode<'_>) {
        if self.symbols[obj].owner() != Owner::Local {
            self.declare(obj, node);
            return;
        }
        let name = self.symbols[obj].name().to_string();
        if let Some(scope) = self.scopes.last_mut().filter(|_| name != "_") {
            scope.insert(name, obj);
        }
    }

    /// Innermost binding of `name`: block and type parameter scopes first,
    /// then package scope.
    fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
            .or_else(|| self.symbols.lookup(name))
    }

    // ── Phase 1: collect ──────────────────────────────────────────

    fn collect_file(&mut self, file: &ParsedFile<'r>, mode: LoadMode) {
        self.file = Some(file.id);
        for decl in file.root.children() {
            let kind = decl.kind();
            match kind.as_ref() {
                syntax::IMPORT_DECLARATION => self.collect_imports(file.id, &decl),
                _ if mode < LoadMode::TypeCheck => {}
                syntax::TYPE_DECLARATION => self.collect_types(file.id, &decl, Owner::Package),
                syntax::FUNCTION_DECLARATION | syntax::METHOD_DECLARATION => {
                    self.collect_func(file.id, &decl);
                }
                syntax::VAR_DECLARATION | syntax::CONST_DECLARATION => {
                    self.collect_values(file.id, &decl, Owner::Package);
                }
                _ => {}
            }
        }
    }

    fn collect_imports(&mut self, file: FileId, decl: &GoNode<'r>) {
        for spec in specs(decl, &[syntax::IMPORT_SPEC]) {
            let Some(path) = spec.field("path") else {
                continue;
            };
            let name_node = spec.field("name");
            if let Some(node) = name_node
                .as_ref()
                .filter(|n| is_kind(*n, syntax::PACKAGE_IDENTIFIER))
            {
                self.symbols.insert(
                    node.text().to_string(),
                    ObjectKind::PkgName,
                    self.pos(node),
                    Owner::Package,
                );
            }
            let import = Import {
                path: unquote(&path.text()),
                name: name_node.map(|n| n.text().to_string()),
                pos: self.pos(&spec),
            };
            self.file_imports
                .entry(file)
                .or_default()
                .insert(import.local_name().to_string(), import.path.clone());
            self.imports.push(import);
        }
    }

    fn collect_types(&mut self, file: FileId, decl: &GoNode<'r>, owner: Owner) {
        for spec in specs(decl, &[syntax::TYPE_SPEC, syntax::TYPE_ALIAS]) {
            let Some(name) = spec.field("name") else {
                continue;
            };
            let alias = is_kind(&spec, syntax::TYPE_ALIAS);
            let obj = self.symbols.insert(
                name.text().to_string(),
                ObjectKind::TypeName,
                self.pos(&name),
                owner,
            );
            let shell = if alias {
                Type::Alias {
                    obj,
                    target: TypeId::INVALID,
                }
            } else {
                Type::Named(Named::new(obj))
            };
            let ty = self.types.push(shell);
            self.symbols.set_type(obj, ty);
            self.bind(obj, &name);
            self.type_decls.push(TypeDecl {
                obj,
                file,
                spec,
                alias,
            });
        }
    }

    fn collect_func(&mut self, file: FileId, decl: &GoNode<'r>) {
        let Some(name) = decl.field("name") else {
            return;
        };
        let method = is_kind(decl, syntax::METHOD_DECLARATION);
        let owner = if method {
            Owner::Method(None)
        } else {
            Owner::Package
        };
        let obj = self.symbols.insert(
            name.text().to_string(),
            ObjectKind::Func,
            self.pos(&name),
            owner,
        );
        if !method {
            self.declare(obj, &name);
        }
        self.func_decls.push(FuncDecl {
            obj,
            file,
            node: decl.clone(),
            method,
        });
    }

    fn collect_values(
        &mut self,
        file: FileId,
        decl: &GoNode<'r>,
        owner: Owner,
    ) -> Vec<SymbolId> {
        let constant = is_kind(decl, syntax::CONST_DECLARATION);
        let kind = if constant {
            ObjectKind::Const
        } else {
            ObjectKind::Var
        };
        // Constant specs without type and values repeat the previous spec.
        let mut inherited: (Option<GoNode<'r>>, Vec<GoNode<'r>>) = (None, Vec::new());
        let mut declared = Vec::new();
        for spec in specs(decl, &[syntax::VAR_SPEC, syntax::CONST_SPEC]) {
            let names = children_of_kind(&spec, syntax::IDENTIFIER);
            let mut ty = spec.field("type");
            let mut values = spec
                .field("value")
                .map(|list| syntax::named_children(&list))
                .unwrap_or_default();
            if constant {
                if ty.is_none() && values.is_empty() {
                    ty.clone_from(&inherited.0);
                    values.clone_from(&inherited.1);
                } else {
                    inherited = (ty.clone(), values.clone());
                }
            }
            let tuple = names.len() > 1 && values.len() == 1;
            for (i, name) in names.iter().enumerate() {
                let obj = self
                    .symbols
                    .insert(name.text().to_string(), kind, self.pos(name), owner);
                self.bind(obj, name);
                let value = if tuple {
                    values.first().cloned()
                } else {
                    values.get(i).cloned()
                };
                if owner == Owner::Package {
                    self.value_order.push(obj);
                }
                declared.push(obj);
                self.value_decls.insert(
                    obj,
                    ValueDecl {
                        file,
                        ty: ty.clone(),
                        value,
                        constant,
                        tuple_index: tuple.then_some(i),
                    },
                );
            }
        }
        declared
    }

    // ── Phase 2: type declarations ────────────────────────────────

    fn resolve_type_decls(&mut self) {
        let decls = std::mem::take(&mut self.type_decls);
        self.resolve_type_specs(&decls);
        debug!(types = decls.len(), "type declarations resolved");
    }

    /// Right-hand sides first, then underlying types, so that specs in one
    /// group may refer to each other in any order.
    fn resolve_type_specs(&mut self, decls: &[TypeDecl<'r>]) {
        for decl in decls {
            self.file = Some(decl.file);
            let ty = self.symbols[decl.obj].ty();
            if decl.alias {
                let target = decl
                    .spec
                    .field("type")
                    .map_or(TypeId::INVALID, |n| self.resolve_type(&n));
                if let Some(Type::Alias { target: slot, .. }) = self.types.get_mut(ty) {
                    *slot = target;
                }
                continue;
            }
            self.scopes.push(HashMap::new());
            let params = decl
                .spec
                .field("type_parameters")
                .map(|list| self.declare_type_params(&list))
                .unwrap_or_default();
            let rhs = decl
                .spec
                .field("type")
                .map_or(TypeId::INVALID, |n| self.resolve_type(&n));
            self.scopes.pop();
            if let Some(Type::Named(named)) = self.types.get_mut(ty) {
                named.rhs = rhs;
                named.type_params = params;
            }
        }
        for decl in decls {
            if !decl.alias {
                self.file = Some(decl.file);
                let ty = self.symbols[decl.obj].ty();
                self.underlying_of(ty, &mut Vec::new());
            }
        }
    }

    /// Underlying type of `id`, computing and caching it for named types.
    fn underlying_of(&mut self, id: TypeId, visiting: &mut Vec<TypeId>) -> TypeId {
        let next = match self.types.get(id) {
            Type::Named(named) => {
                if self.underlying_done.contains(&id) {
                    return named.underlying;
                }
                named.rhs
            }
            Type::Alias { target, .. } => *target,
            Type::Instance { origin, .. } => *origin,
            _ => return id,
        };
        if visiting.contains(&id) {
            self.report_cycle(id);
            return TypeId::INVALID;
        }
        visiting.push(id);
        let underlying = self.underlying_of(next, visiting);
        visiting.pop();
        if let Some(Type::Named(named)) = self.types.get_mut(id) {
            named.underlying = underlying;
            self.underlying_done.insert(id);
        }
        underlying
    }

    fn report_cycle(&mut self, id: TypeId) {
        let obj = match self.types.get(id) {
            Type::Named(named) => named.obj,
            Type::Alias { obj, .. } => *obj,
            _ => return,
        };
        let symbol = &self.symbols[obj];
        let diagnostic = Diagnostic {
            pos: symbol.pos(),
            message: format!("invalid recursive type {}", symbol.name()),
        };
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
    }

    // ── Phase 3: functions and methods ────────────────────────────

    fn resolve_funcs(&mut self) {
        let decls = std::mem::take(&mut self.func_decls);
        let mut bodies = Vec::new();
        for decl in &decls {
            self.file = Some(decl.file);
            let sig_id = self.types.reserve();
            self.scopes.push(HashMap::new());
            let (recv, recv_type_params) = if decl.method {
                self.resolve_receiver(decl.obj, &decl.node, sig_id)
            } else {
                (None, Vec::new())
            };
            let type_params = decl
                .node
                .field("type_parameters")
                .map(|list| self.declare_type_params(&list))
                .unwrap_or_default();
            let mut sig =
                self.resolve_signature(sig_id, decl.node.field("parameters"), decl.node.field("result"));
            sig.recv = recv;
            self.bind_signature(&sig);
            let scope = self.scopes.pop().unwrap_or_default();
            if let Some(body) = decl.node.field("body") {
                bodies.push((decl.file, scope, body));
            }
            sig.recv_type_params = recv_type_params;
            sig.type_params = type_params;
            self.types.set(sig_id, Type::Signature(sig));
            self.symbols.set_type(decl.obj, sig_id);
        }
        debug!(funcs = decls.len(), "function signatures resolved");

        // Every signature resolves before any body is walked.
        let walked = bodies.len();
        for (file, scope, body) in bodies {
            self.file = Some(file);
            self.scopes.push(scope);
            self.walk_block(&body);
            self.scopes.pop();
        }
        debug!(bodies = walked, "function bodies walked");
    }

    /// Make a signature's named variables visible to the body.
    fn bind_signature(&mut self, sig: &Signature) {
        let vars = sig.recv.iter().chain(&sig.params).chain(&sig.results);
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        for &obj in vars {
            let name = self.symbols[obj].name();
            if !name.is_empty() && name != "_" {
                scope.insert(name.to_string(), obj);
            }
        }
    }

    fn walk_block(&mut self, block: &GoNode<'r>) {
        self.scopes.push(HashMap::new());
        self.body_depth += 1;
        self.walk_body(block);
        self.body_depth -= 1;
        self.scopes.pop();
    }

    /// Declarations and function literals under `node`, in source order.
    fn walk_body(&mut self, node: &GoNode<'r>) {
        for child in node.children() {
            let kind = child.kind();
            match kind.as_ref() {
                syntax::BLOCK => self.walk_block(&child),
                syntax::FUNC_LITERAL => {
                    self.resolve_func_literal(&child);
                }
                syntax::TYPE_DECLARATION => {
                    self.collect_types(self.current_file(), &child, Owner::Local);
                    let decls = std::mem::take(&mut self.type_decls);
                    self.resolve_type_specs(&decls);
                }
                syntax::VAR_DECLARATION | syntax::CONST_DECLARATION => {
                    let locals = self.collect_values(self.current_file(), &child, Owner::Local);
                    for obj in locals {
                        self.value_type(obj);
                    }
                    // Literals in initializers that inference did not reach.
                    self.walk_body(&child);
                }
                _ => self.walk_body(&child),
            }
        }
    }

    /// Signature of a function literal, declaring its parameters and
    /// walking its body once.
    fn resolve_func_literal(&mut self, node: &GoNode<'r>) -> TypeId {
        let pos = self.pos(node);
        if let Some(&id) = self.func_literals.get(&pos) {
            return id;
        }
        let id = self.types.reserve();
        self.func_literals.insert(pos, id);
        let sig = self.resolve_signature(id, node.field("parameters"), node.field("result"));
        self.scopes.push(HashMap::new());
        self.bind_signature(&sig);
        self.types.set(id, Type::Signature(sig));
        if let Some(body) = node.field("body") {
            self.walk_block(&body);
        }
        self.scopes.pop();
        id
    }

    // ── Phase 4: package-level values ─────────────────────────────

    fn resolve_values(&mut self) {
        let order = self.value_order.clone();
        for obj in order {
            self.value_type(obj);
        }
        debug!(values = self.value_order.len(), "package values resolved");
    }

    // ── Phase 5: interface method sets ────────────────────────────

    fn complete_interfaces(&mut self) {
        let mut done = HashSet::new();
        for id in self.interfaces.clone() {
            self.complete_interface(id, &mut done, &mut Vec::new());
        }
    }

    /// Complete method set of the interface `id`: explicit methods in
    /// declaration order, then methods promoted from embedded interfaces.
    fn complete_interface(
        &mut self,
        id: TypeId,
        done: &mut HashSet<TypeId>,
        visiting: &mut Vec<TypeId>,
    ) -> (Vec<SymbolId>, bool) {
        let Type::Interface(iface) = self.types.get(id) else {
            return (Vec::new(), false);
        };
        if done.contains(&id) {
            return (iface.methods.clone(), iface.external_embeds);
        }
        if visiting.contains(&id) {
            return (Vec::new(), false);
        }
        let mut methods = iface.explicit.clone();
        let embeddeds = iface.embeddeds.clone();
        let mut external = false;
        visiting.push(id);
        for embedded in embeddeds {
            let underlying = self.types.underlying(embedded);
            if matches!(self.types.get(underlying), Type::External { .. }) {
                external = true;
                continue;
            }
            let (promoted, promoted_external) =
                self.complete_interface(underlying, done, visiting);
            external |= promoted_external;
            for method in promoted {
                let name = self.symbols[method].name();
                if !methods.iter().any(|m| self.symbols[*m].name() == name) {
                    methods.push(method);
                }
            }
        }
        visiting.pop();
        done.insert(id);
        if let Some(Type::Interface(iface)) = self.types.get_mut(id) {
            iface.methods.clone_from(&methods);
            iface.external_embeds = external;
        }
        (methods, external)
    }
}

#[cfg(test)]
mod tests;
