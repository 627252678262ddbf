//! Types of variables and constants declared with `var` and `const`.
//!
//! Only what a declaration needs is inferred: literal kinds, references to
//! other declared names, composite literals, conversions and the results
//! of calls to declared functions. Names bound by statements the checker
//! does not visit infer to [`TypeId::INVALID`] without a diagnostic.

use super::{Checker, Diagnostic, ResolveState};
use crate::parser::GoNode;
use crate::syntax::{self, is_kind, last_named_child, named_children};
use crate::types::{Basic, ObjectKind, Owner, SymbolId, Type, TypeId, TypeTable};

const COMPARISON_OPS: &[&str] = &["==", "!=", "<", "<=", ">", ">="];
const SHIFT_OPS: &[&str] = &["<<", ">>"];

impl<'r> Checker<'r> {
    /// Type of a declared value, resolving it on first use. Package-level
    /// values resolve outside any function scope.
    pub(super) fn value_type(&mut self, obj: SymbolId) -> TypeId {
        match self.value_state.get(&obj) {
            Some(ResolveState::Done) => return self.symbols[obj].ty(),
            Some(ResolveState::InProgress) => {
                self.report_init_cycle(obj);
                return TypeId::INVALID;
            }
            None => {}
        }
        let Some(decl) = self.value_decls.get(&obj).cloned() else {
            return self.symbols[obj].ty();
        };
        self.value_state.insert(obj, ResolveState::InProgress);
        let saved = self.file.replace(decl.file);
        let outer = (self.symbols[obj].owner() == Owner::Package).then(|| {
            (
                std::mem::take(&mut self.scopes),
                std::mem::take(&mut self.body_depth),
            )
        });

        let ty = match (&decl.ty, &decl.value) {
            (Some(ty), _) => self.resolve_type(ty),
            (None, Some(value)) => {
                let inferred = self.infer(value, decl.tuple_index);
                if decl.constant {
                    inferred
                } else {
                    self.default_type(inferred)
                }
            }
            (None, None) => TypeId::INVALID,
        };

        if let Some((scopes, depth)) = outer {
            self.scopes = scopes;
            self.body_depth = depth;
        }
        self.file = saved;
        self.symbols.set_type(obj, ty);
        self.value_state.insert(obj, ResolveState::Done);
        ty
    }

    fn report_init_cycle(&mut self, obj: SymbolId) {
        let symbol = &self.symbols[obj];
        let diagnostic = Diagnostic {
            pos: symbol.pos(),
            message: format!("initialization cycle for {}", symbol.name()),
        };
        if !self.diagnostics.contains(&diagnostic) {
            self.diagnostics.push(diagnostic);
        }
    }

    fn default_type(&self, ty: TypeId) -> TypeId {
        match self.types.get(ty) {
            Type::Basic(basic) if basic.is_untyped() => TypeTable::basic(basic.default_type()),
            _ => ty,
        }
    }

    fn untyped_kind(&self, ty: TypeId) -> Option<Basic> {
        match self.types.get(ty) {
            Type::Basic(basic) if basic.is_untyped() => Some(*basic),
            _ => None,
        }
    }

    fn infer(&mut self, expr: &GoNode<'r>, tuple_index: Option<usize>) -> TypeId {
        let kind = expr.kind();
        match kind.as_ref() {
            "int_literal" | "iota" => TypeTable::basic(Basic::UntypedInt),
            "float_literal" => TypeTable::basic(Basic::UntypedFloat),
            "imaginary_literal" => TypeTable::basic(Basic::UntypedComplex),
            "rune_literal" => TypeTable::basic(Basic::UntypedRune),
            "interpreted_string_literal" | "raw_string_literal" => {
                TypeTable::basic(Basic::UntypedString)
            }
            "true" | "false" => TypeTable::basic(Basic::UntypedBool),
            "nil" => TypeId::INVALID,
            syntax::IDENTIFIER => self.infer_name(expr),
            "parenthesized_expression" => self.infer_child(last_named_child(expr), tuple_index),
            "composite_literal" => expr
                .field("type")
                .map_or(TypeId::INVALID, |ty| self.resolve_type(&ty)),
            "type_conversion_expression" => expr
                .field("type")
                .map_or(TypeId::INVALID, |ty| self.resolve_type(&ty)),
            syntax::FUNC_LITERAL => self.resolve_func_literal(expr),
            "unary_expression" => self.infer_unary(expr),
            "binary_expression" => self.infer_binary(expr),
            "call_expression" => self.infer_call(expr, tuple_index),
            "index_expression" => {
                let operand = self.infer_child(expr.field("operand"), None);
                match self.types.get(self.types.underlying(operand)) {
                    Type::Map { .. } if tuple_index == Some(1) => TypeTable::basic(Basic::Bool),
                    Type::Map { value, .. } => *value,
                    Type::Slice(elem) | Type::Array { elem, .. } => *elem,
                    Type::Basic(Basic::String) => TypeTable::basic(Basic::Byte),
                    _ => TypeId::INVALID,
                }
            }
            "slice_expression" => self.infer_child(expr.field("operand"), None),
            "type_assertion_expression" => {
                if tuple_index == Some(1) {
                    TypeTable::basic(Basic::Bool)
                } else {
                    expr.field("type")
                        .map_or(TypeId::INVALID, |ty| self.resolve_type(&ty))
                }
            }
            _ => TypeId::INVALID,
        }
    }

    fn infer_child(&mut self, node: Option<GoNode<'r>>, tuple_index: Option<usize>) -> TypeId {
        node.map_or(TypeId::INVALID, |n| self.infer(&n, tuple_index))
    }

    fn infer_name(&mut self, ident: &GoNode<'r>) -> TypeId {
        let name = ident.text();
        let Some(obj) = self.lookup(&name) else {
            return match name.as_ref() {
                "true" | "false" => TypeTable::basic(Basic::UntypedBool),
                "iota" => TypeTable::basic(Basic::UntypedInt),
                "nil" => TypeId::INVALID,
                _ if self.body_depth > 0 => TypeId::INVALID,
                _ => {
                    self.error(ident, format!("undefined: {name}"));
                    TypeId::INVALID
                }
            };
        };
        match self.symbols[obj].kind() {
            ObjectKind::Var | ObjectKind::Const => self.value_type(obj),
            ObjectKind::Func => self.symbols[obj].ty(),
            ObjectKind::TypeName | ObjectKind::PkgName => {
                self.error(ident, format!("{name} is not an expression"));
                TypeId::INVALID
            }
        }
    }

    fn infer_unary(&mut self, expr: &GoNode<'r>) -> TypeId {
        let operator = expr
            .field("operator")
            .map(|op| op.text().to_string())
            .unwrap_or_default();
        let operand = self.infer_child(expr.field("operand"), None);
        match operator.as_str() {
            "&" => self.types.push(Type::Pointer(operand)),
            "*" => match self.types.get(self.types.underlying(operand)) {
                Type::Pointer(elem) => *elem,
                _ => TypeId::INVALID,
            },
            "<-" => match self.types.get(self.types.underlying(operand)) {
                Type::Chan { elem, .. } => *elem,
                _ => TypeId::INVALID,
            },
            _ => operand,
        }
    }

    fn infer_binary(&mut self, expr: &GoNode<'r>) -> TypeId {
        let operator = expr
            .field("operator")
            .map(|op| op.text().to_string())
            .unwrap_or_default();
        if COMPARISON_OPS.contains(&operator.as_str()) {
            return TypeTable::basic(Basic::UntypedBool);
        }
        let left = self.infer_child(expr.field("left"), None);
        if SHIFT_OPS.contains(&operator.as_str()) {
            return left;
        }
        let right = self.infer_child(expr.field("right"), None);
        match (self.untyped_kind(left), self.untyped_kind(right)) {
            (None, _) if left != TypeId::INVALID => left,
            (_, None) if right != TypeId::INVALID => right,
            (Some(l), Some(r)) => match (l.untyped_rank(), r.untyped_rank()) {
                (Some(lr), Some(rr)) if rr > lr => right,
                _ => left,
            },
            _ => TypeId::INVALID,
        }
    }

    fn infer_call(&mut self, expr: &GoNode<'r>, tuple_index: Option<usize>) -> TypeId {
        let Some(function) = expr.field("function") else {
            return TypeId::INVALID;
        };
        let args = expr
            .field("arguments")
            .map(|list| named_children(&list))
            .unwrap_or_default();

        let callee = if is_kind(&function, syntax::IDENTIFIER) {
            let name = function.text();
            match self.lookup(&name) {
                Some(obj) if self.symbols[obj].kind() == ObjectKind::TypeName => {
                    return self.symbols[obj].ty();
                }
                Some(_) => self.infer(&function, None),
                None => return self.infer_builtin(&name, &args),
            }
        } else if is_kind(&function, "parenthesized_expression") {
            // `(*T)(x)` and friends are conversions.
            return last_named_child(&function)
                .map_or(TypeId::INVALID, |ty| self.resolve_type(&ty));
        } else {
            self.infer(&function, None)
        };

        let Type::Signature(sig) = self.types.get(self.types.underlying(callee)) else {
            return TypeId::INVALID;
        };
        let result = match tuple_index {
            Some(i) => sig.results.get(i),
            None if sig.results.len() == 1 => sig.results.first(),
            None => None,
        };
        result.map_or(TypeId::INVALID, |r| self.symbols[*r].ty())
    }

    fn infer_builtin(&mut self, name: &str, args: &[GoNode<'r>]) -> TypeId {
        let first = args.first();
        match name {
            "len" | "cap" | "copy" => TypeTable::basic(Basic::Int),
            "real" | "imag" => TypeTable::basic(Basic::Float64),
            "complex" => TypeTable::basic(Basic::Complex128),
            "new" => {
                let elem = first.map_or(TypeId::INVALID, |ty| self.resolve_type(ty));
                self.types.push(Type::Pointer(elem))
            }
            "make" => first.map_or(TypeId::INVALID, |ty| self.resolve_type(ty)),
            "append" | "min" | "max" => first.map_or(TypeId::INVALID, |arg| self.infer(arg, None)),
            other => Basic::from_name(other).map_or(TypeId::INVALID, TypeTable::basic),
        }
    }
}
