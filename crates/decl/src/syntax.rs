//! Go grammar helpers over ast-grep nodes: kind names, declared names and
//! comment-group discovery.

use ast_grep_core::{Doc, Node};

use crate::comments::CommentGroup;

// ── Node kinds ────────────────────────────────────────────────────

pub(crate) const COMMENT: &str = "comment";
pub(crate) const PACKAGE_CLAUSE: &str = "package_clause";
pub(crate) const PACKAGE_IDENTIFIER: &str = "package_identifier";
pub(crate) const IDENTIFIER: &str = "identifier";
pub(crate) const FIELD_IDENTIFIER: &str = "field_identifier";
pub(crate) const TYPE_IDENTIFIER: &str = "type_identifier";

pub(crate) const IMPORT_DECLARATION: &str = "import_declaration";
pub(crate) const IMPORT_SPEC: &str = "import_spec";
pub(crate) const TYPE_DECLARATION: &str = "type_declaration";
pub(crate) const TYPE_SPEC: &str = "type_spec";
pub(crate) const TYPE_ALIAS: &str = "type_alias";
pub(crate) const VAR_DECLARATION: &str = "var_declaration";
pub(crate) const VAR_SPEC: &str = "var_spec";
pub(crate) const CONST_DECLARATION: &str = "const_declaration";
pub(crate) const CONST_SPEC: &str = "const_spec";
pub(crate) const FUNCTION_DECLARATION: &str = "function_declaration";
pub(crate) const METHOD_DECLARATION: &str = "method_declaration";
pub(crate) const FUNC_LITERAL: &str = "func_literal";
pub(crate) const BLOCK: &str = "block";
pub(crate) const STATEMENT_LIST: &str = "statement_list";

pub(crate) const FIELD_DECLARATION_LIST: &str = "field_declaration_list";
pub(crate) const FIELD_DECLARATION: &str = "field_declaration";
pub(crate) const METHOD_ELEM: &str = "method_elem";
pub(crate) const METHOD_SPEC: &str = "method_spec";
pub(crate) const TYPE_ELEM: &str = "type_elem";
pub(crate) const CONSTRAINT_ELEM: &str = "constraint_elem";
pub(crate) const TYPE_CONSTRAINT: &str = "type_constraint";
pub(crate) const PARAMETER_LIST: &str = "parameter_list";
pub(crate) const PARAMETER_DECLARATION: &str = "parameter_declaration";
pub(crate) const VARIADIC_PARAMETER_DECLARATION: &str = "variadic_parameter_declaration";
pub(crate) const TYPE_PARAMETER_DECLARATION: &str = "type_parameter_declaration";

pub(crate) const QUALIFIED_TYPE: &str = "qualified_type";
pub(crate) const GENERIC_TYPE: &str = "generic_type";
pub(crate) const POINTER_TYPE: &str = "pointer_type";
pub(crate) const SLICE_TYPE: &str = "slice_type";
pub(crate) const ARRAY_TYPE: &str = "array_type";
pub(crate) const IMPLICIT_LENGTH_ARRAY_TYPE: &str = "implicit_length_array_type";
pub(crate) const MAP_TYPE: &str = "map_type";
pub(crate) const CHANNEL_TYPE: &str = "channel_type";
pub(crate) const FUNCTION_TYPE: &str = "function_type";
pub(crate) const STRUCT_TYPE: &str = "struct_type";
pub(crate) const INTERFACE_TYPE: &str = "interface_type";
pub(crate) const PARENTHESIZED_TYPE: &str = "parenthesized_type";
pub(crate) const NEGATED_TYPE: &str = "negated_type";

/// Spec lists that wrap grouped `( … )` declarations.
const SPEC_LISTS: &[&str] = &["import_spec_list", "var_spec_list", "const_spec_list"];

// ── Node basics ───────────────────────────────────────────────────

pub(crate) fn is_kind<D: Doc>(node: &Node<D>, kind: &str) -> bool {
    node.kind().as_ref() == kind
}

pub(crate) fn is_kind_in<D: Doc>(node: &Node<D>, kinds: &[&str]) -> bool {
    let kind = node.kind();
    kinds.contains(&kind.as_ref())
}

/// Go visibility: a name is exported when it starts with an upper-case letter.
pub(crate) fn is_exported(name: &str) -> bool {
    name.starts_with(char::is_uppercase)
}

/// Byte offset at which `node` starts.
pub(crate) fn offset<D: Doc>(node: &Node<D>) -> u32 {
    u32::try_from(node.range().start).unwrap_or(u32::MAX)
}

pub(crate) fn children_of_kind<'r, D: Doc>(node: &Node<'r, D>, kind: &str) -> Vec<Node<'r, D>> {
    node.children().filter(|c| is_kind(c, kind)).collect()
}

/// Named children, comments excluded.
pub(crate) fn named_children<'r, D: Doc>(node: &Node<'r, D>) -> Vec<Node<'r, D>> {
    node.children()
        .filter(|c| c.is_named() && !is_kind(c, COMMENT))
        .collect()
}

pub(crate) fn last_named_child<'r, D: Doc>(node: &Node<'r, D>) -> Option<Node<'r, D>> {
    named_children(node).pop()
}

/// Specs of a declaration with one of `kinds`, flattening `( … )` lists.
pub(crate) fn specs<'r, D: Doc>(decl: &Node<'r, D>, kinds: &[&str]) -> Vec<Node<'r, D>> {
    let mut out = Vec::new();
    for child in decl.children() {
        if is_kind_in(&child, kinds) {
            out.push(child);
        } else if is_kind_in(&child, SPEC_LISTS) {
            out.extend(child.children().filter(|c| is_kind_in(c, kinds)));
        }
    }
    out
}

/// Identifier naming an embedded struct field: the base type name of
/// `T`, `*T`, `pkg.T` or `T[A]`.
pub(crate) fn embedded_name<'r, D: Doc>(field: &Node<'r, D>) -> Option<Node<'r, D>> {
    let mut ty = field.field("type")?;
    loop {
        if is_kind(&ty, TYPE_IDENTIFIER) {
            return Some(ty);
        }
        if is_kind(&ty, QUALIFIED_TYPE) {
            return ty.field("name");
        }
        let inner = if is_kind(&ty, GENERIC_TYPE) {
            ty.field("type")
        } else if is_kind(&ty, POINTER_TYPE) {
            last_named_child(&ty)
        } else {
            None
        };
        ty = inner?;
    }
}

/// Whether an embedded field is written `*T`.
pub(crate) fn embeds_pointer<D: Doc>(field: &Node<D>) -> bool {
    field.children().any(|c| is_kind(&c, "*"))
}

/// Strip the quotes of a Go string literal. Escapes are left as written.
pub(crate) fn unquote(literal: &str) -> String {
    let inner = literal
        .strip_prefix('`')
        .and_then(|s| s.strip_suffix('`'))
        .or_else(|| literal.strip_prefix('"').and_then(|s| s.strip_suffix('"')));
    inner.unwrap_or(literal).to_string()
}

// ── Comment groups ────────────────────────────────────────────────

fn is_terminator<D: Doc>(node: &Node<D>) -> bool {
    let kind = node.kind();
    kind.as_ref() == ";" || kind.chars().all(|c| c.is_whitespace() || c == '\0')
}

/// Comments above the first statement of a block sit beside the
/// `statement_list`, not inside it.
fn enclosing_prev<'r, D: Doc>(node: &Node<'r, D>) -> Option<Node<'r, D>> {
    node.parent()
        .filter(|parent| is_kind(parent, STATEMENT_LIST))
        .and_then(|list| list.prev())
}

/// End line of the nearest named sibling at or before `node`.
fn named_end_line<D: Doc>(node: Node<D>) -> Option<usize> {
    let mut current = Some(node);
    while let Some(sibling) = current {
        if sibling.is_named() && !is_kind(&sibling, COMMENT) {
            return Some(sibling.end_pos().line());
        }
        current = sibling.prev();
    }
    None
}

/// Comment group documenting `node`: the run of comments with no blank
/// line inside it whose last comment ends on the line directly above
/// `node`.
///
/// Comments that start on the line where the previous named sibling ends
/// trail that sibling and are left out.
pub(crate) fn doc_group<D: Doc>(node: &Node<D>) -> Option<CommentGroup> {
    let mut comments = Vec::new();
    let mut next_line = node.start_pos().line();
    let mut boundary = None;
    let mut opener = None;
    let mut current = node.prev().or_else(|| enclosing_prev(node));
    while let Some(sibling) = current {
        current = sibling.prev();
        if is_kind(&sibling, COMMENT) {
            let end = sibling.end_pos().line();
            let adjacent = if comments.is_empty() {
                end + 1 == next_line
            } else {
                end + 1 >= next_line
            };
            if !adjacent {
                break;
            }
            next_line = sibling.start_pos().line();
            comments.push(sibling);
        } else if !is_terminator(&sibling) {
            let line = sibling.end_pos().line();
            boundary = named_end_line(sibling);
            if boundary.is_none() {
                opener = Some(line);
            }
            break;
        }
    }
    if let Some(line) = boundary {
        comments.retain(|c| c.start_pos().line() > line);
    } else if let Some(line) = opener {
        // A comment on the `{` line documents the first member only when
        // no comment follows it.
        if comments.iter().any(|c| c.start_pos().line() > line) {
            comments.retain(|c| c.start_pos().line() > line);
        }
    }
    comments.reverse();
    CommentGroup::from_nodes(&comments)
}

/// Comments starting on the line where `node` ends, directly after it.
pub(crate) fn trailing_group<D: Doc>(node: &Node<D>) -> Option<CommentGroup> {
    let line = node.end_pos().line();
    let mut comments = Vec::new();
    let mut current = node.next();
    while let Some(sibling) = current {
        current = sibling.next();
        if is_kind(&sibling, COMMENT) {
            if sibling.start_pos().line() != line {
                break;
            }
            comments.push(sibling);
        } else if !is_kind_in(&sibling, &[",", ";"]) {
            break;
        }
    }
    CommentGroup::from_nodes(&comments)
}
