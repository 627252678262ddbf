//! Position-keyed store of raw comment groups.
//!
//! One pass per file records, at the position of each declared name, the
//! comment groups syntactically attached to its declaration:
//!
//! - type and single-name value specs: the spec's doc group, else the
//!   enclosing declaration's
//! - functions and methods: the declaration's doc group
//! - struct fields, interface methods and parameters: the trailing group
//!   followed by the doc group
//!
//! Multi-name value specs (`var A, B int`) record nothing.

use std::collections::HashMap;

use ast_grep_core::{Doc, Node};

use crate::parser::GoNode;
use crate::position::{FileId, Pos};
use crate::syntax::{self, doc_group, offset, trailing_group};

/// Consecutive comments with no blank line between them.
///
/// Each entry is one comment token as written (`// …` or `/* … */`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentGroup {
    list: Vec<String>,
    start_line: usize,
    end_line: usize,
}

impl CommentGroup {
    pub(crate) fn from_nodes<D: Doc>(nodes: &[Node<D>]) -> Option<Self> {
        let (first, last) = (nodes.first()?, nodes.last()?);
        Some(Self {
            list: nodes.iter().map(|n| n.text().to_string()).collect(),
            start_line: first.start_pos().line() + 1,
            end_line: last.end_pos().line() + 1,
        })
    }

    /// Raw comment tokens in source order.
    #[must_use]
    pub fn list(&self) -> &[String] {
        &self.list
    }

    /// 1-based line of the first comment.
    #[must_use]
    pub const fn start_line(&self) -> usize {
        self.start_line
    }

    /// 1-based line on which the last comment ends.
    #[must_use]
    pub const fn end_line(&self) -> usize {
        self.end_line
    }
}

/// Raw comment groups by the position of the name they document.
#[derive(Debug, Default)]
pub struct CommentStore {
    entries: HashMap<Pos, Vec<Option<CommentGroup>>>,
}

impl CommentStore {
    /// Record every declaration in one parsed file.
    pub(crate) fn record_file(&mut self, file: FileId, root: &GoNode<'_>) {
        for node in root.dfs() {
            let kind = node.kind();
            match kind.as_ref() {
                syntax::TYPE_DECLARATION => self.record_types(file, &node),
                syntax::VAR_DECLARATION | syntax::CONST_DECLARATION => {
                    self.record_values(file, &node);
                }
                syntax::FUNCTION_DECLARATION | syntax::METHOD_DECLARATION => {
                    if let Some(name) = node.field("name") {
                        self.insert(file, &name, vec![doc_group(&node)]);
                    }
                }
                syntax::FIELD_DECLARATION => {
                    let mut names = syntax::children_of_kind(&node, syntax::FIELD_IDENTIFIER);
                    if names.is_empty() {
                        names.extend(syntax::embedded_name(&node));
                    }
                    self.record_members(file, &node, &names);
                }
                syntax::METHOD_ELEM | syntax::METHOD_SPEC => {
                    let names: Vec<_> = node.field("name").into_iter().collect();
                    self.record_members(file, &node, &names);
                }
                syntax::PARAMETER_DECLARATION | syntax::VARIADIC_PARAMETER_DECLARATION => {
                    let names = syntax::children_of_kind(&node, syntax::IDENTIFIER);
                    self.record_members(file, &node, &names);
                }
                _ => {}
            }
        }
    }

    fn record_types(&mut self, file: FileId, decl: &GoNode<'_>) {
        let decl_doc = doc_group(decl);
        for spec in syntax::specs(decl, &[syntax::TYPE_SPEC, syntax::TYPE_ALIAS]) {
            let Some(name) = spec.field("name") else {
                continue;
            };
            let doc = doc_group(&spec).or_else(|| decl_doc.clone());
            self.insert(file, &name, vec![doc]);
        }
    }

    fn record_values(&mut self, file: FileId, decl: &GoNode<'_>) {
        let decl_doc = doc_group(decl);
        for spec in syntax::specs(decl, &[syntax::VAR_SPEC, syntax::CONST_SPEC]) {
            let names = syntax::children_of_kind(&spec, syntax::IDENTIFIER);
            let [name] = names.as_slice() else {
                continue;
            };
            let doc = doc_group(&spec).or_else(|| decl_doc.clone());
            self.insert(file, name, vec![doc]);
        }
    }

    fn record_members(&mut self, file: FileId, member: &GoNode<'_>, names: &[GoNode<'_>]) {
        if names.is_empty() {
            return;
        }
        let trailing = trailing_group(member);
        let doc = doc_group(member);
        for name in names {
            self.insert(file, name, vec![trailing.clone(), doc.clone()]);
        }
    }

    fn insert(&mut self, file: FileId, name: &GoNode<'_>, groups: Vec<Option<CommentGroup>>) {
        self.entries.insert(Pos::new(file, offset(name)), groups);
    }

    /// Recorded groups at `pos`, absent slots included. Empty when nothing
    /// was recorded.
    #[must_use]
    pub fn raw(&self, pos: Pos) -> &[Option<CommentGroup>] {
        self.entries.get(&pos).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, pos: Pos) -> bool {
        self.entries.contains_key(&pos)
    }

    /// Number of recorded positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
