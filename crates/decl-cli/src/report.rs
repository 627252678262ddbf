//! Turns a module view into serializable records.

use std::collections::BTreeMap;

use decl::{Comments, Decl, DeclKind, Declaration, Module, Symbol, prefix};
use decl_config::OutputConfig;
use serde::Serialize;

use crate::cli::View;

/// One printed declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<DeclKind>,
    pub name: String,
    #[serde(skip)]
    pub exported: bool,
    pub description: String,
    pub location: String,
    pub comments: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directives: Option<BTreeMap<String, String>>,
}

/// A struct field, interface method or parameter with its comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub name: String,
    pub description: String,
    pub comments: Vec<String>,
}

/// Records for `view`, filtered by the output options and `directive`.
#[must_use]
pub fn collect(
    module: &Module,
    view: View,
    output: &OutputConfig,
    directive: Option<&str>,
) -> Vec<Record> {
    let records: Vec<Record> = match view {
        View::Definitions => module
            .definitions()
            .map(|(symbol, comments)| symbol_record(module, symbol, comments))
            .collect(),
        View::Declarations => module
            .declarations()
            .map(|(decl, comments)| decl_record(module, &decl, comments))
            .collect(),
        View::Types => module
            .named_types()
            .filter_map(|(t, comments)| Some((module.classify(t.id())?, comments)))
            .map(|(decl, comments)| decl_record(module, &decl, comments))
            .collect(),
        View::Interfaces => module
            .interfaces()
            .map(|(i, comments)| decl_record(module, &Decl::Interface(i), comments))
            .collect(),
        View::Structs => module
            .structs()
            .map(|(s, comments)| decl_record(module, &Decl::Struct(s), comments))
            .collect(),
        View::Funcs => module
            .funcs()
            .map(|(f, comments)| decl_record(module, &Decl::Func(f), comments))
            .collect(),
        View::Vars => module
            .vars()
            .map(|(v, comments)| decl_record(module, &Decl::Var(v), comments))
            .collect(),
    };

    records
        .into_iter()
        .filter(|r| !output.exported_only || r.exported)
        .filter(|r| !output.commented_only || !r.comments.is_empty())
        .filter_map(|r| match directive {
            Some(p) => with_directive(r, p),
            None => Some(r),
        })
        .collect()
}

fn with_directive(mut record: Record, directive: &str) -> Option<Record> {
    let comments = Comments::new(record.comments.clone());
    let (pairs, matched) = comments.collect(prefix(directive));
    if !matched {
        return None;
    }
    record.directives = Some(pairs);
    Some(record)
}

fn location(module: &Module, symbol: &Symbol) -> String {
    module
        .location(symbol.pos())
        .map(|loc| loc.to_string())
        .unwrap_or_default()
}

fn symbol_record(module: &Module, symbol: &Symbol, comments: Comments) -> Record {
    Record {
        kind: module.decl_kind(symbol.id()),
        name: symbol.name().to_string(),
        exported: symbol.exported(),
        description: module.describe(symbol.id()),
        location: location(module, symbol),
        comments: comments.into_inner(),
        members: Vec::new(),
        directives: None,
    }
}

fn decl_record(module: &Module, decl: &Decl<'_>, comments: Comments) -> Record {
    let symbol = decl.symbol();
    Record {
        kind: Some(decl.kind()),
        name: symbol.name().to_string(),
        exported: symbol.exported(),
        description: decl.to_string(),
        location: location(module, symbol),
        comments: comments.into_inner(),
        members: members(module, decl),
        directives: None,
    }
}

fn members(module: &Module, decl: &Decl<'_>) -> Vec<Member> {
    let member = |symbol: &Symbol, comments: &Comments| Member {
        name: symbol.name().to_string(),
        description: module.describe(symbol.id()),
        comments: comments.as_slice().to_vec(),
    };
    match decl {
        Decl::Struct(s) => s
            .fields()
            .iter()
            .map(|f| member(f.symbol(), f.comments()))
            .collect(),
        Decl::Interface(i) => i
            .methods_with_comments()
            .map(|(m, c)| member(m, c))
            .collect(),
        Decl::Func(f) => f
            .params()
            .iter()
            .enumerate()
            .filter_map(|(i, p)| Some(member(module.symbol(*p)?, &f.param_comments(i))))
            .collect(),
        Decl::NamedType(_) | Decl::Var(_) => Vec::new(),
    }
}
