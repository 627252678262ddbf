//! Views over the fixture packages: every declaration category paired with
//! its comments, plus the comment query surface on real declarations.

use std::collections::BTreeMap;
use std::path::Path;

use decl::{
    Comments, DeclKind, Declaration, FuncOwner, LoadConfig, MemberCommentPolicy, Module, VarRole,
    prefix,
};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

fn load(package: &str, config: &LoadConfig) -> Module {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(package);
    Module::load(&path, config).unwrap_or_else(|e| panic!("should load {package}: {e}"))
}

#[fixture]
fn shelf() -> Module {
    load("shelf", &LoadConfig::default().sorted())
}

#[fixture]
fn shapes() -> Module {
    load("shapes", &LoadConfig::default().sorted())
}

fn lines(comments: &Comments) -> Vec<&str> {
    comments.iter().collect()
}

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(ToString::to_string).collect()
}

// ── Required behaviours on inline sources ─────────────────────────

#[test]
fn struct_doc_and_field_comment() {
    let source = "package p\n\n// Doc\ntype Book struct { // Name line\nName string }\n";
    let module = Module::load_sources(&[("p.go", source)], &LoadConfig::default())
        .expect("should load");
    let structs: Vec<_> = module.structs().collect();
    assert_eq!(structs.len(), 1);
    let (book, comments) = &structs[0];
    assert_eq!(book.name(), "Book");
    assert_eq!(lines(comments), vec!["// Doc"]);
    assert_eq!(book.fields().len(), 1);
    assert_eq!(book.fields()[0].name(), "Name");
    assert_eq!(lines(book.fields()[0].comments()), vec!["// Name line"]);
}

#[test]
fn multi_name_var_definitions_have_empty_comments() {
    let source = "package p\n\n// Doc for both.\nvar A, B int\n";
    let module = Module::load_sources(&[("p.go", source)], &LoadConfig::default().sorted())
        .expect("should load");
    let defs: Vec<(&str, bool)> = module
        .definitions()
        .map(|(symbol, comments)| (symbol.name(), comments.is_empty()))
        .collect();
    assert_eq!(defs, vec![("A", true), ("B", true)]);
}

#[test]
fn interface_with_one_of_two_comments_reports_both_empty() {
    let source = "package p\n\ntype Store interface {\n\t// Get doc.\n\tGet() string\n\tPut(v string)\n}\n";
    let module = Module::load_sources(&[("p.go", source)], &LoadConfig::default())
        .expect("should load");
    let (store, _) = module.interfaces().next().expect("should yield Store");
    let methods: Vec<(&str, bool)> = store
        .methods_with_comments()
        .map(|(m, c)| (m.name(), c.is_empty()))
        .collect();
    assert_eq!(methods, vec![("Get", true), ("Put", true)]);
}

#[test]
fn function_local_declarations_keep_their_comments() {
    let source = "package p\n\nfunc F() {\n\t// Local doc\n\ttype local struct {\n\t\t// A doc\n\t\tA int\n\t}\n\t// v doc\n\tvar v int\n\t_ = v\n}\n";
    let module = Module::load_sources(&[("p.go", source)], &LoadConfig::default().sorted())
        .expect("should load");
    let (local, comments) = module.structs().next().expect("should yield the local struct");
    assert_eq!(local.name(), "local");
    assert_eq!(lines(&comments), vec!["// Local doc"]);
    assert_eq!(lines(local.fields()[0].comments()), vec!["// A doc"]);
    let locals: Vec<(String, Vec<String>)> = module
        .vars()
        .filter(|(v, _)| v.role() == VarRole::Local)
        .map(|(v, c)| (v.name().to_string(), c.into_inner()))
        .collect();
    assert_eq!(locals, vec![("v".to_string(), owned(&["// v doc"]))]);
    assert!(module.lookup("local").is_none(), "locals stay out of package scope");
    let defs: Vec<&str> = module.definitions().map(|(s, _)| s.name()).collect();
    assert_eq!(defs, vec!["F", "local", "A", "v"]);
}

#[test]
fn single_comment_block_lines_in_order() {
    let source = "package p\n\n// First line.\r\n// Second line.\r\n/* Third. */\r\nconst Limit = 3\r\n";
    let module = Module::load_sources(&[("p.go", source)], &LoadConfig::default())
        .expect("should load");
    let limit = module.lookup("Limit").expect("should declare Limit");
    assert_eq!(
        lines(&module.comments_at(limit.pos())),
        vec!["// First line.", "// Second line.", "/* Third. */"]
    );
}

// ── Shelf fixture ─────────────────────────────────────────────────

#[rstest]
fn structs_in_document_order(shelf: Module) {
    let names: Vec<&str> = shelf.structs().map(|(s, _)| s.name()).collect();
    assert_eq!(names, vec!["Book", "Author", "Shelf"]);
}

#[rstest]
fn book_fields_align_with_their_comments(shelf: Module) {
    let (book, comments) = shelf
        .structs()
        .find(|(s, _)| s.name() == "Book")
        .expect("should yield Book");
    assert_eq!(
        lines(&comments),
        vec!["// Book is a catalogue entry.", "// +table=books", "// +index=title unique"]
    );
    let fields: Vec<(&str, Vec<&str>)> = book
        .fields()
        .iter()
        .map(|f| (f.name(), lines(f.comments())))
        .collect();
    assert_eq!(
        fields,
        vec![
            ("Title", vec!["// Title as printed on the cover."]),
            ("Author", vec!["// primary author"]),
            ("Pages", vec!["// Pages counts printed pages."]),
        ]
    );
    assert_eq!(book.tag_value(0, "db").as_deref(), Some("title"));
    assert_eq!(book.tag_value(2, "json").as_deref(), Some("pages,omitempty"));
    assert_eq!(book.fields()[1].type_string(), "Author");
    let methods: Vec<&str> = (0..book.num_methods())
        .filter_map(|i| book.method(i))
        .map(|m| m.name())
        .collect();
    assert_eq!(methods, vec!["Name", "Open"]);
}

#[rstest]
fn directives_are_read_from_comments(shelf: Module) {
    let (_, book) = shelf
        .named_types()
        .find(|(t, _)| t.name() == "Book")
        .expect("should yield Book");
    assert_eq!(book.lookup(prefix("// +table=")), Some("books"));
    let (index, matched) = book.collect(prefix("// +index="));
    assert!(matched);
    assert_eq!(
        index,
        BTreeMap::from([("title".to_string(), String::new()), ("unique".to_string(), String::new())])
    );
    assert_eq!(book.at(-1), book.at(2));

    let (find, comments) = shelf
        .funcs()
        .find(|(f, _)| f.name() == "Find")
        .expect("should yield Find");
    let (cache, matched) = comments.collect(prefix("//shelf:cache "));
    assert!(matched);
    assert_eq!(cache.get("ttl").map(String::as_str), Some("60"));
    assert_eq!(cache.get("size").map(String::as_str), Some("128"));
    assert_eq!(comments.collect(prefix("//shelf:cache ")), (cache, true), "collect is repeatable");
    assert_eq!(lines(&find.param_comments(0)), vec!["// exact title"]);
    assert!(find.variadic());
    assert!(find.returns_error());
    assert_eq!(find.full_name(), "shelf.Find");
}

#[rstest]
fn methods_carry_their_receiver(shelf: Module) {
    let methods: Vec<(String, Vec<String>)> = shelf
        .funcs()
        .filter(|(f, _)| matches!(f.owner(), FuncOwner::Receiver(_)))
        .map(|(f, c)| (f.full_name(), c.into_inner()))
        .collect();
    assert_eq!(
        methods,
        vec![
            ("(*shelf.Book).Name".to_string(), owned(&["// Name returns the title."])),
            ("(*shelf.Book).Open".to_string(), owned(&["// Open is not supported for paper books."])),
            ("(*shelf.Shelf[T]).Len".to_string(), owned(&["// Len reports the number of books."])),
        ]
    );
}

#[rstest]
fn interface_methods_align(shelf: Module) {
    let (ibook, comments) = shelf.interfaces().next().expect("should yield IBook");
    assert_eq!(ibook.name(), "IBook");
    assert_eq!(lines(&comments), vec!["// IBook is what a shelf can hold."]);
    let methods: Vec<(&str, Vec<&str>)> = ibook
        .methods_with_comments()
        .map(|(m, c)| (m.name(), lines(c)))
        .collect();
    assert_eq!(
        methods,
        vec![
            ("Name", vec!["// Name returns the display name."]),
            ("Open", vec!["// Open returns a reader over the contents."]),
        ]
    );
    assert!(!ibook.has_external_embeds());
}

#[rstest]
fn package_values_and_constants(shelf: Module) {
    let vars: Vec<(&str, bool, Vec<String>)> = shelf
        .vars()
        .filter(|(v, _)| v.role() == VarRole::Package)
        .map(|(v, c)| (v.name(), v.is_const(), c.into_inner()))
        .collect();
    assert_eq!(
        vars,
        vec![
            ("ThreeBodyProblem", false, owned(&["// ThreeBodyProblem is the reference entry."])),
            ("ErrNotFound", false, owned(&["// ErrNotFound is returned by lookups that miss."])),
            ("Capacity", true, owned(&["// Capacity is the default shelf size."])),
            ("Paperback", true, owned(&["// Paperback binding."])),
            ("Hardcover", true, owned(&["// Hardcover binding."])),
            ("A", false, Vec::new()),
            ("B", false, Vec::new()),
        ]
    );
    let hardcover = shelf.lookup("Hardcover").expect("should declare Hardcover");
    assert_eq!(shelf.type_string(hardcover.ty()), "Binding");
    let book = shelf.lookup("ThreeBodyProblem").expect("should declare ThreeBodyProblem");
    assert_eq!(shelf.type_name(book.ty()), "Book");
    assert_eq!(shelf.type_package(book.ty()), Some("shelf"));
}

#[rstest]
fn alias_is_a_named_type(shelf: Module) {
    let (titles, comments) = shelf
        .named_types()
        .find(|(t, _)| t.name() == "Titles")
        .expect("should yield Titles");
    assert!(titles.is_alias());
    assert_eq!(lines(&comments), vec!["// Titles is a list of titles."]);
    assert_eq!(titles.to_string(), "type Titles = []string");
}

#[rstest]
fn unattached_comments_stay_unattached(shelf: Module) {
    let attached: Vec<String> = shelf
        .definitions()
        .flat_map(|(_, c)| c.into_inner())
        .collect();
    assert!(!attached.iter().any(|l| l.contains("bottom comment")));
    assert!(!attached.iter().any(|l| l.starts_with("// Package shelf")));
}

#[rstest]
fn declarations_cover_every_category(shelf: Module) {
    let kinds: Vec<DeclKind> = shelf.declarations().map(|(d, _)| d.kind()).collect();
    for kind in [
        DeclKind::NamedType,
        DeclKind::Interface,
        DeclKind::Struct,
        DeclKind::Func,
        DeclKind::Var,
    ] {
        assert!(kinds.contains(&kind), "missing {kind}");
    }
    let first = shelf.declarations().next().map(|(d, _)| d.name());
    assert_eq!(first, Some("Book"));
}

// ── Shapes fixture ────────────────────────────────────────────────

#[rstest]
fn embedded_interfaces_promote_methods(shapes: Module) {
    let (named_shape, _) = shapes
        .interfaces()
        .find(|(i, _)| i.name() == "NamedShape")
        .expect("should yield NamedShape");
    let names: Vec<&str> = named_shape
        .methods_with_comments()
        .map(|(m, _)| m.name())
        .collect();
    assert_eq!(names, vec!["Area", "Perimeter", "Name"]);
    assert!(named_shape.explicit_methods().is_empty());
    assert!(
        named_shape
            .methods_with_comments()
            .all(|(_, c)| c.is_empty()),
        "promoted methods never align"
    );
}

#[test]
fn keyed_policy_reads_each_method() {
    let module = load(
        "shapes",
        &LoadConfig::default().with_member_comments(MemberCommentPolicy::Keyed),
    );
    let (named_shape, _) = module
        .interfaces()
        .find(|(i, _)| i.name() == "NamedShape")
        .expect("should yield NamedShape");
    let methods: Vec<(&str, Vec<&str>)> = named_shape
        .methods_with_comments()
        .map(|(m, c)| (m.name(), lines(c)))
        .collect();
    assert_eq!(
        methods,
        vec![
            ("Area", vec!["// Area in square units."]),
            ("Perimeter", vec![]),
            ("Name", vec!["// Name of the shape."]),
        ]
    );
}

#[rstest]
fn generic_declarations(shapes: Module) {
    let (pair, _) = shapes.structs().next().expect("should yield Pair");
    assert_eq!(pair.name(), "Pair");
    let params: Vec<&str> = pair
        .type_params()
        .iter()
        .filter_map(|p| shapes.symbol(*p))
        .map(|p| p.name())
        .collect();
    assert_eq!(params, vec!["K", "V"]);
    let fields: Vec<Vec<&str>> = pair.fields().iter().map(|f| lines(f.comments())).collect();
    assert_eq!(fields, vec![vec!["// lookup key"], vec!["// stored value"]]);

    let (sum, _) = shapes
        .funcs()
        .find(|(f, _)| f.name() == "Sum")
        .expect("should yield Sum");
    assert_eq!(sum.type_params().len(), 1);
    assert_eq!(sum.owner(), FuncOwner::Package);

    let (number, _) = shapes
        .interfaces()
        .find(|(i, _)| i.name() == "Number")
        .expect("should yield Number");
    assert!(!number.is_method_set());
}
