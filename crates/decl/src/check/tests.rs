use super::*;
use crate::parser::parse_source;
use crate::types::{Basic, Symbol, TypeWriter};
use pretty_assertions::assert_eq;

fn check_mode(source: &str, mode: LoadMode) -> CheckOutput {
    let tree = parse_source(source);
    let files = [ParsedFile {
        id: FileId::from_index(0),
        root: tree.root(),
    }];
    check_package(&files, mode)
}

fn check(source: &str) -> CheckOutput {
    check_mode(source, LoadMode::TypeCheck)
}

fn symbol<'a>(out: &'a CheckOutput, name: &str) -> &'a Symbol {
    let id = out
        .symbols
        .lookup(name)
        .unwrap_or_else(|| panic!("should declare '{name}'"));
    &out.symbols[id]
}

fn member<'a>(out: &'a CheckOutput, name: &str) -> &'a Symbol {
    out.symbols
        .iter()
        .find(|s| s.name() == name)
        .unwrap_or_else(|| panic!("should record member '{name}'"))
}

fn type_of(out: &CheckOutput, name: &str) -> String {
    TypeWriter::new(&out.symbols, &out.types).type_string(symbol(out, name).ty())
}

fn describe(out: &CheckOutput, symbol: &Symbol) -> String {
    TypeWriter::new(&out.symbols, &out.types).describe(symbol.id())
}

fn messages(out: &CheckOutput) -> Vec<&str> {
    out.diagnostics.iter().map(|d| d.message.as_str()).collect()
}

// ── Types ─────────────────────────────────────────────────────────

#[test]
fn struct_fields_keep_order_and_tags() {
    let out = check(
        "package p\n\ntype Author struct{}\n\ntype Book struct {\n\tTitle string `json:\"title\"`\n\tAuthor *Author\n}\n",
    );
    let book = symbol(&out, "Book");
    assert_eq!(describe(&out, book), "type Book struct{Title string; Author *Author}");
    let Type::Struct(st) = out.types.get(out.types.underlying(book.ty())) else {
        panic!("Book should have a struct underlying type");
    };
    assert_eq!(st.tags, vec![Some("json:\"title\"".to_string()), None]);
    assert_eq!(out.symbols[st.fields[1]].owner(), Owner::Field(out.types.underlying(book.ty())));
    assert!(out.diagnostics.is_empty(), "unexpected: {:?}", out.diagnostics);
}

#[test]
fn embedded_pointer_field_is_marked() {
    let out = check("package p\n\ntype Base struct{}\n\ntype T struct {\n\t*Base\n\tN int\n}\n");
    let base = member(&out, "Base");
    assert!(!base.is_embedded(), "the type name itself is not a field");
    let field = out
        .symbols
        .iter()
        .find(|s| s.name() == "Base" && s.is_embedded())
        .unwrap_or_else(|| panic!("should record the embedded field"));
    let writer = TypeWriter::new(&out.symbols, &out.types);
    assert_eq!(writer.type_string(field.ty()), "*Base");
}

#[test]
fn alias_points_at_target() {
    let out = check("package p\n\ntype Names = []string\n");
    let names = symbol(&out, "Names");
    assert!(matches!(out.types.get(names.ty()), Type::Alias { .. }));
    assert_eq!(describe(&out, names), "type Names = []string");
}

#[test]
fn recursive_type_is_reported_once() {
    let out = check("package p\n\ntype A B\ntype B A\n");
    let cycles = messages(&out)
        .into_iter()
        .filter(|m| m.starts_with("invalid recursive type"))
        .count();
    assert_eq!(cycles, 1);
    assert_eq!(out.types.underlying(symbol(&out, "A").ty()), TypeId::INVALID);
}

#[test]
fn self_reference_through_pointer_is_fine() {
    let out = check("package p\n\ntype Node struct {\n\tNext *Node\n}\n");
    assert!(out.diagnostics.is_empty(), "unexpected: {:?}", out.diagnostics);
    assert_eq!(type_of(&out, "Node"), "Node");
}

#[test]
fn undefined_and_redeclared_names_are_diagnosed() {
    let out = check("package p\n\nvar x Missing\n\nvar y int\nvar y string\n");
    assert_eq!(messages(&out), vec!["y redeclared in this block", "undefined: Missing"]);
    assert_eq!(symbol(&out, "x").ty(), TypeId::INVALID);
}

#[test]
fn generic_type_declares_its_parameters() {
    let source = "package p\n\ntype List[T any] struct {\n\titems []T\n}\n\nfunc (l *List[T]) Len() int { return len(l.items) }\n";
    let out = check(source);
    assert!(out.diagnostics.is_empty(), "unexpected: {:?}", out.diagnostics);
    let list = symbol(&out, "List");
    assert_eq!(describe(&out, list), "type List[T any] struct{items []T}");
    let len = member(&out, "Len");
    assert_eq!(describe(&out, len), "func (*List[T]) Len() int");
    assert_eq!(len.owner(), Owner::Method(Some(list.id())));
}

// ── Functions ─────────────────────────────────────────────────────

#[test]
fn methods_attach_to_receiver_base() {
    let out = check("package p\n\ntype T int\n\nfunc (t *T) Close() error { return nil }\n");
    let t = symbol(&out, "T");
    let close = member(&out, "Close");
    let Type::Named(named) = out.types.get(t.ty()) else {
        panic!("T should be a named type");
    };
    assert_eq!(named.methods, vec![close.id()]);
    assert_eq!(describe(&out, close), "func (*T) Close() error");
    assert_eq!(out.symbols.lookup("Close"), None, "methods stay out of package scope");
}

#[test]
fn unknown_receiver_is_diagnosed() {
    let out = check("package p\n\nfunc (g Ghost) Boo() {}\n");
    assert_eq!(messages(&out), vec!["undefined receiver type Ghost"]);
    assert_eq!(member(&out, "Boo").owner(), Owner::Method(None));
}

#[test]
fn variadic_signature_renders_ellipsis() {
    let out = check("package p\n\nfunc Join(sep string, parts ...string) (s string, err error) { return }\n");
    let join = symbol(&out, "Join");
    assert_eq!(
        describe(&out, join),
        "func Join(sep string, parts ...string) (s string, err error)"
    );
}

#[test]
fn init_functions_are_not_declared() {
    let out = check("package p\n\nfunc init() {}\nfunc init() {}\n");
    assert!(out.diagnostics.is_empty(), "unexpected: {:?}", out.diagnostics);
    assert_eq!(out.symbols.lookup("init"), None);
}

// ── Values ────────────────────────────────────────────────────────

#[test]
fn vars_take_default_types_and_consts_stay_untyped() {
    let out = check("package p\n\nconst c = 2.5\n\nvar (\n\tn = 3\n\ts = \"x\"\n\tb = c > 1\n\tf = n * 2\n)\n");
    assert_eq!(type_of(&out, "c"), "untyped float");
    assert_eq!(type_of(&out, "n"), "int");
    assert_eq!(type_of(&out, "s"), "string");
    assert_eq!(type_of(&out, "b"), "bool");
    assert_eq!(type_of(&out, "f"), "int");
}

#[test]
fn const_specs_inherit_type_and_iota() {
    let out = check("package p\n\ntype Weekday int\n\nconst (\n\tSunday Weekday = iota\n\tMonday\n)\n");
    assert_eq!(type_of(&out, "Monday"), "Weekday");
}

#[test]
fn tuple_assignment_picks_each_result() {
    let out = check("package p\n\nfunc pair() (int, error) { return 0, nil }\n\nvar a, err = pair()\n");
    assert_eq!(type_of(&out, "a"), "int");
    assert_eq!(type_of(&out, "err"), "error");
    assert!(out.types.is_basic(symbol(&out, "err").ty(), Basic::Error));
}

#[test]
fn composite_literals_and_builtins_infer_their_type() {
    let source = "package p\n\ntype Book struct{}\n\nvar (\n\tbook = &Book{}\n\tcount = len(\"abc\")\n\tnames = make([]string, 0)\n\tid = int64(7)\n)\n";
    let out = check(source);
    assert_eq!(type_of(&out, "book"), "*Book");
    assert_eq!(type_of(&out, "count"), "int");
    assert_eq!(type_of(&out, "names"), "[]string");
    assert_eq!(type_of(&out, "id"), "int64");
}

#[test]
fn values_resolve_out_of_order() {
    let out = check("package p\n\nvar a = b\nvar b = 1.5\n");
    assert_eq!(type_of(&out, "a"), "float64");
}

#[test]
fn initialization_cycle_degrades_to_invalid() {
    let out = check("package p\n\nvar a = b\nvar b = a\n");
    assert!(
        messages(&out).iter().any(|m| m.starts_with("initialization cycle")),
        "should report a cycle: {:?}",
        out.diagnostics
    );
    assert_eq!(symbol(&out, "a").ty(), TypeId::INVALID);
}

// ── Interfaces ────────────────────────────────────────────────────

#[test]
fn interface_method_set_lists_explicit_methods_first() {
    let source = "package p\n\ntype Reader interface {\n\tRead() error\n}\n\ntype ReadWriter interface {\n\tReader\n\tWrite(p []byte) (int, error)\n}\n";
    let out = check(source);
    let rw = symbol(&out, "ReadWriter");
    let Type::Interface(iface) = out.types.get(out.types.underlying(rw.ty())) else {
        panic!("ReadWriter should be an interface");
    };
    let names: Vec<&str> = iface.methods.iter().map(|m| out.symbols[*m].name()).collect();
    assert_eq!(names, vec!["Write", "Read"]);
    assert!(!iface.external_embeds);
}

#[test]
fn imported_embeds_flag_the_interface() {
    let out = check("package p\n\nimport \"io\"\n\ntype Closer interface {\n\tio.Reader\n\tClose() error\n}\n");
    let closer = symbol(&out, "Closer");
    let Type::Interface(iface) = out.types.get(out.types.underlying(closer.ty())) else {
        panic!("Closer should be an interface");
    };
    assert!(iface.external_embeds);
    assert_eq!(iface.methods.len(), 1);
    assert_eq!(describe(&out, closer), "type Closer interface{Close() error; io.Reader}");
}

#[test]
fn interface_method_describes_its_interface() {
    let out = check("package p\n\ntype Shape interface {\n\tArea() float64\n}\n");
    let area = member(&out, "Area");
    assert!(matches!(area.owner(), Owner::InterfaceMethod(_)));
    assert_eq!(describe(&out, area), "func (interface{Area() float64}) Area() float64");
}

// ── Function bodies ───────────────────────────────────────────────

#[test]
fn body_declarations_stay_local() {
    let source = "package p\n\nfunc F(n int) {\n\ttype local struct{ A int }\n\tvar count = n\n\tconst limit = 3\n\t_ = count\n}\n";
    let out = check(source);
    assert!(out.diagnostics.is_empty(), "unexpected: {:?}", out.diagnostics);
    assert_eq!(out.symbols.lookup("local"), None);
    let local = member(&out, "local");
    assert_eq!(local.owner(), Owner::Local);
    assert_eq!(describe(&out, local), "type local struct{A int}");
    let writer = TypeWriter::new(&out.symbols, &out.types);
    assert_eq!(writer.type_string(member(&out, "count").ty()), "int");
    assert_eq!(writer.type_string(member(&out, "limit").ty()), "untyped int");
    assert_eq!(member(&out, "count").owner(), Owner::Local);
}

#[test]
fn function_literals_declare_their_parameters_once() {
    let source = "package p\n\nvar handler = func(code int) string {\n\tvar label = code\n\t_ = label\n\treturn \"\"\n}\n\nfunc run() {\n\tx := 1\n\tvar y = x\n\t_ = func(msg string) {}\n\t_ = y\n}\n";
    let out = check(source);
    assert!(out.diagnostics.is_empty(), "unexpected: {:?}", out.diagnostics);
    assert!(matches!(out.types.get(symbol(&out, "handler").ty()), Type::Signature(_)));
    assert_eq!(out.symbols.iter().filter(|s| s.name() == "code").count(), 1);
    assert!(matches!(member(&out, "msg").owner(), Owner::Param(_)));
    let writer = TypeWriter::new(&out.symbols, &out.types);
    assert_eq!(writer.type_string(member(&out, "label").ty()), "int");
    assert_eq!(member(&out, "y").ty(), TypeId::INVALID, "short variables are not tracked");
}

#[test]
fn local_names_shadow_package_names() {
    let source = "package p\n\ntype ID string\n\nfunc F() {\n\ttype ID int\n\tvar local ID\n\t_ = local\n}\n\nvar global ID\n";
    let out = check(source);
    assert!(out.diagnostics.is_empty(), "unexpected: {:?}", out.diagnostics);
    let writer = TypeWriter::new(&out.symbols, &out.types);
    assert_eq!(
        writer.type_string(out.types.underlying(member(&out, "local").ty())),
        "int"
    );
    assert_eq!(
        writer.type_string(out.types.underlying(symbol(&out, "global").ty())),
        "string"
    );
}

// ── Modes and imports ─────────────────────────────────────────────

#[test]
fn import_mode_skips_declarations() {
    let source = "package p\n\nimport (\n\t\"fmt\"\n\tyaml \"gopkg.in/yaml.v3\"\n)\n\nvar x = 1\n";
    let out = check_mode(source, LoadMode::ParseImports);
    let paths: Vec<&str> = out.imports.iter().map(|i| i.path.as_str()).collect();
    assert_eq!(paths, vec!["fmt", "gopkg.in/yaml.v3"]);
    assert_eq!(out.symbols.lookup("x"), None);
    assert_eq!(out.imports[1].local_name(), "yaml");
}

#[test]
fn parse_mode_collects_nothing() {
    let out = check_mode("package p\n\nimport \"fmt\"\n\nvar x = 1\n", LoadMode::Parse);
    assert!(out.imports.is_empty());
    assert!(out.symbols.is_empty());
}

#[test]
fn local_name_skips_major_version() {
    let import = Import {
        path: "github.com/acme/widgets/v2".to_string(),
        name: None,
        pos: Pos::new(FileId::from_index(0), 0),
    };
    assert_eq!(import.local_name(), "widgets");
}
