mod common;

use common::{has, index_cxx, index_cxx_with};
use tokio_util::sync::CancellationToken;
use trailscope_api::{NameDelimiter, NameHierarchy, ReferenceKind, SymbolKind};
use trailscope_core::storage::FactDigest;

#[test]
fn out_of_line_definition_merges_with_its_declaration() {
    let storage = index_cxx(
        "namespace ns {\n\
         class Widget {\n\
         public:\n\
         \x20   void draw() const;\n\
         \x20   int size;\n\
         };\n\
         void Widget::draw() const {}\n\
         }\n",
    );
    let digest = FactDigest::new(&storage);

    assert_eq!(
        digest.declarations(),
        vec![
            "ns <1:1 <1:11 1:12> 8:1>",
            "ns::Widget <2:1 <2:7 2:12> 6:1>",
            "public void ns::Widget::draw() const <4:10 4:13>",
            "public int ns::Widget::size <5:9 5:12>",
            "public void ns::Widget::draw() const <7:1 <7:14 7:17> 7:28>",
        ]
    );
    assert_eq!(digest.qualifiers(), vec!["ns::Widget <7:6 7:11>"]);

    let name = NameHierarchy::from_qualified(NameDelimiter::DoubleColon, "ns::Widget");
    let widget = storage.symbol_by_name(&name).expect("class recorded");
    assert_eq!(widget.kind, SymbolKind::Class);
}

#[test]
fn functions_globals_and_locals_are_recorded() {
    let storage = index_cxx(
        "static int counter = 0;\n\
         int add(int a, int b);\n\
         int add(int a, int b) {\n\
         \x20   int sum = a + b;\n\
         \x20   counter = sum;\n\
         \x20   return sum;\n\
         }\n",
    );
    let digest = FactDigest::new(&storage);

    assert_eq!(
        digest.declarations(),
        vec![
            "static int counter <1:12 1:18>",
            "int add(int, int) <2:5 2:7>",
            "int add(int, int) <3:1 <3:5 3:7> 7:1>",
        ]
    );
    assert_eq!(
        digest.local_symbols(),
        vec![
            "add<0> <3:13 3:13>",
            "add<1> <3:20 3:20>",
            "add<0> <4:15 4:15>",
            "add<1> <4:19 4:19>",
            "add<2> <4:9 4:11>",
            "add<2> <5:15 5:17>",
            "add<2> <6:12 6:14>",
        ]
    );
    assert_eq!(
        digest.edges(ReferenceKind::Usage),
        vec!["int add(int, int) -> int counter <5:5 5:11>"]
    );
}

#[test]
fn enums_typedefs_and_macros_are_declared() {
    let storage = index_cxx(
        "#define LIMIT 10\n\
         enum Color { Red, Green };\n\
         struct Point { int x; };\n\
         typedef Point P;\n\
         using Q = Point;\n",
    );
    let digest = FactDigest::new(&storage);

    assert_eq!(
        digest.declarations(),
        vec![
            "LIMIT <1:9 1:13>",
            "Color <2:1 <2:6 2:10> 2:25>",
            "Color::Red <2:14 2:16>",
            "Color::Green <2:19 2:23>",
            "Point <3:1 <3:8 3:12> 3:23>",
            "public int Point::x <3:20 3:20>",
            "P <4:15 4:15>",
            "Q <5:7 5:7>",
        ]
    );
    assert_eq!(
        digest.edges(ReferenceKind::TypeUsage),
        vec!["P -> Point <4:9 4:13>", "Q -> Point <5:11 5:15>"]
    );

    let macro_name = NameHierarchy::from_qualified(NameDelimiter::DoubleColon, "LIMIT");
    let limit = storage.symbol_by_name(&macro_name).expect("macro recorded");
    assert_eq!(limit.kind, SymbolKind::Macro);
}

#[test]
fn template_parameters_belong_to_their_class() {
    let storage = index_cxx(
        "template <typename T>\n\
         class Box {\n\
         \x20   T value;\n\
         };\n\
         Box<int> box;\n",
    );
    let digest = FactDigest::new(&storage);

    assert_eq!(
        digest.declarations(),
        vec![
            "Box <2:1 <2:7 2:9> 4:1>",
            "Box::T <1:20 1:20>",
            "private T Box::value <3:7 3:11>",
            "Box<int> box <5:10 5:12>",
        ]
    );
    assert_eq!(
        digest.edges(ReferenceKind::TypeUsage),
        vec![
            "T Box::value -> Box::T <3:5 3:5>",
            "Box<int> box -> Box <5:1 5:3>",
        ]
    );
}

#[test]
fn class_bodies_and_function_bodies_are_scopes() {
    let storage = index_cxx("struct S {\n    void f() {}\n};\n");
    let digest = FactDigest::new(&storage);

    assert_eq!(
        digest.scopes(),
        vec![
            "input.cpp<1:10> <1:10 1:10>",
            "input.cpp<1:10> <3:1 3:1>",
            "input.cpp<2:14> <2:14 2:14>",
            "input.cpp<2:14> <2:15 2:15>",
        ]
    );
}

#[test]
fn comments_and_syntax_errors_are_recorded() {
    let storage = index_cxx("// note\nint f( {\n");
    let digest = FactDigest::new(&storage);

    assert!(has(&digest.comments(), "comment <1:1 1:7>"));
    let errors = digest.errors();
    assert!(!errors.is_empty());
    assert!(errors.iter().all(|e| e.starts_with("Syntax error")), "{errors:?}");
}

#[test]
fn interrupted_client_records_nothing() {
    let token = CancellationToken::new();
    token.cancel();
    let storage = index_cxx_with("int x;\nvoid f() {}\n", token);

    assert!(storage.is_empty());
}
