mod common;

use common::{has, index_java, index_java_with};
use tokio_util::sync::CancellationToken;
use trailscope_api::{AccessKind, NameDelimiter, NameHierarchy, ReferenceKind, SymbolKind};
use trailscope_core::storage::FactDigest;

#[test]
fn package_class_field_and_method_are_declared() {
    let storage = index_java(
        "package foo;\n\
         \n\
         public class A {\n\
         \x20   private int x;\n\
         \x20   public void bar(int y) {\n\
         \x20   }\n\
         }\n",
    );
    let digest = FactDigest::new(&storage);

    assert_eq!(
        digest.declarations(),
        vec![
            "foo <1:9 1:11>",
            "public foo.A <3:1 <3:14 3:14> 7:1>",
            "private int foo.A.x <4:17 4:17>",
            "public void foo.A.bar(int) <5:5 <5:17 5:19> 6:5>",
        ]
    );
    assert_eq!(digest.local_symbols(), vec!["foo.A.bar<0> <5:25 5:25>"]);
    assert_eq!(
        digest.scopes(),
        vec![
            "input.java<3:16> <3:16 3:16>",
            "input.java<3:16> <7:1 7:1>",
            "input.java<5:28> <5:28 5:28>",
            "input.java<5:28> <6:5 6:5>",
        ]
    );
}

#[test]
fn members_of_interfaces_are_public_and_fields_static() {
    let storage = index_java(
        "interface Shape {\n\
         \x20   int SIDES = 0;\n\
         \x20   double area();\n\
         }\n",
    );
    let digest = FactDigest::new(&storage);
    let lines = digest.declarations();

    assert!(has(&lines, "public static int Shape.SIDES <2:9 2:13>"), "{lines:?}");
    assert!(has(&lines, "public double Shape.area() <3:5 <3:12 3:15> 3:18>"), "{lines:?}");

    let name = NameHierarchy::from_qualified(NameDelimiter::Dot, "Shape");
    let shape = storage.symbol_by_name(&name).expect("interface recorded");
    assert_eq!(shape.kind, SymbolKind::Interface);
    assert_eq!(shape.access, AccessKind::Default);
}

#[test]
fn nested_enum_is_static_and_constants_are_public_static() {
    let storage = index_java(
        "class Outer {\n\
         \x20   enum Color { RED, GREEN }\n\
         }\n",
    );
    let digest = FactDigest::new(&storage);
    let lines = digest.declarations_of(&[SymbolKind::Enum, SymbolKind::EnumConstant]);

    assert_eq!(
        lines,
        vec![
            "default static Outer.Color <2:5 <2:10 2:14> 2:29>",
            "public static Outer.Color.RED <2:18 2:20>",
            "public static Outer.Color.GREEN <2:23 2:27>",
        ]
    );
}

#[test]
fn generic_class_names_carry_type_parameters() {
    let storage = index_java("class Box<T> {\n}\n");
    let digest = FactDigest::new(&storage);

    assert_eq!(
        digest.declarations(),
        vec!["default Box<T> <1:1 <1:7 1:9> 2:1>", "Box<T>.T <1:11 1:11>"]
    );
    let param = NameHierarchy::from_qualified(NameDelimiter::Dot, "Box<T>.T");
    let symbol = storage.symbol_by_name(&param).expect("type parameter recorded");
    assert_eq!(symbol.kind, SymbolKind::TypeParameter);
}

#[test]
fn anonymous_classes_are_named_by_position() {
    let storage = index_java(
        "class A {\n\
         \x20   Object o = new Object() {\n\
         \x20   };\n\
         }\n",
    );
    let anonymous = storage
        .names()
        .ids()
        .filter_map(|id| storage.name(id))
        .any(|name| name.qualified_name() == "A.anonymous class (input.java<2:29>)");
    assert!(anonymous, "{}", FactDigest::new(&storage).render());
}

#[test]
fn comments_and_syntax_errors_are_recorded() {
    let storage = index_java("/* x */\nclass A { void f( }\n");
    let digest = FactDigest::new(&storage);

    assert_eq!(digest.comments(), vec!["comment <1:1 1:7>"]);
    assert!(!digest.errors().is_empty());
    assert!(digest.errors().iter().all(|e| e.starts_with("Syntax error")));
}

#[test]
fn interrupted_client_records_nothing() {
    let cancellation = CancellationToken::new();
    cancellation.cancel();
    let storage = index_java_with("package foo;\nclass A { int x; }\n", cancellation);
    assert!(storage.is_empty());
}

#[test]
fn bare_class_in_a_package_references_nothing() {
    let storage = index_java("package foo;\nclass X {\n}\n");
    let digest = FactDigest::new(&storage);

    assert_eq!(
        digest.declarations(),
        vec!["foo <1:9 1:11>", "default foo.X <2:1 <2:7 2:7> 3:1>"]
    );
    assert!(digest.edges(ReferenceKind::Usage).is_empty());
}

fn anonymous_names(source: &str) -> Vec<String> {
    let storage = index_java(source);
    let mut names: Vec<String> = storage
        .names()
        .ids()
        .filter_map(|id| storage.name(id))
        .map(|name| name.qualified_name())
        .filter(|name| name.matches("anonymous class").count() == 1)
        .collect();
    names.sort();
    names
}

#[test]
fn sibling_anonymous_classes_get_distinct_stable_names() {
    let source = "class A {\n\
                  \x20   Object o = new Object() {\n\
                  \x20   };\n\
                  \x20   Object p = new Object() {\n\
                  \x20   };\n\
                  }\n";

    let first = anonymous_names(source);
    assert_eq!(
        first,
        vec![
            "A.anonymous class (input.java<2:29>)",
            "A.anonymous class (input.java<4:29>)",
        ]
    );
    assert_eq!(anonymous_names(source), first);
}

#[test]
fn array_initializer_of_a_local_is_a_scope() {
    let storage = index_java(
        "class A {\n\
         \x20   void f() {\n\
         \x20       int[] array = {1, 2};\n\
         \x20   }\n\
         }\n",
    );
    let scopes = FactDigest::new(&storage).scopes();

    assert!(has(&scopes, "input.java<3:23> <3:23 3:23>"), "{scopes:?}");
    assert!(has(&scopes, "input.java<3:23> <3:28 3:28>"), "{scopes:?}");
}
