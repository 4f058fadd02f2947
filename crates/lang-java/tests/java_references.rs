mod common;

use common::{has, index_java};
use trailscope_api::{LocalAccess, ReferenceKind};
use trailscope_core::storage::FactDigest;

#[test]
fn calls_and_field_usages_are_attributed_to_the_method() {
    let storage = index_java(
        "class A {\n\
         \x20   int count;\n\
         \x20   void inc() {\n\
         \x20       count++;\n\
         \x20       helper(1);\n\
         \x20       this.count = 2;\n\
         \x20   }\n\
         \x20   void helper(int n) {}\n\
         }\n",
    );
    let digest = FactDigest::new(&storage);

    assert_eq!(
        digest.edges(ReferenceKind::Call),
        vec!["void A.inc() -> void A.helper(int) <5:9 5:14>"]
    );
    assert_eq!(
        digest.edges(ReferenceKind::Usage),
        vec![
            "void A.inc() -> int A.count <4:9 4:13>",
            "void A.inc() -> int A.count <6:14 6:18>",
        ]
    );
    assert!(has(&digest.qualifiers(), "A <6:9 6:12>"));
}

#[test]
fn inheritance_and_overrides_are_linked() {
    let storage = index_java(
        "class Base {\n\
         \x20   void run() {}\n\
         }\n\
         class Derived extends Base {\n\
         \x20   @Override\n\
         \x20   void run() {}\n\
         }\n",
    );
    let digest = FactDigest::new(&storage);

    assert_eq!(
        digest.edges(ReferenceKind::Inheritance),
        vec!["Derived -> Base <4:23 4:26>"]
    );
    assert_eq!(
        digest.edges(ReferenceKind::Override),
        vec!["void Derived.run() -> void Base.run() <6:10 6:12>"]
    );
}

#[test]
fn overloads_are_told_apart_by_arity() {
    let storage = index_java(
        "class A {\n\
         \x20   void f() { g(1, 2); }\n\
         \x20   void g(int a) {}\n\
         \x20   void g(int a, int b) {}\n\
         }\n",
    );
    let digest = FactDigest::new(&storage);
    assert_eq!(
        digest.edges(ReferenceKind::Call),
        vec!["void A.f() -> void A.g(int, int) <2:16 2:16>"]
    );
}

#[test]
fn locals_keep_one_ordinal_per_declaration() {
    let storage = index_java(
        "class A {\n\
         \x20   void f() {\n\
         \x20       int a = 1;\n\
         \x20       int b = a;\n\
         \x20   }\n\
         }\n",
    );
    let digest = FactDigest::new(&storage);

    assert_eq!(
        digest.local_symbols(),
        vec!["A.f<0> <3:13 3:13>", "A.f<0> <4:17 4:17>", "A.f<1> <4:13 4:13>"]
    );
    let accesses: Vec<LocalAccess> = storage.local_symbols().map(|l| l.access).collect();
    assert_eq!(
        accesses,
        vec![LocalAccess::Declaration, LocalAccess::Read, LocalAccess::Declaration]
    );
}

#[test]
fn assignment_to_a_local_is_a_write() {
    let storage = index_java(
        "class A {\n\
         \x20   void f(int p) {\n\
         \x20       p = 3;\n\
         \x20   }\n\
         }\n",
    );
    let writes: Vec<String> = storage
        .local_symbols()
        .filter(|l| l.access == LocalAccess::Write)
        .map(|l| l.location.range.to_string())
        .collect();
    assert_eq!(writes, vec!["<3:9 3:9>"]);
}

#[test]
fn imports_resolve_types_and_record_qualifiers() {
    let storage = index_java(
        "import java.util.List;\n\
         \n\
         class A {\n\
         \x20   List items;\n\
         }\n",
    );
    let digest = FactDigest::new(&storage);

    assert_eq!(digest.qualifiers(), vec!["java <1:8 1:11>", "java.util <1:13 1:16>"]);
    assert_eq!(
        digest.edges(ReferenceKind::TypeUsage),
        vec!["java.util.List A.items -> java.util.List <4:5 4:8>"]
    );
}

#[test]
fn constructor_calls_reach_declared_and_implicit_constructors() {
    let storage = index_java(
        "class P {\n\
         \x20   P(int v) {}\n\
         }\n\
         class Q {}\n\
         class U {\n\
         \x20   void f() {\n\
         \x20       new P(1);\n\
         \x20       new Q();\n\
         \x20   }\n\
         }\n",
    );
    let digest = FactDigest::new(&storage);
    let calls = digest.edges(ReferenceKind::Call);

    assert!(has(&calls, "void U.f() -> P.P(int) <7:13 7:13>"), "{calls:?}");
    assert!(has(&calls, "void U.f() -> Q.Q() <8:13 8:13>"), "{calls:?}");
}

#[test]
fn type_arguments_are_kept_apart_from_type_usages() {
    let storage = index_java(
        "import java.util.List;\n\
         class Item {}\n\
         class A {\n\
         \x20   List<Item> items;\n\
         }\n",
    );
    let digest = FactDigest::new(&storage);
    let arguments = digest.edges(ReferenceKind::TypeArgument);

    assert_eq!(arguments.len(), 1, "{arguments:?}");
    assert!(arguments[0].ends_with("-> Item <4:10 4:13>"), "{arguments:?}");
}

#[test]
fn call_through_this_links_the_methods_and_qualifies_the_receiver() {
    let storage = index_java(
        "package foo;\n\
         \n\
         class X {\n\
         \x20   void m() {\n\
         \x20       this.bar();\n\
         \x20   }\n\
         \x20   void bar() {}\n\
         }\n",
    );
    let digest = FactDigest::new(&storage);

    assert_eq!(
        digest.edges(ReferenceKind::Call),
        vec!["void foo.X.m() -> void foo.X.bar() <5:14 5:16>"]
    );
    assert!(has(&digest.qualifiers(), "foo.X <5:9 5:12>"), "{:?}", digest.qualifiers());
}

#[test]
fn lambda_parameters_in_an_initializer_are_locals() {
    let storage = index_java(
        "class A {\n\
         \x20   void f() {\n\
         \x20       IntUnaryOperator g = x -> x + 1;\n\
         \x20   }\n\
         }\n",
    );
    let digest = FactDigest::new(&storage);

    assert_eq!(
        digest.local_symbols(),
        vec!["A.f<0> <3:30 3:30>", "A.f<0> <3:35 3:35>", "A.f<1> <3:26 3:26>"]
    );
}
