mod common;

use common::{has, index_cxx};
use trailscope_api::ReferenceKind;
use trailscope_core::storage::FactDigest;

#[test]
fn inheritance_overrides_and_member_usages_are_linked() {
    let storage = index_cxx(
        "struct Base {\n\
         \x20   virtual void run() {}\n\
         };\n\
         struct Derived : Base {\n\
         \x20   int hits;\n\
         \x20   void run() override {\n\
         \x20       hits++;\n\
         \x20       this->hits = 1;\n\
         \x20   }\n\
         };\n",
    );
    let digest = FactDigest::new(&storage);

    assert_eq!(
        digest.edges(ReferenceKind::Inheritance),
        vec!["Derived -> Base <4:18 4:21>"]
    );
    assert_eq!(
        digest.edges(ReferenceKind::Override),
        vec!["void Derived::run() -> void Base::run() <6:10 6:12>"]
    );
    assert_eq!(
        digest.edges(ReferenceKind::Usage),
        vec![
            "void Derived::run() -> int Derived::hits <7:9 7:12>",
            "void Derived::run() -> int Derived::hits <8:15 8:18>",
        ]
    );
}

#[test]
fn calls_resolve_through_namespaces_members_and_constructors() {
    let storage = index_cxx(
        "namespace util {\n\
         int twice(int v) { return v * 2; }\n\
         }\n\
         struct Counter {\n\
         \x20   Counter(int start) {}\n\
         \x20   int next() { return util::twice(1); }\n\
         };\n\
         int main() {\n\
         \x20   Counter c(3);\n\
         \x20   Counter* p = new Counter(4);\n\
         \x20   return c.next() + p->next();\n\
         }\n",
    );
    let digest = FactDigest::new(&storage);

    assert_eq!(
        digest.edges(ReferenceKind::Call),
        vec![
            "int Counter::next() -> int util::twice(int) <6:31 6:35>",
            "int main() -> Counter::Counter(int) <9:13 9:13>",
            "int main() -> Counter::Counter(int) <10:22 10:28>",
            "int main() -> int Counter::next() <11:14 11:17>",
            "int main() -> int Counter::next() <11:26 11:29>",
        ]
    );
    assert_eq!(
        digest.edges(ReferenceKind::TypeUsage),
        vec![
            "int main() -> Counter <9:5 9:11>",
            "int main() -> Counter <10:5 10:11>",
            "int main() -> Counter <10:22 10:28>",
        ]
    );
    assert_eq!(digest.qualifiers(), vec!["util <6:25 6:28>"]);
    let locals = digest.local_symbols();
    assert!(has(&locals, "main<0> <9:13 9:13>"), "{locals:?}");
    assert!(has(&locals, "main<1> <10:14 10:14>"), "{locals:?}");
    assert!(has(&locals, "main<0> <11:12 11:12>"), "{locals:?}");
    assert!(has(&locals, "main<1> <11:23 11:23>"), "{locals:?}");
}

#[test]
fn unknown_qualified_types_are_referenced_by_their_spelling() {
    let storage = index_cxx("std::string name;\n");
    let digest = FactDigest::new(&storage);

    assert_eq!(
        digest.edges(ReferenceKind::TypeUsage),
        vec!["std::string name -> std::string <1:6 1:11>"]
    );
    assert_eq!(digest.qualifiers(), vec!["std <1:1 1:3>"]);
}

#[test]
fn scoped_enumerators_are_used_through_their_enum() {
    let storage = index_cxx(
        "enum class Mode { Fast, Slow };\n\
         Mode pick() { return Mode::Slow; }\n",
    );
    let digest = FactDigest::new(&storage);

    assert_eq!(
        digest.edges(ReferenceKind::Usage),
        vec!["Mode pick() -> Mode::Slow <2:28 2:31>"]
    );
    assert_eq!(digest.qualifiers(), vec!["Mode <2:22 2:25>"]);
}

#[test]
fn lambda_parameters_in_an_initializer_are_locals() {
    let storage = index_cxx(
        "int main() {\n\
         \x20   auto l = [](int q) { return q; };\n\
         \x20   return 0;\n\
         }\n",
    );
    let locals = FactDigest::new(&storage).local_symbols();

    assert!(has(&locals, "main<0> <2:21 2:21>"), "{locals:?}");
    assert!(has(&locals, "main<0> <2:33 2:33>"), "{locals:?}");
    assert!(has(&locals, "main<1> <2:10 2:10>"), "{locals:?}");
}
