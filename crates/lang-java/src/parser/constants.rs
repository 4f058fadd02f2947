//! Node kinds and well-known names of the Java grammar.

pub const TYPE_DECLARATION_KINDS: &[&str] = &[
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
];

pub const CALLABLE_DECLARATION_KINDS: &[&str] = &[
    "method_declaration",
    "constructor_declaration",
    "compact_constructor_declaration",
    "annotation_type_element_declaration",
];

pub const FIELD_DECLARATION_KINDS: &[&str] = &["field_declaration", "constant_declaration"];

pub const PRIMITIVE_TYPE_KINDS: &[&str] = &[
    "integral_type",
    "floating_point_type",
    "boolean_type",
    "void_type",
];

pub const COMMENT_KINDS: &[&str] = &["line_comment", "block_comment"];

/// Classes visible in every compilation unit without an import.
pub const JAVA_LANG_CLASSES: &[&str] = &[
    "AutoCloseable",
    "Boolean",
    "Byte",
    "Character",
    "CharSequence",
    "Class",
    "ClassCastException",
    "Cloneable",
    "CloneNotSupportedException",
    "Comparable",
    "Deprecated",
    "Double",
    "Enum",
    "Error",
    "Exception",
    "Float",
    "FunctionalInterface",
    "IllegalArgumentException",
    "IllegalStateException",
    "IndexOutOfBoundsException",
    "Integer",
    "InterruptedException",
    "Iterable",
    "Long",
    "Math",
    "NullPointerException",
    "Number",
    "Object",
    "Override",
    "Record",
    "Runnable",
    "RuntimeException",
    "SafeVarargs",
    "Short",
    "String",
    "StringBuilder",
    "SuppressWarnings",
    "System",
    "Thread",
    "Throwable",
    "UnsupportedOperationException",
    "Void",
];

pub fn is_type_declaration(kind: &str) -> bool {
    TYPE_DECLARATION_KINDS.contains(&kind)
}

pub fn is_callable_declaration(kind: &str) -> bool {
    CALLABLE_DECLARATION_KINDS.contains(&kind)
}

pub fn is_field_declaration(kind: &str) -> bool {
    FIELD_DECLARATION_KINDS.contains(&kind)
}

pub fn is_primitive_type(kind: &str) -> bool {
    PRIMITIVE_TYPE_KINDS.contains(&kind)
}

pub fn is_comment(kind: &str) -> bool {
    COMMENT_KINDS.contains(&kind)
}

/// Type-like names start upper case by convention; used where the grammar
/// cannot tell packages from types.
pub fn looks_like_type_name(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
