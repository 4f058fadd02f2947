pub const COMMENT_KINDS: &[&str] = &["comment"];

pub const RECORD_SPECIFIER_KINDS: &[&str] = &["class_specifier", "struct_specifier", "union_specifier"];

pub const BUILTIN_TYPE_KINDS: &[&str] = &[
    "primitive_type",
    "sized_type_specifier",
    "placeholder_type_specifier",
    "auto",
];

pub const QUALIFIED_KINDS: &[&str] = &[
    "qualified_identifier",
    "qualified_type_identifier",
    "qualified_field_identifier",
];

/// Conditional-compilation blocks whose branches are indexed as if taken.
pub const PREPROC_BLOCK_KINDS: &[&str] = &[
    "preproc_if",
    "preproc_ifdef",
    "preproc_else",
    "preproc_elif",
    "preproc_elifdef",
];

pub const LITERAL_KINDS: &[&str] = &[
    "number_literal",
    "string_literal",
    "raw_string_literal",
    "char_literal",
    "concatenated_string",
    "true",
    "false",
    "null",
    "nullptr",
    "system_lib_string",
];

pub fn is_comment(kind: &str) -> bool {
    COMMENT_KINDS.contains(&kind)
}

pub fn is_record_specifier(kind: &str) -> bool {
    RECORD_SPECIFIER_KINDS.contains(&kind)
}

pub fn is_builtin_type(kind: &str) -> bool {
    BUILTIN_TYPE_KINDS.contains(&kind)
}

pub fn is_qualified(kind: &str) -> bool {
    QUALIFIED_KINDS.contains(&kind)
}

pub fn is_preproc_block(kind: &str) -> bool {
    PREPROC_BLOCK_KINDS.contains(&kind)
}

pub fn is_literal(kind: &str) -> bool {
    LITERAL_KINDS.contains(&kind)
}
