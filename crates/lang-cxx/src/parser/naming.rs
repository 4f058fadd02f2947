//! Declarator and signature helpers shared by both passes, so that a
//! prototype and its out-of-line definition end up with the same name.

use super::constants::{is_qualified, is_record_specifier};
use std::path::Path;
use trailscope_api::{NameDelimiter, NameElement, NameHierarchy};
use trailscope_core::parser::utils::{named_children, node_text, start_of};
use tree_sitter::Node;

pub const SEPARATOR: &str = "::";

pub fn path_key(path: &[String]) -> String {
    path.join(SEPARATOR)
}

pub fn join_key(scope: &str, tail: &str) -> String {
    if scope.is_empty() {
        tail.to_string()
    } else {
        format!("{}{}{}", scope, SEPARATOR, tail)
    }
}

pub fn split_key(key: &str) -> Vec<String> {
    if key.is_empty() {
        return Vec::new();
    }
    key.split(SEPARATOR).map(str::to_string).collect()
}

pub fn path_name(path: &[String]) -> NameHierarchy {
    let mut name = NameHierarchy::new(NameDelimiter::DoubleColon);
    for segment in path {
        name.push(NameElement::new(segment.clone()));
    }
    name
}

pub fn key_name(key: &str) -> NameHierarchy {
    path_name(&split_key(key))
}

pub fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Segment name for a declaration without a name, distinct per position.
pub fn anonymous_segment(what: &str, path: &Path, node: Node) -> String {
    let at = start_of(node);
    NameElement::anonymous(what, path, at.start_line, at.start_col).name
}

/// The declarator nested in `node`, if it wraps one.
pub fn inner_declarator(node: Node) -> Option<Node> {
    if let Some(inner) = node.child_by_field_name("declarator") {
        return Some(inner);
    }
    match node.kind() {
        "reference_declarator"
        | "abstract_reference_declarator"
        | "parenthesized_declarator"
        | "abstract_parenthesized_declarator"
        | "attributed_declarator" => named_children(node)
            .into_iter()
            .filter(|c| {
                !matches!(
                    c.kind(),
                    "type_qualifier" | "attribute_declaration" | "ms_pointer_modifier"
                )
            })
            .next_back(),
        _ => None,
    }
}

/// The node spelling the declared name: an identifier, a qualified name,
/// an operator or a destructor name.
pub fn declared_name(declarator: Node) -> Option<Node> {
    let mut node = declarator;
    loop {
        match node.kind() {
            "identifier" | "field_identifier" | "type_identifier" | "destructor_name"
            | "operator_name" | "template_function" | "template_method" => return Some(node),
            kind if is_qualified(kind) => return Some(node),
            _ => node = inner_declarator(node)?,
        }
    }
}

/// The function declarator inside `declarator`. `None` for variables,
/// including pointers to functions.
pub fn function_declarator(declarator: Node) -> Option<Node> {
    let mut node = declarator;
    loop {
        match node.kind() {
            "function_declarator" => {
                let name = node.child_by_field_name("declarator")?;
                return (name.kind() != "parenthesized_declarator").then_some(node);
            }
            "pointer_declarator" | "reference_declarator" | "attributed_declarator" => {
                node = inner_declarator(node)?
            }
            _ => return None,
        }
    }
}

/// Pointer, reference and array markers between `declarator` and the
/// declared name or function declarator, outermost first.
pub fn declarator_markers(declarator: Option<Node>) -> String {
    let mut out = String::new();
    let mut current = declarator;
    while let Some(node) = current {
        match node.kind() {
            "pointer_declarator" | "abstract_pointer_declarator" => out.push('*'),
            "reference_declarator" | "abstract_reference_declarator" => {
                let mut cursor = node.walk();
                let token = node
                    .children(&mut cursor)
                    .map(|c| c.kind())
                    .find(|k| matches!(*k, "&" | "&&"))
                    .unwrap_or("&");
                out.push_str(token);
            }
            "array_declarator" | "abstract_array_declarator" => out.push_str("[]"),
            "function_declarator" => break,
            _ => {}
        }
        current = inner_declarator(node);
    }
    out
}

/// Display of a type node. Specifiers with a body are shown by name only.
pub fn type_text(node: Node, source: &str) -> String {
    if is_record_specifier(node.kind()) || node.kind() == "enum_specifier" {
        return node
            .child_by_field_name("name")
            .map(|name| collapse(node_text(name, source)))
            .unwrap_or_else(|| "anonymous".to_string());
    }
    collapse(node_text(node, source))
}

/// The declared type of `holder` with its cv-qualifiers, e.g. `const char`.
pub fn qualified_type_text(holder: Node, source: &str) -> Option<String> {
    let type_node = holder.child_by_field_name("type")?;
    let mut parts: Vec<String> = named_children(holder)
        .into_iter()
        .filter(|c| c.kind() == "type_qualifier")
        .map(|c| node_text(c, source).to_string())
        .collect();
    parts.push(type_text(type_node, source));
    Some(parts.join(" "))
}

/// `holder`'s type as seen through `declarator`, e.g. `const char*`.
pub fn declared_type_display(holder: Node, declarator: Option<Node>, source: &str) -> String {
    let mut display = qualified_type_text(holder, source).unwrap_or_default();
    display.push_str(&declarator_markers(declarator));
    display
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub prefix: String,
    pub postfix: String,
    pub displays: Vec<String>,
    pub params: usize,
    pub required: usize,
    pub variadic: bool,
}

impl Signature {
    pub fn accepts(&self, arity: usize) -> bool {
        arity >= self.required && (self.variadic || arity <= self.params)
    }
}

/// Signature of the function `holder` declares through `function`.
pub fn signature(holder: Node, declarator: Node, function: Node, source: &str) -> Signature {
    let prefix = match qualified_type_text(holder, source) {
        Some(mut prefix) => {
            prefix.push_str(&declarator_markers(Some(declarator)));
            prefix
        }
        None => String::new(),
    };

    let mut displays = Vec::new();
    let mut params = 0;
    let mut required = 0;
    let mut variadic = false;
    if let Some(list) = function.child_by_field_name("parameters") {
        let mut cursor = list.walk();
        for child in list.children(&mut cursor) {
            match child.kind() {
                "parameter_declaration" => {
                    displays.push(declared_type_display(
                        child,
                        child.child_by_field_name("declarator"),
                        source,
                    ));
                    params += 1;
                    required += 1;
                }
                "optional_parameter_declaration" => {
                    displays.push(declared_type_display(
                        child,
                        child.child_by_field_name("declarator"),
                        source,
                    ));
                    params += 1;
                }
                "variadic_parameter_declaration" => {
                    let mut display = qualified_type_text(child, source).unwrap_or_default();
                    display.push_str("...");
                    displays.push(display);
                    variadic = true;
                }
                "..." => {
                    displays.push("...".to_string());
                    variadic = true;
                }
                _ => {}
            }
        }
    }
    if displays == ["void"] {
        displays.clear();
        params = 0;
        required = 0;
    }

    let mut postfix = format!("({})", displays.join(", "));
    for child in named_children(function) {
        if child.kind() == "type_qualifier" {
            postfix.push(' ');
            postfix.push_str(node_text(child, source));
        }
    }

    Signature {
        prefix,
        postfix,
        displays,
        params,
        required,
        variadic,
    }
}

/// Scope parts and the last part of a possibly qualified name.
pub fn qualified_parts(node: Node) -> (Vec<Node>, Node) {
    let mut scopes = Vec::new();
    let mut current = node;
    while is_qualified(current.kind()) {
        if let Some(scope) = current.child_by_field_name("scope") {
            scopes.push(scope);
        }
        match current.child_by_field_name("name") {
            Some(name) => current = name,
            None => break,
        }
    }
    (scopes, current)
}

/// The identifier a reference to `node` is anchored at.
pub fn name_anchor(node: Node) -> Node {
    let (_, last) = qualified_parts(node);
    match last.kind() {
        "template_type" | "template_function" | "template_method" => {
            last.child_by_field_name("name").unwrap_or(last)
        }
        _ => last,
    }
}

pub fn segment_text(node: Node, source: &str) -> String {
    match node.kind() {
        "template_type" | "template_function" | "template_method" => node
            .child_by_field_name("name")
            .map(|name| collapse(node_text(name, source)))
            .unwrap_or_else(|| collapse(node_text(node, source))),
        _ => collapse(node_text(node, source)),
    }
}

/// Name segments of a possibly qualified name, e.g. `["ns", "A", "f"]`.
pub fn segments(node: Node, source: &str) -> Vec<String> {
    if node.kind() == "nested_namespace_specifier" {
        return node_text(node, source)
            .split(SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }
    let (scopes, last) = qualified_parts(node);
    scopes
        .into_iter()
        .chain(std::iter::once(last))
        .map(|n| segment_text(n, source))
        .collect()
}

/// The declarator, name and signature of a function declaration.
pub struct CallableHead<'t> {
    pub function: Node<'t>,
    pub name_node: Node<'t>,
    pub segments: Vec<String>,
    pub signature: Signature,
}

impl<'t> CallableHead<'t> {
    pub fn element(&self) -> NameElement {
        let simple = self.segments.last().cloned().unwrap_or_default();
        NameElement::with_signature(
            simple,
            self.signature.prefix.clone(),
            self.signature.postfix.clone(),
        )
    }

    /// Where the simple name is written.
    pub fn anchor(&self) -> Node<'t> {
        name_anchor(self.name_node)
    }
}

pub fn callable_head<'t>(holder: Node<'t>, declarator: Node<'t>, source: &str) -> Option<CallableHead<'t>> {
    let function = function_declarator(declarator)?;
    let name_node = declared_name(function.child_by_field_name("declarator")?)?;
    let segments = segments(name_node, source);
    if segments.is_empty() {
        return None;
    }
    Some(CallableHead {
        function,
        name_node,
        segments,
        signature: signature(holder, declarator, function, source),
    })
}

/// Name element of a variable or field, typed by its declaration.
pub fn variable_element(simple: &str, holder: Node, declarator: Node, source: &str) -> NameElement {
    NameElement::with_signature(
        simple,
        declared_type_display(holder, Some(declarator), source),
        "",
    )
}

/// True when `holder` carries the given storage class, e.g. `static`.
pub fn has_storage_class(holder: Node, storage: &str, source: &str) -> bool {
    named_children(holder)
        .into_iter()
        .any(|c| c.kind() == "storage_class_specifier" && node_text(c, source) == storage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailscope_core::parser::utils::{new_parser, parse_text};
    use tree_sitter::Language;

    fn with_first_function<R>(source: &str, f: impl FnOnce(Node, &str) -> R) -> R {
        let language: Language = tree_sitter_cpp::LANGUAGE.into();
        let mut parser = new_parser(&language).unwrap();
        let tree = parse_text(&mut parser, source).unwrap();
        let holder = tree.root_node().named_child(0).unwrap();
        f(holder, source)
    }

    #[test]
    fn signature_of_prototype_and_definition_agree() {
        let prototype = with_first_function("const char* name(int a, double* b);", |holder, src| {
            let declarator = holder.child_by_field_name("declarator").unwrap();
            callable_head(holder, declarator, src).unwrap().element()
        });
        let definition =
            with_first_function("const char* name(int x, double* y) { return 0; }", |holder, src| {
                let declarator = holder.child_by_field_name("declarator").unwrap();
                callable_head(holder, declarator, src).unwrap().element()
            });
        assert_eq!(prototype, definition);
        assert_eq!(prototype.prefix, "const char*");
        assert_eq!(prototype.postfix, "(int, double*)");
    }

    #[test]
    fn void_parameter_list_is_empty() {
        let head = with_first_function("int main(void) { return 0; }", |holder, src| {
            let declarator = holder.child_by_field_name("declarator").unwrap();
            let head = callable_head(holder, declarator, src).unwrap();
            (head.segments.clone(), head.signature.clone())
        });
        assert_eq!(head.0, vec!["main"]);
        assert_eq!(head.1.postfix, "()");
        assert!(head.1.accepts(0));
        assert!(!head.1.accepts(1));
    }

    #[test]
    fn qualified_definition_splits_into_segments() {
        let segments = with_first_function("void ns::Widget::draw() const {}", |holder, src| {
            let declarator = holder.child_by_field_name("declarator").unwrap();
            let head = callable_head(holder, declarator, src).unwrap();
            assert_eq!(head.signature.postfix, "() const");
            head.segments
        });
        assert_eq!(segments, vec!["ns", "Widget", "draw"]);
    }

    #[test]
    fn keys_round_trip_through_names() {
        let path = vec!["ns".to_string(), "Widget".to_string()];
        assert_eq!(key_name(&path_key(&path)).qualified_name(), "ns::Widget");
        assert_eq!(join_key("", "f"), "f");
        assert!(split_key("").is_empty());
    }
}
