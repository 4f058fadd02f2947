//! First pass: collects the declarations of a translation unit, keyed by
//! their `::`-joined path, so the second pass can resolve names in any order.

use super::constants::{is_comment, is_preproc_block, is_record_specifier};
use super::naming::{
    CallableHead, Signature, anonymous_segment, callable_head, declared_name, join_key, path_key,
    path_name, segments, split_key, variable_element,
};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use trailscope_api::{NameHierarchy, SymbolKind};
use trailscope_core::parser::utils::{has_child_token, named_children, node_text};
use tree_sitter::Node;

#[derive(Debug, Clone)]
pub struct TypeEntry {
    pub kind: SymbolKind,
    raw_bases: Vec<Vec<String>>,
    /// Scope the base names are looked up from.
    declared_in: Vec<String>,
    pub bases: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CallableEntry {
    pub name: NameHierarchy,
    pub signature: Signature,
    pub is_virtual: bool,
    return_segments: Option<Vec<String>>,
    declared_in: Vec<String>,
    pub return_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct VariableEntry {
    pub name: NameHierarchy,
    type_segments: Option<Vec<String>>,
    declared_in: Vec<String>,
    /// Key of the declared type when it is declared in this file.
    pub type_key: Option<String>,
}

pub(crate) struct FileModel<'t> {
    pub source: &'t str,
    pub path: &'t Path,
    namespaces: HashSet<String>,
    pub types: HashMap<String, TypeEntry>,
    callables: HashMap<String, Vec<CallableEntry>>,
    variables: HashMap<String, VariableEntry>,
    macros: HashSet<String>,
}

impl<'t> FileModel<'t> {
    /// `predefined` names macros defined on the command line.
    pub fn build(root: Node<'t>, source: &'t str, path: &'t Path, predefined: &[String]) -> Self {
        let mut model = Self {
            source,
            path,
            namespaces: HashSet::new(),
            types: HashMap::new(),
            callables: HashMap::new(),
            variables: HashMap::new(),
            macros: predefined.iter().cloned().collect(),
        };
        model.collect(root, &mut Vec::new());
        model.resolve();
        model
    }

    pub fn text(&self, node: Node) -> &'t str {
        node_text(node, self.source)
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn callable_count(&self) -> usize {
        self.callables.values().map(Vec::len).sum()
    }

    // --- collection ---

    fn collect_children(&mut self, node: Node<'t>, scope: &mut Vec<String>) {
        for child in named_children(node) {
            self.collect(child, scope);
        }
    }

    fn collect(&mut self, node: Node<'t>, scope: &mut Vec<String>) {
        let kind = node.kind();
        if is_comment(kind) {
            return;
        }
        match kind {
            "translation_unit" | "declaration_list" | "field_declaration_list" => {
                self.collect_children(node, scope)
            }
            k if is_preproc_block(k) => self.collect_children(node, scope),
            "namespace_definition" => self.collect_namespace(node, scope),
            k if is_record_specifier(k) => self.collect_record(node, scope),
            "enum_specifier" => self.collect_enum(node, scope),
            "function_definition" => {
                if let Some(declarator) = node.child_by_field_name("declarator") {
                    self.collect_callable(node, declarator, scope);
                }
            }
            "declaration" | "field_declaration" => self.collect_declaration(node, scope),
            "template_declaration" => {
                for child in named_children(node) {
                    if child.kind() != "template_parameter_list" {
                        self.collect(child, scope);
                    }
                }
            }
            "type_definition" => {
                if let Some(type_node) = node.child_by_field_name("type") {
                    self.collect(type_node, scope);
                }
                let mut cursor = node.walk();
                let declarators: Vec<Node> =
                    node.children_by_field_name("declarator", &mut cursor).collect();
                for declarator in declarators {
                    if let Some(name) = declared_name(declarator) {
                        let key = join_key(&path_key(scope), self.text(name));
                        self.declare_type(key, SymbolKind::Typedef, scope);
                    }
                }
            }
            "alias_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    let key = join_key(&path_key(scope), self.text(name));
                    self.declare_type(key, SymbolKind::Typedef, scope);
                }
            }
            "preproc_def" | "preproc_function_def" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.macros.insert(self.text(name).to_string());
                }
            }
            "linkage_specification" => {
                if let Some(body) = node.child_by_field_name("body") {
                    self.collect(body, scope);
                }
            }
            _ => {}
        }
    }

    fn collect_namespace(&mut self, node: Node<'t>, scope: &mut Vec<String>) {
        let added = namespace_segments(node, self.source, self.path);
        for segment in &added {
            scope.push(segment.clone());
            self.namespaces.insert(path_key(scope));
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.collect_children(body, scope);
        }
        scope.truncate(scope.len() - added.len());
    }

    fn collect_record(&mut self, node: Node<'t>, scope: &mut Vec<String>) {
        let kind = record_kind(node.kind());
        let Some(body) = node.child_by_field_name("body") else {
            if let Some(name) = node.child_by_field_name("name") {
                let mut path = scope.clone();
                path.extend(segments(name, self.source));
                self.declare_type(path_key(&path), kind, scope);
            }
            return;
        };
        let added = record_segments(node, self.source, self.path);
        let bases = base_specifiers(node)
            .into_iter()
            .map(|base| segments(base, self.source))
            .collect();
        scope.extend(added.iter().cloned());
        self.add_type(path_key(scope), kind, bases, &scope[..scope.len() - added.len()]);
        self.collect_children(body, scope);
        scope.truncate(scope.len() - added.len());
    }

    fn collect_enum(&mut self, node: Node<'t>, scope: &mut Vec<String>) {
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let added = record_segments(node, self.source, self.path);
        let scoped = has_child_token(node, "class") || has_child_token(node, "struct");
        let mut enum_path = scope.clone();
        enum_path.extend(added);
        let enum_key = path_key(&enum_path);
        self.add_type(enum_key.clone(), SymbolKind::Enum, Vec::new(), scope);

        for enumerator in named_children(body) {
            if enumerator.kind() != "enumerator" {
                continue;
            }
            let Some(name) = enumerator.child_by_field_name("name") else {
                continue;
            };
            let simple = self.text(name).to_string();
            let mut path = enum_path.clone();
            path.push(simple.clone());
            let entry = VariableEntry {
                name: path_name(&path),
                type_segments: None,
                declared_in: scope.clone(),
                type_key: Some(enum_key.clone()),
            };
            if !scoped {
                // Unscoped enumerators are also visible next to their enum.
                self.variables
                    .insert(join_key(&path_key(scope), &simple), entry.clone());
            }
            self.variables.insert(path_key(&path), entry);
        }
    }

    fn collect_declaration(&mut self, node: Node<'t>, scope: &mut Vec<String>) {
        if let Some(type_node) = node.child_by_field_name("type") {
            self.collect(type_node, scope);
        }
        let mut cursor = node.walk();
        let declarators: Vec<Node> = node
            .children_by_field_name("declarator", &mut cursor)
            .collect();
        for declarator in declarators {
            if self.collect_callable(node, declarator, scope) {
                continue;
            }
            let Some(name) = declared_name(declarator) else {
                continue;
            };
            let mut path = scope.clone();
            path.extend(segments(name, self.source));
            let Some(simple) = path.pop() else {
                continue;
            };
            let name_hierarchy =
                path_name(&path).child(variable_element(&simple, node, declarator, self.source));
            path.push(simple);
            let type_segments = node
                .child_by_field_name("type")
                .filter(|t| is_named_type(t.kind()))
                .map(|t| segments(t, self.source));
            self.variables.insert(
                path_key(&path),
                VariableEntry {
                    name: name_hierarchy,
                    type_segments,
                    declared_in: scope.clone(),
                    type_key: None,
                },
            );
        }
    }

    /// Adds the function `declarator` declares, if it declares one.
    fn collect_callable(&mut self, holder: Node<'t>, declarator: Node<'t>, scope: &[String]) -> bool {
        let Some(head) = callable_head(holder, declarator, self.source) else {
            return false;
        };
        let (key, entry) = self.callable_entry(holder, &head, scope);
        let overloads = self.callables.entry(key).or_default();
        if !overloads.iter().any(|c| c.name == entry.name) {
            overloads.push(entry);
        }
        true
    }

    fn callable_entry(
        &self,
        holder: Node<'t>,
        head: &CallableHead<'t>,
        scope: &[String],
    ) -> (String, CallableEntry) {
        let mut path = scope.to_vec();
        path.extend(head.segments.iter().cloned());
        let owner = &path[..path.len() - 1];
        let is_virtual = has_child_token(holder, "virtual")
            || named_children(head.function)
                .iter()
                .any(|c| c.kind() == "virtual_specifier");
        let return_segments = holder
            .child_by_field_name("type")
            .filter(|t| is_named_type(t.kind()))
            .map(|t| segments(t, self.source));
        let entry = CallableEntry {
            name: path_name(owner).child(head.element()),
            signature: head.signature.clone(),
            is_virtual,
            return_segments,
            declared_in: owner.to_vec(),
            return_type: None,
        };
        (path_key(&path), entry)
    }

    /// A defined type replaces an earlier forward declaration.
    fn add_type(&mut self, key: String, kind: SymbolKind, raw_bases: Vec<Vec<String>>, scope: &[String]) {
        self.types.insert(
            key,
            TypeEntry {
                kind,
                raw_bases,
                declared_in: scope.to_vec(),
                bases: Vec::new(),
            },
        );
    }

    fn declare_type(&mut self, key: String, kind: SymbolKind, scope: &[String]) {
        if !self.types.contains_key(&key) {
            self.add_type(key, kind, Vec::new(), scope);
        }
    }

    /// Resolves base classes first, then the declared types of variables
    /// and return types, which may be found through bases.
    fn resolve(&mut self) {
        let keys: Vec<String> = self.types.keys().cloned().collect();
        for key in keys {
            let entry = &self.types[&key];
            let bases: Vec<String> = entry
                .raw_bases
                .iter()
                .filter_map(|raw| self.find_type(raw, &entry.declared_in))
                .filter(|base| *base != key)
                .collect();
            if let Some(entry) = self.types.get_mut(&key) {
                entry.bases = bases;
            }
        }

        let resolved: Vec<(String, Option<String>)> = self
            .variables
            .iter()
            .filter(|(_, v)| v.type_key.is_none())
            .map(|(key, v)| {
                let found = v
                    .type_segments
                    .as_ref()
                    .and_then(|segments| self.find_type(segments, &v.declared_in));
                (key.clone(), found)
            })
            .collect();
        for (key, type_key) in resolved {
            if let Some(variable) = self.variables.get_mut(&key) {
                variable.type_key = type_key;
            }
        }

        let mut returns = Vec::new();
        for (key, overloads) in &self.callables {
            for (index, callable) in overloads.iter().enumerate() {
                let found = callable
                    .return_segments
                    .as_ref()
                    .and_then(|segments| self.find_type(segments, &callable.declared_in));
                returns.push((key.clone(), index, found));
            }
        }
        for (key, index, found) in returns {
            if let Some(callable) = self.callables.get_mut(&key).and_then(|o| o.get_mut(index)) {
                callable.return_type = found;
            }
        }
    }

    // --- lookup ---

    /// `key` followed by its in-file bases, breadth first.
    pub fn with_bases(&self, key: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([key.to_string()]);
        let mut out = Vec::new();
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(entry) = self.types.get(&current) {
                queue.extend(entry.bases.iter().cloned());
            }
            out.push(current);
        }
        out
    }

    /// Looks `segments` up from `from` outwards. Class scopes on the way
    /// include their bases.
    fn locate(&self, segments: &[String], from: &[String], exists: impl Fn(&str) -> bool) -> Option<String> {
        if segments.is_empty() {
            return None;
        }
        let tail = path_key(segments);
        for depth in (0..=from.len()).rev() {
            let prefix = path_key(&from[..depth]);
            let scopes = if self.types.contains_key(&prefix) {
                self.with_bases(&prefix)
            } else {
                vec![prefix]
            };
            for scope in scopes {
                let key = join_key(&scope, &tail);
                if exists(&key) {
                    return Some(key);
                }
            }
        }
        None
    }

    pub fn find_type(&self, segments: &[String], from: &[String]) -> Option<String> {
        self.locate(segments, from, |key| self.types.contains_key(key))
    }

    /// A namespace or type usable as a qualifier.
    pub fn find_scope(&self, segments: &[String], from: &[String]) -> Option<String> {
        self.locate(segments, from, |key| {
            self.types.contains_key(key) || self.namespaces.contains(key)
        })
    }

    pub fn find_variable(&self, segments: &[String], from: &[String]) -> Option<&VariableEntry> {
        let key = self.locate(segments, from, |key| self.variables.contains_key(key))?;
        self.variables.get(&key)
    }

    pub fn find_callable(
        &self,
        segments: &[String],
        from: &[String],
        arity: Option<usize>,
    ) -> Option<&CallableEntry> {
        let key = self.locate(segments, from, |key| self.callables.contains_key(key))?;
        choose_overload(self.callables.get(&key)?, arity)
    }

    pub fn member_variable(&self, type_key: &str, name: &str) -> Option<&VariableEntry> {
        self.with_bases(type_key)
            .iter()
            .find_map(|t| self.variables.get(&join_key(t, name)))
    }

    pub fn member_callable(&self, type_key: &str, name: &str, arity: Option<usize>) -> Option<&CallableEntry> {
        self.with_bases(type_key).iter().find_map(|t| {
            self.callables
                .get(&join_key(t, name))
                .and_then(|overloads| choose_overload(overloads, arity))
        })
    }

    /// The constructor of `type_key` taking `arity` arguments.
    pub fn constructor(&self, type_key: &str, arity: usize) -> Option<&CallableEntry> {
        let simple = split_key(type_key).pop()?;
        let overloads = self.callables.get(&join_key(type_key, &simple))?;
        choose_overload(overloads, Some(arity))
    }

    /// The nearest virtual method of a base of `type_key` that a method
    /// `name` with `displays` overrides.
    pub fn overridden(&self, type_key: &str, name: &str, displays: &[String]) -> Option<&CallableEntry> {
        self.with_bases(type_key).iter().skip(1).find_map(|base| {
            self.callables.get(&join_key(base, name)).and_then(|overloads| {
                overloads
                    .iter()
                    .find(|c| c.is_virtual && c.signature.displays == displays)
            })
        })
    }

    pub fn is_type(&self, key: &str) -> bool {
        self.types.contains_key(key)
    }

    pub fn is_macro(&self, name: &str) -> bool {
        self.macros.contains(name)
    }
}

fn choose_overload(overloads: &[CallableEntry], arity: Option<usize>) -> Option<&CallableEntry> {
    if let Some(arity) = arity {
        if let Some(found) = overloads.iter().find(|c| c.signature.accepts(arity)) {
            return Some(found);
        }
    }
    match overloads {
        [single] => Some(single),
        _ if arity.is_none() => overloads.first(),
        _ => None,
    }
}

fn is_named_type(kind: &str) -> bool {
    matches!(
        kind,
        "type_identifier" | "qualified_identifier" | "qualified_type_identifier" | "template_type"
    ) || is_record_specifier(kind)
        || kind == "enum_specifier"
}

pub fn record_kind(kind: &str) -> SymbolKind {
    match kind {
        "struct_specifier" => SymbolKind::Struct,
        "union_specifier" => SymbolKind::Union,
        "enum_specifier" => SymbolKind::Enum,
        _ => SymbolKind::Class,
    }
}

/// Segments a class, struct, union or enum specifier adds to the scope.
pub fn record_segments(node: Node, source: &str, path: &Path) -> Vec<String> {
    match node.child_by_field_name("name") {
        Some(name) => segments(name, source),
        None => {
            let what = match node.kind() {
                "class_specifier" => "class",
                "union_specifier" => "union",
                "enum_specifier" => "enum",
                _ => "struct",
            };
            let anchor = node.child_by_field_name("body").unwrap_or(node);
            vec![anonymous_segment(what, path, anchor)]
        }
    }
}

/// Segments a namespace definition adds to the scope.
pub fn namespace_segments(node: Node, source: &str, path: &Path) -> Vec<String> {
    match node.child_by_field_name("name") {
        Some(name) => segments(name, source),
        None => vec![anonymous_segment("namespace", path, node)],
    }
}

/// The base class names of a class specifier.
pub fn base_specifiers(node: Node) -> Vec<Node> {
    let Some(clause) = named_children(node)
        .into_iter()
        .find(|c| c.kind() == "base_class_clause")
    else {
        return Vec::new();
    };
    named_children(clause)
        .into_iter()
        .filter(|c| {
            matches!(
                c.kind(),
                "type_identifier" | "qualified_identifier" | "qualified_type_identifier" | "template_type"
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailscope_core::parser::utils::{new_parser, parse_text};
    use tree_sitter::Language;

    fn with_model<R>(source: &str, f: impl FnOnce(&FileModel) -> R) -> R {
        let language: Language = tree_sitter_cpp::LANGUAGE.into();
        let mut parser = new_parser(&language).unwrap();
        let tree = parse_text(&mut parser, source).unwrap();
        let model = FileModel::build(tree.root_node(), source, Path::new("m.cpp"), &[]);
        f(&model)
    }

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn members_are_found_through_bases() {
        with_model(
            "struct A { int x; void f(int); void f(int, int); };\nstruct B : A {};\n",
            |model| {
                assert_eq!(model.with_bases("B"), vec!["B", "A"]);
                assert!(model.member_variable("B", "x").is_some());
                let two = model.member_callable("B", "f", Some(2)).unwrap();
                assert_eq!(two.signature.postfix, "(int, int)");
            },
        );
    }

    #[test]
    fn names_resolve_from_the_innermost_scope_outwards() {
        with_model(
            "int v;\nnamespace a { int v; namespace b { struct T {}; } }\n",
            |model| {
                let inner = model.find_variable(&path(&["v"]), &path(&["a", "b"])).unwrap();
                assert_eq!(inner.name.qualified_name(), "a::v");
                let outer = model.find_variable(&path(&["v"]), &[]).unwrap();
                assert_eq!(outer.name.qualified_name(), "v");
                assert_eq!(
                    model.find_type(&path(&["b", "T"]), &path(&["a"])).as_deref(),
                    Some("a::b::T")
                );
                assert_eq!(model.find_scope(&path(&["a", "b"]), &[]).as_deref(), Some("a::b"));
            },
        );
    }

    #[test]
    fn definition_replaces_forward_declaration() {
        with_model("struct B {};\nstruct A;\nstruct A : B {};\n", |model| {
            assert_eq!(model.with_bases("A"), vec!["A", "B"]);
            assert_eq!(model.types["A"].kind, SymbolKind::Struct);
        });
    }

    #[test]
    fn unscoped_enumerators_are_visible_next_to_their_enum() {
        with_model("enum E { One };\nenum class F { Two };\n", |model| {
            assert!(model.find_variable(&path(&["One"]), &[]).is_some());
            assert!(model.find_variable(&path(&["E", "One"]), &[]).is_some());
            assert!(model.find_variable(&path(&["Two"]), &[]).is_none());
            assert_eq!(
                model.find_variable(&path(&["F", "Two"]), &[]).unwrap().type_key.as_deref(),
                Some("F")
            );
        });
    }
}
