//! The per-file declaration model built before any fact is recorded.
//!
//! Java allows forward references everywhere, so the recorder needs every
//! type, callable and field of the file (with their final names) before it
//! can resolve a single usage. Building the model happens in four steps:
//! collect declarations, resolve in-file supertypes, name the non-local
//! types, then name callables and local types in document order.

use super::constants::{is_callable_declaration, is_field_declaration, is_type_declaration};
use super::naming::ResolvedType;
use std::collections::HashMap;
use std::path::Path;
use trailscope_api::{AccessKind, NameElement, NameHierarchy, SymbolKind};
use trailscope_core::parser::utils::{first_child_of_kind, named_children, node_text, start_of};
use tree_sitter::Node;

pub(crate) type TypeId = usize;
pub(crate) type CallableId = usize;

/// Where a name is looked up from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Type(TypeId),
    Callable(CallableId),
}

/// The declaration a type is lexically nested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Container {
    File,
    Type(TypeId),
    Callable(CallableId),
}

impl Container {
    pub fn scope(self) -> Option<Scope> {
        match self {
            Container::File => None,
            Container::Type(t) => Some(Scope::Type(t)),
            Container::Callable(c) => Some(Scope::Callable(c)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum SuperRef<'t> {
    Node(Node<'t>),
    Declared(TypeId),
}

#[derive(Debug, Clone)]
pub(crate) struct TypeParam<'t> {
    pub name: String,
    pub ident: Node<'t>,
    pub node: Node<'t>,
}

#[derive(Debug)]
pub(crate) struct TypeEntry<'t> {
    /// The declaration, or the class body of an anonymous class.
    pub node: Node<'t>,
    pub body: Option<Node<'t>>,
    pub kind: SymbolKind,
    pub simple_name: Option<String>,
    pub container: Container,
    /// Declared inside a method body, directly or through other local types.
    pub local: bool,
    pub type_params: Vec<TypeParam<'t>>,
    pub super_refs: Vec<SuperRef<'t>>,
    pub supers: Vec<TypeId>,
    pub nested: HashMap<String, TypeId>,
    pub methods: Vec<CallableId>,
    pub fields: Vec<FieldEntry<'t>>,
    pub name: NameHierarchy,
}

impl TypeEntry<'_> {
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, SymbolKind::Interface | SymbolKind::Annotation)
    }

    pub fn is_anonymous(&self) -> bool {
        self.simple_name.is_none()
    }
}

#[derive(Debug)]
pub(crate) struct ParamEntry<'t> {
    pub type_node: Option<Node<'t>>,
    pub name: Option<Node<'t>>,
    pub spread: bool,
}

#[derive(Debug)]
pub(crate) struct CallableEntry<'t> {
    pub node: Node<'t>,
    pub owner: TypeId,
    pub simple_name: String,
    /// The simple name plus type parameters, e.g. `foo<T>`.
    pub element_name: String,
    pub is_constructor: bool,
    pub type_params: Vec<TypeParam<'t>>,
    pub params: Vec<ParamEntry<'t>>,
    pub return_type: Option<Node<'t>>,
    pub param_displays: Vec<String>,
    /// Per parameter: whether its type is a type parameter.
    pub generic_params: Vec<bool>,
    pub name: NameHierarchy,
}

impl CallableEntry<'_> {
    pub fn is_varargs(&self) -> bool {
        self.params.last().is_some_and(|p| p.spread)
    }

    pub fn accepts_arity(&self, arity: usize) -> bool {
        let declared = self.params.len();
        if self.is_varargs() {
            arity + 1 >= declared
        } else {
            arity == declared
        }
    }
}

#[derive(Debug)]
pub(crate) struct FieldEntry<'t> {
    pub simple_name: String,
    pub name_node: Node<'t>,
    /// `None` for enum constants, whose type is the enum itself.
    pub type_node: Option<Node<'t>>,
    pub enum_constant: bool,
    pub name: NameHierarchy,
}

#[derive(Debug, Clone)]
pub(crate) struct Import {
    pub path: Vec<String>,
    pub wildcard: bool,
    pub is_static: bool,
}

#[derive(Debug, Clone, Copy)]
enum Named {
    Type(TypeId),
    Callable(CallableId),
}

/// Modifier keywords and annotations of a declaration.
#[derive(Debug, Default)]
pub(crate) struct Modifiers<'t> {
    pub access: Option<AccessKind>,
    pub is_static: bool,
    pub annotations: Vec<Node<'t>>,
}

impl<'t> Modifiers<'t> {
    pub fn of(declaration: Node<'t>) -> Self {
        let mut modifiers = Modifiers::default();
        let Some(list) = first_child_of_kind(declaration, "modifiers") else {
            return modifiers;
        };
        let mut cursor = list.walk();
        for child in list.children(&mut cursor) {
            match child.kind() {
                "public" => modifiers.access = Some(AccessKind::Public),
                "protected" => modifiers.access = Some(AccessKind::Protected),
                "private" => modifiers.access = Some(AccessKind::Private),
                "static" => modifiers.is_static = true,
                "annotation" | "marker_annotation" => modifiers.annotations.push(child),
                _ => {}
            }
        }
        modifiers
    }
}

pub(crate) struct FileModel<'t> {
    pub source: &'t str,
    pub path: &'t Path,
    pub package: NameHierarchy,
    pub imports: Vec<Import>,
    pub types: Vec<TypeEntry<'t>>,
    pub callables: Vec<CallableEntry<'t>>,
    pub top_level: HashMap<String, TypeId>,
    pub local_types: HashMap<CallableId, Vec<TypeId>>,
    /// Non-local types by their dotted name without type parameters.
    pub qualified_types: HashMap<String, TypeId>,
    type_by_node: HashMap<usize, TypeId>,
    callable_by_node: HashMap<usize, CallableId>,
    order: Vec<Named>,
}

impl<'t> FileModel<'t> {
    pub fn build(root: Node<'t>, source: &'t str, path: &'t Path) -> Self {
        let mut model = FileModel {
            source,
            path,
            package: NameHierarchy::default(),
            imports: Vec::new(),
            types: Vec::new(),
            callables: Vec::new(),
            top_level: HashMap::new(),
            local_types: HashMap::new(),
            qualified_types: HashMap::new(),
            type_by_node: HashMap::new(),
            callable_by_node: HashMap::new(),
            order: Vec::new(),
        };

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "package_declaration" => model.read_package(child),
                "import_declaration" => model.read_import(child),
                _ => model.collect(child, Container::File, false),
            }
        }

        model.resolve_supertypes();
        model.name_types_and_callables();
        model
    }

    pub fn text(&self, node: Node) -> &'t str {
        node_text(node, self.source)
    }

    pub fn type_of_node(&self, node: Node) -> Option<TypeId> {
        self.type_by_node.get(&node.id()).copied()
    }

    pub fn callable_of_node(&self, node: Node) -> Option<CallableId> {
        self.callable_by_node.get(&node.id()).copied()
    }

    fn read_package(&mut self, node: Node<'t>) {
        let mut cursor = node.walk();
        let name = node
            .named_children(&mut cursor)
            .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"));
        if let Some(name) = name {
            self.package = dotted_hierarchy(self.text(name));
        }
    }

    fn read_import(&mut self, node: Node<'t>) {
        let mut cursor = node.walk();
        let name = node
            .named_children(&mut cursor)
            .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"));
        let Some(name) = name else {
            return;
        };
        self.imports.push(Import {
            path: self.text(name).split('.').map(|s| s.trim().to_string()).collect(),
            wildcard: first_child_of_kind(node, "asterisk").is_some(),
            is_static: first_child_of_kind(node, "static").is_some(),
        });
    }

    fn collect(&mut self, node: Node<'t>, container: Container, local: bool) {
        let kind = node.kind();
        if is_type_declaration(kind) {
            self.collect_type_declaration(node, container, local);
            return;
        }
        if is_callable_declaration(kind) {
            if let Container::Type(owner) = container {
                self.collect_callable(node, owner);
                return;
            }
        }
        if is_field_declaration(kind) {
            if let Container::Type(owner) = container {
                self.collect_fields(node, owner);
            }
        }
        match kind {
            "object_creation_expression" => {
                if let Some(body) = first_child_of_kind(node, "class_body") {
                    let supers = node
                        .child_by_field_name("type")
                        .map(SuperRef::Node)
                        .into_iter()
                        .collect();
                    self.add_anonymous_type(body, supers, container, local);
                    let mut cursor = node.walk();
                    for child in node.named_children(&mut cursor) {
                        if child.id() != body.id() {
                            self.collect(child, container, local);
                        }
                    }
                    return;
                }
            }
            "enum_constant" => {
                if let Container::Type(owner) = container {
                    self.collect_enum_constant(node, owner, local);
                    return;
                }
            }
            _ => {}
        }
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.collect(child, container, local);
        }
    }

    fn collect_type_declaration(&mut self, node: Node<'t>, container: Container, local: bool) {
        let kind = match node.kind() {
            "interface_declaration" => SymbolKind::Interface,
            "enum_declaration" => SymbolKind::Enum,
            "record_declaration" => SymbolKind::Record,
            "annotation_type_declaration" => SymbolKind::Annotation,
            _ => SymbolKind::Class,
        };
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let simple_name = self.text(name_node).to_string();

        let mut super_refs = Vec::new();
        if let Some(superclass) = first_child_of_kind(node, "superclass") {
            super_refs.extend(named_children(superclass).into_iter().map(SuperRef::Node));
        }
        for list_kind in ["super_interfaces", "extends_interfaces"] {
            if let Some(list) = first_child_of_kind(node, list_kind) {
                if let Some(types) = first_child_of_kind(list, "type_list") {
                    super_refs.extend(named_children(types).into_iter().map(SuperRef::Node));
                }
            }
        }

        let body = node.child_by_field_name("body");
        let t = self.push_type(TypeEntry {
            node,
            body,
            kind,
            simple_name: Some(simple_name.clone()),
            container,
            local,
            type_params: self.type_params_of(node),
            super_refs,
            supers: Vec::new(),
            nested: HashMap::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            name: NameHierarchy::default(),
        });

        match container {
            Container::File => {
                self.top_level.insert(simple_name, t);
            }
            Container::Type(outer) => {
                self.types[outer].nested.insert(simple_name, t);
            }
            Container::Callable(c) => self.local_types.entry(c).or_default().push(t),
        }

        if kind == SymbolKind::Record {
            self.collect_record_components(node, t);
        }
        if let Some(body) = body {
            self.collect_body(body, t, local);
        }
    }

    fn add_anonymous_type(
        &mut self,
        body: Node<'t>,
        super_refs: Vec<SuperRef<'t>>,
        container: Container,
        local: bool,
    ) {
        let t = self.push_type(TypeEntry {
            node: body,
            body: Some(body),
            kind: SymbolKind::Class,
            simple_name: None,
            container,
            local,
            type_params: Vec::new(),
            super_refs,
            supers: Vec::new(),
            nested: HashMap::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            name: NameHierarchy::default(),
        });
        self.collect_body(body, t, local);
    }

    fn push_type(&mut self, entry: TypeEntry<'t>) -> TypeId {
        let t = self.types.len();
        self.type_by_node.insert(entry.node.id(), t);
        self.types.push(entry);
        self.order.push(Named::Type(t));
        t
    }

    fn collect_body(&mut self, body: Node<'t>, owner: TypeId, local: bool) {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            if member.kind() == "enum_body_declarations" {
                let mut inner = member.walk();
                for declaration in member.named_children(&mut inner) {
                    self.collect(declaration, Container::Type(owner), local);
                }
            } else {
                self.collect(member, Container::Type(owner), local);
            }
        }
    }

    fn collect_record_components(&mut self, node: Node<'t>, owner: TypeId) {
        let Some(params) = node.child_by_field_name("parameters") else {
            return;
        };
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if param.kind() != "formal_parameter" {
                continue;
            }
            if let Some(name_node) = param.child_by_field_name("name") {
                let simple_name = self.text(name_node).to_string();
                self.types[owner].fields.push(FieldEntry {
                    simple_name,
                    name_node,
                    type_node: param.child_by_field_name("type"),
                    enum_constant: false,
                    name: NameHierarchy::default(),
                });
            }
        }
    }

    fn collect_callable(&mut self, node: Node<'t>, owner: TypeId) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let simple_name = self.text(name_node).to_string();
        let type_params = self.type_params_of(node);
        let element_name = with_type_params(&simple_name, &type_params);
        let is_constructor = matches!(
            node.kind(),
            "constructor_declaration" | "compact_constructor_declaration"
        );

        let c = self.callables.len();
        self.callables.push(CallableEntry {
            node,
            owner,
            simple_name,
            element_name,
            is_constructor,
            type_params,
            params: parameters_of(node),
            return_type: if is_constructor {
                None
            } else {
                node.child_by_field_name("type")
            },
            param_displays: Vec::new(),
            generic_params: Vec::new(),
            name: NameHierarchy::default(),
        });
        self.callable_by_node.insert(node.id(), c);
        self.order.push(Named::Callable(c));
        self.types[owner].methods.push(c);

        if let Some(body) = node.child_by_field_name("body") {
            self.collect(body, Container::Callable(c), true);
        }
    }

    fn collect_fields(&mut self, node: Node<'t>, owner: TypeId) {
        let type_node = node.child_by_field_name("type");
        let mut cursor = node.walk();
        for declarator in node.named_children(&mut cursor) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            if let Some(name_node) = declarator.child_by_field_name("name") {
                let simple_name = self.text(name_node).to_string();
                self.types[owner].fields.push(FieldEntry {
                    simple_name,
                    name_node,
                    type_node,
                    enum_constant: false,
                    name: NameHierarchy::default(),
                });
            }
        }
    }

    fn collect_enum_constant(&mut self, node: Node<'t>, owner: TypeId, local: bool) {
        if let Some(name_node) = node.child_by_field_name("name") {
            let simple_name = self.text(name_node).to_string();
            self.types[owner].fields.push(FieldEntry {
                simple_name,
                name_node,
                type_node: None,
                enum_constant: true,
                name: NameHierarchy::default(),
            });
        }
        if let Some(arguments) = node.child_by_field_name("arguments") {
            self.collect(arguments, Container::Type(owner), local);
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.add_anonymous_type(
                body,
                vec![SuperRef::Declared(owner)],
                Container::Type(owner),
                local,
            );
        }
    }

    fn type_params_of(&self, node: Node<'t>) -> Vec<TypeParam<'t>> {
        let Some(list) = first_child_of_kind(node, "type_parameters") else {
            return Vec::new();
        };
        named_children(list)
            .into_iter()
            .filter(|p| p.kind() == "type_parameter")
            .filter_map(|p| {
                let ident = named_children(p)
                    .into_iter()
                    .find(|c| matches!(c.kind(), "type_identifier" | "identifier"))?;
                Some(TypeParam {
                    name: self.text(ident).to_string(),
                    ident,
                    node: p,
                })
            })
            .collect()
    }

    fn resolve_supertypes(&mut self) {
        for t in 0..self.types.len() {
            let from = self.types[t].container.scope();
            let refs = self.types[t].super_refs.clone();
            let mut supers = Vec::new();
            for super_ref in refs {
                let resolved = match super_ref {
                    SuperRef::Declared(s) => Some(s),
                    SuperRef::Node(node) => match self.resolve_type_node(node, from) {
                        Some(ResolvedType::Declared(s)) => Some(s),
                        _ => None,
                    },
                };
                if let Some(s) = resolved.filter(|&s| s != t) {
                    supers.push(s);
                }
            }
            self.types[t].supers = supers;
        }
    }

    fn name_types_and_callables(&mut self) {
        for t in 0..self.types.len() {
            if !self.types[t].local {
                self.name_type(t);
                if let Some(simple) = &self.types[t].simple_name {
                    let key = match self.types[t].container {
                        Container::Type(outer) => {
                            format!("{}.{}", self.plain_path(outer), simple)
                        }
                        _ if self.package.is_empty() => simple.clone(),
                        _ => format!("{}.{}", self.package.qualified_name(), simple),
                    };
                    self.qualified_types.insert(key, t);
                }
            }
        }

        for i in 0..self.order.len() {
            match self.order[i] {
                Named::Type(t) if self.types[t].local => self.name_type(t),
                Named::Type(_) => {}
                Named::Callable(c) => self.name_callable(c),
            }
        }

        for t in 0..self.types.len() {
            for f in 0..self.types[t].fields.len() {
                let field = &self.types[t].fields[f];
                let prefix = match field.type_node {
                    Some(type_node) => self.type_display(type_node, Some(Scope::Type(t))),
                    None => String::new(),
                };
                let element = NameElement::with_signature(field.simple_name.clone(), prefix, "");
                let name = self.types[t].name.child(element);
                self.types[t].fields[f].name = name;
            }
        }
    }

    /// Dotted path of a non-local type without type parameters.
    fn plain_path(&self, t: TypeId) -> String {
        let entry = &self.types[t];
        let simple = entry.simple_name.clone().unwrap_or_default();
        match entry.container {
            Container::Type(outer) => format!("{}.{}", self.plain_path(outer), simple),
            _ if self.package.is_empty() => simple,
            _ => format!("{}.{}", self.package.qualified_name(), simple),
        }
    }

    fn name_type(&mut self, t: TypeId) {
        let entry = &self.types[t];
        let element = match &entry.simple_name {
            Some(simple) => NameElement::new(with_type_params(simple, &entry.type_params)),
            None => {
                let anchor = start_of(entry.body.unwrap_or(entry.node));
                NameElement::anonymous("class", self.path, anchor.start_line, anchor.start_col)
            }
        };
        let name = self.container_name(entry.container).child(element);
        self.types[t].name = name;
    }

    fn name_callable(&mut self, c: CallableId) {
        let from = Some(Scope::Callable(c));
        let entry = &self.callables[c];

        let mut displays = Vec::with_capacity(entry.params.len());
        let mut generic = Vec::with_capacity(entry.params.len());
        for param in &entry.params {
            let Some(type_node) = param.type_node else {
                displays.push(String::new());
                generic.push(false);
                continue;
            };
            let mut display = self.type_display(type_node, from);
            if param.spread {
                display.push_str("...");
            }
            displays.push(display);
            generic.push(matches!(
                self.resolve_type_node(type_node, from),
                Some(ResolvedType::TypeParameter { .. })
            ));
        }

        let prefix = match entry.return_type {
            Some(node) => self.type_display(node, from),
            None => String::new(),
        };
        let element = NameElement::with_signature(
            entry.element_name.clone(),
            prefix,
            format!("({})", displays.join(", ")),
        );
        let name = self.types[entry.owner].name.child(element);

        let entry = &mut self.callables[c];
        entry.param_displays = displays;
        entry.generic_params = generic;
        entry.name = name;
    }

    pub fn container_name(&self, container: Container) -> NameHierarchy {
        match container {
            Container::File => self.package.clone(),
            Container::Type(t) => self.types[t].name.clone(),
            Container::Callable(c) => self.callables[c].name.clone(),
        }
    }

    /// Qualified name of a lookup scope; usable while the callable itself is
    /// still being named.
    pub fn scope_qualified_name(&self, scope: Scope) -> String {
        match scope {
            Scope::Type(t) => self.types[t].name.qualified_name(),
            Scope::Callable(c) => {
                let entry = &self.callables[c];
                format!(
                    "{}.{}",
                    self.types[entry.owner].name.qualified_name(),
                    entry.element_name
                )
            }
        }
    }

    pub fn scope_name(&self, scope: Scope) -> NameHierarchy {
        match scope {
            Scope::Type(t) => self.types[t].name.clone(),
            Scope::Callable(c) => self.callables[c].name.clone(),
        }
    }

    pub fn package_name_of(&self, segments: &[String]) -> NameHierarchy {
        let mut name = NameHierarchy::default();
        for segment in segments {
            name.push(NameElement::new(segment.clone()));
        }
        name
    }

    /// Guess for a type this file does not declare or import.
    pub fn guess_external(&self, simple: &str) -> NameHierarchy {
        self.package.child(NameElement::new(simple))
    }
}

fn with_type_params(simple: &str, params: &[TypeParam]) -> String {
    if params.is_empty() {
        return simple.to_string();
    }
    let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
    format!("{}<{}>", simple, names.join(", "))
}

fn parameters_of(node: Node<'_>) -> Vec<ParamEntry<'_>> {
    let Some(list) = node.child_by_field_name("parameters") else {
        return Vec::new();
    };
    let mut params = Vec::new();
    for param in named_children(list) {
        match param.kind() {
            "formal_parameter" => params.push(ParamEntry {
                type_node: param.child_by_field_name("type"),
                name: param.child_by_field_name("name"),
                spread: false,
            }),
            "spread_parameter" => {
                let children = named_children(param);
                let type_node = children
                    .iter()
                    .find(|c| !matches!(c.kind(), "modifiers" | "variable_declarator"))
                    .copied();
                let name = children
                    .iter()
                    .find(|c| c.kind() == "variable_declarator")
                    .and_then(|d| d.child_by_field_name("name"));
                params.push(ParamEntry {
                    type_node,
                    name,
                    spread: true,
                });
            }
            _ => {}
        }
    }
    params
}

pub(crate) fn dotted_hierarchy(text: &str) -> NameHierarchy {
    let mut name = NameHierarchy::default();
    for segment in text.split('.') {
        let segment = segment.trim();
        if !segment.is_empty() {
            name.push(NameElement::new(segment));
        }
    }
    name
}
