//! Second pass: walks the syntax tree and reports facts to the client.

use super::constants::{is_callable_declaration, is_comment, is_field_declaration, is_type_declaration};
use super::model::{
    Container, FileModel, Modifiers, Scope, SuperRef, TypeId, TypeParam, dotted_hierarchy,
};
use super::naming::{ConstructorTarget, ResolvedType};
use std::collections::HashMap;
use trailscope_api::{
    AccessKind, DefinitionKind, LocalAccess, NameElement, NameHierarchy, ParseLocation,
    ReferenceKind, SymbolDeclaration, SymbolKind,
};
use trailscope_core::ParserClient;
use trailscope_core::parser::utils::{
    end_of, first_child_of_kind, location_of, named_children, start_of,
};
use tree_sitter::Node;

/// The declaration facts are attributed to.
#[derive(Debug, Clone)]
pub(super) enum Context {
    Type(TypeId),
    Callable(usize),
    /// A field, enum constant or type parameter.
    Member(NameHierarchy),
}

#[derive(Debug, Clone)]
pub(super) struct LocalBinding {
    pub owner: NameHierarchy,
    pub declared_at: ParseLocation,
    pub ty: Option<ResolvedType>,
}

pub(super) enum Lookup {
    Local(LocalBinding),
    Field(TypeId, usize),
}

struct LocalFrame {
    /// Number of enclosing types when the frame was opened.
    type_depth: usize,
    bindings: HashMap<String, LocalBinding>,
}

pub(crate) struct Recorder<'a, 't> {
    pub(super) model: &'a FileModel<'t>,
    pub(super) client: &'a mut dyn ParserClient,
    contexts: Vec<Context>,
    frames: Vec<LocalFrame>,
}

impl<'a, 't> Recorder<'a, 't> {
    pub fn new(model: &'a FileModel<'t>, client: &'a mut dyn ParserClient) -> Self {
        Self {
            model,
            client,
            contexts: Vec::new(),
            frames: Vec::new(),
        }
    }

    pub fn run(&mut self, root: Node<'t>) {
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            if self.client.is_interrupted() {
                return;
            }
            match child.kind() {
                "package_declaration" => self.visit_package(child),
                "import_declaration" => self.visit_import(child),
                _ => self.visit(child),
            }
        }
    }

    pub(super) fn context_name(&self) -> NameHierarchy {
        match self.contexts.last() {
            Some(Context::Type(t)) => self.model.types[*t].name.clone(),
            Some(Context::Callable(c)) => self.model.callables[*c].name.clone(),
            Some(Context::Member(name)) => name.clone(),
            None => self.model.package.clone(),
        }
    }

    pub(super) fn scope(&self) -> Option<Scope> {
        self.contexts.iter().rev().find_map(|c| match c {
            Context::Type(t) => Some(Scope::Type(*t)),
            Context::Callable(c) => Some(Scope::Callable(*c)),
            Context::Member(_) => None,
        })
    }

    pub(super) fn current_type(&self) -> Option<TypeId> {
        self.contexts.iter().rev().find_map(|c| match c {
            Context::Type(t) => Some(*t),
            _ => None,
        })
    }

    /// Enclosing types, innermost first.
    pub(super) fn enclosing_types(&self) -> Vec<TypeId> {
        self.contexts
            .iter()
            .rev()
            .filter_map(|c| match c {
                Context::Type(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    fn with_context<R>(&mut self, context: Context, f: impl FnOnce(&mut Self) -> R) -> R {
        self.contexts.push(context);
        let result = f(self);
        self.contexts.pop();
        result
    }

    fn with_frame<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let type_depth = self.enclosing_types().len();
        self.frames.push(LocalFrame {
            type_depth,
            bindings: HashMap::new(),
        });
        let result = f(self);
        self.frames.pop();
        result
    }

    /// Declares a local named by `name_node` in the innermost frame.
    pub(super) fn bind_local(&mut self, name_node: Node, ty: Option<ResolvedType>) {
        let owner = self.context_name();
        let declared_at = location_of(name_node);
        self.client
            .record_local_symbol(&owner, declared_at, declared_at, LocalAccess::Declaration);
        let name = self.model.text(name_node).to_string();
        if let Some(frame) = self.frames.last_mut() {
            frame.bindings.insert(
                name,
                LocalBinding {
                    owner,
                    declared_at,
                    ty,
                },
            );
        }
    }

    /// Resolves a simple name to a local or a field, innermost first. Fields
    /// of a type declared inside a method shadow that method's locals.
    pub(super) fn lookup_name(&self, name: &str) -> Option<Lookup> {
        let mut types = self.enclosing_types();
        types.reverse();
        let mut level = types.len();
        for frame in self.frames.iter().rev() {
            while level > frame.type_depth {
                level -= 1;
                if let Some((owner, index)) = self.model.find_field(types[level], name) {
                    return Some(Lookup::Field(owner, index));
                }
            }
            if let Some(binding) = frame.bindings.get(name) {
                return Some(Lookup::Local(binding.clone()));
            }
        }
        while level > 0 {
            level -= 1;
            if let Some((owner, index)) = self.model.find_field(types[level], name) {
                return Some(Lookup::Field(owner, index));
            }
        }
        None
    }

    pub(super) fn record_scope(&mut self, node: Node) {
        let owner = self.context_name();
        self.client.record_scope(&owner, start_of(node), end_of(node));
    }

    pub(super) fn record_reference(
        &mut self,
        kind: ReferenceKind,
        target: &NameHierarchy,
        location: ParseLocation,
    ) {
        let context = self.context_name();
        self.client.record_reference(kind, target, &context, location);
    }

    pub(super) fn visit_children(&mut self, node: Node<'t>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child);
        }
    }

    pub(super) fn visit(&mut self, node: Node<'t>) {
        let kind = node.kind();
        if is_comment(kind) {
            return;
        }
        if is_type_declaration(kind) {
            self.visit_type_declaration(node);
            return;
        }
        if is_callable_declaration(kind) {
            self.visit_callable(node);
            return;
        }
        if is_field_declaration(kind) {
            self.visit_field_declaration(node);
            return;
        }
        match kind {
            "enum_constant" => self.visit_enum_constant(node),
            "local_variable_declaration" => self.visit_local_variable_declaration(node),
            "block" | "constructor_body" | "switch_block" => {
                self.record_scope(node);
                self.with_frame(|r| r.visit_children(node));
            }
            "array_initializer" => {
                self.record_scope(node);
                self.visit_children(node);
            }
            "lambda_expression" => self.visit_lambda(node),
            "for_statement" => self.with_frame(|r| r.visit_children(node)),
            "enhanced_for_statement" => self.visit_enhanced_for(node),
            "catch_clause" => self.visit_catch_clause(node),
            "try_with_resources_statement" => self.with_frame(|r| r.visit_children(node)),
            "resource" => self.visit_resource(node),
            "instanceof_expression" => self.visit_instanceof(node),
            "labeled_statement" | "break_statement" | "continue_statement" => {
                for child in named_children(node) {
                    if child.kind() != "identifier" {
                        self.visit(child);
                    }
                }
            }
            "modifiers" => {
                for child in named_children(node) {
                    self.visit(child);
                }
            }
            "annotation" | "marker_annotation" => self.visit_annotation(node),
            "type_arguments" => {
                for argument in named_children(node) {
                    self.visit_type(argument, ReferenceKind::TypeArgument);
                }
            }
            "type_identifier" | "scoped_type_identifier" | "generic_type" | "array_type"
            | "annotated_type" => {
                self.visit_type(node, ReferenceKind::TypeUsage);
            }
            "throws" => {
                for thrown in named_children(node) {
                    self.visit_type(thrown, ReferenceKind::TypeUsage);
                }
            }
            _ => {
                self.visit_expression(node);
            }
        }
    }

    fn visit_package(&mut self, node: Node<'t>) {
        let name_node = named_children(node)
            .into_iter()
            .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"));
        let Some(name_node) = name_node else {
            return;
        };
        self.record_path_qualifiers(name_node);
        let symbol = SymbolDeclaration::new(self.model.package.clone(), SymbolKind::Package)
            .at(location_of(name_node));
        self.client.record_symbol(&symbol);
    }

    fn visit_import(&mut self, node: Node<'t>) {
        let name_node = named_children(node)
            .into_iter()
            .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"));
        let Some(name_node) = name_node else {
            return;
        };
        self.record_path_qualifiers(name_node);
        if first_child_of_kind(node, "asterisk").is_some() {
            let location = location_of(last_segment(name_node));
            self.client
                .record_qualifier(&dotted_hierarchy(self.model.text(name_node)), location);
        }
    }

    /// Qualifiers for every proper prefix of a dotted name.
    fn record_path_qualifiers(&mut self, node: Node<'t>) {
        let mut current = node;
        let mut prefixes = Vec::new();
        while current.kind() == "scoped_identifier" {
            let Some(scope) = current.child_by_field_name("scope") else {
                break;
            };
            prefixes.push(scope);
            current = scope;
        }
        for prefix in prefixes.into_iter().rev() {
            let name = dotted_hierarchy(self.model.text(prefix));
            self.client
                .record_qualifier(&name, location_of(last_segment(prefix)));
        }
    }

    fn visit_type_declaration(&mut self, node: Node<'t>) {
        let Some(t) = self.model.type_of_node(node) else {
            self.visit_children(node);
            return;
        };
        let model = self.model;
        let entry = &model.types[t];
        let modifiers = Modifiers::of(node);
        let enclosing = self.current_type();
        let in_interface = enclosing.is_some_and(|o| model.types[o].is_interface());
        let access = modifiers.access.unwrap_or(if in_interface {
            AccessKind::Public
        } else {
            AccessKind::Default
        });
        let implicitly_static = matches!(entry.container, Container::Type(_))
            && (entry.kind != SymbolKind::Class || in_interface);

        let mut symbol = SymbolDeclaration::new(entry.name.clone(), entry.kind)
            .with_access(access)
            .with_static(modifiers.is_static || implicitly_static)
            .spanning(location_of(node));
        if let Some(name_node) = node.child_by_field_name("name") {
            symbol = symbol.at(location_of(name_node));
        }
        self.client.record_symbol(&symbol);

        self.with_context(Context::Type(t), |r| {
            for annotation in &modifiers.annotations {
                r.visit_annotation(*annotation);
            }
            r.record_type_params(&entry.type_params, Scope::Type(t));
            for super_ref in &entry.super_refs {
                if let SuperRef::Node(super_node) = super_ref {
                    r.visit_type(*super_node, ReferenceKind::Inheritance);
                }
            }
            if entry.kind == SymbolKind::Record {
                r.visit_record_components(node, t);
            }
            if let Some(body) = entry.body {
                r.visit_type_body(body);
            }
        });
    }

    /// An anonymous class body. `base` is the instantiated type and where it
    /// is named.
    pub(super) fn visit_anonymous_type(
        &mut self,
        body: Node<'t>,
        base: Option<(ResolvedType, ParseLocation)>,
    ) {
        let Some(t) = self.model.type_of_node(body) else {
            self.visit_children(body);
            return;
        };
        let name = self.model.types[t].name.clone();
        let symbol = SymbolDeclaration::new(name.clone(), SymbolKind::Class)
            .at(start_of(body))
            .spanning(location_of(body));
        self.client.record_symbol(&symbol);

        self.with_context(Context::Type(t), |r| {
            if let Some((resolved, location)) = base {
                if let Some(target) = r.model.resolved_name(&resolved) {
                    r.record_reference(ReferenceKind::Inheritance, &target, location);
                }
            }
            r.visit_type_body(body);
        });
    }

    fn visit_type_body(&mut self, body: Node<'t>) {
        self.record_scope(body);
        self.with_frame(|r| {
            for member in named_children(body) {
                if member.kind() == "enum_body_declarations" {
                    for declaration in named_children(member) {
                        if r.client.is_interrupted() {
                            return;
                        }
                        r.visit(declaration);
                    }
                    continue;
                }
                if r.client.is_interrupted() {
                    return;
                }
                r.visit(member);
            }
        });
    }

    fn record_type_params(&mut self, params: &[TypeParam<'t>], owner: Scope) {
        let owner_name = self.model.scope_name(owner);
        for param in params {
            let name = owner_name.child(NameElement::new(param.name.clone()));
            let symbol = SymbolDeclaration::new(name.clone(), SymbolKind::TypeParameter)
                .at(location_of(param.ident));
            self.client.record_symbol(&symbol);

            if let Some(bound) = first_child_of_kind(param.node, "type_bound") {
                self.with_context(Context::Member(name), |r| {
                    for bound_type in named_children(bound) {
                        r.visit_type(bound_type, ReferenceKind::TypeUsage);
                    }
                });
            }
        }
    }

    fn visit_record_components(&mut self, node: Node<'t>, t: TypeId) {
        let Some(params) = node.child_by_field_name("parameters") else {
            return;
        };
        for param in named_children(params) {
            let Some(name_node) = param.child_by_field_name("name") else {
                continue;
            };
            let Some(field) = self.model.types[t]
                .fields
                .iter()
                .find(|f| f.name_node.id() == name_node.id())
            else {
                continue;
            };
            let symbol = SymbolDeclaration::new(field.name.clone(), SymbolKind::Field)
                .with_access(AccessKind::Private)
                .at(location_of(name_node));
            self.client.record_symbol(&symbol);
            if let Some(type_node) = field.type_node {
                self.with_context(Context::Member(field.name.clone()), |r| {
                    r.visit_type(type_node, ReferenceKind::TypeUsage);
                });
            }
        }
    }

    fn visit_callable(&mut self, node: Node<'t>) {
        let Some(c) = self.model.callable_of_node(node) else {
            self.visit_children(node);
            return;
        };
        let model = self.model;
        let entry = &model.callables[c];
        let owner = &model.types[entry.owner];
        let modifiers = Modifiers::of(node);
        let access = modifiers.access.unwrap_or(if owner.is_interface() {
            AccessKind::Public
        } else {
            AccessKind::Default
        });
        let body = node.child_by_field_name("body");
        let definition = if body.is_some() || entry.is_constructor {
            DefinitionKind::Explicit
        } else {
            DefinitionKind::Declaration
        };
        let kind = if entry.is_constructor {
            SymbolKind::Constructor
        } else {
            SymbolKind::Method
        };
        let name_location = node
            .child_by_field_name("name")
            .map(location_of)
            .unwrap_or_else(|| start_of(node));

        let symbol = SymbolDeclaration::new(entry.name.clone(), kind)
            .with_access(access)
            .with_static(modifiers.is_static)
            .with_definition(definition)
            .at(name_location)
            .spanning(location_of(node));
        self.client.record_symbol(&symbol);

        if let Some(overridden) = model.overridden_method(c) {
            self.client.record_reference(
                ReferenceKind::Override,
                &model.callables[overridden].name,
                &entry.name,
                name_location,
            );
        }

        self.with_context(Context::Callable(c), |r| {
            for annotation in &modifiers.annotations {
                r.visit_annotation(*annotation);
            }
            r.record_type_params(&entry.type_params, Scope::Callable(c));
            if let Some(return_type) = entry.return_type {
                r.visit_type(return_type, ReferenceKind::TypeUsage);
            }
            r.with_frame(|r| {
                for param in &entry.params {
                    let ty = param
                        .type_node
                        .and_then(|t| r.visit_type(t, ReferenceKind::TypeUsage));
                    if let Some(name) = param.name {
                        r.bind_local(name, ty);
                    }
                }
                if let Some(throws) = first_child_of_kind(node, "throws") {
                    r.visit(throws);
                }
                if let Some(body) = body {
                    r.visit(body);
                }
            });
        });
    }

    fn visit_field_declaration(&mut self, node: Node<'t>) {
        let Some(owner) = self.current_type() else {
            self.visit_children(node);
            return;
        };
        let model = self.model;
        let in_interface = model.types[owner].is_interface();
        let modifiers = Modifiers::of(node);
        let access = modifiers.access.unwrap_or(if in_interface {
            AccessKind::Public
        } else {
            AccessKind::Default
        });
        let type_node = node.child_by_field_name("type");

        for declarator in named_children(node) {
            if declarator.kind() != "variable_declarator" {
                continue;
            }
            let Some(name_node) = declarator.child_by_field_name("name") else {
                continue;
            };
            let Some(field) = model.types[owner]
                .fields
                .iter()
                .find(|f| f.name_node.id() == name_node.id())
            else {
                continue;
            };
            let symbol = SymbolDeclaration::new(field.name.clone(), SymbolKind::Field)
                .with_access(access)
                .with_static(modifiers.is_static || in_interface)
                .at(location_of(name_node));
            self.client.record_symbol(&symbol);

            self.with_context(Context::Member(field.name.clone()), |r| {
                for annotation in &modifiers.annotations {
                    r.visit_annotation(*annotation);
                }
                if let Some(type_node) = type_node {
                    r.visit_type(type_node, ReferenceKind::TypeUsage);
                }
                if let Some(value) = declarator.child_by_field_name("value") {
                    r.visit(value);
                }
            });
        }
    }

    fn visit_enum_constant(&mut self, node: Node<'t>) {
        let (Some(owner), Some(name_node)) = (self.current_type(), node.child_by_field_name("name"))
        else {
            self.visit_children(node);
            return;
        };
        let model = self.model;
        let Some(field) = model.types[owner]
            .fields
            .iter()
            .find(|f| f.name_node.id() == name_node.id())
        else {
            return;
        };
        let symbol = SymbolDeclaration::new(field.name.clone(), SymbolKind::EnumConstant)
            .with_access(AccessKind::Public)
            .with_static(true)
            .at(location_of(name_node));
        self.client.record_symbol(&symbol);

        self.with_context(Context::Member(field.name.clone()), |r| {
            if let Some(arguments) = node.child_by_field_name("arguments") {
                let arity = argument_count(arguments);
                if let Some(ConstructorTarget::Declared(ctor)) =
                    model.find_constructor(owner, Some(arity))
                {
                    r.record_reference(
                        ReferenceKind::Call,
                        &model.callables[ctor].name,
                        location_of(name_node),
                    );
                }
                r.visit(arguments);
            }
            if let Some(body) = node.child_by_field_name("body") {
                r.visit_anonymous_type(
                    body,
                    Some((ResolvedType::Declared(owner), location_of(name_node))),
                );
            }
        });
    }

    fn visit_local_variable_declaration(&mut self, node: Node<'t>) {
        let type_node = node.child_by_field_name("type");
        let inferred = type_node.is_some_and(|t| self.model.text(t) == "var");
        let declared = match type_node {
            Some(t) if !inferred => self.visit_type(t, ReferenceKind::TypeUsage),
            _ => None,
        };
        for child in named_children(node) {
            match child.kind() {
                "variable_declarator" => {
                    let value_type = child
                        .child_by_field_name("value")
                        .and_then(|value| self.visit_expression(value));
                    if let Some(name) = child.child_by_field_name("name") {
                        let ty = if inferred { value_type } else { declared.clone() };
                        self.bind_local(name, ty);
                    }
                }
                "modifiers" => self.visit(child),
                _ => {}
            }
        }
    }

    fn visit_formal_parameters(&mut self, list: Node<'t>) {
        for param in named_children(list) {
            match param.kind() {
                "formal_parameter" => {
                    let ty = param
                        .child_by_field_name("type")
                        .and_then(|t| self.visit_type(t, ReferenceKind::TypeUsage));
                    if let Some(name) = param.child_by_field_name("name") {
                        self.bind_local(name, ty);
                    }
                }
                "spread_parameter" => {
                    for child in named_children(param) {
                        if child.kind() == "variable_declarator" {
                            if let Some(name) = child.child_by_field_name("name") {
                                self.bind_local(name, None);
                            }
                        } else if child.kind() != "modifiers" {
                            self.visit_type(child, ReferenceKind::TypeUsage);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_lambda(&mut self, node: Node<'t>) {
        self.with_frame(|r| {
            if let Some(params) = node.child_by_field_name("parameters") {
                match params.kind() {
                    "identifier" => r.bind_local(params, None),
                    "formal_parameters" => r.visit_formal_parameters(params),
                    "inferred_parameters" => {
                        for name in named_children(params) {
                            r.bind_local(name, None);
                        }
                    }
                    _ => {}
                }
            }
            if let Some(body) = node.child_by_field_name("body") {
                r.visit(body);
            }
        });
    }

    fn visit_enhanced_for(&mut self, node: Node<'t>) {
        self.with_frame(|r| {
            if let Some(value) = node.child_by_field_name("value") {
                r.visit(value);
            }
            let ty = node
                .child_by_field_name("type")
                .and_then(|t| r.visit_type(t, ReferenceKind::TypeUsage));
            if let Some(name) = node.child_by_field_name("name") {
                r.bind_local(name, ty);
            }
            if let Some(body) = node.child_by_field_name("body") {
                r.visit(body);
            }
        });
    }

    fn visit_catch_clause(&mut self, node: Node<'t>) {
        self.with_frame(|r| {
            for child in named_children(node) {
                if child.kind() != "catch_formal_parameter" {
                    r.visit(child);
                    continue;
                }
                let mut caught = None;
                for part in named_children(child) {
                    if part.kind() == "catch_type" {
                        for alternative in named_children(part) {
                            let ty = r.visit_type(alternative, ReferenceKind::TypeUsage);
                            caught = caught.or(ty);
                        }
                    }
                }
                if let Some(name) = child.child_by_field_name("name") {
                    r.bind_local(name, caught);
                }
            }
        });
    }

    fn visit_resource(&mut self, node: Node<'t>) {
        let Some(name) = node.child_by_field_name("name") else {
            self.visit_children(node);
            return;
        };
        let ty = node
            .child_by_field_name("type")
            .and_then(|t| self.visit_type(t, ReferenceKind::TypeUsage));
        if let Some(value) = node.child_by_field_name("value") {
            self.visit(value);
        }
        self.bind_local(name, ty);
    }

    fn visit_instanceof(&mut self, node: Node<'t>) {
        if let Some(left) = node.child_by_field_name("left") {
            self.visit(left);
        }
        let ty = node
            .child_by_field_name("right")
            .and_then(|t| self.visit_type(t, ReferenceKind::TypeUsage));
        if let Some(name) = node.child_by_field_name("name") {
            self.bind_local(name, ty);
        }
        if let Some(pattern) = node.child_by_field_name("pattern") {
            self.visit_children(pattern);
        }
    }

    fn visit_annotation(&mut self, node: Node<'t>) {
        if let Some(name) = node.child_by_field_name("name") {
            self.visit_type(name, ReferenceKind::TypeUsage);
        }
        let Some(arguments) = node.child_by_field_name("arguments") else {
            return;
        };
        for argument in named_children(arguments) {
            if argument.kind() == "element_value_pair" {
                if let Some(value) = argument.child_by_field_name("value") {
                    self.visit(value);
                }
            } else {
                self.visit(argument);
            }
        }
    }
}

/// Arguments in an argument list, ignoring comments.
pub(super) fn argument_count(arguments: Node) -> usize {
    named_children(arguments)
        .into_iter()
        .filter(|a| !is_comment(a.kind()))
        .count()
}

/// The last identifier of a dotted name.
pub(super) fn last_segment(node: Node) -> Node {
    match node.kind() {
        "scoped_identifier" => node
            .child_by_field_name("name")
            .unwrap_or(node),
        _ => node,
    }
}
