//! Second pass: walks the syntax tree and reports facts to the client.

use super::constants::{is_comment, is_preproc_block, is_record_specifier};
use super::model::{
    FileModel, base_specifiers, namespace_segments, record_kind, record_segments,
};
use super::naming::{
    CallableHead, callable_head, declared_name, has_storage_class, key_name, name_anchor, path_key,
    path_name, segments, variable_element,
};
use std::collections::HashMap;
use trailscope_api::{
    AccessKind, DefinitionKind, LocalAccess, NameElement, NameHierarchy, ParseLocation,
    ReferenceKind, SymbolDeclaration, SymbolKind,
};
use trailscope_core::ParserClient;
use trailscope_core::parser::utils::{end_of, location_of, named_children, start_of};
use tree_sitter::Node;

#[derive(Debug, Clone)]
pub(super) struct LocalBinding {
    pub owner: NameHierarchy,
    pub declared_at: ParseLocation,
    /// Key of the declared type, when declared in this file.
    pub ty: Option<String>,
}

/// Template parameters visible inside a templated declaration.
pub(super) struct TemplateFrame {
    pub owner: NameHierarchy,
    pub names: Vec<String>,
}

pub(crate) struct Recorder<'a, 't> {
    pub(super) model: &'a FileModel<'t>,
    pub(super) client: &'a mut dyn ParserClient,
    /// Semantic path names are resolved from.
    pub(super) scope: Vec<String>,
    contexts: Vec<NameHierarchy>,
    classes: Vec<Option<String>>,
    access: Vec<AccessKind>,
    frames: Vec<HashMap<String, LocalBinding>>,
    pub(super) templates: Vec<TemplateFrame>,
    pending_template: Option<Node<'t>>,
}

impl<'a, 't> Recorder<'a, 't> {
    pub fn new(model: &'a FileModel<'t>, client: &'a mut dyn ParserClient) -> Self {
        Self {
            model,
            client,
            scope: Vec::new(),
            contexts: Vec::new(),
            classes: Vec::new(),
            access: Vec::new(),
            frames: Vec::new(),
            templates: Vec::new(),
            pending_template: None,
        }
    }

    pub fn run(&mut self, root: Node<'t>) {
        self.visit_members(root);
    }

    pub(super) fn context_name(&self) -> NameHierarchy {
        self.contexts
            .last()
            .cloned()
            .unwrap_or_else(|| path_name(&[]))
    }

    pub(super) fn current_class(&self) -> Option<String> {
        self.classes.last().cloned().flatten()
    }

    fn member_access(&self) -> AccessKind {
        self.access.last().copied().unwrap_or(AccessKind::None)
    }

    fn in_function(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Runs `f` inside a new declaration: names resolve from `scope`, facts
    /// are attributed to `context` and outer locals are hidden.
    fn within<R>(
        &mut self,
        scope: Vec<String>,
        context: NameHierarchy,
        class: Option<String>,
        access: AccessKind,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved_scope = std::mem::replace(&mut self.scope, scope);
        let saved_frames = std::mem::take(&mut self.frames);
        self.contexts.push(context);
        self.classes.push(class);
        self.access.push(access);
        let result = f(self);
        self.access.pop();
        self.classes.pop();
        self.contexts.pop();
        self.frames = saved_frames;
        self.scope = saved_scope;
        result
    }

    pub(super) fn with_context<R>(&mut self, context: NameHierarchy, f: impl FnOnce(&mut Self) -> R) -> R {
        self.contexts.push(context);
        let result = f(self);
        self.contexts.pop();
        result
    }

    pub(super) fn with_frame<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.frames.push(HashMap::new());
        let result = f(self);
        self.frames.pop();
        result
    }

    /// Declares a local named by `name_node` in the innermost frame.
    pub(super) fn bind_local(&mut self, name_node: Node, ty: Option<String>) {
        let owner = self.context_name();
        let declared_at = location_of(name_node);
        self.client
            .record_local_symbol(&owner, declared_at, declared_at, LocalAccess::Declaration);
        let name = self.model.text(name_node).to_string();
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(
                name,
                LocalBinding {
                    owner,
                    declared_at,
                    ty,
                },
            );
        }
    }

    pub(super) fn lookup_local(&self, name: &str) -> Option<LocalBinding> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .cloned()
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

    /// Visits the declarations of a file, namespace or class body, polling
    /// for interruption before each one.
    fn visit_members(&mut self, body: Node<'t>) {
        for member in named_children(body) {
            if self.client.is_interrupted() {
                return;
            }
            if member.kind() == "access_specifier" {
                let access = access_of(self.model.text(member));
                if let Some(top) = self.access.last_mut() {
                    *top = access;
                }
                continue;
            }
            self.visit(member);
        }
    }

    pub(super) fn visit_children(&mut self, node: Node<'t>) {
        for child in named_children(node) {
            self.visit(child);
        }
    }

    pub(super) fn visit(&mut self, node: Node<'t>) {
        let kind = node.kind();
        if is_comment(kind) {
            return;
        }
        if is_record_specifier(kind) || kind == "enum_specifier" {
            if node.child_by_field_name("body").is_some() {
                self.visit_type_declaration(node);
            } else if is_declaration_list(node.parent()) {
                self.visit_forward_declaration(node);
            } else {
                self.visit_type(node, ReferenceKind::TypeUsage);
            }
            return;
        }
        if is_preproc_block(kind) {
            let condition = node
                .child_by_field_name("name")
                .or_else(|| node.child_by_field_name("condition"));
            for child in named_children(node) {
                if Some(child) != condition {
                    self.visit(child);
                }
            }
            return;
        }
        match kind {
            "translation_unit" | "declaration_list" => self.visit_members(node),
            "namespace_definition" => self.visit_namespace(node),
            "function_definition" => self.visit_function_definition(node),
            "declaration" | "field_declaration" => self.visit_declaration(node),
            "template_declaration" => self.visit_template(node),
            "type_definition" => self.visit_typedef(node),
            "alias_declaration" => self.visit_alias(node),
            "preproc_def" | "preproc_function_def" => self.visit_macro(node),
            "linkage_specification" => {
                if let Some(body) = node.child_by_field_name("body") {
                    self.visit(body);
                }
            }
            "using_declaration" | "namespace_alias_definition" => self.visit_using(node),
            "preproc_include" | "preproc_call" | "friend_declaration" | "access_specifier" => {}
            "compound_statement" => {
                self.record_scope(node);
                self.with_frame(|r| r.visit_children(node));
            }
            "initializer_list" => {
                self.record_scope(node);
                self.visit_children(node);
            }
            "lambda_expression" => self.visit_lambda(node),
            "for_statement" => self.with_frame(|r| r.visit_children(node)),
            "for_range_loop" => self.visit_for_range(node),
            "catch_clause" => self.visit_catch_clause(node),
            "type_identifier" | "qualified_type_identifier" | "template_type" | "type_descriptor" => {
                self.visit_type(node, ReferenceKind::TypeUsage);
            }
            _ => {
                self.visit_expression(node);
            }
        }
    }

    fn visit_namespace(&mut self, node: Node<'t>) {
        let added = namespace_segments(node, self.model.source, self.model.path);
        let location = node
            .child_by_field_name("name")
            .map(location_of)
            .unwrap_or_else(|| start_of(node));
        let mut path = self.scope.clone();
        for segment in &added {
            path.push(segment.clone());
            let symbol = SymbolDeclaration::new(path_name(&path), SymbolKind::Namespace)
                .with_definition(DefinitionKind::Explicit)
                .at(location)
                .spanning(location_of(node));
            self.client.record_symbol(&symbol);
        }
        let Some(body) = node.child_by_field_name("body") else {
            return;
        };
        let name = path_name(&path);
        self.within(path, name, None, AccessKind::None, |r| {
            r.record_scope(body);
            r.visit_members(body);
        });
    }

    /// A class, struct, union or enum with a body.
    fn visit_type_declaration(&mut self, node: Node<'t>) -> Option<String> {
        let body = node.child_by_field_name("body")?;
        let added = record_segments(node, self.model.source, self.model.path);
        let name_node = node.child_by_field_name("name");
        if let Some(name_node) = name_node {
            self.visit_qualifiers(name_node);
        }
        let mut path = self.scope.clone();
        path.extend(added);
        let key = path_key(&path);
        let name = path_name(&path);
        let kind = record_kind(node.kind());
        let location = name_node
            .map(|n| location_of(name_anchor(n)))
            .unwrap_or_else(|| start_of(body));

        let symbol = SymbolDeclaration::new(name.clone(), kind)
            .with_access(self.member_access())
            .with_definition(DefinitionKind::Explicit)
            .at(location)
            .spanning(location_of(node));
        self.client.record_symbol(&symbol);

        let template = self.pending_template.take();
        let access = match node.kind() {
            "class_specifier" => AccessKind::Private,
            "enum_specifier" => AccessKind::None,
            _ => AccessKind::Public,
        };
        let class = (kind != SymbolKind::Enum).then(|| key.clone());
        self.within(path.clone(), name.clone(), class, access, |r| {
            let templated = r.enter_template(template, &name);
            if kind == SymbolKind::Enum {
                if let Some(base) = node.child_by_field_name("base") {
                    r.visit_type(base, ReferenceKind::TypeUsage);
                }
                r.record_scope(body);
                r.visit_enumerators(body, &path);
            } else {
                for base in base_specifiers(node) {
                    r.visit_type(base, ReferenceKind::Inheritance);
                }
                r.record_scope(body);
                r.visit_members(body);
            }
            if templated {
                r.templates.pop();
            }
        });
        Some(key)
    }

    fn visit_enumerators(&mut self, body: Node<'t>, enum_path: &[String]) {
        for enumerator in named_children(body) {
            if self.client.is_interrupted() {
                return;
            }
            if enumerator.kind() != "enumerator" {
                continue;
            }
            let Some(name_node) = enumerator.child_by_field_name("name") else {
                continue;
            };
            let name = path_name(enum_path).child(NameElement::new(self.model.text(name_node)));
            let symbol = SymbolDeclaration::new(name.clone(), SymbolKind::EnumConstant)
                .with_definition(DefinitionKind::Explicit)
                .at(location_of(name_node));
            self.client.record_symbol(&symbol);
            if let Some(value) = enumerator.child_by_field_name("value") {
                self.with_context(name, |r| r.visit(value));
            }
        }
    }

    /// `class A;` at namespace or class level.
    fn visit_forward_declaration(&mut self, node: Node<'t>) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        self.visit_qualifiers(name_node);
        let mut path = self.scope.clone();
        path.extend(segments(name_node, self.model.source));
        let symbol = SymbolDeclaration::new(path_name(&path), record_kind(node.kind()))
            .with_access(self.member_access())
            .with_definition(DefinitionKind::Declaration)
            .at(location_of(name_anchor(name_node)));
        self.client.record_symbol(&symbol);
    }

    /// Where `head` lives: the enclosing path plus any qualification written
    /// in front of its name.
    fn callable_owner(&self, head: &CallableHead<'t>) -> Vec<String> {
        let mut owner = self.scope.clone();
        owner.extend(head.segments[..head.segments.len() - 1].iter().cloned());
        owner
    }

    fn callable_kind(&self, holder: Node, owner: &[String], head: &CallableHead) -> SymbolKind {
        if !self.model.is_type(&path_key(owner)) {
            return SymbolKind::Function;
        }
        let simple = head.segments.last();
        if holder.child_by_field_name("type").is_none() && owner.last() == simple {
            SymbolKind::Constructor
        } else {
            SymbolKind::Method
        }
    }

    /// Records the override edge of a method declared in its class body.
    fn record_override(&mut self, owner: &[String], head: &CallableHead<'t>, name: &NameHierarchy) {
        let Some(simple) = head.segments.last() else {
            return;
        };
        let owner_key = path_key(owner);
        if let Some(overridden) = self
            .model
            .overridden(&owner_key, simple, &head.signature.displays)
        {
            let target = overridden.name.clone();
            self.client.record_reference(
                ReferenceKind::Override,
                &target,
                name,
                location_of(head.anchor()),
            );
        }
    }

    fn visit_function_definition(&mut self, node: Node<'t>) {
        let head = node
            .child_by_field_name("declarator")
            .and_then(|declarator| callable_head(node, declarator, self.model.source));
        let Some(head) = head else {
            self.visit_children(node);
            return;
        };
        let source = self.model.source;
        let owner = self.callable_owner(&head);
        let kind = self.callable_kind(node, &owner, &head);
        let out_of_line = head.segments.len() > 1;
        let name = path_name(&owner).child(head.element());
        let access = if out_of_line {
            AccessKind::None
        } else {
            self.member_access()
        };

        self.visit_qualifiers(head.name_node);
        let symbol = SymbolDeclaration::new(name.clone(), kind)
            .with_access(access)
            .with_static(has_storage_class(node, "static", source))
            .with_definition(DefinitionKind::Explicit)
            .at(location_of(head.anchor()))
            .spanning(location_of(node));
        self.client.record_symbol(&symbol);
        if kind == SymbolKind::Method && !out_of_line {
            self.record_override(&owner, &head, &name);
        }

        let template = self.pending_template.take();
        let owner_key = path_key(&owner);
        let class = self
            .model
            .is_type(&owner_key)
            .then(|| owner_key.clone())
            .or_else(|| self.current_class());
        self.within(owner, name.clone(), class, AccessKind::None, |r| {
            let templated = r.enter_template(template, &name);
            if let Some(return_type) = node.child_by_field_name("type") {
                r.visit_type(return_type, ReferenceKind::TypeUsage);
            }
            r.with_frame(|r| {
                r.visit_parameters(head.function, true);
                for child in named_children(node) {
                    if child.kind() == "field_initializer_list" {
                        r.visit_field_initializers(child, &owner_key);
                    }
                }
                if let Some(body) = node.child_by_field_name("body") {
                    r.visit(body);
                }
            });
            if templated {
                r.templates.pop();
            }
        });
    }

    /// Parameter types, and with `bind` the parameters as locals.
    pub(super) fn visit_parameters(&mut self, function: Node<'t>, bind: bool) {
        let Some(list) = function.child_by_field_name("parameters") else {
            return;
        };
        for param in named_children(list) {
            match param.kind() {
                "parameter_declaration"
                | "optional_parameter_declaration"
                | "variadic_parameter_declaration" => {
                    let ty = param
                        .child_by_field_name("type")
                        .and_then(|t| self.visit_type(t, ReferenceKind::TypeUsage));
                    if let Some(value) = param.child_by_field_name("default_value") {
                        self.visit(value);
                    }
                    if !bind {
                        continue;
                    }
                    let name = param
                        .child_by_field_name("declarator")
                        .and_then(declared_name)
                        .filter(|n| n.kind() == "identifier");
                    if let Some(name) = name {
                        self.bind_local(name, ty);
                    }
                }
                _ => {}
            }
        }
    }

    /// `A(int v) : value(v), Base(v) {}`
    fn visit_field_initializers(&mut self, list: Node<'t>, owner_key: &str) {
        for initializer in named_children(list) {
            let mut arguments = None;
            for part in named_children(initializer) {
                match part.kind() {
                    "field_identifier" => {
                        let field = self.model.text(part);
                        if let Some(variable) = self.model.member_variable(owner_key, field) {
                            let target = variable.name.clone();
                            self.record_reference(ReferenceKind::Usage, &target, location_of(part));
                        }
                    }
                    "type_identifier" | "qualified_type_identifier" | "qualified_identifier"
                    | "template_type" => {
                        let arity = initializer
                            .child_by_field_name("arguments")
                            .map(argument_count)
                            .unwrap_or(0);
                        if let Some(base) = self.visit_type(part, ReferenceKind::TypeUsage) {
                            self.record_constructor_call(&base, arity, location_of(name_anchor(part)));
                        }
                    }
                    "argument_list" | "initializer_list" => arguments = Some(part),
                    _ => {}
                }
            }
            if let Some(arguments) = arguments {
                self.visit_children(arguments);
            }
        }
    }

    pub(super) fn record_constructor_call(&mut self, type_key: &str, arity: usize, location: ParseLocation) {
        if let Some(constructor) = self.model.constructor(type_key, arity) {
            let target = constructor.name.clone();
            self.record_reference(ReferenceKind::Call, &target, location);
        }
    }

    fn visit_declaration(&mut self, node: Node<'t>) {
        let type_node = node.child_by_field_name("type");
        let mut cursor = node.walk();
        let declarators: Vec<Node<'t>> = node
            .children_by_field_name("declarator", &mut cursor)
            .collect();

        // A type defined in place is declared once, ahead of its declarators.
        let mut inline = None;
        if let Some(type_node) = type_node {
            let defines = type_node.child_by_field_name("body").is_some()
                && (is_record_specifier(type_node.kind()) || type_node.kind() == "enum_specifier");
            if defines {
                inline = Some(self.visit_type_declaration(type_node));
            } else if declarators.is_empty() && is_record_specifier(type_node.kind()) {
                self.visit_forward_declaration(type_node);
                return;
            }
        }

        for declarator in declarators {
            if let Some(head) = callable_head(node, declarator, self.model.source) {
                self.visit_prototype(node, head);
            } else if self.in_function() {
                self.visit_local_declarator(node, declarator, type_node, &inline);
            } else {
                self.visit_variable(node, declarator, type_node, &inline);
            }
        }
        self.pending_template = None;
    }

    fn declared_type(&mut self, type_node: Option<Node<'t>>, inline: &Option<Option<String>>) -> Option<String> {
        if let Some(key) = inline {
            return key.clone();
        }
        type_node.and_then(|t| self.visit_type(t, ReferenceKind::TypeUsage))
    }

    /// A function declared without a body.
    fn visit_prototype(&mut self, node: Node<'t>, head: CallableHead<'t>) {
        let owner = self.callable_owner(&head);
        let kind = self.callable_kind(node, &owner, &head);
        let name = path_name(&owner).child(head.element());
        self.visit_qualifiers(head.name_node);
        let symbol = SymbolDeclaration::new(name.clone(), kind)
            .with_access(self.member_access())
            .with_static(has_storage_class(node, "static", self.model.source))
            .with_definition(DefinitionKind::Declaration)
            .at(location_of(head.anchor()));
        self.client.record_symbol(&symbol);
        if kind == SymbolKind::Method {
            self.record_override(&owner, &head, &name);
        }

        let template = self.pending_template.take();
        self.with_context(name.clone(), |r| {
            let templated = r.enter_template(template, &name);
            if let Some(return_type) = node.child_by_field_name("type") {
                r.visit_type(return_type, ReferenceKind::TypeUsage);
            }
            r.visit_parameters(head.function, false);
            if templated {
                r.templates.pop();
            }
        });
    }

    /// A global, a field or a static member defined out of line.
    fn visit_variable(
        &mut self,
        node: Node<'t>,
        declarator: Node<'t>,
        type_node: Option<Node<'t>>,
        inline: &Option<Option<String>>,
    ) {
        let Some(name_node) = declared_name(declarator) else {
            return;
        };
        let mut path = self.scope.clone();
        path.extend(segments(name_node, self.model.source));
        let Some(simple) = path.pop() else {
            return;
        };
        let in_type = self.model.is_type(&path_key(&path));
        let kind = if in_type {
            SymbolKind::Field
        } else {
            SymbolKind::GlobalVariable
        };
        let definition = if has_storage_class(node, "extern", self.model.source) {
            DefinitionKind::Declaration
        } else {
            DefinitionKind::Explicit
        };
        let access = if segments(name_node, self.model.source).len() > 1 {
            AccessKind::None
        } else {
            self.member_access()
        };
        let name = path_name(&path).child(variable_element(&simple, node, declarator, self.model.source));

        self.visit_qualifiers(name_node);
        let symbol = SymbolDeclaration::new(name.clone(), kind)
            .with_access(access)
            .with_static(has_storage_class(node, "static", self.model.source))
            .with_definition(definition)
            .at(location_of(name_anchor(name_node)));
        self.client.record_symbol(&symbol);

        let value = declarator
            .child_by_field_name("value")
            .or_else(|| node.child_by_field_name("default_value"));
        let scope = if in_type { path } else { self.scope.clone() };
        let saved = std::mem::replace(&mut self.scope, scope);
        self.with_context(name, |r| {
            let ty = r.declared_type(type_node, inline);
            if let Some(value) = value {
                r.visit_initializer(value, ty.as_deref(), location_of(name_node));
            }
        });
        self.scope = saved;
    }

    fn visit_local_declarator(
        &mut self,
        node: Node<'t>,
        declarator: Node<'t>,
        type_node: Option<Node<'t>>,
        inline: &Option<Option<String>>,
    ) {
        let declared = self.declared_type(type_node, inline);
        let Some(name_node) = declared_name(declarator) else {
            return;
        };
        let value = declarator
            .child_by_field_name("value")
            .or_else(|| node.child_by_field_name("default_value"));
        let value_type = value.and_then(|v| self.visit_initializer(v, declared.as_deref(), location_of(name_node)));
        let inferred = type_node.is_some_and(|t| t.kind() == "placeholder_type_specifier");
        self.bind_local(name_node, if inferred { value_type } else { declared });
    }

    /// The value of `int x = v`, `A a(1, 2)` or `A a{1}`. Constructor calls
    /// are anchored at the declared name.
    fn visit_initializer(&mut self, value: Node<'t>, ty: Option<&str>, at: ParseLocation) -> Option<String> {
        match value.kind() {
            "argument_list" | "initializer_list" => {
                if let Some(ty) = ty {
                    self.record_constructor_call(ty, argument_count(value), at);
                }
                self.visit(value);
                ty.map(str::to_string)
            }
            _ => self.visit_expression(value),
        }
    }

    fn visit_template(&mut self, node: Node<'t>) {
        let params = node.child_by_field_name("parameters");
        for child in named_children(node) {
            if Some(child) == params {
                continue;
            }
            self.pending_template = params;
            self.visit(child);
            self.pending_template = None;
        }
    }

    fn visit_typedef(&mut self, node: Node<'t>) {
        let type_node = node.child_by_field_name("type");
        let mut inline = None;
        if let Some(type_node) = type_node {
            if type_node.child_by_field_name("body").is_some()
                && (is_record_specifier(type_node.kind()) || type_node.kind() == "enum_specifier")
            {
                inline = Some(self.visit_type_declaration(type_node));
            }
        }
        let mut cursor = node.walk();
        let declarators: Vec<Node<'t>> = node
            .children_by_field_name("declarator", &mut cursor)
            .collect();
        for declarator in declarators {
            let Some(name_node) = declared_name(declarator) else {
                continue;
            };
            let name = path_name(&self.scope).child(NameElement::new(self.model.text(name_node)));
            self.record_typedef(name.clone(), name_node);
            self.with_context(name, |r| {
                r.declared_type(type_node, &inline);
            });
        }
    }

    fn visit_alias(&mut self, node: Node<'t>) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = path_name(&self.scope).child(NameElement::new(self.model.text(name_node)));
        self.record_typedef(name.clone(), name_node);
        self.pending_template = None;
        if let Some(aliased) = node.child_by_field_name("type") {
            self.with_context(name, |r| {
                r.visit_type(aliased, ReferenceKind::TypeUsage);
            });
        }
    }

    fn record_typedef(&mut self, name: NameHierarchy, name_node: Node) {
        let symbol = SymbolDeclaration::new(name, SymbolKind::Typedef)
            .with_access(self.member_access())
            .with_definition(DefinitionKind::Explicit)
            .at(location_of(name_node));
        self.client.record_symbol(&symbol);
    }

    fn visit_macro(&mut self, node: Node<'t>) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = path_name(&[self.model.text(name_node).to_string()]);
        let symbol = SymbolDeclaration::new(name, SymbolKind::Macro)
            .with_definition(DefinitionKind::Explicit)
            .at(location_of(name_node));
        self.client.record_symbol(&symbol);
    }

    /// `using ns::name;`, `using namespace ns;` and `namespace n = ns;`
    fn visit_using(&mut self, node: Node<'t>) {
        for child in named_children(node) {
            match child.kind() {
                "identifier" | "namespace_identifier" | "qualified_identifier"
                | "nested_namespace_specifier" => {
                    if node.kind() == "namespace_alias_definition"
                        && Some(child) == node.child_by_field_name("name")
                    {
                        continue;
                    }
                    self.visit_qualifiers(child);
                    let path = segments(child, self.model.source);
                    if let Some(key) = self.model.find_scope(&path, &self.scope) {
                        let anchor = name_anchor(child);
                        self.client
                            .record_qualifier(&key_name(&key), location_of(anchor));
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_lambda(&mut self, node: Node<'t>) {
        self.with_frame(|r| {
            if let Some(declarator) = node.child_by_field_name("declarator") {
                r.visit_parameters(declarator, true);
            }
            if let Some(body) = node.child_by_field_name("body") {
                r.visit(body);
            }
        });
    }

    fn visit_for_range(&mut self, node: Node<'t>) {
        self.with_frame(|r| {
            if let Some(initializer) = node.child_by_field_name("initializer") {
                r.visit(initializer);
            }
            if let Some(range) = node.child_by_field_name("right") {
                r.visit(range);
            }
            let ty = node
                .child_by_field_name("type")
                .and_then(|t| r.visit_type(t, ReferenceKind::TypeUsage));
            if let Some(name) = node.child_by_field_name("declarator").and_then(declared_name) {
                r.bind_local(name, ty);
            }
            if let Some(body) = node.child_by_field_name("body") {
                r.visit(body);
            }
        });
    }

    fn visit_catch_clause(&mut self, node: Node<'t>) {
        self.with_frame(|r| {
            if let Some(params) = node.child_by_field_name("parameters") {
                for param in named_children(params) {
                    let ty = param
                        .child_by_field_name("type")
                        .and_then(|t| r.visit_type(t, ReferenceKind::TypeUsage));
                    if let Some(name) = param.child_by_field_name("declarator").and_then(declared_name) {
                        r.bind_local(name, ty);
                    }
                }
            }
            if let Some(body) = node.child_by_field_name("body") {
                r.visit(body);
            }
        });
    }
}

fn access_of(text: &str) -> AccessKind {
    match text.trim_end_matches(':').trim() {
        "public" => AccessKind::Public,
        "protected" => AccessKind::Protected,
        _ => AccessKind::Private,
    }
}

fn is_declaration_list(parent: Option<Node>) -> bool {
    parent.is_some_and(|p| {
        matches!(
            p.kind(),
            "translation_unit" | "declaration_list" | "field_declaration_list" | "template_declaration"
        )
    })
}

/// Arguments in an argument or initializer list, ignoring comments.
pub(super) fn argument_count(arguments: Node) -> usize {
    named_children(arguments)
        .into_iter()
        .filter(|a| !is_comment(a.kind()))
        .count()
}
