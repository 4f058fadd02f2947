use super::constants::{is_comment, is_primitive_type, looks_like_type_name};
use super::model::{SuperRef, TypeId};
use super::naming::{ConstructorTarget, ResolvedType};
use super::recorder::{Lookup, Recorder, argument_count};
use super::types::type_anchor;
use trailscope_api::{LocalAccess, NameHierarchy, ParseLocation, ReferenceKind};
use trailscope_core::parser::utils::{location_of, named_children};
use tree_sitter::Node;

/// What the left-hand side of a `.` denotes.
#[derive(Debug, Clone)]
pub(super) enum Chain {
    Package(Vec<String>),
    Type(ResolvedType),
    /// `this`, `super` or `X.this`: a value that is also reported as a
    /// qualifier of its type.
    Instance(ResolvedType),
    Value(Option<ResolvedType>),
}

impl Chain {
    fn declared_type(&self) -> Option<TypeId> {
        match self {
            Chain::Type(ResolvedType::Declared(t))
            | Chain::Instance(ResolvedType::Declared(t))
            | Chain::Value(Some(ResolvedType::Declared(t))) => Some(*t),
            _ => None,
        }
    }

    fn value_type(self) -> Option<ResolvedType> {
        match self {
            Chain::Instance(resolved) => Some(resolved),
            Chain::Value(resolved) => resolved,
            _ => None,
        }
    }
}

impl<'t> Recorder<'_, 't> {
    /// Visits an expression and returns its static type when it is evident.
    pub(super) fn visit_expression(&mut self, node: Node<'t>) -> Option<ResolvedType> {
        match node.kind() {
            "identifier" => self.visit_name_expression(node, LocalAccess::Read),
            "this" => self.current_type().map(ResolvedType::Declared),
            "string_literal" => Some(ResolvedType::External(self.model.package_name_of(&[
                "java".to_string(),
                "lang".to_string(),
                "String".to_string(),
            ]))),
            "parenthesized_expression" => {
                let inner = named_children(node)
                    .into_iter()
                    .find(|c| !is_comment(c.kind()))?;
                self.visit_expression(inner)
            }
            "field_access" => self.visit_field_access(node).0.value_type(),
            "method_invocation" => self.visit_method_invocation(node),
            "object_creation_expression" => self.visit_object_creation(node),
            "explicit_constructor_invocation" => {
                self.visit_explicit_constructor_invocation(node);
                None
            }
            "method_reference" => {
                self.visit_method_reference(node);
                None
            }
            "assignment_expression" => self.visit_assignment(node),
            "update_expression" => {
                for operand in named_children(node) {
                    match operand.kind() {
                        "identifier" => {
                            self.visit_name_expression(operand, LocalAccess::Write);
                        }
                        _ => self.visit(operand),
                    }
                }
                None
            }
            "cast_expression" => {
                let mut resolved = None;
                for child in named_children(node) {
                    if Some(child) == node.child_by_field_name("value") {
                        self.visit(child);
                    } else if !is_comment(child.kind()) {
                        resolved = resolved.or(self.visit_type(child, ReferenceKind::TypeUsage));
                    }
                }
                resolved
            }
            "class_literal" => {
                if let Some(class_type) = named_children(node).into_iter().next() {
                    self.visit_type(class_type, ReferenceKind::TypeUsage);
                }
                None
            }
            "array_creation_expression" => {
                let element = node.child_by_field_name("type");
                for child in named_children(node) {
                    if Some(child) == element {
                        self.visit_type(child, ReferenceKind::TypeUsage);
                    } else {
                        self.visit(child);
                    }
                }
                None
            }
            "array_initializer" | "lambda_expression" | "instanceof_expression" => {
                self.visit(node);
                None
            }
            _ => {
                self.visit_children(node);
                None
            }
        }
    }

    /// A bare identifier in expression position: a local or a field.
    fn visit_name_expression(&mut self, node: Node<'t>, access: LocalAccess) -> Option<ResolvedType> {
        match self.lookup_name(self.model.text(node))? {
            Lookup::Local(binding) => {
                self.client.record_local_symbol(
                    &binding.owner,
                    binding.declared_at,
                    location_of(node),
                    access,
                );
                binding.ty
            }
            Lookup::Field(owner, index) => {
                let target = self.model.types[owner].fields[index].name.clone();
                self.record_reference(ReferenceKind::Usage, &target, location_of(node));
                self.model.field_type(owner, index)
            }
        }
    }

    /// Reports `chain` as a qualifier located at `at`.
    pub(super) fn qualify(&mut self, chain: &Chain, at: ParseLocation) {
        let name = match chain {
            Chain::Package(segments) => Some(self.model.package_name_of(segments)),
            Chain::Type(resolved) | Chain::Instance(resolved) => self.model.resolved_name(resolved),
            Chain::Value(_) => None,
        };
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            self.client.record_qualifier(&name, at);
        }
    }

    /// Resolves the object of a member access. Returns the chain and where
    /// its last segment is written.
    fn visit_object(&mut self, node: Node<'t>) -> (Chain, ParseLocation) {
        let location = location_of(node);
        match node.kind() {
            "identifier" => {
                let name = self.model.text(node);
                if self.lookup_name(name).is_some() {
                    let resolved = self.visit_name_expression(node, LocalAccess::Read);
                    return (Chain::Value(resolved), location);
                }
                let chain = match self.model.lookup_type(name, self.scope()) {
                    Some(resolved) => Chain::Type(resolved),
                    None if looks_like_type_name(name) => {
                        Chain::Type(ResolvedType::External(self.model.guess_external(name)))
                    }
                    None => Chain::Package(vec![name.to_string()]),
                };
                (chain, location)
            }
            "this" => match self.current_type() {
                Some(t) => (Chain::Instance(ResolvedType::Declared(t)), location),
                None => (Chain::Value(None), location),
            },
            "super" => (self.super_chain(self.current_type()), location),
            "field_access" => self.visit_field_access(node),
            _ => (Chain::Value(self.visit_expression(node)), location),
        }
    }

    fn super_chain(&self, of: Option<TypeId>) -> Chain {
        of.and_then(|t| self.super_type(t))
            .map(Chain::Instance)
            .unwrap_or(Chain::Value(None))
    }

    /// The superclass of `t` as written, also when it is not declared in
    /// this file.
    fn super_type(&self, t: TypeId) -> Option<ResolvedType> {
        if let Some(s) = self.model.superclass(t) {
            return Some(ResolvedType::Declared(s));
        }
        let entry = &self.model.types[t];
        entry.super_refs.iter().find_map(|super_ref| match super_ref {
            SuperRef::Node(node) => self.model.resolve_type_node(*node, entry.container.scope()),
            SuperRef::Declared(s) => Some(ResolvedType::Declared(*s)),
        })
    }

    /// The `super` keyword between an object and a member, as in
    /// `X.super.m()`.
    fn super_token(node: Node<'t>, object: Option<Node<'t>>) -> Option<Node<'t>> {
        named_children(node)
            .into_iter()
            .find(|c| c.kind() == "super" && Some(*c) != object)
    }

    /// `a.b`, `X.this`, `X.super.f`. Records the usage of the accessed field
    /// and the qualifiers of everything left of it.
    fn visit_field_access(&mut self, node: Node<'t>) -> (Chain, ParseLocation) {
        let location = location_of(node);
        let (Some(object), Some(field)) = (
            node.child_by_field_name("object"),
            node.child_by_field_name("field"),
        ) else {
            self.visit_children(node);
            return (Chain::Value(None), location);
        };

        let (mut base, mut anchor) = self.visit_object(object);
        if let Some(super_node) = Self::super_token(node, Some(object)) {
            self.qualify(&base, anchor);
            base = self.super_chain(base.declared_type().or(self.current_type()));
            anchor = location_of(super_node);
        }

        if field.kind() == "this" {
            self.qualify(&base, anchor);
            let chain = match base {
                Chain::Type(resolved) => Chain::Instance(resolved),
                other => other,
            };
            return (chain, location_of(field));
        }

        self.qualify(&base, anchor);
        let chain = self.step(&base, field);
        (chain, location_of(field))
    }

    /// `base.name` where `name` may be a package, a type or a field.
    fn step(&mut self, base: &Chain, name_node: Node<'t>) -> Chain {
        let name = self.model.text(name_node);
        match base {
            Chain::Package(_) => self.step_type(base, name),
            Chain::Type(ResolvedType::Declared(t)) => {
                if let Some(member) = self.model.member_type(*t, name) {
                    return Chain::Type(ResolvedType::Declared(member));
                }
                Chain::Value(self.use_field(*t, name, name_node))
            }
            Chain::Type(_) if looks_like_type_name(name) => self.step_type(base, name),
            Chain::Type(_) => Chain::Value(None),
            Chain::Instance(_) | Chain::Value(_) => match base.declared_type() {
                Some(t) => Chain::Value(self.use_field(t, name, name_node)),
                None => Chain::Value(None),
            },
        }
    }

    fn use_field(&mut self, t: TypeId, name: &str, at: Node<'t>) -> Option<ResolvedType> {
        let (owner, index) = self.model.find_field(t, name)?;
        let target = self.model.types[owner].fields[index].name.clone();
        self.record_reference(ReferenceKind::Usage, &target, location_of(at));
        self.model.field_type(owner, index)
    }

    fn record_call(&mut self, target: &NameHierarchy, at: ParseLocation) {
        self.record_reference(ReferenceKind::Call, target, at);
    }

    fn visit_method_invocation(&mut self, node: Node<'t>) -> Option<ResolvedType> {
        let name_node = node.child_by_field_name("name")?;
        let name = self.model.text(name_node);
        let arguments = node.child_by_field_name("arguments");
        let arity = arguments.map(argument_count).unwrap_or(0);
        let object = node.child_by_field_name("object");

        let callee = match object {
            Some(object) => {
                let (mut chain, mut anchor) = self.visit_object(object);
                if let Some(super_node) = Self::super_token(node, Some(object)) {
                    self.qualify(&chain, anchor);
                    chain = self.super_chain(chain.declared_type().or(self.current_type()));
                    anchor = location_of(super_node);
                }
                self.qualify(&chain, anchor);
                chain
                    .declared_type()
                    .and_then(|t| self.model.find_method(t, name, Some(arity)))
            }
            None => self
                .enclosing_types()
                .into_iter()
                .find_map(|t| self.model.find_method(t, name, Some(arity))),
        };

        if let Some(type_arguments) = node.child_by_field_name("type_arguments") {
            self.visit(type_arguments);
        }
        if let Some(c) = callee {
            let target = self.model.callables[c].name.clone();
            self.record_call(&target, location_of(name_node));
        }
        if let Some(arguments) = arguments {
            self.visit(arguments);
        }
        callee.and_then(|c| self.model.return_type(c))
    }

    fn visit_explicit_constructor_invocation(&mut self, node: Node<'t>) {
        let arguments = node.child_by_field_name("arguments");
        let arity = arguments.map(argument_count).unwrap_or(0);
        if let Some(object) = node.child_by_field_name("object") {
            let (chain, anchor) = self.visit_object(object);
            self.qualify(&chain, anchor);
        }
        if let Some(keyword) = node.child_by_field_name("constructor") {
            let target = match keyword.kind() {
                "this" => self.current_type(),
                _ => self.current_type().and_then(|t| self.model.superclass(t)),
            };
            let callee = target.and_then(|t| self.model.find_constructor(t, Some(arity)));
            if let Some(callee) = callee {
                let name = self.constructor_name(&callee);
                self.record_call(&name, location_of(keyword));
            }
        }
        if let Some(arguments) = arguments {
            self.visit(arguments);
        }
    }

    fn constructor_name(&self, target: &ConstructorTarget) -> NameHierarchy {
        match target {
            ConstructorTarget::Declared(c) => self.model.callables[*c].name.clone(),
            ConstructorTarget::Implicit(name) => name.clone(),
        }
    }

    fn visit_object_creation(&mut self, node: Node<'t>) -> Option<ResolvedType> {
        let mut cursor = node.walk();
        let outer = node.children(&mut cursor).next().filter(|c| c.kind() != "new");
        if let Some(outer) = outer {
            let (chain, anchor) = self.visit_object(outer);
            self.qualify(&chain, anchor);
        }

        let type_node = node.child_by_field_name("type")?;
        let resolved = self.visit_type(type_node, ReferenceKind::TypeUsage);
        let anchor = location_of(type_anchor(type_node));
        let arguments = node.child_by_field_name("arguments");
        let arity = arguments.map(argument_count).unwrap_or(0);

        if let Some(ResolvedType::Declared(t)) = &resolved {
            if let Some(callee) = self.model.find_constructor(*t, Some(arity)) {
                let name = self.constructor_name(&callee);
                self.record_call(&name, anchor);
            }
        }
        if let Some(type_arguments) = node.child_by_field_name("type_arguments") {
            self.visit(type_arguments);
        }
        if let Some(arguments) = arguments {
            self.visit(arguments);
        }

        let body = named_children(node)
            .into_iter()
            .find(|c| c.kind() == "class_body");
        match body {
            Some(body) => {
                let base = resolved.map(|r| (r, anchor));
                self.visit_anonymous_type(body, base);
                self.model.type_of_node(body).map(ResolvedType::Declared)
            }
            None => resolved,
        }
    }

    /// `X::m`, `X::new`, `super::m`, `expr::m`.
    fn visit_method_reference(&mut self, node: Node<'t>) {
        let children = named_children(node);
        let Some(&target) = children.first() else {
            return;
        };
        let mut cursor = node.walk();
        let Some(member) = node.children(&mut cursor).last() else {
            return;
        };
        if is_primitive_type(target.kind()) || target.kind() == "array_type" {
            return;
        }

        let (chain, anchor) = match target.kind() {
            "type_identifier" | "scoped_type_identifier" | "generic_type" => {
                let anchor = type_anchor(target);
                let chain = match target.kind() {
                    "type_identifier" => {
                        let resolved = self.model.resolve_type_name(self.model.text(target), self.scope());
                        Chain::Type(resolved)
                    }
                    _ => self.visit_type_prefix(target),
                };
                (chain, location_of(anchor))
            }
            _ => self.visit_object(target),
        };
        if !matches!(target.kind(), "scoped_type_identifier" | "generic_type") {
            self.qualify(&chain, anchor);
        }

        for child in children.iter().skip(1) {
            if child.kind() == "type_arguments" {
                self.visit(*child);
            }
        }

        let Some(t) = chain.declared_type() else {
            return;
        };
        let target_name = match member.kind() {
            "new" => self
                .model
                .find_constructor(t, None)
                .map(|callee| self.constructor_name(&callee)),
            "identifier" => self
                .model
                .find_method(t, self.model.text(member), None)
                .map(|c| self.model.callables[c].name.clone()),
            _ => None,
        };
        if let Some(target_name) = target_name {
            self.record_reference(ReferenceKind::Usage, &target_name, location_of(member));
        }
    }

    fn visit_assignment(&mut self, node: Node<'t>) -> Option<ResolvedType> {
        let left = node.child_by_field_name("left");
        let right = node.child_by_field_name("right");
        let resolved = match left {
            Some(left) if left.kind() == "identifier" => {
                self.visit_name_expression(left, LocalAccess::Write)
            }
            Some(left) => self.visit_expression(left),
            None => None,
        };
        if let Some(right) = right {
            self.visit(right);
        }
        resolved
    }
}
