use super::constants::{is_comment, is_literal};
use super::naming::{name_anchor, path_name, qualified_parts, segment_text, segments};
use super::recorder::{Recorder, argument_count};
use trailscope_api::{LocalAccess, ReferenceKind};
use trailscope_core::parser::utils::{location_of, named_children};
use tree_sitter::Node;

impl<'t> Recorder<'_, 't> {
    /// Visits an expression and returns the key of its type when it is
    /// declared in this file. Pointers and references are seen through.
    pub(super) fn visit_expression(&mut self, node: Node<'t>) -> Option<String> {
        match node.kind() {
            k if is_literal(k) => None,
            "identifier" => self.visit_identifier(node, LocalAccess::Read),
            "this" => self.current_class(),
            "qualified_identifier" => self.visit_qualified_expression(node),
            "field_expression" => self.visit_field_expression(node),
            "call_expression" => self.visit_call(node),
            "new_expression" => self.visit_new(node),
            "assignment_expression" => {
                if let Some(left) = node.child_by_field_name("left") {
                    self.visit_target(left);
                }
                if let Some(right) = node.child_by_field_name("right") {
                    self.visit(right);
                }
                None
            }
            "update_expression" => {
                if let Some(argument) = node.child_by_field_name("argument") {
                    self.visit_target(argument);
                }
                None
            }
            "parenthesized_expression" => {
                let inner = named_children(node)
                    .into_iter()
                    .find(|c| !is_comment(c.kind()))?;
                self.visit_expression(inner)
            }
            "pointer_expression" => node
                .child_by_field_name("argument")
                .and_then(|argument| self.visit_expression(argument)),
            "cast_expression" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.visit(value);
                }
                node.child_by_field_name("type")
                    .and_then(|t| self.visit_type(t, ReferenceKind::TypeUsage))
            }
            "sizeof_expression" | "alignof_expression" => {
                if let Some(value) = node.child_by_field_name("value") {
                    self.visit(value);
                }
                if let Some(t) = node.child_by_field_name("type") {
                    self.visit_type(t, ReferenceKind::TypeUsage);
                }
                None
            }
            "field_identifier" | "statement_identifier" | "namespace_identifier" => None,
            "lambda_expression" | "initializer_list" => {
                self.visit(node);
                None
            }
            _ => {
                self.visit_children(node);
                None
            }
        }
    }

    /// The left side of an assignment or the operand of `++`/`--`.
    fn visit_target(&mut self, node: Node<'t>) {
        match node.kind() {
            "identifier" => {
                self.visit_identifier(node, LocalAccess::Write);
            }
            _ => self.visit(node),
        }
    }

    /// A bare name: a local, a variable, a function or a macro.
    fn visit_identifier(&mut self, node: Node<'t>, access: LocalAccess) -> Option<String> {
        let text = self.model.text(node);
        if let Some(binding) = self.lookup_local(text) {
            self.client
                .record_local_symbol(&binding.owner, binding.declared_at, location_of(node), access);
            return binding.ty;
        }
        let path = vec![text.to_string()];
        if let Some(variable) = self.model.find_variable(&path, &self.scope) {
            let (target, ty) = (variable.name.clone(), variable.type_key.clone());
            self.record_reference(ReferenceKind::Usage, &target, location_of(node));
            return ty;
        }
        if let Some(callable) = self.model.find_callable(&path, &self.scope, None) {
            let target = callable.name.clone();
            self.record_reference(ReferenceKind::Usage, &target, location_of(node));
            return None;
        }
        if self.model.is_macro(text) {
            self.record_reference(ReferenceKind::Usage, &path_name(&path), location_of(node));
        }
        None
    }

    /// `ns::value`, `A::count`, `E::Red`
    fn visit_qualified_expression(&mut self, node: Node<'t>) -> Option<String> {
        self.visit_qualifiers(node);
        let path = segments(node, self.model.source);
        let location = location_of(name_anchor(node));
        if let Some(variable) = self.model.find_variable(&path, &self.scope) {
            let (target, ty) = (variable.name.clone(), variable.type_key.clone());
            self.record_reference(ReferenceKind::Usage, &target, location);
            return ty;
        }
        if let Some(callable) = self.model.find_callable(&path, &self.scope, None) {
            let target = callable.name.clone();
            self.record_reference(ReferenceKind::Usage, &target, location);
        }
        None
    }

    /// `object.field` and `pointer->field`
    fn visit_field_expression(&mut self, node: Node<'t>) -> Option<String> {
        let object = node
            .child_by_field_name("argument")
            .and_then(|argument| self.visit_expression(argument));
        let field = node.child_by_field_name("field")?;
        let object = object?;
        let name = segment_text(name_anchor(field), self.model.source);
        let variable = self.model.member_variable(&object, &name)?;
        let (target, ty) = (variable.name.clone(), variable.type_key.clone());
        self.record_reference(ReferenceKind::Usage, &target, location_of(name_anchor(field)));
        ty
    }

    fn visit_call(&mut self, node: Node<'t>) -> Option<String> {
        let arguments = node.child_by_field_name("arguments");
        let arity = arguments.map(argument_count).unwrap_or(0);
        let result = match node.child_by_field_name("function") {
            Some(function) => self.visit_callee(function, arity),
            None => None,
        };
        if let Some(arguments) = arguments {
            self.visit_children(arguments);
        }
        result
    }

    /// Reports the call to `function` and returns the type of the result.
    fn visit_callee(&mut self, function: Node<'t>, arity: usize) -> Option<String> {
        match function.kind() {
            "identifier" | "qualified_identifier" | "template_function" => {
                if function.kind() == "identifier" {
                    if self.lookup_local(self.model.text(function)).is_some() {
                        return self.visit_identifier(function, LocalAccess::Read);
                    }
                }
                self.visit_qualifiers(function);
                let anchor = name_anchor(function);
                let (_, last) = qualified_parts(function);
                if last.kind() == "template_function" {
                    if let Some(arguments) = last.child_by_field_name("arguments") {
                        for argument in named_children(arguments) {
                            if argument.kind() == "type_descriptor" {
                                self.visit_type(argument, ReferenceKind::TypeArgument);
                            } else {
                                self.visit(argument);
                            }
                        }
                    }
                }
                let path = segments(function, self.model.source);
                let location = location_of(anchor);
                if let Some(callable) = self.model.find_callable(&path, &self.scope, Some(arity)) {
                    let (target, ty) = (callable.name.clone(), callable.return_type.clone());
                    self.record_reference(ReferenceKind::Call, &target, location);
                    return ty;
                }
                if let Some(type_key) = self.model.find_type(&path, &self.scope) {
                    self.record_constructor_call(&type_key, arity, location);
                    return Some(type_key);
                }
                if path.len() == 1 && self.model.is_macro(&path[0]) {
                    self.record_reference(ReferenceKind::Usage, &path_name(&path), location);
                }
                None
            }
            "field_expression" => {
                let object = function
                    .child_by_field_name("argument")
                    .and_then(|argument| self.visit_expression(argument));
                let field = function.child_by_field_name("field")?;
                let object = object?;
                let anchor = name_anchor(field);
                let name = segment_text(anchor, self.model.source);
                let callable = self.model.member_callable(&object, &name, Some(arity))?;
                let (target, ty) = (callable.name.clone(), callable.return_type.clone());
                self.record_reference(ReferenceKind::Call, &target, location_of(anchor));
                ty
            }
            _ => {
                self.visit(function);
                None
            }
        }
    }

    /// `new A(1)`: a use of `A` and a call of its constructor.
    fn visit_new(&mut self, node: Node<'t>) -> Option<String> {
        let arguments = node.child_by_field_name("arguments");
        let found = node
            .child_by_field_name("type")
            .and_then(|t| self.visit_type(t, ReferenceKind::TypeUsage));
        if let (Some(type_key), Some(t)) = (&found, node.child_by_field_name("type")) {
            let arity = arguments.map(argument_count).unwrap_or(0);
            self.record_constructor_call(type_key, arity, location_of(name_anchor(t)));
        }
        if let Some(placement) = node.child_by_field_name("placement") {
            self.visit_children(placement);
        }
        if let Some(arguments) = arguments {
            self.visit_children(arguments);
        }
        found
    }
}
