use super::constants::{is_builtin_type, is_qualified, is_record_specifier};
use super::model::record_segments;
use super::naming::{key_name, name_anchor, path_key, path_name, qualified_parts, segment_text, segments};
use super::recorder::{Recorder, TemplateFrame};
use trailscope_api::{NameElement, NameHierarchy, ReferenceKind, SymbolDeclaration, SymbolKind};
use trailscope_core::parser::utils::{location_of, named_children};
use tree_sitter::Node;

impl<'t> Recorder<'_, 't> {
    /// Reports a use of the type spelled by `node` and returns its key when
    /// the type is declared in this file.
    pub(super) fn visit_type(&mut self, node: Node<'t>, kind: ReferenceKind) -> Option<String> {
        match node.kind() {
            k if is_builtin_type(k) => None,
            "type_identifier" => self.visit_type_name(node, kind),
            k if is_qualified(k) => {
                self.visit_qualifiers(node);
                let (_, last) = qualified_parts(node);
                if last.kind() == "template_type" {
                    if let Some(arguments) = last.child_by_field_name("arguments") {
                        self.visit_template_arguments(arguments);
                    }
                }
                let path = segments(node, self.model.source);
                let found = self.model.find_type(&path, &self.scope);
                let target = match &found {
                    Some(key) => key_name(key),
                    None => path_name(&path),
                };
                self.record_reference(kind, &target, location_of(name_anchor(node)));
                found
            }
            "template_type" => {
                let found = node
                    .child_by_field_name("name")
                    .and_then(|name| self.visit_type(name, kind));
                if let Some(arguments) = node.child_by_field_name("arguments") {
                    self.visit_template_arguments(arguments);
                }
                found
            }
            k if is_record_specifier(k) || k == "enum_specifier" => {
                if node.child_by_field_name("body").is_some() {
                    let mut path = self.scope.clone();
                    path.extend(record_segments(node, self.model.source, self.model.path));
                    self.visit(node);
                    return Some(path_key(&path));
                }
                node.child_by_field_name("name")
                    .and_then(|name| self.visit_type(name, kind))
            }
            "type_descriptor" => node
                .child_by_field_name("type")
                .and_then(|t| self.visit_type(t, kind)),
            "dependent_type" => named_children(node)
                .into_iter()
                .next()
                .and_then(|t| self.visit_type(t, kind)),
            "decltype" => {
                self.visit_children(node);
                None
            }
            _ => None,
        }
    }

    fn visit_type_name(&mut self, node: Node<'t>, kind: ReferenceKind) -> Option<String> {
        let text = self.model.text(node);
        let location = location_of(node);
        if let Some(parameter) = self.template_parameter(text) {
            self.record_reference(kind, &parameter, location);
            return None;
        }
        let path = vec![text.to_string()];
        match self.model.find_type(&path, &self.scope) {
            Some(key) => {
                self.record_reference(kind, &key_name(&key), location);
                Some(key)
            }
            None => {
                self.record_reference(kind, &path_name(&path), location);
                None
            }
        }
    }

    fn visit_template_arguments(&mut self, arguments: Node<'t>) {
        for argument in named_children(arguments) {
            match argument.kind() {
                "type_descriptor" => {
                    self.visit_type(argument, ReferenceKind::TypeArgument);
                }
                _ => self.visit(argument),
            }
        }
    }

    /// Reports each `::` scope in front of the last part of `node` as a
    /// qualifier, resolved to the namespace or type it names.
    pub(super) fn visit_qualifiers(&mut self, node: Node<'t>) {
        let (scopes, _) = qualified_parts(node);
        let mut prefix = Vec::new();
        for scope in scopes {
            if scope.kind() == "nested_namespace_specifier" {
                prefix.extend(segments(scope, self.model.source));
            } else {
                prefix.push(segment_text(scope, self.model.source));
            }
            let name = match self.model.find_scope(&prefix, &self.scope) {
                Some(key) => key_name(&key),
                None => path_name(&prefix),
            };
            self.client
                .record_qualifier(&name, location_of(name_anchor(scope)));
            if scope.kind() == "template_type" {
                if let Some(arguments) = scope.child_by_field_name("arguments") {
                    self.visit_template_arguments(arguments);
                }
            }
        }
    }

    fn template_parameter(&self, name: &str) -> Option<NameHierarchy> {
        self.templates.iter().rev().find_map(|frame| {
            frame
                .names
                .iter()
                .any(|n| n == name)
                .then(|| frame.owner.child(NameElement::new(name)))
        })
    }

    /// Declares the type parameters of `parameters` under `owner` and makes
    /// them visible. Returns whether a frame was pushed.
    pub(super) fn enter_template(&mut self, parameters: Option<Node<'t>>, owner: &NameHierarchy) -> bool {
        let Some(parameters) = parameters else {
            return false;
        };
        let mut names = Vec::new();
        let mut defaults = Vec::new();
        for parameter in named_children(parameters) {
            let name_node = match parameter.kind() {
                "type_parameter_declaration" | "variadic_type_parameter_declaration" => {
                    named_children(parameter)
                        .into_iter()
                        .find(|c| c.kind() == "type_identifier")
                }
                "optional_type_parameter_declaration" => parameter.child_by_field_name("name"),
                _ => None,
            };
            let Some(name_node) = name_node else {
                continue;
            };
            let simple = self.model.text(name_node).to_string();
            let name = owner.child(NameElement::new(simple.clone()));
            let symbol = SymbolDeclaration::new(name.clone(), SymbolKind::TypeParameter)
                .at(location_of(name_node));
            self.client.record_symbol(&symbol);
            names.push(simple);
            if let Some(default) = parameter.child_by_field_name("default_type") {
                defaults.push((name, default));
            }
        }
        self.templates.push(TemplateFrame {
            owner: owner.clone(),
            names,
        });
        for (name, default) in defaults {
            self.with_context(name, |r| {
                r.visit_type(default, ReferenceKind::TypeUsage);
            });
        }
        true
    }
}
