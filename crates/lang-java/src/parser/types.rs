use super::constants::{is_primitive_type, looks_like_type_name};
use super::expressions::Chain;
use super::naming::ResolvedType;
use super::recorder::Recorder;
use trailscope_api::ReferenceKind;
use trailscope_core::parser::utils::{location_of, named_children};
use tree_sitter::Node;

impl<'t> Recorder<'_, 't> {
    /// Records a reference of `kind` from the current context to the type
    /// `node` names, plus qualifiers for its prefixes. Type arguments are
    /// recorded as [`ReferenceKind::TypeArgument`].
    pub(super) fn visit_type(&mut self, node: Node<'t>, kind: ReferenceKind) -> Option<ResolvedType> {
        match node.kind() {
            k if is_primitive_type(k) => {
                Some(ResolvedType::Primitive(self.model.text(node).to_string()))
            }
            "type_identifier" | "identifier" => {
                let resolved = self.model.resolve_type_name(self.model.text(node), self.scope());
                self.record_type_reference(kind, &resolved, node);
                Some(resolved)
            }
            "scoped_type_identifier" | "scoped_identifier" => {
                let (prefix, last) = split_scoped(node)?;
                let base = self.visit_type_prefix(prefix);
                let resolved = match self.step_type(&base, self.model.text(last)) {
                    Chain::Package(segments) => {
                        ResolvedType::External(self.model.package_name_of(&segments))
                    }
                    Chain::Type(resolved) | Chain::Instance(resolved) => resolved,
                    Chain::Value(_) => return None,
                };
                self.record_type_reference(kind, &resolved, last);
                Some(resolved)
            }
            "generic_type" => {
                let mut resolved = None;
                for child in named_children(node) {
                    if child.kind() == "type_arguments" {
                        for argument in named_children(child) {
                            self.visit_type(argument, ReferenceKind::TypeArgument);
                        }
                    } else {
                        resolved = self.visit_type(child, kind);
                    }
                }
                resolved
            }
            "array_type" => {
                let element = node.child_by_field_name("element")?;
                self.visit_type(element, kind)
            }
            "annotated_type" => {
                let mut resolved = None;
                for child in named_children(node) {
                    match child.kind() {
                        "annotation" | "marker_annotation" => self.visit(child),
                        _ => resolved = self.visit_type(child, kind),
                    }
                }
                resolved
            }
            "wildcard" => {
                let bound = named_children(node)
                    .into_iter()
                    .filter(|c| !matches!(c.kind(), "annotation" | "marker_annotation" | "super"))
                    .last()?;
                self.visit_type(bound, kind);
                None
            }
            _ => {
                self.visit(node);
                None
            }
        }
    }

    /// Resolves the prefix of a qualified type name, recording a qualifier
    /// for every segment.
    pub(super) fn visit_type_prefix(&mut self, node: Node<'t>) -> Chain {
        match node.kind() {
            "type_identifier" | "identifier" => {
                let name = self.model.text(node);
                let chain = match self.model.lookup_type(name, self.scope()) {
                    Some(resolved) => Chain::Type(resolved),
                    None if looks_like_type_name(name) => {
                        Chain::Type(ResolvedType::External(self.model.guess_external(name)))
                    }
                    None => Chain::Package(vec![name.to_string()]),
                };
                self.qualify(&chain, location_of(node));
                chain
            }
            "scoped_type_identifier" | "scoped_identifier" => {
                let Some((prefix, last)) = split_scoped(node) else {
                    return Chain::Value(None);
                };
                let base = self.visit_type_prefix(prefix);
                let chain = self.step_type(&base, self.model.text(last));
                self.qualify(&chain, location_of(last));
                chain
            }
            "generic_type" => {
                let mut chain = Chain::Value(None);
                for child in named_children(node) {
                    if child.kind() == "type_arguments" {
                        for argument in named_children(child) {
                            self.visit_type(argument, ReferenceKind::TypeArgument);
                        }
                    } else {
                        chain = self.visit_type_prefix(child);
                    }
                }
                chain
            }
            _ => Chain::Value(None),
        }
    }

    /// `base.segment` in type and package space.
    pub(super) fn step_type(&self, base: &Chain, segment: &str) -> Chain {
        match base {
            Chain::Package(segments) => {
                let mut next = segments.clone();
                next.push(segment.to_string());
                if let Some(&t) = self.model.qualified_types.get(&next.join(".")) {
                    Chain::Type(ResolvedType::Declared(t))
                } else if looks_like_type_name(segment) {
                    Chain::Type(ResolvedType::External(self.model.package_name_of(&next)))
                } else {
                    Chain::Package(next)
                }
            }
            Chain::Type(resolved) | Chain::Instance(resolved) => {
                Chain::Type(self.model.member_of_resolved(resolved, segment))
            }
            Chain::Value(_) => Chain::Value(None),
        }
    }

    fn record_type_reference(&mut self, kind: ReferenceKind, resolved: &ResolvedType, at: Node) {
        if let Some(target) = self.model.resolved_name(resolved) {
            self.record_reference(kind, &target, location_of(at));
        }
    }
}

/// Splits `a.b.C` into `a.b` and `C`.
fn split_scoped(node: Node) -> Option<(Node, Node)> {
    if node.kind() == "scoped_identifier" {
        return Some((
            node.child_by_field_name("scope")?,
            node.child_by_field_name("name")?,
        ));
    }
    let children: Vec<Node> = named_children(node)
        .into_iter()
        .filter(|c| !matches!(c.kind(), "annotation" | "marker_annotation"))
        .collect();
    match children.as_slice() {
        [prefix, .., last] => Some((*prefix, *last)),
        _ => None,
    }
}

/// The identifier naming the type in `node`, where references are anchored.
pub(super) fn type_anchor(node: Node) -> Node {
    match node.kind() {
        "generic_type" | "annotated_type" => named_children(node)
            .into_iter()
            .filter(|c| !matches!(c.kind(), "type_arguments" | "annotation" | "marker_annotation"))
            .last()
            .map(type_anchor)
            .unwrap_or(node),
        "scoped_type_identifier" | "scoped_identifier" => {
            split_scoped(node).map(|(_, last)| last).unwrap_or(node)
        }
        "array_type" => node
            .child_by_field_name("element")
            .map(type_anchor)
            .unwrap_or(node),
        _ => node,
    }
}
