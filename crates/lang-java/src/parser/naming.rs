use super::constants::{JAVA_LANG_CLASSES, is_primitive_type, looks_like_type_name};
use super::model::{CallableId, FileModel, Scope, TypeId};
use std::collections::{HashSet, VecDeque};
use trailscope_api::{NameElement, NameHierarchy};
use tree_sitter::Node;

/// What a type reference in the source denotes.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ResolvedType {
    Declared(TypeId),
    TypeParameter { owner: Scope, name: String },
    External(NameHierarchy),
    Primitive(String),
}

/// The callee of a constructor call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ConstructorTarget {
    Declared(CallableId),
    /// The default constructor of a class that declares none.
    Implicit(NameHierarchy),
}

impl<'t> FileModel<'t> {
    pub fn resolved_name(&self, resolved: &ResolvedType) -> Option<NameHierarchy> {
        match resolved {
            ResolvedType::Declared(t) => Some(self.types[*t].name.clone()),
            ResolvedType::TypeParameter { owner, name } => {
                Some(self.scope_name(*owner).child(NameElement::new(name.clone())))
            }
            ResolvedType::External(name) => Some(name.clone()),
            ResolvedType::Primitive(_) => None,
        }
    }

    pub fn resolved_display(&self, resolved: &ResolvedType) -> String {
        match resolved {
            ResolvedType::Declared(t) => {
                let entry = &self.types[*t];
                if entry.name.is_empty() {
                    entry.simple_name.clone().unwrap_or_default()
                } else {
                    entry.name.qualified_name()
                }
            }
            ResolvedType::TypeParameter { owner, name } => {
                format!("{}.{}", self.scope_qualified_name(*owner), name)
            }
            ResolvedType::External(name) => name.qualified_name(),
            ResolvedType::Primitive(name) => name.clone(),
        }
    }

    /// Display of a generic type's base, where the declared type parameters
    /// are replaced by the arguments.
    fn raw_display(&self, resolved: &ResolvedType) -> String {
        match resolved {
            ResolvedType::Declared(t) => {
                let entry = &self.types[*t];
                let simple = entry.simple_name.clone().unwrap_or_default();
                match entry.name.parent() {
                    Some(parent) => format!("{}.{}", parent.qualified_name(), simple),
                    None => simple,
                }
            }
            other => self.resolved_display(other),
        }
    }

    /// Looks `name` up lexically from `from`, then among top-level types,
    /// single-type imports and `java.lang`.
    pub fn lookup_type(&self, name: &str, from: Option<Scope>) -> Option<ResolvedType> {
        let mut scope = from;
        while let Some(current) = scope {
            match current {
                Scope::Callable(c) => {
                    let entry = &self.callables[c];
                    if entry.type_params.iter().any(|p| p.name == name) {
                        return Some(ResolvedType::TypeParameter {
                            owner: current,
                            name: name.to_string(),
                        });
                    }
                    if let Some(locals) = self.local_types.get(&c) {
                        let found = locals
                            .iter()
                            .find(|&&t| self.types[t].simple_name.as_deref() == Some(name));
                        if let Some(&t) = found {
                            return Some(ResolvedType::Declared(t));
                        }
                    }
                    scope = Some(Scope::Type(entry.owner));
                }
                Scope::Type(t) => {
                    let entry = &self.types[t];
                    if entry.type_params.iter().any(|p| p.name == name) {
                        return Some(ResolvedType::TypeParameter {
                            owner: current,
                            name: name.to_string(),
                        });
                    }
                    if entry.simple_name.as_deref() == Some(name) {
                        return Some(ResolvedType::Declared(t));
                    }
                    if let Some(member) = self.member_type(t, name) {
                        return Some(ResolvedType::Declared(member));
                    }
                    scope = entry.container.scope();
                }
            }
        }

        if let Some(&t) = self.top_level.get(name) {
            return Some(ResolvedType::Declared(t));
        }
        let imported = self
            .imports
            .iter()
            .find(|i| !i.wildcard && !i.is_static && i.path.last().map(String::as_str) == Some(name));
        if let Some(import) = imported {
            return Some(ResolvedType::External(self.package_name_of(&import.path)));
        }
        if JAVA_LANG_CLASSES.contains(&name) {
            return Some(ResolvedType::External(self.package_name_of(&[
                "java".to_string(),
                "lang".to_string(),
                name.to_string(),
            ])));
        }
        None
    }

    /// Like [`FileModel::lookup_type`], but guesses a type of the current
    /// package when nothing matches.
    pub fn resolve_type_name(&self, name: &str, from: Option<Scope>) -> ResolvedType {
        self.lookup_type(name, from)
            .unwrap_or_else(|| ResolvedType::External(self.guess_external(name)))
    }

    /// A member type of `t` or of one of its in-file supertypes.
    pub fn member_type(&self, t: TypeId, name: &str) -> Option<TypeId> {
        self.with_supertypes(t)
            .into_iter()
            .find_map(|s| self.types[s].nested.get(name).copied())
    }

    /// `t` followed by its in-file supertypes, nearest first.
    pub fn with_supertypes(&self, t: TypeId) -> Vec<TypeId> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([t]);
        let mut ordered = Vec::new();
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            ordered.push(current);
            queue.extend(self.types[current].supers.iter().copied());
        }
        ordered
    }

    /// The base type a type node names, ignoring type arguments and array
    /// dimensions.
    pub fn resolve_type_node(&self, node: Node, from: Option<Scope>) -> Option<ResolvedType> {
        match node.kind() {
            kind if is_primitive_type(kind) => {
                Some(ResolvedType::Primitive(self.text(node).to_string()))
            }
            "type_identifier" | "identifier" => {
                Some(self.resolve_type_name(self.text(node), from))
            }
            "scoped_type_identifier" | "scoped_identifier" => {
                let segments = self.segments_of(node);
                Some(self.resolve_segments(&segments, from))
            }
            "generic_type" | "annotated_type" => {
                let base = node
                    .named_children(&mut node.walk())
                    .filter(|c| !matches!(c.kind(), "annotation" | "marker_annotation"))
                    .find(|c| c.kind() != "type_arguments")?;
                self.resolve_type_node(base, from)
            }
            "array_type" => self.resolve_type_node(node.child_by_field_name("element")?, from),
            "wildcard" => {
                let bound = node
                    .named_children(&mut node.walk())
                    .filter(|c| !matches!(c.kind(), "annotation" | "marker_annotation" | "super"))
                    .last()?;
                self.resolve_type_node(bound, from)
            }
            _ => None,
        }
    }

    fn segments_of(&self, node: Node) -> Vec<String> {
        let mut segments = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            match current.kind() {
                "type_identifier" | "identifier" => segments.push(self.text(current).to_string()),
                "generic_type" | "scoped_type_identifier" | "scoped_identifier" => {
                    let children: Vec<Node> = current
                        .named_children(&mut current.walk())
                        .filter(|c| !matches!(c.kind(), "type_arguments" | "annotation" | "marker_annotation"))
                        .collect();
                    stack.extend(children.into_iter().rev());
                }
                _ => {}
            }
        }
        segments
    }

    /// Resolves a dotted type name such as `foo.A.B`.
    pub fn resolve_segments(&self, segments: &[String], from: Option<Scope>) -> ResolvedType {
        let Some((first, rest)) = segments.split_first() else {
            return ResolvedType::External(NameHierarchy::default());
        };
        if let Some(mut current) = self.lookup_type(first, from) {
            for segment in rest {
                current = self.member_of_resolved(&current, segment);
            }
            return current;
        }

        let mut dotted = first.clone();
        for (i, segment) in rest.iter().enumerate() {
            dotted = format!("{}.{}", dotted, segment);
            if let Some(&t) = self.qualified_types.get(&dotted) {
                let mut current = ResolvedType::Declared(t);
                for segment in &rest[i + 1..] {
                    current = self.member_of_resolved(&current, segment);
                }
                return current;
            }
        }
        if !looks_like_type_name(first) {
            return ResolvedType::External(self.package_name_of(segments));
        }
        let mut name = self.guess_external(first);
        for segment in rest {
            name.push(NameElement::new(segment.clone()));
        }
        ResolvedType::External(name)
    }

    /// The member type `segment` of an already resolved type.
    pub fn member_of_resolved(&self, resolved: &ResolvedType, segment: &str) -> ResolvedType {
        if let ResolvedType::Declared(t) = resolved {
            if let Some(member) = self.member_type(*t, segment) {
                return ResolvedType::Declared(member);
            }
        }
        let parent = self
            .resolved_name(resolved)
            .unwrap_or_default();
        ResolvedType::External(parent.child(NameElement::new(segment)))
    }

    /// How a type appears inside a signature, e.g. `A<java.lang.Void>[]`.
    pub fn type_display(&self, node: Node, from: Option<Scope>) -> String {
        match node.kind() {
            "generic_type" => {
                let children: Vec<Node> = node.named_children(&mut node.walk()).collect();
                let base = children
                    .iter()
                    .find(|c| c.kind() != "type_arguments")
                    .and_then(|b| self.resolve_type_node(*b, from))
                    .map(|r| self.raw_display(&r))
                    .unwrap_or_default();
                let arguments: Vec<String> = children
                    .iter()
                    .filter(|c| c.kind() == "type_arguments")
                    .flat_map(|args| args.named_children(&mut args.walk()).collect::<Vec<_>>())
                    .map(|arg| self.type_display(arg, from))
                    .collect();
                format!("{}<{}>", base, arguments.join(", "))
            }
            "array_type" => {
                let element = node
                    .child_by_field_name("element")
                    .map(|e| self.type_display(e, from))
                    .unwrap_or_default();
                let dimensions: String = node
                    .child_by_field_name("dimensions")
                    .map(|d| self.text(d).split_whitespace().collect())
                    .unwrap_or_default();
                format!("{}{}", element, dimensions)
            }
            "wildcard" => {
                let bound = node
                    .named_children(&mut node.walk())
                    .filter(|c| !matches!(c.kind(), "annotation" | "marker_annotation" | "super"))
                    .last();
                match bound {
                    Some(bound) => {
                        let keyword = if node.children(&mut node.walk()).any(|c| c.kind() == "super") {
                            "super"
                        } else {
                            "extends"
                        };
                        format!("? {} {}", keyword, self.type_display(bound, from))
                    }
                    None => "?".to_string(),
                }
            }
            "annotated_type" => node
                .named_children(&mut node.walk())
                .filter(|c| !matches!(c.kind(), "annotation" | "marker_annotation"))
                .last()
                .map(|inner| self.type_display(inner, from))
                .unwrap_or_default(),
            _ => match self.resolve_type_node(node, from) {
                Some(resolved) => self.resolved_display(&resolved),
                None => self.text(node).split_whitespace().collect(),
            },
        }
    }

    /// A method named `name` callable with `arity` arguments on `t`, looked up
    /// through the in-file supertypes. Falls back to the only method of that
    /// name when the arity matches none.
    pub fn find_method(&self, t: TypeId, name: &str, arity: Option<usize>) -> Option<CallableId> {
        let candidates: Vec<CallableId> = self
            .with_supertypes(t)
            .into_iter()
            .flat_map(|s| self.types[s].methods.iter().copied())
            .filter(|&c| !self.callables[c].is_constructor && self.callables[c].simple_name == name)
            .collect();
        if let Some(arity) = arity {
            if let Some(&c) = candidates
                .iter()
                .find(|&&c| self.callables[c].accepts_arity(arity))
            {
                return Some(c);
            }
        }
        match candidates.as_slice() {
            [only] => Some(*only),
            [first, ..] if arity.is_none() => Some(*first),
            _ => None,
        }
    }

    pub fn find_constructor(&self, t: TypeId, arity: Option<usize>) -> Option<ConstructorTarget> {
        let constructors: Vec<CallableId> = self.types[t]
            .methods
            .iter()
            .copied()
            .filter(|&c| self.callables[c].is_constructor)
            .collect();
        if constructors.is_empty() {
            if self.types[t].is_interface() || self.types[t].is_anonymous() {
                return None;
            }
            return Some(ConstructorTarget::Implicit(self.implicit_constructor_name(t)));
        }
        let matching = match arity {
            Some(arity) => constructors
                .iter()
                .copied()
                .find(|&c| self.callables[c].accepts_arity(arity)),
            None => None,
        };
        matching
            .or_else(|| (constructors.len() == 1 || arity.is_none()).then(|| constructors[0]))
            .map(ConstructorTarget::Declared)
    }

    pub fn implicit_constructor_name(&self, t: TypeId) -> NameHierarchy {
        let simple = self.types[t].simple_name.clone().unwrap_or_default();
        self.types[t]
            .name
            .child(NameElement::with_signature(simple, "", "()"))
    }

    /// The field `name` of `t` or of its in-file supertypes.
    pub fn find_field(&self, t: TypeId, name: &str) -> Option<(TypeId, usize)> {
        self.with_supertypes(t).into_iter().find_map(|s| {
            self.types[s]
                .fields
                .iter()
                .position(|f| f.simple_name == name)
                .map(|i| (s, i))
        })
    }

    pub fn field_type(&self, owner: TypeId, index: usize) -> Option<ResolvedType> {
        let field = &self.types[owner].fields[index];
        match field.type_node {
            Some(node) => self.resolve_type_node(node, Some(Scope::Type(owner))),
            None => Some(ResolvedType::Declared(owner)),
        }
    }

    pub fn return_type(&self, c: CallableId) -> Option<ResolvedType> {
        let entry = &self.callables[c];
        if entry.is_constructor {
            return Some(ResolvedType::Declared(entry.owner));
        }
        self.resolve_type_node(entry.return_type?, Some(Scope::Callable(c)))
    }

    /// The superclass of `t`, or for interfaces and anonymous classes the
    /// first supertype.
    pub fn superclass(&self, t: TypeId) -> Option<TypeId> {
        let supers = &self.types[t].supers;
        supers
            .iter()
            .copied()
            .find(|&s| !self.types[s].is_interface())
            .or_else(|| supers.first().copied())
    }

    /// Method `c` overrides: the nearest method with the same name and arity
    /// in a supertype whose parameter types match, a type parameter matching
    /// anything.
    pub fn overridden_method(&self, c: CallableId) -> Option<CallableId> {
        let entry = &self.callables[c];
        if entry.is_constructor {
            return None;
        }
        self.with_supertypes(entry.owner)
            .into_iter()
            .skip(1)
            .flat_map(|s| self.types[s].methods.iter().copied())
            .find(|&candidate| {
                let other = &self.callables[candidate];
                !other.is_constructor
                    && other.simple_name == entry.simple_name
                    && other.params.len() == entry.params.len()
                    && other
                        .param_displays
                        .iter()
                        .zip(&entry.param_displays)
                        .zip(&other.generic_params)
                        .all(|((theirs, ours), generic)| *generic || theirs == ours)
            })
    }
}
