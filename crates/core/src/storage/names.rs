use lasso::{Rodeo, Spur};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use trailscope_api::{NameDelimiter, NameElement, NameHierarchy};

/// Run-local identifier of an interned qualified name. Only meaningful
/// inside the storage that issued it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct NameNode {
    parent: Option<NameId>,
    delimiter: NameDelimiter,
    name: Spur,
    prefix: Spur,
    postfix: Spur,
}

/// Hierarchical name table: each element is interned once per parent, so
/// `foo.A` and `foo.A.bar` share the `foo` and `foo.A` nodes.
#[derive(Debug, Default)]
pub struct NameTable {
    rodeo: Rodeo,
    nodes: Vec<NameNode>,
    lookup: HashMap<NameNode, NameId>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `None` for an empty hierarchy.
    pub fn intern(&mut self, name: &NameHierarchy) -> Option<NameId> {
        let mut current = None;
        for element in &name.elements {
            current = Some(self.intern_node(current, name.delimiter, element));
        }
        current
    }

    pub fn get(&self, name: &NameHierarchy) -> Option<NameId> {
        let mut current = None;
        for element in &name.elements {
            let node = NameNode {
                parent: current,
                delimiter: name.delimiter,
                name: self.rodeo.get(&element.name)?,
                prefix: self.rodeo.get(&element.prefix)?,
                postfix: self.rodeo.get(&element.postfix)?,
            };
            current = Some(*self.lookup.get(&node)?);
        }
        current
    }

    pub fn parent(&self, id: NameId) -> Option<NameId> {
        self.nodes.get(id.0 as usize).and_then(|n| n.parent)
    }

    pub fn resolve(&self, id: NameId) -> Option<NameHierarchy> {
        let mut elements = Vec::new();
        let mut delimiter = NameDelimiter::default();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.nodes.get(node_id.0 as usize)?;
            delimiter = node.delimiter;
            elements.push(NameElement::with_signature(
                self.rodeo.resolve(&node.name),
                self.rodeo.resolve(&node.prefix),
                self.rodeo.resolve(&node.postfix),
            ));
            current = node.parent;
        }
        elements.reverse();
        Some(NameHierarchy::from_elements(delimiter, elements))
    }

    pub fn ids(&self) -> impl Iterator<Item = NameId> + '_ {
        (0..self.nodes.len() as u32).map(NameId)
    }

    fn intern_node(
        &mut self,
        parent: Option<NameId>,
        delimiter: NameDelimiter,
        element: &NameElement,
    ) -> NameId {
        let node = NameNode {
            parent,
            delimiter,
            name: self.rodeo.get_or_intern(&element.name),
            prefix: self.rodeo.get_or_intern(&element.prefix),
            postfix: self.rodeo.get_or_intern(&element.postfix),
        };
        if let Some(id) = self.lookup.get(&node) {
            return *id;
        }
        let id = NameId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.lookup.insert(node, id);
        id
    }
}
