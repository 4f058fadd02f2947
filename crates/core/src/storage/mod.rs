//! Per-run accumulation of indexing facts.
//!
//! Every insertion deduplicates against what is already stored, so front ends
//! may report the same fact any number of times. Ids handed out here are local
//! to one storage; [`IntermediateStorage::merge`] re-keys through qualified
//! names and file paths.

mod digest;
mod model;
mod names;
mod snapshot;

pub use digest::FactDigest;
pub use model::{
    FileId, SourceLocation, StorageComment, StorageDeclaration, StorageEdge, StorageError,
    StorageFile, StorageLocalSymbol, StorageQualifier, StorageScope, StorageSymbol,
};
pub use names::{NameId, NameTable};
pub use snapshot::StorageSnapshot;

use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use trailscope_api::{LanguageType, NameHierarchy, ReferenceKind};
use tracing::debug;

#[derive(Debug, Default)]
pub struct IntermediateStorage {
    names: NameTable,
    files: IndexMap<PathBuf, StorageFile>,
    symbols: IndexMap<NameId, StorageSymbol>,
    declarations: IndexSet<StorageDeclaration>,
    edges: IndexSet<StorageEdge>,
    local_symbols: IndexSet<StorageLocalSymbol>,
    scopes: IndexSet<StorageScope>,
    qualifiers: IndexSet<StorageQualifier>,
    comments: IndexSet<StorageComment>,
    errors: IndexSet<StorageError>,
}

impl IntermediateStorage {
    pub fn new() -> Self {
        Self::default()
    }

    // --- insertion ---

    pub fn add_file(&mut self, path: &Path, language: LanguageType) -> FileId {
        if let Some(index) = self.files.get_index_of(path) {
            return FileId(index as u32);
        }
        let (index, _) = self.files.insert_full(
            path.to_path_buf(),
            StorageFile {
                path: path.to_path_buf(),
                language,
                complete: true,
            },
        );
        FileId(index as u32)
    }

    pub fn mark_file_incomplete(&mut self, file: FileId) {
        if let Some((_, record)) = self.files.get_index_mut(file.0 as usize) {
            record.complete = false;
        }
    }

    pub fn add_name(&mut self, name: &NameHierarchy) -> Option<NameId> {
        self.names.intern(name)
    }

    /// Inserts or merges the symbol keyed by its name.
    pub fn add_symbol(&mut self, symbol: StorageSymbol) {
        match self.symbols.get_mut(&symbol.name) {
            Some(existing) => existing.merge(&symbol),
            None => {
                self.symbols.insert(symbol.name, symbol);
            }
        }
    }

    pub fn add_declaration(&mut self, declaration: StorageDeclaration) -> bool {
        self.declarations.insert(declaration)
    }

    pub fn add_edge(&mut self, edge: StorageEdge) -> bool {
        self.edges.insert(edge)
    }

    pub fn add_local_symbol(&mut self, local: StorageLocalSymbol) -> bool {
        self.local_symbols.insert(local)
    }

    pub fn add_scope(&mut self, scope: StorageScope) -> bool {
        self.scopes.insert(scope)
    }

    pub fn add_qualifier(&mut self, qualifier: StorageQualifier) -> bool {
        self.qualifiers.insert(qualifier)
    }

    pub fn add_comment(&mut self, comment: StorageComment) -> bool {
        self.comments.insert(comment)
    }

    pub fn add_error(&mut self, error: StorageError) -> bool {
        if error.fatal {
            self.mark_file_incomplete(error.location.file);
        }
        self.errors.insert(error)
    }

    // --- read access ---

    pub fn names(&self) -> &NameTable {
        &self.names
    }

    pub fn name(&self, id: NameId) -> Option<NameHierarchy> {
        self.names.resolve(id)
    }

    pub fn find_name(&self, name: &NameHierarchy) -> Option<NameId> {
        self.names.get(name)
    }

    pub fn files(&self) -> impl Iterator<Item = (FileId, &StorageFile)> {
        self.files
            .values()
            .enumerate()
            .map(|(i, f)| (FileId(i as u32), f))
    }

    pub fn file(&self, id: FileId) -> Option<&StorageFile> {
        self.files.get_index(id.0 as usize).map(|(_, f)| f)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &StorageSymbol> {
        self.symbols.values()
    }

    pub fn symbol(&self, name: NameId) -> Option<&StorageSymbol> {
        self.symbols.get(&name)
    }

    /// Looks a symbol up by qualified name, the key used when merging into
    /// a persistent store.
    pub fn symbol_by_name(&self, name: &NameHierarchy) -> Option<&StorageSymbol> {
        self.find_name(name).and_then(|id| self.symbol(id))
    }

    pub fn declarations(&self) -> impl Iterator<Item = &StorageDeclaration> {
        self.declarations.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &StorageEdge> {
        self.edges.iter()
    }

    pub fn edges_of_kind(&self, kind: ReferenceKind) -> impl Iterator<Item = &StorageEdge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    pub fn local_symbols(&self) -> impl Iterator<Item = &StorageLocalSymbol> {
        self.local_symbols.iter()
    }

    pub fn scopes(&self) -> impl Iterator<Item = &StorageScope> {
        self.scopes.iter()
    }

    pub fn qualifiers(&self) -> impl Iterator<Item = &StorageQualifier> {
        self.qualifiers.iter()
    }

    pub fn comments(&self) -> impl Iterator<Item = &StorageComment> {
        self.comments.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &StorageError> {
        self.errors.iter()
    }

    pub fn fact_count(&self) -> usize {
        self.symbols.len()
            + self.declarations.len()
            + self.edges.len()
            + self.local_symbols.len()
            + self.scopes.len()
            + self.qualifiers.len()
            + self.comments.len()
            + self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fact_count() == 0
    }

    // --- normalization ---

    /// Drops edges from a symbol to itself whose location lies inside one of
    /// that symbol's own declaration sites. Returns the number removed.
    pub fn prune_self_usages(&mut self) -> usize {
        let mut sites: HashMap<NameId, Vec<SourceLocation>> = HashMap::new();
        for declaration in &self.declarations {
            sites
                .entry(declaration.name)
                .or_default()
                .push(declaration.location);
        }

        let before = self.edges.len();
        self.edges.retain(|edge| {
            if edge.source != edge.target {
                return true;
            }
            let inside_declaration = sites.get(&edge.target).is_some_and(|locations| {
                locations.iter().any(|site| {
                    site.file == edge.location.file && site.range.contains(&edge.location.range)
                })
            });
            !inside_declaration
        });
        let removed = before - self.edges.len();
        if removed > 0 {
            debug!("Pruned {} self-referencing edges at declaration sites", removed);
        }
        removed
    }

    /// Folds `other` into this storage, re-keying names and files.
    pub fn merge(&mut self, other: IntermediateStorage) {
        let mut file_map = HashMap::new();
        for (id, file) in other.files() {
            let new_id = self.add_file(&file.path, file.language);
            if !file.complete {
                self.mark_file_incomplete(new_id);
            }
            file_map.insert(id, new_id);
        }

        let mut name_map = HashMap::new();
        for id in other.names.ids() {
            if let Some(new_id) = other.names.resolve(id).and_then(|n| self.names.intern(&n)) {
                name_map.insert(id, new_id);
            }
        }

        let name = |id: NameId| name_map.get(&id).copied();
        let loc = |l: SourceLocation| {
            file_map.get(&l.file).map(|file| SourceLocation {
                file: *file,
                range: l.range,
            })
        };

        for symbol in other.symbols.values() {
            if let Some(n) = name(symbol.name) {
                self.add_symbol(StorageSymbol { name: n, ..*symbol });
            }
        }
        for d in &other.declarations {
            if let (Some(n), Some(l)) = (name(d.name), loc(d.location)) {
                self.declarations.insert(StorageDeclaration {
                    name: n,
                    location: l,
                    ..*d
                });
            }
        }
        for e in &other.edges {
            if let (Some(s), Some(t), Some(l)) = (name(e.source), name(e.target), loc(e.location)) {
                self.edges.insert(StorageEdge {
                    kind: e.kind,
                    source: s,
                    target: t,
                    location: l,
                });
            }
        }
        for local in &other.local_symbols {
            if let (Some(s), Some(l)) = (name(local.scope), loc(local.location)) {
                self.local_symbols.insert(StorageLocalSymbol {
                    scope: s,
                    location: l,
                    ..*local
                });
            }
        }
        for scope in &other.scopes {
            if let (Some(o), Some(b), Some(e)) = (name(scope.owner), loc(scope.begin), loc(scope.end)) {
                self.scopes.insert(StorageScope {
                    owner: o,
                    begin: b,
                    end: e,
                });
            }
        }
        for q in &other.qualifiers {
            if let (Some(n), Some(l)) = (name(q.name), loc(q.location)) {
                self.qualifiers.insert(StorageQualifier { name: n, location: l });
            }
        }
        for c in &other.comments {
            if let Some(l) = loc(c.location) {
                self.comments.insert(StorageComment { location: l });
            }
        }
        for err in &other.errors {
            if let Some(l) = loc(err.location) {
                self.errors.insert(StorageError {
                    message: err.message.clone(),
                    fatal: err.fatal,
                    location: l,
                });
            }
        }
    }

    pub fn snapshot(&self) -> StorageSnapshot {
        StorageSnapshot::from_storage(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailscope_api::{
        AccessKind, DefinitionKind, NameDelimiter, ParseLocation, SymbolKind,
    };

    fn name(q: &str) -> NameHierarchy {
        NameHierarchy::from_qualified(NameDelimiter::Dot, q)
    }

    fn declare(storage: &mut IntermediateStorage, file: FileId, q: &str, range: ParseLocation) -> NameId {
        let id = storage.add_name(&name(q)).unwrap();
        storage.add_symbol(StorageSymbol {
            name: id,
            kind: SymbolKind::Field,
            access: AccessKind::Default,
            is_static: false,
            definition: DefinitionKind::Explicit,
        });
        storage.add_declaration(StorageDeclaration {
            name: id,
            kind: SymbolKind::Field,
            location: SourceLocation { file, range },
            scope: None,
        });
        id
    }

    #[test]
    fn duplicate_declarations_collapse() {
        let mut storage = IntermediateStorage::new();
        let file = storage.add_file(Path::new("A.java"), LanguageType::Java);
        let range = ParseLocation::new(2, 6, 2, 8);
        declare(&mut storage, file, "A.bar", range);
        declare(&mut storage, file, "A.bar", range);
        assert_eq!(storage.declarations().count(), 1);
        assert_eq!(storage.symbols().count(), 1);
    }

    #[test]
    fn files_are_interned_by_path() {
        let mut storage = IntermediateStorage::new();
        let a = storage.add_file(Path::new("A.java"), LanguageType::Java);
        let b = storage.add_file(Path::new("A.java"), LanguageType::Java);
        assert_eq!(a, b);
    }

    #[test]
    fn fatal_error_marks_file_incomplete() {
        let mut storage = IntermediateStorage::new();
        let file = storage.add_file(Path::new("a.cpp"), LanguageType::Cpp);
        storage.add_error(StorageError {
            message: "cannot parse".to_string(),
            fatal: true,
            location: SourceLocation {
                file,
                range: ParseLocation::point(1, 1),
            },
        });
        assert!(!storage.file(file).unwrap().complete);
    }

    #[test]
    fn self_usage_inside_declaration_is_pruned() {
        let mut storage = IntermediateStorage::new();
        let file = storage.add_file(Path::new("A.java"), LanguageType::Java);
        let field = declare(&mut storage, file, "A.bar", ParseLocation::new(2, 6, 2, 8));
        let at = |range| SourceLocation { file, range };

        storage.add_edge(StorageEdge {
            kind: ReferenceKind::Usage,
            source: field,
            target: field,
            location: at(ParseLocation::new(2, 6, 2, 8)),
        });
        storage.add_edge(StorageEdge {
            kind: ReferenceKind::Usage,
            source: field,
            target: field,
            location: at(ParseLocation::new(5, 1, 5, 3)),
        });

        assert_eq!(storage.prune_self_usages(), 1);
        assert_eq!(storage.edges().count(), 1);
    }

    #[test]
    fn merge_rekeys_through_names() {
        let mut left = IntermediateStorage::new();
        let lf = left.add_file(Path::new("B.java"), LanguageType::Java);
        declare(&mut left, lf, "B.x", ParseLocation::new(1, 1, 1, 1));

        let mut right = IntermediateStorage::new();
        let rf = right.add_file(Path::new("A.java"), LanguageType::Java);
        let source = declare(&mut right, rf, "A.y", ParseLocation::new(3, 1, 3, 1));
        let target = right.add_name(&name("B.x")).unwrap();
        right.add_edge(StorageEdge {
            kind: ReferenceKind::Usage,
            source,
            target,
            location: SourceLocation {
                file: rf,
                range: ParseLocation::new(4, 2, 4, 2),
            },
        });

        left.merge(right);

        assert_eq!(left.files().count(), 2);
        assert_eq!(left.symbols().count(), 2);
        let edge = left.edges().next().unwrap();
        assert_eq!(left.name(edge.target).unwrap().qualified_name(), "B.x");
        assert_eq!(left.name(edge.source).unwrap().qualified_name(), "A.y");
        assert_eq!(left.file(edge.location.file).unwrap().path, PathBuf::from("A.java"));
        assert!(left.symbol_by_name(&name("B.x")).is_some());
    }
}
