use super::client::ParserClient;
use crate::storage::{
    FileId, IntermediateStorage, NameId, SourceLocation, StorageComment, StorageDeclaration,
    StorageEdge, StorageError, StorageLocalSymbol, StorageQualifier, StorageScope, StorageSymbol,
};
use std::collections::HashMap;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use trailscope_api::{
    LanguageType, LocalAccess, NameHierarchy, ParseLocation, ReferenceKind, SymbolDeclaration,
};

/// [`ParserClient`] backed by a fresh [`IntermediateStorage`].
///
/// Once the cancellation token fires every further fact is dropped; the
/// storage is expected to be discarded by the caller.
#[derive(Debug)]
pub struct ParserClientImpl {
    storage: IntermediateStorage,
    cancellation: CancellationToken,
    current_file: Option<FileId>,
    local_ordinals: HashMap<(NameId, FileId, ParseLocation), u32>,
    next_ordinal: HashMap<NameId, u32>,
    dropped: usize,
}

impl ParserClientImpl {
    pub fn new(cancellation: CancellationToken) -> Self {
        Self {
            storage: IntermediateStorage::new(),
            cancellation,
            current_file: None,
            local_ordinals: HashMap::new(),
            next_ordinal: HashMap::new(),
            dropped: 0,
        }
    }

    pub fn storage(&self) -> &IntermediateStorage {
        &self.storage
    }

    /// Finishes the run and hands out the normalized storage.
    pub fn into_storage(mut self) -> IntermediateStorage {
        self.storage.prune_self_usages();
        if self.dropped > 0 {
            debug!("Dropped {} facts reported after interruption", self.dropped);
        }
        self.storage
    }

    fn accepting(&mut self) -> bool {
        if self.cancellation.is_cancelled() {
            self.dropped += 1;
            return false;
        }
        true
    }

    fn at(&self, range: ParseLocation) -> Option<SourceLocation> {
        if !range.is_valid() {
            debug!("Ignoring invalid location {}", range);
            return None;
        }
        match self.current_file {
            Some(file) => Some(SourceLocation { file, range }),
            None => {
                warn!("Fact at {} reported before any file", range);
                None
            }
        }
    }

    fn local_ordinal(&mut self, scope: NameId, file: FileId, declared_at: ParseLocation) -> u32 {
        if let Some(ordinal) = self.local_ordinals.get(&(scope, file, declared_at)) {
            return *ordinal;
        }
        let next = self.next_ordinal.entry(scope).or_insert(0);
        let ordinal = *next;
        *next += 1;
        self.local_ordinals.insert((scope, file, declared_at), ordinal);
        ordinal
    }
}

impl ParserClient for ParserClientImpl {
    fn record_file(&mut self, path: &Path, language: LanguageType) {
        if !self.accepting() {
            return;
        }
        self.current_file = Some(self.storage.add_file(path, language));
    }

    fn record_symbol(&mut self, symbol: &SymbolDeclaration) {
        if !self.accepting() {
            return;
        }
        let Some(name) = self.storage.add_name(&symbol.name) else {
            debug!("Ignoring symbol without a name");
            return;
        };
        self.storage.add_symbol(StorageSymbol {
            name,
            kind: symbol.kind,
            access: symbol.access,
            is_static: symbol.is_static,
            definition: symbol.definition,
        });
        if let Some(location) = symbol.location.and_then(|l| self.at(l)) {
            self.storage.add_declaration(StorageDeclaration {
                name,
                kind: symbol.kind,
                location,
                scope: symbol.scope,
            });
        }
    }

    fn record_reference(
        &mut self,
        kind: ReferenceKind,
        target: &NameHierarchy,
        context: &NameHierarchy,
        location: ParseLocation,
    ) {
        if !self.accepting() {
            return;
        }
        let Some(location) = self.at(location) else {
            return;
        };
        let (Some(source), Some(target)) = (
            self.storage.add_name(context),
            self.storage.add_name(target),
        ) else {
            debug!("Ignoring {} edge with an empty endpoint", kind);
            return;
        };
        self.storage.add_edge(StorageEdge {
            kind,
            source,
            target,
            location,
        });
    }

    fn record_local_symbol(
        &mut self,
        scope: &NameHierarchy,
        declared_at: ParseLocation,
        location: ParseLocation,
        access: LocalAccess,
    ) {
        if !self.accepting() {
            return;
        }
        let Some(location) = self.at(location) else {
            return;
        };
        let Some(scope) = self.storage.add_name(scope) else {
            return;
        };
        let ordinal = self.local_ordinal(scope, location.file, declared_at);
        self.storage.add_local_symbol(StorageLocalSymbol {
            scope,
            ordinal,
            location,
            access,
        });
    }

    fn record_scope(&mut self, owner: &NameHierarchy, begin: ParseLocation, end: ParseLocation) {
        if !self.accepting() {
            return;
        }
        let (Some(begin), Some(end)) = (self.at(begin), self.at(end)) else {
            return;
        };
        let Some(owner) = self.storage.add_name(owner) else {
            return;
        };
        self.storage.add_scope(StorageScope { owner, begin, end });
    }

    fn record_qualifier(&mut self, name: &NameHierarchy, location: ParseLocation) {
        if !self.accepting() {
            return;
        }
        let Some(location) = self.at(location) else {
            return;
        };
        if let Some(name) = self.storage.add_name(name) {
            self.storage.add_qualifier(StorageQualifier { name, location });
        }
    }

    fn record_comment(&mut self, location: ParseLocation) {
        if !self.accepting() {
            return;
        }
        if let Some(location) = self.at(location) {
            self.storage.add_comment(StorageComment { location });
        }
    }

    fn record_error(&mut self, message: &str, fatal: bool, location: ParseLocation) {
        if !self.accepting() {
            return;
        }
        if let Some(location) = self.at(location) {
            self.storage.add_error(StorageError {
                message: message.to_string(),
                fatal,
                location,
            });
        }
    }

    fn is_interrupted(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
