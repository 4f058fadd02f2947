use super::IntermediateStorage;
use super::model::SourceLocation;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use trailscope_api::{
    AccessKind, DefinitionKind, LanguageType, LocalAccess, ParseLocation, ReferenceKind,
    SymbolKind,
};

/// Self-contained, serializable view of a storage with names and files
/// spelled out instead of run-local ids.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StorageSnapshot {
    pub files: Vec<FileEntry>,
    pub symbols: Vec<SymbolEntry>,
    pub declarations: Vec<DeclarationEntry>,
    pub edges: Vec<EdgeEntry>,
    pub local_symbols: Vec<LocalSymbolEntry>,
    pub scopes: Vec<ScopeEntry>,
    pub qualifiers: Vec<LocatedName>,
    pub comments: Vec<Location>,
    pub errors: Vec<ErrorEntry>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub language: LanguageType,
    pub complete: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Location {
    pub file: PathBuf,
    pub range: ParseLocation,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub name: String,
    pub kind: SymbolKind,
    pub access: AccessKind,
    pub is_static: bool,
    pub definition: DefinitionKind,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DeclarationEntry {
    pub name: String,
    pub kind: SymbolKind,
    pub location: Location,
    pub scope: Option<ParseLocation>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EdgeEntry {
    pub kind: ReferenceKind,
    pub source: String,
    pub target: String,
    pub location: Location,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LocalSymbolEntry {
    pub scope: String,
    pub ordinal: u32,
    pub access: LocalAccess,
    pub location: Location,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ScopeEntry {
    pub owner: String,
    pub begin: Location,
    pub end: Location,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LocatedName {
    pub name: String,
    pub location: Location,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorEntry {
    pub message: String,
    pub fatal: bool,
    pub location: Location,
}

impl StorageSnapshot {
    pub fn from_storage(storage: &IntermediateStorage) -> Self {
        let name = |id| {
            storage
                .name(id)
                .map(|n| n.qualified_name_with_signature())
                .unwrap_or_default()
        };
        let location = |l: &SourceLocation| Location {
            file: storage
                .file(l.file)
                .map(|f| f.path.clone())
                .unwrap_or_default(),
            range: l.range,
        };

        Self {
            files: storage
                .files()
                .map(|(_, f)| FileEntry {
                    path: f.path.clone(),
                    language: f.language,
                    complete: f.complete,
                })
                .collect(),
            symbols: storage
                .symbols()
                .map(|s| SymbolEntry {
                    name: name(s.name),
                    kind: s.kind,
                    access: s.access,
                    is_static: s.is_static,
                    definition: s.definition,
                })
                .collect(),
            declarations: storage
                .declarations()
                .map(|d| DeclarationEntry {
                    name: name(d.name),
                    kind: d.kind,
                    location: location(&d.location),
                    scope: d.scope,
                })
                .collect(),
            edges: storage
                .edges()
                .map(|e| EdgeEntry {
                    kind: e.kind,
                    source: name(e.source),
                    target: name(e.target),
                    location: location(&e.location),
                })
                .collect(),
            local_symbols: storage
                .local_symbols()
                .map(|l| LocalSymbolEntry {
                    scope: name(l.scope),
                    ordinal: l.ordinal,
                    access: l.access,
                    location: location(&l.location),
                })
                .collect(),
            scopes: storage
                .scopes()
                .map(|s| ScopeEntry {
                    owner: name(s.owner),
                    begin: location(&s.begin),
                    end: location(&s.end),
                })
                .collect(),
            qualifiers: storage
                .qualifiers()
                .map(|q| LocatedName {
                    name: name(q.name),
                    location: location(&q.location),
                })
                .collect(),
            comments: storage
                .comments()
                .map(|c| location(&c.location))
                .collect(),
            errors: storage
                .errors()
                .map(|e| ErrorEntry {
                    message: e.message.clone(),
                    fatal: e.fatal,
                    location: location(&e.location),
                })
                .collect(),
        }
    }
}
