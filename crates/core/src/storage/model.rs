use super::names::NameId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use trailscope_api::{
    AccessKind, DefinitionKind, LanguageType, LocalAccess, ParseLocation, ReferenceKind,
    SymbolKind,
};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceLocation {
    pub file: FileId,
    pub range: ParseLocation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageFile {
    pub path: PathBuf,
    pub language: LanguageType,
    /// Cleared when a fatal error was reported for the file.
    pub complete: bool,
}

/// One symbol, however many times it was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageSymbol {
    pub name: NameId,
    pub kind: SymbolKind,
    pub access: AccessKind,
    pub is_static: bool,
    pub definition: DefinitionKind,
}

impl StorageSymbol {
    /// Folds a re-declaration into this record. The strongest definition
    /// kind wins and brings its kind along; access is filled in if unknown.
    /// A symbol declared static anywhere stays static.
    pub fn merge(&mut self, other: &StorageSymbol) {
        self.is_static |= other.is_static;
        if other.definition > self.definition {
            self.definition = other.definition;
            self.kind = other.kind;
            if other.access != AccessKind::None {
                self.access = other.access;
            }
        } else if self.access == AccessKind::None {
            self.access = other.access;
        }
    }
}

/// A declaration site. Deduplicated on all fields, which makes
/// (name, kind, location) the effective key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageDeclaration {
    pub name: NameId,
    pub kind: SymbolKind,
    pub location: SourceLocation,
    pub scope: Option<ParseLocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageEdge {
    pub kind: ReferenceKind,
    pub source: NameId,
    pub target: NameId,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageLocalSymbol {
    /// The declaration that encloses the local.
    pub scope: NameId,
    /// Identity of the local within `scope`, in order of first sight.
    pub ordinal: u32,
    pub location: SourceLocation,
    pub access: LocalAccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageScope {
    pub owner: NameId,
    pub begin: SourceLocation,
    pub end: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageQualifier {
    pub name: NameId,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StorageComment {
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageError {
    pub message: String,
    pub fatal: bool,
    pub location: SourceLocation,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbol(kind: SymbolKind, access: AccessKind, definition: DefinitionKind) -> StorageSymbol {
        StorageSymbol {
            name: NameId(0),
            kind,
            access,
            is_static: false,
            definition,
        }
    }

    #[test]
    fn definition_upgrades_forward_declaration() {
        let mut forward = symbol(SymbolKind::Class, AccessKind::None, DefinitionKind::Declaration);
        forward.merge(&symbol(SymbolKind::Struct, AccessKind::Public, DefinitionKind::Explicit));
        assert_eq!(forward.definition, DefinitionKind::Explicit);
        assert_eq!(forward.kind, SymbolKind::Struct);
        assert_eq!(forward.access, AccessKind::Public);
    }

    #[test]
    fn weaker_declaration_keeps_existing_record() {
        let mut defined = symbol(SymbolKind::Function, AccessKind::Private, DefinitionKind::Explicit);
        defined.merge(&symbol(SymbolKind::Function, AccessKind::Public, DefinitionKind::Declaration));
        assert_eq!(defined.access, AccessKind::Private);
        assert_eq!(defined.definition, DefinitionKind::Explicit);
    }

    #[test]
    fn static_prototype_survives_out_of_line_definition() {
        let mut prototype = symbol(SymbolKind::Method, AccessKind::Public, DefinitionKind::Declaration);
        prototype.is_static = true;
        prototype.merge(&symbol(SymbolKind::Method, AccessKind::None, DefinitionKind::Explicit));
        assert!(prototype.is_static);
        assert_eq!(prototype.access, AccessKind::Public);
        assert_eq!(prototype.definition, DefinitionKind::Explicit);
    }
}
