use super::IntermediateStorage;
use super::model::{SourceLocation, StorageDeclaration};
use std::fmt::Write;
use trailscope_api::{AccessKind, ParseLocation, ReferenceKind, SymbolKind};

/// Renders stored facts as stable, human-readable lines, e.g.
/// `public foo.A <2:1 <2:14 2:14> 4:1>` for a class whose name spans
/// 2:14 and whose body closes at 4:1.
pub struct FactDigest<'a> {
    storage: &'a IntermediateStorage,
}

impl<'a> FactDigest<'a> {
    pub fn new(storage: &'a IntermediateStorage) -> Self {
        Self { storage }
    }

    pub fn declarations(&self) -> Vec<String> {
        self.storage
            .declarations()
            .map(|d| self.declaration_line(d))
            .collect()
    }

    pub fn declarations_of(&self, kinds: &[SymbolKind]) -> Vec<String> {
        self.storage
            .declarations()
            .filter(|d| kinds.contains(&d.kind))
            .map(|d| self.declaration_line(d))
            .collect()
    }

    pub fn edges(&self, kind: ReferenceKind) -> Vec<String> {
        self.storage
            .edges_of_kind(kind)
            .map(|e| {
                format!(
                    "{} -> {} {}",
                    self.signature(e.source),
                    self.signature(e.target),
                    e.location.range
                )
            })
            .collect()
    }

    pub fn local_symbols(&self) -> Vec<String> {
        self.storage
            .local_symbols()
            .map(|l| {
                format!(
                    "{}<{}> {}",
                    self.qualified(l.scope),
                    l.ordinal,
                    l.location.range
                )
            })
            .collect()
    }

    /// Two lines per scope, one for each brace.
    pub fn scopes(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for scope in self.storage.scopes() {
            let anchor = self.anchor(&scope.begin);
            lines.push(format!("{} {}", anchor, scope.begin.range));
            lines.push(format!("{} {}", anchor, scope.end.range));
        }
        lines
    }

    pub fn qualifiers(&self) -> Vec<String> {
        self.storage
            .qualifiers()
            .map(|q| format!("{} {}", self.qualified(q.name), q.location.range))
            .collect()
    }

    pub fn comments(&self) -> Vec<String> {
        self.storage
            .comments()
            .map(|c| format!("comment {}", c.location.range))
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.storage
            .errors()
            .map(|e| format!("{} {}", e.message, e.location.range))
            .collect()
    }

    /// All categories, one section each, for terminal output.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut section = |title: &str, lines: Vec<String>| {
            if lines.is_empty() {
                return;
            }
            let _ = writeln!(out, "{}:", title);
            for line in lines {
                let _ = writeln!(out, "  {}", line);
            }
        };
        section("declarations", self.declarations());
        for kind in [
            ReferenceKind::Inheritance,
            ReferenceKind::Override,
            ReferenceKind::Call,
            ReferenceKind::TypeUsage,
            ReferenceKind::TypeArgument,
            ReferenceKind::Usage,
        ] {
            section(kind.as_str(), self.edges(kind));
        }
        section("local symbols", self.local_symbols());
        section("scopes", self.scopes());
        section("qualifiers", self.qualifiers());
        section("comments", self.comments());
        section("errors", self.errors());
        out
    }

    fn declaration_line(&self, declaration: &StorageDeclaration) -> String {
        let mut line = String::new();
        if let Some(symbol) = self.storage.symbol(declaration.name) {
            if symbol.access != AccessKind::None {
                line.push_str(symbol.access.as_str());
                line.push(' ');
            }
            if symbol.is_static {
                line.push_str("static ");
            }
        }
        line.push_str(&self.signature(declaration.name));
        line.push(' ');
        line.push_str(&framed(declaration.location.range, declaration.scope));
        line
    }

    fn signature(&self, id: super::NameId) -> String {
        self.storage
            .name(id)
            .map(|n| n.qualified_name_with_signature())
            .unwrap_or_default()
    }

    fn qualified(&self, id: super::NameId) -> String {
        self.storage
            .name(id)
            .map(|n| n.qualified_name())
            .unwrap_or_default()
    }

    fn anchor(&self, begin: &SourceLocation) -> String {
        let file = self
            .storage
            .file(begin.file)
            .map(|f| f.path.display().to_string())
            .unwrap_or_default();
        format!("{}<{}:{}>", file, begin.range.start_line, begin.range.start_col)
    }
}

fn framed(location: ParseLocation, scope: Option<ParseLocation>) -> String {
    match scope {
        Some(scope) => format!(
            "<{}:{} {} {}:{}>",
            scope.start_line, scope.start_col, location, scope.end_line, scope.end_col
        ),
        None => location.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{StorageScope, StorageSymbol};
    use std::path::Path;
    use trailscope_api::{DefinitionKind, LanguageType, NameDelimiter, NameHierarchy};

    #[test]
    fn class_declaration_is_framed_by_its_scope() {
        let mut storage = IntermediateStorage::new();
        let file = storage.add_file(Path::new("input.java"), LanguageType::Java);
        let name = storage
            .add_name(&NameHierarchy::from_qualified(NameDelimiter::Dot, "foo.A"))
            .unwrap();
        storage.add_symbol(StorageSymbol {
            name,
            kind: SymbolKind::Class,
            access: AccessKind::Public,
            is_static: false,
            definition: DefinitionKind::Explicit,
        });
        storage.add_declaration(StorageDeclaration {
            name,
            kind: SymbolKind::Class,
            location: SourceLocation {
                file,
                range: ParseLocation::point(2, 14),
            },
            scope: Some(ParseLocation::new(2, 1, 4, 1)),
        });
        storage.add_scope(StorageScope {
            owner: name,
            begin: SourceLocation {
                file,
                range: ParseLocation::point(2, 16),
            },
            end: SourceLocation {
                file,
                range: ParseLocation::point(4, 1),
            },
        });

        let digest = FactDigest::new(&storage);
        assert_eq!(digest.declarations(), vec!["public foo.A <2:1 <2:14 2:14> 4:1>"]);
        assert_eq!(
            digest.scopes(),
            vec!["input.java<2:16> <2:16 2:16>", "input.java<2:16> <4:1 4:1>"]
        );
        assert!(digest.render().starts_with("declarations:\n"));
    }
}
