use std::path::Path;
use trailscope_api::{
    LanguageType, LocalAccess, NameHierarchy, ParseLocation, ReferenceKind, SymbolDeclaration,
};

/// The sink a language front end drives while parsing one file.
///
/// Facts may arrive in any order and any number of times; implementations
/// normalize and deduplicate. Locations refer to the file most recently
/// announced through [`ParserClient::record_file`]. None of the operations
/// fail: problems in the source are reported through `record_error`.
pub trait ParserClient {
    fn record_file(&mut self, path: &Path, language: LanguageType);

    fn record_symbol(&mut self, symbol: &SymbolDeclaration);

    /// An edge from `context` (the enclosing declaration) to `target`.
    fn record_reference(
        &mut self,
        kind: ReferenceKind,
        target: &NameHierarchy,
        context: &NameHierarchy,
        location: ParseLocation,
    );

    /// A local variable, parameter or similar. All records that share
    /// `scope` and `declared_at` belong to the same local.
    fn record_local_symbol(
        &mut self,
        scope: &NameHierarchy,
        declared_at: ParseLocation,
        location: ParseLocation,
        access: LocalAccess,
    );

    /// A lexical scope, bounded by its opening and closing points.
    fn record_scope(&mut self, owner: &NameHierarchy, begin: ParseLocation, end: ParseLocation);

    /// A prefix like `foo` in `foo.X.bar()`, resolved to what it names.
    fn record_qualifier(&mut self, name: &NameHierarchy, location: ParseLocation);

    fn record_comment(&mut self, location: ParseLocation);

    fn record_error(&mut self, message: &str, fatal: bool, location: ParseLocation);

    /// Polled by front ends between declarations.
    fn is_interrupted(&self) -> bool;
}
