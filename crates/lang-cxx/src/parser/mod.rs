//! Tree-sitter based C and C++ front end.
//!
//! Like the Java front end this takes two passes: [`model`] collects the
//! declarations of the file keyed by their `::` path, then [`recorder`]
//! reports symbols, references, locals, scopes and qualifiers. C sources are
//! parsed with the C++ grammar.
//!
//! A command's `-D` flags count as macro definitions in every file it
//! indexes. Included headers under the command's indexed paths are indexed
//! after the source file unless an exclude filter matches them.

mod constants;
mod expressions;
mod flags;
mod includes;
mod model;
mod naming;
mod recorder;
mod types;

use crate::command::IndexerCommandCxx;
use flags::CompilerFlags;
use includes::{Include, IncludeScope, include_directives};
use model::FileModel;
use recorder::Recorder;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use trailscope_api::{DefinitionKind, LanguageType, SymbolDeclaration, SymbolKind};
use trailscope_core::parser::utils::{new_parser, parse_text, record_comments, record_syntax_errors};
use trailscope_core::text::TextAccess;
use trailscope_core::{FrontEnd, IndexerCommand, ParserClient, Result};
use tree_sitter::Language;

pub struct CxxParser {
    language: Language,
}

impl CxxParser {
    pub fn new() -> Result<Self> {
        let language: Language = tree_sitter_cpp::LANGUAGE.into();
        new_parser(&language)?;
        Ok(Self { language })
    }

    /// Parses `source` as the content of `path` and reports its facts.
    pub fn index_source(
        &self,
        path: &Path,
        source: &str,
        language: LanguageType,
        client: &mut dyn ParserClient,
    ) -> Result<()> {
        self.index_unit(path, source, language, &[], client)?;
        Ok(())
    }

    /// Indexes one file and returns the includes it names.
    fn index_unit(
        &self,
        path: &Path,
        source: &str,
        language: LanguageType,
        defines: &[String],
        client: &mut dyn ParserClient,
    ) -> Result<Vec<Include>> {
        let mut parser = new_parser(&self.language)?;
        let tree = parse_text(&mut parser, source)?;
        let root = tree.root_node();

        client.record_file(path, language);
        for name in defines {
            let name = naming::path_name(std::slice::from_ref(name));
            let symbol =
                SymbolDeclaration::new(name, SymbolKind::Macro).with_definition(DefinitionKind::Explicit);
            client.record_symbol(&symbol);
        }
        let errors = record_syntax_errors(root, source, client);
        record_comments(root, constants::COMMENT_KINDS, client);

        let model = FileModel::build(root, source, path, defines);
        debug!(
            "{}: {} types, {} callables, {} syntax errors",
            path.display(),
            model.type_count(),
            model.callable_count(),
            errors
        );
        Recorder::new(&model, client).run(root);
        Ok(include_directives(root, source))
    }

    /// Indexes the headers reachable from the translation unit, breadth
    /// first, each at most once.
    fn index_headers(
        &self,
        command: &IndexerCommandCxx,
        flags: &CompilerFlags,
        includes: Vec<Include>,
        client: &mut dyn ParserClient,
    ) -> Result<()> {
        let source_path = command.source_file_path();
        let scope = IncludeScope::new(
            command.working_directory(),
            command.indexed_paths(),
            command.exclude_filters(),
            &flags.include_dirs,
        );
        let origin = flags::absolute_in(command.working_directory(), source_path);
        let mut visited = HashSet::from([origin.clone()]);
        let mut pending: VecDeque<(PathBuf, Include)> = includes
            .into_iter()
            .map(|include| (parent_of(&origin), include))
            .collect();

        while let Some((dir, include)) = pending.pop_front() {
            if client.is_interrupted() {
                break;
            }
            let Some(header) = scope.resolve(&include, &dir) else {
                debug!("{}: cannot resolve {:?}", source_path.display(), include.target);
                continue;
            };
            if !scope.admits(&header) || !visited.insert(header.clone()) {
                continue;
            }
            let text = match TextAccess::from_file(&header) {
                Ok(text) => text,
                Err(e) => {
                    warn!("{}: {}", header.display(), e);
                    continue;
                }
            };
            let language = language_of(&header, command.language_standard());
            let nested = self.index_unit(&header, text.text(), language, &flags.defines, client)?;
            let dir = parent_of(&header);
            pending.extend(nested.into_iter().map(|include| (dir.clone(), include)));
        }
        Ok(())
    }
}

fn parent_of(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// The language of a source file: its extension first, then the standard.
pub fn language_of(path: &Path, standard: &str) -> LanguageType {
    let by_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(LanguageType::from_extension)
        .filter(|language| *language != LanguageType::Java);
    match by_extension {
        Some(language) => language,
        None if standard.starts_with("c++") || standard.starts_with("gnu++") => LanguageType::Cpp,
        None if standard.is_empty() => LanguageType::Cpp,
        None => LanguageType::C,
    }
}

impl FrontEnd<IndexerCommandCxx> for CxxParser {
    fn index_file(
        &self,
        command: &IndexerCommandCxx,
        text: &TextAccess,
        client: &mut dyn ParserClient,
    ) -> Result<()> {
        let path = command.source_file_path();
        let language = language_of(path, command.language_standard());
        let flags = CompilerFlags::parse(command.compiler_flags(), command.working_directory());
        let includes = self.index_unit(path, text.text(), language, &flags.defines, client)?;
        if command.indexed_paths().is_empty() {
            return Ok(());
        }
        self.index_headers(command, &flags, includes, client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_decides_before_standard() {
        assert_eq!(language_of(Path::new("a.c"), "c++17"), LanguageType::C);
        assert_eq!(language_of(Path::new("a.hpp"), "c11"), LanguageType::Cpp);
    }

    #[test]
    fn unknown_extension_falls_back_to_standard() {
        assert_eq!(language_of(Path::new("a.inl"), "gnu++14"), LanguageType::Cpp);
        assert_eq!(language_of(Path::new("a.inl"), "c99"), LanguageType::C);
        assert_eq!(language_of(Path::new("a.inl"), ""), LanguageType::Cpp);
    }
}
