//! Tree-sitter based Java front end.
//!
//! Indexing a file takes two passes over the syntax tree: [`model`] collects
//! every declaration and names it, then [`recorder`] walks the tree again and
//! reports symbols, references, locals, scopes and qualifiers to the client.

mod constants;
mod expressions;
mod model;
mod naming;
mod recorder;
mod types;

use crate::command::IndexerCommandJava;
use model::FileModel;
use recorder::Recorder;
use std::path::Path;
use tracing::debug;
use trailscope_api::LanguageType;
use trailscope_core::parser::utils::{new_parser, parse_text, record_comments, record_syntax_errors};
use trailscope_core::text::TextAccess;
use trailscope_core::{FrontEnd, IndexerCommand, ParserClient, Result};
use tree_sitter::Language;

pub struct JavaParser {
    language: Language,
}

impl JavaParser {
    pub fn new() -> Result<Self> {
        let language: Language = tree_sitter_java::LANGUAGE.into();
        // Fail early on an ABI mismatch instead of on the first file.
        new_parser(&language)?;
        Ok(Self { language })
    }

    /// Parses `source` as the content of `path` and reports its facts.
    pub fn index_source(
        &self,
        path: &Path,
        source: &str,
        client: &mut dyn ParserClient,
    ) -> Result<()> {
        let mut parser = new_parser(&self.language)?;
        let tree = parse_text(&mut parser, source)?;
        let root = tree.root_node();

        client.record_file(path, LanguageType::Java);
        let errors = record_syntax_errors(root, source, client);
        record_comments(root, constants::COMMENT_KINDS, client);

        let model = FileModel::build(root, source, path);
        debug!(
            "{}: {} types, {} callables, {} syntax errors",
            path.display(),
            model.types.len(),
            model.callables.len(),
            errors
        );
        Recorder::new(&model, client).run(root);
        Ok(())
    }
}

impl FrontEnd<IndexerCommandJava> for JavaParser {
    fn index_file(
        &self,
        command: &IndexerCommandJava,
        text: &TextAccess,
        client: &mut dyn ParserClient,
    ) -> Result<()> {
        self.index_source(command.source_file_path(), text.text(), client)
    }
}
