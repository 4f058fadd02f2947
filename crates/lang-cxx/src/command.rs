use serde::{Deserialize, Serialize};
use std::any::Any;
use std::path::{Path, PathBuf};
use trailscope_api::IndexerCommandType;
use trailscope_core::indexer::estimate_byte_size;
use trailscope_core::settings::SourceGroupSettings;
use trailscope_core::{IndexerCommand, TypedIndexerCommand};

/// Indexes one C or C++ translation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerCommandCxx {
    source_file_path: PathBuf,
    language_standard: String,
    /// Files whose facts should be kept, e.g. the headers of the project.
    indexed_paths: Vec<PathBuf>,
    exclude_filters: Vec<String>,
    working_directory: PathBuf,
    compiler_flags: Vec<String>,
}

impl IndexerCommandCxx {
    pub fn new(
        source_file_path: impl Into<PathBuf>,
        language_standard: impl Into<String>,
        working_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_file_path: source_file_path.into(),
            language_standard: language_standard.into(),
            indexed_paths: Vec::new(),
            exclude_filters: Vec::new(),
            working_directory: working_directory.into(),
            compiler_flags: Vec::new(),
        }
    }

    /// A command for a file of `group`: its standard and its exclude
    /// filters, expanded against the project directory.
    pub fn for_source_group(
        source_file_path: impl Into<PathBuf>,
        group: &SourceGroupSettings,
        working_directory: impl Into<PathBuf>,
    ) -> Self {
        let exclude_filters = group
            .exclude_filters_expanded_and_absolute()
            .iter()
            .map(|filter| filter.as_str().to_string())
            .collect();
        Self::new(source_file_path, group.standard(), working_directory)
            .with_exclude_filters(exclude_filters)
    }

    pub fn with_indexed_paths(mut self, indexed_paths: Vec<PathBuf>) -> Self {
        self.indexed_paths = indexed_paths;
        self
    }

    pub fn with_exclude_filters(mut self, exclude_filters: Vec<String>) -> Self {
        self.exclude_filters = exclude_filters;
        self
    }

    pub fn with_compiler_flags(mut self, compiler_flags: Vec<String>) -> Self {
        self.compiler_flags = compiler_flags;
        self
    }

    pub fn indexed_paths(&self) -> &[PathBuf] {
        &self.indexed_paths
    }

    pub fn exclude_filters(&self) -> &[String] {
        &self.exclude_filters
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    pub fn compiler_flags(&self) -> &[String] {
        &self.compiler_flags
    }
}

impl IndexerCommand for IndexerCommandCxx {
    fn indexer_command_type(&self) -> IndexerCommandType {
        Self::COMMAND_TYPE
    }

    fn source_file_path(&self) -> &Path {
        &self.source_file_path
    }

    fn language_standard(&self) -> &str {
        &self.language_standard
    }

    fn byte_size(&self, average_string_size: usize) -> usize {
        let entries =
            self.indexed_paths.len() + self.exclude_filters.len() + self.compiler_flags.len();
        estimate_byte_size(std::mem::size_of::<Self>(), 3, entries, average_string_size)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl TypedIndexerCommand for IndexerCommandCxx {
    const COMMAND_TYPE: IndexerCommandType = IndexerCommandType::Cxx;
}
