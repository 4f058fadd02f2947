use serde::{Deserialize, Serialize};
use std::any::Any;
use std::path::{Path, PathBuf};
use trailscope_api::IndexerCommandType;
use trailscope_core::indexer::estimate_byte_size;
use trailscope_core::{IndexerCommand, TypedIndexerCommand};

/// Indexes one Java source file.
///
/// The class path is the only member that may be filled in after
/// construction; it is typically resolved from the build system later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexerCommandJava {
    source_file_path: PathBuf,
    language_standard: String,
    class_path: Vec<PathBuf>,
}

impl IndexerCommandJava {
    pub fn new(
        source_file_path: impl Into<PathBuf>,
        language_standard: impl Into<String>,
        class_path: Vec<PathBuf>,
    ) -> Self {
        Self {
            source_file_path: source_file_path.into(),
            language_standard: language_standard.into(),
            class_path,
        }
    }

    pub fn class_path(&self) -> &[PathBuf] {
        &self.class_path
    }

    pub fn set_class_path(&mut self, class_path: Vec<PathBuf>) {
        self.class_path = class_path;
    }
}

impl IndexerCommand for IndexerCommandJava {
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
        estimate_byte_size(
            std::mem::size_of::<Self>(),
            2,
            self.class_path.len(),
            average_string_size,
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl TypedIndexerCommand for IndexerCommandJava {
    const COMMAND_TYPE: IndexerCommandType = IndexerCommandType::Java;
}
