use std::any::Any;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use trailscope_api::IndexerCommandType;

/// One unit of indexing work: a file plus the compile context it needs.
///
/// The discriminant returned by `indexer_command_type` is fixed when the
/// command is built and always names the concrete command type.
pub trait IndexerCommand: Debug + Send + Sync + Any {
    fn indexer_command_type(&self) -> IndexerCommandType;

    fn source_file_path(&self) -> &Path;

    fn language_standard(&self) -> &str;

    /// Approximate in-memory footprint, for sizing queues.
    fn byte_size(&self, average_string_size: usize) -> usize;

    fn as_any(&self) -> &dyn Any;
}

/// A concrete command type, tied to its discriminant at compile time.
pub trait TypedIndexerCommand: IndexerCommand + Sized {
    const COMMAND_TYPE: IndexerCommandType;

    fn static_indexer_command_type() -> IndexerCommandType {
        Self::COMMAND_TYPE
    }
}

/// Views `command` as `C` if both the discriminant and the concrete type agree.
pub fn downcast_command<C: TypedIndexerCommand>(command: &dyn IndexerCommand) -> Option<&C> {
    if command.indexer_command_type() != C::COMMAND_TYPE {
        return None;
    }
    command.as_any().downcast_ref::<C>()
}

/// `base + strings * average + entries * (average + per-entry overhead)`.
///
/// Never zero for a non-empty base and grows with every list entry.
pub fn estimate_byte_size(
    base: usize,
    string_members: usize,
    list_entries: usize,
    average_string_size: usize,
) -> usize {
    let entry_overhead = std::mem::size_of::<PathBuf>();
    base + string_members * average_string_size
        + list_entries * (average_string_size + entry_overhead)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_grows_with_entries() {
        let small = estimate_byte_size(64, 2, 0, 10);
        let large = estimate_byte_size(64, 2, 3, 10);
        assert_eq!(small, 84);
        assert!(large > small);
        assert!(estimate_byte_size(64, 2, 0, 0) > 0);
    }
}
