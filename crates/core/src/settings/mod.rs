mod exclude_filters;
mod project;
mod source_group;

pub use exclude_filters::{ExcludeFilterSettings, FilePathFilter};
pub use project::ProjectSettings;
pub use source_group::{SOURCE_GROUP_KEY_PREFIX, SourceGroupSettings};
