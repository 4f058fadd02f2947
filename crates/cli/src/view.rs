use std::path::Path;
use tabled::Tabled;
use trailscope_core::IntermediateStorage;
use trailscope_core::settings::SourceGroupSettings;

/// One row of the `batch` summary.
#[derive(Tabled, Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub file: String,
    pub indexer: String,
    pub status: String,
    pub symbols: usize,
    pub references: usize,
    pub locals: usize,
    pub errors: usize,
}

impl FileSummary {
    pub fn completed(path: &Path, indexer: &str, storage: &IntermediateStorage) -> Self {
        Self {
            file: display_name(path),
            indexer: indexer.to_string(),
            status: "completed".to_string(),
            symbols: storage.symbols().count(),
            references: storage.edges().count(),
            locals: storage.local_symbols().count(),
            errors: storage.errors().count(),
        }
    }

    pub fn without_facts(path: &Path, indexer: &str, status: impl Into<String>) -> Self {
        Self {
            file: display_name(path),
            indexer: indexer.to_string(),
            status: status.into(),
            symbols: 0,
            references: 0,
            locals: 0,
            errors: 0,
        }
    }
}

/// One row of the `source-groups` listing.
#[derive(Tabled, Debug, Clone, PartialEq, Eq)]
pub struct SourceGroupView {
    pub id: String,
    pub name: String,
    #[tabled(rename = "type")]
    pub group_type: String,
    pub status: String,
    pub standard: String,
    #[tabled(rename = "exclude filters")]
    pub exclude_filters: String,
}

impl SourceGroupView {
    pub fn from_settings(group: &SourceGroupSettings) -> Self {
        let filters: Vec<String> = group
            .exclude_filters_expanded_and_absolute()
            .iter()
            .map(|filter| filter.as_str().to_string())
            .collect();
        Self {
            id: group.id().to_string(),
            name: group.name().to_string(),
            group_type: group.group_type().to_string(),
            status: group.status().to_string(),
            standard: group.standard(),
            exclude_filters: if filters.is_empty() {
                "-".to_string()
            } else {
                filters.join("\n")
            },
        }
    }
}

fn display_name(path: &Path) -> String {
    path.display().to_string()
}
