use crate::view::SourceGroupView;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tabled::{Table, settings::Style};
use tracing::info;
use trailscope_core::config::ConfigManager;
use trailscope_core::settings::ProjectSettings;

/// Loads the groups stored in `config`, resolving paths against `project`.
pub fn describe(config: &Path, project: &Path) -> anyhow::Result<Vec<SourceGroupView>> {
    let config = ConfigManager::load_from_file(config)
        .with_context(|| format!("failed to read configuration {}", config.display()))?;
    let project = Arc::new(ProjectSettings::new(project.to_path_buf()));
    let groups = project.load_source_groups(&config);
    info!(
        "Loaded {} source groups for {}",
        groups.len(),
        project.project_file_path().display()
    );
    Ok(groups.iter().map(SourceGroupView::from_settings).collect())
}

pub fn run(config: &Path, project: &Path) -> anyhow::Result<()> {
    let views = describe(config, project)?;
    if views.is_empty() {
        println!("No source groups in {}", config.display());
        return Ok(());
    }
    println!("{}", Table::new(&views).with(Style::psql()));
    Ok(())
}
