use super::exclude_filters::{ExcludeFilterSettings, FilePathFilter};
use super::project::ProjectSettings;
use crate::config::ConfigManager;
use std::sync::Arc;
use trailscope_api::{LanguageType, SourceGroupStatus, SourceGroupType};
use tracing::warn;

pub const SOURCE_GROUP_KEY_PREFIX: &str = "source_groups/source_group_";

/// Configuration of one source group.
///
/// The persisted form is a flat block of keys under
/// `source_groups/source_group_<id>/`. An empty standard means "use the
/// language default" and stays empty across save and load.
#[derive(Debug, Clone)]
pub struct SourceGroupSettings {
    id: String,
    name: String,
    group_type: SourceGroupType,
    status: SourceGroupStatus,
    standard: String,
    exclude_filters: ExcludeFilterSettings,
    project: Arc<ProjectSettings>,
}

impl SourceGroupSettings {
    pub fn new(id: &str, group_type: SourceGroupType, project: Arc<ProjectSettings>) -> Self {
        Self {
            id: id.to_string(),
            name: group_type.as_str().to_string(),
            group_type,
            status: SourceGroupStatus::Enabled,
            standard: String::new(),
            exclude_filters: ExcludeFilterSettings::default(),
            project,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn group_type(&self) -> SourceGroupType {
        self.group_type
    }

    pub fn language(&self) -> LanguageType {
        self.group_type.language()
    }

    pub fn status(&self) -> SourceGroupStatus {
        self.status
    }

    pub fn set_status(&mut self, status: SourceGroupStatus) {
        self.status = status;
    }

    /// The configured standard, or the language default when none is set.
    pub fn standard(&self) -> String {
        if self.standard.is_empty() {
            self.language().default_standard().to_string()
        } else {
            self.standard.clone()
        }
    }

    /// The standard exactly as configured, possibly empty.
    pub fn stored_standard(&self) -> &str {
        &self.standard
    }

    pub fn set_standard(&mut self, standard: impl Into<String>) {
        self.standard = standard.into();
    }

    pub fn project_settings(&self) -> &Arc<ProjectSettings> {
        &self.project
    }

    pub fn key_prefix(&self) -> String {
        format!("{}{}", SOURCE_GROUP_KEY_PREFIX, self.id)
    }

    pub fn exclude_filters(&self) -> &ExcludeFilterSettings {
        &self.exclude_filters
    }

    pub fn exclude_filter_strings(&self) -> &[String] {
        self.exclude_filters.exclude_filter_strings()
    }

    pub fn set_exclude_filter_strings(&mut self, filters: Vec<String>) {
        self.exclude_filters.set_exclude_filter_strings(filters);
    }

    /// Recomputed on every call so that environment and project moves are picked up.
    pub fn exclude_filters_expanded_and_absolute(&self) -> Vec<FilePathFilter> {
        self.exclude_filters.expanded_and_absolute(&self.project)
    }

    pub fn load(&mut self, config: &ConfigManager) {
        let key = self.key_prefix();

        let name: String = config.value_or_default(&format!("{key}/name"), String::new());
        if !name.is_empty() {
            self.name = name;
        }

        let status_key = format!("{key}/status");
        self.status = match config.value::<String>(&status_key) {
            None => SourceGroupStatus::Enabled,
            Some(token) => token.parse().unwrap_or_else(|_| {
                warn!("Unknown status '{}' for source group '{}'", token, self.id);
                SourceGroupStatus::Enabled
            }),
        };

        self.standard = config.value_or_default(&format!("{key}/standard"), String::new());
        self.exclude_filters
            .load(config, &format!("{key}/exclude_filters"));
    }

    pub fn save(&self, config: &mut ConfigManager) {
        let key = self.key_prefix();
        config.set_value(&format!("{key}/name"), &self.name);
        config.set_value(&format!("{key}/status"), self.status);
        config.set_value(&format!("{key}/standard"), &self.standard);
        self.exclude_filters
            .save(config, &format!("{key}/exclude_filters"));
    }

    /// Equality over id, name, type, status and the stored standard.
    pub fn equals(&self, other: &SourceGroupSettings) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.group_type == other.group_type
            && self.status == other.status
            && self.standard == other.standard
    }
}

/// Full equality: `equals` plus the exclude filters.
impl PartialEq for SourceGroupSettings {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other) && self.exclude_filters.equals(&other.exclude_filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn project() -> Arc<ProjectSettings> {
        Arc::new(ProjectSettings::new(PathBuf::from("/work/demo/demo.srctrlprj")))
    }

    #[test]
    fn defaults_follow_the_type() {
        let group = SourceGroupSettings::new("7", SourceGroupType::JavaEmpty, project());
        assert_eq!(group.name(), "Java Source Group");
        assert_eq!(group.status(), SourceGroupStatus::Enabled);
        assert_eq!(group.stored_standard(), "");
        assert_eq!(group.standard(), "10");
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut group = SourceGroupSettings::new("1", SourceGroupType::CppEmpty, project());
        group.set_name("engine");
        group.set_status(SourceGroupStatus::Disabled);
        group.set_exclude_filter_strings(vec!["third_party/**".to_string()]);

        let mut config = ConfigManager::new();
        group.save(&mut config);

        let mut loaded = SourceGroupSettings::new("1", SourceGroupType::CppEmpty, project());
        loaded.load(&config);
        assert!(loaded.equals(&group));
        assert_eq!(loaded, group);
        assert_eq!(loaded.stored_standard(), "");
        assert_eq!(loaded.standard(), "c++17");
    }

    #[test]
    fn explicit_standard_wins_over_default() {
        let mut group = SourceGroupSettings::new("2", SourceGroupType::CEmpty, project());
        group.set_standard("c99");
        assert_eq!(group.standard(), "c99");
        group.set_standard("");
        assert_eq!(group.standard(), "c11");
    }

    #[test]
    fn missing_keys_keep_defaults() {
        let config = ConfigManager::new();
        let mut group = SourceGroupSettings::new("3", SourceGroupType::JavaMaven, project());
        group.load(&config);
        assert_eq!(group.name(), "Maven Source Group");
        assert_eq!(group.status(), SourceGroupStatus::Enabled);
        assert_eq!(group.stored_standard(), "");
    }

    #[test]
    fn unknown_status_token_means_enabled() {
        let mut config = ConfigManager::new();
        config.set_value("source_groups/source_group_4/status", "paused");
        let mut group = SourceGroupSettings::new("4", SourceGroupType::JavaEmpty, project());
        group.set_status(SourceGroupStatus::Disabled);
        group.load(&config);
        assert_eq!(group.status(), SourceGroupStatus::Enabled);
    }

    #[test]
    fn equality_ignores_filters_but_partial_eq_does_not() {
        let a = SourceGroupSettings::new("5", SourceGroupType::JavaEmpty, project());
        let mut b = a.clone();
        b.set_exclude_filter_strings(vec!["gen/".to_string()]);
        assert!(a.equals(&b));
        assert_ne!(a, b);
        b.set_name("other");
        assert!(!a.equals(&b));
    }

    #[test]
    fn project_round_trip_of_all_groups() {
        let project = project();
        let mut java = SourceGroupSettings::new("1", SourceGroupType::JavaGradle, Arc::clone(&project));
        java.set_standard("17");
        let cxx = SourceGroupSettings::new("2", SourceGroupType::CxxCdb, Arc::clone(&project));

        let mut config = ConfigManager::new();
        ProjectSettings::save_source_groups(&mut config, &[java.clone(), cxx.clone()]);

        let loaded = project.load_source_groups(&config);
        assert_eq!(loaded, vec![java, cxx]);
    }
}
