use super::source_group::{SOURCE_GROUP_KEY_PREFIX, SourceGroupSettings};
use crate::config::ConfigManager;
use crate::error::FilterError;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};
use trailscope_api::SourceGroupType;
use tracing::warn;

static ENV_VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)|%([A-Za-z_][A-Za-z0-9_]*)%")
        .expect("environment variable pattern compiles")
});

/// Project-wide settings the source groups resolve their paths against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSettings {
    project_file_path: PathBuf,
}

impl ProjectSettings {
    pub fn new(project_file_path: PathBuf) -> Self {
        Self { project_file_path }
    }

    pub fn project_file_path(&self) -> &Path {
        &self.project_file_path
    }

    pub fn project_directory(&self) -> PathBuf {
        match self.project_file_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Substitutes `$VAR`, `${VAR}`, `%VAR%` and a leading `~`.
    pub fn expand_path(&self, path: &str) -> Result<String, FilterError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(FilterError::Empty);
        }

        let mut missing = None;
        let expanded = ENV_VARIABLE.replace_all(path, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|m| m.as_str())
                .unwrap_or_default();
            match std::env::var(name) {
                Ok(value) => value,
                Err(_) => {
                    missing.get_or_insert_with(|| name.to_string());
                    String::new()
                }
            }
        });
        if let Some(name) = missing {
            return Err(FilterError::UndefinedVariable(name));
        }

        if expanded == "~" || expanded.starts_with("~/") {
            let home = dirs::home_dir().ok_or(FilterError::NoHomeDirectory)?;
            return Ok(format!("{}{}", home.to_string_lossy(), &expanded[1..]));
        }
        Ok(expanded.into_owned())
    }

    pub fn make_path_expanded_and_absolute(&self, path: &str) -> Result<PathBuf, FilterError> {
        let expanded = PathBuf::from(self.expand_path(path)?);
        if expanded.is_absolute() {
            Ok(expanded)
        } else {
            Ok(self.project_directory().join(expanded))
        }
    }

    /// Reads every `source_groups/source_group_<id>/type` entry and loads the
    /// group behind it. Groups with a missing or unknown type are skipped.
    pub fn load_source_groups(self: &Arc<Self>, config: &ConfigManager) -> Vec<SourceGroupSettings> {
        let mut ids: Vec<String> = Vec::new();
        for key in config.keys_with_prefix(SOURCE_GROUP_KEY_PREFIX) {
            let rest = &key[SOURCE_GROUP_KEY_PREFIX.len()..];
            let id = rest.split('/').next().unwrap_or_default();
            if !id.is_empty() && ids.last().map(String::as_str) != Some(id) {
                ids.push(id.to_string());
            }
        }

        let mut groups = Vec::new();
        for id in ids {
            let type_key = format!("{}{}/type", SOURCE_GROUP_KEY_PREFIX, id);
            let Some(group_type) = config.value::<SourceGroupType>(&type_key) else {
                warn!("Skipping source group '{}' without a valid type", id);
                continue;
            };
            let mut group = SourceGroupSettings::new(&id, group_type, Arc::clone(self));
            group.load(config);
            groups.push(group);
        }
        groups
    }

    /// Replaces every stored source group with `groups`.
    pub fn save_source_groups(config: &mut ConfigManager, groups: &[SourceGroupSettings]) {
        config.remove_with_prefix(SOURCE_GROUP_KEY_PREFIX);
        for group in groups {
            config.set_value(&format!("{}/type", group.key_prefix()), group.group_type());
            group.save(config);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> ProjectSettings {
        ProjectSettings::new(PathBuf::from("/work/demo/demo.srctrlprj"))
    }

    #[test]
    fn every_variable_spelling_is_recognized() {
        let names: Vec<&str> = ENV_VARIABLE
            .captures_iter("${HOME_A}/$HOME_B/%HOME_C%/plain")
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
            .map(|m| m.as_str())
            .collect();
        assert_eq!(names, vec!["HOME_A", "HOME_B", "HOME_C"]);
    }

    #[test]
    fn relative_paths_are_anchored_at_the_project_directory() {
        assert_eq!(
            project().make_path_expanded_and_absolute("src/gen").unwrap(),
            PathBuf::from("/work/demo/src/gen")
        );
        assert_eq!(
            project().make_path_expanded_and_absolute("/abs/x").unwrap(),
            PathBuf::from("/abs/x")
        );
    }

    #[test]
    fn environment_variables_are_expanded() {
        let key = "PATH";
        let value = std::env::var(key).unwrap();
        assert_eq!(project().expand_path("${PATH}/x").unwrap(), format!("{}/x", value));
        assert_eq!(project().expand_path("$PATH").unwrap(), value);
    }

    #[test]
    fn undefined_variables_are_errors() {
        let err = project()
            .expand_path("$TRAILSCOPE_SURELY_UNDEFINED_VAR/x")
            .unwrap_err();
        assert!(matches!(err, FilterError::UndefinedVariable(name) if name == "TRAILSCOPE_SURELY_UNDEFINED_VAR"));
    }

    #[test]
    fn bare_file_name_project_uses_current_directory() {
        let project = ProjectSettings::new(PathBuf::from("demo.srctrlprj"));
        assert_eq!(project.project_directory(), PathBuf::from("."));
    }
}
