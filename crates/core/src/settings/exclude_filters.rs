use super::project::ProjectSettings;
use crate::config::ConfigManager;
use crate::error::FilterError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;
use tracing::warn;

const EXCLUDE_FILTER_KEY: &str = "exclude_filter";

/// Matches absolute file paths against a wildcard pattern.
///
/// `*` matches within one path component, `**` across components. A pattern
/// without wildcards matches the path itself and everything below it.
#[derive(Debug, Clone)]
pub struct FilePathFilter {
    pattern: String,
    globs: GlobSet,
}

impl FilePathFilter {
    pub fn new(pattern: &str) -> Result<Self, FilterError> {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(FilterError::Empty);
        }
        let normalized = pattern.replace('\\', "/");

        let mut globs = Vec::new();
        if normalized.contains(['*', '?']) {
            globs.push(normalized);
        } else {
            let directory = normalized.trim_end_matches('/');
            if !normalized.ends_with('/') {
                globs.push(directory.to_string());
            }
            globs.push(format!("{}/**", directory));
        }

        let mut builder = GlobSetBuilder::new();
        for glob in &globs {
            builder.add(GlobBuilder::new(glob).literal_separator(true).build()?);
        }

        Ok(Self {
            pattern: pattern.to_string(),
            globs: builder.build()?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn is_matching(&self, path: &Path) -> bool {
        let path = path.to_string_lossy().replace('\\', "/");
        self.globs.is_match(path.as_str())
    }
}

/// Exclude filters of a source group, stored as raw strings and expanded on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeFilterSettings {
    filters: Vec<String>,
}

impl ExcludeFilterSettings {
    pub fn new(filters: Vec<String>) -> Self {
        Self { filters }
    }

    pub fn exclude_filter_strings(&self) -> &[String] {
        &self.filters
    }

    pub fn set_exclude_filter_strings(&mut self, filters: Vec<String>) {
        self.filters = filters;
    }

    /// Compiles every filter against the project directory. Filters that fail
    /// to expand or compile are skipped with a warning.
    pub fn expanded_and_absolute(&self, project: &ProjectSettings) -> Vec<FilePathFilter> {
        self.filters
            .iter()
            .filter_map(|raw| {
                let compiled = project
                    .make_path_expanded_and_absolute(raw)
                    .and_then(|path| FilePathFilter::new(&path.to_string_lossy()));
                match compiled {
                    Ok(filter) => Some(filter),
                    Err(e) => {
                        warn!("Skipping exclude filter '{}': {}", raw, e);
                        None
                    }
                }
            })
            .collect()
    }

    pub fn equals(&self, other: &ExcludeFilterSettings) -> bool {
        self.filters == other.filters
    }

    pub fn load(&mut self, config: &ConfigManager, key: &str) {
        self.filters = config.values_or_default(&format!("{}/{}", key, EXCLUDE_FILTER_KEY), vec![]);
    }

    pub fn save(&self, config: &mut ConfigManager, key: &str) {
        config.set_values(&format!("{}/{}", key, EXCLUDE_FILTER_KEY), &self.filters);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn single_star_stays_inside_a_component() {
        let filter = FilePathFilter::new("/p/src/*.java").unwrap();
        assert!(filter.is_matching(Path::new("/p/src/A.java")));
        assert!(!filter.is_matching(Path::new("/p/src/sub/A.java")));
    }

    #[test]
    fn double_star_crosses_components() {
        let filter = FilePathFilter::new("/p/**/generated/*").unwrap();
        assert!(filter.is_matching(Path::new("/p/a/b/generated/X.java")));
        assert!(!filter.is_matching(Path::new("/q/generated/X.java")));
    }

    #[test]
    fn plain_directory_matches_subtree() {
        let filter = FilePathFilter::new("/p/build").unwrap();
        assert!(filter.is_matching(Path::new("/p/build")));
        assert!(filter.is_matching(Path::new("/p/build/out/A.class")));
        assert!(!filter.is_matching(Path::new("/p/buildSrc/A.java")));
    }

    #[test]
    fn trailing_slash_matches_only_below_the_directory() {
        let filter = FilePathFilter::new("/p/build/").unwrap();
        assert!(!filter.is_matching(Path::new("/p/build")));
        assert!(filter.is_matching(Path::new("/p/build/A.class")));
    }

    #[test]
    fn question_mark_matches_one_character_of_a_component() {
        let filter = FilePathFilter::new("/p/gen?/A.java").unwrap();
        assert!(filter.is_matching(Path::new("/p/gen1/A.java")));
        assert!(!filter.is_matching(Path::new("/p/gen/A.java")));
        assert!(!filter.is_matching(Path::new("/p/gen/x/A.java")));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let filter = FilePathFilter::new("/p/a+b/(x)").unwrap();
        assert!(filter.is_matching(Path::new("/p/a+b/(x)/f.c")));
        assert!(!filter.is_matching(Path::new("/p/aab/x/f.c")));
    }

    #[test]
    fn malformed_filters_are_skipped() {
        let project = ProjectSettings::new(PathBuf::from("/work/project.json"));
        let settings = ExcludeFilterSettings::new(vec![
            "  ".to_string(),
            "${TRAILSCOPE_SURELY_UNDEFINED_VAR}/x".to_string(),
            "third_party/**".to_string(),
        ]);

        let filters = settings.expanded_and_absolute(&project);
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].as_str(), "/work/third_party/**");
    }

    #[test]
    fn load_and_save_use_the_given_key() {
        let mut config = ConfigManager::new();
        let settings = ExcludeFilterSettings::new(vec!["a/*".to_string(), "b".to_string()]);
        settings.save(&mut config, "group/exclude_filters");
        assert!(config.is_value_defined("group/exclude_filters/exclude_filter"));

        let mut loaded = ExcludeFilterSettings::default();
        loaded.load(&config, "group/exclude_filters");
        assert!(loaded.equals(&settings));
    }
}
