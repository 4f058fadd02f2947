//! Flat key/value configuration store.
//!
//! Keys are slash-separated paths such as `source_groups/source_group_1/name`.
//! Every key holds an ordered list of values so that list settings (exclude
//! filters, class paths) share one representation with scalar settings.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigManager {
    values: BTreeMap<String, Vec<String>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_value_defined(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// First value stored under `key`, parsed. Unparsable values are logged and ignored.
    pub fn value<T: FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.values.get(key)?.first()?;
        match raw.parse::<T>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring malformed value '{}' for key '{}'", raw, key);
                None
            }
        }
    }

    pub fn value_or_default<T: FromStr>(&self, key: &str, default: T) -> T {
        self.value(key).unwrap_or(default)
    }

    pub fn values_or_default<T: FromStr>(&self, key: &str, default: Vec<T>) -> Vec<T> {
        let Some(raw) = self.values.get(key) else {
            return default;
        };
        raw.iter()
            .filter_map(|v| match v.parse::<T>() {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    warn!("Ignoring malformed value '{}' in list '{}'", v, key);
                    None
                }
            })
            .collect()
    }

    pub fn set_value(&mut self, key: &str, value: impl Display) {
        self.values.insert(key.to_string(), vec![value.to_string()]);
    }

    pub fn set_values<T: Display>(&mut self, key: &str, values: &[T]) {
        self.values.insert(
            key.to_string(),
            values.iter().map(ToString::to_string).collect(),
        );
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> {
        self.values
            .range(prefix.to_string()..)
            .map(|(k, _)| k.as_str())
            .take_while(move |k| k.starts_with(prefix))
    }

    /// Removes every key starting with `prefix`. Returns how many were removed.
    pub fn remove_with_prefix(&mut self, prefix: &str) -> usize {
        let doomed: Vec<String> = self
            .keys_with_prefix(prefix)
            .map(ToString::to_string)
            .collect();
        for key in &doomed {
            self.values.remove(key);
        }
        doomed.len()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_and_list_values() {
        let mut config = ConfigManager::new();
        config.set_value("a/name", "core");
        config.set_values("a/filters", &["*.gen.java", "build/"]);

        assert_eq!(config.value::<String>("a/name").as_deref(), Some("core"));
        assert_eq!(
            config.values_or_default::<String>("a/filters", vec![]),
            vec!["*.gen.java".to_string(), "build/".to_string()]
        );
        assert_eq!(config.value_or_default("a/missing", 7u32), 7);
    }

    #[test]
    fn malformed_value_falls_back_to_default() {
        let mut config = ConfigManager::new();
        config.set_value("count", "seven");
        assert_eq!(config.value_or_default("count", 3u32), 3);
    }

    #[test]
    fn prefix_queries_stop_at_the_prefix_boundary() {
        let mut config = ConfigManager::new();
        config.set_value("source_groups/source_group_1/name", "x");
        config.set_value("source_groups/source_group_1/status", "enabled");
        config.set_value("source_groups/source_group_2/name", "y");
        config.set_value("version", 3);

        let keys: Vec<_> = config
            .keys_with_prefix("source_groups/source_group_1/")
            .collect();
        assert_eq!(keys.len(), 2);

        assert_eq!(config.remove_with_prefix("source_groups/"), 3);
        assert!(config.is_value_defined("version"));
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("project.json");

        let mut config = ConfigManager::new();
        config.set_values("paths", &["a", "b"]);
        config.save_to_file(&path).unwrap();

        assert_eq!(ConfigManager::load_from_file(&path).unwrap(), config);
    }
}
