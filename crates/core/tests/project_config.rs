use std::path::Path;
use std::sync::Arc;
use trailscope_api::{SourceGroupStatus, SourceGroupType};
use trailscope_core::config::ConfigManager;
use trailscope_core::settings::{ProjectSettings, SourceGroupSettings};

#[test]
fn project_file_round_trip_with_exclude_filters() {
    let dir = tempfile::tempdir().unwrap();
    let project_file = dir.path().join("demo.srctrlprj");
    let project = Arc::new(ProjectSettings::new(project_file.clone()));

    let mut java = SourceGroupSettings::new("java-main", SourceGroupType::JavaEmpty, Arc::clone(&project));
    java.set_exclude_filter_strings(vec!["src/generated/**".to_string(), "**/*Test.java".to_string()]);
    let mut cxx = SourceGroupSettings::new("native", SourceGroupType::CppEmpty, Arc::clone(&project));
    cxx.set_status(SourceGroupStatus::Disabled);
    cxx.set_standard("c++20");

    let mut config = ConfigManager::new();
    ProjectSettings::save_source_groups(&mut config, &[java.clone(), cxx.clone()]);
    config.save_to_file(&project_file).unwrap();

    let reloaded = ConfigManager::load_from_file(&project_file).unwrap();
    let groups = project.load_source_groups(&reloaded);
    assert_eq!(groups.len(), 2);

    let loaded_java = groups.iter().find(|g| g.id() == "java-main").unwrap();
    assert_eq!(*loaded_java, java);
    assert_eq!(loaded_java.standard(), "10");

    let filters = loaded_java.exclude_filters_expanded_and_absolute();
    assert_eq!(filters.len(), 2);
    assert!(filters[0].is_matching(&dir.path().join("src/generated/a/B.java")));
    assert!(filters[1].is_matching(&dir.path().join("src/main/FooTest.java")));
    assert!(!filters[1].is_matching(Path::new("/elsewhere/Foo.java")));

    let loaded_cxx = groups.iter().find(|g| g.id() == "native").unwrap();
    assert_eq!(loaded_cxx.status(), SourceGroupStatus::Disabled);
    assert_eq!(loaded_cxx.standard(), "c++20");
}

#[test]
fn groups_with_unknown_type_are_skipped() {
    let project = Arc::new(ProjectSettings::new("p/demo.srctrlprj".into()));
    let mut config = ConfigManager::new();
    config.set_value("source_groups/source_group_1/type", "Rust Source Group");
    config.set_value("source_groups/source_group_1/name", "crates");
    config.set_value("source_groups/source_group_2/type", "Java Source Group");

    let groups = project.load_source_groups(&config);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id(), "2");
    assert_eq!(groups[0].name(), "Java Source Group");
}
