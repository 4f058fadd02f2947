use std::fs;
use std::path::{Path, PathBuf};
use trailscope_cli::{
    CommandOptions, OutputFormat, describe_source_groups, index_file, index_files,
};

fn write_source(dir: &Path, name: &str, source: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, source).expect("write source");
    path
}

#[test]
fn given_cpp_file_when_indexed_as_text_then_declarations_are_listed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_source(dir.path(), "sum.cpp", "int sum(int a, int b) { return a + b; }\n");

    let output = index_file(&path, &CommandOptions::default(), OutputFormat::Text).expect("index");

    assert!(output.starts_with("declarations:\n"), "{output}");
    assert!(output.contains("  int sum(int, int) <1:1 <1:5 1:7> 1:39>\n"), "{output}");
}

#[test]
fn given_java_file_when_indexed_as_json_then_snapshot_names_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_source(dir.path(), "A.java", "class A {}\n");

    let output = index_file(&path, &CommandOptions::default(), OutputFormat::Json).expect("index");
    let json: serde_json::Value = serde_json::from_str(&output).expect("valid json");

    let files = json["files"].as_array().expect("files");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["language"], "java");
    assert_eq!(files[0]["complete"], true);
}

#[test]
fn given_mixed_files_when_batched_then_each_gets_a_summary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let java = write_source(dir.path(), "A.java", "class A {}\n");
    let cxx = write_source(dir.path(), "b.cpp", "struct B {};\n");
    let missing = dir.path().join("gone.c");

    let (summaries, merged) = index_files(&[java, cxx, missing], &CommandOptions::default());

    let statuses: Vec<_> = summaries
        .iter()
        .map(|s| (s.indexer.as_str(), s.status.starts_with("failed"), s.symbols > 0))
        .collect();
    assert_eq!(
        statuses,
        vec![("java", false, true), ("cxx", false, true), ("cxx", true, false)]
    );
    assert_eq!(merged.files().count(), 2);
}

#[test]
fn given_unknown_extension_when_batched_then_only_that_file_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let java = write_source(dir.path(), "A.java", "class A {}\n");
    let notes = write_source(dir.path(), "notes.txt", "hello\n");

    let (summaries, merged) = index_files(&[java, notes], &CommandOptions::default());

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].status, "completed");
    assert_eq!(summaries[1].indexer, "-");
    assert!(summaries[1].status.starts_with("failed: cannot tell the language"), "{:?}", summaries[1]);
    assert_eq!(merged.files().count(), 1);
}

#[test]
fn given_configuration_when_listing_source_groups_then_filters_are_expanded() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_source(
        dir.path(),
        "settings.json",
        r#"{
            "source_groups/source_group_a/type": ["Java Source Group"],
            "source_groups/source_group_a/name": ["app"],
            "source_groups/source_group_a/exclude_filters/exclude_filter": ["gen/**"],
            "source_groups/source_group_b/type": ["C++ Source Group"],
            "source_groups/source_group_b/status": ["disabled"],
            "source_groups/source_group_b/standard": ["c++20"]
        }"#,
    );
    let project = dir.path().join("demo.srctrlprj");

    let views = describe_source_groups(&config, &project).expect("describe");

    assert_eq!(views.len(), 2);
    assert_eq!(views[0].name, "app");
    assert_eq!(views[0].status, "enabled");
    assert_eq!(views[0].standard, "10");
    assert_eq!(
        views[0].exclude_filters,
        format!("{}/gen/**", dir.path().display())
    );
    assert_eq!(views[1].group_type, "C++ Source Group");
    assert_eq!(views[1].status, "disabled");
    assert_eq!(views[1].standard, "c++20");
    assert_eq!(views[1].exclude_filters, "-");
}
