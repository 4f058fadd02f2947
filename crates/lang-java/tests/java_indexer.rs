use std::fs;
use trailscope_api::{IndexerCommandType, SymbolKind};
use trailscope_core::storage::FactDigest;
use trailscope_core::{IndexerBase, TrailscopeError};
use trailscope_java::{IndexerCommandJava, JavaIndexer};

fn write_source(dir: &tempfile::TempDir, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, source).expect("write source");
    path
}

#[test]
fn given_java_file_when_indexed_then_storage_holds_its_declarations() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_source(&dir, "Main.java", "package app;\npublic class Main {}\n");
    let indexer = JavaIndexer::new().expect("indexer");
    let command = IndexerCommandJava::new(&path, "10", Vec::new());

    let storage = indexer
        .index(&command)
        .expect("index")
        .into_storage()
        .expect("completed");

    let digest = FactDigest::new(&storage);
    assert_eq!(
        digest.declarations_of(&[SymbolKind::Class]),
        vec!["public app.Main <2:1 <2:14 2:17> 2:20>"]
    );
    let files: Vec<_> = storage.files().map(|(_, f)| f.path.clone()).collect();
    assert_eq!(files, vec![path]);
    assert_eq!(indexer.supported_indexer_command_type(), IndexerCommandType::Java);
}

#[test]
fn given_interrupted_indexer_when_indexing_then_no_storage_is_returned() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_source(&dir, "Main.java", "class Main {}\n");
    let indexer = JavaIndexer::new().expect("indexer");
    indexer.interrupt();
    indexer.interrupt();

    assert!(indexer.interrupted());
    let outcome = indexer
        .index(&IndexerCommandJava::new(&path, "10", Vec::new()))
        .expect("index");
    assert!(outcome.is_interrupted());
}

#[test]
fn given_missing_file_when_indexing_then_io_error_is_returned() {
    let dir = tempfile::tempdir().expect("tempdir");
    let indexer = JavaIndexer::new().expect("indexer");
    let command = IndexerCommandJava::new(dir.path().join("Gone.java"), "10", Vec::new());

    let result = indexer.index(&command);
    assert!(matches!(result, Err(TrailscopeError::Io(_))));
    assert!(!indexer.interrupted());
}
