use std::path::Path;
use tokio_util::sync::CancellationToken;
use trailscope_core::{IntermediateStorage, ParserClientImpl};
use trailscope_java::JavaParser;

pub fn index_java(source: &str) -> IntermediateStorage {
    index_java_with(source, CancellationToken::new())
}

pub fn index_java_with(source: &str, cancellation: CancellationToken) -> IntermediateStorage {
    let parser = JavaParser::new().expect("java grammar loads");
    let mut client = ParserClientImpl::new(cancellation);
    parser
        .index_source(Path::new("input.java"), source, &mut client)
        .expect("indexing succeeds");
    client.into_storage()
}

#[allow(dead_code)]
pub fn has(lines: &[String], expected: &str) -> bool {
    lines.iter().any(|l| l == expected)
}
