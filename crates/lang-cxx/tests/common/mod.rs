use std::path::Path;
use tokio_util::sync::CancellationToken;
use trailscope_api::LanguageType;
use trailscope_core::{IntermediateStorage, ParserClientImpl};
use trailscope_cxx::CxxParser;

pub fn index_cxx(source: &str) -> IntermediateStorage {
    index_cxx_with(source, CancellationToken::new())
}

pub fn index_cxx_with(source: &str, cancellation: CancellationToken) -> IntermediateStorage {
    let parser = CxxParser::new().expect("cpp grammar loads");
    let mut client = ParserClientImpl::new(cancellation);
    parser
        .index_source(Path::new("input.cpp"), source, LanguageType::Cpp, &mut client)
        .expect("indexing succeeds");
    client.into_storage()
}

#[allow(dead_code)]
pub fn has(lines: &[String], expected: &str) -> bool {
    lines.iter().any(|l| l == expected)
}
