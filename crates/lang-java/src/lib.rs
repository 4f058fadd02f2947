//! Java support: the indexer command, the indexer and its tree-sitter front end.

pub mod command;
pub mod indexer;
pub mod parser;

pub use command::IndexerCommandJava;
pub use indexer::JavaIndexer;
pub use parser::JavaParser;
