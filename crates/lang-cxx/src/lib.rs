//! C and C++ support: the indexer command, the indexer and its tree-sitter
//! front end. Both languages share the `tree-sitter-cpp` grammar.

pub mod command;
pub mod indexer;
pub mod parser;

pub use command::IndexerCommandCxx;
pub use indexer::CxxIndexer;
pub use parser::CxxParser;
