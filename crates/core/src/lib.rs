pub mod config;
pub mod error;
pub mod indexer;
pub mod logging;
pub mod parser;
pub mod settings;
pub mod storage;
pub mod text;

pub use error::{Result, TrailscopeError};
pub use indexer::{
    FrontEnd, IndexOutcome, IndexerBase, IndexerCommand, Interruption, TypedIndexerCommand,
};
pub use parser::{ParserClient, ParserClientImpl};
pub use storage::IntermediateStorage;
