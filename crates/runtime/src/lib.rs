//! Wires the language crates together: routes a command to the indexer for
//! its discriminant and carries commands across process boundaries.

pub mod dispatch;
pub mod envelope;

pub use dispatch::{Indexer, index_command};
pub use envelope::AnyIndexerCommand;
pub use trailscope_core::logging::{LoggingOptions, init_logging};
