mod base;
mod command;
mod front_end;

pub use base::{IndexOutcome, IndexerBase, Interruption, run_front_end};
pub use command::{IndexerCommand, TypedIndexerCommand, downcast_command, estimate_byte_size};
pub use front_end::FrontEnd;
