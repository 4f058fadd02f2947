use crate::command::IndexerCommandJava;
use crate::parser::JavaParser;
use std::sync::Arc;
use trailscope_api::IndexerCommandType;
use trailscope_core::indexer::run_front_end;
use trailscope_core::{
    FrontEnd, IndexOutcome, IndexerBase, IndexerCommand, Interruption, Result, TypedIndexerCommand,
};

/// Runs [`IndexerCommandJava`] commands through a Java front end.
pub struct JavaIndexer {
    front_end: Arc<dyn FrontEnd<IndexerCommandJava>>,
    interruption: Interruption,
}

impl JavaIndexer {
    pub fn new() -> Result<Self> {
        Ok(Self::with_front_end(Arc::new(JavaParser::new()?)))
    }

    pub fn with_front_end(front_end: Arc<dyn FrontEnd<IndexerCommandJava>>) -> Self {
        Self {
            front_end,
            interruption: Interruption::new(),
        }
    }
}

impl IndexerBase for JavaIndexer {
    fn supported_indexer_command_type(&self) -> IndexerCommandType {
        IndexerCommandJava::COMMAND_TYPE
    }

    fn index(&self, command: &dyn IndexerCommand) -> Result<IndexOutcome> {
        run_front_end(self.front_end.as_ref(), command, &self.interruption)
    }

    fn interrupt(&self) {
        self.interruption.interrupt();
    }

    fn interrupted(&self) -> bool {
        self.interruption.is_interrupted()
    }
}
