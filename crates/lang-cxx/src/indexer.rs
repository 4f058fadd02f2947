use crate::command::IndexerCommandCxx;
use crate::parser::CxxParser;
use std::sync::Arc;
use trailscope_api::IndexerCommandType;
use trailscope_core::indexer::run_front_end;
use trailscope_core::{
    FrontEnd, IndexOutcome, IndexerBase, IndexerCommand, Interruption, Result, TypedIndexerCommand,
};

/// Runs [`IndexerCommandCxx`] commands through a C/C++ front end.
pub struct CxxIndexer {
    front_end: Arc<dyn FrontEnd<IndexerCommandCxx>>,
    interruption: Interruption,
}

impl CxxIndexer {
    pub fn new() -> Result<Self> {
        Ok(Self::with_front_end(Arc::new(CxxParser::new()?)))
    }

    pub fn with_front_end(front_end: Arc<dyn FrontEnd<IndexerCommandCxx>>) -> Self {
        Self {
            front_end,
            interruption: Interruption::new(),
        }
    }
}

impl IndexerBase for CxxIndexer {
    fn supported_indexer_command_type(&self) -> IndexerCommandType {
        IndexerCommandCxx::COMMAND_TYPE
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
