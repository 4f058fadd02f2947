use super::command::{IndexerCommand, TypedIndexerCommand, downcast_command};
use super::front_end::FrontEnd;
use crate::error::{Result, TrailscopeError};
use crate::parser::ParserClientImpl;
use crate::storage::IntermediateStorage;
use crate::text::TextAccess;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use trailscope_api::IndexerCommandType;

/// How a run ended when it did not fail.
#[derive(Debug)]
pub enum IndexOutcome {
    Completed(IntermediateStorage),
    /// Interrupted before or during the run; partial facts are discarded.
    Interrupted,
}

impl IndexOutcome {
    pub fn into_storage(self) -> Option<IntermediateStorage> {
        match self {
            IndexOutcome::Completed(storage) => Some(storage),
            IndexOutcome::Interrupted => None,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, IndexOutcome::Interrupted)
    }
}

/// One-shot interruption flag, shareable across threads.
#[derive(Debug, Clone, Default)]
pub struct Interruption {
    token: CancellationToken,
}

impl Interruption {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interrupt(&self) {
        self.token.cancel();
    }

    pub fn is_interrupted(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

/// Executes commands of one discriminant.
///
/// `index` moves through idle, running and then one of completed (storage
/// returned), interrupted (no storage) or failed (error). `interrupt` may be
/// called from any thread at any time and is never undone.
pub trait IndexerBase: Send + Sync {
    fn supported_indexer_command_type(&self) -> IndexerCommandType;

    fn index(&self, command: &dyn IndexerCommand) -> Result<IndexOutcome>;

    fn interrupt(&self);

    fn interrupted(&self) -> bool;
}

/// The shared body of every indexer: type check, text access, a fresh client
/// and storage, the front end, and the interruption check at the end.
pub fn run_front_end<C: TypedIndexerCommand>(
    front_end: &dyn FrontEnd<C>,
    command: &dyn IndexerCommand,
    interruption: &Interruption,
) -> Result<IndexOutcome> {
    let Some(typed) = downcast_command::<C>(command) else {
        return Err(TrailscopeError::CommandTypeMismatch {
            expected: C::COMMAND_TYPE,
            actual: command.indexer_command_type(),
        });
    };

    let path = typed.source_file_path();
    if interruption.is_interrupted() {
        info!("Skipping {} after interruption", path.display());
        return Ok(IndexOutcome::Interrupted);
    }

    debug!("Indexing {} ({})", path.display(), C::COMMAND_TYPE);
    let text = TextAccess::from_file(path)?;
    let mut client = ParserClientImpl::new(interruption.token());

    if let Err(e) = front_end.index_file(typed, &text, &mut client) {
        warn!("Indexing {} failed: {}", path.display(), e);
        return Err(e);
    }

    if interruption.is_interrupted() {
        info!("Indexing {} interrupted", path.display());
        return Ok(IndexOutcome::Interrupted);
    }

    let storage = client.into_storage();
    debug!(
        "Indexed {}: {} facts",
        path.display(),
        storage.fact_count()
    );
    Ok(IndexOutcome::Completed(storage))
}
