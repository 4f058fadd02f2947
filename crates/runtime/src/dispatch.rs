use tracing::{debug, info};
use trailscope_api::IndexerCommandType;
use trailscope_core::{IndexOutcome, IndexerBase, IndexerCommand, Result};
use trailscope_cxx::CxxIndexer;
use trailscope_java::JavaIndexer;

/// Every indexer this build knows about.
pub enum Indexer {
    Java(JavaIndexer),
    Cxx(CxxIndexer),
}

impl Indexer {
    /// A fresh, uninterrupted indexer for `command_type`.
    pub fn for_command_type(command_type: IndexerCommandType) -> Result<Self> {
        debug!("Creating indexer for {} commands", command_type);
        Ok(match command_type {
            IndexerCommandType::Java => Indexer::Java(JavaIndexer::new()?),
            IndexerCommandType::Cxx => Indexer::Cxx(CxxIndexer::new()?),
        })
    }

    fn inner(&self) -> &dyn IndexerBase {
        match self {
            Indexer::Java(indexer) => indexer,
            Indexer::Cxx(indexer) => indexer,
        }
    }
}

impl IndexerBase for Indexer {
    fn supported_indexer_command_type(&self) -> IndexerCommandType {
        self.inner().supported_indexer_command_type()
    }

    fn index(&self, command: &dyn IndexerCommand) -> Result<IndexOutcome> {
        self.inner().index(command)
    }

    fn interrupt(&self) {
        self.inner().interrupt();
    }

    fn interrupted(&self) -> bool {
        self.inner().interrupted()
    }
}

/// Runs `command` on a new indexer of the matching discriminant.
pub fn index_command(command: &dyn IndexerCommand) -> Result<IndexOutcome> {
    let indexer = Indexer::for_command_type(command.indexer_command_type())?;
    let outcome = indexer.index(command)?;
    if let IndexOutcome::Completed(storage) = &outcome {
        info!(
            "Indexed {}: {} files, {} facts",
            command.source_file_path().display(),
            storage.files().count(),
            storage.fact_count()
        );
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use trailscope_core::TrailscopeError;
    use trailscope_cxx::IndexerCommandCxx;
    use trailscope_java::IndexerCommandJava;

    #[test]
    fn each_discriminant_gets_its_own_indexer() {
        for command_type in IndexerCommandType::ALL {
            let indexer = Indexer::for_command_type(command_type).unwrap();
            assert_eq!(indexer.supported_indexer_command_type(), command_type);
            assert!(!indexer.interrupted());
        }
    }

    #[test]
    fn commands_are_routed_by_discriminant() {
        let dir = tempfile::tempdir().unwrap();
        let java = dir.path().join("A.java");
        let cxx = dir.path().join("a.cpp");
        fs::write(&java, "class A {}\n").unwrap();
        fs::write(&cxx, "struct B {};\n").unwrap();

        let storage = index_command(&IndexerCommandJava::new(&java, "10", Vec::new()))
            .unwrap()
            .into_storage()
            .unwrap();
        assert_eq!(storage.files().count(), 1);

        let storage = index_command(&IndexerCommandCxx::new(&cxx, "c++17", dir.path()))
            .unwrap()
            .into_storage()
            .unwrap();
        assert_eq!(storage.files().count(), 1);
    }

    #[test]
    fn interrupt_is_forwarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.java");
        fs::write(&path, "class A {}\n").unwrap();

        let indexer = Indexer::for_command_type(IndexerCommandType::Java).unwrap();
        indexer.interrupt();

        assert!(indexer.interrupted());
        let outcome = indexer
            .index(&IndexerCommandJava::new(&path, "10", Vec::new()))
            .unwrap();
        assert!(outcome.is_interrupted());
    }

    #[test]
    fn wrong_indexer_rejects_the_command() {
        let indexer = Indexer::for_command_type(IndexerCommandType::Cxx).unwrap();
        let err = indexer
            .index(&IndexerCommandJava::new("A.java", "10", Vec::new()))
            .unwrap_err();
        assert!(matches!(err, TrailscopeError::CommandTypeMismatch { .. }));
    }
}
