use serde::{Deserialize, Serialize};
use trailscope_api::IndexerCommandType;
use trailscope_core::IndexerCommand;
use trailscope_cxx::IndexerCommandCxx;
use trailscope_java::IndexerCommandJava;

/// A command of any discriminant, tagged with its type when serialized so
/// queued commands can be written out and read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnyIndexerCommand {
    Java(IndexerCommandJava),
    Cxx(IndexerCommandCxx),
}

impl AnyIndexerCommand {
    pub fn as_command(&self) -> &dyn IndexerCommand {
        match self {
            AnyIndexerCommand::Java(command) => command,
            AnyIndexerCommand::Cxx(command) => command,
        }
    }

    pub fn indexer_command_type(&self) -> IndexerCommandType {
        self.as_command().indexer_command_type()
    }
}

impl From<IndexerCommandJava> for AnyIndexerCommand {
    fn from(command: IndexerCommandJava) -> Self {
        AnyIndexerCommand::Java(command)
    }
}

impl From<IndexerCommandCxx> for AnyIndexerCommand {
    fn from(command: IndexerCommandCxx) -> Self {
        AnyIndexerCommand::Cxx(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn tag_matches_the_discriminant() {
        let command: AnyIndexerCommand =
            IndexerCommandCxx::new("main.cpp", "c++17", "/work").into();
        let json = serde_json::to_value(&command).unwrap();

        assert_eq!(json["type"], "cxx");
        assert_eq!(command.indexer_command_type(), IndexerCommandType::Cxx);
    }

    #[test]
    fn queued_commands_read_back_unchanged() {
        let queue: Vec<AnyIndexerCommand> = vec![
            IndexerCommandJava::new("src/A.java", "8", vec!["lib/x.jar".into()]).into(),
            IndexerCommandCxx::new("main.cpp", "c++17", "/work")
                .with_compiler_flags(vec!["-DNDEBUG".into()])
                .into(),
        ];

        let text = serde_json::to_string(&queue).unwrap();
        let restored: Vec<AnyIndexerCommand> = serde_json::from_str(&text).unwrap();

        assert_eq!(restored, queue);
        assert_eq!(
            restored[0].as_command().source_file_path(),
            Path::new("src/A.java")
        );
    }
}
