use thiserror::Error;
use trailscope_api::IndexerCommandType;

#[derive(Error, Debug)]
pub enum TrailscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parsing error: {0}")]
    Parsing(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Front end error: {0}")]
    FrontEnd(String),
    #[error("Indexer for {expected} commands cannot run a {actual} command")]
    CommandTypeMismatch {
        expected: IndexerCommandType,
        actual: IndexerCommandType,
    },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tree_sitter::LanguageError> for TrailscopeError {
    fn from(err: tree_sitter::LanguageError) -> Self {
        TrailscopeError::FrontEnd(err.to_string())
    }
}

impl From<trailscope_api::ApiError> for TrailscopeError {
    fn from(err: trailscope_api::ApiError) -> Self {
        TrailscopeError::Config(err.to_string())
    }
}

/// Why an exclude filter could not be turned into a matcher.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("empty filter")]
    Empty,
    #[error("environment variable '{0}' is not defined")]
    UndefinedVariable(String),
    #[error("home directory is unknown")]
    NoHomeDirectory,
    #[error("invalid pattern: {0}")]
    Glob(#[from] globset::Error),
}

pub type Result<T> = std::result::Result<T, TrailscopeError>;
