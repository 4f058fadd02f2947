#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unknown {kind} token: '{token}'")]
    UnknownToken { kind: &'static str, token: String },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
