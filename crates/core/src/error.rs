#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("emergency history unavailable: {0}")]
    HistoryUnavailable(String),
    #[error("failed to read history file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to deserialize: {0}")]
    Deserialization(serde_json::Error),
    #[error("failed to serialize: {0}")]
    Serialization(serde_json::Error),
}

pub type CoreResult<T> = std::result::Result<T, TriageError>;
