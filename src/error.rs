use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to read request table: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Failed to parse configuration JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Malformed request row at line {line}: {reason}")]
    InputFormat { line: u64, reason: String },

    #[error("No requests to simulate, the average wait time is undefined")]
    EmptyInput,

    #[error("Server count must be at least 1, got {0}")]
    InvalidServerCount(usize),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, Error>;
