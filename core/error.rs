use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("TOML Parsing Error: {0}")]
    TomlParse(String),

    #[error("Invalid Size: '{input}': {reason}")]
    InvalidSize { input: String, reason: String },

    #[error("Invalid Project Root: Path '{path}', Error: {source}")]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "serde_support")]
    #[error("JSON Serialization Error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("File Read Error: Path '{path}', Error: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File Write Error: Path '{path}', Error: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid Argument: {0}")]
    InvalidArgument(String),

    #[error("TikToken Error: {0}")]
    TikToken(String),

    #[error("Data Loading Error: {0}")]
    DataLoading(String),
}
