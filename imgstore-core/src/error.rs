use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImgStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Corrupt name mapping for '{name}'")]
    CorruptMapping { name: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ImgStoreError>;
