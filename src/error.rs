use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{file}: {reason}")]
    Structural { file: String, reason: String },

    #[error("No CSV files to process")]
    EmptyBatch,

    #[error("Settings error: {0}")]
    Settings(String),
}

impl BridgeError {
    pub fn structural(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Structural {
            file: file.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
