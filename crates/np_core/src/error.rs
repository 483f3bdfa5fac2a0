use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No payout rate configured for category '{0}'")]
    MissingRate(String),

    #[error("Invalid payout rate for category '{category}': {rate}")]
    InvalidRate { category: String, rate: f64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// True for errors caused by rate configuration rather than by I/O or export.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::MissingRate(_) | Error::InvalidRate { .. } | Error::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
