use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Delimited export failed: {0}")]
    Delimited(#[from] csv::Error),

    #[error("Document export failed: {0}")]
    Document(String),

    #[error("Invalid layout: {0}")]
    Layout(String),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExportError> for np_core::Error {
    fn from(err: ExportError) -> Self {
        np_core::Error::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
