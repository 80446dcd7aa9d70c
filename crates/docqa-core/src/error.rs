use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Error reading PDF: {0}")]
    Extraction(String),

    #[error("No text found in the PDF")]
    EmptyDocument,

    #[error("Failed to create text chunks")]
    EmptyChunkSet,

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Generation failed: {0}")]
    Generation(String),
}

impl Error {
    /// True for failures raised while loading a document.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            Self::Extraction(_) | Self::EmptyDocument | Self::EmptyChunkSet | Self::Embedding(_) | Self::Index(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
