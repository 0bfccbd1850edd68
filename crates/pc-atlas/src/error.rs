use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("Concept not found: {0}")]
    ConceptNotFound(String),
    #[error("Invalid concept: {0}")]
    InvalidConcept(String),
    #[error("Unsupported snapshot schema: {0}")]
    UnsupportedSchema(u32),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AtlasError>;
