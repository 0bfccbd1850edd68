//! Concept atlas: language-independent concepts with per-tokenizer,
//! per-language surface forms and their token costs.

pub mod error;
pub mod file_store;
pub mod store;
pub mod types;

pub use error::{AtlasError, Result};
pub use file_store::SnapshotFile;
pub use store::ConceptStore;
pub use types::{AtlasStats, Concept, Snapshot, SurfaceForm, SCHEMA_VERSION};

#[cfg(test)]
mod tests;
