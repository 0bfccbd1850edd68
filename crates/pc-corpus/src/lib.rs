//! Corpus collaborators around the rewriter.
//!
//! JSONL loading, dataset extraction, categorization with balanced
//! sampling, and the parallel batch driver. Nothing here feeds back into
//! rewriting decisions.

pub mod batch;
pub mod categorize;
pub mod extract;
pub mod loader;
pub mod record;

pub use batch::{compress_batch, BatchOutcome, BatchStatus, BatchSummary};
pub use categorize::{categorize, sample_balanced, BalancedCorpus, Category};
pub use extract::DatasetSource;
pub use loader::{load_jsonl, load_jsonl_file, write_jsonl, LoadedCorpus};
pub use record::CorpusRecord;
