//! Prompt rewriter: multi-phase rule pipeline for verbose LLM prompts.
//!
//! Phases, in order:
//! 1. Politeness markers
//! 2. Complete-sentence boilerplate (greetings, gratitude, closings)
//! 3. Partial-phrase boilerplate (clause-initial request prefixes)
//! 4. Instruction compression
//! 5. Filler removal
//! 6. Redundant phrase merge
//! 7. Structural normalization (units, punctuation runs, blank lines)
//! 8. Whitespace cleanup
//!
//! Sentence capitalization runs once after phase 8, then the
//! `[output_language: ...]` directive is appended. Code, template
//! variables, URLs and paths are protected throughout (see [`protect`]).

pub mod capitalize;
pub mod catalog;
pub mod directive;
pub mod executor;
pub mod pipeline;
pub mod protect;
pub mod savings;
pub mod validator;

pub use capitalize::capitalize_sentences;
pub use catalog::{PhaseSummary, Rule, RuleCatalog, CATALOG_VERSION, FILLER_WORDS};
pub use executor::{rewrite, rewrite_traced, rewrite_with_mode, RuleHit};
pub use pipeline::{OptimizationResult, PromptPipeline};
pub use protect::{ProtectedRegion, RegionKind};
pub use savings::{estimate_tokens, SavingsReport, TextStats};
pub use validator::{Diagnostic, DiagnosticKind, Validator};
