//! prompt-compress core: shared types, configuration and errors.

pub mod config;
pub mod error;
pub mod types;

pub use config::{BatchConfig, CompressConfig, RewriteConfig, ServerConfig, ValidatorConfig};
pub use error::{PcError, Result};
pub use types::{Anchor, ApplyMode, OutputLanguage, Phase, RuleDef};
