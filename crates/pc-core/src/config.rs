use crate::error::{PcError, Result};
use crate::types::{ApplyMode, OutputLanguage, RuleDef};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressConfig {
    pub output_language: OutputLanguage,
    pub rewrite: RewriteConfig,
    pub validator: ValidatorConfig,
    pub extra_rules: Vec<RuleDef>,
    pub batch: BatchConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    pub mode: ApplyMode,
    /// Upper bound on re-applications of one rule in fixed-point mode.
    pub max_passes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// A word is repetitive when it occurs more than this many times.
    pub repetition_threshold: usize,
    /// Only words at least this long are counted for repetition.
    pub min_word_len: usize,
    pub forbidden_terms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub concurrency: usize,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self { mode: ApplyMode::SinglePass, max_passes: 8 }
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            repetition_threshold: 3,
            min_word_len: 5,
            forbidden_terms: [
                "please",
                "kindly",
                "thank you in advance",
                "for your help",
                "that you might find",
                "in this particular way",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { concurrency: 4, timeout_ms: None }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 8080 }
    }
}

impl CompressConfig {
    /// Parse a JSON config. Missing sections fall back to defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&data)?;
        tracing::debug!(path = %path.display(), rules = config.extra_rules.len(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rewrite.max_passes == 0 {
            return Err(PcError::InvalidConfig("rewrite.max_passes must be at least 1".into()));
        }
        if self.validator.repetition_threshold == 0 {
            return Err(PcError::InvalidConfig("validator.repetition_threshold must be at least 1".into()));
        }
        if self.batch.concurrency == 0 {
            return Err(PcError::InvalidConfig("batch.concurrency must be at least 1".into()));
        }
        Ok(())
    }
}
