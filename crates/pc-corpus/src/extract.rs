//! Per-dataset prompt extractors.
//!
//! Each source knows its hub repository, split and default sample sizes, and
//! how to pull the first user prompt out of one raw record.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Prompts this short are dropped by every extractor.
pub const MIN_PROMPT_CHARS: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetSource {
    Wildchat,
    Ultrachat,
    Alpaca,
    CodeMixed,
}

impl DatasetSource {
    pub const ALL: [DatasetSource; 4] = [Self::Wildchat, Self::Ultrachat, Self::Alpaca, Self::CodeMixed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wildchat => "wildchat",
            Self::Ultrachat => "ultrachat",
            Self::Alpaca => "alpaca",
            Self::CodeMixed => "code_mixed",
        }
    }

    pub fn repo(&self) -> &'static str {
        match self {
            Self::Wildchat => "allenai/WildChat-1M",
            Self::Ultrachat => "HuggingFaceH4/ultrachat_200k",
            Self::Alpaca => "tatsu-lab/alpaca",
            Self::CodeMixed => "iamtarun/python_code_instructions_18k_alpaca",
        }
    }

    pub fn split(&self) -> &'static str {
        match self {
            Self::Ultrachat => "train_sft",
            _ => "train",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Wildchat => "Real user conversations with ChatGPT",
            Self::Ultrachat => "High-quality filtered conversations",
            Self::Alpaca => "Instruction-following prompts",
            Self::CodeMixed => "Code-focused instructions",
        }
    }

    /// Default sample size; `quick` is the reduced smoke-test size.
    pub fn samples(&self, quick: bool) -> usize {
        let full = match self {
            Self::Wildchat => 10_000,
            Self::Ultrachat | Self::Alpaca => 5_000,
            Self::CodeMixed => 3_000,
        };
        if quick { full / 10 } else { full }
    }

    /// Pull the prompt out of one raw record. `None` when the field is
    /// absent, not a string, or shorter than [`MIN_PROMPT_CHARS`].
    pub fn extract(&self, record: &Value) -> Option<String> {
        let text = match self {
            Self::Wildchat => first_turn(record, "conversation"),
            Self::Ultrachat => first_turn(record, "messages"),
            Self::Alpaca => record.get("instruction").and_then(Value::as_str),
            Self::CodeMixed => record.get("prompt").and_then(Value::as_str),
        }?;
        (text.chars().count() >= MIN_PROMPT_CHARS).then(|| text.to_string())
    }
}

fn first_turn<'v>(record: &'v Value, field: &str) -> Option<&'v str> {
    record.get(field)?.as_array()?.first()?.get("content")?.as_str()
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|src| src.as_str() == s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown dataset source: {s}"))
    }
}
