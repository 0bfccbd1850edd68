use serde::{Deserialize, Serialize};

/// Rewrite phase. Declaration order is execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Politeness,
    CompleteSentenceBoilerplate,
    PartialPhraseBoilerplate,
    InstructionCompression,
    FillerRemoval,
    RedundantPhraseMerge,
    StructuralNormalization,
    WhitespaceCleanup,
}

impl Phase {
    pub const ALL: [Phase; 8] = [
        Phase::Politeness,
        Phase::CompleteSentenceBoilerplate,
        Phase::PartialPhraseBoilerplate,
        Phase::InstructionCompression,
        Phase::FillerRemoval,
        Phase::RedundantPhraseMerge,
        Phase::StructuralNormalization,
        Phase::WhitespaceCleanup,
    ];

    /// Position in the execution order.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Politeness => "politeness",
            Self::CompleteSentenceBoilerplate => "complete_sentence_boilerplate",
            Self::PartialPhraseBoilerplate => "partial_phrase_boilerplate",
            Self::InstructionCompression => "instruction_compression",
            Self::FillerRemoval => "filler_removal",
            Self::RedundantPhraseMerge => "redundant_phrase_merge",
            Self::StructuralNormalization => "structural_normalization",
            Self::WhitespaceCleanup => "whitespace_cleanup",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a rule match is allowed to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    Anywhere,
    /// Start of text, start of a line, or after `[.!?]` + whitespace.
    SentenceStart,
}

/// How often each rule is applied within one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    /// Every rule replaces all non-overlapping matches exactly once.
    #[default]
    SinglePass,
    /// Every rule is re-applied until the buffer stops changing.
    FixedPoint,
}

/// Language named in the trailing output directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLanguage {
    #[default]
    English,
    Mandarin,
}

impl OutputLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Mandarin => "mandarin",
        }
    }
}

impl std::str::FromStr for OutputLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Self::English),
            "mandarin" | "zh" | "chinese" => Ok(Self::Mandarin),
            other => Err(format!("unsupported output language: {other}")),
        }
    }
}

/// User-supplied rule definition, appended to the built-in rules of its phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDef {
    pub phase: Phase,
    pub category: String,
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
    #[serde(default)]
    pub anchor: Anchor,
}
