use crate::categorize::Category;
use serde::{Deserialize, Serialize};

/// One prompt in a corpus file. Unknown fields are kept and written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusRecord {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CorpusRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), source: None, categories: Vec::new(), extra: serde_json::Map::new() }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}
