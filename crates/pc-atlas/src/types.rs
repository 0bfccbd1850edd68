use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// A concept keyed by its Wikidata-style id (`Q42`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub qid: String,
    pub label_en: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Set by the store on every upsert.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Concept {
    pub fn new(qid: impl Into<String>, label_en: impl Into<String>) -> Self {
        Self { qid: qid.into(), label_en: label_en.into(), description: None, category: None, updated_at: None }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// One way of writing a concept in one language, costed for one tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceForm {
    pub qid: String,
    pub tokenizer_id: String,
    pub lang: String,
    pub form: String,
    pub token_count: usize,
    pub char_count: usize,
}

impl SurfaceForm {
    pub fn new(
        qid: impl Into<String>,
        tokenizer_id: impl Into<String>,
        lang: impl Into<String>,
        form: impl Into<String>,
        token_count: usize,
    ) -> Self {
        let form = form.into();
        let char_count = form.chars().count();
        Self { qid: qid.into(), tokenizer_id: tokenizer_id.into(), lang: lang.into(), form, token_count, char_count }
    }

    pub(crate) fn key(&self) -> (String, String, String, String) {
        (self.qid.clone(), self.tokenizer_id.clone(), self.lang.clone(), self.form.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AtlasStats {
    pub concepts: usize,
    pub surface_forms: usize,
    pub tokenizers: usize,
    pub languages: usize,
}

/// On-disk layout of a saved store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub schema_version: u32,
    pub saved_at: DateTime<Utc>,
    pub concepts: Vec<Concept>,
    pub surface_forms: Vec<SurfaceForm>,
}
