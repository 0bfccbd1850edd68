//! In-memory concept store with optional JSON snapshot persistence.

use crate::error::{AtlasError, Result};
use crate::file_store::SnapshotFile;
use crate::types::{AtlasStats, Concept, Snapshot, SurfaceForm, SCHEMA_VERSION};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

type FormKey = (String, String, String, String);

#[derive(Default)]
struct Inner {
    concepts: BTreeMap<String, Concept>,
    forms: BTreeMap<FormKey, SurfaceForm>,
}

pub struct ConceptStore {
    inner: RwLock<Inner>,
    snapshot: Option<SnapshotFile>,
}

impl ConceptStore {
    /// Memory only; [`save`](Self::save) fails.
    pub fn in_memory() -> Self {
        Self { inner: RwLock::new(Inner::default()), snapshot: None }
    }

    /// Open a snapshot-backed store, loading the file when it exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = SnapshotFile::new(path.as_ref());
        let mut inner = Inner::default();

        if let Some(bytes) = file.read()? {
            let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
            if snapshot.schema_version != SCHEMA_VERSION {
                return Err(AtlasError::UnsupportedSchema(snapshot.schema_version));
            }
            for concept in snapshot.concepts {
                inner.concepts.insert(concept.qid.clone(), concept);
            }
            for form in snapshot.surface_forms {
                if !inner.concepts.contains_key(&form.qid) {
                    tracing::warn!(qid = %form.qid, form = %form.form, "dropping surface form without concept");
                    continue;
                }
                inner.forms.insert(form.key(), form);
            }
            tracing::info!(
                path = %file.path().display(),
                concepts = inner.concepts.len(),
                surface_forms = inner.forms.len(),
                "loaded concept atlas"
            );
        }

        Ok(Self { inner: RwLock::new(inner), snapshot: Some(file) })
    }

    /// Insert or replace a concept. Returns `true` when the id was new.
    pub fn upsert_concept(&self, mut concept: Concept) -> Result<bool> {
        if concept.qid.trim().is_empty() {
            return Err(AtlasError::InvalidConcept("empty qid".into()));
        }
        if concept.label_en.trim().is_empty() {
            return Err(AtlasError::InvalidConcept(format!("{}: empty label", concept.qid)));
        }
        concept.updated_at = Some(Utc::now());
        let inserted = self.inner.write().concepts.insert(concept.qid.clone(), concept).is_none();
        Ok(inserted)
    }

    pub fn get_concept(&self, qid: &str) -> Option<Concept> {
        self.inner.read().concepts.get(qid).cloned()
    }

    /// Case-insensitive exact match on the English label.
    pub fn find_by_label(&self, label: &str) -> Option<Concept> {
        let needle = label.trim().to_lowercase();
        self.inner
            .read()
            .concepts
            .values()
            .find(|c| c.label_en.to_lowercase() == needle)
            .cloned()
    }

    /// Insert or update a surface form keyed by
    /// `(qid, tokenizer_id, lang, form)`. The concept must already exist.
    pub fn upsert_surface_form(&self, form: SurfaceForm) -> Result<()> {
        let mut inner = self.inner.write();
        if !inner.concepts.contains_key(&form.qid) {
            return Err(AtlasError::ConceptNotFound(form.qid));
        }
        inner.forms.insert(form.key(), form);
        Ok(())
    }

    /// All forms of a concept for one tokenizer, cheapest first.
    pub fn surface_forms(&self, qid: &str, tokenizer_id: &str) -> Vec<SurfaceForm> {
        let mut forms: Vec<SurfaceForm> = self
            .inner
            .read()
            .forms
            .values()
            .filter(|f| f.qid == qid && f.tokenizer_id == tokenizer_id)
            .cloned()
            .collect();
        forms.sort_by(|a, b| {
            a.token_count
                .cmp(&b.token_count)
                .then(a.char_count.cmp(&b.char_count))
                .then_with(|| a.form.cmp(&b.form))
        });
        forms
    }

    pub fn cheapest_form(&self, qid: &str, tokenizer_id: &str) -> Option<SurfaceForm> {
        self.surface_forms(qid, tokenizer_id).into_iter().next()
    }

    pub fn stats(&self) -> AtlasStats {
        let inner = self.inner.read();
        let tokenizers: BTreeSet<&str> = inner.forms.values().map(|f| f.tokenizer_id.as_str()).collect();
        let languages: BTreeSet<&str> = inner.forms.values().map(|f| f.lang.as_str()).collect();
        AtlasStats {
            concepts: inner.concepts.len(),
            surface_forms: inner.forms.len(),
            tokenizers: tokenizers.len(),
            languages: languages.len(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let inner = self.inner.read();
        Snapshot {
            schema_version: SCHEMA_VERSION,
            saved_at: Utc::now(),
            concepts: inner.concepts.values().cloned().collect(),
            surface_forms: inner.forms.values().cloned().collect(),
        }
    }

    /// Persist to the path given to [`open`](Self::open).
    pub fn save(&self) -> Result<()> {
        let file = self
            .snapshot
            .as_ref()
            .ok_or_else(|| AtlasError::Storage("store has no snapshot path".into()))?;
        self.save_to(file)
    }

    fn save_to(&self, file: &SnapshotFile) -> Result<()> {
        let snapshot = self.snapshot();
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        file.write_atomic(&bytes)?;
        tracing::debug!(
            path = %file.path().display(),
            concepts = snapshot.concepts.len(),
            surface_forms = snapshot.surface_forms.len(),
            "saved concept atlas"
        );
        Ok(())
    }
}

impl Default for ConceptStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
