use crate::*;

fn seeded() -> ConceptStore {
    let store = ConceptStore::in_memory();
    store
        .upsert_concept(Concept::new("Q1860", "English language").with_category("language"))
        .unwrap();
    store.upsert_concept(Concept::new("Q11660", "Artificial intelligence")).unwrap();
    for (form, lang, tokens) in [("artificial intelligence", "en", 2), ("AI", "en", 1), ("人工智能", "zh", 3)] {
        store.upsert_surface_form(SurfaceForm::new("Q11660", "cl100k", lang, form, tokens)).unwrap();
    }
    store.upsert_surface_form(SurfaceForm::new("Q11660", "o200k", "zh", "人工智能", 1)).unwrap();
    store
}

// ========== Concepts ==========

#[test]
fn test_upsert_concept_insert_then_update() {
    let store = ConceptStore::in_memory();
    assert!(store.upsert_concept(Concept::new("Q42", "Douglas Adams")).unwrap());
    assert!(!store
        .upsert_concept(Concept::new("Q42", "Douglas Adams").with_description("writer"))
        .unwrap());
    let concept = store.get_concept("Q42").unwrap();
    assert_eq!(concept.description.as_deref(), Some("writer"));
    assert!(concept.updated_at.is_some());
    assert_eq!(store.stats().concepts, 1);
}

#[test]
fn test_upsert_concept_rejects_empty_fields() {
    let store = ConceptStore::in_memory();
    assert!(matches!(store.upsert_concept(Concept::new("", "x")), Err(AtlasError::InvalidConcept(_))));
    assert!(matches!(store.upsert_concept(Concept::new("Q1", " ")), Err(AtlasError::InvalidConcept(_))));
}

#[test]
fn test_find_by_label_case_insensitive() {
    let store = seeded();
    assert_eq!(store.find_by_label("artificial INTELLIGENCE").unwrap().qid, "Q11660");
    assert!(store.find_by_label("artificial").is_none());
    assert!(store.get_concept("Q999").is_none());
}

// ========== Surface forms ==========

#[test]
fn test_surface_form_requires_concept() {
    let store = ConceptStore::in_memory();
    let err = store.upsert_surface_form(SurfaceForm::new("Q5", "cl100k", "en", "human", 1)).unwrap_err();
    assert!(matches!(err, AtlasError::ConceptNotFound(qid) if qid == "Q5"));
}

#[test]
fn test_surface_forms_sorted_by_token_count() {
    let store = seeded();
    let forms = store.surface_forms("Q11660", "cl100k");
    let texts: Vec<&str> = forms.iter().map(|f| f.form.as_str()).collect();
    assert_eq!(texts, vec!["AI", "artificial intelligence", "人工智能"]);
    assert_eq!(forms[2].char_count, 4);
}

#[test]
fn test_cheapest_form_per_tokenizer() {
    let store = seeded();
    assert_eq!(store.cheapest_form("Q11660", "cl100k").unwrap().form, "AI");
    assert_eq!(store.cheapest_form("Q11660", "o200k").unwrap().lang, "zh");
    assert!(store.cheapest_form("Q11660", "unknown").is_none());
}

#[test]
fn test_surface_form_upsert_updates_cost() {
    let store = seeded();
    store.upsert_surface_form(SurfaceForm::new("Q11660", "cl100k", "en", "AI", 5)).unwrap();
    assert_eq!(store.cheapest_form("Q11660", "cl100k").unwrap().form, "artificial intelligence");
    assert_eq!(store.stats().surface_forms, 4);
}

#[test]
fn test_stats() {
    let stats = seeded().stats();
    assert_eq!(stats, AtlasStats { concepts: 2, surface_forms: 4, tokenizers: 2, languages: 2 });
}

// ========== Persistence ==========

#[test]
fn test_save_without_path_fails() {
    assert!(matches!(seeded().save(), Err(AtlasError::Storage(_))));
}

#[test]
fn test_open_save_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("atlas").join("concepts.json");

    let store = ConceptStore::open(&path).unwrap();
    assert_eq!(store.stats().concepts, 0);
    store.upsert_concept(Concept::new("Q11660", "Artificial intelligence")).unwrap();
    store.upsert_surface_form(SurfaceForm::new("Q11660", "cl100k", "en", "AI", 1)).unwrap();
    store.save().unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());

    let reopened = ConceptStore::open(&path).unwrap();
    assert_eq!(reopened.stats(), store.stats());
    assert_eq!(reopened.cheapest_form("Q11660", "cl100k").unwrap().form, "AI");
}

#[test]
fn test_open_rejects_unknown_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concepts.json");
    std::fs::write(&path, r#"{"schema_version":99,"saved_at":"2026-01-01T00:00:00Z","concepts":[],"surface_forms":[]}"#)
        .unwrap();
    assert!(matches!(ConceptStore::open(&path), Err(AtlasError::UnsupportedSchema(99))));
}

#[test]
fn test_open_corrupt_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("concepts.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(ConceptStore::open(&path), Err(AtlasError::Serialization(_))));
}

#[test]
fn test_snapshot_file_read_missing() {
    let dir = tempfile::tempdir().unwrap();
    let file = SnapshotFile::new(dir.path().join("nope.json"));
    assert!(!file.exists());
    assert!(file.read().unwrap().is_none());
    file.write_atomic(b"{}").unwrap();
    assert_eq!(file.read().unwrap().unwrap(), b"{}");
}
