use pc_core::BatchConfig;
use pc_corpus::{compress_batch, load_jsonl_file, sample_balanced, write_jsonl, BatchStatus};
use pc_rewriter::PromptPipeline;
use std::sync::Arc;

#[tokio::test]
async fn load_sample_compress_and_write() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("prompts.jsonl");
    let output = dir.path().join("optimized.jsonl");

    let lines = [
        r#"{"text":"Could you please explain what this function does? Thank you for your help!"}"#,
        r#"{"text":"Hello! I would like you to write a short poem about autumn."}"#,
        r#"{"text":"Summarize the report."}"#,
        "not json at all",
        r#"{"text":"Summarize the report."}"#,
    ];
    std::fs::write(&input, lines.join("\n")).unwrap();

    let loaded = load_jsonl_file(&input).unwrap();
    assert_eq!(loaded.records.len(), 4);
    assert_eq!(loaded.skipped, 1);

    let corpus = sample_balanced(&loaded.records, 10, 7);
    assert_eq!(corpus.records.len(), 3);

    let config = BatchConfig { concurrency: 3, timeout_ms: Some(30_000) };
    let (outcomes, summary) = compress_batch(Arc::new(PromptPipeline::new()), corpus.records, &config).await;
    assert!(outcomes.iter().all(|o| o.status == BatchStatus::Ok));
    assert_eq!(summary.documents, 3);
    assert!(summary.token_savings() > 0);

    write_jsonl(std::fs::File::create(&output).unwrap(), &outcomes).unwrap();
    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written.lines().count(), 3);
    for line in written.lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        let out = value["result"]["output"].as_str().unwrap();
        assert!(out.ends_with("[output_language: english]"));
        assert!(!out.to_lowercase().contains("please"));
    }
}
