use crate::*;
use crate::commands::*;
use clap::Parser;
use std::path::PathBuf;
use pc_core::{ApplyMode, CompressConfig, OutputLanguage};

// ========== Argument parsing ==========

#[test]
fn test_parse_optimize_flags() {
    let cli = Cli::try_parse_from([
        "prompt-compress", "--config", "c.json", "optimize", "-i", "in.txt", "--lang", "zh", "--fixed-point", "--json",
    ])
    .unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("c.json")));
    match cli.command {
        Commands::Optimize { input, output, lang, fixed_point, json } => {
            assert_eq!(input, Some(PathBuf::from("in.txt")));
            assert_eq!(output, None);
            assert_eq!(lang.as_deref(), Some("zh"));
            assert!(fixed_point);
            assert!(json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_batch_requires_paths() {
    assert!(Cli::try_parse_from(["prompt-compress", "batch", "-i", "in.jsonl"]).is_err());
    let cli = Cli::try_parse_from([
        "prompt-compress", "batch", "-i", "in.jsonl", "-o", "out.jsonl", "--concurrency", "8", "--timeout-ms", "500",
    ])
    .unwrap();
    assert!(matches!(cli.command, Commands::Batch { concurrency: Some(8), timeout_ms: Some(500), .. }));
}

#[test]
fn test_parse_serve() {
    let cli = Cli::try_parse_from(["prompt-compress", "serve", "--port", "9000"]).unwrap();
    assert!(matches!(cli.command, Commands::Serve { host: None, port: Some(9000) }));
}

// ========== Overrides ==========

#[test]
fn test_optimize_overrides() {
    let config = with_optimize_overrides(CompressConfig::default(), Some("mandarin"), true).unwrap();
    assert_eq!(config.output_language, OutputLanguage::Mandarin);
    assert_eq!(config.rewrite.mode, ApplyMode::FixedPoint);
    assert!(with_optimize_overrides(CompressConfig::default(), Some("klingon"), false).is_err());
}

#[test]
fn test_batch_overrides_validate() {
    let config = with_batch_overrides(CompressConfig::default(), Some(2), Some(100)).unwrap();
    assert_eq!(config.batch.concurrency, 2);
    assert_eq!(config.batch.timeout_ms, Some(100));
    assert!(with_batch_overrides(CompressConfig::default(), Some(0), None).is_err());
}

#[test]
fn test_load_config_missing_file_has_context() {
    let err = load_config(Some(std::path::Path::new("/missing/config.json"))).unwrap_err();
    assert!(err.to_string().contains("/missing/config.json"));
    assert!(load_config(None).is_ok());
}

// ========== Commands ==========

#[test]
fn test_render_optimized_plain_and_json() {
    let config = CompressConfig::default();
    assert_eq!(render_optimized(&config, "please kindly review", false).unwrap(), "Review\n\n[output_language: english]");
    let json: serde_json::Value = serde_json::from_str(&render_optimized(&config, "please review", true).unwrap()).unwrap();
    assert_eq!(json["rewritten"], "Review");
}

#[test]
fn test_optimize_file_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("prompt.txt");
    let output = dir.path().join("out.txt");
    std::fs::write(&input, "Hello! Could you summarize this article?").unwrap();
    optimize(&CompressConfig::default(), Some(&input), Some(&output), false).unwrap();
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "Summarize this article?\n\n[output_language: english]"
    );
}

#[test]
fn test_render_catalog() {
    let text = render_catalog(&CompressConfig::default(), false).unwrap();
    assert!(text.starts_with(&format!("catalog {}", pc_rewriter::CATALOG_VERSION)));
    assert!(text.contains("politeness ("));
    assert!(text.contains("  please\n"));
}

#[tokio::test]
async fn test_batch_command() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.jsonl");
    let output = dir.path().join("out.jsonl");
    std::fs::write(&input, "{\"text\":\"please review\"}\n{\"text\":\"Kindly explain this.\"}\n").unwrap();
    batch(&CompressConfig::default(), &input, &output).await.unwrap();
    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written.lines().count(), 2);
    assert!(written.contains("\"status\":\"ok\""));
}
