use anyhow::{Context, Result};
use pc_core::{ApplyMode, CompressConfig, OutputLanguage};
use pc_corpus::{compress_batch, load_jsonl_file, write_jsonl};
use pc_rewriter::PromptPipeline;
use pc_server::state::AppState;
use std::fs::File;
use std::io::{self, Read, Write};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

pub fn load_config(path: Option<&Path>) -> Result<CompressConfig> {
    match path {
        Some(path) => CompressConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(CompressConfig::default()),
    }
}

pub fn with_optimize_overrides(
    mut config: CompressConfig,
    lang: Option<&str>,
    fixed_point: bool,
) -> Result<CompressConfig> {
    if let Some(lang) = lang {
        config.output_language = lang.parse::<OutputLanguage>().map_err(anyhow::Error::msg)?;
    }
    if fixed_point {
        config.rewrite.mode = ApplyMode::FixedPoint;
    }
    Ok(config)
}

pub fn with_batch_overrides(
    mut config: CompressConfig,
    concurrency: Option<usize>,
    timeout_ms: Option<u64>,
) -> Result<CompressConfig> {
    if let Some(n) = concurrency {
        config.batch.concurrency = n;
    }
    if timeout_ms.is_some() {
        config.batch.timeout_ms = timeout_ms;
    }
    config.validate()?;
    Ok(config)
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.write_all(b"\n")?;
            Ok(())
        }
    }
}

/// Render one optimization as either the directive-suffixed prompt or JSON.
pub fn render_optimized(config: &CompressConfig, text: &str, json: bool) -> Result<String> {
    let pipeline = PromptPipeline::from_config(config)?;
    let result = pipeline.optimize(text);
    tracing::info!(
        original_tokens = result.savings.original_tokens,
        optimized_tokens = result.savings.optimized_tokens,
        savings_pct = result.savings.savings_pct,
        diagnostics = result.diagnostics.len(),
        "optimized"
    );
    for d in &result.diagnostics {
        tracing::warn!(kind = ?d.kind, offset = d.offset, snippet = %d.snippet, "diagnostic");
    }
    if json {
        Ok(serde_json::to_string_pretty(&result)?)
    } else {
        Ok(result.output)
    }
}

pub fn optimize(config: &CompressConfig, input: Option<&Path>, output: Option<&Path>, json: bool) -> Result<()> {
    let text = read_input(input)?;
    let rendered = render_optimized(config, &text, json)?;
    write_output(output, &rendered)
}

/// Prints diagnostics to stdout. Returns `true` when there were none.
pub fn validate(config: &CompressConfig, input: Option<&Path>) -> Result<bool> {
    let text = read_input(input)?;
    let pipeline = PromptPipeline::from_config(config)?;
    let diagnostics = pipeline.validate(&text);
    let mut stdout = io::stdout().lock();
    for d in &diagnostics {
        writeln!(stdout, "{:?}@{}: {}", d.kind, d.offset, d.snippet)?;
    }
    Ok(diagnostics.is_empty())
}

pub async fn batch(config: &CompressConfig, input: &Path, output: &Path) -> Result<()> {
    let loaded = load_jsonl_file(input).with_context(|| format!("failed to load {}", input.display()))?;
    if loaded.skipped > 0 {
        tracing::warn!(skipped = loaded.skipped, "some corpus lines were skipped");
    }
    let pipeline = Arc::new(PromptPipeline::from_config(config)?);
    let (outcomes, summary) = compress_batch(pipeline, loaded.records, &config.batch).await;

    let file = File::create(output).with_context(|| format!("failed to create {}", output.display()))?;
    write_jsonl(file, &outcomes)?;

    tracing::info!(
        documents = summary.documents,
        failures = summary.failures,
        original_tokens = summary.original_tokens,
        optimized_tokens = summary.optimized_tokens,
        savings_pct = summary.savings_pct(),
        output = %output.display(),
        "batch written"
    );
    Ok(())
}

pub fn render_catalog(config: &CompressConfig, json: bool) -> Result<String> {
    let pipeline = PromptPipeline::from_config(config)?;
    let catalog = pipeline.catalog();
    let summary = catalog.summary();
    if json {
        return Ok(serde_json::to_string_pretty(&summary)?);
    }
    let mut out = format!("catalog {} ({} rules)\n", catalog.version(), catalog.len());
    for phase in summary {
        out.push_str(&format!("{} ({})\n", phase.phase, phase.rules.len()));
        for rule in phase.rules {
            out.push_str(&format!("  {rule}\n"));
        }
    }
    Ok(out)
}

pub fn catalog(config: &CompressConfig, json: bool) -> Result<()> {
    let rendered = render_catalog(config, json)?;
    write_output(None, rendered.trim_end())
}

pub async fn serve(mut config: CompressConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.server.host, config.server.port))?;
    let state = AppState::from_config(&config)?;
    pc_server::serve(state, addr).await
}
