//! Prompt pipeline: strip directive, rewrite, capitalize, append directive,
//! then validate and count.

use crate::capitalize::capitalize_sentences;
use crate::catalog::RuleCatalog;
use crate::executor::{rewrite_traced, RuleHit};
use crate::savings::SavingsReport;
use crate::validator::{Diagnostic, Validator};
use crate::directive;
use pc_core::{ApplyMode, CompressConfig, OutputLanguage, Result};
use serde::Serialize;
use std::sync::Arc;

/// Everything one optimization run produced.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    /// Rewritten prompt without the directive.
    pub rewritten: String,
    /// Rewritten prompt with the directive appended.
    pub output: String,
    pub language: OutputLanguage,
    pub savings: SavingsReport,
    pub rule_hits: Vec<RuleHit>,
    pub diagnostics: Vec<Diagnostic>,
}

impl OptimizationResult {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// The main rewriting pipeline.
pub struct PromptPipeline {
    catalog: Arc<RuleCatalog>,
    mode: ApplyMode,
    max_passes: usize,
    language: OutputLanguage,
    validator: Validator,
}

impl PromptPipeline {
    /// Built-in catalog, single pass, English directive, default validator.
    pub fn new() -> Self {
        Self {
            catalog: RuleCatalog::builtin(),
            mode: ApplyMode::SinglePass,
            max_passes: 1,
            language: OutputLanguage::English,
            validator: Validator::default(),
        }
    }

    pub fn from_config(config: &CompressConfig) -> Result<Self> {
        config.validate()?;
        let catalog = if config.extra_rules.is_empty() {
            RuleCatalog::builtin()
        } else {
            Arc::new(RuleCatalog::with_extra_rules(&config.extra_rules)?)
        };
        tracing::debug!(
            catalog_version = catalog.version(),
            rules = catalog.len(),
            mode = ?config.rewrite.mode,
            "pipeline configured"
        );
        Ok(Self {
            catalog,
            mode: config.rewrite.mode,
            max_passes: config.rewrite.max_passes,
            language: config.output_language,
            validator: Validator::new(config.validator.clone()),
        })
    }

    pub fn with_catalog(mut self, catalog: Arc<RuleCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_mode(mut self, mode: ApplyMode, max_passes: usize) -> Self {
        self.mode = mode;
        self.max_passes = max_passes.max(1);
        self
    }

    pub fn with_language(mut self, language: OutputLanguage) -> Self {
        self.language = language;
        self
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn language(&self) -> OutputLanguage {
        self.language
    }

    pub fn mode(&self) -> ApplyMode {
        self.mode
    }

    /// Rewrite phases then capitalization, no directive.
    pub fn rewrite(&self, text: &str) -> String {
        self.rewrite_traced(text).0
    }

    fn rewrite_traced(&self, text: &str) -> (String, Vec<RuleHit>) {
        let body = directive::strip(text);
        let (rewritten, hits) = rewrite_traced(body, &self.catalog, self.mode, self.max_passes);
        (capitalize_sentences(&rewritten), hits)
    }

    pub fn optimize(&self, text: &str) -> OptimizationResult {
        self.optimize_as(text, self.language)
    }

    /// Like [`optimize`](Self::optimize) with a per-call directive language.
    pub fn optimize_as(&self, text: &str, language: OutputLanguage) -> OptimizationResult {
        let (rewritten, rule_hits) = self.rewrite_traced(text);
        let output = directive::append(&rewritten, language);
        let diagnostics = self.validator.validate(&output);
        let savings = SavingsReport::new(text, &rewritten);

        tracing::debug!(
            hits = rule_hits.len(),
            diagnostics = diagnostics.len(),
            token_savings = savings.token_savings,
            "optimized prompt"
        );

        OptimizationResult { rewritten, output, language, savings, rule_hits, diagnostics }
    }

    pub fn validate(&self, text: &str) -> Vec<Diagnostic> {
        self.validator.validate(text)
    }
}

impl Default for PromptPipeline {
    fn default() -> Self {
        Self::new()
    }
}
